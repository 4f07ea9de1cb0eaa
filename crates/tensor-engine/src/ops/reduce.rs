// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Axis reductions: `min`, `max`, `sum`, `mean`.
//!
//! With no axes the whole tensor reduces to rank 0 (a rank-0 input is
//! returned as-is). A single axis is removed from the shape. Multiple axes
//! are normalized, deduplicated, and reduced from the highest axis down so
//! earlier axis numbers stay valid as the rank shrinks.

use crate::{Element, Tensor, TensorError};

#[derive(Debug, Clone, Copy)]
enum Reduction {
    Min,
    Max,
    Sum,
    Mean,
}

impl Reduction {
    fn seed<E: Element>(self) -> E {
        match self {
            Reduction::Min => E::pos_infinity(),
            Reduction::Max => E::neg_infinity(),
            Reduction::Sum | Reduction::Mean => E::zero(),
        }
    }

    /// Folds one value into the accumulator. Min/max use strict
    /// comparisons, so NaN values never displace the accumulator.
    fn fold<E: Element>(self, acc: E, v: E) -> E {
        match self {
            Reduction::Min => {
                if v.is_less(acc) {
                    v
                } else {
                    acc
                }
            }
            Reduction::Max => {
                if v.is_greater(acc) {
                    v
                } else {
                    acc
                }
            }
            Reduction::Sum | Reduction::Mean => acc.add(v),
        }
    }

    fn finish<E: Element>(self, acc: E, count: usize) -> E {
        match self {
            Reduction::Mean => acc.div_by(count),
            _ => acc,
        }
    }
}

impl<E: Element> Tensor<E> {
    /// Minimum over the given axes (all elements when `axes` is empty).
    ///
    /// # Errors
    /// [`TensorError::AxisOutOfRange`] for an axis outside `[-rank, rank-1]`.
    ///
    /// # Examples
    /// ```
    /// use tensor_engine::Tensor;
    /// let t = Tensor::from_values(vec![3.0f64, 1.0, 2.0]);
    /// assert_eq!(t.min(&[])?.item()?, 1.0);
    /// # Ok::<(), tensor_engine::TensorError>(())
    /// ```
    pub fn min(&self, axes: &[isize]) -> Result<Self, TensorError> {
        self.reduce(axes, Reduction::Min)
    }

    /// Maximum over the given axes (all elements when `axes` is empty).
    pub fn max(&self, axes: &[isize]) -> Result<Self, TensorError> {
        self.reduce(axes, Reduction::Max)
    }

    /// Sum over the given axes (all elements when `axes` is empty).
    pub fn sum(&self, axes: &[isize]) -> Result<Self, TensorError> {
        self.reduce(axes, Reduction::Sum)
    }

    /// Arithmetic mean over the given axes (all elements when `axes` is
    /// empty). Each reduced axis divides by that axis's extent.
    pub fn mean(&self, axes: &[isize]) -> Result<Self, TensorError> {
        self.reduce(axes, Reduction::Mean)
    }

    fn reduce(&self, axes: &[isize], r: Reduction) -> Result<Self, TensorError> {
        if axes.is_empty() {
            if self.rank() == 0 {
                return Ok(self.clone());
            }
            return Ok(self.reduce_all(r));
        }

        let mut normalized = axes
            .iter()
            .map(|&a| self.shape().normalize_axis(a))
            .collect::<Result<Vec<_>, _>>()?;
        normalized.sort_unstable();
        normalized.dedup();

        // Highest axis first: removing it does not renumber the lower ones.
        let mut result = self.clone();
        for &axis in normalized.iter().rev() {
            result = result.reduce_axis(axis, r);
        }
        Ok(result)
    }

    fn reduce_all(&self, r: Reduction) -> Self {
        let data = self.read_buf();
        let acc = data.iter().fold(r.seed::<E>(), |acc, &v| r.fold(acc, v));
        Tensor::scalar(r.finish(acc, data.len()))
    }

    fn reduce_axis(&self, axis: usize, r: Reduction) -> Self {
        let out_shape = self.shape().removing_axis(axis);
        let extent = self.shape().dims()[axis];
        let stride = self.shape().strides()[axis];
        let data = self.read_buf();

        // Walk output positions; for each, stride along the reduced axis.
        let outer: usize = self.shape().dims()[..axis].iter().product();
        let inner: usize = self.shape().dims()[axis + 1..].iter().product();
        let mut buf = Vec::with_capacity(outer * inner);
        for o in 0..outer {
            let base = o * extent * stride;
            for i in 0..inner {
                let mut acc = r.seed::<E>();
                for k in 0..extent {
                    acc = r.fold(acc, data[base + k * stride + i]);
                }
                buf.push(r.finish(acc, extent));
            }
        }
        Tensor::from_buffer(out_shape, buf)
    }
}
