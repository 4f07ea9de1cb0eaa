// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Core tensor type: construction, indexing, reshaping, formatting, equality.
//!
//! # Memory Layout
//! Data is stored in row-major (C) order as a flat buffer behind
//! `Arc<RwLock<Vec<E>>>`. Cloning a [`Tensor`] is cheap and produces an
//! **alias**: both handles share the buffer, and mutation through one is
//! observable through the other. [`Tensor::deep_copy`] produces an
//! independent buffer. Reshapes and full-axis slices alias; partial slices
//! copy (see the `ops` module).

use crate::{Element, Shape, TensorError};
use rand::Rng;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Absolute tolerance used by the `PartialEq` implementation.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// An n-dimensional tensor over a numeric element type.
///
/// # Examples
/// ```
/// use tensor_engine::Tensor;
/// let t = Tensor::<f64>::zeros(&[2, 3]);
/// assert_eq!(t.rank(), 2);
/// assert_eq!(t.num_elements(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct Tensor<E: Element> {
    shape: Shape,
    data: Arc<RwLock<Vec<E>>>,
}

impl<E: Element> Tensor<E> {
    /// Creates a tensor owning a fresh buffer for `shape`, filled with `value`.
    pub(crate) fn filled(shape: Shape, value: E) -> Self {
        let n = shape.num_elements();
        Self {
            shape,
            data: Arc::new(RwLock::new(vec![value; n])),
        }
    }

    /// Wraps an existing flat buffer in a new exclusively-owned tensor.
    ///
    /// The buffer length must equal `shape.num_elements()`; this is an
    /// internal constructor and callers uphold that invariant.
    pub(crate) fn from_buffer(shape: Shape, buffer: Vec<E>) -> Self {
        debug_assert_eq!(shape.num_elements(), buffer.len());
        Self {
            shape,
            data: Arc::new(RwLock::new(buffer)),
        }
    }

    // ── Construction ───────────────────────────────────────────────

    /// Creates a rank-0 tensor holding a single value.
    pub fn scalar(value: E) -> Self {
        Self::from_buffer(Shape::scalar(), vec![value])
    }

    /// Creates a rank-1 tensor from a flat list of values.
    pub fn from_values(values: Vec<E>) -> Self {
        let shape = Shape::vector(values.len());
        Self::from_buffer(shape, values)
    }

    /// Creates a tensor of the given shape filled with zeros.
    pub fn zeros(dims: &[usize]) -> Self {
        Self::filled(Shape::from(dims), E::zero())
    }

    /// Creates a tensor of the given shape filled with ones.
    pub fn ones(dims: &[usize]) -> Self {
        Self::filled(Shape::from(dims), E::one())
    }

    /// Creates a rank-1 tensor of values from `start` (inclusive) to `stop`
    /// (exclusive) in increments of `step`.
    ///
    /// The element count is `ceil((stop - start) / step)`; if that is not
    /// positive, or not finite (`step == 0` yields an infinite or NaN
    /// ratio), the result is an empty tensor of shape `[0]`. Values are
    /// produced by repeated addition of `step`, matching iterative floating
    /// behaviour rather than `start + i * step`.
    pub fn arange(start: E, stop: E, step: E) -> Self {
        let ratio = stop.sub(start).div(step);
        if !ratio.to_f64().is_finite() {
            return Self::zeros(&[0]);
        }
        let count = ratio.ceil_int();
        if count <= 0 {
            return Self::zeros(&[0]);
        }
        let count = count as usize;
        let mut values = Vec::with_capacity(count);
        let mut current = start;
        values.push(current);
        for _ in 1..count {
            current = current.add(step);
            values.push(current);
        }
        Self::from_values(values)
    }

    /// Creates a rank-1 tensor of `num` evenly spaced values from `start` to
    /// `stop` inclusive.
    ///
    /// The increment is `(stop - start) / (num - 1)` and values are
    /// accumulated iteratively. `num == 1` divides by zero when computing the
    /// increment; the resulting infinity/NaN is propagated rather than
    /// guarded (the single produced element is still `start`).
    pub fn linspace(start: E, stop: E, num: usize) -> Self {
        if num == 0 {
            return Self::zeros(&[0]);
        }
        let increment = stop.sub(start).div_by(num - 1);
        let mut values = Vec::with_capacity(num);
        let mut current = start;
        values.push(current);
        for _ in 1..num {
            current = current.add(increment);
            values.push(current);
        }
        Self::from_values(values)
    }

    /// Creates a tensor with every element drawn independently from a
    /// uniform distribution over `[min, max)`.
    pub fn rand_uniform(min: f64, max: f64, dims: &[usize]) -> Self {
        Self::rand_uniform_with(&mut rand::thread_rng(), min, max, dims)
    }

    /// [`rand_uniform`](Tensor::rand_uniform) with an explicit RNG.
    pub fn rand_uniform_with<R: Rng + ?Sized>(
        rng: &mut R,
        min: f64,
        max: f64,
        dims: &[usize],
    ) -> Self {
        let shape = Shape::from(dims);
        let values = (0..shape.num_elements())
            .map(|_| E::rand_uniform(rng, min, max))
            .collect();
        Self::from_buffer(shape, values)
    }

    /// Creates a tensor with every element drawn independently from a normal
    /// distribution with the given mean and standard deviation.
    pub fn rand_normal(mean: f64, std: f64, dims: &[usize]) -> Self {
        Self::rand_normal_with(&mut rand::thread_rng(), mean, std, dims)
    }

    /// [`rand_normal`](Tensor::rand_normal) with an explicit RNG.
    pub fn rand_normal_with<R: Rng + ?Sized>(
        rng: &mut R,
        mean: f64,
        std: f64,
        dims: &[usize],
    ) -> Self {
        let shape = Shape::from(dims);
        let values = (0..shape.num_elements())
            .map(|_| E::rand_normal(rng, mean, std))
            .collect();
        Self::from_buffer(shape, values)
    }

    /// Returns a tensor with the same shape and an independent copy of the
    /// buffer. In contrast, `clone()` shares the buffer.
    pub fn deep_copy(&self) -> Self {
        Self::from_buffer(self.shape.clone(), self.read_buf().clone())
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the number of axes.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Returns the total number of elements (1 for rank 0).
    pub fn num_elements(&self) -> usize {
        self.shape.num_elements()
    }

    /// Returns `true` if both tensors share the same underlying buffer.
    pub fn shares_buffer_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub(crate) fn read_buf(&self) -> RwLockReadGuard<'_, Vec<E>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write_buf(&self) -> RwLockWriteGuard<'_, Vec<E>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a flat copy of the buffer in row-major order.
    pub fn to_vec(&self) -> Vec<E> {
        self.read_buf().clone()
    }

    /// Reads the element at the given coordinates.
    ///
    /// # Errors
    /// [`TensorError::DimensionMismatch`] on wrong arity,
    /// [`TensorError::IndexOutOfRange`] on out-of-bounds coordinates.
    pub fn get(&self, coords: &[usize]) -> Result<E, TensorError> {
        let offset = self.shape.offset_of(coords)?;
        Ok(self.read_buf()[offset])
    }

    /// Writes the element at the given coordinates.
    ///
    /// The write is visible through every alias of this tensor's buffer.
    pub fn set(&self, coords: &[usize], value: E) -> Result<(), TensorError> {
        let offset = self.shape.offset_of(coords)?;
        self.write_buf()[offset] = value;
        Ok(())
    }

    /// Extracts the value of a single-element tensor (any rank).
    pub fn item(&self) -> Result<E, TensorError> {
        if self.num_elements() != 1 {
            return Err(TensorError::InvalidShape(format!(
                "item() requires a single-element tensor, shape is {}",
                self.shape
            )));
        }
        Ok(self.read_buf()[0])
    }

    /// Overwrites every element with `value`, in place.
    pub fn fill(&self, value: E) {
        self.write_buf().iter_mut().for_each(|x| *x = value);
    }

    // ── Reshaping ──────────────────────────────────────────────────

    /// Returns a tensor of the new shape **sharing this tensor's buffer**.
    ///
    /// Mutating either tensor mutates both.
    ///
    /// # Errors
    /// [`TensorError::ShapeMismatch`] unless the element counts match.
    pub fn reshape(&self, dims: &[usize]) -> Result<Self, TensorError> {
        let new_shape = Shape::from(dims);
        if new_shape.num_elements() != self.num_elements() {
            return Err(TensorError::ShapeMismatch {
                op: "reshape",
                lhs: self.shape.clone(),
                rhs: new_shape,
            });
        }
        Ok(Self {
            shape: new_shape,
            data: Arc::clone(&self.data),
        })
    }

    /// Returns a rank-1 alias of this tensor.
    pub fn flatten(&self) -> Self {
        Self {
            shape: Shape::vector(self.num_elements()),
            data: Arc::clone(&self.data),
        }
    }

    // ── Equality & formatting ──────────────────────────────────────

    /// Returns `true` if the tensors have the same shape and every element
    /// pair differs by at most `epsilon` in absolute value.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        if self.shape != other.shape {
            return false;
        }
        let eps = E::from_f64(epsilon);
        let a = self.read_buf();
        let b = other.read_buf();
        a.iter()
            .zip(b.iter())
            .all(|(&x, &y)| !x.sub(y).abs().is_greater(eps))
    }

    /// Renders the tensor with configurable indentation and bracket display.
    ///
    /// Values are printed fixed-width with four decimals; bracket nesting
    /// follows the rank. Intended for debugging and golden-output
    /// comparisons, not parsing.
    pub fn to_display_string(&self, indent: usize, brackets: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Tensor(shape: {}, dtype: {}, data:\n",
            self.shape,
            std::any::type_name::<E>()
        ));
        out.push_str(&" ".repeat(indent));
        let data = self.read_buf();
        if self.rank() == 0 {
            out.push_str(&format!("{:9.4}", data[0].to_f64()));
        } else {
            write_block(
                &mut out,
                &data,
                self.shape.dims(),
                &self.shape.strides(),
                0,
                0,
                indent,
                brackets,
            );
        }
        out.push_str("\n)");
        out
    }
}

/// Recursively renders one bracket level of the data block.
#[allow(clippy::too_many_arguments)]
fn write_block<E: Element>(
    out: &mut String,
    data: &[E],
    dims: &[usize],
    strides: &[usize],
    axis: usize,
    offset: usize,
    indent: usize,
    brackets: bool,
) {
    if axis == dims.len() - 1 {
        // Innermost axis: one row of values.
        if brackets {
            out.push('[');
        }
        for i in 0..dims[axis] {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&format!("{:9.4}", data[offset + i].to_f64()));
        }
        if brackets {
            out.push(']');
        }
        return;
    }

    if brackets {
        out.push('[');
    }
    for i in 0..dims[axis] {
        if i > 0 {
            out.push(',');
            // One blank line per closed bracket level, numpy style.
            out.push_str(&"\n".repeat(dims.len() - 1 - axis));
            out.push_str(&" ".repeat(indent + axis + 1));
        }
        write_block(
            out,
            data,
            dims,
            strides,
            axis + 1,
            offset + i * strides[axis],
            indent,
            brackets,
        );
    }
    if brackets {
        out.push(']');
    }
}

impl<E: Element> fmt::Display for Tensor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string(4, true))
    }
}

/// Approximate equality with a fixed `1e-6` absolute tolerance.
impl<E: Element> PartialEq for Tensor<E> {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, DEFAULT_EPSILON)
    }
}
