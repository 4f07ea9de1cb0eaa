// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor shape descriptors and coordinate/offset conversion.

use crate::TensorError;
use std::fmt;

/// Describes the dimensionality of a [`crate::Tensor`].
///
/// A shape is an ordered sequence of per-axis extents; its length is the
/// tensor's rank (0 for scalars). Storage is row-major, so the last axis is
/// contiguous and strides are computed from the right.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Creates a new shape from the given dimensions.
    ///
    /// # Examples
    /// ```
    /// use tensor_engine::Shape;
    /// let s = Shape::new(vec![2, 3, 4]);
    /// assert_eq!(s.rank(), 3);
    /// assert_eq!(s.num_elements(), 24);
    /// ```
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }

    /// Creates a scalar shape (rank 0).
    pub fn scalar() -> Self {
        Self { dims: vec![] }
    }

    /// Creates a 1-D shape.
    pub fn vector(len: usize) -> Self {
        Self { dims: vec![len] }
    }

    /// Creates a 2-D shape (matrix).
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self {
            dims: vec![rows, cols],
        }
    }

    /// Returns the number of dimensions (rank).
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Returns the total number of elements.
    ///
    /// For a scalar shape (rank 0), returns 1.
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Returns the dimensions as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns the extent of a specific axis, or `None` if out of bounds.
    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.dims.get(axis).copied()
    }

    /// Computes row-major (C-order) strides for this shape.
    ///
    /// The stride for axis `i` is the number of elements to skip in the flat
    /// buffer to advance one step along that axis.
    pub fn strides(&self) -> Vec<usize> {
        let rank = self.dims.len();
        if rank == 0 {
            return vec![];
        }
        let mut strides = vec![0usize; rank];
        strides[rank - 1] = 1;
        for i in (0..rank - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// Converts a coordinate list to a flat row-major offset.
    ///
    /// Rank-0 shapes accept the empty coordinate list or `[0]`, both
    /// addressing the single element.
    ///
    /// # Errors
    /// [`TensorError::DimensionMismatch`] if the arity is wrong,
    /// [`TensorError::IndexOutOfRange`] if a coordinate violates its bound.
    pub fn offset_of(&self, coords: &[usize]) -> Result<usize, TensorError> {
        if self.rank() == 0 {
            return match coords {
                [] | [0] => Ok(0),
                [i, ..] => Err(TensorError::IndexOutOfRange {
                    axis: 0,
                    index: *i,
                    extent: 1,
                }),
            };
        }

        if coords.len() != self.rank() {
            return Err(TensorError::DimensionMismatch {
                expected: self.rank(),
                actual: coords.len(),
            });
        }

        let mut offset = 0;
        for (axis, (&idx, &extent)) in coords.iter().zip(self.dims.iter()).enumerate() {
            if idx >= extent {
                return Err(TensorError::IndexOutOfRange {
                    axis,
                    index: idx,
                    extent,
                });
            }
            offset = offset * extent + idx;
        }
        Ok(offset)
    }

    /// Converts a flat offset back to a coordinate list (inverse of
    /// [`offset_of`](Shape::offset_of)).
    ///
    /// # Errors
    /// [`TensorError::IndexOutOfRange`] if `offset >= num_elements`.
    pub fn coords_of(&self, offset: usize) -> Result<Vec<usize>, TensorError> {
        if offset >= self.num_elements() {
            return Err(TensorError::IndexOutOfRange {
                axis: 0,
                index: offset,
                extent: self.num_elements(),
            });
        }

        let rank = self.rank();
        let mut coords = vec![0usize; rank];
        let mut block = 1;
        for i in (0..rank).rev() {
            coords[i] = (offset / block) % self.dims[i];
            block *= self.dims[i];
        }
        Ok(coords)
    }

    /// Maps a possibly negative axis argument to its non-negative form.
    ///
    /// `-rank <= a < 0` resolves to `rank + a`; anything outside
    /// `[-rank, rank-1]` fails with [`TensorError::AxisOutOfRange`].
    pub fn normalize_axis(&self, axis: isize) -> Result<usize, TensorError> {
        let rank = self.rank() as isize;
        if axis < -rank || axis >= rank {
            return Err(TensorError::AxisOutOfRange {
                axis,
                rank: self.rank(),
            });
        }
        Ok(if axis < 0 { rank + axis } else { axis } as usize)
    }

    /// Returns this shape with the given axis removed (rank lowered by one).
    pub fn removing_axis(&self, axis: usize) -> Shape {
        let dims = self
            .dims
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != axis)
            .map(|(_, &d)| d)
            .collect();
        Shape::new(dims)
    }

    /// Returns this shape with the given axis's extent replaced.
    pub fn with_axis_extent(&self, axis: usize, extent: usize) -> Shape {
        let mut dims = self.dims.clone();
        dims[axis] = extent;
        Shape::new(dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

/// Convenience: `Shape::from(vec![2, 3])`.
impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self::new(dims)
    }
}

/// Convenience: `Shape::from(&[2, 3][..])`.
impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims.to_vec())
    }
}
