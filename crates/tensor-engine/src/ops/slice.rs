// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Axis slicing with view/copy semantics.
//!
//! Whether a slice aliases or copies depends on what it selects:
//! - the **full axis** returns an alias of the receiver (no copy);
//! - a **single element** copies and drops the axis (unless keep-dims);
//! - a **partial range** copies with the axis narrowed;
//! - an **empty range** (`end <= start` after resolution, endpoints within
//!   bounds) yields an empty tensor rather than an error.

use crate::{Element, Shape, Tensor, TensorError};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

/// One endpoint of an [`AxisRange`], counted from the start or the end of
/// the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound {
    pub offset: usize,
    pub from_end: bool,
}

impl Bound {
    /// A bound `offset` positions from the start.
    pub fn from_start(offset: usize) -> Self {
        Self {
            offset,
            from_end: false,
        }
    }

    /// A bound `offset` positions back from one past the end
    /// (`from_end(0)` is the exclusive end of the axis).
    pub fn from_end(offset: usize) -> Self {
        Self {
            offset,
            from_end: true,
        }
    }

    fn resolve(self, extent: usize) -> isize {
        if self.from_end {
            extent as isize - self.offset as isize
        } else {
            self.offset as isize
        }
    }
}

/// A half-open range over one tensor axis, with endpoints optionally
/// counted from the end of the axis.
///
/// # Examples
/// ```
/// use tensor_engine::AxisRange;
/// let _first_three: AxisRange = (0..3).into();
/// let _tail: AxisRange = (2..).into();
/// let _last_two = AxisRange::last(2);
/// let _everything: AxisRange = (..).into();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub start: Bound,
    pub end: Bound,
}

impl AxisRange {
    pub fn new(start: Bound, end: Bound) -> Self {
        Self { start, end }
    }

    /// The entire axis.
    pub fn all() -> Self {
        Self {
            start: Bound::from_start(0),
            end: Bound::from_end(0),
        }
    }

    /// The single element at `index`.
    pub fn single(index: usize) -> Self {
        Self {
            start: Bound::from_start(index),
            end: Bound::from_start(index + 1),
        }
    }

    /// The last `count` elements of the axis.
    pub fn last(count: usize) -> Self {
        Self {
            start: Bound::from_end(count),
            end: Bound::from_end(0),
        }
    }

    /// Resolves both bounds against the axis extent.
    ///
    /// Returns `(start, end)` clamped nowhere: callers see the raw resolved
    /// values so they can distinguish empty from invalid.
    fn resolve(self, extent: usize) -> (isize, isize) {
        (self.start.resolve(extent), self.end.resolve(extent))
    }
}

impl From<Range<usize>> for AxisRange {
    fn from(r: Range<usize>) -> Self {
        Self {
            start: Bound::from_start(r.start),
            end: Bound::from_start(r.end),
        }
    }
}

impl From<RangeFrom<usize>> for AxisRange {
    fn from(r: RangeFrom<usize>) -> Self {
        Self {
            start: Bound::from_start(r.start),
            end: Bound::from_end(0),
        }
    }
}

impl From<RangeTo<usize>> for AxisRange {
    fn from(r: RangeTo<usize>) -> Self {
        Self {
            start: Bound::from_start(0),
            end: Bound::from_start(r.end),
        }
    }
}

impl From<RangeFull> for AxisRange {
    fn from(_: RangeFull) -> Self {
        Self::all()
    }
}

impl<E: Element> Tensor<E> {
    /// Slices one axis, dropping it when the range selects a single element.
    ///
    /// Negative `axis` counts from the back. See the module docs for the
    /// alias/copy rules.
    ///
    /// # Errors
    /// [`TensorError::AxisOutOfRange`] for a bad axis,
    /// [`TensorError::RangeOutOfBounds`] for a resolved range outside the
    /// axis (an empty range is not an error).
    ///
    /// # Examples
    /// ```
    /// use tensor_engine::Tensor;
    /// let t = Tensor::from_values(vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0])
    ///     .reshape(&[2, 3])?;
    /// let row = t.slice(0, (1..2).into())?; // shape [3], a copy
    /// assert_eq!(row.to_vec(), vec![4.0, 5.0, 6.0]);
    /// # Ok::<(), tensor_engine::TensorError>(())
    /// ```
    pub fn slice(&self, axis: isize, range: AxisRange) -> Result<Self, TensorError> {
        self.slice_impl(axis, range, false)
    }

    /// Slices one axis, keeping it (with extent 1) when the range selects a
    /// single element. Otherwise identical to [`slice`](Tensor::slice).
    pub fn slice_keep_dims(&self, axis: isize, range: AxisRange) -> Result<Self, TensorError> {
        self.slice_impl(axis, range, true)
    }

    fn slice_impl(
        &self,
        axis: isize,
        range: AxisRange,
        keep_dims: bool,
    ) -> Result<Self, TensorError> {
        let axis = self.shape().normalize_axis(axis)?;
        let extent = self.shape().dims()[axis];
        let (start, end) = range.resolve(extent);

        // Bounds are validated before emptiness: an inverted range whose
        // endpoints fall outside the axis is an error, not an empty slice.
        if start < 0 || end > extent as isize {
            return Err(TensorError::RangeOutOfBounds {
                axis,
                start,
                end,
                extent,
            });
        }
        // An in-bounds empty selection is valid and produces a zero-extent
        // axis.
        if end <= start {
            return Ok(Tensor::filled(
                self.shape().with_axis_extent(axis, 0),
                E::zero(),
            ));
        }
        let (start, end) = (start as usize, end as usize);

        // The full axis is a no-op: hand back an alias, not a copy.
        if start == 0 && end == extent {
            return Ok(self.clone());
        }

        let width = end - start;
        let narrowed = self.shape().with_axis_extent(axis, width);
        let out = self.copy_region(&narrowed, axis, start);
        if width == 1 && !keep_dims {
            // Single element drops the axis. Element count is unchanged, so
            // the reshape cannot fail.
            let dropped = narrowed.removing_axis(axis);
            return out.reshape(dropped.dims());
        }
        Ok(out)
    }

    /// Copies the sub-block of `self` described by `out_shape`, which equals
    /// `self.shape()` except that `axis` is narrowed and shifted by `start`.
    fn copy_region(&self, out_shape: &Shape, axis: usize, start: usize) -> Self {
        let src = self.read_buf();
        let src_strides = self.shape().strides();
        let out_strides = out_shape.strides();
        let dims = out_shape.dims();
        let n = out_shape.num_elements();

        let mut buf = Vec::with_capacity(n);
        for flat in 0..n {
            let mut src_offset = 0;
            let mut rem = flat;
            for a in 0..dims.len() {
                let mut coord = rem / out_strides[a];
                rem %= out_strides[a];
                if a == axis {
                    coord += start;
                }
                src_offset += coord * src_strides[a];
            }
            buf.push(src[src_offset]);
        }
        Tensor::from_buffer(out_shape.clone(), buf)
    }

    /// Applies one range per leading axis; omitted trailing axes are taken
    /// in full. Ranges are applied from the last given axis down, so axes
    /// dropped by single-element ranges do not shift the earlier ones.
    ///
    /// # Errors
    /// [`TensorError::DimensionMismatch`] if more ranges than axes are
    /// given, plus any error from the per-axis slices.
    pub fn slice_axes(&self, ranges: &[AxisRange]) -> Result<Self, TensorError> {
        if ranges.len() > self.rank() {
            return Err(TensorError::DimensionMismatch {
                expected: self.rank(),
                actual: ranges.len(),
            });
        }
        let mut result = self.clone();
        for (axis, range) in ranges.iter().enumerate().rev() {
            result = result.slice(axis as isize, *range)?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_2x3() -> Tensor<f64> {
        Tensor::from_values(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .reshape(&[2, 3])
            .unwrap()
    }

    #[test]
    fn test_full_axis_slice_aliases() {
        let t = matrix_2x3();
        let v = t.slice(0, AxisRange::all()).unwrap();
        assert!(v.shares_buffer_with(&t));
        assert_eq!(v.shape(), t.shape());
    }

    #[test]
    fn test_full_axis_via_resolved_range() {
        // 0..extent is recognized as full even when written explicitly.
        let t = matrix_2x3();
        let v = t.slice(1, (0..3).into()).unwrap();
        assert!(v.shares_buffer_with(&t));
    }

    #[test]
    fn test_single_element_slice_copies_and_drops_axis() {
        let t = matrix_2x3();
        let row = t.slice(0, AxisRange::single(1)).unwrap();
        assert_eq!(row.shape().dims(), &[3]);
        assert_eq!(row.to_vec(), vec![4.0, 5.0, 6.0]);
        assert!(!row.shares_buffer_with(&t));

        // Writes to the copy do not reach the source.
        row.set(&[0], 0.0).unwrap();
        assert_eq!(t.get(&[1, 0]).unwrap(), 4.0);
    }

    #[test]
    fn test_single_element_keep_dims() {
        let t = matrix_2x3();
        let row = t.slice_keep_dims(0, AxisRange::single(1)).unwrap();
        assert_eq!(row.shape().dims(), &[1, 3]);
        assert_eq!(row.to_vec(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_partial_slice_copies() {
        let t = matrix_2x3();
        let cols = t.slice(1, (1..3).into()).unwrap();
        assert_eq!(cols.shape().dims(), &[2, 2]);
        assert_eq!(cols.to_vec(), vec![2.0, 3.0, 5.0, 6.0]);
        assert!(!cols.shares_buffer_with(&t));
    }

    #[test]
    fn test_empty_range_is_not_an_error() {
        let t = matrix_2x3();
        let empty = t.slice(1, (2..2).into()).unwrap();
        assert_eq!(empty.shape().dims(), &[2, 0]);
        assert_eq!(empty.num_elements(), 0);

        // Inverted bounds behave the same.
        let empty = t.slice(1, (2..1).into()).unwrap();
        assert_eq!(empty.num_elements(), 0);
    }

    #[test]
    fn test_inverted_range_out_of_bounds_is_an_error() {
        // An inverted range is only empty when its endpoints are valid; an
        // endpoint past the axis fails the bounds check first.
        let t = Tensor::from_values(vec![1.0f64, 2.0, 3.0]);
        let err = t.slice(0, (5..4).into()).unwrap_err();
        assert!(matches!(
            err,
            TensorError::RangeOutOfBounds {
                axis: 0,
                start: 5,
                end: 4,
                extent: 3
            }
        ));
    }

    #[test]
    fn test_out_of_bounds_range() {
        let t = matrix_2x3();
        let err = t.slice(1, (1..4).into()).unwrap_err();
        assert!(matches!(
            err,
            TensorError::RangeOutOfBounds {
                axis: 1,
                start: 1,
                end: 4,
                extent: 3
            }
        ));
    }

    #[test]
    fn test_from_end_bounds() {
        let t = Tensor::from_values(vec![1.0f64, 2.0, 3.0, 4.0, 5.0]);
        let tail = t.slice(0, AxisRange::last(2)).unwrap();
        assert_eq!(tail.to_vec(), vec![4.0, 5.0]);

        let head = t.slice(0, (..3).into()).unwrap();
        assert_eq!(head.to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_end_past_start_is_empty() {
        let t = Tensor::from_values(vec![1.0f64, 2.0]);
        // Resolves to -1..2; start/end inversion never happens here, the
        // negative start is a bounds error instead.
        let err = t.slice(0, AxisRange::new(Bound::from_end(3), Bound::from_end(0)));
        assert!(matches!(
            err.unwrap_err(),
            TensorError::RangeOutOfBounds { start: -1, .. }
        ));
    }

    #[test]
    fn test_negative_axis() {
        let t = matrix_2x3();
        let col = t.slice(-1, AxisRange::single(2)).unwrap();
        assert_eq!(col.shape().dims(), &[2]);
        assert_eq!(col.to_vec(), vec![3.0, 6.0]);
        assert!(t.slice(2, AxisRange::all()).is_err());
    }

    #[test]
    fn test_slice_axes_defaults_trailing_to_full() {
        let t = matrix_2x3();
        let sub = t.slice_axes(&[(0..1).into()]).unwrap();
        // Single-element range on axis 0 drops the axis; axis 1 untouched.
        assert_eq!(sub.shape().dims(), &[3]);
        assert_eq!(sub.to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_slice_axes_multiple() {
        let t = Tensor::from_values((0..24).map(|i| i as f64).collect())
            .reshape(&[2, 3, 4])
            .unwrap();
        let sub = t
            .slice_axes(&[(1..2).into(), (0..2).into(), (1..3).into()])
            .unwrap();
        // Axis 0 dropped, axes 1 and 2 narrowed.
        assert_eq!(sub.shape().dims(), &[2, 2]);
        assert_eq!(sub.to_vec(), vec![13.0, 14.0, 17.0, 18.0]);
    }

    #[test]
    fn test_slice_axes_too_many_ranges() {
        let t = matrix_2x3();
        let err = t
            .slice_axes(&[(0..1).into(), (0..1).into(), (0..1).into()])
            .unwrap_err();
        assert!(matches!(
            err,
            TensorError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_slice_3d_middle_axis() {
        let t = Tensor::from_values((0..24).map(|i| i as f64).collect())
            .reshape(&[2, 3, 4])
            .unwrap();
        let mid = t.slice(1, (1..3).into()).unwrap();
        assert_eq!(mid.shape().dims(), &[2, 2, 4]);
        assert_eq!(mid.get(&[0, 0, 0]).unwrap(), 4.0);
        assert_eq!(mid.get(&[1, 1, 3]).unwrap(), 23.0);
    }
}
