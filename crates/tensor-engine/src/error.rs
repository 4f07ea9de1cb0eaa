// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor operations.

use crate::Shape;

/// Errors that can occur during tensor operations.
///
/// All variants are raised synchronously at the call that violates a
/// precondition; there are no transient-failure modes to retry.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// A shape was structurally invalid (e.g., a negative dimension from an
    /// untrusted source).
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// A coordinate list had the wrong number of entries for the tensor's rank.
    #[error("expected {expected} coordinates, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A coordinate or flat index was outside the tensor's bounds.
    #[error("index {index} out of range for axis {axis} with extent {extent}")]
    IndexOutOfRange {
        axis: usize,
        index: usize,
        extent: usize,
    },

    /// An axis argument was outside `[-rank, rank-1]`.
    #[error("axis {axis} out of range for tensor of rank {rank}")]
    AxisOutOfRange { axis: isize, rank: usize },

    /// A slice range fell outside the axis it addresses.
    #[error("slice range {start}:{end} out of bounds for axis {axis} with extent {extent}")]
    RangeOutOfBounds {
        axis: usize,
        start: isize,
        end: isize,
        extent: usize,
    },

    /// Two tensors have incompatible shapes for the requested operation.
    #[error("incompatible shapes for {op}: {lhs} vs {rhs}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// The requested rank combination or mode is not implemented.
    #[error("not supported in {op}: {detail}")]
    NotSupported { op: &'static str, detail: String },
}
