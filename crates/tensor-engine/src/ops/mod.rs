// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor operations, grouped by family.
//!
//! Each submodule adds an `impl` block on [`crate::Tensor`]:
//! - [`slice`] — axis slicing with view/copy semantics
//! - [`reduce`] — axis reductions (`min`, `max`, `sum`, `mean`)
//! - [`elementwise`] — same-shape arithmetic and unary maps
//! - [`dot`] — scalar multiply, matrix multiply, generalized dot

pub mod dot;
pub mod elementwise;
pub mod reduce;
pub mod slice;

pub use dot::RankClass;
pub use slice::AxisRange;
