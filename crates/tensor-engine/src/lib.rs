// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A small n-dimensional tensor engine.
//!
//! Generic over [`Element`] (`f32`/`f64`), with row-major storage behind a
//! reference-counted buffer: `clone()` aliases, [`Tensor::deep_copy`]
//! copies, reshapes and full-axis slices alias, partial slices copy.
//! Operations cover slicing, axis reductions, same-shape elementwise
//! arithmetic, and a numpy-style generalized dot product.
//!
//! # Example
//!
//! ```
//! use tensor_engine::Tensor;
//!
//! let weights = Tensor::<f64>::rand_normal(0.0, 0.1, &[3, 4]);
//! let input = Tensor::from_values(vec![1.0, 2.0, 3.0]).reshape(&[1, 3])?;
//! let out = input.dot(&weights)?;
//! assert_eq!(out.shape().dims(), &[1, 4]);
//! # Ok::<(), tensor_engine::TensorError>(())
//! ```

pub mod element;
pub mod error;
pub mod ops;
pub mod shape;
pub mod tensor;

pub use element::Element;
pub use error::TensorError;
pub use ops::{AxisRange, RankClass};
pub use shape::Shape;
pub use tensor::{Tensor, DEFAULT_EPSILON};
