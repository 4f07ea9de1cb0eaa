// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Feed-forward network layers on top of [`tensor_engine`].
//!
//! Provides activations, dense/flatten/pooling layers, a [`Network`] that
//! folds them over a batched input, and a JSON [`NetworkManifest`] for
//! loading a network (with inline weights) from disk.
//!
//! # Example
//!
//! ```
//! use nn_layers::{Activation, Layer, Network};
//! use nn_layers::layers::{Dense, InputLayer};
//! use tensor_engine::Tensor;
//!
//! let net = Network::<f64>::new(vec![
//!     Box::new(InputLayer::new(&[10])),
//!     Box::new(Dense::new(&[10], 5, Activation::Softmax)?),
//! ])?;
//! let x = Tensor::rand_uniform(0.0, 1.0, &[4, 10]);
//! let y = net.predict(&x)?;
//! assert_eq!(y.shape().dims(), &[4, 5]);
//! # Ok::<(), nn_layers::LayerError>(())
//! ```

pub mod activation;
pub mod error;
pub mod layers;
pub mod manifest;
pub mod network;

pub use activation::Activation;
pub use error::LayerError;
pub use layers::{Initializer, Layer, Padding, PoolKind};
pub use manifest::{LayerKind, ManifestLayer, NetworkManifest};
pub use network::Network;
