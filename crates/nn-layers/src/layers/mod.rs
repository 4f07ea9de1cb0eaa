// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Layer trait and concrete feed-forward layers.
//!
//! A layer declares a per-sample input and output shape; at inference it
//! receives a batched tensor whose leading axis is the batch size, so the
//! input rank is always the layer's sample rank plus one.

use crate::{Activation, LayerError};
use rand::Rng;
use tensor_engine::{Element, Tensor};

pub mod dense;
pub mod flatten;
pub mod input;
pub mod pooling;

pub use dense::Dense;
pub use flatten::Flatten;
pub use input::InputLayer;
pub use pooling::{Pooling1d, Pooling2d};

/// A feed-forward network layer.
///
/// Shapes are per-sample; [`feed_forward`](Layer::feed_forward) receives
/// and produces batched tensors with one extra leading axis.
pub trait Layer<E: Element> {
    /// Per-sample input shape (no batch axis).
    fn input_shape(&self) -> &[usize];

    /// Per-sample output shape (no batch axis).
    fn output_shape(&self) -> &[usize];

    /// The activation applied by this layer, if any.
    fn activation(&self) -> Activation {
        Activation::Linear
    }

    /// Runs the layer on a batched input.
    fn feed_forward(&self, input: &Tensor<E>) -> Result<Tensor<E>, LayerError>;
}

/// Verifies that a batched input shape matches a layer's sample shape:
/// one extra leading axis, all trailing extents equal.
pub(crate) fn check_batched_shape(
    input_dims: &[usize],
    sample_shape: &[usize],
) -> Result<(), LayerError> {
    if input_dims.len() != sample_shape.len() + 1 {
        return Err(LayerError::ShapeCheck(format!(
            "input rank must be sample rank plus one (batch), got {} vs sample rank {}",
            input_dims.len(),
            sample_shape.len()
        )));
    }
    for (axis, (&got, &want)) in input_dims[1..].iter().zip(sample_shape.iter()).enumerate() {
        if got != want {
            return Err(LayerError::ShapeCheck(format!(
                "input axis {} has extent {}, layer expects {}",
                axis + 1,
                got,
                want
            )));
        }
    }
    Ok(())
}

/// How pooling layers aggregate each window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    Average,
    Max,
}

impl PoolKind {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "average" | "avg" | "mean" => Some(Self::Average),
            "max" | "maximum" => Some(Self::Max),
            _ => None,
        }
    }

    /// Reduces one pooling window to its aggregate value.
    pub(crate) fn pool<E: Element>(&self, window: &Tensor<E>) -> Result<E, LayerError> {
        let reduced = match self {
            Self::Average => window.mean(&[])?,
            Self::Max => window.max(&[])?,
        };
        Ok(reduced.item()?)
    }
}

/// Window placement at the input edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    /// Only fully contained windows.
    Valid,
    /// Symmetric zero padding without window clipping. Unimplemented.
    Same,
    /// Keras-style: output extent `ceil(len / stride)`, windows clipped at
    /// the edges, the odd padding element going to the trailing side.
    SameKeras,
}

impl Padding {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "valid" => Some(Self::Valid),
            "same" => Some(Self::Same),
            "same_keras" | "samekeras" | "keras" => Some(Self::SameKeras),
            _ => None,
        }
    }
}

/// Weight/bias initialization strategies for trainable layers.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Initializer {
    Zeros,
    RandNormal { mean: f64, std: f64 },
    RandUniform { min: f64, max: f64 },
}

impl Initializer {
    /// Materializes a tensor of the given shape from this strategy.
    pub fn materialize<E: Element>(&self, dims: &[usize]) -> Tensor<E> {
        self.materialize_with(&mut rand::thread_rng(), dims)
    }

    /// [`materialize`](Initializer::materialize) with an explicit RNG.
    pub fn materialize_with<E: Element, R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        dims: &[usize],
    ) -> Tensor<E> {
        match *self {
            Initializer::Zeros => Tensor::zeros(dims),
            Initializer::RandNormal { mean, std } => {
                Tensor::rand_normal_with(rng, mean, std, dims)
            }
            Initializer::RandUniform { min, max } => {
                Tensor::rand_uniform_with(rng, min, max, dims)
            }
        }
    }
}

impl Default for Initializer {
    fn default() -> Self {
        Initializer::RandNormal {
            mean: 0.0,
            std: 1.0,
        }
    }
}
