// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Activation functions, composed from tensor-engine primitives.
//!
//! Every activation mutates its input in place (the caller hands over a
//! freshly computed pre-activation tensor) and returns an alias of it.
//! The formulas avoid a dedicated `tanh`/`sigmoid` scalar op on purpose:
//! each is expressed through the engine's `exp`/`add`/`reciprocal` family.

use crate::LayerError;
use tensor_engine::{Element, Tensor};

/// Supported activation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Identity; the pre-activation passes through unchanged.
    Linear,
    /// `1 / (1 + e^(-x))`
    Sigmoid,
    /// `1 - 2 / (e^(2x) + 1)`
    Tanh,
    /// `(x + |x|) / 2`
    Relu,
    /// Row-wise `e^x / sum(e^x)`; requires a rank-2 input.
    Softmax,
}

impl Activation {
    /// Parses an activation name from a manifest string.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" | "identity" | "none" => Some(Self::Linear),
            "sigmoid" | "logistic" => Some(Self::Sigmoid),
            "tanh" => Some(Self::Tanh),
            "relu" => Some(Self::Relu),
            "softmax" => Some(Self::Softmax),
            _ => None,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Sigmoid => "sigmoid",
            Self::Tanh => "tanh",
            Self::Relu => "relu",
            Self::Softmax => "softmax",
        }
    }

    /// Applies the activation in place and returns an alias of `t`.
    ///
    /// # Errors
    /// [`LayerError::ShapeCheck`] when softmax receives a non-rank-2 input;
    /// tensor errors otherwise propagate as [`LayerError::Tensor`].
    pub fn apply<E: Element>(&self, t: &Tensor<E>) -> Result<Tensor<E>, LayerError> {
        match self {
            Self::Linear => Ok(t.clone()),
            Self::Sigmoid => {
                // sigmoid(x) = 1 / (1 + e^(-x))
                let one = Tensor::ones(t.shape().dims());
                Ok(t.neg_exp_in_place().add_in_place(&one)?.reciprocal_in_place())
            }
            Self::Tanh => {
                // tanh(x) = 1 - 2 / (e^(2x) + 1), with e^(2x) = e^x * e^x
                let one = Tensor::ones(t.shape().dims());
                let denominator = t.exp_in_place();
                let denominator = denominator.multiply_in_place(&denominator)?;
                let denominator = denominator.add_in_place(&one)?;
                let fraction = denominator.reciprocal_in_place();
                let fraction = fraction.add_in_place(&fraction)?;
                Ok(fraction.negate_in_place().add_in_place(&one)?)
            }
            Self::Relu => {
                // relu(x) = (x + |x|) / 2
                Ok(t.add_in_place(&t.abs())?
                    .scalar_multiply_in_place(E::from_f64(0.5)))
            }
            Self::Softmax => {
                if t.rank() != 2 {
                    return Err(LayerError::ShapeCheck(format!(
                        "softmax requires a rank-2 input, got shape {}",
                        t.shape()
                    )));
                }
                let (rows, cols) = (t.shape().dims()[0], t.shape().dims()[1]);
                let exp_t = t.exp_in_place();
                // Row sums, broadcast back to the full shape via an outer
                // product with a row of ones.
                let denominator = exp_t
                    .sum(&[-1])?
                    .reshape(&[rows, 1])?
                    .dot(&Tensor::ones(&[1, cols]))?;
                Ok(exp_t.divide_in_place(&denominator)?)
            }
        }
    }
}

impl std::fmt::Display for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
