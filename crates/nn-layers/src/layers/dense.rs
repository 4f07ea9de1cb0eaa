// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fully connected layer: `y = activation(x · W + b)`.

use super::{check_batched_shape, Initializer, Layer};
use crate::{Activation, LayerError};
use tensor_engine::{Element, Tensor};

/// A dense (fully connected) layer over 1-D samples.
///
/// Weights have shape `[in_features, units]`, the optional bias `[units]`.
/// Input is batched as `[batch, in_features]`.
#[derive(Debug, Clone)]
pub struct Dense<E: Element> {
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
    units: usize,
    activation: Activation,
    weights: Tensor<E>,
    bias: Option<Tensor<E>>,
}

impl<E: Element> Dense<E> {
    /// Creates a dense layer with default initialization (standard-normal
    /// weights and bias).
    ///
    /// # Errors
    /// [`LayerError::NotSupported`] unless the sample shape is 1-D.
    pub fn new(
        sample_shape: &[usize],
        units: usize,
        activation: Activation,
    ) -> Result<Self, LayerError> {
        Self::with_initializers(
            sample_shape,
            units,
            activation,
            Initializer::default(),
            Some(Initializer::default()),
        )
    }

    /// Creates a dense layer with explicit initializers. `bias_init: None`
    /// disables the bias term entirely.
    pub fn with_initializers(
        sample_shape: &[usize],
        units: usize,
        activation: Activation,
        weights_init: Initializer,
        bias_init: Option<Initializer>,
    ) -> Result<Self, LayerError> {
        if sample_shape.len() != 1 {
            return Err(LayerError::NotSupported(format!(
                "dense layers take 1-D samples, got sample shape of rank {}",
                sample_shape.len()
            )));
        }
        if units == 0 {
            return Err(LayerError::InvalidConfig("units must be at least 1".into()));
        }
        let in_features = sample_shape[0];
        Ok(Self {
            input_shape: sample_shape.to_vec(),
            output_shape: vec![units],
            units,
            activation,
            weights: weights_init.materialize(&[in_features, units]),
            bias: bias_init.map(|init| init.materialize(&[units])),
        })
    }

    pub fn units(&self) -> usize {
        self.units
    }

    pub fn weights(&self) -> &Tensor<E> {
        &self.weights
    }

    pub fn bias(&self) -> Option<&Tensor<E>> {
        self.bias.as_ref()
    }

    /// Replaces the weight matrix.
    ///
    /// # Errors
    /// [`LayerError::InvalidConfig`] unless the tensor is
    /// `[in_features, units]`.
    pub fn set_weights(&mut self, weights: Tensor<E>) -> Result<(), LayerError> {
        let expected = [self.input_shape[0], self.units];
        if weights.shape().dims() != expected {
            return Err(LayerError::InvalidConfig(format!(
                "weights must have shape [{}, {}], got {}",
                expected[0],
                expected[1],
                weights.shape()
            )));
        }
        self.weights = weights;
        Ok(())
    }

    /// Replaces the bias vector.
    ///
    /// # Errors
    /// [`LayerError::InvalidConfig`] unless the tensor is `[units]`.
    pub fn set_bias(&mut self, bias: Tensor<E>) -> Result<(), LayerError> {
        if bias.shape().dims() != [self.units] {
            return Err(LayerError::InvalidConfig(format!(
                "bias must have shape [{}], got {}",
                self.units,
                bias.shape()
            )));
        }
        self.bias = Some(bias);
        Ok(())
    }
}

impl<E: Element> Layer<E> for Dense<E> {
    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    fn activation(&self) -> Activation {
        self.activation
    }

    fn feed_forward(&self, input: &Tensor<E>) -> Result<Tensor<E>, LayerError> {
        if input.rank() != 2 {
            return Err(LayerError::NotSupported(format!(
                "dense layers take rank-2 batched input, got {}",
                input.shape()
            )));
        }
        check_batched_shape(input.shape().dims(), &self.input_shape)?;

        let batch = input.shape().dims()[0];
        let result = input.dot(&self.weights)?;
        if let Some(bias) = &self.bias {
            // Broadcast the bias over the batch as ones[batch,1] · bias[1,units].
            let bias_rows = Tensor::ones(&[batch, 1]).dot(&bias.reshape(&[1, self.units])?)?;
            result.add_in_place(&bias_rows)?;
        }
        match self.activation {
            Activation::Linear => Ok(result),
            act => act.apply(&result),
        }
    }
}
