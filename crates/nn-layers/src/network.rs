// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A feed-forward network: an ordered stack of layers.

use crate::{Layer, LayerError};
use tensor_engine::{Element, Tensor};

/// An inference-only feed-forward network.
///
/// `predict` folds the input through every layer in order. Shapes are
/// validated per layer at call time, not at construction: layers only
/// declare per-sample shapes, and consecutive mismatches surface as
/// [`LayerError::ShapeCheck`] from the offending layer.
pub struct Network<E: Element> {
    layers: Vec<Box<dyn Layer<E>>>,
}

impl<E: Element> std::fmt::Debug for Network<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl<E: Element> Network<E> {
    /// Builds a network from an ordered layer stack.
    ///
    /// # Errors
    /// [`LayerError::InvalidConfig`] if `layers` is empty.
    pub fn new(layers: Vec<Box<dyn Layer<E>>>) -> Result<Self, LayerError> {
        if layers.is_empty() {
            return Err(LayerError::InvalidConfig(
                "a network needs at least one layer".into(),
            ));
        }
        Ok(Self { layers })
    }

    /// Per-sample input shape, taken from the first layer.
    pub fn input_shape(&self) -> &[usize] {
        self.layers[0].input_shape()
    }

    /// Per-sample output shape, taken from the last layer.
    pub fn output_shape(&self) -> &[usize] {
        self.layers[self.layers.len() - 1].output_shape()
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Runs a batched input through every layer in order.
    pub fn predict(&self, input: &Tensor<E>) -> Result<Tensor<E>, LayerError> {
        let mut output = input.clone();
        for (index, layer) in self.layers.iter().enumerate() {
            output = layer.feed_forward(&output)?;
            tracing::debug!(
                layer = index,
                output_shape = %output.shape(),
                "layer forward pass complete"
            );
        }
        Ok(output)
    }
}
