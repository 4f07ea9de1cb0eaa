// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Identity entry layer that pins the network's expected input shape.

use super::{check_batched_shape, Layer};
use crate::LayerError;
use std::marker::PhantomData;
use tensor_engine::{Element, Tensor};

/// Passes its input through unchanged after validating the batched shape.
#[derive(Debug, Clone)]
pub struct InputLayer<E: Element> {
    shape: Vec<usize>,
    _marker: PhantomData<E>,
}

impl<E: Element> InputLayer<E> {
    pub fn new(sample_shape: &[usize]) -> Self {
        Self {
            shape: sample_shape.to_vec(),
            _marker: PhantomData,
        }
    }
}

impl<E: Element> Layer<E> for InputLayer<E> {
    fn input_shape(&self) -> &[usize] {
        &self.shape
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn feed_forward(&self, input: &Tensor<E>) -> Result<Tensor<E>, LayerError> {
        // Feature vectors cannot be zero-dimensional: a batch of scalars
        // still arrives as rank 2.
        if input.rank() < 2 {
            return Err(LayerError::ShapeCheck(format!(
                "input must be at least rank 2 (batch plus features), got {}",
                input.shape()
            )));
        }
        check_batched_shape(input.shape().dims(), &self.shape)?;
        Ok(input.clone())
    }
}
