// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Flattens each sample to a vector, keeping the batch axis.

use super::{check_batched_shape, Layer};
use crate::LayerError;
use std::marker::PhantomData;
use tensor_engine::{Element, Tensor};

/// Reshapes `[batch, d1, ..., dn]` to `[batch, d1 * ... * dn]`.
///
/// Scalar samples become `[batch, 1]`; 1-D samples pass through untouched.
/// The output shares the input's buffer (it is a reshape, not a copy).
#[derive(Debug, Clone)]
pub struct Flatten<E: Element> {
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
    _marker: PhantomData<E>,
}

impl<E: Element> Flatten<E> {
    pub fn new(sample_shape: &[usize]) -> Self {
        let output_shape = match sample_shape.len() {
            0 => vec![1],
            1 => sample_shape.to_vec(),
            _ => vec![sample_shape.iter().product()],
        };
        Self {
            input_shape: sample_shape.to_vec(),
            output_shape,
            _marker: PhantomData,
        }
    }
}

impl<E: Element> Layer<E> for Flatten<E> {
    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    fn feed_forward(&self, input: &Tensor<E>) -> Result<Tensor<E>, LayerError> {
        check_batched_shape(input.shape().dims(), &self.input_shape)?;
        let batch = input.shape().dims()[0];
        match self.input_shape.len() {
            1 => Ok(input.clone()),
            _ => Ok(input.reshape(&[batch, self.output_shape[0]])?),
        }
    }
}
