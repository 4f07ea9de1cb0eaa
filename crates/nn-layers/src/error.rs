// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for layer construction and inference.

use tensor_engine::TensorError;

/// Errors raised while building or running network layers.
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    /// An input tensor's shape does not match what the layer expects.
    #[error("shape check failed: {0}")]
    ShapeCheck(String),

    /// A layer or manifest was configured inconsistently.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The requested mode is recognized but not implemented.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// A tensor operation inside the layer failed.
    #[error("tensor operation failed: {0}")]
    Tensor(#[from] TensorError),

    /// Manifest JSON could not be parsed.
    #[error("manifest parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Manifest file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
