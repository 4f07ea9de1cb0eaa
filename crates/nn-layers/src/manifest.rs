// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON network manifest parsing and network construction.
//!
//! The manifest describes a feed-forward network layer by layer, with
//! weight and bias values inlined. Dimensions arrive as signed integers
//! (the interchange format has no unsigned type) and are rejected if
//! negative.
//!
//! # Format
//! ```json
//! {
//!   "name": "tiny-classifier",
//!   "dtype": "f64",
//!   "layers": [
//!     { "name": "in", "layer_type": "input", "input_shape": [10] },
//!     {
//!       "name": "hidden", "layer_type": "dense", "units": 12,
//!       "activation": "tanh", "weights": [0.1, ...], "bias": [0.0, ...]
//!     },
//!     { "name": "out", "layer_type": "dense", "units": 5, "activation": "softmax" }
//!   ]
//! }
//! ```

use crate::layers::{Dense, Flatten, Initializer, InputLayer, Padding, PoolKind, Pooling1d, Pooling2d};
use crate::{Activation, Layer, LayerError, Network};
use std::path::Path;
use tensor_engine::{Element, Tensor, TensorError};

/// Layer types a manifest can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Input,
    Dense,
    Flatten,
    Pooling1d,
    Pooling2d,
}

impl LayerKind {
    /// Parses a layer type from a manifest string.
    ///
    /// Accepts snake_case names and common keras-flavoured aliases.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "input" | "input_layer" => Some(Self::Input),
            "dense" | "fully_connected" | "fc" => Some(Self::Dense),
            "flatten" => Some(Self::Flatten),
            "pooling1d" | "pool1d" | "average_pooling1d" | "max_pooling1d" => Some(Self::Pooling1d),
            "pooling2d" | "pool2d" | "average_pooling2d" | "max_pooling2d" => Some(Self::Pooling2d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Dense => "dense",
            Self::Flatten => "flatten",
            Self::Pooling1d => "pooling1d",
            Self::Pooling2d => "pooling2d",
        }
    }
}

/// Top-level network manifest, deserialized from JSON.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NetworkManifest {
    /// Human-readable network name.
    pub name: String,
    /// Element type for weights and computation (`"f32"` or `"f64"`).
    #[serde(default = "default_dtype")]
    pub dtype: String,
    /// Layer definitions, in execution order.
    pub layers: Vec<ManifestLayer>,
}

fn default_dtype() -> String {
    "f32".to_string()
}

/// A single layer entry in the manifest.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ManifestLayer {
    /// Unique layer name.
    pub name: String,
    /// Layer type string (see [`LayerKind::from_str_loose`]).
    pub layer_type: String,
    /// Per-sample input shape. Required on the first layer; later layers
    /// default to the previous layer's output shape.
    #[serde(default)]
    pub input_shape: Vec<i64>,
    /// Dense: number of output units.
    #[serde(default)]
    pub units: Option<i64>,
    /// Dense: activation name (defaults to linear).
    #[serde(default)]
    pub activation: Option<String>,
    /// Dense: set to `false` to drop the bias term.
    #[serde(default)]
    pub use_bias: Option<bool>,
    /// Dense: row-major weight values, length `in_features * units`.
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    /// Dense: bias values, length `units`.
    #[serde(default)]
    pub bias: Option<Vec<f64>>,
    /// Pooling: `"average"` or `"max"` (defaults to average).
    #[serde(default)]
    pub pool: Option<String>,
    /// Pooling: window extent per spatial axis (1 or 2 entries).
    #[serde(default)]
    pub pool_size: Option<Vec<i64>>,
    /// Pooling: stride per spatial axis (defaults to the pool size).
    #[serde(default)]
    pub stride: Option<Vec<i64>>,
    /// Pooling: padding name (defaults to valid).
    #[serde(default)]
    pub padding: Option<String>,
}

/// Converts manifest dimensions to `usize`, rejecting negatives.
fn to_dims(raw: &[i64]) -> Result<Vec<usize>, LayerError> {
    raw.iter()
        .map(|&d| {
            usize::try_from(d).map_err(|_| {
                LayerError::Tensor(TensorError::InvalidShape(format!(
                    "negative dimension {d}"
                )))
            })
        })
        .collect()
}

fn positive(value: i64, what: &str) -> Result<usize, LayerError> {
    if value < 1 {
        return Err(LayerError::InvalidConfig(format!(
            "{what} must be positive, got {value}"
        )));
    }
    Ok(value as usize)
}

impl NetworkManifest {
    /// Loads a manifest from a JSON file path.
    pub fn from_file(path: &Path) -> Result<Self, LayerError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Parses a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LayerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates that the manifest is internally consistent.
    ///
    /// Checks:
    /// - At least one layer, and the first layer declares an input shape.
    /// - All layer type, activation, pool, and padding strings are recognised.
    /// - The dtype string is supported.
    /// - No duplicate layer names.
    /// - Dense layers declare units; pooling layers declare a pool size of
    ///   the right arity.
    pub fn validate(&self) -> Result<(), LayerError> {
        if self.layers.is_empty() {
            return Err(LayerError::InvalidConfig(
                "manifest contains no layers".into(),
            ));
        }
        if !matches!(self.dtype.to_lowercase().as_str(), "f32" | "f64") {
            return Err(LayerError::InvalidConfig(format!(
                "unsupported dtype '{}'",
                self.dtype
            )));
        }
        if self.layers[0].input_shape.is_empty() {
            return Err(LayerError::InvalidConfig(format!(
                "first layer '{}' must declare an input_shape",
                self.layers[0].name
            )));
        }

        let mut seen_names = std::collections::HashSet::new();
        for layer in &self.layers {
            if !seen_names.insert(&layer.name) {
                return Err(LayerError::InvalidConfig(format!(
                    "duplicate layer name '{}'",
                    layer.name
                )));
            }

            let kind = LayerKind::from_str_loose(&layer.layer_type).ok_or_else(|| {
                LayerError::InvalidConfig(format!(
                    "layer '{}': unrecognised layer type '{}'",
                    layer.name, layer.layer_type
                ))
            })?;

            if let Some(act) = &layer.activation {
                if Activation::from_str_loose(act).is_none() {
                    return Err(LayerError::InvalidConfig(format!(
                        "layer '{}': unrecognised activation '{act}'",
                        layer.name
                    )));
                }
            }
            if let Some(pool) = &layer.pool {
                if PoolKind::from_str_loose(pool).is_none() {
                    return Err(LayerError::InvalidConfig(format!(
                        "layer '{}': unrecognised pool kind '{pool}'",
                        layer.name
                    )));
                }
            }
            if let Some(padding) = &layer.padding {
                if Padding::from_str_loose(padding).is_none() {
                    return Err(LayerError::InvalidConfig(format!(
                        "layer '{}': unrecognised padding '{padding}'",
                        layer.name
                    )));
                }
            }

            match kind {
                LayerKind::Dense if layer.units.is_none() => {
                    return Err(LayerError::InvalidConfig(format!(
                        "dense layer '{}' must declare units",
                        layer.name
                    )));
                }
                LayerKind::Pooling1d | LayerKind::Pooling2d => {
                    let arity = if kind == LayerKind::Pooling1d { 1 } else { 2 };
                    match &layer.pool_size {
                        Some(p) if p.len() == arity => {}
                        Some(p) => {
                            return Err(LayerError::InvalidConfig(format!(
                                "layer '{}': pool_size needs {arity} entries, got {}",
                                layer.name,
                                p.len()
                            )));
                        }
                        None => {
                            return Err(LayerError::InvalidConfig(format!(
                                "pooling layer '{}' must declare pool_size",
                                layer.name
                            )));
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Builds a runnable [`Network`] from this manifest.
    ///
    /// Layer input shapes chain: a layer without an explicit `input_shape`
    /// takes the previous layer's output shape. Dense weights/bias values,
    /// when present, are loaded verbatim; otherwise the layer keeps its
    /// random initialization.
    pub fn build<E: Element>(&self) -> Result<Network<E>, LayerError> {
        self.validate()?;

        let mut current_shape = to_dims(&self.layers[0].input_shape)?;
        let mut layers: Vec<Box<dyn Layer<E>>> = Vec::with_capacity(self.layers.len());

        for entry in &self.layers {
            let sample_shape = if entry.input_shape.is_empty() {
                current_shape.clone()
            } else {
                to_dims(&entry.input_shape)?
            };

            // validate() already vetted the type string.
            let kind = LayerKind::from_str_loose(&entry.layer_type).ok_or_else(|| {
                LayerError::InvalidConfig(format!(
                    "unrecognised layer type '{}'",
                    entry.layer_type
                ))
            })?;

            let layer: Box<dyn Layer<E>> = match kind {
                LayerKind::Input => Box::new(InputLayer::new(&sample_shape)),
                LayerKind::Flatten => Box::new(Flatten::new(&sample_shape)),
                LayerKind::Dense => Box::new(build_dense(entry, &sample_shape)?),
                LayerKind::Pooling1d => {
                    let (pool, stride, padding) = pooling_params::<1>(entry)?;
                    Box::new(Pooling1d::new(
                        &sample_shape,
                        pool_kind(entry)?,
                        pool[0],
                        stride.map(|s| s[0]),
                        padding,
                    )?)
                }
                LayerKind::Pooling2d => {
                    let (pool, stride, padding) = pooling_params::<2>(entry)?;
                    Box::new(Pooling2d::new(
                        &sample_shape,
                        pool_kind(entry)?,
                        pool,
                        stride,
                        padding,
                    )?)
                }
            };

            current_shape = layer.output_shape().to_vec();
            layers.push(layer);
        }

        tracing::info!(
            name = %self.name,
            layers = layers.len(),
            "built network from manifest"
        );
        Network::new(layers)
    }
}

fn build_dense<E: Element>(
    entry: &ManifestLayer,
    sample_shape: &[usize],
) -> Result<Dense<E>, LayerError> {
    let units = positive(
        entry.units.ok_or_else(|| {
            LayerError::InvalidConfig(format!("dense layer '{}' must declare units", entry.name))
        })?,
        "units",
    )?;
    let activation = match &entry.activation {
        Some(s) => Activation::from_str_loose(s).ok_or_else(|| {
            LayerError::InvalidConfig(format!("unrecognised activation '{s}'"))
        })?,
        None => Activation::Linear,
    };
    let use_bias = entry.use_bias.unwrap_or(true);

    // Inline values load over zero initialization; absent values keep the
    // default random initialization.
    let has_values = entry.weights.is_some();
    let init = if has_values {
        Initializer::Zeros
    } else {
        Initializer::default()
    };
    let mut dense = Dense::with_initializers(
        sample_shape,
        units,
        activation,
        init,
        use_bias.then_some(init),
    )?;

    if let Some(values) = &entry.weights {
        let flat: Vec<E> = values.iter().map(|&v| E::from_f64(v)).collect();
        let weights = Tensor::from_values(flat).reshape(&[sample_shape[0], units])?;
        dense.set_weights(weights)?;
    }
    if let Some(values) = &entry.bias {
        if !use_bias {
            return Err(LayerError::InvalidConfig(format!(
                "dense layer '{}' sets use_bias=false but provides bias values",
                entry.name
            )));
        }
        let flat: Vec<E> = values.iter().map(|&v| E::from_f64(v)).collect();
        dense.set_bias(Tensor::from_values(flat))?;
    }
    Ok(dense)
}

fn pool_kind(entry: &ManifestLayer) -> Result<PoolKind, LayerError> {
    match &entry.pool {
        Some(s) => PoolKind::from_str_loose(s).ok_or_else(|| {
            LayerError::InvalidConfig(format!("unrecognised pool kind '{s}'"))
        }),
        // Keras-derived type aliases carry the kind themselves
        // ("max_pooling2d" etc.); an explicit `pool` field takes precedence.
        None if entry.layer_type.to_lowercase().starts_with("max") => Ok(PoolKind::Max),
        None => Ok(PoolKind::Average),
    }
}

fn pooling_params<const N: usize>(
    entry: &ManifestLayer,
) -> Result<([usize; N], Option<[usize; N]>, Padding), LayerError> {
    let to_array = |raw: &[i64], what: &str| -> Result<[usize; N], LayerError> {
        if raw.len() != N {
            return Err(LayerError::InvalidConfig(format!(
                "layer '{}': {what} needs {N} entries, got {}",
                entry.name,
                raw.len()
            )));
        }
        let mut out = [0usize; N];
        for (slot, &v) in out.iter_mut().zip(raw.iter()) {
            *slot = positive(v, what)?;
        }
        Ok(out)
    };

    let pool = to_array(
        entry.pool_size.as_deref().ok_or_else(|| {
            LayerError::InvalidConfig(format!(
                "pooling layer '{}' must declare pool_size",
                entry.name
            ))
        })?,
        "pool_size",
    )?;
    let stride = entry
        .stride
        .as_deref()
        .map(|s| to_array(s, "stride"))
        .transpose()?;
    let padding = match &entry.padding {
        Some(s) => Padding::from_str_loose(s).ok_or_else(|| {
            LayerError::InvalidConfig(format!("unrecognised padding '{s}'"))
        })?,
        None => Padding::Valid,
    };
    Ok((pool, stride, padding))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_manifest_json() -> &'static str {
        r#"{
            "name": "tiny-net",
            "dtype": "f64",
            "layers": [
                { "name": "in", "layer_type": "input", "input_shape": [2] },
                {
                    "name": "hidden",
                    "layer_type": "dense",
                    "units": 2,
                    "activation": "relu",
                    "weights": [1.0, -1.0, 0.5, 0.5],
                    "bias": [0.0, 1.0]
                },
                { "name": "out", "layer_type": "dense", "units": 1,
                  "weights": [1.0, 1.0], "bias": [0.0] }
            ]
        }"#
    }

    #[test]
    fn test_parse_and_validate() {
        let manifest = NetworkManifest::from_json(sample_manifest_json()).unwrap();
        assert_eq!(manifest.name, "tiny-net");
        assert_eq!(manifest.dtype, "f64");
        assert_eq!(manifest.layers.len(), 3);
        manifest.validate().unwrap();
    }

    #[test]
    fn test_dtype_defaults_to_f32() {
        let manifest = NetworkManifest::from_json(
            r#"{ "name": "n", "layers": [
                { "name": "in", "layer_type": "input", "input_shape": [4] }
            ] }"#,
        )
        .unwrap();
        assert_eq!(manifest.dtype, "f32");
        manifest.validate().unwrap();
    }

    #[test]
    fn test_build_and_predict() {
        let manifest = NetworkManifest::from_json(sample_manifest_json()).unwrap();
        let net = manifest.build::<f64>().unwrap();
        assert_eq!(net.input_shape(), &[2]);
        assert_eq!(net.output_shape(), &[1]);

        // x = [1, 2]: hidden pre-act = [1*1+2*0.5, 1*-1+2*0.5] + [0, 1]
        //           = [2, 1]; relu keeps both; out = 2 + 1 = 3.
        let x = Tensor::from_values(vec![1.0, 2.0]).reshape(&[1, 2]).unwrap();
        let y = net.predict(&x).unwrap();
        assert_eq!(y.shape().dims(), &[1, 1]);
        assert!((y.item().unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_layer_type() {
        let manifest = NetworkManifest::from_json(
            r#"{ "name": "n", "layers": [
                { "name": "in", "layer_type": "conv2d", "input_shape": [4] }
            ] }"#,
        )
        .unwrap();
        assert!(matches!(
            manifest.validate().unwrap_err(),
            LayerError::InvalidConfig(_)
        ));
    }

    #[test]
    fn test_negative_dimension_rejected() {
        let manifest = NetworkManifest::from_json(
            r#"{ "name": "n", "dtype": "f64", "layers": [
                { "name": "in", "layer_type": "input", "input_shape": [-3] }
            ] }"#,
        )
        .unwrap();
        assert!(matches!(
            manifest.build::<f64>().unwrap_err(),
            LayerError::Tensor(TensorError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let manifest = NetworkManifest::from_json(
            r#"{ "name": "n", "layers": [
                { "name": "a", "layer_type": "input", "input_shape": [4] },
                { "name": "a", "layer_type": "flatten" }
            ] }"#,
        )
        .unwrap();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_weight_length_mismatch() {
        let manifest = NetworkManifest::from_json(
            r#"{ "name": "n", "dtype": "f64", "layers": [
                { "name": "in", "layer_type": "input", "input_shape": [2] },
                { "name": "d", "layer_type": "dense", "units": 2,
                  "weights": [1.0, 2.0, 3.0] }
            ] }"#,
        )
        .unwrap();
        assert!(matches!(
            manifest.build::<f64>().unwrap_err(),
            LayerError::Tensor(TensorError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_pooling_manifest_build() {
        let manifest = NetworkManifest::from_json(
            r#"{ "name": "n", "dtype": "f64", "layers": [
                { "name": "in", "layer_type": "input", "input_shape": [4, 1] },
                { "name": "pool", "layer_type": "pooling1d", "pool": "max",
                  "pool_size": [2], "padding": "valid" },
                { "name": "flat", "layer_type": "flatten" }
            ] }"#,
        )
        .unwrap();
        let net = manifest.build::<f64>().unwrap();
        assert_eq!(net.output_shape(), &[2]);

        let x = Tensor::from_values(vec![1.0, 4.0, 2.0, 3.0])
            .reshape(&[1, 4, 1])
            .unwrap();
        let y = net.predict(&x).unwrap();
        assert_eq!(y.to_vec(), vec![4.0, 3.0]);
    }

    #[test]
    fn test_kind_bearing_type_alias_selects_max() {
        // "max_pooling1d" without an explicit pool field must build a max
        // pooling layer, not the average default.
        let manifest = NetworkManifest::from_json(
            r#"{ "name": "n", "dtype": "f64", "layers": [
                { "name": "in", "layer_type": "input", "input_shape": [2, 1] },
                { "name": "pool", "layer_type": "max_pooling1d", "pool_size": [2] },
                { "name": "flat", "layer_type": "flatten" }
            ] }"#,
        )
        .unwrap();
        let net = manifest.build::<f64>().unwrap();
        let x = Tensor::from_values(vec![1.0, 2.0]).reshape(&[1, 2, 1]).unwrap();
        assert_eq!(net.predict(&x).unwrap().to_vec(), vec![2.0]);

        // An explicit pool field still overrides the alias.
        let manifest = NetworkManifest::from_json(
            r#"{ "name": "n", "dtype": "f64", "layers": [
                { "name": "in", "layer_type": "input", "input_shape": [2, 1] },
                { "name": "pool", "layer_type": "max_pooling1d", "pool": "average",
                  "pool_size": [2] },
                { "name": "flat", "layer_type": "flatten" }
            ] }"#,
        )
        .unwrap();
        let net = manifest.build::<f64>().unwrap();
        let x = Tensor::from_values(vec![1.0, 2.0]).reshape(&[1, 2, 1]).unwrap();
        assert_eq!(net.predict(&x).unwrap().to_vec(), vec![1.5]);
    }

    #[test]
    fn test_missing_pool_size_rejected() {
        let manifest = NetworkManifest::from_json(
            r#"{ "name": "n", "layers": [
                { "name": "in", "layer_type": "input", "input_shape": [4, 1] },
                { "name": "pool", "layer_type": "pooling1d" }
            ] }"#,
        )
        .unwrap();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_layer_kind_aliases() {
        assert_eq!(
            LayerKind::from_str_loose("average_pooling2d"),
            Some(LayerKind::Pooling2d)
        );
        assert_eq!(LayerKind::from_str_loose("fc"), Some(LayerKind::Dense));
        assert_eq!(LayerKind::from_str_loose("conv1d"), None);
    }
}
