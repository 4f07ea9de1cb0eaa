// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Average/max pooling over 1-D and 2-D samples (channels-last).
//!
//! Windows are taken with axis slices and reduced with the engine's
//! `mean`/`max`. `Padding::Valid` keeps only fully contained windows;
//! `Padding::SameKeras` produces `ceil(len / stride)` outputs per spatial
//! axis and clips windows at the edges, assigning the odd padding element
//! to the trailing side as keras does. `Padding::Same` (zero padding
//! without clipping) is not implemented.

use super::{check_batched_shape, Layer, Padding, PoolKind};
use crate::LayerError;
use std::marker::PhantomData;
use tensor_engine::{AxisRange, Element, Tensor};

/// Output extent for one spatial axis.
fn pooled_extent(len: usize, pool: usize, stride: usize, padding: Padding) -> usize {
    match padding {
        Padding::Valid => (len - pool + 1).div_ceil(stride),
        _ => len.div_ceil(stride),
    }
}

/// Clipped window bounds for one same_keras output position.
fn keras_window(
    k: usize,
    stride: usize,
    pool: usize,
    len: usize,
    out_len: usize,
) -> (usize, usize) {
    let padded_len = pool + (out_len - 1) * stride;
    let padding = padded_len.saturating_sub(len);
    // Odd padding puts the extra element after the input.
    let lead = if padding % 2 == 0 {
        padding / 2
    } else {
        (padding - 1) / 2
    };

    let start = (k * stride) as isize - lead as isize;
    let end = start + pool as isize;
    (start.max(0) as usize, (end as usize).min(len))
}

fn validate_spatial(
    pool: usize,
    stride: usize,
    len: usize,
    padding: Padding,
) -> Result<(), LayerError> {
    if pool < 1 {
        return Err(LayerError::InvalidConfig(
            "pool size must be at least 1".into(),
        ));
    }
    if stride < 1 {
        return Err(LayerError::InvalidConfig("stride must be at least 1".into()));
    }
    if padding == Padding::Valid && pool > len {
        return Err(LayerError::InvalidConfig(format!(
            "pool size {pool} exceeds input extent {len} for valid padding"
        )));
    }
    Ok(())
}

/// Pooling over `[length, channels]` samples.
#[derive(Debug, Clone)]
pub struct Pooling1d<E: Element> {
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
    kind: PoolKind,
    padding: Padding,
    pool_size: usize,
    stride: usize,
    _marker: PhantomData<E>,
}

impl<E: Element> Pooling1d<E> {
    /// Creates a 1-D pooling layer. `stride: None` defaults to the pool
    /// size (non-overlapping windows).
    pub fn new(
        sample_shape: &[usize],
        kind: PoolKind,
        pool_size: usize,
        stride: Option<usize>,
        padding: Padding,
    ) -> Result<Self, LayerError> {
        if sample_shape.len() != 2 {
            return Err(LayerError::InvalidConfig(format!(
                "1-D pooling samples must be [length, channels], got rank {}",
                sample_shape.len()
            )));
        }
        let stride = stride.unwrap_or(pool_size);
        validate_spatial(pool_size, stride, sample_shape[0], padding)?;

        let out0 = pooled_extent(sample_shape[0], pool_size, stride, padding);
        Ok(Self {
            input_shape: sample_shape.to_vec(),
            output_shape: vec![out0, sample_shape[1]],
            kind,
            padding,
            pool_size,
            stride,
            _marker: PhantomData,
        })
    }
}

impl<E: Element> Layer<E> for Pooling1d<E> {
    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    fn feed_forward(&self, input: &Tensor<E>) -> Result<Tensor<E>, LayerError> {
        check_batched_shape(input.shape().dims(), &self.input_shape)?;
        if self.padding == Padding::Same {
            return Err(LayerError::NotSupported(
                "padding 'same' is not implemented; use 'same_keras'".into(),
            ));
        }

        let batch = input.shape().dims()[0];
        let len = self.input_shape[0];
        let channels = self.input_shape[1];
        let out_len = self.output_shape[0];
        let output = Tensor::<E>::zeros(&[batch, out_len, channels]);

        for i in 0..batch {
            for j in 0..channels {
                for k in 0..out_len {
                    let (start, end) = match self.padding {
                        Padding::Valid => (k * self.stride, k * self.stride + self.pool_size),
                        _ => keras_window(k, self.stride, self.pool_size, len, out_len),
                    };
                    let window = input.slice_axes(&[
                        AxisRange::single(i),
                        (start..end).into(),
                        AxisRange::single(j),
                    ])?;
                    output.set(&[i, k, j], self.kind.pool(&window)?)?;
                }
            }
        }
        Ok(output)
    }
}

/// Pooling over `[height, width, channels]` samples.
#[derive(Debug, Clone)]
pub struct Pooling2d<E: Element> {
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
    kind: PoolKind,
    padding: Padding,
    pool_size: [usize; 2],
    stride: [usize; 2],
    _marker: PhantomData<E>,
}

impl<E: Element> Pooling2d<E> {
    /// Creates a 2-D pooling layer. `stride: None` defaults to the pool
    /// size per axis.
    pub fn new(
        sample_shape: &[usize],
        kind: PoolKind,
        pool_size: [usize; 2],
        stride: Option<[usize; 2]>,
        padding: Padding,
    ) -> Result<Self, LayerError> {
        if sample_shape.len() != 3 {
            return Err(LayerError::InvalidConfig(format!(
                "2-D pooling samples must be [height, width, channels], got rank {}",
                sample_shape.len()
            )));
        }
        let stride = stride.unwrap_or(pool_size);
        for axis in 0..2 {
            validate_spatial(pool_size[axis], stride[axis], sample_shape[axis], padding)?;
        }

        let out0 = pooled_extent(sample_shape[0], pool_size[0], stride[0], padding);
        let out1 = pooled_extent(sample_shape[1], pool_size[1], stride[1], padding);
        Ok(Self {
            input_shape: sample_shape.to_vec(),
            output_shape: vec![out0, out1, sample_shape[2]],
            kind,
            padding,
            pool_size,
            stride,
            _marker: PhantomData,
        })
    }
}

impl<E: Element> Layer<E> for Pooling2d<E> {
    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    fn feed_forward(&self, input: &Tensor<E>) -> Result<Tensor<E>, LayerError> {
        check_batched_shape(input.shape().dims(), &self.input_shape)?;
        if self.padding == Padding::Same {
            return Err(LayerError::NotSupported(
                "padding 'same' is not implemented; use 'same_keras'".into(),
            ));
        }

        let batch = input.shape().dims()[0];
        let (height, width) = (self.input_shape[0], self.input_shape[1]);
        let channels = self.input_shape[2];
        let (out_h, out_w) = (self.output_shape[0], self.output_shape[1]);
        let output = Tensor::<E>::zeros(&[batch, out_h, out_w, channels]);

        for i in 0..batch {
            for j in 0..channels {
                for k in 0..out_h {
                    let (h0, h1) = match self.padding {
                        Padding::Valid => {
                            (k * self.stride[0], k * self.stride[0] + self.pool_size[0])
                        }
                        _ => keras_window(k, self.stride[0], self.pool_size[0], height, out_h),
                    };
                    for l in 0..out_w {
                        let (w0, w1) = match self.padding {
                            Padding::Valid => {
                                (l * self.stride[1], l * self.stride[1] + self.pool_size[1])
                            }
                            _ => keras_window(l, self.stride[1], self.pool_size[1], width, out_w),
                        };
                        let window = input.slice_axes(&[
                            AxisRange::single(i),
                            (h0..h1).into(),
                            (w0..w1).into(),
                            AxisRange::single(j),
                        ])?;
                        output.set(&[i, k, l, j], self.kind.pool(&window)?)?;
                    }
                }
            }
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pooled_extent() {
        // valid: ceil((len - pool + 1) / stride)
        assert_eq!(pooled_extent(10, 3, 1, Padding::Valid), 8);
        assert_eq!(pooled_extent(10, 3, 3, Padding::Valid), 3);
        // same_keras: ceil(len / stride)
        assert_eq!(pooled_extent(10, 3, 1, Padding::SameKeras), 10);
        assert_eq!(pooled_extent(10, 3, 2, Padding::SameKeras), 5);
    }

    #[test]
    fn test_keras_window_clips_edges() {
        // len 10, pool 3, stride 1, out 10: total padding 2, one per side.
        assert_eq!(keras_window(0, 1, 3, 10, 10), (0, 2));
        assert_eq!(keras_window(1, 1, 3, 10, 10), (0, 3));
        assert_eq!(keras_window(9, 1, 3, 10, 10), (8, 10));

        // len 10, pool 3, stride 2, out 5: padding 1, all trailing.
        assert_eq!(keras_window(0, 2, 3, 10, 5), (0, 3));
        assert_eq!(keras_window(4, 2, 3, 10, 5), (8, 10));
    }

    #[test]
    fn test_invalid_configs() {
        assert!(Pooling1d::<f64>::new(&[10], PoolKind::Max, 2, None, Padding::Valid).is_err());
        assert!(
            Pooling1d::<f64>::new(&[10, 3], PoolKind::Max, 0, None, Padding::Valid).is_err()
        );
        assert!(
            Pooling1d::<f64>::new(&[10, 3], PoolKind::Max, 11, None, Padding::Valid).is_err()
        );
        assert!(
            Pooling1d::<f64>::new(&[10, 3], PoolKind::Max, 3, Some(0), Padding::Valid).is_err()
        );
        // Oversized pool is fine with same_keras.
        assert!(
            Pooling1d::<f64>::new(&[10, 3], PoolKind::Max, 11, None, Padding::SameKeras).is_ok()
        );
        assert!(
            Pooling2d::<f64>::new(&[7, 7], PoolKind::Average, [2, 2], None, Padding::Valid)
                .is_err()
        );
    }

    #[test]
    fn test_same_padding_not_supported() {
        let layer =
            Pooling1d::<f64>::new(&[4, 1], PoolKind::Average, 2, None, Padding::Same).unwrap();
        let x = Tensor::<f64>::zeros(&[1, 4, 1]);
        assert!(matches!(
            layer.feed_forward(&x).unwrap_err(),
            LayerError::NotSupported(_)
        ));
    }

    #[test]
    fn test_avg_pool_1d_small() {
        // One sample, one channel: [1, 2, 3, 4] with pool 2 / stride 2.
        let layer =
            Pooling1d::<f64>::new(&[4, 1], PoolKind::Average, 2, None, Padding::Valid).unwrap();
        assert_eq!(layer.output_shape(), &[2, 1]);
        let x = Tensor::from_values(vec![1.0, 2.0, 3.0, 4.0])
            .reshape(&[1, 4, 1])
            .unwrap();
        let y = layer.feed_forward(&x).unwrap();
        assert_eq!(y.to_vec(), vec![1.5, 3.5]);
    }

    #[test]
    fn test_max_pool_1d_multi_channel() {
        // [len 4, ch 2], pool 2, stride 2; channels pooled independently.
        let layer =
            Pooling1d::<f64>::new(&[4, 2], PoolKind::Max, 2, None, Padding::Valid).unwrap();
        let x = Tensor::from_values(vec![
            1.0, 8.0, //
            2.0, 7.0, //
            3.0, 6.0, //
            4.0, 5.0,
        ])
        .reshape(&[1, 4, 2])
        .unwrap();
        let y = layer.feed_forward(&x).unwrap();
        assert_eq!(y.shape().dims(), &[1, 2, 2]);
        assert_eq!(y.to_vec(), vec![2.0, 8.0, 4.0, 6.0]);
    }

    #[test]
    fn test_avg_pool_1d_same_keras_stride_one() {
        // Ramp input: interior windows average to the center value, edge
        // windows to the mean of the two clipped elements.
        let layer =
            Pooling1d::<f64>::new(&[5, 1], PoolKind::Average, 3, Some(1), Padding::SameKeras)
                .unwrap();
        assert_eq!(layer.output_shape(), &[5, 1]);
        let x = Tensor::from_values(vec![0.0, 1.0, 2.0, 3.0, 4.0])
            .reshape(&[1, 5, 1])
            .unwrap();
        let y = layer.feed_forward(&x).unwrap();
        assert_eq!(y.to_vec(), vec![0.5, 1.0, 2.0, 3.0, 3.5]);
    }

    #[test]
    fn test_avg_pool_2d_small() {
        // 4x4 single-channel image, 2x2 non-overlapping average pooling.
        let layer =
            Pooling2d::<f64>::new(&[4, 4, 1], PoolKind::Average, [2, 2], None, Padding::Valid)
                .unwrap();
        assert_eq!(layer.output_shape(), &[2, 2, 1]);
        let x = Tensor::from_values((0..16).map(|i| i as f64).collect())
            .reshape(&[1, 4, 4, 1])
            .unwrap();
        let y = layer.feed_forward(&x).unwrap();
        // Quadrant means of [[0..3],[4..7],[8..11],[12..15]].
        assert_eq!(y.to_vec(), vec![2.5, 4.5, 10.5, 12.5]);
    }

    #[test]
    fn test_max_pool_2d_overlapping() {
        let layer =
            Pooling2d::<f64>::new(&[3, 3, 1], PoolKind::Max, [2, 2], Some([1, 1]), Padding::Valid)
                .unwrap();
        assert_eq!(layer.output_shape(), &[2, 2, 1]);
        let x = Tensor::from_values((0..9).map(|i| i as f64).collect())
            .reshape(&[1, 3, 3, 1])
            .unwrap();
        let y = layer.feed_forward(&x).unwrap();
        assert_eq!(y.to_vec(), vec![4.0, 5.0, 7.0, 8.0]);
    }

    #[test]
    fn test_pool_2d_same_keras() {
        // 3x3 input, 2x2 pool, stride 2: out 2x2, windows clipped at the
        // bottom/right edges.
        let layer = Pooling2d::<f64>::new(
            &[3, 3, 1],
            PoolKind::Average,
            [2, 2],
            None,
            Padding::SameKeras,
        )
        .unwrap();
        assert_eq!(layer.output_shape(), &[2, 2, 1]);
        let x = Tensor::from_values((0..9).map(|i| i as f64).collect())
            .reshape(&[1, 3, 3, 1])
            .unwrap();
        let y = layer.feed_forward(&x).unwrap();
        // Windows: {0,1,3,4}, {2,5}, {6,7}, {8}.
        assert_eq!(y.to_vec(), vec![2.0, 3.5, 6.5, 8.0]);
    }
}
