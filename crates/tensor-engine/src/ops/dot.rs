// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Scalar multiply, strict matrix multiply, and the generalized dot product.
//!
//! [`Tensor::dot`] follows the numpy `dot` contract: scalars scale, 1-D
//! operands contract over their only axis, 2-D operands matrix-multiply,
//! and a higher-rank operand contracts its last (left) or second-to-last
//! (right) axis. The one excluded combination is both operands above rank
//! 2, which fails with [`TensorError::NotSupported`].

use crate::{Element, Shape, Tensor, TensorError};

/// Rank category used to dispatch [`Tensor::dot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankClass {
    Scalar,
    Vector,
    Matrix,
    Higher,
}

impl RankClass {
    /// Classifies a rank.
    pub fn of(rank: usize) -> Self {
        match rank {
            0 => RankClass::Scalar,
            1 => RankClass::Vector,
            2 => RankClass::Matrix,
            _ => RankClass::Higher,
        }
    }
}

impl<E: Element> Tensor<E> {
    /// Multiplies every element by `k`, into a new tensor.
    pub fn scalar_multiply(&self, k: E) -> Self {
        let buf = self.read_buf().iter().map(|&x| x.mul(k)).collect();
        Tensor::from_buffer(self.shape().clone(), buf)
    }

    /// Multiplies every element by `k` in place; returns an alias of the
    /// receiver.
    pub fn scalar_multiply_in_place(&self, k: E) -> Self {
        self.write_buf().iter_mut().for_each(|x| *x = x.mul(k));
        self.clone()
    }

    /// Strict rank-2 matrix product: `[m, k] x [k, n] -> [m, n]`.
    ///
    /// # Errors
    /// [`TensorError::ShapeMismatch`] unless both operands are rank 2 with
    /// a matching contraction dimension. Use [`dot`](Tensor::dot) for the
    /// rank-polymorphic form.
    pub fn matrix_multiply(&self, other: &Self) -> Result<Self, TensorError> {
        if self.rank() != 2 || other.rank() != 2 || self.shape().dims()[1] != other.shape().dims()[0]
        {
            return Err(TensorError::ShapeMismatch {
                op: "matrix_multiply",
                lhs: self.shape().clone(),
                rhs: other.shape().clone(),
            });
        }
        let (m, k) = (self.shape().dims()[0], self.shape().dims()[1]);
        let n = other.shape().dims()[1];

        let a = self.read_buf();
        let b = other.read_buf();
        let mut buf = vec![E::zero(); m * n];
        for i in 0..m {
            for j in 0..n {
                let mut acc = E::zero();
                for c in 0..k {
                    acc = acc.add(a[i * k + c].mul(b[c * n + j]));
                }
                buf[i * n + j] = acc;
            }
        }
        Ok(Tensor::from_buffer(Shape::matrix(m, n), buf))
    }

    /// Generalized dot product (numpy `dot` semantics).
    ///
    /// - either operand rank 0: scalar multiply;
    /// - 1-D x 1-D: inner product, rank-0 result;
    /// - `[..., k] x [k]` / `[..., k] x [k, n]`: contraction over the left
    ///   operand's last axis;
    /// - `[k]` or `[m, k]` against a right operand of rank > 2: contraction
    ///   over the right operand's second-to-last axis;
    /// - both operands rank > 2: [`TensorError::NotSupported`].
    ///
    /// # Errors
    /// [`TensorError::ShapeMismatch`] when the contraction dimensions
    /// disagree; [`TensorError::NotSupported`] for the excluded rank pair.
    ///
    /// # Examples
    /// ```
    /// use tensor_engine::Tensor;
    /// let a = Tensor::from_values(vec![1.0f64, 2.0, 3.0]);
    /// let b = Tensor::from_values(vec![4.0f64, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b)?.item()?, 32.0);
    /// # Ok::<(), tensor_engine::TensorError>(())
    /// ```
    pub fn dot(&self, other: &Self) -> Result<Self, TensorError> {
        match (RankClass::of(self.rank()), RankClass::of(other.rank())) {
            (RankClass::Scalar, _) => Ok(other.scalar_multiply(self.item()?)),
            (_, RankClass::Scalar) => Ok(self.scalar_multiply(other.item()?)),
            (RankClass::Higher, RankClass::Higher) => Err(TensorError::NotSupported {
                op: "dot",
                detail: format!(
                    "both operands above rank 2 ({} x {})",
                    self.shape(),
                    other.shape()
                ),
            }),
            (_, RankClass::Vector) | (_, RankClass::Matrix) => self.dot_right_low(other),
            (_, RankClass::Higher) => self.dot_right_high(other),
        }
    }

    /// Sugar for scaling by a plain value.
    pub fn dot_scalar(&self, k: E) -> Self {
        self.scalar_multiply(k)
    }

    /// Reshapes the left operand to 2-D for contraction over its last axis,
    /// returning the prepared matrix and the leading dims to restore.
    fn prepare_left(&self) -> Result<(Self, Vec<usize>), TensorError> {
        let dims = self.shape().dims();
        match self.rank() {
            1 => Ok((self.reshape(&[1, dims[0]])?, vec![])),
            2 => Ok((self.clone(), vec![dims[0]])),
            _ => {
                let leading = dims[..dims.len() - 1].to_vec();
                let rows: usize = leading.iter().product();
                Ok((self.reshape(&[rows, dims[dims.len() - 1]])?, leading))
            }
        }
    }

    /// Right operand of rank 1 or 2.
    fn dot_right_low(&self, other: &Self) -> Result<Self, TensorError> {
        let (left, leading) = self.prepare_left()?;
        let k = left.shape().dims()[1];

        let (right, trailing): (Tensor<E>, Vec<usize>) = if other.rank() == 1 {
            (other.reshape(&[other.num_elements(), 1])?, vec![])
        } else {
            (other.clone(), vec![other.shape().dims()[1]])
        };
        if right.shape().dims()[0] != k {
            return Err(TensorError::ShapeMismatch {
                op: "dot",
                lhs: self.shape().clone(),
                rhs: other.shape().clone(),
            });
        }

        let product = left.matrix_multiply(&right)?;
        let mut out_dims = leading;
        out_dims.extend_from_slice(&trailing);
        product.reshape(&out_dims)
    }

    /// Right operand of rank > 2: contract over its second-to-last axis.
    fn dot_right_high(&self, other: &Self) -> Result<Self, TensorError> {
        let (left, left_leading) = self.prepare_left()?;
        let (rows, k) = (left.shape().dims()[0], left.shape().dims()[1]);

        let rdims = other.shape().dims();
        let contraction = rdims[rdims.len() - 2];
        let trailing = rdims[rdims.len() - 1];
        if contraction != k {
            return Err(TensorError::ShapeMismatch {
                op: "dot",
                lhs: self.shape().clone(),
                rhs: other.shape().clone(),
            });
        }
        let right_leading = rdims[..rdims.len() - 2].to_vec();
        let blocks: usize = right_leading.iter().product();

        let a = left.read_buf();
        let b = other.read_buf();
        let mut buf = vec![E::zero(); rows * blocks * trailing];
        for i in 0..rows {
            for r in 0..blocks {
                for t in 0..trailing {
                    let mut acc = E::zero();
                    for c in 0..k {
                        acc = acc.add(a[i * k + c].mul(b[(r * k + c) * trailing + t]));
                    }
                    buf[(i * blocks + r) * trailing + t] = acc;
                }
            }
        }

        let mut out_dims = left_leading;
        out_dims.extend_from_slice(&right_leading);
        out_dims.push(trailing);
        Ok(Tensor::from_buffer(Shape::new(out_dims), buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_class() {
        assert_eq!(RankClass::of(0), RankClass::Scalar);
        assert_eq!(RankClass::of(1), RankClass::Vector);
        assert_eq!(RankClass::of(2), RankClass::Matrix);
        assert_eq!(RankClass::of(3), RankClass::Higher);
        assert_eq!(RankClass::of(7), RankClass::Higher);
    }

    #[test]
    fn test_scalar_multiply() {
        let t = Tensor::from_values(vec![1.0f64, 2.0, 3.0]);
        assert_eq!(t.scalar_multiply(2.0).to_vec(), vec![2.0, 4.0, 6.0]);
        assert_eq!(t.dot_scalar(0.5).to_vec(), vec![0.5, 1.0, 1.5]);
        // Source unchanged; in-place variant aliases.
        assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0]);
        let r = t.scalar_multiply_in_place(10.0);
        assert!(r.shares_buffer_with(&t));
        assert_eq!(t.to_vec(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_matrix_multiply() {
        let a = Tensor::from_values(vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0])
            .reshape(&[2, 3])
            .unwrap();
        let b = Tensor::from_values(vec![7.0f64, 8.0, 9.0, 10.0, 11.0, 12.0])
            .reshape(&[3, 2])
            .unwrap();
        let c = a.matrix_multiply(&b).unwrap();
        assert_eq!(c.shape().dims(), &[2, 2]);
        assert_eq!(c.to_vec(), vec![58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_matrix_multiply_rejects_non_matrices() {
        let v = Tensor::from_values(vec![1.0f64, 2.0]);
        let m = Tensor::<f64>::zeros(&[2, 2]);
        assert!(v.matrix_multiply(&m).is_err());
        assert!(m.matrix_multiply(&v).is_err());

        let bad = Tensor::<f64>::zeros(&[3, 2]);
        assert!(matches!(
            m.matrix_multiply(&bad).unwrap_err(),
            TensorError::ShapeMismatch {
                op: "matrix_multiply",
                ..
            }
        ));
    }

    #[test]
    fn test_dot_1d_1d_fixture() {
        let a = Tensor::from_values(vec![
            0.97128908, 0.20534807, 0.52669755, 0.83773758, 0.99046507, 0.53007248, 0.66714638,
            0.79524998, 0.54611307,
        ]);
        let b = Tensor::from_values(vec![
            0.3557552, 0.72256437, 0.1242165, 0.95843971, 0.0366442, 0.84412559, 0.72925096,
            0.99252063, 0.79177809,
        ]);
        let d = a.dot(&b).unwrap();
        assert_eq!(d.rank(), 0);
        assert!((d.item().unwrap() - 3.554225882).abs() < 1e-8);
    }

    #[test]
    fn test_dot_scalar_operand() {
        let s = Tensor::scalar(3.0f64);
        let v = Tensor::from_values(vec![1.0f64, 2.0]);
        assert_eq!(s.dot(&v).unwrap().to_vec(), vec![3.0, 6.0]);
        assert_eq!(v.dot(&s).unwrap().to_vec(), vec![3.0, 6.0]);
        assert_eq!(s.dot(&s).unwrap().item().unwrap(), 9.0);
    }

    #[test]
    fn test_dot_2d_1d() {
        let m = Tensor::from_values(vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0])
            .reshape(&[2, 3])
            .unwrap();
        let v = Tensor::from_values(vec![1.0f64, 0.0, -1.0]);
        let r = m.dot(&v).unwrap();
        assert_eq!(r.shape().dims(), &[2]);
        assert_eq!(r.to_vec(), vec![-2.0, -2.0]);
    }

    #[test]
    fn test_dot_1d_2d() {
        let v = Tensor::from_values(vec![1.0f64, 2.0]);
        let m = Tensor::from_values(vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0])
            .reshape(&[2, 3])
            .unwrap();
        let r = v.dot(&m).unwrap();
        assert_eq!(r.shape().dims(), &[3]);
        assert_eq!(r.to_vec(), vec![9.0, 12.0, 15.0]);
    }

    #[test]
    fn test_dot_2d_2d_matches_matrix_multiply() {
        let a = Tensor::<f64>::rand_uniform(-1.0, 1.0, &[3, 4]);
        let b = Tensor::<f64>::rand_uniform(-1.0, 1.0, &[4, 2]);
        assert_eq!(a.dot(&b).unwrap(), a.matrix_multiply(&b).unwrap());
    }

    #[test]
    fn test_dot_3d_left() {
        // [2, 2, 3] . [3] -> [2, 2]
        let a = Tensor::from_values((0..12).map(|i| i as f64).collect())
            .reshape(&[2, 2, 3])
            .unwrap();
        let v = Tensor::from_values(vec![1.0f64, 1.0, 1.0]);
        let r = a.dot(&v).unwrap();
        assert_eq!(r.shape().dims(), &[2, 2]);
        assert_eq!(r.to_vec(), vec![3.0, 12.0, 21.0, 30.0]);

        // [2, 2, 3] . [3, 2] -> [2, 2, 2]
        let m = Tensor::<f64>::ones(&[3, 2]);
        let r = a.dot(&m).unwrap();
        assert_eq!(r.shape().dims(), &[2, 2, 2]);
    }

    #[test]
    fn test_dot_right_high_rank() {
        // [2] . [2, 2, 3] -> [2, 3]; contraction over the right operand's
        // second-to-last axis.
        let v = Tensor::from_values(vec![1.0f64, 10.0]);
        let b = Tensor::from_values((0..12).map(|i| i as f64).collect())
            .reshape(&[2, 2, 3])
            .unwrap();
        let r = v.dot(&b).unwrap();
        assert_eq!(r.shape().dims(), &[2, 3]);
        // out[r, t] = b[r, 0, t] + 10 * b[r, 1, t]
        assert_eq!(r.to_vec(), vec![30.0, 41.0, 52.0, 96.0, 107.0, 118.0]);
    }

    #[test]
    fn test_dot_2d_left_high_right() {
        // [2, 2] . [2, 2, 3] -> [2, 2, 3]
        let a = Tensor::from_values(vec![1.0f64, 0.0, 0.0, 1.0])
            .reshape(&[2, 2])
            .unwrap();
        let b = Tensor::from_values((0..12).map(|i| i as f64).collect())
            .reshape(&[2, 2, 3])
            .unwrap();
        let r = a.dot(&b).unwrap();
        assert_eq!(r.shape().dims(), &[2, 2, 3]);
        // Identity left: out[i, r, t] = b[r, i, t].
        assert_eq!(r.get(&[0, 1, 2]).unwrap(), b.get(&[1, 0, 2]).unwrap());
        assert_eq!(r.get(&[1, 0, 1]).unwrap(), b.get(&[0, 1, 1]).unwrap());
    }

    #[test]
    fn test_dot_both_high_rank_not_supported() {
        let a = Tensor::<f64>::zeros(&[2, 2, 2]);
        let b = Tensor::<f64>::zeros(&[2, 2, 2]);
        assert!(matches!(
            a.dot(&b).unwrap_err(),
            TensorError::NotSupported { op: "dot", .. }
        ));
    }

    #[test]
    fn test_dot_contraction_mismatch() {
        let a = Tensor::<f64>::zeros(&[2, 3]);
        let b = Tensor::<f64>::zeros(&[4]);
        assert!(matches!(
            a.dot(&b).unwrap_err(),
            TensorError::ShapeMismatch { op: "dot", .. }
        ));

        let c = Tensor::<f64>::zeros(&[2, 4, 5]);
        assert!(matches!(
            a.dot(&c).unwrap_err(),
            TensorError::ShapeMismatch { op: "dot", .. }
        ));
    }
}
