// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Elementwise arithmetic and unary maps.
//!
//! Binary operations require identical shapes; there is no broadcasting.
//! Every operation has an `_in_place` variant that mutates the receiver's
//! shared buffer and returns an alias of it, so calls can be chained while
//! the mutation stays visible through other aliases.

use crate::{Element, Tensor, TensorError};

impl<E: Element> Tensor<E> {
    fn check_same_shape(&self, other: &Self, op: &'static str) -> Result<(), TensorError> {
        if self.shape() != other.shape() {
            return Err(TensorError::ShapeMismatch {
                op,
                lhs: self.shape().clone(),
                rhs: other.shape().clone(),
            });
        }
        Ok(())
    }

    fn zip_new(
        &self,
        other: &Self,
        op: &'static str,
        f: impl Fn(E, E) -> E,
    ) -> Result<Self, TensorError> {
        self.check_same_shape(other, op)?;
        let a = self.read_buf();
        let b = other.read_buf();
        let buf = a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect();
        Ok(Tensor::from_buffer(self.shape().clone(), buf))
    }

    fn zip_in_place(
        &self,
        other: &Self,
        op: &'static str,
        f: impl Fn(E, E) -> E,
    ) -> Result<Self, TensorError> {
        self.check_same_shape(other, op)?;
        // Snapshot the operand first: if `other` aliases `self`, taking a
        // read lock while holding the write lock would deadlock.
        let rhs = other.to_vec();
        let mut a = self.write_buf();
        for (x, &y) in a.iter_mut().zip(rhs.iter()) {
            *x = f(*x, y);
        }
        drop(a);
        Ok(self.clone())
    }

    fn map_new(&self, f: impl Fn(E) -> E) -> Self {
        let a = self.read_buf();
        let buf = a.iter().map(|&x| f(x)).collect();
        Tensor::from_buffer(self.shape().clone(), buf)
    }

    fn map_in_place(&self, f: impl Fn(E) -> E) -> Self {
        self.write_buf().iter_mut().for_each(|x| *x = f(*x));
        self.clone()
    }

    // ── Binary ─────────────────────────────────────────────────────

    /// Elementwise sum into a new tensor.
    ///
    /// # Errors
    /// [`TensorError::ShapeMismatch`] unless the shapes are identical.
    pub fn add(&self, other: &Self) -> Result<Self, TensorError> {
        self.zip_new(other, "add", E::add)
    }

    /// Elementwise sum into the receiver's buffer; returns an alias of it.
    pub fn add_in_place(&self, other: &Self) -> Result<Self, TensorError> {
        self.zip_in_place(other, "add", E::add)
    }

    /// Elementwise difference into a new tensor.
    pub fn subtract(&self, other: &Self) -> Result<Self, TensorError> {
        self.zip_new(other, "subtract", E::sub)
    }

    /// Elementwise difference into the receiver's buffer.
    pub fn subtract_in_place(&self, other: &Self) -> Result<Self, TensorError> {
        self.zip_in_place(other, "subtract", E::sub)
    }

    /// Elementwise (Hadamard) product into a new tensor.
    pub fn multiply(&self, other: &Self) -> Result<Self, TensorError> {
        self.zip_new(other, "multiply", E::mul)
    }

    /// Elementwise product into the receiver's buffer.
    pub fn multiply_in_place(&self, other: &Self) -> Result<Self, TensorError> {
        self.zip_in_place(other, "multiply", E::mul)
    }

    /// Elementwise quotient into a new tensor. Division by zero follows the
    /// element type's IEEE semantics.
    pub fn divide(&self, other: &Self) -> Result<Self, TensorError> {
        self.zip_new(other, "divide", E::div)
    }

    /// Elementwise quotient into the receiver's buffer.
    pub fn divide_in_place(&self, other: &Self) -> Result<Self, TensorError> {
        self.zip_in_place(other, "divide", E::div)
    }

    // ── Unary ──────────────────────────────────────────────────────

    /// `e^x` per element, into a new tensor.
    pub fn exp(&self) -> Self {
        self.map_new(E::exp)
    }

    /// `e^x` per element, in place.
    pub fn exp_in_place(&self) -> Self {
        self.map_in_place(E::exp)
    }

    /// `e^(-x)` per element, into a new tensor.
    pub fn neg_exp(&self) -> Self {
        self.map_new(|x| x.neg().exp())
    }

    /// `e^(-x)` per element, in place.
    pub fn neg_exp_in_place(&self) -> Self {
        self.map_in_place(|x| x.neg().exp())
    }

    /// `-x` per element, into a new tensor.
    pub fn negate(&self) -> Self {
        self.map_new(E::neg)
    }

    /// `-x` per element, in place.
    pub fn negate_in_place(&self) -> Self {
        self.map_in_place(E::neg)
    }

    /// `1/x` per element, into a new tensor.
    pub fn reciprocal(&self) -> Self {
        self.map_new(E::recip)
    }

    /// `1/x` per element, in place.
    pub fn reciprocal_in_place(&self) -> Self {
        self.map_in_place(E::recip)
    }

    /// `|x|` per element, into a new tensor.
    pub fn abs(&self) -> Self {
        self.map_new(E::abs)
    }

    /// `|x|` per element, in place.
    pub fn abs_in_place(&self) -> Self {
        self.map_in_place(E::abs)
    }
}
