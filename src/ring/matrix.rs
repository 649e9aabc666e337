//! Fixed-dimension vectors and matrices of ring elements
//!
//! Dimensions are fixed when a container is built. Every element of a
//! container lives in the same ring, which is checked at construction so
//! that arithmetic never has to deal with mixed parameter sets.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::params::RingParams;
use crate::ring::RingElement;

/// A vector of ring elements sharing one ring
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(try_from = "RawPolyVec")]
pub struct PolyVec {
    elements: Vec<RingElement>,
}

#[derive(Deserialize)]
struct RawPolyVec {
    elements: Vec<RingElement>,
}

impl TryFrom<RawPolyVec> for PolyVec {
    type Error = CryptoError;

    fn try_from(raw: RawPolyVec) -> CryptoResult<Self> {
        Self::new(raw.elements)
    }
}

impl PolyVec {
    pub fn new(elements: Vec<RingElement>) -> CryptoResult<Self> {
        let first = elements.first().ok_or_else(|| {
            CryptoError::ring_error(
                "polyvec_new",
                "a vector needs at least one element",
                error_codes::VECTOR_DIMENSION_MISMATCH,
            )
        })?;
        for element in &elements[1..] {
            first.check_compatible(element, "polyvec_new")?;
        }
        Ok(Self { elements })
    }

    pub fn zero(params: RingParams, len: usize) -> CryptoResult<Self> {
        Self::new(vec![RingElement::zero(params); len])
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn params(&self) -> RingParams {
        self.elements[0].params()
    }

    pub fn get(&self, i: usize) -> &RingElement {
        &self.elements[i]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RingElement> {
        self.elements.iter()
    }

    pub fn elements(&self) -> &[RingElement] {
        &self.elements
    }

    /// Fail fast unless the vector has exactly `len` elements in ring `params`
    pub fn expect_shape(&self, params: RingParams, len: usize, operation: &str) -> CryptoResult<()> {
        if self.len() != len {
            return Err(CryptoError::parameter_mismatch(
                operation,
                &format!("vector of length {}", len),
                &format!("vector of length {}", self.len()),
                error_codes::VECTOR_DIMENSION_MISMATCH,
            ));
        }
        if self.params() != params {
            return Err(CryptoError::parameter_mismatch(
                operation,
                &params.to_string(),
                &self.params().to_string(),
                error_codes::RING_MODULUS_MISMATCH,
            ));
        }
        Ok(())
    }

    /// Validate every element after deserialization
    pub fn validate(&self) -> CryptoResult<()> {
        if self.elements.is_empty() {
            return Err(CryptoError::ring_error(
                "polyvec_validate",
                "empty vector",
                error_codes::VECTOR_DIMENSION_MISMATCH,
            ));
        }
        for element in &self.elements {
            element.validate()?;
            self.elements[0].check_compatible(element, "polyvec_validate")?;
        }
        Ok(())
    }

    fn check_same_len(&self, other: &Self, operation: &str) -> CryptoResult<()> {
        if self.len() != other.len() {
            return Err(CryptoError::parameter_mismatch(
                operation,
                &format!("vector of length {}", self.len()),
                &format!("vector of length {}", other.len()),
                error_codes::VECTOR_DIMENSION_MISMATCH,
            ));
        }
        Ok(())
    }

    pub fn add(&self, other: &Self) -> CryptoResult<Self> {
        self.check_same_len(other, "polyvec_add")?;
        let elements = self
            .elements
            .iter()
            .zip(&other.elements)
            .map(|(a, b)| a.add(b))
            .collect::<CryptoResult<Vec<_>>>()?;
        Ok(Self { elements })
    }

    pub fn sub(&self, other: &Self) -> CryptoResult<Self> {
        self.check_same_len(other, "polyvec_sub")?;
        let elements = self
            .elements
            .iter()
            .zip(&other.elements)
            .map(|(a, b)| a.sub(b))
            .collect::<CryptoResult<Vec<_>>>()?;
        Ok(Self { elements })
    }

    /// Inner product: sum over i of self[i] * other[i]
    pub fn dot(&self, other: &Self) -> CryptoResult<RingElement> {
        self.check_same_len(other, "polyvec_dot")?;
        let mut acc = RingElement::zero(self.params());
        for (a, b) in self.elements.iter().zip(&other.elements) {
            acc = acc.add(&a.mul(b)?)?;
        }
        Ok(acc)
    }

    /// Multiply each component by the same ring element
    pub fn scale(&self, factor: &RingElement) -> CryptoResult<Self> {
        let elements = self
            .elements
            .iter()
            .map(|e| factor.mul(e))
            .collect::<CryptoResult<Vec<_>>>()?;
        Ok(Self { elements })
    }

    /// Largest `inf_norm` over all components
    pub fn inf_norm(&self) -> u32 {
        self.elements.iter().map(RingElement::inf_norm).max().unwrap_or(0)
    }

    /// Concatenated fixed-width encoding of every component
    pub fn to_bytes(&self) -> Vec<u8> {
        self.elements.iter().flat_map(|e| e.to_bytes()).collect()
    }
}

/// A rows x cols matrix of ring elements, stored row-major
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPolyMatrix")]
pub struct PolyMatrix {
    rows: usize,
    cols: usize,
    entries: Vec<RingElement>,
}

#[derive(Deserialize)]
struct RawPolyMatrix {
    rows: usize,
    cols: usize,
    entries: Vec<RingElement>,
}

impl TryFrom<RawPolyMatrix> for PolyMatrix {
    type Error = CryptoError;

    fn try_from(raw: RawPolyMatrix) -> CryptoResult<Self> {
        Self::new(raw.rows, raw.cols, raw.entries)
    }
}

impl PolyMatrix {
    pub fn new(rows: usize, cols: usize, entries: Vec<RingElement>) -> CryptoResult<Self> {
        if rows == 0 || cols == 0 || entries.len() != rows * cols {
            return Err(CryptoError::parameter_mismatch(
                "polymatrix_new",
                &format!("{} x {} entries", rows, cols),
                &format!("{} entries", entries.len()),
                error_codes::VECTOR_DIMENSION_MISMATCH,
            ));
        }
        for entry in &entries[1..] {
            entries[0].check_compatible(entry, "polymatrix_new")?;
        }
        Ok(Self { rows, cols, entries })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn params(&self) -> RingParams {
        self.entries[0].params()
    }

    pub fn get(&self, row: usize, col: usize) -> &RingElement {
        &self.entries[row * self.cols + col]
    }

    /// A * v, where v has `cols` components
    pub fn mul_vec(&self, v: &PolyVec) -> CryptoResult<PolyVec> {
        v.expect_shape(self.params(), self.cols, "polymatrix_mul_vec")?;
        let mut out = Vec::with_capacity(self.rows);
        for i in 0..self.rows {
            let mut acc = RingElement::zero(self.params());
            for j in 0..self.cols {
                acc = acc.add(&self.get(i, j).mul(v.get(j))?)?;
            }
            out.push(acc);
        }
        PolyVec::new(out)
    }

    /// A^T * v, where v has `rows` components
    pub fn transpose_mul_vec(&self, v: &PolyVec) -> CryptoResult<PolyVec> {
        v.expect_shape(self.params(), self.rows, "polymatrix_transpose_mul_vec")?;
        let mut out = Vec::with_capacity(self.cols);
        for j in 0..self.cols {
            let mut acc = RingElement::zero(self.params());
            for i in 0..self.rows {
                acc = acc.add(&self.get(i, j).mul(v.get(i))?)?;
            }
            out.push(acc);
        }
        PolyVec::new(out)
    }
}
