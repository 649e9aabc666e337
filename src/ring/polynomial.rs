//! Polynomial arithmetic in Z_q[X]/(X^N + 1)
//!
//! Elements are immutable values: every operation returns a fresh element
//! whose coefficients are reduced into [0, q).

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::params::RingParams;
use crate::ring::compression::{compress_coeff, CompressedPoly};

/// Represents a polynomial of degree < N with coefficients modulo Q
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(try_from = "RawRingElement")]
pub struct RingElement {
    /// Coefficients in canonical form, index i holds the coefficient of X^i
    coeffs: Vec<u32>,
    /// Ring the element lives in
    #[zeroize(skip)]
    params: RingParams,
}

/// Unchecked wire form; every decoded element goes through `validate`
#[derive(Deserialize)]
struct RawRingElement {
    coeffs: Vec<u32>,
    params: RingParams,
}

impl TryFrom<RawRingElement> for RingElement {
    type Error = CryptoError;

    fn try_from(raw: RawRingElement) -> CryptoResult<Self> {
        let element = Self {
            coeffs: raw.coeffs,
            params: raw.params,
        };
        element.validate()?;
        Ok(element)
    }
}

impl RingElement {
    /// The zero polynomial
    pub fn zero(params: RingParams) -> Self {
        Self {
            coeffs: vec![0; params.n],
            params,
        }
    }

    /// Create an element from unsigned coefficients, reducing each mod q
    pub fn from_coeffs(params: RingParams, coeffs: Vec<u32>) -> CryptoResult<Self> {
        check_length(params, coeffs.len(), "ring_from_coeffs")?;
        let q = params.q;
        let coeffs = coeffs.into_iter().map(|c| c % q).collect();
        Ok(Self { coeffs, params })
    }

    /// Create an element from signed coefficients (e.g. noise in [-eta, eta])
    pub fn from_signed(params: RingParams, coeffs: &[i64]) -> CryptoResult<Self> {
        check_length(params, coeffs.len(), "ring_from_signed")?;
        let q = params.q as i64;
        let coeffs = coeffs.iter().map(|&c| c.rem_euclid(q) as u32).collect();
        Ok(Self { coeffs, params })
    }

    pub fn params(&self) -> RingParams {
        self.params
    }

    pub fn coeffs(&self) -> &[u32] {
        &self.coeffs
    }

    /// Coefficient i as a centered representative in (-q/2, q/2]
    pub fn centered(&self, i: usize) -> i64 {
        centered(self.coeffs[i], self.params.q)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|&c| c == 0)
    }

    /// Number of nonzero coefficients
    pub fn weight(&self) -> usize {
        self.coeffs.iter().filter(|&&c| c != 0).count()
    }

    /// Check the structural invariants: exactly N coefficients, all below q.
    /// Used on values that arrive through deserialization.
    pub fn validate(&self) -> CryptoResult<()> {
        self.params.validate()?;
        check_length(self.params, self.coeffs.len(), "ring_validate")?;
        if let Some(pos) = self.coeffs.iter().position(|&c| c >= self.params.q) {
            return Err(CryptoError::ring_error(
                "ring_validate",
                &format!("coefficient {} = {} is not below q = {}", pos, self.coeffs[pos], self.params.q),
                error_codes::RING_COEFFICIENT_OUT_OF_RANGE,
            ));
        }
        Ok(())
    }

    /// Fail fast when `other` belongs to a different ring
    pub fn check_compatible(&self, other: &Self, operation: &str) -> CryptoResult<()> {
        if self.params != other.params {
            let code = if self.params.n != other.params.n {
                error_codes::RING_DIMENSION_MISMATCH
            } else {
                error_codes::RING_MODULUS_MISMATCH
            };
            return Err(CryptoError::parameter_mismatch(
                operation,
                &self.params.to_string(),
                &other.params.to_string(),
                code,
            ));
        }
        Ok(())
    }

    /// Coefficient-wise addition mod q
    pub fn add(&self, other: &Self) -> CryptoResult<Self> {
        self.check_compatible(other, "ring_add")?;
        let q = self.params.q;
        let coeffs = self
            .coeffs
            .iter()
            .zip(&other.coeffs)
            .map(|(&a, &b)| ((a as u64 + b as u64) % q as u64) as u32)
            .collect();
        Ok(Self {
            coeffs,
            params: self.params,
        })
    }

    /// Coefficient-wise subtraction mod q
    pub fn sub(&self, other: &Self) -> CryptoResult<Self> {
        self.check_compatible(other, "ring_sub")?;
        let q = self.params.q;
        let coeffs = self
            .coeffs
            .iter()
            .zip(&other.coeffs)
            .map(|(&a, &b)| ((a as u64 + q as u64 - b as u64) % q as u64) as u32)
            .collect();
        Ok(Self {
            coeffs,
            params: self.params,
        })
    }

    /// Additive inverse
    pub fn neg(&self) -> Self {
        let q = self.params.q;
        let coeffs = self
            .coeffs
            .iter()
            .map(|&c| if c == 0 { 0 } else { q - c })
            .collect();
        Self {
            coeffs,
            params: self.params,
        }
    }

    /// Schoolbook product modulo q and X^N + 1.
    ///
    /// Terms landing on X^(i+j) with i+j >= N wrap to X^(i+j-N) with a sign
    /// flip, since X^N = -1. Positive and negative contributions are kept in
    /// separate accumulators and folded at the end.
    pub fn mul(&self, other: &Self) -> CryptoResult<Self> {
        self.check_compatible(other, "ring_mul")?;
        let n = self.params.n;
        let q = self.params.q as u64;

        let mut positive = vec![0u64; n];
        let mut negative = vec![0u64; n];

        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            let a = a as u64;
            for (j, &b) in other.coeffs.iter().enumerate() {
                let term = (a * b as u64) % q;
                let k = i + j;
                if k < n {
                    positive[k] += term;
                } else {
                    negative[k - n] += term;
                }
            }
        }

        let coeffs = positive
            .iter()
            .zip(&negative)
            .map(|(&p, &m)| ((p % q + q - m % q) % q) as u32)
            .collect();
        Ok(Self {
            coeffs,
            params: self.params,
        })
    }

    /// Multiply every coefficient by a scalar mod q
    pub fn scalar_mul(&self, scalar: u32) -> Self {
        let q = self.params.q as u64;
        let s = scalar as u64 % q;
        let coeffs = self
            .coeffs
            .iter()
            .map(|&c| ((c as u64 * s) % q) as u32)
            .collect();
        Self {
            coeffs,
            params: self.params,
        }
    }

    /// Largest centered absolute value: max over i of min(c_i, q - c_i)
    pub fn inf_norm(&self) -> u32 {
        let q = self.params.q;
        self.coeffs
            .iter()
            .map(|&c| c.min(q - c))
            .max()
            .unwrap_or(0)
    }

    /// Lossy quantization of every coefficient to `d` bits
    pub fn compress(&self, d: u32) -> CryptoResult<CompressedPoly> {
        if d == 0 || d >= self.params.coeff_bits() {
            return Err(CryptoError::ring_error(
                "ring_compress",
                &format!("cannot compress {}-bit coefficients to {} bits", self.params.coeff_bits(), d),
                error_codes::RING_INVALID_COMPRESSION,
            ));
        }
        let q = self.params.q;
        let values = self.coeffs.iter().map(|&c| compress_coeff(c, d, q)).collect();
        Ok(CompressedPoly::new(d, values))
    }

    /// Fixed-width encoding for hashing: each coefficient as 4 big-endian bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.coeffs.len() * 4);
        for c in &self.coeffs {
            out.extend_from_slice(&c.to_be_bytes());
        }
        out
    }
}

/// Centered representative of `c` modulo `q`
fn centered(c: u32, q: u32) -> i64 {
    if c > q / 2 {
        c as i64 - q as i64
    } else {
        c as i64
    }
}

fn check_length(params: RingParams, len: usize, operation: &str) -> CryptoResult<()> {
    if len != params.n {
        return Err(CryptoError::parameter_mismatch(
            operation,
            &format!("{} coefficients", params.n),
            &format!("{} coefficients", len),
            error_codes::RING_DIMENSION_MISMATCH,
        ));
    }
    Ok(())
}
