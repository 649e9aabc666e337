//! Bounded-coefficient polynomial sampling
//!
//! A `Sampler` owns its own ChaCha20 stream. `from_entropy` gives fresh
//! randomness on every call site; `from_seed` gives a reproducible stream,
//! which is how public matrices are regenerated from their seed.

use std::fmt;

use rand::seq::index;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::hash::{check_hash, derive_seed, HashFunction};
use crate::params::RingParams;
use crate::ring::{PolyMatrix, PolyVec, RingElement};

/// Source of ring elements with defined coefficient distributions
pub struct Sampler {
    params: RingParams,
    rng: ChaCha20Rng,
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sampler").field("params", &self.params).finish()
    }
}

impl Sampler {
    /// Sampler seeded from the operating system
    pub fn from_entropy(params: RingParams) -> Self {
        Self {
            params,
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Sampler producing the same stream for the same seed
    pub fn from_seed(params: RingParams, seed: [u8; 32]) -> Self {
        Self {
            params,
            rng: ChaCha20Rng::from_seed(seed),
        }
    }

    pub fn params(&self) -> RingParams {
        self.params
    }

    /// Fill `dest` with bytes from the underlying stream
    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest);
    }

    /// Draw a fresh 32-byte seed
    pub fn seed(&mut self) -> [u8; 32] {
        let mut seed = [0u8; 32];
        self.rng.fill_bytes(&mut seed);
        seed
    }

    /// Every coefficient independently uniform in [-bound, bound], stored mod q.
    ///
    /// `bound` may be at most (q-1)/2, otherwise distinct draws would collide
    /// modulo q and the distribution would no longer be uniform.
    pub fn uniform_bounded(&mut self, bound: u32) -> CryptoResult<RingElement> {
        if bound > (self.params.q - 1) / 2 {
            return Err(CryptoError::invalid_parameter(
                "bound",
                &format!("at most (q-1)/2 = {}", (self.params.q - 1) / 2),
                &bound.to_string(),
            ));
        }
        let bound = bound as i64;
        let coeffs: Vec<i64> = (0..self.params.n)
            .map(|_| self.rng.gen_range(-bound..=bound))
            .collect();
        RingElement::from_signed(self.params, &coeffs)
    }

    /// `len` independent [`Sampler::uniform_bounded`] elements
    pub fn uniform_bounded_vec(&mut self, bound: u32, len: usize) -> CryptoResult<PolyVec> {
        let elements = (0..len)
            .map(|_| self.uniform_bounded(bound))
            .collect::<CryptoResult<Vec<_>>>()?;
        PolyVec::new(elements)
    }

    /// Matrix with every entry uniform over Z_q, filled row by row
    pub fn uniform_matrix(&mut self, rows: usize, cols: usize) -> CryptoResult<PolyMatrix> {
        let full = (self.params.q - 1) / 2;
        let entries = (0..rows * cols)
            .map(|_| self.uniform_bounded(full))
            .collect::<CryptoResult<Vec<_>>>()?;
        PolyMatrix::new(rows, cols, entries)
    }

    /// Centered binomial noise from a fresh `2 * eta * N`-bit buffer
    pub fn centered_binomial(&mut self, eta: u32) -> CryptoResult<RingElement> {
        let mut buffer = vec![0u8; cbd_buffer_len(self.params, eta)];
        self.rng.fill_bytes(&mut buffer);
        cbd_from_bytes(self.params, &buffer, eta)
    }

    /// `len` independent [`Sampler::centered_binomial`] elements
    pub fn centered_binomial_vec(&mut self, eta: u32, len: usize) -> CryptoResult<PolyVec> {
        let elements = (0..len)
            .map(|_| self.centered_binomial(eta))
            .collect::<CryptoResult<Vec<_>>>()?;
        PolyVec::new(elements)
    }

    /// Regenerate the public matrix bound to `rho`
    pub fn expand_matrix(
        params: RingParams,
        rho: &[u8; 32],
        rows: usize,
        cols: usize,
    ) -> CryptoResult<PolyMatrix> {
        Sampler::from_seed(params, *rho).uniform_matrix(rows, cols)
    }

    /// Fixed-weight ternary challenge derived from `seed_bytes`.
    ///
    /// Exactly `tau` distinct positions are chosen without replacement and
    /// each gets +1 or -1 with probability 1/2. The output depends only on
    /// the hash, the seed bytes and `tau`.
    pub fn challenge(
        params: RingParams,
        hash: &dyn HashFunction,
        seed_bytes: &[u8],
        tau: usize,
    ) -> CryptoResult<RingElement> {
        if tau == 0 || tau > params.n {
            return Err(CryptoError::ring_error(
                "challenge",
                &format!("weight {} does not fit in {} coefficients", tau, params.n),
                error_codes::SAMPLING_INVALID_WEIGHT,
            ));
        }
        check_hash(hash)?;
        let mut rng = ChaCha20Rng::from_seed(derive_seed(hash, seed_bytes));
        let mut coeffs = vec![0i64; params.n];
        for pos in index::sample(&mut rng, params.n, tau).into_iter() {
            coeffs[pos] = if rng.gen::<bool>() { 1 } else { -1 };
        }
        RingElement::from_signed(params, &coeffs)
    }
}

/// Bytes consumed by one centered binomial polynomial
pub fn cbd_buffer_len(params: RingParams, eta: u32) -> usize {
    (2 * eta as usize * params.n + 7) / 8
}

/// Deterministic centered binomial sampling from a caller-supplied buffer.
///
/// Coefficient i is `popcount(a_i) - popcount(b_i)` where `a_i` and `b_i` are
/// the consecutive eta-bit groups starting at bit `2 * i * eta` (bits are
/// read least significant first within each byte).
pub fn cbd_from_bytes(params: RingParams, buffer: &[u8], eta: u32) -> CryptoResult<RingElement> {
    let needed = cbd_buffer_len(params, eta);
    if buffer.len() < needed {
        return Err(CryptoError::ring_error(
            "centered_binomial",
            &format!("need {} bytes of randomness, got {}", needed, buffer.len()),
            error_codes::SAMPLING_BUFFER_TOO_SHORT,
        ));
    }
    let bit = |k: usize| ((buffer[k / 8] >> (k % 8)) & 1) as i64;
    let eta = eta as usize;
    let coeffs: Vec<i64> = (0..params.n)
        .map(|i| {
            let base = 2 * i * eta;
            let a: i64 = (0..eta).map(|j| bit(base + j)).sum();
            let b: i64 = (0..eta).map(|j| bit(base + eta + j)).sum();
            a - b
        })
        .collect();
    RingElement::from_signed(params, &coeffs)
}
