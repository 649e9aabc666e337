//! Parameter sets
//!
//! Every scheme object is built from one of these structures; there are no
//! global constants, so KEM and signature rings coexist without interfering.
//! All parameter sets are serde-serializable so they can be kept in JSON
//! configuration files.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};

/// Dimensions of the ring `Z_q[X]/(X^N+1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RingParams {
    /// Polynomial degree bound N (power of two)
    pub n: usize,

    /// Coefficient modulus Q
    pub q: u32,
}

impl RingParams {
    pub const fn new(n: usize, q: u32) -> Self {
        Self { n, q }
    }

    /// Ring used by the KEM: N = 256, Q = 3329
    pub const fn kyber() -> Self {
        Self::new(256, 3329)
    }

    /// Ring used by the signature scheme: N = 256, Q = 8380417
    pub const fn dilithium() -> Self {
        Self::new(256, 8_380_417)
    }

    /// Number of bits needed to represent a coefficient
    pub fn coeff_bits(&self) -> u32 {
        32 - (self.q - 1).leading_zeros()
    }

    pub fn validate(&self) -> CryptoResult<()> {
        if self.n == 0 || !self.n.is_power_of_two() {
            return Err(CryptoError::invalid_parameter(
                "n",
                "a non-zero power of two",
                &self.n.to_string(),
            ));
        }
        // The product of two reduced coefficients must fit in a u64.
        if self.q < 2 || self.q >= (1 << 31) {
            return Err(CryptoError::invalid_parameter(
                "q",
                "2 <= q < 2^31",
                &self.q.to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for RingParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={} q={}", self.n, self.q)
    }
}

/// Parameters for the module-lattice KEM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KyberParameters {
    pub ring: RingParams,

    /// Module rank (A is k x k)
    pub k: usize,

    /// Noise parameter for s and e
    pub eta1: u32,

    /// Noise parameter for r, e1 and e2
    pub eta2: u32,

    /// Compression bits for u
    pub du: u32,

    /// Compression bits for v
    pub dv: u32,

    /// Size of the encapsulated seed mu in bytes
    pub message_size: usize,
}

impl KyberParameters {
    /// N = 256, Q = 3329, K = 2, ETA = 2, d_u = 10, d_v = 4
    pub const fn toy() -> Self {
        Self {
            ring: RingParams::kyber(),
            k: 2,
            eta1: 2,
            eta2: 2,
            du: 10,
            dv: 4,
            message_size: 32,
        }
    }

    /// Size of a packed ciphertext in bytes
    pub fn ciphertext_size(&self) -> usize {
        let n = self.ring.n;
        (self.k * n * self.du as usize + n * self.dv as usize + 7) / 8
    }

    pub fn validate(&self) -> CryptoResult<()> {
        self.ring.validate()?;
        if self.k == 0 {
            return Err(CryptoError::invalid_parameter("k", "k >= 1", "0"));
        }
        for (name, eta) in [("eta1", self.eta1), ("eta2", self.eta2)] {
            if eta == 0 || eta > 8 {
                return Err(CryptoError::invalid_parameter(name, "1 <= eta <= 8", &eta.to_string()));
            }
        }
        let bits = self.ring.coeff_bits();
        for (name, d) in [("du", self.du), ("dv", self.dv)] {
            if d == 0 || d >= bits {
                return Err(CryptoError::invalid_parameter(
                    name,
                    &format!("1 <= d < {}", bits),
                    &d.to_string(),
                ));
            }
        }
        if self.message_size == 0 || self.message_size * 8 > self.ring.n {
            return Err(CryptoError::invalid_parameter(
                "message_size",
                &format!("1..={} bytes", self.ring.n / 8),
                &self.message_size.to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_json(&self) -> CryptoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> CryptoResult<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> CryptoResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

impl Default for KyberParameters {
    fn default() -> Self {
        Self::toy()
    }
}

/// Parameters for the Fiat-Shamir-with-aborts signature scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DilithiumParameters {
    pub ring: RingParams,

    /// Rows of A
    pub k: usize,

    /// Columns of A
    pub l: usize,

    /// Coefficient bound of s1 and s2
    pub eta: u32,

    /// Coefficient bound of the masking vector y
    pub gamma1: u32,

    /// Half-width of the low-order part dropped from w before hashing
    pub gamma2: u32,

    /// Margin subtracted from gamma1 in the norm check on z
    pub beta: u32,

    /// Number of nonzero coefficients of the challenge
    pub tau: usize,

    /// Cap on the abort loop in `sign`
    pub max_sign_attempts: usize,
}

impl DilithiumParameters {
    /// N = 256, Q = 8380417, K = L = 4, GAMMA1 = (Q-1)/16, BETA = 78, TAU = 39
    pub const fn toy() -> Self {
        let ring = RingParams::dilithium();
        Self {
            ring,
            k: 4,
            l: 4,
            eta: 1,
            gamma1: (ring.q - 1) / 16,
            gamma2: (ring.q - 1) / 32,
            beta: 78,
            tau: 39,
            max_sign_attempts: 1000,
        }
    }

    /// Strict upper bound on `inf_norm` for every component of z
    pub fn z_bound(&self) -> u32 {
        self.gamma1 - self.beta
    }

    pub fn validate(&self) -> CryptoResult<()> {
        self.ring.validate()?;
        if self.k == 0 || self.l == 0 {
            return Err(CryptoError::invalid_parameter(
                "k/l",
                "k >= 1 and l >= 1",
                &format!("k={} l={}", self.k, self.l),
            ));
        }
        if self.gamma1 <= self.beta || self.gamma1 > (self.ring.q - 1) / 2 {
            return Err(CryptoError::invalid_parameter(
                "gamma1",
                "beta < gamma1 <= (q-1)/2",
                &self.gamma1.to_string(),
            ));
        }
        if self.gamma2 == 0 || (self.ring.q - 1) % (2 * self.gamma2) != 0 {
            return Err(CryptoError::invalid_parameter(
                "gamma2",
                "a divisor of (q-1)/2",
                &self.gamma2.to_string(),
            ));
        }
        if self.tau == 0 || self.tau > self.ring.n {
            return Err(CryptoError::invalid_parameter(
                "tau",
                &format!("1..={}", self.ring.n),
                &self.tau.to_string(),
            ));
        }
        if self.max_sign_attempts == 0 {
            return Err(CryptoError::invalid_parameter("max_sign_attempts", ">= 1", "0"));
        }
        Ok(())
    }

    pub fn to_json(&self) -> CryptoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> CryptoResult<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> CryptoResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

impl Default for DilithiumParameters {
    fn default() -> Self {
        Self::toy()
    }
}

/// Parameters for the scalar one-bit LWE KEM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LweParameters {
    /// Modulus
    pub q: u32,

    /// Noise is uniform in [-noise_bound, noise_bound]
    pub noise_bound: u32,
}

impl LweParameters {
    /// Q = 4099, noise in [-3, 3]
    pub const fn toy() -> Self {
        Self { q: 4099, noise_bound: 3 }
    }

    /// Largest possible |e·r + e2 - e1·s| for this noise bound
    pub fn max_decryption_noise(&self) -> u64 {
        let b = self.noise_bound as u64;
        2 * b * b + b
    }

    pub fn validate(&self) -> CryptoResult<()> {
        if self.q < 4 || self.q >= (1 << 31) {
            return Err(CryptoError::invalid_parameter("q", "4 <= q < 2^31", &self.q.to_string()));
        }
        // Decryption is exact when the noise stays below q/4.
        if self.noise_bound == 0 || self.max_decryption_noise() >= (self.q / 4) as u64 {
            return Err(CryptoError::invalid_parameter(
                "noise_bound",
                "2b^2 + b < q/4",
                &self.noise_bound.to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_json(&self) -> CryptoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> CryptoResult<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }
}

impl Default for LweParameters {
    fn default() -> Self {
        Self::toy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lwe_noise_bound() {
        let params = LweParameters::toy();
        assert!(params.validate().is_ok());
        assert_eq!(params.max_decryption_noise(), 21);

        let noisy = LweParameters { q: 4099, noise_bound: 30 };
        assert!(noisy.validate().is_err());
    }

    #[test]
    fn test_toy_parameter_sets_are_valid() {
        assert!(KyberParameters::toy().validate().is_ok());
        assert!(DilithiumParameters::toy().validate().is_ok());
    }

    #[test]
    fn test_dilithium_constants() {
        let params = DilithiumParameters::toy();
        assert_eq!(params.gamma1, 523_776);
        assert_eq!(params.gamma2, 261_888);
        assert_eq!(params.z_bound(), 523_698);
    }

    #[test]
    fn test_ciphertext_size() {
        // 2 * 256 * 10 / 8 + 256 * 4 / 8
        assert_eq!(KyberParameters::toy().ciphertext_size(), 768);
    }

    #[test]
    fn test_coeff_bits() {
        assert_eq!(RingParams::kyber().coeff_bits(), 12);
        assert_eq!(RingParams::dilithium().coeff_bits(), 23);
    }

    #[test]
    fn test_rejects_bad_compression() {
        let mut params = KyberParameters::toy();
        params.du = 12;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let params = DilithiumParameters::toy();
        let json = params.to_json().unwrap();
        assert_eq!(DilithiumParameters::from_json(&json).unwrap(), params);
    }
}
