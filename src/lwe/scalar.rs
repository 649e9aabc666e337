use std::fmt;
use std::sync::Arc;

use log::debug;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::CryptoResult;
use crate::hash::{check_hash, HashFunction, Sha256Hash};
use crate::params::LweParameters;
use crate::secure_memory::SecureBytes;

/// Public key `(a, b = a·s + e)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LwePublicKey {
    pub a: u32,
    pub b: u32,
}

/// Secret key `s`, stored mod q
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct LweSecretKey {
    pub s: u32,
}

impl fmt::Debug for LweSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LweSecretKey([REDACTED])")
    }
}

impl Drop for LweSecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Ciphertext `(u = a·r + e1, v = b·r + e2 + m·q/2)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LweCiphertext {
    pub u: u32,
    pub v: u32,
}

/// One-bit KEM over Z_q. The shared secret is `H([m])`.
#[derive(Debug, Clone)]
pub struct LweKem {
    params: LweParameters,
    hash: Arc<dyn HashFunction>,
}

impl LweKem {
    /// KEM with SHA-256 as the KDF
    pub fn new(params: LweParameters) -> CryptoResult<Self> {
        Self::with_hash(params, Arc::new(Sha256Hash))
    }

    pub fn with_hash(params: LweParameters, hash: Arc<dyn HashFunction>) -> CryptoResult<Self> {
        params.validate()?;
        check_hash(hash.as_ref())?;
        Ok(Self { params, hash })
    }

    pub fn params(&self) -> &LweParameters {
        &self.params
    }

    pub fn keygen(&self) -> (LwePublicKey, LweSecretKey) {
        self.keygen_with_rng(&mut ChaCha20Rng::from_entropy())
    }

    pub fn keygen_with_rng<R: RngCore>(&self, rng: &mut R) -> (LwePublicKey, LweSecretKey) {
        let q = self.params.q as u64;
        let a = rng.gen_range(0..self.params.q);
        let s = self.noise(rng);
        let e = self.noise(rng);
        let b = ((a as u64 * s as u64 + e as u64) % q) as u32;
        debug!("LWE key pair generated");
        (LwePublicKey { a, b }, LweSecretKey { s })
    }

    pub fn encapsulate(&self, public_key: &LwePublicKey) -> (LweCiphertext, SecureBytes) {
        self.encapsulate_with_rng(public_key, &mut ChaCha20Rng::from_entropy())
    }

    pub fn encapsulate_with_rng<R: RngCore>(
        &self,
        public_key: &LwePublicKey,
        rng: &mut R,
    ) -> (LweCiphertext, SecureBytes) {
        let q = self.params.q as u64;
        let r = self.noise(rng) as u64;
        let e1 = self.noise(rng) as u64;
        let e2 = self.noise(rng) as u64;
        let m: u8 = rng.gen_range(0..=1);

        let u = ((public_key.a as u64 % q * r + e1) % q) as u32;
        let v = ((public_key.b as u64 % q * r + e2 + (q / 2) * m as u64) % q) as u32;
        let shared_secret = SecureBytes::from(self.hash.digest(&[m]));
        (LweCiphertext { u, v }, shared_secret)
    }

    /// Decode `v - u·s` to the nearer of 0 and q/2. Ties go to 0.
    pub fn decapsulate(&self, ciphertext: &LweCiphertext, secret_key: &LweSecretKey) -> SecureBytes {
        let q = self.params.q as u64;
        let us = (ciphertext.u as u64 % q) * secret_key.s as u64 % q;
        let t = (ciphertext.v as u64 % q + q - us) % q;

        let half = q / 2;
        let to_zero = t.min(q - t);
        let diff = if t > half { t - half } else { half - t };
        let to_half = diff.min(q - diff);
        let m: u8 = if to_zero <= to_half { 0 } else { 1 };
        SecureBytes::from(self.hash.digest(&[m]))
    }

    /// Uniform in [-noise_bound, noise_bound], returned mod q
    fn noise<R: RngCore>(&self, rng: &mut R) -> u32 {
        let bound = self.params.noise_bound as i64;
        rng.gen_range(-bound..=bound).rem_euclid(self.params.q as i64) as u32
    }
}
