/*!
 * Fiat-Shamir-with-aborts signatures
 *
 * A Dilithium-style scheme without hints: the verifier recomputes
 * `w' = A·z - c·t`, which equals `w - c·s2`. The challenge is derived from the
 * high bits of the commitment, and the signer aborts any attempt whose high
 * bits would move under the `c·s2` shift, so every accepted signature
 * verifies.
 *
 * This departs from hashing `message || w` in full: the exact `w` cannot be
 * recovered from `A·z - c·t`, so a challenge over all of `w` would reject
 * almost every honest signature.
 */

use std::fmt;
use std::sync::Arc;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::dilithium::rounding::high_bits_vec;
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::hash::{check_hash, expand_seed, HashFunction, Sha256Hash};
use crate::params::DilithiumParameters;
use crate::ring::{PolyMatrix, PolyVec, RingElement};
use crate::sampling::Sampler;
use crate::secure_memory::with_secure_scope;
use crate::utils;

/// Public key: `t = A·s1 + s2` and the seed `rho` that regenerates `A`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DilithiumPublicKey {
    pub t: PolyVec,
    pub rho: [u8; 32],
}

impl DilithiumPublicKey {
    /// Serialize the public key to bytes
    pub fn to_bytes(&self) -> CryptoResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize a public key from bytes
    pub fn from_bytes(data: &[u8]) -> CryptoResult<Self> {
        let key: Self = bincode::deserialize(data)?;
        key.t.validate().map_err(|e| {
            CryptoError::dilithium_error(
                "decode public key",
                &e.to_string(),
                error_codes::DILITHIUM_INVALID_KEY,
            )
        })?;
        Ok(key)
    }

    /// Generate a fingerprint of this public key
    ///
    /// # Returns
    ///
    /// The first 8 bytes of SHA-256 over `t` and `rho`, hex encoded
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.t.to_bytes());
        hasher.update(self.rho);
        let hash = hasher.finalize();
        utils::to_hex(&hash[0..8])
    }
}

/// Secret key: the short vectors `s1`, `s2` and the matrix seed
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DilithiumSecretKey {
    pub s1: PolyVec,
    pub s2: PolyVec,
    pub rho: [u8; 32],
}

impl fmt::Debug for DilithiumSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DilithiumSecretKey([REDACTED; l={} k={}])",
            self.s1.len(),
            self.s2.len()
        )
    }
}

impl Drop for DilithiumSecretKey {
    fn drop(&mut self) {
        self.s1.zeroize();
        self.s2.zeroize();
    }
}

impl DilithiumSecretKey {
    pub fn to_bytes(&self) -> CryptoResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> CryptoResult<Self> {
        let key: Self = bincode::deserialize(data)?;
        for v in [&key.s1, &key.s2] {
            v.validate().map_err(|e| {
                CryptoError::dilithium_error(
                    "decode secret key",
                    &e.to_string(),
                    error_codes::DILITHIUM_INVALID_KEY,
                )
            })?;
        }
        Ok(key)
    }
}

/// A signature key pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DilithiumKeyPair {
    pub public_key: DilithiumPublicKey,
    pub secret_key: DilithiumSecretKey,
}

impl DilithiumKeyPair {
    /// Public half, for sharing with verifiers
    pub fn public_key(&self) -> DilithiumPublicKey {
        self.public_key.clone()
    }

    pub fn to_bytes(&self) -> CryptoResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> CryptoResult<Self> {
        let pair: Self = bincode::deserialize(data)?;
        pair.public_key.t.validate()?;
        pair.secret_key.s1.validate()?;
        pair.secret_key.s2.validate()?;
        Ok(pair)
    }
}

/// Signature `(z, c)`: the response vector and the ternary challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DilithiumSignature {
    pub z: PolyVec,
    pub c: RingElement,
}

impl DilithiumSignature {
    pub fn new(z: PolyVec, c: RingElement) -> Self {
        Self { z, c }
    }

    pub fn to_bytes(&self) -> CryptoResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize a signature, rejecting out-of-range coefficients
    pub fn from_bytes(data: &[u8]) -> CryptoResult<Self> {
        let signature: Self = bincode::deserialize(data)?;
        signature
            .z
            .get(0)
            .check_compatible(&signature.c, "decode signature")
            .map_err(|e| {
                CryptoError::dilithium_error(
                    "decode signature",
                    &e.to_string(),
                    error_codes::DILITHIUM_INVALID_SIGNATURE,
                )
            })?;
        Ok(signature)
    }
}

/// Signer and verifier for one [`DilithiumParameters`] set
///
/// # Example
///
/// ```
/// use lattice_toy::dilithium::DilithiumSigner;
/// use lattice_toy::params::DilithiumParameters;
///
/// let signer = DilithiumSigner::new(DilithiumParameters::toy()).unwrap();
/// let key_pair = signer.keygen().unwrap();
/// let signature = signer.sign(b"hello", &key_pair.secret_key).unwrap();
/// assert!(signer.verify(b"hello", &signature, &key_pair.public_key).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct DilithiumSigner {
    params: DilithiumParameters,
    hash: Arc<dyn HashFunction>,
}

impl DilithiumSigner {
    /// Signer hashing commitments with SHA-256
    pub fn new(params: DilithiumParameters) -> CryptoResult<Self> {
        Self::with_hash(params, Arc::new(Sha256Hash))
    }

    /// Signer with a caller-chosen hash collaborator
    pub fn with_hash(params: DilithiumParameters, hash: Arc<dyn HashFunction>) -> CryptoResult<Self> {
        params.validate()?;
        check_hash(hash.as_ref())?;
        Ok(Self { params, hash })
    }

    pub fn params(&self) -> &DilithiumParameters {
        &self.params
    }

    pub fn hash(&self) -> &dyn HashFunction {
        self.hash.as_ref()
    }

    /// Generate a key pair from operating system randomness
    pub fn keygen(&self) -> CryptoResult<DilithiumKeyPair> {
        let mut seed = utils::random_seed()?;
        with_secure_scope(&mut seed, |seed| self.keygen_from_seed(seed))
    }

    /// Deterministic key generation: the seed is stretched into `rho` for
    /// the matrix and a second seed for `s1` and `s2`.
    pub fn keygen_from_seed(&self, seed: &[u8; 32]) -> CryptoResult<DilithiumKeyPair> {
        let p = &self.params;

        let mut expanded = expand_seed(self.hash(), seed, 64);
        let mut rho = [0u8; 32];
        let mut sigma = [0u8; 32];
        rho.copy_from_slice(&expanded[..32]);
        sigma.copy_from_slice(&expanded[32..]);
        expanded.zeroize();

        let a = self.matrix(&rho)?;
        let mut secrets = Sampler::from_seed(p.ring, sigma);
        sigma.zeroize();
        let s1 = secrets.uniform_bounded_vec(p.eta, p.l)?;
        let s2 = secrets.uniform_bounded_vec(p.eta, p.k)?;
        let t = a.mul_vec(&s1)?.add(&s2)?;

        let public_key = DilithiumPublicKey { t, rho };
        debug!("Dilithium key pair generated, fingerprint {}", public_key.fingerprint());
        Ok(DilithiumKeyPair {
            public_key,
            secret_key: DilithiumSecretKey { s1, s2, rho },
        })
    }

    /// Sign `message`, retrying up to `max_sign_attempts` times
    pub fn sign(&self, message: &[u8], secret_key: &DilithiumSecretKey) -> CryptoResult<DilithiumSignature> {
        self.sign_with_stats(message, secret_key).map(|(signature, _)| signature)
    }

    /// Like [`DilithiumSigner::sign`], also returning the number of attempts
    /// the abort loop needed
    pub fn sign_with_stats(
        &self,
        message: &[u8],
        secret_key: &DilithiumSecretKey,
    ) -> CryptoResult<(DilithiumSignature, usize)> {
        let mut sampler = Sampler::from_entropy(self.params.ring);
        self.sign_loop(message, secret_key, &mut sampler)
    }

    /// Sign drawing every masking vector from `sampler`
    pub fn sign_with_sampler(
        &self,
        message: &[u8],
        secret_key: &DilithiumSecretKey,
        sampler: &mut Sampler,
    ) -> CryptoResult<DilithiumSignature> {
        self.sign_loop(message, secret_key, sampler)
            .map(|(signature, _)| signature)
    }

    fn sign_loop(
        &self,
        message: &[u8],
        secret_key: &DilithiumSecretKey,
        sampler: &mut Sampler,
    ) -> CryptoResult<(DilithiumSignature, usize)> {
        let p = &self.params;
        if sampler.params() != p.ring {
            return Err(CryptoError::parameter_mismatch(
                "dilithium_sign",
                &p.ring.to_string(),
                &sampler.params().to_string(),
                error_codes::RING_MODULUS_MISMATCH,
            ));
        }
        secret_key.s1.expect_shape(p.ring, p.l, "dilithium_sign")?;
        secret_key.s2.expect_shape(p.ring, p.k, "dilithium_sign")?;

        let a = self.matrix(&secret_key.rho)?;
        let z_bound = p.z_bound();

        for attempt in 1..=p.max_sign_attempts {
            let mut y = sampler.uniform_bounded_vec(p.gamma1, p.l)?;
            let w = a.mul_vec(&y)?;
            let w1 = high_bits_vec(&w, p.gamma2)?;
            let c = self.challenge(message, &w1)?;

            let z = y.add(&secret_key.s1.scale(&c)?)?;
            y.zeroize();
            let norm = z.inf_norm();
            if norm >= z_bound {
                trace!("Sign attempt {} rejected: |z| = {} >= {}", attempt, norm, z_bound);
                continue;
            }

            let shifted = w.sub(&secret_key.s2.scale(&c)?)?;
            if high_bits_vec(&shifted, p.gamma2)? != w1 {
                trace!("Sign attempt {} rejected: c·s2 moves the commitment high bits", attempt);
                continue;
            }

            debug!("Dilithium signature accepted after {} attempt(s)", attempt);
            return Ok((DilithiumSignature { z, c }, attempt));
        }

        warn!("Dilithium signing gave up after {} attempts", p.max_sign_attempts);
        Err(CryptoError::sign_attempts_exhausted(p.max_sign_attempts))
    }

    /// Check `signature` on `message` under `public_key`.
    ///
    /// Returns `Ok(false)` for any signature that does not verify. Vectors of
    /// the wrong length or ring are a caller error and return `Err`.
    pub fn verify(
        &self,
        message: &[u8],
        signature: &DilithiumSignature,
        public_key: &DilithiumPublicKey,
    ) -> CryptoResult<bool> {
        let p = &self.params;
        signature.z.expect_shape(p.ring, p.l, "dilithium_verify")?;
        public_key.t.expect_shape(p.ring, p.k, "dilithium_verify")?;
        signature.z.get(0).check_compatible(&signature.c, "dilithium_verify")?;

        let norm = signature.z.inf_norm();
        if norm >= p.z_bound() {
            warn!("Signature rejected: |z| = {} is not below {}", norm, p.z_bound());
            return Ok(false);
        }
        if !self.is_valid_challenge(&signature.c) {
            debug!("Signature rejected: challenge is not a weight-{} ternary element", p.tau);
            return Ok(false);
        }

        let a = self.matrix(&public_key.rho)?;
        let w_prime = a.mul_vec(&signature.z)?.sub(&public_key.t.scale(&signature.c)?)?;
        let w1 = high_bits_vec(&w_prime, p.gamma2)?;
        let c_prime = self.challenge(message, &w1)?;

        let valid = c_prime == signature.c;
        debug!("Dilithium verification under {}: {}", public_key.fingerprint(), valid);
        Ok(valid)
    }

    fn matrix(&self, rho: &[u8; 32]) -> CryptoResult<PolyMatrix> {
        Sampler::expand_matrix(self.params.ring, rho, self.params.k, self.params.l)
    }

    /// `challenge(H(message || w1), tau)`
    fn challenge(&self, message: &[u8], w1: &PolyVec) -> CryptoResult<RingElement> {
        let input = utils::concat_bytes(&[message, &w1.to_bytes()]);
        Sampler::challenge(self.params.ring, self.hash(), &input, self.params.tau)
    }

    fn is_valid_challenge(&self, c: &RingElement) -> bool {
        let q = self.params.ring.q;
        c.weight() == self.params.tau && c.coeffs().iter().all(|&x| x == 0 || x == 1 || x == q - 1)
    }
}
