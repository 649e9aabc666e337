/*!
 * Module-lattice key encapsulation
 *
 * A Kyber-style KEM over Z_q[X]/(X^N+1): the public key is `t = A·s + e`
 * with `A` expanded from a seed, and encapsulation hides a random seed `mu`
 * in the top half of `v = t·r + e2 + encode(mu)`. Decapsulation always
 * returns a value; a decoding failure shows up only as a different shared
 * secret.
 */

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::hash::{check_hash, expand_seed, HashFunction, Sha3_256Hash};
use crate::params::{KyberParameters, RingParams};
use crate::ring::{packed_len, CompressedPoly, PolyVec, RingElement};
use crate::sampling::Sampler;
use crate::secure_memory::{with_secure_scope, SecureBytes};
use crate::utils;

/// Public key: `t = A·s + e` and the seed `rho` that regenerates `A`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KyberPublicKey {
    pub t: PolyVec,
    pub rho: [u8; 32],
}

impl KyberPublicKey {
    /// Serialize the public key to bytes
    pub fn to_bytes(&self) -> CryptoResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize a public key, rejecting malformed ring elements
    pub fn from_bytes(data: &[u8]) -> CryptoResult<Self> {
        let key: Self = bincode::deserialize(data)?;
        key.t.validate().map_err(|e| {
            CryptoError::kyber_error("decode public key", &e.to_string(), error_codes::KYBER_INVALID_KEY)
        })?;
        Ok(key)
    }

    /// Short identifier: the first 8 bytes of SHA-256 over the encoding, in hex
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.t.to_bytes());
        hasher.update(self.rho);
        let hash = hasher.finalize();
        utils::to_hex(&hash[0..8])
    }
}

/// Secret key: the short vector `s`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KyberSecretKey {
    pub s: PolyVec,
}

impl fmt::Debug for KyberSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KyberSecretKey([REDACTED; k={}])", self.s.len())
    }
}

impl Drop for KyberSecretKey {
    fn drop(&mut self) {
        self.s.zeroize();
    }
}

impl KyberSecretKey {
    pub fn to_bytes(&self) -> CryptoResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> CryptoResult<Self> {
        let key: Self = bincode::deserialize(data)?;
        key.s.validate().map_err(|e| {
            CryptoError::kyber_error("decode secret key", &e.to_string(), error_codes::KYBER_INVALID_KEY)
        })?;
        Ok(key)
    }
}

/// A KEM key pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KyberKeyPair {
    pub public_key: KyberPublicKey,
    pub secret_key: KyberSecretKey,
}

impl KyberKeyPair {
    /// Public half, for sharing with encapsulating parties
    pub fn public_key(&self) -> KyberPublicKey {
        self.public_key.clone()
    }

    pub fn to_bytes(&self) -> CryptoResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> CryptoResult<Self> {
        let pair: Self = bincode::deserialize(data)?;
        pair.public_key.t.validate()?;
        pair.secret_key.s.validate()?;
        Ok(pair)
    }
}

/// Ciphertext `(compress(u, du), compress(v, dv))`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KyberCiphertext {
    u: Vec<CompressedPoly>,
    v: CompressedPoly,
}

impl KyberCiphertext {
    pub fn u(&self) -> &[CompressedPoly] {
        &self.u
    }

    pub fn v(&self) -> &CompressedPoly {
        &self.v
    }

    /// Bit-packed wire form: every component of `u` at `du` bits per
    /// coefficient, then `v` at `dv` bits per coefficient.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for poly in &self.u {
            out.extend_from_slice(&poly.to_bytes());
        }
        out.extend_from_slice(&self.v.to_bytes());
        out
    }

    /// Parse the wire form produced by [`KyberCiphertext::to_bytes`]
    pub fn from_bytes(params: &KyberParameters, data: &[u8]) -> CryptoResult<Self> {
        let n = params.ring.n;
        let u_len = packed_len(params.du, n);
        let v_len = packed_len(params.dv, n);
        let expected = params.k * u_len + v_len;
        if data.len() != expected {
            return Err(CryptoError::kyber_error(
                "decode ciphertext",
                &format!("expected {} bytes, got {}", expected, data.len()),
                error_codes::KYBER_INVALID_CIPHERTEXT,
            ));
        }
        let u = data[..params.k * u_len]
            .chunks(u_len)
            .map(|chunk| CompressedPoly::from_bytes(chunk, params.du, n))
            .collect::<CryptoResult<Vec<_>>>()?;
        let v = CompressedPoly::from_bytes(&data[params.k * u_len..], params.dv, n)?;
        Ok(Self { u, v })
    }

    /// Check that the ciphertext was produced under `params`
    fn check_shape(&self, params: &KyberParameters) -> CryptoResult<()> {
        let n = params.ring.n;
        let u_ok = self.u.len() == params.k
            && self
                .u
                .iter()
                .all(|p| p.bits() == params.du && p.values().len() == n);
        let v_ok = self.v.bits() == params.dv && self.v.values().len() == n;
        if !u_ok || !v_ok {
            return Err(CryptoError::parameter_mismatch(
                "kyber_decapsulate",
                &format!("{} x {}-bit u and {}-bit v", params.k, params.du, params.dv),
                &format!("{} u components", self.u.len()),
                error_codes::KYBER_INVALID_CIPHERTEXT,
            ));
        }
        Ok(())
    }
}

/// Key encapsulation over the ring described by a [`KyberParameters`]
///
/// # Example
///
/// ```
/// use lattice_toy::kyber::KyberKem;
/// use lattice_toy::params::KyberParameters;
///
/// let kem = KyberKem::new(KyberParameters::toy()).unwrap();
/// let key_pair = kem.keygen().unwrap();
/// let (ciphertext, shared_secret) = kem.encapsulate(&key_pair.public_key).unwrap();
/// let recovered = kem.decapsulate(&ciphertext, &key_pair.secret_key).unwrap();
/// assert_eq!(shared_secret, recovered);
/// ```
#[derive(Debug, Clone)]
pub struct KyberKem {
    params: KyberParameters,
    hash: Arc<dyn HashFunction>,
}

impl KyberKem {
    /// KEM with SHA3-256 as the KDF
    pub fn new(params: KyberParameters) -> CryptoResult<Self> {
        Self::with_hash(params, Arc::new(Sha3_256Hash))
    }

    /// KEM with a caller-chosen hash collaborator
    pub fn with_hash(params: KyberParameters, hash: Arc<dyn HashFunction>) -> CryptoResult<Self> {
        params.validate()?;
        check_hash(hash.as_ref())?;
        Ok(Self { params, hash })
    }

    pub fn params(&self) -> &KyberParameters {
        &self.params
    }

    pub fn hash(&self) -> &dyn HashFunction {
        self.hash.as_ref()
    }

    /// Generate a key pair from operating system randomness
    pub fn keygen(&self) -> CryptoResult<KyberKeyPair> {
        let mut seed = utils::random_seed()?;
        with_secure_scope(&mut seed, |seed| self.keygen_from_seed(seed))
    }

    /// Deterministic key generation.
    ///
    /// The seed is stretched with the hash collaborator into `rho`, which
    /// expands to `A`, and `sigma`, which seeds the noise for `s` and `e`.
    pub fn keygen_from_seed(&self, seed: &[u8; 32]) -> CryptoResult<KyberKeyPair> {
        let ring = self.params.ring;
        let k = self.params.k;

        let mut expanded = expand_seed(self.hash(), seed, 64);
        let mut rho = [0u8; 32];
        let mut sigma = [0u8; 32];
        rho.copy_from_slice(&expanded[..32]);
        sigma.copy_from_slice(&expanded[32..]);
        expanded.zeroize();

        let a = Sampler::expand_matrix(ring, &rho, k, k)?;
        let mut noise = Sampler::from_seed(ring, sigma);
        sigma.zeroize();

        let s = noise.centered_binomial_vec(self.params.eta1, k)?;
        let e = noise.centered_binomial_vec(self.params.eta1, k)?;
        let t = a.mul_vec(&s)?.add(&e)?;

        let public_key = KyberPublicKey { t, rho };
        debug!("Kyber key pair generated, fingerprint {}", public_key.fingerprint());
        Ok(KyberKeyPair {
            public_key,
            secret_key: KyberSecretKey { s },
        })
    }

    /// Encapsulate a fresh shared secret to `public_key`
    pub fn encapsulate(&self, public_key: &KyberPublicKey) -> CryptoResult<(KyberCiphertext, SecureBytes)> {
        let mut sampler = Sampler::from_entropy(self.params.ring);
        self.encapsulate_with_sampler(public_key, &mut sampler)
    }

    /// Encapsulate drawing `r`, `e1`, `e2` and `mu` from `sampler`
    pub fn encapsulate_with_sampler(
        &self,
        public_key: &KyberPublicKey,
        sampler: &mut Sampler,
    ) -> CryptoResult<(KyberCiphertext, SecureBytes)> {
        let ring = self.params.ring;
        let k = self.params.k;
        check_sampler(ring, sampler)?;
        public_key.t.expect_shape(ring, k, "kyber_encapsulate")?;

        let a = Sampler::expand_matrix(ring, &public_key.rho, k, k)?;
        let r = sampler.centered_binomial_vec(self.params.eta2, k)?;
        let e1 = sampler.centered_binomial_vec(self.params.eta2, k)?;
        let e2 = sampler.centered_binomial(self.params.eta2)?;

        let u = a.transpose_mul_vec(&r)?.add(&e1)?;

        let mut mu = SecureBytes::zeroed(self.params.message_size);
        sampler.fill_bytes(mu.as_bytes_mut());
        let mu_poly = encode_message(ring, mu.as_bytes())?;
        let v = public_key.t.dot(&r)?.add(&e2)?.add(&mu_poly)?;

        let ciphertext = KyberCiphertext {
            u: u
                .iter()
                .map(|poly| poly.compress(self.params.du))
                .collect::<CryptoResult<Vec<_>>>()?,
            v: v.compress(self.params.dv)?,
        };
        let shared_secret = SecureBytes::from(self.hash.digest(mu.as_bytes()));

        debug!(
            "Kyber encapsulation to {} produced a {}-byte ciphertext",
            public_key.fingerprint(),
            self.params.ciphertext_size()
        );
        Ok((ciphertext, shared_secret))
    }

    /// Recover the shared secret from `ciphertext`.
    ///
    /// Only a ciphertext or key of the wrong shape is an error. If the noise
    /// pushed a coefficient across the decision boundary the result is simply
    /// a different secret.
    pub fn decapsulate(
        &self,
        ciphertext: &KyberCiphertext,
        secret_key: &KyberSecretKey,
    ) -> CryptoResult<SecureBytes> {
        let ring = self.params.ring;
        ciphertext.check_shape(&self.params)?;
        secret_key.s.expect_shape(ring, self.params.k, "kyber_decapsulate")?;

        let u = PolyVec::new(
            ciphertext
                .u
                .iter()
                .map(|poly| poly.decompress(ring))
                .collect::<CryptoResult<Vec<_>>>()?,
        )?;
        let v = ciphertext.v.decompress(ring)?;

        let mut noisy_mu = v.sub(&secret_key.s.dot(&u)?)?;
        let mut mu = decode_message(&noisy_mu, self.params.message_size);
        noisy_mu.zeroize();

        let shared_secret = with_secure_scope(&mut mu, |mu| SecureBytes::from(self.hash.digest(mu)));
        debug!("Kyber decapsulation complete");
        Ok(shared_secret)
    }
}

fn check_sampler(ring: RingParams, sampler: &Sampler) -> CryptoResult<()> {
    if sampler.params() != ring {
        return Err(CryptoError::parameter_mismatch(
            "kyber_sampler",
            &ring.to_string(),
            &sampler.params().to_string(),
            error_codes::RING_MODULUS_MISMATCH,
        ));
    }
    Ok(())
}

/// Spread the bits of `message` over the ring: bit i (byte i/8, bit i%8,
/// least significant first) becomes coefficient i, set to q/2 for a one and
/// 0 for a zero. Coefficients past the last message bit stay 0.
pub fn encode_message(params: RingParams, message: &[u8]) -> CryptoResult<RingElement> {
    if message.len() * 8 > params.n {
        return Err(CryptoError::parameter_mismatch(
            "encode_message",
            &format!("at most {} bytes", params.n / 8),
            &format!("{} bytes", message.len()),
            error_codes::RING_DIMENSION_MISMATCH,
        ));
    }
    let half = params.q / 2;
    let mut coeffs = vec![0u32; params.n];
    for (i, coeff) in coeffs.iter_mut().enumerate().take(message.len() * 8) {
        if (message[i / 8] >> (i % 8)) & 1 == 1 {
            *coeff = half;
        }
    }
    RingElement::from_coeffs(params, coeffs)
}

/// Inverse of [`encode_message`] for a noisy element: coefficient i reads as
/// a one when it is circularly closer to q/2 than to 0.
pub fn decode_message(noisy: &RingElement, message_size: usize) -> Vec<u8> {
    let q = noisy.params().q;
    let half = q / 2;
    let circular = |a: u32, b: u32| {
        let d = if a > b { a - b } else { b - a };
        d.min(q - d)
    };
    let mut message = vec![0u8; message_size];
    for (i, &c) in noisy.coeffs().iter().enumerate().take(message_size * 8) {
        if circular(c, half) < circular(c, 0) {
            message[i / 8] |= 1 << (i % 8);
        }
    }
    message
}
