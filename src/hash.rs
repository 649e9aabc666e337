//! Hash collaborators
//!
//! The KDF and the challenge derivation only need "some fixed-output hash";
//! schemes hold an `Arc<dyn HashFunction>` so callers can plug in whichever
//! digest they prefer.

use std::fmt;

use sha2::Sha256;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Shake256};

use crate::error::{CryptoError, CryptoResult};

/// A fixed-output hash function
pub trait HashFunction: Send + Sync {
    /// Human readable name, used in logs and error context
    fn name(&self) -> &'static str;

    /// Length of every digest in bytes
    fn output_size(&self) -> usize;

    /// Hash arbitrary input bytes
    fn digest(&self, data: &[u8]) -> Vec<u8>;
}

impl fmt::Debug for dyn HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashFunction({})", self.name())
    }
}

/// SHA3-256
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha3_256Hash;

impl HashFunction for Sha3_256Hash {
    fn name(&self) -> &'static str {
        "SHA3-256"
    }

    fn output_size(&self) -> usize {
        32
    }

    fn digest(&self, data: &[u8]) -> Vec<u8> {
        Sha3_256::digest(data).to_vec()
    }
}

/// SHA-256
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hash;

impl HashFunction for Sha256Hash {
    fn name(&self) -> &'static str {
        "SHA-256"
    }

    fn output_size(&self) -> usize {
        32
    }

    fn digest(&self, data: &[u8]) -> Vec<u8> {
        Sha256::digest(data).to_vec()
    }
}

/// BLAKE3 in its default 256-bit mode
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hash;

impl HashFunction for Blake3Hash {
    fn name(&self) -> &'static str {
        "BLAKE3"
    }

    fn output_size(&self) -> usize {
        blake3::OUT_LEN
    }

    fn digest(&self, data: &[u8]) -> Vec<u8> {
        blake3::hash(data).as_bytes().to_vec()
    }
}

/// SHAKE-256 squeezed to a fixed output length
#[derive(Debug, Clone, Copy)]
pub struct Shake256Hash {
    output_size: usize,
}

impl Shake256Hash {
    pub fn new(output_size: usize) -> Self {
        Self { output_size }
    }
}

impl Default for Shake256Hash {
    fn default() -> Self {
        Self::new(32)
    }
}

impl HashFunction for Shake256Hash {
    fn name(&self) -> &'static str {
        "SHAKE-256"
    }

    fn output_size(&self) -> usize {
        self.output_size
    }

    fn digest(&self, data: &[u8]) -> Vec<u8> {
        let mut hasher = Shake256::default();
        Update::update(&mut hasher, data);
        let mut reader = hasher.finalize_xof();
        let mut out = vec![0u8; self.output_size];
        reader.read(&mut out);
        out
    }
}

/// Reject collaborators that produce empty digests, which could never fill
/// an [`expand_seed`] output.
pub fn check_hash(hash: &dyn HashFunction) -> CryptoResult<()> {
    if hash.output_size() == 0 {
        return Err(CryptoError::invalid_parameter(
            "hash",
            "a digest of at least one byte",
            &format!("{} with 0-byte output", hash.name()),
        ));
    }
    Ok(())
}

/// Stretch `input` to `len` bytes by concatenating `H(input || counter)`
/// for counter = 0, 1, 2, ... (big-endian u32).
pub fn expand_seed(hash: &dyn HashFunction, input: &[u8], len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len + hash.output_size());
    let mut block = Vec::with_capacity(input.len() + 4);
    let mut counter: u32 = 0;
    while out.len() < len {
        block.clear();
        block.extend_from_slice(input);
        block.extend_from_slice(&counter.to_be_bytes());
        out.extend_from_slice(&hash.digest(&block));
        counter = counter.wrapping_add(1);
    }
    out.truncate(len);
    out
}

/// Same as [`expand_seed`] but returns a 32-byte RNG seed.
pub fn derive_seed(hash: &dyn HashFunction, input: &[u8]) -> [u8; 32] {
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&expand_seed(hash, input, 32));
    seed
}
