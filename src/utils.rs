use rand::{rngs::OsRng, RngCore};

use crate::error::{CryptoError, CryptoResult};

/// Generate random bytes of the specified length
pub fn random_bytes(length: usize) -> CryptoResult<Vec<u8>> {
    let mut bytes = vec![0u8; length];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(bytes)
}

/// Fresh 32-byte seed from the operating system
pub fn random_seed() -> CryptoResult<[u8; 32]> {
    let mut seed = [0u8; 32];
    OsRng.try_fill_bytes(&mut seed)?;
    Ok(seed)
}

/// Constant-time comparison of two byte slices.
///
/// Slices of different length compare unequal without looking at the
/// contents.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    use subtle::ConstantTimeEq;
    a.ct_eq(b).into()
}

/// Convert bytes to a lowercase hexadecimal string
pub fn to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Convert a hexadecimal string to bytes
pub fn from_hex(hex_str: &str) -> CryptoResult<Vec<u8>> {
    hex::decode(hex_str).map_err(|e| {
        CryptoError::invalid_parameter("hex", "an even-length hexadecimal string", &e.to_string())
    })
}

/// Concatenate multiple byte slices
pub fn concat_bytes(slices: &[&[u8]]) -> Vec<u8> {
    let total_len = slices.iter().map(|s| s.len()).sum();
    let mut result = Vec::with_capacity(total_len);
    for slice in slices {
        result.extend_from_slice(slice);
    }
    result
}
