//! Coefficient compression and bit packing
//!
//! Compression maps c in [0, q) to round(c * 2^d / q) mod 2^d and
//! decompression maps v back to round(v * q / 2^d). The round trip is lossy:
//! the result is within about q / 2^(d+1) of the input, measured circularly.

use serde::{Deserialize, Serialize};

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::params::RingParams;
use crate::ring::RingElement;

/// Quantize one coefficient to `d` bits
pub fn compress_coeff(c: u32, d: u32, q: u32) -> u32 {
    let numerator = ((c as u64) << (d + 1)) + q as u64;
    ((numerator / (2 * q as u64)) as u32) & ((1 << d) - 1)
}

/// Map a `d`-bit value back into [0, q)
pub fn decompress_coeff(v: u32, d: u32, q: u32) -> u32 {
    let numerator = 2 * v as u64 * q as u64 + (1u64 << d);
    (numerator >> (d + 1)) as u32
}

/// Coefficients of one polynomial after compression
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCompressedPoly")]
pub struct CompressedPoly {
    /// Bits per coefficient
    bits: u32,
    /// Quantized coefficients, each below 2^bits
    values: Vec<u16>,
}

#[derive(Deserialize)]
struct RawCompressedPoly {
    bits: u32,
    values: Vec<u16>,
}

impl TryFrom<RawCompressedPoly> for CompressedPoly {
    type Error = CryptoError;

    fn try_from(raw: RawCompressedPoly) -> CryptoResult<Self> {
        if raw.bits == 0 || raw.bits > 16 {
            return Err(CryptoError::ring_error(
                "decode_compressed",
                &format!("unsupported width of {} bits", raw.bits),
                error_codes::RING_INVALID_COMPRESSION,
            ));
        }
        if let Some(&v) = raw.values.iter().find(|&&v| (v as u32) >> raw.bits != 0) {
            return Err(CryptoError::ring_error(
                "decode_compressed",
                &format!("value {} does not fit in {} bits", v, raw.bits),
                error_codes::RING_INVALID_COMPRESSION,
            ));
        }
        Ok(Self {
            bits: raw.bits,
            values: raw.values,
        })
    }
}

impl CompressedPoly {
    pub(crate) fn new(bits: u32, values: Vec<u32>) -> Self {
        Self {
            bits,
            values: values.into_iter().map(|v| v as u16).collect(),
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn values(&self) -> &[u16] {
        &self.values
    }

    /// Map every value back into the ring
    pub fn decompress(&self, params: RingParams) -> CryptoResult<RingElement> {
        if self.values.len() != params.n {
            return Err(CryptoError::parameter_mismatch(
                "ring_decompress",
                &format!("{} coefficients", params.n),
                &format!("{} coefficients", self.values.len()),
                error_codes::RING_DIMENSION_MISMATCH,
            ));
        }
        let coeffs = self
            .values
            .iter()
            .map(|&v| decompress_coeff(v as u32, self.bits, params.q))
            .collect();
        RingElement::from_coeffs(params, coeffs)
    }

    /// Pack into `bits * n / 8` bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        pack_bits(&self.values, self.bits)
    }

    /// Inverse of [`CompressedPoly::to_bytes`] for a polynomial with `count` coefficients
    pub fn from_bytes(bytes: &[u8], bits: u32, count: usize) -> CryptoResult<Self> {
        Ok(Self {
            bits,
            values: unpack_bits(bytes, bits, count)?,
        })
    }
}

/// Number of bytes needed to hold `count` values of `bits` bits each
pub fn packed_len(bits: u32, count: usize) -> usize {
    (bits as usize * count + 7) / 8
}

/// Concatenate the low `bits` bits of every value, least significant bit first
pub fn pack_bits(values: &[u16], bits: u32) -> Vec<u8> {
    let mut out = vec![0u8; packed_len(bits, values.len())];
    let mut pos = 0usize;
    for &value in values {
        for b in 0..bits {
            if (value >> b) & 1 == 1 {
                out[pos / 8] |= 1 << (pos % 8);
            }
            pos += 1;
        }
    }
    out
}

/// Read `count` values of `bits` bits each, as written by [`pack_bits`]
pub fn unpack_bits(bytes: &[u8], bits: u32, count: usize) -> CryptoResult<Vec<u16>> {
    if bits == 0 || bits > 16 {
        return Err(CryptoError::ring_error(
            "unpack_bits",
            &format!("unsupported width of {} bits", bits),
            error_codes::RING_INVALID_COMPRESSION,
        ));
    }
    let expected = packed_len(bits, count);
    if bytes.len() != expected {
        return Err(CryptoError::ring_error(
            "unpack_bits",
            &format!("expected {} bytes, got {}", expected, bytes.len()),
            error_codes::RING_INVALID_COMPRESSION,
        ));
    }
    let mut values = Vec::with_capacity(count);
    let mut pos = 0usize;
    for _ in 0..count {
        let mut value = 0u16;
        for b in 0..bits {
            let bit = (bytes[pos / 8] >> (pos % 8)) & 1;
            value |= (bit as u16) << b;
            pos += 1;
        }
        values.push(value);
    }
    Ok(values)
}
