/*!
 * Polynomial ring Z_q[X]/(X^N + 1)
 *
 * This module provides the ring element type shared by the KEM and the
 * signature scheme, fixed-dimension vector and matrix containers, and the
 * lossy coefficient compression used by KEM ciphertexts.
 */

mod compression;
mod matrix;
mod polynomial;

pub use compression::{
    compress_coeff, decompress_coeff, pack_bits, packed_len, unpack_bits, CompressedPoly,
};
pub use matrix::{PolyMatrix, PolyVec};
pub use polynomial::RingElement;
