/*!
 * Dilithium-style digital signatures
 *
 * Key generation, signing with a bounded abort loop, and verification over
 * the signature ring.
 */

mod dilithium;
pub mod rounding;

pub use dilithium::*;
pub use rounding::{decompose, high_bits, high_bits_vec, low_bits};

#[cfg(test)]
mod tests;
