/*!
 * Sampling of ring elements
 *
 * Uniform bounded coefficients (public matrices, masking vectors), centered
 * binomial noise (KEM secrets and errors), and the deterministic ternary
 * challenge shared by signer and verifier.
 */

mod sampler;

pub use sampler::{cbd_buffer_len, cbd_from_bytes, Sampler};

#[cfg(test)]
mod tests;
