/*!
 * Kyber-style key encapsulation
 *
 * Key generation, encapsulation and decapsulation built on the ring and
 * sampling modules, with a bit-packed ciphertext encoding.
 */

mod kyber;

pub use kyber::*;
