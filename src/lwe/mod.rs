/*!
 * Scalar LWE key encapsulation
 *
 * The one-dimensional ancestor of the module KEM: a single bit hidden at q/2
 * under integer LWE noise. Handy for checking the decision rule by hand.
 */

mod scalar;

pub use scalar::{LweCiphertext, LweKem, LwePublicKey, LweSecretKey};
