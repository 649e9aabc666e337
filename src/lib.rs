/*!
 * Lattice Toy Cryptography
 *
 * Small, readable lattice-based public-key primitives over the polynomial
 * ring Z_q[X]/(X^N+1):
 *
 * - A Kyber-style key encapsulation mechanism (KEM)
 * - A Dilithium-style Fiat-Shamir-with-aborts signature scheme
 * - A scalar LWE one-bit KEM
 *
 * Multiplication is schoolbook and nothing here is constant time. These are
 * teaching and experimentation tools, not production cryptography.
 */

/// Common error types
pub mod error;

/// Parameter sets for every scheme
pub mod params;

/// Pluggable hash functions
pub mod hash;

/// Polynomial ring arithmetic, vectors, matrices and compression
pub mod ring;

/// Uniform, centered binomial and challenge sampling
pub mod sampling;

/// Module-lattice key encapsulation
pub mod kyber;

/// Fiat-Shamir-with-aborts signatures
pub mod dilithium;

/// Scalar LWE key encapsulation
pub mod lwe;

/// Secure memory handling utilities
pub mod secure_memory;

/// Utilities for cryptographic operations
pub mod utils;

// Re-export main types for convenience
pub use dilithium::{DilithiumKeyPair, DilithiumPublicKey, DilithiumSignature, DilithiumSigner};
pub use error::{CryptoError, CryptoResult};
pub use kyber::{KyberCiphertext, KyberKem, KyberKeyPair, KyberPublicKey};
pub use params::{DilithiumParameters, KyberParameters, LweParameters, RingParams};
pub use ring::{PolyMatrix, PolyVec, RingElement};

/// Initialize the library.
///
/// Logs the compiled-in parameter sets at debug level and checks that they
/// are consistent. No global state is created.
///
/// # Example
///
/// ```
/// use lattice_toy::prelude::*;
///
/// fn main() -> Result<(), CryptoError> {
///     init()?;
///     let kem = KyberKem::new(KyberParameters::toy())?;
///     let key_pair = kem.keygen()?;
///     let (ciphertext, secret) = kem.encapsulate(&key_pair.public_key)?;
///     assert_eq!(kem.decapsulate(&ciphertext, &key_pair.secret_key)?, secret);
///     Ok(())
/// }
/// ```
pub fn init() -> CryptoResult<()> {
    let kyber = KyberParameters::toy();
    let dilithium = DilithiumParameters::toy();
    kyber.validate()?;
    dilithium.validate()?;
    LweParameters::toy().validate()?;
    log::debug!("KEM ring {}, signature ring {}", kyber.ring, dilithium.ring);
    Ok(())
}

/// The most commonly used types and functions
pub mod prelude {
    pub use crate::dilithium::{
        DilithiumKeyPair, DilithiumPublicKey, DilithiumSecretKey, DilithiumSignature, DilithiumSigner,
    };
    pub use crate::error::{CryptoError, CryptoResult};
    pub use crate::hash::{Blake3Hash, HashFunction, Sha256Hash, Sha3_256Hash, Shake256Hash};
    pub use crate::init;
    pub use crate::kyber::{KyberCiphertext, KyberKem, KyberKeyPair, KyberPublicKey, KyberSecretKey};
    pub use crate::lwe::{LweCiphertext, LweKem, LwePublicKey, LweSecretKey};
    pub use crate::params::{DilithiumParameters, KyberParameters, LweParameters, RingParams};
    pub use crate::ring::{PolyMatrix, PolyVec, RingElement};
    pub use crate::sampling::Sampler;
    pub use crate::secure_memory::{with_secure_scope, SecureBytes};
}
