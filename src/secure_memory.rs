//! Secure Memory Handling Utilities
//!
//! Containers for secret material produced by the schemes: encapsulated
//! seeds, shared secrets and temporary buffers. Contents are zeroed when the
//! container is dropped, and equality is evaluated in constant time.

use std::fmt;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A byte container for sensitive data such as shared secrets.
///
/// # Security Properties
///
/// 1. Automatically zeroes memory when dropped
/// 2. `Debug` output never shows the contents
/// 3. `==` compares in constant time for equal-length inputs
///
/// # Example
///
/// ```
/// use lattice_toy::secure_memory::SecureBytes;
///
/// let secret = SecureBytes::new(&[0x01, 0x02, 0x03, 0x04]);
/// assert_eq!(secret.len(), 4);
/// assert_eq!(secret, SecureBytes::new(&[0x01, 0x02, 0x03, 0x04]));
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
pub struct SecureBytes {
    bytes: Vec<u8>,
}

impl SecureBytes {
    /// Create a new SecureBytes holding a copy of `data`
    pub fn new(data: &[u8]) -> Self {
        Self {
            bytes: data.to_vec(),
        }
    }

    /// A zero-filled buffer of `len` bytes, to be filled in place
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0u8; len],
        }
    }

    /// Read-only access to the protected bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Read-write access to the protected bytes
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hex encoding of the contents. The caller owns the returned string,
    /// which is not zeroized.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl AsRef<[u8]> for SecureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl PartialEq for SecureBytes {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.len() == other.bytes.len() && bool::from(self.bytes.ct_eq(&other.bytes))
    }
}

impl Eq for SecureBytes {}

impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureBytes([REDACTED; {}])", self.bytes.len())
    }
}

/// Run `f` on `data` and zeroize `data` afterwards, even if `f` panics.
///
/// # Example
///
/// ```
/// use lattice_toy::secure_memory::with_secure_scope;
///
/// let mut mu = [7u8; 32];
/// let first = with_secure_scope(&mut mu, |m| m[0]);
/// assert_eq!(first, 7);
/// assert_eq!(mu, [0u8; 32]);
/// ```
pub fn with_secure_scope<T, F, R>(data: &mut T, f: F) -> R
where
    T: Zeroize,
    F: FnOnce(&mut T) -> R,
{
    struct ScopeGuard<'a, T: Zeroize> {
        data: &'a mut T,
    }

    impl<T: Zeroize> Drop for ScopeGuard<'_, T> {
        fn drop(&mut self) {
            self.data.zeroize();
        }
    }

    let guard = ScopeGuard { data };
    f(guard.data)
}
