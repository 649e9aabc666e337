/*!
 * Error Handling for the lattice toolkit
 *
 * Provides structured error types with numeric error codes, user-friendly
 * messages, and suggested remediation strategies.
 */

use std::collections::HashMap;
use thiserror::Error;

/// Error type for all ring, sampling, KEM and signature operations
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Parameter mismatch in {operation}: expected {expected}, got {actual}")]
    ParameterMismatch {
        operation: String,
        expected: String,
        actual: String,
        error_code: u32,
    },

    #[error("Signing aborted after {attempts} attempts without an acceptable signature")]
    SignAttemptsExhausted { attempts: usize, error_code: u32 },

    #[error("Ring operation failed: {operation} - {cause}")]
    RingError {
        operation: String,
        cause: String,
        error_code: u32,
    },

    #[error("Kyber operation failed: {operation} - {cause}")]
    KyberError {
        operation: String,
        cause: String,
        error_code: u32,
        context: HashMap<String, String>,
    },

    #[error("Dilithium operation failed: {operation} - {cause}")]
    DilithiumError {
        operation: String,
        cause: String,
        error_code: u32,
        context: HashMap<String, String>,
    },

    #[error("Invalid parameter: {parameter} - {expected} - got {actual}")]
    InvalidParameter {
        parameter: String,
        expected: String,
        actual: String,
        error_code: u32,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Random number generation failed: {cause}")]
    RandomGenerationError { cause: String, error_code: u32 },

    #[error("IO error: {0}")]
    IoError(String),
}

/// Error code constants for different error categories
pub mod error_codes {
    // Ring errors: 1000-1999
    pub const RING_DIMENSION_MISMATCH: u32 = 1001;
    pub const RING_MODULUS_MISMATCH: u32 = 1002;
    pub const RING_COEFFICIENT_OUT_OF_RANGE: u32 = 1003;
    pub const RING_INVALID_COMPRESSION: u32 = 1004;
    pub const VECTOR_DIMENSION_MISMATCH: u32 = 1005;

    // Sampling errors: 2000-2999
    pub const SAMPLING_BUFFER_TOO_SHORT: u32 = 2001;
    pub const SAMPLING_INVALID_WEIGHT: u32 = 2002;
    pub const RNG_FAILED: u32 = 2003;

    // Kyber errors: 3000-3999
    pub const KYBER_INVALID_KEY: u32 = 3004;
    pub const KYBER_INVALID_CIPHERTEXT: u32 = 3005;

    // Dilithium errors: 4000-4999
    pub const DILITHIUM_SIGN_ATTEMPTS_EXHAUSTED: u32 = 4003;
    pub const DILITHIUM_INVALID_SIGNATURE: u32 = 4004;
    pub const DILITHIUM_INVALID_KEY: u32 = 4005;

    // Parameter errors: 5000-5999
    pub const INVALID_PARAMETER_SET: u32 = 5001;

    // Encoding errors: 9000-9999
    pub const SERIALIZATION_FAILED: u32 = 9001;
    pub const IO_FAILED: u32 = 9002;
}

impl CryptoError {
    /// Get the numeric error code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            CryptoError::ParameterMismatch { error_code, .. } => *error_code,
            CryptoError::SignAttemptsExhausted { error_code, .. } => *error_code,
            CryptoError::RingError { error_code, .. } => *error_code,
            CryptoError::KyberError { error_code, .. } => *error_code,
            CryptoError::DilithiumError { error_code, .. } => *error_code,
            CryptoError::InvalidParameter { error_code, .. } => *error_code,
            CryptoError::RandomGenerationError { error_code, .. } => *error_code,
            CryptoError::SerializationError(_) => error_codes::SERIALIZATION_FAILED,
            CryptoError::IoError(_) => error_codes::IO_FAILED,
        }
    }

    /// Get a user-friendly error message
    pub fn user_friendly_message(&self) -> String {
        match self {
            CryptoError::ParameterMismatch { operation, .. } => {
                format!(
                    "Operation '{}' received operands built for different parameter sets.",
                    operation
                )
            }
            CryptoError::SignAttemptsExhausted { attempts, .. } => {
                format!(
                    "No acceptable signature was found within {} attempts.",
                    attempts
                )
            }
            CryptoError::RingError { operation, .. } => {
                format!("Polynomial ring operation '{}' failed.", operation)
            }
            CryptoError::KyberError { operation, .. } => {
                format!("Key exchange operation '{}' failed. This may affect secure communication setup.", operation)
            }
            CryptoError::DilithiumError { operation, .. } => {
                format!("Digital signature operation '{}' failed. Message authenticity cannot be verified.", operation)
            }
            CryptoError::InvalidParameter {
                parameter,
                expected,
                ..
            } => {
                format!(
                    "Invalid parameter '{}'. Expected '{}'.",
                    parameter, expected
                )
            }
            CryptoError::RandomGenerationError { .. } => {
                "Random number generation failed. Cryptographic operations may be insecure."
                    .to_string()
            }
            CryptoError::SerializationError(_) => {
                "Data serialization failed. Data format may be corrupted.".to_string()
            }
            CryptoError::IoError(_) => {
                "Input/output operation failed. Check file permissions and paths.".to_string()
            }
        }
    }

    /// Get technical details for debugging
    pub fn technical_details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();

        details.insert("error_code".to_string(), self.error_code().to_string());
        details.insert("error_type".to_string(), self.error_type().to_string());
        details.insert("timestamp".to_string(), chrono::Utc::now().to_rfc3339());

        match self {
            CryptoError::ParameterMismatch {
                operation,
                expected,
                actual,
                ..
            } => {
                details.insert("operation".to_string(), operation.clone());
                details.insert("expected".to_string(), expected.clone());
                details.insert("actual".to_string(), actual.clone());
            }
            CryptoError::SignAttemptsExhausted { attempts, .. } => {
                details.insert("attempts".to_string(), attempts.to_string());
            }
            CryptoError::RingError {
                operation, cause, ..
            } => {
                details.insert("operation".to_string(), operation.clone());
                details.insert("cause".to_string(), cause.clone());
            }
            CryptoError::KyberError {
                operation,
                cause,
                context,
                ..
            }
            | CryptoError::DilithiumError {
                operation,
                cause,
                context,
                ..
            } => {
                details.insert("operation".to_string(), operation.clone());
                details.insert("cause".to_string(), cause.clone());
                details.extend(context.clone());
            }
            CryptoError::InvalidParameter {
                parameter,
                expected,
                actual,
                ..
            } => {
                details.insert("parameter".to_string(), parameter.clone());
                details.insert("expected".to_string(), expected.clone());
                details.insert("actual".to_string(), actual.clone());
            }
            _ => {
                details.insert("details".to_string(), format!("{:?}", self));
            }
        }

        details
    }

    /// Get suggested remediation steps
    pub fn suggested_remediation(&self) -> Option<String> {
        match self {
            CryptoError::ParameterMismatch { .. } => Some(
                "Build all operands from the same parameter set; mixing KEM and signature elements is a programming error."
                    .to_string(),
            ),
            CryptoError::SignAttemptsExhausted { .. } => Some(
                "Retry signing or raise max_sign_attempts in the signature parameters.".to_string(),
            ),
            CryptoError::KyberError { error_code, .. } => match *error_code {
                error_codes::KYBER_INVALID_CIPHERTEXT => Some(
                    "Check that the ciphertext was produced for this parameter set and was not truncated."
                        .to_string(),
                ),
                _ => Some("Check Kyber parameters and input data validity.".to_string()),
            },
            CryptoError::DilithiumError { .. } => Some(
                "Check signature parameters and input data validity.".to_string(),
            ),
            CryptoError::InvalidParameter { .. } => {
                Some("Use KyberParameters::toy() or DilithiumParameters::toy() as a baseline.".to_string())
            }
            CryptoError::RandomGenerationError { .. } => Some(
                "Check system entropy sources.".to_string(),
            ),
            _ => None,
        }
    }

    /// Get the error category/type as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            CryptoError::ParameterMismatch { .. } => "ParameterMismatch",
            CryptoError::SignAttemptsExhausted { .. } => "SignAttemptsExhausted",
            CryptoError::RingError { .. } => "RingError",
            CryptoError::KyberError { .. } => "KyberError",
            CryptoError::DilithiumError { .. } => "DilithiumError",
            CryptoError::InvalidParameter { .. } => "InvalidParameter",
            CryptoError::SerializationError(_) => "SerializationError",
            CryptoError::RandomGenerationError { .. } => "RandomGenerationError",
            CryptoError::IoError(_) => "IoError",
        }
    }
}

/// Convenience constructors for common error types
impl CryptoError {
    pub fn parameter_mismatch(operation: &str, expected: &str, actual: &str, error_code: u32) -> Self {
        CryptoError::ParameterMismatch {
            operation: operation.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            error_code,
        }
    }

    pub fn sign_attempts_exhausted(attempts: usize) -> Self {
        CryptoError::SignAttemptsExhausted {
            attempts,
            error_code: error_codes::DILITHIUM_SIGN_ATTEMPTS_EXHAUSTED,
        }
    }

    pub fn ring_error(operation: &str, cause: &str, error_code: u32) -> Self {
        CryptoError::RingError {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn kyber_error(operation: &str, cause: &str, error_code: u32) -> Self {
        CryptoError::KyberError {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code,
            context: HashMap::new(),
        }
    }

    pub fn dilithium_error(operation: &str, cause: &str, error_code: u32) -> Self {
        CryptoError::DilithiumError {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code,
            context: HashMap::new(),
        }
    }

    pub fn invalid_parameter(parameter: &str, expected: &str, actual: &str) -> Self {
        CryptoError::InvalidParameter {
            parameter: parameter.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            error_code: error_codes::INVALID_PARAMETER_SET,
        }
    }

    /// Attach a key/value pair to the context map of scheme-level errors.
    /// Other variants are returned unchanged.
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        match &mut self {
            CryptoError::KyberError { context, .. } | CryptoError::DilithiumError { context, .. } => {
                context.insert(key.to_string(), value.to_string());
            }
            _ => {}
        }
        self
    }
}

// From implementations for automatic error conversion
impl From<std::io::Error> for CryptoError {
    fn from(err: std::io::Error) -> Self {
        CryptoError::IoError(format!("IO operation failed: {}", err))
    }
}

impl From<bincode::Error> for CryptoError {
    fn from(err: bincode::Error) -> Self {
        CryptoError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for CryptoError {
    fn from(err: serde_json::Error) -> Self {
        CryptoError::SerializationError(err.to_string())
    }
}

impl From<rand::Error> for CryptoError {
    fn from(err: rand::Error) -> Self {
        CryptoError::RandomGenerationError {
            cause: err.to_string(),
            error_code: error_codes::RNG_FAILED,
        }
    }
}

/// Result type alias for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;
