//! Error types for pdfcrypt.

use thiserror::Error;

/// Primary error type for security handler operations.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Revision outside 2..=6, or a recognized AES-256 revision (5, 6).
    #[error("unsupported security handler revision: R={0}")]
    UnsupportedRevision(i64),

    /// AES payload decryption was requested.
    #[error("unsupported cipher: {0}")]
    UnsupportedCipher(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("object nesting exceeds depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("type error: expected {expected}, got {got}")]
    TypeError {
        expected: &'static str,
        got: &'static str,
    },

    #[error("key not found: {0}")]
    KeyError(String),

    #[error("encryption error: {0}")]
    EncryptionError(String),
}

impl PdfError {
    /// True for conditions caused by a feature this handler does not
    /// implement, as opposed to a damaged document or a bad password.
    pub const fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedRevision(_) | Self::UnsupportedCipher(_)
        )
    }
}

/// Convenience Result type alias for PdfError.
pub type Result<T> = std::result::Result<T, PdfError>;
