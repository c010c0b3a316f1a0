//! Payload ciphers selected by the encryption dictionary.

use crate::codec::arcfour::Arcfour;
use crate::{PdfError, Result};
use tracing::warn;

/// A symmetric cipher keyed by a per-object key.
pub trait SymmetricCipher {
    fn encrypt(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>>;
    fn decrypt(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>>;
}

/// RC4 keystream: output length equals input length, no IV, no padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rc4Cipher;

impl SymmetricCipher for Rc4Cipher {
    fn encrypt(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        Arcfour::apply(key, data)
    }

    fn decrypt(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        Arcfour::apply(key, data)
    }
}

/// AES in CBC mode with a 16-byte IV prefix (AESV2 / AESV3 crypt filters).
///
/// Recognized so such documents fail loudly, but not implemented.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesCbcCipher;

impl AesCbcCipher {
    fn unsupported(key: &[u8]) -> PdfError {
        let bits = key.len() * 8;
        warn!(bits, "AES payload decryption requested");
        PdfError::UnsupportedCipher(format!("AES-{bits} CBC is not implemented"))
    }
}

impl SymmetricCipher for AesCbcCipher {
    fn encrypt(&self, key: &[u8], _data: &[u8]) -> Result<Vec<u8>> {
        Err(Self::unsupported(key))
    }

    fn decrypt(&self, key: &[u8], _data: &[u8]) -> Result<Vec<u8>> {
        Err(Self::unsupported(key))
    }
}

/// Cipher selected once per session for strings or for streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherKind {
    /// `/Identity` crypt filter: bytes pass through.
    Identity,
    /// RC4 (`/V` 1 and 2, or the `/V2` crypt filter method).
    Stream,
    /// AES-CBC (`/AESV2`, `/AESV3`). Always fails.
    BlockChained,
}

impl CipherKind {
    /// Whether the object key takes the AES salt.
    pub const fn uses_aes(self) -> bool {
        matches!(self, Self::BlockChained)
    }
}

impl SymmetricCipher for CipherKind {
    fn encrypt(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Identity => Ok(data.to_vec()),
            Self::Stream => Rc4Cipher.encrypt(key, data),
            Self::BlockChained => AesCbcCipher.encrypt(key, data),
        }
    }

    fn decrypt(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Identity => Ok(data.to_vec()),
            Self::Stream => Rc4Cipher.decrypt(key, data),
            Self::BlockChained => AesCbcCipher.decrypt(key, data),
        }
    }
}
