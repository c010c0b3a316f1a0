//! Password padding (Algorithm 2, step a).

use crate::{PdfError, Result};

/// Password padding constant from PDF spec.
pub const PASSWORD_PADDING: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// Pad or truncate a password to exactly 32 bytes.
///
/// The first `min(len, 32)` bytes come from the password, the rest from the
/// start of [`PASSWORD_PADDING`]. An empty password yields the constant itself.
pub fn pad_password(password: &[u8]) -> [u8; 32] {
    let mut padded = PASSWORD_PADDING;
    let len = password.len().min(32);
    padded[..len].copy_from_slice(&password[..len]);
    if len < 32 {
        padded[len..].copy_from_slice(&PASSWORD_PADDING[..32 - len]);
    }
    padded
}

/// Encode a text password one byte per character.
///
/// Revisions 2-4 hash passwords as single-byte strings, so every character
/// must be in U+0000..=U+00FF. Anything above fails with `InvalidArgument`.
pub fn encode_password(password: &str) -> Result<Vec<u8>> {
    password
        .chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| {
                PdfError::InvalidArgument(format!(
                    "password character {:?} has no single-byte encoding",
                    c
                ))
            })
        })
        .collect()
}
