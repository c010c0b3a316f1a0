//! Key derivation for the standard security handler, revisions 2-4.
//!
//! File key: Algorithm 2. Per-object key: Algorithm 1. User check value and
//! owner password recovery: Algorithms 4, 5 and 7.

use super::encrypt_dict::EncryptionDictionary;
use super::options::MetadataPadding;
use super::padding::{PASSWORD_PADDING, pad_password};
use crate::codec::arcfour::Arcfour;
use crate::model::objects::PDFObjRef;
use crate::{PdfError, Result};
use std::fmt;
use tracing::warn;

/// Smallest file key (40-bit).
pub const MIN_KEY_LENGTH: usize = 5;
/// Largest file key for revisions 2-4 (128-bit).
pub const MAX_KEY_LENGTH: usize = 16;

/// Salt appended to the object key input for AES crypt filters.
const AES_SALT: &[u8; 4] = b"sAlT";

/// Rounds of re-hashing applied for revision 3 and later.
const REHASH_ROUNDS: usize = 50;

/// Reject revisions this handler cannot derive keys for.
///
/// 2, 3 and 4 are accepted. 5 and 6 (AES-256, SHA-256 based) are recognized
/// but unsupported; anything else is not a standard security handler.
pub fn check_revision(revision: i64) -> Result<()> {
    match revision {
        2..=4 => Ok(()),
        5 | 6 => {
            warn!(revision, "AES-256 security handler is not supported");
            Err(PdfError::UnsupportedRevision(revision))
        }
        _ => {
            warn!(revision, "unknown security handler revision");
            Err(PdfError::UnsupportedRevision(revision))
        }
    }
}

/// File encryption key, derived once per document.
#[derive(Clone, PartialEq, Eq)]
pub struct FileKey(Vec<u8>);

impl FileKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for FileKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Debug for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileKey({} bytes)", self.0.len())
    }
}

/// Compute the file encryption key from a password (Algorithm 2).
///
/// The revision is checked before anything is hashed.
pub fn compute_file_key(
    password: &[u8],
    encrypt: &EncryptionDictionary,
    doc_id: &[u8],
    metadata_padding: MetadataPadding,
) -> Result<FileKey> {
    check_revision(encrypt.revision)?;
    let n = checked_key_length(encrypt.key_length)?;

    let mut context = md5::Context::new();
    context.consume(pad_password(password));
    context.consume(&encrypt.owner);
    // P as 4 bytes little-endian
    context.consume(encrypt.permissions.to_le_bytes());
    context.consume(doc_id);
    if metadata_padding.applies(encrypt.revision, encrypt.encrypt_metadata) {
        context.consume([0xFF, 0xFF, 0xFF, 0xFF]);
    }

    let mut digest = context.finalize().0;

    if encrypt.revision >= 3 {
        for _ in 0..REHASH_ROUNDS {
            digest = md5::compute(&digest[..n]).0;
        }
    }

    Ok(FileKey(digest[..n].to_vec()))
}

/// Derive the key for one object (Algorithm 1).
///
/// The input is the file key, the low three bytes of the object number and
/// the low two bytes of the generation (both little-endian), plus the AES
/// salt when requested. The result is `min(16, file_key.len() + 5)` bytes.
pub fn object_key(file_key: &[u8], objref: PDFObjRef, use_aes: bool) -> Vec<u8> {
    let mut key_data = Vec::with_capacity(file_key.len() + 9);
    key_data.extend_from_slice(file_key);
    key_data.extend_from_slice(&objref.objid.to_le_bytes()[..3]);
    key_data.extend_from_slice(&objref.genno.to_le_bytes()[..2]);
    if use_aes {
        key_data.extend_from_slice(AES_SALT);
    }

    let hash = md5::compute(&key_data);
    let key_len = (file_key.len() + 5).min(16);
    hash.0[..key_len].to_vec()
}

/// Compute the `/U` check value for a file key (Algorithms 4 and 5).
pub fn compute_u_value(key: &[u8], revision: i64, doc_id: &[u8]) -> Result<Vec<u8>> {
    if revision == 2 {
        return Arcfour::apply(key, &PASSWORD_PADDING);
    }

    let mut context = md5::Context::new();
    context.consume(PASSWORD_PADDING);
    context.consume(doc_id);
    let hash = context.finalize();

    let mut result = Arcfour::apply(key, &hash.0)?;
    for i in 1..20u8 {
        result = Arcfour::apply(&xor_key(key, i), &result)?;
    }

    // Only the first 16 bytes are significant; the rest is arbitrary padding.
    result.extend_from_slice(&PASSWORD_PADDING[..16]);
    Ok(result)
}

/// Check a candidate file key against the stored `/U` value.
pub fn verify_user_key(key: &FileKey, encrypt: &EncryptionDictionary, doc_id: &[u8]) -> Result<bool> {
    let Some(stored) = encrypt.user.as_deref() else {
        return Err(PdfError::KeyError("U".into()));
    };
    let computed = compute_u_value(key.as_bytes(), encrypt.revision, doc_id)?;
    let significant = if encrypt.revision == 2 { 32 } else { 16 };
    Ok(computed.len() >= significant
        && stored.len() >= significant
        && computed[..significant] == stored[..significant])
}

/// Recover the padded user password from an owner password (Algorithm 7).
pub fn recover_user_password(owner_password: &[u8], encrypt: &EncryptionDictionary) -> Result<Vec<u8>> {
    check_revision(encrypt.revision)?;
    let n = checked_key_length(encrypt.key_length)?;

    let mut hash = md5::compute(pad_password(owner_password)).0;
    if encrypt.revision >= 3 {
        for _ in 0..REHASH_ROUNDS {
            hash = md5::compute(hash).0;
        }
    }
    let key = &hash[..n];

    if encrypt.revision == 2 {
        return Arcfour::apply(key, &encrypt.owner);
    }

    let mut result = encrypt.owner.clone();
    for i in (0..20u8).rev() {
        result = Arcfour::apply(&xor_key(key, i), &result)?;
    }
    Ok(result)
}

/// Derive the file key and prove it against `/U`, trying the password as
/// the user password first and then as the owner password.
pub fn authenticate(
    password: &[u8],
    encrypt: &EncryptionDictionary,
    doc_id: &[u8],
    metadata_padding: MetadataPadding,
) -> Result<FileKey> {
    let key = compute_file_key(password, encrypt, doc_id, metadata_padding)?;
    if verify_user_key(&key, encrypt, doc_id)? {
        return Ok(key);
    }

    let user_password = recover_user_password(password, encrypt)?;
    let key = compute_file_key(&user_password, encrypt, doc_id, metadata_padding)?;
    if verify_user_key(&key, encrypt, doc_id)? {
        return Ok(key);
    }

    Err(PdfError::IncorrectPassword)
}

fn checked_key_length(n: usize) -> Result<usize> {
    if (MIN_KEY_LENGTH..=MAX_KEY_LENGTH).contains(&n) {
        Ok(n)
    } else {
        Err(PdfError::EncryptionError(format!(
            "file key length must be {MIN_KEY_LENGTH}-{MAX_KEY_LENGTH} bytes, got {n}"
        )))
    }
}

fn xor_key(key: &[u8], i: u8) -> Vec<u8> {
    key.iter().map(|b| b ^ i).collect()
}
