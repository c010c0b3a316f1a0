//! Per-document decryption session.

use super::cipher::CipherKind;
use super::decryptor::ObjectTreeDecryptor;
use super::encrypt_dict::{EncryptionDictionary, document_id};
use super::keys::{FileKey, authenticate, compute_file_key};
use super::options::DecryptOptions;
use super::padding::encode_password;
use crate::model::objects::{PDFDict, PDFObjRef, PDFObject};
use crate::{PdfError, Result};
use rustc_hash::FxHashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Key material fixed when the session is opened.
#[derive(Debug)]
struct SessionKeys {
    file_key: FileKey,
    string_cipher: CipherKind,
    stream_cipher: CipherKind,
    encrypt_metadata: bool,
}

/// Decrypts the indirect objects of one document.
///
/// The file key is derived exactly once, in the constructor. After that the
/// session is read-only apart from the set of decrypted references, so it
/// can be shared between threads decrypting different objects.
#[derive(Debug)]
pub struct DecryptionSession {
    keys: Option<SessionKeys>,
    doc_id: Vec<u8>,
    options: DecryptOptions,
    decrypted: Mutex<FxHashSet<PDFObjRef>>,
}

impl DecryptionSession {
    /// Open a session with default options.
    ///
    /// `encrypt` is `None` for documents without an `/Encrypt` dictionary;
    /// such a session hands every object back unchanged. A missing password
    /// is the empty password. Passwords are hashed one byte per character, so
    /// characters above U+00FF are rejected with `InvalidArgument`.
    pub fn new(
        encrypt: Option<&EncryptionDictionary>,
        doc_id: &[u8],
        password: Option<&str>,
    ) -> Result<Self> {
        Self::with_options(encrypt, doc_id, password, DecryptOptions::default())
    }

    /// Open a session with explicit options.
    pub fn with_options(
        encrypt: Option<&EncryptionDictionary>,
        doc_id: &[u8],
        password: Option<&str>,
        options: DecryptOptions,
    ) -> Result<Self> {
        let keys = match encrypt {
            None => None,
            Some(encrypt) => {
                let password = encode_password(password.unwrap_or(""))?;
                let file_key = if options.verify_password {
                    authenticate(&password, encrypt, doc_id, options.metadata_padding)?
                } else {
                    compute_file_key(&password, encrypt, doc_id, options.metadata_padding)?
                };
                debug!(
                    revision = encrypt.revision,
                    key_length = file_key.len(),
                    string_cipher = ?encrypt.string_cipher,
                    stream_cipher = ?encrypt.stream_cipher,
                    encrypt_metadata = encrypt.encrypt_metadata,
                    "opened decryption session"
                );
                Some(SessionKeys {
                    file_key,
                    string_cipher: encrypt.string_cipher,
                    stream_cipher: encrypt.stream_cipher,
                    encrypt_metadata: encrypt.encrypt_metadata,
                })
            }
        };

        Ok(Self {
            keys,
            doc_id: doc_id.to_vec(),
            options,
            decrypted: Mutex::new(FxHashSet::default()),
        })
    }

    /// Open a session straight from a parsed `/Encrypt` dictionary and the
    /// trailer `/ID` array. An empty dictionary means no encryption.
    pub fn from_encrypt_dict(
        encrypt: &PDFDict,
        ids: &[Vec<u8>],
        password: Option<&str>,
        options: DecryptOptions,
    ) -> Result<Self> {
        let doc_id = document_id(ids);
        if encrypt.is_empty() {
            return Self::with_options(None, &doc_id, password, options);
        }
        let parsed = EncryptionDictionary::from_dict(encrypt)?;
        Self::with_options(Some(&parsed), &doc_id, password, options)
    }

    /// A session for a document that is not encrypted.
    pub fn unencrypted() -> Self {
        Self {
            keys: None,
            doc_id: Vec::new(),
            options: DecryptOptions::default(),
            decrypted: Mutex::new(FxHashSet::default()),
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.keys.is_some()
    }

    pub fn file_key(&self) -> Option<&FileKey> {
        self.keys.as_ref().map(|keys| &keys.file_key)
    }

    pub fn document_id(&self) -> &[u8] {
        &self.doc_id
    }

    pub fn options(&self) -> &DecryptOptions {
        &self.options
    }

    /// Decrypt the object tree stored under `objref`.
    ///
    /// Returns a tree of the same shape with strings and stream bodies
    /// decrypted. Passing `None` (an object the caller failed to resolve) is
    /// an `InvalidArgument` error. Calling this twice for the same reference
    /// decrypts twice; callers must hand in ciphertext each time.
    pub fn decrypt(&self, objref: PDFObjRef, token: impl Into<Option<PDFObject>>) -> Result<PDFObject> {
        let Some(token) = token.into() else {
            return Err(PdfError::InvalidArgument(format!(
                "no object to decrypt for {}",
                objref
            )));
        };

        let result = match self.decryptor() {
            Some((decryptor, _)) => decryptor.decrypt(objref, token)?,
            None => token,
        };

        self.decrypted_set().insert(objref);
        Ok(result)
    }

    /// Decrypt a bare string belonging to `objref`.
    pub fn decrypt_string(&self, objref: PDFObjRef, data: &[u8]) -> Result<Vec<u8>> {
        match self.decryptor() {
            Some((decryptor, keys)) => decryptor.decrypt_leaf(objref, data, keys.string_cipher),
            None => Ok(data.to_vec()),
        }
    }

    /// Encrypt a string for `objref`; the inverse of [`Self::decrypt_string`].
    pub fn encrypt_string(&self, objref: PDFObjRef, data: &[u8]) -> Result<Vec<u8>> {
        match self.decryptor() {
            Some((decryptor, keys)) => decryptor.encrypt_leaf(objref, data, keys.string_cipher),
            None => Ok(data.to_vec()),
        }
    }

    /// Encrypt a stream body for `objref`.
    pub fn encrypt_stream_data(&self, objref: PDFObjRef, data: &[u8]) -> Result<Vec<u8>> {
        match self.decryptor() {
            Some((decryptor, keys)) => decryptor.encrypt_leaf(objref, data, keys.stream_cipher),
            None => Ok(data.to_vec()),
        }
    }

    /// Whether [`Self::decrypt`] has completed for `objref`.
    pub fn is_decrypted(&self, objref: PDFObjRef) -> bool {
        self.decrypted_set().contains(&objref)
    }

    pub fn decrypted_count(&self) -> usize {
        self.decrypted_set().len()
    }

    /// Lock the decrypted set, ignoring poisoning.
    fn decrypted_set(&self) -> MutexGuard<'_, FxHashSet<PDFObjRef>> {
        self.decrypted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn decryptor(&self) -> Option<(ObjectTreeDecryptor<'_>, &SessionKeys)> {
        self.keys.as_ref().map(|keys| {
            let decryptor = ObjectTreeDecryptor::new(
                &keys.file_key,
                keys.string_cipher,
                keys.stream_cipher,
                keys.encrypt_metadata,
                self.options.max_depth,
            );
            (decryptor, keys)
        })
    }
}
