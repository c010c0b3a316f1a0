//! Recursive decryption of one indirect object's tree.
//!
//! Strings and stream bodies are decrypted with the key of the indirect
//! object that contains them. Cross-reference streams, metadata streams of
//! documents that leave metadata in clear, crypt filter dictionaries and the
//! `/Contents` of signature dictionaries are left alone.

use super::cipher::{CipherKind, SymmetricCipher};
use super::keys::{FileKey, object_key};
use crate::model::objects::{PDFDict, PDFObjRef, PDFObject, PDFStream, dict_type};
use crate::{PdfError, Result};
use tracing::{debug, trace};

/// Dictionary types whose `/Contents` holds a signature, not document text.
const SIGNATURE_TYPES: [&str; 2] = ["Sig", "DocTimeStamp"];

/// Keys that mark a dictionary as crypt filter plumbing.
const CRYPT_FILTER_KEYS: [&str; 2] = ["CF", "CFM"];

/// Walks an object tree and rebuilds it with decrypted leaves.
///
/// Holds only shared, read-only state, so one decryptor may serve any number
/// of threads at once.
#[derive(Debug, Clone, Copy)]
pub struct ObjectTreeDecryptor<'a> {
    file_key: &'a FileKey,
    string_cipher: CipherKind,
    stream_cipher: CipherKind,
    encrypt_metadata: bool,
    max_depth: usize,
}

impl<'a> ObjectTreeDecryptor<'a> {
    pub fn new(
        file_key: &'a FileKey,
        string_cipher: CipherKind,
        stream_cipher: CipherKind,
        encrypt_metadata: bool,
        max_depth: usize,
    ) -> Self {
        Self {
            file_key,
            string_cipher,
            stream_cipher,
            encrypt_metadata,
            max_depth,
        }
    }

    /// Decrypt every string and stream reachable from `obj`.
    pub fn decrypt(&self, objref: PDFObjRef, obj: PDFObject) -> Result<PDFObject> {
        self.decrypt_object(objref, obj, 0)
    }

    /// Decrypt one string or stream body of the object `objref`.
    pub fn decrypt_leaf(&self, objref: PDFObjRef, data: &[u8], cipher: CipherKind) -> Result<Vec<u8>> {
        let key = self.leaf_key(objref, cipher)?;
        trace!(objid = objref.objid, genno = objref.genno, len = data.len(), "decrypt leaf");
        cipher.decrypt(&key, data)
    }

    /// Inverse of [`Self::decrypt_leaf`].
    pub fn encrypt_leaf(&self, objref: PDFObjRef, data: &[u8], cipher: CipherKind) -> Result<Vec<u8>> {
        let key = self.leaf_key(objref, cipher)?;
        cipher.encrypt(&key, data)
    }

    fn leaf_key(&self, objref: PDFObjRef, cipher: CipherKind) -> Result<Vec<u8>> {
        if cipher.uses_aes() || self.file_key.len() == 32 {
            return Err(PdfError::UnsupportedCipher(format!(
                "AES crypt filter on object {}",
                objref
            )));
        }
        Ok(object_key(self.file_key.as_bytes(), objref, false))
    }

    fn decrypt_object(&self, objref: PDFObjRef, obj: PDFObject, depth: usize) -> Result<PDFObject> {
        if depth > self.max_depth {
            return Err(PdfError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }

        match obj {
            PDFObject::Stream(stream) => self.decrypt_stream(objref, *stream, depth),
            PDFObject::String(data) => Ok(PDFObject::String(self.decrypt_leaf(
                objref,
                &data,
                self.string_cipher,
            )?)),
            PDFObject::Dict(dict) => {
                let shell = PDFObject::Dict(PDFDict::with_capacity(dict.len()));
                self.decrypt_entries(objref, dict, shell, depth)
            }
            PDFObject::Array(items) => items
                .into_iter()
                .map(|item| self.decrypt_object(objref, item, depth + 1))
                .collect::<Result<Vec<_>>>()
                .map(PDFObject::Array),
            other => Ok(other),
        }
    }

    fn decrypt_stream(&self, objref: PDFObjRef, stream: PDFStream, depth: usize) -> Result<PDFObject> {
        if stream.has_type("XRef") {
            debug!(%objref, "cross-reference stream left in clear");
            return Ok(PDFObject::Stream(Box::new(stream)));
        }
        if !self.encrypt_metadata && stream.has_type("Metadata") {
            debug!(%objref, "metadata stream left in clear");
            return Ok(PDFObject::Stream(Box::new(stream)));
        }

        let (attrs, rawdata) = stream.into_parts();
        let data = self.decrypt_leaf(objref, &rawdata, self.stream_cipher)?;
        let shell = PDFObject::Stream(Box::new(PDFStream::new(
            PDFDict::with_capacity(attrs.len()),
            data,
        )));
        self.decrypt_entries(objref, attrs, shell, depth)
    }

    /// Rebuild `shell` one entry at a time from `entries`, decrypting the
    /// values that may hold strings.
    fn decrypt_entries(
        &self,
        objref: PDFObjRef,
        entries: PDFDict,
        shell: PDFObject,
        depth: usize,
    ) -> Result<PDFObject> {
        let in_clear = CRYPT_FILTER_KEYS.iter().any(|key| entries.contains_key(*key));
        if in_clear {
            debug!(%objref, "crypt filter dictionary left in clear");
        }
        let is_signature = dict_type(&entries).is_some_and(|t| SIGNATURE_TYPES.contains(&t));

        entries
            .into_iter()
            .try_fold(shell, |rebuilt, (key, value)| -> Result<PDFObject> {
                let value = if in_clear {
                    value
                } else if is_signature && key == "Contents" {
                    debug!(%objref, "signature contents left in clear");
                    value
                } else {
                    match value {
                        PDFObject::String(_) | PDFObject::Array(_) | PDFObject::Dict(_) => {
                            self.decrypt_object(objref, value, depth + 1)?
                        }
                        scalar => scalar,
                    }
                };
                rebuilt.with_entry(key, value)
            })
    }
}
