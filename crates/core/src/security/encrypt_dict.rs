//! The `/Encrypt` dictionary fields the standard security handler consumes.

use super::cipher::CipherKind;
use super::keys::check_revision;
use crate::model::objects::{PDFDict, PDFObject};
use crate::{PdfError, Result};
use tracing::warn;

/// Standard security handler parameters, read from `/Encrypt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionDictionary {
    /// Algorithm code (`/V`).
    pub version: i64,
    /// Security handler revision (`/R`).
    pub revision: i64,
    /// File key length in bytes.
    pub key_length: usize,
    /// Owner password check value (`/O`).
    pub owner: Vec<u8>,
    /// User password check value (`/U`), only needed for authentication.
    pub user: Option<Vec<u8>>,
    /// Permission flags (`/P`), reinterpreted as unsigned.
    pub permissions: u32,
    /// Whether metadata streams are encrypted (`/EncryptMetadata`).
    pub encrypt_metadata: bool,
    /// Cipher for strings (`/StrF`).
    pub string_cipher: CipherKind,
    /// Cipher for stream bodies (`/StmF`).
    pub stream_cipher: CipherKind,
}

impl EncryptionDictionary {
    /// RC4 parameters for a revision 2-4 handler without crypt filters.
    pub fn rc4(revision: i64, key_length: usize, owner: &[u8], permissions: i32) -> Self {
        Self {
            version: if key_length == 5 { 1 } else { 2 },
            revision,
            key_length,
            owner: owner.to_vec(),
            user: None,
            permissions: permissions as u32,
            encrypt_metadata: true,
            string_cipher: CipherKind::Stream,
            stream_cipher: CipherKind::Stream,
        }
    }

    /// Read the handler parameters from a parsed `/Encrypt` dictionary.
    ///
    /// Fails with `UnsupportedRevision` for anything but revisions 2-4
    /// before any other field is looked at.
    pub fn from_dict(encrypt: &PDFDict) -> Result<Self> {
        let entries = Entries(encrypt);
        let revision = entries.required("R")?.as_int()?;
        check_revision(revision)?;

        if let Some(filter) = encrypt.get("Filter") {
            let name = filter.as_name()?;
            if name != "Standard" {
                return Err(PdfError::EncryptionError(format!(
                    "Unsupported security handler: /{}",
                    name
                )));
            }
        }

        let version = entries.optional("V", PDFObject::as_int).unwrap_or(0);
        let owner = entries.required("O")?.as_string()?.to_vec();
        let user = encrypt.get("U").map(|u| u.as_string().map(<[u8]>::to_vec)).transpose()?;
        // /P is written signed; only the low 32 bits matter.
        let permissions = entries.required("P")?.as_int()? as u32;
        let encrypt_metadata = entries
            .optional("EncryptMetadata", PDFObject::as_bool)
            .unwrap_or(true);

        let key_length = if version == 1 {
            5
        } else {
            let default_bits = if version >= 4 { 128 } else { 40 };
            let bits = entries.optional("Length", PDFObject::as_int).unwrap_or(default_bits);
            let clamped = bits.clamp(40, 128);
            if clamped != bits {
                warn!(bits, clamped, "key /Length out of range");
            }
            (clamped / 8) as usize
        };

        let (string_cipher, stream_cipher) = if version >= 4 {
            let filters = entries.optional("CF", PDFObject::as_dict);
            let strf = entries.optional("StrF", PDFObject::as_name).unwrap_or("Identity");
            let stmf = entries.optional("StmF", PDFObject::as_name).unwrap_or("Identity");
            (
                resolve_crypt_method(filters, strf)?,
                resolve_crypt_method(filters, stmf)?,
            )
        } else {
            (CipherKind::Stream, CipherKind::Stream)
        };

        Ok(Self {
            version,
            revision,
            key_length,
            owner,
            user,
            permissions,
            encrypt_metadata,
            string_cipher,
            stream_cipher,
        })
    }
}

/// Typed lookups into an `/Encrypt` dictionary.
struct Entries<'a>(&'a PDFDict);

impl<'a> Entries<'a> {
    fn required(&self, key: &str) -> Result<&'a PDFObject> {
        self.0
            .get(key)
            .ok_or_else(|| PdfError::KeyError(format!("{} in /Encrypt", key)))
    }

    /// A present entry of the wrong type reads as absent.
    fn optional<T>(&self, key: &str, read: impl Fn(&'a PDFObject) -> Result<T>) -> Option<T> {
        self.0.get(key).and_then(|value| read(value).ok())
    }
}

/// Map a `/StrF` or `/StmF` name to the cipher of its crypt filter.
fn resolve_crypt_method(filters: Option<&PDFDict>, name: &str) -> Result<CipherKind> {
    if name == "Identity" {
        return Ok(CipherKind::Identity);
    }

    let filter = filters
        .and_then(|cf| cf.get(name))
        .and_then(|v| v.as_dict().ok())
        .ok_or_else(|| {
            PdfError::EncryptionError(format!("Crypt filter '{}' not found in CF", name))
        })?;

    let cfm = filter
        .get("CFM")
        .and_then(|v| v.as_name().ok())
        .unwrap_or("None");

    match cfm {
        "V2" => Ok(CipherKind::Stream),
        "AESV2" | "AESV3" => Ok(CipherKind::BlockChained),
        "None" => Ok(CipherKind::Identity),
        _ => Err(PdfError::EncryptionError(format!(
            "Unknown crypt filter method: {}",
            cfm
        ))),
    }
}

/// First element of the trailer `/ID` array, or empty when absent.
pub fn document_id(ids: &[Vec<u8>]) -> Vec<u8> {
    ids.first().cloned().unwrap_or_default()
}

/// Like [`document_id`], for the `/ID` entry as parsed from the trailer.
pub fn document_id_from_trailer(id: Option<&PDFObject>) -> Vec<u8> {
    id.and_then(|obj| obj.as_array().ok())
        .and_then(|arr| arr.first())
        .and_then(|first| first.as_string().ok())
        .map(<[u8]>::to_vec)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_dict(v: i64, r: i64) -> PDFDict {
        let mut dict = PDFDict::new();
        dict.insert("Filter".into(), PDFObject::Name("Standard".into()));
        dict.insert("V".into(), PDFObject::Int(v));
        dict.insert("R".into(), PDFObject::Int(r));
        dict.insert("O".into(), PDFObject::String(vec![0; 32]));
        dict.insert("U".into(), PDFObject::String(vec![0; 32]));
        dict.insert("P".into(), PDFObject::Int(-4));
        dict
    }

    fn crypt_filter(cfm: &str) -> PDFDict {
        let mut std_cf = PDFDict::new();
        std_cf.insert("CFM".into(), PDFObject::Name(cfm.into()));
        let mut cf = PDFDict::new();
        cf.insert("StdCF".into(), PDFObject::Dict(std_cf));
        cf
    }

    #[test]
    fn test_v1_is_40_bit() {
        let mut dict = base_dict(1, 2);
        dict.insert("Length".into(), PDFObject::Int(128));
        let parsed = EncryptionDictionary::from_dict(&dict).unwrap();
        assert_eq!(parsed.key_length, 5);
        assert_eq!(parsed.permissions, 0xFFFF_FFFC);
        assert_eq!(parsed.stream_cipher, CipherKind::Stream);
    }

    #[test]
    fn test_v2_length_and_default() {
        let mut dict = base_dict(2, 3);
        assert_eq!(EncryptionDictionary::from_dict(&dict).unwrap().key_length, 5);
        dict.insert("Length".into(), PDFObject::Int(128));
        assert_eq!(EncryptionDictionary::from_dict(&dict).unwrap().key_length, 16);
        dict.insert("Length".into(), PDFObject::Int(4096));
        assert_eq!(EncryptionDictionary::from_dict(&dict).unwrap().key_length, 16);
    }

    #[test]
    fn test_rejects_aes256_revisions_first() {
        for r in [5, 6] {
            // No /O at all: the revision check must fire before field lookups.
            let mut dict = PDFDict::new();
            dict.insert("V".into(), PDFObject::Int(5));
            dict.insert("R".into(), PDFObject::Int(r));
            assert!(matches!(
                EncryptionDictionary::from_dict(&dict),
                Err(PdfError::UnsupportedRevision(got)) if got == r
            ));
        }
    }

    #[test]
    fn test_required_and_mistyped_entries() {
        let mut dict = base_dict(2, 3);
        dict.remove("P");
        assert!(matches!(
            EncryptionDictionary::from_dict(&dict),
            Err(PdfError::KeyError(key)) if key.starts_with('P')
        ));

        let mut dict = base_dict(2, 3);
        dict.insert("Length".into(), PDFObject::Name("128".into()));
        dict.insert("EncryptMetadata".into(), PDFObject::Int(0));
        let parsed = EncryptionDictionary::from_dict(&dict).unwrap();
        assert_eq!(parsed.key_length, 5);
        assert!(parsed.encrypt_metadata);
    }

    #[test]
    fn test_rejects_non_standard_filter() {
        let mut dict = base_dict(2, 3);
        dict.insert("Filter".into(), PDFObject::Name("Adobe.PubSec".into()));
        assert!(matches!(
            EncryptionDictionary::from_dict(&dict),
            Err(PdfError::EncryptionError(_))
        ));
    }

    #[test]
    fn test_v4_crypt_filters() {
        let mut dict = base_dict(4, 4);
        dict.insert("CF".into(), PDFObject::Dict(crypt_filter("V2")));
        dict.insert("StmF".into(), PDFObject::Name("StdCF".into()));
        dict.insert("EncryptMetadata".into(), PDFObject::Bool(false));
        let parsed = EncryptionDictionary::from_dict(&dict).unwrap();
        assert_eq!(parsed.key_length, 16);
        assert_eq!(parsed.stream_cipher, CipherKind::Stream);
        assert_eq!(parsed.string_cipher, CipherKind::Identity);
        assert!(!parsed.encrypt_metadata);
    }

    #[test]
    fn test_v4_aes_filter_is_block_chained() {
        let mut dict = base_dict(4, 4);
        dict.insert("CF".into(), PDFObject::Dict(crypt_filter("AESV2")));
        dict.insert("StmF".into(), PDFObject::Name("StdCF".into()));
        dict.insert("StrF".into(), PDFObject::Name("StdCF".into()));
        let parsed = EncryptionDictionary::from_dict(&dict).unwrap();
        assert_eq!(parsed.stream_cipher, CipherKind::BlockChained);
        assert_eq!(parsed.string_cipher, CipherKind::BlockChained);
    }

    #[test]
    fn test_missing_named_filter() {
        let mut dict = base_dict(4, 4);
        dict.insert("StmF".into(), PDFObject::Name("Missing".into()));
        assert!(EncryptionDictionary::from_dict(&dict).is_err());
    }

    #[test]
    fn test_document_id_helpers() {
        assert!(document_id(&[]).is_empty());
        assert_eq!(document_id(&[b"a".to_vec(), b"b".to_vec()]), b"a");

        let arr = PDFObject::Array(vec![
            PDFObject::String(b"first".to_vec()),
            PDFObject::String(b"second".to_vec()),
        ]);
        assert_eq!(document_id_from_trailer(Some(&arr)), b"first");
        assert!(document_id_from_trailer(None).is_empty());
        assert!(document_id_from_trailer(Some(&PDFObject::Null)).is_empty());
    }
}
