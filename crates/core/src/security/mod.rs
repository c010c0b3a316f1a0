//! PDF standard security handler, revisions 2-4.
//!
//! This module contains:
//! - `padding` - password padding to 32 bytes
//! - `keys` - file key and per-object key derivation, password checks
//! - `cipher` - payload ciphers (RC4; AES is recognized and rejected)
//! - `encrypt_dict` - reading `/Encrypt`
//! - `decryptor` - recursive object tree decryption
//! - `session` - the per-document entry point
//! - `options` - session parameters

pub mod cipher;
pub mod decryptor;
pub mod encrypt_dict;
pub mod keys;
pub mod options;
pub mod padding;
pub mod session;

// Re-export main types for convenience
pub use cipher::{AesCbcCipher, CipherKind, Rc4Cipher, SymmetricCipher};
pub use decryptor::ObjectTreeDecryptor;
pub use encrypt_dict::{EncryptionDictionary, document_id, document_id_from_trailer};
pub use keys::{FileKey, authenticate, compute_file_key, compute_u_value, object_key};
pub use options::{DecryptOptions, MetadataPadding};
pub use padding::{PASSWORD_PADDING, encode_password, pad_password};
pub use session::DecryptionSession;
