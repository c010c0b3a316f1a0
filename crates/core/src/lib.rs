//! pdfcrypt - decryption of PDF objects protected by the standard security
//! handler (RC4, revisions 2-4).

pub mod codec;
pub mod error;
pub mod model;
pub mod security;

// Re-export codec modules for convenience
pub use codec::arcfour;

// Re-export model modules for convenience
pub use model::objects as pdftypes;

pub use error::{PdfError, Result};
pub use security::DecryptionSession;
