//! Decryption session parameters.

/// Default nesting limit for the object tree walk.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// When the 0xFFFFFFFF block enters the file key hash for revision 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataPadding {
    /// Append the block for every revision 4 document, whatever
    /// `/EncryptMetadata` says.
    #[default]
    Always,
    /// Append the block only when `/EncryptMetadata` is false.
    WhenMetadataUnencrypted,
}

impl MetadataPadding {
    /// Whether the block is appended for the given revision and flag.
    pub const fn applies(self, revision: i64, encrypt_metadata: bool) -> bool {
        if revision < 4 {
            return false;
        }
        match self {
            Self::Always => true,
            Self::WhenMetadataUnencrypted => !encrypt_metadata,
        }
    }
}

/// Parameters for a decryption session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptOptions {
    /// Deepest array/dictionary nesting the tree walk will follow before
    /// giving up with `DepthLimitExceeded`.
    pub max_depth: usize,

    /// Revision 4 metadata block handling in the file key hash.
    pub metadata_padding: MetadataPadding,

    /// Authenticate the password against `/U` (and `/O` as a fallback)
    /// before accepting the derived key.
    pub verify_password: bool,
}

impl Default for DecryptOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            metadata_padding: MetadataPadding::Always,
            verify_password: false,
        }
    }
}

impl DecryptOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_metadata_padding(mut self, metadata_padding: MetadataPadding) -> Self {
        self.metadata_padding = metadata_padding;
        self
    }

    pub fn with_verify_password(mut self, verify_password: bool) -> Self {
        self.verify_password = verify_password;
        self
    }
}
