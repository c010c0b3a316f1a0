//! pdfdecrypt - Derive a PDF file key and decrypt object payloads
//!
//! A command line tool for checking `/Encrypt` parameters and passwords
//! against the standard security handler.

use anyhow::{Context, Result, bail};
use clap::Parser;
use pdfcrypt_core::pdftypes::PDFObjRef;
use pdfcrypt_core::security::{
    CipherKind, DecryptOptions, DecryptionSession, EncryptionDictionary, MetadataPadding,
};

/// Derive the file key of an RC4-encrypted PDF and optionally decrypt a payload.
#[derive(Parser, Debug)]
#[command(name = "pdfdecrypt")]
#[command(about = "Derive PDF file keys and decrypt objects (standard security handler R2-R4)")]
struct Args {
    /// Security handler revision (/R)
    #[arg(short = 'R', long)]
    revision: i64,

    /// Algorithm code (/V)
    #[arg(short = 'V', long = "algorithm", default_value_t = 2)]
    algorithm: i64,

    /// Key length in bits (/Length)
    #[arg(short = 'L', long, default_value_t = 40)]
    length: i64,

    /// Owner check value (/O) as hex
    #[arg(long)]
    owner: String,

    /// User check value (/U) as hex, required with --verify
    #[arg(long)]
    user: Option<String>,

    /// Permission flags (/P) as a signed 32-bit integer
    #[arg(short = 'P', long, allow_hyphen_values = true)]
    permissions: i32,

    /// First element of the trailer /ID array as hex
    #[arg(long, default_value = "")]
    id: String,

    /// Password (empty when omitted)
    #[arg(short, long)]
    password: Option<String>,

    /// The document sets /EncryptMetadata false
    #[arg(long)]
    no_encrypt_metadata: bool,

    /// Only mix the revision 4 metadata block in when metadata is unencrypted
    #[arg(long)]
    gate_metadata_block: bool,

    /// Authenticate the password against /U and /O
    #[arg(long)]
    verify: bool,

    /// Object number of the payload to decrypt
    #[arg(long, requires = "data")]
    object: Option<u32>,

    /// Generation number of the payload to decrypt
    #[arg(long, default_value_t = 0)]
    generation: u32,

    /// Encrypted string payload as hex
    #[arg(long, requires = "object")]
    data: Option<String>,
}

fn decode_hex(label: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim()).with_context(|| format!("{label} is not valid hex"))
}

fn encryption_dictionary(args: &Args) -> Result<EncryptionDictionary> {
    if !(40..=128).contains(&args.length) || args.length % 8 != 0 {
        bail!("key length must be a multiple of 8 between 40 and 128, got {}", args.length);
    }
    let key_length = if args.algorithm == 1 {
        5
    } else {
        (args.length / 8) as usize
    };

    let user = args
        .user
        .as_deref()
        .map(|u| decode_hex("--user", u))
        .transpose()?;

    Ok(EncryptionDictionary {
        version: args.algorithm,
        revision: args.revision,
        key_length,
        owner: decode_hex("--owner", &args.owner)?,
        user,
        permissions: args.permissions as u32,
        encrypt_metadata: !args.no_encrypt_metadata,
        string_cipher: CipherKind::Stream,
        stream_cipher: CipherKind::Stream,
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let encrypt = encryption_dictionary(&args)?;
    let doc_id = decode_hex("--id", &args.id)?;
    let padding = if args.gate_metadata_block {
        MetadataPadding::WhenMetadataUnencrypted
    } else {
        MetadataPadding::Always
    };
    let options = DecryptOptions::default()
        .with_metadata_padding(padding)
        .with_verify_password(args.verify);

    let session =
        DecryptionSession::with_options(Some(&encrypt), &doc_id, args.password.as_deref(), options)
            .context("cannot open decryption session")?;

    let file_key = session
        .file_key()
        .context("session has no file key")?;
    println!("file key: {}", hex::encode(file_key.as_bytes()));

    if let (Some(objid), Some(data)) = (args.object, args.data.as_deref()) {
        let objref = PDFObjRef::new(objid, args.generation);
        let ciphertext = decode_hex("--data", data)?;
        let plaintext = session
            .decrypt_string(objref, &ciphertext)
            .with_context(|| format!("cannot decrypt payload of {objref}"))?;
        println!("{objref}: {}", hex::encode(plaintext));
    }

    Ok(())
}
