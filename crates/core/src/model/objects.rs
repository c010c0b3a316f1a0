//! PDF object types.
//!
//! The parsed object tree handed to the security handler. Dictionaries,
//! arrays, strings and streams nest arbitrarily; everything else is a scalar
//! and never carries encrypted bytes.

use crate::error::{PdfError, Result};
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;

/// PDF dictionary (name -> object mapping).
pub type PDFDict = HashMap<String, PDFObject>;

/// PDF Object types - the fundamental value type in PDF.
#[derive(Debug, Clone, PartialEq)]
pub enum PDFObject {
    /// Null object
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Real (floating point) value
    Real(f64),
    /// Name object (e.g., /Type, /Font)
    Name(String),
    /// String (byte array, one byte per character code)
    String(Vec<u8>),
    /// Array of objects
    Array(Vec<Self>),
    /// Dictionary (name -> object mapping)
    Dict(PDFDict),
    /// Stream (dictionary + binary data)
    Stream(Box<PDFStream>),
    /// Indirect object reference
    Ref(PDFObjRef),
}

impl PDFObject {
    /// Get as boolean
    pub const fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            _ => Err(PdfError::TypeError {
                expected: "bool",
                got: self.type_name(),
            }),
        }
    }

    /// Get as integer
    pub const fn as_int(&self) -> Result<i64> {
        match self {
            Self::Int(n) => Ok(*n),
            _ => Err(PdfError::TypeError {
                expected: "int",
                got: self.type_name(),
            }),
        }
    }

    /// Get as name string
    pub fn as_name(&self) -> Result<&str> {
        match self {
            Self::Name(s) => Ok(s),
            _ => Err(PdfError::TypeError {
                expected: "name",
                got: self.type_name(),
            }),
        }
    }

    /// Get as byte string
    pub fn as_string(&self) -> Result<&[u8]> {
        match self {
            Self::String(s) => Ok(s),
            _ => Err(PdfError::TypeError {
                expected: "string",
                got: self.type_name(),
            }),
        }
    }

    /// Get as array
    pub const fn as_array(&self) -> Result<&Vec<Self>> {
        match self {
            Self::Array(arr) => Ok(arr),
            _ => Err(PdfError::TypeError {
                expected: "array",
                got: self.type_name(),
            }),
        }
    }

    /// Get as dictionary
    pub const fn as_dict(&self) -> Result<&PDFDict> {
        match self {
            Self::Dict(d) => Ok(d),
            _ => Err(PdfError::TypeError {
                expected: "dict",
                got: self.type_name(),
            }),
        }
    }

    /// Get as stream
    pub fn as_stream(&self) -> Result<&PDFStream> {
        match self {
            Self::Stream(s) => Ok(s),
            _ => Err(PdfError::TypeError {
                expected: "stream",
                got: self.type_name(),
            }),
        }
    }

    /// Rebuild a dictionary or stream with one entry replaced.
    ///
    /// The receiver is consumed, so a caller holding a clone of the original
    /// tree never observes the change. Other object kinds are rejected.
    pub fn with_entry(self, key: impl Into<String>, value: Self) -> Result<Self> {
        match self {
            Self::Dict(mut dict) => {
                dict.insert(key.into(), value);
                Ok(Self::Dict(dict))
            }
            Self::Stream(stream) => {
                let PDFStream { mut attrs, rawdata } = *stream;
                attrs.insert(key.into(), value);
                Ok(Self::Stream(Box::new(PDFStream { attrs, rawdata })))
            }
            other => Err(PdfError::TypeError {
                expected: "dict or stream",
                got: other.type_name(),
            }),
        }
    }

    /// Get type name for error messages
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Real(_) => "real",
            Self::Name(_) => "name",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
            Self::Stream(_) => "stream",
            Self::Ref(_) => "ref",
        }
    }
}

/// PDF indirect object reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PDFObjRef {
    /// Object ID
    pub objid: u32,
    /// Generation number
    pub genno: u32,
}

impl PDFObjRef {
    /// Create a new object reference.
    pub const fn new(objid: u32, genno: u32) -> Self {
        Self { objid, genno }
    }
}

impl fmt::Display for PDFObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.objid, self.genno)
    }
}

/// PDF Stream - dictionary attributes + raw (still filtered) data.
#[derive(Debug, Clone, PartialEq)]
pub struct PDFStream {
    /// Stream dictionary attributes
    pub attrs: PDFDict,
    /// Raw (possibly encrypted and encoded) data
    rawdata: Bytes,
}

impl PDFStream {
    /// Create a new stream.
    pub fn new(attrs: PDFDict, rawdata: impl Into<Bytes>) -> Self {
        Self {
            attrs,
            rawdata: rawdata.into(),
        }
    }

    /// Get raw (undecoded) data.
    pub fn get_rawdata(&self) -> &[u8] {
        self.rawdata.as_ref()
    }

    /// Split the stream into its dictionary and body.
    pub fn into_parts(self) -> (PDFDict, Bytes) {
        (self.attrs, self.rawdata)
    }

    /// Get attribute by name.
    pub fn get(&self, name: &str) -> Option<&PDFObject> {
        self.attrs.get(name)
    }

    /// The `/Type` name of the stream dictionary, if any.
    pub fn type_name(&self) -> Option<&str> {
        dict_type(&self.attrs)
    }

    /// Check the `/Type` entry of the stream dictionary.
    pub fn has_type(&self, name: &str) -> bool {
        self.type_name() == Some(name)
    }
}

/// The `/Type` name of a dictionary, if present and a name.
pub fn dict_type(dict: &PDFDict) -> Option<&str> {
    dict.get("Type").and_then(|t| t.as_name().ok())
}
