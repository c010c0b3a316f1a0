//! Low-level cipher primitives.
//!
//! - `arcfour`: RC4 keystream

pub mod arcfour;

pub use arcfour::Arcfour;
