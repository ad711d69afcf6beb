//! Shared error types and canonical hashing for the QRE sweep engine.

#![deny(missing_docs)]

pub mod errors;
mod hash;

pub use errors::{ErrorInfo, QreError};
pub use hash::{stable_hash_short, stable_hash_string, to_canonical_json_bytes, SPEC_HASH_LEN};
