use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::{ErrorInfo, QreError};

/// Number of lowercase hex characters retained by [`stable_hash_short`].
pub const SPEC_HASH_LEN: usize = 16;

/// Serializes a value to canonical JSON bytes with lexicographically sorted keys.
///
/// The value is round-tripped through `serde_json::Value`, whose map type keeps
/// keys in sorted order, so the output is independent of field declaration or
/// insertion order on the source type.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, QreError> {
    let value = serde_json::to_value(value).map_err(|err| {
        QreError::Serde(ErrorInfo::new("canonical-encode", err.to_string()))
    })?;
    serde_json::to_vec(&value)
        .map_err(|err| QreError::Serde(ErrorInfo::new("canonical-bytes", err.to_string())))
}

/// Computes a stable hexadecimal SHA-256 hash for the provided serializable payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, QreError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}

/// Computes a [`SPEC_HASH_LEN`]-character prefix of the stable hash.
///
/// The truncated digest still leaves collision probability negligible for
/// sweeps of realistic size (thousands of specs).
pub fn stable_hash_short<T: Serialize>(value: &T) -> Result<String, QreError> {
    let mut hash = stable_hash_string(value)?;
    hash.truncate(SPEC_HASH_LEN);
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Forward {
        alpha: u32,
        beta: String,
    }

    #[derive(Serialize)]
    struct Reversed {
        beta: String,
        alpha: u32,
    }

    #[test]
    fn canonical_bytes_ignore_field_order() {
        let a = Forward {
            alpha: 7,
            beta: "x".to_string(),
        };
        let b = Reversed {
            beta: "x".to_string(),
            alpha: 7,
        };
        assert_eq!(
            to_canonical_json_bytes(&a).unwrap(),
            to_canonical_json_bytes(&b).unwrap()
        );
    }

    #[test]
    fn short_hash_has_fixed_length() {
        let hash = stable_hash_short(&("payload", 1u8)).unwrap();
        assert_eq!(hash.len(), SPEC_HASH_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
