use qre_core::{stable_hash_short, QreError};

use crate::model::AlgoSpec;

/// Computes the content hash identifying a spec for completion tracking.
///
/// The spec is serialized to canonical JSON (lexicographically sorted keys,
/// nested fault-tolerance fields included) before hashing, so two specs with
/// identical field values hash identically regardless of construction order.
pub fn spec_hash(spec: &AlgoSpec) -> Result<String, QreError> {
    stable_hash_short(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Decomposition, Encoding, FaultTolerance};

    fn sample_spec() -> AlgoSpec {
        AlgoSpec {
            basis: "STO-3G".to_string(),
            active_space: "full".to_string(),
            encoding: Encoding::Jw,
            decomposition: Decomposition::Trotter,
            target_error_mha: 1.6,
            fault_tolerance: FaultTolerance::default(),
        }
    }

    #[test]
    fn equal_specs_hash_equal() {
        let a = sample_spec();
        let b = sample_spec();
        assert_eq!(spec_hash(&a).unwrap(), spec_hash(&b).unwrap());
    }

    #[test]
    fn any_field_change_changes_hash() {
        let base = sample_spec();
        let base_hash = spec_hash(&base).unwrap();

        let mut other = sample_spec();
        other.encoding = Encoding::Bk;
        assert_ne!(spec_hash(&other).unwrap(), base_hash);

        let mut other = sample_spec();
        other.target_error_mha = 0.8;
        assert_ne!(spec_hash(&other).unwrap(), base_hash);

        // Nested fault-tolerance fields participate in the identity.
        let mut other = sample_spec();
        other.fault_tolerance.physical_error_rate = 1e-3;
        assert_ne!(spec_hash(&other).unwrap(), base_hash);
    }

    #[test]
    fn hash_is_fixed_length_hex() {
        let hash = spec_hash(&sample_spec()).unwrap();
        assert_eq!(hash.len(), qre_core::SPEC_HASH_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
