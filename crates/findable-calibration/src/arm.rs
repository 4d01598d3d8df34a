//! Deterministic A/B experiment-arm assignment (spec.md §4.12): a pure
//! function of `site_id` and `treatment_allocation`, so the same site lands
//! in the same arm on every run and on re-import of previously serialized
//! samples. No randomness, no stored assignment table to keep in sync.

use findable_types::calibration::ExperimentArm;
use sha2::{Digest, Sha256};

/// `arm(site_id, treatment_allocation) = treatment if (SHA-256(site_id) mod
/// 10_000) / 10_000 < treatment_allocation else control`.
///
/// Only the low 64 bits of the digest are used to form the modulus, since a
/// `u64 mod 10_000` is already a uniform-enough bucket for a 10_000-bucket
/// split and a full 256-bit `BigUint` reduction would add a dependency this
/// crate has no other use for.
pub fn arm(site_id: &str, treatment_allocation: f64) -> ExperimentArm {
    let digest = Sha256::digest(site_id.as_bytes());
    let low8: [u8; 8] = digest[24..32].try_into().expect("sha256 digest is 32 bytes");
    let bucket = u64::from_be_bytes(low8) % 10_000;
    let fraction = bucket as f64 / 10_000.0;

    if fraction < treatment_allocation {
        ExperimentArm::Treatment
    } else {
        ExperimentArm::Control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_is_stable_across_calls() {
        let a = arm("moz.com", 0.5);
        let b = arm("moz.com", 0.5);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_allocation_always_assigns_control() {
        assert_eq!(arm("anything.example", 0.0), ExperimentArm::Control);
        assert_eq!(arm("other.example", 0.0), ExperimentArm::Control);
    }

    #[test]
    fn full_allocation_always_assigns_treatment() {
        assert_eq!(arm("anything.example", 1.0), ExperimentArm::Treatment);
    }

    #[test]
    fn distributes_across_many_sites_at_half_allocation() {
        let treatment_count = (0..2000)
            .filter(|i| arm(&format!("site-{i}.example"), 0.5) == ExperimentArm::Treatment)
            .count();
        // Not asserting an exact count (hash distribution, not a fair coin),
        // just that both arms actually occur.
        assert!(treatment_count > 500 && treatment_count < 1500);
    }
}
