//! Per-unit seed derivation.

use commonware_cryptography::sha256::Sha256;
use commonware_cryptography::Hasher;

const UNIT_SEED_NAMESPACE: &[u8] = b"_LETITRIDE_UNIT_SEED";

/// Seed for unit `unit_index` of a run started from `master_seed`.
///
/// Depends on nothing but its two arguments, so every worker derives the same
/// seed for the same unit no matter which batch it landed in.
pub fn derive_unit_seed(master_seed: u64, unit_index: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(UNIT_SEED_NAMESPACE);
    hasher.update(&master_seed.to_be_bytes());
    hasher.update(&unit_index.to_be_bytes());
    let digest = hasher.finalize().0;

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}
