//! Key derivation from the master passphrase.

use sha2::digest::generic_array::GenericArray;
use sha2::{Digest, Sha256};
use zeroize::ZeroizeOnDrop;

use super::cipher::KEY_LEN;

/// An AES-256 key derived from a passphrase.
///
/// The bytes are overwritten with zeroes on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Borrow the raw key bytes. Use only for an immediate cipher call.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive the encryption key for `passphrase`.
///
/// The key is the SHA-256 digest of the UTF-8 passphrase. The same passphrase
/// always yields the same key, so every record encrypted under one passphrase
/// shares a key. An empty passphrase is accepted here; input validation is the
/// caller's job.
pub fn derive_key(passphrase: &str) -> DerivedKey {
    let mut key = [0u8; KEY_LEN];
    let mut hasher = Sha256::new();
    hasher.update(passphrase.as_bytes());
    hasher.finalize_into(GenericArray::from_mut_slice(&mut key));
    DerivedKey { key }
}
