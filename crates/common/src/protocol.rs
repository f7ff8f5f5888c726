//! Values exchanged between the vault core and its collaborators.
//!
//! [`EncryptedSecret`] is the exact representation a storage collaborator
//! persists and hands back, byte for byte.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Encrypted secret
// ---------------------------------------------------------------------------

/// Length in characters of the hex-encoded IV.
pub const IV_HEX_LEN: usize = 32;

/// Output of one encrypt call.
///
/// `ciphertext` and `iv` belong together. Never combine an IV from one
/// encryption with the ciphertext of another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret {
    /// Standard padded Base64 of the AES-CBC ciphertext.
    #[serde(alias = "encryptedData")]
    pub ciphertext: String,
    /// Lowercase hex of the 16-byte IV.
    pub iv: String,
}

impl EncryptedSecret {
    /// Pair a ciphertext with its IV.
    pub fn new(ciphertext: impl Into<String>, iv: impl Into<String>) -> Self {
        Self {
            ciphertext: ciphertext.into(),
            iv: iv.into(),
        }
    }

    /// Parse the JSON form `{"ciphertext": "...", "iv": "..."}`.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Render the JSON form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Session status
// ---------------------------------------------------------------------------

/// Non-secret view of the passphrase session, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Whether a passphrase is currently cached and unexpired.
    pub active: bool,
    /// Milliseconds until the cached passphrase expires, 0 when inactive.
    pub remaining_ms: u64,
}

impl SessionStatus {
    /// Status of an empty session.
    pub fn inactive() -> Self {
        Self {
            active: false,
            remaining_ms: 0,
        }
    }
}
