//! Crypto error taxonomy shared by the codec and its callers.

use std::fmt;

use thiserror::Error;

/// Why a decryption was rejected.
///
/// Kept for diagnostics only. Callers must not branch on it to tell a wrong
/// passphrase apart from corrupted data; both look the same to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptFailure {
    /// The IV is not valid hex or does not decode to 16 bytes.
    MalformedIv,
    /// The ciphertext is not valid Base64.
    MalformedCiphertext,
    /// Block alignment or PKCS#7 padding check failed.
    Padding,
    /// The cipher could not be initialised with the derived key.
    Key,
    /// The recovered bytes are not UTF-8.
    NotUtf8,
    /// The blocking task running the primitive did not complete.
    Interrupted,
}

impl DecryptFailure {
    /// Short label suitable for a log field.
    pub fn as_str(&self) -> &'static str {
        match self {
            DecryptFailure::MalformedIv => "malformed_iv",
            DecryptFailure::MalformedCiphertext => "malformed_ciphertext",
            DecryptFailure::Padding => "padding",
            DecryptFailure::Key => "key",
            DecryptFailure::NotUtf8 => "not_utf8",
            DecryptFailure::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for DecryptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level crypto error type.
///
/// Both operations are all-or-nothing: an error never carries partial
/// plaintext or ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The random source, hash, or cipher primitive failed during encryption.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Wrong passphrase, or the ciphertext/IV pair is corrupted or truncated.
    #[error("invalid passphrase or corrupted data")]
    Decryption(DecryptFailure),
}

impl CryptoError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            CryptoError::Encryption(_) => "encryption_failed",
            CryptoError::Decryption(_) => "invalid_passphrase",
        }
    }

    /// Message safe to show to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            CryptoError::Encryption(_) => "Failed to encrypt password",
            CryptoError::Decryption(_) => {
                "Failed to decrypt password. Please check your passphrase."
            }
        }
    }

    /// Returns `true` for the decryption class.
    pub fn is_decryption(&self) -> bool {
        matches!(self, CryptoError::Decryption(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes() {
        assert_eq!(
            CryptoError::Encryption("rng".into()).code(),
            "encryption_failed"
        );
        assert_eq!(
            CryptoError::Decryption(DecryptFailure::Padding).code(),
            "invalid_passphrase"
        );
    }

    #[test]
    fn decryption_display_hides_failure_kind() {
        for kind in [
            DecryptFailure::MalformedIv,
            DecryptFailure::Padding,
            DecryptFailure::NotUtf8,
        ] {
            let e = CryptoError::Decryption(kind);
            assert_eq!(e.to_string(), "invalid passphrase or corrupted data");
            assert!(!e.to_string().contains(kind.as_str()));
        }
    }

    #[test]
    fn encryption_display_includes_reason() {
        let e = CryptoError::Encryption("random source unavailable".into());
        assert!(e.to_string().contains("random source unavailable"));
        assert!(!e.is_decryption());
    }

    #[test]
    fn user_messages() {
        assert_eq!(
            CryptoError::Encryption("x".into()).user_message(),
            "Failed to encrypt password"
        );
        assert!(CryptoError::Decryption(DecryptFailure::Key)
            .user_message()
            .contains("check your passphrase"));
    }
}
