//! Host-facing credential flow on top of the crypto codec and session cache.
//!
//! A host (form, viewer, shell) never handles the passphrase directly. It
//! calls [`CredentialService::seal`] before persisting a password and
//! [`CredentialService::reveal`] to display one; the service decides whether
//! the cached passphrase suffices or the user must be asked through the
//! [`PassphrasePrompt`] seam.

pub mod prompt;
pub mod service;

pub use prompt::{PassphrasePrompt, PromptError, PromptReason, RetryCause};
pub use service::{CredentialService, DEFAULT_MAX_PROMPT_ATTEMPTS};

use common::CryptoError;
use thiserror::Error;

/// Errors returned by the credential flow.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("passphrase entry cancelled")]
    Cancelled,

    #[error("Passphrase cannot be empty")]
    EmptyPassphrase,

    #[error("too many failed passphrase attempts ({attempts})")]
    TooManyAttempts { attempts: u32 },

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Reject empty or whitespace-only passphrases.
pub fn validate_passphrase(passphrase: &str) -> Result<(), CredentialError> {
    if passphrase.trim().is_empty() {
        return Err(CredentialError::EmptyPassphrase);
    }
    Ok(())
}
