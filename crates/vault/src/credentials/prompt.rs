//! The seam through which the credential flow asks a human for a passphrase.

use secrecy::SecretString;
use thiserror::Error;

/// Why a passphrase is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptReason {
    /// A new password is about to be encrypted.
    Encrypt,
    /// A stored password is about to be decrypted.
    Decrypt,
    /// The previous answer was rejected; `remaining` tries are left, this one included.
    Retry { remaining: u32, cause: RetryCause },
}

/// What was wrong with the previous answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCause {
    EmptyPassphrase,
    WrongPassphrase,
}

impl PromptReason {
    /// Text shown to the user above the input.
    pub fn message(&self) -> String {
        match self {
            Self::Encrypt => "Enter your passphrase to encrypt the password".to_string(),
            Self::Decrypt => "Enter your passphrase to view the password".to_string(),
            Self::Retry { remaining, cause } => {
                let cause = match cause {
                    RetryCause::EmptyPassphrase => "Passphrase cannot be empty.",
                    RetryCause::WrongPassphrase => "Invalid passphrase. Please try again.",
                };
                let plural = if *remaining == 1 { "" } else { "s" };
                format!("{cause} ({remaining} attempt{plural} left)")
            }
        }
    }
}

/// Errors raised by a prompt implementation.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("no terminal available to read a passphrase")]
    NoTerminal,

    #[error("failed to read passphrase: {0}")]
    Io(String),
}

/// Source of user-supplied passphrases.
///
/// `Ok(None)` means the user cancelled. Implementations may block while the
/// user types.
#[cfg_attr(test, mockall::automock)]
pub trait PassphrasePrompt {
    fn prompt(&self, reason: PromptReason) -> Result<Option<SecretString>, PromptError>;
}
