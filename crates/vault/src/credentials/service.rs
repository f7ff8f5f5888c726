//! [`CredentialService`]: seal and reveal passwords using the session cache.

use std::future::Future;

use common::{CryptoError, EncryptedSecret};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use super::prompt::{PassphrasePrompt, PromptReason, RetryCause};
use super::{validate_passphrase, CredentialError};
use crate::crypto::{decrypt_async, encrypt_async};
use crate::session::PassphraseSession;

/// Default number of passphrase prompts per operation.
pub const DEFAULT_MAX_PROMPT_ATTEMPTS: u32 = 3;

/// Encrypts and decrypts password fields on behalf of a host.
///
/// The cached passphrase is used when present. Otherwise the user is prompted,
/// and a passphrase that works is cached for later calls.
pub struct CredentialService<P> {
    session: PassphraseSession,
    prompt: P,
    max_attempts: u32,
}

impl<P: PassphrasePrompt> CredentialService<P> {
    /// `max_attempts` below 1 is treated as 1.
    pub fn new(session: PassphraseSession, prompt: P, max_attempts: u32) -> Self {
        Self {
            session,
            prompt,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn session(&self) -> &PassphraseSession {
        &self.session
    }

    /// Encrypt `plaintext` for storage.
    ///
    /// With a cached passphrase the session is extended on success. A prompted
    /// passphrase is cached once encryption succeeds.
    pub async fn seal(&self, plaintext: &str) -> Result<EncryptedSecret, CredentialError> {
        if let Some(passphrase) = self.session.get_passphrase().await {
            let sealed = encrypt_async(plaintext, &passphrase).await?;
            self.session.extend_validity().await;
            debug!("sealed with cached passphrase");
            return Ok(sealed);
        }

        let (sealed, passphrase) = self
            .with_prompted_passphrase(PromptReason::Encrypt, move |passphrase| async move {
                encrypt_async(plaintext, &passphrase).await
            })
            .await?;
        self.session.set_passphrase(passphrase).await;
        info!("sealed with prompted passphrase");
        Ok(sealed)
    }

    /// Decrypt a stored password.
    ///
    /// A cached passphrase that fails to decrypt is cleared and the user is
    /// prompted, up to the attempt limit.
    pub async fn reveal(&self, secret: &EncryptedSecret) -> Result<String, CredentialError> {
        if let Some(passphrase) = self.session.get_passphrase().await {
            match decrypt_async(secret, &passphrase).await {
                Ok(plaintext) => {
                    self.session.extend_validity().await;
                    debug!("revealed with cached passphrase");
                    return Ok(plaintext);
                }
                Err(e) => {
                    warn!(reason = e.code(), "cached passphrase rejected, clearing session");
                    self.session.clear_passphrase().await;
                }
            }
        }

        let (plaintext, passphrase) = self
            .with_prompted_passphrase(PromptReason::Decrypt, move |passphrase| async move {
                decrypt_async(secret, &passphrase).await
            })
            .await?;
        self.session.set_passphrase(passphrase).await;
        info!("revealed with prompted passphrase");
        Ok(plaintext)
    }

    /// Prompt until `op` succeeds, the user cancels, or attempts run out.
    ///
    /// Empty answers and decryption failures consume an attempt and re-prompt.
    /// Any other error from `op` is returned immediately.
    async fn with_prompted_passphrase<T, F, Fut>(
        &self,
        first: PromptReason,
        mut op: F,
    ) -> Result<(T, SecretString), CredentialError>
    where
        F: FnMut(SecretString) -> Fut,
        Fut: Future<Output = Result<T, CryptoError>>,
    {
        let mut reason = first;
        let mut last_cause = RetryCause::WrongPassphrase;

        for attempt in 1..=self.max_attempts {
            let remaining = self.max_attempts - attempt;

            let Some(passphrase) = self.prompt.prompt(reason)? else {
                info!(attempt, "passphrase prompt cancelled");
                return Err(CredentialError::Cancelled);
            };

            if validate_passphrase(passphrase.expose_secret()).is_err() {
                warn!(attempt, remaining, "empty passphrase entered");
                last_cause = RetryCause::EmptyPassphrase;
                reason = PromptReason::Retry {
                    remaining,
                    cause: last_cause,
                };
                continue;
            }

            match op(passphrase.clone()).await {
                Ok(value) => return Ok((value, passphrase)),
                Err(e) if e.is_decryption() => {
                    warn!(attempt, remaining, reason = e.code(), "prompted passphrase rejected");
                    last_cause = RetryCause::WrongPassphrase;
                    reason = PromptReason::Retry {
                        remaining,
                        cause: last_cause,
                    };
                }
                Err(e) => return Err(e.into()),
            }
        }

        match last_cause {
            RetryCause::EmptyPassphrase => Err(CredentialError::EmptyPassphrase),
            RetryCause::WrongPassphrase => Err(CredentialError::TooManyAttempts {
                attempts: self.max_attempts,
            }),
        }
    }
}
