//! Interactive line-oriented host for the credential service.
//!
//! The shell stands in for the add/edit/view screens of a password manager:
//! it generates passwords, seals them for storage, reveals stored envelopes,
//! and shows or clears the passphrase session.

pub mod command;
pub mod terminal;

pub use command::{parse, Command, ParseError, HELP};
pub use terminal::TerminalPrompt;

use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::credentials::{CredentialError, CredentialService, PassphrasePrompt};
use crate::generator::{generate_password, GeneratorError};
use crate::session::format_remaining;

/// Result of executing one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Print the text and read the next line.
    Continue(String),
    Quit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CommandError {
    /// Text shown to the user. Crypto failures use the codec's user-facing
    /// message instead of the diagnostic one.
    pub fn user_message(&self) -> String {
        match self {
            Self::Credential(CredentialError::Crypto(e)) => e.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

pub struct Shell<P> {
    service: CredentialService<P>,
    generated_len: usize,
}

impl<P: PassphrasePrompt> Shell<P> {
    pub fn new(service: CredentialService<P>, generated_len: usize) -> Self {
        Self {
            service,
            generated_len,
        }
    }

    pub fn service(&self) -> &CredentialService<P> {
        &self.service
    }

    /// Read commands from `input` until EOF or `quit`, writing replies to `output`.
    ///
    /// Command failures are reported on `output` and do not end the loop.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.context("failed to read input")? {
            let reply = match parse(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => match self.execute(command).await {
                    Ok(Flow::Continue(text)) => text,
                    Ok(Flow::Quit) => break,
                    Err(e) => format!("error: {}", e.user_message()),
                },
                Err(e) => format!("error: {e}"),
            };
            output
                .write_all(format!("{reply}\n").as_bytes())
                .await
                .context("failed to write output")?;
            output.flush().await.context("failed to write output")?;
        }
        debug!("shell loop finished");
        Ok(())
    }

    /// Execute a single command.
    pub async fn execute(&self, command: Command) -> Result<Flow, CommandError> {
        let text = match command {
            Command::Generate(len) => generate_password(len.unwrap_or(self.generated_len))?,
            Command::Seal(plaintext) => self.service.seal(&plaintext).await?.to_json()?,
            Command::Reveal(secret) => self.service.reveal(&secret).await?,
            Command::Status => {
                let status = self.service.session().status().await;
                if status.active {
                    format!(
                        "unlocked, passphrase expires in {}",
                        format_remaining(Duration::from_millis(status.remaining_ms))
                    )
                } else {
                    "locked".to_string()
                }
            }
            Command::Lock => {
                self.service.session().clear_passphrase().await;
                "locked".to_string()
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Flow::Quit),
        };
        Ok(Flow::Continue(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::prompt::MockPassphrasePrompt;
    use crate::generator::CHARSET;
    use crate::session::PassphraseSession;
    use common::{CryptoError, DecryptFailure};
    use secrecy::SecretString;

    fn shell(prompt: MockPassphrasePrompt) -> Shell<MockPassphrasePrompt> {
        let service = CredentialService::new(PassphraseSession::default(), prompt, 3);
        Shell::new(service, 20)
    }

    fn text(flow: Flow) -> String {
        match flow {
            Flow::Continue(text) => text,
            Flow::Quit => panic!("unexpected quit"),
        }
    }

    #[tokio::test]
    async fn generate_uses_configured_length() {
        let shell = shell(MockPassphrasePrompt::new());
        let password = text(shell.execute(Command::Generate(None)).await.unwrap());
        assert_eq!(password.len(), 20);
        assert!(password.bytes().all(|b| CHARSET.contains(&b)));

        let short = text(shell.execute(Command::Generate(Some(4))).await.unwrap());
        assert_eq!(short.len(), 4);
    }

    #[tokio::test]
    async fn generate_zero_is_an_error() {
        let shell = shell(MockPassphrasePrompt::new());
        assert!(matches!(
            shell.execute(Command::Generate(Some(0))).await,
            Err(CommandError::Generator(_))
        ));
    }

    #[tokio::test]
    async fn status_and_lock() {
        let shell = shell(MockPassphrasePrompt::new());
        assert_eq!(text(shell.execute(Command::Status).await.unwrap()), "locked");

        shell
            .service()
            .session()
            .set_passphrase(SecretString::from("pass"))
            .await;
        let status = text(shell.execute(Command::Status).await.unwrap());
        assert!(status.starts_with("unlocked, passphrase expires in "));

        assert_eq!(text(shell.execute(Command::Lock).await.unwrap()), "locked");
        assert!(!shell.service().session().has_valid_passphrase().await);
    }

    #[tokio::test]
    async fn seal_then_reveal_prompts_once() {
        let mut prompt = MockPassphrasePrompt::new();
        prompt
            .expect_prompt()
            .times(1)
            .returning(|_| Ok(Some(SecretString::from("correct-horse"))));
        let shell = shell(prompt);

        let json = text(shell.execute(Command::Seal("MyS3cret!".into())).await.unwrap());
        let secret = common::EncryptedSecret::from_json(&json).unwrap();
        let revealed = text(shell.execute(Command::Reveal(secret)).await.unwrap());
        assert_eq!(revealed, "MyS3cret!");
    }

    #[tokio::test(start_paused = true)]
    async fn status_shows_snapshot_remaining_time() {
        let shell = shell(MockPassphrasePrompt::new());
        shell
            .service()
            .session()
            .set_passphrase_for(SecretString::from("pass"), Duration::from_secs(65))
            .await;
        let status = text(shell.execute(Command::Status).await.unwrap());
        assert_eq!(status, "unlocked, passphrase expires in 1:05");
    }

    #[test]
    fn crypto_errors_use_user_message() {
        let err = CommandError::Credential(CredentialError::Crypto(CryptoError::Decryption(
            DecryptFailure::Padding,
        )));
        assert_eq!(
            err.user_message(),
            "Failed to decrypt password. Please check your passphrase."
        );

        let err = CommandError::Credential(CredentialError::Crypto(CryptoError::Encryption(
            "rng".into(),
        )));
        assert_eq!(err.user_message(), "Failed to encrypt password");

        let err = CommandError::Credential(CredentialError::Cancelled);
        assert_eq!(err.user_message(), "passphrase entry cancelled");
    }

    #[tokio::test]
    async fn run_reports_errors_and_stops_on_quit() {
        let shell = shell(MockPassphrasePrompt::new());
        let input: &[u8] = b"help\nbogus\n\nstatus\nquit\nstatus\n";
        let mut output = Vec::new();

        shell.run(input, &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("commands:"));
        assert!(output.contains("error: unknown command `bogus`"));
        assert_eq!(output.matches("locked").count(), 1);
    }
}
