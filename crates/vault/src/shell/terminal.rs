//! [`PassphrasePrompt`] backed by the controlling terminal.

use std::io::{self, IsTerminal, Write};

use secrecy::SecretString;
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::credentials::{PassphrasePrompt, PromptError, PromptReason};

/// Reads passphrases from the terminal without echo.
///
/// End-of-input (Ctrl-D) cancels the prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn read(&self, reason: PromptReason) -> Result<Option<SecretString>, PromptError> {
        if !io::stdin().is_terminal() && !io::stderr().is_terminal() {
            return Err(PromptError::NoTerminal);
        }

        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{}", reason.message()).map_err(|e| PromptError::Io(e.to_string()))?;
        drop(stderr);

        match rpassword::prompt_password("Passphrase: ") {
            Ok(passphrase) => Ok(Some(SecretString::from(passphrase))),
            Err(e) => match e.kind() {
                io::ErrorKind::UnexpectedEof | io::ErrorKind::Interrupted => Ok(None),
                _ => Err(PromptError::Io(e.to_string())),
            },
        }
    }
}

impl PassphrasePrompt for TerminalPrompt {
    fn prompt(&self, reason: PromptReason) -> Result<Option<SecretString>, PromptError> {
        // Let other runtime workers keep the expiry timers going while we block.
        match Handle::try_current().map(|h| h.runtime_flavor()) {
            Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(|| self.read(reason)),
            _ => self.read(reason),
        }
    }
}
