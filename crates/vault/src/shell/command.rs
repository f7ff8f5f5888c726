//! Parsing of shell input lines into [`Command`]s.

use common::EncryptedSecret;
use thiserror::Error;

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print a random password, optionally of a given length.
    Generate(Option<usize>),
    /// Encrypt a password and print the envelope JSON.
    Seal(String),
    /// Decrypt an envelope and print the password.
    Reveal(EncryptedSecret),
    /// Print whether a passphrase is cached and for how long.
    Status,
    /// Forget the cached passphrase.
    Lock,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid length `{0}`")]
    InvalidLength(String),

    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),
}

pub const HELP: &str = "\
commands:
  generate [len]          print a random password (default length from config)
  seal <password>         encrypt a password and print {\"ciphertext\", \"iv\"}
  reveal <json>           decrypt an envelope printed by `seal`
  reveal <ciphertext> <iv>
  status                  show how long the cached passphrase remains valid
  lock                    forget the cached passphrase
  help                    show this message
  quit | exit             leave the shell";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim_end().is_empty() {
        return Ok(None);
    }

    // Only the single separator after the name is consumed; `seal` keeps the
    // rest verbatim.
    let (name, rest) = trimmed.split_once(char::is_whitespace).unwrap_or((trimmed, ""));

    let command = match name.to_ascii_lowercase().as_str() {
        "generate" | "gen" => {
            let arg = rest.trim();
            if arg.is_empty() {
                Command::Generate(None)
            } else {
                let len = arg
                    .parse::<usize>()
                    .map_err(|_| ParseError::InvalidLength(arg.to_string()))?;
                Command::Generate(Some(len))
            }
        }
        "seal" => {
            if rest.trim().is_empty() {
                return Err(ParseError::MissingArgument("seal"));
            }
            Command::Seal(rest.to_string())
        }
        "reveal" => Command::Reveal(parse_envelope(rest.trim())?),
        "status" => Command::Status,
        "lock" => Command::Lock,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Accept either the JSON printed by `seal` or `<ciphertext> <iv>`.
fn parse_envelope(arg: &str) -> Result<EncryptedSecret, ParseError> {
    if arg.is_empty() {
        return Err(ParseError::MissingArgument("reveal"));
    }
    if arg.starts_with('{') {
        return EncryptedSecret::from_json(arg)
            .map_err(|e| ParseError::InvalidEnvelope(e.to_string()));
    }

    let mut parts = arg.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(ciphertext), Some(iv), None) => Ok(EncryptedSecret::new(ciphertext, iv)),
        _ => Err(ParseError::InvalidEnvelope(
            "expected JSON or `<ciphertext> <iv>`".to_string(),
        )),
    }
}
