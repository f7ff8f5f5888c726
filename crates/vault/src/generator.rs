//! Random password generation.

use rand::{rngs::OsRng, Rng};
use thiserror::Error;

/// Characters a generated password is drawn from.
pub const CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+[]{}|;:,.<>?";

/// Length used when the caller does not ask for one.
pub const DEFAULT_LENGTH: usize = 16;

/// Longest password [`generate_password`] will produce.
pub const MAX_LENGTH: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("password length must be between 1 and {MAX_LENGTH}, got {0}")]
    InvalidLength(usize),
}

/// Generate a password of `len` characters chosen uniformly from [`CHARSET`]
/// using the OS CSPRNG.
pub fn generate_password(len: usize) -> Result<String, GeneratorError> {
    if len == 0 || len > MAX_LENGTH {
        return Err(GeneratorError::InvalidLength(len));
    }
    let mut rng = OsRng;
    Ok((0..len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect())
}
