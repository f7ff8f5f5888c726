//! Common types, wire formats, and errors shared across `passkeep` crates.

pub mod error;
pub mod protocol;

pub use error::{CryptoError, DecryptFailure};
pub use protocol::{EncryptedSecret, SessionStatus};
