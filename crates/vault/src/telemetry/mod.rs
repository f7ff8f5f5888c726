//! Structured logging for the vault binary.
//!
//! Logs are JSON lines on stderr so they never interleave with shell output
//! on stdout.
//!
//! # Telemetry invariants
//!
//! - **No passphrase, plaintext, ciphertext or key material** may appear in any
//!   log field or span attribute.
//! - Log level is configurable via `PASSKEEP_LOG_LEVEL` (default: `warn`);
//!   `RUST_LOG` takes precedence when set.

pub mod init;

pub use init::init;
