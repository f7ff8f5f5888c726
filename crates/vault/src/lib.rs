//! `vault`: client-side credential envelope and master-passphrase session.
//!
//! - [`crypto`] encrypts a single password field under a passphrase-derived key.
//! - [`session`] caches the master passphrase in memory with a time-to-live.
//! - [`credentials`] combines the two into the seal/reveal flow a host calls.
//! - [`shell`] is the interactive host shipped as the `vault` binary.

pub mod config;
pub mod credentials;
pub mod crypto;
pub mod generator;
pub mod session;
pub mod shell;
pub mod telemetry;
