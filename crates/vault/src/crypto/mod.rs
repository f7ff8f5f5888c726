//! Client-side envelope for a single secret string.
//!
//! This module has no session or I/O dependencies. It provides the
//! encrypt/decrypt operations used by the credential layer.
//!
//! # Scheme
//!
//! ```text
//! key        = SHA-256(utf8(passphrase))
//! iv         = 16 random bytes, fresh per call
//! ciphertext = AES-256-CBC-PKCS7(key, iv, utf8(plaintext))
//! stored as  { "ciphertext": base64(ciphertext), "iv": hex(iv) }
//! ```
//!
//! The scheme has no salt and no integrity tag. It is kept as-is so that
//! records written by existing clients stay readable.

pub mod cipher;
pub mod envelope;
pub mod key;

pub use cipher::{IV_LEN, KEY_LEN};
pub use envelope::{decrypt, decrypt_async, decrypt_secret, encrypt, encrypt_async};
pub use key::{derive_key, DerivedKey};
