//! AES-256-CBC encryption and decryption of raw byte strings.
//!
//! CBC is not authenticated. Every call to [`encrypt_cbc`] must use a fresh IV
//! from [`generate_iv`]; reusing an IV under the same key leaks whether two
//! plaintexts share a prefix.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of a CBC initialisation vector (one AES block).
pub const IV_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key or IV is the wrong length.
    #[error("invalid key or IV length: expected {KEY_LEN}-byte key and {IV_LEN}-byte IV")]
    InvalidLength,

    /// The OS random source could not produce an IV.
    #[error("random source unavailable: {0}")]
    RandomSource(String),

    /// The ciphertext is not block aligned or its PKCS#7 padding is invalid.
    #[error("invalid padding or block alignment")]
    Unpad,
}

/// Generate a random IV from the OS CSPRNG.
///
/// # Errors
///
/// Returns [`CipherError::RandomSource`] if the OS refuses to supply entropy.
pub fn generate_iv() -> Result<[u8; IV_LEN], CipherError> {
    let mut iv = [0u8; IV_LEN];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|e| CipherError::RandomSource(e.to_string()))?;
    Ok(iv)
}

/// Encrypt `plaintext` with AES-256-CBC and PKCS#7 padding.
///
/// The output length is the plaintext length rounded up to the next multiple
/// of 16, always adding at least one byte of padding.
///
/// # Errors
///
/// Returns [`CipherError::InvalidLength`] if `key` is not [`KEY_LEN`] bytes or
/// `iv` is not [`IV_LEN`] bytes.
pub fn encrypt_cbc(plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CipherError> {
    let encryptor =
        Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| CipherError::InvalidLength)?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt AES-256-CBC `ciphertext` and strip PKCS#7 padding.
///
/// A wrong key usually surfaces as [`CipherError::Unpad`], but about one time
/// in 256 the garbage happens to end in valid padding and is returned.
///
/// # Errors
///
/// Returns [`CipherError::InvalidLength`] for a bad key or IV length, and
/// [`CipherError::Unpad`] if the ciphertext is empty, misaligned, or badly padded.
pub fn decrypt_cbc(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CipherError> {
    let decryptor =
        Aes256CbcDec::new_from_slices(key, iv).map_err(|_| CipherError::InvalidLength)?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::Unpad)
}
