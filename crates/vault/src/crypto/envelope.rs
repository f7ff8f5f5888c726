//! String-level encrypt/decrypt producing and consuming [`EncryptedSecret`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::protocol::IV_HEX_LEN;
use common::{CryptoError, DecryptFailure, EncryptedSecret};
use secrecy::{ExposeSecret, SecretString};
use tokio::task;
use zeroize::Zeroizing;

use super::cipher::{decrypt_cbc, encrypt_cbc, generate_iv, CipherError, IV_LEN};
use super::key::derive_key;

/// Encrypt `plaintext` under a key derived from `passphrase`.
///
/// A new random IV is drawn for every call, so encrypting the same plaintext
/// twice yields two different [`EncryptedSecret`] values.
///
/// # Errors
///
/// Returns [`CryptoError::Encryption`] if the random source or the cipher
/// cannot be used. Nothing is returned on failure.
pub fn encrypt(plaintext: &str, passphrase: &str) -> Result<EncryptedSecret, CryptoError> {
    let iv = generate_iv().map_err(encryption_error)?;
    let key = derive_key(passphrase);
    let ciphertext =
        encrypt_cbc(plaintext.as_bytes(), key.as_bytes(), &iv).map_err(encryption_error)?;

    Ok(EncryptedSecret {
        ciphertext: STANDARD.encode(ciphertext),
        iv: hex::encode(iv),
    })
}

/// Decrypt a Base64 `ciphertext` with its hex `iv` under `passphrase`.
///
/// # Errors
///
/// Returns [`CryptoError::Decryption`] if the IV or ciphertext cannot be
/// decoded, the padding check fails, or the result is not UTF-8. A wrong
/// passphrase can, rarely, decrypt to valid UTF-8; that text is returned.
pub fn decrypt(ciphertext: &str, iv: &str, passphrase: &str) -> Result<String, CryptoError> {
    let iv = decode_iv(iv)?;
    let ciphertext = STANDARD
        .decode(ciphertext.trim())
        .map_err(|_| CryptoError::Decryption(DecryptFailure::MalformedCiphertext))?;

    let key = derive_key(passphrase);
    let plaintext = Zeroizing::new(
        decrypt_cbc(&ciphertext, key.as_bytes(), &iv).map_err(|e| match e {
            CipherError::InvalidLength => CryptoError::Decryption(DecryptFailure::Key),
            CipherError::Unpad | CipherError::RandomSource(_) => {
                CryptoError::Decryption(DecryptFailure::Padding)
            }
        })?,
    );

    std::str::from_utf8(&plaintext)
        .map(str::to_owned)
        .map_err(|_| CryptoError::Decryption(DecryptFailure::NotUtf8))
}

/// Decrypt an [`EncryptedSecret`] pair.
pub fn decrypt_secret(secret: &EncryptedSecret, passphrase: &str) -> Result<String, CryptoError> {
    decrypt(&secret.ciphertext, &secret.iv, passphrase)
}

/// [`encrypt`] on the blocking pool, so the calling task suspends instead of
/// stalling the runtime.
pub async fn encrypt_async(
    plaintext: &str,
    passphrase: &SecretString,
) -> Result<EncryptedSecret, CryptoError> {
    let plaintext = Zeroizing::new(plaintext.to_owned());
    let passphrase = passphrase.clone();
    task::spawn_blocking(move || encrypt(&plaintext, passphrase.expose_secret()))
        .await
        .map_err(|e| CryptoError::Encryption(format!("encryption task failed: {e}")))?
}

/// [`decrypt_secret`] on the blocking pool.
pub async fn decrypt_async(
    secret: &EncryptedSecret,
    passphrase: &SecretString,
) -> Result<String, CryptoError> {
    let secret = secret.clone();
    let passphrase = passphrase.clone();
    task::spawn_blocking(move || decrypt_secret(&secret, passphrase.expose_secret()))
        .await
        .map_err(|_| CryptoError::Decryption(DecryptFailure::Interrupted))?
}

fn decode_iv(iv: &str) -> Result<[u8; IV_LEN], CryptoError> {
    let iv = iv.trim();
    if iv.len() != IV_HEX_LEN {
        return Err(CryptoError::Decryption(DecryptFailure::MalformedIv));
    }
    let mut bytes = [0u8; IV_LEN];
    hex::decode_to_slice(iv, &mut bytes)
        .map_err(|_| CryptoError::Decryption(DecryptFailure::MalformedIv))?;
    Ok(bytes)
}

fn encryption_error(e: CipherError) -> CryptoError {
    CryptoError::Encryption(e.to_string())
}
