//! Password-derived symmetric encryption
//!
//! Every note on disk is an opaque payload produced here. The key is the
//! SHA-256 digest of the password, so the same password always opens the
//! same note tree and no key material is stored anywhere.
//!
//! Payload layout: a fresh 24-byte random nonce, followed by the
//! XChaCha20-Poly1305 ciphertext and its 16-byte authentication tag.
//! The tag makes wrong-password detection certain: decryption either
//! returns the exact plaintext or fails, never garbage.
//!
//! The empty payload is the encryption of the empty note. A newly created
//! zero-length file therefore decrypts under any password.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Nonce length for XChaCha20-Poly1305
const NONCE_LEN: usize = 24;

/// Poly1305 authentication tag length
const TAG_LEN: usize = 16;

/// Errors produced by encryption and decryption
#[derive(Error, Debug)]
pub enum CipherError {
    /// Payload too short to contain a nonce and tag
    #[error("Ciphertext is malformed: {len} bytes is too short to hold a nonce and tag")]
    Malformed { len: usize },

    /// Authentication failed: wrong password or modified ciphertext
    #[error("Decryption failed: wrong password or corrupted data")]
    Decryption,

    /// Underlying AEAD failure
    #[error("Cipher failure: {0}")]
    Internal(String),
}

/// Symmetric cipher holding the key for one process lifetime
pub struct Cipher {
    key: [u8; 32],
}

impl Cipher {
    /// Derive the cipher from a password
    ///
    /// The key is SHA-256 of the password bytes. Any string works,
    /// including the empty one.
    pub fn new(password: &str) -> Self {
        let mut key = [0u8; 32];
        key.copy_from_slice(&Sha256::digest(password.as_bytes()));
        Self { key }
    }

    /// Encrypt plaintext into a self-contained payload
    ///
    /// Each call draws a fresh nonce, so encrypting the same text twice
    /// yields different payloads. Empty plaintext maps to an empty payload.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        if plaintext.is_empty() {
            return Ok(Vec::new());
        }

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = XNonce::from_slice(&nonce_bytes);

        let cipher = XChaCha20Poly1305::new_from_slice(&self.key)
            .map_err(|e| CipherError::Internal(e.to_string()))?;
        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| CipherError::Internal(e.to_string()))?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&ciphertext);
        Ok(payload)
    }

    /// Decrypt a payload back into plaintext
    ///
    /// Fails with [`CipherError::Decryption`] when the key does not match
    /// the one the payload was produced with, or when the bytes were
    /// altered on disk.
    pub fn decrypt(&self, payload: &[u8]) -> Result<Vec<u8>, CipherError> {
        if payload.is_empty() {
            return Ok(Vec::new());
        }
        if payload.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::Malformed { len: payload.len() });
        }

        let (nonce_bytes, ciphertext) = payload.split_at(NONCE_LEN);
        let nonce = XNonce::from_slice(nonce_bytes);

        let cipher = XChaCha20Poly1305::new_from_slice(&self.key)
            .map_err(|e| CipherError::Internal(e.to_string()))?;
        cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CipherError::Decryption)
    }
}
