//! Authenticated file encryption.
//!
//! Every shared file is sealed with AES-128-EAX under a fresh random key.
//! The serialized payload layout is `nonce || tag || ciphertext`, so the
//! detached-tag API is used throughout.

use aes::Aes128;
use eax::aead::generic_array::GenericArray;
use eax::aead::{AeadInPlace, KeyInit};
use eax::Eax;
use rand::RngCore;

use crate::constants::{HEADER_SIZE, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
use crate::error::CryptoError;

type Aes128Eax = Eax<Aes128>;

/// Per-file symmetric key (128 bits, never reused across files).
pub type FileKey = [u8; KEY_SIZE];

pub fn generate_file_key() -> FileKey {
    let mut key = [0u8; KEY_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut key);
    key
}

pub fn generate_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    nonce
}

/// An encrypted payload split into its wire components.
///
/// Immutable once produced; [`to_bytes`](Self::to_bytes) emits
/// `nonce || tag || ciphertext` and [`from_bytes`](Self::from_bytes) parses
/// the same layout back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    pub nonce: [u8; NONCE_SIZE],
    pub tag: [u8; TAG_SIZE],
    pub ciphertext: Vec<u8>,
}

impl EncryptedBlob {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(HEADER_SIZE + self.ciphertext.len());
        output.extend_from_slice(&self.nonce);
        output.extend_from_slice(&self.tag);
        output.extend_from_slice(&self.ciphertext);
        output
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        if data.len() < HEADER_SIZE {
            return Err(CryptoError::Malformed);
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&data[..NONCE_SIZE]);
        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&data[NONCE_SIZE..HEADER_SIZE]);

        Ok(Self {
            nonce,
            tag,
            ciphertext: data[HEADER_SIZE..].to_vec(),
        })
    }
}

/// Encrypt `plaintext` under a freshly generated key and nonce.
///
/// Returns the payload together with the key; the caller owns key custody.
pub fn encrypt(plaintext: &[u8]) -> Result<(EncryptedBlob, FileKey), CryptoError> {
    let key = generate_file_key();
    let blob = encrypt_with_key(&key, plaintext)?;
    Ok((blob, key))
}

pub fn encrypt_with_key(key: &FileKey, plaintext: &[u8]) -> Result<EncryptedBlob, CryptoError> {
    let cipher = Aes128Eax::new(key.into());
    let nonce_bytes = generate_nonce();

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&nonce_bytes), b"", &mut buffer)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut tag_bytes = [0u8; TAG_SIZE];
    tag_bytes.copy_from_slice(&tag);

    Ok(EncryptedBlob {
        nonce: nonce_bytes,
        tag: tag_bytes,
        ciphertext: buffer,
    })
}

/// Decrypt a payload, verifying its authentication tag.
///
/// Any tampering with nonce, tag, or ciphertext (or a wrong key) yields
/// [`CryptoError::Authentication`].
pub fn decrypt(key: &FileKey, blob: &EncryptedBlob) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes128Eax::new(key.into());

    let mut buffer = blob.ciphertext.clone();
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(&blob.nonce),
            b"",
            &mut buffer,
            GenericArray::from_slice(&blob.tag),
        )
        .map_err(|_| CryptoError::Authentication)?;

    Ok(buffer)
}

/// Lowercase hex encoding of a file key, the form stored in ledger records.
pub fn key_to_hex(key: &FileKey) -> String {
    hex::encode(key)
}

pub fn key_from_hex(s: &str) -> Result<FileKey, CryptoError> {
    let bytes = hex::decode(s.trim()).map_err(|_| CryptoError::Malformed)?;
    if bytes.len() != KEY_SIZE {
        return Err(CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            got: bytes.len(),
        });
    }

    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&bytes);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let plaintext = b"Chain of custody starts here.";

        let (blob, key) = encrypt(plaintext).unwrap();
        let decrypted = decrypt(&key, &blob).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_empty_plaintext_roundtrip() {
        let (blob, key) = encrypt(b"").unwrap();
        assert!(blob.ciphertext.is_empty());
        assert_eq!(decrypt(&key, &blob).unwrap(), b"");
    }

    #[test]
    fn test_wrong_key_fails() {
        let (blob, _key) = encrypt(b"Secret document").unwrap();
        let other_key = generate_file_key();

        assert!(matches!(
            decrypt(&other_key, &blob),
            Err(CryptoError::Authentication)
        ));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let (mut blob, key) = encrypt(b"Important data").unwrap();
        blob.ciphertext[0] ^= 0x01;

        assert!(matches!(
            decrypt(&key, &blob),
            Err(CryptoError::Authentication)
        ));
    }

    #[test]
    fn test_tampered_tag_fails() {
        let (mut blob, key) = encrypt(b"Important data").unwrap();
        blob.tag[TAG_SIZE - 1] ^= 0x80;

        assert!(decrypt(&key, &blob).is_err());
    }

    #[test]
    fn test_tampered_nonce_fails() {
        let (mut blob, key) = encrypt(b"Important data").unwrap();
        blob.nonce[3] ^= 0xFF;

        assert!(decrypt(&key, &blob).is_err());
    }

    #[test]
    fn test_wire_layout() {
        let plaintext = b"layout check";
        let (blob, _key) = encrypt(plaintext).unwrap();
        let bytes = blob.to_bytes();

        assert_eq!(bytes.len(), HEADER_SIZE + plaintext.len());
        assert_eq!(&bytes[..NONCE_SIZE], &blob.nonce);
        assert_eq!(&bytes[NONCE_SIZE..HEADER_SIZE], &blob.tag);
        assert_eq!(&bytes[HEADER_SIZE..], &blob.ciphertext[..]);

        let parsed = EncryptedBlob::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, blob);
    }

    #[test]
    fn test_short_buffer_rejected() {
        assert!(matches!(
            EncryptedBlob::from_bytes(&[]),
            Err(CryptoError::Malformed)
        ));
        assert!(matches!(
            EncryptedBlob::from_bytes(&[0u8; HEADER_SIZE - 1]),
            Err(CryptoError::Malformed)
        ));
        // Exactly nonce + tag is a valid (empty-ciphertext) payload.
        assert!(EncryptedBlob::from_bytes(&[0u8; HEADER_SIZE]).is_ok());
    }

    #[test]
    fn test_fresh_key_and_nonce_per_call() {
        let (blob1, key1) = encrypt(b"same input").unwrap();
        let (blob2, key2) = encrypt(b"same input").unwrap();

        assert_ne!(key1, key2);
        assert_ne!(blob1.nonce, blob2.nonce);
        assert_ne!(blob1.ciphertext, blob2.ciphertext);
    }

    #[test]
    fn test_key_hex_roundtrip() {
        let key = generate_file_key();
        let hex_str = key_to_hex(&key);

        assert_eq!(hex_str.len(), KEY_SIZE * 2);
        assert_eq!(key_from_hex(&hex_str).unwrap(), key);
    }

    #[test]
    fn test_key_from_hex_wrong_length() {
        assert!(matches!(
            key_from_hex("abcd"),
            Err(CryptoError::InvalidKeyLength { expected: 16, got: 2 })
        ));
    }

    #[test]
    fn test_key_from_hex_bad_chars() {
        assert!(key_from_hex("zz".repeat(16).as_str()).is_err());
    }
}
