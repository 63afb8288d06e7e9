// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

//! APIs for symmetric keys

use crate::rust::aes256gcm;
use crate::{Error, Result};

/// Key length of A256GCM in bytes.
pub const KEY_LEN: usize = 32;

/// IV length of A256GCM in bytes.
pub const NONCE_LEN: usize = 12;

/// Length of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

fn check_params(key: &[u8], iv: &[u8]) -> Result<()> {
    if key.len() != KEY_LEN {
        return Err(Error::InvalidKeyLength(key.len()));
    }

    if iv.len() != NONCE_LEN {
        return Err(Error::InvalidIvLength(iv.len()));
    }

    Ok(())
}

/// Encrypt the given `plaintext` with A256GCM. The returned ciphertext
/// carries the tag at its end.
///
/// Note:
/// - key length: 32 bytes
/// - IV length: 12 bytes
pub fn encrypt(key: &[u8], plaintext: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    check_params(key, iv)?;
    aes256gcm::encrypt(key, plaintext, iv)
}

/// Decrypt the given `ciphertext` with A256GCM. No plaintext is returned
/// unless the tag verifies.
pub fn decrypt(key: &[u8], ciphertext: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    check_params(key, iv)?;
    if ciphertext.len() < TAG_LEN {
        return Err(Error::CiphertextTooShort(ciphertext.len()));
    }

    aes256gcm::decrypt(key, ciphertext, iv)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{decrypt, encrypt, TAG_LEN};
    use crate::Error;

    const KEY: &[u8] = b"0123456789abcdefghijklmnopqrstuv";
    const IV: &[u8] = b"unique nonce";

    #[rstest]
    #[case(&[0u8; 31], IV, Error::InvalidKeyLength(31))]
    #[case(b"", IV, Error::InvalidKeyLength(0))]
    #[case(KEY, b"short", Error::InvalidIvLength(5))]
    #[case(KEY, b"a nonce that is too long", Error::InvalidIvLength(24))]
    fn illegal_parameters(#[case] key: &[u8], #[case] iv: &[u8], #[case] expected: Error) {
        assert_eq!(encrypt(key, b"data", iv), Err(expected.clone()));
        assert_eq!(decrypt(key, &[0u8; 32], iv), Err(expected));
    }

    #[test]
    fn tag_is_appended() {
        let ciphertext = encrypt(KEY, b"plaintext", IV).unwrap();
        assert_eq!(ciphertext.len(), b"plaintext".len() + TAG_LEN);
    }

    #[test]
    fn truncated_ciphertext() {
        assert_eq!(
            decrypt(KEY, &[0u8; TAG_LEN - 1], IV),
            Err(Error::CiphertextTooShort(TAG_LEN - 1))
        );
    }

    #[rstest]
    #[case::first_byte(0)]
    #[case::last_byte(b"plaintext".len())]
    #[case::in_tag(b"plaintext".len() + TAG_LEN - 1)]
    fn tampered_ciphertext(#[case] index: usize) {
        let mut ciphertext = encrypt(KEY, b"plaintext", IV).unwrap();
        ciphertext[index] ^= 0x01;
        assert_eq!(decrypt(KEY, &ciphertext, IV), Err(Error::AuthenticationFailed));
    }

    #[test]
    fn wrong_key() {
        let ciphertext = encrypt(KEY, b"plaintext", IV).unwrap();
        assert_eq!(
            decrypt(b"hijklmnopqrstuv0123456789abcdefg", &ciphertext, IV),
            Err(Error::AuthenticationFailed)
        );
    }
}
