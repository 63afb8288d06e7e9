// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use kms::{DataKey, KeyService};
use log::debug;

use crate::{Envelope, Error, Result};

/// Encrypts payloads into [`Envelope`]s and back.
///
/// All key material flows through the injected [`KeyService`]. The encrypter
/// keeps no state between calls, so one instance can serve concurrent
/// callers.
pub struct EnvelopeEncrypter<K> {
    key_service: K,
}

impl<K: KeyService> EnvelopeEncrypter<K> {
    pub fn new(key_service: K) -> Self {
        Self { key_service }
    }

    pub fn key_service(&self) -> &K {
        &self.key_service
    }

    /// Encrypt `plaintext` under a fresh data key. The plaintext form of the
    /// data key is wiped before this returns.
    pub async fn encrypt(&self, plaintext: &[u8]) -> Result<Envelope> {
        let DataKey {
            plaintext_key,
            encrypted_key,
        } = self
            .key_service
            .get_data_key()
            .await
            .map_err(|source| Error::KeyService {
                source,
                context: "get data key",
            })?;

        let salt = crypto::generate_nonce();
        let ciphertext =
            crypto::encrypt(&plaintext_key, plaintext, &salt).map_err(|e| Error::Crypto {
                source: e.into(),
                context: "encrypt payload",
            })?;
        drop(plaintext_key);

        debug!(
            "sealed {} bytes payload into {} bytes ciphertext",
            plaintext.len(),
            ciphertext.len()
        );
        Ok(Envelope {
            key: encrypted_key,
            ciphertext,
            salt,
        })
    }

    /// Recover the payload of `envelope`. Fails with [`Error::Authentication`]
    /// if any field of the envelope was altered.
    pub async fn decrypt(&self, envelope: &Envelope) -> Result<Vec<u8>> {
        let plaintext_key = match self.key_service.decrypt_data_key(&envelope.key).await {
            Ok(key) => key,
            Err(e @ kms::Error::MalformedEncryptedKey(_)) => {
                return Err(Error::Crypto {
                    source: e.into(),
                    context: "decode encrypted key",
                })
            }
            Err(source) => {
                return Err(Error::KeyService {
                    source,
                    context: "decrypt data key",
                })
            }
        };

        let plaintext = crypto::decrypt(&plaintext_key, &envelope.ciphertext, &envelope.salt)
            .map_err(|e| match e {
                crypto::Error::AuthenticationFailed => Error::Authentication,
                e => Error::Crypto {
                    source: e.into(),
                    context: "decrypt payload",
                },
            })?;

        debug!("opened envelope of {} bytes payload", plaintext.len());
        Ok(plaintext)
    }
}
