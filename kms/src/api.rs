// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

//! # Api definitions for key services
//!
//! A key service is the custodian of a master key. It hands out fresh data
//! keys in two forms, and later turns the encrypted form back into the
//! plaintext one. The master key itself never leaves the service.
//!
//! To establish a connection between the client and the key service, two
//! kinds of parameters are required:
//! - Public parameters: like Region Id of the KMS, the id of the master key,
//! etc. They are not confidential and can be seen by anyone. [`ProviderSettings`]
//! is a json object to include all the public parameters. The hashmap style
//! makes it flexible for different kinds of key services.
//! - Private parameters: like the credential to access (e.g. access key).
//! These parameters should be captured inside the logic of
//! `from_provider_settings()` rather than the input parameter.
//!
//! ## APIs
//! - `KeyService::get_data_key`: generate a new data key under the master key.
//! - `KeyService::decrypt_data_key`: recover the plaintext of an encrypted data key.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use crate::{Error, Result};

/// ProviderSettings are extra information to create a client
pub type ProviderSettings = Map<String, Value>;

/// Plaintext form of a data key. Wiped from memory when dropped.
pub type PlaintextKey = Zeroizing<Vec<u8>>;

/// Encrypted form of a data key. Only the key service that produced it can
/// reverse it. The content is backend specific text and is safe to store
/// and transmit as is.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(transparent)]
pub struct EncryptedKey(String);

impl EncryptedKey {
    /// Encode a binary blob returned by a backend into its transportable form.
    pub fn from_bytes(blob: &[u8]) -> Self {
        Self(STANDARD.encode(blob))
    }

    /// Decode the transportable form back to the binary blob expected by a
    /// backend. Only meaningful for keys built with [`EncryptedKey::from_bytes`].
    pub fn decode_base64(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.0)
            .map_err(Error::MalformedEncryptedKey)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EncryptedKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EncryptedKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for EncryptedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Both representations of one data key.
pub struct DataKey {
    /// Raw key bytes. Used once, never persisted.
    pub plaintext_key: PlaintextKey,

    /// The same key encrypted under the master key.
    pub encrypted_key: EncryptedKey,
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataKey")
            .field("plaintext_key", &"<redacted>")
            .field("encrypted_key", &self.encrypted_key)
            .finish()
    }
}

#[async_trait]
pub trait KeyService: Send + Sync {
    /// Ask the key service for a fresh data key under its configured master
    /// key. Both forms are returned together or not at all.
    async fn get_data_key(&self) -> Result<DataKey>;

    /// Ask the key service to decrypt the `encrypted_key` produced by an
    /// earlier [`KeyService::get_data_key`]. The decryption occurs inside
    /// the key service.
    async fn decrypt_data_key(&self, encrypted_key: &EncryptedKey) -> Result<PlaintextKey>;
}

#[async_trait]
impl<T: KeyService + ?Sized> KeyService for Box<T> {
    async fn get_data_key(&self) -> Result<DataKey> {
        (**self).get_data_key().await
    }

    async fn decrypt_data_key(&self, encrypted_key: &EncryptedKey) -> Result<PlaintextKey> {
        (**self).decrypt_data_key(encrypted_key).await
    }
}

#[async_trait]
impl<T: KeyService + ?Sized> KeyService for Arc<T> {
    async fn get_data_key(&self) -> Result<DataKey> {
        (**self).get_data_key().await
    }

    async fn decrypt_data_key(&self, encrypted_key: &EncryptedKey) -> Result<PlaintextKey> {
        (**self).decrypt_data_key(encrypted_key).await
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use zeroize::Zeroizing;

    use super::{DataKey, EncryptedKey};
    use crate::Error;

    #[rstest]
    #[case(b"thing", "dGhpbmc=")]
    #[case(b"", "")]
    #[case(&[0xff, 0x00, 0x10], "/wAQ")]
    fn encode_decode(#[case] blob: &[u8], #[case] encoded: &str) {
        let key = EncryptedKey::from_bytes(blob);
        assert_eq!(key.as_str(), encoded);
        assert_eq!(key.decode_base64().unwrap(), blob);
    }

    #[rstest]
    #[case("foo")]
    #[case("not base64!")]
    fn malformed(#[case] encoded: &str) {
        let key = EncryptedKey::from(encoded);
        assert!(matches!(
            key.decode_base64(),
            Err(Error::MalformedEncryptedKey(_))
        ));
    }

    #[test]
    fn serialized_as_plain_string() {
        let key = EncryptedKey::from("foo");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"foo\"");
    }

    #[test]
    fn debug_redacts_plaintext() {
        let data_key = DataKey {
            plaintext_key: Zeroizing::new(b"super secret".to_vec()),
            encrypted_key: EncryptedKey::from("foo"),
        };
        let debug = format!("{data_key:?}");
        assert!(!debug.contains("115"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("foo"));
    }
}
