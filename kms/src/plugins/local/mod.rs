// Copyright (c) 2021 IBM Corp.
// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

//! This is a local key service.
//!
//! Master keys are read from a json file in the credential directory and
//! stay in the process memory. It is meant for development and offline
//! environments where no remote KMS is reachable. Each data key is wrapped
//! under the master key with A256GCM:
//!
//! ```text
//! encrypted_key = base64( iv (12 bytes) || ciphertext || tag (16 bytes) )
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use const_format::concatcp;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::fs;
use zeroize::Zeroizing;

use crate::plugins::_IN_GUEST_DEFAULT_KEY_PATH;
use crate::utils::{credential_dir, export_provider_settings, parse_provider_settings};
use crate::{DataKey, EncryptedKey, KeyService, PlaintextKey, ProviderSettings};
use crate::{Error, Result};

const LOCAL_IN_GUEST_DEFAULT_KEY_PATH: &str = concatcp!(_IN_GUEST_DEFAULT_KEY_PATH, "/local");

/// Name of the file under the credential directory. Its content is a json
/// map from master key id to the base64 encoded 32 bytes key.
pub const MASTER_KEYS_FILE: &str = "master_keys.json";

/// Both the file content and the decoded map are wiped on drop.
async fn read_master_keys(path: &str) -> Result<HashMap<String, Zeroizing<String>>> {
    let file = Zeroizing::new(
        fs::read(path)
            .await
            .map_err(|e| Error::LocalKmsError(format!("read master keys {path} failed: {e}")))?,
    );
    serde_json::from_slice(&file)
        .map_err(|e| Error::LocalKmsError(format!("illegal master keys file: {e}")))
}

/// Serialized [`crate::ProviderSettings`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocalProviderSettings {
    pub key_id: String,
}

pub struct LocalKms {
    key_id: String,
    master_key: Zeroizing<Vec<u8>>,
}

impl LocalKms {
    pub fn new(key_id: &str, master_key: Zeroizing<Vec<u8>>) -> Result<Self> {
        if master_key.len() != crypto::KEY_LEN {
            return Err(Error::LocalKmsError(format!(
                "master key {key_id} must be {} bytes, got {}",
                crypto::KEY_LEN,
                master_key.len()
            )));
        }

        Ok(Self {
            key_id: key_id.to_owned(),
            master_key,
        })
    }

    /// This new function is used by a in-guest client. The side-effect is to read the
    /// [`LOCAL_IN_GUEST_DEFAULT_KEY_PATH`] which is the by default path where the master
    /// keys are saved.
    pub async fn from_provider_settings(provider_settings: &ProviderSettings) -> Result<Self> {
        let key_path = credential_dir("LOCAL_KMS_KEY_PATH", LOCAL_IN_GUEST_DEFAULT_KEY_PATH);
        let provider_settings: LocalProviderSettings = parse_provider_settings(provider_settings)?;

        let master_keys_path = format!("{key_path}/{MASTER_KEYS_FILE}");
        let master_keys = read_master_keys(&master_keys_path).await?;
        if master_keys.len() > 1 {
            debug!(
                "{} master keys found in {master_keys_path}, only {} is used",
                master_keys.len(),
                provider_settings.key_id
            );
        }

        let encoded = master_keys.get(&provider_settings.key_id).ok_or_else(|| {
            Error::LocalKmsError(format!(
                "master key {} not found in {master_keys_path}",
                provider_settings.key_id
            ))
        })?;
        let master_key = Zeroizing::new(STANDARD.decode(encoded.as_bytes()).map_err(|e| {
            Error::LocalKmsError(format!("decode master key failed: {e}"))
        })?);

        Self::new(&provider_settings.key_id, master_key)
    }

    /// Export the [`ProviderSettings`] of the current client. The secret
    /// master key is not part of it.
    pub fn export_provider_settings(&self) -> Result<ProviderSettings> {
        export_provider_settings(&LocalProviderSettings {
            key_id: self.key_id.clone(),
        })
    }
}

#[async_trait]
impl KeyService for LocalKms {
    async fn get_data_key(&self) -> Result<DataKey> {
        let plaintext_key = crypto::generate_key();
        let iv = crypto::generate_nonce();
        let wrapped = crypto::encrypt(&self.master_key, &plaintext_key, &iv)
            .map_err(|e| Error::LocalKmsError(format!("wrap data key failed: {e}")))?;

        let mut blob = iv;
        blob.extend_from_slice(&wrapped);

        Ok(DataKey {
            plaintext_key,
            encrypted_key: EncryptedKey::from_bytes(&blob),
        })
    }

    async fn decrypt_data_key(&self, encrypted_key: &EncryptedKey) -> Result<PlaintextKey> {
        let blob = encrypted_key.decode_base64()?;
        if blob.len() < crypto::NONCE_LEN {
            return Err(Error::LocalKmsError(format!(
                "encrypted key of {} bytes is too short",
                blob.len()
            )));
        }

        let (iv, wrapped) = blob.split_at(crypto::NONCE_LEN);
        let plaintext_key = crypto::decrypt(&self.master_key, wrapped, iv).map_err(|e| {
            warn!("local kms refused to unwrap a data key under {}", self.key_id);
            Error::LocalKmsError(format!("unwrap data key failed: {e}"))
        })?;

        Ok(Zeroizing::new(plaintext_key))
    }
}
