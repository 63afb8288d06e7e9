// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use std::time::Duration;

use async_trait::async_trait;
use const_format::concatcp;
use log::debug;
use zeroize::Zeroizing;

use crate::plugins::_IN_GUEST_DEFAULT_KEY_PATH;
use crate::utils::{credential_dir, export_provider_settings, parse_provider_settings};
use crate::{DataKey, EncryptedKey, KeyService, PlaintextKey, ProviderSettings};
use crate::{Error, Result};

use super::{
    AwsCredential, AwsKmsApi, AwsKmsConfig, AwsProviderSettings, DecryptRequest,
    GenerateDataKeyRequest, HttpAwsKmsApi, KeySpec,
};

const AWS_IN_GUEST_DEFAULT_KEY_PATH: &str = concatcp!(_IN_GUEST_DEFAULT_KEY_PATH, "/aws");

/// A [`KeyService`] backed by AWS KMS. All data keys are generated under
/// the master key `key_id`.
pub struct AwsKmsClient<C: AwsKmsApi = HttpAwsKmsApi> {
    key_id: String,
    region: String,
    endpoint: Option<String>,
    timeout: Option<Duration>,
    client: C,
}

impl<C: AwsKmsApi> AwsKmsClient<C> {
    /// Create the backend client `C` from `config`.
    pub fn new(key_id: &str, config: &AwsKmsConfig) -> Result<Self> {
        let client = C::from_config(config).map_err(|source| Error::AwsKmsError {
            source,
            context: "create kms client",
        })?;

        Ok(Self::with_client(key_id, config, client))
    }

    /// Wrap an already built backend client. `config` is only kept for
    /// [`Self::export_provider_settings`].
    pub fn with_client(key_id: &str, config: &AwsKmsConfig, client: C) -> Self {
        Self {
            key_id: key_id.to_owned(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
            timeout: config.timeout,
            client,
        }
    }

    /// This new function is used by a in-guest client. The credential is read
    /// from the env `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`/`AWS_SESSION_TOKEN`
    /// if set, or else from `credential.json` under [`AWS_IN_GUEST_DEFAULT_KEY_PATH`].
    pub async fn from_provider_settings(provider_settings: &ProviderSettings) -> Result<Self> {
        let provider_settings: AwsProviderSettings = parse_provider_settings(provider_settings)?;

        let credential = match AwsCredential::from_env() {
            Some(credential) => {
                debug!("use aws credential from env");
                credential
            }
            None => {
                let key_path = credential_dir("AWS_IN_GUEST_KEY_PATH", AWS_IN_GUEST_DEFAULT_KEY_PATH);
                AwsCredential::from_file(&format!("{key_path}/credential.json"))
                    .await
                    .map_err(|source| Error::AwsKmsError {
                        source,
                        context: "load credential",
                    })?
            }
        };

        let config = AwsKmsConfig {
            region: provider_settings.region,
            endpoint: provider_settings.endpoint,
            timeout: provider_settings.timeout_secs.map(Duration::from_secs),
            credential,
        };
        Self::new(&provider_settings.key_id, &config)
    }

    /// Export the [`ProviderSettings`] of the current client. This function is to be used
    /// in the encryptor side. The [`ProviderSettings`] will be used to initial a client
    /// in the decryptor side.
    pub fn export_provider_settings(&self) -> Result<ProviderSettings> {
        export_provider_settings(&AwsProviderSettings {
            key_id: self.key_id.clone(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout.map(|t| t.as_secs()),
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

#[async_trait]
impl<C: AwsKmsApi> KeyService for AwsKmsClient<C> {
    async fn get_data_key(&self) -> Result<DataKey> {
        let request = GenerateDataKeyRequest {
            key_id: self.key_id.clone(),
            key_spec: KeySpec::Aes256,
        };
        let response = self
            .client
            .generate_data_key(request)
            .await
            .map_err(|source| Error::AwsKmsError {
                source,
                context: "generate data key",
            })?;

        Ok(DataKey {
            plaintext_key: Zeroizing::new(response.plaintext),
            encrypted_key: EncryptedKey::from_bytes(&response.ciphertext_blob),
        })
    }

    async fn decrypt_data_key(&self, encrypted_key: &EncryptedKey) -> Result<PlaintextKey> {
        let request = DecryptRequest {
            ciphertext_blob: encrypted_key.decode_base64()?,
            key_id: None,
        };
        let response = self
            .client
            .decrypt(request)
            .await
            .map_err(|source| Error::AwsKmsError {
                source,
                context: "decrypt data key",
            })?;

        Ok(Zeroizing::new(response.plaintext))
    }
}
