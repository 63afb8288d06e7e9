// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

//! Request and response shapes of the AWS KMS JSON protocol. Binary fields
//! travel as base64 strings on the wire.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

use super::AwsKmsConfig;

/// Length of the data key to generate.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySpec {
    #[serde(rename = "AES_256")]
    Aes256,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct GenerateDataKeyRequest {
    pub key_id: String,
    pub key_spec: KeySpec,
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct GenerateDataKeyResponse {
    #[serde_as(as = "Base64")]
    pub ciphertext_blob: Vec<u8>,

    #[serde_as(as = "Base64")]
    pub plaintext: Vec<u8>,

    #[serde(default)]
    pub key_id: String,
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DecryptRequest {
    #[serde_as(as = "Base64")]
    pub ciphertext_blob: Vec<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DecryptResponse {
    #[serde_as(as = "Base64")]
    pub plaintext: Vec<u8>,

    #[serde(default)]
    pub key_id: String,
}

/// Error body returned by AWS KMS with a non-2xx status.
#[derive(Deserialize, Debug, Default)]
pub struct ErrorResponse {
    #[serde(rename = "__type", default)]
    pub error_type: String,

    #[serde(alias = "Message", default)]
    pub message: String,
}

/// The calls of the AWS KMS backend that a key service needs.
///
/// Implementations must be safe to share between concurrent callers.
#[async_trait]
pub trait AwsKmsApi: Send + Sync + Sized {
    /// Build a client from the connection configuration.
    fn from_config(config: &AwsKmsConfig) -> anyhow::Result<Self>;

    async fn generate_data_key(
        &self,
        request: GenerateDataKeyRequest,
    ) -> anyhow::Result<GenerateDataKeyResponse>;

    async fn decrypt(&self, request: DecryptRequest) -> anyhow::Result<DecryptResponse>;
}
