// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AwsCredential;

/// Serialized [`crate::ProviderSettings`]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AwsProviderSettings {
    /// Id, ARN or alias of the master key
    pub key_id: String,

    pub region: String,

    /// Overrides `https://kms.{region}.amazonaws.com`, e.g. for a VPC endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Timeout of a single request to the service, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Everything an [`super::AwsKmsApi`] needs to reach the service.
#[derive(Clone, Debug, PartialEq)]
pub struct AwsKmsConfig {
    pub region: String,
    pub endpoint: Option<String>,
    pub timeout: Option<Duration>,
    pub credential: AwsCredential,
}

impl AwsKmsConfig {
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://kms.{}.amazonaws.com", self.region))
    }
}
