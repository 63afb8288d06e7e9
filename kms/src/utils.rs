// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use std::env;

use log::info;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, ProviderSettings, Result};

/// Resolve the directory holding the private credentials of a provider. The
/// env `env_name` overrides the given default.
pub(crate) fn credential_dir(env_name: &str, default: &str) -> String {
    let key_path = env::var(env_name).unwrap_or(default.to_owned());
    info!("{env_name} = {key_path}");
    key_path
}

/// Parse the public [`ProviderSettings`] into a provider specific struct.
pub(crate) fn parse_provider_settings<T: DeserializeOwned>(
    provider_settings: &ProviderSettings,
) -> Result<T> {
    serde_json::from_value(Value::Object(provider_settings.clone()))
        .map_err(|e| Error::ProviderSettings(format!("parse provider settings failed: {e}")))
}

/// Reverse of [`parse_provider_settings`].
pub(crate) fn export_provider_settings<T: serde::Serialize>(
    settings: &T,
) -> Result<ProviderSettings> {
    match serde_json::to_value(settings) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::ProviderSettings(
            "provider settings must be a json object".into(),
        )),
        Err(e) => Err(Error::ProviderSettings(format!(
            "serialize provider settings failed: {e}"
        ))),
    }
}
