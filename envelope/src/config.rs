// Copyright (c) 2024 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use std::{env, path::Path};

use anyhow::*;
use config::{Config, Environment, File};
use log::{debug, info};
use serde::Deserialize;

use crate::ProviderSettings;

const DEFAULT_PROVIDER: &str = "local";

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct EnvelopeConfig {
    /// Key service provider, e.g. `aws` or `local`
    pub provider: String,

    /// Public parameters of the key service provider
    #[serde(default)]
    pub provider_settings: ProviderSettings,
}

impl EnvelopeConfig {
    /// Load the configuration from `config_path`, or the path in env
    /// `ENVELOPE_CONFIG_PATH`. Env variables prefixed with `ENVELOPE_`
    /// override the file, e.g. `ENVELOPE_PROVIDER_SETTINGS__KEY_ID`.
    pub fn new(config_path: Option<String>) -> Result<Self> {
        let config_path = config_path.or_else(|| {
            if let std::result::Result::Ok(env_path) = env::var("ENVELOPE_CONFIG_PATH") {
                debug!("Read envelope config path from env: {env_path}");
                return Some(env_path);
            }
            None
        });

        let mut builder = Config::builder().set_default("provider", DEFAULT_PROVIDER)?;
        match config_path {
            Some(path) => {
                info!("Use configuration file {path}");
                if !Path::new(&path).exists() {
                    bail!("Config file {path} not found.")
                }
                builder = builder.add_source(File::with_name(&path));
            }
            None => {
                info!("No config path specified, use the default provider {DEFAULT_PROVIDER} and env.")
            }
        }

        let c = builder
            .add_source(
                Environment::with_prefix("ENVELOPE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let res = c.try_deserialize().context("invalid config")?;
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, io::Write};

    use rstest::rstest;
    use serde_json::json;
    use serial_test::serial;

    use super::EnvelopeConfig;

    #[rstest]
    #[case(
        r#"
provider = "aws"

[provider_settings]
key_id = "alias/envelope"
region = "us-east-1"
    "#,
        EnvelopeConfig {
            provider: "aws".into(),
            provider_settings: json!({
                "key_id": "alias/envelope",
                "region": "us-east-1",
            })
            .as_object()
            .unwrap()
            .to_owned(),
        }
    )]
    #[case(
        r#"
[provider_settings]
key_id = "key-1"
    "#,
        EnvelopeConfig {
            provider: "local".into(),
            provider_settings: json!({ "key_id": "key-1" }).as_object().unwrap().to_owned(),
        }
    )]
    #[serial]
    fn read_config(#[case] config: &str, #[case] expected: EnvelopeConfig) {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(config.as_bytes()).unwrap();

        let config = EnvelopeConfig::new(Some(file.path().to_string_lossy().to_string()))
            .expect("load config failed");
        assert_eq!(config, expected);
    }

    #[test]
    #[serial]
    fn missing_config_file() {
        assert!(EnvelopeConfig::new(Some("/not/exist/envelope.toml".into())).is_err());
    }

    #[test]
    #[serial]
    fn env_overrides() {
        env::remove_var("ENVELOPE_CONFIG_PATH");
        env::set_var("ENVELOPE_PROVIDER", "aws");
        env::set_var("ENVELOPE_PROVIDER_SETTINGS__REGION", "eu-west-1");

        let config = EnvelopeConfig::new(None).expect("load config failed");

        env::remove_var("ENVELOPE_PROVIDER");
        env::remove_var("ENVELOPE_PROVIDER_SETTINGS__REGION");

        assert_eq!(config.provider, "aws");
        assert_eq!(config.provider_settings["region"], "eu-west-1");
    }

    #[cfg(feature = "aws")]
    #[test]
    #[serial]
    fn env_overrides_numeric_settings() {
        use kms::plugins::aws::AwsProviderSettings;

        env::remove_var("ENVELOPE_CONFIG_PATH");
        env::set_var("ENVELOPE_PROVIDER", "aws");
        env::set_var("ENVELOPE_PROVIDER_SETTINGS__KEY_ID", "alias/envelope");
        env::set_var("ENVELOPE_PROVIDER_SETTINGS__REGION", "eu-west-1");
        env::set_var("ENVELOPE_PROVIDER_SETTINGS__TIMEOUT_SECS", "10");

        let config = EnvelopeConfig::new(None).expect("load config failed");

        env::remove_var("ENVELOPE_PROVIDER");
        env::remove_var("ENVELOPE_PROVIDER_SETTINGS__KEY_ID");
        env::remove_var("ENVELOPE_PROVIDER_SETTINGS__REGION");
        env::remove_var("ENVELOPE_PROVIDER_SETTINGS__TIMEOUT_SECS");

        let settings: AwsProviderSettings =
            serde_json::from_value(config.provider_settings.into()).expect("parse aws settings");
        assert_eq!(
            settings,
            AwsProviderSettings {
                key_id: "alias/envelope".into(),
                region: "eu-west-1".into(),
                endpoint: None,
                timeout_secs: Some(10),
            }
        );
    }
}
