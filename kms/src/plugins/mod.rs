// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use strum::{AsRefStr, EnumString};

use crate::{Error, KeyService, ProviderSettings, Result};

const _IN_GUEST_DEFAULT_KEY_PATH: &str = "/run/envelope/kms-credential";

#[cfg(feature = "aws")]
pub mod aws;

#[cfg(feature = "local")]
pub mod local;

#[derive(AsRefStr, EnumString, Debug, PartialEq)]
pub enum KeyServiceProvider {
    #[cfg(feature = "aws")]
    #[strum(ascii_case_insensitive)]
    Aws,

    #[cfg(feature = "local")]
    #[strum(ascii_case_insensitive)]
    Local,
}

/// Create a new [`KeyService`] by given provider name and [`ProviderSettings`]
pub async fn new_key_service(
    provider_name: &str,
    _provider_settings: ProviderSettings,
) -> Result<Box<dyn KeyService>> {
    let provider = KeyServiceProvider::try_from(provider_name)
        .map_err(|_| Error::UnsupportedProvider(provider_name.to_string()))?;
    match provider {
        #[cfg(feature = "aws")]
        KeyServiceProvider::Aws => Ok(Box::new(
            aws::AwsKmsClient::<aws::HttpAwsKmsApi>::from_provider_settings(&_provider_settings).await?,
        ) as Box<dyn KeyService>),

        #[cfg(feature = "local")]
        KeyServiceProvider::Local => Ok(Box::new(
            local::LocalKms::from_provider_settings(&_provider_settings).await?,
        ) as Box<dyn KeyService>),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{new_key_service, KeyServiceProvider};
    use crate::{Error, ProviderSettings};

    #[rstest]
    #[case("aws", KeyServiceProvider::Aws)]
    #[case("AWS", KeyServiceProvider::Aws)]
    #[case("Local", KeyServiceProvider::Local)]
    fn parse_provider(#[case] name: &str, #[case] expected: KeyServiceProvider) {
        assert_eq!(KeyServiceProvider::try_from(name).unwrap(), expected);
    }

    #[tokio::test]
    async fn unsupported_provider() {
        let res = new_key_service("vault", ProviderSettings::default()).await;
        assert!(matches!(res, Err(Error::UnsupportedProvider(name)) if name == "vault"));
    }
}
