// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[cfg(feature = "aws")]
    #[error("AWS KMS error when {context}")]
    AwsKmsError {
        #[source]
        source: anyhow::Error,
        context: &'static str,
    },

    #[cfg(feature = "local")]
    #[error("Local KMS error: {0}")]
    LocalKmsError(String),

    #[error("encrypted key is not legal base64")]
    MalformedEncryptedKey(#[source] base64::DecodeError),

    #[error("illegal provider settings: {0}")]
    ProviderSettings(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),
}
