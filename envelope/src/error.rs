// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("key service failed when {context}")]
    KeyService {
        #[source]
        source: kms::Error,
        context: &'static str,
    },

    /// The tag of the envelope did not verify. No plaintext is returned.
    #[error("envelope authentication failed")]
    Authentication,

    #[error("crypto operation failed when {context}")]
    Crypto {
        #[source]
        source: anyhow::Error,
        context: &'static str,
    },

    #[error("parse envelope failed: {0}")]
    ParseFailed(&'static str),
}
