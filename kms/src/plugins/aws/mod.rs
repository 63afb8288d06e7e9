// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

//! This is a AWS KMS implementation.
//!
//! Data keys are generated by the `GenerateDataKey` API of AWS KMS under a
//! fixed customer master key, and recovered by the `Decrypt` API. The
//! product detail can be found here: <https://aws.amazon.com/kms/>.
//!
//! The backend client is abstracted by [`AwsKmsApi`]. [`HttpAwsKmsApi`] talks
//! to the real service over HTTPS with SigV4 signed requests.

mod api;
mod client;
mod config;
mod credential;
mod http;

pub use api::*;
pub use client::AwsKmsClient;
pub use config::{AwsKmsConfig, AwsProviderSettings};
pub use credential::AwsCredential;
pub use http::HttpAwsKmsApi;
