// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

//! # Envelope encryption
//!
//! Every payload is encrypted with its own data key. The data key is handed
//! out by a [`KeyService`], which keeps the master key to itself and returns
//! the data key in both plaintext and encrypted form. Only the encrypted form
//! travels with the ciphertext inside an [`Envelope`].
//!
//! ```text
//! Envelope = { Enc(master key, DEK), Enc(DEK, payload), nonce }
//! ```

#[cfg(feature = "cli")]
pub mod config;
pub mod encrypter;
pub mod envelope;
pub mod error;

pub use encrypter::EnvelopeEncrypter;
pub use envelope::Envelope;
pub use error::*;
pub use kms::{DataKey, EncryptedKey, KeyService, PlaintextKey, ProviderSettings};

/// Create an [`EnvelopeEncrypter`] whose key service is selected by
/// `provider` (e.g. `aws` or `local`) and configured with `provider_settings`.
pub async fn new_encrypter(
    provider: &str,
    provider_settings: ProviderSettings,
) -> Result<EnvelopeEncrypter<Box<dyn KeyService>>> {
    let key_service = kms::new_key_service(provider, provider_settings)
        .await
        .map_err(|source| Error::KeyService {
            source,
            context: "create key service",
        })?;
    Ok(EnvelopeEncrypter::new(key_service))
}
