// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use thiserror::Error;

use crate::{KEY_LEN, NONCE_LEN, TAG_LEN};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("illegal key length {0}, A256GCM requires {KEY_LEN} bytes")]
    InvalidKeyLength(usize),

    #[error("illegal iv length {0}, A256GCM requires {NONCE_LEN} bytes")]
    InvalidIvLength(usize),

    #[error("ciphertext of {0} bytes is shorter than the {TAG_LEN} bytes tag")]
    CiphertextTooShort(usize),

    #[error("aes-256-gcm encrypt failed")]
    EncryptFailed,

    /// The GCM tag did not verify. Either the ciphertext, the iv or the key
    /// is not the one used for encryption.
    #[error("aes-256-gcm authentication failed")]
    AuthenticationFailed,
}
