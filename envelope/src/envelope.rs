// Copyright (c) 2023 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as b64, Engine};
use kms::EncryptedKey;
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

use crate::{Error, Result};

/// Leading section of the compact form.
pub const COMPACT_HEADER: &str = "envelope";

/// An Envelope is a payload encrypted by digital envelope mechanism.
/// It can be described as
///
/// {Enc(KMS, DEK), Enc(DEK, payload), nonce}
///
/// where Enc(A,B) means use key A to encrypt B. Given access to the key
/// service that issued the DEK, it carries everything needed to decrypt.
#[serde_as]
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Envelope {
    /// Encrypted DEK, as returned by the key service
    pub key: EncryptedKey,

    /// Encrypted payload by DEK, with the A256GCM tag appended
    #[serde_as(as = "Base64")]
    pub ciphertext: Vec<u8>,

    /// Nonce of the A256GCM operation
    #[serde_as(as = "Base64")]
    pub salt: Vec<u8>,
}

impl Envelope {
    /// Parse the compact form
    /// `envelope`.`key`.`salt`.`ciphertext`
    /// where every section after the header is base64url without padding.
    pub fn from_compact_string(envelope: &str) -> Result<Self> {
        let sections: Vec<_> = envelope.split('.').collect();

        if sections.len() != 4 {
            return Err(Error::ParseFailed("malformed compact envelope"));
        }

        if sections[0] != COMPACT_HEADER {
            return Err(Error::ParseFailed("unknown compact envelope header"));
        }

        let key = b64
            .decode(sections[1])
            .map_err(|_| Error::ParseFailed("base64 decode envelope key"))?;
        let key = String::from_utf8(key)
            .map_err(|_| Error::ParseFailed("envelope key must be UTF-8"))?;
        let salt = b64
            .decode(sections[2])
            .map_err(|_| Error::ParseFailed("base64 decode envelope salt"))?;
        let ciphertext = b64
            .decode(sections[3])
            .map_err(|_| Error::ParseFailed("base64 decode envelope ciphertext"))?;

        Ok(Self {
            key: key.into(),
            ciphertext,
            salt,
        })
    }

    pub fn to_compact_string(&self) -> String {
        format!(
            "{COMPACT_HEADER}.{}.{}.{}",
            b64.encode(self.key.as_str()),
            b64.encode(&self.salt),
            b64.encode(&self.ciphertext)
        )
    }
}
