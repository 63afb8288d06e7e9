// Copyright (c) 2024 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

//! Credentials to access AWS KMS, and the AWS Signature Version 4 scheme
//! that proves them.

use std::{env, fmt};

use anyhow::*;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tokio::fs;
use zeroize::Zeroizing;

pub(crate) const SIGNING_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Same layout as the output of an AWS `credential_process`.
#[derive(Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct AwsCredential {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default)]
    pub session_token: Option<String>,
}

impl fmt::Debug for AwsCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredential")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AwsCredential {
    pub fn new(access_key_id: &str, secret_access_key: &str, session_token: Option<&str>) -> Self {
        Self {
            access_key_id: access_key_id.to_owned(),
            secret_access_key: secret_access_key.to_owned(),
            session_token: session_token.map(ToOwned::to_owned),
        }
    }

    /// Read `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and optionally
    /// `AWS_SESSION_TOKEN`. Returns `None` if either of the first two is unset.
    pub(crate) fn from_env() -> Option<Self> {
        let access_key_id = env::var("AWS_ACCESS_KEY_ID").ok()?;
        let secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").ok()?;
        Some(Self {
            access_key_id,
            secret_access_key,
            session_token: env::var("AWS_SESSION_TOKEN").ok(),
        })
    }

    pub(crate) async fn from_file(path: &str) -> Result<Self> {
        let content = Zeroizing::new(
            fs::read_to_string(path)
                .await
                .with_context(|| format!("read credential file {path} failed"))?,
        );
        let credential = serde_json::from_str(&content).context("illegal credential file")?;
        Ok(credential)
    }

    /// Sign `string_to_sign` with the key derived for the given scope, and
    /// return the hex encoded signature.
    pub(crate) fn sign(
        &self,
        string_to_sign: &str,
        date: &str,
        region: &str,
        service: &str,
    ) -> Result<String> {
        let key = signing_key(&self.secret_access_key, date, region, service)?;
        let signature = hmac_sha256(&key, string_to_sign.as_bytes())?;
        Ok(hex::encode(signature))
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| anyhow!("init hmac-sha256 failed: {e}"))?;
    mac.update(data);
    Ok(Zeroizing::new(mac.finalize().into_bytes().to_vec()))
}

/// kSigning = HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")
pub(crate) fn signing_key(
    secret_access_key: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Zeroizing<Vec<u8>>> {
    let secret = Zeroizing::new(format!("AWS4{secret_access_key}"));
    let k_date = hmac_sha256(secret.as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{signing_key, AwsCredential};

    #[test]
    fn derive_signing_key() {
        // Published example of the AWS SigV4 documentation
        let key = signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        )
        .unwrap();
        assert_eq!(
            hex::encode(&key[..]),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn debug_redacts_secrets() {
        let credential = AwsCredential::new("AKIDEXAMPLE", "very-secret", Some("session-secret"));
        let debug = format!("{credential:?}");
        assert!(debug.contains("AKIDEXAMPLE"));
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("session-secret"));
    }

    #[tokio::test]
    async fn read_credential_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"Version": 1, "AccessKeyId": "AKIDEXAMPLE", "SecretAccessKey": "secret"}"#,
        )
        .unwrap();

        let credential = AwsCredential::from_file(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(credential, AwsCredential::new("AKIDEXAMPLE", "secret", None));
    }
}
