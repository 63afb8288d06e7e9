// Copyright (c) 2024 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::error;
use reqwest::{header::HeaderMap, ClientBuilder};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

use super::credential::SIGNING_ALGORITHM;
use super::{
    AwsCredential, AwsKmsApi, AwsKmsConfig, DecryptRequest, DecryptResponse, ErrorResponse,
    GenerateDataKeyRequest, GenerateDataKeyResponse,
};

/// [`AwsKmsApi`] over the AWS KMS JSON protocol.
#[derive(Clone, Debug)]
pub struct HttpAwsKmsApi {
    credential: AwsCredential,
    region: String,
    endpoint: Url,
    http_client: reqwest::Client,
}

impl HttpAwsKmsApi {
    const SERVICE: &'static str = "kms";
    const TARGET_PREFIX: &'static str = "TrentService";
    const CONTENT_TYPE: &'static str = "application/x-amz-json-1.1";

    /// `host[:port]` as it must appear in the signed `host` header.
    fn host(&self) -> anyhow::Result<String> {
        let host = self
            .endpoint
            .host_str()
            .ok_or_else(|| anyhow!("endpoint {} has no host", self.endpoint))?;
        Ok(match self.endpoint.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        })
    }

    fn build_headers(
        &self,
        action: &str,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> anyhow::Result<HeaderMap> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let payload_hash = hex::encode(Sha256::digest(body));

        let mut signed = BTreeMap::from([
            ("content-type", Self::CONTENT_TYPE.to_string()),
            ("host", self.host()?),
            ("x-amz-date", amz_date.clone()),
            ("x-amz-target", format!("{}.{action}", Self::TARGET_PREFIX)),
        ]);
        if let Some(token) = &self.credential.session_token {
            signed.insert("x-amz-security-token", token.clone());
        }

        let canonical_headers = signed
            .iter()
            .map(|(k, v)| format!("{k}:{}\n", v.trim()))
            .collect::<Vec<String>>()
            .join("");
        let signed_headers = signed.keys().copied().collect::<Vec<&str>>().join(";");

        // Every KMS action is a POST to `/` without query string.
        let canonical_request =
            format!("POST\n/\n\n{canonical_headers}\n{signed_headers}\n{payload_hash}");
        let scope = format!("{date}/{}/{}/aws4_request", self.region, Self::SERVICE);
        let string_to_sign = format!(
            "{SIGNING_ALGORITHM}\n{amz_date}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );
        let signature = self
            .credential
            .sign(&string_to_sign, &date, &self.region, Self::SERVICE)?;

        let mut headers = HeaderMap::new();
        for (k, v) in signed {
            headers.insert(k, v.parse()?);
        }
        headers.insert(
            "user-agent",
            Into::<String>::into(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .parse()?,
        );
        headers.insert(
            "authorization",
            format!(
                "{SIGNING_ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
                self.credential.access_key_id
            )
            .parse()?,
        );

        Ok(headers)
    }

    async fn do_request<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        action: &str,
        request: &Req,
    ) -> anyhow::Result<Resp> {
        let body = serde_json::to_vec(request).context("serialize request body")?;
        let headers = self
            .build_headers(action, &body, Utc::now())
            .context("build request http header")?;

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body_bytes = response.bytes().await?;
        if !status.is_success() {
            error!("aws kms: {action} request failed with status {status}");
            let error_msg: ErrorResponse = serde_json::from_slice(&body_bytes).unwrap_or_default();
            bail!(
                "status code: {}, error type: {}, message: {}",
                status,
                error_msg.error_type,
                error_msg.message
            );
        }

        serde_json::from_slice(&body_bytes).context("illegal response body")
    }
}

#[async_trait]
impl AwsKmsApi for HttpAwsKmsApi {
    fn from_config(config: &AwsKmsConfig) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&config.endpoint()).context("illegal kms endpoint")?;
        let mut builder = ClientBuilder::new().use_rustls_tls();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("build http client failed")?;

        Ok(Self {
            credential: config.credential.clone(),
            region: config.region.clone(),
            endpoint,
            http_client,
        })
    }

    async fn generate_data_key(
        &self,
        request: GenerateDataKeyRequest,
    ) -> anyhow::Result<GenerateDataKeyResponse> {
        self.do_request("GenerateDataKey", &request).await
    }

    async fn decrypt(&self, request: DecryptRequest) -> anyhow::Result<DecryptResponse> {
        self.do_request("Decrypt", &request).await
    }
}
