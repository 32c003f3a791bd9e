//! Cloudinary media cloud client
//!
//! Uploads go through the signed Upload API (multipart), deletes and listings
//! through the Admin API (HTTP basic auth).
//! Docs: https://cloudinary.com/documentation/image_upload_api_reference

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::source::UploadSource;
use crate::traits::{CloudResult, MediaCloud, UploadOptions};
use chromacast_core::models::{DeleteConfirmation, MediaAsset};
use chromacast_core::{CloudinaryConfig, UpstreamError};

const RESOURCE_TYPE: &str = "video";
const DELIVERY_TYPE: &str = "upload";
const SIGNATURE_ALGORITHM: &str = "sha256";

/// Cloudinary client
pub struct CloudinaryClient {
    http_client: reqwest::Client,
    config: CloudinaryConfig,
}

impl Debug for CloudinaryClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudinaryClient")
            .field("cloud_name", &self.config.cloud_name)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    resources: Vec<MediaAsset>,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client for Cloudinary: {}", e))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/v1_1/{}/{}",
            self.config.api_base, self.config.cloud_name, path
        )
    }

    /// Parameters covered by the upload signature.
    fn upload_params(&self, options: &UploadOptions, timestamp: i64) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        params.insert("timestamp", timestamp.to_string());
        if options.folder {
            params.insert("folder", self.config.folder.clone());
        }
        if let Some(pipeline) = options.transformation.as_ref().filter(|p| !p.is_empty()) {
            params.insert("transformation", pipeline.to_transformation_string());
        }
        params
    }

    /// Turn a response into `T`, or into an [`UpstreamError`] carrying the
    /// provider's status and message.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> CloudResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| {
                    if body.is_empty() {
                        status.to_string()
                    } else {
                        body
                    }
                });
            return Err(UpstreamError::with_status(
                format!("Cloudinary {} failed: {}", operation, message),
                status.as_u16(),
            ));
        }

        // A 2xx status is not kept on the error, it would be served as success
        response.json::<T>().await.map_err(|e| {
            UpstreamError::new(format!(
                "Failed to parse Cloudinary {} response: {}",
                operation, e
            ))
        })
    }
}

/// Signs upload parameters: `k1=v1&k2=v2...` in key order, followed by the
/// API secret, hashed with SHA-256.
pub fn sign_params(params: &BTreeMap<&'static str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn transport_error(operation: &str, err: reqwest::Error) -> UpstreamError {
    let message = format!("Cloudinary {} request failed: {}", operation, err);
    match err.status() {
        Some(status) => UpstreamError::with_status(message, status.as_u16()),
        None => UpstreamError::new(message),
    }
}

#[async_trait]
impl MediaCloud for CloudinaryClient {
    async fn upload(&self, source: &str, options: &UploadOptions) -> CloudResult<MediaAsset> {
        let source = UploadSource::parse(source)?;
        let params = self.upload_params(options, Utc::now().timestamp());
        let signature = sign_params(&params, &self.config.api_secret);

        let mut form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", SIGNATURE_ALGORITHM);
        for (key, value) in params {
            form = form.text(key, value);
        }
        form = match source.open().await? {
            Some(file) => form.part(
                "file",
                Part::stream_with_length(file.body, file.len).file_name(source.file_name()),
            ),
            None => match &source {
                UploadSource::Remote(url) => form.text("file", url.clone()),
                UploadSource::Local(_) => form,
            },
        };

        tracing::debug!(
            source = ?source,
            folder = options.folder,
            transformation = ?options.transformation.as_ref().map(|p| p.to_transformation_string()),
            "Uploading to Cloudinary"
        );

        let response = self
            .http_client
            .post(self.endpoint(&format!("{}/upload", RESOURCE_TYPE)))
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error("upload", e))?;

        let asset: MediaAsset = Self::parse_response(response, "upload").await?;
        tracing::info!(public_id = %asset.public_id, "Cloudinary upload completed");
        Ok(asset)
    }

    async fn delete(&self, public_ids: &[String]) -> CloudResult<DeleteConfirmation> {
        let query: Vec<(&str, &str)> = public_ids
            .iter()
            .map(|id| ("public_ids[]", id.as_str()))
            .collect();

        let response = self
            .http_client
            .delete(self.endpoint(&format!("resources/{}/{}", RESOURCE_TYPE, DELIVERY_TYPE)))
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .query(&query)
            .send()
            .await
            .map_err(|e| transport_error("delete", e))?;

        let confirmation: DeleteConfirmation = Self::parse_response(response, "delete").await?;
        tracing::info!(public_ids = ?public_ids, deleted = ?confirmation.deleted, "Cloudinary delete completed");
        Ok(confirmation)
    }

    async fn list(&self) -> CloudResult<Vec<MediaAsset>> {
        let mut query = vec![("max_results", self.config.list_max_results.to_string())];
        if !self.config.folder.is_empty() {
            query.push(("prefix", format!("{}/", self.config.folder)));
        }

        let response = self
            .http_client
            .get(self.endpoint(&format!("resources/{}/{}", RESOURCE_TYPE, DELIVERY_TYPE)))
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .query(&query)
            .send()
            .await
            .map_err(|e| transport_error("list", e))?;

        let listing: ListResponse = Self::parse_response(response, "list").await?;
        tracing::debug!(count = listing.resources.len(), "Cloudinary listing fetched");
        Ok(listing.resources)
    }

    fn provider_name(&self) -> &'static str {
        "cloudinary"
    }
}
