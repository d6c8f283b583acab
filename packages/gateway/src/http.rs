//! Multipart upload client

use async_trait::async_trait;
use blockpress_editor::{RawFile, UploadConfig, UploadFailure, UploadGateway, UploadPurpose, UploadResult};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

/// Upload endpoint response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    /// `1` on success; anything else is a rejection
    #[serde(default)]
    pub success: serde_json::Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        self.success.as_f64() == Some(1.0)
    }

    /// The durable URL, if the endpoint accepted the file
    pub fn into_url(self) -> Result<String, UploadFailure> {
        if !self.is_success() {
            return Err(UploadFailure::Rejected(format!("success={}", self.success)));
        }
        match self.url {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => Err(UploadFailure::Rejected("success without url".to_string())),
        }
    }
}

/// Posts images to the upload endpoint as `multipart/form-data`
#[derive(Debug, Clone)]
pub struct HttpUploadGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpUploadGateway {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.endpoint())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn try_upload(&self, file: &RawFile) -> Result<String, UploadFailure> {
        let form = Form::new().part("file", file_part(file));

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadFailure::Transport(format!("Failed to reach {}: {}", self.endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadFailure::Rejected(format!(
                "Upload endpoint returned {}: {}",
                status, body
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadFailure::Rejected(format!("Failed to parse response: {}", e)))?;

        body.into_url()
    }
}

fn file_part(file: &RawFile) -> Part {
    let part = Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
    match part.mime_str(&file.content_type) {
        Ok(part) => part,
        Err(e) => {
            tracing::debug!(content_type = %file.content_type, "Ignoring invalid content type: {}", e);
            Part::bytes(file.bytes.to_vec()).file_name(file.name.clone())
        }
    }
}

#[async_trait]
impl UploadGateway for HttpUploadGateway {
    async fn upload(&self, file: &RawFile, purpose: UploadPurpose) -> UploadResult {
        match self.try_upload(file).await {
            Ok(url) => {
                tracing::info!(%purpose, file = %file.name, %url, "Image uploaded");
                UploadResult::Uploaded { url }
            }
            Err(failure) => {
                tracing::warn!(%purpose, file = %file.name, "Error uploading image: {}", failure);
                UploadResult::Failed(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> UploadResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_success_flag_must_be_one() {
        assert_eq!(
            parse(r#"{ "success": 1, "url": "https://cdn/a.png" }"#).into_url(),
            Ok("https://cdn/a.png".to_string())
        );
        assert_eq!(
            parse(r#"{ "success": 1.0, "url": "https://cdn/a.png" }"#).into_url(),
            Ok("https://cdn/a.png".to_string())
        );
        assert!(parse(r#"{ "success": 0, "url": "https://cdn/a.png" }"#).into_url().is_err());
        assert!(parse(r#"{ "success": "1", "url": "https://cdn/a.png" }"#).into_url().is_err());
        assert!(parse(r#"{ "success": true, "url": "https://cdn/a.png" }"#).into_url().is_err());
        assert!(parse(r#"{ "url": "https://cdn/a.png" }"#).into_url().is_err());
    }

    #[test]
    fn test_success_without_url_is_rejected() {
        assert_eq!(
            parse(r#"{ "success": 1 }"#).into_url(),
            Err(UploadFailure::Rejected("success without url".to_string()))
        );
        assert!(parse(r#"{ "success": 1, "url": "" }"#).into_url().is_err());
    }

    #[test]
    fn test_endpoint_from_config() {
        let gateway = HttpUploadGateway::from_config(&UploadConfig::default());
        assert_eq!(
            gateway.endpoint(),
            "http://localhost:5173/api/uploadImage/create"
        );
    }
}
