//! HTTP client for the analysis backend.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{ChatRequest, ChatResponse, UploadRequest, UploadResponse};
use crate::utils::url::{construct_api_url, resolve_artifact_url};

pub const UPLOAD_ENDPOINT: &str = "api/upload";
pub const CHAT_ENDPOINT: &str = "api/chat";

/// Failures talking to the backend.
///
/// The view flattens all of these into one message per endpoint; the detail
/// is kept for logs and the headless command.
#[derive(Debug)]
pub enum ApiError {
    /// A local file could not be read or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The request never produced a response (connection refused, DNS, ...).
    Transport(reqwest::Error),

    /// The backend answered with a non-success status.
    Status { status: StatusCode, body: String },

    /// The response body was not the JSON we expected.
    Decode(serde_json::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Io { path, source } => {
                write!(f, "Failed to access {}: {}", path.display(), source)
            }
            ApiError::Transport(source) => write!(f, "Request failed: {}", source),
            ApiError::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "Backend returned {}", status)
                } else {
                    write!(f, "Backend returned {}: {}", status, body)
                }
            }
            ApiError::Decode(source) => write!(f, "Unexpected response body: {}", source),
        }
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ApiError::Io { source, .. } => Some(source),
            ApiError::Transport(source) => Some(source),
            ApiError::Status { .. } => None,
            ApiError::Decode(source) => Some(source),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        ApiError::Transport(value)
    }
}

/// The two calls the view issues. Implemented over HTTP by [`HttpBackend`].
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, ApiError>;

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ApiError>;
}

#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Download one artifact (`originalImage`, `srImage`, `cgImage`) to `dest`.
    ///
    /// Returns the number of bytes written.
    pub async fn download_artifact(&self, reference: &str, dest: &Path) -> Result<u64, ApiError> {
        let url = resolve_artifact_url(&self.base_url, reference);
        debug!(%url, dest = %dest.display(), "downloading artifact");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let io_error = |source: std::io::Error| ApiError::Io {
            path: dest.to_path_buf(),
            source,
        };
        let mut file = tokio::fs::File::create(dest).await.map_err(io_error)?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await.map_err(io_error)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(io_error)?;
        Ok(written)
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, ApiError> {
        let UploadRequest {
            file,
            file_name,
            organ,
            image_type,
        } = request;

        let bytes = tokio::fs::read(&file)
            .await
            .map_err(|source| ApiError::Io {
                path: file.clone(),
                source,
            })?;

        debug!(
            file = %file.display(),
            size = bytes.len(),
            organ = organ.as_str(),
            image_type = image_type.as_str(),
            "uploading image"
        );

        let form = Form::new()
            .part("image", Part::bytes(bytes).file_name(file_name))
            .text("organType", organ.as_str())
            .text("imageType", image_type.as_str());

        let response = self
            .client
            .post(construct_api_url(&self.base_url, UPLOAD_ENDPOINT))
            .multipart(form)
            .send()
            .await?;

        read_json(response).await
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ApiError> {
        debug!(prediction = %request.prediction, "sending chat message");
        let response = self
            .client
            .post(construct_api_url(&self.base_url, CHAT_ENDPOINT))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        read_json(response).await
    }
}

async fn status_error(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    ApiError::Status { status, body }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(status_error(response).await);
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(ApiError::Decode)
}
