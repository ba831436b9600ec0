//! Request and response payloads exchanged with the analysis backend.

pub mod client;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::selection::{ImageType, OrganType};

pub use client::{AnalysisBackend, ApiError, HttpBackend};

/// Body of a successful `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub prediction: String,
    pub original_image: String,
    pub sr_image: String,
    pub cg_image: String,
    pub organ_type: String,
    /// Opening assistant message about the prediction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llama_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub prediction: String,
    pub organ_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Everything needed to build the multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: PathBuf,
    pub file_name: String,
    pub organ: OrganType,
    pub image_type: ImageType,
}
