//! Collaborator seam: the backend API reached through a generic
//! request/response interface, plus typed wrappers for the material
//! analysis and audio generation services.
//!
//! Retry, caching, and interceptor mechanics live in the HTTP layer, not
//! here; this module only supplies endpoints and payload shapes.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CoursePackError, Result};

#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<serde_json::Value>;
    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value>;
    /// Raw download, used for media assets during binary export.
    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>>;
}

/// reqwest-backed client carrying the base URL and an optional bearer
/// token.
pub struct HttpApiClient {
    base_url: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{path}", self.base_url.trim_end_matches('/'))
        }
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn check(path: &str, resp: reqwest::Response) -> Result<reqwest::Response> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CoursePackError::Upstream {
                operation: path.to_string(),
                reason: format!("HTTP {status}: {body}"),
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        let resp = self.authorize(self.client.get(self.url(path))).send().await?;
        Ok(Self::check(path, resp).await?.json().await?)
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let resp = self
            .authorize(self.client.post(self.url(path)))
            .json(&body)
            .send()
            .await?;
        Ok(Self::check(path, resp).await?.json().await?)
    }

    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self.authorize(self.client.get(self.url(path))).send().await?;
        Ok(Self::check(path, resp).await?.bytes().await?.to_vec())
    }
}

/// Output of the material-analysis collaborator: parallel sentence lists
/// plus an optional vocabulary list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialAnalysis {
    pub english: Vec<String>,
    pub chinese: Vec<String>,
    #[serde(default)]
    pub vocabulary: Vec<MaterialVocabulary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialVocabulary {
    pub word: String,
    pub translation: String,
}

pub async fn fetch_material_analysis(
    api: &dyn ApiClient,
    material_id: &str,
) -> Result<MaterialAnalysis> {
    let value = api
        .get_json(&format!("/api/materials/{material_id}/analysis"))
        .await?;
    serde_json::from_value(value)
        .map_err(|e| CoursePackError::upstream("material analysis", e))
}

/// Per-block audio URLs for one lesson, produced by the audio-generation
/// collaborator.
pub async fn fetch_audio_manifest(
    api: &dyn ApiClient,
    lesson_id: &str,
) -> Result<HashMap<String, String>> {
    let value = api
        .get_json(&format!("/api/lessons/{lesson_id}/audio"))
        .await?;
    serde_json::from_value(value)
        .map_err(|e| CoursePackError::upstream("audio manifest", e))
}
