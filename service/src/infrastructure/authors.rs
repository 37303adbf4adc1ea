use std::time::Duration;

use anyhow::Context;
use editorial_common::AuthorId;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::authors::{AuthorDirectory, AuthorDirectoryError, AuthorSummary};
use crate::infrastructure::settings::AuthorsSettings;

/// Talks to the authors service over HTTP.
#[derive(Clone, Debug)]
pub struct HttpAuthorDirectory {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct AuthorExistsResponse {
    exists: bool,
}

impl HttpAuthorDirectory {
    pub fn new(settings: &AuthorsSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(settings.connect_timeout_ms))
            .timeout(Duration::from_millis(settings.read_timeout_ms))
            .build()
            .context("failed to build authors service client")?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `path`; `None` on 404
    async fn get(&self, path: &str) -> Result<Option<reqwest::Response>, AuthorDirectoryError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "calling authors service");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AuthorDirectoryError::Unavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        response
            .error_for_status()
            .map(Some)
            .map_err(|e| AuthorDirectoryError::Unavailable(e.to_string()))
    }
}

impl AuthorDirectory for HttpAuthorDirectory {
    async fn author_exists(&self, id: AuthorId) -> Result<bool, AuthorDirectoryError> {
        if !id.is_valid() {
            return Ok(false);
        }

        let Some(response) = self.get(&format!("/api/authors/{id}/exists")).await? else {
            return Ok(false);
        };

        let body: AuthorExistsResponse = response
            .json()
            .await
            .map_err(|e| AuthorDirectoryError::InvalidResponse(e.to_string()))?;

        Ok(body.exists)
    }

    async fn author(&self, id: AuthorId) -> Result<Option<AuthorSummary>, AuthorDirectoryError> {
        if !id.is_valid() {
            return Ok(None);
        }

        let Some(response) = self.get(&format!("/api/authors/{id}")).await? else {
            return Ok(None);
        };

        response
            .json()
            .await
            .map(Some)
            .map_err(|e| AuthorDirectoryError::InvalidResponse(e.to_string()))
    }
}
