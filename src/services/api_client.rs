//! Profile service client.
//!
//! Provides type-safe methods for the five profile endpoints:
//! - Basic profile upsert
//! - Identity document upload
//! - Social and eSports link submission
//! - Profile lookup by CPF

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::domain::{
    DocumentFile, DocumentUploadResponse, EsportsLinksResponse, Profile, ProfileFormData,
    SocialLinksResponse, UpsertProfileResponse,
};
use crate::error::ClientError;

/// Correlation header sent with every request
pub const X_REQUEST_ID: &str = "x-request-id";

/// Remote operations the form workflows depend on.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// Create or update the basic fields of the profile keyed by `data.cpf`.
    async fn upsert_profile(
        &self,
        data: &ProfileFormData,
    ) -> Result<UpsertProfileResponse, ClientError>;

    async fn upload_document(
        &self,
        cpf: &str,
        document: &DocumentFile,
    ) -> Result<DocumentUploadResponse, ClientError>;

    async fn save_social_links(
        &self,
        cpf: &str,
        links: &BTreeMap<String, String>,
    ) -> Result<SocialLinksResponse, ClientError>;

    async fn save_esports_links(
        &self,
        cpf: &str,
        links: &BTreeMap<String, String>,
    ) -> Result<EsportsLinksResponse, ClientError>;

    /// Fetch a profile. A missing record is `ClientError::NotFound`.
    async fn get_profile(&self, cpf: &str) -> Result<Profile, ClientError>;
}

/// HTTP client for the profile service.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Error body returned by every endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

impl ApiClient {
    /// Create a new profile service client.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, base_url))
    }

    /// Build on top of an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        tracing::info!(base_url = base_url, "Profile API client initialized");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a JSON POST request to the profile service.
    async fn post_json<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ClientError> {
        let url = self.url(path);
        self.send(self.client.post(&url).json(body), &url).await
    }

    async fn send<R: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        url: &str,
    ) -> Result<R, ClientError> {
        let request_id = Uuid::new_v4().to_string();
        debug!(url = %url, request_id = %request_id, "Profile service request");

        let response = req
            .header(X_REQUEST_ID, &request_id)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, url = %url, "Profile service request failed");
                ClientError::Transport(e.to_string())
            })?;

        let status = response.status();

        if status.is_success() {
            return response.json::<R>().await.map_err(|e| {
                error!(error = %e, "Failed to parse profile service response");
                ClientError::InvalidResponse(e.to_string())
            });
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));

        match status {
            StatusCode::NOT_FOUND => {
                debug!(url = %url, "Profile service returned not found");
                Err(ClientError::NotFound(message))
            }
            _ => {
                error!(status = %status, message = %message, "Profile service error");
                Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Check that the profile service answers at all.
    ///
    /// Any HTTP status counts as reachable; only transport failures are errors.
    pub async fn health_check(&self) -> Result<StatusCode> {
        let response = self
            .client
            .get(&self.base_url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("Profile service health check failed")?;

        Ok(response.status())
    }
}

#[async_trait]
impl ProfileApi for ApiClient {
    #[instrument(skip(self, data), fields(cpf = %data.cpf))]
    async fn upsert_profile(
        &self,
        data: &ProfileFormData,
    ) -> Result<UpsertProfileResponse, ClientError> {
        self.post_json("/profile", data).await
    }

    #[instrument(skip(self, document), fields(file_name = %document.file_name))]
    async fn upload_document(
        &self,
        cpf: &str,
        document: &DocumentFile,
    ) -> Result<DocumentUploadResponse, ClientError> {
        let part = multipart::Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str(document.kind.mime_type())?;
        let form = multipart::Form::new().part("document", part);

        let url = self.url(&format!("/profile/{}/upload_document", cpf));
        self.send(self.client.post(&url).multipart(form), &url).await
    }

    #[instrument(skip(self, links))]
    async fn save_social_links(
        &self,
        cpf: &str,
        links: &BTreeMap<String, String>,
    ) -> Result<SocialLinksResponse, ClientError> {
        self.post_json(&format!("/profile/{}/link_social", cpf), links)
            .await
    }

    #[instrument(skip(self, links))]
    async fn save_esports_links(
        &self,
        cpf: &str,
        links: &BTreeMap<String, String>,
    ) -> Result<EsportsLinksResponse, ClientError> {
        self.post_json(&format!("/profile/{}/link_esports", cpf), links)
            .await
    }

    #[instrument(skip(self))]
    async fn get_profile(&self, cpf: &str) -> Result<Profile, ClientError> {
        let url = self.url(&format!("/profile/{}", cpf));
        self.send(self.client.get(&url), &url).await
    }
}
