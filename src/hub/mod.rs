//! Hub 客户端：登录、身份校验与仓库创建（已存在即成功）。
//!
//! Thin client for the Hugging Face Hub endpoints this tool needs.
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | [`HubApi::whoami`] | `GET /api/whoami-v2` |
//! | [`HubApi::ensure_repo`] | `POST /api/repos/create` |
//! | [`HubApi::repo_exists`] | `GET /api/{models,datasets,spaces}/{repo_id}` |
//!
//! The deployment runner only sees the [`HubLogin`] and [`HubApi`] traits, so
//! the HTTP details stay in this module.

pub mod types;

pub use types::{
    EnsureOutcome, Identity, RepoId, RepoSpec, RepoType, RepoUrl, SpaceSdk, Visibility,
};

use crate::credential::Credential;
use crate::transport::{HubTransport, TransportOptions};
use crate::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use types::CreateRepoResponse;

pub const DEFAULT_ENDPOINT: &str = "https://huggingface.co";

/// Operations available once a credential is bound to a client.
#[async_trait]
pub trait HubApi: Send + Sync {
    /// Resolve the account the credential belongs to.
    async fn whoami(&self) -> Result<Identity>;

    /// Create the repository, accepting an existing one as success.
    async fn ensure_repo(&self, spec: &RepoSpec) -> Result<RepoUrl>;

    /// Whether the repository is visible to the credential.
    async fn repo_exists(&self, spec: &RepoSpec) -> Result<bool>;
}

/// Binds a credential to a [`HubApi`] implementation.
pub trait HubLogin: Send + Sync {
    fn login(&self, credential: &Credential) -> Result<Arc<dyn HubApi>>;
}

/// Builder for [`HubClient`].
#[derive(Debug, Clone)]
pub struct HubClientBuilder {
    endpoint: String,
    options: TransportOptions,
}

impl HubClientBuilder {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            options: TransportOptions::default(),
        }
    }

    /// Override the Hub endpoint (mirrors, private deployments, mock servers).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    pub fn proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.options.proxy_url = Some(proxy_url.into());
        self
    }

    /// Build a client that authenticates every request with `credential`.
    pub fn build(&self, credential: Credential) -> Result<HubClient> {
        let transport = HubTransport::new(&self.endpoint, credential, &self.options)?;
        Ok(HubClient { transport })
    }
}

impl Default for HubClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HubLogin for HubClientBuilder {
    fn login(&self, credential: &Credential) -> Result<Arc<dyn HubApi>> {
        Ok(Arc::new(self.build(credential.clone())?))
    }
}

/// HTTP implementation of [`HubApi`].
pub struct HubClient {
    transport: HubTransport,
}

impl HubClient {
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }
}

#[async_trait]
impl HubApi for HubClient {
    async fn whoami(&self) -> Result<Identity> {
        let response = self.transport.get("/api/whoami-v2").await?;
        if !response.status().is_success() {
            return Err(HubTransport::remote_error(response).await);
        }
        HubTransport::read_json(response).await
    }

    async fn ensure_repo(&self, spec: &RepoSpec) -> Result<RepoUrl> {
        spec.validate()?;

        let response = self
            .transport
            .post_json("/api/repos/create", &spec.create_request())
            .await?;
        let status = response.status();

        if status.is_success() {
            let returned_url = match HubTransport::read_json::<CreateRepoResponse>(response).await {
                Ok(body) => body.url,
                Err(e) => {
                    debug!(error = %e, "create response had no readable body");
                    None
                }
            };
            let mut repo_url = RepoUrl::from_endpoint(self.endpoint(), spec, EnsureOutcome::Created);
            if let Some(url) = returned_url {
                repo_url.url = url;
            }
            return Ok(repo_url);
        }

        if status == StatusCode::CONFLICT {
            debug!(repo_id = %spec.repo_id, "repository already exists");
            return Ok(RepoUrl::from_endpoint(
                self.endpoint(),
                spec,
                EnsureOutcome::AlreadyExists,
            ));
        }

        let err = HubTransport::remote_error(response).await;

        // A token without create rights in the namespace is still fine if the repo is already there.
        if status == StatusCode::FORBIDDEN {
            match self.repo_exists(spec).await {
                Ok(true) => {
                    debug!(repo_id = %spec.repo_id, "create forbidden but repository exists");
                    return Ok(RepoUrl::from_endpoint(
                        self.endpoint(),
                        spec,
                        EnsureOutcome::AlreadyExists,
                    ));
                }
                Ok(false) => {}
                Err(e) => {
                    debug!(repo_id = %spec.repo_id, error = %e, "existence check after forbidden create failed");
                }
            }
        }

        Err(err)
    }

    async fn repo_exists(&self, spec: &RepoSpec) -> Result<bool> {
        let path = format!("/api/{}/{}", spec.repo_type.api_segment(), spec.repo_id);
        let response = self.transport.get(&path).await?;
        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::UNAUTHORIZED => Ok(false),
            _ => Err(HubTransport::remote_error(response).await),
        }
    }
}
