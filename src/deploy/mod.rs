//! 部署流程：认证 → 确保仓库存在 → 上传（扩展点）→ 结束。
//!
//! Deployment runner.
//!
//! A linear state machine, run once per process:
//!
//! 1. **Authenticate**: bind the credential to a Hub client and resolve the
//!    account with `whoami`.
//! 2. **Ensure repository**: create the target repository, accepting an
//!    existing one as success.
//! 3. **Upload**: hand over to the configured [`ArtifactUploader`] (a no-op by
//!    default).
//! 4. **Terminal**: report completion.
//!
//! Each step returns a typed [`DeployError`] that names the failing stage. The
//! failure is logged where it is caught; [`DeployError::exit_code`] is the only
//! mapping from failure to process status.

pub mod upload;

pub use upload::{ArtifactUploader, NoUpload};

use crate::config::{sanitize, DeployConfig, SanitizedEnvironment};
use crate::credential::Credential;
use crate::hub::{EnsureOutcome, HubApi, HubLogin, Identity, RepoSpec, RepoUrl};
use crate::Error;
use std::fmt;
use std::sync::Arc;
use thiserror::Error as ThisError;
use tracing::{debug, error, info, warn};

/// Step of the deployment state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authenticate,
    EnsureRepository,
    Upload,
    Terminal,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Authenticate => "authenticate",
            Stage::EnsureRepository => "ensure_repository",
            Stage::Upload => "upload",
            Stage::Terminal => "terminal",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Authentication,
    RepositoryCreation,
    Upload,
}

#[derive(Debug, ThisError)]
pub enum DeployError {
    #[error("{0}")]
    Configuration(#[source] Error),

    #[error("Token validation failed: {0}")]
    Authentication(#[source] Error),

    #[error("Deployment failed for {repo_id}: {source}")]
    RepositoryCreation {
        repo_id: String,
        #[source]
        source: Error,
    },

    #[error("Artifact upload failed for {repo_id}: {source}")]
    Upload {
        repo_id: String,
        #[source]
        source: Error,
    },
}

impl DeployError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::Configuration(_) => ErrorKind::Configuration,
            DeployError::Authentication(_) => ErrorKind::Authentication,
            DeployError::RepositoryCreation { .. } => ErrorKind::RepositoryCreation,
            DeployError::Upload { .. } => ErrorKind::Upload,
        }
    }

    /// Stage the failure happened in; configuration failures precede every stage.
    pub fn stage(&self) -> Option<Stage> {
        match self.kind() {
            ErrorKind::Configuration => None,
            ErrorKind::Authentication => Some(Stage::Authenticate),
            ErrorKind::RepositoryCreation => Some(Stage::EnsureRepository),
            ErrorKind::Upload => Some(Stage::Upload),
        }
    }

    /// Process exit status for this failure. Every failure is fatal to the run.
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Configuration
            | ErrorKind::Authentication
            | ErrorKind::RepositoryCreation
            | ErrorKind::Upload => 1,
        }
    }

    /// The underlying library error.
    pub fn cause(&self) -> &Error {
        match self {
            DeployError::Configuration(e) | DeployError::Authentication(e) => e,
            DeployError::RepositoryCreation { source, .. } | DeployError::Upload { source, .. } => {
                source
            }
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub identity: Identity,
    pub repo: RepoUrl,
}

impl DeployReport {
    pub fn created(&self) -> bool {
        self.repo.outcome == EnsureOutcome::Created
    }
}

/// Drives one deployment against a [`HubLogin`] implementation.
pub struct DeploymentRunner {
    login: Arc<dyn HubLogin>,
    uploader: Arc<dyn ArtifactUploader>,
    repo: RepoSpec,
}

impl DeploymentRunner {
    pub fn new(login: Arc<dyn HubLogin>, repo: RepoSpec) -> Self {
        Self {
            login,
            uploader: Arc::new(NoUpload),
            repo,
        }
    }

    /// Runner backed by the HTTP client described by `config`.
    pub fn from_config(config: &DeployConfig) -> Self {
        Self::new(Arc::new(config.client_builder()), config.repo.clone())
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn ArtifactUploader>) -> Self {
        self.uploader = uploader;
        self
    }

    pub async fn run(&self, credential: &Credential) -> Result<DeployReport, DeployError> {
        info!("Starting deployment...");

        let (hub, identity) = self.authenticate(credential).await?;
        let repo = self.ensure_repository(hub.as_ref()).await?;
        self.upload(hub.as_ref(), &repo).await?;

        info!(stage = %Stage::Terminal, "Deployment completed!");
        Ok(DeployReport { identity, repo })
    }

    async fn authenticate(
        &self,
        credential: &Credential,
    ) -> Result<(Arc<dyn HubApi>, Identity), DeployError> {
        let attempt = async {
            let hub = self.login.login(credential)?;
            let identity = hub.whoami().await?;
            Ok::<_, Error>((hub, identity))
        };

        match attempt.await {
            Ok((hub, identity)) => {
                info!(stage = %Stage::Authenticate, "Token valid! User: {}", identity.name);
                debug!(
                    fullname = identity.display_name(),
                    token_name = identity.token_name().unwrap_or("-"),
                    "authenticated account"
                );
                if !identity.orgs.is_empty() {
                    debug!(orgs = ?identity.org_names(), "account organisations");
                }
                if identity.token_role() == Some("read") {
                    warn!("Token has read-only role; repository creation requires write access");
                }
                Ok((hub, identity))
            }
            Err(e) => {
                let err = DeployError::Authentication(e);
                error!(stage = %Stage::Authenticate, "{}", err);
                Err(err)
            }
        }
    }

    async fn ensure_repository(&self, hub: &dyn HubApi) -> Result<RepoUrl, DeployError> {
        info!(
            stage = %Stage::EnsureRepository,
            visibility = %self.repo.visibility,
            repo_type = %self.repo.repo_type,
            "Creating repository: {}",
            self.repo.repo_id
        );

        match hub.ensure_repo(&self.repo).await {
            Ok(repo) => {
                // created and already-existing repositories are reported the same way
                info!(stage = %Stage::EnsureRepository, "Repository: {}", repo);
                debug!(outcome = ?repo.outcome, "ensure repository outcome");
                Ok(repo)
            }
            Err(source) => {
                let err = DeployError::RepositoryCreation {
                    repo_id: self.repo.repo_id.to_string(),
                    source,
                };
                error!(stage = %Stage::EnsureRepository, "{}", err);
                Err(err)
            }
        }
    }

    async fn upload(&self, hub: &dyn HubApi, repo: &RepoUrl) -> Result<(), DeployError> {
        self.uploader.upload(hub, repo).await.map_err(|source| {
            let err = DeployError::Upload {
                repo_id: repo.repo_id.to_string(),
                source,
            };
            error!(stage = %Stage::Upload, "{}", err);
            err
        })
    }
}

/// Sanitize `env`, then run the deployment described by `config`.
///
/// A sanitizer failure stops here, before any client is built or request sent.
pub async fn deploy<I, K, V>(config: &DeployConfig, env: I) -> Result<DeployReport, DeployError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    run_sanitized(config, sanitize(env)).await
}

/// [`deploy`] against a snapshot of the process environment.
pub async fn deploy_from_env(config: &DeployConfig) -> Result<DeployReport, DeployError> {
    run_sanitized(config, SanitizedEnvironment::from_process_env()).await
}

async fn run_sanitized(
    config: &DeployConfig,
    sanitized: crate::Result<SanitizedEnvironment>,
) -> Result<DeployReport, DeployError> {
    let sanitized = match sanitized.and_then(|s| config.validate().map(|_| s)) {
        Ok(s) => s,
        Err(e) => {
            let err = DeployError::Configuration(e);
            error!("{}", err);
            return Err(err);
        }
    };
    DeploymentRunner::from_config(config)
        .run(sanitized.credential())
        .await
}
