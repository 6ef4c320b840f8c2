//! Artifact upload hook.

use crate::hub::{HubApi, RepoUrl};
use crate::Result;
use async_trait::async_trait;
use tracing::info;

/// Runs after the target repository is known to exist.
#[async_trait]
pub trait ArtifactUploader: Send + Sync {
    async fn upload(&self, hub: &dyn HubApi, repo: &RepoUrl) -> Result<()>;
}

/// Default uploader: performs no network call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoUpload;

#[async_trait]
impl ArtifactUploader for NoUpload {
    async fn upload(&self, _hub: &dyn HubApi, repo: &RepoUrl) -> Result<()> {
        info!(repo_id = %repo.repo_id, "Artifact upload not configured; skipping");
        Ok(())
    }
}
