//! # hub-deploy
//!
//! 部署前置工具：校验 Hugging Face Hub 令牌并确保模型仓库存在。
//!
//! Validate a Hugging Face Hub access token and make sure the target
//! repository exists before model artifacts are uploaded.
//!
//! ## Overview
//!
//! A run has two phases, executed once and in order:
//!
//! - **Sanitize**: read `HF_TOKEN` from an environment snapshot, set aside
//!   conflicting `HF_*` / `HUGGINGFACE_*` variables, reject tokens shorter
//!   than ten characters. Nothing touches the network if this fails.
//! - **Deploy**: authenticate, resolve the account with `whoami`, then create
//!   the repository with create-if-absent semantics.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hub_deploy::config::DeployConfig;
//! use hub_deploy::deploy::deploy_from_env;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let config = DeployConfig::default();
//!     match deploy_from_env(&config).await {
//!         Ok(report) => println!("ready: {}", report.repo),
//!         Err(e) => std::process::exit(e.exit_code().into()),
//!     }
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Environment sanitizer and deployment configuration |
//! | [`credential`] | Redacted token type |
//! | [`hub`] | Hub client, `HubApi` trait and wire types |
//! | [`deploy`] | Deployment state machine and upload hook |
//! | [`transport`] | Authenticated HTTP transport |
//! | [`error_code`] | HTTP failure classification |
//! | [`logging`] | `tracing` subscriber setup |

pub mod config;
pub mod credential;
pub mod deploy;
pub mod error_code;
pub mod hub;
pub mod logging;
pub mod transport;

// Re-export main types for convenience
pub use config::{sanitize, DeployConfig, SanitizedEnvironment};
pub use credential::Credential;
pub use deploy::{DeployError, DeployReport, DeploymentRunner, ErrorKind};
pub use hub::{HubApi, HubClient, HubClientBuilder, HubLogin, RepoId, RepoSpec, RepoUrl};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
