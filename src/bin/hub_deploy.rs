//! hub-deploy: validate the Hub token and ensure the model repository exists.
//!
//! Usage:
//!   HF_TOKEN=hf_xxx hub-deploy [--repo-id <ID>] [--repo-type <TYPE>] [--private]
//!
//! Exit status is 0 on success and 1 on any configuration, authentication,
//! or repository failure.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use hub_deploy::config::{DeployConfig, DEFAULT_REPO_ID};
use hub_deploy::deploy::deploy_from_env;
use hub_deploy::hub::{RepoId, RepoSpec, RepoType, SpaceSdk, Visibility, DEFAULT_ENDPOINT};
use hub_deploy::logging;
use hub_deploy::transport::http::DEFAULT_TIMEOUT_SECS;
use tracing::{error, info};

/// Validate HF_TOKEN and ensure a Hugging Face Hub repository exists
#[derive(Parser, Debug)]
#[command(name = "hub-deploy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository to ensure, as namespace/name
    #[arg(long, env = "HUB_DEPLOY_REPO_ID", default_value = DEFAULT_REPO_ID)]
    repo_id: String,

    /// Repository type: model, dataset or space
    #[arg(long, default_value = "model")]
    repo_type: String,

    /// Create the repository as private
    #[arg(long)]
    private: bool,

    /// SDK for a Space: gradio, streamlit, docker or static
    #[arg(long)]
    space_sdk: Option<String>,

    /// Hub endpoint
    #[arg(long, env = "HUB_DEPLOY_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "HUB_DEPLOY_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// HTTP(S) proxy for Hub requests
    #[arg(long, env = "HUB_DEPLOY_PROXY_URL")]
    proxy: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn build_config(cli: &Cli) -> hub_deploy::Result<DeployConfig> {
    let mut repo = RepoSpec::new(RepoId::parse(cli.repo_id.trim())?)
        .with_repo_type(cli.repo_type.parse::<RepoType>()?)
        .with_visibility(Visibility::from_private_flag(cli.private));
    if let Some(sdk) = &cli.space_sdk {
        repo = repo.with_space_sdk(sdk.parse::<SpaceSdk>()?);
    }

    let mut config = DeployConfig::new(repo)
        .with_endpoint(&cli.endpoint)?
        .with_timeout(Duration::from_secs(cli.timeout_secs))?;
    if let Some(proxy) = &cli.proxy {
        config = config.with_proxy(proxy.clone());
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Ok(ExitCode::from(1));
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match runtime.block_on(deploy_from_env(&config)) {
        Ok(_) => {
            info!("Deployment process completed!");
            Ok(ExitCode::SUCCESS)
        }
        // already logged at the stage that failed
        Err(e) => Ok(ExitCode::from(e.exit_code())),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    logging::init(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}
