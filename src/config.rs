//! 运行配置：环境变量清理与令牌格式检查，以及部署目标配置。
//!
//! Startup configuration.
//!
//! [`sanitize`] is the gate that runs before anything touches the network. It
//! reads `HF_TOKEN` from a snapshot of the environment, sets aside every other
//! `HF_*` / `HUGGINGFACE_*` variable as conflicting configuration, and applies
//! the minimum-length check. The process environment itself is never mutated:
//! the result is an immutable [`SanitizedEnvironment`], and the Hub client only
//! ever receives the credential it carries.

use crate::credential::{Credential, MIN_TOKEN_LEN};
use crate::hub::{HubClientBuilder, RepoId, RepoSpec, DEFAULT_ENDPOINT};
use crate::transport::http::DEFAULT_TIMEOUT_SECS;
use crate::{Error, ErrorContext, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Variable holding the Hub access token.
pub const TOKEN_VAR: &str = "HF_TOKEN";

/// Prefixes of variables that belong to the Hub client's namespace.
pub const CONFLICTING_PREFIXES: &[&str] = &["HF_", "HUGGINGFACE_"];

/// Repository ensured when none is given on the command line.
pub const DEFAULT_REPO_ID: &str = "dhani10/engine-condition-model";

/// Whether `name` is a Hub-namespace variable other than the token itself.
pub fn is_conflicting(name: &str) -> bool {
    name != TOKEN_VAR && CONFLICTING_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Validated credential plus the names of the variables that were set aside.
#[derive(Debug, Clone)]
pub struct SanitizedEnvironment {
    credential: Credential,
    ignored: Vec<String>,
}

impl SanitizedEnvironment {
    /// Snapshot the process environment and sanitize it.
    pub fn from_process_env() -> Result<Self> {
        let mut vars = Vec::new();
        for (key, value) in std::env::vars_os() {
            let Some(key) = key.to_str().map(str::to_string) else {
                continue;
            };
            match value.into_string() {
                Ok(value) => vars.push((key, value)),
                Err(_) if key == TOKEN_VAR => {
                    return Err(token_error(
                        "Token appears invalid (not valid UTF-8)",
                        "value must be valid UTF-8",
                    ));
                }
                Err(_) => vars.push((key, String::new())),
            }
        }
        sanitize(vars)
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Conflicting variable names, sorted. Their values are not retained.
    pub fn ignored_variables(&self) -> &[String] {
        &self.ignored
    }
}

fn token_error(message: &str, details: &str) -> Error {
    Error::configuration_with_context(
        message,
        ErrorContext::new()
            .with_field_path(TOKEN_VAR)
            .with_details(details)
            .with_source("env_sanitizer"),
    )
}

/// Validate the credential found in `vars` and isolate it from conflicting variables.
pub fn sanitize<I, K, V>(vars: I) -> Result<SanitizedEnvironment>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut token = None;
    let mut ignored = Vec::new();

    for (key, value) in vars {
        let key = key.into();
        if key == TOKEN_VAR {
            token = Some(value.into());
        } else if is_conflicting(&key) {
            ignored.push(key);
        }
    }

    let raw = match token {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            return Err(token_error(
                "No HF_TOKEN found in environment!",
                "set HF_TOKEN to a Hub access token",
            ))
        }
    };

    ignored.sort();
    ignored.dedup();
    for name in &ignored {
        debug!(variable = %name, "ignoring conflicting Hub variable");
    }

    let credential = Credential::new(raw);
    if !credential.meets_minimum_length() {
        return Err(token_error(
            "Token appears invalid (too short)",
            &format!("expected at least {} characters after trimming", MIN_TOKEN_LEN),
        ));
    }

    if credential.raw_len() != credential.len() {
        debug!(
            raw_len = credential.raw_len(),
            trimmed_len = credential.len(),
            "trimmed surrounding whitespace from HF_TOKEN"
        );
    }
    info!("HF_TOKEN found, length: {}", credential.len());
    Ok(SanitizedEnvironment {
        credential,
        ignored,
    })
}

/// Where and what to deploy.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub proxy_url: Option<String>,
    pub repo: RepoSpec,
}

impl DeployConfig {
    pub fn new(repo: RepoSpec) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy_url: None,
            repo,
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.endpoint = validate_endpoint(endpoint)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(Error::configuration_with_context(
                "Timeout must be greater than zero",
                ErrorContext::new().with_field_path("timeout_secs"),
            ));
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    /// Check cross-field rules that cannot be enforced by the setters.
    pub fn validate(&self) -> Result<()> {
        self.repo.validate()
    }

    pub fn client_builder(&self) -> HubClientBuilder {
        let builder = HubClientBuilder::new()
            .endpoint(self.endpoint.clone())
            .timeout(self.timeout);
        match &self.proxy_url {
            Some(proxy) => builder.proxy(proxy.clone()),
            None => builder,
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        // DEFAULT_REPO_ID is a constant that always parses
        let repo_id = RepoId::parse(DEFAULT_REPO_ID).expect("default repo id is valid");
        Self::new(RepoSpec::new(repo_id))
    }
}

/// Accept only absolute http(s) URLs; trailing slashes are dropped.
pub fn validate_endpoint(raw: &str) -> Result<String> {
    let invalid = |details: String| {
        Error::configuration_with_context(
            format!("Invalid Hub endpoint '{}'", raw),
            ErrorContext::new()
                .with_field_path("endpoint")
                .with_details(details)
                .with_source("deploy_config"),
        )
    };

    let parsed = url::Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
