//! Hub 数据类型：仓库标识、可见性、身份信息与请求载荷。
//!
//! Wire and domain types for the Hub endpoints.

use crate::{Error, ErrorContext, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Repository name rules enforced by the Hub: optional namespace, 1..=96 char name,
/// word characters plus `-` and `.`, starting and ending on a word character.
static REPO_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\b[\w\-.]+\b/)?\b[\w\-.]{1,96}\b$").expect("repo id pattern is valid")
});

/// Validated repository identifier (`namespace/name` or bare `name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    namespace: Option<String>,
    name: String,
}

impl RepoId {
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |details: &str| {
            Error::validation_with_context(
                format!("Invalid repository id '{}'", raw),
                ErrorContext::new()
                    .with_field_path("repo_id")
                    .with_details(details.to_string())
                    .with_source("repo_id_validator"),
            )
        };

        if raw.matches('/').count() > 1 {
            return Err(invalid("expected 'namespace/name' or 'name'"));
        }
        if !REPO_ID_PATTERN.is_match(raw) {
            return Err(invalid(
                "allowed characters are letters, digits, '-', '_' and '.', name at most 96 characters",
            ));
        }
        if raw.contains("--") || raw.contains("..") {
            return Err(invalid("'--' and '..' are forbidden"));
        }
        if raw.ends_with(".git") {
            return Err(invalid("cannot end with '.git'"));
        }

        Ok(match raw.split_once('/') {
            Some((ns, name)) => Self {
                namespace: Some(ns.to_string()),
                name: name.to_string(),
            },
            None => Self {
                namespace: None,
                name: raw.to_string(),
            },
        })
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for RepoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Kind of repository on the Hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RepoType {
    #[default]
    Model,
    Dataset,
    Space,
}

impl RepoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Dataset => "dataset",
            Self::Space => "space",
        }
    }

    /// Value of the `type` field in a create request; models omit it.
    pub(crate) fn wire_type(&self) -> Option<&'static str> {
        match self {
            Self::Model => None,
            other => Some(other.as_str()),
        }
    }

    /// Path segment of the repository info endpoint (`/api/{segment}/{id}`).
    pub(crate) fn api_segment(&self) -> &'static str {
        match self {
            Self::Model => "models",
            Self::Dataset => "datasets",
            Self::Space => "spaces",
        }
    }

    /// Prefix of the repository's web URL, relative to the endpoint.
    pub(crate) fn url_prefix(&self) -> &'static str {
        match self {
            Self::Model => "",
            Self::Dataset => "datasets/",
            Self::Space => "spaces/",
        }
    }
}

impl fmt::Display for RepoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepoType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "model" | "models" => Ok(Self::Model),
            "dataset" | "datasets" => Ok(Self::Dataset),
            "space" | "spaces" => Ok(Self::Space),
            other => Err(Error::validation_with_context(
                format!("Unknown repository type '{}'", other),
                ErrorContext::new()
                    .with_field_path("repo_type")
                    .with_details("expected one of: model, dataset, space"),
            )),
        }
    }
}

/// SDK a Space runs on. Required when creating a Space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceSdk {
    Gradio,
    Streamlit,
    Docker,
    Static,
}

impl SpaceSdk {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gradio => "gradio",
            Self::Streamlit => "streamlit",
            Self::Docker => "docker",
            Self::Static => "static",
        }
    }
}

impl FromStr for SpaceSdk {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gradio" => Ok(Self::Gradio),
            "streamlit" => Ok(Self::Streamlit),
            "docker" => Ok(Self::Docker),
            "static" => Ok(Self::Static),
            other => Err(Error::validation_with_context(
                format!("Unknown Space SDK '{}'", other),
                ErrorContext::new()
                    .with_field_path("space_sdk")
                    .with_details("expected one of: gradio, streamlit, docker, static"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn from_private_flag(private: bool) -> Self {
        if private {
            Self::Private
        } else {
            Self::Public
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, Self::Private)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_private() { "private" } else { "public" })
    }
}

/// Everything needed to ensure one repository exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub repo_id: RepoId,
    pub repo_type: RepoType,
    pub visibility: Visibility,
    pub space_sdk: Option<SpaceSdk>,
}

impl RepoSpec {
    pub fn new(repo_id: RepoId) -> Self {
        Self {
            repo_id,
            repo_type: RepoType::Model,
            visibility: Visibility::Public,
            space_sdk: None,
        }
    }

    pub fn with_repo_type(mut self, repo_type: RepoType) -> Self {
        self.repo_type = repo_type;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_space_sdk(mut self, sdk: SpaceSdk) -> Self {
        self.space_sdk = Some(sdk);
        self
    }

    /// Spaces cannot be created without an SDK; other types must not carry one.
    pub fn validate(&self) -> Result<()> {
        match (self.repo_type, self.space_sdk) {
            (RepoType::Space, None) => Err(Error::validation_with_context(
                "A Space SDK is required when creating a Space",
                ErrorContext::new()
                    .with_field_path("space_sdk")
                    .with_details("expected one of: gradio, streamlit, docker, static"),
            )),
            (RepoType::Model | RepoType::Dataset, Some(_)) => Err(Error::validation_with_context(
                format!("A Space SDK only applies to Spaces, not {}s", self.repo_type),
                ErrorContext::new().with_field_path("space_sdk"),
            )),
            _ => Ok(()),
        }
    }

    pub(crate) fn create_request(&self) -> CreateRepoRequest<'_> {
        CreateRepoRequest {
            name: self.repo_id.name(),
            organization: self.repo_id.namespace(),
            private: self.visibility.is_private(),
            repo_type: self.repo_type.wire_type(),
            sdk: self.space_sdk.map(|s| s.as_str()),
        }
    }
}

/// Body of `POST /api/repos/create`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateRepoRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<&'a str>,
    pub private: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub repo_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk: Option<&'a str>,
}

/// Response of `POST /api/repos/create`.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateRepoResponse {
    #[serde(default)]
    pub url: Option<String>,
}

/// Account resolved from the token (`GET /api/whoami-v2`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub name: String,
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub orgs: Vec<OrgMembership>,
    #[serde(default)]
    pub auth: Option<AuthInfo>,
}

impl Identity {
    /// Role of the access token (`read`, `write`, `fineGrained`), when reported.
    pub fn token_role(&self) -> Option<&str> {
        self.auth
            .as_ref()
            .and_then(|a| a.access_token.as_ref())
            .and_then(|t| t.role.as_deref())
    }

    /// Full name when the account has one, otherwise the username.
    pub fn display_name(&self) -> &str {
        self.fullname.as_deref().unwrap_or(&self.name)
    }

    /// Name the user gave the access token.
    pub fn token_name(&self) -> Option<&str> {
        self.auth
            .as_ref()
            .and_then(|a| a.access_token.as_ref())
            .and_then(|t| t.display_name.as_deref())
    }

    pub fn org_names(&self) -> Vec<&str> {
        self.orgs.iter().map(|o| o.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrgMembership {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthInfo {
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<AccessTokenInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessTokenInfo {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Whether ensuring a repository created it or found it in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    Created,
    AlreadyExists,
}

/// Reference to a repository that exists on the Hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUrl {
    pub url: String,
    pub repo_id: RepoId,
    pub repo_type: RepoType,
    pub outcome: EnsureOutcome,
}

impl RepoUrl {
    /// Canonical web URL built from the endpoint, used when the Hub does not return one.
    pub(crate) fn from_endpoint(
        endpoint: &str,
        spec: &RepoSpec,
        outcome: EnsureOutcome,
    ) -> Self {
        Self {
            url: format!(
                "{}/{}{}",
                endpoint.trim_end_matches('/'),
                spec.repo_type.url_prefix(),
                spec.repo_id
            ),
            repo_id: spec.repo_id.clone(),
            repo_type: spec.repo_type,
            outcome,
        }
    }
}

impl fmt::Display for RepoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
