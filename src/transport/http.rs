use crate::credential::Credential;
use crate::transport::TransportError;
use crate::{Error, ErrorContext, Result};
use reqwest::{Proxy, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Header the Hub uses to carry a human-readable failure reason.
const ERROR_MESSAGE_HEADER: &str = "x-error-message";

/// Longest raw body echoed into an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Knobs for the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub timeout: Duration,
    pub proxy_url: Option<String>,
    pub user_agent: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy_url: None,
            user_agent: format!("hub-deploy/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Authenticated HTTP access to one Hub endpoint.
///
/// Every request carries the credential as a bearer token. Non-success
/// statuses are left to the caller; [`HubTransport::remote_error`] turns a
/// failed response into a classified [`Error::Remote`].
pub struct HubTransport {
    client: reqwest::Client,
    endpoint: String,
    credential: Credential,
}

impl HubTransport {
    pub fn new(endpoint: &str, credential: Credential, options: &TransportOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone());

        if let Some(proxy_url) = &options.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid proxy URL: {}", e),
                    ErrorContext::new()
                        .with_field_path("proxy_url")
                        .with_source("hub_transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credential,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.url(path);
        debug!(method = "GET", url = %url, "hub request");
        self.client
            .get(&url)
            .bearer_auth(self.credential.expose_secret())
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.url(path);
        debug!(method = "POST", url = %url, "hub request");
        self.client
            .post(&url)
            .bearer_auth(self.credential.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))
    }

    /// Decode a successful response body.
    pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Consume a failed response and build the matching remote error.
    pub async fn remote_error(response: Response) -> Error {
        let status = response.status();
        let header_message = response
            .headers()
            .get(ERROR_MESSAGE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, status = status.as_u16(), "could not read error body");
                String::new()
            }
        };

        let message = header_message
            .or_else(|| error_message_from_body(&body))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        Error::remote(status.as_u16(), message)
    }
}

/// Pull a message out of the Hub's error body shapes, falling back to the raw text.
pub(crate) fn error_message_from_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let from_json = json
            .get("error")
            .and_then(|e| {
                e.as_str()
                    .map(str::to_string)
                    .or_else(|| e.get("message").and_then(|m| m.as_str()).map(str::to_string))
            })
            .or_else(|| json.get("message").and_then(|m| m.as_str()).map(str::to_string));
        if from_json.is_some() {
            return from_json;
        }
    }

    let mut raw: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        raw.push_str("...");
    }
    Some(raw)
}
