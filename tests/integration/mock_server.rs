//! Mock Hub server setup for integration tests

#![allow(dead_code)]

use hub_deploy::config::DeployConfig;
use hub_deploy::{Credential, HubClient, HubClientBuilder};
use mockito::{Matcher, Mock, Server, ServerGuard};

pub const TOKEN: &str = "validlongtoken123";
pub const REPO_ID: &str = "dhani10/engine-condition-model";

/// Test fixture that manages a mock Hub
pub struct MockHubFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockHubFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client pointed at the mock server
    pub fn client(&self) -> HubClient {
        HubClientBuilder::new()
            .endpoint(&self.base_url)
            .build(Credential::new(TOKEN))
            .expect("client builds")
    }

    /// Default deployment config pointed at the mock server
    pub fn config(&self) -> DeployConfig {
        DeployConfig::default()
            .with_endpoint(&self.base_url)
            .expect("mock url is a valid endpoint")
    }

    /// `GET /api/whoami-v2` answering with the given status and body
    pub async fn mock_whoami(&mut self, status: usize, body: &str, hits: usize) -> Mock {
        self.server
            .mock("GET", "/api/whoami-v2")
            .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// A successful identity response for `dhani10`
    pub async fn mock_whoami_ok(&mut self) -> Mock {
        let body = serde_json::json!({
            "type": "user",
            "name": "dhani10",
            "orgs": [],
            "auth": {"type": "access_token", "accessToken": {"displayName": "deploy", "role": "write"}}
        })
        .to_string();
        self.mock_whoami(200, &body, 1).await
    }

    /// `POST /api/repos/create` for the default public model repository
    pub async fn mock_create(&mut self, status: usize, body: &str, hits: usize) -> Mock {
        self.server
            .mock("POST", "/api/repos/create")
            .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
            .match_body(Matcher::Json(serde_json::json!({
                "name": "engine-condition-model",
                "organization": "dhani10",
                "private": false
            })))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// `GET /api/models/{repo_id}` used to check for an existing repository
    pub async fn mock_model_info(&mut self, status: usize, hits: usize) -> Mock {
        self.server
            .mock("GET", format!("/api/models/{}", REPO_ID).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"id":"{}"}}"#, REPO_ID))
            .expect(hits)
            .create_async()
            .await
    }
}

/// Environment with a valid token plus a conflicting variable that must be ignored
pub fn valid_env() -> Vec<(String, String)> {
    vec![
        ("HF_TOKEN".to_string(), format!("  {}\n", TOKEN)),
        ("HF_ENDPOINT".to_string(), "https://should-not-be-used.invalid".to_string()),
        ("PATH".to_string(), "/usr/bin".to_string()),
    ]
}
