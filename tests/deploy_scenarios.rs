//! End-to-end deployment runs: sanitizer gate, authentication, create-if-absent.

mod integration;

use hub_deploy::deploy::{deploy, ErrorKind, Stage};
use hub_deploy::hub::EnsureOutcome;
use integration::mock_server::{valid_env, MockHubFixture, REPO_ID};

#[tokio::test]
async fn test_missing_token_exits_without_login() {
    let mut fixture = MockHubFixture::new().await;
    let whoami = fixture.mock_whoami(200, r#"{"name":"dhani10"}"#, 0).await;

    let env = vec![("HF_HOME", "/tmp/hf"), ("PATH", "/usr/bin")];
    let err = deploy(&fixture.config(), env).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("No HF_TOKEN found in environment!"));
    whoami.assert_async().await;
}

#[tokio::test]
async fn test_short_token_exits_without_login() {
    let mut fixture = MockHubFixture::new().await;
    let whoami = fixture.mock_whoami(200, r#"{"name":"dhani10"}"#, 0).await;

    let err = deploy(&fixture.config(), vec![("HF_TOKEN", "short")])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("too short"));
    whoami.assert_async().await;
}

#[tokio::test]
async fn test_valid_token_creates_missing_repository() {
    let mut fixture = MockHubFixture::new().await;
    let whoami = fixture.mock_whoami_ok().await;
    let create = fixture
        .mock_create(200, r#"{"url":"https://huggingface.co/dhani10/engine-condition-model"}"#, 1)
        .await;

    let report = deploy(&fixture.config(), valid_env()).await.unwrap();

    assert_eq!(report.identity.name, "dhani10");
    assert!(report.created());
    assert_eq!(report.repo.repo_id.to_string(), REPO_ID);
    whoami.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn test_existing_repository_is_not_an_error() {
    let mut fixture = MockHubFixture::new().await;
    let _whoami = fixture.mock_whoami_ok().await;
    let create = fixture
        .mock_create(409, r#"{"error":"You already created this model repo"}"#, 1)
        .await;

    let report = deploy(&fixture.config(), valid_env()).await.unwrap();

    assert_eq!(report.repo.outcome, EnsureOutcome::AlreadyExists);
    assert_eq!(report.repo.url, format!("{}/{}", fixture.base_url, REPO_ID));
    create.assert_async().await;
}

#[tokio::test]
async fn test_rejected_token_never_attempts_creation() {
    let mut fixture = MockHubFixture::new().await;
    let whoami = fixture
        .mock_whoami(401, r#"{"error":"Invalid credentials in Authorization header"}"#, 1)
        .await;
    let create = fixture.mock_create(200, r#"{}"#, 0).await;

    let err = deploy(&fixture.config(), valid_env()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.stage(), Some(Stage::Authenticate));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().starts_with("Token validation failed:"));
    whoami.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn test_repository_creation_failure_exits_non_zero() {
    let mut fixture = MockHubFixture::new().await;
    let _whoami = fixture.mock_whoami_ok().await;
    let _create = fixture
        .mock_create(500, r#"{"error":"Internal Error"}"#, 1)
        .await;

    let err = deploy(&fixture.config(), valid_env()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RepositoryCreation);
    assert_eq!(err.exit_code(), 1);
    assert_eq!(err.cause().status(), Some(500));
}

#[tokio::test]
async fn test_created_without_url_falls_back_to_endpoint_url() {
    let mut fixture = MockHubFixture::new().await;
    let _whoami = fixture.mock_whoami_ok().await;
    let _create = fixture.mock_create(200, "", 1).await;

    let report = deploy(&fixture.config(), valid_env()).await.unwrap();

    assert!(report.created());
    assert_eq!(report.repo.url, format!("{}/{}", fixture.base_url, REPO_ID));
}
