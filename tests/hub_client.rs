//! HubClient against a mock Hub: identity lookup and create-if-absent.

mod integration;

use hub_deploy::error_code::HubErrorClass;
use hub_deploy::hub::{EnsureOutcome, HubApi, RepoId, RepoSpec};
use hub_deploy::Error;
use integration::mock_server::{MockHubFixture, REPO_ID};

fn default_spec() -> RepoSpec {
    RepoSpec::new(RepoId::parse(REPO_ID).unwrap())
}

#[tokio::test]
async fn test_whoami_sends_bearer_token_and_parses_identity() {
    let mut fixture = MockHubFixture::new().await;
    let mock = fixture.mock_whoami_ok().await;

    let identity = fixture.client().whoami().await.unwrap();

    assert_eq!(identity.name, "dhani10");
    assert_eq!(identity.token_role(), Some("write"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_whoami_rejected_token_is_authentication_error() {
    let mut fixture = MockHubFixture::new().await;
    let _mock = fixture
        .mock_whoami(401, r#"{"error":"Invalid credentials in Authorization header"}"#, 1)
        .await;

    let err = fixture.client().whoami().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.class(), Some(HubErrorClass::Authentication));
    assert!(err
        .to_string()
        .contains("Invalid credentials in Authorization header"));
}

#[tokio::test]
async fn test_user_agent_identifies_tool() {
    let mut fixture = MockHubFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/api/whoami-v2")
        .match_header("user-agent", mockito::Matcher::Regex("^hub-deploy/".to_string()))
        .with_status(200)
        .with_body(r#"{"name":"dhani10"}"#)
        .create_async()
        .await;

    fixture.client().whoami().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_new_repository_uses_returned_url() {
    let mut fixture = MockHubFixture::new().await;
    let mock = fixture
        .mock_create(
            200,
            r#"{"url":"https://huggingface.co/dhani10/engine-condition-model","name":"dhani10/engine-condition-model"}"#,
            1,
        )
        .await;

    let repo = fixture.client().ensure_repo(&default_spec()).await.unwrap();

    assert_eq!(repo.outcome, EnsureOutcome::Created);
    assert_eq!(repo.url, "https://huggingface.co/dhani10/engine-condition-model");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_existing_repository_is_success() {
    let mut fixture = MockHubFixture::new().await;
    let _mock = fixture
        .mock_create(409, r#"{"error":"You already created this model repo"}"#, 1)
        .await;

    let repo = fixture.client().ensure_repo(&default_spec()).await.unwrap();

    assert_eq!(repo.outcome, EnsureOutcome::AlreadyExists);
    assert_eq!(repo.url, format!("{}/{}", fixture.base_url, REPO_ID));
}

#[tokio::test]
async fn test_ensure_twice_creates_once() {
    let mut fixture = MockHubFixture::new().await;
    let client = fixture.client();
    let spec = default_spec();

    let created = fixture
        .mock_create(200, r#"{"url":"https://huggingface.co/dhani10/engine-condition-model"}"#, 1)
        .await;
    let first = client.ensure_repo(&spec).await.unwrap();
    created.assert_async().await;
    created.remove_async().await;

    let exists = fixture
        .mock_create(409, r#"{"error":"You already created this model repo"}"#, 1)
        .await;
    let second = client.ensure_repo(&spec).await.unwrap();
    exists.assert_async().await;

    assert_eq!(first.outcome, EnsureOutcome::Created);
    assert_eq!(second.outcome, EnsureOutcome::AlreadyExists);
    assert_eq!(first.repo_id, second.repo_id);
}

#[tokio::test]
async fn test_forbidden_create_on_existing_repository_is_success() {
    let mut fixture = MockHubFixture::new().await;
    let _create = fixture
        .mock_create(403, r#"{"error":"You don't have the rights to create a model under this namespace"}"#, 1)
        .await;
    let lookup = fixture.mock_model_info(200, 1).await;

    let repo = fixture.client().ensure_repo(&default_spec()).await.unwrap();

    assert_eq!(repo.outcome, EnsureOutcome::AlreadyExists);
    lookup.assert_async().await;
}

#[tokio::test]
async fn test_forbidden_create_on_missing_repository_keeps_original_error() {
    let mut fixture = MockHubFixture::new().await;
    let _create = fixture
        .mock_create(403, r#"{"error":"You don't have the rights to create a model under this namespace"}"#, 1)
        .await;
    let _lookup = fixture.mock_model_info(404, 1).await;

    let err = fixture.client().ensure_repo(&default_spec()).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(err.class(), Some(HubErrorClass::PermissionDenied));
    assert!(err.to_string().contains("don't have the rights"));
}

#[tokio::test]
async fn test_forbidden_create_with_failing_existence_check_keeps_original_error() {
    let mut fixture = MockHubFixture::new().await;
    let _create = fixture
        .mock_create(403, r#"{"error":"You don't have the rights to create a model under this namespace"}"#, 1)
        .await;
    let lookup = fixture.mock_model_info(500, 1).await;

    let err = fixture.client().ensure_repo(&default_spec()).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(err.class(), Some(HubErrorClass::PermissionDenied));
    assert!(err.to_string().contains("don't have the rights"));
    lookup.assert_async().await;
}

#[tokio::test]
async fn test_empty_error_body_falls_back_to_status_reason() {
    let mut fixture = MockHubFixture::new().await;
    let _mock = fixture
        .server
        .mock("POST", "/api/repos/create")
        .with_status(502)
        .create_async()
        .await;

    let err = fixture.client().ensure_repo(&default_spec()).await.unwrap_err();

    match err {
        Error::Remote { status, message, .. } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_prefers_error_message_header() {
    let mut fixture = MockHubFixture::new().await;
    let _mock = fixture
        .server
        .mock("POST", "/api/repos/create")
        .with_status(503)
        .with_header("x-error-message", "Hub is under maintenance")
        .with_body("<html>unavailable</html>")
        .create_async()
        .await;

    let err = fixture.client().ensure_repo(&default_spec()).await.unwrap_err();

    match err {
        Error::Remote { status, class, message } => {
            assert_eq!(status, 503);
            assert_eq!(class, HubErrorClass::Overloaded);
            assert_eq!(message, "Hub is under maintenance");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_space_without_sdk_fails_before_request() {
    let mut fixture = MockHubFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/api/repos/create")
        .expect(0)
        .create_async()
        .await;

    let spec = default_spec().with_repo_type(hub_deploy::hub::RepoType::Space);
    let err = fixture.client().ensure_repo(&spec).await.unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_repo_exists_reports_presence() {
    let mut fixture = MockHubFixture::new().await;
    let _found = fixture.mock_model_info(200, 1).await;
    assert!(fixture.client().repo_exists(&default_spec()).await.unwrap());

    let mut fixture = MockHubFixture::new().await;
    let _missing = fixture.mock_model_info(404, 1).await;
    assert!(!fixture.client().repo_exists(&default_spec()).await.unwrap());
}

#[tokio::test]
async fn test_unreachable_hub_is_transport_error() {
    let client = hub_deploy::HubClientBuilder::new()
        .endpoint("http://127.0.0.1:1")
        .build(hub_deploy::Credential::new("validlongtoken123"))
        .unwrap();

    let err = client.whoami().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
