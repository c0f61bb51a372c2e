//! HTTP client tests against a mock Cloud Functions API

use std::time::Duration;

use secrecy::SecretString;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cfdeploy::deploy::publisher::public_invoker_policy;
use cfdeploy::errors::DeployerError;
use cfdeploy::http::client::HttpClient;
use cfdeploy::http::upload::CONTENT_LENGTH_RANGE;
use cfdeploy::provider::{ArtifactStore, FunctionLookup, FunctionsProvider};
use functions_api::CloudFunction;

const NAME: &str = "projects/p/locations/r/functions/f";

fn client(server: &MockServer) -> HttpClient {
    HttpClient::new(
        &format!("{}/v1", server.uri()),
        SecretString::from("test-token".to_string()),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_get_function_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/{}", NAME)))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": NAME,
            "runtime": "go113",
            "versionId": "5",
            "minInstances": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    match client(&server).get_function(NAME).await.unwrap() {
        FunctionLookup::Found(function) => {
            assert_eq!(function.runtime, "go113");
            assert_eq!(function.version_id, Some(5));
            assert_eq!(function.extra["minInstances"], 1);
        }
        FunctionLookup::NotFound => panic!("expected the function to be found"),
    }
}

#[tokio::test]
async fn test_get_function_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/{}", NAME)))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": { "code": 404, "message": "Function f does not exist", "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    assert_eq!(
        client(&server).get_function(NAME).await.unwrap(),
        FunctionLookup::NotFound
    );
}

#[tokio::test]
async fn test_get_function_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/{}", NAME)))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    match client(&server).get_function(NAME).await.unwrap_err() {
        DeployerError::ApiError(e) => {
            assert_eq!(e.status, 500);
            assert_eq!(e.message, "upstream exploded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_create_function() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/p/locations/r/functions"))
        .and(body_json(serde_json::json!({
            "name": NAME,
            "sourceUploadUrl": "https://upload/1",
            "httpsTrigger": {},
            "runtime": "go113"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "name": "operations/op-1", "done": false })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let function = CloudFunction {
        name: NAME.to_string(),
        source_upload_url: "https://upload/1".to_string(),
        https_trigger: Some(Default::default()),
        runtime: "go113".to_string(),
        ..Default::default()
    };
    let op = client(&server)
        .create_function("projects/p/locations/r", &function)
        .await
        .unwrap();

    assert_eq!(op.name, "operations/op-1");
    assert!(!op.done);
}

#[tokio::test]
async fn test_update_function_sends_mask() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("/v1/{}", NAME)))
        .and(query_param("updateMask", "sourceUploadUrl"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "name": "operations/op-2" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let function = CloudFunction {
        name: NAME.to_string(),
        source_upload_url: "https://upload/2".to_string(),
        ..Default::default()
    };
    let op = client(&server)
        .update_function(&function, "sourceUploadUrl")
        .await
        .unwrap();
    assert_eq!(op.name, "operations/op-2");
}

#[tokio::test]
async fn test_get_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/operations/op-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "operations/op-1",
            "done": true,
            "error": { "code": 9, "message": "quota exceeded" }
        })))
        .mount(&server)
        .await;

    let op = client(&server).get_operation("operations/op-1").await.unwrap();
    assert!(op.done);
    assert_eq!(op.error.unwrap().message, "quota exceeded");
}

#[tokio::test]
async fn test_set_iam_policy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}:setIamPolicy", NAME)))
        .and(body_json(serde_json::json!({
            "policy": {
                "bindings": [
                    { "role": "roles/cloudfunctions.invoker", "members": ["allUsers"] }
                ]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "version": 1,
            "etag": "BwWWja0YfJA=",
            "bindings": [
                { "role": "roles/cloudfunctions.invoker", "members": ["allUsers"] }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let policy = client(&server)
        .set_iam_policy(NAME, &public_invoker_policy())
        .await
        .unwrap();
    assert_eq!(policy.etag.as_deref(), Some("BwWWja0YfJA="));
}

#[tokio::test]
async fn test_generate_upload_url_and_upload() {
    let server = MockServer::start().await;
    let signed_url = format!("{}/upload/signed?X-Goog-Signature=abc", server.uri());

    Mock::given(method("POST"))
        .and(path("/v1/projects/p/locations/r/functions:generateUploadUrl"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "uploadUrl": signed_url })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload/signed"))
        .and(header("content-type", "application/zip"))
        .and(header("x-goog-content-length-range", CONTENT_LENGTH_RANGE))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let url = client
        .generate_upload_url("projects/p/locations/r")
        .await
        .unwrap();
    assert_eq!(url, signed_url);

    client.upload_archive(&url, b"zip".to_vec()).await.unwrap();
}

#[tokio::test]
async fn test_upload_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/upload/signed"))
        .respond_with(ResponseTemplate::new(403).set_body_string("SignatureDoesNotMatch"))
        .mount(&server)
        .await;

    let url = format!("{}/upload/signed", server.uri());
    match client(&server).upload_archive(&url, b"zip".to_vec()).await {
        Err(DeployerError::UploadError(message)) => {
            assert!(message.starts_with("403"));
            assert!(message.ends_with("\n\nSignatureDoesNotMatch"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
