//! Integration tests for the tag lifecycle against a stub appliance.
//!
//! These run the public client with the default API key signer and check that
//! every request reaching the appliance carries the signing headers.

use serde_json::json;
use tetration_core::{Error, ErrorKind, TetrationClientConfig};
use tetration_tags::{CreateTagRequest, DeleteTagRequest, DescribeTagRequest, TagsClient};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCOPE_PATH: &str = "/openapi/v1/inventory/tags/Default";

fn client_for(server: &MockServer) -> TagsClient {
    let config = TetrationClientConfig::new(server.uri(), "lifecycle-key", "lifecycle-secret")
        .expect("valid configuration");
    TagsClient::new(config).expect("client builds")
}

#[tokio::test]
async fn create_describe_delete_round() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SCOPE_PATH))
        .and(header("id", "lifecycle-key"))
        .and(header("content-type", "application/json"))
        .and(header_exists("timestamp"))
        .and(header_exists("authorization"))
        .and(header_exists("x-tetration-cksum"))
        .and(body_json(json!({"ip": "10.0.0.5", "attributes": {"env": "prod"}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SCOPE_PATH))
        .and(query_param("ip", "10.0.0.5"))
        .and(header("id", "lifecycle-key"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"env": "prod"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(SCOPE_PATH))
        .and(header("id", "lifecycle-key"))
        .and(body_json(json!({"ip": "10.0.0.5"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let tag = client
        .create_tag(&CreateTagRequest::new("Default", "10.0.0.5").with_attribute("env", "prod"))
        .await
        .unwrap();
    assert_eq!(tag.ip, "10.0.0.5");
    assert_eq!(tag.attributes.get("env"), Some(&json!("prod")));

    let attributes = client
        .describe_tag(&DescribeTagRequest::new("Default", "10.0.0.5"))
        .await
        .unwrap();
    assert_eq!(attributes.get("env").map(String::as_str), Some("prod"));

    client
        .delete_tag(&DeleteTagRequest::new("Default", "10.0.0.5"))
        .await
        .unwrap();
}

#[tokio::test]
async fn describe_missing_tag_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SCOPE_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("tag not found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .describe_tag(&DescribeTagRequest::new("Default", "10.0.0.9"))
        .await
        .unwrap_err();

    assert_eq!(err, Error::NotFound("tag not found".to_string()));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn unreachable_appliance_is_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let config = TetrationClientConfig::new(uri, "lifecycle-key", "lifecycle-secret").unwrap();
    let client = TagsClient::new(config).unwrap();
    let err = client
        .delete_tag(&DeleteTagRequest::new("Default", "10.0.0.5"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn empty_secret_fails_before_dispatch() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = TetrationClientConfig::new(server.uri(), "lifecycle-key", "").unwrap();
    let client = TagsClient::new(config).unwrap();
    let err = client
        .create_tag(&CreateTagRequest::new("Default", "10.0.0.5"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SigningError(_)));
    assert_eq!(err.kind(), ErrorKind::Construction);
}
