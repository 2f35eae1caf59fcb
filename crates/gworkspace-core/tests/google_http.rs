//! HTTP behavior of the Google client and the contact email update flow,
//! against a local mock server.

use gworkspace_core::common::create_http_client;
use gworkspace_core::google::{GoogleClient, PeopleApi};
use gworkspace_core::ErrorCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> GoogleClient {
    GoogleClient::new(create_http_client(5).unwrap(), "ya29.test".to_string())
}

#[tokio::test]
async fn sends_bearer_token_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/things"))
        .and(header("authorization", "Bearer ya29.test"))
        .and(query_param("pageSize", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [1, 2]})))
        .expect(1)
        .mount(&server)
        .await;

    let value = client()
        .get(&format!("{}/v1/things", server.uri()), &[("pageSize", "5".to_string())])
        .await
        .unwrap();

    assert_eq!(value, json!({"items": [1, 2]}));
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = client().get(&server.uri(), &[]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RateLimited);
}

#[tokio::test]
async fn empty_success_body_is_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let value = client().patch(&server.uri(), &[], &json!({"a": 1})).await.unwrap();
    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn error_envelope_becomes_google_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "The caller does not have permission"}
        })))
        .mount(&server)
        .await;

    let err = client().post(&server.uri(), &[], &json!({})).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::GoogleApi);
    assert_eq!(err.message, "Google API error 403: The caller does not have permission");
    assert_eq!(err.data, Some(json!({"status": 403})));
}

#[tokio::test]
async fn add_contact_email_reads_then_patches_with_etag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/people/c42"))
        .and(query_param("personFields", "names,emailAddresses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceName": "people/c42",
            "etag": "%EgUBAj0DLi4aBAECBQc=",
            "emailAddresses": [{"value": "ada@example.com"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/people/c42:updateContact"))
        .and(query_param("updatePersonFields", "emailAddresses"))
        .and(body_json(json!({
            "etag": "%EgUBAj0DLi4aBAECBQc=",
            "emailAddresses": [{"value": "ada@example.com"}, {"value": "ada@work.example"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceName": "people/c42",
            "emailAddresses": [{"value": "ada@example.com"}, {"value": "ada@work.example"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let people = PeopleApi::with_base_url(client(), server.uri());
    let updated = people.add_contact_email("people/c42", "ada@work.example").await.unwrap();

    assert_eq!(updated["emailAddresses"][1]["value"], "ada@work.example");
}

#[tokio::test]
async fn add_contact_email_without_etag_sends_no_patch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/people/c42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resourceName": "people/c42"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let people = PeopleApi::with_base_url(client(), server.uri());
    let err = people.add_contact_email("people/c42", "x@example.com").await.unwrap_err();

    assert_eq!(err.code, ErrorCode::PreconditionFailed);
    assert_eq!(err.message, "Could not retrieve etag for contact. Update failed.");
}

#[tokio::test]
async fn add_contact_email_rejects_bad_resource_name_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let people = PeopleApi::with_base_url(client(), server.uri());
    let err = people.add_contact_email("people/../me", "x@example.com").await.unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidParams);
}
