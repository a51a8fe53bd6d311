//! Integration tests for `Client` over `HyperExecutor` using wiremock.

use std::time::Duration;

use assert2::{check, let_assert};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use verdict::{
    Client, DecodePhase, Error, ExecutorConfig, HyperExecutor, KeyDecoding, Pipeline,
    PipelineConfig,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    user_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct ApiError {
    code: i64,
    message: String,
}

fn url(server: &MockServer, path: &str) -> url::Url {
    url::Url::parse(&format!("{}{path}", server.uri())).expect("url")
}

#[tokio::test]
async fn test_get_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1,
                "user_name": "ann"
            })),
        )
        .mount(&mock_server)
        .await;

    let client = Client::hyper();
    let user: User = client
        .get(&url(&mock_server, "/users/1"))
        .await
        .expect("user");

    assert_eq!(
        user,
        User {
            id: 1,
            user_name: "ann".to_string()
        }
    );
}

#[tokio::test]
async fn test_snake_case_keys_into_camel_case_shape() {
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Profile {
        user_name: String,
        avatar_url: String,
    }

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user_name": "ann",
                "avatar_url": "https://img.example.com/ann.png"
            })),
        )
        .mount(&mock_server)
        .await;

    let config = PipelineConfig::builder()
        .key_decoding(KeyDecoding::ConvertFromSnakeCase)
        .build()
        .expect("config");
    let client = Client::with_pipeline(HyperExecutor::new(), Pipeline::new(config));

    let profile: Profile = client.get(&url(&mock_server, "/me")).await.expect("profile");
    check!(profile.user_name == "ann");
    check!(profile.avatar_url == "https://img.example.com/ann.png");
}

#[tokio::test]
async fn test_post_with_caller_built_request() {
    let mock_server = MockServer::start().await;

    let input = serde_json::json!({ "user_name": "bob" });

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&input))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 42,
                "user_name": "bob"
            })),
        )
        .mount(&mock_server)
        .await;

    let request = http::Request::post(url(&mock_server, "/users").as_str())
        .header("Content-Type", "application/json")
        .body(Bytes::from(serde_json::to_vec(&input).expect("json")))
        .expect("request");

    let client = Client::hyper();
    let user: User = client.send(request).await.expect("created");

    check!(user.id == 42);
}

#[tokio::test]
async fn test_not_found_without_error_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = Client::hyper();
    let result = client.get::<User>(&url(&mock_server, "/missing")).await;

    let_assert!(Err(Error::Status { status, body }) = result);
    check!(status == 404);
    check!(body.as_ref() == b"Not Found");
}

#[tokio::test]
async fn test_application_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/invalid"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "code": 7,
                "message": "bad"
            })),
        )
        .mount(&mock_server)
        .await;

    let pipeline = Pipeline::default().with_error_shape::<ApiError>();
    let client = Client::with_pipeline(HyperExecutor::new(), pipeline);

    let result = client
        .get::<User>(&url(&mock_server, "/users/invalid"))
        .await;

    let_assert!(Err(Error::Application { status, error }) = result);
    check!(status == 422);
    check!(
        error
            == ApiError {
                code: 7,
                message: "bad".to_string()
            }
    );
}

#[tokio::test]
async fn test_unparseable_error_body_keeps_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(500).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let pipeline = Pipeline::default().with_error_shape::<ApiError>();
    let client = Client::with_pipeline(HyperExecutor::new(), pipeline);

    let result = client.get::<User>(&url(&mock_server, "/boom")).await;

    let_assert!(Err(Error::Decode(err)) = result);
    check!(err.phase() == DecodePhase::Error { status: 500 });
    check!(err.body().as_ref() == b"not json");
}

#[tokio::test]
async fn test_invalid_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "two" })),
        )
        .mount(&mock_server)
        .await;

    let client = Client::hyper();
    let result = client.get::<User>(&url(&mock_server, "/users/2")).await;

    let_assert!(Err(Error::Decode(err)) = result);
    check!(err.phase() == DecodePhase::Success);
}

#[tokio::test]
async fn test_explicit_error_status_without_decoder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/conflict"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "code": 1,
                "message": "duplicate"
            })),
        )
        .mount(&mock_server)
        .await;

    let config = PipelineConfig::builder()
        .error_status(409)
        .build()
        .expect("config");
    let client = Client::with_pipeline(HyperExecutor::new(), Pipeline::new(config));

    let result = client.get::<User>(&url(&mock_server, "/conflict")).await;

    let_assert!(Err(err) = result);
    check!(err.is_missing_error_decoder());
}

#[tokio::test]
async fn test_meta_exposes_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/3"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "req-3")
                .set_body_json(serde_json::json!({ "id": 3, "user_name": "cy" })),
        )
        .mount(&mock_server)
        .await;

    let client = Client::hyper();
    let outcome = client
        .get_with_meta::<User>(&url(&mock_server, "/users/3"))
        .await;

    let_assert!(Some(meta) = &outcome.meta);
    check!(meta.status() == 200);
    check!(meta.header("X-Request-Id") == Some("req-3"));
    let_assert!(Ok(user) = outcome.result);
    check!(user.user_name == "cy");
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let executor = HyperExecutor::with_config(
        ExecutorConfig::builder()
            .timeout(Duration::from_millis(100))
            .build(),
    );
    let client = Client::new(executor);

    let outcome = client.get_with_meta::<User>(&url(&mock_server, "/slow")).await;

    check!(outcome.meta.is_none());
    let_assert!(Err(err) = outcome.result);
    check!(err.is_timeout());
}

#[tokio::test]
async fn test_concurrent_calls_share_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "id": 1, "user_name": "ann" })),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = Client::hyper();
    let found = url(&mock_server, "/users/1");
    let missing = url(&mock_server, "/users/9");

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            let target = if i % 2 == 0 { found.clone() } else { missing.clone() };
            tokio::spawn(async move { client.get::<User>(&target).await })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        let result = task.await.expect("join");
        if i % 2 == 0 {
            check!(result.is_ok());
        } else {
            let_assert!(Err(Error::Status { status: 404, .. }) = result);
        }
    }
}
