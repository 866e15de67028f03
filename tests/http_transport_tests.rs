//! HTTP transport tests against a local mock server.

use mockito::{Matcher, Server};
use serde_json::json;
use sotagents::client::{Pagination, TaskFilter};
use sotagents::error::ClientError;
use sotagents::transport::{Authorization, HttpTransport, Transport};
use sotagents::Client;
use std::sync::Arc;

const TASK: &str =
    r#"{"id": "image-classification", "name": "Image Classification", "description": ""}"#;

fn api_url(server: &Server) -> String {
    format!("{}/api/v1", server.url())
}

#[tokio::test]
async fn test_token_header_and_query() {
    let mut server = Server::new_async().await;
    let previous = format!("{}/api/v1/tasks/?items_per_page=50", server.url());
    let mock = server
        .mock("GET", "/api/v1/tasks/")
        .match_header("authorization", "Token secret")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "Image Classification".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("items_per_page".into(), "50".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"count": 51, "next": null, "previous": "{}", "results": [{}]}}"#,
            previous, TASK
        ))
        .create_async()
        .await;

    let transport =
        HttpTransport::new(api_url(&server), Authorization::Token("secret".into())).unwrap();
    let client = Client::new(Arc::new(transport));
    let tasks = client
        .task_list(
            &TaskFilter::new().name("Image Classification"),
            Pagination::page(2),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(tasks.count, 51);
    assert_eq!(tasks.previous_page, Some(1));
    assert_eq!(tasks.results[0].id, "image-classification");
}

#[tokio::test]
async fn test_anonymous_sends_no_authorization() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/tasks/image-classification/")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(TASK)
        .create_async()
        .await;

    let transport = HttpTransport::new(api_url(&server), Authorization::Anonymous).unwrap();
    let value = transport
        .get("/tasks/image-classification/", &[], None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(value["name"], json!("Image Classification"));
}

#[tokio::test]
async fn test_expired_access_token_is_refreshed() {
    let mut server = Server::new_async().await;
    let stale = server
        .mock("GET", "/api/v1/tasks/image-classification/")
        .match_header("authorization", "Bearer stale")
        .with_status(401)
        .with_body(r#"{"detail": "Given token not valid for any token type"}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/v1/auth/token/refresh/")
        .match_body(Matcher::Json(json!({"refresh": "r1"})))
        .with_status(200)
        .with_body(r#"{"access": "fresh", "refresh": "r2"}"#)
        .expect(1)
        .create_async()
        .await;
    let fresh = server
        .mock("GET", "/api/v1/tasks/image-classification/")
        .match_header("authorization", "Bearer fresh")
        .with_status(200)
        .with_body(TASK)
        .expect(1)
        .create_async()
        .await;

    let transport = Arc::new(
        HttpTransport::new(
            api_url(&server),
            Authorization::Jwt {
                access: "stale".into(),
                refresh: "r1".into(),
            },
        )
        .unwrap(),
    );
    let client = Client::new(transport.clone());
    let task = client.task_get("image-classification").await.unwrap();

    stale.assert_async().await;
    refresh.assert_async().await;
    fresh.assert_async().await;
    assert_eq!(task.name, "Image Classification");
    assert_eq!(
        transport.authorization().await,
        Authorization::Jwt {
            access: "fresh".into(),
            refresh: "r2".into()
        }
    );
}

#[tokio::test]
async fn test_rejected_refresh_keeps_original_error() {
    let mut server = Server::new_async().await;
    let _expired = server
        .mock("GET", "/api/v1/papers/p-1/")
        .with_status(401)
        .with_body(r#"{"detail": "Token expired"}"#)
        .create_async()
        .await;
    let _refresh = server
        .mock("POST", "/api/v1/auth/token/refresh/")
        .with_status(401)
        .with_body(r#"{"detail": "Token is blacklisted"}"#)
        .create_async()
        .await;

    let transport = HttpTransport::new(
        api_url(&server),
        Authorization::Jwt {
            access: "a".into(),
            refresh: "r".into(),
        },
    )
    .unwrap();
    let client = Client::new(Arc::new(transport));

    match client.paper_get("p-1").await.unwrap_err() {
        ClientError::Http(err) => {
            assert_eq!(err.status, 401);
            assert_eq!(err.message, "Token expired");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_headers() {
    let mut server = Server::new_async().await;
    let _throttled = server
        .mock("GET", "/api/v1/papers/")
        .with_status(429)
        .with_header("x-ratelimit-limit", "100")
        .with_header("x-ratelimit-remaining", "0")
        .with_header("x-ratelimit-reset", "42")
        .with_header("retry-after", "42")
        .with_body(r#"{"detail": "Request was throttled."}"#)
        .create_async()
        .await;

    let transport = HttpTransport::new(api_url(&server), Authorization::Anonymous).unwrap();
    let err = transport.get("/papers/", &[], None).await.unwrap_err();

    assert_eq!(err.status_code(), Some(429));
    match err {
        ClientError::RateLimited(err) => {
            assert_eq!(err.limit, Some(100));
            assert_eq!(err.remaining, Some(0));
            assert_eq!(err.reset, Some(42));
            assert_eq!(err.retry, Some(42));
            assert_eq!(err.response.message, "Request was throttled.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_error_message_and_body() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", "/api/v1/datasets/missing/")
        .with_status(404)
        .with_body(r#"{"detail": "Not found."}"#)
        .create_async()
        .await;
    let _broken = server
        .mock("GET", "/api/v1/datasets/broken/")
        .with_status(502)
        .with_body("<html>Bad gateway</html>")
        .create_async()
        .await;

    let transport = HttpTransport::new(api_url(&server), Authorization::Anonymous).unwrap();

    match transport.get("/datasets/missing/", &[], None).await.unwrap_err() {
        ClientError::Http(err) => {
            assert_eq!(err.status, 404);
            assert_eq!(err.message, "Not found.");
            assert_eq!(err.data().get("detail"), Some(&json!("Not found.")));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    match transport.get("/datasets/broken/", &[], None).await.unwrap_err() {
        ClientError::Http(err) => {
            assert_eq!(err.status, 502);
            assert_eq!(err.message, "Bad Gateway");
            assert_eq!(err.body.as_deref(), Some("<html>Bad gateway</html>"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_body_and_json_payload() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", "/api/v1/tasks/image-classification/")
        .with_status(204)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/api/v1/tasks/image-classification/")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"area": null})))
        .with_status(200)
        .with_body(TASK)
        .create_async()
        .await;

    let transport = HttpTransport::new(api_url(&server), Authorization::Anonymous).unwrap();
    transport
        .delete("/tasks/image-classification/")
        .await
        .unwrap();
    let value = transport
        .patch("/tasks/image-classification/", &json!({"area": null}))
        .await
        .unwrap();

    delete.assert_async().await;
    patch.assert_async().await;
    assert_eq!(value["id"], json!("image-classification"));
}

#[tokio::test]
async fn test_unreachable_server_is_500() {
    // Nothing listens on port 9 locally.
    let transport =
        HttpTransport::new("http://127.0.0.1:9/api/v1", Authorization::Anonymous).unwrap();
    let err = transport.get("/papers/", &[], None).await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));
}
