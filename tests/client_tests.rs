//! Client facade tests against the mock transport.

use serde_json::{json, Value};
use sotagents::client::{Pagination, PaperFilter, RepositoryFilter, SearchFilter, SEARCH_TIMEOUT};
use sotagents::error::{ClientError, HttpClientError};
use sotagents::models::{
    EvaluationTableSyncRequest, MetricSyncRequest, Model, ResultCreateRequest, ResultSyncRequest,
    TaskCreateRequest, TaskUpdateRequest,
};
use sotagents::transport::{AuthMethod, MockTransport};
use sotagents::Client;
use std::sync::Arc;

fn client(method: AuthMethod) -> (Client, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new(method));
    (Client::new(transport.clone()), transport)
}

fn unauthorized() -> HttpClientError {
    HttpClientError::new(
        401,
        "Given token not valid for any token type",
        Some(r#"{"detail":"Given token not valid for any token type"}"#.into()),
    )
}

fn task(id: &str) -> Value {
    json!({"id": id, "name": "Image Classification", "description": ""})
}

fn page(results: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "count": 120,
        "next": next,
        "previous": null,
        "results": results
    })
}

fn paper() -> Value {
    json!({
        "id": "attention-is-all-you-need",
        "arxiv_id": "1706.03762",
        "nips_id": null,
        "url_abs": "https://arxiv.org/abs/1706.03762v5",
        "url_pdf": "https://arxiv.org/pdf/1706.03762v5.pdf",
        "title": "Attention Is All You Need",
        "abstract": "The dominant sequence transduction models...",
        "authors": ["Ashish Vaswani"],
        "published": "2017-06-12",
        "conference": null,
        "conference_url_abs": null,
        "conference_url_pdf": null,
        "proceeding": null
    })
}

#[tokio::test]
async fn test_full_text_listing_requests_search_timeout() {
    let (client, transport) = client(AuthMethod::Anonymous);
    transport.push_response(page(
        vec![paper()],
        Some("https://sotagents.com/api/v1/papers/?page=2&q=attention"),
    ));

    let papers = client
        .paper_list(&PaperFilter::new().q("attention"), Pagination::default())
        .await
        .unwrap();
    assert_eq!(papers.count, 120);
    assert_eq!(papers.next_page, Some(2));
    assert_eq!(papers.previous_page, None);
    assert_eq!(papers.results[0].title, "Attention Is All You Need");

    let call = transport.last_call().unwrap();
    assert_eq!(call.method, "GET");
    assert_eq!(call.path, "/papers/");
    assert_eq!(call.timeout, Some(SEARCH_TIMEOUT));
    assert_eq!(call.param("q"), Some("attention"));
    assert_eq!(call.param("page"), Some("1"));
    assert_eq!(call.param("items_per_page"), Some("50"));
}

#[tokio::test]
async fn test_plain_filters_keep_default_timeout() {
    let (client, transport) = client(AuthMethod::Anonymous);
    transport.push_response(page(vec![], None));

    let filter = RepositoryFilter::new().owner("facebookresearch").stars(100u64);
    client
        .repository_list(&filter, Pagination::new(3, 10))
        .await
        .unwrap();

    let call = transport.last_call().unwrap();
    assert_eq!(call.timeout, None);
    assert_eq!(call.param("owner"), Some("facebookresearch"));
    assert_eq!(call.param("stars"), Some("100"));
    assert_eq!(call.param("page"), Some("3"));
    assert_eq!(call.param("items_per_page"), Some("10"));
    assert_eq!(call.param("q"), None);
}

#[tokio::test]
async fn test_search_sets_query() {
    let (client, transport) = client(AuthMethod::Anonymous);
    transport.push_response(page(
        vec![json!({"paper": paper(), "repository": null, "is_official": false})],
        None,
    ));

    let results = client
        .search(&SearchFilter::new().q("transformer"), Pagination::page(2))
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(results.results[0].repository.is_none());

    let call = transport.last_call().unwrap();
    assert_eq!(call.path, "/search/");
    assert_eq!(call.param("q"), Some("transformer"));
    assert_eq!(call.param("page"), Some("2"));
}

#[tokio::test]
async fn test_jwt_refreshes_once_and_retries() {
    let (client, transport) = client(AuthMethod::Jwt);
    transport.push_error(unauthorized());
    transport.push_response(task("image-classification"));

    let task = client.task_get("image-classification").await.unwrap();
    assert_eq!(task.id, "image-classification");
    assert_eq!(transport.refresh_count(), 1);
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn test_jwt_second_unauthorized_returns_first_error() {
    let (client, transport) = client(AuthMethod::Jwt);
    transport.push_error(unauthorized());
    transport.push_error(HttpClientError::new(401, "Still not valid", None));

    let err = client.task_get("image-classification").await.unwrap_err();
    match err {
        ClientError::Http(err) => {
            assert_eq!(err.status, 401);
            assert_eq!(err.message, "Given token not valid for any token type");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(transport.refresh_count(), 1);
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn test_static_token_never_refreshes() {
    let (client, transport) = client(AuthMethod::Token);
    transport.push_error(unauthorized());

    let err = client.paper_get("attention-is-all-you-need").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(transport.refresh_count(), 0);
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_refresh_failure_propagates_original_error() {
    let (client, transport) = client(AuthMethod::Jwt);
    transport.push_error(unauthorized());
    let blacklisted = HttpClientError::new(401, "Token is blacklisted", None);
    transport.push_refresh(Err(blacklisted.into()));

    let err = client.task_delete("image-classification").await.unwrap_err();
    match err {
        ClientError::Http(err) => {
            assert_eq!(err.message, "Given token not valid for any token type")
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(transport.refresh_count(), 1);
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_retry_surfaces_other_errors() {
    let (client, transport) = client(AuthMethod::Jwt);
    transport.push_error(unauthorized());
    transport.push_error(HttpClientError::new(404, "Not found.", None));

    let err = client.task_get("missing").await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_create_and_update_payloads() {
    let (client, transport) = client(AuthMethod::Token);
    transport.push_response(task("image-classification"));
    transport.push_response(task("image-classification"));

    let created = client
        .task_add(&TaskCreateRequest::new("Image Classification").area("computer-vision"))
        .await
        .unwrap();
    assert_eq!(created.name, "Image Classification");

    let call = transport.last_call().unwrap();
    assert_eq!(call.method, "POST");
    assert_eq!(call.path, "/tasks/");
    assert_eq!(
        call.body,
        Some(json!({
            "name": "Image Classification",
            "description": "",
            "area": "computer-vision"
        }))
    );

    client
        .task_update(
            "image-classification",
            &TaskUpdateRequest::new().clear_parent_task(),
        )
        .await
        .unwrap();
    let call = transport.last_call().unwrap();
    assert_eq!(call.method, "PATCH");
    assert_eq!(call.path, "/tasks/image-classification/");
    assert_eq!(call.body, Some(json!({"parent_task": null})));
}

#[tokio::test]
async fn test_synchronize_returns_ids() {
    let (client, transport) = client(AuthMethod::Token);
    transport.push_response(json!({
        "id": "tbl-1",
        "task": "image-classification",
        "dataset": "imagenet",
        "description": "",
        "mirror_url": null,
        "external_id": "ext-tbl",
        "metrics": [
            {"id": "m-1", "name": "Top 1 Accuracy", "description": "", "is_loss": false}
        ],
        "results": [
            {
                "id": "r-1",
                "metrics": {"Top 1 Accuracy": "85.1"},
                "methodology": "ResNet-50",
                "paper": null,
                "uses_additional_data": false,
                "external_id": "ext-1",
                "evaluated_on": "2021-03-01",
                "external_source_url": null
            },
            {
                "id": "r-2",
                "metrics": {"Top 1 Accuracy": "88.6"},
                "methodology": "ViT-L/16",
                "paper": null,
                "uses_additional_data": true,
                "external_id": null,
                "evaluated_on": "2021-03-02",
                "external_source_url": null
            }
        ]
    }));

    let metrics = |value: &str| {
        let mut map = serde_json::Map::new();
        map.insert("Top 1 Accuracy".into(), json!(value));
        map
    };
    let request = EvaluationTableSyncRequest::new("image-classification", "imagenet")
        .external_id("ext-tbl")
        .metric(MetricSyncRequest::new("Top 1 Accuracy").is_loss(false))
        .result(
            ResultSyncRequest::new(metrics("85.1"), "ResNet-50", "2021-03-01")
                .external_id("ext-1"),
        )
        .result(
            ResultSyncRequest::new(metrics("88.6"), "ViT-L/16", "2021-03-02")
                .uses_additional_data(true),
        );

    let response = client.evaluation_synchronize(&request).await.unwrap();
    assert_eq!(response.id, "tbl-1");
    assert_eq!(response.metrics[0].id.as_deref(), Some("m-1"));
    let ids: Vec<&str> = response.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r-1", "r-2"]);
    assert_eq!(response.results[0].external_id.as_deref(), Some("ext-1"));
    assert_eq!(response.results[1].external_id, None);

    let call = transport.last_call().unwrap();
    assert_eq!(call.path, "/rpc/evaluation-synchronize/");
    let body = call.body.unwrap();
    assert_eq!(body["results"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["results"][0]["external_id"], json!("ext-1"));
    assert!(body["results"][1].get("external_id").is_none());
    assert_eq!(body["results"][1]["evaluated_on"], json!("2021-03-02"));
    assert_eq!(body["metrics"][0]["is_loss"], json!(false));
}

#[tokio::test]
async fn test_result_create_echo_keeps_fields() {
    let (client, transport) = client(AuthMethod::Token);
    let mut metrics = serde_json::Map::new();
    metrics.insert("Top 1 Accuracy".into(), json!("85.1"));
    metrics.insert("Top 5 Accuracy".into(), json!(97.4));
    let request = ResultCreateRequest::new(metrics, "ResNet-50")
        .paper("deep-residual-learning-for-image")
        .evaluated_on("2021-03-01")
        .external_source_url("https://example.com/leaderboard")
        .uses_additional_data(true);

    let mut echoed = request.to_payload().unwrap();
    echoed["id"] = json!("r-9");
    echoed["best_rank"] = json!(null);
    echoed["best_metric"] = json!(null);
    transport.push_response(echoed);

    let result = client
        .evaluation_result_add("tbl-1", &request)
        .await
        .unwrap();
    assert_eq!(result.id, "r-9");
    assert_eq!(result.metrics, request.metrics);
    assert_eq!(result.methodology, "ResNet-50");
    assert!(result.uses_additional_data);
    assert_eq!(result.paper, request.paper);
    assert_eq!(result.evaluated_on.as_deref(), Some("2021-03-01"));
    assert_eq!(result.external_source_url, request.external_source_url);
    assert_eq!(result.best_rank, None);

    let call = transport.last_call().unwrap();
    assert_eq!(call.method, "POST");
    assert_eq!(call.path, "/evaluations/tbl-1/results/");
    assert!(call.body.unwrap().get("id").is_none());
}

#[tokio::test]
async fn test_invalid_page_elements_are_reported_together() {
    let (client, transport) = client(AuthMethod::Anonymous);
    transport.push_response(page(
        vec![
            task("ok"),
            json!({"id": "no-name", "description": ""}),
            json!({"id": 7, "name": "bad id", "description": ""}),
        ],
        None,
    ));

    let err = client
        .task_list(&Default::default(), Pagination::default())
        .await
        .unwrap_err();
    match err {
        ClientError::Validation(err) => {
            let locs: Vec<&str> = err.errors().iter().map(|e| e.loc.as_str()).collect();
            assert_eq!(locs, vec!["results.1.name", "results.2.id"]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_path_segments_are_encoded() {
    let (client, transport) = client(AuthMethod::Anonymous);
    transport.push_response(json!({
        "url": "https://github.com/a b/c",
        "owner": "a b",
        "name": "c/d",
        "description": "",
        "stars": 1,
        "framework": "none",
        "is_official": null
    }));

    client.repository_get("a b", "c/d").await.unwrap();
    assert_eq!(
        transport.last_call().unwrap().path,
        "/repositories/a%20b/c%2Fd/"
    );
}

#[tokio::test]
async fn test_empty_queue_surfaces_server_error() {
    let (client, _transport) = client(AuthMethod::Anonymous);
    let err = client.evaluation_get("tbl-1").await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));
    assert!(err.is_http());
}
