use std::time::Duration;

use reqwest::Client;
use url::Url;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use news_core::{
    shared_fetch_state, spawn_searcher, ArticleClient, FilterRecord, FilterStore,
    SearchOrchestrator, TextField,
};

fn article_body(title: &str) -> serde_json::Value {
    serde_json::json!({
        "items": [{
            "id": "1",
            "title": title,
            "content": "body text",
            "news_provided_by": "AP",
            "date": "2024-10-21T07:28:00"
        }]
    })
}

fn client_for(server: &MockServer) -> ArticleClient {
    ArticleClient::new(
        Client::new(),
        Url::parse(&server.uri()).expect("mock server uri"),
        50,
    )
}

fn title_filter(value: &str) -> FilterRecord {
    FilterRecord {
        title: value.into(),
        ..FilterRecord::default()
    }
}

#[tokio::test]
async fn initial_load_requests_limit_only_and_populates_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/articles"))
        .and(query_param("limit", "50"))
        .and(query_param_is_missing("title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_body("unfiltered")))
        .expect(1)
        .mount(&server)
        .await;

    let state = shared_fetch_state();
    assert!(state.read().await.loading, "starts in the loading state");

    let orchestrator = SearchOrchestrator::new(client_for(&server), state.clone());
    orchestrator.initial_load().await.expect("initial load");

    let current = state.read().await;
    assert!(!current.loading);
    assert!(current.error.is_none());
    assert_eq!(current.articles.len(), 1);
    assert_eq!(current.articles[0].title, "unfiltered");
}

#[tokio::test]
async fn stale_response_does_not_overwrite_newer_result() {
    let server = MockServer::start().await;
    // The older request answers slowly, after the newer one has settled.
    Mock::given(method("GET"))
        .and(path("/v1/articles"))
        .and(query_param("title", "x"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(article_body("stale"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/articles"))
        .and(query_param("title", "y"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_body("fresh")))
        .mount(&server)
        .await;

    let state = shared_fetch_state();
    let orchestrator = SearchOrchestrator::new(client_for(&server), state.clone());

    let slow = orchestrator.on_filter_change(title_filter("x"));
    let fast = orchestrator.on_filter_change(title_filter("y"));
    fast.await.expect("fast fetch task");
    slow.await.expect("slow fetch task");

    let current = state.read().await;
    assert_eq!(current.articles[0].title, "fresh");
    assert!(!current.loading);
    assert!(current.error.is_none());
}

#[tokio::test]
async fn discarded_stale_completion_leaves_loading_cleared() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/articles"))
        .and(query_param("title", "x"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(article_body("stale"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/articles"))
        .and(query_param("title", "y"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_body("fresh")))
        .mount(&server)
        .await;

    let state = shared_fetch_state();
    let orchestrator = SearchOrchestrator::new(client_for(&server), state.clone());

    let slow = orchestrator.on_filter_change(title_filter("x"));
    let fast = orchestrator.on_filter_change(title_filter("y"));
    fast.await.expect("fast fetch task");

    // The newer result has settled; the superseded request still in flight
    // must not be reported as loading.
    assert!(!state.read().await.loading);

    slow.await.expect("slow fetch task");
    let current = state.read().await;
    assert!(!current.loading, "a discarded completion must not wedge the flag");
    assert_eq!(current.articles[0].title, "fresh");
    assert!(current.error.is_none());
}

#[tokio::test]
async fn loading_is_set_while_a_fetch_is_in_flight() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/articles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(article_body("slow"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let state = shared_fetch_state();
    let orchestrator = SearchOrchestrator::new(client_for(&server), state.clone());

    let task = orchestrator.on_filter_change(title_filter("slow"));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(state.read().await.loading);

    task.await.expect("fetch task");
    assert!(!state.read().await.loading);
}

#[tokio::test]
async fn failed_fetch_keeps_articles_and_sets_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/articles"))
        .and(query_param("title", "good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_body("good news")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/articles"))
        .and(query_param("title", "bad"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = shared_fetch_state();
    let orchestrator = SearchOrchestrator::new(client_for(&server), state.clone());

    orchestrator
        .on_filter_change(title_filter("good"))
        .await
        .expect("successful fetch");
    assert_eq!(state.read().await.articles[0].title, "good news");

    orchestrator
        .on_filter_change(title_filter("bad"))
        .await
        .expect("failing fetch");
    {
        let current = state.read().await;
        assert_eq!(current.articles[0].title, "good news", "articles untouched");
        let error = current.error.as_ref().expect("error surfaced");
        assert_eq!(error.status, Some(500));
        assert!(!current.loading);
    }

    orchestrator
        .on_filter_change(title_filter("good"))
        .await
        .expect("recovery fetch");
    let current = state.read().await;
    assert!(current.error.is_none(), "next success clears the error");
    assert_eq!(current.articles[0].title, "good news");
}

#[tokio::test]
async fn malformed_body_is_surfaced_as_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let state = shared_fetch_state();
    let orchestrator = SearchOrchestrator::new(client_for(&server), state.clone());
    orchestrator
        .on_filter_change(FilterRecord::default())
        .await
        .expect("fetch task");

    let current = state.read().await;
    let error = current.error.as_ref().expect("decode error surfaced");
    assert!(error.status.is_none());
    assert!(current.articles.is_empty());
}

#[tokio::test]
async fn debounced_keystrokes_collapse_to_a_single_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/articles"))
        .and(query_param("limit", "50"))
        .and(query_param_is_missing("title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_body("unfiltered")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/articles"))
        .and(query_param("title", "test"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_body("matched")))
        .expect(1)
        .mount(&server)
        .await;

    let state = shared_fetch_state();
    let orchestrator = SearchOrchestrator::new(client_for(&server), state.clone());

    let (tx, rx) = tokio::sync::mpsc::channel(16);
    let handle = spawn_searcher(orchestrator, rx);
    let mut store = FilterStore::new(Duration::from_millis(200), tx);

    store.set_text(TextField::Title, "t");
    tokio::time::sleep(Duration::from_millis(50)).await;
    store.set_text(TextField::Title, "te");
    tokio::time::sleep(Duration::from_millis(50)).await;
    store.set_text(TextField::Title, "test");

    // Quiet period plus fetch round-trip.
    tokio::time::sleep(Duration::from_millis(600)).await;

    {
        let current = state.read().await;
        assert_eq!(current.articles[0].title, "matched");
        assert!(!current.loading);
    }

    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(
        requests.len(),
        2,
        "initial load plus one debounced search, nothing for the partial keystrokes"
    );

    handle.stop().await.expect("stop searcher");
}
