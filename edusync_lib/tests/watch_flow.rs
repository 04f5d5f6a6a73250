use std::sync::Arc;
use std::time::Duration;

use edusync_lib::{
    Attendances, Client, CredentialStore, FilterSet, MemoryCredentials, ResourceWatcher,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> (Client, Arc<MemoryCredentials>) {
    let creds = Arc::new(MemoryCredentials::with_token("tok-123"));
    (Client::new(&server.uri(), creds.clone()), creds)
}

/// A page body with `count` attendance items starting at `first_id`.
fn page_body(first_id: i64, count: i64, page: i64, total_count: i64, total_pages: i64) -> serde_json::Value {
    let items: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "id": first_id + i,
                "student_id": 100 + i,
                "session_id": 7,
                "date": "2025-09-01",
                "state": "present"
            })
        })
        .collect();
    json!({
        "status": "success",
        "data": items,
        "pagination": {
            "page": page, "limit": 20,
            "total_count": total_count, "total_pages": total_pages
        }
    })
}

#[tokio::test]
async fn end_to_end_pagination_scenario() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 20, 1, 45, 3)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(21, 20, 2, 45, 3)))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let watcher = ResourceWatcher::<Attendances>::new(client, FilterSet::new(), 1, 20);
    watcher.wait_idle().await;

    let snap = watcher.snapshot();
    let page = snap.data.expect("first page");
    assert_eq!(page.items.len(), 20);
    assert_eq!(watcher.current_page(), 1);
    assert!(page.pagination.has_next);
    assert!(!page.pagination.has_prev);

    watcher.go_to_page(2);
    watcher.wait_idle().await;

    let snap = watcher.snapshot();
    let page = snap.data.expect("second page");
    assert_eq!(page.items[0].id, 21);
    assert!(page.pagination.has_prev);
    assert_eq!(watcher.current_page(), 2);
}

#[tokio::test]
async fn filter_change_resets_page_to_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 5, 1, 5, 1)))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let watcher = ResourceWatcher::<Attendances>::new(client, FilterSet::new(), 1, 20);
    watcher.wait_idle().await;

    watcher.go_to_page(3);
    watcher.wait_idle().await;
    assert_eq!(watcher.current_page(), 3);

    watcher.update_filters(&FilterSet::new().with("state", "late"));
    assert_eq!(watcher.current_page(), 1, "filter change must reset the page");
    watcher.wait_idle().await;

    let requests = server.received_requests().await.unwrap();
    let last_query = requests.last().unwrap().url.query().unwrap().to_string();
    assert!(last_query.contains("page=1"), "got query: {last_query}");
    assert!(last_query.contains("state=late"));
}

#[tokio::test]
async fn rapid_filter_edits_collapse_into_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 1, 1, 1, 1)))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let watcher = ResourceWatcher::<Attendances>::new(client, FilterSet::new(), 1, 20);
    watcher.wait_idle().await;
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    // Five edits inside the debounce window.
    watcher.update_filters(&FilterSet::new().with("search", "a"));
    watcher.update_filters(&FilterSet::new().with("search", "al"));
    watcher.update_filters(&FilterSet::new().with("search", "ali"));
    watcher.update_filters(&FilterSet::new().with("search", "alic"));
    watcher.update_filters(&FilterSet::new().with("search", "alice"));
    watcher.wait_idle().await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2, "five rapid edits must coalesce into one fetch");
    assert!(requests[1].url.query().unwrap().contains("search=alice"));
}

#[tokio::test]
async fn empty_filter_value_unsets_an_active_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .and(query_param("search", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 1, 1, 1, 1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .and(query_param_is_missing("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 8, 1, 8, 1)))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let watcher = ResourceWatcher::<Attendances>::new(
        client,
        FilterSet::new().with("search", "alice"),
        1,
        20,
    );
    watcher.wait_idle().await;
    assert_eq!(watcher.snapshot().data.unwrap().items.len(), 1);

    watcher.update_filters(&FilterSet::new().with("search", ""));
    watcher.wait_idle().await;

    assert!(watcher.filters().get("search").is_none());
    assert_eq!(watcher.snapshot().data.unwrap().items.len(), 8);
}

#[tokio::test]
async fn slow_stale_response_never_clobbers_a_fresh_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .and(query_param("marker", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(1, 1, 1, 1, 1))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .and(query_param("marker", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(2, 1, 1, 1, 1)))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let watcher =
        ResourceWatcher::<Attendances>::new(client, FilterSet::new().with("marker", 1), 1, 20);
    watcher.wait_idle().await;

    // Kick off a slow refetch of the old filters, then supersede it.
    let slow = watcher.clone();
    let slow_task = tokio::spawn(async move { slow.refetch().await });
    tokio::time::sleep(Duration::from_millis(30)).await;
    watcher.update_filters(&FilterSet::new().with("marker", 2));
    watcher.wait_idle().await;

    let fresh = watcher.snapshot().data.expect("fresh page");
    assert_eq!(fresh.items[0].id, 2);

    // Let the stale response resolve; it must be discarded.
    slow_task.await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let still = watcher.snapshot().data.expect("page kept");
    assert_eq!(still.items[0].id, 2, "stale response must not be applied");
    assert!(watcher.snapshot().error.is_none());
}

#[tokio::test]
async fn refetch_twice_issues_two_requests_with_identical_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 3, 1, 3, 1)))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let watcher = ResourceWatcher::<Attendances>::new(client, FilterSet::new(), 1, 20);
    watcher.wait_idle().await;

    watcher.refetch().await;
    let first: Vec<i64> = watcher.snapshot().data.unwrap().items.iter().map(|a| a.id).collect();
    watcher.refetch().await;
    let second: Vec<i64> = watcher.snapshot().data.unwrap().items.iter().map(|a| a.id).collect();

    assert_eq!(server.received_requests().await.unwrap().len(), 3);
    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_credential_short_circuits_to_intentional_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 1, 1, 1, 1)))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::new(&server.uri(), Arc::new(MemoryCredentials::new()));
    let watcher = ResourceWatcher::<Attendances>::new(client, FilterSet::new(), 1, 20);
    watcher.wait_idle().await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    let snap = watcher.snapshot();
    assert!(!snap.loading);
    assert!(snap.data.is_none());
    assert!(snap.error.is_none(), "missing auth is not an error state");
}

#[tokio::test]
async fn http_401_surfaces_auth_error_and_clears_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error", "message": "Session expired"
        })))
        .mount(&server)
        .await;

    let (client, creds) = client_for(&server);
    let watcher = ResourceWatcher::<Attendances>::new(client, FilterSet::new(), 1, 20);
    watcher.wait_idle().await;

    let snap = watcher.snapshot();
    assert!(snap.data.is_none());
    let error = snap.error.expect("auth error surfaced");
    assert_eq!(error, "session expired, please sign in again");
    assert_eq!(creds.get(), None);
}

#[tokio::test]
async fn backend_error_clears_data_and_recovery_clears_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .and(query_param("state", "bogus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error", "message": "unknown state filter"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .and(query_param("state", "late"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 2, 1, 2, 1)))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let watcher = ResourceWatcher::<Attendances>::new(
        client,
        FilterSet::new().with("state", "bogus"),
        1,
        20,
    );
    watcher.wait_idle().await;
    let snap = watcher.snapshot();
    assert_eq!(snap.error.as_deref(), Some("unknown state filter"));
    assert!(snap.data.is_none());

    watcher.update_filters(&FilterSet::new().with("state", "late"));
    watcher.wait_idle().await;
    let snap = watcher.snapshot();
    assert!(snap.error.is_none());
    assert_eq!(snap.data.unwrap().items.len(), 2);
}

#[tokio::test]
async fn closed_watcher_never_applies_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 1, 1, 1, 1)))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let watcher = ResourceWatcher::<Attendances>::new(client, FilterSet::new(), 1, 20);
    watcher.close();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(watcher.snapshot().data.is_none());
}

#[tokio::test]
async fn next_and_prev_are_gated_by_pagination_flags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 5, 1, 5, 1)))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let watcher = ResourceWatcher::<Attendances>::new(client, FilterSet::new(), 1, 20);
    watcher.wait_idle().await;

    // Single page: neither direction may move.
    watcher.next_page();
    assert_eq!(watcher.current_page(), 1);
    watcher.prev_page();
    assert_eq!(watcher.current_page(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
