//! Tests for pagination module

use super::*;
use crate::cursor::{decode_jobs_cursor, encode_jobs_cursor, ContinuationToken, Cursor};
use crate::decode::BodyFieldExtractor;
use crate::error::{Error, ErrorKind, Result};
use crate::http::{PageResponse, RequestExecutor};
use crate::types::{Job, StringMap};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_case::test_case;

// ============================================================================
// Test Executor
// ============================================================================

/// Executor that answers every request with the same canned outcome and
/// records what it was asked for
struct MockExecutor {
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, StringMap)>>,
    outcome: Result<PageResponse>,
    delay: Duration,
}

impl MockExecutor {
    fn ok(body: Value, next: Option<&str>) -> Self {
        let mut headers = HeaderMap::new();
        if let Some(next) = next {
            headers.insert(
                "link",
                HeaderValue::from_str(&format!("<{next}>; rel=\"next\"")).unwrap(),
            );
        }
        Self::with_outcome(Ok(PageResponse::json(&body).with_headers(headers)))
    }

    fn failing(err: Error) -> Self {
        Self::with_outcome(Err(err))
    }

    fn with_outcome(outcome: Result<PageResponse>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            outcome,
            delay: Duration::ZERO,
        }
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> (String, StringMap) {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl RequestExecutor for MockExecutor {
    async fn execute(&self, target: &str, params: &StringMap) -> Result<PageResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((target.to_string(), params.clone()));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}

fn backend(executor: &Arc<MockExecutor>) -> JobsBackend {
    JobsBackend::new(executor.clone())
}

fn queued_page() -> Arc<MockExecutor> {
    Arc::new(MockExecutor::ok(
        json!({"jobs": [{"id": 1}, {"id": 2}], "totalCount": 10}),
        Some("/jobs/queued?after=2"),
    ))
}

// ============================================================================
// PageOptions Tests
// ============================================================================

#[test_case("Running", "/jobs/running" ; "mixed case")]
#[test_case("QUEUED", "/jobs/queued" ; "upper case")]
#[test_case("completed", "/jobs/completed" ; "lower case")]
fn test_first_page_target(status: &str, expected: &str) {
    assert_eq!(PageOptions::new(status).request_target(), expected);
}

#[test]
fn test_continuation_target_ignores_status() {
    let options = PageOptions::new("Running")
        .with_continuation(ContinuationToken::new("/jobs/queued?after=7&limit=3"));
    assert!(!options.is_first_page());
    assert_eq!(options.request_target(), "/jobs/queued?after=7&limit=3");
}

#[test]
fn test_request_params_always_applied() {
    let options = PageOptions::new("queued")
        .with_query("foo")
        .with_limit(NonZeroU32::new(50).unwrap())
        .with_continuation(ContinuationToken::new("/jobs/queued?after=2&limit=10"));

    let params = options.request_params();
    assert_eq!(params.len(), 2);
    assert_eq!(params.get("limit"), Some(&"50".to_string()));
    assert_eq!(params.get("query"), Some(&"foo".to_string()));
}

#[test]
fn test_request_params_empty_by_default() {
    assert!(PageOptions::new("queued").request_params().is_empty());
}

#[test]
fn test_page_info_constructors() {
    let token = ContinuationToken::new("/jobs/queued?after=2");
    let info = PageInfo::next(&token);
    assert!(info.has_next_page);
    assert_eq!(decode_jobs_cursor(info.end_cursor.as_ref().unwrap()).unwrap(), token);

    assert_eq!(
        PageInfo::last(),
        PageInfo {
            has_next_page: false,
            end_cursor: None
        }
    );
}

#[test]
fn test_page_info_serializes_camel_case() {
    let value = serde_json::to_value(PageInfo::last()).unwrap();
    assert_eq!(value, json!({"hasNextPage": false, "endCursor": null}));
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_new_connection_decodes_cursor() {
    let executor = queued_page();
    let token = ContinuationToken::new("/jobs/queued?after=2");
    let cursor = encode_jobs_cursor(&token);

    let connection = backend(&executor)
        .new_connection("queued", Some("foo".into()), Some(5), Some(&cursor))
        .unwrap();

    assert_eq!(connection.options().continuation(), Some(&token));
    assert_eq!(connection.options().text_query(), Some("foo"));
    assert_eq!(connection.options().limit(), NonZeroU32::new(5));
    assert_eq!(connection.status(), ResolveStatus::Unresolved);
}

#[test]
fn test_new_connection_invalid_cursor_fails_before_fetch() {
    let executor = queued_page();
    let err = backend(&executor)
        .new_connection("queued", None, None, Some(&Cursor::new("garbage")))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidCursor);
    assert_eq!(executor.calls(), 0);
}

#[test]
fn test_new_connection_rejects_zero_limit() {
    let executor = queued_page();
    let err = backend(&executor)
        .new_connection("queued", None, Some(0), None)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { ref field, .. } if field == "limit"));
}

// ============================================================================
// Fetch Tests
// ============================================================================

#[tokio::test]
async fn test_end_to_end_first_page() {
    let executor = queued_page();
    let connection = backend(&executor)
        .new_connection("queued", None, None, None)
        .unwrap();

    let items = connection.items().await.unwrap();
    assert_eq!(
        items.iter().map(|n| n.id().cloned()).collect::<Vec<_>>(),
        vec![Some(json!(1)), Some(json!(2))]
    );
    assert_eq!(connection.total_count().await.unwrap(), 10);
    assert!(connection.has_next_page().await.unwrap());

    let cursor = connection.next_cursor().await.unwrap().unwrap();
    assert_eq!(
        decode_jobs_cursor(&cursor).unwrap().as_str(),
        "/jobs/queued?after=2"
    );

    let info = connection.page_info().await.unwrap();
    assert!(info.has_next_page);
    assert_eq!(info.end_cursor, Some(cursor));

    assert_eq!(executor.calls(), 1);
    assert_eq!(executor.last_request(), ("/jobs/queued".to_string(), StringMap::new()));
    assert_eq!(connection.status(), ResolveStatus::Resolved);
}

#[tokio::test]
async fn test_terminal_page() {
    let executor = Arc::new(MockExecutor::ok(
        json!({"jobs": [{"id": 9}], "totalCount": 1}),
        None,
    ));
    let connection = backend(&executor).connection(PageOptions::new("completed"));

    assert!(!connection.has_next_page().await.unwrap());
    assert_eq!(connection.next_cursor().await.unwrap(), None);
    assert_eq!(connection.page_info().await.unwrap(), PageInfo::last());
    assert!(connection.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_jobs_yields_empty_items() {
    let executor = Arc::new(MockExecutor::ok(json!({"totalCount": 0}), None));
    let connection = backend(&executor).connection(PageOptions::new("queued"));

    assert_eq!(connection.items().await.unwrap(), Vec::<JobNode>::new());
    assert_eq!(connection.total_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_continuation_routing_and_params() {
    let executor = queued_page();
    let cursor = encode_jobs_cursor(&ContinuationToken::new("/jobs/queued?after=2&limit=10"));
    let connection = backend(&executor)
        .new_connection("running", Some("foo".into()), Some(50), Some(&cursor))
        .unwrap();

    connection.total_count().await.unwrap();

    let (target, params) = executor.last_request();
    assert_eq!(target, "/jobs/queued?after=2&limit=10");
    assert_eq!(params.get("limit"), Some(&"50".to_string()));
    assert_eq!(params.get("query"), Some(&"foo".to_string()));
}

#[tokio::test]
async fn test_repeated_accessors_fetch_once() {
    let executor = queued_page();
    let connection = backend(&executor).connection(PageOptions::new("queued"));

    let first = connection.items().await.unwrap();
    for _ in 0..5 {
        assert_eq!(connection.items().await.unwrap(), first);
        assert_eq!(connection.total_count().await.unwrap(), 10);
        assert!(connection.has_next_page().await.unwrap());
    }

    assert_eq!(executor.calls(), 1);
}

#[tokio::test]
async fn test_result_is_shared() {
    let executor = queued_page();
    let connection = backend(&executor).connection(PageOptions::new("queued"));

    let a = connection.result().await.unwrap();
    let b = connection.result().await.unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.items, vec![Job::new(json!({"id": 1})), Job::new(json!({"id": 2}))]);
}

#[tokio::test]
async fn test_custom_next_location_extractor() {
    let executor = Arc::new(MockExecutor::ok(
        json!({"jobs": [], "totalCount": 4, "next": "/jobs/queued?after=99"}),
        None,
    ));
    let connection = JobsBackend::new(executor.clone())
        .with_next_location(BodyFieldExtractor::new("next"))
        .connection(PageOptions::new("queued"));

    let cursor = connection.next_cursor().await.unwrap().unwrap();
    assert_eq!(
        decode_jobs_cursor(&cursor).unwrap().as_str(),
        "/jobs/queued?after=99"
    );
}

#[tokio::test]
async fn test_next_page_carries_options() {
    let executor = queued_page();
    let connection = backend(&executor).connection(
        PageOptions::new("queued")
            .with_query("foo")
            .with_limit(NonZeroU32::new(2).unwrap()),
    );

    let next = connection.next_page().await.unwrap().unwrap();
    assert_eq!(next.status(), ResolveStatus::Unresolved);
    assert_eq!(next.options().request_target(), "/jobs/queued?after=2");
    assert_eq!(next.options().text_query(), Some("foo"));
    assert_eq!(next.options().limit(), NonZeroU32::new(2));

    next.items().await.unwrap();
    assert_eq!(executor.calls(), 2);
    assert_eq!(executor.last_request().0, "/jobs/queued?after=2");
}

// ============================================================================
// Error Replay Tests
// ============================================================================

#[tokio::test]
async fn test_error_replayed_to_every_accessor() {
    let executor = Arc::new(MockExecutor::failing(Error::http_status(502, "bad gateway")));
    let connection = backend(&executor).connection(PageOptions::new("queued"));

    let expected = Error::http_status(502, "bad gateway");
    assert_eq!(connection.items().await.unwrap_err(), expected);
    assert_eq!(connection.total_count().await.unwrap_err(), expected);
    assert_eq!(connection.has_next_page().await.unwrap_err(), expected);
    assert_eq!(connection.page_info().await.unwrap_err(), expected);
    assert_eq!(connection.next_cursor().await.unwrap_err(), expected);
    assert!(connection.next_page().await.is_err());

    assert_eq!(executor.calls(), 1);
    assert_eq!(connection.status(), ResolveStatus::Failed);
}

#[tokio::test]
async fn test_decode_error_replayed() {
    let executor = Arc::new(MockExecutor::with_outcome(Ok(PageResponse::new("{not json"))));
    let connection = backend(&executor).connection(PageOptions::new("queued"));

    let first = connection.items().await.unwrap_err();
    assert_eq!(first.kind(), ErrorKind::Decode);
    assert_eq!(connection.total_count().await.unwrap_err(), first);
    assert_eq!(executor.calls(), 1);
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_accessors_fetch_once() {
    let executor = Arc::new(
        MockExecutor::ok(
            json!({"jobs": [{"id": 1}, {"id": 2}], "totalCount": 10}),
            Some("/jobs/queued?after=2"),
        )
        .slow(Duration::from_millis(50)),
    );
    let connection = Arc::new(backend(&executor).connection(PageOptions::new("queued")));

    let mut handles = Vec::new();
    for i in 0..24 {
        let connection = connection.clone();
        handles.push(tokio::spawn(async move {
            match i % 3 {
                0 => connection.items().await.map(|items| items.len() as u64),
                1 => connection.total_count().await,
                _ => connection.has_next_page().await.map(u64::from),
            }
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let value = handle.await.unwrap().unwrap();
        let expected = match i % 3 {
            0 => 2,
            1 => 10,
            _ => 1,
        };
        assert_eq!(value, expected);
    }

    assert_eq!(executor.calls(), 1);
}

#[tokio::test]
async fn test_concurrent_error_replay() {
    let executor = Arc::new(
        MockExecutor::failing(Error::http("connection refused")).slow(Duration::from_millis(20)),
    );
    let connection = backend(&executor).connection(PageOptions::new("queued"));

    let (items, count, next) = tokio::join!(
        connection.items(),
        connection.total_count(),
        connection.has_next_page()
    );

    let expected = Error::http("connection refused");
    assert_eq!(items.unwrap_err(), expected);
    assert_eq!(count.unwrap_err(), expected);
    assert_eq!(next.unwrap_err(), expected);
    assert_eq!(executor.calls(), 1);
}

#[tokio::test]
async fn test_status_while_resolving() {
    let slow = Arc::new(
        MockExecutor::ok(json!({"jobs": [], "totalCount": 0}), None)
            .slow(Duration::from_millis(100)),
    );
    let connection = Arc::new(backend(&slow).connection(PageOptions::new("queued")));
    assert_eq!(connection.status(), ResolveStatus::Unresolved);

    let pending = {
        let connection = connection.clone();
        tokio::spawn(async move { connection.total_count().await })
    };

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(connection.status(), ResolveStatus::Resolving);
    assert!(!connection.status().is_terminal());

    pending.await.unwrap().unwrap();
    assert_eq!(connection.status(), ResolveStatus::Resolved);
    assert_eq!(slow.calls(), 1);
}

#[tokio::test]
async fn test_cancelled_caller_does_not_refetch() {
    let slow = Arc::new(
        MockExecutor::ok(json!({"jobs": [{"id": 1}], "totalCount": 10}), None)
            .slow(Duration::from_millis(100)),
    );
    let connection = backend(&slow).connection(PageOptions::new("queued"));

    let cancelled = tokio::time::timeout(Duration::from_millis(20), connection.items()).await;
    assert!(cancelled.is_err());
    assert_eq!(connection.status(), ResolveStatus::Resolving);

    assert_eq!(connection.total_count().await.unwrap(), 10);
    assert_eq!(connection.items().await.unwrap().len(), 1);
    assert_eq!(connection.status(), ResolveStatus::Resolved);
    assert_eq!(slow.calls(), 1);
}

#[tokio::test]
async fn test_fetch_completes_without_a_waiting_caller() {
    let slow = Arc::new(
        MockExecutor::ok(json!({"jobs": [], "totalCount": 3}), None)
            .slow(Duration::from_millis(50)),
    );
    let connection = backend(&slow).connection(PageOptions::new("queued"));

    let _ = tokio::time::timeout(Duration::from_millis(10), connection.result()).await;
    tokio::time::sleep(Duration::from_millis(150)).await;

    let total = tokio::time::timeout(Duration::from_millis(10), connection.total_count())
        .await
        .expect("fetch already finished on its own task");
    assert_eq!(total.unwrap(), 3);
    assert_eq!(connection.status(), ResolveStatus::Resolved);
    assert_eq!(slow.calls(), 1);
}

#[tokio::test]
async fn test_instances_do_not_share_cache() {
    let executor = queued_page();
    let backend = backend(&executor);

    let a = backend.connection(PageOptions::new("queued"));
    let b = backend.connection(PageOptions::new("queued"));
    a.total_count().await.unwrap();
    b.total_count().await.unwrap();

    assert_eq!(executor.calls(), 2);
}

#[tokio::test]
async fn test_custom_payload_decoder() {
    use crate::decode::{JobsPayload, PayloadDecoder};

    /// Reads a bare JSON array of jobs
    struct ArrayDecoder;

    impl PayloadDecoder for ArrayDecoder {
        fn decode(&self, response: &PageResponse) -> Result<JobsPayload> {
            let jobs: Vec<Job> = serde_json::from_slice(&response.body)?;
            Ok(JobsPayload {
                total_count: jobs.len() as u64,
                jobs,
            })
        }
    }

    let executor = Arc::new(MockExecutor::ok(json!([{"id": "a"}, {"id": "b"}, {"id": "c"}]), None));
    let connection = JobsBackend::new(executor.clone())
        .with_decoder(ArrayDecoder)
        .connection(PageOptions::new("queued"));

    assert_eq!(connection.total_count().await.unwrap(), 3);
    assert_eq!(connection.items().await.unwrap()[2].id(), Some(&json!("c")));
}
