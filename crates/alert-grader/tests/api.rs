//! HTTP-level tests for the upload and result contract

use std::sync::Arc;

use alert_grader::config::GraderConfig;
use alert_grader::processing::{JobEvent, ResultDelay};
use alert_grader::providers::{MemoryObjectStore, ObjectStore, StoredObjectInfo};
use alert_grader::server::{build_router, state::AppState};
use alert_grader::{Error, Result};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

const BOUNDARY: &str = "----grader-test-boundary";

struct TestApp {
    router: Router,
    state: AppState,
    store: Arc<MemoryObjectStore>,
}

fn config(simulate: bool) -> GraderConfig {
    let mut config = GraderConfig::default();
    config.processing.simulate_results = simulate;
    config.processing.result_delay = ResultDelay::immediate();
    config
}

fn app_with(config: GraderConfig) -> TestApp {
    let store = Arc::new(MemoryObjectStore::new());
    let state = AppState::with_store(config, store.clone());
    TestApp {
        router: build_router(state.clone()),
        state,
        store,
    }
}

fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, filename, content)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

const ALERTS_CSV: &[u8] = b"Alert ID,Description,Severity,Category
ALERT-001,High CPU usage detected,High,Performance
ALERT-002,Memory leak detected,Critical,Performance";

#[tokio::test]
async fn test_health() {
    let app = app_with(config(false));
    let (status, body) = send(&app.router, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "Alert Grader Backend API");
    assert!(body["timestamp"].is_string());

    let (status, _) = send(&app.router, get("/api/ready")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_upload_stores_input_under_job_id() {
    let app = app_with(config(false));
    let (status, body) = send(&app.router, upload_request("file", "alerts.csv", ALERTS_CSV)).await;

    assert_eq!(status, StatusCode::CREATED);
    let job_id = body["job_id"].as_str().unwrap().to_string();
    assert!(Uuid::parse_str(&job_id).is_ok());
    assert_eq!(body["filename"], format!("{}.csv", job_id));
    assert_eq!(body["original_filename"], "alerts.csv");
    assert_eq!(body["message"], "File uploaded successfully");
    assert!(body["upload_time"].is_string());

    let stored = app
        .store
        .get("input-data", &format!("{}.csv", job_id))
        .await
        .unwrap();
    assert_eq!(stored, ALERTS_CSV);
}

#[tokio::test]
async fn test_xlsx_is_stored_with_csv_key() {
    let app = app_with(config(false));
    let (status, body) = send(&app.router, upload_request("file", "report.xlsx", b"PK\x03\x04")).await;

    assert_eq!(status, StatusCode::CREATED);
    let job_id = body["job_id"].as_str().unwrap();
    assert!(app
        .store
        .exists("input-data", &format!("{}.csv", job_id))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_job_ids_are_unique() {
    let app = app_with(config(false));
    let mut ids = std::collections::HashSet::new();
    for _ in 0..20 {
        let (status, body) = send(&app.router, upload_request("file", "alerts.csv", ALERTS_CSV)).await;
        assert_eq!(status, StatusCode::CREATED);
        ids.insert(body["job_id"].as_str().unwrap().to_string());
    }
    assert_eq!(ids.len(), 20);
    assert_eq!(app.store.count("input-data"), 20);
}

#[tokio::test]
async fn test_rejected_uploads_write_nothing() {
    let app = app_with(config(false));
    let oversized = vec![b'a'; 10 * 1024 * 1024 + 1];

    let cases: Vec<(Request<Body>, &str)> = vec![
        (upload_request("file", "payload.exe", b"MZ"), "File type not allowed"),
        (upload_request("file", "../evil.csv", ALERTS_CSV), "Invalid filename"),
        (upload_request("file", "alerts.csv", &oversized), "File too large"),
        (upload_request("file", "alerts.csv", b""), "File is empty"),
        (upload_request("document", "alerts.csv", ALERTS_CSV), "No file provided"),
    ];

    for (req, expected) in cases {
        let (status, body) = send(&app.router, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", expected);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains(expected), "{} !~ {}", message, expected);
    }

    assert_eq!(app.store.count("input-data"), 0);
    assert!(app.state.job_queue().list_jobs().is_empty());
}

#[tokio::test]
async fn test_result_pending_before_output_exists() {
    let app = app_with(config(false));
    let (_, body) = send(&app.router, upload_request("file", "alerts.csv", ALERTS_CSV)).await;
    let job_id = body["job_id"].as_str().unwrap();

    let (status, body) = send(&app.router, get(&format!("/api/result/{}", job_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "pending"}));

    // Unknown ids are indistinguishable on this endpoint
    let (status, body) = send(&app.router, get(&format!("/api/result/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "pending"}));
}

#[tokio::test]
async fn test_result_returns_stored_document() {
    let app = app_with(config(false));
    let (_, body) = send(&app.router, upload_request("file", "alerts.csv", ALERTS_CSV)).await;
    let job_id = body["job_id"].as_str().unwrap().to_string();

    let document = json!({
        "Grading Metrics": {"Match %": 91.0, "Uncertainty": 9.5},
        "notes": ["written", "externally"],
        "nested": {"empty": {}, "flag": false, "count": 3}
    });
    app.store
        .put(
            "output-data",
            &format!("{}.json", job_id),
            &serde_json::to_vec(&document).unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = send(&app.router, get(&format!("/api/result/{}", job_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, document);
}

#[tokio::test]
async fn test_malformed_result_is_server_error() {
    let app = app_with(config(false));
    let job_id = Uuid::new_v4();
    app.store
        .put("output-data", &format!("{}.json", job_id), b"{not json")
        .await
        .unwrap();

    let (status, body) = send(&app.router, get(&format!("/api/result/{}", job_id))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to get result:"));
}

#[tokio::test]
async fn test_unsafe_job_id_rejected() {
    let app = app_with(config(false));
    let (status, body) = send(&app.router, get("/api/result/bad.id")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid job id"));
}

async fn upload_and_wait(app: &TestApp, filename: &str) -> String {
    let mut events = app.state.job_queue().subscribe();
    let (status, body) = send(&app.router, upload_request("file", filename, ALERTS_CSV)).await;
    assert_eq!(status, StatusCode::CREATED);
    let job_id = body["job_id"].as_str().unwrap().to_string();

    loop {
        let event = events.recv().await.unwrap();
        if event.job_id().to_string() == job_id {
            assert!(matches!(event, JobEvent::Completed { .. }), "{:?}", event);
            break;
        }
    }
    job_id
}

#[tokio::test]
async fn test_sample_alerts_scenario() {
    let app = app_with(config(true));
    let job_id = upload_and_wait(&app, "sample-alerts.csv").await;

    let (status, body) = send(&app.router, get(&format!("/api/result/{}", job_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["Grading Metrics"],
        json!({"Match %": 95.2, "Uncertainty": 15.3})
    );
    assert_eq!(body["job_id"], job_id);
    assert_eq!(body["source_file"], "sample-alerts.csv");
}

#[tokio::test]
async fn test_generic_file_scenario() {
    let app = app_with(config(true));
    let job_id = upload_and_wait(&app, "weekly-export.csv").await;

    let (_, body) = send(&app.router, get(&format!("/api/result/{}", job_id))).await;
    assert_eq!(body["Grading Metrics"]["Match %"], 78.5);
}

#[tokio::test]
async fn test_status_reports_explicit_state() {
    let app = app_with(config(false));

    let unknown = Uuid::new_v4();
    let (status, body) = send(&app.router, get(&format!("/api/status/{}", unknown))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "unknown");

    let (_, body) = send(&app.router, upload_request("file", "alerts.csv", ALERTS_CSV)).await;
    let job_id = body["job_id"].as_str().unwrap().to_string();

    let (_, body) = send(&app.router, get(&format!("/api/status/{}", job_id))).await;
    assert_eq!(body["state"], "pending");
    assert!(body.get("error").is_none());

    app.store
        .put("output-data", &format!("{}.json", job_id), b"{}")
        .await
        .unwrap();
    let (_, body) = send(&app.router, get(&format!("/api/status/{}", job_id))).await;
    assert_eq!(body["state"], "completed");
}

#[tokio::test]
async fn test_status_after_simulated_completion() {
    let app = app_with(config(true));
    let job_id = upload_and_wait(&app, "test-alerts.csv").await;

    let (_, body) = send(&app.router, get(&format!("/api/status/{}", job_id))).await;
    assert_eq!(body["state"], "completed");

    let (_, body) = send(&app.router, get(&format!("/api/result/{}", job_id))).await;
    assert_eq!(body["Grading Metrics"]["Match %"], 88.7);
}

#[tokio::test]
async fn test_listings_hidden_by_default() {
    let app = app_with(config(false));
    let resp = app.router.clone().oneshot(get("/api/jobs")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = app.router.clone().oneshot(get("/api/results")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listings_when_enabled() {
    let mut config = config(false);
    config.server.enable_listings = true;
    let app = app_with(config);

    let (_, body) = send(&app.router, upload_request("file", "alerts.csv", ALERTS_CSV)).await;
    let job_id = body["job_id"].as_str().unwrap().to_string();
    app.store
        .put("output-data", &format!("{}.json", job_id), b"{\"ok\":true}")
        .await
        .unwrap();
    // Foreign objects are filtered by suffix
    app.store.put("input-data", "README.txt", b"ignore me").await.unwrap();

    let (status, body) = send(&app.router, get("/api/jobs")).await;
    assert_eq!(status, StatusCode::OK);
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["job_id"], job_id);
    assert_eq!(jobs[0]["filename"], format!("{}.csv", job_id));
    assert_eq!(jobs[0]["size"], ALERTS_CSV.len() as u64);
    assert!(jobs[0]["upload_time"].is_string());

    let (status, body) = send(&app.router, get("/api/results")).await;
    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["job_id"], job_id);
    assert_eq!(results[0]["size"], 11);
}

/// Store whose backend is unreachable
struct UnavailableStore;

#[async_trait]
impl ObjectStore for UnavailableStore {
    async fn put(&self, _namespace: &str, _key: &str, _data: &[u8]) -> Result<()> {
        Err(Error::storage("backend unreachable"))
    }
    async fn get(&self, _namespace: &str, _key: &str) -> Result<Vec<u8>> {
        Err(Error::storage("backend unreachable"))
    }
    async fn exists(&self, _namespace: &str, _key: &str) -> Result<bool> {
        Err(Error::storage("backend unreachable"))
    }
    async fn list(&self, _namespace: &str) -> Result<Vec<StoredObjectInfo>> {
        Err(Error::storage("backend unreachable"))
    }
    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }
    fn name(&self) -> &str {
        "unavailable"
    }
}

fn unavailable_router() -> Router {
    let state = AppState::with_store(config(true), Arc::new(UnavailableStore));
    build_router(state)
}

#[tokio::test]
async fn test_upload_storage_failure_is_server_error() {
    let router = unavailable_router();
    let (status, body) = send(&router, upload_request("file", "alerts.csv", ALERTS_CSV)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Failed to upload file:"), "{}", message);
    assert!(message.contains("backend unreachable"), "{}", message);
}

#[tokio::test]
async fn test_result_storage_failure_is_server_error() {
    let router = unavailable_router();
    let (status, body) = send(&router, get(&format!("/api/result/{}", Uuid::new_v4()))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Failed to get result:"), "{}", message);
    assert!(message.contains("backend unreachable"), "{}", message);

    let (status, _) = send(&router, get("/api/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_completed_jobs_are_not_retained() {
    let app = app_with(config(true));
    for _ in 0..25 {
        upload_and_wait(&app, "alerts.csv").await;
    }

    assert_eq!(app.state.job_queue().in_flight(), 0);
    assert_eq!(app.state.job_queue().tracked(), 0);
    assert_eq!(app.store.count("output-data"), 25);
}

#[tokio::test]
async fn test_status_shows_tracked_progress() {
    let mut config = config(true);
    config.processing.result_delay = ResultDelay::Fixed(std::time::Duration::from_secs(3600));
    let app = app_with(config);

    let (_, body) = send(&app.router, upload_request("file", "alerts.csv", ALERTS_CSV)).await;
    let job_id = body["job_id"].as_str().unwrap().to_string();

    let (status, body) = send(&app.router, get(&format!("/api/status/{}", job_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["state"] == "submitted" || body["state"] == "pending", "{}", body);
    assert_eq!(body["original_filename"], "alerts.csv");
    assert!(body["submitted_at"].is_string());
    assert!(body["updated_at"].is_string());
    if body["state"] == "pending" {
        assert_eq!(body["scheduled_delay_ms"], 3_600_000);
    }
}
