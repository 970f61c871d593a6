//! HTTP surface for the doppel plagiarism checker.
//!
//! Exposes an axum [`Router`] covering ingestion (multipart upload),
//! artifact lookup, the analysis trigger, report retrieval, and the
//! word-cloud pass-through, backed by any store implementing both
//! [`CorpusStore`] and [`ReportStore`].

pub mod artifacts;
pub mod error;
pub mod reports;
pub mod wordcloud;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  routing::{get, post},
};
use doppel_analysis::{Analyzer, Dispatcher, WordCloudClient};
use doppel_core::store::{CorpusStore, ReportStore};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `DOPPEL_*` environment variables. Every field has a default so the
/// server runs unconfigured.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "defaults::host")]
  pub host:               String,
  #[serde(default = "defaults::port")]
  pub port:               u16,
  #[serde(default = "defaults::store_path")]
  pub store_path:         PathBuf,
  #[serde(default = "defaults::uploads_dir")]
  pub uploads_dir:        PathBuf,
  #[serde(default = "defaults::analysis_workers")]
  pub analysis_workers:   usize,
  #[serde(default = "defaults::wordcloud_endpoint")]
  pub wordcloud_endpoint: String,
}

mod defaults {
  use std::path::PathBuf;

  pub fn host() -> String { "0.0.0.0".to_string() }
  pub fn port() -> u16 { 8081 }
  pub fn store_path() -> PathBuf { PathBuf::from("doppel.db") }
  pub fn uploads_dir() -> PathBuf { PathBuf::from("uploads") }
  pub fn analysis_workers() -> usize { 4 }
  pub fn wordcloud_endpoint() -> String {
    doppel_analysis::wordcloud::DEFAULT_ENDPOINT.to_string()
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               defaults::host(),
      port:               defaults::port(),
      store_path:         defaults::store_path(),
      uploads_dir:        defaults::uploads_dir(),
      analysis_workers:   defaults::analysis_workers(),
      wordcloud_endpoint: defaults::wordcloud_endpoint(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:      Arc<S>,
  pub analyzer:   Analyzer<S>,
  pub dispatcher: Dispatcher,
  pub wordcloud:  WordCloudClient,
  pub config:     Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      analyzer:   self.analyzer.clone(),
      dispatcher: self.dispatcher.clone(),
      wordcloud:  self.wordcloud.clone(),
      config:     Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the doppel server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CorpusStore + ReportStore + Send + Sync + 'static,
{
  Router::new()
    .route("/health", get(health))
    .route("/upload", post(artifacts::upload::<S>))
    .route("/files", get(artifacts::list::<S>))
    .route("/files/{id}", get(artifacts::get_one::<S>))
    .route("/analyze", post(reports::analyze::<S>))
    .route("/reports", get(reports::list::<S>))
    .route("/reports/{id}", get(reports::get_one::<S>))
    .route("/wordCloud/{id}", get(wordcloud::render::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// `GET /health`
async fn health() -> Json<Value> {
  Json(json!({ "status": "ok", "service": "doppel" }))
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use doppel_core::{
    artifact::NewArtifact,
    report::{AnalysisState, Report},
    request::AnalysisRequest,
  };
  use doppel_store_sqlite::SqliteStore;
  use tempfile::TempDir;
  use tower::ServiceExt as _;

  async fn make_state() -> (AppState<SqliteStore>, TempDir) {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let dir = TempDir::new().unwrap();
    let config = ServerConfig {
      uploads_dir: dir.path().to_path_buf(),
      ..ServerConfig::default()
    };

    let analyzer = Analyzer::new(Arc::clone(&store));
    let dispatcher = Dispatcher::spawn(analyzer.clone(), 2);
    let wordcloud =
      WordCloudClient::new(config.wordcloud_endpoint.clone()).unwrap();

    let state = AppState {
      store,
      analyzer,
      dispatcher,
      wordcloud,
      config: Arc::new(config),
    };
    (state, dir)
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    String,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body)).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_string(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  /// Assemble a multipart form the way a browser would.
  fn multipart_form(
    fields: &[(&str, &str)],
    file:   Option<(&str, &str)>,
  ) -> (String, String) {
    let boundary = "doppel-test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
      body.push_str(&format!(
        "--{boundary}\r\nContent-Disposition: form-data; \
         name=\"{name}\"\r\n\r\n{value}\r\n"
      ));
    }
    if let Some((filename, content)) = file {
      body.push_str(&format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
         filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n"
      ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    (format!("multipart/form-data; boundary={boundary}"), body)
  }

  /// Analysis is asynchronous after upload; poll until the reports land.
  async fn wait_for_reports(store: &SqliteStore, count: usize) -> Vec<Report> {
    use doppel_core::store::ReportStore as _;
    for _ in 0..250 {
      let reports = store.list_reports().await.unwrap();
      if reports.len() >= count {
        return reports;
      }
      tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("timed out waiting for {count} report(s)");
  }

  // ── Health ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_returns_ok() {
    let (state, _dir) = make_state().await;
    let resp = oneshot_raw(state, "GET", "/health", vec![], String::new()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("ok"), "body: {body}");
  }

  // ── Upload validation ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn upload_without_identifiers_returns_400() {
    let (state, _dir) = make_state().await;
    let (content_type, body) =
      multipart_form(&[], Some(("solution.py", "print(1)")));
    let resp = oneshot_raw(
      state,
      "POST",
      "/upload",
      vec![(header::CONTENT_TYPE, content_type.as_str())],
      body,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn upload_with_disallowed_extension_returns_415_and_stores_nothing() {
    let (state, _dir) = make_state().await;
    let store = Arc::clone(&state.store);
    let (content_type, body) = multipart_form(
      &[("student_id", "std_001"), ("assignment_id", "task-001")],
      Some(("thesis.pdf", "not text")),
    );
    let resp = oneshot_raw(
      state,
      "POST",
      "/upload",
      vec![(header::CONTENT_TYPE, content_type.as_str())],
      body,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    use doppel_core::store::CorpusStore as _;
    assert!(store.list_artifacts().await.unwrap().is_empty());
  }

  // ── Upload → dispatch → report pipeline ─────────────────────────────────────

  #[tokio::test]
  async fn upload_records_artifact_and_analysis_follows() {
    let (state, _dir) = make_state().await;
    let store = Arc::clone(&state.store);

    let (content_type, body) = multipart_form(
      &[("student_id", "std_001"), ("assignment_id", "task-001")],
      Some(("solution.py", "def add(a, b):\n    return a + b\n")),
    );
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/upload",
      vec![(header::CONTENT_TYPE, content_type.as_str())],
      body,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let first: serde_json::Value =
      serde_json::from_str(&body_string(resp).await).unwrap();
    let first_id = first["id"].as_i64().unwrap();
    assert_eq!(first["status"], "pending");

    // The uploader already got its response; the report arrives on its own.
    let reports = wait_for_reports(&store, 1).await;
    assert_eq!(reports[0].artifact_id, first_id);
    assert_eq!(reports[0].state, AnalysisState::Completed);
    assert_eq!(reports[0].score, 0.0);
    assert!(!reports[0].verdict);

    // A second student uploads the same solution; it gets flagged.
    let (content_type, body) = multipart_form(
      &[("student_id", "std_002"), ("assignment_id", "task-001")],
      Some(("solution.py", "def add(a, b):\n    return a + b\n")),
    );
    let resp = oneshot_raw(
      state,
      "POST",
      "/upload",
      vec![(header::CONTENT_TYPE, content_type.as_str())],
      body,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let reports = wait_for_reports(&store, 2).await;
    let flagged = &reports[1];
    assert_eq!(flagged.state, AnalysisState::Completed);
    assert_eq!(flagged.score, 1.0);
    assert!(flagged.verdict);
    assert_eq!(flagged.matched_artifact_id, Some(first_id));
  }

  // ── Synchronous analyze endpoint ────────────────────────────────────────────

  #[tokio::test]
  async fn analyze_endpoint_returns_the_persisted_report() {
    let (state, dir) = make_state().await;

    use doppel_core::store::CorpusStore as _;
    let path = dir.path().join("manual.py");
    tokio::fs::write(&path, "print('manual trigger')").await.unwrap();
    let artifact = state
      .store
      .add_artifact(NewArtifact {
        student_id:    "std_001".to_string(),
        assignment_id: "task-001".to_string(),
        file_path:     path,
      })
      .await
      .unwrap();

    let req = AnalysisRequest::from(&artifact);
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/analyze",
      vec![(header::CONTENT_TYPE, "application/json")],
      serde_json::to_string(&req).unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let report: Report =
      serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(report.artifact_id, artifact.id);
    assert_eq!(report.state, AnalysisState::Completed);

    use doppel_core::store::ReportStore as _;
    assert!(state.store.get_report(report.id).await.unwrap().is_some());
  }

  // ── Retrieval surfaces ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn files_list_starts_empty_and_missing_file_is_404() {
    let (state, _dir) = make_state().await;

    let resp =
      oneshot_raw(state.clone(), "GET", "/files", vec![], String::new()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "[]");

    let resp =
      oneshot_raw(state, "GET", "/files/7", vec![], String::new()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn missing_report_returns_404_with_json_error() {
    let (state, _dir) = make_state().await;
    let resp =
      oneshot_raw(state, "GET", "/reports/99", vec![], String::new()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_string(resp).await;
    assert!(body.contains("error"), "body: {body}");
  }

  #[tokio::test]
  async fn reports_list_is_empty_before_any_analysis() {
    let (state, _dir) = make_state().await;
    let resp = oneshot_raw(state, "GET", "/reports", vec![], String::new()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "[]");
  }

  #[tokio::test]
  async fn wordcloud_for_unknown_artifact_is_404() {
    let (state, _dir) = make_state().await;
    let resp =
      oneshot_raw(state, "GET", "/wordCloud/42", vec![], String::new()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
