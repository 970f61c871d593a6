//! Handlers for ingestion and artifact lookup.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/upload` | Multipart: `student_id`, `assignment_id`, `file` |
//! | `GET`  | `/files` | All artifacts, id order |
//! | `GET`  | `/files/:id` | 404 if not found |

use std::path::Path as FsPath;

use axum::{
  Json,
  extract::{Multipart, Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use chrono::Utc;
use doppel_core::{
  artifact::{extension_allowed, Artifact, ArtifactId, NewArtifact, ALLOWED_EXTENSIONS},
  request::AnalysisRequest,
  store::{CorpusStore, ReportStore},
};

use crate::{AppState, error::ApiError};

// ─── Upload ───────────────────────────────────────────────────────────────────

/// `POST /upload`
///
/// Records the submission durably, answers the uploader, and hands the
/// artifact to the dispatcher. Whatever happens to the analysis afterwards
/// never reaches this response.
pub async fn upload<S>(
  State(state): State<AppState<S>>,
  mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
  S: CorpusStore + ReportStore + Send + Sync + 'static,
{
  let mut student_id: Option<String> = None;
  let mut assignment_id: Option<String> = None;
  let mut file: Option<(String, Bytes)> = None;

  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(format!("malformed multipart form: {e}")))?
  {
    let name = field.name().map(str::to_owned);
    match name.as_deref() {
      Some("student_id") => {
        student_id = Some(field.text().await.map_err(|e| {
          ApiError::BadRequest(format!("unreadable student_id field: {e}"))
        })?);
      }
      Some("assignment_id") => {
        assignment_id = Some(field.text().await.map_err(|e| {
          ApiError::BadRequest(format!("unreadable assignment_id field: {e}"))
        })?);
      }
      Some("file") => {
        let filename = field
          .file_name()
          .map(str::to_owned)
          .ok_or_else(|| ApiError::BadRequest("file field has no filename".to_string()))?;
        let content = field.bytes().await.map_err(|e| {
          ApiError::BadRequest(format!("unreadable file field: {e}"))
        })?;
        file = Some((filename, content));
      }
      _ => {}
    }
  }

  let student_id = student_id
    .filter(|s| !s.is_empty())
    .ok_or_else(|| ApiError::BadRequest("student_id is required".to_string()))?;
  let assignment_id = assignment_id
    .filter(|s| !s.is_empty())
    .ok_or_else(|| ApiError::BadRequest("assignment_id is required".to_string()))?;
  let (filename, content) = file
    .ok_or_else(|| ApiError::BadRequest("no file in request".to_string()))?;

  // Upload is lenient about extension case; the stored name keeps it
  // verbatim and analysis matches it as stored.
  let ext = FsPath::new(&filename)
    .extension()
    .and_then(|e| e.to_str())
    .unwrap_or("");
  if !extension_allowed(&ext.to_lowercase()) {
    return Err(ApiError::UnsupportedMedia(format!(
      "extension {ext:?} is not supported; allowed: {}",
      ALLOWED_EXTENSIONS.join(", ")
    )));
  }

  let stored_name = format!(
    "work_{student_id}_{assignment_id}_{}.{ext}",
    Utc::now().timestamp()
  );
  let path = state.config.uploads_dir.join(stored_name);

  tokio::fs::create_dir_all(&state.config.uploads_dir).await?;
  tokio::fs::write(&path, &content).await?;
  tracing::info!(student = %student_id, path = %path.display(), "submission stored");

  let artifact = state
    .store
    .add_artifact(NewArtifact {
      student_id,
      assignment_id,
      file_path: path,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  // The artifact row is durable; analysis proceeds without the uploader.
  state.dispatcher.dispatch(AnalysisRequest::from(&artifact));

  Ok((StatusCode::CREATED, Json(artifact)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /files`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Artifact>>, ApiError>
where
  S: CorpusStore + ReportStore + Send + Sync + 'static,
{
  let artifacts = state
    .store
    .list_artifacts()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(artifacts))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /files/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<ArtifactId>,
) -> Result<Json<Artifact>, ApiError>
where
  S: CorpusStore + ReportStore + Send + Sync + 'static,
{
  let artifact = state
    .store
    .get_artifact(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("artifact {id} not found")))?;
  Ok(Json(artifact))
}
