//! Handlers for the analysis trigger and report retrieval.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/analyze` | Body: an analysis request; runs synchronously |
//! | `GET`  | `/reports` | All reports, insertion order |
//! | `GET`  | `/reports/:id` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
};
use doppel_core::{
  report::{Report, ReportId},
  request::AnalysisRequest,
  store::{CorpusStore, ReportStore},
};

use crate::{AppState, error::ApiError};

// ─── Analyze ──────────────────────────────────────────────────────────────────

/// `POST /analyze`
///
/// Runs one full comparison scan and returns the persisted report. The
/// dispatcher uses the same orchestrator; this endpoint just exposes it for
/// manual or cross-service triggering.
pub async fn analyze<S>(
  State(state): State<AppState<S>>,
  Json(req): Json<AnalysisRequest>,
) -> Result<Json<Report>, ApiError>
where
  S: CorpusStore + ReportStore + Send + Sync + 'static,
{
  let report = state.analyzer.analyze(&req).await?;
  Ok(Json(report))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /reports`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Report>>, ApiError>
where
  S: CorpusStore + ReportStore + Send + Sync + 'static,
{
  let reports = state
    .store
    .list_reports()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(reports))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /reports/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<ReportId>,
) -> Result<Json<Report>, ApiError>
where
  S: CorpusStore + ReportStore + Send + Sync + 'static,
{
  let report = state
    .store
    .get_report(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("report {id} not found")))?;
  Ok(Json(report))
}
