//! Report — the persisted outcome of one analysis run.
//!
//! Reports are append-only. Re-running analysis for an artifact appends a
//! second report rather than replacing the first; `artifact_id` is therefore
//! not unique across rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactId;

/// Store-assigned report identity.
pub type ReportId = i64;

/// Similarity scores strictly above this threshold flip the verdict.
pub const PLAGIARISM_THRESHOLD: f64 = 0.5;

/// How an analysis run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisState {
  /// The corpus scan ran to completion.
  Completed,
  /// The submission's extension is not eligible for analysis.
  Skipped,
  /// The submission itself could not be read.
  Error,
}

/// The persisted outcome of one analysis run for one artifact.
///
/// `matched_artifact_id` is `Some` only for `Completed` reports where at
/// least one candidate scored above zero; `verdict` always equals
/// `score > PLAGIARISM_THRESHOLD`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
  pub id:                  ReportId,
  pub artifact_id:         ArtifactId,
  pub score:               f64,
  pub verdict:             bool,
  pub matched_artifact_id: Option<ArtifactId>,
  pub state:               AnalysisState,
  pub detail:              String,
  pub created_at:          DateTime<Utc>,
}

/// Input for [`crate::store::ReportStore::save_report`]. The id and
/// creation timestamp are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReport {
  pub artifact_id:         ArtifactId,
  pub score:               f64,
  pub verdict:             bool,
  pub matched_artifact_id: Option<ArtifactId>,
  pub state:               AnalysisState,
  pub detail:              String,
}
