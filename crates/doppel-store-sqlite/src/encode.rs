//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, enum discriminants as their
//! lowercase names, and file paths as UTF-8 strings.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use doppel_core::{
  artifact::{Artifact, ArtifactStatus},
  report::{AnalysisState, Report},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ArtifactStatus ──────────────────────────────────────────────────────────

pub fn encode_status(s: ArtifactStatus) -> &'static str {
  match s {
    ArtifactStatus::Pending => "pending",
  }
}

pub fn decode_status(s: &str) -> Result<ArtifactStatus> {
  match s {
    "pending" => Ok(ArtifactStatus::Pending),
    other => Err(Error::UnknownStatus(other.to_string())),
  }
}

// ─── AnalysisState ───────────────────────────────────────────────────────────

pub fn encode_state(s: AnalysisState) -> &'static str {
  match s {
    AnalysisState::Completed => "completed",
    AnalysisState::Skipped => "skipped",
    AnalysisState::Error => "error",
  }
}

pub fn decode_state(s: &str) -> Result<AnalysisState> {
  match s {
    "completed" => Ok(AnalysisState::Completed),
    "skipped" => Ok(AnalysisState::Skipped),
    "error" => Ok(AnalysisState::Error),
    other => Err(Error::UnknownState(other.to_string())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `artifacts` row.
pub struct RawArtifact {
  pub id:            i64,
  pub student_id:    String,
  pub assignment_id: String,
  pub file_path:     String,
  pub uploaded_at:   String,
  pub status:        String,
}

impl RawArtifact {
  pub fn into_artifact(self) -> Result<Artifact> {
    Ok(Artifact {
      id:            self.id,
      student_id:    self.student_id,
      assignment_id: self.assignment_id,
      file_path:     PathBuf::from(self.file_path),
      uploaded_at:   decode_dt(&self.uploaded_at)?,
      status:        decode_status(&self.status)?,
    })
  }
}

/// Raw values read directly from a `reports` row.
pub struct RawReport {
  pub id:                  i64,
  pub artifact_id:         i64,
  pub score:               f64,
  pub verdict:             bool,
  pub matched_artifact_id: Option<i64>,
  pub state:               String,
  pub detail:              String,
  pub created_at:          String,
}

impl RawReport {
  pub fn into_report(self) -> Result<Report> {
    Ok(Report {
      id:                  self.id,
      artifact_id:         self.artifact_id,
      score:               self.score,
      verdict:             self.verdict,
      matched_artifact_id: self.matched_artifact_id,
      state:               decode_state(&self.state)?,
      detail:              self.detail,
      created_at:          decode_dt(&self.created_at)?,
    })
  }
}
