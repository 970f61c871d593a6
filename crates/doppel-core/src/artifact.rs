//! Artifact — a single submitted file in the corpus.
//!
//! An artifact holds only catalog metadata; the submission text itself lives
//! on disk at `file_path`. Rows are created once at ingestion and never
//! mutated or deleted afterwards.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned artifact identity.
pub type ArtifactId = i64;

/// File extensions eligible for analysis. Anything else is stored but
/// skipped at analysis time.
pub const ALLOWED_EXTENSIONS: &[&str] =
  &["txt", "go", "py", "js", "java", "cpp", "c", "h", "ts", "md"];

/// Whether `ext` (without the leading dot) is in the allowed set.
/// The comparison is exact; callers decide whether to lowercase first.
pub fn extension_allowed(ext: &str) -> bool {
  ALLOWED_EXTENSIONS.contains(&ext)
}

/// Lifecycle status of an artifact in the corpus.
///
/// Artifacts are created `Pending`. No later transition is currently
/// defined; a completed analysis leaves the artifact untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
  #[default]
  Pending,
}

/// A catalogued submission. The id, upload timestamp, and status are
/// assigned by the store on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
  pub id:            ArtifactId,
  pub student_id:    String,
  pub assignment_id: String,
  pub file_path:     PathBuf,
  pub uploaded_at:   DateTime<Utc>,
  pub status:        ArtifactStatus,
}

/// Input for [`crate::store::CorpusStore::add_artifact`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArtifact {
  pub student_id:    String,
  pub assignment_id: String,
  pub file_path:     PathBuf,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn allowed_extensions_are_exact_matches() {
    assert!(extension_allowed("py"));
    assert!(extension_allowed("txt"));
    assert!(extension_allowed("h"));
    assert!(!extension_allowed("pdf"));
    assert!(!extension_allowed("PY"));
    assert!(!extension_allowed(".py"));
    assert!(!extension_allowed(""));
  }
}
