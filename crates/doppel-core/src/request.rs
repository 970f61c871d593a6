//! The record handed from the ingestion boundary to the analysis pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::artifact::{Artifact, ArtifactId};

/// Everything the analysis pipeline needs to know about a freshly stored
/// submission. Deliberately minimal: the trigger carries no other context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
  pub artifact_id:   ArtifactId,
  pub file_path:     PathBuf,
  pub student_id:    String,
  pub assignment_id: String,
}

impl From<&Artifact> for AnalysisRequest {
  fn from(artifact: &Artifact) -> Self {
    Self {
      artifact_id:   artifact.id,
      file_path:     artifact.file_path.clone(),
      student_id:    artifact.student_id.clone(),
      assignment_id: artifact.assignment_id.clone(),
    }
  }
}
