//! [`Analyzer`] — the analysis orchestrator.

use std::sync::Arc;

use doppel_core::{
  artifact::{extension_allowed, ArtifactId, ALLOWED_EXTENSIONS},
  report::{AnalysisState, NewReport, Report, PLAGIARISM_THRESHOLD},
  request::AnalysisRequest,
  similarity,
  store::{CorpusStore, ReportStore},
};

use crate::{Error, Result};

/// Runs one comparison scan per invocation and writes exactly one report,
/// synchronously, before returning.
///
/// Cloning is cheap — the store handle is reference-counted. Nothing here
/// serialises concurrent runs: two invocations for the same artifact both
/// complete and each appends its own report.
pub struct Analyzer<S> {
  store: Arc<S>,
}

impl<S> Clone for Analyzer<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store) }
  }
}

impl<S> Analyzer<S>
where
  S: CorpusStore + ReportStore + Send + Sync,
{
  pub fn new(store: Arc<S>) -> Self {
    Self { store }
  }

  /// Analyse one submission against the rest of the corpus.
  ///
  /// Always persists and returns a [`Report`] — `skipped` for a disallowed
  /// extension, `error` when the submission itself cannot be read,
  /// `completed` otherwise. The only `Err` outcome is the report store
  /// failing to persist, in which case no report exists at all.
  pub async fn analyze(&self, req: &AnalysisRequest) -> Result<Report> {
    // The extension is matched as stored; upload normalises case, a manual
    // trigger does not get that leniency.
    let ext = req
      .file_path
      .extension()
      .and_then(|e| e.to_str())
      .unwrap_or("");
    if !extension_allowed(ext) {
      tracing::info!(
        artifact = req.artifact_id,
        extension = ext,
        "skipping analysis: unsupported extension"
      );
      return self
        .persist(NewReport {
          artifact_id:         req.artifact_id,
          score:               0.0,
          verdict:             false,
          matched_artifact_id: None,
          state:               AnalysisState::Skipped,
          detail:              format!(
            "extension {ext:?} is not supported; allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
          ),
        })
        .await;
    }

    let subject_text = match tokio::fs::read_to_string(&req.file_path).await {
      Ok(text) => text,
      Err(e) => {
        tracing::error!(
          artifact = req.artifact_id,
          path = %req.file_path.display(),
          error = %e,
          "cannot read submission"
        );
        return self
          .persist(NewReport {
            artifact_id:         req.artifact_id,
            score:               0.0,
            verdict:             false,
            matched_artifact_id: None,
            state:               AnalysisState::Error,
            detail:              format!(
              "could not read submission at {}",
              req.file_path.display()
            ),
          })
          .await;
      }
    };

    let (score, matched) = self
      .best_match(req.artifact_id, &req.student_id, &subject_text)
      .await;
    let verdict = score > PLAGIARISM_THRESHOLD;

    let detail = match matched {
      Some(id) => format!("{:.2}% overlap with artifact {id}", score * 100.0),
      None => "no overlap with any prior artifact".to_string(),
    };
    tracing::info!(
      artifact = req.artifact_id,
      score,
      verdict,
      matched = ?matched,
      "analysis completed"
    );

    self
      .persist(NewReport {
        artifact_id: req.artifact_id,
        score,
        verdict,
        matched_artifact_id: matched,
        state: AnalysisState::Completed,
        detail,
      })
      .await
  }

  /// Scan every comparable prior artifact and return the best score with
  /// the id of the first candidate attaining it.
  ///
  /// Candidates arrive in ascending id order and the running maximum is
  /// replaced only on a strictly greater score, so ties keep the
  /// earliest-encountered candidate. Candidates whose content cannot be
  /// read only shrink the candidate set.
  async fn best_match(
    &self,
    subject_id: ArtifactId,
    student_id: &str,
    subject_text: &str,
  ) -> (f64, Option<ArtifactId>) {
    let candidates = match self.store.list_candidates(subject_id, student_id).await {
      Ok(candidates) => candidates,
      Err(e) => {
        tracing::error!(
          artifact = subject_id,
          error = %e,
          "corpus query failed; scoring against an empty candidate set"
        );
        Vec::new()
      }
    };

    let mut best_score = 0.0_f64;
    let mut matched: Option<ArtifactId> = None;

    for candidate in &candidates {
      let candidate_text =
        match tokio::fs::read_to_string(&candidate.file_path).await {
          Ok(text) => text,
          Err(e) => {
            tracing::warn!(
              candidate = candidate.id,
              path = %candidate.file_path.display(),
              error = %e,
              "skipping unreadable candidate"
            );
            continue;
          }
        };

      let score = similarity::score(subject_text, &candidate_text);
      tracing::debug!(candidate = candidate.id, score, "compared");

      if score > best_score {
        best_score = score;
        matched = Some(candidate.id);
      }
    }

    (best_score, matched)
  }

  async fn persist(&self, report: NewReport) -> Result<Report> {
    self
      .store
      .save_report(report)
      .await
      .map_err(|e| Error::Store(Box::new(e)))
  }
}
