//! The `CorpusStore` and `ReportStore` traits.
//!
//! Both are implemented by storage backends (e.g. `doppel-store-sqlite`).
//! Higher layers (`doppel-analysis`, `doppel-server`) depend on these
//! abstractions, not on any concrete backend. Keeping the two catalogs
//! behind separate narrow traits scopes concurrent scans and writes to an
//! auditable surface even though no cross-statement transaction is taken.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  artifact::{Artifact, ArtifactId, NewArtifact},
  report::{NewReport, Report, ReportId},
};

// ─── Corpus ──────────────────────────────────────────────────────────────────

/// Catalog of submitted artifacts.
///
/// Writes are insert-only: artifacts are never updated or deleted.
pub trait CorpusStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new artifact and return it with its assigned id, upload
  /// timestamp, and `pending` status. The row is durable before this
  /// returns.
  fn add_artifact(
    &self,
    input: NewArtifact,
  ) -> impl Future<Output = Result<Artifact, Self::Error>> + Send + '_;

  /// Retrieve an artifact by id. Returns `None` if not found.
  fn get_artifact(
    &self,
    id: ArtifactId,
  ) -> impl Future<Output = Result<Option<Artifact>, Self::Error>> + Send + '_;

  /// List all artifacts in id order.
  fn list_artifacts(
    &self,
  ) -> impl Future<Output = Result<Vec<Artifact>, Self::Error>> + Send + '_;

  /// List the artifacts comparable to a subject: every artifact with a
  /// different id and a different owner, in ascending id order so that
  /// tie-breaking during the scan is deterministic.
  fn list_candidates<'a>(
    &'a self,
    subject_id: ArtifactId,
    student_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Artifact>, Self::Error>> + Send + 'a;
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Catalog of analysis outcomes.
///
/// Writes are insert-only. One artifact may accumulate several reports if
/// analysis is triggered more than once; nothing deduplicates them.
pub trait ReportStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new report and return it with its assigned id and creation
  /// timestamp. Ids increase monotonically; the row is durable before this
  /// returns.
  fn save_report(
    &self,
    input: NewReport,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + '_;

  /// Retrieve a report by id. Returns `None` if not found — distinct from
  /// an `Err`, which signals the storage layer itself failed.
  fn get_report(
    &self,
    id: ReportId,
  ) -> impl Future<Output = Result<Option<Report>, Self::Error>> + Send + '_;

  /// List all reports in insertion order.
  fn list_reports(
    &self,
  ) -> impl Future<Output = Result<Vec<Report>, Self::Error>> + Send + '_;
}
