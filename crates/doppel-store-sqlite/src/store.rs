//! [`SqliteStore`] — the SQLite implementation of the corpus and report
//! catalogs.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use doppel_core::{
  artifact::{Artifact, ArtifactId, ArtifactStatus, NewArtifact},
  report::{NewReport, Report, ReportId},
  store::{CorpusStore, ReportStore},
};

use crate::{
  encode::{encode_dt, encode_state, encode_status, RawArtifact, RawReport},
  schema::SCHEMA,
  Error, Result,
};

const ARTIFACT_COLUMNS: &str =
  "id, student_id, assignment_id, file_path, uploaded_at, status";
const REPORT_COLUMNS: &str =
  "id, artifact_id, score, verdict, matched_artifact_id, state, detail, created_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// Both doppel catalogs backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Individual
/// statements are atomic via SQLite itself; no multi-statement transaction
/// is taken around a corpus scan, so concurrent analysis runs interleave
/// freely.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  fn artifact_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawArtifact> {
    Ok(RawArtifact {
      id:            row.get(0)?,
      student_id:    row.get(1)?,
      assignment_id: row.get(2)?,
      file_path:     row.get(3)?,
      uploaded_at:   row.get(4)?,
      status:        row.get(5)?,
    })
  }

  fn report_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawReport> {
    Ok(RawReport {
      id:                  row.get(0)?,
      artifact_id:         row.get(1)?,
      score:               row.get(2)?,
      verdict:             row.get(3)?,
      matched_artifact_id: row.get(4)?,
      state:               row.get(5)?,
      detail:              row.get(6)?,
      created_at:          row.get(7)?,
    })
  }
}

// ─── CorpusStore impl ────────────────────────────────────────────────────────

impl CorpusStore for SqliteStore {
  type Error = Error;

  async fn add_artifact(&self, input: NewArtifact) -> Result<Artifact> {
    let uploaded_at = Utc::now();
    let status      = ArtifactStatus::Pending;

    let student_id_param    = input.student_id.clone();
    let assignment_id_param = input.assignment_id.clone();
    let file_path_param     = input.file_path.to_string_lossy().into_owned();
    let uploaded_at_param   = encode_dt(uploaded_at);
    let status_param        = encode_status(status).to_owned();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO artifacts (student_id, assignment_id, file_path, uploaded_at, status)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            student_id_param,
            assignment_id_param,
            file_path_param,
            uploaded_at_param,
            status_param,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Artifact {
      id,
      student_id: input.student_id,
      assignment_id: input.assignment_id,
      file_path: input.file_path,
      uploaded_at,
      status,
    })
  }

  async fn get_artifact(&self, id: ArtifactId) -> Result<Option<Artifact>> {
    let raw: Option<RawArtifact> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ARTIFACT_COLUMNS} FROM artifacts WHERE id = ?1"),
            rusqlite::params![id],
            Self::artifact_from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawArtifact::into_artifact).transpose()
  }

  async fn list_artifacts(&self) -> Result<Vec<Artifact>> {
    let raws: Vec<RawArtifact> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ARTIFACT_COLUMNS} FROM artifacts ORDER BY id ASC"
        ))?;
        let rows = stmt
          .query_map([], Self::artifact_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawArtifact::into_artifact).collect()
  }

  async fn list_candidates(
    &self,
    subject_id: ArtifactId,
    student_id: &str,
  ) -> Result<Vec<Artifact>> {
    let student_id_param = student_id.to_owned();

    let raws: Vec<RawArtifact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ARTIFACT_COLUMNS} FROM artifacts
           WHERE id != ?1 AND student_id != ?2
           ORDER BY id ASC"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![subject_id, student_id_param],
            Self::artifact_from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawArtifact::into_artifact).collect()
  }
}

// ─── ReportStore impl ────────────────────────────────────────────────────────

impl ReportStore for SqliteStore {
  type Error = Error;

  async fn save_report(&self, input: NewReport) -> Result<Report> {
    let created_at = Utc::now();

    let artifact_id_param = input.artifact_id;
    let score_param       = input.score;
    let verdict_param     = input.verdict;
    let matched_param     = input.matched_artifact_id;
    let state_param       = encode_state(input.state).to_owned();
    let detail_param      = input.detail.clone();
    let created_at_param  = encode_dt(created_at);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO reports (
             artifact_id, score, verdict, matched_artifact_id,
             state, detail, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            artifact_id_param,
            score_param,
            verdict_param,
            matched_param,
            state_param,
            detail_param,
            created_at_param,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Report {
      id,
      artifact_id: input.artifact_id,
      score: input.score,
      verdict: input.verdict,
      matched_artifact_id: input.matched_artifact_id,
      state: input.state,
      detail: input.detail,
      created_at,
    })
  }

  async fn get_report(&self, id: ReportId) -> Result<Option<Report>> {
    let raw: Option<RawReport> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1"),
            rusqlite::params![id],
            Self::report_from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawReport::into_report).transpose()
  }

  async fn list_reports(&self) -> Result<Vec<Report>> {
    let raws: Vec<RawReport> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REPORT_COLUMNS} FROM reports ORDER BY id ASC"
        ))?;
        let rows = stmt
          .query_map([], Self::report_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReport::into_report).collect()
  }
}
