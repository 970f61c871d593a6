//! Handler for the word-cloud pass-through.

use axum::{
  extract::{Path, State},
  http::header,
  response::IntoResponse,
};
use doppel_core::{
  artifact::ArtifactId,
  store::{CorpusStore, ReportStore},
};

use crate::{AppState, error::ApiError};

/// `GET /wordCloud/:id`
///
/// Reads the artifact's content and streams back the externally rendered
/// PNG unchanged.
pub async fn render<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<ArtifactId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CorpusStore + ReportStore + Send + Sync + 'static,
{
  let artifact = state
    .store
    .get_artifact(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("artifact {id} not found")))?;

  let text = tokio::fs::read_to_string(&artifact.file_path).await?;
  let png = state.wordcloud.render(&text).await?;

  Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
