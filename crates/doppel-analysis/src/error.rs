//! Error type for `doppel-analysis`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The report store could not persist the outcome. This is the only
  /// failure [`crate::Analyzer::analyze`] surfaces as an `Err`; every
  /// other problem is recorded inside the report itself.
  #[error("report could not be persisted: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("word cloud request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("word cloud service responded with {0}")]
  WordCloudUnavailable(reqwest::StatusCode),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
