//! Pass-through client for the external word-cloud renderer.
//!
//! The submission text is POSTed to the quickchart.io word-cloud API and
//! the resulting PNG comes back as an opaque byte stream; nothing is
//! parsed or cached on this side.

use std::time::Duration;

use bytes::Bytes;
use serde_json::json;

use crate::{Error, Result};

/// Default endpoint of the public quickchart.io renderer.
pub const DEFAULT_ENDPOINT: &str = "https://quickchart.io/wordcloud";

/// Async HTTP client for the word-cloud service.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct WordCloudClient {
  client:   reqwest::Client,
  endpoint: String,
}

impl WordCloudClient {
  pub fn new(endpoint: impl Into<String>) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, endpoint: endpoint.into() })
  }

  /// Render `text` as a PNG word cloud.
  pub async fn render(&self, text: &str) -> Result<Bytes> {
    let payload = json!({
      "format":          "png",
      "width":           1000,
      "height":          1000,
      "backgroundColor": "#2b2b2b",
      "fontScale":       20,
      "scale":           "sqrt",
      "removeStopwords": true,
      "minWordLength":   3,
      "text":            text,
    });

    let resp = self
      .client
      .post(&self.endpoint)
      .json(&payload)
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::WordCloudUnavailable(resp.status()));
    }
    Ok(resp.bytes().await?)
  }
}
