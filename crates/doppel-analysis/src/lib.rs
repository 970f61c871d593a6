//! The doppel analysis pipeline.
//!
//! [`Analyzer`] runs one comparison scan end to end: validate the
//! submission, read it, score it against every prior submission from other
//! students, and persist exactly one report. [`Dispatcher`] is the
//! fire-and-forget hand-off used after ingestion: an in-process queue
//! drained by a fixed pool of workers, so the uploader never waits on (or
//! hears about) analysis.

pub mod analyzer;
pub mod dispatch;
pub mod error;
pub mod wordcloud;

pub use analyzer::Analyzer;
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use wordcloud::WordCloudClient;
