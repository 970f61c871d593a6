//! [`Dispatcher`] — the fire-and-forget hand-off from ingestion to analysis.
//!
//! Uploads must never wait on a corpus scan, so the ingestion handler pushes
//! an [`AnalysisRequest`] onto an in-process queue and returns immediately.
//! A fixed pool of workers drains the queue, running each request through
//! the [`Analyzer`] to completion. There is no retry, no cancellation, and
//! no per-artifact exclusivity: dispatching the same artifact twice runs two
//! scans and appends two reports.

use std::sync::Arc;

use doppel_core::{
  request::AnalysisRequest,
  store::{CorpusStore, ReportStore},
};
use tokio::sync::{mpsc, Mutex};

use crate::Analyzer;

/// Sending half of the analysis queue. Cloning is cheap.
#[derive(Clone)]
pub struct Dispatcher {
  tx: mpsc::UnboundedSender<AnalysisRequest>,
}

impl Dispatcher {
  /// Start `workers` consumer tasks draining a fresh queue into `analyzer`.
  ///
  /// The workers run for the life of the process; the queue is unbounded,
  /// so dispatch never applies backpressure to uploads.
  pub fn spawn<S>(analyzer: Analyzer<S>, workers: usize) -> Self
  where
    S: CorpusStore + ReportStore + Send + Sync + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel::<AnalysisRequest>();
    let rx = Arc::new(Mutex::new(rx));

    for worker in 0..workers.max(1) {
      let rx = Arc::clone(&rx);
      let analyzer = analyzer.clone();
      tokio::spawn(async move {
        loop {
          // Hold the lock only while waiting for the next request, not
          // while analysing it, so the rest of the pool keeps draining.
          let req = rx.lock().await.recv().await;
          let Some(req) = req else { break };

          tracing::debug!(
            worker,
            artifact = req.artifact_id,
            "analysis picked up"
          );
          if let Err(e) = analyzer.analyze(&req).await {
            tracing::error!(
              worker,
              artifact = req.artifact_id,
              error = %e,
              "analysis run failed"
            );
          }
        }
      });
    }

    Self { tx }
  }

  /// Enqueue a request and return immediately.
  ///
  /// A failed send means the worker pool is gone; that is logged and
  /// swallowed — trigger failures never reach the uploader and never roll
  /// back the stored artifact.
  pub fn dispatch(&self, req: AnalysisRequest) {
    let artifact = req.artifact_id;
    if self.tx.send(req).is_err() {
      tracing::error!(artifact, "analysis queue is closed; dropping trigger");
    } else {
      tracing::info!(artifact, "analysis dispatched");
    }
  }
}
