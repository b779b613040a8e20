use crate::event::AppEvent;
use crate::session::AnalysisRequest;
use crate::store::AnalysisLookup;
use std::sync::{mpsc, Arc};
use tokio::runtime::Handle;
use tokio::time::{self, Duration};
use tracing::debug;

/// Fixed reveal delay. Stands in for the latency of a real analysis backend;
/// the lookup itself is instantaneous.
pub const REVEAL_DELAY: Duration = Duration::from_millis(1500);

/// Simulated root-cause analysis service. Each request runs as a background
/// task that waits out the reveal delay and then reports the canned result
/// for the requested id over the app event channel. Requests are never
/// cancelled; a superseded result is discarded by the session's generation
/// check when it arrives.
#[derive(Clone)]
pub struct AnalysisEngine {
    lookup: Arc<AnalysisLookup>,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
    delay: Duration,
}

impl AnalysisEngine {
    pub fn new(lookup: AnalysisLookup, tx: mpsc::Sender<AppEvent>, runtime_handle: Handle) -> Self {
        Self::with_delay(lookup, tx, runtime_handle, REVEAL_DELAY)
    }

    pub fn with_delay(
        lookup: AnalysisLookup,
        tx: mpsc::Sender<AppEvent>,
        runtime_handle: Handle,
        delay: Duration,
    ) -> Self {
        Self {
            lookup: Arc::new(lookup),
            tx,
            runtime_handle,
            delay,
        }
    }

    pub fn request(&self, request: AnalysisRequest) {
        debug!(
            error_id = request.error_id,
            generation = request.generation,
            "analysis requested"
        );
        let lookup = Arc::clone(&self.lookup);
        let tx = self.tx.clone();
        let delay = self.delay;

        self.runtime_handle.spawn(async move {
            time::sleep(delay).await;
            let analysis = lookup.get(request.error_id).cloned();
            if analysis.is_none() {
                debug!(error_id = request.error_id, "no analysis entry for id");
            }
            let _ = tx.send(AppEvent::AnalysisReady {
                generation: request.generation,
                error_id: request.error_id,
                analysis,
            });
        });
    }
}
