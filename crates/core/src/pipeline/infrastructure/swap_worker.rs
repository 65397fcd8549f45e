use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, TryRecvError};

use crate::pipeline::swap_error::SwapError;
use crate::pipeline::swap_faces_use_case::{SwapFacesUseCase, SwapRequest, SwapResult};

/// The single message a swap worker sends when its run ends.
#[derive(Debug)]
pub enum SwapOutcome {
    Complete(SwapResult),
    Failed(SwapError),
}

impl SwapOutcome {
    pub fn into_result(self) -> Result<SwapResult, SwapError> {
        match self {
            SwapOutcome::Complete(result) => Ok(result),
            SwapOutcome::Failed(e) => Err(e),
        }
    }
}

impl From<Result<SwapResult, SwapError>> for SwapOutcome {
    fn from(result: Result<SwapResult, SwapError>) -> Self {
        match result {
            Ok(r) => SwapOutcome::Complete(r),
            Err(e) => SwapOutcome::Failed(e),
        }
    }
}

/// Receiving end of a running swap.
///
/// The use case travels with the thread and is handed back once the run has
/// delivered its outcome, so a host can reuse the loaded detector.
pub struct SwapHandle {
    rx: Receiver<SwapOutcome>,
    thread: JoinHandle<SwapFacesUseCase>,
}

/// Runs `request` on a background thread.
///
/// There is no cancellation; the run always ends in exactly one
/// [`SwapOutcome`].
pub fn spawn(mut use_case: SwapFacesUseCase, request: SwapRequest) -> SwapHandle {
    let (tx, rx) = crossbeam_channel::bounded::<SwapOutcome>(1);

    let thread = thread::spawn(move || {
        log::info!(
            "Swap worker started: {} -> {}",
            request.source_path.display(),
            request.target_path.display()
        );
        let outcome = SwapOutcome::from(use_case.execute(&request));
        if let SwapOutcome::Failed(e) = &outcome {
            log::warn!("Swap failed: {e}");
        }
        let _ = tx.send(outcome);
        use_case
    });

    SwapHandle { rx, thread }
}

impl SwapHandle {
    /// Blocks until the run ends.
    pub fn wait(&self) -> SwapOutcome {
        self.rx.recv().unwrap_or_else(|_| {
            SwapOutcome::Failed(SwapError::InvalidState(
                "swap worker exited without reporting".to_string(),
            ))
        })
    }

    /// Polls without blocking; `None` while the run is still in flight.
    pub fn try_outcome(&self) -> Option<SwapOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(SwapOutcome::Failed(SwapError::InvalidState(
                "swap worker exited without reporting".to_string(),
            ))),
        }
    }

    /// Joins the worker and returns its use case. `None` if the worker panicked.
    pub fn into_use_case(self) -> Option<SwapFacesUseCase> {
        self.thread.join().ok()
    }
}
