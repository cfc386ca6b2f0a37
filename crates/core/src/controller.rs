//! The classification controller.
//!
//! Owns the [`Workflow`] and executes the commands it emits. Requests run on
//! a background thread with their own single-threaded tokio runtime; results
//! come back through a channel and are applied when the host calls
//! [`ClassificationController::poll`] or [`ClassificationController::wait`].
//! All state changes therefore happen on the host's thread, one at a time.

use crate::error::{AppError, Result};
use crate::prediction::PredictionResult;
use crate::selection::SelectedImage;
use crate::service::PredictionService;
use crate::view::View;
use crate::workflow::{Command, Event, Phase, RequestToken, Workflow, WorkflowState};
use std::mem;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A finished request, as reported by the background thread.
#[derive(Debug)]
struct Completion {
    token: RequestToken,
    outcome: Result<Vec<PredictionResult>>,
}

pub struct ClassificationController {
    workflow: Workflow,
    service: Arc<dyn PredictionService>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl ClassificationController {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        let (tx, rx) = channel();
        Self {
            workflow: Workflow::new(),
            service,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.workflow.state()
    }

    pub fn phase(&self) -> &Phase {
        self.workflow.phase()
    }

    pub fn view(&self) -> View {
        View::from_phase(self.workflow.phase())
    }

    /// Replaces the current image, discarding results, error, and any
    /// in-flight request's eventual answer.
    pub fn select(&mut self, image: SelectedImage) {
        self.apply(Event::Selected(image));
    }

    /// Starts classification of the selected image.
    ///
    /// Returns `true` when a request was dispatched. Without an image this
    /// fails locally; while a request is in flight it does nothing.
    pub fn classify(&mut self) -> bool {
        if self.state() == WorkflowState::Submitting {
            debug!("classify ignored: a request is already in flight");
        }
        match self.apply(Event::ClassifyRequested) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    /// Discards the image, preview, results, and error.
    pub fn clear(&mut self) {
        self.apply(Event::Cleared);
    }

    /// Applies every completion that has arrived. Never blocks.
    ///
    /// Returns the number of completions processed, stale ones included.
    pub fn poll(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.complete(completion);
            processed += 1;
        }
        processed
    }

    /// Blocks until one completion arrives or `timeout` elapses.
    ///
    /// Returns `false` on timeout.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => {
                self.complete(completion);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            // unreachable while self.tx is alive
            Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    fn complete(&mut self, completion: Completion) {
        let Completion { token, outcome } = completion;

        if !self.workflow.is_current(token) {
            warn!(%token, "discarding stale classification response");
        } else {
            match &outcome {
                Ok(results) => info!(%token, count = results.len(), "classification succeeded"),
                Err(e) => warn!(%token, error = %e, "classification failed"),
            }
        }

        self.apply(Event::Completed { token, outcome });
    }

    fn apply(&mut self, event: Event) -> Option<Command> {
        let from = self.workflow.state();
        let (next, command) = mem::take(&mut self.workflow).transition(event);
        self.workflow = next;
        debug!(%from, to = %self.workflow.state(), "workflow transition");
        command
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Submit { token, upload } => {
                info!(%token, file = %upload.file_name, "dispatching classification request");
                let request = self.service.predict(upload);
                let tx = self.tx.clone();

                // Spawn background thread for async work
                let spawned = thread::Builder::new()
                    .name(format!("classify-{}", token))
                    .spawn(move || {
                        let outcome = match tokio::runtime::Builder::new_current_thread()
                            .enable_all()
                            .build()
                        {
                            Ok(rt) => rt.block_on(request),
                            Err(e) => Err(AppError::Io(e)),
                        };
                        // receiver gone means the controller was dropped
                        let _ = tx.send(Completion { token, outcome });
                    });

                if let Err(e) = spawned {
                    self.complete(Completion {
                        token,
                        outcome: Err(AppError::Io(e)),
                    });
                }
            }
        }
    }
}
