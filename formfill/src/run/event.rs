//! Run progress events.
//!
//! The controller publishes structured events instead of writing to a
//! shared output channel; whoever drives the run (CLI, UI, tests) owns the
//! receiving end and decides how to present them. Emission is
//! fire-and-forget: a dropped or absent subscriber never blocks or fails
//! the run.

use tokio::sync::mpsc;

use super::stats::RunStats;

/// Events emitted over the lifetime of one run.
#[derive(Clone, Debug)]
pub enum RunEvent {
    /// A run started with this many candidates in range.
    RunStarted { total: u64 },

    /// One document was generated.
    GenerateCompleted { name: String },

    /// Generating one document failed.
    GenerateFailed { name: String, message: String },

    /// A failed document was dropped under the skip policy.
    GenerateSkipped { name: String },

    /// One file was written.
    WriteCompleted { name: String },

    /// Writing one file failed.
    WriteFailed { name: String, message: String },

    /// A failed write was dropped under the skip policy.
    WriteSkipped { name: String },

    /// The run drained normally.
    RunCompleted { stats: RunStats },

    /// The run terminated early (unrecovered failure or cancellation).
    RunAborted { message: String, stats: RunStats },
}

/// Cloneable, fire-and-forget emission handle.
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<RunEvent>,
}

impl EventSender {
    /// Creates a connected sender/stream pair.
    pub fn channel() -> (EventSender, EventStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventSender { tx }, EventStream { rx })
    }

    /// Emits an event. Send failures (no subscriber) are ignored.
    pub fn emit(&self, event: RunEvent) {
        let _ = self.tx.send(event);
    }

    pub fn run_started(&self, total: u64) {
        self.emit(RunEvent::RunStarted { total });
    }

    pub fn generate_completed(&self, name: &str) {
        self.emit(RunEvent::GenerateCompleted {
            name: name.to_string(),
        });
    }

    pub fn generate_failed(&self, name: &str, message: impl ToString) {
        self.emit(RunEvent::GenerateFailed {
            name: name.to_string(),
            message: message.to_string(),
        });
    }

    pub fn generate_skipped(&self, name: &str) {
        self.emit(RunEvent::GenerateSkipped {
            name: name.to_string(),
        });
    }

    pub fn write_completed(&self, name: &str) {
        self.emit(RunEvent::WriteCompleted {
            name: name.to_string(),
        });
    }

    pub fn write_failed(&self, name: &str, message: impl ToString) {
        self.emit(RunEvent::WriteFailed {
            name: name.to_string(),
            message: message.to_string(),
        });
    }

    pub fn write_skipped(&self, name: &str) {
        self.emit(RunEvent::WriteSkipped {
            name: name.to_string(),
        });
    }

    pub fn run_completed(&self, stats: RunStats) {
        self.emit(RunEvent::RunCompleted { stats });
    }

    pub fn run_aborted(&self, message: impl ToString, stats: RunStats) {
        self.emit(RunEvent::RunAborted {
            message: message.to_string(),
            stats,
        });
    }
}

/// The receiving end of a run's event channel.
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<RunEvent>,
}

impl EventStream {
    /// Receives the next event, or `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<RunEvent> {
        self.rx.recv().await
    }

    /// Receives an already-queued event without waiting.
    pub fn try_next(&mut self) -> Option<RunEvent> {
        self.rx.try_recv().ok()
    }
}
