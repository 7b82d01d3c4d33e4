//! The run controller - orchestrates one bulk-generation run.

use std::sync::{Arc, RwLock};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::candidate::{candidates, NamingRule, RowData, WorkItem};
use crate::fill::DocumentFiller;
use crate::pipeline::{drain, filter_present, map_concurrent, Pipeline};
use crate::write::DirectoryWriter;

use super::config::{ErrorPolicy, RunConfig};
use super::error::{ConfigError, ItemError, RunError};
use super::event::{EventSender, EventStream};
use super::stats::{RunProgress, RunState, RunStats};

/// A generated document waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Inputs for one generation run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Template bytes, shared read-only by all generate invocations.
    pub template: Vec<u8>,
    /// All candidate rows; `start`/`end` select the range to generate.
    pub rows: Vec<RowData>,
    pub naming: NamingRule,
    /// First row index to generate (inclusive). Defaults to 0.
    pub start: Option<usize>,
    /// Row index to stop at (exclusive). Defaults to `rows.len()`.
    pub end: Option<usize>,
}

impl RunRequest {
    pub fn new(template: Vec<u8>, rows: Vec<RowData>) -> Self {
        Self {
            template,
            rows,
            naming: NamingRule::default(),
            start: None,
            end: None,
        }
    }
}

/// Orchestrates generation runs over a filler and a writer.
///
/// One controller runs at most one run at a time; starting a second while
/// one is `Running` fails with [`RunError::AlreadyRunning`]. Statistics and
/// state are readable at any moment, including mid-run, and stay readable
/// after termination until the next start.
pub struct RunController<F, W> {
    filler: Arc<F>,
    writer: Arc<W>,
    config: RunConfig,
    progress: Arc<RunProgress>,
    state: RwLock<RunState>,
    cancel: RwLock<CancellationToken>,
    events: EventSender,
}

impl<F, W> RunController<F, W>
where
    F: DocumentFiller,
    W: DirectoryWriter,
{
    /// Creates a controller and the event stream its runs publish to.
    pub fn new(filler: F, writer: W, config: RunConfig) -> (Self, EventStream) {
        let (events, stream) = EventSender::channel();
        let controller = Self {
            filler: Arc::new(filler),
            writer: Arc::new(writer),
            config,
            progress: Arc::new(RunProgress::default()),
            state: RwLock::new(RunState::Idle),
            cancel: RwLock::new(CancellationToken::new()),
            events,
        };
        (controller, stream)
    }

    /// Snapshot of the current (or last) run's statistics.
    pub fn stats(&self) -> RunStats {
        self.progress.snapshot()
    }

    pub fn state(&self) -> RunState {
        *self.state.read().expect("state lock poisoned")
    }

    /// Requests cancellation of the run in progress.
    ///
    /// The candidate source stops yielding; work already in flight runs to
    /// completion best-effort and its results are discarded.
    pub fn cancel(&self) {
        self.cancel.read().expect("cancel lock poisoned").cancel();
    }

    /// Runs one generation pass to completion.
    ///
    /// Validates configuration and range before touching any state; an
    /// invalid request leaves statistics and state exactly as they were.
    pub async fn generate(&self, request: RunRequest) -> Result<RunStats, RunError> {
        let (generate_limit, write_limit) = self.config.validated_limits()?;

        let total_rows = request.rows.len();
        let start = request.start.unwrap_or(0);
        let end = request.end.unwrap_or(total_rows);
        if start > end || end > total_rows {
            return Err(ConfigError::InvalidRange {
                start,
                end,
                total: total_rows,
            }
            .into());
        }

        {
            let mut state = self.state.write().expect("state lock poisoned");
            if *state == RunState::Running {
                return Err(RunError::AlreadyRunning);
            }
            *state = RunState::Running;
        }

        let rows: Vec<RowData> = request
            .rows
            .into_iter()
            .skip(start)
            .take(end - start)
            .collect();
        let total = rows.len() as u64;

        self.progress.reset(total);
        self.events.run_started(total);

        let cancel = CancellationToken::new();
        *self.cancel.write().expect("cancel lock poisoned") = cancel.clone();

        info!(
            total,
            generate_limit = generate_limit.get(),
            write_limit = write_limit.get(),
            policy = ?self.config.error_policy,
            "starting generation run"
        );

        let template = Arc::new(request.template);
        let policy = self.config.error_policy;

        let generate_stage = {
            let filler = Arc::clone(&self.filler);
            let progress = Arc::clone(&self.progress);
            let events = self.events.clone();
            map_concurrent(generate_limit, move |item: WorkItem, _id| {
                let filler = Arc::clone(&filler);
                let progress = Arc::clone(&progress);
                let events = events.clone();
                let template = Arc::clone(&template);
                async move {
                    let WorkItem { name, row } = item;
                    debug!(name = %name, "generating document");
                    match filler.fill(&template, &row).await {
                        Ok(bytes) => {
                            progress.generate_ok();
                            events.generate_completed(&name);
                            Ok(Some(RenderedDocument { name, bytes }))
                        }
                        Err(err) => {
                            progress.generate_err();
                            error!(name = %name, error = %err, "document generation failed");
                            events.generate_failed(&name, &err);
                            match policy {
                                ErrorPolicy::Skip => {
                                    progress.generate_skipped();
                                    events.generate_skipped(&name);
                                    warn!(name = %name, "skipping item after generation failure");
                                    Ok(None)
                                }
                                ErrorPolicy::Abort => Err(ItemError::Generation { name, source: err }),
                            }
                        }
                    }
                }
            })
        };

        let write_stage = {
            let writer = Arc::clone(&self.writer);
            let progress = Arc::clone(&self.progress);
            let events = self.events.clone();
            map_concurrent(write_limit, move |doc: RenderedDocument, _id| {
                let writer = Arc::clone(&writer);
                let progress = Arc::clone(&progress);
                let events = events.clone();
                async move {
                    let RenderedDocument { name, bytes } = doc;
                    match writer.write(&name, &bytes).await {
                        Ok(()) => {
                            progress.write_ok();
                            events.write_completed(&name);
                            debug!(name = %name, size_bytes = bytes.len(), "file written");
                            Ok(())
                        }
                        Err(err) => {
                            progress.write_err();
                            error!(name = %name, error = %err, "file write failed");
                            events.write_failed(&name, &err);
                            match policy {
                                ErrorPolicy::Skip => {
                                    progress.write_skipped();
                                    events.write_skipped(&name);
                                    warn!(name = %name, "skipping item after write failure");
                                    Ok(())
                                }
                                ErrorPolicy::Abort => Err(ItemError::Write { name, source: err }),
                            }
                        }
                    }
                }
            })
        };

        let pipeline = Pipeline::new(generate_stage)
            .then(filter_present())
            .then(write_stage);
        let source = candidates::<ItemError>(rows, request.naming, cancel.clone());

        let outcome = drain(pipeline.run(source)).await;

        self.progress.finish();
        let stats = self.progress.snapshot();

        match outcome {
            Ok(()) if cancel.is_cancelled() => {
                *self.state.write().expect("state lock poisoned") = RunState::Aborted;
                warn!(
                    generated_ok = stats.generated_ok,
                    written_ok = stats.written_ok,
                    "generation run cancelled"
                );
                self.events.run_aborted("run cancelled", stats);
                Err(RunError::Cancelled)
            }
            Ok(()) => {
                *self.state.write().expect("state lock poisoned") = RunState::Completed;
                info!(
                    total = stats.total,
                    generated_ok = stats.generated_ok,
                    generated_err = stats.generated_err,
                    skipped_gen = stats.skipped_gen,
                    written_ok = stats.written_ok,
                    written_err = stats.written_err,
                    skipped_write = stats.skipped_write,
                    elapsed_ms = stats.elapsed().map(|d| d.as_millis() as u64),
                    "generation run complete"
                );
                self.events.run_completed(stats.clone());
                Ok(stats)
            }
            Err(item_err) => {
                *self.state.write().expect("state lock poisoned") = RunState::Aborted;
                error!(
                    name = item_err.item_name(),
                    error = %item_err,
                    "generation run aborted"
                );
                self.events.run_aborted(item_err.to_string(), stats);
                Err(RunError::Aborted { source: item_err })
            }
        }
    }
}
