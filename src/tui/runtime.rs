//! Async runtime and task management for the TUI
//!
//! This module implements the dual-channel event-driven architecture:
//! - Input channel (priority): User input events that are never dropped
//! - Data channel: Store results (never dropped) and animation ticks
//!
//! Persistence runs on a single store worker. Requests are executed one at a
//! time in the order the UI issued them, so saves for the same job can never
//! complete out of order.
//!
//! The main loop uses `tokio::select!` with bias toward the input channel
//! to prevent input starvation under heavy data update loads.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::models::{HexColor, JobId};
use crate::store::JobBackend;
use crate::tui::app::{App, SaveTicket};
use crate::tui::event::{DataEvent, EventResult, InputEvent};

/// Channel capacities
const INPUT_CHANNEL_CAPACITY: usize = 16;
const DATA_CHANNEL_CAPACITY: usize = 32;

const ANIMATION_TICK_INTERVAL: Duration = Duration::from_millis(120);

/// Work for the store worker
#[derive(Debug, Clone)]
pub enum StoreRequest {
    Load,
    Rename { ticket: SaveTicket, name: String },
    Recolor { ticket: SaveTicket, color: HexColor },
    Create { draft_seq: u64, name: String, color: HexColor },
    Archive { job: JobId },
}

impl StoreRequest {
    /// Run the request against the backend (blocking)
    fn execute(self, backend: &dyn JobBackend) -> DataEvent {
        let err = |e: crate::store::StoreError| e.to_string();
        match self {
            StoreRequest::Load => match backend.list_jobs() {
                Ok(jobs) => DataEvent::JobsLoaded(jobs),
                Err(e) => DataEvent::LoadFailed(e.to_string()),
            },
            StoreRequest::Rename { ticket, name } => {
                let result = backend.rename_job(&ticket.key.job, &name).map_err(err);
                DataEvent::FieldSaved { ticket, result }
            }
            StoreRequest::Recolor { ticket, color } => {
                let result = backend.recolor_job(&ticket.key.job, &color).map_err(err);
                DataEvent::FieldSaved { ticket, result }
            }
            StoreRequest::Create {
                draft_seq,
                name,
                color,
            } => DataEvent::JobCreated {
                draft_seq,
                result: backend.create_job(&name, &color).map_err(err),
            },
            StoreRequest::Archive { job } => {
                let result = backend.archive_job(&job).map_err(err);
                DataEvent::JobArchived { job, result }
            }
        }
    }

    /// Event reporting that this request could not be executed at all
    fn into_failure(self, message: String) -> DataEvent {
        match self {
            StoreRequest::Load => DataEvent::LoadFailed(message),
            StoreRequest::Rename { ticket, .. } | StoreRequest::Recolor { ticket, .. } => {
                DataEvent::FieldSaved {
                    ticket,
                    result: Err(message),
                }
            }
            StoreRequest::Create { draft_seq, .. } => DataEvent::JobCreated {
                draft_seq,
                result: Err(message),
            },
            StoreRequest::Archive { job } => DataEvent::JobArchived {
                job,
                result: Err(message),
            },
        }
    }
}

/// TUI runtime managing all background tasks
pub struct TuiRuntime {
    cancel_token: CancellationToken,
    task_handles: Vec<JoinHandle<()>>,
}

impl TuiRuntime {
    /// Create a new TUI runtime
    pub fn new() -> Self {
        Self {
            cancel_token: CancellationToken::new(),
            task_handles: Vec::new(),
        }
    }

    /// Get a clone of the cancellation token for spawning tasks
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Add a task handle to track
    pub fn track(&mut self, handle: JoinHandle<()>) {
        self.task_handles.push(handle);
    }

    /// Signal shutdown and wait for tasks to complete
    pub async fn shutdown(self) {
        self.cancel_token.cancel();

        let shutdown = async {
            for handle in self.task_handles {
                let _ = handle.await;
            }
        };

        tokio::select! {
            _ = shutdown => {}
            _ = tokio::time::sleep(Duration::from_secs(2)) => {
                tracing::warn!("Background tasks did not stop within 2s");
            }
        }
    }
}

/// Spawn the input event reader task
pub fn spawn_input_task(tx: mpsc::Sender<InputEvent>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = EventStream::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                maybe_event = reader.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            let input_event = match event {
                                Event::Key(key) => Some(InputEvent::Key(key)),
                                Event::Mouse(mouse) => Some(InputEvent::Mouse(mouse)),
                                Event::Resize(w, h) => Some(InputEvent::Resize(w, h)),
                                _ => None,
                            };

                            if let Some(evt) = input_event
                                && tx.send(evt).await.is_err()
                            {
                                break; // Receiver dropped
                            }
                        }
                        Some(Err(e)) => {
                            let is_fatal = matches!(
                                e.kind(),
                                std::io::ErrorKind::BrokenPipe
                                    | std::io::ErrorKind::ConnectionReset
                                    | std::io::ErrorKind::UnexpectedEof
                            );

                            if is_fatal {
                                tracing::info!("Terminal disconnected: {:?}", e);
                                break;
                            }
                            tracing::warn!("Terminal event read error: {:?}", e);
                        }
                        None => break,
                    }
                }
            }
        }
    })
}

/// Spawn the store worker.
///
/// Requests run one at a time on the blocking pool. The worker has no cancel
/// arm: it keeps going until every `StoreRequest` sender is dropped, so
/// commits queued before quitting still reach the backend. Results are sent
/// with `send().await` so a completed save is never lost to backpressure.
pub fn spawn_store_worker(
    backend: Arc<dyn JobBackend>,
    mut requests: mpsc::UnboundedReceiver<StoreRequest>,
    tx: mpsc::Sender<DataEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            tracing::debug!(?request, "executing store request");
            let fallback = request.clone();
            let worker_backend = Arc::clone(&backend);
            let event = match tokio::task::spawn_blocking(move || {
                request.execute(worker_backend.as_ref())
            })
            .await
            {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("Store task failed: {}", e);
                    fallback.into_failure(format!("Task join error: {e}"))
                }
            };

            if tx.send(event).await.is_err() {
                tracing::debug!("UI gone; store result discarded");
            }
        }
        tracing::debug!("store queue drained");
    })
}

/// Spawn the animation tick task
pub fn spawn_animation_tick(
    tx: mpsc::Sender<DataEvent>,
    cancel: CancellationToken,
    animation_visible: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ANIMATION_TICK_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    // Only send tick while a spinner or flash is on screen
                    if animation_visible.load(Ordering::Relaxed) {
                        let _ = tx.try_send(DataEvent::AnimationTick);
                    }
                }
            }
        }
    })
}

/// Run the main TUI event loop
pub async fn run_event_loop(
    mut app: App,
    mut input_rx: mpsc::Receiver<InputEvent>,
    mut data_rx: mpsc::Receiver<DataEvent>,
    mut render_fn: impl FnMut(&mut App) -> Result<()>,
) -> Result<()> {
    let mut needs_render = true;

    loop {
        if needs_render {
            render_fn(&mut app)?;
            needs_render = false;
        }

        if !app.running {
            break;
        }

        tokio::select! {
            // Bias toward input channel to prevent input starvation
            biased;

            Some(input) = input_rx.recv() => {
                match app.handle_input(input) {
                    EventResult::Continue => needs_render = true,
                    EventResult::Unchanged => {}
                    EventResult::Quit => break,
                }
            }

            Some(data) = data_rx.recv() => {
                match app.handle_data(data) {
                    EventResult::Continue => needs_render = true,
                    EventResult::Unchanged => {}
                    EventResult::Quit => break,
                }
            }

            else => break,
        }
    }

    Ok(())
}

/// Create the dual channels for the TUI
pub fn create_channels() -> (
    mpsc::Sender<InputEvent>,
    mpsc::Receiver<InputEvent>,
    mpsc::Sender<DataEvent>,
    mpsc::Receiver<DataEvent>,
) {
    let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
    let (data_tx, data_rx) = mpsc::channel(DATA_CHANNEL_CAPACITY);
    (input_tx, input_rx, data_tx, data_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileStore;
    use crate::tui::app::{JobField, SaveKey};

    fn worker() -> (
        tempfile::TempDir,
        mpsc::UnboundedSender<StoreRequest>,
        mpsc::Receiver<DataEvent>,
        JoinHandle<()>,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let backend: Arc<dyn JobBackend> = Arc::new(FileStore::new(dir.path().join("jobs.json")));
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (data_tx, data_rx) = mpsc::channel(DATA_CHANNEL_CAPACITY);
        let handle = spawn_store_worker(backend, req_rx, data_tx);
        (dir, req_tx, data_rx, handle)
    }

    #[tokio::test]
    async fn test_store_worker_create_then_rename_in_order() {
        let (_dir, req_tx, mut data_rx, handle) = worker();
        let red = HexColor::parse("ff0000").unwrap();

        req_tx
            .send(StoreRequest::Create {
                draft_seq: 1,
                name: "Baker".to_string(),
                color: red,
            })
            .unwrap();
        let job = match data_rx.recv().await.unwrap() {
            DataEvent::JobCreated { draft_seq: 1, result: Ok(job) } => job,
            other => panic!("unexpected event: {other:?}"),
        };

        let first = SaveTicket {
            key: SaveKey::new(job.id.clone(), JobField::Name),
            seq: 1,
        };
        let second = SaveTicket { seq: 2, ..first.clone() };
        req_tx
            .send(StoreRequest::Rename { ticket: first, name: "Bake".to_string() })
            .unwrap();
        req_tx
            .send(StoreRequest::Rename { ticket: second, name: "Head Baker".to_string() })
            .unwrap();

        let mut seqs = Vec::new();
        for _ in 0..2 {
            match data_rx.recv().await.unwrap() {
                DataEvent::FieldSaved { ticket, result: Ok(_) } => seqs.push(ticket.seq),
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert_eq!(seqs, [1, 2]);

        req_tx.send(StoreRequest::Load).unwrap();
        match data_rx.recv().await.unwrap() {
            DataEvent::JobsLoaded(jobs) => assert_eq!(jobs[0].name, "Head Baker"),
            other => panic!("unexpected event: {other:?}"),
        }

        drop(req_tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_store_worker_drains_queue_after_ui_exits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        let store = FileStore::new(path.clone());
        let job = store
            .create_job("Cook", &HexColor::parse("ff0000").unwrap())
            .unwrap();

        let backend: Arc<dyn JobBackend> = Arc::new(FileStore::new(path.clone()));
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (data_tx, data_rx) = mpsc::channel(1);
        let handle = spawn_store_worker(backend, req_rx, data_tx);

        for (seq, name) in [(1, "Line Cook"), (2, "Head Cook"), (3, "Chef")] {
            let ticket = SaveTicket {
                key: SaveKey::new(job.id.clone(), JobField::Name),
                seq,
            };
            req_tx
                .send(StoreRequest::Rename { ticket, name: name.to_string() })
                .unwrap();
        }

        // The event loop has returned: nobody reads results any more
        drop(data_rx);
        drop(req_tx);

        let mut runtime = TuiRuntime::new();
        runtime.track(handle);
        runtime.shutdown().await;

        let jobs = FileStore::new(path).list_jobs().unwrap();
        assert_eq!(jobs[0].name, "Chef");
    }

    #[tokio::test]
    async fn test_store_worker_reports_validation_error() {
        let (_dir, req_tx, mut data_rx, handle) = worker();

        req_tx
            .send(StoreRequest::Create {
                draft_seq: 7,
                name: "   ".to_string(),
                color: HexColor::parse("00ff00").unwrap(),
            })
            .unwrap();
        match data_rx.recv().await.unwrap() {
            DataEvent::JobCreated { draft_seq: 7, result: Err(msg) } => {
                assert_eq!(msg, "Job name cannot be empty");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        req_tx
            .send(StoreRequest::Archive { job: JobId::new("missing") })
            .unwrap();
        assert!(matches!(
            data_rx.recv().await.unwrap(),
            DataEvent::JobArchived { result: Err(_), .. }
        ));

        drop(req_tx);
        handle.await.unwrap();
    }

    #[test]
    fn test_failure_event_matches_request() {
        let event = StoreRequest::Archive { job: JobId::new("a") }.into_failure("boom".to_string());
        assert!(matches!(event, DataEvent::JobArchived { result: Err(m), .. } if m == "boom"));

        assert!(matches!(
            StoreRequest::Load.into_failure("boom".to_string()),
            DataEvent::LoadFailed(_)
        ));
    }
}
