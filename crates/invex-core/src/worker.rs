//! Background processing so the interactive loop never blocks on PDF parsing.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, error};

use crate::batch::{process_folder, BatchEvent, BatchReport};
use crate::guard;
use crate::invoice::InvoiceExtractor;
use crate::models::invoice::InvoiceRow;

/// Messages sent from the worker to the interactive task.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Log(String),
    Row(InvoiceRow),
    Progress { done: usize, total: usize },
    /// The run finished; no more events follow.
    Finished(BatchReport),
    /// The folder could not be read or the run panicked; no more events follow.
    Failed(String),
}

impl From<BatchEvent> for WorkerEvent {
    fn from(event: BatchEvent) -> Self {
        match event {
            BatchEvent::Log(line) => WorkerEvent::Log(line),
            BatchEvent::Row(row) => WorkerEvent::Row(row),
            BatchEvent::Progress { done, total } => WorkerEvent::Progress { done, total },
        }
    }
}

/// A single folder run on the blocking thread pool.
///
/// One producer (the worker) and one consumer (whoever holds this value).
pub struct ProcessingWorker {
    events: UnboundedReceiver<WorkerEvent>,
}

impl ProcessingWorker {
    /// Start processing `folder`. Must be called from within a tokio runtime.
    pub fn spawn(folder: PathBuf, extractor: Arc<dyn InvoiceExtractor>) -> Self {
        let (tx, events) = unbounded_channel();

        tokio::task::spawn_blocking(move || {
            debug!("Worker started for {}", folder.display());

            // A closed receiver only means nobody is listening any more
            let mut sink = |event: BatchEvent| {
                let _ = tx.send(event.into());
            };

            let last = match guard::contain(|| process_folder(&folder, extractor.as_ref(), &mut sink)) {
                Ok(Ok(report)) => WorkerEvent::Finished(report),
                Ok(Err(e)) => {
                    error!("Processing {} failed: {}", folder.display(), e);
                    WorkerEvent::Failed(e.to_string())
                }
                Err(message) => {
                    error!("Processing {} panicked: {}", folder.display(), message);
                    WorkerEvent::Failed(format!("processing stopped unexpectedly: {}", message))
                }
            };
            let _ = tx.send(last);
        });

        Self { events }
    }

    /// Next event, or `None` once the worker is done and the channel is drained.
    pub async fn next_event(&mut self) -> Option<WorkerEvent> {
        self.events.recv().await
    }

    /// Drain every remaining event and return the final report.
    pub async fn join(mut self) -> Result<BatchReport, String> {
        while let Some(event) = self.next_event().await {
            match event {
                WorkerEvent::Finished(report) => return Ok(report),
                WorkerEvent::Failed(message) => return Err(message),
                _ => {}
            }
        }
        Err("worker stopped without a result".to_string())
    }
}
