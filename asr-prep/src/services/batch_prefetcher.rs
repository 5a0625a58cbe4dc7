//! Background batch preparation
//!
//! While the trainer runs one batch, the next is assembled on a blocking worker and
//! handed over through a one-slot channel. Each split (train, test) gets its own
//! prefetcher; at most one batch computation is in flight per prefetcher.
//!
//! The dataset is shared read-only, so the worker needs no other synchronization.

use crate::models::{Batch, Sample};
use crate::services::batch_assembler::BatchAssembler;
use crate::{PrepError, PrepResult};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Data split served by a prefetcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Train => f.write_str("train"),
            Split::Test => f.write_str("test"),
        }
    }
}

pub struct BatchPrefetcher {
    split: Split,
    assembler: Arc<BatchAssembler>,
    dataset: Arc<[Sample]>,
    pointer: usize,
    sender: mpsc::Sender<PrepResult<Batch>>,
    receiver: mpsc::Receiver<PrepResult<Batch>>,
    in_flight: Option<JoinHandle<()>>,
}

impl BatchPrefetcher {
    /// Prefetcher starting at `pointer`; nothing is computed until the first request
    pub fn new(
        split: Split,
        assembler: Arc<BatchAssembler>,
        dataset: Arc<[Sample]>,
        pointer: usize,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(1);
        Self {
            split,
            assembler,
            dataset,
            pointer,
            sender,
            receiver,
            in_flight: None,
        }
    }

    /// Dataset position the next scheduled batch starts from
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Receive the ready batch and schedule the one after it
    pub async fn next_batch(&mut self) -> PrepResult<Batch> {
        self.next(true).await
    }

    /// Receive the ready batch without scheduling another
    pub async fn last_batch(&mut self) -> PrepResult<Batch> {
        self.next(false).await
    }

    async fn next(&mut self, prefetch: bool) -> PrepResult<Batch> {
        let handle = match self.in_flight.take() {
            Some(handle) => handle,
            None => self.spawn(),
        };

        // The slot is free while a task runs, so the task always finishes its send
        handle
            .await
            .map_err(|e| PrepError::Worker(format!("{} batch task failed: {}", self.split, e)))?;
        let batch = self
            .receiver
            .try_recv()
            .map_err(|e| PrepError::Worker(format!("{} batch not delivered: {}", self.split, e)))??;

        self.pointer = batch.next_pointer;
        if prefetch {
            self.in_flight = Some(self.spawn());
        }
        Ok(batch)
    }

    /// Start assembling the batch at the current pointer
    fn spawn(&self) -> JoinHandle<()> {
        debug!(split = %self.split, pointer = self.pointer, "Prefetching batch");
        let assembler = Arc::clone(&self.assembler);
        let dataset = Arc::clone(&self.dataset);
        let sender = self.sender.clone();
        let pointer = self.pointer;

        tokio::task::spawn_blocking(move || {
            let result = assembler.assemble(&dataset, pointer);
            // Receiver gone means the prefetcher was dropped
            let _ = sender.blocking_send(result);
        })
    }

    /// Wait for any in-flight batch and discard it
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.in_flight.take() {
            let _ = handle.await;
        }
        debug!(split = %self.split, "Batch prefetcher shut down");
    }
}
