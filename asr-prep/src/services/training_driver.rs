//! Training loop driver
//!
//! Feeds prefetched batches to an external [`Trainer`] and decides when to decay the
//! learning rate, save, evaluate and stop.
//!
//! **Algorithm:**
//! 1. Receive the next train batch (the following one starts assembling immediately)
//! 2. Run one training step; a loss not lower than the previous one counts as a plateau
//!    step. Six in a row decay the learning rate. A rate below 1e-7 ends training.
//! 3. Every `steps_per_checkpoint` steps: save, then evaluate the whole test set from its
//!    start with forward-only steps
//! 4. Stop after `max_steps` steps when a limit is set
//! 5. After each full pass over the train set, shuffle it

use crate::models::Sample;
use crate::services::batch_assembler::BatchAssembler;
use crate::services::batch_prefetcher::{BatchPrefetcher, Split};
use crate::types::Trainer;
use crate::{PrepError, PrepResult};
use rand::seq::SliceRandom;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Consecutive non-improving steps before the learning rate decays
pub const PLATEAU_STEPS: u32 = 6;

/// Learning rate below which training ends
pub const MIN_LEARNING_RATE: f64 = 1e-7;

/// Tracks consecutive steps without loss improvement
#[derive(Debug, Default)]
pub struct PlateauTracker {
    previous_loss: f32,
    non_improving: u32,
}

impl PlateauTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step loss; true when the learning rate should decay now
    pub fn observe(&mut self, loss: f32) -> bool {
        let decay = if loss >= self.previous_loss {
            self.non_improving += 1;
            if self.non_improving == PLATEAU_STEPS {
                self.non_improving = 0;
                true
            } else {
                false
            }
        } else {
            self.non_improving = 0;
            false
        };
        self.previous_loss = loss;
        decay
    }
}

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    MaxSteps,
    LearningRateExhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub steps: usize,
    pub checkpoints: usize,
    pub last_test_loss: Option<f32>,
    pub stop_reason: StopReason,
}

pub struct TrainingDriver {
    assembler: Arc<BatchAssembler>,
    train_set: Vec<Sample>,
    test_set: Arc<[Sample]>,
    checkpoint_dir: PathBuf,
    steps_per_checkpoint: usize,
    max_steps: Option<usize>,
}

impl TrainingDriver {
    pub fn new(
        assembler: Arc<BatchAssembler>,
        train_set: Vec<Sample>,
        test_set: Vec<Sample>,
        checkpoint_dir: impl Into<PathBuf>,
        steps_per_checkpoint: usize,
    ) -> Self {
        Self {
            assembler,
            train_set,
            test_set: test_set.into(),
            checkpoint_dir: checkpoint_dir.into(),
            steps_per_checkpoint: steps_per_checkpoint.max(1),
            max_steps: None,
        }
    }

    /// Stop after exactly `max_steps` training steps
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Run until the step limit or until the learning rate is exhausted
    pub async fn run<T: Trainer + ?Sized>(mut self, trainer: &mut T) -> PrepResult<TrainingSummary> {
        if self.train_set.is_empty() {
            return Err(PrepError::NoUsableSamples("train set is empty".to_string()));
        }

        let train_set = std::mem::take(&mut self.train_set);
        let num_train_batches = self.assembler.spec().num_batches(train_set.len()).max(1);
        info!(
            train_samples = train_set.len(),
            test_samples = self.test_set.len(),
            train_batches = num_train_batches,
            checkpoint_dir = %self.checkpoint_dir.display(),
            "Starting training"
        );

        let mut train_data: Arc<[Sample]> = train_set.into();
        let mut prefetcher =
            BatchPrefetcher::new(Split::Train, Arc::clone(&self.assembler), Arc::clone(&train_data), 0);

        let mut plateau = PlateauTracker::new();
        let mut steps = 0usize;
        let mut checkpoints = 0usize;
        let mut last_test_loss = None;
        let mut window_loss = 0.0f64;
        let mut window_started = Instant::now();

        let stop_reason = loop {
            if self.max_steps.is_some_and(|max| steps >= max) {
                break StopReason::MaxSteps;
            }

            let batch = prefetcher.next_batch().await?;
            let loss = trainer.step(&batch, false)?;
            steps += 1;
            debug!(step = steps, loss, "Training step");

            if plateau.observe(loss) {
                let rate = trainer.decay_learning_rate();
                info!(step = steps, learning_rate = rate, "Loss plateaued, learning rate decayed");
                if rate < MIN_LEARNING_RATE {
                    break StopReason::LearningRateExhausted;
                }
            }
            window_loss += f64::from(loss);

            if steps % self.steps_per_checkpoint == 0 {
                let step_time = window_started.elapsed().as_secs_f64() / self.steps_per_checkpoint as f64;
                info!(
                    step = steps,
                    mean_loss = window_loss / self.steps_per_checkpoint as f64,
                    step_time_secs = step_time,
                    "Checkpoint"
                );
                trainer.save(&self.checkpoint_dir)?;
                checkpoints += 1;
                if let Some(loss) = self.evaluate(trainer).await? {
                    last_test_loss = Some(loss);
                }
                window_loss = 0.0;
                window_started = Instant::now();
            }

            if steps % num_train_batches == 0 {
                info!(step = steps, "Shuffling the train set");
                let pointer = prefetcher.pointer();
                prefetcher.shutdown().await;
                let mut shuffled = train_data.to_vec();
                shuffled.shuffle(&mut rand::thread_rng());
                train_data = shuffled.into();
                prefetcher = BatchPrefetcher::new(
                    Split::Train,
                    Arc::clone(&self.assembler),
                    Arc::clone(&train_data),
                    pointer,
                );
            }
        };

        prefetcher.shutdown().await;
        info!(steps, checkpoints, reason = ?stop_reason, "Training finished");

        Ok(TrainingSummary {
            steps,
            checkpoints,
            last_test_loss,
            stop_reason,
        })
    }

    /// Forward-only pass over the test set; loss of the last batch
    async fn evaluate<T: Trainer + ?Sized>(&self, trainer: &mut T) -> PrepResult<Option<f32>> {
        let num_batches = self.assembler.spec().num_batches(self.test_set.len());
        if num_batches == 0 {
            return Ok(None);
        }

        let mut prefetcher = BatchPrefetcher::new(
            Split::Test,
            Arc::clone(&self.assembler),
            Arc::clone(&self.test_set),
            0,
        );
        let mut loss = None;
        for i in 0..num_batches {
            let batch = if i + 1 < num_batches {
                prefetcher.next_batch().await?
            } else {
                prefetcher.last_batch().await?
            };
            loss = Some(trainer.step(&batch, true)?);
        }
        prefetcher.shutdown().await;

        if let Some(loss) = loss {
            info!(loss, batches = num_batches, "Test loss");
        }
        Ok(loss)
    }
}
