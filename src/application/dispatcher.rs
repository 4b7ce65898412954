//! Dispatcher
//!
//! Fans each result (or digest) out to every configured target.
//!
//! Every target owns one delivery worker thread fed by a FIFO queue, so a
//! target sees messages in the order they were dispatched while different
//! targets deliver concurrently. `dispatch` enqueues to all workers first and
//! then waits for every outcome until a shared deadline. A target that misses
//! the deadline is reported as timed out; its worker finishes the send in the
//! background and keeps the queue order for later messages.
//!
//! Queues are bounded. When a target falls so far behind that its queue is
//! full, further messages for it are rejected with `QueueFull` instead of
//! piling up in memory.

use std::sync::mpsc::{
    channel, sync_channel, Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError,
};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::domain::entities::{PolicyResult, SummaryBatch};
use crate::domain::ports::{SummaryTarget, Target, TargetError, TargetResult};
use crate::error::RelayResult;

/// Default deadline for one fan-out
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of messages waiting per target
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy)]
pub struct DispatchOptions {
    /// Upper bound for each target's delivery of one message
    pub timeout: Duration,
    /// Messages a target may have waiting before new ones are rejected
    pub queue_capacity: usize,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_DISPATCH_TIMEOUT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Outcome of one target for one dispatched message
#[derive(Debug)]
pub struct TargetOutcome {
    pub target: String,
    pub result: TargetResult<()>,
}

impl TargetOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&TargetError> {
        self.result.as_ref().err()
    }
}

/// Per-target outcomes of one fan-out, in target registration order
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl DispatchReport {
    pub fn successes(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    /// Outcome for a target by name
    pub fn outcome(&self, target: &str) -> Option<&TargetOutcome> {
        self.outcomes.iter().find(|o| o.target == target)
    }
}

struct Job<M> {
    message: Arc<M>,
    reply: Sender<TargetResult<()>>,
}

/// Delivery worker owning one target
struct Worker<M> {
    name: String,
    queue: Option<SyncSender<Job<M>>>,
    handle: Option<JoinHandle<()>>,
}

impl<M: Send + Sync + 'static> Worker<M> {
    fn spawn<F>(name: String, capacity: usize, deliver: F) -> RelayResult<Self>
    where
        F: Fn(&M) -> TargetResult<()> + Send + 'static,
    {
        let (tx, rx) = sync_channel::<Job<M>>(capacity.max(1));
        let handle = thread::Builder::new()
            .name(format!("target-{}", name))
            .spawn(move || {
                for job in rx {
                    let outcome = deliver(&job.message);
                    // The dispatcher may have stopped waiting after a timeout.
                    let _ = job.reply.send(outcome);
                }
            })?;

        Ok(Self {
            name,
            queue: Some(tx),
            handle: Some(handle),
        })
    }

    fn enqueue(&self, message: Arc<M>) -> Result<Receiver<TargetResult<()>>, TargetError> {
        let (reply, outcome) = channel();
        let unavailable = || TargetError::Unavailable {
            target: self.name.clone(),
        };

        self.queue
            .as_ref()
            .ok_or_else(unavailable)?
            .try_send(Job { message, reply })
            .map_err(|e| match e {
                TrySendError::Full(_) => TargetError::QueueFull {
                    target: self.name.clone(),
                },
                TrySendError::Disconnected(_) => unavailable(),
            })?;

        Ok(outcome)
    }

    fn close(&mut self) {
        self.queue.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(target_name = %self.name, "delivery worker panicked");
            }
        }
    }
}

/// Fan-out over result targets and summary targets
pub struct Dispatcher {
    options: DispatchOptions,
    workers: Vec<Worker<PolicyResult>>,
    summary_workers: Vec<Worker<SummaryBatch>>,
}

impl Dispatcher {
    /// Spawn one delivery worker per target
    pub fn new(
        targets: Vec<Arc<dyn Target>>,
        summary_targets: Vec<Arc<dyn SummaryTarget>>,
        options: DispatchOptions,
    ) -> RelayResult<Self> {
        let mut workers = Vec::with_capacity(targets.len());
        for target in targets {
            let name = target.name().to_string();
            workers.push(Worker::spawn(
                name,
                options.queue_capacity,
                move |result: &PolicyResult| target.send(result),
            )?);
        }

        let mut summary_workers = Vec::with_capacity(summary_targets.len());
        for target in summary_targets {
            let name = target.name().to_string();
            summary_workers.push(Worker::spawn(
                name,
                options.queue_capacity,
                move |batch: &SummaryBatch| target.send_summary(batch),
            )?);
        }

        debug!(
            targets = workers.len(),
            summary_targets = summary_workers.len(),
            "dispatcher started"
        );

        Ok(Self {
            options,
            workers,
            summary_workers,
        })
    }

    /// Names of result targets, then summary targets
    pub fn target_names(&self) -> Vec<&str> {
        self.workers
            .iter()
            .map(|w| w.name.as_str())
            .chain(self.summary_workers.iter().map(|w| w.name.as_str()))
            .collect()
    }

    pub fn has_targets(&self) -> bool {
        !self.workers.is_empty()
    }

    pub fn has_summary_targets(&self) -> bool {
        !self.summary_workers.is_empty()
    }

    /// Deliver one result to every result target
    pub fn dispatch(&self, result: PolicyResult) -> DispatchReport {
        fan_out(&self.workers, Arc::new(result), self.options.timeout)
    }

    /// Deliver one digest to every summary target
    pub fn dispatch_summary(&self, batch: SummaryBatch) -> DispatchReport {
        fan_out(&self.summary_workers, Arc::new(batch), self.options.timeout)
    }

    /// Close all queues and wait for in-flight deliveries to finish
    pub fn shutdown(mut self) {
        self.close_all();
    }

    fn close_all(&mut self) {
        for worker in &mut self.workers {
            worker.close();
        }
        for worker in &mut self.summary_workers {
            worker.close();
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // Closing the queues lets workers exit once their backlog is drained.
        for worker in &mut self.workers {
            worker.queue.take();
        }
        for worker in &mut self.summary_workers {
            worker.queue.take();
        }
    }
}

fn fan_out<M: Send + Sync + 'static>(
    workers: &[Worker<M>],
    message: Arc<M>,
    timeout: Duration,
) -> DispatchReport {
    let pending: Vec<(&str, Result<Receiver<TargetResult<()>>, TargetError>)> = workers
        .iter()
        .map(|worker| (worker.name.as_str(), worker.enqueue(Arc::clone(&message))))
        .collect();

    let deadline = Instant::now() + timeout;
    let mut report = DispatchReport::default();

    for (name, queued) in pending {
        let result = queued.and_then(|outcome| {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match outcome.recv_timeout(remaining) {
                Ok(result) => result,
                Err(RecvTimeoutError::Timeout) => Err(TargetError::Timeout { after: timeout }),
                Err(RecvTimeoutError::Disconnected) => Err(TargetError::Unavailable {
                    target: name.to_string(),
                }),
            }
        });

        match &result {
            Ok(()) => debug!(target_name = %name, "delivered"),
            Err(e) => warn!(
                target_name = %name,
                transient = e.is_transient(),
                error = %e,
                "delivery failed"
            ),
        }

        report.outcomes.push(TargetOutcome {
            target: name.to_string(),
            result,
        });
    }

    report
}
