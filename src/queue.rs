use crate::error::{PipelineError, Result, TaskFailure};
use crate::metrics::QueueMetrics;
use crossbeam::channel::bounded;
use crossbeam::sync::WaitGroup;
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

type Task = Box<dyn FnOnce() + Send + 'static>;

const DEFAULT_THREAD_NAME: &str = "work-queue";

/// Builder for [`WorkQueue`]
#[derive(Debug, Clone)]
pub struct WorkQueueBuilder {
    max_concurrency: usize,
    thread_name: String,
}

impl WorkQueueBuilder {
    /// Defaults to one concurrent task per available CPU
    pub fn new() -> Self {
        Self {
            max_concurrency: thread::available_parallelism().map_or(1, |n| n.get()),
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }

    /// Upper bound on tasks executing at the same time
    pub fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Prefix for worker thread names; the task index is appended
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = prefix.into();
        self
    }

    /// Build the queue
    pub fn build(self) -> Result<WorkQueue> {
        if self.max_concurrency == 0 {
            return Err(PipelineError::ConfigError(
                "max_concurrency must be at least 1".into(),
            ));
        }
        Ok(WorkQueue {
            max_concurrency: self.max_concurrency,
            thread_name: self.thread_name,
            tasks: Vec::new(),
            metrics: QueueMetrics::new(),
        })
    }
}

impl Default for WorkQueueBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs registered tasks with a fixed upper bound on concurrency
pub struct WorkQueue {
    max_concurrency: usize,
    thread_name: String,
    tasks: Vec<Task>,
    metrics: QueueMetrics,
}

impl WorkQueue {
    /// Create a queue running at most `size` tasks at once
    pub fn new(size: usize) -> Result<Self> {
        Self::builder().max_concurrency(size).build()
    }

    /// Start configuring a queue
    pub fn builder() -> WorkQueueBuilder {
        WorkQueueBuilder::new()
    }

    /// Register a unit of work for the next [`run`](WorkQueue::run)
    pub fn add_task<F>(&mut self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tasks.push(Box::new(task));
    }

    /// Number of tasks waiting for the next run
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are waiting
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Upper bound on tasks executing at the same time
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Counters across every run of this queue
    pub fn metrics(&self) -> &QueueMetrics {
        &self.metrics
    }

    /// Run every registered task and block until all of them finish.
    ///
    /// Registered tasks are consumed. A panicking task does not stop the
    /// others; all panics are reported together once the batch is done.
    pub fn run(&mut self) -> Result<()> {
        let tasks = std::mem::take(&mut self.tasks);
        let total = tasks.len();
        if total == 0 {
            return Ok(());
        }

        debug!(
            tasks = total,
            max_concurrency = self.max_concurrency,
            "running work queue"
        );

        // Each in-flight task holds one slot of the gate.
        let (gate_tx, gate_rx) = bounded::<()>(self.max_concurrency);
        let failures = Arc::new(Mutex::new(Vec::new()));
        let wait_group = WaitGroup::new();
        let mut spawn_error = None;

        for (index, task) in tasks.into_iter().enumerate() {
            // blocks while max_concurrency tasks are in flight
            gate_tx.send(()).ok();

            let gate = gate_rx.clone();
            let failures = Arc::clone(&failures);
            let metrics = self.metrics.clone();
            let wait_group = wait_group.clone();

            let spawned = thread::Builder::new()
                .name(format!("{}-{}", self.thread_name, index))
                .spawn(move || {
                    metrics.record_started();
                    match panic::catch_unwind(AssertUnwindSafe(task)) {
                        Ok(()) => metrics.record_completed(),
                        Err(payload) => {
                            metrics.record_panicked();
                            let message = panic_message(payload.as_ref());
                            warn!(task = index, %message, "queued task panicked");
                            failures.lock().push(TaskFailure { index, message });
                        }
                    }
                    gate.recv().ok();
                    drop(wait_group);
                });

            if let Err(e) = spawned {
                gate_rx.recv().ok();
                spawn_error = Some(e.to_string());
                break;
            }
        }

        wait_group.wait();

        if let Some(reason) = spawn_error {
            return Err(PipelineError::ThreadError(reason));
        }

        let mut failures = std::mem::take(&mut *failures.lock());
        debug!(
            tasks = total,
            panicked = failures.len(),
            "work queue finished"
        );
        if failures.is_empty() {
            Ok(())
        } else {
            failures.sort_by_key(|failure| failure.index);
            Err(PipelineError::TasksPanicked { total, failures })
        }
    }
}

impl std::fmt::Debug for WorkQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkQueue")
            .field("max_concurrency", &self.max_concurrency)
            .field("thread_name", &self.thread_name)
            .field("pending", &self.tasks.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            WorkQueue::new(0),
            Err(PipelineError::ConfigError(_))
        ));
    }

    #[test]
    fn test_runs_all_tasks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut queue = WorkQueue::new(3).unwrap();
        for _ in 0..20 {
            let counter = Arc::clone(&counter);
            queue.add_task(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(queue.len(), 20);
        queue.run().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 20);
        assert!(queue.is_empty());
        assert_eq!(queue.metrics().total_completed(), 20);
    }

    #[test]
    fn test_concurrency_bound() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut queue = WorkQueue::builder()
            .max_concurrency(2)
            .thread_name("bounded")
            .build()
            .unwrap();
        for _ in 0..8 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            queue.add_task(move || {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(10));
                running.fetch_sub(1, Ordering::SeqCst);
            });
        }
        queue.run().unwrap();
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_panics_are_reported() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut queue = WorkQueue::new(2).unwrap();
        for i in 0..5 {
            let counter = Arc::clone(&counter);
            queue.add_task(move || {
                if i == 1 || i == 3 {
                    panic!("task {i} failed");
                }
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        match queue.run() {
            Err(PipelineError::TasksPanicked { total, failures }) => {
                assert_eq!(total, 5);
                assert_eq!(
                    failures.iter().map(|f| f.index).collect::<Vec<_>>(),
                    vec![1, 3]
                );
                assert_eq!(failures[0].message, "task 1 failed");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(queue.metrics().total_panicked(), 2);
    }

    #[test]
    fn test_empty_run() {
        let mut queue = WorkQueue::new(1).unwrap();
        assert!(queue.run().is_ok());
        assert_eq!(queue.metrics().total_started(), 0);
    }
}
