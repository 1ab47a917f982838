use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Counters gathered by one execution of a stream pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Source elements that were evaluated against the stages
    pub visited: u64,
    /// Elements that passed every stage and were transformed
    pub accepted: u64,
    /// Elements dropped by some stage
    pub rejected: u64,
    /// Rejections per stage, indexed in registration order
    pub stage_rejections: Vec<u64>,
    /// The pass stopped on the limit before the source was exhausted
    pub early_exit: bool,
}

impl CollectStats {
    pub(crate) fn new(stage_count: usize) -> Self {
        Self {
            stage_rejections: vec![0; stage_count],
            ..Self::default()
        }
    }

    pub(crate) fn record_accepted(&mut self) {
        self.visited += 1;
        self.accepted += 1;
    }

    pub(crate) fn record_rejected(&mut self, stage: usize) {
        self.visited += 1;
        self.rejected += 1;
        if let Some(count) = self.stage_rejections.get_mut(stage) {
            *count += 1;
        }
    }
}

/// Shared task counters for a worker queue
#[derive(Debug, Clone)]
pub struct QueueMetrics {
    tasks_started: Arc<AtomicU64>,
    tasks_completed: Arc<AtomicU64>,
    tasks_panicked: Arc<AtomicU64>,
    start_time: Instant,
}

impl QueueMetrics {
    /// Create a new metrics collector for a queue
    pub fn new() -> Self {
        Self {
            tasks_started: Arc::new(AtomicU64::new(0)),
            tasks_completed: Arc::new(AtomicU64::new(0)),
            tasks_panicked: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    /// Record a task handed to a worker
    pub fn record_started(&self) {
        self.tasks_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a task that returned normally
    pub fn record_completed(&self) {
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a task that panicked
    pub fn record_panicked(&self) {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// Tasks handed to a worker thread
    pub fn total_started(&self) -> u64 {
        self.tasks_started.load(Ordering::Relaxed)
    }

    /// Tasks that returned normally
    pub fn total_completed(&self) -> u64 {
        self.tasks_completed.load(Ordering::Relaxed)
    }

    /// Tasks that panicked
    pub fn total_panicked(&self) -> u64 {
        self.tasks_panicked.load(Ordering::Relaxed)
    }

    /// Completed tasks per second since the queue was created
    pub fn throughput_tps(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed == 0.0 {
            0.0
        } else {
            self.total_completed() as f64 / elapsed
        }
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            total_started: self.total_started(),
            total_completed: self.total_completed(),
            total_panicked: self.total_panicked(),
            throughput_tps: self.throughput_tps(),
            elapsed: self.start_time.elapsed(),
        }
    }
}

impl Default for QueueMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A snapshot of queue metrics at a point in time
#[derive(Debug, Clone)]
pub struct QueueSnapshot {
    pub total_started: u64,
    pub total_completed: u64,
    pub total_panicked: u64,
    pub throughput_tps: f64,
    pub elapsed: Duration,
}

impl QueueSnapshot {
    /// Format metrics as a human-readable string
    pub fn format(&self) -> String {
        format!(
            "Started: {}, Completed: {}, Panicked: {}, Throughput: {:.2} tasks/s, Elapsed: {:.2}s",
            self.total_started,
            self.total_completed,
            self.total_panicked,
            self.throughput_tps,
            self.elapsed.as_secs_f64()
        )
    }
}
