//! Ordered collections and a lazily-configured, single-pass stream pipeline.
//!
//! A stream is built over a borrowed slice by chaining stages, then run
//! exactly once by a terminal `collect`. Nothing executes while stages are
//! being registered.
//!
//! # Features
//!
//! - Observe, distinct and filter stages evaluated per element in
//!   registration order, short-circuiting on the first rejection
//! - Independent key-set per `distinct` stage
//! - Result bound (`limit`) that stops the whole pass early
//! - Typed builder phases: a pipeline that changes the element type cannot
//!   be collected before its transform is set, and no stage can follow
//!   `limit`
//! - `SimpleList`, the lock-wrapped `SyncList`, a bounded `WorkQueue` and
//!   slice helpers around the pipeline
//!
//! # Example
//!
//! ```
//! use seq_stream::{map_stream, stream};
//!
//! let data = [1, 2, 2, 3, 4, 5];
//! let evens = stream(&data).distinct(|v| *v as i64).filter(|v| v % 2 == 0).collect();
//! assert_eq!(evens, vec![2, 4]);
//!
//! let labels: Vec<String> = map_stream(&data)
//!     .map(|v| format!("#{v}"))
//!     .filter(|v| *v > 2)
//!     .limit(2)
//!     .collect();
//! assert_eq!(labels, vec!["#3", "#4"]);
//! ```

pub mod error;
pub mod list;
pub mod metrics;
pub mod pipeline;
pub mod queue;
pub mod slice;
pub mod stage;
pub mod sync_list;

// Re-exports for convenience
pub use error::{PipelineError, Result, TaskFailure};
pub use list::SimpleList;
pub use metrics::{CollectStats, QueueMetrics, QueueSnapshot};
pub use pipeline::{map_stream, stream, StreamEnd, StreamFlow, StreamStart};
pub use queue::{WorkQueue, WorkQueueBuilder};
pub use stage::{Stage, Verdict};
pub use sync_list::SyncList;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
