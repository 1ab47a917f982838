use crate::metrics::CollectStats;
use crate::stage::{Stage, Verdict};
use std::fmt;
use tracing::debug;

type TransformFn<'a, T, B> = Box<dyn FnMut(&T) -> B + 'a>;

/// Create a pipeline over `source` whose output element type is `T`.
///
/// Accepted elements are cloned into the result. There is no transform to
/// set; use [`map_stream`] for that.
///
/// ```compile_fail
/// let data = [1, 2];
/// let doubled = seq_stream::stream(&data).map(|v| v * 2).collect();
/// ```
pub fn stream<T: Clone>(source: &[T]) -> StreamFlow<'_, T, T> {
    StreamFlow {
        pipeline: Pipeline::new(source, Box::new(T::clone)),
    }
}

/// Create a pipeline over `source` producing elements of type `B`.
///
/// The returned handle only offers [`StreamStart::map`], so no pipeline
/// can be collected before its transform is known.
pub fn map_stream<T, B>(source: &[T]) -> StreamStart<'_, T, B> {
    StreamStart {
        source,
        _output: std::marker::PhantomData,
    }
}

/// Configuration shared by every builder phase
struct Pipeline<'a, T, B> {
    source: &'a [T],
    stages: Vec<Stage<'a, T>>,
    limit: usize,
    transform: TransformFn<'a, T, B>,
}

impl<'a, T, B> Pipeline<'a, T, B> {
    fn new(source: &'a [T], transform: TransformFn<'a, T, B>) -> Self {
        Self {
            source,
            stages: Vec::new(),
            limit: 0,
            transform,
        }
    }

    fn push(&mut self, stage: Stage<'a, T>) {
        self.stages.push(stage);
    }

    /// Single forward pass over the source.
    ///
    /// The limit is checked before an element is visited, so once `limit`
    /// elements are accepted no stage sees anything further.
    fn execute(mut self) -> (Vec<B>, CollectStats) {
        let capacity = match self.limit {
            0 => self.source.len(),
            limit => limit.min(self.source.len()),
        };
        let mut result = Vec::with_capacity(capacity);
        let mut stats = CollectStats::new(self.stages.len());

        debug!(
            source_len = self.source.len(),
            stages = self.stages.len(),
            limit = self.limit,
            "collecting stream"
        );

        for (index, value) in self.source.iter().enumerate() {
            if self.limit != 0 && result.len() >= self.limit {
                stats.early_exit = true;
                break;
            }

            let rejected_by = self
                .stages
                .iter_mut()
                .position(|stage| stage.evaluate(index, value) == Verdict::Reject);

            match rejected_by {
                Some(stage) => stats.record_rejected(stage),
                None => {
                    result.push((self.transform)(value));
                    stats.record_accepted();
                }
            }
        }

        debug!(
            visited = stats.visited,
            accepted = stats.accepted,
            early_exit = stats.early_exit,
            "stream collected"
        );

        (result, stats)
    }
}

impl<T, B> fmt::Debug for Pipeline<'_, T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("source_len", &self.source.len())
            .field("stages", &self.stages)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

/// A pipeline that still needs its transform
#[derive(Debug)]
pub struct StreamStart<'a, T, B> {
    source: &'a [T],
    _output: std::marker::PhantomData<fn() -> B>,
}

impl<'a, T, B> StreamStart<'a, T, B> {
    /// Set the transform applied to every accepted element
    pub fn map<F>(self, f: F) -> StreamFlow<'a, T, B>
    where
        F: FnMut(&T) -> B + 'a,
    {
        StreamFlow {
            pipeline: Pipeline::new(self.source, Box::new(f)),
        }
    }
}

/// A pipeline accepting stage registrations.
///
/// Nothing runs until [`collect`](StreamFlow::collect); every builder call
/// only appends to the stage list and hands the pipeline back.
#[derive(Debug)]
pub struct StreamFlow<'a, T, B> {
    pipeline: Pipeline<'a, T, B>,
}

impl<'a, T, B> StreamFlow<'a, T, B> {
    /// Add a stage that sees `(index, element)` for every element reaching it
    pub fn observe<F>(mut self, f: F) -> Self
    where
        F: FnMut(usize, &T) + 'a,
    {
        self.pipeline.push(Stage::observer(f));
        self
    }

    /// Add a dedup stage with its own key-set.
    ///
    /// Elements whose key was already seen by this stage are dropped, so
    /// distinct elements with equal keys count as duplicates.
    pub fn distinct<F>(mut self, key: F) -> Self
    where
        F: FnMut(&T) -> i64 + 'a,
    {
        self.pipeline.push(Stage::distinct(key));
        self
    }

    /// Add a stage that drops elements for which `f` returns `false`
    pub fn filter<F>(mut self, f: F) -> Self
    where
        F: FnMut(&T) -> bool + 'a,
    {
        self.pipeline.push(Stage::predicate(f));
        self
    }

    /// Bound the result length. `0` leaves it unbounded.
    pub fn limit(mut self, limit: usize) -> StreamEnd<'a, T, B> {
        self.pipeline.limit = limit;
        StreamEnd {
            pipeline: self.pipeline,
        }
    }

    /// Number of registered stages
    pub fn stage_count(&self) -> usize {
        self.pipeline.stages.len()
    }

    /// Run the pipeline and return the transformed accepted elements.
    ///
    /// The pipeline is consumed, so it runs at most once:
    ///
    /// ```compile_fail
    /// let data = [1, 2, 2];
    /// let flow = seq_stream::stream(&data).distinct(|v| i64::from(*v));
    /// let first = flow.collect();
    /// let second = flow.collect();
    /// ```
    pub fn collect(self) -> Vec<B> {
        self.pipeline.execute().0
    }

    /// Run the pipeline and also return its execution counters
    pub fn collect_with_stats(self) -> (Vec<B>, CollectStats) {
        self.pipeline.execute()
    }
}

/// A pipeline with its bound fixed; only the terminal calls remain
#[derive(Debug)]
pub struct StreamEnd<'a, T, B> {
    pipeline: Pipeline<'a, T, B>,
}

impl<T, B> StreamEnd<'_, T, B> {
    /// Run the pipeline and return the transformed accepted elements
    pub fn collect(self) -> Vec<B> {
        self.pipeline.execute().0
    }

    /// Run the pipeline and also return its execution counters
    pub fn collect_with_stats(self) -> (Vec<B>, CollectStats) {
        self.pipeline.execute()
    }
}
