use std::collections::HashSet;
use std::fmt;

/// Side-effecting visit of `(index, element)`
pub type ObserveFn<'a, T> = Box<dyn FnMut(usize, &T) + 'a>;
/// Maps an element to its 64-bit dedup key
pub type KeyFn<'a, T> = Box<dyn FnMut(&T) -> i64 + 'a>;
/// Returns `false` for elements that should be dropped
pub type PredicateFn<'a, T> = Box<dyn FnMut(&T) -> bool + 'a>;

/// Outcome of running one stage against one element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The element may continue to the next stage
    Pass,
    /// The element is dropped; later stages are skipped for it
    Reject,
}

/// One registered operation of a stream pipeline.
///
/// Stages are evaluated per element in registration order. A `Distinct`
/// stage owns its own key-set, so two dedup stages never share state.
pub enum Stage<'a, T> {
    /// Sees every element that reaches it, never rejects
    Observer(ObserveFn<'a, T>),
    /// Rejects elements whose key this stage has already recorded
    Distinct { key: KeyFn<'a, T>, seen: HashSet<i64> },
    /// Rejects elements for which the predicate is false
    Predicate(PredicateFn<'a, T>),
}

impl<'a, T> Stage<'a, T> {
    /// Wrap `f` as an observer stage
    pub fn observer<F>(f: F) -> Self
    where
        F: FnMut(usize, &T) + 'a,
    {
        Stage::Observer(Box::new(f))
    }

    /// Wrap `key` as a dedup stage with an empty key-set
    pub fn distinct<F>(key: F) -> Self
    where
        F: FnMut(&T) -> i64 + 'a,
    {
        Stage::Distinct {
            key: Box::new(key),
            seen: HashSet::new(),
        }
    }

    /// Wrap `f` as a filter stage
    pub fn predicate<F>(f: F) -> Self
    where
        F: FnMut(&T) -> bool + 'a,
    {
        Stage::Predicate(Box::new(f))
    }

    /// Run this stage for the element at `index`.
    ///
    /// A dedup stage records the key of every element it evaluates, even
    /// if a later stage goes on to reject that element.
    pub fn evaluate(&mut self, index: usize, value: &T) -> Verdict {
        match self {
            Stage::Observer(f) => {
                f(index, value);
                Verdict::Pass
            }
            Stage::Distinct { key, seen } => {
                if seen.insert(key(value)) {
                    Verdict::Pass
                } else {
                    Verdict::Reject
                }
            }
            Stage::Predicate(f) => {
                if f(value) {
                    Verdict::Pass
                } else {
                    Verdict::Reject
                }
            }
        }
    }

    /// Get a human-readable name for this stage
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Observer(_) => "observe",
            Stage::Distinct { .. } => "distinct",
            Stage::Predicate(_) => "filter",
        }
    }
}

impl<T> fmt::Debug for Stage<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Distinct { seen, .. } => f
                .debug_struct("Distinct")
                .field("seen", &seen.len())
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}
