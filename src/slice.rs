//! Free helpers over plain slices.

use std::panic;
use std::thread;
use tracing::trace;

/// Visit every element in order on the calling thread
pub fn range<T, F>(slice: &[T], mut f: F)
where
    F: FnMut(usize, &T),
{
    for (index, value) in slice.iter().enumerate() {
        f(index, value);
    }
}

/// Visit every element from scoped worker threads and wait for all of them.
///
/// Visit order across elements is unspecified. A panic in `f` is resumed on
/// the calling thread once the workers are joined.
pub fn concurrent_range<T, F>(slice: &[T], f: F)
where
    T: Sync,
    F: Fn(usize, &T) + Sync,
{
    if slice.is_empty() {
        return;
    }
    let chunk = chunk_len(slice.len());
    trace!(len = slice.len(), chunk, "concurrent range");

    let f = &f;
    let joined = crossbeam::thread::scope(|scope| {
        for (n, part) in slice.chunks(chunk).enumerate() {
            scope.spawn(move |_| {
                for (offset, value) in part.iter().enumerate() {
                    f(n * chunk + offset, value);
                }
            });
        }
    });
    if let Err(payload) = joined {
        panic::resume_unwind(payload);
    }
}

/// Map every element concurrently, keeping source order in the result
pub fn map<T, B, F>(slice: &[T], f: F) -> Vec<B>
where
    T: Sync,
    B: Send,
    F: Fn(usize, &T) -> B + Sync,
{
    if slice.is_empty() {
        return Vec::new();
    }
    let chunk = chunk_len(slice.len());
    trace!(len = slice.len(), chunk, "concurrent map");

    let f = &f;
    let joined = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = slice
            .chunks(chunk)
            .enumerate()
            .map(|(n, part)| {
                scope.spawn(move |_| {
                    part.iter()
                        .enumerate()
                        .map(|(offset, value)| f(n * chunk + offset, value))
                        .collect::<Vec<B>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Vec<_>>()
    });

    let parts = joined.unwrap_or_else(|payload| panic::resume_unwind(payload));
    let mut result = Vec::with_capacity(slice.len());
    for part in parts {
        match part {
            Ok(values) => result.extend(values),
            Err(payload) => panic::resume_unwind(payload),
        }
    }
    result
}

/// Concatenate nested vectors in order
pub fn flat<T>(slices: Vec<Vec<T>>) -> Vec<T> {
    slices.into_iter().flatten().collect()
}

fn chunk_len(len: usize) -> usize {
    let workers = thread::available_parallelism().map_or(1, |n| n.get());
    ((len + workers - 1) / workers).max(1)
}
