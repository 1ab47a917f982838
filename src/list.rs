use crate::error::{PipelineError, Result};
use crate::pipeline::{stream, StreamFlow};

const INITIAL_CAPACITY: usize = 8;

/// A growable ordered list with checked index access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleList<T> {
    items: Vec<T>,
}

impl<T> SimpleList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create an empty list with room for `capacity` values
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Copy `slice` into a new list
    pub fn from_slice(slice: &[T]) -> Self
    where
        T: Clone,
    {
        let mut items = Vec::with_capacity(slice.len() + INITIAL_CAPACITY);
        items.extend_from_slice(slice);
        Self { items }
    }

    /// Add a value at the end
    pub fn add(&mut self, value: T) {
        self.items.push(value);
    }

    /// Add every value from `values` at the end, in order
    pub fn append<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.items.extend(values);
    }

    /// Remove and return the value at `index`, shifting later values left
    pub fn remove(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Borrow the value at `index`
    pub fn get(&self, index: usize) -> Result<&T> {
        let len = self.items.len();
        self.items
            .get(index)
            .ok_or(PipelineError::IndexOutOfBounds { index, len })
    }

    /// Replace the value at `index`
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.check_index(index)?;
        self.items[index] = value;
        Ok(())
    }

    /// Number of values in the list
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Whether the list holds no values
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every value
    pub fn clear(&mut self) {
        self.items = Vec::with_capacity(INITIAL_CAPACITY);
    }

    /// Whether any element equals `value` under `equals`
    pub fn contains<F>(&self, value: &T, mut equals: F) -> bool
    where
        F: FnMut(&T, &T) -> bool,
    {
        self.items.iter().any(|item| equals(item, value))
    }

    /// Sort in place with an index comparator.
    ///
    /// `less(i, j, items)` must report whether `items[i]` orders before
    /// `items[j]`. The sort is not stable.
    pub fn sort<F>(&mut self, mut less: F)
    where
        F: FnMut(usize, usize, &[T]) -> bool,
    {
        let len = self.items.len();
        for root in (0..len / 2).rev() {
            sift_down(&mut self.items, root, len, &mut less);
        }
        for end in (1..len).rev() {
            self.items.swap(0, end);
            sift_down(&mut self.items, 0, end, &mut less);
        }
    }

    /// Copy the contents into a new `Vec`
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.clone()
    }

    /// Borrow the backing slice
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate over the values in order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Start a stream pipeline over the list's elements
    pub fn stream(&self) -> StreamFlow<'_, T, T>
    where
        T: Clone,
    {
        stream(&self.items)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.items.len();
        if index < len {
            Ok(())
        } else {
            Err(PipelineError::IndexOutOfBounds { index, len })
        }
    }
}

// Heap sort driven only by `less` and swaps, so the comparator always sees
// the current arrangement of the backing slice.
fn sift_down<T, F>(items: &mut [T], mut root: usize, end: usize, less: &mut F)
where
    F: FnMut(usize, usize, &[T]) -> bool,
{
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            return;
        }
        if child + 1 < end && less(child, child + 1, &*items) {
            child += 1;
        }
        if !less(root, child, &*items) {
            return;
        }
        items.swap(root, child);
        root = child;
    }
}

impl<T> Default for SimpleList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for SimpleList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for SimpleList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a SimpleList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
