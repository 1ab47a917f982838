use crate::error::Result;
use crate::list::SimpleList;
use parking_lot::RwLock;
use std::sync::Arc;

/// A [`SimpleList`] behind a reader/writer lock.
///
/// Every call holds the lock only for its own duration; sequences such as
/// "check size then add" are not atomic. Clones share the same list.
#[derive(Debug)]
pub struct SyncList<T> {
    inner: Arc<RwLock<SimpleList<T>>>,
}

impl<T> Clone for SyncList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SyncList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::from(SimpleList::new())
    }

    /// Copy `slice` into a new list
    pub fn from_slice(slice: &[T]) -> Self
    where
        T: Clone,
    {
        Self::from(SimpleList::from_slice(slice))
    }

    /// Add a value at the end
    pub fn add(&self, value: T) {
        self.inner.write().add(value);
    }

    /// Add every value from `values` at the end, in order
    pub fn append<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.inner.write().append(values);
    }

    /// Remove and return the value at `index`
    pub fn remove(&self, index: usize) -> Result<T> {
        self.inner.write().remove(index)
    }

    /// Get a copy of the value at `index`
    pub fn get(&self, index: usize) -> Result<T>
    where
        T: Clone,
    {
        self.inner.read().get(index).cloned()
    }

    /// Replace the value at `index`
    pub fn set(&self, index: usize, value: T) -> Result<()> {
        self.inner.write().set(index, value)
    }

    /// Number of values in the list
    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    /// Whether the list holds no values
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Drop every value
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Whether any element equals `value` under `equals`
    pub fn contains<F>(&self, value: &T, equals: F) -> bool
    where
        F: FnMut(&T, &T) -> bool,
    {
        self.inner.read().contains(value, equals)
    }

    /// Sort in place under the write lock; see [`SimpleList::sort`]
    pub fn sort<F>(&self, less: F)
    where
        F: FnMut(usize, usize, &[T]) -> bool,
    {
        self.inner.write().sort(less);
    }

    /// Copy the contents into a new `Vec`
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.read().to_vec()
    }

    /// Snapshot the contents into a plain list, e.g. to feed a stream
    pub fn to_simple_list(&self) -> SimpleList<T>
    where
        T: Clone,
    {
        self.inner.read().clone()
    }
}

impl<T> Default for SyncList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<SimpleList<T>> for SyncList<T> {
    fn from(list: SimpleList<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(list)),
        }
    }
}

impl<T> From<Vec<T>> for SyncList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from(SimpleList::from(items))
    }
}
