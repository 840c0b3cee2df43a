/// Plain list standing in for a ring buffer: newest at index 0, every
/// operation a straight `Vec` edit. Slow, but obviously correct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceList<T> {
    items: Vec<T>,
}

impl<T> ReferenceList<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn prepend(&mut self, value: T) {
        self.items.insert(0, value);
    }

    /// List insert. Depths past the end append, like a Python `list.insert`.
    pub fn insert(&mut self, depth: usize, value: T) {
        let depth = depth.min(self.items.len());
        self.items.insert(depth, value);
    }

    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn as_slice(&self) -> &[T] { &self.items }
}

impl ReferenceList<i64> {
    /// Bump the entry at `idx` by one. Used to check that a harness notices
    /// a wrong model. Returns false if `idx` is out of range.
    pub fn corrupt_at(&mut self, idx: usize) -> bool {
        match self.items.get_mut(idx) {
            Some(v) => { *v += 1; true }
            None    => false,
        }
    }
}
