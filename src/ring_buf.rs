use crate::error::RingBufError;
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::iter::FusedIterator;

/// Fixed-capacity ring buffer. Position 0 is the newest element; once full,
/// every insertion evicts the oldest one.
///
/// `head` is the slot the next `put` writes to, so logical position `i`
/// lives at physical slot `head - 1 - i` (mod capacity).
#[derive(Debug, Clone)]
pub struct RingBuf<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    len: usize,
}

impl<T> RingBuf<T> {
    pub fn new(capacity: usize) -> Result<Self, RingBufError> {
        if capacity == 0 {
            return Err(RingBufError::InvalidCapacity(capacity));
        }
        let slots = (0..capacity).map(|_| None).collect::<Vec<_>>().into_boxed_slice();
        Ok(Self { slots, head: 0, len: 0 })
    }

    pub fn capacity(&self) -> usize { self.slots.len() }
    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn is_full(&self) -> bool { self.len == self.capacity() }

    /// Push `value` as the new front, evicting the back if full.
    pub fn put(&mut self, value: T) {
        self.slots[self.head] = Some(value);
        self.advance_head();
    }

    /// Insert `value` at logical position `depth`, pushing that element and
    /// everything older one step toward the back.
    ///
    /// Only the `depth` newer elements move, so this is O(depth). When the
    /// buffer is full the oldest element is dropped. `insert(0, v)` is `put(v)`.
    pub fn insert(&mut self, depth: usize, value: T) -> Result<(), RingBufError> {
        if depth >= self.capacity() || depth > self.len {
            return Err(RingBufError::InvalidDepth {
                depth,
                len: self.len,
                capacity: self.capacity(),
            });
        }

        // Walk down from the free (or oldest) slot at head, sliding each newer
        // element one slot up. The slot left behind receives the new value.
        let mut dst = self.head;
        for _ in 0..depth {
            let src = self.wrap_back(dst);
            self.slots[dst] = self.slots[src].take();
            dst = src;
        }
        self.slots[dst] = Some(value);
        self.advance_head();
        Ok(())
    }

    /// Newest element.
    pub fn top(&self) -> Option<&T> {
        self.get(0)
    }

    /// Element at logical position `i` (0 = newest).
    pub fn get(&self, i: usize) -> Option<&T> {
        if i >= self.len {
            return None;
        }
        self.slots[self.raw_idx(i)].as_ref()
    }

    /// Front-to-back iterator.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { ring: self, front: 0, back: self.len }
    }

    /// Owned front-to-back copy of the live contents.
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Physical slot layout, front slot marked `*`, unused slots `_`.
    pub fn raw_dump(&self) -> String
    where
        T: fmt::Display,
    {
        let front = if self.is_empty() { None } else { Some(self.raw_idx(0)) };
        let mut out = String::from("[ ");
        for (i, slot) in self.slots.iter().enumerate() {
            if Some(i) == front {
                out.push('*');
            }
            match slot {
                Some(v) => out.push_str(&format!("{} ", v)),
                None    => out.push_str("_ "),
            }
        }
        out.push(']');
        out
    }

    fn advance_head(&mut self) {
        self.head = (self.head + 1) % self.capacity();
        self.len = (self.len + 1).min(self.capacity());
    }

    fn wrap_back(&self, idx: usize) -> usize {
        if idx == 0 { self.capacity() - 1 } else { idx - 1 }
    }

    fn raw_idx(&self, i: usize) -> usize {
        let cap = self.capacity();
        (self.head + cap - 1 - i) % cap
    }
}

pub struct Iter<'a, T> {
    ring: &'a RingBuf<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let item = self.ring.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.ring.get(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a RingBuf<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// `{ 4, 3, 2 }`, newest first. Empty renders as `{ }`.
impl<T: fmt::Display> fmt::Display for RingBuf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        if !self.is_empty() {
            write!(f, " ")?;
        }
        write!(f, "}}")
    }
}

impl<T: Serialize> Serialize for RingBuf<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}


#[cfg(all(test, not(miri)))]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Put(i64),
        Insert(usize, i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<i64>().prop_map(Op::Put),
            (0usize..16, any::<i64>()).prop_map(|(d, v)| Op::Insert(d, v)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_matches_list_model(cap in 1usize..12, ops in prop::collection::vec(op(), 0..80)) {
            let mut rb = RingBuf::new(cap).unwrap();
            let mut model: Vec<i64> = Vec::new();
            for op in ops {
                match op {
                    Op::Put(v) => {
                        rb.put(v);
                        model.insert(0, v);
                    }
                    Op::Insert(d, v) => {
                        let ok = d < cap && d <= model.len();
                        prop_assert_eq!(rb.insert(d, v).is_ok(), ok);
                        if ok {
                            model.insert(d, v);
                        }
                    }
                }
                model.truncate(cap);
                prop_assert!(rb.len() <= rb.capacity());
                prop_assert_eq!(rb.snapshot(), model.clone());
            }
        }

        #[test]
        fn prop_puts_keep_last_n(cap in 1usize..20, values in prop::collection::vec(any::<i64>(), 0..100)) {
            let mut rb = RingBuf::new(cap).unwrap();
            for &v in &values {
                rb.put(v);
            }
            let expected: Vec<i64> = values.iter().rev().take(cap).copied().collect();
            prop_assert_eq!(rb.snapshot(), expected);
        }

        #[test]
        fn prop_snapshot_is_idempotent(cap in 1usize..10, n in 0i64..40) {
            let mut rb = RingBuf::new(cap).unwrap();
            for i in 0..n {
                rb.put(i);
            }
            prop_assert_eq!(rb.snapshot(), rb.snapshot());
        }
    }
}
