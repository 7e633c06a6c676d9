// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::borrow::Borrow;
use std::fmt;

use crate::countmin::CountMinSketch;
use crate::error::Error;
use crate::hash::SketchKey;

/// A Top-K member with its estimated count at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<T> {
    item: T,
    estimate: u64,
}

impl<T> Row<T> {
    /// Returns the item.
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Returns the estimated count.
    pub fn estimate(&self) -> u64 {
        self.estimate
    }

    /// Consumes the row, returning the item.
    pub fn into_item(self) -> T {
        self.item
    }
}

impl<T: fmt::Display> fmt::Display for Row<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.item, self.estimate)
    }
}

/// Bounded set of the (approximately) `k` most frequent keys of a stream.
///
/// Members are kept in insertion order. Ranking is never cached: every decision
/// re-reads the estimates from the sketch passed in. The member with the lowest
/// current estimate is the head; among equal estimates the earliest inserted
/// member is the head. Finding the head at capacity queries the sketch for every
/// member, so each observation costs `k * depth` row hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopKTracker<T> {
    k: usize,
    members: Vec<T>,
}

impl<T> TopKTracker<T> {
    /// Creates an empty tracker holding at most `k` keys.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `k` is zero.
    pub fn new(k: usize) -> Result<Self, Error> {
        if k == 0 {
            return Err(Error::invalid_argument("k must be at least 1").with_context("k", k));
        }
        Ok(Self {
            k,
            members: Vec::new(),
        })
    }

    /// Returns the maximum number of members.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the tracker has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the members in insertion order.
    pub fn members(&self) -> &[T] {
        &self.members
    }

    /// Returns true if `item` is a member.
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position(item).is_some()
    }

    /// Removes all members.
    pub fn clear(&mut self) {
        self.members.clear();
    }

    fn position<Q>(&self, item: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.members.iter().position(|m| m.borrow() == item)
    }
}

impl<T: SketchKey> TopKTracker<T> {
    /// Re-evaluates membership after `sketch` has counted `item`.
    ///
    /// Below capacity, `item` is (re)inserted. At capacity, `item` replaces the
    /// head only if its estimate is strictly greater than the head's; on a tie
    /// the existing member stays. If `item` was already a member other than the
    /// head, its old entry is dropped along with the head, leaving room that the
    /// next distinct key fills.
    pub fn observe<Q>(&mut self, item: &Q, sketch: &CountMinSketch)
    where
        T: Borrow<Q>,
        Q: SketchKey + PartialEq + ToOwned<Owned = T> + ?Sized,
    {
        if self.members.len() < self.k {
            if let Some(pos) = self.position(item) {
                self.members.remove(pos);
            }
            self.members.push(item.to_owned());
            return;
        }

        let Some((head, head_estimate)) = self.head(sketch) else {
            return;
        };
        let new_estimate = sketch.estimate(item);
        if new_estimate <= head_estimate {
            return;
        }

        match self.position(item).filter(|&pos| pos != head) {
            Some(pos) if pos > head => {
                self.members.remove(pos);
                self.members.remove(head);
            }
            Some(pos) => {
                self.members.remove(head);
                self.members.remove(pos);
            }
            None => {
                self.members.remove(head);
            }
        }
        self.members.push(item.to_owned());
        tracing::trace!(new_estimate, head_estimate, "replaced top-k head");
    }

    /// Returns the position and estimate of the lowest ranked member.
    fn head(&self, sketch: &CountMinSketch) -> Option<(usize, u64)> {
        // min_by_key keeps the first of equal minimums
        self.members
            .iter()
            .enumerate()
            .map(|(pos, member)| (pos, sketch.estimate(member)))
            .min_by_key(|&(_, estimate)| estimate)
    }
}

impl<T: SketchKey + Clone> TopKTracker<T> {
    /// Returns every member with its current estimate, highest first.
    ///
    /// Members with equal estimates keep their insertion order.
    pub fn snapshot(&self, sketch: &CountMinSketch) -> Vec<Row<T>> {
        let mut rows: Vec<Row<T>> = self
            .members
            .iter()
            .map(|member| Row {
                item: member.clone(),
                estimate: sketch.estimate(member),
            })
            .collect();
        rows.sort_by(|a, b| b.estimate.cmp(&a.estimate));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countmin::SketchConfig;

    fn sketch() -> CountMinSketch {
        CountMinSketch::new(&SketchConfig::new(8, 4096).with_seed(10)).unwrap()
    }

    fn feed(tracker: &mut TopKTracker<String>, sketch: &mut CountMinSketch, words: &[&str]) {
        for word in words {
            sketch.update(*word);
            tracker.observe(*word, sketch);
        }
    }

    #[test]
    fn test_rejects_zero_k() {
        assert!(TopKTracker::<u64>::new(0).is_err());
    }

    #[test]
    fn test_large_k_allocates_lazily() {
        let tracker = TopKTracker::<String>::new(usize::MAX).unwrap();
        assert_eq!(tracker.k(), usize::MAX);
        assert!(tracker.is_empty());

        let mut sketch = sketch();
        let mut tracker = TopKTracker::new(usize::MAX / 2).unwrap();
        feed(&mut tracker, &mut sketch, &["a", "b", "a"]);
        assert_eq!(tracker.members(), &["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_reinsertion_below_capacity_moves_to_back() {
        let mut sketch = sketch();
        let mut tracker = TopKTracker::new(3).unwrap();
        feed(&mut tracker, &mut sketch, &["a", "b", "a"]);
        assert_eq!(tracker.members(), &["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_tie_keeps_existing_member() {
        let mut sketch = sketch();
        let mut tracker = TopKTracker::new(2).unwrap();
        feed(&mut tracker, &mut sketch, &["a", "b", "c"]);
        assert_eq!(tracker.members(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_higher_estimate_replaces_earliest_head() {
        let mut sketch = sketch();
        let mut tracker = TopKTracker::new(2).unwrap();
        feed(&mut tracker, &mut sketch, &["a", "b", "c", "c"]);
        assert_eq!(tracker.members(), &["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_member_passing_head_drops_both_entries() {
        let mut sketch = sketch();
        let mut tracker = TopKTracker::new(2).unwrap();
        feed(&mut tracker, &mut sketch, &["a", "a", "b", "b", "b"]);
        assert_eq!(tracker.members(), &["b".to_string()]);

        feed(&mut tracker, &mut sketch, &["c"]);
        assert_eq!(tracker.members(), &["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_snapshot_sorted_descending() {
        let mut sketch = sketch();
        let mut tracker = TopKTracker::new(3).unwrap();
        feed(&mut tracker, &mut sketch, &["x", "y", "y", "z", "z", "z", "w"]);
        assert_eq!(tracker.len(), 3);
        let rows = tracker.snapshot(&sketch);
        let rendered: Vec<String> = rows.iter().map(|row| row.to_string()).collect();
        assert_eq!(rendered, vec!["z(3)", "y(2)", "w(1)"]);
    }

    #[test]
    fn test_integer_keys() {
        let mut sketch = sketch();
        let mut tracker = TopKTracker::<u64>::new(1).unwrap();
        for item in [1u64, 2, 2, 3] {
            sketch.update(item);
            tracker.observe(&item, &sketch);
        }
        assert!(tracker.contains(&2));
        assert_eq!(tracker.len(), 1);
    }
}
