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
use std::collections::BTreeSet;
use std::collections::HashSet;
use std::fmt;
use std::hash::BuildHasher;

use crate::countmin::CountMinSketch;
use crate::countmin::SketchConfig;
use crate::error::Error;
use crate::hash::SketchKey;
use crate::topk::Row;
use crate::topk::TopKTracker;

/// Membership oracle for words that must not be counted.
pub trait StopWords {
    /// Returns true if `item` is a stop word.
    fn contains(&self, item: &str) -> bool;
}

impl<S: BuildHasher> StopWords for HashSet<String, S> {
    fn contains(&self, item: &str) -> bool {
        HashSet::contains(self, item)
    }
}

impl StopWords for BTreeSet<String> {
    fn contains(&self, item: &str) -> bool {
        BTreeSet::contains(self, item)
    }
}

impl StopWords for [&str] {
    fn contains(&self, item: &str) -> bool {
        self.iter().any(|word| *word == item)
    }
}

impl<T: StopWords + ?Sized> StopWords for &T {
    fn contains(&self, item: &str) -> bool {
        (**self).contains(item)
    }
}

/// Sketch dimensions plus the Top-K bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamConfig {
    sketch: SketchConfig,
    k: usize,
}

impl StreamConfig {
    /// Creates a config tracking the `k` most frequent items.
    pub fn new(sketch: SketchConfig, k: usize) -> Self {
        Self { sketch, k }
    }

    /// Returns the sketch config.
    pub fn sketch(&self) -> &SketchConfig {
        &self.sketch
    }

    /// Returns the Top-K bound.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Checks the sketch dimensions and that `k` is at least 1.
    pub fn validate(&self) -> Result<(), Error> {
        self.sketch.validate()?;
        if self.k == 0 {
            return Err(Error::invalid_argument("k must be at least 1").with_context("k", self.k));
        }
        Ok(())
    }
}

/// A Count-Min sketch and the Top-K view kept in step with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamState<T> {
    sketch: CountMinSketch,
    tracker: TopKTracker<T>,
}

impl<T> StreamState<T> {
    /// Creates an empty state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the config fails [`StreamConfig::validate`].
    pub fn new(config: &StreamConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            sketch: CountMinSketch::new(config.sketch())?,
            tracker: TopKTracker::new(config.k())?,
        })
    }

    /// Restores a state from a sketch checkpoint.
    ///
    /// The checkpoint only holds the sketch, so the Top-K view starts empty and
    /// refills as items arrive.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` for a malformed checkpoint and
    /// `InvalidArgument` if `k` is zero.
    pub fn from_checkpoint(bytes: &[u8], k: usize) -> Result<Self, Error> {
        let tracker = TopKTracker::new(k)?;
        let sketch = CountMinSketch::deserialize(bytes)?;
        Ok(Self { sketch, tracker })
    }

    /// Serializes the sketch for a checkpoint.
    pub fn to_checkpoint(&self) -> Vec<u8> {
        self.sketch.serialize()
    }

    /// Returns the sketch.
    pub fn sketch(&self) -> &CountMinSketch {
        &self.sketch
    }

    /// Returns the Top-K tracker.
    pub fn tracker(&self) -> &TopKTracker<T> {
        &self.tracker
    }

    /// Returns the number of items observed.
    pub fn total_weight(&self) -> u64 {
        self.sketch.total_weight()
    }

    /// Returns the estimated count of `item`.
    pub fn estimate<K: SketchKey>(&self, item: K) -> u64 {
        self.sketch.estimate(item)
    }

    /// Transaction hook for orchestrators that batch updates; state is
    /// unaffected.
    pub fn begin_commit(&mut self, txid: u64) {
        tracing::trace!(txid, "begin commit");
    }

    /// Transaction hook for orchestrators that batch updates; state is
    /// unaffected.
    pub fn commit(&mut self, txid: u64) {
        tracing::trace!(txid, total_weight = self.sketch.total_weight(), "commit");
    }
}

impl<T: SketchKey> StreamState<T> {
    /// Counts one occurrence of `item` and updates the Top-K view.
    pub fn observe<Q>(&mut self, item: &Q)
    where
        T: Borrow<Q>,
        Q: SketchKey + PartialEq + ToOwned<Owned = T> + ?Sized,
    {
        self.sketch.update(item);
        self.tracker.observe(item, &self.sketch);
    }
}

impl<T: SketchKey + Clone> StreamState<T> {
    /// Returns the Top-K members with their estimates, highest first.
    pub fn top_k(&self) -> Vec<Row<T>> {
        self.tracker.snapshot(&self.sketch)
    }

    /// Renders the Top-K members as space separated `item(count)` pairs,
    /// highest first.
    pub fn render_top_k(&self) -> String
    where
        T: fmt::Display,
    {
        self.top_k()
            .iter()
            .map(|row| row.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<T: SketchKey + Clone + PartialEq> StreamState<T> {
    /// Adds the counts of `other` and offers its Top-K members to this view.
    ///
    /// # Errors
    ///
    /// Returns `IncompatibleMerge` and leaves this state unchanged if the
    /// sketches differ in depth, width or hash coefficients.
    pub fn merge(&mut self, other: &StreamState<T>) -> Result<(), Error> {
        self.sketch.merge(&other.sketch)?;
        for member in other.tracker.members() {
            self.tracker.observe(member, &self.sketch);
        }
        tracing::debug!(
            total_weight = self.sketch.total_weight(),
            members = self.tracker.len(),
            "merged stream state"
        );
        Ok(())
    }
}

impl StreamState<String> {
    /// Counts `item` unless it is a stop word. Returns whether it was counted.
    pub fn observe_filtered<S: StopWords + ?Sized>(&mut self, item: &str, stop_words: &S) -> bool {
        if stop_words.contains(item) {
            return false;
        }
        self.observe(item);
        true
    }

    /// Counts every item that is not a stop word. Returns how many were counted.
    pub fn observe_all<'a, I, S>(&mut self, items: I, stop_words: &S) -> usize
    where
        I: IntoIterator<Item = &'a str>,
        S: StopWords + ?Sized,
    {
        items
            .into_iter()
            .filter(|item| self.observe_filtered(item, stop_words))
            .count()
    }
}
