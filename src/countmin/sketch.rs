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

use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::countmin::config;
use crate::countmin::config::SketchConfig;
use crate::countmin::serialization::*;
use crate::error::Error;
use crate::hash::HashFamily;
use crate::hash::PRIME_MODULUS;
use crate::hash::SketchKey;

/// Count-Min sketch for estimating item frequencies.
///
/// Counters are stored row-major in a single buffer of `depth * width` entries.
/// They only grow, and saturate at `i64::MAX` so every state fits the signed
/// checkpoint format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMinSketch {
    hash_family: HashFamily,
    total_weight: u64,
    counts: Vec<u64>,
}

impl CountMinSketch {
    /// Creates an empty sketch.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the config fails [`SketchConfig::validate`].
    pub fn new(config: &SketchConfig) -> Result<Self, Error> {
        config.validate()?;
        let hash_family = HashFamily::new(config.depth(), config.width(), config.seed())?;
        let counts = vec![0; config.depth() as usize * config.width() as usize];
        tracing::debug!(
            depth = config.depth(),
            width = config.width(),
            seed = config.seed(),
            "created count-min sketch"
        );
        Ok(Self {
            hash_family,
            total_weight: 0,
            counts,
        })
    }

    /// Returns the number of rows.
    pub fn depth(&self) -> u32 {
        self.hash_family.depth()
    }

    /// Returns the number of buckets per row.
    pub fn width(&self) -> u32 {
        self.hash_family.width()
    }

    /// Returns the row hash coefficients.
    pub fn hash_family(&self) -> &HashFamily {
        &self.hash_family
    }

    /// Returns the sum of all counts added to the sketch.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Returns true if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.total_weight == 0
    }

    /// Returns the relative error `2 / width` of estimates.
    pub fn relative_error(&self) -> f64 {
        config::relative_error(self.width())
    }

    /// Returns the probability `1 - 2^-depth` that an estimate is within
    /// `relative_error() * total_weight()` of the true count.
    pub fn confidence(&self) -> f64 {
        config::confidence(self.depth())
    }

    /// Returns the counters of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= depth`.
    pub fn row(&self, row: usize) -> &[u64] {
        let width = self.width() as usize;
        &self.counts[row * width..(row + 1) * width]
    }

    /// Counts one occurrence of `item`.
    pub fn update<K: SketchKey>(&mut self, item: K) {
        self.add(&item, 1);
    }

    /// Counts `count` occurrences of `item`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` and leaves the sketch unchanged if `count` is
    /// negative.
    pub fn update_with_count<K: SketchKey>(&mut self, item: K, count: i64) -> Result<(), Error> {
        if count < 0 {
            return Err(Error::invalid_argument("count may not be negative")
                .with_context("count", count));
        }
        self.add(&item, count as u64);
        Ok(())
    }

    fn add<K: SketchKey>(&mut self, item: &K, count: u64) {
        let width = self.width() as usize;
        for row in 0..self.depth() as usize {
            let bucket = item.bucket(&self.hash_family, row);
            let counter = &mut self.counts[row * width + bucket];
            *counter = add_count(*counter, count);
        }
        self.total_weight = add_count(self.total_weight, count);
    }

    /// Returns the estimated count of `item`.
    ///
    /// The estimate is never below the true count, and is within
    /// `relative_error() * total_weight()` of it with probability `confidence()`.
    pub fn estimate<K: SketchKey>(&self, item: K) -> u64 {
        let width = self.width() as usize;
        self.hash_family
            .buckets(&item)
            .enumerate()
            .map(|(row, bucket)| self.counts[row * width + bucket])
            .min()
            .unwrap_or(0)
    }

    /// Returns an upper bound of the true count of `item` that holds with
    /// probability `confidence()`.
    pub fn upper_bound<K: SketchKey>(&self, item: K) -> u64 {
        self.estimate(item).saturating_add(self.max_error())
    }

    /// Returns a lower bound of the true count of `item` that holds with
    /// probability `confidence()`.
    pub fn lower_bound<K: SketchKey>(&self, item: K) -> u64 {
        self.estimate(item).saturating_sub(self.max_error())
    }

    fn max_error(&self) -> u64 {
        (self.relative_error() * self.total_weight as f64).ceil() as u64
    }

    /// Returns true if `other` has the same dimensions and hash coefficients,
    /// so the two sketches can be merged.
    pub fn is_compatible(&self, other: &CountMinSketch) -> bool {
        self.hash_family == other.hash_family
    }

    fn check_compatible(&self, other: &CountMinSketch) -> Result<(), Error> {
        let mismatch = if self.depth() != other.depth() {
            Some(("depth", self.depth().to_string(), other.depth().to_string()))
        } else if self.width() != other.width() {
            Some(("width", self.width().to_string(), other.width().to_string()))
        } else if self.hash_family != other.hash_family {
            Some((
                "hash coefficients",
                format!("{:?}", self.hash_family.coefficients()),
                format!("{:?}", other.hash_family.coefficients()),
            ))
        } else {
            None
        };
        match mismatch {
            None => Ok(()),
            Some((what, expected, found)) => {
                tracing::debug!(what, %expected, %found, "rejected count-min merge");
                Err(
                    Error::incompatible_merge(format!("cannot merge sketches of different {what}"))
                        .with_context("expected", expected)
                        .with_context("found", found),
                )
            }
        }
    }

    /// Adds the counts of `other` into this sketch.
    ///
    /// # Errors
    ///
    /// Returns `IncompatibleMerge` and leaves this sketch unchanged if the
    /// sketches differ in depth, width or hash coefficients.
    pub fn merge(&mut self, other: &CountMinSketch) -> Result<(), Error> {
        self.check_compatible(other)?;
        for (count, &theirs) in self.counts.iter_mut().zip(&other.counts) {
            *count = add_count(*count, theirs);
        }
        self.total_weight = add_count(self.total_weight, other.total_weight);
        Ok(())
    }

    /// Builds the sketch of the combined stream of `sketches`.
    ///
    /// The operands are only read. The result does not depend on their order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `sketches` is empty and `IncompatibleMerge`
    /// if any two operands differ in depth, width or hash coefficients.
    pub fn merge_all(sketches: &[&CountMinSketch]) -> Result<CountMinSketch, Error> {
        let (first, rest) = sketches
            .split_first()
            .ok_or_else(|| Error::invalid_argument("no sketches to merge"))?;
        for other in rest {
            first.check_compatible(other)?;
        }
        let mut merged = (*first).clone();
        for other in rest {
            merged.merge(other)?;
        }
        tracing::debug!(operands = sketches.len(), "merged count-min sketches");
        Ok(merged)
    }

    /// Zeroes all counters, keeping dimensions and hash coefficients.
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.total_weight = 0;
    }

    /// Serializes this sketch into a byte vector.
    ///
    /// See the module documentation for the layout.
    pub fn serialize(&self) -> Vec<u8> {
        let depth = self.depth() as usize;
        let width = self.width() as usize;
        let size = serialized_size_bytes(depth, width).unwrap_or(0);
        let mut bytes = SketchBytes::with_capacity(size);

        bytes.write_i64_be(self.total_weight as i64);
        bytes.write_i32_be(depth as i32);
        bytes.write_i32_be(width as i32);
        for (row, &coefficient) in self.hash_family.coefficients().iter().enumerate() {
            bytes.write_i64_be(coefficient);
            for &count in self.row(row) {
                bytes.write_i64_be(count as i64);
            }
        }
        bytes.into_bytes()
    }

    /// Deserializes a sketch from bytes.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if the buffer is truncated, has trailing
    /// bytes, or holds values no sketch can produce.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        fn make_error(tag: &'static str) -> impl FnOnce(std::io::Error) -> Error {
            move |err| Error::insufficient_data(tag).set_source(err)
        }

        let mut cursor = SketchSlice::new(bytes);
        let total_weight = cursor.read_i64_be().map_err(make_error("size"))?;
        let depth = cursor.read_i32_be().map_err(make_error("depth"))?;
        let width = cursor.read_i32_be().map_err(make_error("width"))?;

        if total_weight < 0 {
            return Err(Error::malformed("size must not be negative")
                .with_context("size", total_weight));
        }
        if depth < 1 || width < 1 {
            return Err(Error::malformed("depth and width must be positive")
                .with_context("depth", depth)
                .with_context("width", width));
        }

        let depth = depth as usize;
        let width = width as usize;
        let expected = serialized_size_bytes(depth, width)
            .ok_or_else(|| Error::malformed("sketch dimensions overflow"))?;
        if bytes.len() != expected {
            return Err(Error::malformed("buffer length does not match dimensions")
                .with_context("expected", expected)
                .with_context("found", bytes.len()));
        }

        let mut coefficients = Vec::with_capacity(depth);
        let mut counts = Vec::with_capacity(depth * width);
        for row in 0..depth {
            let coefficient = cursor.read_i64_be().map_err(make_error("coefficient"))?;
            if !(0..PRIME_MODULUS).contains(&coefficient) {
                return Err(Error::malformed("hash coefficient out of range")
                    .with_context("row", row)
                    .with_context("coefficient", coefficient));
            }
            coefficients.push(coefficient);
            for _ in 0..width {
                let count = cursor.read_i64_be().map_err(make_error("counter"))?;
                if count < 0 {
                    return Err(Error::malformed("counter must not be negative")
                        .with_context("row", row)
                        .with_context("counter", count));
                }
                counts.push(count as u64);
            }
        }
        debug_assert_eq!(cursor.remaining(), 0);

        tracing::debug!(depth, width, total_weight, "restored count-min sketch");
        Ok(Self {
            hash_family: HashFamily::from_parts(coefficients, width as u32),
            total_weight: total_weight as u64,
            counts,
        })
    }
}

fn add_count(count: u64, delta: u64) -> u64 {
    count.saturating_add(delta).min(MAX_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sketch(depth: u32, width: u32, seed: u64) -> CountMinSketch {
        CountMinSketch::new(&SketchConfig::new(depth, width).with_seed(seed)).unwrap()
    }

    #[test]
    fn test_empty_sketch() {
        let sketch = sketch(3, 16, 1);
        assert!(sketch.is_empty());
        assert_eq!(sketch.total_weight(), 0);
        assert_eq!(sketch.estimate("anything"), 0);
        assert_eq!(sketch.counts.len(), 48);
    }

    #[test]
    fn test_every_row_sums_to_total_weight() {
        let mut sketch = sketch(4, 8, 3);
        for i in 0..100i64 {
            sketch.update_with_count(i, i % 5).unwrap();
        }
        for row in 0..4 {
            assert_eq!(sketch.row(row).iter().sum::<u64>(), sketch.total_weight());
        }
    }

    #[test]
    fn test_zero_count_is_noop() {
        let mut sketch = sketch(2, 8, 3);
        sketch.update_with_count("a", 0).unwrap();
        assert!(sketch.is_empty());
        assert_eq!(sketch.estimate("a"), 0);
    }

    #[test]
    fn test_negative_count_leaves_state_unchanged() {
        let mut sketch = sketch(3, 32, 5);
        sketch.update("a");
        let before = sketch.clone();
        let err = sketch.update_with_count("a", -1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(sketch, before);
    }

    #[test]
    fn test_counters_saturate() {
        let mut sketch = sketch(1, 1, 0);
        sketch.update_with_count(1, i64::MAX).unwrap();
        sketch.update_with_count(2, i64::MAX).unwrap();
        assert_eq!(sketch.estimate(1), MAX_COUNT);
        assert_eq!(sketch.total_weight(), MAX_COUNT);
        let restored = CountMinSketch::deserialize(&sketch.serialize()).unwrap();
        assert_eq!(restored, sketch);
    }

    #[test]
    fn test_bounds() {
        let mut sketch = sketch(5, 100, 9);
        for i in 0..1000u64 {
            sketch.update(i);
        }
        // 2 / 100 * 1000
        assert_eq!(sketch.max_error(), 20);
        let estimate = sketch.estimate(7u64);
        assert_eq!(sketch.upper_bound(7u64), estimate + 20);
        assert_eq!(sketch.lower_bound(7u64), estimate.saturating_sub(20));
    }

    #[test]
    fn test_reset_keeps_coefficients() {
        let mut sketch = sketch(3, 10, 42);
        let family = sketch.hash_family().clone();
        sketch.update("a");
        sketch.reset();
        assert!(sketch.is_empty());
        assert_eq!(sketch.estimate("a"), 0);
        assert_eq!(sketch.hash_family(), &family);
    }
}
