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

use crate::error::Error;
use crate::hash::check_dimensions;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0;

/// Dimensions and hash seed of a Count-Min sketch.
///
/// Use [`SketchConfig::new`] for explicit dimensions or
/// [`SketchConfig::with_accuracy`] to derive them from error targets. The values
/// are checked again by [`SketchConfig::validate`] when a sketch is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SketchConfig {
    depth: u32,
    width: u32,
    seed: u64,
}

impl SketchConfig {
    /// Creates a config with `depth` rows of `width` buckets and the default seed.
    pub fn new(depth: u32, width: u32) -> Self {
        Self {
            depth,
            width,
            seed: DEFAULT_SEED,
        }
    }

    /// Derives dimensions from a relative error and a confidence level.
    ///
    /// `width = ceil(2 / epsilon)` and `depth = ceil(-log2(1 - confidence))`,
    /// with at least one row.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` unless `epsilon` is finite and positive and
    /// `0 <= confidence < 1`, or if the derived width is too large.
    ///
    /// # Examples
    ///
    /// ```
    /// # use streamfreq::countmin::SketchConfig;
    /// let config = SketchConfig::with_accuracy(0.01, 0.99).unwrap();
    /// assert_eq!(config.width(), 200);
    /// assert_eq!(config.depth(), 7);
    /// ```
    pub fn with_accuracy(epsilon: f64, confidence: f64) -> Result<Self, Error> {
        let width = Self::suggest_width(epsilon)?;
        let depth = Self::suggest_depth(confidence)?;
        Ok(Self::new(depth, width))
    }

    /// Returns the number of buckets per row needed for `epsilon` relative error.
    pub fn suggest_width(epsilon: f64) -> Result<u32, Error> {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(Error::invalid_argument("epsilon must be finite and positive")
                .with_context("epsilon", epsilon));
        }
        let width = (2.0 / epsilon).ceil();
        if width > i32::MAX as f64 {
            return Err(Error::invalid_argument("epsilon is too small")
                .with_context("epsilon", epsilon));
        }
        Ok((width as u32).max(1))
    }

    /// Returns the number of rows needed to reach `confidence`.
    pub fn suggest_depth(confidence: f64) -> Result<u32, Error> {
        if !(0.0..1.0).contains(&confidence) {
            return Err(Error::invalid_argument("confidence must be in [0, 1)")
                .with_context("confidence", confidence));
        }
        let depth = (-(1.0 - confidence).log2()).ceil().max(1.0);
        Ok(depth as u32)
    }

    /// Sets the seed from which the hash coefficients are derived.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the number of rows.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns the number of buckets per row.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns `2 / width`.
    pub fn relative_error(&self) -> f64 {
        relative_error(self.width)
    }

    /// Returns `1 - 2^-depth`.
    pub fn confidence(&self) -> f64 {
        confidence(self.depth)
    }

    /// Checks that the dimensions describe a sketch that can be allocated and
    /// serialized.
    pub fn validate(&self) -> Result<(), Error> {
        check_dimensions(self.depth, self.width)
    }
}

pub(super) fn relative_error(width: u32) -> f64 {
    2.0 / f64::from(width)
}

pub(super) fn confidence(depth: u32) -> f64 {
    1.0 - 0.5f64.powi(depth.min(i32::MAX as u32) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_with_accuracy() {
        let config = SketchConfig::with_accuracy(0.001, 0.999).unwrap();
        assert_eq!(config.width(), 2000);
        assert_eq!(config.depth(), 10);
        assert_eq!(config.seed(), DEFAULT_SEED);

        let config = SketchConfig::with_accuracy(0.5, 0.0).unwrap();
        assert_eq!(config.width(), 4);
        assert_eq!(config.depth(), 1);

        let config = SketchConfig::with_accuracy(3.0, 0.75).unwrap();
        assert_eq!(config.width(), 1);
        assert_eq!(config.depth(), 2);
    }

    #[test]
    fn test_with_accuracy_rejects_out_of_range() {
        for (epsilon, confidence) in [
            (0.0, 0.5),
            (-0.1, 0.5),
            (f64::NAN, 0.5),
            (f64::INFINITY, 0.5),
            (1e-12, 0.5),
            (0.1, 1.0),
            (0.1, -0.01),
            (0.1, f64::NAN),
        ] {
            let err = SketchConfig::with_accuracy(epsilon, confidence).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn test_derived_parameters() {
        let config = SketchConfig::new(10, 2000);
        assert_eq!(config.relative_error(), 0.001);
        assert_eq!(config.confidence(), 1.0 - 1.0 / 1024.0);
    }

    #[test]
    fn test_validate() {
        assert!(SketchConfig::new(1, 1).validate().is_ok());
        assert!(SketchConfig::new(0, 10).validate().is_err());
        assert!(SketchConfig::new(10, 0).validate().is_err());
        assert!(SketchConfig::new(1, i32::MAX as u32 + 1).validate().is_err());
        let err = SketchConfig::new(1 << 16, 1 << 16).validate().unwrap_err();
        assert_eq!(err.message(), "sketch table is too large");
    }
}
