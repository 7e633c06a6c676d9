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

//! Count-Min sketch implementation for frequency estimation.
//!
//! The Count-Min sketch provides approximate frequency counts for streaming data
//! with configurable relative error and confidence bounds. Estimates never
//! undercount; with probability `confidence() = 1 - 2^-depth` they overcount by at
//! most `relative_error() * total_weight()`, where `relative_error() = 2 / width`.
//!
//! # Usage
//!
//! ```rust
//! use streamfreq::countmin::CountMinSketch;
//! use streamfreq::countmin::SketchConfig;
//!
//! let mut sketch = CountMinSketch::new(&SketchConfig::new(5, 256).with_seed(7)).unwrap();
//!
//! sketch.update("apple");
//! sketch.update_with_count("banana", 3).unwrap();
//!
//! let banana = sketch.estimate("banana");
//! assert!(banana >= 3);
//!
//! let upper = sketch.upper_bound("banana");
//! assert!(upper >= banana);
//! ```
//!
//! # Configuration Helpers
//!
//! ```rust
//! use streamfreq::countmin::SketchConfig;
//!
//! let config = SketchConfig::with_accuracy(0.001, 0.999).unwrap();
//! assert_eq!(config.width(), 2000);
//! assert_eq!(config.depth(), 10);
//! ```
//!
//! # Merging and Checkpoints
//!
//! ```rust
//! use streamfreq::countmin::CountMinSketch;
//! use streamfreq::countmin::SketchConfig;
//!
//! let config = SketchConfig::new(4, 128).with_seed(1);
//! let mut left = CountMinSketch::new(&config).unwrap();
//! let mut right = CountMinSketch::new(&config).unwrap();
//! left.update("x");
//! right.update("x");
//!
//! let merged = CountMinSketch::merge_all(&[&left, &right]).unwrap();
//! assert!(merged.estimate("x") >= 2);
//!
//! let restored = CountMinSketch::deserialize(&merged.serialize()).unwrap();
//! assert_eq!(restored, merged);
//! ```

mod config;
mod serialization;
mod sketch;

pub use self::config::DEFAULT_SEED;
pub use self::config::SketchConfig;
pub use self::sketch::CountMinSketch;
