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

//! Bounded Top-K view over a Count-Min sketch.
//!
//! A [`TopKTracker`] holds at most `k` distinct keys and no counts. Each decision
//! reads current estimates from the sketch it is given, so the ranking always
//! reflects the latest counters; relative order settled earlier may change as
//! other counts grow.
//!
//! # Usage
//!
//! ```rust
//! use streamfreq::countmin::CountMinSketch;
//! use streamfreq::countmin::SketchConfig;
//! use streamfreq::topk::TopKTracker;
//!
//! let mut sketch = CountMinSketch::new(&SketchConfig::new(5, 512)).unwrap();
//! let mut tracker = TopKTracker::<String>::new(2).unwrap();
//!
//! for word in ["a", "b", "b", "c", "b", "a"] {
//!     sketch.update(word);
//!     tracker.observe(word, &sketch);
//! }
//!
//! let rows = tracker.snapshot(&sketch);
//! assert_eq!(rows[0].item(), "b");
//! assert!(rows.len() <= 2);
//! ```

mod tracker;

pub use self::tracker::Row;
pub use self::tracker::TopKTracker;
