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

//! Approximate word frequencies over unbounded streams in bounded memory.
//!
//! - [`countmin`]: a Count-Min sketch with point queries, merging and a fixed
//!   big-endian checkpoint format.
//! - [`topk`]: a bounded view of the most frequent keys, ranked by live sketch
//!   estimates.
//! - [`stream`]: the per-partition state combining the two.
//! - [`hash`]: the seeded row hashes shared by every sketch.
//!
//! # Example
//!
//! ```rust
//! use streamfreq::countmin::SketchConfig;
//! use streamfreq::stream::StreamConfig;
//! use streamfreq::stream::StreamState;
//!
//! let config = StreamConfig::new(SketchConfig::new(10, 2000).with_seed(10), 2);
//! let mut left = StreamState::<String>::new(&config).unwrap();
//! let mut right = StreamState::<String>::new(&config).unwrap();
//!
//! for word in ["storm", "spout", "storm"] {
//!     left.observe(word);
//! }
//! for word in ["bolt", "storm"] {
//!     right.observe(word);
//! }
//!
//! left.merge(&right).unwrap();
//! assert_eq!(left.estimate("storm"), 3);
//!
//! let restored = StreamState::<String>::from_checkpoint(&left.to_checkpoint(), 2).unwrap();
//! assert_eq!(restored.sketch(), left.sketch());
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod countmin;
pub mod error;
pub mod hash;
pub mod stream;
pub mod topk;

mod codec;
mod common;
