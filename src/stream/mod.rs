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

//! Per-partition word counting state.
//!
//! [`StreamState`] pairs a [`CountMinSketch`] with a [`TopKTracker`] and is the
//! unit an orchestration layer owns, checkpoints, merges and restores. Items
//! arrive one at a time, already tokenized and lower-cased; stop words can be
//! dropped at the boundary through a [`StopWords`] oracle.
//!
//! # Usage
//!
//! ```rust
//! use std::collections::HashSet;
//!
//! use streamfreq::countmin::SketchConfig;
//! use streamfreq::stream::StreamConfig;
//! use streamfreq::stream::StreamState;
//!
//! let config = StreamConfig::new(SketchConfig::new(10, 2000).with_seed(10), 15);
//! let mut state = StreamState::<String>::new(&config).unwrap();
//! let stop_words: HashSet<String> = ["the".to_string()].into_iter().collect();
//!
//! for word in "the storm the topology storm".split_whitespace() {
//!     state.observe_filtered(word, &stop_words);
//! }
//!
//! assert_eq!(state.estimate("storm"), 2);
//! assert_eq!(state.estimate("the"), 0);
//! assert_eq!(state.render_top_k(), "storm(2) topology(1)");
//! ```

mod state;

pub use self::state::StopWords;
pub use self::state::StreamConfig;
pub use self::state::StreamState;
