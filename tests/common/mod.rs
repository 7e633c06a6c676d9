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

#![allow(dead_code)]

use streamfreq::countmin::CountMinSketch;
use streamfreq::countmin::SketchConfig;

pub fn sketch(depth: u32, width: u32, seed: u64) -> CountMinSketch {
    CountMinSketch::new(&SketchConfig::new(depth, width).with_seed(seed)).unwrap()
}

/// A skewed stream of integer keys: key `i` appears `i % 13 + 1` times.
pub fn skewed_stream(distinct: u64) -> Vec<u64> {
    (0..distinct)
        .flat_map(|i| std::iter::repeat_n(i, (i % 13 + 1) as usize))
        .collect()
}

/// Distinct words `word0`, `word1`, ...
pub fn words(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("word{i}")).collect()
}
