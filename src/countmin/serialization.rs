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

//! Checkpoint layout, all fields big-endian:
//!
//! ```text
//! size: i64 | depth: i32 | width: i32 | { coefficient: i64 | counters: i64 x width } x depth
//! ```

pub(super) const LONG_SIZE_BYTES: usize = 8;
pub(super) const INT_SIZE_BYTES: usize = 4;
pub(super) const HEADER_SIZE_BYTES: usize = LONG_SIZE_BYTES + 2 * INT_SIZE_BYTES;

/// Largest value a counter or the total weight may hold on the wire.
pub(super) const MAX_COUNT: u64 = i64::MAX as u64;

/// Returns the serialized size of a sketch, or `None` on overflow.
pub(super) fn serialized_size_bytes(depth: usize, width: usize) -> Option<usize> {
    let row = width.checked_add(1)?.checked_mul(LONG_SIZE_BYTES)?;
    depth.checked_mul(row)?.checked_add(HEADER_SIZE_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_size() {
        assert_eq!(serialized_size_bytes(1, 1), Some(16 + 16));
        assert_eq!(serialized_size_bytes(10, 2000), Some(16 + 10 * 2001 * 8));
        assert_eq!(serialized_size_bytes(usize::MAX, 2), None);
    }
}
