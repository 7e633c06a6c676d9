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

//! Seeded random source for hash coefficients.

const MULTIPLIER: u64 = 0x5DEECE66D;
const ADDEND: u64 = 0xB;
const MASK: u64 = (1 << 48) - 1;

/// 48-bit linear congruential generator.
///
/// This is the generator behind `java.util.Random`, so a given seed yields the
/// same coefficient sequence as sketches produced by JVM stream processors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lcg48 {
    state: u64,
}

impl Lcg48 {
    /// Creates a new generator using the provided seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            state: (seed ^ MULTIPLIER) & MASK,
        }
    }

    /// Returns the next `bits` (at most 32) high-order bits of the state.
    pub fn next_bits(&mut self, bits: u32) -> u32 {
        debug_assert!(bits > 0 && bits <= 32);
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(ADDEND) & MASK;
        (self.state >> (48 - bits)) as u32
    }

    /// Returns a uniformly distributed value in `[0, bound)`.
    ///
    /// `bound` must be in `1..=i32::MAX`.
    pub fn next_below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0 && bound <= i32::MAX as u32);
        let bound = bound as i32;
        let m = bound - 1;
        let mut r = self.next_bits(31) as i32;
        if bound & m == 0 {
            return ((bound as i64 * r as i64) >> 31) as u32;
        }
        let mut u = r;
        loop {
            r = u % bound;
            // reject draws from the final, incomplete block of the range
            if u.wrapping_sub(r).wrapping_add(m) >= 0 {
                return r as u32;
            }
            u = self.next_bits(31) as i32;
        }
    }
}
