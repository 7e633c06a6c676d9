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

use crate::common::random::Lcg48;
use crate::error::Error;
use crate::hash::SketchKey;

/// The Mersenne prime `2^31 - 1` used as the modulus of integer row hashes.
pub const PRIME_MODULUS: i64 = (1 << 31) - 1;

/// Upper bound on `depth * width`, i.e. 8 GiB of counters.
const MAX_COUNTERS: u64 = 1 << 30;

/// Per-row multiplicative hash coefficients of a Count-Min sketch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashFamily {
    coefficients: Vec<i64>,
    width: u32,
}

impl HashFamily {
    /// Derives `depth` coefficients from `seed` for rows of `width` buckets.
    ///
    /// Every coefficient is a positive integer below [`PRIME_MODULUS`]. The same
    /// `(depth, width, seed)` always produces the same family.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `depth` or `width` is zero or exceeds
    /// `i32::MAX`, or if `depth * width` exceeds `2^30`.
    pub fn new(depth: u32, width: u32, seed: u64) -> Result<Self, Error> {
        check_dimensions(depth, width)?;

        let mut random = Lcg48::seeded(seed);
        let coefficients = (0..depth)
            .map(|_| loop {
                let a = random.next_below(PRIME_MODULUS as u32);
                if a != 0 {
                    break i64::from(a);
                }
            })
            .collect();
        Ok(Self {
            coefficients,
            width,
        })
    }

    /// Rebuilds a family from stored coefficients; callers validate the input.
    pub(crate) fn from_parts(coefficients: Vec<i64>, width: u32) -> Self {
        Self {
            coefficients,
            width,
        }
    }

    /// Returns the number of rows.
    pub fn depth(&self) -> u32 {
        self.coefficients.len() as u32
    }

    /// Returns the number of buckets per row.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the coefficient of every row.
    pub fn coefficients(&self) -> &[i64] {
        &self.coefficients
    }

    /// Returns the bucket of `key` in every row, in row order.
    pub fn buckets<'a, K: SketchKey + ?Sized>(
        &'a self,
        key: &'a K,
    ) -> impl Iterator<Item = usize> + 'a {
        (0..self.coefficients.len()).map(move |row| key.bucket(self, row))
    }

    pub(crate) fn hash_long(&self, item: i64, row: usize) -> usize {
        let mut hash = self.coefficients[row].wrapping_mul(item);
        // x mod (2^31 - 1) without a division: fold the high word onto the
        // low word and mask.
        hash = hash.wrapping_add(hash >> 32);
        hash &= PRIME_MODULUS;
        (hash as u32 % self.width) as usize
    }

    pub(crate) fn hash_bytes(&self, bytes: &[u8], row: usize) -> usize {
        let seed = self.coefficients[row] as u32;
        let (h1, _) = mur3::murmurhash3_x64_128(bytes, seed);
        (h1 % u64::from(self.width)) as usize
    }
}

/// Checks that a `depth x width` table can be allocated and serialized.
pub(crate) fn check_dimensions(depth: u32, width: u32) -> Result<(), Error> {
    for (name, value) in [("depth", depth), ("width", width)] {
        if value == 0 || value > i32::MAX as u32 {
            return Err(
                Error::invalid_argument(format!("{name} must be in [1, {}]", i32::MAX))
                    .with_context(name, value),
            );
        }
    }
    if u64::from(depth) * u64::from(width) > MAX_COUNTERS {
        return Err(Error::invalid_argument("sketch table is too large")
            .with_context("depth", depth)
            .with_context("width", width));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_follow_seeded_sequence() {
        let family = HashFamily::new(3, 2000, 10).unwrap();
        assert_eq!(family.coefficients(), &[1568587113, 956992380, 553627293]);
        assert_eq!(family.depth(), 3);
        assert_eq!(family.width(), 2000);
    }

    #[test]
    fn test_same_seed_same_family() {
        let a = HashFamily::new(10, 2000, 10).unwrap();
        let b = HashFamily::new(10, 2000, 10).unwrap();
        let c = HashFamily::new(10, 2000, 11).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        for &x in a.coefficients() {
            assert!(x > 0 && x < PRIME_MODULUS);
        }
    }

    #[test]
    fn test_hash_long_reduces_into_width() {
        let family = HashFamily::new(5, 17, 99).unwrap();
        for item in [-5i64, -1, 0, 1, 2, 1 << 40, i64::MAX, i64::MIN] {
            for row in 0..5 {
                assert!(family.hash_long(item, row) < 17);
            }
        }
    }

    #[test]
    fn test_hash_long_matches_direct_reduction() {
        let family = HashFamily::from_parts(vec![3], 1000);
        // 3 * 12345 fits in 31 bits, so the fold is a no-op
        assert_eq!(family.hash_long(12345, 0), (3 * 12345) % 1000);
        assert_eq!(family.hash_long(0, 0), 0);
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(HashFamily::new(0, 10, 1).is_err());
        assert!(HashFamily::new(10, 0, 1).is_err());
        assert!(HashFamily::new(1, u32::MAX, 1).is_err());
    }

    #[test]
    fn test_rejects_oversized_table() {
        let err = HashFamily::new(i32::MAX as u32, 1, 1).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArgument);
        assert_eq!(err.message(), "sketch table is too large");
        assert!(HashFamily::new(1 << 15, 1 << 15, 1).is_ok());
    }
}
