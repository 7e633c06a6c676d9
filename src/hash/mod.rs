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

//! Row hashing for Count-Min sketches.
//!
//! A [`HashFamily`] holds one multiplicative coefficient per sketch row. Keys map
//! to a bucket in each row through the [`SketchKey`] trait:
//!
//! - integer keys use `(a * x) mod (2^31 - 1) mod width`, with the Mersenne
//!   reduction done by shift-and-mask instead of a division;
//! - byte and string keys use MurmurHash3 (x64, 128-bit), seeded with the row
//!   coefficient, reduced modulo `width`.
//!
//! Both mappings depend only on the coefficients and the width, so two sketches
//! built from the same seed agree on every bucket on every platform.

mod family;

pub use self::family::HashFamily;
pub use self::family::PRIME_MODULUS;
pub(crate) use self::family::check_dimensions;

/// A key that can be counted by a sketch.
///
/// Implementations map the key to a bucket in `[0, family.width())` for a row.
pub trait SketchKey {
    /// Returns the bucket of this key in the given row.
    fn bucket(&self, family: &HashFamily, row: usize) -> usize;
}

impl<T: SketchKey + ?Sized> SketchKey for &T {
    fn bucket(&self, family: &HashFamily, row: usize) -> usize {
        (**self).bucket(family, row)
    }
}

impl SketchKey for i64 {
    fn bucket(&self, family: &HashFamily, row: usize) -> usize {
        family.hash_long(*self, row)
    }
}

impl SketchKey for u64 {
    fn bucket(&self, family: &HashFamily, row: usize) -> usize {
        family.hash_long(*self as i64, row)
    }
}

impl SketchKey for usize {
    fn bucket(&self, family: &HashFamily, row: usize) -> usize {
        family.hash_long(*self as i64, row)
    }
}

impl SketchKey for i32 {
    fn bucket(&self, family: &HashFamily, row: usize) -> usize {
        family.hash_long(i64::from(*self), row)
    }
}

impl SketchKey for u32 {
    fn bucket(&self, family: &HashFamily, row: usize) -> usize {
        family.hash_long(i64::from(*self), row)
    }
}

impl SketchKey for [u8] {
    fn bucket(&self, family: &HashFamily, row: usize) -> usize {
        family.hash_bytes(self, row)
    }
}

impl SketchKey for Vec<u8> {
    fn bucket(&self, family: &HashFamily, row: usize) -> usize {
        family.hash_bytes(self, row)
    }
}

impl SketchKey for str {
    fn bucket(&self, family: &HashFamily, row: usize) -> usize {
        family.hash_bytes(self.as_bytes(), row)
    }
}

impl SketchKey for String {
    fn bucket(&self, family: &HashFamily, row: usize) -> usize {
        family.hash_bytes(self.as_bytes(), row)
    }
}
