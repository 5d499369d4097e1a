//! Theoretical Bloom filter sizing
//!
//! Formulas:
//! - FPR = (1 - e^(-kn/m))^k   -- expected false positive rate
//! - k = (m/n) * ln(2)         -- optimal hash count for fixed m and n
//!
//! These predict what `BuildReport` will measure; they never feed into a
//! build.

use std::f64::consts::LN_2;

/// Upper clamp for suggested hash counts
pub const MAX_SUGGESTED_HASH_COUNT: usize = 32;

/// Expected false positive rate for `key_count` keys
pub fn theoretical_fpr(bit_size: usize, key_count: usize, hash_count: usize) -> f64 {
    if bit_size == 0 {
        return 1.0;
    }
    let exponent = -(hash_count as f64) * (key_count as f64) / (bit_size as f64);
    (1.0 - exponent.exp()).powf(hash_count as f64)
}

/// Hash count minimising the false positive rate for a fixed size
pub fn optimal_hash_count(bit_size: usize, key_count: usize) -> usize {
    if key_count == 0 {
        return 1;
    }
    let k = ((bit_size as f64 / key_count as f64) * LN_2).round() as usize;
    k.clamp(1, MAX_SUGGESTED_HASH_COUNT)
}
