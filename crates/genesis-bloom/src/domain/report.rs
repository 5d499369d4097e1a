//! Build diagnostics
//!
//! All three figures are derived from the finished buffer, never counted
//! while bits are being set: a repeated address must not inflate the weight.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::bit_buffer::BitBuffer;

/// Occupancy statistics of a finished filter
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Hamming weight (w)
    pub weight: usize,
    /// w / bit_size (o)
    pub occupancy: f64,
    /// o ^ hash_count (p)
    pub false_positive_estimate: f64,
}

impl BuildReport {
    /// Compute the report for a finished buffer
    pub fn from_buffer(buffer: &BitBuffer, hash_count: usize) -> Self {
        let weight = buffer.count_ones();
        let occupancy = if buffer.bit_size() == 0 {
            0.0
        } else {
            weight as f64 / buffer.bit_size() as f64
        };

        Self {
            weight,
            occupancy,
            false_positive_estimate: occupancy.powi(hash_count.min(i32::MAX as usize) as i32),
        }
    }
}

impl fmt::Display for BuildReport {
    /// Two-line operator format:
    ///
    /// ```text
    /// w=9   o=3.516%   p=0.004%
    /// w: Hamming weight    o: Occupancy    p: False positive probability
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "w={}   o={:.3}%   p={:.3}%",
            self.weight,
            self.occupancy * 100.0,
            self.false_positive_estimate * 100.0
        )?;
        write!(
            f,
            "w: Hamming weight    o: Occupancy    p: False positive probability"
        )
    }
}
