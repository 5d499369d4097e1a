//! Fixed-size bit buffer backing the filter artifact
//!
//! Bit `i` lives in byte `i >> 3` under mask `1 << (i & 7)`, which is exactly
//! the `Lsb0` ordering of a `BitVec<u8, _>`. The raw byte slice is the
//! artifact: no header, no length prefix.

use std::fmt;

use bitvec::prelude::*;

use crate::error::{ArtifactError, BuildError};

/// Owned bit array of `bit_size` bits stored in `ceil(bit_size / 8)` bytes
///
/// Bits are only ever set, never cleared. Padding bits past `bit_size` in the
/// last byte stay zero.
#[derive(Clone, PartialEq, Eq)]
pub struct BitBuffer {
    bits: BitVec<u8, Lsb0>,
}

/// Number of bytes needed to hold `bit_size` bits
pub fn byte_len(bit_size: usize) -> usize {
    bit_size.div_ceil(8)
}

impl BitBuffer {
    /// Create a zeroed buffer
    pub fn new(bit_size: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; bit_size],
        }
    }

    /// Create a zeroed buffer, reporting allocation failure instead of aborting
    ///
    /// `bit_size` must not exceed `MAX_BIT_SIZE`; `FilterConfig::validate`
    /// checks that first.
    pub fn try_new(bit_size: usize) -> Result<Self, BuildError> {
        let len = byte_len(bit_size);
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len)
            .map_err(|_| BuildError::Allocation {
                bit_size,
                bytes: len,
            })?;
        bytes.resize(len, 0);

        let mut bits = BitVec::<u8, Lsb0>::from_vec(bytes);
        bits.truncate(bit_size);
        Ok(Self { bits })
    }

    /// Rebuild a buffer from artifact bytes and an out-of-band size
    ///
    /// Rejects a byte count that does not match `bit_size` and any set
    /// padding bits, since no build can produce either.
    pub fn from_bytes(bytes: Vec<u8>, bit_size: usize) -> Result<Self, ArtifactError> {
        let expected = byte_len(bit_size);
        if bytes.len() != expected {
            return Err(ArtifactError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        let mut bits = BitVec::<u8, Lsb0>::from_vec(bytes);
        if bits[bit_size..].any() {
            return Err(ArtifactError::PaddingBitsSet { bit_size });
        }
        bits.truncate(bit_size);
        Ok(Self { bits })
    }

    /// Set bit `address`
    ///
    /// # Panics
    /// Panics if `address >= bit_size`.
    pub(crate) fn set(&mut self, address: usize) {
        self.bits.set(address, true);
    }

    /// OR another buffer of the same size into this one
    ///
    /// # Panics
    /// Panics if the sizes differ.
    pub(crate) fn merge(&mut self, other: &BitBuffer) {
        assert_eq!(
            self.bit_size(),
            other.bit_size(),
            "Cannot merge buffers with different sizes"
        );

        for (s, o) in self
            .bits
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.bits.as_raw_slice())
        {
            *s |= *o;
        }
    }

    /// Test bit `address`; out-of-range addresses read as unset
    pub fn get(&self, address: usize) -> bool {
        self.bits.get(address).map(|b| *b).unwrap_or(false)
    }

    /// Size in bits
    pub fn bit_size(&self) -> usize {
        self.bits.len()
    }

    /// Hamming weight
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Indices of set bits, ascending
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// True if every bit set here is also set in `other`
    pub fn is_subset_of(&self, other: &BitBuffer) -> bool {
        self.bit_size() == other.bit_size()
            && self
                .bits
                .as_raw_slice()
                .iter()
                .zip(other.bits.as_raw_slice())
                .all(|(s, o)| s & !o == 0)
    }

    /// Artifact bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    /// Consume the buffer, returning the artifact bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bits.into_vec()
    }
}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitBuffer")
            .field("bit_size", &self.bit_size())
            .field("weight", &self.count_ones())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_zeroed() {
        let buffer = BitBuffer::new(8_388_608);
        assert_eq!(buffer.bit_size(), 8_388_608);
        assert_eq!(buffer.as_bytes().len(), 1_048_576);
        assert_eq!(buffer.count_ones(), 0);
    }

    #[test]
    fn test_try_new_matches_new() {
        let buffer = BitBuffer::try_new(100).unwrap();
        assert_eq!(buffer, BitBuffer::new(100));
        assert_eq!(buffer.as_bytes().len(), 13);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_try_new_reports_unsatisfiable_allocation() {
        // 2^58 bytes is past any 64-bit address space in use
        let bit_size = crate::domain::MAX_BIT_SIZE;
        let err = BitBuffer::try_new(bit_size).unwrap_err();
        assert_eq!(
            err,
            BuildError::Allocation {
                bit_size,
                bytes: byte_len(bit_size),
            }
        );
    }

    #[test]
    fn test_byte_len_rounds_up() {
        assert_eq!(byte_len(1), 1);
        assert_eq!(byte_len(8), 1);
        assert_eq!(byte_len(9), 2);
        assert_eq!(byte_len(100), 13);
    }

    #[test]
    fn test_bit_layout_is_lsb_first() {
        let mut buffer = BitBuffer::new(64);
        buffer.set(37);
        assert_eq!(buffer.as_bytes(), &[0, 0, 0, 0, 0x20, 0, 0, 0]);

        buffer.set(0);
        buffer.set(15);
        assert_eq!(buffer.as_bytes()[0], 0x01);
        assert_eq!(buffer.as_bytes()[1], 0x80);
        assert_eq!(buffer.iter_ones().collect::<Vec<_>>(), vec![0, 15, 37]);
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut buffer = BitBuffer::new(16);
        buffer.set(3);
        buffer.set(3);
        assert_eq!(buffer.count_ones(), 1);
        assert!(buffer.get(3));
        assert!(!buffer.get(4));
    }

    #[test]
    fn test_get_out_of_range_is_false() {
        let buffer = BitBuffer::new(10);
        assert!(!buffer.get(10));
        assert!(!buffer.get(usize::MAX));
    }

    #[test]
    fn test_merge_ors_bytes() {
        let mut a = BitBuffer::new(20);
        let mut b = BitBuffer::new(20);
        a.set(1);
        a.set(19);
        b.set(1);
        b.set(7);

        a.merge(&b);
        assert_eq!(a.iter_ones().collect::<Vec<_>>(), vec![1, 7, 19]);
        assert!(b.is_subset_of(&a));
        assert!(!a.is_subset_of(&b));
    }

    #[test]
    #[should_panic(expected = "different sizes")]
    fn test_merge_rejects_size_mismatch() {
        let mut a = BitBuffer::new(16);
        a.merge(&BitBuffer::new(24));
    }

    #[test]
    fn test_from_bytes_restores_buffer() {
        let mut buffer = BitBuffer::new(100);
        buffer.set(0);
        buffer.set(42);
        buffer.set(99);

        let restored = BitBuffer::from_bytes(buffer.as_bytes().to_vec(), 100).unwrap();
        assert_eq!(restored, buffer);
        assert_eq!(restored.bit_size(), 100);
        assert_eq!(restored.count_ones(), 3);
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        let err = BitBuffer::from_bytes(vec![0; 12], 100).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::LengthMismatch {
                expected: 13,
                actual: 12
            }
        ));
    }

    #[test]
    fn test_from_bytes_rejects_padding_bits() {
        // bit_size 4 leaves the high nibble as padding
        let err = BitBuffer::from_bytes(vec![0x10], 4).unwrap_err();
        assert!(matches!(err, ArtifactError::PaddingBitsSet { bit_size: 4 }));
        assert!(BitBuffer::from_bytes(vec![0x0f], 4).is_ok());
    }

    #[test]
    fn test_debug_does_not_dump_bits() {
        let mut buffer = BitBuffer::new(1 << 20);
        buffer.set(5);
        let dbg = format!("{buffer:?}");
        assert_eq!(dbg, "BitBuffer { bit_size: 1048576, weight: 1 }");
    }
}
