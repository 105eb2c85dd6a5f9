//! Fixed-capacity packed words treated as finite sets of bit offsets.
//!
//! Offset `0` is the least significant bit. Every operation here is a handful
//! of machine instructions; nothing validates its arguments beyond debug
//! assertions.

use bytemuck::Pod;
use bytemuck_derive::{Pod, Zeroable};
use core::fmt::Debug;
use core::hash::Hash;

/// A word of `CAPACITY` bits, viewed as a set over `0..CAPACITY`.
///
/// Implementors must keep every bit at or above `CAPACITY` clear.
pub trait Word: Pod + Eq + Hash + Debug {
    const CAPACITY: usize;

    fn union(self, other: Self) -> Self;
    fn intersection(self, other: Self) -> Self;
    fn symmetric_difference(self, other: Self) -> Self;
    fn complement(self) -> Self;

    /// Moves every bit `n` places towards the top. Shifting by `CAPACITY` or
    /// more yields the empty word.
    fn shifted_up(self, n: usize) -> Self;

    /// Moves every bit `n` places towards offset zero. Shifting by `CAPACITY`
    /// or more yields the empty word.
    fn shifted_down(self, n: usize) -> Self;

    /// Number of set bits.
    fn count(self) -> usize;

    #[inline]
    fn empty() -> Self {
        Self::zeroed()
    }

    #[inline]
    fn full() -> Self {
        Self::empty().complement()
    }

    #[inline]
    fn is_empty(self) -> bool {
        self == Self::empty()
    }

    #[inline]
    fn subtract(self, other: Self) -> Self {
        self.intersection(other.complement())
    }

    /// Bits `0..n`.
    #[inline]
    fn mask_up_to(n: usize) -> Self {
        debug_assert!(n <= Self::CAPACITY);
        if n == 0 {
            Self::empty()
        } else {
            Self::full().shifted_down(Self::CAPACITY - n)
        }
    }

    /// Bits `from..to`.
    #[inline]
    fn mask_from(from: usize, to: usize) -> Self {
        debug_assert!(from <= to && to <= Self::CAPACITY);
        Self::mask_up_to(to).subtract(Self::mask_up_to(from))
    }

    #[inline]
    fn singleton(bit: usize) -> Self {
        Self::mask_from(bit, bit + 1)
    }

    #[inline]
    fn contains(self, bit: usize) -> bool {
        !self.intersection(Self::singleton(bit)).is_empty()
    }

    /// Merges `other` into the window `start..start + count` of `self`.
    ///
    /// The window is shifted down to offset zero, combined with `other` by
    /// `op`, then written back. Bits outside the window keep their value, and
    /// bits of `other` at or above `count` are ignored.
    #[inline]
    fn combined_slice<F>(self, start: usize, count: usize, other: Self, mut op: F) -> Self
    where
        F: FnMut(Self, Self) -> Self,
    {
        debug_assert!(start + count <= Self::CAPACITY);
        let mask = Self::mask_up_to(count).shifted_up(start);
        let value = op(self.intersection(mask).shifted_down(start), other);
        self.subtract(mask)
            .union(value.shifted_up(start).intersection(mask))
    }
}

macro_rules! impl_word_for_uint {
    ($($t:ty),* $(,)?) => {$(
        impl Word for $t {
            const CAPACITY: usize = <$t>::BITS as usize;

            #[inline]
            fn union(self, other: Self) -> Self {
                self | other
            }

            #[inline]
            fn intersection(self, other: Self) -> Self {
                self & other
            }

            #[inline]
            fn symmetric_difference(self, other: Self) -> Self {
                self ^ other
            }

            #[inline]
            fn complement(self) -> Self {
                !self
            }

            #[inline]
            fn shifted_up(self, n: usize) -> Self {
                u32::try_from(n)
                    .ok()
                    .and_then(|n| self.checked_shl(n))
                    .unwrap_or(0)
            }

            #[inline]
            fn shifted_down(self, n: usize) -> Self {
                u32::try_from(n)
                    .ok()
                    .and_then(|n| self.checked_shr(n))
                    .unwrap_or(0)
            }

            #[inline]
            fn count(self) -> usize {
                self.count_ones() as usize
            }
        }
    )*};
}

impl_word_for_uint!(u8, u16, u32, u64, u128);

/// A four-bit word stored in the low half of a byte.
///
/// Too narrow to be efficient, but with so few bits per word almost every
/// range crosses a word boundary, so it exercises the boundary-heavy paths of
/// the engine.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Nibble(u8);

impl Nibble {
    const MASK: u8 = 0x0F;

    /// Keeps the low four bits of `bits`.
    pub const fn new(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Word for Nibble {
    const CAPACITY: usize = 4;

    #[inline]
    fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    #[inline]
    fn symmetric_difference(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    #[inline]
    fn complement(self) -> Self {
        Self(!self.0 & Self::MASK)
    }

    #[inline]
    fn shifted_up(self, n: usize) -> Self {
        if n >= Self::CAPACITY {
            Self(0)
        } else {
            Self((self.0 << n) & Self::MASK)
        }
    }

    #[inline]
    fn shifted_down(self, n: usize) -> Self {
        if n >= Self::CAPACITY {
            Self(0)
        } else {
            Self(self.0 >> n)
        }
    }

    #[inline]
    fn count(self) -> usize {
        self.0.count_ones() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_cover_requested_bits() {
        assert_eq!(u64::mask_up_to(0), 0);
        assert_eq!(u64::mask_up_to(3), 0b111);
        assert_eq!(u64::mask_up_to(64), u64::MAX);
        assert_eq!(u64::mask_from(2, 5), 0b11100);
        assert_eq!(u64::mask_from(7, 7), 0);

        assert_eq!(Nibble::mask_up_to(4), Nibble::new(0b1111));
        assert_eq!(Nibble::mask_from(1, 3), Nibble::new(0b0110));
        assert_eq!(Nibble::full().count(), 4);
    }

    #[test]
    fn shifts_saturate_at_capacity() {
        assert_eq!(u64::MAX.shifted_up(64), 0);
        assert_eq!(u64::MAX.shifted_down(64), 0);
        assert_eq!(1u8.shifted_up(7), 0x80);
        assert_eq!(Nibble::new(0b1001).shifted_up(1), Nibble::new(0b0010));
        assert_eq!(Nibble::new(0b1001).shifted_down(3), Nibble::new(0b0001));
        assert_eq!(Nibble::full().shifted_up(4), Nibble::empty());
    }

    #[test]
    fn set_algebra() {
        let a = 0b1100u16;
        let b = 0b1010u16;
        assert_eq!(a.union(b), 0b1110);
        assert_eq!(a.intersection(b), 0b1000);
        assert_eq!(a.symmetric_difference(b), 0b0110);
        assert_eq!(a.subtract(b), 0b0100);
        assert!(a.contains(3));
        assert!(!a.contains(0));
        assert_eq!(Nibble::new(0b0101).complement(), Nibble::new(0b1010));
    }

    #[test]
    fn combined_slice_only_touches_window() {
        let word = 0b1111_0000u8;
        // OR 0b11 into bits 1..3
        let result = word.combined_slice(1, 2, 0b11, |a, b| a | b);
        assert_eq!(result, 0b1111_0110);

        // bits of `other` past the window are dropped
        let result = 0u8.combined_slice(4, 2, 0xFF, |a, b| a ^ b);
        assert_eq!(result, 0b0011_0000);

        let result = Nibble::full().combined_slice(1, 2, Nibble::empty(), |a, b| a.intersection(b));
        assert_eq!(result, Nibble::new(0b1001));
    }
}
