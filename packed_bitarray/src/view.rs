//! Borrowed word-array handles and the rebasing that narrows them to a
//! sub-range.
//!
//! A handle pairs a word slice with a logical bit `count`. Bits at positions
//! `>= count` inside the backing words are expected to be clear; mutating
//! operations restore that before returning.
//!
//! # Examples
//!
//! ```rust
//! use packed_bitarray::BitsRef;
//!
//! let words = [0b1011_0000u8, 0b0000_0110];
//! let bits = BitsRef::new(&words, 11);
//!
//! // Bits 4..11 live in both words; rebasing keeps both and restates the
//! // range relative to the first of them.
//! let (slice, range) = bits.rebased_slice(4..11);
//! assert_eq!(slice.words().len(), 2);
//! assert_eq!(range, 4..11);
//!
//! // Bits 9..11 live in the second word only.
//! let (slice, range) = bits.rebased_slice(9..11);
//! assert_eq!(slice.words(), &[0b0000_0110]);
//! assert_eq!(range, 1..3);
//! ```

use core::ops::Range;

use crate::chunks::ChunkedBitsIterator;
use crate::error::CombineError;
use crate::position::BitPosition;
use crate::word::Word;

type Result<T> = core::result::Result<T, CombineError>;

/// A window of `len` words starting at word `start` of some buffer, holding
/// `count` logical bits.
///
/// Spans carry no borrow. The combine engine describes a source and a
/// destination that live in the same buffer as two spans over it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WordSpan {
    pub start: usize,
    pub len: usize,
    pub count: usize,
}

impl WordSpan {
    /// The span covering a whole buffer of `len` words.
    #[inline]
    pub const fn whole(len: usize, count: usize) -> Self {
        Self {
            start: 0,
            len,
            count,
        }
    }

    /// Absolute bit position of this span's bit `index` in the buffer.
    #[inline]
    pub fn absolute_bit<W: Word>(&self, index: usize) -> usize {
        self.start * W::CAPACITY + index
    }

    /// Narrows the span to the words that hold `range`, returning the
    /// narrowed span and `range` restated relative to its first word.
    ///
    /// An empty range yields an empty span and `0..0`.
    pub fn rebased<W: Word>(&self, range: Range<usize>) -> (WordSpan, Range<usize>) {
        debug_assert!(range.start <= range.end && range.end <= self.count);
        if range.is_empty() {
            let empty = WordSpan {
                start: self.start,
                len: 0,
                count: 0,
            };
            return (empty, 0..0);
        }
        let lower = BitPosition::split::<W>(range.start);
        let upper = BitPosition::end_split::<W>(range.end);
        let offset = lower.word * W::CAPACITY;
        let span = WordSpan {
            start: self.start + lower.word,
            len: upper.word - lower.word + 1,
            count: range.end - offset,
        };
        (span, range.start - offset..range.end - offset)
    }
}

/// Number of words needed to hold `count` bits.
#[inline]
pub fn word_count<W: Word>(count: usize) -> usize {
    count.div_ceil(W::CAPACITY)
}

pub(crate) fn check_capacity<W: Word>(words: usize, count: usize) -> Result<()> {
    if words.checked_mul(W::CAPACITY).is_some_and(|bits| bits < count) {
        return Err(CombineError::InsufficientWords { count, words });
    }
    Ok(())
}

pub(crate) fn check_no_stray_bits<W: Word>(words: &[W], count: usize) -> Result<()> {
    let end = BitPosition::split::<W>(count);
    if end.bit > 0 && !words[end.word].subtract(W::mask_up_to(end.bit)).is_empty() {
        return Err(CombineError::StrayBits { word: end.word });
    }
    let occupied = word_count::<W>(count);
    if let Some(offset) = words[occupied..].iter().position(|w| !w.is_empty()) {
        return Err(CombineError::StrayBits {
            word: occupied + offset,
        });
    }
    Ok(())
}

/// Shared access to `count` bits packed into a word slice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitsRef<'a, W: Word> {
    words: &'a [W],
    count: usize,
}

impl<'a, W: Word> BitsRef<'a, W> {
    /// # Panics
    ///
    /// Panics if `words` cannot hold `count` bits.
    pub fn new(words: &'a [W], count: usize) -> Self {
        if let Err(err) = check_capacity::<W>(words.len(), count) {
            panic!("{err}");
        }
        Self { words, count }
    }

    pub fn try_new(words: &'a [W], count: usize) -> Result<Self> {
        check_capacity::<W>(words.len(), count)?;
        Ok(Self { words, count })
    }

    #[inline]
    pub fn words(&self) -> &'a [W] {
        self.words
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.count {
            return None;
        }
        let p = BitPosition::split::<W>(index);
        Some(self.words[p.word].contains(p.bit))
    }

    #[inline]
    pub(crate) fn span(&self) -> WordSpan {
        WordSpan::whole(self.words.len(), self.count)
    }

    /// Returns a handle over only the words spanning `range`, together with
    /// `range` restated relative to that handle.
    ///
    /// The returned handle's last word may hold bits past its `count` that
    /// belong to the original handle.
    ///
    /// # Panics
    ///
    /// Panics if `range` is inverted or reaches past `count`.
    pub fn rebased_slice(&self, range: Range<usize>) -> (BitsRef<'a, W>, Range<usize>) {
        if let Err(err) = check_range(&range, self.count) {
            panic!("{err}");
        }
        let (span, range) = self.span().rebased::<W>(range);
        let words = &self.words[span.start..span.start + span.len];
        (
            BitsRef {
                words,
                count: span.count,
            },
            range,
        )
    }

    /// Iterates word-bounded chunks of `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is inverted or reaches past `count`.
    pub fn chunks(&self, range: Range<usize>) -> ChunkedBitsIterator<'a, W> {
        if let Err(err) = check_range(&range, self.count) {
            panic!("{err}");
        }
        ChunkedBitsIterator::new(self.words, range)
    }

    /// Checks that no bit at or past `count` is set.
    pub fn check_invariants(&self) -> Result<()> {
        check_no_stray_bits(self.words, self.count)
    }
}

/// Exclusive access to `count` bits packed into a word slice.
///
/// All combine and complement operations are methods on this handle; see
/// [`crate::combine`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct BitsMut<'a, W: Word> {
    pub(crate) words: &'a mut [W],
    pub(crate) count: usize,
}

impl<'a, W: Word> BitsMut<'a, W> {
    /// # Panics
    ///
    /// Panics if `words` cannot hold `count` bits.
    pub fn new(words: &'a mut [W], count: usize) -> Self {
        if let Err(err) = check_capacity::<W>(words.len(), count) {
            panic!("{err}");
        }
        Self { words, count }
    }

    pub fn try_new(words: &'a mut [W], count: usize) -> Result<Self> {
        check_capacity::<W>(words.len(), count)?;
        Ok(Self { words, count })
    }

    #[inline]
    pub fn words(&self) -> &[W] {
        &*self.words
    }

    #[inline]
    pub fn words_mut(&mut self) -> &mut [W] {
        &mut *self.words
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn as_ref(&self) -> BitsRef<'_, W> {
        BitsRef {
            words: &*self.words,
            count: self.count,
        }
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.as_ref().get(index)
    }

    /// # Panics
    ///
    /// Panics if `index >= count`.
    pub fn set(&mut self, index: usize, value: bool) {
        assert!(
            index < self.count,
            "Index {} is out of bounds for length {}",
            index,
            self.count
        );
        let p = BitPosition::split::<W>(index);
        let word = &mut self.words[p.word];
        *word = if value {
            word.union(W::singleton(p.bit))
        } else {
            word.subtract(W::singleton(p.bit))
        };
    }

    #[inline]
    pub(crate) fn span(&self) -> WordSpan {
        WordSpan::whole(self.words.len(), self.count)
    }

    /// Mutable counterpart of [`BitsRef::rebased_slice`]. Writes through the
    /// returned handle land in this handle's words.
    ///
    /// # Panics
    ///
    /// Panics if `range` is inverted or reaches past `count`.
    pub fn rebased_slice_mut(&mut self, range: Range<usize>) -> (BitsMut<'_, W>, Range<usize>) {
        if let Err(err) = check_range(&range, self.count) {
            panic!("{err}");
        }
        let (span, range) = self.span().rebased::<W>(range);
        let words = &mut self.words[span.start..span.start + span.len];
        (
            BitsMut {
                words,
                count: span.count,
            },
            range,
        )
    }

    pub fn check_invariants(&self) -> Result<()> {
        check_no_stray_bits(&*self.words, self.count)
    }
}

/// Validates `range` against a handle holding `count` bits.
pub(crate) fn check_range(range: &Range<usize>, count: usize) -> Result<()> {
    if range.start > range.end {
        return Err(CombineError::InvalidRange {
            start: range.start,
            end: range.end,
        });
    }
    if range.end > count {
        return Err(CombineError::RangeOutOfBounds {
            start: range.start,
            end: range.end,
            count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Nibble;

    #[cfg(not(feature = "std"))]
    use alloc::vec::Vec;

    fn nibbles(bits: &[u8]) -> Vec<Nibble> {
        bits.iter().map(|&b| Nibble::new(b)).collect()
    }

    #[test]
    fn rebasing_an_empty_range_yields_no_words() {
        let words = nibbles(&[0b1111, 0b1111]);
        let bits = BitsRef::new(&words, 8);
        for i in 0..=8 {
            let (slice, range) = bits.rebased_slice(i..i);
            assert!(slice.words().is_empty());
            assert_eq!(slice.count(), 0);
            assert_eq!(range, 0..0);
        }
    }

    #[test]
    fn rebasing_keeps_only_spanned_words() {
        let words = nibbles(&[0b0001, 0b0010, 0b0100, 0b1000]);
        let bits = BitsRef::new(&words, 16);

        let (slice, range) = bits.rebased_slice(5..7);
        assert_eq!(slice.words(), &nibbles(&[0b0010])[..]);
        assert_eq!(slice.count(), 3);
        assert_eq!(range, 1..3);

        // An end on a word boundary does not pull in the following word.
        let (slice, range) = bits.rebased_slice(5..12);
        assert_eq!(slice.words(), &nibbles(&[0b0010, 0b0100])[..]);
        assert_eq!(slice.count(), 8);
        assert_eq!(range, 1..8);

        let (slice, range) = bits.rebased_slice(0..16);
        assert_eq!(slice.words().len(), 4);
        assert_eq!(range, 0..16);
    }

    #[test]
    fn spans_rebase_relative_to_their_own_start() {
        let span = WordSpan {
            start: 3,
            len: 4,
            count: 14,
        };
        let (rebased, range) = span.rebased::<Nibble>(6..13);
        assert_eq!(
            rebased,
            WordSpan {
                start: 4,
                len: 3,
                count: 9
            }
        );
        assert_eq!(range, 2..9);
        assert_eq!(rebased.absolute_bit::<Nibble>(range.start), 18);
    }

    #[test]
    fn mutation_through_a_rebased_handle_is_shared() {
        let mut words = nibbles(&[0, 0, 0]);
        let mut bits = BitsMut::new(&mut words, 12);
        {
            let (mut slice, range) = bits.rebased_slice_mut(6..9);
            assert_eq!(range, 2..5);
            slice.set(range.start, true);
            slice.set(range.end - 1, true);
        }
        assert_eq!(bits.get(6), Some(true));
        assert_eq!(bits.get(8), Some(true));
        assert_eq!(words, nibbles(&[0, 0b0100, 0b0001]));
    }

    #[test]
    fn constructors_and_invariant_checks() {
        let words = nibbles(&[0b1111, 0b0011]);
        assert!(matches!(
            BitsRef::try_new(&words, 9),
            Err(CombineError::InsufficientWords { count: 9, words: 2 })
        ));
        assert!(BitsRef::new(&words, 6).check_invariants().is_ok());
        assert_eq!(
            BitsRef::new(&words, 5).check_invariants(),
            Err(CombineError::StrayBits { word: 1 })
        );
        assert_eq!(
            BitsRef::new(&words, 4).check_invariants(),
            Err(CombineError::StrayBits { word: 1 })
        );
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn rebasing_past_the_end_panics() {
        let words = nibbles(&[0, 0]);
        let _ = BitsRef::new(&words, 7).rebased_slice(2..8);
    }
}
