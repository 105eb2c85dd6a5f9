//! An owning, growable bit vector over the combine engine.
//!
//! # Examples
//!
//! ```rust
//! use packed_bitarray::BitArray;
//!
//! let mut mask: BitArray = [true, false, true, true, false].into_iter().collect();
//! let other = BitArray::repeating(true, 3);
//!
//! // AND bits 0..3 of `other` into bits 2..5 of `mask`.
//! mask.form_bitwise_and_ranges(2..5, 0..3, &other);
//! assert_eq!(mask.iter().collect::<Vec<_>>(), [true, false, true, true, false]);
//!
//! // Shift a copy of the first half over the second, in place.
//! mask.form_bitwise_xor_within(3.., 1..3);
//! assert_eq!(mask.iter().collect::<Vec<_>>(), [true, false, true, true, true]);
//!
//! let flipped = !mask;
//! assert_eq!(flipped.iter().filter(|bit| *bit).count(), 1);
//! ```

use core::ops::{BitAndAssign, BitOrAssign, BitXorAssign, Bound, Not, Range, RangeBounds};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use log::trace;

use crate::chunks::ChunkedBitsIterator;
use crate::combine::BitOp;
use crate::error::CombineError;
use crate::position::BitPosition;
use crate::view::{BitsMut, BitsRef, check_capacity, check_no_stray_bits, word_count};
use crate::word::Word;

type Result<T> = core::result::Result<T, CombineError>;

/// Turns any range expression into a half-open range. Bounds are not checked
/// here; the engine rejects them before touching a word.
fn resolve_range<R: RangeBounds<usize>>(range: R, len: usize) -> Range<usize> {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.saturating_add(1),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    start..end
}

/// `count` bits packed into exactly `word_count(count)` words of `W`.
///
/// Bits past the end of the last word are always clear, so two arrays with
/// the same bits compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitArray<W: Word = u64> {
    words: Vec<W>,
    count: usize,
}

impl<W: Word> Default for BitArray<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Word> BitArray<W> {
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            count: 0,
        }
    }

    /// `count` clear bits.
    pub fn with_len(count: usize) -> Self {
        Self::repeating(false, count)
    }

    pub fn repeating(bit: bool, count: usize) -> Self {
        let fill = if bit { W::full() } else { W::empty() };
        let mut words = Vec::new();
        words.resize(word_count::<W>(count), fill);
        let mut array = Self { words, count };
        array.clear_unused_bits();
        array
    }

    /// Adopts `words` as the storage for `count` bits. Excess words are
    /// dropped, provided they are empty.
    pub fn from_words(mut words: Vec<W>, count: usize) -> Result<Self> {
        check_capacity::<W>(words.len(), count)?;
        check_no_stray_bits(&words, count)?;
        words.truncate(word_count::<W>(count));
        Ok(Self { words, count })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<bool> {
        self.as_bits().get(index)
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: bool) {
        self.update(|bits| bits.set(index, value));
    }

    pub fn push(&mut self, value: bool) {
        if self.count % W::CAPACITY == 0 {
            self.words.push(W::empty());
        }
        self.count += 1;
        self.set(self.count - 1, value);
    }

    #[inline]
    pub fn words(&self) -> &[W] {
        &self.words
    }

    pub fn into_words(self) -> Vec<W> {
        self.words
    }

    #[inline]
    pub fn as_bits(&self) -> BitsRef<'_, W> {
        BitsRef::new(&self.words, self.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.count).map(move |index| {
            let at = BitPosition::split::<W>(index);
            self.words[at.word].contains(at.bit)
        })
    }

    /// Iterates `range` in chunks of up to one word, split at word boundaries.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    pub fn chunks<R: RangeBounds<usize>>(&self, range: R) -> ChunkedBitsIterator<'_, W> {
        let range = resolve_range(range, self.count);
        self.as_bits().chunks(range)
    }

    /// Runs `f` on a mutable view of the whole array.
    ///
    /// # Panics
    ///
    /// Panics if `f` leaves bits set past the end.
    pub fn update<R, F>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut BitsMut<'_, W>) -> R,
    {
        let mut bits = BitsMut::new(&mut self.words, self.count);
        let result = f(&mut bits);
        if let Err(err) = bits.check_invariants() {
            panic!("{err}");
        }
        result
    }

    fn clear_unused_bits(&mut self) {
        let end = BitPosition::split::<W>(self.count);
        if end.bit > 0 {
            let last = &mut self.words[end.word];
            *last = last.intersection(W::mask_up_to(end.bit));
        }
    }

    pub fn try_combine(&mut self, op: BitOp, source: &BitArray<W>) -> Result<()> {
        trace!("combine {:?}: {} bits", op, self.count);
        self.update(|bits| bits.try_combine(&source.as_bits(), op.merger()))
    }

    pub fn try_combine_with_range<R>(
        &mut self,
        op: BitOp,
        source_range: R,
        source: &BitArray<W>,
    ) -> Result<()>
    where
        R: RangeBounds<usize>,
    {
        let source_range = resolve_range(source_range, source.count);
        trace!("combine {:?}: {} bits from {:?}", op, self.count, source_range);
        self.update(|bits| {
            bits.try_combine_with_range(source_range, &source.as_bits(), op.merger())
        })
    }

    pub fn try_combine_ranges<T, R>(
        &mut self,
        op: BitOp,
        target_range: T,
        source_range: R,
        source: &BitArray<W>,
    ) -> Result<()>
    where
        T: RangeBounds<usize>,
        R: RangeBounds<usize>,
    {
        let target_range = resolve_range(target_range, self.count);
        let source_range = resolve_range(source_range, source.count);
        trace!("combine {:?}: {:?} from {:?}", op, target_range, source_range);
        self.update(|bits| {
            bits.try_combine_ranges(target_range, source_range, &source.as_bits(), op.merger())
        })
    }

    pub fn try_combine_within<T, R>(
        &mut self,
        op: BitOp,
        target_range: T,
        source_range: R,
    ) -> Result<()>
    where
        T: RangeBounds<usize>,
        R: RangeBounds<usize>,
    {
        let target_range = resolve_range(target_range, self.count);
        let source_range = resolve_range(source_range, self.count);
        trace!("combine {:?} in place: {:?} from {:?}", op, target_range, source_range);
        self.update(|bits| bits.try_combine_within(target_range, source_range, op.merger()))
    }

    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn combine(&mut self, op: BitOp, source: &BitArray<W>) {
        if let Err(err) = self.try_combine(op, source) {
            panic!("{err}");
        }
    }

    /// # Panics
    ///
    /// Panics if `source_range` is out of bounds or its length differs from
    /// `self.len()`.
    pub fn combine_with_range<R>(&mut self, op: BitOp, source_range: R, source: &BitArray<W>)
    where
        R: RangeBounds<usize>,
    {
        if let Err(err) = self.try_combine_with_range(op, source_range, source) {
            panic!("{err}");
        }
    }

    /// # Panics
    ///
    /// Panics if either range is out of bounds or their lengths differ.
    pub fn combine_ranges<T, R>(
        &mut self,
        op: BitOp,
        target_range: T,
        source_range: R,
        source: &BitArray<W>,
    ) where
        T: RangeBounds<usize>,
        R: RangeBounds<usize>,
    {
        if let Err(err) = self.try_combine_ranges(op, target_range, source_range, source) {
            panic!("{err}");
        }
    }

    /// Combines two possibly overlapping ranges of this array, as if the
    /// source range had been copied out first.
    ///
    /// # Panics
    ///
    /// Panics if either range is out of bounds or their lengths differ.
    pub fn combine_within<T, R>(&mut self, op: BitOp, target_range: T, source_range: R)
    where
        T: RangeBounds<usize>,
        R: RangeBounds<usize>,
    {
        if let Err(err) = self.try_combine_within(op, target_range, source_range) {
            panic!("{err}");
        }
    }

    pub fn form_bitwise_or(&mut self, source: &BitArray<W>) {
        self.combine(BitOp::Or, source);
    }

    pub fn form_bitwise_and(&mut self, source: &BitArray<W>) {
        self.combine(BitOp::And, source);
    }

    pub fn form_bitwise_xor(&mut self, source: &BitArray<W>) {
        self.combine(BitOp::Xor, source);
    }

    pub fn form_bitwise_or_with_range<R>(&mut self, source_range: R, source: &BitArray<W>)
    where
        R: RangeBounds<usize>,
    {
        self.combine_with_range(BitOp::Or, source_range, source);
    }

    pub fn form_bitwise_and_with_range<R>(&mut self, source_range: R, source: &BitArray<W>)
    where
        R: RangeBounds<usize>,
    {
        self.combine_with_range(BitOp::And, source_range, source);
    }

    pub fn form_bitwise_xor_with_range<R>(&mut self, source_range: R, source: &BitArray<W>)
    where
        R: RangeBounds<usize>,
    {
        self.combine_with_range(BitOp::Xor, source_range, source);
    }

    pub fn form_bitwise_or_ranges<T, R>(
        &mut self,
        target_range: T,
        source_range: R,
        source: &BitArray<W>,
    ) where
        T: RangeBounds<usize>,
        R: RangeBounds<usize>,
    {
        self.combine_ranges(BitOp::Or, target_range, source_range, source);
    }

    pub fn form_bitwise_and_ranges<T, R>(
        &mut self,
        target_range: T,
        source_range: R,
        source: &BitArray<W>,
    ) where
        T: RangeBounds<usize>,
        R: RangeBounds<usize>,
    {
        self.combine_ranges(BitOp::And, target_range, source_range, source);
    }

    pub fn form_bitwise_xor_ranges<T, R>(
        &mut self,
        target_range: T,
        source_range: R,
        source: &BitArray<W>,
    ) where
        T: RangeBounds<usize>,
        R: RangeBounds<usize>,
    {
        self.combine_ranges(BitOp::Xor, target_range, source_range, source);
    }

    pub fn form_bitwise_or_within<T, R>(&mut self, target_range: T, source_range: R)
    where
        T: RangeBounds<usize>,
        R: RangeBounds<usize>,
    {
        self.combine_within(BitOp::Or, target_range, source_range);
    }

    pub fn form_bitwise_and_within<T, R>(&mut self, target_range: T, source_range: R)
    where
        T: RangeBounds<usize>,
        R: RangeBounds<usize>,
    {
        self.combine_within(BitOp::And, target_range, source_range);
    }

    pub fn form_bitwise_xor_within<T, R>(&mut self, target_range: T, source_range: R)
    where
        T: RangeBounds<usize>,
        R: RangeBounds<usize>,
    {
        self.combine_within(BitOp::Xor, target_range, source_range);
    }

    pub fn toggle_all(&mut self) {
        trace!("toggle {} bits", self.count);
        self.update(|bits| bits.toggle_all());
    }

    pub fn try_toggle_range<R: RangeBounds<usize>>(&mut self, range: R) -> Result<()> {
        let range = resolve_range(range, self.count);
        trace!("toggle {:?}", range);
        self.update(|bits| bits.try_toggle_range(range))
    }

    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    pub fn toggle_range<R: RangeBounds<usize>>(&mut self, range: R) {
        if let Err(err) = self.try_toggle_range(range) {
            panic!("{err}");
        }
    }
}

impl<W: Word> FromIterator<bool> for BitArray<W> {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<W: Word> Extend<bool> for BitArray<W> {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        for bit in iter {
            self.push(bit);
        }
    }
}

impl<W: Word> BitOrAssign<&BitArray<W>> for BitArray<W> {
    fn bitor_assign(&mut self, source: &BitArray<W>) {
        self.form_bitwise_or(source);
    }
}

impl<W: Word> BitAndAssign<&BitArray<W>> for BitArray<W> {
    fn bitand_assign(&mut self, source: &BitArray<W>) {
        self.form_bitwise_and(source);
    }
}

impl<W: Word> BitXorAssign<&BitArray<W>> for BitArray<W> {
    fn bitxor_assign(&mut self, source: &BitArray<W>) {
        self.form_bitwise_xor(source);
    }
}

impl<W: Word> Not for BitArray<W> {
    type Output = Self;

    fn not(mut self) -> Self {
        self.toggle_all();
        self
    }
}
