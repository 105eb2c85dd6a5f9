//! In-place bitwise combination and complement of word-array handles.
//!
//! Every entry point checks its ranges and counts before touching a word.
//! The `try_` forms report a violation as a [`CombineError`]. The plain forms
//! treat it as a programming error and panic.
//!
//! When the source lives in the destination buffer ([`BitsMut::combine_within`]),
//! the pass runs front to back if the destination range starts at or before
//! the source range, and back to front otherwise, like `memmove`. Each source
//! bit is then read before the pass can overwrite it.
//!
//! # Examples
//!
//! ```rust
//! use packed_bitarray::{BitOp, BitsMut, BitsRef};
//!
//! let mut target = [0b0000_0001u8];
//! let source = [0b0110_1000u8];
//!
//! let mut bits = BitsMut::new(&mut target, 8);
//! // OR source bits 3..7 into target bits 1..5.
//! bits.combine_ranges(1..5, 3..7, &BitsRef::new(&source, 8), BitOp::Or.merger());
//! assert_eq!(target, [0b0001_1011]);
//! ```

use core::ops::Range;

use crate::chunks::ChunkCursor;
use crate::error::CombineError;
use crate::position::BitPosition;
use crate::view::{BitsMut, BitsRef, WordSpan, check_range, word_count};
use crate::word::Word;

type Result<T> = core::result::Result<T, CombineError>;

/// The bitwise operators the engine is usually driven with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BitOp {
    Or,
    And,
    Xor,
}

impl BitOp {
    #[inline]
    pub fn apply<W: Word>(self, target: W, source: W) -> W {
        match self {
            BitOp::Or => target.union(source),
            BitOp::And => target.intersection(source),
            BitOp::Xor => target.symmetric_difference(source),
        }
    }

    /// The operator as a word merger for the `combine` family.
    #[inline]
    pub fn merger<W: Word>(self) -> impl FnMut(W, W) -> W {
        move |target, source| self.apply(target, source)
    }
}

/// Where the source words of a combine come from.
#[derive(Copy, Clone, Debug)]
enum Origin<'s, W: Word> {
    /// A buffer borrowed separately from the destination. It cannot overlap
    /// the destination.
    Detached(&'s [W]),
    /// The destination buffer itself.
    Target,
}

impl<'s, W: Word> Origin<'s, W> {
    #[inline]
    fn words<'b>(self, target: &'b [W]) -> &'b [W]
    where
        's: 'b,
    {
        match self {
            Origin::Detached(words) => words,
            Origin::Target => target,
        }
    }

    /// Whether to walk front to back, given the absolute bit positions where
    /// the destination and source ranges start.
    #[inline]
    fn ascending(self, target_bit: usize, source_bit: usize) -> bool {
        match self {
            Origin::Detached(_) => true,
            Origin::Target => target_bit <= source_bit,
        }
    }
}

/// How the last, partial word of a word-aligned pass is written.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Tail {
    /// Bits past the end are stray; combine the whole word and clear them.
    Mask,
    /// Bits past the end belong to someone else; splice the window in.
    Splice,
}

#[inline]
fn merge_word<W: Word, F: FnMut(W, W) -> W>(target: &mut [W], at: usize, bits: W, op: &mut F) {
    target[at] = op(target[at], bits);
}

#[inline]
fn merge_tail<W: Word, F: FnMut(W, W) -> W>(
    word: &mut W,
    bits: W,
    count: usize,
    tail: Tail,
    op: &mut F,
) {
    *word = match tail {
        Tail::Mask => op(*word, bits).intersection(W::mask_up_to(count)),
        Tail::Splice => word.combined_slice(0, count, bits, &mut *op),
    };
}

/// `dst ⊕= src` for two spans whose ranges both start at bit 0 of their first
/// word.
fn combine_aligned<W, F>(
    target: &mut [W],
    dst: WordSpan,
    origin: Origin<'_, W>,
    src: WordSpan,
    tail: Tail,
    op: &mut F,
) where
    W: Word,
    F: FnMut(W, W) -> W,
{
    debug_assert_eq!(dst.count, src.count);
    let end = BitPosition::split::<W>(dst.count);
    if origin.ascending(dst.absolute_bit::<W>(0), src.absolute_bit::<W>(0)) {
        for i in 0..end.word {
            let bits = origin.words(target)[src.start + i];
            merge_word(target, dst.start + i, bits, op);
        }
        if end.bit > 0 {
            let bits = origin.words(target)[src.start + end.word];
            merge_tail(&mut target[dst.start + end.word], bits, end.bit, tail, op);
        }
    } else {
        if end.bit > 0 {
            let bits = origin.words(target)[src.start + end.word];
            merge_tail(&mut target[dst.start + end.word], bits, end.bit, tail, op);
        }
        for i in (0..end.word).rev() {
            let bits = origin.words(target)[src.start + i];
            merge_word(target, dst.start + i, bits, op);
        }
    }
}

/// `dst ⊕= src[src_range]` where the destination range starts at bit 0 of
/// its first word and the source range may start anywhere.
fn combine_shifted<W, F>(
    target: &mut [W],
    dst: WordSpan,
    origin: Origin<'_, W>,
    src: WordSpan,
    src_range: Range<usize>,
    tail: Tail,
    op: &mut F,
) where
    W: Word,
    F: FnMut(W, W) -> W,
{
    debug_assert_eq!(dst.count, src_range.len());
    let end = BitPosition::split::<W>(dst.count);
    let source_bit = src.absolute_bit::<W>(src_range.start);
    let mut cursor = ChunkCursor::<W>::new(src.start, src_range);
    if origin.ascending(dst.absolute_bit::<W>(0), source_bit) {
        for i in 0..end.word {
            let bits = cursor.next_bits(origin.words(target), W::CAPACITY);
            merge_word(target, dst.start + i, bits, op);
        }
        if end.bit > 0 {
            let bits = cursor.next_bits(origin.words(target), end.bit);
            merge_tail(&mut target[dst.start + end.word], bits, end.bit, tail, op);
        }
    } else {
        cursor.jump_back();
        if end.bit > 0 {
            let bits = cursor.previous_bits(origin.words(target), end.bit);
            merge_tail(&mut target[dst.start + end.word], bits, end.bit, tail, op);
        }
        for i in (0..end.word).rev() {
            let bits = cursor.previous_bits(origin.words(target), W::CAPACITY);
            merge_word(target, dst.start + i, bits, op);
        }
    }
}

/// `dst[dst_range] ⊕= src[src_range]` for arbitrary, equally long ranges.
fn combine_spans<W, F>(
    target: &mut [W],
    dst: WordSpan,
    dst_range: Range<usize>,
    origin: Origin<'_, W>,
    src: WordSpan,
    src_range: Range<usize>,
    op: &mut F,
) where
    W: Word,
    F: FnMut(W, W) -> W,
{
    debug_assert_eq!(dst_range.len(), src_range.len());
    if dst_range.is_empty() {
        return;
    }
    let (dst, dst_range) = dst.rebased::<W>(dst_range);
    let (src, src_range) = src.rebased::<W>(src_range);
    if dst_range.start == 0 {
        // Words after the range may hold live bits, so the tail is spliced.
        if src_range.start == 0 {
            combine_aligned(target, dst, origin, src, Tail::Splice, op);
        } else {
            combine_shifted(target, dst, origin, src, src_range, Tail::Splice, op);
        }
        return;
    }

    let target_bit = dst.absolute_bit::<W>(dst_range.start);
    let source_bit = src.absolute_bit::<W>(src_range.start);
    let mut dst_cursor = ChunkCursor::<W>::new(dst.start, dst_range);
    let mut src_cursor = ChunkCursor::<W>::new(src.start, src_range);
    if origin.ascending(target_bit, source_bit) {
        while let Some((at, count)) = dst_cursor.next_chunk_position(W::CAPACITY) {
            let bits = src_cursor.next_bits(origin.words(target), count);
            let word = &mut target[dst.start + at.word];
            *word = word.combined_slice(at.bit, count, bits, &mut *op);
        }
    } else {
        dst_cursor.jump_back();
        src_cursor.jump_back();
        while let Some((at, count)) = dst_cursor.previous_chunk_position(W::CAPACITY) {
            let bits = src_cursor.previous_bits(origin.words(target), count);
            let word = &mut target[dst.start + at.word];
            *word = word.combined_slice(at.bit, count, bits, &mut *op);
        }
    }
}

fn check_counts(target: usize, source: usize) -> Result<()> {
    if target != source {
        return Err(CombineError::CountMismatch {
            target_count: target,
            source_count: source,
        });
    }
    Ok(())
}

impl<W: Word> BitsMut<'_, W> {
    /// Combines every bit with the bit at the same index of `source`.
    ///
    /// # Panics
    ///
    /// Panics if the counts differ.
    pub fn combine<F>(&mut self, source: &BitsRef<'_, W>, op: F)
    where
        F: FnMut(W, W) -> W,
    {
        if let Err(err) = self.try_combine(source, op) {
            panic!("{err}");
        }
    }

    pub fn try_combine<F>(&mut self, source: &BitsRef<'_, W>, mut op: F) -> Result<()>
    where
        F: FnMut(W, W) -> W,
    {
        check_counts(self.count, source.count())?;
        let dst = self.span();
        let origin = Origin::Detached(source.words());
        combine_aligned(self.words, dst, origin, source.span(), Tail::Mask, &mut op);
        Ok(())
    }

    /// Combines every bit with the bits of `source_range` in `source`.
    ///
    /// # Panics
    ///
    /// Panics if `source_range` is out of bounds or its length differs from
    /// `count`.
    pub fn combine_with_range<F>(
        &mut self,
        source_range: Range<usize>,
        source: &BitsRef<'_, W>,
        op: F,
    ) where
        F: FnMut(W, W) -> W,
    {
        if let Err(err) = self.try_combine_with_range(source_range, source, op) {
            panic!("{err}");
        }
    }

    pub fn try_combine_with_range<F>(
        &mut self,
        source_range: Range<usize>,
        source: &BitsRef<'_, W>,
        mut op: F,
    ) -> Result<()>
    where
        F: FnMut(W, W) -> W,
    {
        check_range(&source_range, source.count())?;
        check_counts(self.count, source_range.len())?;
        if self.count == 0 {
            return Ok(());
        }
        let dst = self.span();
        let origin = Origin::Detached(source.words());
        combine_shifted(
            self.words,
            dst,
            origin,
            source.span(),
            source_range,
            Tail::Mask,
            &mut op,
        );
        Ok(())
    }

    /// Combines the bits of `target_range` with the bits of `source_range`
    /// in `source`. Bits outside `target_range` are left alone.
    ///
    /// # Panics
    ///
    /// Panics if either range is out of bounds or their lengths differ.
    pub fn combine_ranges<F>(
        &mut self,
        target_range: Range<usize>,
        source_range: Range<usize>,
        source: &BitsRef<'_, W>,
        op: F,
    ) where
        F: FnMut(W, W) -> W,
    {
        if let Err(err) = self.try_combine_ranges(target_range, source_range, source, op) {
            panic!("{err}");
        }
    }

    pub fn try_combine_ranges<F>(
        &mut self,
        target_range: Range<usize>,
        source_range: Range<usize>,
        source: &BitsRef<'_, W>,
        mut op: F,
    ) -> Result<()>
    where
        F: FnMut(W, W) -> W,
    {
        check_range(&target_range, self.count)?;
        check_range(&source_range, source.count())?;
        check_counts(target_range.len(), source_range.len())?;
        let dst = self.span();
        let origin = Origin::Detached(source.words());
        combine_spans(
            self.words,
            dst,
            target_range,
            origin,
            source.span(),
            source_range,
            &mut op,
        );
        Ok(())
    }

    /// Combines the bits of `target_range` with the bits of `source_range`
    /// of the same handle. The ranges may overlap; the result is as if the
    /// source bits had been copied out first.
    ///
    /// # Panics
    ///
    /// Panics if either range is out of bounds or their lengths differ.
    pub fn combine_within<F>(
        &mut self,
        target_range: Range<usize>,
        source_range: Range<usize>,
        op: F,
    ) where
        F: FnMut(W, W) -> W,
    {
        if let Err(err) = self.try_combine_within(target_range, source_range, op) {
            panic!("{err}");
        }
    }

    pub fn try_combine_within<F>(
        &mut self,
        target_range: Range<usize>,
        source_range: Range<usize>,
        mut op: F,
    ) -> Result<()>
    where
        F: FnMut(W, W) -> W,
    {
        check_range(&target_range, self.count)?;
        check_range(&source_range, self.count)?;
        check_counts(target_range.len(), source_range.len())?;
        let span = self.span();
        combine_spans(
            self.words,
            span,
            target_range,
            Origin::Target,
            span,
            source_range,
            &mut op,
        );
        Ok(())
    }

    /// Flips every bit.
    pub fn toggle_all(&mut self) {
        let occupied = word_count::<W>(self.count);
        for word in &mut self.words[..occupied] {
            *word = word.complement();
        }
        let end = BitPosition::split::<W>(self.count);
        if end.bit > 0 {
            let word = &mut self.words[end.word];
            *word = word.intersection(W::mask_up_to(end.bit));
        }
    }

    /// Flips the bits of `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    pub fn toggle_range(&mut self, range: Range<usize>) {
        if let Err(err) = self.try_toggle_range(range) {
            panic!("{err}");
        }
    }

    pub fn try_toggle_range(&mut self, range: Range<usize>) -> Result<()> {
        check_range(&range, self.count)?;
        if range.is_empty() {
            return Ok(());
        }
        let start = BitPosition::split::<W>(range.start);
        let end = BitPosition::split::<W>(range.end);
        let words = &mut *self.words;
        if start.word == end.word {
            let word = &mut words[start.word];
            *word = word.symmetric_difference(W::mask_from(start.bit, end.bit));
            return Ok(());
        }
        let first = &mut words[start.word];
        *first = first.symmetric_difference(W::mask_up_to(start.bit).complement());
        for word in &mut words[start.word + 1..end.word] {
            *word = word.complement();
        }
        if end.bit > 0 {
            let last = &mut words[end.word];
            *last = last.symmetric_difference(W::mask_up_to(end.bit));
        }
        Ok(())
    }
}
