//! Walking a bit range of a word array in chunks that never cross a word
//! boundary.
//!
//! Two ranges with different alignments are brought back into step by
//! letting one side choose chunk sizes and asking the other for exactly that
//! many bits.
//!
//! # Examples
//!
//! ```rust
//! use packed_bitarray::ChunkedBitsIterator;
//!
//! let words = [0xF0u8, 0x0F];
//! // Bits 2..13 cover the top six bits of the first word and the low five
//! // bits of the second.
//! let chunks: Vec<_> = ChunkedBitsIterator::new(&words, 2..13).collect();
//! assert_eq!(chunks, vec![(0b111100, 6), (0b01111, 5)]);
//! ```

use core::marker::PhantomData;
use core::ops::Range;

use crate::position::BitPosition;
use crate::word::Word;

/// Position state of a chunked walk over `start..end`, without the words.
///
/// Every read takes the word slice as an argument, so the slice can be
/// written to between reads. The combine engine relies on that when the
/// source and destination share a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkCursor<W: Word> {
    base: usize,
    start: usize,
    end: usize,
    position: usize,
    _word: PhantomData<W>,
}

impl<W: Word> ChunkCursor<W> {
    /// A cursor over bits `range` of the words starting at index `base`,
    /// positioned at the front.
    pub fn new(base: usize, range: Range<usize>) -> Self {
        debug_assert!(range.start <= range.end);
        Self {
            base,
            start: range.start,
            end: range.end,
            position: range.start,
            _word: PhantomData,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn jump_front(&mut self) {
        self.position = self.start;
    }

    pub fn jump_back(&mut self) {
        self.position = self.end;
    }

    /// Claims the next chunk of at most `max_bit_count` bits.
    ///
    /// A chunk stops at the end of the word it starts in, so it may be
    /// shorter than requested even when more bits remain.
    pub fn next_chunk_position(&mut self, max_bit_count: usize) -> Option<(BitPosition, usize)> {
        debug_assert!(max_bit_count > 0);
        if self.position >= self.end {
            return None;
        }
        let p = BitPosition::split::<W>(self.position);
        let limit = self.end.min(self.position + max_bit_count);
        let l = BitPosition::split::<W>(limit);
        if p.word == l.word {
            self.position = limit;
            return Some((p, l.bit - p.bit));
        }
        let count = W::CAPACITY - p.bit;
        self.position += count;
        Some((p, count))
    }

    /// Claims the chunk of at most `max_bit_count` bits just below the
    /// current position, stopping at the start of the word it ends in.
    ///
    /// Returns the chunk's lowest position and its length.
    pub fn previous_chunk_position(
        &mut self,
        max_bit_count: usize,
    ) -> Option<(BitPosition, usize)> {
        debug_assert!(max_bit_count > 0);
        if self.position <= self.start {
            return None;
        }
        let limit = if self.position >= self.start + max_bit_count {
            self.position - max_bit_count
        } else {
            self.start
        };
        let l = BitPosition::split::<W>(limit);
        let p = BitPosition::end_split::<W>(self.position);
        if p.word == l.word {
            self.position = limit;
            return Some((l, p.bit - l.bit));
        }
        self.position -= p.bit;
        Some((BitPosition::split::<W>(self.position), p.bit))
    }

    pub fn next_chunk(&mut self, words: &[W], max_bit_count: usize) -> Option<(W, usize)> {
        let (at, count) = self.next_chunk_position(max_bit_count)?;
        Some((self.read(words, at, count), count))
    }

    pub fn previous_chunk(&mut self, words: &[W], max_bit_count: usize) -> Option<(W, usize)> {
        let (at, count) = self.previous_chunk_position(max_bit_count)?;
        Some((self.read(words, at, count), count))
    }

    /// Reads the next `count` bits, which may straddle a word boundary.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `count` bits remain before the end.
    pub fn next_bits(&mut self, words: &[W], count: usize) -> W {
        assert!(count > 0 && count <= W::CAPACITY);
        let (low, c1) = self
            .next_chunk(words, count)
            .unwrap_or_else(|| panic!("no bits left to read at {}", self.position));
        let remainder = count - c1;
        if remainder == 0 {
            return low;
        }
        let (high, c2) = self
            .next_chunk(words, remainder)
            .unwrap_or_else(|| panic!("no bits left to read at {}", self.position));
        debug_assert_eq!(remainder, c2);
        low.union(high.shifted_up(c1))
    }

    /// Reads the `count` bits just below the current position, which may
    /// straddle a word boundary. Bit 0 of the result is the lowest bit read.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `count` bits remain after the start.
    pub fn previous_bits(&mut self, words: &[W], count: usize) -> W {
        assert!(count > 0 && count <= W::CAPACITY);
        let (high, c1) = self
            .previous_chunk(words, count)
            .unwrap_or_else(|| panic!("no bits left to read at {}", self.position));
        let remainder = count - c1;
        if remainder == 0 {
            return high;
        }
        let (low, c2) = self
            .previous_chunk(words, remainder)
            .unwrap_or_else(|| panic!("no bits left to read at {}", self.position));
        debug_assert_eq!(remainder, c2);
        high.shifted_up(c2).union(low)
    }

    #[inline]
    fn read(&self, words: &[W], at: BitPosition, count: usize) -> W {
        words[self.base + at.word]
            .shifted_down(at.bit)
            .intersection(W::mask_up_to(count))
    }
}

/// A [`ChunkCursor`] bound to the words it walks.
///
/// As an [`Iterator`] it yields `(bits, count)` pairs front to back, each
/// chunk as long as its word allows. The cursor methods remain available for
/// backward walks and for fixed-size reads.
#[derive(Debug, Clone)]
pub struct ChunkedBitsIterator<'a, W: Word> {
    words: &'a [W],
    cursor: ChunkCursor<W>,
}

impl<'a, W: Word> ChunkedBitsIterator<'a, W> {
    /// # Panics
    ///
    /// Panics if `range` does not fit inside `words`.
    pub fn new(words: &'a [W], range: Range<usize>) -> Self {
        assert!(
            range.start <= range.end && range.end <= words.len() * W::CAPACITY,
            "Bit range {}..{} out of bounds for {} words",
            range.start,
            range.end,
            words.len()
        );
        Self {
            words,
            cursor: ChunkCursor::new(0, range),
        }
    }

    #[inline]
    pub fn words(&self) -> &'a [W] {
        self.words
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn jump_front(&mut self) {
        self.cursor.jump_front();
    }

    pub fn jump_back(&mut self) {
        self.cursor.jump_back();
    }

    pub fn next_chunk_position(&mut self, max_bit_count: usize) -> Option<(BitPosition, usize)> {
        self.cursor.next_chunk_position(max_bit_count)
    }

    pub fn previous_chunk_position(
        &mut self,
        max_bit_count: usize,
    ) -> Option<(BitPosition, usize)> {
        self.cursor.previous_chunk_position(max_bit_count)
    }

    pub fn next_chunk(&mut self, max_bit_count: usize) -> Option<(W, usize)> {
        self.cursor.next_chunk(self.words, max_bit_count)
    }

    pub fn previous_chunk(&mut self, max_bit_count: usize) -> Option<(W, usize)> {
        self.cursor.previous_chunk(self.words, max_bit_count)
    }

    pub fn next_bits(&mut self, count: usize) -> W {
        self.cursor.next_bits(self.words, count)
    }

    pub fn previous_bits(&mut self, count: usize) -> W {
        self.cursor.previous_bits(self.words, count)
    }
}

impl<W: Word> Iterator for ChunkedBitsIterator<'_, W> {
    type Item = (W, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk(W::CAPACITY)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.end.saturating_sub(self.cursor.position);
        if remaining == 0 {
            return (0, Some(0));
        }
        // One chunk per word touched.
        let first = BitPosition::split::<W>(self.cursor.position).word;
        let last = BitPosition::end_split::<W>(self.cursor.end).word;
        let chunks = last - first + 1;
        (chunks, Some(chunks))
    }
}

impl<W: Word> ExactSizeIterator for ChunkedBitsIterator<'_, W> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Nibble;

    #[cfg(not(feature = "std"))]
    use alloc::{vec, vec::Vec};

    fn nibbles(bits: &[u8]) -> Vec<Nibble> {
        bits.iter().map(|&b| Nibble::new(b)).collect()
    }

    #[test]
    fn forward_chunks_stop_at_word_boundaries() {
        let words = nibbles(&[0; 4]);
        let mut cursor = ChunkCursor::<Nibble>::new(0, 3..14);
        let mut chunks = vec![];
        while let Some(chunk) = cursor.next_chunk_position(4) {
            chunks.push(chunk);
        }
        assert_eq!(
            chunks,
            vec![
                (BitPosition::new(0, 3), 1),
                (BitPosition::new(1, 0), 4),
                (BitPosition::new(2, 0), 4),
                (BitPosition::new(3, 0), 2),
            ]
        );
        assert_eq!(cursor.position(), 14);
        assert_eq!(cursor.next_chunk(&words, 4), None);
    }

    #[test]
    fn forward_chunks_honour_the_requested_size() {
        let mut cursor = ChunkCursor::<Nibble>::new(0, 1..8);
        assert_eq!(cursor.next_chunk_position(2), Some((BitPosition::new(0, 1), 2)));
        assert_eq!(cursor.next_chunk_position(2), Some((BitPosition::new(0, 3), 1)));
        assert_eq!(cursor.next_chunk_position(3), Some((BitPosition::new(1, 0), 3)));
        assert_eq!(cursor.next_chunk_position(3), Some((BitPosition::new(1, 3), 1)));
        assert_eq!(cursor.next_chunk_position(3), None);
    }

    #[test]
    fn backward_chunks_mirror_forward_ones() {
        let mut cursor = ChunkCursor::<Nibble>::new(0, 3..14);
        cursor.jump_back();
        let mut chunks = vec![];
        while let Some(chunk) = cursor.previous_chunk_position(4) {
            chunks.push(chunk);
        }
        assert_eq!(
            chunks,
            vec![
                (BitPosition::new(3, 0), 2),
                (BitPosition::new(2, 0), 4),
                (BitPosition::new(1, 0), 4),
                (BitPosition::new(0, 3), 1),
            ]
        );
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn backward_chunks_from_a_word_boundary() {
        let mut cursor = ChunkCursor::<Nibble>::new(0, 0..8);
        cursor.jump_back();
        assert_eq!(cursor.previous_chunk_position(3), Some((BitPosition::new(1, 1), 3)));
        assert_eq!(cursor.previous_chunk_position(3), Some((BitPosition::new(1, 0), 1)));
        assert_eq!(cursor.previous_chunk_position(4), Some((BitPosition::new(0, 0), 4)));
        assert_eq!(cursor.previous_chunk_position(4), None);
    }

    #[test]
    fn next_bits_joins_two_chunks() {
        // bits 0..12: 1011 0110 0001
        let words = nibbles(&[0b1101, 0b0110, 0b1000]);
        let mut cursor = ChunkCursor::<Nibble>::new(0, 2..12);
        assert_eq!(cursor.next_bits(&words, 4), Nibble::new(0b1011));
        assert_eq!(cursor.next_bits(&words, 4), Nibble::new(0b0001));
        assert_eq!(cursor.next_bits(&words, 2), Nibble::new(0b10));
        assert_eq!(cursor.position(), 12);
    }

    #[test]
    fn previous_bits_reads_the_same_frames_backwards() {
        let words = nibbles(&[0b1101, 0b0110, 0b1000]);
        let mut cursor = ChunkCursor::<Nibble>::new(0, 2..12);
        cursor.jump_back();
        assert_eq!(cursor.previous_bits(&words, 2), Nibble::new(0b10));
        assert_eq!(cursor.previous_bits(&words, 4), Nibble::new(0b0001));
        assert_eq!(cursor.previous_bits(&words, 4), Nibble::new(0b1011));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn cursor_reads_relative_to_its_base() {
        let words = nibbles(&[0b1111, 0b0000, 0b0101]);
        let mut cursor = ChunkCursor::<Nibble>::new(2, 1..3);
        assert_eq!(cursor.next_bits(&words, 2), Nibble::new(0b10));
    }

    #[test]
    fn iterator_yields_full_word_chunks() {
        let words = [0xF0F0u16, 0x00FF];
        let mut chunks = ChunkedBitsIterator::new(&words, 4..24);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks.next(), Some((0x0F0F, 12)));
        assert_eq!(chunks.next(), Some((0xFF, 8)));
        assert_eq!(chunks.next(), None);

        chunks.jump_front();
        assert_eq!(chunks.next_bits(16), 0xFF0F);
        chunks.jump_back();
        assert_eq!(chunks.previous_bits(16), 0xFFF0);
    }

    #[test]
    fn empty_ranges_yield_nothing() {
        let words = [0u64; 2];
        let mut chunks = ChunkedBitsIterator::new(&words, 64..64);
        assert_eq!(chunks.len(), 0);
        assert_eq!(chunks.next(), None);
        assert_eq!(chunks.previous_chunk(64), None);
    }
}
