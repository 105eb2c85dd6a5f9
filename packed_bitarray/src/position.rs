use crate::word::Word;

/// A bit index broken into the word holding it and the offset inside that word.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitPosition {
    pub word: usize,
    pub bit: usize,
}

impl BitPosition {
    #[inline]
    pub const fn new(word: usize, bit: usize) -> Self {
        Self { word, bit }
    }

    /// `(index / W, index % W)`.
    #[inline]
    pub fn split<W: Word>(index: usize) -> Self {
        Self {
            word: index / W::CAPACITY,
            bit: index % W::CAPACITY,
        }
    }

    /// Like [`split`](Self::split), except that an index sitting exactly on a
    /// word boundary is reported as the end of the preceding word,
    /// `(word - 1, W)`. An exclusive bound then never points into a word the
    /// range does not touch.
    ///
    /// Index zero has no preceding word and stays `(0, 0)`.
    #[inline]
    pub fn end_split<W: Word>(index: usize) -> Self {
        let position = Self::split::<W>(index);
        if position.bit == 0 && position.word > 0 {
            Self {
                word: position.word - 1,
                bit: W::CAPACITY,
            }
        } else {
            position
        }
    }

    /// The logical index this position denotes.
    #[inline]
    pub fn index<W: Word>(self) -> usize {
        self.word * W::CAPACITY + self.bit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Nibble;

    #[test]
    fn split_and_end_split_agree_inside_words() {
        assert_eq!(BitPosition::split::<Nibble>(6), BitPosition::new(1, 2));
        assert_eq!(BitPosition::end_split::<Nibble>(6), BitPosition::new(1, 2));
        assert_eq!(BitPosition::split::<u64>(130), BitPosition::new(2, 2));
        assert_eq!(BitPosition::end_split::<u64>(130), BitPosition::new(2, 2));
    }

    #[test]
    fn end_split_steps_back_on_word_boundaries() {
        assert_eq!(BitPosition::split::<Nibble>(8), BitPosition::new(2, 0));
        assert_eq!(BitPosition::end_split::<Nibble>(8), BitPosition::new(1, 4));
        assert_eq!(BitPosition::end_split::<Nibble>(4), BitPosition::new(0, 4));
        assert_eq!(BitPosition::end_split::<u64>(64), BitPosition::new(0, 64));
    }

    #[test]
    fn end_split_of_zero_stays_put() {
        assert_eq!(BitPosition::end_split::<Nibble>(0), BitPosition::new(0, 0));
        assert_eq!(BitPosition::end_split::<u64>(0), BitPosition::new(0, 0));
    }

    #[test]
    fn both_splits_denote_the_same_index() {
        for i in 0..40 {
            assert_eq!(BitPosition::split::<Nibble>(i).index::<Nibble>(), i);
            assert_eq!(BitPosition::end_split::<Nibble>(i).index::<Nibble>(), i);
        }
    }
}
