#[cfg(feature = "std")]
use thiserror::Error;

/// Contract violations detected before a combine or toggle touches any word.
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombineError {
    #[cfg_attr(
        feature = "std",
        error(
            "Bitwise combinations require matching counts: target has {target_count} bits, source has {source_count}"
        )
    )]
    CountMismatch {
        target_count: usize,
        source_count: usize,
    },

    #[cfg_attr(feature = "std", error("Range start {start} is past its end {end}"))]
    InvalidRange { start: usize, end: usize },

    #[cfg_attr(
        feature = "std",
        error("Bit range {start}..{end} out of bounds for length {count}")
    )]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        count: usize,
    },

    #[cfg_attr(
        feature = "std",
        error("{words} words cannot hold {count} bits")
    )]
    InsufficientWords { count: usize, words: usize },

    #[cfg_attr(feature = "std", error("Word {word} has bits set past the end"))]
    StrayBits { word: usize },
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for CombineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CombineError::CountMismatch {
                target_count,
                source_count,
            } => write!(
                f,
                "Bitwise combinations require matching counts: target has {} bits, source has {}",
                target_count, source_count
            ),
            CombineError::InvalidRange { start, end } => {
                write!(f, "Range start {} is past its end {}", start, end)
            }
            CombineError::RangeOutOfBounds { start, end, count } => write!(
                f,
                "Bit range {}..{} out of bounds for length {}",
                start, end, count
            ),
            CombineError::InsufficientWords { count, words } => {
                write!(f, "{} words cannot hold {} bits", words, count)
            }
            CombineError::StrayBits { word } => {
                write!(f, "Word {} has bits set past the end", word)
            }
        }
    }
}
