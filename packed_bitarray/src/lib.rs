//! # packed_bitarray
//!
//! A `no_std` compatible engine for combining packed bit vectors in place.
//!
//! Bits live in slices of [`Word`]s, least significant bit first. The engine
//! ORs, ANDs or XORs a source into a destination, whole or as sub-ranges with
//! unrelated alignments, and complements whole arrays or ranges. The source
//! may be a range of the destination itself.
//!
//! ```rust
//! use packed_bitarray::BitArray;
//!
//! let mut a: BitArray<u8> = "0110011001".chars().map(|c| c == '1').collect();
//! let b: BitArray<u8> = "1111".chars().map(|c| c == '1').collect();
//!
//! // Bits 3..7 of `a` ^= all of `b`.
//! a.form_bitwise_xor_ranges(3..7, .., &b);
//! assert_eq!(a.iter().filter(|bit| *bit).count(), 5);
//!
//! // Copy-free overlap: bits 1..10 |= bits 0..9.
//! a.form_bitwise_or_within(1.., ..9);
//! assert_eq!(a.get(9), Some(true));
//! ```
//!
//! ## Without an owner
//!
//! ```rust
//! use packed_bitarray::{BitOp, BitsMut, BitsRef};
//!
//! let mut words = [0u64, 0];
//! let source = [u64::MAX];
//! let mut bits = BitsMut::new(&mut words, 100);
//! bits.combine_ranges(60..70, 0..10, &BitsRef::new(&source, 64), BitOp::Or.merger());
//! assert_eq!(words, [0xF000_0000_0000_0000, 0x3F]);
//! ```
//!

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(any(feature = "container", test), not(feature = "std")))]
extern crate alloc;

pub mod chunks;
pub mod combine;
pub mod error;
pub mod position;
pub mod view;
pub mod word;

#[cfg(feature = "container")]
pub mod array;

pub use chunks::{ChunkCursor, ChunkedBitsIterator};
pub use combine::BitOp;
pub use error::CombineError;
pub use position::BitPosition;
pub use view::{BitsMut, BitsRef, WordSpan, word_count};
pub use word::{Nibble, Word};

#[cfg(feature = "container")]
pub use array::BitArray;
