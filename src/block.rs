//! Piece and block arithmetic.
//!
//! The torrent content is split in pieces of a fixed size. Only the last
//! piece can be shorter. The peer-wire protocol requests and sends blocks:
//! a range of bytes inside one piece.
//!
//! ```rust
//! use torrust_tracker_client::block::{BlockIndex, PieceLayout};
//!
//! // 3 pieces: 16 KiB, 16 KiB and 8 KiB.
//! let layout = PieceLayout::new(16_384, 40_960).unwrap();
//!
//! let block = BlockIndex::new(2, 4_096, 4_096);
//!
//! assert_eq!(layout.byte_range(&block).unwrap(), 36_864..40_960);
//! assert_eq!(layout.block_at(36_864, 4_096).unwrap(), block);
//! ```
use std::ops::Range;

use derive_more::Constructor;
use thiserror::Error;

/// A block inside a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Constructor)]
pub struct BlockIndex {
    pub piece: u32,
    /// Offset of the first byte of the block inside the piece.
    pub offset: u32,
    pub length: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    #[error("invalid piece layout: piece length {piece_length}, total length {total_length}")]
    InvalidLayout { piece_length: u32, total_length: u64 },

    #[error("piece {piece} out of range, the torrent has {pieces} pieces")]
    PieceOutOfRange { piece: u32, pieces: u32 },

    #[error("block {block:?} overruns its piece of {piece_size} bytes")]
    BlockOverrun { block: BlockIndex, piece_size: u32 },

    #[error("bytes {start}..{end} are not inside a single piece")]
    CrossesPieceBoundary { start: u64, end: u64 },

    #[error("empty block")]
    EmptyBlock,
}

/// How the content of a torrent is split in pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceLayout {
    piece_length: u32,
    total_length: u64,
}

impl PieceLayout {
    /// # Errors
    ///
    /// Will return [`BlockError::InvalidLayout`] if the piece length is zero
    /// or the content needs more than `u32::MAX` pieces.
    pub fn new(piece_length: u32, total_length: u64) -> Result<Self, BlockError> {
        let invalid = BlockError::InvalidLayout {
            piece_length,
            total_length,
        };

        if piece_length == 0 {
            return Err(invalid);
        }

        if u32::try_from(total_length.div_ceil(u64::from(piece_length))).is_err() {
            return Err(invalid);
        }

        Ok(Self {
            piece_length,
            total_length,
        })
    }

    #[must_use]
    pub fn piece_length(&self) -> u32 {
        self.piece_length
    }

    #[must_use]
    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pieces(&self) -> u32 {
        // `new` checks it fits.
        self.total_length.div_ceil(u64::from(self.piece_length)) as u32
    }

    /// The size of one piece. Only the last one can be shorter than the
    /// piece length.
    ///
    /// # Errors
    ///
    /// Will return [`BlockError::PieceOutOfRange`] if there is no such piece.
    #[allow(clippy::cast_possible_truncation)]
    pub fn piece_size(&self, piece: u32) -> Result<u32, BlockError> {
        let start = self.piece_start(piece)?;

        // Never more than the piece length.
        Ok((self.total_length - start).min(u64::from(self.piece_length)) as u32)
    }

    /// The absolute byte range of a block: `[start, start + length)`.
    ///
    /// # Errors
    ///
    /// Will return an error if the piece does not exist, the block is empty
    /// or it overruns its piece.
    pub fn byte_range(&self, block: &BlockIndex) -> Result<Range<u64>, BlockError> {
        if block.length == 0 {
            return Err(BlockError::EmptyBlock);
        }

        let piece_size = self.piece_size(block.piece)?;

        if u64::from(block.offset) + u64::from(block.length) > u64::from(piece_size) {
            return Err(BlockError::BlockOverrun {
                block: *block,
                piece_size,
            });
        }

        let start = self.piece_start(block.piece)? + u64::from(block.offset);

        Ok(start..start + u64::from(block.length))
    }

    /// The inverse of [`PieceLayout::byte_range`]: the block for an absolute
    /// byte range inside a single piece.
    ///
    /// # Errors
    ///
    /// Will return an error if the range is empty, goes past the end of the
    /// content or crosses a piece boundary.
    #[allow(clippy::cast_possible_truncation)]
    pub fn block_at(&self, start: u64, length: u32) -> Result<BlockIndex, BlockError> {
        if length == 0 {
            return Err(BlockError::EmptyBlock);
        }

        let end = start
            .checked_add(u64::from(length))
            .ok_or(BlockError::CrossesPieceBoundary { start, end: u64::MAX })?;

        let piece = start / u64::from(self.piece_length);

        let piece = u32::try_from(piece).map_err(|_| BlockError::PieceOutOfRange {
            piece: u32::MAX,
            pieces: self.pieces(),
        })?;

        let piece_start = self.piece_start(piece)?;
        let piece_size = self.piece_size(piece)?;

        if end > piece_start + u64::from(piece_size) {
            return Err(BlockError::CrossesPieceBoundary { start, end });
        }

        Ok(BlockIndex {
            piece,
            // Less than the piece length.
            offset: (start - piece_start) as u32,
            length,
        })
    }

    /// Whether the block covers exactly one whole piece: offset zero and
    /// the length of that piece.
    #[must_use]
    pub fn is_whole_piece(&self, block: &BlockIndex) -> bool {
        block.offset == 0 && self.piece_size(block.piece).is_ok_and(|size| size == block.length)
    }

    fn piece_start(&self, piece: u32) -> Result<u64, BlockError> {
        if piece >= self.pieces() {
            return Err(BlockError::PieceOutOfRange {
                piece,
                pieces: self.pieces(),
            });
        }

        Ok(u64::from(piece) * u64::from(self.piece_length))
    }
}
