//! The payload compression scheme of FleetGuide devices.
//!
//! A compressed payload begins with a marker byte chosen by the device. Every
//! other byte is a literal, except the marker itself, which introduces either
//! an escaped literal marker (when followed by zero) or a back-reference: a
//! [varint](varint) length and offset instructing the decoder to copy bytes
//! from earlier in its own output.
//!
//! ```text
//! ┌────────┬─────────────────────────────────────────────────────────┐
//! │ Marker │ Symbols                                                 │
//! │ 1 byte │ literal │ marker 0x00 │ marker <length> <offset> │ ...  │
//! └────────┴─────────────────────────────────────────────────────────┘
//! ```
//!
//! Back-references copy one byte at a time, so an offset shorter than the
//! length repeats the most recent bytes.

pub mod varint;

mod decode;
mod encode;

pub use decode::{decompress, decompress_bounded};
pub use encode::compress;

use thiserror::Error;

/// Errors occurring while expanding a compressed payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Unexpectedly reached the end of the compressed bytes.
    #[error("Unexpectedly reached the end of the compressed bytes.")]
    UnexpectedEnd,
    /// A varint ran longer than its maximum width.
    #[error("Varint exceeds {} bytes.", varint::MAX_WIDTH)]
    MalformedVarint,
    /// A back-reference reached before the start of the output.
    #[error("Back-reference offset ({offset}) outside of output ({len} bytes).")]
    OffsetOutOfRange { offset: u32, len: usize },
    /// The expanded output would exceed the configured limit.
    #[error("Expanded output exceeds the limit of {limit} bytes.")]
    LimitExceeded { limit: usize },
}
