//! Internal finite-state machine for implementing decoders.
//!
//! This module is intended for advanced applications that need fine control
//! over decoder internals, such as transports that buffer frames themselves.
//! See [`crate::avec`] for implementations covering common decoding patterns.
//!
//! # Architecture
//!
//! All states are represented by a non-copy token. Once enough bytes are
//! ready, transition to another state by calling the token's `advance` method.
//! This will return a successor state token, along with any extracted data.
//!
//! Only the initial state, re-exported for convenience as [`Decoder`], can be
//! constructed.
//!
//! A frame is decoded in two phases. The [`header`] states walk the envelope
//! up to the [`Payload`](header::Payload) token, which tells how many bytes
//! to read and whether they must be expanded with
//! [`crate::compression::decompress`]. The [`record`] states then walk the
//! expanded payload, and a [`Segmenter`](fix::Segmenter) groups the decoded
//! records into fixes.
//!
//! Some areas of the decoding process are not represented in the
//! finite-state machine and must be carefully written:
//!
//! - Reading bytes from the correct place in the frame, including skipping the
//! unread tail of each record body.
//!
//! - Ending the record walk once the payload is exhausted.
//!
//! - Resolving the device session between the device identifier and the rest
//! of the header.
//!
//! Implementers are recommended to begin by studying and modifying a decoder
//! from the [`crate::avec`] module.

pub mod fix;
pub mod header;
pub mod record;

/// Entrypoint to the finite-state machine.
pub type Decoder = header::FrameHeader;
