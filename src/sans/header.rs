//! States processing frame headers.

use either::Either::{self, Left, Right};
use tartan_bitfield::bitfield;
use zerocopy::{FromBytes, byteorder::little_endian::U16};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::record::RecordHeader;

/// Envelope fields decoded from the leading bytes of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameOptions {
    /// Signature byte. Consumed, never validated.
    pub signature: u8,
    /// Number of payload bytes on the wire, before any expansion.
    pub length: u16,
    /// A four byte device identifier follows the options word.
    pub has_device_id: bool,
    /// A one byte message subtype follows.
    pub has_subtype: bool,
    /// A two byte acknowledgement field follows.
    pub has_acknowledgement: bool,
    /// The payload must be expanded before its records are read.
    pub is_compressed: bool,
}

/// State token to decode a frame header.
#[derive(Debug)]
pub struct FrameHeader;

impl FrameHeader {
    /// Transition to another state by decoding the signature and options word.
    ///
    /// Returns the envelope options, and a successor state token.
    pub fn advance(r: [u8; 3]) -> (FrameOptions, Either<DeviceId, Extension>) {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct Envelope {
            signature: u8,
            options: U16,
        }

        bitfield! {
            struct Options(u16) {
                [0..11] length: u16,
                [11] has_device_id,
                [12] has_subtype,
                [13] has_acknowledgement,
                [14] is_compressed,
            }
        }

        let Envelope { signature, options } = zerocopy::transmute!(r);
        let options = Options(options.get());

        let options = FrameOptions {
            signature,
            length: options.length(),
            has_device_id: options.has_device_id(),
            has_subtype: options.has_subtype(),
            has_acknowledgement: options.has_acknowledgement(),
            is_compressed: options.is_compressed(),
        };

        let successor = if options.has_device_id {
            Left(DeviceId(options))
        } else {
            Right(Extension::after_identity(options))
        };

        (options, successor)
    }
}

/// State token to decode the device identifier.
#[derive(Debug)]
pub struct DeviceId(pub(super) FrameOptions);

impl DeviceId {
    /// Transition to another state by decoding the device identifier.
    ///
    /// The identifier is the device's own, and must be resolved to a session
    /// before the rest of the frame is of any use.
    ///
    /// Returns the identifier, and a successor state token.
    pub fn advance(self, r: [u8; 4]) -> (u32, Extension) {
        (u32::from_le_bytes(r), Extension::after_identity(self.0))
    }
}

/// A state token for an optional header field, or the payload.
#[derive(Debug)]
pub enum Extension {
    Subtype(Subtype),
    Acknowledgement(Acknowledgement),
    Payload(Payload),
}

impl Extension {
    fn after_identity(options: FrameOptions) -> Self {
        if options.has_subtype {
            Self::Subtype(Subtype(options))
        } else {
            after_subtype(options).either(Self::Acknowledgement, Self::Payload)
        }
    }
}

fn after_subtype(options: FrameOptions) -> Either<Acknowledgement, Payload> {
    if options.has_acknowledgement {
        Left(Acknowledgement(options))
    } else {
        Right(Payload(options))
    }
}

/// State token to decode the message subtype.
#[derive(Debug)]
pub struct Subtype(pub(super) FrameOptions);

impl Subtype {
    /// Transition to another state by decoding the message subtype.
    ///
    /// Returns the subtype (the low four bits of the byte), and a successor
    /// state token.
    pub fn advance(self, r: [u8; 1]) -> (u8, Either<Acknowledgement, Payload>) {
        bitfield! {
            struct SubtypeByte(u8) {
                [0..4] subtype: u8,
            }
        }

        (SubtypeByte(r[0]).subtype(), after_subtype(self.0))
    }
}

/// State token to decode the acknowledgement field.
#[derive(Debug)]
pub struct Acknowledgement(pub(super) FrameOptions);

impl Acknowledgement {
    /// Transition to another state by decoding the acknowledgement field.
    ///
    /// Returns the acknowledgement value, which decoding has no further use
    /// for, and a successor state token.
    pub fn advance(self, r: [u8; 2]) -> (u16, Payload) {
        (u16::from_le_bytes(r), Payload(self.0))
    }
}

/// State token for the frame payload.
///
/// The payload is not decoded by this token. Read [`Payload::len`] bytes, and
/// if [`Payload::is_compressed`], expand them with
/// [`crate::compression::decompress`] before walking the records.
#[derive(Debug)]
pub struct Payload(pub(super) FrameOptions);

impl Payload {
    /// Number of payload bytes on the wire.
    pub fn len(&self) -> usize {
        self.0.length as usize
    }

    /// Whether the frame carries no payload bytes at all.
    pub fn is_empty(&self) -> bool {
        self.0.length == 0
    }

    /// Whether the payload bytes must be expanded before use.
    pub fn is_compressed(&self) -> bool {
        self.0.is_compressed
    }

    /// Transition to the record stream once the payload bytes are in hand.
    pub fn advance(self) -> RecordHeader {
        RecordHeader(())
    }
}
