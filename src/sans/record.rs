//! States processing records within a payload.

use chrono::{DateTime, Utc};
use tartan_bitfield::bitfield;
use zerocopy::{
    FromBytes,
    byteorder::little_endian::{U16, U32},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Record type carrying the fix time.
pub const TIMESTAMP: u8 = 0;
/// Record type carrying coordinates and kinematics.
pub const LOCATION: u8 = 1;

/// Offset from the Unix epoch to the device epoch, 2010-01-01T00:00:00Z.
pub const DEVICE_EPOCH: i64 = 1_262_304_000;

const KPH_PER_KNOT: f64 = 1.852;

/// State token to decode a record header.
#[derive(Debug)]
pub struct RecordHeader(pub(super) ());

impl RecordHeader {
    /// Transition to another state by decoding a record header.
    ///
    /// A known record whose body is too short to hold its layout is not
    /// interpreted, and is passed on as [`AnyRecord::Skip`].
    ///
    /// Returns the record type, the body length, and a successor state token.
    pub fn advance(self, r: [u8; 2]) -> (u8, u16, AnyRecord) {
        bitfield! {
            struct Header(u16) {
                [0..10] length: u16,
                [10..16] kind: u16,
            }
        }

        let header = Header(u16::from_le_bytes(r));
        let kind = header.kind() as u8;
        let length = header.length();

        let successor = match kind {
            TIMESTAMP if length as usize >= Timestamp::SIZE => {
                AnyRecord::Timestamp(Timestamp { length })
            }
            LOCATION if length as usize >= Location::SIZE => {
                AnyRecord::Location(Location { length })
            }
            _ => AnyRecord::Skip(Skip { bytes_remaining: length }),
        };

        (kind, length, successor)
    }
}

/// A state token for a record body.
#[derive(Debug)]
pub enum AnyRecord {
    Timestamp(Timestamp),
    Location(Location),
    Skip(Skip),
}

/// State token to decode a timestamp record body.
#[derive(Debug)]
pub struct Timestamp {
    length: u16,
}

impl Timestamp {
    const SIZE: usize = 4;

    /// Transition to another state by decoding a timestamp record body.
    ///
    /// Returns the fix time if representable, and a successor state token.
    pub fn advance(self, r: [u8; 4]) -> (Option<DateTime<Utc>>, Skip) {
        let seconds = DEVICE_EPOCH + i64::from(u32::from_le_bytes(r));
        let time = DateTime::from_timestamp(seconds, 0);

        let bytes_remaining = self.length - Self::SIZE as u16;

        (time, Skip { bytes_remaining })
    }
}

/// Coordinates and kinematics decoded from a location record.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocationRecord {
    /// Degrees, negative south of the equator.
    pub latitude: f64,
    /// Degrees, negative west of the prime meridian.
    pub longitude: f64,
    /// Ground speed in knots.
    pub speed: f64,
    /// The low nine bits of the course word.
    pub course: u16,
    /// `None` when the device reports no motion state.
    pub motion: Option<bool>,
    /// Satellites used for the fix.
    pub satellites: u8,
    /// Meters, signed.
    pub altitude: f64,
}

/// State token to decode a location record body.
#[derive(Debug)]
pub struct Location {
    length: u16,
}

impl Location {
    const SIZE: usize = 14;

    /// Transition to another state by decoding a location record body.
    ///
    /// Returns the decoded location, and a successor state token.
    pub fn advance(self, r: [u8; 14]) -> (LocationRecord, Skip) {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct LocationBody {
            latitude: U32,
            longitude: U32,
            speed: U16,
            course: U16,
            altitude: U16,
        }

        // Coordinate signs live in the speed word.
        bitfield! {
            struct Speed(u16) {
                [0..14] tenths_kph: u16,
                [14] is_south,
                [15] is_west,
            }
        }

        bitfield! {
            struct Course(u16) {
                [0..9] course: u16,
                [9..11] motion: u16,
                [11..16] satellites: u16,
            }
        }

        bitfield! {
            struct Altitude(u16) {
                [0..14] meters: u16,
                [14] is_negative,
            }
        }

        let LocationBody {
            latitude,
            longitude,
            speed,
            course,
            altitude,
        } = zerocopy::transmute!(r);

        let speed = Speed(speed.get());
        let course = Course(course.get());
        let altitude = Altitude(altitude.get());

        let mut latitude = f64::from(latitude.get()) * 90.0 / f64::from(u32::MAX);
        let mut longitude = f64::from(longitude.get()) * 180.0 / f64::from(u32::MAX);

        if speed.is_south() {
            latitude = -latitude;
        }
        if speed.is_west() {
            longitude = -longitude;
        }

        let motion = match course.motion() {
            0 => None,
            1 => Some(false),
            _ => Some(true),
        };

        let mut meters = f64::from(altitude.meters());
        if altitude.is_negative() {
            meters = -meters;
        }

        let location = LocationRecord {
            latitude,
            longitude,
            speed: f64::from(speed.tenths_kph()) * 0.1 / KPH_PER_KNOT,
            course: course.course(),
            motion,
            satellites: course.satellites() as u8,
            altitude: meters,
        };

        let bytes_remaining = self.length - Self::SIZE as u16;

        (location, Skip { bytes_remaining })
    }
}

/// State token to pass over the uninterpreted tail of a record body.
#[derive(Debug)]
pub struct Skip {
    bytes_remaining: u16,
}

impl Skip {
    /// Number of body bytes left to pass over.
    pub fn len(&self) -> usize {
        self.bytes_remaining as usize
    }

    /// Whether the body has been read to its end.
    pub fn is_empty(&self) -> bool {
        self.bytes_remaining == 0
    }

    /// Transition to another state once [`Skip::len`] bytes are passed over.
    pub fn advance(self) -> RecordHeader {
        RecordHeader(())
    }
}
