//! Grouping of decoded records into position fixes.

use core::mem;

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::record::LocationRecord;

/// A single position report.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PositionFix {
    /// Platform identifier of the reporting device, from its session.
    pub device_id: u64,
    /// `None` until a timestamp record is seen, or the fix is finalized.
    pub time: Option<DateTime<Utc>>,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub altitude: f64,
    /// `None` unless a location record is seen. Fixes without it are enriched
    /// from the last known location.
    pub satellites: Option<u8>,
    pub motion: Option<bool>,
}

impl PositionFix {
    /// Create an empty fix for a device.
    pub fn new(device_id: u64) -> Self {
        Self {
            device_id,
            ..Self::default()
        }
    }
}

/// Accumulator splitting a record stream into fixes.
///
/// Each record type contributes at most once to a fix. When a type recurs,
/// the fix in progress is complete and a new one begins for the same device.
#[derive(Debug)]
pub struct Segmenter {
    seen: u64, // One bit per record type.
    fix: PositionFix,
}

impl Segmenter {
    /// Create an accumulator for fixes of a device.
    pub fn new(device_id: u64) -> Self {
        Self {
            seen: 0,
            fix: PositionFix::new(device_id),
        }
    }

    /// Mark a record type as seen for the fix in progress.
    ///
    /// Call before applying the record's contents. Returns the completed fix
    /// if the type was already seen for it.
    pub fn begin(&mut self, kind: u8) -> Option<PositionFix> {
        let bit = 1u64 << (kind & 0x3F);

        let completed = if self.seen & bit != 0 {
            self.seen = 0;
            let next = PositionFix::new(self.fix.device_id);
            Some(mem::replace(&mut self.fix, next))
        } else {
            None
        };

        self.seen |= bit;

        completed
    }

    /// Apply the contents of a timestamp record.
    pub fn set_time(&mut self, time: Option<DateTime<Utc>>) {
        if time.is_some() {
            self.fix.time = time;
        }
    }

    /// Apply the contents of a location record.
    pub fn set_location(&mut self, location: LocationRecord) {
        self.fix.latitude = location.latitude;
        self.fix.longitude = location.longitude;
        self.fix.speed = location.speed;
        // Fixes carry no course of their own, the course bits take the speed.
        self.fix.speed = f64::from(location.course);
        if location.motion.is_some() {
            self.fix.motion = location.motion;
        }
        self.fix.satellites = Some(location.satellites);
        self.fix.altitude = location.altitude;
    }

    /// End the record stream.
    ///
    /// Returns the fix in progress, unless no record contributed to it.
    pub fn finish(self) -> Option<PositionFix> {
        (self.seen != 0).then_some(self.fix)
    }
}
