//! Convenience interfaces for common decoding patterns.
//!
//! The functions in this module decode a whole frame from a data slice or a
//! reader into a list of finalized [`PositionFix`] values. They depend on the
//! surrounding platform, through the [`Platform`] trait, for the device
//! session behind the frame, the current time, and the last known location of
//! a device.
//!
//! # Example
//!
//! ```
//! struct Tracker {
//!     devices: HashMap<u32, u64>,
//! }
//!
//! impl Platform for Tracker {
//!     fn resolve_session_by_id(&mut self, id: u32) -> Option<u64> {
//!         self.devices.get(&id).copied()
//!     }
//!
//!     fn resolve_session_by_transport(&mut self) -> Option<u64> {
//!         None
//!     }
//! }
//!
//! let fixes = fleetguide::avec::decode_slice(&frame, &Config::default(), &mut tracker)?;
//! ```

#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;

use chrono::{DateTime, Utc};
use log::debug;

pub use crate::sans::fix::PositionFix;

/// Decoding limits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Largest expanded payload to accept from a compressed frame. Unbounded
    /// when `None`.
    pub max_decompressed_len: Option<usize>,
}

/// Services of the surrounding platform used while decoding.
///
/// The default implementation of each provided method leaves fixes as they
/// are decoded.
#[allow(unused_variables)]
pub trait Platform {
    /// Find the device session for an identifier sent in the frame header.
    ///
    /// Returns the platform's identifier for the device, or `None` to drop
    /// the frame.
    fn resolve_session_by_id(&mut self, id: u32) -> Option<u64>;

    /// Find the device session bound to the transport the frame arrived on.
    ///
    /// Returns the platform's identifier for the device, or `None` to drop
    /// the frame.
    fn resolve_session_by_transport(&mut self) -> Option<u64>;

    /// Fill in the location of a fix that carried none, from the last known
    /// location of its device.
    fn enrich_last_known_location(&mut self, fix: &mut PositionFix) {}

    /// The current time, stamped on fixes that carried none.
    #[cfg(feature = "std")]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// The current time, stamped on fixes that carried none.
    #[cfg(not(feature = "std"))]
    fn now(&self) -> DateTime<Utc>;
}

/// Complete a fix before publishing it.
///
/// Stamps fixes lacking a time with the current time, and hands fixes lacking
/// a location record to the platform for enrichment.
pub fn finalize(mut fix: PositionFix, p: &mut (impl Platform + ?Sized)) -> PositionFix {
    if fix.time.is_none() {
        fix.time = Some(p.now());
    }

    if fix.satellites.is_none() {
        debug!("Fix for device {} has no location record.", fix.device_id);
        p.enrich_last_known_location(&mut fix);
    }

    fix
}
