#![no_std]

//! An efficient decoder for the FleetGuide vehicle tracker wire protocol.
//!
//! FleetGuide devices report positions in dense, bit-packed frames, optionally
//! compressed with a device-specific escape-byte scheme. Fleetguide turns such
//! a frame into a list of [`PositionFix`](sans::fix::PositionFix) values.
//!
//! Most users should begin with the functions in the [`avec`] module, which
//! handle session lookup and fix finalization through the
//! [`Platform`](avec::Platform) trait. The [`sans`] module exposes the
//! underlying finite-state machine for applications needing finer control, and
//! the [`compression`] module exposes the payload codec on its own.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable reader-based decoder and wall-clock timestamps (default).
//! - `serde`: derive `Serialize` and `Deserialize` for decoded values.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod avec;
pub mod compression;
pub mod sans;
