//! Slice-based decoder implementation.

use alloc::vec::Vec;

use either::Either::{Left, Right};
use log::{debug, trace};
use thiserror::Error;

use crate::{
    compression::{self, decompress_bounded},
    sans::{
        Decoder,
        fix::Segmenter,
        header::{Extension, Payload},
        record::{AnyRecord, LOCATION, RecordHeader},
    },
};

use super::{Config, Platform, PositionFix, finalize};

/// Errors occurring while decoding from a slice.
#[derive(Debug, Error)]
pub enum Error {
    /// Unexpectedly reached the end of the slice.
    #[error("Unexpectedly reached the end of the slice.")]
    EndOfSlice,
    /// A record declared a body running past the end of the payload.
    #[error("Record ends at {end}, beyond the end of the payload ({len} bytes).")]
    RecordOverrun { end: usize, len: usize },
    /// The compressed payload could not be expanded.
    #[error("Malformed compressed payload: {0}")]
    Compression(#[from] compression::Error),
}

/// Decode the fixes in a slice holding one frame.
///
/// Returns no fixes if the platform knows no session for the frame, or the
/// frame holds no records. Bytes following the payload are ignored.
///
/// This method is also re-exported as `fleetguide::avec::decode_slice`.
pub fn decode(
    r: &[u8],
    config: &Config,
    p: &mut impl Platform,
) -> Result<Vec<PositionFix>, Error> {
    let i = &mut 0; // Counter of bytes read, used to read bytes from the tip.

    let (options, successor) = Decoder::advance(take(r, i)?);

    trace!(
        "Frame with signature {:#04x}, {} payload bytes.",
        options.signature, options.length
    );

    let (session, extension) = match successor {
        Left(state) => {
            let (id, extension) = state.advance(take(r, i)?);
            (p.resolve_session_by_id(id), extension)
        }
        Right(extension) => (p.resolve_session_by_transport(), extension),
    };

    let Some(device_id) = session else {
        debug!("Dropping frame without a device session.");
        return Ok(Vec::new());
    };

    let payload = decode_extension(extension, r, i)?;

    let s = *i;
    *i += payload.len();
    let bytes = r.get(s..*i).ok_or(Error::EndOfSlice)?;

    if *i < r.len() {
        debug!("Ignoring {} bytes after the payload.", r.len() - *i);
    }

    let expanded;
    let data: &[u8] = if payload.is_compressed() {
        expanded = decompress_bounded(bytes, config.max_decompressed_len)?;
        &expanded
    } else {
        bytes
    };

    decode_records(payload.advance(), data, device_id, p)
}

fn decode_extension(state: Extension, r: &[u8], i: &mut usize) -> Result<Payload, Error> {
    let state = match state {
        Extension::Subtype(state) => {
            let (subtype, successor) = state.advance(take(r, i)?);
            trace!("Frame subtype {subtype}.");
            successor
        }
        Extension::Acknowledgement(state) => Left(state),
        Extension::Payload(state) => Right(state),
    };

    Ok(match state {
        Left(state) => state.advance(take(r, i)?).1,
        Right(state) => state,
    })
}

/// Walk the records of an expanded payload, collecting finalized fixes.
pub(super) fn decode_records(
    mut record_header: RecordHeader,
    r: &[u8],
    device_id: u64,
    p: &mut (impl Platform + ?Sized),
) -> Result<Vec<PositionFix>, Error> {
    let i = &mut 0;

    let mut fixes = Vec::new();
    let mut segmenter = Segmenter::new(device_id);

    while *i < r.len() {
        if r.len() - *i < 2 {
            debug!("Ignoring a trailing byte after the last record.");
            break;
        }

        let (kind, length, successor) = record_header.advance(take(r, i)?);

        let end = *i + length as usize; // Offset to the end of the record body.

        if end > r.len() {
            Err(Error::RecordOverrun { end, len: r.len() })?;
        }

        if let Some(fix) = segmenter.begin(kind) {
            fixes.push(finalize(fix, p));
        }

        trace!("Record of type {kind}, {length} bytes.");

        let skip = match successor {
            AnyRecord::Timestamp(state) => {
                let (time, skip) = state.advance(take(r, i)?);
                segmenter.set_time(time);
                skip
            }
            AnyRecord::Location(state) => {
                let (location, skip) = state.advance(take(r, i)?);
                segmenter.set_location(location);
                skip
            }
            AnyRecord::Skip(skip) => {
                if kind <= LOCATION {
                    debug!("Skipping record of type {kind} with short body ({length} bytes).");
                }
                skip
            }
        };

        *i += skip.len();
        debug_assert_eq!(*i, end);

        record_header = skip.advance();
    }

    fixes.extend(segmenter.finish().map(|fix| finalize(fix, p)));

    Ok(fixes)
}

/// Take an exact number of bytes from an offset in a slice, advancing the offset.
fn take<const N: usize>(r: &[u8], i: &mut usize) -> Result<[u8; N], Error> {
    let s = *i;
    *i += N;

    r.get(s..*i)
        .and_then(|b| b.try_into().ok())
        .ok_or(Error::EndOfSlice)
}
