//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::{
    io::{self, Read},
    vec,
    vec::Vec,
};

use either::Either::{Left, Right};
use log::{debug, trace};
use thiserror::Error;

use crate::{
    compression::{self, decompress_bounded},
    sans::{
        Decoder,
        header::{Extension, Payload},
    },
};

use super::{Config, Platform, PositionFix, slice};

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A record declared a body running past the end of the payload.
    #[error("Record ends at {end}, beyond the end of the payload ({len} bytes).")]
    RecordOverrun { end: usize, len: usize },
    /// The compressed payload could not be expanded.
    #[error("Malformed compressed payload: {0}")]
    Compression(#[from] compression::Error),
}

impl From<slice::Error> for Error {
    fn from(err: slice::Error) -> Self {
        match err {
            slice::Error::EndOfSlice => Self::Io(io::ErrorKind::UnexpectedEof.into()),
            slice::Error::RecordOverrun { end, len } => Self::RecordOverrun { end, len },
            slice::Error::Compression(err) => Self::Compression(err),
        }
    }
}

/// Decode the fixes in the next frame of a reader.
///
/// Reads exactly one frame, leaving the reader at the start of the next. If
/// the platform knows no session for the frame, its payload is read and
/// discarded, and no fixes are returned.
///
/// This method is also re-exported as `fleetguide::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(
    r: &mut impl Read,
    config: &Config,
    p: &mut impl Platform,
) -> Result<Vec<PositionFix>, Error> {
    let (options, successor) = Decoder::advance(take(r)?);

    trace!(
        "Frame with signature {:#04x}, {} payload bytes.",
        options.signature, options.length
    );

    let (session, extension) = match successor {
        Left(state) => {
            let (id, extension) = state.advance(take(r)?);
            (p.resolve_session_by_id(id), extension)
        }
        Right(extension) => (p.resolve_session_by_transport(), extension),
    };

    let payload = decode_extension(extension, r)?;

    let Some(device_id) = session else {
        debug!("Dropping frame without a device session.");
        let len = payload.len() as u64;
        if io::copy(&mut r.by_ref().take(len), &mut io::sink())? < len {
            Err(io::Error::from(io::ErrorKind::UnexpectedEof))?;
        }
        return Ok(Vec::new());
    };

    let mut bytes = vec![0; payload.len()];
    r.read_exact(&mut bytes)?;

    let data = if payload.is_compressed() {
        decompress_bounded(&bytes, config.max_decompressed_len)?
    } else {
        bytes
    };

    Ok(slice::decode_records(payload.advance(), &data, device_id, p)?)
}

fn decode_extension(state: Extension, r: &mut impl Read) -> Result<Payload, Error> {
    let state = match state {
        Extension::Subtype(state) => {
            let (subtype, successor) = state.advance(take(r)?);
            trace!("Frame subtype {subtype}.");
            successor
        }
        Extension::Acknowledgement(state) => Left(state),
        Extension::Payload(state) => Right(state),
    };

    Ok(match state {
        Left(state) => state.advance(take(r)?).1,
        Right(state) => state,
    })
}

/// Take an exact number of bytes from a reader.
fn take<const N: usize>(r: &mut impl Read) -> Result<[u8; N], Error> {
    let mut buf = [0; N];
    r.read_exact(&mut buf)?;

    Ok(buf)
}
