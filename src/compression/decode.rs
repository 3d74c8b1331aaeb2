use alloc::vec::Vec;

use log::trace;

use super::{Error, varint};

/// Expand a compressed payload.
///
/// A back-reference offset must lie in `1..=len`, where `len` is the output
/// produced so far, and so may reach back to the first output byte.
///
/// The output grows without bound. Prefer [`decompress_bounded`] for input
/// that has not been size-checked upstream.
pub fn decompress(r: &[u8]) -> Result<Vec<u8>, Error> {
    decompress_bounded(r, None)
}

/// Expand a compressed payload, failing if the output would grow beyond
/// `limit` bytes.
pub fn decompress_bounded(r: &[u8], limit: Option<usize>) -> Result<Vec<u8>, Error> {
    let mut o = Vec::new();

    let Some((&marker, r)) = r.split_first() else {
        return Ok(o);
    };

    let i = &mut 0; // Offset of the next unread symbol.

    while let Some(&symbol) = r.get(*i) {
        *i += 1;

        if symbol != marker {
            check_limit(o.len(), 1, limit)?;
            o.push(symbol);
            continue;
        }

        if *r.get(*i).ok_or(Error::UnexpectedEnd)? == 0 {
            *i += 1;
            check_limit(o.len(), 1, limit)?;
            o.push(marker);
            continue;
        }

        let length = varint::read(r, i)?;
        let offset = varint::read(r, i)?;

        if offset == 0 || offset as usize > o.len() {
            Err(Error::OffsetOutOfRange {
                offset,
                len: o.len(),
            })?;
        }

        trace!("Back-reference of {length} bytes at offset {offset}.");

        check_limit(o.len(), length as usize, limit)?;

        // The source moves forward with the output, so short offsets repeat.
        for _ in 0..length {
            let b = o[o.len() - offset as usize];
            o.push(b);
        }
    }

    Ok(o)
}

fn check_limit(len: usize, n: usize, limit: Option<usize>) -> Result<(), Error> {
    match limit {
        Some(limit) if len.saturating_add(n) > limit => Err(Error::LimitExceeded { limit }),
        _ => Ok(()),
    }
}
