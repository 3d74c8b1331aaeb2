//! Base-128 variable-length integers.
//!
//! Each byte holds seven bits of the value, most significant group first. A
//! set high bit means another byte follows.

use alloc::vec::Vec;

use super::Error;

/// Maximum number of bytes in a varint, enough for any `u32`.
pub const MAX_WIDTH: usize = 5;

/// Read a varint from an offset in a slice, advancing the offset.
pub fn read(r: &[u8], i: &mut usize) -> Result<u32, Error> {
    let mut value: u64 = 0;

    for _ in 0..MAX_WIDTH {
        let b = *r.get(*i).ok_or(Error::UnexpectedEnd)?;
        *i += 1;

        value = (value << 7) | u64::from(b & 0x7F);

        if b & 0x80 == 0 {
            return u32::try_from(value).map_err(|_| Error::MalformedVarint);
        }
    }

    Err(Error::MalformedVarint)
}

/// Number of bytes needed to write a value.
pub fn width(value: u32) -> usize {
    (u32::BITS - value.leading_zeros()).div_ceil(7).max(1) as usize
}

/// Append a varint to a buffer.
pub fn write(value: u32, o: &mut Vec<u8>) {
    for g in (0..width(value) as u32).rev() {
        let bits = ((value >> (g * 7)) & 0x7F) as u8;
        o.push(if g != 0 { bits | 0x80 } else { bits });
    }
}
