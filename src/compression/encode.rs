use alloc::vec::Vec;

use super::varint;

/// How far back to search for matches.
const WINDOW: usize = 4096;

/// Compress bytes into a stream accepted by [`decompress`](super::decompress).
///
/// The least frequent byte value becomes the marker. Matches are found by a
/// greedy search of the preceding window, and may overlap the bytes they
/// produce. A match is only used when its encoding is shorter than the bytes
/// it stands for.
pub fn compress(r: &[u8]) -> Vec<u8> {
    let mut o = Vec::with_capacity(r.len() + 1);

    if r.is_empty() {
        return o;
    }

    let marker = least_frequent(r);
    o.push(marker);

    let mut i = 0;

    while i < r.len() {
        let (length, offset) = longest_match(r, i);

        let cost = 1 + varint::width(length) + varint::width(offset);

        if length as usize > cost {
            o.push(marker);
            varint::write(length, &mut o);
            varint::write(offset, &mut o);
            i += length as usize;
        } else {
            o.push(r[i]);
            if r[i] == marker {
                o.push(0);
            }
            i += 1;
        }
    }

    o
}

fn least_frequent(r: &[u8]) -> u8 {
    let mut counts = [0usize; 256];

    for b in r {
        counts[*b as usize] += 1;
    }

    (0..=u8::MAX)
        .min_by_key(|b| counts[*b as usize])
        .unwrap_or_default()
}

/// Find the longest run at `i` repeating earlier bytes, as a length and an
/// offset back from `i`. Ties go to the nearest run.
fn longest_match(r: &[u8], i: usize) -> (u32, u32) {
    let mut best = (0, 0);

    for j in i.saturating_sub(WINDOW)..i {
        let length = r[i..]
            .iter()
            .zip(&r[j..])
            .take_while(|(a, b)| a == b)
            .count()
            .min(u32::MAX as usize) as u32;

        if length != 0 && length >= best.0 {
            best = (length, (i - j) as u32);
        }
    }

    best
}
