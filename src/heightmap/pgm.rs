//! Raw-PGM ("P5") raster decoding.
//!
//! The header grammar is the Netpbm one: a two-byte magic token, then
//! width, height and depth as whitespace-separated unsigned decimals,
//! where `#` starts a comment running to the end of the line and the
//! line terminator itself counts as the delimiter. A single whitespace
//! byte separates the depth from `width * height` raw sample bytes.

use super::Heightmap;
use crate::{Error, Result};
use log::debug;
use std::io::Read;

/// Header integers are capped at the signed 32-bit maximum, matching the
/// historical Netpbm readers this format family comes from.
const MAX_HEADER_VALUE: u32 = i32::MAX as u32;

/// Decode a heightmap from a raw-PGM byte stream.
///
/// The source may be a file or standard input; callers hand in whatever
/// byte-readable stream they own (wrapped in a `BufReader` for files,
/// since the header is consumed a byte at a time).
pub fn from_reader<R: Read>(mut reader: R) -> Result<Heightmap> {
    let mut magic = [0u8; 2];
    reader.read_exact(&mut magic)?;
    if &magic != b"P5" {
        return Err(Error::Format(format!(
            "unrecognized magic token \"{}\"; input must be raw PGM (P5)",
            String::from_utf8_lossy(&magic)
        )));
    }

    let width = read_header_uint(&mut reader)?;
    let height = read_header_uint(&mut reader)?;
    let depth = read_header_uint(&mut reader)?;
    if depth > 255 {
        return Err(Error::Format(format!(
            "unsupported raster depth {}; max sample value is 255",
            depth
        )));
    }

    // The byte terminating the depth integer was already consumed as the
    // single whitespace separator, so raw samples start here.
    let size = usize::try_from(width as u64 * height as u64).map_err(|_| {
        Error::Overflow(format!(
            "raster size {}x{} exceeds the address space",
            width, height
        ))
    })?;
    let mut values = vec![0u8; size];
    reader.read_exact(&mut values)?;

    let hm = Heightmap::from_raw(width, height, values)?;
    debug!(
        "decoded heightmap {}x{} (depth {}): min {} max {} range {}",
        hm.width(),
        hm.height(),
        depth,
        hm.min(),
        hm.max(),
        hm.range()
    );
    Ok(hm)
}

fn read_byte<R: Read>(reader: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read the next header byte, skipping `#` comments. The comment's line
/// terminator is returned as the delimiter rather than discarded.
fn next_header_byte<R: Read>(reader: &mut R) -> Result<u8> {
    let mut b = read_byte(reader)?;
    if b == b'#' {
        loop {
            b = read_byte(reader)?;
            if b == b'\n' || b == b'\r' {
                break;
            }
        }
    }
    Ok(b)
}

/// Parse one unsigned decimal header field, consuming its terminating
/// delimiter byte.
fn read_header_uint<R: Read>(reader: &mut R) -> Result<u32> {
    let mut b = next_header_byte(reader)?;
    while matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
        b = next_header_byte(reader)?;
    }

    if !b.is_ascii_digit() {
        return Err(Error::Format(format!(
            "invalid character {:?} in raster header (expected unsigned integer)",
            b as char
        )));
    }

    let mut value: u32 = 0;
    while b.is_ascii_digit() {
        let digit = (b - b'0') as u32;
        if value > MAX_HEADER_VALUE / 10 - digit {
            return Err(Error::Overflow(
                "integer in raster header too large to process".into(),
            ));
        }
        value = value * 10 + digit;
        b = next_header_byte(reader)?;
    }

    // A parseable zero is still meaningless as a dimension or depth.
    if value == 0 {
        return Err(Error::Format("zero value in raster header".into()));
    }

    Ok(value)
}
