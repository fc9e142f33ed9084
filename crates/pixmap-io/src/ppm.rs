//! Binary PPM (`P6`) format support.
//!
//! Layout:
//!
//! ```text
//! P6\n
//! <width> <height>\n
//! <maxval>\n
//! <width * height * 3 bytes: R G B per pixel, row-major>
//! ```
//!
//! Only one byte per channel is supported, so `maxval` must be in
//! `1..=255`. Header lines may end in `\r\n`. Comment lines are not
//! recognised. Bytes after the payload are ignored.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use pixmap_core::{pixel_count, PixelBuffer, Rgb};
use tracing::{debug, trace};

use crate::traits::{ImageReader, ImageWriter};
use crate::{IoError, IoResult};

/// Magic token on the first line.
pub const MAGIC: &str = "P6";

/// Parsed PPM header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
    /// Channel maximum.
    pub max_value: u8,
    /// Byte offset of the first pixel.
    pub data_offset: usize,
}

impl Header {
    /// Payload size in bytes (`width * height * 3`).
    pub fn payload_len(&self) -> IoResult<usize> {
        pixel_count(self.width, self.height)?
            .checked_mul(3)
            .ok_or_else(|| IoError::Format("payload size overflows".into()))
    }
}

/// Parses the three header lines.
///
/// # Errors
///
/// [`IoError::Format`] for a wrong magic, a missing line, a dimensions line
/// that is not exactly two integers, or a maxval outside `1..=255`.
pub fn parse_header(bytes: &[u8]) -> IoResult<Header> {
    let mut cursor = 0;

    let magic = next_line(bytes, &mut cursor, "magic")?;
    if magic != MAGIC {
        return Err(IoError::Format(format!(
            "bad magic {magic:?}, expected {MAGIC:?}"
        )));
    }

    let dims = next_line(bytes, &mut cursor, "dimensions")?;
    let (width, height) = parse_dimensions(dims)?;

    let max = next_line(bytes, &mut cursor, "max value")?;
    let max_value = parse_max_value(max)?;

    Ok(Header {
        width,
        height,
        max_value,
        data_offset: cursor,
    })
}

/// Decodes a complete PPM byte stream.
///
/// # Example
///
/// ```rust
/// use pixmap_io::ppm;
///
/// let bytes = b"P6\n2 1\n255\n\x00\x01\x02\x03\x04\x05";
/// let img = ppm::decode(bytes).unwrap();
/// assert_eq!(img.dimensions(), (2, 1));
/// assert_eq!(ppm::encode(&img), bytes.to_vec());
/// ```
pub fn decode(bytes: &[u8]) -> IoResult<PixelBuffer> {
    trace!(len = bytes.len(), "ppm::decode");
    let header = parse_header(bytes)?;
    let expected = header.payload_len()?;
    let payload = &bytes[header.data_offset..];

    if payload.len() < expected {
        return Err(IoError::Truncated {
            expected,
            actual: payload.len(),
        });
    }
    if payload.len() > expected {
        debug!(extra = payload.len() - expected, "ignoring trailing bytes after pixel data");
    }

    let pixels = payload[..expected]
        .chunks_exact(3)
        .map(|c| Rgb::new(c[0], c[1], c[2]))
        .collect();
    Ok(PixelBuffer::new(
        header.width,
        header.height,
        header.max_value,
        pixels,
    )?)
}

/// Encodes an image as header plus raw bytes.
pub fn encode(image: &PixelBuffer) -> Vec<u8> {
    trace!(width = image.width(), height = image.height(), "ppm::encode");
    let header = format!(
        "{MAGIC}\n{} {}\n{}\n",
        image.width(),
        image.height(),
        image.max_value()
    );
    let mut out = Vec::with_capacity(header.len() + image.len() * 3);
    out.extend_from_slice(header.as_bytes());
    for px in image.pixels() {
        out.extend_from_slice(&px.to_array());
    }
    out
}

/// Reads all of `reader` and decodes it.
pub fn read_from<R: Read>(mut reader: R) -> IoResult<PixelBuffer> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode(&bytes)
}

/// Encodes `image` into `writer`.
pub fn write_to<W: Write>(mut writer: W, image: &PixelBuffer) -> IoResult<()> {
    writer.write_all(&encode(image))?;
    writer.flush()?;
    Ok(())
}

/// Reads a PPM file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading ppm");
    read_from(File::open(path)?)
}

/// Writes a PPM file, replacing any existing file.
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> IoResult<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), width = image.width(), height = image.height(), "writing ppm");
    write_to(BufWriter::new(File::create(path)?), image)
}

/// PPM reader and writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ppm;

impl ImageReader for Ppm {
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<PixelBuffer> {
        read(path)
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<PixelBuffer> {
        decode(data)
    }
}

impl ImageWriter for Ppm {
    fn write<P: AsRef<Path>>(&self, path: P, image: &PixelBuffer) -> IoResult<()> {
        write(path, image)
    }

    fn write_to_memory(&self, image: &PixelBuffer) -> IoResult<Vec<u8>> {
        Ok(encode(image))
    }
}

fn next_line<'a>(bytes: &'a [u8], cursor: &mut usize, what: &str) -> IoResult<&'a str> {
    let rest = &bytes[*cursor..];
    let end = rest
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| IoError::Format(format!("missing {what} line")))?;
    *cursor += end + 1;
    let line = &rest[..end];
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    std::str::from_utf8(line)
        .map(str::trim)
        .map_err(|_| IoError::Format(format!("{what} line is not ASCII")))
}

fn parse_dimensions(line: &str) -> IoResult<(u32, u32)> {
    let invalid = || IoError::Format(format!("invalid dimensions line {line:?}"));
    let mut tokens = line.split_ascii_whitespace();
    let width: u32 = tokens.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
    let height: u32 = tokens.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
    if tokens.next().is_some() {
        return Err(invalid());
    }
    Ok((width, height))
}

fn parse_max_value(line: &str) -> IoResult<u8> {
    let value: u32 = line
        .parse()
        .map_err(|_| IoError::Format(format!("invalid max value {line:?}")))?;
    match u8::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(IoError::Format(format!(
            "unsupported max value {value} (expected 1..=255)"
        ))),
    }
}
