//! BMP image format support
//!
//! Reads uncompressed Windows Bitmaps (1, 4 and 8 bit paletted, 24 and 32
//! bit direct color) into BGRA8, and writes Gray8 or BGRA8 buffers.

use crate::{IoError, IoResult};
use roiedge_core::{PixelBuffer, PixelFormat};
use std::io::{self, Read, Write};

/// BMP file header size
const BMP_FILE_HEADER_SIZE: usize = 14;

/// BMP info header size (BITMAPINFOHEADER)
const BMP_INFO_HEADER_SIZE: u32 = 40;

/// Largest info header in use (BITMAPV5HEADER)
const BMP_MAX_HEADER_SIZE: u32 = 124;

/// Upper bound on `width * height` accepted from a header
pub const BMP_MAX_PIXELS: u64 = 1 << 27;

fn le_u16(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

fn le_u32(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn skip<R: Read>(reader: &mut R, count: usize) -> IoResult<()> {
    let skipped = io::copy(&mut reader.by_ref().take(count as u64), &mut io::sink())?;
    if skipped < count as u64 {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(())
}

/// Row size in bytes; BMP rows are 4-byte aligned
fn row_stride(width: u32, bits_per_pixel: u16) -> usize {
    (width as usize * bits_per_pixel as usize).div_ceil(32) * 4
}

/// Read a BMP image into a BGRA8 buffer
pub fn read_bmp<R: Read>(mut reader: R) -> IoResult<PixelBuffer> {
    let mut file_header = [0u8; BMP_FILE_HEADER_SIZE];
    reader.read_exact(&mut file_header)?;

    if &file_header[0..2] != b"BM" {
        return Err(IoError::InvalidData("not a BMP file".to_string()));
    }
    let pixel_offset = le_u32(&file_header, 10) as usize;

    let mut info_header = [0u8; BMP_INFO_HEADER_SIZE as usize];
    reader.read_exact(&mut info_header)?;

    let header_size = le_u32(&info_header, 0);
    if !(BMP_INFO_HEADER_SIZE..=BMP_MAX_HEADER_SIZE).contains(&header_size) {
        return Err(IoError::InvalidData(format!(
            "unsupported BMP header size: {}",
            header_size
        )));
    }

    let width = le_u32(&info_header, 4) as i32;
    let height = le_u32(&info_header, 8) as i32;

    let planes = le_u16(&info_header, 12);
    if planes != 1 {
        return Err(IoError::InvalidData(format!(
            "unsupported number of planes: {}",
            planes
        )));
    }

    let bits_per_pixel = le_u16(&info_header, 14);
    let compression = le_u32(&info_header, 16);
    let colors_used = le_u32(&info_header, 32) as usize;

    // BI_RGB, or BI_BITFIELDS with the default BGRA masks
    if compression != 0 && compression != 3 {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP compression: {}",
            compression
        )));
    }
    if !matches!(bits_per_pixel, 1 | 4 | 8 | 24 | 32) {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP bit depth: {}",
            bits_per_pixel
        )));
    }

    let width = width.unsigned_abs();
    let top_down = height < 0;
    let height = height.unsigned_abs();
    if width as u64 * height as u64 > BMP_MAX_PIXELS {
        return Err(IoError::InvalidData(format!(
            "BMP too large: {}x{}",
            width, height
        )));
    }

    skip(&mut reader, header_size as usize - BMP_INFO_HEADER_SIZE as usize)?;
    let mut consumed = BMP_FILE_HEADER_SIZE + header_size as usize;

    // Palette entries are stored as B, G, R, reserved
    let palette: Vec<[u8; 4]> = if bits_per_pixel <= 8 {
        let max_colors = 1usize << bits_per_pixel;
        let num_colors = if colors_used == 0 {
            max_colors
        } else {
            colors_used.min(max_colors)
        };
        let mut raw = vec![0u8; num_colors * 4];
        reader.read_exact(&mut raw)?;
        consumed += raw.len();
        raw.chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], 255])
            .collect()
    } else {
        Vec::new()
    };

    if pixel_offset > consumed {
        skip(&mut reader, pixel_offset - consumed)?;
    }

    let mut pix = PixelBuffer::new(width, height, PixelFormat::Bgra8)?.to_mut();
    let mut row_buffer = vec![0u8; row_stride(width, bits_per_pixel)];

    let lookup = |index: usize| -> IoResult<[u8; 4]> {
        palette.get(index).copied().ok_or_else(|| {
            IoError::InvalidData(format!("palette index {} out of range", index))
        })
    };

    for row in 0..height {
        reader.read_exact(&mut row_buffer)?;
        let y = if top_down { row } else { height - 1 - row };
        let dst = pix.row_mut(y);

        for x in 0..width as usize {
            let bgra = match bits_per_pixel {
                1 => lookup(((row_buffer[x / 8] >> (7 - x % 8)) & 1) as usize)?,
                4 => lookup(((row_buffer[x / 2] >> (4 - 4 * (x % 2))) & 0xF) as usize)?,
                8 => lookup(row_buffer[x] as usize)?,
                24 => {
                    let i = x * 3;
                    [row_buffer[i], row_buffer[i + 1], row_buffer[i + 2], 255]
                }
                _ => {
                    let i = x * 4;
                    [
                        row_buffer[i],
                        row_buffer[i + 1],
                        row_buffer[i + 2],
                        row_buffer[i + 3],
                    ]
                }
            };
            dst[x * 4..x * 4 + 4].copy_from_slice(&bgra);
        }
    }

    Ok(pix.into())
}

/// Write a BMP image
///
/// Gray8 is written as 8-bit with a gray ramp palette, BGRA8 as 24-bit
/// (alpha is dropped). Rows are stored bottom-up.
pub fn write_bmp<W: Write>(pix: &PixelBuffer, mut writer: W) -> IoResult<()> {
    let (width, height) = pix.dimensions();

    let bits_per_pixel: u16 = match pix.format() {
        PixelFormat::Gray8 => 8,
        PixelFormat::Bgra8 => 24,
    };
    let stride = row_stride(width, bits_per_pixel);
    let pixel_data_size = stride * height as usize;
    let palette_size = if bits_per_pixel == 8 { 256 * 4 } else { 0 };
    let pixel_offset = BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE as usize + palette_size;
    let file_size = pixel_offset + pixel_data_size;

    let mut header = Vec::with_capacity(pixel_offset);
    header.extend_from_slice(b"BM");
    header.extend_from_slice(&(file_size as u32).to_le_bytes());
    header.extend_from_slice(&[0u8; 4]); // Reserved
    header.extend_from_slice(&(pixel_offset as u32).to_le_bytes());

    header.extend_from_slice(&BMP_INFO_HEADER_SIZE.to_le_bytes());
    header.extend_from_slice(&(width as i32).to_le_bytes());
    header.extend_from_slice(&(height as i32).to_le_bytes()); // Bottom-up
    header.extend_from_slice(&1u16.to_le_bytes()); // Planes
    header.extend_from_slice(&bits_per_pixel.to_le_bytes());
    header.extend_from_slice(&0u32.to_le_bytes()); // Compression
    header.extend_from_slice(&(pixel_data_size as u32).to_le_bytes());
    header.extend_from_slice(&0i32.to_le_bytes()); // X pixels per meter
    header.extend_from_slice(&0i32.to_le_bytes()); // Y pixels per meter
    header.extend_from_slice(&0u32.to_le_bytes()); // Colors used
    header.extend_from_slice(&0u32.to_le_bytes()); // Important colors

    if bits_per_pixel == 8 {
        for v in 0..=255u8 {
            header.extend_from_slice(&[v, v, v, 0]);
        }
    }
    writer.write_all(&header)?;

    let mut row_buffer = vec![0u8; stride];
    for row in 0..height {
        let src = pix.row(height - 1 - row);
        match pix.format() {
            PixelFormat::Gray8 => row_buffer[..src.len()].copy_from_slice(src),
            PixelFormat::Bgra8 => {
                for (d, s) in row_buffer.chunks_exact_mut(3).zip(src.chunks_exact(4)) {
                    d.copy_from_slice(&s[..3]);
                }
            }
        }
        writer.write_all(&row_buffer)?;
    }

    Ok(())
}
