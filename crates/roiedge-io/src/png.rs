//! PNG image format support
//!
//! Every PNG color type is decoded to BGRA8: palettes and sub-byte gray
//! depths are expanded by the decoder, 16-bit samples keep their high
//! byte, and gray is replicated into all three color channels.

use crate::{IoError, IoResult};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use roiedge_core::{PixelBuffer, PixelFormat};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image into a BGRA8 buffer
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<PixelBuffer> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let (width, height) = (info.width, info.height);
    let wide = info.bit_depth == BitDepth::Sixteen;
    let channels = match info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG output: {:?} {:?}",
                other, info.bit_depth
            )));
        }
    };
    let sample_bytes = if wide { 2 } else { 1 };
    let pixel_bytes = channels * sample_bytes;
    let data = &buf[..info.buffer_size()];

    let mut pix = PixelBuffer::new(width, height, PixelFormat::Bgra8)?.to_mut();
    for y in 0..height {
        let src_start = y as usize * info.line_size;
        let src = &data[src_start..src_start + width as usize * pixel_bytes];
        let dst = pix.row_mut(y);
        for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(pixel_bytes)) {
            // High byte of each sample comes first in 16-bit PNG data
            let sample = |i: usize| s[i * sample_bytes];
            let (r, g, b, a) = match channels {
                1 => (sample(0), sample(0), sample(0), 255),
                2 => (sample(0), sample(0), sample(0), sample(1)),
                3 => (sample(0), sample(1), sample(2), 255),
                _ => (sample(0), sample(1), sample(2), sample(3)),
            };
            d.copy_from_slice(&[b, g, r, a]);
        }
    }

    Ok(pix.into())
}

/// Write a PNG image
///
/// Gray8 buffers become 8-bit grayscale PNGs, BGRA8 buffers 8-bit RGBA.
pub fn write_png<W: Write>(pix: &PixelBuffer, writer: W) -> IoResult<()> {
    let (width, height) = pix.dimensions();
    if width == 0 || height == 0 {
        return Err(IoError::EncodeError(
            "PNG cannot hold an empty image".to_string(),
        ));
    }

    let color_type = match pix.format() {
        PixelFormat::Gray8 => ColorType::Grayscale,
        PixelFormat::Bgra8 => ColorType::Rgba,
    };

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let data = match pix.format() {
        PixelFormat::Gray8 => pix.to_packed_bytes(),
        PixelFormat::Bgra8 => {
            let mut data = Vec::with_capacity(width as usize * height as usize * 4);
            for y in 0..height {
                for px in pix.row(y).chunks_exact(4) {
                    data.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
                }
            }
            data
        }
    };

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_png_gray_reads_back_as_bgra() {
        let data: Vec<u8> = (0..100).map(|i| (i * 2) as u8).collect();
        let pix = PixelBuffer::from_bytes(10, 10, PixelFormat::Gray8, data).unwrap();

        let mut buffer = Vec::new();
        write_png(&pix, &mut buffer).unwrap();
        let pix2 = read_png(Cursor::new(buffer)).unwrap();

        assert_eq!(pix2.format(), PixelFormat::Bgra8);
        assert_eq!(pix2.dimensions(), (10, 10));
        for y in 0..10 {
            for x in 0..10 {
                let v = pix.get_pixel(x, y).unwrap() as u8;
                assert_eq!(pix2.get_rgba(x, y), Some((v, v, v, 255)));
            }
        }
    }

    #[test]
    fn test_png_roundtrip_bgra() {
        let mut pix = PixelBuffer::new(5, 5, PixelFormat::Bgra8).unwrap().to_mut();
        pix.set_rgba(0, 0, 255, 0, 0, 255).unwrap();
        pix.set_rgba(1, 1, 0, 255, 0, 128).unwrap();
        pix.set_rgba(2, 2, 0, 0, 255, 0).unwrap();
        let pix: PixelBuffer = pix.into();

        let mut buffer = Vec::new();
        write_png(&pix, &mut buffer).unwrap();
        let pix2 = read_png(Cursor::new(buffer)).unwrap();

        assert_eq!(pix2.data(), pix.data());
    }

    #[test]
    fn test_png_rejects_empty() {
        let pix = PixelBuffer::new(0, 3, PixelFormat::Gray8).unwrap();
        assert!(write_png(&pix, Vec::new()).is_err());
    }

    #[test]
    fn test_png_garbage() {
        assert!(read_png(Cursor::new(vec![0u8; 16])).is_err());
    }
}
