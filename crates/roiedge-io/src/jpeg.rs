//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate. Grayscale, RGB and
//! CMYK sources are all decoded to BGRA8 with opaque alpha. Writing is
//! not supported; the crate is decode-only.

use crate::{IoError, IoResult};
use jpeg_decoder::{Decoder, PixelFormat as JpegPixelFormat};
use roiedge_core::{PixelBuffer, PixelFormat};
use std::io::Read;

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<PixelBuffer> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let (width, height) = (info.width as u32, info.height as u32);
    let (layout, src_bytes) = match info.pixel_format {
        JpegPixelFormat::L8 => (Layout::Gray, 1),
        // L16 is big-endian, the first byte is the high byte
        JpegPixelFormat::L16 => (Layout::Gray, 2),
        JpegPixelFormat::RGB24 => (Layout::Rgb, 3),
        JpegPixelFormat::CMYK32 => (Layout::Cmyk, 4),
        #[allow(unreachable_patterns)]
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    };
    let expected = width as usize * height as usize * src_bytes;
    if pixels.len() < expected {
        return Err(IoError::InvalidData(format!(
            "JPEG produced {} bytes, expected {}",
            pixels.len(),
            expected
        )));
    }

    let mut pix = PixelBuffer::new(width, height, PixelFormat::Bgra8)?.to_mut();
    let row_src = width as usize * src_bytes;
    for y in 0..height {
        let src = &pixels[y as usize * row_src..(y as usize + 1) * row_src];
        let dst = pix.row_mut(y);
        for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(src_bytes)) {
            let (r, g, b) = match layout {
                Layout::Gray => (s[0], s[0], s[0]),
                Layout::Rgb => (s[0], s[1], s[2]),
                Layout::Cmyk => cmyk_to_rgb(s[0], s[1], s[2], s[3]),
            };
            d.copy_from_slice(&[b, g, r, 255]);
        }
    }

    Ok(pix.into())
}

#[derive(Clone, Copy)]
enum Layout {
    Gray,
    Rgb,
    Cmyk,
}

/// Adobe-style inverted CMYK as emitted by the decoder.
fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> (u8, u8, u8) {
    let scale = |v: u8| ((v as u32 * k as u32 + 127) / 255) as u8;
    (scale(c), scale(m), scale(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_jpeg_garbage() {
        let err = read_jpeg(Cursor::new(vec![0xFF, 0xD8, 0xFF, 0x00, 0x01])).unwrap_err();
        assert!(matches!(err, IoError::DecodeError(_)));
    }

    #[test]
    fn test_cmyk_conversion() {
        assert_eq!(cmyk_to_rgb(255, 255, 255, 255), (255, 255, 255));
        assert_eq!(cmyk_to_rgb(255, 0, 128, 0), (0, 0, 0));
    }
}
