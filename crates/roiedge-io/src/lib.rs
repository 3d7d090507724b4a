//! roiedge-io - Image source and edge map export
//!
//! Decodes PNG, JPEG and BMP files into BGRA8 [`PixelBuffer`]s, the shape
//! consumed by the detection pipeline, and writes buffers back out as PNG
//! (or BMP).
//!
//! # Examples
//!
//! ```no_run
//! let image = roiedge_io::read_image("photo.jpg").unwrap();
//! assert_eq!(image.format(), roiedge_core::PixelFormat::Bgra8);
//! ```

#[cfg(feature = "bmp")]
pub mod bmp;
mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

use roiedge_core::PixelBuffer;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;
use tracing::debug;

/// Read an image file into a BGRA8 buffer.
///
/// The format is detected from the file's magic bytes, not its extension.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let reader = BufReader::new(File::open(path)?);
    let pix = read_image_format(reader, format)?;
    debug!(
        path = %path.display(),
        ?format,
        width = pix.width(),
        height = pix.height(),
        "decoded image"
    );
    Ok(pix)
}

/// Decode an in-memory image into a BGRA8 buffer.
pub fn read_image_mem(data: &[u8]) -> IoResult<PixelBuffer> {
    let format = detect_format_from_bytes(data)?;
    read_image_format(Cursor::new(data), format)
}

fn read_image_format<R>(reader: R, format: ImageFormat) -> IoResult<PixelBuffer>
where
    R: std::io::BufRead + std::io::Seek,
{
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(reader),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(reader),
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::read_bmp(reader),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{:?} support is not enabled",
            other
        ))),
    }
}

/// Write a buffer to a file in the given format.
///
/// # Errors
///
/// JPEG output is not supported.
pub fn write_image<P: AsRef<Path>>(
    pix: &PixelBuffer,
    path: P,
    format: ImageFormat,
) -> IoResult<()> {
    let path = path.as_ref();
    if format == ImageFormat::Jpeg {
        return Err(IoError::UnsupportedFormat(
            "JPEG writing is not supported".to_string(),
        ));
    }
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(pix, &mut writer)?,
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::write_bmp(pix, &mut writer)?,
        #[allow(unreachable_patterns)]
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "cannot write {:?}",
                other
            )));
        }
    }
    writer.flush()?;
    debug!(path = %path.display(), ?format, "wrote image");
    Ok(())
}
