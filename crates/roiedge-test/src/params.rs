//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use roiedge_core::PixelBuffer;
use roiedge_io::ImageFormat;
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare values and images in memory (default)
    #[default]
    Compare,
    /// Also write every checked image to the regout directory
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, a running check index and the failures seen so
/// far. Each `compare_*` call bumps the index, so a failure message points
/// at the exact check that broke.
pub struct RegParams {
    /// Name of the test (e.g., "canny")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters, configured from the
    /// `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();
        if mode == RegTestMode::Display {
            let _ = fs::create_dir_all(regout_dir());
        }

        eprintln!();
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Compare two buffers for equal size, format and pixel values.
    ///
    /// Padding bytes beyond the row width are ignored.
    pub fn compare_pix(&mut self, pix1: &PixelBuffer, pix2: &PixelBuffer) -> bool {
        self.index += 1;

        if !pix1.sizes_equal(pix2) {
            let msg = format!(
                "Failure in {}_reg: pix comparison for index {} - size mismatch ({}x{} {:?} vs {}x{} {:?})",
                self.test_name,
                self.index,
                pix1.width(),
                pix1.height(),
                pix1.format(),
                pix2.width(),
                pix2.height(),
                pix2.format()
            );
            return self.fail(msg);
        }

        for y in 0..pix1.height() {
            let (r1, r2) = (pix1.row(y), pix2.row(y));
            if let Some(i) = r1.iter().zip(r2).position(|(a, b)| a != b) {
                let x = i / pix1.format().bytes_per_pixel();
                let msg = format!(
                    "Failure in {}_reg: pix comparison for index {} - pixel mismatch at ({}, {})",
                    self.test_name, self.index, x, y
                );
                return self.fail(msg);
            }
        }

        true
    }

    /// Compare two byte arrays
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 != data2 {
            let first_diff = data1.iter().zip(data2).position(|(a, b)| a != b);
            let msg = format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 sizes: {} vs {}, first difference at {:?}",
                self.test_name,
                self.index,
                data1.len(),
                data2.len(),
                first_diff
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Record a boolean check
    pub fn check(&mut self, condition: bool, what: &str) -> bool {
        self.index += 1;
        if condition {
            true
        } else {
            let msg = format!(
                "Failure in {}_reg: check for index {} - {}",
                self.test_name, self.index, what
            );
            self.fail(msg)
        }
    }

    /// Write a buffer to the regout directory in display mode.
    ///
    /// Does nothing in compare mode. Empty buffers are skipped.
    pub fn write_pix(&mut self, pix: &PixelBuffer, label: &str) -> TestResult<()> {
        if !self.display() || pix.is_empty() {
            return Ok(());
        }
        let path = format!(
            "{}/{}.{:02}.{}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            label,
            ImageFormat::Png.extension()
        );
        roiedge_io::write_image(pix, &path, ImageFormat::Png).map_err(|e| {
            TestError::ImageWrite {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;
        eprintln!("Wrote: {}", path);
        Ok(())
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roiedge_core::PixelFormat;

    #[test]
    fn test_compare_values() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.0, 0.0));
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.index(), 3);
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_pix_reports_position() {
        let a = PixelBuffer::new(3, 2, PixelFormat::Gray8).unwrap();
        let mut b = a.to_mut();
        b.set_pixel(2, 1, 9).unwrap();
        let b: PixelBuffer = b.into();

        let mut rp = RegParams::new("test");
        assert!(rp.compare_pix(&a, &a.clone()));
        assert!(!rp.compare_pix(&a, &b));
        assert!(rp.failures()[0].contains("(2, 1)"));
    }

    #[test]
    fn test_compare_pix_size_mismatch() {
        let a = PixelBuffer::new(3, 2, PixelFormat::Gray8).unwrap();
        let b = PixelBuffer::new(3, 2, PixelFormat::Bgra8).unwrap();
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_pix(&a, &b));
    }
}
