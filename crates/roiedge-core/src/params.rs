//! Detection parameters
//!
//! Thresholds are compared against the unnormalized Sobel gradient
//! magnitude, which spans `0.0..=~1442.5` for 8-bit input. The scale is
//! stable across versions.

use crate::error::{Error, Result};

/// Default low hysteresis threshold
pub const DEFAULT_LOW_THRESHOLD: f64 = 50.0;
/// Default high hysteresis threshold
pub const DEFAULT_HIGH_THRESHOLD: f64 = 150.0;
/// Default binarization level
pub const DEFAULT_BINARIZATION_LEVEL: i32 = 128;

/// Parameters of one edge detection
///
/// No ordering is enforced between the two thresholds here; see
/// [`DetectionParameters::ordered_thresholds`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectionParameters {
    /// Weak-edge threshold
    pub low_threshold: f64,
    /// Strong-edge threshold
    pub high_threshold: f64,
    /// Final cut, `0..=255`; pixels at or above become 255
    pub binarization_level: i32,
}

impl Default for DetectionParameters {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            binarization_level: DEFAULT_BINARIZATION_LEVEL,
        }
    }
}

impl DetectionParameters {
    /// Create a parameter set. Nothing is validated until [`Self::validate`].
    pub const fn new(low_threshold: f64, high_threshold: f64, binarization_level: i32) -> Self {
        Self {
            low_threshold,
            high_threshold,
            binarization_level,
        }
    }

    /// Check the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if a threshold is negative or
    /// not finite, or if the binarization level is outside `0..=255`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("low threshold", self.low_threshold),
            ("high threshold", self.high_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be a finite, non-negative number, got {value}"
                )));
            }
        }
        if !(0..=255).contains(&self.binarization_level) {
            return Err(Error::InvalidParameter(format!(
                "binarization level must be in 0..=255, got {}",
                self.binarization_level
            )));
        }
        Ok(())
    }

    /// Thresholds as `(low, high)`, swapped if given in reverse order.
    pub fn ordered_thresholds(&self) -> (f64, f64) {
        if self.low_threshold > self.high_threshold {
            (self.high_threshold, self.low_threshold)
        } else {
            (self.low_threshold, self.high_threshold)
        }
    }

    /// Binarization level as a byte. Call [`Self::validate`] first.
    #[inline]
    pub fn level(&self) -> u8 {
        self.binarization_level.clamp(0, 255) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let p = DetectionParameters::default();
        assert_eq!(p, DetectionParameters::new(50.0, 150.0, 128));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        for p in [
            DetectionParameters::new(f64::NAN, 150.0, 128),
            DetectionParameters::new(50.0, f64::INFINITY, 128),
            DetectionParameters::new(-1.0, 150.0, 128),
            DetectionParameters::new(50.0, 150.0, 256),
            DetectionParameters::new(50.0, 150.0, -1),
        ] {
            let err = p.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameters);
        }
        assert!(DetectionParameters::new(0.0, 0.0, 0).validate().is_ok());
        assert!(DetectionParameters::new(0.0, 0.0, 255).validate().is_ok());
    }

    #[test]
    fn test_threshold_swap() {
        let p = DetectionParameters::new(200.0, 100.0, 128);
        assert_eq!(p.ordered_thresholds(), (100.0, 200.0));
        let q = DetectionParameters::new(10.0, 20.0, 128);
        assert_eq!(q.ordered_thresholds(), (10.0, 20.0));
    }
}
