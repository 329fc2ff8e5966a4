use crate::shared::error::FilterError;

/// Sepia blend strength in `[0, 1]`. `0` leaves the photo untouched.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Intensity(f32);

impl Intensity {
    pub const NONE: Intensity = Intensity(0.0);
    pub const FULL: Intensity = Intensity(1.0);

    pub fn new(value: f32) -> Result<Self, FilterError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FilterError::InvalidParameters(format!(
                "intensity must be between 0.0 and 1.0, got {value}"
            )))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(crate::shared::constants::DEFAULT_INTENSITY)
    }
}
