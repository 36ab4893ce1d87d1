use serde::{Deserialize, Serialize};

/// Geographic coordinate used to request a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!(
                "Latitude must be between -90 and 90 (got {})",
                self.latitude
            ));
        }

        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!(
                "Longitude must be between -180 and 180 (got {})",
                self.longitude
            ));
        }

        Ok(())
    }

    /// Whether two coordinates are close enough to share a schedule
    /// (about a kilometre).
    pub fn is_near(&self, other: &Coordinates) -> bool {
        (self.latitude - other.latitude).abs() < 0.01
            && (self.longitude - other.longitude).abs() < 0.01
    }

    /// Query parameters in the form the schedule services expect.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("lat", self.latitude.to_string()),
            ("lon", self.longitude.to_string()),
        ]
    }
}
