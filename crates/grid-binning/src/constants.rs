//! Spherical-earth constants shared by axis construction and cell geometry.
//!
//! Both consumers take an `&EarthConstants` so that meters-mode axis spacing
//! and the area/volume tables are always derived from the same radius.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Degrees to radians.
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Earth model used for meter/degree conversions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarthConstants {
    /// Sphere radius in meters.
    pub radius_m: f64,
    /// Radians per degree.
    pub deg_to_rad: f64,
}

impl Default for EarthConstants {
    fn default() -> Self {
        Self {
            radius_m: EARTH_MEAN_RADIUS_M,
            deg_to_rad: DEG_TO_RAD,
        }
    }
}

impl EarthConstants {
    /// Sphere with a custom radius.
    pub fn with_radius(radius_m: f64) -> Self {
        Self {
            radius_m,
            ..Self::default()
        }
    }

    /// Meters spanned by one degree along a meridian.
    pub fn meters_per_degree(&self) -> f64 {
        self.deg_to_rad * self.radius_m
    }

    /// Meters spanned by one degree of longitude at `lat_deg`.
    pub fn meters_per_degree_lon(&self, lat_deg: f64) -> f64 {
        self.meters_per_degree() * (self.deg_to_rad * lat_deg).cos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_per_degree() {
        let earth = EarthConstants::default();
        // ~111.19 km per degree on a 6371 km sphere
        assert!((earth.meters_per_degree() - 111_194.93).abs() < 0.01);
        assert!((earth.meters_per_degree_lon(0.0) - earth.meters_per_degree()).abs() < 1e-9);
        assert!((earth.meters_per_degree_lon(60.0) - earth.meters_per_degree() / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_with_radius() {
        let earth = EarthConstants::with_radius(1000.0);
        assert_eq!(earth.radius_m, 1000.0);
        assert_eq!(earth.deg_to_rad, DEG_TO_RAD);
    }
}
