//! Configuration for the binning engine.

use serde::{Deserialize, Serialize};

use crate::constants::{EarthConstants, EARTH_MEAN_RADIUS_M};
use crate::error::{GridBinningError, Result};
use crate::indexer::DEFAULT_PARALLEL_THRESHOLD;
use crate::types::LengthUnit;

/// Configuration for the binning engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridBinningConfig {
    /// Earth radius in meters for meters-mode axes and cell geometry.
    pub earth_radius_m: f64,

    /// Unit of the area/volume tables.
    pub geometry_units: LengthUnit,

    /// Batches with at least this many samples are processed in parallel.
    pub parallel_threshold: usize,
}

impl Default for GridBinningConfig {
    fn default() -> Self {
        Self {
            earth_radius_m: EARTH_MEAN_RADIUS_M,
            geometry_units: LengthUnit::Kilometers,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl GridBinningConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("EARTH_RADIUS_M") {
            if let Ok(radius) = val.parse() {
                config.earth_radius_m = radius;
            }
        }

        if let Ok(val) = std::env::var("GEOMETRY_UNITS") {
            if let Ok(units) = val.parse() {
                config.geometry_units = units;
            }
        }

        if let Ok(val) = std::env::var("BINNING_PARALLEL_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.parallel_threshold = threshold;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.earth_radius_m.is_finite() || self.earth_radius_m <= 0.0 {
            return Err(GridBinningError::config(format!(
                "earth_radius_m must be > 0, got {}",
                self.earth_radius_m
            )));
        }

        if self.parallel_threshold == 0 {
            return Err(GridBinningError::config("parallel_threshold must be > 0"));
        }

        Ok(())
    }

    /// Earth model derived from this configuration.
    pub fn earth(&self) -> EarthConstants {
        EarthConstants::with_radius(self.earth_radius_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridBinningConfig::default();
        assert_eq!(config.earth_radius_m, 6_371_000.0);
        assert_eq!(config.geometry_units, LengthUnit::Kilometers);
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(config.earth(), EarthConstants::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = GridBinningConfig::default();
        assert!(config.validate().is_ok());

        config.earth_radius_m = 0.0;
        assert!(config.validate().is_err());

        config.earth_radius_m = f64::NAN;
        assert!(config.validate().is_err());

        config = GridBinningConfig::default();
        config.parallel_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_deserialize() {
        let yaml = "earth_radius_m: 6378137.0\ngeometry_units: Meters\nparallel_threshold: 1024\n";
        let config: GridBinningConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.earth_radius_m, 6_378_137.0);
        assert_eq!(config.geometry_units, LengthUnit::Meters);
        assert_eq!(config.parallel_threshold, 1024);
    }
}
