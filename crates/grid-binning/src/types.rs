//! Core types for grid binning.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{GridBinningError, Result};

/// Spatial axis of the cell grid.
///
/// The discriminant is the axis position in every shape, index triple and
/// flattened id: depth first, then latitude, then longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Depth = 0,
    Latitude = 1,
    Longitude = 2,
}

impl Axis {
    /// All axes in grid order.
    pub const ALL: [Axis; 3] = [Axis::Depth, Axis::Latitude, Axis::Longitude];

    /// Position of this axis in (depth, lat, lon) tuples.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Coordinate name used when labelling output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Depth => "depth",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A per-dimension triple in configuration order: x = longitude,
/// y = latitude, z = depth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Same value on every dimension.
    pub fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// Component belonging to a grid axis.
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Depth => self.z,
            Axis::Latitude => self.y,
            Axis::Longitude => self.x,
        }
    }
}

/// Three-dimensional bounding box of the binning domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3 {
    pub min: Xyz,
    pub max: Xyz,
}

impl BoundingBox3 {
    /// Create a new bounding box from its corners.
    pub fn new(min: Xyz, max: Xyz) -> Self {
        Self { min, max }
    }

    /// (min, max) along one axis.
    pub fn range(&self, axis: Axis) -> (f64, f64) {
        (self.min.get(axis), self.max.get(axis))
    }

    /// Midpoint of the latitude range, used for the meters-mode
    /// longitude correction.
    pub fn lat_mid(&self) -> f64 {
        (self.min.y + self.max.y) / 2.0
    }

    /// Check if a (depth, lat, lon) position lies inside the box, bounds
    /// included.
    pub fn contains(&self, position: [f64; 3]) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let (lo, hi) = self.range(axis);
            let v = position[axis.index()];
            v >= lo && v <= hi
        })
    }
}

/// How a resolution value is interpreted when building axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UnitMode {
    /// Resolution is a step in axis units (degrees for lat/lon).
    #[default]
    Degrees,
    /// Resolution is a target number of cells over the box.
    Relative,
    /// Resolution is a step in meters, converted on a sphere.
    Meters,
}

impl UnitMode {
    /// Get the unit tag as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Degrees => "degrees",
            Self::Relative => "relative",
            Self::Meters => "meters",
        }
    }
}

impl FromStr for UnitMode {
    type Err = GridBinningError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "degrees" => Ok(Self::Degrees),
            "relative" => Ok(Self::Relative),
            "meters" => Ok(Self::Meters),
            _ => Err(GridBinningError::UnknownUnitMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for UnitMode {
    type Error = GridBinningError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<UnitMode> for String {
    fn from(mode: UnitMode) -> Self {
        mode.as_str().to_string()
    }
}

impl std::fmt::Display for UnitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Length unit for cell geometry tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    /// Areas in km², volumes in km³.
    #[default]
    Kilometers,
    /// Areas in m², volumes in m³.
    Meters,
}

impl LengthUnit {
    /// Factor that converts meters to this unit.
    pub fn per_meter(&self) -> f64 {
        match self {
            Self::Kilometers => 1.0 / 1000.0,
            Self::Meters => 1.0,
        }
    }

    /// Get the unit symbol.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kilometers => "km",
            Self::Meters => "m",
        }
    }
}

impl FromStr for LengthUnit {
    type Err = GridBinningError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "km" | "kilometers" => Ok(Self::Kilometers),
            "m" | "meters" => Ok(Self::Meters),
            other => Err(GridBinningError::config(format!(
                "unknown length unit '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything needed to build a [`Grid`](crate::Grid): domain, resolution
/// and how to read the resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDefinition {
    #[serde(flatten)]
    pub bbox: BoundingBox3,
    pub resolution: Xyz,
    #[serde(default)]
    pub units: UnitMode,
}

impl GridDefinition {
    /// Create a new grid definition.
    pub fn new(bbox: BoundingBox3, resolution: Xyz, units: UnitMode) -> Self {
        Self {
            bbox,
            resolution,
            units,
        }
    }

    /// Parse a grid definition from YAML.
    ///
    /// ```yaml
    /// min: { x: -10.0, y: 35.0, z: 0.0 }
    /// max: { x: -5.0, y: 40.0, z: 100.0 }
    /// resolution: { x: 0.5, y: 0.5, z: 10.0 }
    /// units: degrees
    /// ```
    pub fn from_yaml(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load a grid definition from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GridBinningError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_mode_from_str() {
        assert_eq!("degrees".parse::<UnitMode>().unwrap(), UnitMode::Degrees);
        assert_eq!("RELATIVE".parse::<UnitMode>().unwrap(), UnitMode::Relative);
        assert_eq!(" meters ".parse::<UnitMode>().unwrap(), UnitMode::Meters);
        assert!(matches!(
            "furlongs".parse::<UnitMode>(),
            Err(GridBinningError::UnknownUnitMode(tag)) if tag == "furlongs"
        ));
    }

    #[test]
    fn test_xyz_axis_mapping() {
        let v = Xyz::new(1.0, 2.0, 3.0);
        assert_eq!(v.get(Axis::Longitude), 1.0);
        assert_eq!(v.get(Axis::Latitude), 2.0);
        assert_eq!(v.get(Axis::Depth), 3.0);
    }

    #[test]
    fn test_bbox_contains() {
        let bbox = BoundingBox3::new(Xyz::new(0.0, 0.0, 0.0), Xyz::new(10.0, 5.0, 100.0));
        assert!(bbox.contains([50.0, 2.5, 5.0]));
        assert!(bbox.contains([0.0, 0.0, 10.0]));
        assert!(!bbox.contains([150.0, 2.5, 5.0]));
        assert!(!bbox.contains([50.0, 2.5, -1.0]));
        assert!((bbox.lat_mid() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_length_unit() {
        assert_eq!("km".parse::<LengthUnit>().unwrap(), LengthUnit::Kilometers);
        assert_eq!("M".parse::<LengthUnit>().unwrap(), LengthUnit::Meters);
        assert!("ft".parse::<LengthUnit>().is_err());
        assert!((LengthUnit::Kilometers.per_meter() - 0.001).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grid_definition_from_yaml() {
        let yaml = r#"
min: { x: -10.0, y: 35.0, z: 0.0 }
max: { x: -5.0, y: 40.0, z: 100.0 }
resolution: { x: 0.5, y: 0.5, z: 10.0 }
units: meters
"#;
        let def = GridDefinition::from_yaml(yaml).unwrap();
        assert_eq!(def.units, UnitMode::Meters);
        assert_eq!(def.bbox.range(Axis::Longitude), (-10.0, -5.0));
        assert_eq!(def.bbox.range(Axis::Depth), (0.0, 100.0));
        assert_eq!(def.resolution.z, 10.0);
    }

    #[test]
    fn test_grid_definition_defaults_to_degrees() {
        let yaml = r#"
min: { x: 0.0, y: 0.0, z: 0.0 }
max: { x: 1.0, y: 1.0, z: 1.0 }
resolution: { x: 0.5, y: 0.5, z: 0.5 }
"#;
        let def = GridDefinition::from_yaml(yaml).unwrap();
        assert_eq!(def.units, UnitMode::Degrees);
    }

    #[test]
    fn test_grid_definition_rejects_unknown_units() {
        let yaml = r#"
min: { x: 0.0, y: 0.0, z: 0.0 }
max: { x: 1.0, y: 1.0, z: 1.0 }
resolution: { x: 0.5, y: 0.5, z: 0.5 }
units: leagues
"#;
        let err = GridDefinition::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("leagues"));
    }
}
