//! Common grid definitions for tests.
//!
//! Definitions are given as plain YAML so tests exercise the same parsing
//! path as the command-line driver.

/// 10° cube with a 5° step: a single cell spanning `[0, 5]` on every axis.
pub const SINGLE_CELL_YAML: &str = r#"
min: { x: 0.0, y: 0.0, z: 0.0 }
max: { x: 10.0, y: 10.0, z: 10.0 }
resolution: { x: 5.0, y: 5.0, z: 5.0 }
units: degrees
"#;

/// Iberian coastal box, 0.5° horizontal cells and 10 m layers.
pub const IBERIA_DEGREES_YAML: &str = r#"
min: { x: -10.0, y: 36.0, z: 0.0 }
max: { x: -7.0, y: 44.0, z: 50.0 }
resolution: { x: 0.5, y: 0.5, z: 10.0 }
units: degrees
"#;

/// Same box split into a fixed number of cells per axis.
pub const IBERIA_RELATIVE_YAML: &str = r#"
min: { x: -10.0, y: 36.0, z: 0.0 }
max: { x: -7.0, y: 44.0, z: 50.0 }
resolution: { x: 6, y: 16, z: 5 }
units: relative
"#;

/// One degree box at the equator with 1 km horizontal cells.
pub const EQUATOR_METERS_YAML: &str = r#"
min: { x: 0.0, y: 0.0, z: 0.0 }
max: { x: 1.0, y: 1.0, z: 100.0 }
resolution: { x: 1000.0, y: 1000.0, z: 25.0 }
units: meters
"#;

/// Unknown unit tag.
pub const BAD_UNITS_YAML: &str = r#"
min: { x: 0.0, y: 0.0, z: 0.0 }
max: { x: 1.0, y: 1.0, z: 1.0 }
resolution: { x: 0.5, y: 0.5, z: 0.5 }
units: fathoms
"#;

/// Flat bounding box along latitude.
pub const DEGENERATE_YAML: &str = r#"
min: { x: 0.0, y: 5.0, z: 0.0 }
max: { x: 1.0, y: 5.0, z: 1.0 }
resolution: { x: 0.5, y: 0.5, z: 0.5 }
units: degrees
"#;
