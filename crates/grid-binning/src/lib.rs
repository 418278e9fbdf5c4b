//! Grid Binning & Aggregation Engine
//!
//! This crate discretizes a depth/latitude/longitude domain into a regular
//! cell grid, assigns scattered sample positions (e.g. Lagrangian particles)
//! to cells and reduces them to per-cell statistics:
//!
//! - **Axes**: edges from a bounding box and a resolution in degrees, in
//!   relative cell counts, or in meters on a sphere
//! - **Geometry**: cell centers, surface areas and extruded volumes
//! - **Indexing**: right-closed bucketing with clipping to boundary cells
//! - **Aggregation**: occupancy counts and field means per cell
//!
//! # Architecture
//!
//! ```text
//! GridDefinition (bbox, resolution, units)
//!      │
//!      ▼
//! AxisBuilder ──► Grid (depth, lat, lon edges) ──► CellGeometry
//!                   │                               (centers, area, volume)
//!                   │
//! positions ──► CellIndexer ──► CellIndexMap (flat ids)
//!                                   │
//!                  values ──► CellAggregator
//!                                   │
//!                                   ▼
//!                            CellStatistics (counts, means)
//! ```
//!
//! Grid and geometry are built once per definition; indexing and
//! aggregation run per batch and only read the grid.
//!
//! # Example
//!
//! ```
//! use grid_binning::{BinningEngine, BoundingBox3, GridBinningConfig, GridDefinition, UnitMode, Xyz};
//!
//! let def = GridDefinition::new(
//!     BoundingBox3::new(Xyz::new(0.0, 0.0, 0.0), Xyz::new(10.0, 10.0, 10.0)),
//!     Xyz::splat(5.0),
//!     UnitMode::Degrees,
//! );
//! let engine = BinningEngine::new(&def, GridBinningConfig::default())?;
//!
//! let positions = [[1.0, 1.0, 1.0]];
//! let stats = engine.statistics(&positions, Some(&[7.0][..]))?;
//! assert_eq!(stats.counts, vec![1]);
//! assert_eq!(stats.means, Some(vec![7.0]));
//! # Ok::<(), grid_binning::GridBinningError>(())
//! ```

pub mod aggregate;
pub mod axis;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod indexer;
pub mod types;

// Re-export commonly used types at crate root
pub use aggregate::{occupied_cells, CellAggregator, CellStatistics};
pub use axis::{AxisBuilder, MAX_AXIS_CELLS};
pub use config::GridBinningConfig;
pub use constants::EarthConstants;
pub use engine::BinningEngine;
pub use error::{GridBinningError, Result};
pub use geometry::{CellCenters, CellGeometry, CellGeometryTable};
pub use grid::{Grid, GridEdges, MAX_GRID_CELLS};
pub use indexer::{bucketize, CellIndexMap, CellIndexer, Positions};
pub use types::{Axis, BoundingBox3, GridDefinition, LengthUnit, UnitMode, Xyz};
