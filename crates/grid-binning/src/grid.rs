//! The cell grid: three edge arrays and the flat cell-id layout.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::axis::AxisBuilder;
use crate::constants::EarthConstants;
use crate::error::{GridBinningError, Result};
use crate::types::{Axis, GridDefinition};

/// Upper bound on the total cell count of a grid.
pub const MAX_GRID_CELLS: usize = 1 << 30;

/// A regular depth × latitude × longitude cell grid.
///
/// Edges are stored per axis in (depth, lat, lon) order. Every axis has at
/// least two strictly increasing edges, so the grid always has at least one
/// cell. Cell ids are row-major over `(nz, ny, nx)`; [`Grid::flatten`] and
/// [`Grid::unflatten`] are the only encoder/decoder for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridEdges", into = "GridEdges")]
pub struct Grid {
    edges: [Vec<f64>; 3],
}

/// Serialized form of a [`Grid`], keyed by axis name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridEdges {
    pub depth: Vec<f64>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
}

impl TryFrom<GridEdges> for Grid {
    type Error = GridBinningError;

    fn try_from(e: GridEdges) -> Result<Self> {
        Grid::from_edges(e.depth, e.latitude, e.longitude)
    }
}

impl From<Grid> for GridEdges {
    fn from(grid: Grid) -> Self {
        let [depth, latitude, longitude] = grid.edges;
        Self {
            depth,
            latitude,
            longitude,
        }
    }
}

impl Grid {
    /// Build a grid from a definition.
    pub fn build(def: &GridDefinition, earth: &EarthConstants) -> Result<Self> {
        let [depth, lat, lon] = AxisBuilder::new(earth).build(def)?;
        let grid = Self::from_edges(depth, lat, lon)?;

        info!(
            units = %def.units,
            lon = ?def.bbox.range(Axis::Longitude),
            lat = ?def.bbox.range(Axis::Latitude),
            depth = ?def.bbox.range(Axis::Depth),
            nz = grid.nz(),
            ny = grid.ny(),
            nx = grid.nx(),
            "Built binning grid"
        );

        Ok(grid)
    }

    /// Create a grid from explicit edge arrays, validating them.
    pub fn from_edges(depth: Vec<f64>, lat: Vec<f64>, lon: Vec<f64>) -> Result<Self> {
        let edges = [depth, lat, lon];
        for axis in Axis::ALL {
            validate_edges(axis, &edges[axis.index()])?;
        }

        let [nz, ny, nx] = [0, 1, 2].map(|a| edges[a].len() - 1);
        let cells = nz.checked_mul(ny).and_then(|c| c.checked_mul(nx));
        match cells {
            Some(cells) if cells <= MAX_GRID_CELLS => Ok(Self { edges }),
            _ => Err(GridBinningError::TooManyCells {
                what: format!("{} x {} x {} grid", nz, ny, nx),
                cells: nz as f64 * ny as f64 * nx as f64,
                limit: MAX_GRID_CELLS,
            }),
        }
    }

    /// Edge coordinates of one axis.
    pub fn edges(&self, axis: Axis) -> &[f64] {
        &self.edges[axis.index()]
    }

    /// Number of cells along one axis.
    pub fn cells(&self, axis: Axis) -> usize {
        self.edges[axis.index()].len() - 1
    }

    /// Cells along depth.
    pub fn nz(&self) -> usize {
        self.cells(Axis::Depth)
    }

    /// Cells along latitude.
    pub fn ny(&self) -> usize {
        self.cells(Axis::Latitude)
    }

    /// Cells along longitude.
    pub fn nx(&self) -> usize {
        self.cells(Axis::Longitude)
    }

    /// Cell tensor shape `(nz, ny, nx)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nz(), self.ny(), self.nx())
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        self.nz() * self.ny() * self.nx()
    }

    /// Flat cell id of a (depth, lat, lon) index triple.
    #[inline]
    pub fn flatten(&self, [k, j, i]: [usize; 3]) -> usize {
        let (_, ny, nx) = self.shape();
        k * (ny * nx) + j * nx + i
    }

    /// (depth, lat, lon) index triple of a flat cell id.
    pub fn unflatten(&self, id: usize) -> Result<[usize; 3]> {
        let len = self.num_cells();
        if id >= len {
            return Err(GridBinningError::IndexOutOfRange { index: id, len });
        }
        let (_, ny, nx) = self.shape();
        Ok([id / (ny * nx), (id / nx) % ny, id % nx])
    }
}

fn validate_edges(axis: Axis, edges: &[f64]) -> Result<()> {
    if edges.len() < 2 {
        return Err(GridBinningError::degenerate(
            axis,
            format!("needs at least 2 edges, got {}", edges.len()),
        ));
    }
    if edges.iter().any(|v| !v.is_finite()) {
        return Err(GridBinningError::degenerate(axis, "edges must be finite"));
    }
    if let Some(w) = edges.windows(2).find(|w| w[0] >= w[1]) {
        return Err(GridBinningError::degenerate(
            axis,
            format!("edges not strictly increasing at {} -> {}", w[0], w[1]),
        ));
    }
    Ok(())
}
