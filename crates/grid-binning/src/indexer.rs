//! Mapping continuous positions to flat cell ids.
//!
//! Bucketing is right-closed: a coordinate `v` with `edges[i] < v <= edges[i + 1]`
//! lands in cell `i`, so a value sitting exactly on an interior edge belongs
//! to the cell on its left. Values outside the edges are clipped into the
//! first or last cell instead of being dropped; NaN clips to cell 0.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{GridBinningError, Result};
use crate::grid::Grid;
use crate::types::Axis;

/// Batches at least this large are indexed in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 65_536;

/// A borrowed batch of N positions, each `[depth, lat, lon]`.
#[derive(Debug, Clone, Copy)]
pub struct Positions<'a>(&'a [[f64; 3]]);

impl<'a> Positions<'a> {
    /// Wrap an N×3 array.
    pub fn new(rows: &'a [[f64; 3]]) -> Self {
        Self(rows)
    }

    /// A batch holding one position.
    pub fn single(position: &'a [f64; 3]) -> Self {
        Self(std::slice::from_ref(position))
    }

    /// View a flat `[d0, lat0, lon0, d1, ...]` buffer as N×3.
    pub fn from_flat(flat: &'a [f64]) -> Result<Self> {
        if flat.len() % 3 != 0 {
            return Err(GridBinningError::shape_mismatch(
                "positions",
                "N x 3 values",
                format!("{} values", flat.len()),
            ));
        }
        let rows: &[[f64; 3]] = bytemuck::try_cast_slice(flat).map_err(|e| {
            GridBinningError::shape_mismatch("positions", "N x 3 values", e.to_string())
        })?;
        Ok(Self(rows))
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The underlying rows.
    pub fn as_slice(&self) -> &'a [[f64; 3]] {
        self.0
    }
}

impl<'a> From<&'a [[f64; 3]]> for Positions<'a> {
    fn from(rows: &'a [[f64; 3]]) -> Self {
        Self::new(rows)
    }
}

impl<'a> From<&'a Vec<[f64; 3]>> for Positions<'a> {
    fn from(rows: &'a Vec<[f64; 3]>) -> Self {
        Self::new(rows)
    }
}

impl<'a, const N: usize> From<&'a [[f64; 3]; N]> for Positions<'a> {
    fn from(rows: &'a [[f64; 3]; N]) -> Self {
        Self::new(rows)
    }
}

impl<'a> From<&'a [f64; 3]> for Positions<'a> {
    fn from(position: &'a [f64; 3]) -> Self {
        Self::single(position)
    }
}

/// Flat cell ids for one batch of positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellIndexMap {
    ids: Vec<usize>,
    num_cells: usize,
    clipped: usize,
}

impl CellIndexMap {
    /// Cell id of every position, in input order.
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    /// Consume the map, returning the ids.
    pub fn into_ids(self) -> Vec<usize> {
        self.ids
    }

    /// Cell count of the grid the ids refer to.
    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    /// Positions that lay outside the grid edges and were clipped.
    ///
    /// Measured against the first and last edge of each axis, not the
    /// bounding box. In degrees and meters mode the last edge stops short of
    /// the box maximum, so samples between the two count as clipped.
    pub fn clipped(&self) -> usize {
        self.clipped
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the batch was empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Assigns positions to cells of a grid.
#[derive(Debug, Clone, Copy)]
pub struct CellIndexer<'g> {
    grid: &'g Grid,
    parallel_threshold: usize,
}

impl<'g> CellIndexer<'g> {
    /// Create an indexer for a grid.
    pub fn new(grid: &'g Grid) -> Self {
        Self {
            grid,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Override the batch size above which indexing runs on the rayon pool.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    /// The grid this indexer maps into.
    pub fn grid(&self) -> &'g Grid {
        self.grid
    }

    /// Cell index triple of one position.
    #[inline]
    pub fn cell_index(&self, position: [f64; 3]) -> [usize; 3] {
        [
            bucketize(self.grid.edges(Axis::Depth), position[0]),
            bucketize(self.grid.edges(Axis::Latitude), position[1]),
            bucketize(self.grid.edges(Axis::Longitude), position[2]),
        ]
    }

    /// Flat cell id of one position.
    #[inline]
    pub fn cell_id(&self, position: [f64; 3]) -> usize {
        self.grid.flatten(self.cell_index(position))
    }

    /// Check whether a position lies within the grid edges on every axis.
    pub fn in_domain(&self, position: [f64; 3]) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let edges = self.grid.edges(axis);
            let v = position[axis.index()];
            v >= edges[0] && v <= edges[edges.len() - 1]
        })
    }

    /// Flat cell ids for a batch of positions.
    pub fn index<'p>(&self, positions: impl Into<Positions<'p>>) -> CellIndexMap {
        let positions: Positions<'p> = positions.into();
        let rows = positions.as_slice();
        let parallel = rows.len() >= self.parallel_threshold;

        let (ids, clipped) = if parallel {
            let ids: Vec<usize> = rows.par_iter().map(|&p| self.cell_id(p)).collect();
            let clipped = rows.par_iter().filter(|&&p| !self.in_domain(p)).count();
            (ids, clipped)
        } else {
            let ids: Vec<usize> = rows.iter().map(|&p| self.cell_id(p)).collect();
            let clipped = rows.iter().filter(|&&p| !self.in_domain(p)).count();
            (ids, clipped)
        };

        debug!(positions = rows.len(), parallel, clipped, "Indexed positions");
        if clipped > 0 {
            warn!(
                clipped,
                positions = rows.len(),
                "Positions beyond the first or last grid edge were clipped into boundary cells"
            );
        }

        CellIndexMap {
            ids,
            num_cells: self.grid.num_cells(),
            clipped,
        }
    }
}

/// Right-closed cell index of `v` on an edge array, clipped to
/// `[0, edges.len() - 2]`.
///
/// `edges` must hold at least two strictly increasing values.
#[inline]
pub fn bucketize(edges: &[f64], v: f64) -> usize {
    let last_cell = edges.len() - 2;
    let below = edges.partition_point(|&e| e < v);
    below.saturating_sub(1).min(last_cell)
}
