//! Per-cell reductions over indexed batches.
//!
//! Counting and averaging both work on the flat ids produced by
//! [`CellIndexer`], so there is exactly one edge convention in the crate.
//! Result tensors are allocated once per call at the grid's cell count and
//! written by id.

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GridBinningError, Result};
use crate::grid::Grid;
use crate::indexer::{CellIndexMap, CellIndexer, Positions, DEFAULT_PARALLEL_THRESHOLD};

/// Occupancy counts and optional field means for one batch.
///
/// Both tensors are row-major over `shape = (nz, ny, nx)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellStatistics {
    pub shape: (usize, usize, usize),
    pub counts: Vec<u64>,
    /// Field mean per cell; `0.0` where no sample landed.
    pub means: Option<Vec<f64>>,
    /// Samples beyond the first or last edge of an axis, see [`CellIndexMap::clipped`].
    pub clipped: usize,
}

impl CellStatistics {
    fn offset(&self, k: usize, j: usize, i: usize) -> Option<usize> {
        let (nz, ny, nx) = self.shape;
        (k < nz && j < ny && i < nx).then(|| (k * ny + j) * nx + i)
    }

    /// Count in the (depth, lat, lon) cell.
    pub fn count_at(&self, k: usize, j: usize, i: usize) -> Option<u64> {
        self.offset(k, j, i).map(|o| self.counts[o])
    }

    /// Mean in the (depth, lat, lon) cell, if a field was aggregated.
    pub fn mean_at(&self, k: usize, j: usize, i: usize) -> Option<f64> {
        let o = self.offset(k, j, i)?;
        self.means.as_ref().map(|m| m[o])
    }

    /// Ids of cells holding at least one sample.
    pub fn occupied_cells(&self) -> Vec<usize> {
        occupied_cells(&self.counts)
    }

    /// Total number of samples counted.
    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Reduces indexed samples to per-cell counts and means.
#[derive(Debug, Clone, Copy)]
pub struct CellAggregator<'g> {
    grid: &'g Grid,
    parallel_threshold: usize,
}

impl<'g> CellAggregator<'g> {
    /// Create an aggregator for a grid.
    pub fn new(grid: &'g Grid) -> Self {
        Self {
            grid,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Override the batch size above which reductions run on the rayon pool.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    /// Occupancy count per cell for an indexed batch.
    pub fn count(&self, map: &CellIndexMap) -> Result<Vec<u64>> {
        if map.num_cells() != self.grid.num_cells() {
            return Err(GridBinningError::shape_mismatch(
                "cell index map",
                format!("{} cells", self.grid.num_cells()),
                format!("{} cells", map.num_cells()),
            ));
        }
        self.count_ids(map.ids())
    }

    /// Occupancy count per cell for raw flat ids.
    pub fn count_ids(&self, ids: &[usize]) -> Result<Vec<u64>> {
        let n = self.grid.num_cells();
        check_ids(ids, n)?;

        let counts = if ids.len() >= self.parallel_threshold {
            // One tensor shared by every rayon split.
            let counts: Vec<AtomicU64> = (0..n).map(|_| AtomicU64::new(0)).collect();
            ids.par_iter().for_each(|&id| {
                counts[id].fetch_add(1, Ordering::Relaxed);
            });
            counts.into_iter().map(AtomicU64::into_inner).collect()
        } else {
            let mut counts = vec![0u64; n];
            for &id in ids {
                counts[id] += 1;
            }
            counts
        };

        Ok(counts)
    }

    /// Index a batch and count it in one step.
    pub fn count_positions<'p>(&self, positions: impl Into<Positions<'p>>) -> Result<Vec<u64>> {
        let map = self.indexer().index(positions);
        self.count(&map)
    }

    /// Mean of `values` per cell, computed only for `valid_cells`.
    ///
    /// `ids[s]` is the cell of sample `s` and `values[s]` its field value.
    /// Cells outside `valid_cells` keep the fill value `0.0`, and a valid
    /// cell that received no sample also reports `0.0`. Runs in one grouped
    /// pass over the samples plus one pass over `valid_cells`.
    pub fn mean_in_cells(
        &self,
        ids: &[usize],
        valid_cells: &[usize],
        values: &[f64],
    ) -> Result<Vec<f64>> {
        if ids.len() != values.len() {
            return Err(GridBinningError::shape_mismatch(
                "field values",
                format!("{} values (one per cell id)", ids.len()),
                values.len(),
            ));
        }
        let n = self.grid.num_cells();
        check_ids(ids, n)?;
        check_ids(valid_cells, n)?;

        let mut sums = vec![0.0f64; n];
        let mut counts = vec![0u64; n];
        for (&id, &v) in ids.iter().zip(values) {
            sums[id] += v;
            counts[id] += 1;
        }

        let mut means = vec![0.0f64; n];
        for &cell in valid_cells {
            if counts[cell] > 0 {
                means[cell] = sums[cell] / counts[cell] as f64;
            }
        }

        debug!(
            samples = ids.len(),
            valid_cells = valid_cells.len(),
            "Computed cell means"
        );

        Ok(means)
    }

    /// Counts, and means over occupied cells when a field is given.
    pub fn statistics<'p>(
        &self,
        positions: impl Into<Positions<'p>>,
        values: Option<&[f64]>,
    ) -> Result<CellStatistics> {
        let positions: Positions<'p> = positions.into();
        if let Some(values) = values {
            if values.len() != positions.len() {
                return Err(GridBinningError::shape_mismatch(
                    "field values",
                    format!("{} values (one per position)", positions.len()),
                    values.len(),
                ));
            }
        }

        let map = self.indexer().index(positions);
        let counts = self.count(&map)?;
        let means = match values {
            Some(values) => {
                let valid = occupied_cells(&counts);
                Some(self.mean_in_cells(map.ids(), &valid, values)?)
            }
            None => None,
        };

        debug!(
            samples = map.len(),
            occupied = counts.iter().filter(|&&c| c > 0).count(),
            "Aggregated batch"
        );

        Ok(CellStatistics {
            shape: self.grid.shape(),
            counts,
            means,
            clipped: map.clipped(),
        })
    }

    fn indexer(&self) -> CellIndexer<'g> {
        CellIndexer::new(self.grid).with_parallel_threshold(self.parallel_threshold)
    }
}

/// Ids of cells with a non-zero count.
pub fn occupied_cells(counts: &[u64]) -> Vec<usize> {
    counts
        .iter()
        .enumerate()
        .filter_map(|(id, &c)| (c > 0).then_some(id))
        .collect()
}

fn check_ids(ids: &[usize], len: usize) -> Result<()> {
    match ids.iter().find(|&&id| id >= len) {
        Some(&index) => Err(GridBinningError::IndexOutOfRange { index, len }),
        None => Ok(()),
    }
}
