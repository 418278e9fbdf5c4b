//! A built grid bundled with its geometry, ready for repeated batches.

use std::sync::Arc;

use crate::aggregate::{CellAggregator, CellStatistics};
use crate::config::GridBinningConfig;
use crate::error::Result;
use crate::geometry::CellGeometry;
use crate::grid::Grid;
use crate::indexer::{CellIndexMap, CellIndexer, Positions};
use crate::types::GridDefinition;

/// Grid, geometry and settings for one grid definition.
///
/// Everything inside is immutable after construction, so an engine can be
/// cloned cheaply and handed to one worker per timestep or per variable.
#[derive(Debug, Clone)]
pub struct BinningEngine {
    grid: Arc<Grid>,
    geometry: Arc<CellGeometry>,
    config: GridBinningConfig,
}

impl BinningEngine {
    /// Build the grid and its geometry from a definition.
    pub fn new(def: &GridDefinition, config: GridBinningConfig) -> Result<Self> {
        config.validate()?;
        let earth = config.earth();
        let grid = Grid::build(def, &earth)?;
        let geometry = CellGeometry::compute(&grid, &earth, config.geometry_units);

        Ok(Self {
            grid: Arc::new(grid),
            geometry: Arc::new(geometry),
            config,
        })
    }

    /// The cell grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Shared handle to the cell grid.
    pub fn shared_grid(&self) -> Arc<Grid> {
        Arc::clone(&self.grid)
    }

    /// Cell centers and area/volume tables.
    pub fn geometry(&self) -> &CellGeometry {
        &self.geometry
    }

    /// Active configuration.
    pub fn config(&self) -> &GridBinningConfig {
        &self.config
    }

    /// Indexer bound to this engine's grid.
    pub fn indexer(&self) -> CellIndexer<'_> {
        CellIndexer::new(&self.grid).with_parallel_threshold(self.config.parallel_threshold)
    }

    /// Aggregator bound to this engine's grid.
    pub fn aggregator(&self) -> CellAggregator<'_> {
        CellAggregator::new(&self.grid).with_parallel_threshold(self.config.parallel_threshold)
    }

    /// Flat cell ids for a batch.
    pub fn index<'p>(&self, positions: impl Into<Positions<'p>>) -> CellIndexMap {
        self.indexer().index(positions)
    }

    /// Counts (and means when `values` is given) for a batch.
    pub fn statistics<'p>(
        &self,
        positions: impl Into<Positions<'p>>,
        values: Option<&[f64]>,
    ) -> Result<CellStatistics> {
        self.aggregator().statistics(positions, values)
    }
}
