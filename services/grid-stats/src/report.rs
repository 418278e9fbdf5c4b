//! JSON report of a binned batch.

use serde::Serialize;

use grid_binning::{BinningEngine, CellCenters, CellStatistics, GridEdges, LengthUnit, UnitMode};

/// Everything `grid-stats` writes for one batch.
#[derive(Debug, Clone, Serialize)]
pub struct BinningReport {
    pub units: UnitMode,
    pub shape: [usize; 3],
    pub edges: GridEdges,
    pub centers: CellCenters,
    pub geometry_units: LengthUnit,
    /// Row-major `[lat][lon]`.
    pub area: Vec<f64>,
    /// Row-major `[depth][lat][lon]`.
    pub volume: Vec<f64>,
    pub samples: usize,
    pub clipped: usize,
    pub occupied_cells: usize,
    pub counts: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub means: Option<Vec<f64>>,
}

impl BinningReport {
    /// Assemble a report from an engine and the statistics of one batch.
    pub fn new(engine: &BinningEngine, units: UnitMode, stats: CellStatistics) -> Self {
        let (nz, ny, nx) = engine.grid().shape();
        let geometry = engine.geometry();

        Self {
            units,
            shape: [nz, ny, nx],
            edges: GridEdges::from(engine.grid().clone()),
            centers: geometry.centers.clone(),
            geometry_units: geometry.table.units,
            area: geometry.table.area.clone(),
            volume: geometry.table.volume.clone(),
            samples: stats.total_count() as usize,
            clipped: stats.clipped,
            occupied_cells: stats.occupied_cells().len(),
            counts: stats.counts,
            means: stats.means,
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
