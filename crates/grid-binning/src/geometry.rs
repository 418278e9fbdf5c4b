//! Cell centers, areas and volumes on a spherical earth.

use serde::{Deserialize, Serialize};

use crate::constants::EarthConstants;
use crate::grid::Grid;
use crate::types::{Axis, LengthUnit};

/// Midpoints of every cell along each axis, in (depth, lat, lon) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellCenters {
    pub depth: Vec<f64>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
}

impl CellCenters {
    /// Compute centers from the grid edges.
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            depth: midpoints(grid.edges(Axis::Depth)),
            latitude: midpoints(grid.edges(Axis::Latitude)),
            longitude: midpoints(grid.edges(Axis::Longitude)),
        }
    }

    /// Centers along one axis.
    pub fn get(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::Depth => &self.depth,
            Axis::Latitude => &self.latitude,
            Axis::Longitude => &self.longitude,
        }
    }
}

/// Horizontal area and volume of every cell.
///
/// Volumes extrude each column's surface area through the depth layers, so a
/// column has the same area at every depth. Callers that need bathymetry-aware
/// areas must supply their own per-layer geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellGeometryTable {
    /// Unit the tables are expressed in (km² / km³ or m² / m³).
    pub units: LengthUnit,
    /// `(ny, nx)` area table, row-major.
    pub area: Vec<f64>,
    /// `(nz, ny, nx)` volume table, row-major.
    pub volume: Vec<f64>,
    /// Rows (latitude cells) in the tables.
    pub ny: usize,
    /// Columns (longitude cells) in the tables.
    pub nx: usize,
    /// Depth layers in the volume table.
    pub nz: usize,
}

impl CellGeometryTable {
    /// Compute cell areas and volumes for a grid.
    pub fn compute(grid: &Grid, earth: &EarthConstants, units: LengthUnit) -> Self {
        let (nz, ny, nx) = grid.shape();
        let scale = units.per_meter();

        let lat = grid.edges(Axis::Latitude);
        let lon = grid.edges(Axis::Longitude);
        let depth = grid.edges(Axis::Depth);

        let mut area = vec![0.0; ny * nx];
        for (row, lat_pair) in lat.windows(2).enumerate() {
            let lat_mid = (lat_pair[0] + lat_pair[1]) / 2.0;
            let dy = (lat_pair[1] - lat_pair[0]) * earth.meters_per_degree() * scale;
            let lon_scale = earth.meters_per_degree_lon(lat_mid) * scale;

            let out = &mut area[row * nx..(row + 1) * nx];
            for (cell, lon_pair) in out.iter_mut().zip(lon.windows(2)) {
                let dx = (lon_pair[1] - lon_pair[0]) * lon_scale;
                *cell = dx * dy;
            }
        }

        let mut volume = Vec::with_capacity(nz * ny * nx);
        for depth_pair in depth.windows(2) {
            let dz = (depth_pair[1] - depth_pair[0]) * scale;
            volume.extend(area.iter().map(|a| dz * a));
        }

        Self {
            units,
            area,
            volume,
            ny,
            nx,
            nz,
        }
    }

    /// Area of the (lat, lon) cell.
    pub fn area_at(&self, j: usize, i: usize) -> Option<f64> {
        if j >= self.ny || i >= self.nx {
            return None;
        }
        self.area.get(j * self.nx + i).copied()
    }

    /// Volume of the (depth, lat, lon) cell.
    pub fn volume_at(&self, k: usize, j: usize, i: usize) -> Option<f64> {
        if k >= self.nz || j >= self.ny || i >= self.nx {
            return None;
        }
        self.volume.get((k * self.ny + j) * self.nx + i).copied()
    }

    /// Total surface area covered by the grid.
    pub fn total_area(&self) -> f64 {
        self.area.iter().sum()
    }

    /// Total volume covered by the grid.
    pub fn total_volume(&self) -> f64 {
        self.volume.iter().sum()
    }
}

/// Everything derived from a grid once per definition: centers plus the
/// area/volume tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellGeometry {
    pub centers: CellCenters,
    pub table: CellGeometryTable,
}

impl CellGeometry {
    /// Derive centers and geometry tables from a grid.
    pub fn compute(grid: &Grid, earth: &EarthConstants, units: LengthUnit) -> Self {
        Self {
            centers: CellCenters::from_grid(grid),
            table: CellGeometryTable::compute(grid, earth, units),
        }
    }
}

fn midpoints(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equator_grid() -> Grid {
        Grid::from_edges(
            vec![0.0, 1000.0, 3000.0],
            vec![0.0, 1.0, 60.0, 61.0],
            vec![10.0, 11.0, 13.0],
        )
        .unwrap()
    }

    #[test]
    fn test_centers() {
        let centers = CellCenters::from_grid(&equator_grid());
        assert_eq!(centers.depth, vec![500.0, 2000.0]);
        assert_eq!(centers.latitude, vec![0.5, 30.5, 60.5]);
        assert_eq!(centers.get(Axis::Longitude), &[10.5, 12.0]);
    }

    #[test]
    fn test_area_row_correction() {
        let earth = EarthConstants::default();
        let table = CellGeometryTable::compute(&equator_grid(), &earth, LengthUnit::Meters);
        assert_eq!(table.area.len(), 3 * 2);

        let deg = earth.meters_per_degree();
        let expected = deg * deg * (0.5_f64).to_radians().cos();
        let a00 = table.area_at(0, 0).unwrap();
        assert!((a00 - expected).abs() / expected < 1e-12);

        // Twice as wide in longitude, same row.
        let a01 = table.area_at(0, 1).unwrap();
        assert!((a01 / a00 - 2.0).abs() < 1e-12);

        // Same cell width near 60.5N is roughly half as wide.
        let a20 = table.area_at(2, 0).unwrap();
        let ratio = (60.5_f64).to_radians().cos() / (0.5_f64).to_radians().cos();
        assert!((a20 / a00 - ratio).abs() < 1e-12);

        assert_eq!(table.area_at(3, 0), None);
    }

    #[test]
    fn test_kilometers_scale() {
        let earth = EarthConstants::default();
        let grid = equator_grid();
        let m = CellGeometryTable::compute(&grid, &earth, LengthUnit::Meters);
        let km = CellGeometryTable::compute(&grid, &earth, LengthUnit::Kilometers);

        for (a_m, a_km) in m.area.iter().zip(&km.area) {
            assert!((a_m / 1.0e6 - a_km).abs() / a_km < 1e-12);
        }
        for (v_m, v_km) in m.volume.iter().zip(&km.volume) {
            assert!((v_m / 1.0e9 - v_km).abs() / v_km < 1e-12);
        }
    }

    #[test]
    fn test_volume_extrudes_area() {
        let earth = EarthConstants::default();
        let table = CellGeometryTable::compute(&equator_grid(), &earth, LengthUnit::Kilometers);
        assert_eq!(table.volume.len(), 2 * 3 * 2);

        for j in 0..3 {
            for i in 0..2 {
                let area = table.area_at(j, i).unwrap();
                let top = table.volume_at(0, j, i).unwrap();
                let bottom = table.volume_at(1, j, i).unwrap();
                assert!((top - area * 1.0).abs() < 1e-9 * top);
                assert!((bottom - area * 2.0).abs() < 1e-9 * bottom);
            }
        }
        let total = table.total_area() * 3.0;
        assert!((table.total_volume() - total).abs() / total < 1e-12);
    }
}
