//! Axis edge construction.
//!
//! Turns a [`GridDefinition`] into one strictly increasing edge array per
//! axis. How the resolution is read depends on the [`UnitMode`]:
//!
//! - **degrees**: `min, min + step, ...` strictly below `max`
//! - **relative**: `resolution + 1` evenly spaced edges over `[min, max]`
//! - **meters**: steps converted to degrees on a sphere, then as degrees
//!
//! Degrees and meters never emit `max` itself, so the last cell ends at the
//! last edge; positions between it and `max` are clipped into that cell by
//! the indexer. Relative mode always ends exactly on `max`.

use tracing::debug;

use crate::constants::EarthConstants;
use crate::error::{GridBinningError, Result};
use crate::types::{Axis, GridDefinition, UnitMode};

/// Upper bound on cells along one axis.
pub const MAX_AXIS_CELLS: usize = 1 << 24;

/// Builds axis edges from grid definitions.
#[derive(Debug, Clone, Copy)]
pub struct AxisBuilder<'a> {
    earth: &'a EarthConstants,
}

impl<'a> AxisBuilder<'a> {
    /// Create a builder using the given earth model.
    pub fn new(earth: &'a EarthConstants) -> Self {
        Self { earth }
    }

    /// Build the edges of all three axes in (depth, lat, lon) order.
    pub fn build(&self, def: &GridDefinition) -> Result<[Vec<f64>; 3]> {
        Ok([
            self.build_axis(def, Axis::Depth)?,
            self.build_axis(def, Axis::Latitude)?,
            self.build_axis(def, Axis::Longitude)?,
        ])
    }

    /// Build the edges of a single axis.
    pub fn build_axis(&self, def: &GridDefinition, axis: Axis) -> Result<Vec<f64>> {
        let (min, max) = def.bbox.range(axis);
        check_range(axis, min, max)?;

        let resolution = def.resolution.get(axis);
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(GridBinningError::degenerate(
                axis,
                format!("resolution must be positive, got {}", resolution),
            ));
        }

        let edges = match def.units {
            UnitMode::Degrees => bounded_arange(axis, min, max, resolution)?,
            UnitMode::Relative => {
                let cells = resolution.trunc();
                if cells < 1.0 {
                    return Err(GridBinningError::degenerate(
                        axis,
                        format!("relative resolution {} gives no cells", resolution),
                    ));
                }
                check_cell_count(axis, cells)?;
                let num = (cells as usize).checked_add(1).ok_or_else(|| {
                    GridBinningError::TooManyCells {
                        what: format!("{} axis", axis),
                        cells,
                        limit: MAX_AXIS_CELLS,
                    }
                })?;
                linspace(min, max, num)
            }
            UnitMode::Meters => {
                let step = self.meters_to_axis_step(def, axis, resolution)?;
                bounded_arange(axis, min, max, step)?
            }
        };

        if edges.len() < 2 {
            return Err(GridBinningError::degenerate(
                axis,
                format!(
                    "step {} {} over [{}, {}] leaves no complete cell",
                    resolution, def.units, min, max
                ),
            ));
        }

        debug!(
            axis = %axis,
            units = %def.units,
            edges = edges.len(),
            first = edges[0],
            last = edges[edges.len() - 1],
            "Built axis"
        );

        Ok(edges)
    }

    /// Convert a meters step into the axis' own units.
    ///
    /// Latitude degrees are `step / R` radians. Longitude degrees shrink
    /// toward the poles, so the step is widened by `1 / cos(lat_mid)` of the
    /// bounding box. Depth is already linear.
    pub fn meters_to_axis_step(
        &self,
        def: &GridDefinition,
        axis: Axis,
        step_m: f64,
    ) -> Result<f64> {
        let step = match axis {
            Axis::Depth => step_m,
            Axis::Latitude => step_m / self.earth.meters_per_degree(),
            Axis::Longitude => step_m / self.earth.meters_per_degree_lon(def.bbox.lat_mid()),
        };

        if !step.is_finite() || step <= 0.0 {
            return Err(GridBinningError::degenerate(
                axis,
                format!("{} m does not convert to a usable step ({})", step_m, step),
            ));
        }
        Ok(step)
    }
}

fn check_range(axis: Axis, min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(GridBinningError::degenerate(
            axis,
            format!("bounds must be finite, got [{}, {}]", min, max),
        ));
    }
    if min >= max {
        return Err(GridBinningError::degenerate(
            axis,
            format!("min {} must be below max {}", min, max),
        ));
    }
    Ok(())
}

/// Checked `arange` for axis edges: the edge count is bounded before
/// anything is allocated.
fn bounded_arange(axis: Axis, min: f64, max: f64, step: f64) -> Result<Vec<f64>> {
    let edges = ((max - min) / step).ceil();
    check_cell_count(axis, edges - 1.0)?;
    Ok(arange(min, max, step))
}

fn check_cell_count(axis: Axis, cells: f64) -> Result<()> {
    if cells.is_nan() || cells > MAX_AXIS_CELLS as f64 {
        return Err(GridBinningError::TooManyCells {
            what: format!("{} axis", axis),
            cells,
            limit: MAX_AXIS_CELLS,
        });
    }
    Ok(())
}

/// Evenly stepped values in `[start, stop)`.
///
/// Length is `ceil((stop - start) / step)`; element `k` is
/// `start + k * step`. The length is not bounded here.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = ((stop - start) / step).ceil();
    if !(n > 0.0) {
        return Vec::new();
    }
    let n = n as usize;
    (0..n).map(|k| start + k as f64 * step).collect()
}

/// `num` evenly spaced values over `[start, stop]`, both ends exact.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|k| start + k as f64 * step).collect();
            values[num - 1] = stop;
            values
        }
    }
}
