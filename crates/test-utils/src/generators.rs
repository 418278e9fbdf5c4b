//! Test data generators for particle-like sample batches.
//!
//! These generators create predictable, verifiable positions and field
//! values so tests can compute the expected per-cell results by hand.

/// Creates positions on a regular lattice, one at the center of every cell
/// of a `(nz, ny, nx)` grid spanning the given ranges.
///
/// Positions are `[depth, lat, lon]` and ordered row-major (longitude
/// varies fastest), so position `n` lands in flat cell `n`.
///
/// # Example
///
/// ```
/// use test_utils::lattice_positions;
///
/// let positions = lattice_positions((2, 1, 2), (0.0, 10.0), (0.0, 1.0), (0.0, 2.0));
/// assert_eq!(positions.len(), 4);
/// assert_eq!(positions[0], [2.5, 0.5, 0.5]);
/// assert_eq!(positions[3], [7.5, 0.5, 1.5]);
/// ```
pub fn lattice_positions(
    shape: (usize, usize, usize),
    depth: (f64, f64),
    lat: (f64, f64),
    lon: (f64, f64),
) -> Vec<[f64; 3]> {
    let (nz, ny, nx) = shape;
    let dz = (depth.1 - depth.0) / nz as f64;
    let dy = (lat.1 - lat.0) / ny as f64;
    let dx = (lon.1 - lon.0) / nx as f64;

    let mut positions = Vec::with_capacity(nz * ny * nx);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                positions.push([
                    depth.0 + (k as f64 + 0.5) * dz,
                    lat.0 + (j as f64 + 0.5) * dy,
                    lon.0 + (i as f64 + 0.5) * dx,
                ]);
            }
        }
    }
    positions
}

/// Creates `n` pseudo-random positions inside the given ranges.
///
/// Uses a fixed linear congruential sequence so the same seed always yields
/// the same batch, without pulling a RNG into every test crate.
pub fn scattered_positions(
    n: usize,
    depth: (f64, f64),
    lat: (f64, f64),
    lon: (f64, f64),
    seed: u64,
) -> Vec<[f64; 3]> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    (0..n)
        .map(|_| {
            [
                depth.0 + next() * (depth.1 - depth.0),
                lat.0 + next() * (lat.1 - lat.0),
                lon.0 + next() * (lon.1 - lon.0),
            ]
        })
        .collect()
}

/// Creates a field value per position: `depth + 10 * lat + 100 * lon`.
///
/// Linear in every coordinate, so the mean over a cell is the field at the
/// mean position of its samples.
pub fn linear_field(positions: &[[f64; 3]]) -> Vec<f64> {
    positions
        .iter()
        .map(|p| p[0] + 10.0 * p[1] + 100.0 * p[2])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_positions_row_major() {
        let positions = lattice_positions((2, 2, 3), (0.0, 2.0), (0.0, 2.0), (0.0, 3.0));
        assert_eq!(positions.len(), 12);
        assert_eq!(positions[1], [0.5, 0.5, 1.5]);
        assert_eq!(positions[3], [0.5, 1.5, 0.5]);
        assert_eq!(positions[6], [1.5, 0.5, 0.5]);
    }

    #[test]
    fn test_scattered_positions_in_range_and_deterministic() {
        let a = scattered_positions(500, (0.0, 100.0), (-10.0, 10.0), (20.0, 30.0), 7);
        let b = scattered_positions(500, (0.0, 100.0), (-10.0, 10.0), (20.0, 30.0), 7);
        assert_eq!(a, b);
        for p in &a {
            assert!((0.0..100.0).contains(&p[0]));
            assert!((-10.0..10.0).contains(&p[1]));
            assert!((20.0..30.0).contains(&p[2]));
        }
        let c = scattered_positions(500, (0.0, 100.0), (-10.0, 10.0), (20.0, 30.0), 8);
        assert_ne!(a, c);
    }

    #[test]
    fn test_linear_field() {
        let values = linear_field(&[[1.0, 2.0, 3.0]]);
        assert_eq!(values, vec![321.0]);
    }
}
