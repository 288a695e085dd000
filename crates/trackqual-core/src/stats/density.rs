use crate::consts::DENSITY_SENTINEL;

/// Minimum Euclidean distance between any two distinct rows of `positions`.
///
/// Self-distances never count. The result is NaN when no pair is closer
/// than [`DENSITY_SENTINEL`] (which covers frames with fewer than two
/// objects) and when two objects coincide exactly.
pub fn min_pairwise_distance(positions: &[(f64, f64)]) -> f64 {
    let mut min = DENSITY_SENTINEL;
    for (i, &(xi, yi)) in positions.iter().enumerate() {
        for &(xj, yj) in &positions[i + 1..] {
            let (dx, dy) = (xi - xj, yi - yj);
            let d = (dx * dx + dy * dy).sqrt();
            if d < min {
                min = d;
            }
        }
    }

    if min == 0.0 || min == DENSITY_SENTINEL {
        f64::NAN
    } else {
        min
    }
}
