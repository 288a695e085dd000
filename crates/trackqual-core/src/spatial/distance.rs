use ndarray::{Array2, ArrayViewMut1, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Squared distance assigned to cells with no seed on their lane yet.
/// Large enough to never win a minimum, small enough to keep the envelope
/// intersections finite.
const UNREACHABLE: f64 = 1e20;

/// Exact Euclidean distance transform of an occupancy grid.
///
/// Every cell receives the distance to the nearest `true` cell; occupied
/// cells get 0. Returns `None` when no cell is occupied, since the distance
/// is then undefined everywhere.
///
/// Separable lower-envelope algorithm (Felzenszwalb & Huttenlocher): a 1D
/// squared-distance pass along every row, then along every column.
pub fn distance_transform(occupied: &Array2<bool>) -> Option<Array2<f64>> {
    if !occupied.iter().any(|&o| o) {
        return None;
    }

    let mut sq = occupied.mapv(|o| if o { 0.0 } else { UNREACHABLE });
    transform_lanes(&mut sq, Axis(0));
    transform_lanes(&mut sq, Axis(1));
    Some(sq.mapv_into(f64::sqrt))
}

/// Run the 1D transform over every lane. `Axis(0)` iterates rows,
/// `Axis(1)` iterates columns.
fn transform_lanes(grid: &mut Array2<f64>, axis: Axis) {
    if grid.len() >= PARALLEL_PIXEL_THRESHOLD {
        grid.axis_iter_mut(axis)
            .into_par_iter()
            .for_each(|mut lane| transform_lane(&mut lane));
    } else {
        for mut lane in grid.axis_iter_mut(axis) {
            transform_lane(&mut lane);
        }
    }
}

fn transform_lane(lane: &mut ArrayViewMut1<f64>) {
    let f: Vec<f64> = lane.iter().copied().collect();
    let d = lower_envelope(&f);
    for (dst, src) in lane.iter_mut().zip(d) {
        *dst = src;
    }
}

/// 1D squared distance transform of the sampled function `f`:
/// `d[q] = min_p (q - p)^2 + f[p]`.
fn lower_envelope(f: &[f64]) -> Vec<f64> {
    let n = f.len();
    let mut d = vec![0.0; n];
    if n == 0 {
        return d;
    }

    // v: parabola vertices in the envelope; z: boundaries between them.
    let mut v = vec![0usize; n];
    let mut z = vec![0.0f64; n + 1];
    let mut k = 0usize;
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;

    let intersect = |q: usize, p: usize| -> f64 {
        let (qf, pf) = (q as f64, p as f64);
        ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf))
    };

    for q in 1..n {
        let mut s = intersect(q, v[k]);
        while s <= z[k] {
            k -= 1;
            s = intersect(q, v[k]);
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f64::INFINITY;
    }

    k = 0;
    for (q, out) in d.iter_mut().enumerate() {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let dq = q as f64 - v[k] as f64;
        *out = dq * dq + f[v[k]];
    }
    d
}
