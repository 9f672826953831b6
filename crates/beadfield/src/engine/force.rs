use crate::geom::Point;
use nalgebra as na;

/// Per-tick snapshot of the state the force pass reads.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Body {
    pub position: Point,
    pub repulse: f64,
    pub ignore: bool,
}

// pi * (3 - sqrt(5))
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Unit direction used when two bodies sit on the same point. Antisymmetric in `(v, u)`, so the
/// pair is pushed apart instead of staying stacked.
fn coincident_direction(v: usize, u: usize) -> na::Vector2<f64> {
    let (lo, hi) = if v < u { (v, u) } else { (u, v) };
    let angle = (lo as f64 * 7.0 + hi as f64) * GOLDEN_ANGLE;
    let dir = na::Vector2::new(angle.cos(), angle.sin());
    if v < u { dir } else { -dir }
}

/// Target point of every body for this tick: the midpoint plus the sum of inverse-distance
/// repulsions from every other non-ignored body, scaled by the body's own factor.
///
/// Ignored bodies get `None` and push nobody.
pub(crate) fn repulsion_targets(
    bodies: &[Body],
    optimal_distance: f64,
    midpoint: Point,
    min_distance: f64,
) -> Vec<Option<Point>> {
    let k_sq = optimal_distance * optimal_distance;
    bodies
        .iter()
        .enumerate()
        .map(|(v, body)| {
            if body.ignore {
                return None;
            }
            let here = body.position.to_vector();
            let mut target = midpoint.to_vector();
            for (u, other) in bodies.iter().enumerate() {
                if u == v || other.ignore {
                    continue;
                }
                let delta = here - other.position.to_vector();
                let norm = delta.norm();
                let distance = norm.max(min_distance);
                let unit = if norm == 0.0 {
                    coincident_direction(v, u)
                } else {
                    delta / norm
                };
                let magnitude = k_sq / distance * body.repulse;
                target += unit * magnitude;
            }
            Some(target.into())
        })
        .collect()
}

/// Moves `position` towards `target` by at most `speed * energy`. `None` when already there.
pub(crate) fn step_towards(
    position: Point,
    target: Point,
    speed: f64,
    energy: f64,
) -> Option<Point> {
    let from = position.to_vector();
    let delta = target.to_vector() - from;
    let distance = delta.norm();
    if distance == 0.0 || !distance.is_finite() {
        return None;
    }
    let step = delta / distance * speed * distance.min(energy);
    Some((from + step).into())
}
