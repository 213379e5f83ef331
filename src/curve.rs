//! Response curves in normalized space.
//!
//! A curve maps a normalized input `t` in [0, 1] to a normalized output in
//! [0, 1]. [`InterpolationDefinition::Identity`] returns `t` unchanged.
//! [`InterpolationDefinition::Bezier`] treats the control points as a
//! response curve `y = f(x)`: the curve parameter whose x coordinate equals
//! `t` is located by bisection, and the y coordinate at that parameter is
//! returned. Both coordinates are evaluated with De Casteljau's algorithm,
//! which handles every order from linear (2 points) to degree 7 (8 points)
//! with the same code.
//!
//! Feeding `t` straight in as the curve parameter would ignore the x
//! coordinates: the ease-in curve `(0,0) (0.7,0.3) (0.9,0.7) (1,1)` has
//! y = 0.5 at parameter 0.5, while its value at x = 0.5 is well below that.
//!
//! Evaluation is pure, allocation-free for valid curves, and bounded by a
//! fixed number of bisection steps, so it is safe to call from the
//! per-frame path.

use crate::{ControlPoint, CurveError, InterpolationDefinition};

/// Fewest control points a Bézier curve may have.
pub const MIN_CONTROL_POINTS: usize = 2;
/// Most control points a Bézier curve may have.
pub const MAX_CONTROL_POINTS: usize = 8;

// Halving [0, 1] this many times exhausts f64 precision.
const BISECTION_STEPS: usize = 52;

/// Evaluate `curve` at `t`. `t` is clamped to [0, 1] first; curves are never
/// extrapolated.
#[must_use]
pub fn evaluate(curve: &InterpolationDefinition, t: f64) -> f64 {
    if t.is_nan() {
        return t;
    }
    let t = t.clamp(0.0, 1.0);
    match curve {
        InterpolationDefinition::Identity => t,
        InterpolationDefinition::Bezier { points } => bezier_response(points, t),
    }
}

/// Check a curve definition's shape.
///
/// # Errors
///
/// Returns [`CurveError`] when a Bézier curve has fewer than
/// [`MIN_CONTROL_POINTS`] or more than [`MAX_CONTROL_POINTS`] points, a
/// coordinate outside [0, 1], or endpoints other than (0, 0) and (1, 1).
pub fn validate(curve: &InterpolationDefinition) -> Result<(), CurveError> {
    match curve {
        InterpolationDefinition::Identity => Ok(()),
        InterpolationDefinition::Bezier { points } => validate_points(points),
    }
}

fn validate_points(points: &[ControlPoint]) -> Result<(), CurveError> {
    if points.len() < MIN_CONTROL_POINTS {
        return Err(CurveError::TooFewPoints {
            count: points.len(),
            min: MIN_CONTROL_POINTS,
        });
    }
    if points.len() > MAX_CONTROL_POINTS {
        return Err(CurveError::TooManyPoints {
            count: points.len(),
            max: MAX_CONTROL_POINTS,
        });
    }
    for (index, p) in points.iter().enumerate() {
        if !(0.0..=1.0).contains(&p.x) || !(0.0..=1.0).contains(&p.y) {
            return Err(CurveError::CoordinateOutOfRange {
                index,
                x: p.x,
                y: p.y,
            });
        }
    }
    let first = points[0];
    if first.x != 0.0 || first.y != 0.0 {
        return Err(CurveError::StartPoint {
            x: first.x,
            y: first.y,
        });
    }
    let last = points[points.len() - 1];
    if last.x != 1.0 || last.y != 1.0 {
        return Err(CurveError::EndPoint {
            x: last.x,
            y: last.y,
        });
    }
    Ok(())
}

fn bezier_response(points: &[ControlPoint], t: f64) -> f64 {
    match points {
        [] => t,
        [only] => only.y,
        [first, .., last] => {
            if t <= 0.0 {
                return first.y;
            }
            if t >= 1.0 {
                return last.y;
            }
            let s = solve_parameter(points, t);
            de_casteljau(points, s, |p| p.y)
        }
    }
}

/// Find the curve parameter whose x coordinate is `x`.
///
/// Always runs the full step count, so the result is monotone in `x`
/// whenever the control x coordinates are sorted.
fn solve_parameter(points: &[ControlPoint], x: f64) -> f64 {
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if de_casteljau(points, mid, |p| p.x) < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// De Casteljau evaluation of one coordinate at parameter `s`.
fn de_casteljau(points: &[ControlPoint], s: f64, coord: impl Fn(&ControlPoint) -> f64) -> f64 {
    if points.len() <= MAX_CONTROL_POINTS {
        let mut buf = [0.0_f64; MAX_CONTROL_POINTS];
        for (slot, p) in buf.iter_mut().zip(points) {
            *slot = coord(p);
        }
        reduce(&mut buf[..points.len()], s)
    } else {
        let mut values: Vec<f64> = points.iter().map(coord).collect();
        reduce(&mut values, s)
    }
}

/// Repeatedly interpolate adjacent values until one remains.
fn reduce(values: &mut [f64], s: f64) -> f64 {
    let n = values.len();
    for level in 1..n {
        for i in 0..n - level {
            values[i] += (values[i + 1] - values[i]) * s;
        }
    }
    values.first().copied().unwrap_or(s)
}
