//! Interpolation helpers:
//! - step_value (step semantics, switches at fraction 1.0)
//! - linear_value (component-wise + quat NLERP)
//! - bezier_ease (cubic-bezier timing curve)
//! - quaternion NLERP with shortest-arc normalization

use crate::value::Value;

/// Linear interpolation of scalars, computed in f64.
/// Exact at both ends: `t == 0` yields `a`, `t == 1` yields `b`.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f64) -> f32 {
    (a as f64 * (1.0 - t) + b as f64 * t) as f32
}

#[inline]
pub fn lerp_vec2(a: [f32; 2], b: [f32; 2], t: f64) -> [f32; 2] {
    [lerp_f32(a[0], b[0], t), lerp_f32(a[1], b[1], t)]
}

#[inline]
pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f64) -> [f32; 3] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

#[inline]
pub fn lerp_vec4(a: [f32; 4], b: [f32; 4], t: f64) -> [f32; 4] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ]
}

#[inline]
fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
fn normalize4(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        q[0] *= inv_len;
        q[1] *= inv_len;
        q[2] *= inv_len;
        q[3] *= inv_len;
    }
    q
}

/// Quaternion NLERP with shortest-arc correction.
/// If dot < 0, negate the second quaternion to ensure the shortest path.
/// Returns a normalized quaternion (x,y,z,w).
#[inline]
pub fn nlerp_quat(a: [f32; 4], mut b: [f32; 4], t: f64) -> [f32; 4] {
    if dot4(a, b) < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
    }
    normalize4(lerp_vec4(a, b, t))
}

/// Step interpolation: hold the start until the fraction reaches 1.0.
#[inline]
pub fn step_value(a: &Value, b: &Value, t: f64) -> Value {
    if t >= 1.0 {
        b.clone()
    } else {
        a.clone()
    }
}

/// Linear interpolation across Value kinds (Transform uses TRS with quat NLERP).
/// Step-only kinds and mismatched pairs fall back to [`step_value`].
pub fn linear_value(a: &Value, b: &Value, t: f64) -> Value {
    match (a, b) {
        (Value::Float(va), Value::Float(vb)) => Value::Float(lerp_f32(*va, *vb, t)),
        (Value::Vec2(va), Value::Vec2(vb)) => Value::Vec2(lerp_vec2(*va, *vb, t)),
        (Value::Vec3(va), Value::Vec3(vb)) => Value::Vec3(lerp_vec3(*va, *vb, t)),
        (Value::Vec4(va), Value::Vec4(vb)) => Value::Vec4(lerp_vec4(*va, *vb, t)),
        (Value::Quat(qa), Value::Quat(qb)) => Value::Quat(nlerp_quat(*qa, *qb, t)),
        (Value::ColorRgba(ca), Value::ColorRgba(cb)) => Value::ColorRgba(lerp_vec4(*ca, *cb, t)),
        (
            Value::Transform {
                pos: pa,
                rot: ra,
                scale: sa,
            },
            Value::Transform {
                pos: pb,
                rot: rb,
                scale: sb,
            },
        ) => Value::Transform {
            pos: lerp_vec3(*pa, *pb, t),
            rot: nlerp_quat(*ra, *rb, t),
            scale: lerp_vec3(*sa, *sb, t),
        },
        (Value::Vector(va), Value::Vector(vb)) if va.len() == vb.len() => Value::Vector(
            va.iter()
                .zip(vb.iter())
                .map(|(x, y)| lerp_f32(*x, *y, t))
                .collect(),
        ),
        _ => step_value(a, b, t),
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
pub fn bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    // Bezier(0,0,1,1) is exactly linear
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    if t == 0.0 || t == 1.0 {
        return t;
    }
    // Monotonic X in [0,1] assumed for x1/x2 in [0,1]
    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nlerp_takes_shortest_arc() {
        let a = [0.0, 0.0, 0.0, 1.0];
        let b = [0.0, 0.0, 0.0, -1.0];
        let q = nlerp_quat(a, b, 0.5);
        assert!((q[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn vector_length_mismatch_steps() {
        let a = Value::Vector(vec![0.0, 1.0]);
        let b = Value::Vector(vec![1.0]);
        assert_eq!(linear_value(&a, &b, 0.5), a);
        assert_eq!(linear_value(&a, &b, 1.0), b);
    }

    #[test]
    fn bezier_hits_endpoints() {
        assert_eq!(bezier_ease(0.0, 0.42, 0.0, 0.58, 1.0), 0.0);
        assert_eq!(bezier_ease(1.0, 0.42, 0.0, 0.58, 1.0), 1.0);
        let mid = bezier_ease(0.5, 0.42, 0.0, 0.58, 1.0);
        assert!((mid - 0.5).abs() < 1e-3, "symmetric curve, got {mid}");
    }
}
