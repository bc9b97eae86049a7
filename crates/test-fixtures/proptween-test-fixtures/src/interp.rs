//! Interpolation helpers backing the stub engine:
//! - ease (easing-label evaluation at normalized progress)
//! - lerp_f32 / lerp_vec3 (component-wise)
//! - quaternion NLERP with shortest-arc normalization
//! - lerp_value (Value dispatch; step kinds switch at the end of a pass)

use proptween_core::{Easing, Value};

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
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
pub fn nlerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    let d = dot4(a, b);
    if d < 0.0 {
        b[0] = -b[0];
        b[1] = -b[1];
        b[2] = -b[2];
        b[3] = -b[3];
    }
    let q = [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ];
    normalize4(q)
}

/// Evaluate an easing label at normalized progress `u`, clamped to [0,1].
#[inline]
pub fn ease(easing: Easing, u: f32) -> f32 {
    let u = u.clamp(0.0, 1.0);
    match easing {
        Easing::Linear => u,
        Easing::QuadIn => u * u,
        Easing::QuadOut => u * (2.0 - u),
        Easing::QuadInOut => {
            if u < 0.5 {
                2.0 * u * u
            } else {
                let v = -2.0 * u + 2.0;
                1.0 - v * v / 2.0
            }
        }
        Easing::SineInOut => 0.5 * (1.0 - (std::f32::consts::PI * u).cos()),
    }
}

/// Linear blend across Value kinds (Transform blends TRS with quat NLERP).
/// Bool/Ref are step kinds and switch to `b` when `t` reaches 1.
pub fn lerp_value(a: &Value, b: &Value, t: f32) -> Value {
    match (a, b) {
        (Value::Float(va), Value::Float(vb)) => Value::Float(lerp_f32(*va, *vb, t)),
        (Value::Vec3(va), Value::Vec3(vb)) => Value::Vec3(lerp_vec3(*va, *vb, t)),
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
        (Value::Bool(_), Value::Bool(_)) | (Value::Ref(_), Value::Ref(_)) => {
            if t >= 1.0 {
                b.clone()
            } else {
                a.clone()
            }
        }
        // Fallback: if kinds mismatch, prefer left (fail-soft).
        _ => a.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// it should evaluate every easing label to 0 at the start and 1 at the end
    #[test]
    fn easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::QuadIn,
            Easing::QuadOut,
            Easing::QuadInOut,
            Easing::SineInOut,
        ] {
            assert_abs_diff_eq!(ease(easing, 0.0), 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(ease(easing, 1.0), 1.0, epsilon = 1e-6);
        }
    }

    /// it should match the closed-form midpoints of each curve
    #[test]
    fn easing_midpoints() {
        assert_abs_diff_eq!(ease(Easing::Linear, 0.25), 0.25);
        assert_abs_diff_eq!(ease(Easing::QuadIn, 0.5), 0.25);
        assert_abs_diff_eq!(ease(Easing::QuadOut, 0.5), 0.75);
        assert_abs_diff_eq!(ease(Easing::QuadInOut, 0.5), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(ease(Easing::SineInOut, 0.5), 0.5, epsilon = 1e-6);
    }

    /// it should keep nlerp midpoints at unit norm across 180 degrees
    #[test]
    fn nlerp_unit_norm() {
        let a = [0.0, 0.0, 0.0, 1.0];
        let b = [0.0, 1.0, 0.0, 0.0];
        let mid = nlerp_quat(a, b, 0.5);
        let norm = dot4(mid, mid).sqrt();
        assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-4);
    }

    /// it should step Bool values at the end of the pass and not before
    #[test]
    fn bool_steps_at_pass_end() {
        let a = Value::Bool(false);
        let b = Value::Bool(true);
        assert_eq!(lerp_value(&a, &b, 0.999), Value::Bool(false));
        assert_eq!(lerp_value(&a, &b, 1.0), Value::Bool(true));
    }

    /// it should hold the left value when kinds mismatch
    #[test]
    fn kind_mismatch_prefers_left() {
        let a = Value::Float(2.0);
        let b = Value::vec3(1.0, 1.0, 1.0);
        assert_eq!(lerp_value(&a, &b, 0.5), Value::Float(2.0));
    }
}
