//! Value: runtime instances the host object model stores and the engine
//! animates. All numeric types use f32.
//!
//! Besides the kind tags this module carries the relative-playback algebra:
//! identity seeds, `delta_from`, `offset_by`, and the transform
//! compose/inverse helpers the delta relay is built on.

use serde::{Deserialize, Serialize};

/// Lightweight kind enum for dispatch and error reporting. One variant per
/// concrete holder kind the host object model can allocate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Float,
    Vec3,
    Transform,
    Ref,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Boolean (step-interpolated by hosts)
    Bool(bool),

    /// Scalar float
    Float(f32),

    /// 3D vector
    Vec3([f32; 3]),

    /// Transform with translation, rotation (quat x,y,z,w), scale
    Transform {
        pos: [f32; 3],
        rot: [f32; 4],
        scale: [f32; 3],
    },

    /// Opaque object reference (step-only)
    Ref(String),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Float(_) => ValueKind::Float,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Transform { .. } => ValueKind::Transform,
            Value::Ref(_) => ValueKind::Ref,
        }
    }

    /// Convenience constructors
    pub fn f(v: f32) -> Self {
        Value::Float(v)
    }

    pub fn vec3(x: f32, y: f32, z: f32) -> Self {
        Value::Vec3([x, y, z])
    }

    pub fn transform(pos: [f32; 3], rot: [f32; 4], scale: [f32; 3]) -> Self {
        Value::Transform { pos, rot, scale }
    }

    pub fn identity_transform() -> Self {
        Value::Transform {
            pos: [0.0; 3],
            rot: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
        }
    }

    /// Seed for a relative-playback holder of this value's kind: the additive
    /// zero for floats and vectors, the value itself for transforms (relative
    /// deltas compose away from the current frame). Kinds with no offset
    /// algebra return None.
    pub fn delta_identity(&self) -> Option<Value> {
        match self {
            Value::Float(_) => Some(Value::Float(0.0)),
            Value::Vec3(_) => Some(Value::Vec3([0.0; 3])),
            Value::Transform { .. } => Some(self.clone()),
            Value::Bool(_) | Value::Ref(_) => None,
        }
    }

    /// The change from `last` to `self`: componentwise subtraction, or
    /// `inverse(last) * self` for transforms. The transform delta sits on the
    /// right so that `last.offset_by(&delta)` lands back on `self` and chained
    /// deltas telescope. Kind mismatches fail soft and hand back `self`
    /// unchanged.
    pub fn delta_from(&self, last: &Value) -> Value {
        match (self, last) {
            (Value::Float(n), Value::Float(l)) => Value::Float(n - l),
            (Value::Vec3(n), Value::Vec3(l)) => {
                Value::Vec3([n[0] - l[0], n[1] - l[1], n[2] - l[2]])
            }
            (Value::Transform { .. }, Value::Transform { .. }) => {
                compose_transforms(&invert_transform(last), self)
            }
            _ => self.clone(),
        }
    }

    /// Apply a delta on top of this value: componentwise addition, or
    /// `self * delta` for transforms. Kind mismatches fail soft and hand back
    /// the delta (absolute write-through).
    pub fn offset_by(&self, delta: &Value) -> Value {
        match (self, delta) {
            (Value::Float(v), Value::Float(d)) => Value::Float(v + d),
            (Value::Vec3(v), Value::Vec3(d)) => {
                Value::Vec3([v[0] + d[0], v[1] + d[1], v[2] + d[2]])
            }
            (Value::Transform { .. }, Value::Transform { .. }) => {
                compose_transforms(self, delta)
            }
            _ => delta.clone(),
        }
    }
}

#[inline]
fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

/// Normalize a quaternion (x,y,z,w); zero-length input maps to identity.
#[inline]
pub fn normalize_quat(q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        [q[0] * inv_len, q[1] * inv_len, q[2] * inv_len, q[3] * inv_len]
    } else {
        [0.0, 0.0, 0.0, 1.0]
    }
}

/// Hamilton product of two quaternions (x,y,z,w).
#[inline]
pub fn mul_quat(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    [
        a[3] * b[0] + a[0] * b[3] + a[1] * b[2] - a[2] * b[1],
        a[3] * b[1] - a[0] * b[2] + a[1] * b[3] + a[2] * b[0],
        a[3] * b[2] + a[0] * b[1] - a[1] * b[0] + a[2] * b[3],
        a[3] * b[3] - a[0] * b[0] - a[1] * b[1] - a[2] * b[2],
    ]
}

/// Conjugate of a unit quaternion, i.e. its inverse.
#[inline]
pub fn conj_quat(q: [f32; 4]) -> [f32; 4] {
    [-q[0], -q[1], -q[2], q[3]]
}

/// Rotate a vector by a unit quaternion: v + 2w(u x v) + 2(u x (u x v)).
#[inline]
pub fn rotate_vec3(q: [f32; 4], v: [f32; 3]) -> [f32; 3] {
    let u = [q[0], q[1], q[2]];
    let t = [
        2.0 * (u[1] * v[2] - u[2] * v[1]),
        2.0 * (u[2] * v[0] - u[0] * v[2]),
        2.0 * (u[0] * v[1] - u[1] * v[0]),
    ];
    [
        v[0] + q[3] * t[0] + (u[1] * t[2] - u[2] * t[1]),
        v[1] + q[3] * t[1] + (u[2] * t[0] - u[0] * t[2]),
        v[2] + q[3] * t[2] + (u[0] * t[1] - u[1] * t[0]),
    ]
}

/// TRS composition `a * b`: scale multiplies componentwise, rotations chain,
/// b's translation is scaled and rotated into a's frame. Non-transform inputs
/// fail soft and return `b`.
pub fn compose_transforms(a: &Value, b: &Value) -> Value {
    match (a, b) {
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
        ) => {
            let scaled = [sa[0] * pb[0], sa[1] * pb[1], sa[2] * pb[2]];
            let carried = rotate_vec3(*ra, scaled);
            Value::Transform {
                pos: [pa[0] + carried[0], pa[1] + carried[1], pa[2] + carried[2]],
                rot: normalize_quat(mul_quat(*ra, *rb)),
                scale: [sa[0] * sb[0], sa[1] * sb[1], sa[2] * sb[2]],
            }
        }
        _ => b.clone(),
    }
}

/// TRS inverse such that `compose_transforms(t, invert_transform(t))` is the
/// identity. Zero scale components invert to zero rather than dividing.
pub fn invert_transform(t: &Value) -> Value {
    match t {
        Value::Transform { pos, rot, scale } => {
            let inv_scale = [
                if scale[0] != 0.0 { scale[0].recip() } else { 0.0 },
                if scale[1] != 0.0 { scale[1].recip() } else { 0.0 },
                if scale[2] != 0.0 { scale[2].recip() } else { 0.0 },
            ];
            let inv_rot = conj_quat(normalize_quat(*rot));
            let unrotated = rotate_vec3(inv_rot, *pos);
            Value::Transform {
                pos: [
                    -inv_scale[0] * unrotated[0],
                    -inv_scale[1] * unrotated[1],
                    -inv_scale[2] * unrotated[2],
                ],
                rot: inv_rot,
                scale: inv_scale,
            }
        }
        other => other.clone(),
    }
}
