//! Field resolution: decides how a requested field name reads and writes on a
//! target, and whether the host engine can animate it natively. Composite
//! pose/scale and dynamic attributes resemble fields but are never native.

use serde::{Deserialize, Serialize};

use crate::error::TweenError;
use crate::host::TargetWorld;
use crate::ids::TargetId;
use crate::value::Value;

/// Reserved field name for a compound target's composed pose.
pub const PIVOT_FIELD: &str = "Pivot";
/// Reserved field name for a compound target's uniform scale.
pub const SCALE_FIELD: &str = "Scale";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositeKind {
    Pivot,
    Scale,
}

/// How a field name binds on a target. Resolution precedence is composite
/// transform, then dynamic attribute, then direct field; only direct fields
/// are natively animatable.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldBinding {
    Composite {
        target: TargetId,
        kind: CompositeKind,
    },
    Attribute {
        target: TargetId,
        name: String,
    },
    Direct {
        target: TargetId,
        name: String,
    },
}

impl FieldBinding {
    /// Resolve `name` on `target`, or fail with `UnresolvedField` when the
    /// name matches nothing the world knows about.
    pub fn resolve(
        world: &dyn TargetWorld,
        target: TargetId,
        name: &str,
    ) -> Result<Self, TweenError> {
        match name {
            PIVOT_FIELD if world.pivot(target).is_some() => {
                return Ok(FieldBinding::Composite {
                    target,
                    kind: CompositeKind::Pivot,
                });
            }
            SCALE_FIELD if world.uniform_scale(target).is_some() => {
                return Ok(FieldBinding::Composite {
                    target,
                    kind: CompositeKind::Scale,
                });
            }
            _ => {}
        }
        if world.attribute(target, name).is_some() {
            return Ok(FieldBinding::Attribute {
                target,
                name: name.to_string(),
            });
        }
        if world.field(target, name).is_some() {
            return Ok(FieldBinding::Direct {
                target,
                name: name.to_string(),
            });
        }
        Err(TweenError::UnresolvedField {
            field: name.to_string(),
        })
    }

    /// Whether the host engine can animate this binding without a shadow.
    #[inline]
    pub fn is_native(&self) -> bool {
        matches!(self, FieldBinding::Direct { .. })
    }

    /// The field name this binding resolved from.
    pub fn field_name(&self) -> &str {
        match self {
            FieldBinding::Composite { kind, .. } => match kind {
                CompositeKind::Pivot => PIVOT_FIELD,
                CompositeKind::Scale => SCALE_FIELD,
            },
            FieldBinding::Attribute { name, .. } | FieldBinding::Direct { name, .. } => name,
        }
    }

    /// Current value behind the binding. None only if the world mutated
    /// underneath us since resolution.
    pub fn read(&self, world: &dyn TargetWorld) -> Option<Value> {
        match self {
            FieldBinding::Composite { target, kind } => match kind {
                CompositeKind::Pivot => world.pivot(*target),
                CompositeKind::Scale => world.uniform_scale(*target),
            },
            FieldBinding::Attribute { target, name } => world.attribute(*target, name),
            FieldBinding::Direct { target, name } => world.field(*target, name),
        }
    }

    /// Write through the binding with the same precedence resolution chose.
    pub fn write(&self, world: &mut dyn TargetWorld, value: Value) {
        match self {
            FieldBinding::Composite { target, kind } => match kind {
                CompositeKind::Pivot => world.pivot_to(*target, value),
                CompositeKind::Scale => world.scale_to(*target, value),
            },
            FieldBinding::Attribute { target, name } => {
                world.set_attribute(*target, name, value)
            }
            FieldBinding::Direct { target, name } => world.set_field(*target, name, value),
        }
    }
}
