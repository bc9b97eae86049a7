//! Shadow channels: a host-driven synthetic value holder plus the relay that
//! carries each holder change back onto the real field.

use log::warn;

use crate::accessor::FieldBinding;
use crate::controller::TweenMode;
use crate::descriptor::TweenSpec;
use crate::error::TweenError;
use crate::host::{AnimRef, TargetWorld, TweenHost, HOLDER_FIELD};
use crate::ids::{ChannelId, HolderId};
use crate::value::{compose_transforms, Value, ValueKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum RelayKind {
    Absolute,
    Delta,
}

/// One proxied field: the owned holder, the native channel driving it, and
/// the relay bookkeeping. Holder contents are private to the controller.
pub(crate) struct ShadowChannel {
    pub(crate) holder: HolderId,
    pub(crate) channel: ChannelId,
    binding: FieldBinding,
    relay: RelayKind,
    last: Value,
}

impl ShadowChannel {
    /// Seed a holder for `binding`, register the native animation driving it,
    /// and return the assembled channel. Nothing is left behind on error.
    pub(crate) fn build(
        world: &mut dyn TargetWorld,
        host: &mut dyn TweenHost,
        binding: FieldBinding,
        target_value: &Value,
        mode: TweenMode,
        spec: &TweenSpec,
    ) -> Result<Self, TweenError> {
        let current = binding.read(world).ok_or_else(|| TweenError::UnresolvedField {
            field: binding.field_name().to_string(),
        })?;
        if current.kind() != target_value.kind() {
            return Err(TweenError::TypeMismatch {
                expected: current.kind(),
                actual: target_value.kind(),
            });
        }

        let (relay, seed, end) = match mode {
            TweenMode::Delta => {
                let seed = current.delta_identity().ok_or(TweenError::DeltaUnsupported {
                    kind: current.kind(),
                })?;
                // Scalars run 0 -> offset; transforms run current -> current * offset
                // so the telescoped relative change equals the offset either way.
                let end = if current.kind() == ValueKind::Transform {
                    compose_transforms(&current, target_value)
                } else {
                    target_value.clone()
                };
                (RelayKind::Delta, seed, end)
            }
            TweenMode::Absolute | TweenMode::Synthetic => {
                (RelayKind::Absolute, current.clone(), target_value.clone())
            }
        };

        let holder = world.create_holder(seed.clone());
        let channel = match host.animate(
            AnimRef::Holder(holder),
            spec,
            vec![(HOLDER_FIELD.to_string(), end)],
        ) {
            Ok(channel) => channel,
            Err(err) => {
                world.destroy_holder(holder);
                return Err(err);
            }
        };

        Ok(Self {
            holder,
            channel,
            binding,
            relay,
            last: seed,
        })
    }

    /// React to one holder change. Delta relays re-read the live field value
    /// at reaction time, never a cached copy; that keeps concurrent channels
    /// on the same field commutative and preserves external writes.
    pub(crate) fn relay(&mut self, world: &mut dyn TargetWorld, new_value: &Value) {
        match self.relay {
            RelayKind::Absolute => {
                self.binding.write(world, new_value.clone());
                self.last = new_value.clone();
            }
            RelayKind::Delta => {
                let delta = new_value.delta_from(&self.last);
                self.last = new_value.clone();
                match self.binding.read(world) {
                    Some(live) => self.binding.write(world, live.offset_by(&delta)),
                    None => warn!(
                        "shadow relay for '{}' lost its binding; dropping delta",
                        self.binding.field_name()
                    ),
                }
            }
        }
    }
}
