//! Channel planning: partitions a field map into one batched native
//! animation plus shadow channels, designates the primary channel, and rolls
//! back partial work when a build fails.

use log::{debug, warn};

use crate::accessor::FieldBinding;
use crate::controller::TweenMode;
use crate::descriptor::TweenSpec;
use crate::error::TweenError;
use crate::host::{AnimRef, TargetWorld, TweenHost};
use crate::ids::ChannelId;
use crate::shadow::ShadowChannel;
use crate::value::Value;

/// Everything one build pass created. `channels[0]` is the primary channel:
/// the native batch when one exists, otherwise the first shadow's animation.
pub(crate) struct ChannelSet {
    pub(crate) channels: Vec<ChannelId>,
    pub(crate) shadows: Vec<ShadowChannel>,
}

impl ChannelSet {
    pub(crate) fn primary(&self) -> Option<ChannelId> {
        self.channels.first().copied()
    }
}

/// Build every channel for one play cycle. On any failure the channels and
/// holders already created by this call are destroyed before the error
/// propagates, so a failed build leaks nothing.
pub(crate) fn build(
    world: &mut dyn TargetWorld,
    host: &mut dyn TweenHost,
    target: AnimRef,
    mode: TweenMode,
    spec: &TweenSpec,
    field_map: &[(String, Value)],
) -> Result<ChannelSet, TweenError> {
    let target_id = match target {
        AnimRef::Target(id) => id,
        AnimRef::Holder(_) => {
            // Synthetic targets are value holders: a single native
            // pseudo-field, nothing to partition.
            let channel = host.animate(target, spec, field_map.to_vec())?;
            return Ok(ChannelSet {
                channels: vec![channel],
                shadows: Vec::new(),
            });
        }
    };

    let mut natives: Vec<(String, Value)> = Vec::new();
    let mut shadows: Vec<ShadowChannel> = Vec::new();
    let mut channels: Vec<ChannelId> = Vec::new();

    for (name, value) in field_map {
        let binding = match FieldBinding::resolve(world, target_id, name) {
            Ok(binding) => binding,
            Err(err) => {
                rollback(world, host, &channels, &shadows, &err);
                return Err(err);
            }
        };
        if mode != TweenMode::Delta && binding.is_native() {
            natives.push((name.clone(), value.clone()));
            continue;
        }
        match ShadowChannel::build(world, host, binding, value, mode, spec) {
            Ok(shadow) => {
                channels.push(shadow.channel);
                shadows.push(shadow);
            }
            Err(err) => {
                rollback(world, host, &channels, &shadows, &err);
                return Err(err);
            }
        }
    }

    if !natives.is_empty() {
        let native_count = natives.len();
        match host.animate(target, spec, natives) {
            Ok(channel) => channels.insert(0, channel),
            Err(err) => {
                rollback(world, host, &channels, &shadows, &err);
                return Err(err);
            }
        }
        debug!(
            "planned {} channel(s): {} native field(s) batched, {} shadow(s)",
            channels.len(),
            native_count,
            shadows.len()
        );
    } else {
        debug!(
            "planned {} shadow channel(s), no native batch",
            channels.len()
        );
    }

    Ok(ChannelSet { channels, shadows })
}

fn rollback(
    world: &mut dyn TargetWorld,
    host: &mut dyn TweenHost,
    channels: &[ChannelId],
    shadows: &[ShadowChannel],
    err: &TweenError,
) {
    warn!(
        "channel build failed ({err}); rolling back {} channel(s) and {} holder(s)",
        channels.len(),
        shadows.len()
    );
    for channel in channels {
        host.cancel(*channel);
        host.destroy(*channel);
    }
    for shadow in shadows {
        world.destroy_holder(shadow.holder);
    }
}
