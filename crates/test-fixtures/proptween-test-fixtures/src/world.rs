//! In-memory object model: scriptable targets with fields, attributes, and an
//! optional compound pose, plus holder storage with leak accounting.

use hashbrown::HashMap;

use proptween_core::{HolderId, IdAllocator, TargetId, TargetWorld, Value};

#[derive(Debug, Default)]
struct StubTarget {
    fields: HashMap<String, Value>,
    attributes: HashMap<String, Value>,
    pose: Option<Value>,
    scale: Option<Value>,
}

/// Scriptable world for tests. Holder creation and destruction are counted so
/// tests can assert that failed builds and teardowns leak nothing.
#[derive(Default)]
pub struct StubWorld {
    targets: HashMap<TargetId, StubTarget>,
    holders: HashMap<HolderId, Value>,
    ids: IdAllocator,
    holders_created: usize,
    holders_destroyed: usize,
}

impl StubWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain target exposing the given direct fields.
    pub fn spawn(&mut self, fields: &[(&str, Value)]) -> TargetId {
        let id = self.ids.alloc_target();
        let mut target = StubTarget::default();
        for (name, value) in fields {
            target.fields.insert((*name).to_string(), value.clone());
        }
        self.targets.insert(id, target);
        id
    }

    /// Add a compound target: direct fields plus a composed pose and a
    /// uniform scale.
    pub fn spawn_compound(
        &mut self,
        fields: &[(&str, Value)],
        pose: Value,
        scale: f32,
    ) -> TargetId {
        let id = self.spawn(fields);
        if let Some(target) = self.targets.get_mut(&id) {
            target.pose = Some(pose);
            target.scale = Some(Value::Float(scale));
        }
        id
    }

    /// Holders currently alive.
    pub fn live_holders(&self) -> usize {
        self.holders.len()
    }

    /// Holders allocated since construction, destroyed or not.
    pub fn holders_created(&self) -> usize {
        self.holders_created
    }

    pub fn holders_destroyed(&self) -> usize {
        self.holders_destroyed
    }
}

impl TargetWorld for StubWorld {
    fn field(&self, target: TargetId, name: &str) -> Option<Value> {
        self.targets
            .get(&target)
            .and_then(|t| t.fields.get(name))
            .cloned()
    }

    fn set_field(&mut self, target: TargetId, name: &str, value: Value) {
        if let Some(t) = self.targets.get_mut(&target) {
            t.fields.insert(name.to_string(), value);
        }
    }

    fn attribute(&self, target: TargetId, name: &str) -> Option<Value> {
        self.targets
            .get(&target)
            .and_then(|t| t.attributes.get(name))
            .cloned()
    }

    fn set_attribute(&mut self, target: TargetId, name: &str, value: Value) {
        if let Some(t) = self.targets.get_mut(&target) {
            t.attributes.insert(name.to_string(), value);
        }
    }

    fn pivot(&self, target: TargetId) -> Option<Value> {
        self.targets.get(&target).and_then(|t| t.pose.clone())
    }

    fn pivot_to(&mut self, target: TargetId, pose: Value) {
        if let Some(t) = self.targets.get_mut(&target) {
            if t.pose.is_some() {
                t.pose = Some(pose);
            }
        }
    }

    fn uniform_scale(&self, target: TargetId) -> Option<Value> {
        self.targets.get(&target).and_then(|t| t.scale.clone())
    }

    fn scale_to(&mut self, target: TargetId, scale: Value) {
        if let Some(t) = self.targets.get_mut(&target) {
            if t.scale.is_some() {
                t.scale = Some(scale);
            }
        }
    }

    fn create_holder(&mut self, seed: Value) -> HolderId {
        let id = self.ids.alloc_holder();
        self.holders.insert(id, seed);
        self.holders_created += 1;
        id
    }

    fn holder_value(&self, holder: HolderId) -> Option<Value> {
        self.holders.get(&holder).cloned()
    }

    fn set_holder_value(&mut self, holder: HolderId, value: Value) {
        if let Some(slot) = self.holders.get_mut(&holder) {
            *slot = value;
        }
    }

    fn destroy_holder(&mut self, holder: HolderId) {
        if self.holders.remove(&holder).is_some() {
            self.holders_destroyed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptween_core::{FieldBinding, PIVOT_FIELD};

    /// it should count holder creation and destruction for leak checks
    #[test]
    fn holder_accounting() {
        let mut world = StubWorld::new();
        let a = world.create_holder(Value::Float(0.0));
        let b = world.create_holder(Value::Bool(true));
        assert_eq!(world.live_holders(), 2);
        world.destroy_holder(a);
        // Double destroy must not double count.
        world.destroy_holder(a);
        assert_eq!(world.live_holders(), 1);
        assert_eq!(world.holders_created(), 2);
        assert_eq!(world.holders_destroyed(), 1);
        world.destroy_holder(b);
        assert_eq!(world.live_holders(), 0);
    }

    /// it should resolve composite, attribute, and direct names in that order
    #[test]
    fn binding_precedence_against_stub() {
        let mut world = StubWorld::new();
        let plain = world.spawn(&[("FieldOfView", Value::Float(70.0))]);
        let compound = world.spawn_compound(
            &[("Visible", Value::Bool(true))],
            Value::identity_transform(),
            1.0,
        );
        world.set_attribute(plain, "Cooldown", Value::Float(5.0));

        assert!(FieldBinding::resolve(&world, plain, "FieldOfView")
            .expect("direct")
            .is_native());
        assert!(!FieldBinding::resolve(&world, plain, "Cooldown")
            .expect("attribute")
            .is_native());
        assert!(!FieldBinding::resolve(&world, compound, PIVOT_FIELD)
            .expect("composite")
            .is_native());
        assert!(FieldBinding::resolve(&world, plain, PIVOT_FIELD).is_err());
    }

    /// it should drop composite writes on targets without a pose
    #[test]
    fn composite_writes_need_a_pose() {
        let mut world = StubWorld::new();
        let plain = world.spawn(&[("X", Value::Float(0.0))]);
        world.pivot_to(plain, Value::identity_transform());
        assert_eq!(world.pivot(plain), None);
    }
}
