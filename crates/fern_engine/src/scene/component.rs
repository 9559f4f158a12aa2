//! Component trait and the context handed to component hooks
//!
//! A component is a unit of behaviour attached to exactly one game object.
//! The scene stores each component as a `Box<dyn Component>` together with
//! its bookkeeping (type tag, enabled and started flags), and calls the hooks
//! below as objects are attached, swept each frame, and disposed.

use super::error::HookResult;
use super::game_object::GameObject;
use super::scene_graph::Scene;
use super::transform::Transform;
use crate::foundation::collections::{ComponentId, GameObjectId};
use std::any::{Any, TypeId};

/// Access to the concrete type behind a `dyn Component`
pub trait AsAny: Any {
    /// Downcast helper
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast helper
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behaviour unit attached to a game object
///
/// Every hook has an empty default. `start`, `update` and `render` are
/// fallible; what happens to their errors is decided by the scene's
/// [`HookFailurePolicy`](crate::core::HookFailurePolicy).
///
/// Call order guarantees:
/// - `on_added` runs once, right after the component is attached and before
///   any sweep can reach it.
/// - `start` runs at most once, during the first start sweep that finds the
///   component enabled, and always before the first `update`.
/// - `update` and `render` run once per sweep while the component is enabled
///   and every object from its owner up to the root is active.
/// - `on_removed` runs exactly once, on removal or when the owner is disposed.
pub trait Component: AsAny {
    /// At most one instance of this type may be attached to a game object
    fn is_single_instance(&self) -> bool {
        false
    }

    /// Called once after the component is attached to its owner
    fn on_added(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Called once, lazily, before the first update
    fn start(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
        Ok(())
    }

    /// Called every frame with the scaled frame delta in seconds
    fn update(&mut self, _ctx: &mut ComponentContext<'_>, _dt: f32) -> HookResult {
        Ok(())
    }

    /// Called every frame after update
    fn render(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
        Ok(())
    }

    /// Called once when the component is detached or its owner disposed
    fn on_removed(&mut self, _ctx: &mut ComponentContext<'_>) {}
}

impl dyn Component {
    /// Downcast to a concrete component type
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably downcast to a concrete component type
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Short, module-less name of a type, used in logs and errors
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(index) => &full[index + 2..],
        None => full,
    }
}

/// Storage slot for one attached component
///
/// `instance` is `None` while the component is checked out to run one of its
/// own hooks.
pub(crate) struct ComponentSlot {
    pub(crate) id: ComponentId,
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) enabled: bool,
    pub(crate) started: bool,
    pub(crate) instance: Option<Box<dyn Component>>,
}

impl ComponentSlot {
    pub(crate) fn new<T: Component>(id: ComponentId) -> Self {
        Self {
            id,
            type_id: TypeId::of::<T>(),
            type_name: short_type_name::<T>(),
            enabled: true,
            started: false,
            instance: None,
        }
    }

    pub(crate) fn is<T: Component>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub(crate) fn get<T: Component>(&self) -> Option<&T> {
        self.instance.as_deref()?.downcast_ref::<T>()
    }

    pub(crate) fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.instance.as_deref_mut()?.downcast_mut::<T>()
    }

    pub(crate) fn info(&self) -> ComponentInfo {
        ComponentInfo {
            id: self.id,
            type_name: self.type_name,
            enabled: self.enabled,
            started: self.started,
        }
    }
}

/// Read-only snapshot of a component's bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentInfo {
    /// Component handle
    pub id: ComponentId,
    /// Short type name
    pub type_name: &'static str,
    /// Whether per-frame hooks are called
    pub enabled: bool,
    /// Whether `start` has run
    pub started: bool,
}

/// Context passed to component hooks
///
/// Gives the hook its own identity and full access to the scene, through the
/// same public API every other caller uses.
pub struct ComponentContext<'a> {
    scene: &'a mut Scene,
    owner: GameObjectId,
    id: ComponentId,
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(scene: &'a mut Scene, owner: GameObjectId, id: ComponentId) -> Self {
        Self { scene, owner, id }
    }

    /// Handle of the owning game object
    pub fn owner(&self) -> GameObjectId {
        self.owner
    }

    /// Handle of the component whose hook is running
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The scene the owner lives in
    pub fn scene(&self) -> &Scene {
        &*self.scene
    }

    /// Mutable access to the scene
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut *self.scene
    }

    /// The owning game object, if it still exists
    pub fn game_object(&self) -> Option<&GameObject> {
        self.scene.game_object(self.owner)
    }

    /// The owner's transform
    pub fn transform(&self) -> Option<&Transform> {
        self.scene.transform(self.owner)
    }

    /// Mutable access to the owner's transform
    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        self.scene.transform_mut(self.owner)
    }

    /// First component of type `T` on the owner
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.scene.get::<T>(self.owner)
    }

    /// Mutable access to the first component of type `T` on the owner
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.scene.get_mut::<T>(self.owner)
    }

    /// All components of type `T` on the owner
    pub fn get_all<T: Component>(&self) -> Vec<&T> {
        self.scene.get_all::<T>(self.owner)
    }

    /// Enable or disable the running component
    pub fn set_enabled(&mut self, enabled: bool) {
        self.scene.set_enabled(self.id, enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;
    impl Component for Marker {}

    struct Generic<T>(T);
    impl<T: 'static> Component for Generic<T> {}

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Marker>(), "Marker");
        assert_eq!(short_type_name::<Generic<u8>>(), "Generic<u8>");
        assert_eq!(short_type_name::<u32>(), "u32");
    }

    #[test]
    fn test_downcast_through_trait_object() {
        let mut boxed: Box<dyn Component> = Box::new(Generic(7_u8));
        assert!(boxed.downcast_ref::<Marker>().is_none());
        boxed.downcast_mut::<Generic<u8>>().unwrap().0 = 9;
        assert_eq!(boxed.downcast_ref::<Generic<u8>>().unwrap().0, 9);
    }

    #[test]
    fn test_slot_type_tag() {
        let slot = ComponentSlot::new::<Marker>(ComponentId::default());
        assert!(slot.is::<Marker>());
        assert!(!slot.is::<Generic<u8>>());
        assert!(slot.enabled);
        assert!(!slot.started);
        assert!(slot.get::<Marker>().is_none());
    }
}
