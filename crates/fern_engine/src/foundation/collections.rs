//! Specialized collection types

pub use slotmap::{Key, SlotMap};

slotmap::new_key_type! {
    /// Stable handle to a [`GameObject`](crate::scene::GameObject) stored in a scene
    ///
    /// Handles become stale once the object is destroyed; a stale handle never
    /// resolves to a different object, even after its slot is reused.
    pub struct GameObjectId;

    /// Stable handle to a component instance attached to a game object
    pub struct ComponentId;
}

/// Handle-based map keyed by game object handles
pub type GameObjectMap<T> = SlotMap<GameObjectId, T>;

/// Handle-based map keyed by component handles
pub type ComponentMap<T> = SlotMap<ComponentId, T>;
