//! Game object nodes and their component lists
//!
//! A [`GameObject`] is plain data owned by its [`Scene`]. Operations that
//! touch components run hooks and therefore need the whole scene, so they are
//! implemented on `Scene` and take the object's handle.

use super::component::{Component, ComponentContext, ComponentInfo, ComponentSlot};
use super::error::SceneError;
use super::scene_graph::Scene;
use super::transform::Transform;
use crate::foundation::collections::{ComponentId, GameObjectId};

/// Lifecycle state of a game object
///
/// Transitions only go forward. Once disposal finishes the object is removed
/// from the scene and its handle goes stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// Constructed but not yet attached; unreachable by sweeps
    Unattached,
    /// Attached and reachable from a root
    Live,
    /// Disposal in progress
    Disposing,
}

/// Node of the scene hierarchy
pub struct GameObject {
    name: String,
    active: bool,
    pub(crate) state: ObjectState,
    pub(crate) parent: Option<GameObjectId>,
    pub(crate) children: Vec<GameObjectId>,
    pub(crate) components: Vec<ComponentSlot>,
}

impl GameObject {
    pub(crate) fn new(name: String, transform: ComponentSlot) -> Self {
        Self {
            name,
            active: true,
            state: ObjectState::Unattached,
            parent: None,
            children: Vec::new(),
            components: vec![transform],
        }
    }

    /// Display name; not unique and not a key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the object
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether this object and its subtree take part in sweeps
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate or deactivate this object and, implicitly, its subtree
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Current lifecycle state
    pub fn state(&self) -> ObjectState {
        self.state
    }

    /// Whether the object is attached to the scene
    pub fn is_live(&self) -> bool {
        self.state == ObjectState::Live
    }

    /// Parent handle, `None` for roots and unattached objects
    pub fn parent(&self) -> Option<GameObjectId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[GameObjectId] {
        &self.children
    }

    /// Handle of the mandatory transform
    pub fn transform_id(&self) -> ComponentId {
        self.components[0].id
    }

    /// Component handles in insertion order; the transform is always first
    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components.iter().map(|slot| slot.id)
    }

    /// Bookkeeping of every component in insertion order
    pub fn components(&self) -> impl Iterator<Item = ComponentInfo> + '_ {
        self.components.iter().map(ComponentSlot::info)
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Whether any component is attached; always true, the transform is never removed
    pub fn has_components(&self) -> bool {
        !self.components.is_empty()
    }

    pub(crate) fn slot(&self, id: ComponentId) -> Option<&ComponentSlot> {
        self.components.iter().find(|slot| slot.id == id)
    }

    pub(crate) fn slot_mut(&mut self, id: ComponentId) -> Option<&mut ComponentSlot> {
        self.components.iter_mut().find(|slot| slot.id == id)
    }
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("state", &self.state)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("components", &self.components.iter().map(|slot| slot.type_name).collect::<Vec<_>>())
            .finish()
    }
}

impl Scene {
    /// Attach a component to an object
    ///
    /// Fails with [`SceneError::SingleInstanceViolation`] when the component
    /// type is single-instance and the object already has one. On success the
    /// component's `on_added` hook has run by the time this returns.
    pub fn add_component<T: Component>(&mut self, object: GameObjectId, component: T) -> Result<ComponentId, SceneError> {
        let go = self.objects.get(object).ok_or(SceneError::UnknownGameObject(object))?;
        if go.state == ObjectState::Disposing {
            return Err(SceneError::NotLive(object));
        }
        if component.is_single_instance() && go.components.iter().any(ComponentSlot::is::<T>) {
            let error = SceneError::SingleInstanceViolation {
                component: super::component::short_type_name::<T>(),
                object,
            };
            log::warn!("{error}");
            return Err(error);
        }

        let id = self.component_owners.insert(object);
        if let Some(go) = self.objects.get_mut(object) {
            go.components.push(ComponentSlot::new::<T>(id));
        }
        log::trace!("Added {} to {:?}", super::component::short_type_name::<T>(), object);

        self.notify_added(object, id, Box::new(component));
        Ok(id)
    }

    /// Run `on_added` for a component whose slot is already reserved, then store it
    pub(crate) fn notify_added(&mut self, object: GameObjectId, id: ComponentId, mut component: Box<dyn Component>) {
        component.on_added(&mut ComponentContext::new(self, object, id));
        self.check_in(object, id, component);
    }

    /// Detach a component and run its `on_removed` hook
    ///
    /// Returns `false` without doing anything for an object's transform or an
    /// unknown handle.
    pub fn remove_component(&mut self, id: ComponentId) -> bool {
        let Some(&object) = self.component_owners.get(id) else {
            return false;
        };
        let Some(go) = self.objects.get_mut(object) else {
            return false;
        };
        let Some(index) = go.components.iter().position(|slot| slot.id == id) else {
            return false;
        };
        if index == 0 {
            return false;
        }

        let slot = go.components.remove(index);
        self.component_owners.remove(id);
        log::trace!("Removed {} from {:?}", slot.type_name, object);

        // A checked-out instance gets on_removed when its hook returns.
        if let Some(mut instance) = slot.instance {
            instance.on_removed(&mut ComponentContext::new(self, object, id));
        }
        true
    }

    /// Remove the first component of type `T`; `false` if there is none
    pub fn remove_first<T: Component>(&mut self, object: GameObjectId) -> bool {
        match self.get_ids::<T>(object).first() {
            Some(&id) => self.remove_component(id),
            None => false,
        }
    }

    /// First component of type `T` on an object
    pub fn get<T: Component>(&self, object: GameObjectId) -> Option<&T> {
        self.objects.get(object)?.components.iter().find_map(ComponentSlot::get::<T>)
    }

    /// Mutable access to the first component of type `T` on an object
    pub fn get_mut<T: Component>(&mut self, object: GameObjectId) -> Option<&mut T> {
        self.objects.get_mut(object)?.components.iter_mut().find_map(ComponentSlot::get_mut::<T>)
    }

    /// All components of type `T` on an object, in insertion order
    pub fn get_all<T: Component>(&self, object: GameObjectId) -> Vec<&T> {
        self.objects
            .get(object)
            .map(|go| go.components.iter().filter_map(ComponentSlot::get::<T>).collect())
            .unwrap_or_default()
    }

    /// Handles of all components of type `T` on an object, in insertion order
    pub fn get_ids<T: Component>(&self, object: GameObjectId) -> Vec<ComponentId> {
        self.objects
            .get(object)
            .map(|go| go.components.iter().filter(|slot| slot.is::<T>()).map(|slot| slot.id).collect())
            .unwrap_or_default()
    }

    /// A component by handle, if it has type `T`
    pub fn component<T: Component>(&self, id: ComponentId) -> Option<&T> {
        let object = *self.component_owners.get(id)?;
        self.objects.get(object)?.slot(id)?.get::<T>()
    }

    /// Mutable access to a component by handle, if it has type `T`
    pub fn component_mut<T: Component>(&mut self, id: ComponentId) -> Option<&mut T> {
        let object = *self.component_owners.get(id)?;
        self.objects.get_mut(object)?.slot_mut(id)?.get_mut::<T>()
    }

    /// Bookkeeping of a component
    pub fn component_info(&self, id: ComponentId) -> Option<ComponentInfo> {
        let object = *self.component_owners.get(id)?;
        self.objects.get(object)?.slot(id).map(ComponentSlot::info)
    }

    /// Owner of a component; fixed when the component is added
    pub fn owner_of(&self, id: ComponentId) -> Option<GameObjectId> {
        self.component_owners.get(id).copied()
    }

    /// Enable or disable a component; returns `false` for unknown handles
    pub fn set_enabled(&mut self, id: ComponentId, enabled: bool) -> bool {
        let Some(&object) = self.component_owners.get(id) else {
            return false;
        };
        match self.objects.get_mut(object).and_then(|go| go.slot_mut(id)) {
            Some(slot) => {
                slot.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// An object's transform
    pub fn transform(&self, object: GameObjectId) -> Option<&Transform> {
        self.objects.get(object)?.components.first()?.get::<Transform>()
    }

    /// Mutable access to an object's transform
    pub fn transform_mut(&mut self, object: GameObjectId) -> Option<&mut Transform> {
        self.objects.get_mut(object)?.components.first_mut()?.get_mut::<Transform>()
    }
}
