//! Scene: owner of the game object hierarchy
//!
//! Objects live in a slot map owned by the scene; parent, child and root
//! links are handles into it. The scene also owns the root list and decides
//! which objects are live.

use super::component::{Component, ComponentContext, ComponentSlot};
use super::error::SceneError;
use super::game_object::{GameObject, ObjectState};
use super::transform::Transform;
use crate::core::{HookFailurePolicy, SceneConfig};
use crate::foundation::collections::{ComponentId, ComponentMap, GameObjectId, GameObjectMap};

/// Counters describing the current scene contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// Objects attached to the scene
    pub live_objects: usize,
    /// Objects constructed but not yet attached
    pub unattached_objects: usize,
    /// Parentless live objects
    pub roots: usize,
    /// Components attached to any object
    pub components: usize,
    /// Hook failures seen since the scene was created
    pub hook_failures: u64,
}

/// Runtime scene graph
pub struct Scene {
    pub(crate) objects: GameObjectMap<GameObject>,
    pub(crate) component_owners: ComponentMap<GameObjectId>,
    pub(crate) roots: Vec<GameObjectId>,
    pub(crate) config: SceneConfig,
    pub(crate) hook_failures: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with default configuration
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create an empty scene with custom configuration
    pub fn with_config(config: SceneConfig) -> Self {
        log::info!("Scene created (hook failures: {:?})", config.hook_failure_policy);
        Self {
            objects: GameObjectMap::with_key(),
            component_owners: ComponentMap::with_key(),
            roots: Vec::new(),
            config,
            hook_failures: 0,
        }
    }

    /// Scene configuration
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Change how hook failures are handled by subsequent sweeps
    pub fn set_hook_failure_policy(&mut self, policy: HookFailurePolicy) {
        self.config.hook_failure_policy = policy;
    }

    // ---------------------------------------------------------------------
    // Construction and hierarchy
    // ---------------------------------------------------------------------

    /// Construct an unattached object with its transform
    ///
    /// The object is invisible to sweeps and queries over the hierarchy until
    /// it is passed to [`attach`](Self::attach).
    pub fn new_game_object(&mut self, name: impl Into<String>) -> GameObjectId {
        let name = name.into();
        let owners = &mut self.component_owners;
        let mut transform_id = ComponentId::default();
        let object = self.objects.insert_with_key(|key| {
            transform_id = owners.insert(key);
            GameObject::new(name, ComponentSlot::new::<Transform>(transform_id))
        });

        self.notify_added(object, transform_id, Box::new(Transform::default()));
        object
    }

    /// Create a live object under `parent`, or as a root when `parent` is `None`
    pub fn create_game_object(
        &mut self,
        name: impl Into<String>,
        parent: Option<GameObjectId>,
    ) -> Result<GameObjectId, SceneError> {
        if let Some(parent) = parent {
            self.require_live(parent)?;
        }
        let object = self.new_game_object(name);
        self.attach(object, parent)?;
        log::debug!("Created {:?} under {:?}", object, parent);
        Ok(object)
    }

    /// Create a live object named after [`SceneConfig::default_object_name`]
    pub fn create_default_game_object(&mut self, parent: Option<GameObjectId>) -> Result<GameObjectId, SceneError> {
        let name = self.config.default_object_name.clone();
        self.create_game_object(name, parent)
    }

    /// Attach an object to the scene, or reparent it if it is already live
    pub fn attach(&mut self, object: GameObjectId, parent: Option<GameObjectId>) -> Result<(), SceneError> {
        let state = self.objects.get(object).ok_or(SceneError::UnknownGameObject(object))?.state;
        match state {
            ObjectState::Live => return self.set_parent(object, parent),
            ObjectState::Disposing => return Err(SceneError::NotLive(object)),
            ObjectState::Unattached => {}
        }
        if let Some(parent) = parent {
            self.require_live(parent)?;
        }

        if let Some(go) = self.objects.get_mut(object) {
            go.state = ObjectState::Live;
            go.parent = parent;
        }
        match parent.and_then(|parent| self.objects.get_mut(parent)) {
            Some(parent) => parent.children.push(object),
            None => self.roots.push(object),
        }
        Ok(())
    }

    /// Attach `child` under `parent`
    pub fn add_child(&mut self, parent: GameObjectId, child: GameObjectId) -> Result<GameObjectId, SceneError> {
        self.attach(child, Some(parent))?;
        Ok(child)
    }

    /// Move a live object under a new parent, or make it a root
    ///
    /// Rejects parents that are the object itself or one of its descendants
    /// with [`SceneError::CyclicParent`], leaving the hierarchy untouched.
    pub fn set_parent(&mut self, object: GameObjectId, new_parent: Option<GameObjectId>) -> Result<(), SceneError> {
        let current = self.require_live(object)?.parent;
        if current == new_parent {
            return Ok(());
        }
        if let Some(parent) = new_parent {
            self.require_live(parent)?;
            if self.is_ancestor(object, parent) {
                let error = SceneError::CyclicParent { child: object, parent };
                log::warn!("{error}");
                return Err(error);
            }
        }

        self.detach_from_parent(object);
        if let Some(go) = self.objects.get_mut(object) {
            go.parent = new_parent;
        }

        match new_parent {
            Some(parent) => {
                if let Some(parent) = self.objects.get_mut(parent) {
                    if !parent.children.contains(&object) {
                        parent.children.push(object);
                    }
                }
                self.remove_root_if_present(object);
            }
            None => self.add_root_if_missing(object),
        }
        log::debug!("Reparented {:?} from {:?} to {:?}", object, current, new_parent);
        Ok(())
    }

    /// Whether `ancestor` is `object` itself or one of its ancestors
    pub fn is_ancestor(&self, ancestor: GameObjectId, object: GameObjectId) -> bool {
        let mut cursor = Some(object);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.objects.get(id).and_then(GameObject::parent);
        }
        false
    }

    pub(crate) fn add_root_if_missing(&mut self, object: GameObjectId) {
        if self.is_live(object) && !self.roots.contains(&object) {
            self.roots.push(object);
        }
    }

    pub(crate) fn remove_root_if_present(&mut self, object: GameObjectId) {
        self.roots.retain(|&root| root != object);
    }

    pub(crate) fn detach_from_parent(&mut self, object: GameObjectId) {
        let Some(parent) = self.objects.get_mut(object).and_then(|go| go.parent.take()) else {
            return;
        };
        if let Some(parent) = self.objects.get_mut(parent) {
            parent.children.retain(|&child| child != object);
        }
    }

    fn require_live(&self, object: GameObjectId) -> Result<&GameObject, SceneError> {
        let go = self.objects.get(object).ok_or(SceneError::UnknownGameObject(object))?;
        if go.is_live() {
            Ok(go)
        } else {
            Err(SceneError::NotLive(object))
        }
    }

    // ---------------------------------------------------------------------
    // Destruction
    // ---------------------------------------------------------------------

    /// Destroy a live object and its whole subtree
    ///
    /// Children are disposed before their parent, and every component gets
    /// `on_removed`. Returns how many objects were removed (zero if `object`
    /// was not live).
    pub fn destroy(&mut self, object: GameObjectId) -> usize {
        let Some(go) = self.objects.get(object).filter(|go| go.is_live()) else {
            return 0;
        };
        if go.parent.is_none() {
            self.remove_root_if_present(object);
        } else {
            self.detach_from_parent(object);
        }

        self.mark_disposing(object);
        let removed = self.dispose_recursive(object);
        log::debug!("Destroyed {:?} ({} objects)", object, removed);
        removed
    }

    /// Mark a whole subtree `Disposing` before any of its hooks run
    ///
    /// Hierarchy operations reject non-live objects, so `on_removed` hooks
    /// cannot move a pending node out of the subtree being disposed.
    fn mark_disposing(&mut self, object: GameObjectId) {
        let mut stack = vec![object];
        while let Some(id) = stack.pop() {
            if let Some(go) = self.objects.get_mut(id) {
                go.state = ObjectState::Disposing;
                stack.extend(go.children.iter().copied());
            }
        }
    }

    /// Dispose a subtree bottom-up and drop it from storage
    pub(crate) fn dispose_recursive(&mut self, object: GameObjectId) -> usize {
        let children = match self.objects.get_mut(object) {
            Some(go) => {
                go.state = ObjectState::Disposing;
                std::mem::take(&mut go.children)
            }
            None => return 0,
        };

        let mut removed = 0;
        for child in children {
            removed += self.dispose_recursive(child);
        }

        let ids: Vec<ComponentId> = self
            .objects
            .get(object)
            .map(|go| go.component_ids().collect())
            .unwrap_or_default();
        for id in ids {
            let instance = self
                .objects
                .get_mut(object)
                .and_then(|go| go.slot_mut(id))
                .and_then(|slot| slot.instance.take());
            // Checked-out instances get on_removed when their hook returns.
            if let Some(mut instance) = instance {
                instance.on_removed(&mut ComponentContext::new(self, object, id));
            }
            self.component_owners.remove(id);
        }

        if self.objects.remove(object).is_some() {
            removed += 1;
        }
        removed
    }

    /// Tear the whole scene down
    ///
    /// Disposes every root subtree and every object that was never attached,
    /// then clears the root list. Safe to call repeatedly; also runs on drop.
    pub fn dispose(&mut self) {
        if self.objects.is_empty() {
            return;
        }
        let total = self.objects.len();
        for go in self.objects.values_mut() {
            go.state = ObjectState::Disposing;
        }

        for root in std::mem::take(&mut self.roots) {
            self.dispose_recursive(root);
        }
        let leftovers: Vec<GameObjectId> = self
            .objects
            .iter()
            .filter(|(_, go)| go.parent.is_none())
            .map(|(id, _)| id)
            .collect();
        for object in leftovers {
            self.dispose_recursive(object);
        }

        if !self.objects.is_empty() {
            log::warn!(
                "{} objects created during scene teardown were dropped without on_removed",
                self.objects.len()
            );
            self.objects.clear();
        }
        self.roots.clear();
        self.component_owners.clear();
        log::info!("Scene disposed ({} objects)", total);
    }

    // ---------------------------------------------------------------------
    // Hook plumbing
    // ---------------------------------------------------------------------

    /// Run `f` with a component checked out of its slot
    ///
    /// Returns `None` if the component does not exist or is already checked out.
    pub(crate) fn with_checked_out<R>(
        &mut self,
        object: GameObjectId,
        id: ComponentId,
        f: impl FnOnce(&mut dyn Component, &mut ComponentContext<'_>) -> R,
    ) -> Option<R> {
        let mut instance = self.objects.get_mut(object)?.slot_mut(id)?.instance.take()?;
        let result = f(&mut *instance, &mut ComponentContext::new(self, object, id));
        self.check_in(object, id, instance);
        Some(result)
    }

    /// Return a checked-out component to its slot
    ///
    /// If the slot disappeared meanwhile (component removed, or owner
    /// destroyed), the component is finished off with `on_removed` instead.
    pub(crate) fn check_in(&mut self, object: GameObjectId, id: ComponentId, mut instance: Box<dyn Component>) {
        if let Some(slot) = self.objects.get_mut(object).and_then(|go| go.slot_mut(id)) {
            slot.instance = Some(instance);
            return;
        }
        instance.on_removed(&mut ComponentContext::new(self, object, id));
        self.component_owners.remove(id);
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Parentless live objects, in attach order
    pub fn roots(&self) -> &[GameObjectId] {
        &self.roots
    }

    /// Look up an object (live or unattached)
    pub fn game_object(&self, object: GameObjectId) -> Option<&GameObject> {
        self.objects.get(object)
    }

    /// Mutable access to an object's name and active flag
    pub fn game_object_mut(&mut self, object: GameObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(object)
    }

    /// Whether the object is attached and not destroyed
    pub fn is_live(&self, object: GameObjectId) -> bool {
        self.objects.get(object).is_some_and(GameObject::is_live)
    }

    /// Parent of an object
    pub fn parent(&self, object: GameObjectId) -> Option<GameObjectId> {
        self.objects.get(object)?.parent
    }

    /// Children of an object; empty for unknown handles
    pub fn children(&self, object: GameObjectId) -> &[GameObjectId] {
        self.objects.get(object).map(GameObject::children).unwrap_or_default()
    }

    /// Number of live objects
    pub fn live_count(&self) -> usize {
        self.objects.values().filter(|go| go.is_live()).count()
    }

    /// Pre-order depth-first walk over every live object
    ///
    /// Each call starts a fresh walk. The walk borrows the scene, so the
    /// hierarchy cannot change while it is in progress.
    pub fn all_game_objects(&self) -> GameObjectIter<'_> {
        GameObjectIter {
            scene: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// First live object with the given name, in pre-order
    pub fn find_first(&self, name: &str) -> Option<GameObjectId> {
        self.all_game_objects().find(|(_, go)| go.name() == name).map(|(id, _)| id)
    }

    /// First component of type `T` on any live object, in pre-order
    pub fn find_first_component<T: Component>(&self) -> Option<(GameObjectId, &T)> {
        self.all_game_objects().find_map(|(id, _)| self.get::<T>(id).map(|component| (id, component)))
    }

    /// Snapshot of scene counters
    pub fn stats(&self) -> SceneStats {
        let live_objects = self.live_count();
        SceneStats {
            live_objects,
            unattached_objects: self.objects.len() - live_objects,
            roots: self.roots.len(),
            components: self.component_owners.len(),
            hook_failures: self.hook_failures,
        }
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Iterator returned by [`Scene::all_game_objects`]
pub struct GameObjectIter<'a> {
    scene: &'a Scene,
    stack: Vec<GameObjectId>,
}

impl<'a> Iterator for GameObjectIter<'a> {
    type Item = (GameObjectId, &'a GameObject);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.stack.pop()?;
            if let Some(go) = self.scene.objects.get(id) {
                self.stack.extend(go.children.iter().rev().copied());
                return Some((id, go));
            }
        }
    }
}

impl std::iter::FusedIterator for GameObjectIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(scene: &Scene) -> Vec<String> {
        scene.all_game_objects().map(|(_, go)| go.name().to_string()).collect()
    }

    #[test]
    fn test_create_root_and_child() {
        let mut scene = Scene::new();
        let a = scene.create_game_object("A", None).unwrap();
        let b = scene.create_game_object("B", Some(a)).unwrap();

        assert_eq!(scene.roots(), &[a]);
        assert_eq!(scene.children(a), &[b]);
        assert_eq!(scene.parent(b), Some(a));
        assert_eq!(scene.parent(a), None);
    }

    #[test]
    fn test_unattached_object_is_invisible_until_attached() {
        let mut scene = Scene::new();
        let root = scene.create_game_object("Root", None).unwrap();
        let loose = scene.new_game_object("Loose");

        assert!(!scene.is_live(loose));
        assert_eq!(scene.live_count(), 1);
        assert_eq!(scene.stats().unattached_objects, 1);
        assert_eq!(scene.destroy(loose), 0);

        scene.add_child(root, loose).unwrap();
        assert!(scene.is_live(loose));
        assert_eq!(names(&scene), vec!["Root", "Loose"]);
    }

    #[test]
    fn test_attach_live_object_reparents() {
        let mut scene = Scene::new();
        let a = scene.create_game_object("A", None).unwrap();
        let b = scene.create_game_object("B", None).unwrap();

        scene.attach(b, Some(a)).unwrap();
        assert_eq!(scene.roots(), &[a]);
        assert_eq!(scene.children(a), &[b]);

        scene.attach(b, None).unwrap();
        assert_eq!(scene.roots(), &[a, b]);
        assert!(scene.children(a).is_empty());
    }

    #[test]
    fn test_set_parent_same_parent_is_noop() {
        let mut scene = Scene::new();
        let a = scene.create_game_object("A", None).unwrap();
        let b = scene.create_game_object("B", Some(a)).unwrap();
        let c = scene.create_game_object("C", Some(a)).unwrap();

        scene.set_parent(b, Some(a)).unwrap();
        assert_eq!(scene.children(a), &[b, c]);
    }

    #[test]
    fn test_cyclic_parent_is_rejected() {
        let mut scene = Scene::new();
        let a = scene.create_game_object("A", None).unwrap();
        let b = scene.create_game_object("B", Some(a)).unwrap();
        let c = scene.create_game_object("C", Some(b)).unwrap();

        assert!(matches!(scene.set_parent(a, Some(c)), Err(SceneError::CyclicParent { .. })));
        assert!(matches!(scene.set_parent(a, Some(a)), Err(SceneError::CyclicParent { .. })));

        assert_eq!(scene.roots(), &[a]);
        assert_eq!(scene.parent(a), None);
        assert_eq!(names(&scene), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_unknown_and_dead_handles() {
        let mut scene = Scene::new();
        let a = scene.create_game_object("A", None).unwrap();
        scene.destroy(a);

        assert!(matches!(scene.create_game_object("B", Some(a)), Err(SceneError::UnknownGameObject(_))));
        assert!(matches!(scene.set_parent(a, None), Err(SceneError::UnknownGameObject(_))));
        assert_eq!(scene.destroy(a), 0);
        assert!(scene.children(a).is_empty());
    }

    #[test]
    fn test_attach_under_unattached_parent_fails() {
        let mut scene = Scene::new();
        let parent = scene.new_game_object("P");
        let child = scene.new_game_object("C");

        assert!(matches!(scene.attach(child, Some(parent)), Err(SceneError::NotLive(_))));
        assert!(!scene.is_live(child));
    }

    #[test]
    fn test_traversal_is_preorder_and_restartable() {
        let mut scene = Scene::new();
        let a = scene.create_game_object("A", None).unwrap();
        let b = scene.create_game_object("B", Some(a)).unwrap();
        scene.create_game_object("C", Some(b)).unwrap();
        scene.create_game_object("D", Some(a)).unwrap();
        scene.create_game_object("E", None).unwrap();

        assert_eq!(names(&scene), vec!["A", "B", "C", "D", "E"]);
        assert_eq!(names(&scene), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_find_first() {
        let mut scene = Scene::new();
        let a = scene.create_game_object("Twin", None).unwrap();
        scene.create_game_object("Twin", Some(a)).unwrap();

        assert_eq!(scene.find_first("Twin"), Some(a));
        assert_eq!(scene.find_first("Nobody"), None);
        assert_eq!(scene.find_first_component::<Transform>().map(|(id, _)| id), Some(a));
    }

    #[test]
    fn test_default_name_from_config() {
        let config = SceneConfig { default_object_name: "Node".to_string(), ..Default::default() };
        let mut scene = Scene::with_config(config);
        let id = scene.create_default_game_object(None).unwrap();
        assert_eq!(scene.game_object(id).unwrap().name(), "Node");
    }

    #[test]
    fn test_rename_and_deactivate() {
        let mut scene = Scene::new();
        let a = scene.create_game_object("A", None).unwrap();

        let go = scene.game_object_mut(a).unwrap();
        go.set_name("Renamed");
        go.set_active(false);

        assert_eq!(scene.find_first("Renamed"), Some(a));
        assert!(!scene.game_object(a).unwrap().is_active());
    }

    #[test]
    fn test_dispose_clears_everything() {
        let mut scene = Scene::new();
        let a = scene.create_game_object("A", None).unwrap();
        scene.create_game_object("B", Some(a)).unwrap();
        scene.new_game_object("Loose");

        scene.dispose();

        assert!(scene.roots().is_empty());
        assert_eq!(scene.stats(), SceneStats::default());
        scene.dispose();
    }
}
