//! Per-frame sweeps over the hierarchy
//!
//! A sweep visits live objects in pre-order, siblings in insertion order, and
//! skips the whole subtree of an inactive object. Hooks may change the
//! hierarchy while a sweep runs, so each sweep works from snapshots:
//!
//! - the root list is copied when the sweep begins;
//! - at each object, its component handles are copied before any hook runs,
//!   and its child handles after the last hook;
//! - every copied handle is checked again right before use, so destroyed
//!   objects, removed components and children moved elsewhere are skipped.
//!
//! Objects created during a sweep are picked up by the next one. `update`
//! only reaches components that already started, which keeps
//! start-before-update true for objects created mid-frame.

use super::component::ComponentSlot;
use super::error::{HookError, HookKind, SceneError};
use super::scene_graph::Scene;
use crate::core::HookFailurePolicy;
use crate::foundation::collections::{ComponentId, GameObjectId};

#[derive(Debug, Clone, Copy)]
enum Sweep {
    Start,
    Update(f32),
    Render,
}

impl Sweep {
    fn kind(self) -> HookKind {
        match self {
            Self::Start => HookKind::Start,
            Self::Update(_) => HookKind::Update,
            Self::Render => HookKind::Render,
        }
    }

    fn wants(self, slot: &ComponentSlot) -> bool {
        let eligible = match self {
            Self::Start => !slot.started,
            Self::Update(_) => slot.started,
            Self::Render => true,
        };
        eligible && slot.enabled && slot.instance.is_some()
    }
}

impl Scene {
    /// Start every enabled, not yet started component reachable from the roots
    pub fn start_if_needed(&mut self) -> Result<(), SceneError> {
        self.sweep_roots(Sweep::Start)
    }

    /// Run a start sweep, then an update sweep, in root order
    pub fn update(&mut self, dt: f32) -> Result<(), SceneError> {
        self.start_if_needed()?;
        self.sweep_roots(Sweep::Update(dt))
    }

    /// Run a render sweep, in root order
    pub fn render(&mut self) -> Result<(), SceneError> {
        self.sweep_roots(Sweep::Render)
    }

    /// Start sweep over one subtree
    pub fn start_if_needed_recursive(&mut self, object: GameObjectId) -> Result<(), SceneError> {
        self.sweep_node(object, Sweep::Start)
    }

    /// Update sweep over one subtree
    pub fn update_recursive(&mut self, object: GameObjectId, dt: f32) -> Result<(), SceneError> {
        self.sweep_node(object, Sweep::Update(dt))
    }

    /// Render sweep over one subtree
    pub fn render_recursive(&mut self, object: GameObjectId) -> Result<(), SceneError> {
        self.sweep_node(object, Sweep::Render)
    }

    fn sweep_roots(&mut self, sweep: Sweep) -> Result<(), SceneError> {
        let roots = self.roots.clone();
        for root in roots {
            let still_root = self.objects.get(root).is_some_and(|go| go.is_live() && go.parent.is_none());
            if still_root {
                self.sweep_node(root, sweep)?;
            }
        }
        Ok(())
    }

    fn sweep_node(&mut self, object: GameObjectId, sweep: Sweep) -> Result<(), SceneError> {
        let Some(go) = self.objects.get(object) else {
            return Ok(());
        };
        if !go.is_active() || !go.is_live() {
            return Ok(());
        }

        let pending: Vec<ComponentId> = go
            .components
            .iter()
            .filter(|slot| sweep.wants(slot))
            .map(|slot| slot.id)
            .collect();
        for id in pending {
            self.run_hook(object, id, sweep)?;
        }

        let Some(go) = self.objects.get(object) else {
            return Ok(());
        };
        for child in go.children.clone() {
            if self.parent(child) == Some(object) {
                self.sweep_node(child, sweep)?;
            }
        }
        Ok(())
    }

    fn run_hook(&mut self, object: GameObjectId, id: ComponentId, sweep: Sweep) -> Result<(), SceneError> {
        let Some(slot) = self.objects.get_mut(object).and_then(|go| go.slot_mut(id)) else {
            return Ok(());
        };
        if !sweep.wants(slot) {
            return Ok(());
        }
        let type_name = slot.type_name;
        if matches!(sweep, Sweep::Start) {
            slot.started = true;
        }

        let result = self.with_checked_out(object, id, |component, ctx| match sweep {
            Sweep::Start => component.start(ctx),
            Sweep::Update(dt) => component.update(ctx, dt),
            Sweep::Render => component.render(ctx),
        });
        match result {
            Some(Err(source)) => self.hook_failed(object, type_name, sweep.kind(), source),
            _ => Ok(()),
        }
    }

    fn hook_failed(
        &mut self,
        object: GameObjectId,
        component: &'static str,
        hook: HookKind,
        source: HookError,
    ) -> Result<(), SceneError> {
        self.hook_failures += 1;
        match self.config.hook_failure_policy {
            HookFailurePolicy::Isolate => {
                log::error!("{hook} hook of {component} on {object:?} failed: {source}");
                Ok(())
            }
            HookFailurePolicy::Propagate => Err(SceneError::Hook {
                object,
                component,
                hook,
                source,
            }),
        }
    }
}
