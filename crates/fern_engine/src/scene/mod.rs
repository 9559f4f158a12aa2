//! Scene graph and component model
//!
//! A [`Scene`] owns a hierarchy of [`GameObject`]s. Every object carries an
//! ordered list of [`Component`]s, always starting with its [`Transform`],
//! and components receive lifecycle hooks as the scene is swept each frame.
//!
//! ```text
//! Scene ── roots ──> GameObject ── children ──> GameObject ...
//!                        │
//!                        └── components: [Transform, ...]
//! ```
//!
//! Sweeps run top-down in pre-order (start, update, render); disposal runs
//! bottom-up. Objects and components are addressed by slot-map handles, so
//! parent/child links never own anything.

mod component;
mod error;
mod game_object;
mod scene_graph;
mod transform;
mod traversal;

#[cfg(test)]
mod tests;

pub use component::{AsAny, Component, ComponentContext, ComponentInfo};
pub use error::{HookError, HookKind, HookResult, SceneError};
pub use game_object::{GameObject, ObjectState};
pub use scene_graph::{GameObjectIter, Scene, SceneStats};
pub use transform::Transform;
