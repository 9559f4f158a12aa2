//! # Fern Engine
//!
//! A 2D scene graph and component runtime.
//!
//! ## Features
//!
//! - **Scene Graph**: Game objects in a parent/child hierarchy, addressed by
//!   generational handles that never dangle
//! - **Components**: User behaviour attached to objects, with `on_added`,
//!   `start`, `update`, `render` and `on_removed` hooks
//! - **Transforms**: Every object carries a position/rotation/scale with a
//!   memoised matrix
//! - **Frame Driver**: A headless loop with fixed-step support and
//!   TOML/RON configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fern_engine::prelude::*;
//!
//! struct Spin;
//!
//! impl Component for Spin {
//!     fn update(&mut self, ctx: &mut ComponentContext<'_>, dt: f32) -> HookResult {
//!         if let Some(transform) = ctx.transform_mut() {
//!             transform.rotation += 90.0 * dt;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let scene = engine.scene_mut();
//!         let player = scene.create_game_object("Player", None)?;
//!         scene.add_component(player, Spin)?;
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default().with_max_frames(600);
//!     Engine::run(config, &mut MyApp)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod components;
pub mod config;
pub mod core;
pub mod foundation;
pub mod scene;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        components::{Camera, CameraComponent},
        core::{Config, EngineConfig, HookFailurePolicy, SceneConfig},
        foundation::{
            collections::{ComponentId, GameObjectId},
            math::{Mat4, Vec2, Vec3},
            time::Time,
        },
        scene::{
            Component, ComponentContext, GameObject, HookError, HookResult, Scene, SceneError, Transform,
        },
        AppError, Application, Engine, EngineError,
    };
}
