//! Built-in components
//!
//! Components that ship with the engine and plug into the scene like any
//! user-defined component.

pub mod camera;

pub use camera::{Camera, CameraComponent};
