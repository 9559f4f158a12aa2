//! Transform component
//!
//! Every game object owns exactly one `Transform`, stored first in its
//! component list. Position, rotation and scale are plain public fields that
//! callers mutate directly; the matrix is memoised against a snapshot of the
//! values it was last computed from, so it can never be returned stale.

use super::component::Component;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec2};
use std::cell::Cell;

#[derive(Debug, Clone, Copy)]
struct MatrixCache {
    position: Vec2,
    rotation: f32,
    scale: Vec2,
    matrix: Mat4,
}

/// Position, rotation and scale of a game object
#[derive(Debug, Clone)]
pub struct Transform {
    /// Position in world units
    pub position: Vec2,

    /// Rotation in degrees, clockwise on screen
    pub rotation: f32,

    /// Scale factors, `(1, 1)` by default
    pub scale: Vec2,

    cache: Cell<Option<MatrixCache>>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec2::zeros(), 0.0, Vec2::new(1.0, 1.0))
    }
}

impl Component for Transform {
    fn is_single_instance(&self) -> bool {
        true
    }
}

impl Transform {
    /// Create a transform from its parts
    pub fn new(position: Vec2, rotation: f32, scale: Vec2) -> Self {
        Self {
            position,
            rotation,
            scale,
            cache: Cell::new(None),
        }
    }

    /// Create a transform with only a position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: set rotation in degrees
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Builder pattern: set scale
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Translate(position) * RotateZ(-rotation) * Scale(scale)
    ///
    /// Returns a copy; recomputes only when position, rotation or scale
    /// differ from the values captured at the previous computation.
    pub fn to_matrix(&self) -> Mat4 {
        if let Some(cache) = self.cache.get() {
            if cache.position == self.position && cache.rotation == self.rotation && cache.scale == self.scale {
                return cache.matrix;
            }
        }

        let matrix = Mat4::trs_2d(&self.position, -utils::deg_to_rad(self.rotation), &self.scale);
        self.cache.set(Some(MatrixCache {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            matrix,
        }));
        matrix
    }

    #[cfg(test)]
    fn has_current_cache(&self) -> bool {
        self.cache.get().is_some_and(|cache| {
            cache.position == self.position && cache.rotation == self.rotation && cache.scale == self.scale
        })
    }
}
