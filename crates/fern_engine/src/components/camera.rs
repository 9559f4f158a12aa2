//! # 2D Camera
//!
//! Orthographic camera for the 2D scene and the component that binds it to a
//! game object.
//!
//! ## Coordinate System
//! World space is Y-up. `size` is the visible world height; the visible width
//! is `size * aspect_ratio`. Rotation follows [`Transform`]: degrees,
//! positive turns clockwise on screen.
//!
//! ## Matrices
//! - Projection is rebuilt eagerly whenever one of its parameters changes.
//! - View and view-projection are memoised against the position, rotation and
//!   projection they were computed from, the same way [`Transform::to_matrix`]
//!   is.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec2, Vec3};
use crate::scene::{Component, ComponentContext, HookResult, Transform};
use std::cell::Cell;

#[derive(Debug, Clone, Copy)]
struct ViewCache {
    position: Vec2,
    rotation: f32,
    projection: Mat4,
    view: Mat4,
    view_projection: Mat4,
}

/// Orthographic 2D camera
///
/// # Example
/// ```rust
/// use fern_engine::components::Camera;
/// use fern_engine::foundation::math::Vec2;
///
/// let mut camera = Camera::default();
/// camera.set_size(10.0);
/// camera.position = Vec2::new(3.0, 0.0);
/// let vp = camera.view_projection_matrix();
/// assert_eq!(vp, camera.projection_matrix() * camera.view_matrix());
/// ```
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec2,

    /// Camera rotation in degrees
    pub rotation: f32,

    size: f32,
    aspect_ratio: f32,
    z_near: f32,
    z_far: f32,
    projection: Mat4,
    cache: Cell<Option<ViewCache>>,
}

impl Default for Camera {
    /// 20 world units tall, 16:9, depth range [-1, 1]
    fn default() -> Self {
        Self::orthographic(20.0, 16.0 / 9.0, -1.0, 1.0)
    }
}

impl Camera {
    /// Create an orthographic camera at the origin
    ///
    /// # Arguments
    /// * `size` - Visible world height
    /// * `aspect_ratio` - Width / height of the target display
    /// * `z_near` - Near clipping plane
    /// * `z_far` - Far clipping plane
    pub fn orthographic(size: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        let mut camera = Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            size,
            aspect_ratio,
            z_near,
            z_far,
            projection: Mat4::identity(),
            cache: Cell::new(None),
        };
        camera.update_projection();
        camera
    }

    /// Visible world height
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Width / height ratio
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Near clipping plane
    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    /// Far clipping plane
    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Set the visible world height
    pub fn set_size(&mut self, size: f32) {
        self.size = size;
        self.update_projection();
    }

    /// Update the aspect ratio, typically after a display resize
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if (self.aspect_ratio - aspect_ratio).abs() > 0.01 {
            log::debug!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect_ratio, aspect_ratio);
        }
        self.aspect_ratio = aspect_ratio;
        self.update_projection();
    }

    /// Set both clipping planes
    pub fn set_clip_planes(&mut self, z_near: f32, z_far: f32) {
        self.z_near = z_near;
        self.z_far = z_far;
        self.update_projection();
    }

    /// Visible width and height in world units
    pub fn extents(&self) -> Vec2 {
        Vec2::new(self.size * self.aspect_ratio, self.size)
    }

    fn update_projection(&mut self) {
        let half_width = self.size * self.aspect_ratio * 0.5;
        let half_height = self.size * 0.5;
        self.projection = Mat4::orthographic(
            -half_width,
            half_width,
            -half_height,
            half_height,
            self.z_near,
            self.z_far,
        );
    }

    /// Orthographic projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// World-to-camera matrix: inverse of Translate(position) * RotateZ(-rotation)
    pub fn view_matrix(&self) -> Mat4 {
        self.matrices().view
    }

    /// `projection * view`
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.matrices().view_projection
    }

    fn matrices(&self) -> ViewCache {
        if let Some(cache) = self.cache.get() {
            if cache.position == self.position && cache.rotation == self.rotation && cache.projection == self.projection {
                return cache;
            }
        }

        let view = Mat4::rotation_z(utils::deg_to_rad(self.rotation))
            * Mat4::new_translation(&Vec3::new(-self.position.x, -self.position.y, 0.0));
        let cache = ViewCache {
            position: self.position,
            rotation: self.rotation,
            projection: self.projection,
            view,
            view_projection: self.projection * view,
        };
        self.cache.set(Some(cache));
        cache
    }

    /// Match position and rotation to a transform
    pub fn follow(&mut self, transform: &Transform) {
        self.position = transform.position;
        self.rotation = transform.rotation;
    }
}

/// Puts a [`Camera`] on a game object
///
/// Each update copies the owner's transform into the camera, so moving the
/// object moves the view. At most one per object.
#[derive(Debug, Clone, Default)]
pub struct CameraComponent {
    /// The camera driven by this component
    pub camera: Camera,

    /// Index of the display this camera renders to
    pub target_display: usize,
}

impl CameraComponent {
    /// Wrap an existing camera
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            target_display: 0,
        }
    }

    /// Builder pattern: set target display
    pub fn with_target_display(mut self, target_display: usize) -> Self {
        self.target_display = target_display;
        self
    }
}

impl Component for CameraComponent {
    fn is_single_instance(&self) -> bool {
        true
    }

    fn start(&mut self, ctx: &mut ComponentContext<'_>) -> HookResult {
        if let Some(transform) = ctx.transform() {
            self.camera.follow(transform);
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, _dt: f32) -> HookResult {
        if let Some(transform) = ctx.transform() {
            self.camera.follow(transform);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Scene, SceneError};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_default_camera() {
        let camera = Camera::default();
        assert_relative_eq!(camera.size(), 20.0);
        assert_relative_eq!(camera.aspect_ratio(), 16.0 / 9.0);
        assert_relative_eq!(camera.z_near(), -1.0);
        assert_relative_eq!(camera.z_far(), 1.0);
        assert_relative_eq!(camera.view_matrix(), Mat4::identity());
    }

    #[test]
    fn test_projection_maps_visible_corner_to_ndc() {
        let camera = Camera::orthographic(10.0, 2.0, -1.0, 1.0);
        let corner = camera.projection_matrix().transform_point(&Point3::new(10.0, 5.0, 0.0));
        assert_relative_eq!(corner, Point3::new(1.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_setters_rebuild_projection() {
        let mut camera = Camera::default();
        let before = camera.projection_matrix();

        camera.set_size(40.0);
        assert_relative_eq!(camera.projection_matrix()[(1, 1)], before[(1, 1)] * 0.5, epsilon = 1e-6);

        camera.set_aspect_ratio(1.0);
        assert_relative_eq!(camera.projection_matrix()[(0, 0)], 2.0 / 40.0, epsilon = 1e-6);
        assert_relative_eq!(camera.extents(), Vec2::new(40.0, 40.0));
    }

    #[test]
    fn test_view_centres_camera_position() {
        let mut camera = Camera::default();
        camera.position = Vec2::new(3.0, -2.0);
        camera.rotation = 90.0;

        let p = camera.view_matrix().transform_point(&Point3::new(3.0, -2.0, 0.0));
        assert_relative_eq!(p, Point3::origin(), epsilon = 1e-6);

        let world = Mat4::trs_2d(&camera.position, -utils::deg_to_rad(camera.rotation), &Vec2::new(1.0, 1.0));
        assert_relative_eq!(camera.view_matrix() * world, Mat4::identity(), epsilon = 1e-5);
    }

    #[test]
    fn test_view_projection_tracks_direct_mutation() {
        let mut camera = Camera::default();
        let first = camera.view_projection_matrix();
        assert_eq!(first, camera.view_projection_matrix());

        camera.position.x = 5.0;
        let moved = camera.view_projection_matrix();
        assert_ne!(first, moved);
        assert_relative_eq!(moved, camera.projection_matrix() * camera.view_matrix());

        camera.set_size(5.0);
        assert_relative_eq!(camera.view_projection_matrix(), camera.projection_matrix() * camera.view_matrix());
    }

    #[test]
    fn test_component_follows_owner_transform() {
        let mut scene = Scene::new();
        let go = scene.create_game_object("Camera", None).unwrap();
        scene.add_component(go, CameraComponent::default()).unwrap();

        {
            let transform = scene.transform_mut(go).unwrap();
            transform.position = Vec2::new(4.0, 1.0);
            transform.rotation = 45.0;
        }
        scene.update(0.016).unwrap();

        let camera = &scene.get::<CameraComponent>(go).unwrap().camera;
        assert_eq!(camera.position, Vec2::new(4.0, 1.0));
        assert_relative_eq!(camera.rotation, 45.0);
    }

    #[test]
    fn test_second_camera_component_is_rejected() {
        let mut scene = Scene::new();
        let go = scene.create_game_object("Camera", None).unwrap();
        scene.add_component(go, CameraComponent::default()).unwrap();

        let result = scene.add_component(go, CameraComponent::default().with_target_display(1));
        assert!(matches!(result, Err(SceneError::SingleInstanceViolation { .. })));
        assert_eq!(scene.get_all::<CameraComponent>(go).len(), 1);
        assert_eq!(scene.get::<CameraComponent>(go).unwrap().target_display, 0);
    }
}
