//! Turret sandbox showcasing the scene hierarchy and component hooks
//!
//! Runs headless: a turret base turns, its barrel fires projectiles that
//! expire on their own, and a camera rig follows the base. Pass a TOML or RON
//! engine config as the first argument to override the defaults.

use fern_engine::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

// Turret configuration
const TURRET_ROTATION_SPEED: f32 = 45.0; // Degrees per second
const FIRE_INTERVAL: f32 = 0.5; // Seconds between shots
const PROJECTILE_SPEED: f32 = 12.0; // World units per second
const PROJECTILE_LIFETIME: f32 = 1.2; // Seconds before a projectile expires

#[derive(Error, Debug)]
enum SandboxError {
    #[error("Failed to load sandbox config: {0}")]
    Config(#[from] fern_engine::config::ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Turns the owner at a constant rate
struct Spin {
    degrees_per_second: f32,
}

impl Component for Spin {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, dt: f32) -> HookResult {
        if let Some(transform) = ctx.transform_mut() {
            transform.rotation = (transform.rotation + self.degrees_per_second * dt) % 360.0;
        }
        Ok(())
    }
}

/// Spawns projectiles as root objects at the barrel's position
struct Barrel {
    cooldown: f32,
    fired: u32,
}

impl Component for Barrel {
    fn start(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
        self.cooldown = FIRE_INTERVAL;
        Ok(())
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, dt: f32) -> HookResult {
        self.cooldown -= dt;
        if self.cooldown > 0.0 {
            return Ok(());
        }
        self.cooldown += FIRE_INTERVAL;

        // Barrel sits under the base; fire along the base's heading
        let scene = ctx.scene();
        let base = scene.parent(ctx.owner());
        let heading = base
            .and_then(|base| scene.transform(base))
            .map_or(0.0, |transform| transform.rotation);
        let muzzle = ctx.transform().map_or(Vec2::zeros(), |transform| transform.position);

        let radians = -heading.to_radians();
        let velocity = Vec2::new(radians.cos(), radians.sin()) * PROJECTILE_SPEED;

        self.fired += 1;
        let scene = ctx.scene_mut();
        let projectile = scene
            .create_game_object(format!("Projectile {}", self.fired), None)
            .map_err(|e| HookError::msg(e.to_string()))?;
        if let Some(transform) = scene.transform_mut(projectile) {
            transform.position = muzzle;
            transform.rotation = heading;
        }
        scene
            .add_component(projectile, Projectile { velocity, remaining: PROJECTILE_LIFETIME })
            .map_err(|e| HookError::msg(e.to_string()))?;
        log::debug!("Fired projectile {} heading {:.1}", self.fired, heading);
        Ok(())
    }

    fn on_removed(&mut self, _ctx: &mut ComponentContext<'_>) {
        log::info!("Barrel retired after {} shots", self.fired);
    }
}

/// Moves in a straight line and destroys its owner when it expires
struct Projectile {
    velocity: Vec2,
    remaining: f32,
}

impl Component for Projectile {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, dt: f32) -> HookResult {
        if let Some(transform) = ctx.transform_mut() {
            transform.position += self.velocity * dt;
        }

        self.remaining -= dt;
        if self.remaining <= 0.0 {
            let owner = ctx.owner();
            ctx.scene_mut().destroy(owner);
        }
        Ok(())
    }
}

/// Keeps the camera rig on top of the turret base
struct Follow {
    target: GameObjectId,
}

impl Component for Follow {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, _dt: f32) -> HookResult {
        let Some(target) = ctx.scene().transform(self.target).map(|t| (t.position, t.rotation)) else {
            return Ok(());
        };
        if let Some(transform) = ctx.transform_mut() {
            transform.position = target.0;
            transform.rotation = target.1;
        }
        Ok(())
    }
}

struct TurretSandbox {
    base: Option<GameObjectId>,
}

impl Application for TurretSandbox {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let scene = engine.scene_mut();

        let base = scene.create_game_object("Turret Base", None)?;
        scene.add_component(base, Spin { degrees_per_second: TURRET_ROTATION_SPEED })?;

        let barrel = scene.create_game_object("Turret Barrel", Some(base))?;
        if let Some(transform) = scene.transform_mut(barrel) {
            transform.position = Vec2::new(1.2, 0.0);
        }
        scene.add_component(barrel, Barrel { cooldown: 0.0, fired: 0 })?;

        let rig = scene.create_game_object("Camera Rig", None)?;
        scene.add_component(rig, Follow { target: base })?;
        scene.add_component(rig, CameraComponent::new(Camera::orthographic(30.0, 16.0 / 9.0, -1.0, 1.0)))?;

        self.base = Some(base);
        log::info!("Sandbox scene ready: {:?}", scene.stats());
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        if let Some(base) = self.base {
            if !engine.scene().is_live(base) {
                return Err(AppError::Custom("turret base vanished from the scene".to_string()));
            }
        }

        let frame = engine.frames();
        if frame % 60 == 0 {
            let stats = engine.scene().stats();
            log::info!(
                "frame {frame}: {} live objects, {} components, {:.1} fps",
                stats.live_objects,
                stats.components,
                engine.time().fps()
            );
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        if let Some((_, camera)) = engine.scene().find_first_component::<CameraComponent>() {
            log::info!("Camera finished at {:?}", camera.camera.position);
        }
        if let Some(base) = self.base.take() {
            let removed = engine.scene_mut().destroy(base);
            log::info!("Destroyed turret ({removed} objects)");
        }
    }
}

fn load_config() -> Result<EngineConfig, SandboxError> {
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Ok(EngineConfig::load_from_file(&path)?),
        None => Ok(EngineConfig::default().with_max_frames(300)),
    }
}

fn main() {
    let result = load_config().and_then(|config| {
        let mut app = TurretSandbox { base: None };
        Engine::run(config, &mut app).map_err(SandboxError::from)
    });

    if let Err(e) = result {
        eprintln!("Sandbox error: {e}");
        std::process::exit(1);
    }
}
