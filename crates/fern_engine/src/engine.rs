//! Core engine implementation
//!
//! A headless frame driver: it owns the [`Scene`] and the frame clock and
//! runs the application and scene hooks in a fixed order each frame:
//!
//! 1. advance the clock
//! 2. `Application::fixed_update` once per elapsed fixed step
//! 3. `Application::update`
//! 4. `Scene::update` (start sweep, then update sweep)
//! 5. `Scene::render`, then `Application::render`

use crate::application::Application;
use crate::config::ConfigError;
use crate::core::EngineConfig;
use crate::foundation::{logging, time::Time};
use crate::scene::{Scene, SceneError};
use thiserror::Error;

/// Main engine struct
pub struct Engine {
    scene: Scene,
    time: Time,
    config: EngineConfig,
    running: bool,
    frames: u64,
    fixed_accumulator: f32,
}

impl Engine {
    /// Create a new engine instance with an empty scene
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Initializing engine...");

        let scene = Scene::with_config(config.scene.clone());
        let mut time = Time::new();
        time.set_time_scale(config.time_scale);

        Ok(Self {
            scene,
            time,
            config,
            running: true,
            frames: 0,
            fixed_accumulator: 0.0,
        })
    }

    /// Run the engine main loop with the given application
    ///
    /// Loops until [`Engine::quit`] is called or `max_frames` is reached.
    /// `cleanup` and scene disposal run even when a frame fails; the first
    /// error is returned afterwards.
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        logging::init_with_level(logging::parse_level(&config.log_level));
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::Application(format!("App initialization: {e}")))?;

        log::info!("Starting main loop...");
        let result = engine.run_loop(app);

        app.cleanup(&mut engine);
        engine.scene.dispose();

        log::info!("Engine shutdown complete after {} frames", engine.frames);
        result
    }

    fn run_loop<T: Application>(&mut self, app: &mut T) -> Result<(), EngineError> {
        while self.running {
            self.frame(app)?;
        }
        Ok(())
    }

    /// Run one frame timed by the monotonic clock
    pub fn frame<T: Application + ?Sized>(&mut self, app: &mut T) -> Result<(), EngineError> {
        self.time.update();
        self.step(app)
    }

    /// Run one frame with an explicit raw delta in seconds
    pub fn tick<T: Application + ?Sized>(&mut self, app: &mut T, raw_delta: f32) -> Result<(), EngineError> {
        self.time.advance(raw_delta);
        self.step(app)
    }

    fn step<T: Application + ?Sized>(&mut self, app: &mut T) -> Result<(), EngineError> {
        let delta_time = self.time.delta_time();

        let mut fixed_steps = 0_u32;
        self.fixed_accumulator = self
            .time
            .step_fixed(self.fixed_accumulator, self.config.fixed_timestep, |_| fixed_steps += 1);
        for _ in 0..fixed_steps {
            app.fixed_update(self, self.config.fixed_timestep)
                .map_err(|e| EngineError::Application(format!("App fixed update: {e}")))?;
        }

        app.update(self, delta_time)
            .map_err(|e| EngineError::Application(format!("App update: {e}")))?;
        self.scene.update(delta_time)?;
        self.scene.render()?;
        app.render(self)
            .map_err(|e| EngineError::Application(format!("App render: {e}")))?;

        self.frames += 1;
        if self.config.max_frames.is_some_and(|max| self.frames >= max) {
            log::debug!("Frame limit {} reached", self.frames);
            self.running = false;
        }
        Ok(())
    }

    /// Request engine shutdown at the end of the current frame
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop will run another frame
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Get the scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Get mutable access to the scene
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Get the frame clock
    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Get mutable access to the frame clock
    pub fn time_mut(&mut self) -> &mut Time {
        &mut self.time
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A scene sweep aborted under the propagate failure policy
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Application error
    #[error("Application error: {0}")]
    Application(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;
    use crate::core::HookFailurePolicy;
    use crate::scene::{Component, ComponentContext, HookError, HookResult};
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        log: Log,
        fail_update: bool,
    }

    impl Component for Probe {
        fn update(&mut self, _ctx: &mut ComponentContext<'_>, dt: f32) -> HookResult {
            self.log.borrow_mut().push(format!("component update {dt:.2}"));
            if self.fail_update {
                return Err(HookError::msg("probe failed"));
            }
            Ok(())
        }

        fn on_removed(&mut self, _ctx: &mut ComponentContext<'_>) {
            self.log.borrow_mut().push("component removed".to_string());
        }
    }

    struct TestApp {
        log: Log,
        fail_update: bool,
        quit_after: Option<u64>,
    }

    impl TestApp {
        fn new(log: &Log) -> Self {
            Self {
                log: Rc::clone(log),
                fail_update: false,
                quit_after: None,
            }
        }
    }

    impl Application for TestApp {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            let scene = engine.scene_mut();
            let go = scene.create_game_object("Probe", None)?;
            scene.add_component(
                go,
                Probe {
                    log: Rc::clone(&self.log),
                    fail_update: self.fail_update,
                },
            )?;
            self.log.borrow_mut().push("initialize".to_string());
            Ok(())
        }

        fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
            self.log.borrow_mut().push(format!("app update {delta_time:.2}"));
            if self.quit_after.is_some_and(|frames| engine.frames() + 1 >= frames) {
                engine.quit();
            }
            Ok(())
        }

        fn fixed_update(&mut self, _engine: &mut Engine, _step: f32) -> Result<(), AppError> {
            self.log.borrow_mut().push("fixed".to_string());
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {
            self.log.borrow_mut().push("cleanup".to_string());
        }
    }

    fn count(log: &Log, entry: &str) -> usize {
        log.borrow().iter().filter(|e| e.as_str() == entry).count()
    }

    #[test]
    fn test_tick_order_and_time_scale() {
        let log = Log::default();
        let mut app = TestApp::new(&log);
        let config = EngineConfig {
            time_scale: 0.5,
            fixed_timestep: 1.0,
            ..Default::default()
        };
        let mut engine = Engine::new(config).unwrap();
        app.initialize(&mut engine).unwrap();

        engine.tick(&mut app, 0.5).unwrap();

        assert_eq!(*log.borrow(), vec!["initialize", "app update 0.25", "component update 0.25"]);
        assert_relative_eq!(engine.time().total_time(), 0.5);
        assert_eq!(engine.frames(), 1);
    }

    #[test]
    fn test_fixed_update_carries_remainder() {
        let log = Log::default();
        let mut app = TestApp::new(&log);
        let config = EngineConfig {
            fixed_timestep: 0.1,
            ..Default::default()
        };
        let mut engine = Engine::new(config).unwrap();

        engine.tick(&mut app, 0.25).unwrap();
        assert_eq!(count(&log, "fixed"), 2);

        engine.tick(&mut app, 0.06).unwrap();
        assert_eq!(count(&log, "fixed"), 3);
    }

    #[test]
    fn test_run_stops_at_max_frames_and_disposes() {
        let log = Log::default();
        let mut app = TestApp::new(&log);

        Engine::run(EngineConfig::default().with_max_frames(3), &mut app).unwrap();

        let entries = log.borrow();
        assert_eq!(entries.iter().filter(|e| e.starts_with("app update")).count(), 3);
        assert_eq!(entries[entries.len() - 2..], ["cleanup", "component removed"]);
    }

    #[test]
    fn test_quit_ends_loop() {
        let log = Log::default();
        let mut app = TestApp::new(&log);
        app.quit_after = Some(2);

        Engine::run(EngineConfig::default(), &mut app).unwrap();

        assert_eq!(log.borrow().iter().filter(|e| e.starts_with("app update")).count(), 2);
        assert_eq!(count(&log, "cleanup"), 1);
    }

    #[test]
    fn test_propagated_hook_failure_surfaces_and_still_cleans_up() {
        let log = Log::default();
        let mut app = TestApp::new(&log);
        app.fail_update = true;
        let config = EngineConfig::default()
            .with_max_frames(5)
            .with_hook_failure_policy(HookFailurePolicy::Propagate);

        let error = Engine::run(config, &mut app).unwrap_err();

        assert!(matches!(error, EngineError::Scene(SceneError::Hook { .. })));
        assert_eq!(log.borrow().iter().filter(|e| e.starts_with("app update")).count(), 1);
        assert_eq!(count(&log, "cleanup"), 1);
        assert_eq!(count(&log, "component removed"), 1);
    }

    #[test]
    fn test_isolated_hook_failure_keeps_running() {
        let log = Log::default();
        let mut app = TestApp::new(&log);
        app.fail_update = true;

        Engine::run(EngineConfig::default().with_max_frames(4), &mut app).unwrap();

        assert_eq!(log.borrow().iter().filter(|e| e.starts_with("component update")).count(), 4);
    }

    struct Impatient;

    impl Application for Impatient {
        fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
            Ok(())
        }

        fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
            if engine.frames() == 1 {
                return Err(AppError::Custom("out of patience".to_string()));
            }
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {}
    }

    #[test]
    fn test_app_error_stops_run_with_context() {
        let error = Engine::run(EngineConfig::default().with_max_frames(5), &mut Impatient).unwrap_err();

        match error {
            EngineError::Application(message) => {
                assert!(message.starts_with("App update"), "{message}");
                assert!(message.ends_with("out of patience"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            time_scale: -1.0,
            ..Default::default()
        };
        assert!(matches!(Engine::new(config), Err(EngineError::Config(_))));
    }
}
