use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::camera::Lens;
use crate::clock::Clock;
use crate::color::Color;
use crate::composer::Composer;
use crate::frame::{FinalFrameState, Renderer};
use crate::input::{apply_drag, apply_edit, EditValue, Field, KeyCommand};
use crate::modulator::{standard_modulators, FrameContext, HueCycle, Persistence};
use crate::params::{Axis, ModulatorKind, ParameterStore};
use crate::preset::Preset;
use crate::scene::Shape;
use crate::sync::{DisplayState, FpsCounter, SyncBroadcaster};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub nominal_frame_ms: f64, // One sticky step per nominal frame
    pub fps_window_ms: f64,
    pub drag_sensitivity: f32, // Degrees per pixel
    pub key_step: f32,         // Degrees per arrow key press
    pub hue_saturation: f32,
    pub hue_lightness: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            nominal_frame_ms: 16.0,
            fps_window_ms: 1000.0,
            drag_sensitivity: 0.5,
            key_step: 5.0,
            hue_saturation: 1.0,
            hue_lightness: 0.5,
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Invalid viewer config")?;
        Ok(config.sanitized())
    }

    /// Replace unusable values with their defaults, warning about each.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        positive_or(&mut self.nominal_frame_ms, defaults.nominal_frame_ms, "nominal_frame_ms");
        positive_or(&mut self.fps_window_ms, defaults.fps_window_ms, "fps_window_ms");
        if !self.drag_sensitivity.is_finite() {
            log::warn!("Config drag_sensitivity is not finite, using {}", defaults.drag_sensitivity);
            self.drag_sensitivity = defaults.drag_sensitivity;
        }
        if !self.key_step.is_finite() {
            log::warn!("Config key_step is not finite, using {}", defaults.key_step);
            self.key_step = defaults.key_step;
        }
        if !(self.fov.is_finite() && self.fov > 0.0 && self.fov < 180.0) {
            log::warn!("Config fov {} out of range, using {}", self.fov, defaults.fov);
            self.fov = defaults.fov;
        }
        if !(self.near.is_finite() && self.far.is_finite() && self.near > 0.0 && self.far > self.near) {
            log::warn!("Config near/far {}/{} invalid, using {}/{}", self.near, self.far, defaults.near, defaults.far);
            self.near = defaults.near;
            self.far = defaults.far;
        }
        self
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json_str(&contents).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn lens(&self) -> Lens {
        Lens {
            fov: self.fov,
            near: self.near,
            far: self.far,
        }
    }

    pub fn hue_cycle(&self) -> HueCycle {
        HueCycle {
            saturation: self.hue_saturation,
            lightness: self.hue_lightness,
        }
    }
}

fn positive_or(value: &mut f64, default: f64, name: &str) {
    if !(value.is_finite() && *value > 0.0) {
        log::warn!("Config {} must be a positive number, got {}; using {}", name, value, default);
        *value = default;
    }
}

/// The composition engine: owns the clock, the parameter store and the
/// modulator line-up, and turns frame callbacks into renderable snapshots.
pub struct ViewerEngine {
    config: ViewerConfig,
    clock: Clock,
    store: ParameterStore,
    composer: Composer,
    fps: FpsCounter,
    frame: FinalFrameState,
    warned_unknown: HashSet<String>,
}

impl ViewerEngine {
    pub fn new(config: ViewerConfig) -> Self {
        let config = config.sanitized();
        let composer = Composer::new(standard_modulators(config.hue_cycle()), config.lens());
        let store = ParameterStore::new();
        let frame = composer.compose(&store, &[]);
        Self {
            fps: FpsCounter::new(config.fps_window_ms),
            config,
            clock: Clock::new(),
            store,
            composer,
            frame,
            warned_unknown: HashSet::new(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// The snapshot produced by the most recent tick.
    pub fn frame(&self) -> &FinalFrameState {
        &self.frame
    }

    /// Advance one frame of `dt_ms` milliseconds and compose it.
    pub fn tick(&mut self, dt_ms: f64) -> &FinalFrameState {
        let dt_s = dt_ms / 1000.0;
        let time = self.clock.advance(dt_s, self.store.rotation_speed as f64);

        let frames = if self.clock.is_paused() || !dt_ms.is_finite() || dt_ms <= 0.0 {
            0.0
        } else {
            dt_ms / self.config.nominal_frame_ms
        };
        let frames = if frames.is_finite() { frames } else { 0.0 };

        let context = FrameContext::new(time, frames);
        self.frame = self.composer.run(&context, &mut self.store);
        self.fps.record(dt_ms);
        &self.frame
    }

    /// Tick, then push the display readouts and hand the frame to the renderer.
    pub fn step(&mut self, dt_ms: f64, broadcaster: &mut dyn SyncBroadcaster, renderer: &mut dyn Renderer) {
        self.tick(dt_ms);
        broadcaster.publish(&self.display());
        renderer.draw(&self.frame);
    }

    /// Compose the current state at the current time without advancing
    /// anything or touching sticky state.
    pub fn compose_now(&self) -> FinalFrameState {
        let context = FrameContext::new(self.clock.time(), 0.0);
        let outputs = self.composer.evaluate(&context, &self.store, Persistence::Transient);
        self.composer.compose(&self.store, &outputs)
    }

    pub fn display(&self) -> DisplayState {
        DisplayState::derive(
            &self.store,
            self.composer.active_kinds(&self.store),
            self.fps.fps(),
            self.clock.is_paused(),
        )
    }

    // ========================================================================
    // Manual input
    // ========================================================================

    pub fn on_manual_edit(&mut self, field: Field, value: EditValue) -> bool {
        apply_edit(&mut self.store, field, &value)
    }

    /// Edit by control name with an already typed value.
    pub fn on_named_edit(&mut self, name: &str, value: EditValue) -> bool {
        match Field::from_name(name) {
            Some(field) => self.on_manual_edit(field, value),
            None => {
                self.warn_unknown("field", name);
                false
            }
        }
    }

    /// Edit by control name with a raw string value, as delivered by a form.
    pub fn on_raw_edit(&mut self, name: &str, raw: &str) -> bool {
        let Some(field) = Field::from_name(name) else {
            self.warn_unknown("field", name);
            return false;
        };
        match EditValue::parse_for(field, raw) {
            Ok(value) => self.on_manual_edit(field, value),
            Err(e) => {
                log::warn!("Rejected edit of {}: {:#}", name, e);
                false
            }
        }
    }

    pub fn apply_preset(&mut self, name: &str) -> bool {
        let Some(preset) = Preset::from_name(name) else {
            self.warn_unknown("preset", name);
            return false;
        };
        if preset.resets() {
            self.reset_all();
        } else {
            preset.apply(&mut self.store);
            log::info!("Applied preset {}", preset.name());
        }
        true
    }

    /// Restore every parameter to its default and resume the clock.
    pub fn reset_all(&mut self) {
        self.store.reset_all();
        self.clock.resume();
        log::info!("Reset all parameters");
    }

    pub fn pause(&mut self) {
        self.clock.pause();
        log::info!("Paused");
    }

    pub fn resume(&mut self) {
        self.clock.resume();
        log::info!("Resumed");
    }

    /// Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.clock.toggle_pause();
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
        paused
    }

    pub fn drag(&mut self, dx: f32, dy: f32) {
        apply_drag(&mut self.store, dx, dy, self.config.drag_sensitivity);
    }

    pub fn key(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::TogglePause => {
                self.toggle_pause();
            }
            KeyCommand::Reset => self.reset_all(),
            arrow => {
                if let Some((axis, delta)) = arrow.rotation_step(self.config.key_step) {
                    self.store.pose.rotate_by(axis, delta);
                }
            }
        }
    }

    /// Handle a DOM-style key name. Returns false for unmapped keys.
    pub fn key_named(&mut self, key: &str) -> bool {
        match KeyCommand::from_key(key) {
            Some(command) => {
                self.key(command);
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Object lifecycle
    // ========================================================================

    /// Swap the displayed geometry. Pose and material are kept.
    pub fn set_shape(&mut self, shape: Shape) {
        self.store.scene.object = Some(shape);
        log::info!("Shape set to {}", shape.name());
    }

    /// Drop the displayed object, as between teardown and rebuild of a shape.
    pub fn clear_object(&mut self) {
        self.store.scene.object = None;
    }

    /// Random shape, rotations and light colour, and a coin flip per
    /// auto-rotate axis.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        let shape = Shape::ALL[rng.random_range(0..Shape::ALL.len())];
        self.set_shape(shape);
        for axis in Axis::ALL {
            self.store.pose.set_angle(axis, rng.random_range(0.0..360.0));
        }
        self.store.light.color = Color::new(rng.random(), rng.random(), rng.random());
        for axis in Axis::ALL {
            let on = rng.random_bool(0.5);
            self.store.modulators.set_enabled(ModulatorKind::auto_rotate(axis), on);
        }
    }

    fn warn_unknown(&mut self, what: &str, name: &str) {
        if self.warned_unknown.insert(format!("{}:{}", what, name)) {
            log::warn!("Unknown {} '{}'", what, name);
        }
    }
}

impl Default for ViewerEngine {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}
