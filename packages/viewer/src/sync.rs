//! Push side of the UI contract.
//!
//! Once per tick the engine derives a [`DisplayState`] (readouts, FPS,
//! object count) and hands it to a [`SyncBroadcaster`]. The core does not
//! know what the broadcaster drives: DOM text, a terminal or a log file.

use std::io::Write;

use serde::Serialize;

use crate::params::{Axis, ModulatorKind, ParameterStore};

/// Derived values shown next to the controls.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    pub rotation_x: String,
    pub rotation_y: String,
    pub rotation_z: String,
    pub scale: String,
    pub rotation_speed: String,
    pub light_intensity: String,
    pub metalness: String,
    pub roughness: String,
    pub opacity: String,
    pub zoom_level: String,
    pub fps: u32,
    pub object_count: u32,
    pub paused: bool,
    /// Modulators currently running, by name.
    pub active_modulators: Vec<ModulatorKind>,
}

impl DisplayState {
    pub fn derive(store: &ParameterStore, active_modulators: Vec<ModulatorKind>, fps: u32, paused: bool) -> Self {
        let angle = |axis| format!("{}°", store.pose.angle(axis).round());
        Self {
            rotation_x: angle(Axis::X),
            rotation_y: angle(Axis::Y),
            rotation_z: angle(Axis::Z),
            scale: format!("{:.1}", store.pose.scale),
            rotation_speed: format!("{:.1}x", store.rotation_speed),
            light_intensity: format!("{:.1}", store.light.intensity),
            metalness: format!("{:.1}", store.material.metalness),
            roughness: format!("{:.1}", store.material.roughness),
            opacity: format!("{}%", (store.material.opacity * 100.0).round()),
            zoom_level: format!("{}", store.camera.distance()),
            fps,
            object_count: store.scene.object_count(),
            paused,
            active_modulators,
        }
    }
}

/// Receiver of per-tick display updates.
pub trait SyncBroadcaster {
    fn publish(&mut self, display: &DisplayState);
}

/// Broadcaster that discards updates.
#[derive(Debug, Default)]
pub struct NullBroadcaster;

impl SyncBroadcaster for NullBroadcaster {
    fn publish(&mut self, _display: &DisplayState) {}
}

/// Broadcaster that logs every update at debug level.
#[derive(Debug, Default)]
pub struct LogBroadcaster;

impl SyncBroadcaster for LogBroadcaster {
    fn publish(&mut self, display: &DisplayState) {
        log::debug!(
            "rot=({}, {}, {}) scale={} fps={} objects={}",
            display.rotation_x,
            display.rotation_y,
            display.rotation_z,
            display.scale,
            display.fps,
            display.object_count
        );
    }
}

/// Broadcaster that writes one JSON document per update.
pub struct JsonLinesBroadcaster<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesBroadcaster<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SyncBroadcaster for JsonLinesBroadcaster<W> {
    fn publish(&mut self, display: &DisplayState) {
        let result = serde_json::to_writer(&mut self.writer, display)
            .map_err(std::io::Error::from)
            .and_then(|_| self.writer.write_all(b"\n"));
        if let Err(e) = result {
            log::warn!("Failed to write display update: {}", e);
        }
    }
}

// ============================================================================
// FPS Counter
// ============================================================================

/// Frames-per-second over windows of accumulated frame time.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_ms: f64,
    frames: u32,
    elapsed_ms: f64,
    fps: u32,
}

impl FpsCounter {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms: window_ms.max(1.0),
            frames: 0,
            elapsed_ms: 0.0,
            fps: 0,
        }
    }

    /// Count one frame of `dt_ms`. Returns true when the reading was refreshed.
    pub fn record(&mut self, dt_ms: f64) -> bool {
        self.frames += 1;
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.elapsed_ms += dt_ms;
        }
        if self.elapsed_ms >= self.window_ms {
            self.fps = (self.frames as f64 * 1000.0 / self.elapsed_ms).round() as u32;
            self.frames = 0;
            self.elapsed_ms = 0.0;
            true
        } else {
            false
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1000.0)
    }
}
