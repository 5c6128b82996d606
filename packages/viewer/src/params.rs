//! The canonical mutable state of the viewer.
//!
//! [`ParameterStore`] holds exactly one authoritative value for every
//! manually-editable parameter plus the enable flag and magnitude of every
//! modulator. UI edits, preset application, reset and the sticky write-back
//! of auto-rotation are the only writers.

use serde::Serialize;

use crate::camera::CameraState;
use crate::lighting::LightState;
use crate::material::MaterialState;
use crate::scene::SceneState;

/// Documented slider bounds. Values outside are clamped, never rejected.
pub mod ranges {
    pub const SCALE: (f32, f32) = (0.1, 3.0);
    pub const ROTATION_SPEED: (f32, f32) = (0.1, 5.0);
    pub const LIGHT_INTENSITY: (f32, f32) = (0.0, 3.0);
    pub const LIGHT_POSITION: (f32, f32) = (-10.0, 10.0);
    pub const METALNESS: (f32, f32) = (0.0, 1.0);
    pub const ROUGHNESS: (f32, f32) = (0.0, 1.0);
    /// Opacity as edited in percent.
    pub const OPACITY_PERCENT: (f32, f32) = (0.0, 100.0);
    pub const ZOOM: (f32, f32) = (2.0, 20.0);
    pub const PARTICLE_SIZE: (f32, f32) = (0.01, 0.5);
    pub const FLOAT_AMPLITUDE: (f32, f32) = (0.0, 2.0);
    pub const PULSE_AMPLITUDE: (f32, f32) = (0.0, 0.5);

    /// Clamp `value` into `range`.
    pub fn clamp(value: f32, range: (f32, f32)) -> f32 {
        value.clamp(range.0, range.1)
    }
}

/// Wrap an angle in degrees into `[0, 360)`. Non-finite input maps to 0.
pub fn normalize_degrees(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

// ============================================================================
// Pose
// ============================================================================

/// Rotation axis of the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Object orientation and size.
///
/// The angles are shared between manual dragging and auto-rotation: both
/// write the same fields, so switching auto-rotation off leaves the object
/// wherever it stopped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pose {
    /// Euler angles in degrees, each in `[0, 360)`.
    rotation: [f32; 3],
    pub scale: f32,
    /// Vertical offset of the resting position.
    pub position_offset: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            rotation: [0.0; 3],
            scale: 1.0,
            position_offset: 0.0,
        }
    }
}

impl Pose {
    pub fn angle(&self, axis: Axis) -> f32 {
        self.rotation[axis.index()]
    }

    /// All three angles in degrees, ordered x, y, z.
    pub fn angles(&self) -> [f32; 3] {
        self.rotation
    }

    pub fn set_angle(&mut self, axis: Axis, degrees: f32) {
        self.rotation[axis.index()] = normalize_degrees(degrees);
    }

    /// Add `delta` degrees to one axis and renormalize.
    pub fn rotate_by(&mut self, axis: Axis, delta: f32) {
        let current = self.angle(axis);
        self.set_angle(axis, current + delta);
    }
}

// ============================================================================
// Modulator Configuration
// ============================================================================

/// Every animated behaviour the composer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ModulatorKind {
    AutoRotateX,
    AutoRotateY,
    AutoRotateZ,
    Float,
    Pulse,
    LightOrbit,
    CameraOrbit,
    HueCycle,
    ParticleSpin,
}

impl ModulatorKind {
    pub const COUNT: usize = 9;

    pub const ALL: [ModulatorKind; Self::COUNT] = [
        ModulatorKind::AutoRotateX,
        ModulatorKind::AutoRotateY,
        ModulatorKind::AutoRotateZ,
        ModulatorKind::Float,
        ModulatorKind::Pulse,
        ModulatorKind::LightOrbit,
        ModulatorKind::CameraOrbit,
        ModulatorKind::HueCycle,
        ModulatorKind::ParticleSpin,
    ];

    fn index(self) -> usize {
        match self {
            ModulatorKind::AutoRotateX => 0,
            ModulatorKind::AutoRotateY => 1,
            ModulatorKind::AutoRotateZ => 2,
            ModulatorKind::Float => 3,
            ModulatorKind::Pulse => 4,
            ModulatorKind::LightOrbit => 5,
            ModulatorKind::CameraOrbit => 6,
            ModulatorKind::HueCycle => 7,
            ModulatorKind::ParticleSpin => 8,
        }
    }

    /// Auto-rotation kind for an axis.
    pub fn auto_rotate(axis: Axis) -> Self {
        match axis {
            Axis::X => ModulatorKind::AutoRotateX,
            Axis::Y => ModulatorKind::AutoRotateY,
            Axis::Z => ModulatorKind::AutoRotateZ,
        }
    }

    /// Default magnitude. Its meaning depends on the kind:
    /// speed multiplier, amplitude, orbit radius, angular rate or hue rate.
    pub fn default_magnitude(self) -> f32 {
        match self {
            ModulatorKind::AutoRotateX
            | ModulatorKind::AutoRotateY
            | ModulatorKind::AutoRotateZ => 1.0,
            ModulatorKind::Float => 0.5,
            ModulatorKind::Pulse => 0.1,
            ModulatorKind::LightOrbit => 7.0,
            ModulatorKind::CameraOrbit => 0.3,
            ModulatorKind::HueCycle => 30.0,
            ModulatorKind::ParticleSpin => 0.0005,
        }
    }
}

/// Enable flag and magnitude of one modulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModulatorConfig {
    pub enabled: bool,
    pub magnitude: f32,
    /// Sequence number of the most recent off→on transition; later wins
    /// when two transient modulators target the same sub-state.
    pub enabled_at: u64,
}

/// Configurations of all modulators, indexed by kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModulatorSet {
    configs: [ModulatorConfig; ModulatorKind::COUNT],
    next_sequence: u64,
}

impl Default for ModulatorSet {
    fn default() -> Self {
        let configs = ModulatorKind::ALL.map(|kind| ModulatorConfig {
            enabled: false,
            magnitude: kind.default_magnitude(),
            enabled_at: 0,
        });
        Self {
            configs,
            next_sequence: 1,
        }
    }
}

impl ModulatorSet {
    pub fn get(&self, kind: ModulatorKind) -> &ModulatorConfig {
        &self.configs[kind.index()]
    }

    pub fn is_enabled(&self, kind: ModulatorKind) -> bool {
        self.get(kind).enabled
    }

    pub fn set_enabled(&mut self, kind: ModulatorKind, enabled: bool) {
        let config = &mut self.configs[kind.index()];
        if enabled && !config.enabled {
            config.enabled_at = self.next_sequence;
            self.next_sequence += 1;
        }
        config.enabled = enabled;
    }

    /// Set the magnitude. Callers clamp to the slider bounds; negative and
    /// non-finite values are ignored.
    pub fn set_magnitude(&mut self, kind: ModulatorKind, magnitude: f32) {
        if magnitude.is_finite() && magnitude >= 0.0 {
            self.configs[kind.index()].magnitude = magnitude;
        } else {
            log::warn!("Ignoring magnitude {} for {:?}", magnitude, kind);
        }
    }

    /// Kinds currently switched on, in declaration order.
    pub fn enabled_kinds(&self) -> Vec<ModulatorKind> {
        ModulatorKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }
}

// ============================================================================
// Parameter Store
// ============================================================================

/// The single owned instance of all manual parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStore {
    pub pose: Pose,
    pub material: MaterialState,
    pub light: LightState,
    pub camera: CameraState,
    pub scene: SceneState,
    /// Global animation speed: scales the clock and the auto-rotation step.
    pub rotation_speed: f32,
    pub modulators: ModulatorSet,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self {
            pose: Pose::default(),
            material: MaterialState::default(),
            light: LightState::default(),
            camera: CameraState::default(),
            scene: SceneState::default(),
            rotation_speed: 1.0,
            modulators: ModulatorSet::default(),
        }
    }
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore every field to its default and switch every modulator off.
    pub fn reset_all(&mut self) {
        *self = Self::default();
    }
}
