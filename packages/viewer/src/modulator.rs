//! Animated modulators.
//!
//! A modulator is a pure function of the frame time, its own configuration
//! and the baseline parameters. It proposes a [`PartialOverride`] for one
//! sub-state; the [`Composer`](crate::composer::Composer) decides what to do
//! with it.
//!
//! | Modulator        | Persistence | Target                  |
//! |------------------|-------------|-------------------------|
//! | `AxisAutoRotate` | sticky      | one pose angle          |
//! | `ParticleSpin`   | sticky      | particle field rotation |
//! | `Float`          | transient   | vertical offset         |
//! | `Pulse`          | transient   | scale multiplier        |
//! | `LightOrbit`     | transient   | light x/z               |
//! | `CameraOrbit`    | transient   | camera x/z              |
//! | `HueCycle`       | transient   | object colour           |

use std::f64::consts::TAU;

use serde::Serialize;

use crate::clock::reduce_phase;
use crate::color::Color;
use crate::params::{Axis, ModulatorConfig, ModulatorKind, ParameterStore};

/// Per-tick inputs shared by every modulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Logical clock time.
    pub time: f64,
    /// Nominal frames elapsed this tick (`dt / nominal_dt`); zero while paused.
    pub frames: f64,
}

impl FrameContext {
    pub fn new(time: f64, frames: f64) -> Self {
        Self { time, frames }
    }

    /// `(time * rate) mod 2π`.
    fn angle(&self, rate: f64) -> f32 {
        reduce_phase(self.time, rate, TAU)
    }
}

/// Whether an override is written back into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Accumulates into the canonical manual state and survives disabling.
    Sticky,
    /// Affects only the rendered frame.
    Transient,
}

/// The sub-state an override applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Rotation(Axis),
    ParticleRotation,
    ObjectOffset,
    ObjectScale,
    LightPosition,
    CameraPosition,
    ObjectColor,
}

/// A proposed change to one sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PartialOverride {
    /// Add degrees to a pose angle.
    RotateBy { axis: Axis, degrees: f32 },
    /// Add radians to the particle field's spin.
    SpinParticles { radians: f32 },
    /// Vertical offset added to the resting position.
    VerticalOffset { offset: f32 },
    /// Multiplier applied to the manual scale.
    ScaleFactor { factor: f32 },
    /// Replacement light x/z.
    LightXz { x: f32, z: f32 },
    /// Replacement camera x/z.
    CameraXz { x: f32, z: f32 },
    /// Replacement object colour.
    Color { color: Color },
}

impl PartialOverride {
    pub fn target(&self) -> Target {
        match self {
            PartialOverride::RotateBy { axis, .. } => Target::Rotation(*axis),
            PartialOverride::SpinParticles { .. } => Target::ParticleRotation,
            PartialOverride::VerticalOffset { .. } => Target::ObjectOffset,
            PartialOverride::ScaleFactor { .. } => Target::ObjectScale,
            PartialOverride::LightXz { .. } => Target::LightPosition,
            PartialOverride::CameraXz { .. } => Target::CameraPosition,
            PartialOverride::Color { .. } => Target::ObjectColor,
        }
    }
}

/// Common contract of every animated behaviour.
pub trait Modulator {
    fn kind(&self) -> ModulatorKind;

    fn persistence(&self) -> Persistence;

    /// Whether the modulator runs this tick. Defaults to its enable flag.
    fn is_active(&self, baseline: &ParameterStore) -> bool {
        baseline.modulators.is_enabled(self.kind())
    }

    /// Propose an override, or `None` when there is nothing to change
    /// (e.g. no object is loaded or the clock did not move).
    fn compute(
        &self,
        frame: &FrameContext,
        config: &ModulatorConfig,
        baseline: &ParameterStore,
    ) -> Option<PartialOverride>;
}

// ============================================================================
// Sticky Modulators
// ============================================================================

/// Adds `rotation_speed * magnitude` degrees per nominal frame to one axis.
#[derive(Debug, Clone, Copy)]
pub struct AxisAutoRotate {
    pub axis: Axis,
}

impl Modulator for AxisAutoRotate {
    fn kind(&self) -> ModulatorKind {
        ModulatorKind::auto_rotate(self.axis)
    }

    fn persistence(&self) -> Persistence {
        Persistence::Sticky
    }

    fn compute(
        &self,
        frame: &FrameContext,
        config: &ModulatorConfig,
        baseline: &ParameterStore,
    ) -> Option<PartialOverride> {
        let degrees = sticky_step(frame, baseline.rotation_speed * config.magnitude, 360.0)?;
        Some(PartialOverride::RotateBy {
            axis: self.axis,
            degrees,
        })
    }
}

/// `rate * frames` reduced modulo `period` in f64. `None` when no frames elapsed.
fn sticky_step(frame: &FrameContext, rate: f32, period: f64) -> Option<f32> {
    if !(frame.frames.is_finite() && frame.frames > 0.0) {
        return None;
    }
    Some((rate as f64 * frame.frames).rem_euclid(period) as f32)
}

/// Slowly spins the particle field while it is shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParticleSpin;

impl Modulator for ParticleSpin {
    fn kind(&self) -> ModulatorKind {
        ModulatorKind::ParticleSpin
    }

    fn persistence(&self) -> Persistence {
        Persistence::Sticky
    }

    fn is_active(&self, baseline: &ParameterStore) -> bool {
        baseline.scene.particles.enabled
    }

    fn compute(
        &self,
        frame: &FrameContext,
        config: &ModulatorConfig,
        baseline: &ParameterStore,
    ) -> Option<PartialOverride> {
        let radians = sticky_step(frame, config.magnitude * baseline.rotation_speed, TAU)?;
        Some(PartialOverride::SpinParticles { radians })
    }
}

// ============================================================================
// Transient Modulators
// ============================================================================

/// Bobs the object up and down: `sin(t) * amplitude`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Float;

impl Modulator for Float {
    fn kind(&self) -> ModulatorKind {
        ModulatorKind::Float
    }

    fn persistence(&self) -> Persistence {
        Persistence::Transient
    }

    fn compute(
        &self,
        frame: &FrameContext,
        config: &ModulatorConfig,
        baseline: &ParameterStore,
    ) -> Option<PartialOverride> {
        baseline.scene.object?;
        Some(PartialOverride::VerticalOffset {
            offset: frame.angle(1.0).sin() * config.magnitude,
        })
    }
}

/// Breathes the object's size: `1 + sin(2t) * amplitude`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pulse;

impl Modulator for Pulse {
    fn kind(&self) -> ModulatorKind {
        ModulatorKind::Pulse
    }

    fn persistence(&self) -> Persistence {
        Persistence::Transient
    }

    fn compute(
        &self,
        frame: &FrameContext,
        config: &ModulatorConfig,
        baseline: &ParameterStore,
    ) -> Option<PartialOverride> {
        baseline.scene.object?;
        Some(PartialOverride::ScaleFactor {
            factor: 1.0 + frame.angle(2.0).sin() * config.magnitude,
        })
    }
}

/// Circles the light around the Y axis at a fixed radius; height is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightOrbit;

impl Modulator for LightOrbit {
    fn kind(&self) -> ModulatorKind {
        ModulatorKind::LightOrbit
    }

    fn persistence(&self) -> Persistence {
        Persistence::Transient
    }

    fn compute(
        &self,
        frame: &FrameContext,
        config: &ModulatorConfig,
        _baseline: &ParameterStore,
    ) -> Option<PartialOverride> {
        let (sin, cos) = frame.angle(1.0).sin_cos();
        let radius = config.magnitude;
        Some(PartialOverride::LightXz {
            x: cos * radius,
            z: sin * radius,
        })
    }
}

/// Circles the camera around the origin.
///
/// The radius is re-derived every tick from the manual camera position, so
/// it stays constant while orbiting and follows zoom edits immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraOrbit;

impl Modulator for CameraOrbit {
    fn kind(&self) -> ModulatorKind {
        ModulatorKind::CameraOrbit
    }

    fn persistence(&self) -> Persistence {
        Persistence::Transient
    }

    fn compute(
        &self,
        frame: &FrameContext,
        config: &ModulatorConfig,
        baseline: &ParameterStore,
    ) -> Option<PartialOverride> {
        let (sin, cos) = frame.angle(config.magnitude as f64).sin_cos();
        let radius = baseline.camera.orbit_radius();
        Some(PartialOverride::CameraXz {
            x: cos * radius,
            z: sin * radius,
        })
    }
}

/// Cycles the object colour through the hue wheel.
#[derive(Debug, Clone, Copy)]
pub struct HueCycle {
    pub saturation: f32,
    pub lightness: f32,
}

impl Default for HueCycle {
    fn default() -> Self {
        Self {
            saturation: 1.0,
            lightness: 0.5,
        }
    }
}

impl HueCycle {
    /// Hue in degrees `[0, 360)` at the given frame.
    pub fn hue(frame: &FrameContext, rate: f32) -> f32 {
        reduce_phase(frame.time, rate as f64, 360.0)
    }
}

impl Modulator for HueCycle {
    fn kind(&self) -> ModulatorKind {
        ModulatorKind::HueCycle
    }

    fn persistence(&self) -> Persistence {
        Persistence::Transient
    }

    fn compute(
        &self,
        frame: &FrameContext,
        config: &ModulatorConfig,
        baseline: &ParameterStore,
    ) -> Option<PartialOverride> {
        baseline.scene.object?;
        let hue = Self::hue(frame, config.magnitude);
        Some(PartialOverride::Color {
            color: Color::from_hsl(hue / 360.0, self.saturation, self.lightness),
        })
    }
}

/// The full modulator line-up, sticky ones first.
pub fn standard_modulators(hue: HueCycle) -> Vec<Box<dyn Modulator>> {
    vec![
        Box::new(AxisAutoRotate { axis: Axis::X }),
        Box::new(AxisAutoRotate { axis: Axis::Y }),
        Box::new(AxisAutoRotate { axis: Axis::Z }),
        Box::new(ParticleSpin),
        Box::new(Float),
        Box::new(Pulse),
        Box::new(LightOrbit),
        Box::new(CameraOrbit),
        Box::new(hue),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(kind: ModulatorKind) -> ModulatorConfig {
        ModulatorConfig {
            enabled: true,
            magnitude: kind.default_magnitude(),
            enabled_at: 1,
        }
    }

    #[test]
    fn test_auto_rotate_step() {
        let store = ParameterStore::default();
        let modulator = AxisAutoRotate { axis: Axis::Y };
        let frame = FrameContext::new(0.0, 1.0);
        let out = modulator.compute(&frame, &config_for(modulator.kind()), &store);
        assert_eq!(
            out,
            Some(PartialOverride::RotateBy {
                axis: Axis::Y,
                degrees: 1.0
            })
        );
    }

    #[test]
    fn test_standard_targets_are_disjoint() {
        let mut store = ParameterStore::default();
        store.scene.particles.enabled = true;
        let frame = FrameContext::new(1.0, 1.0);
        let targets: Vec<Target> = standard_modulators(HueCycle::default())
            .iter()
            .filter_map(|m| m.compute(&frame, &config_for(m.kind()), &store))
            .map(|out| out.target())
            .collect();
        let unique: std::collections::HashSet<Target> = targets.iter().copied().collect();
        assert_eq!(targets.len(), ModulatorKind::COUNT);
        assert_eq!(unique.len(), targets.len());
    }

    #[test]
    fn test_auto_rotate_large_gap_keeps_exact_angle() {
        let store = ParameterStore::default();
        let modulator = AxisAutoRotate { axis: Axis::Y };
        // 1e11 ms at 16 ms per frame; 6.25e9 mod 360 = 40
        let frame = FrameContext::new(0.0, 6.25e9);
        match modulator.compute(&frame, &config_for(modulator.kind()), &store) {
            Some(PartialOverride::RotateBy { degrees, .. }) => assert!((degrees - 40.0).abs() < 1e-3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sticky_steps_skip_non_finite_frames() {
        let mut store = ParameterStore::default();
        store.scene.particles.enabled = true;
        let frame = FrameContext::new(0.0, f64::INFINITY);
        let rotate = AxisAutoRotate { axis: Axis::Z };
        assert_eq!(rotate.compute(&frame, &config_for(rotate.kind()), &store), None);
        assert_eq!(ParticleSpin.compute(&frame, &config_for(ModulatorKind::ParticleSpin), &store), None);
    }

    #[test]
    fn test_auto_rotate_idle_when_paused() {
        let store = ParameterStore::default();
        let modulator = AxisAutoRotate { axis: Axis::X };
        let frame = FrameContext::new(3.0, 0.0);
        assert_eq!(modulator.compute(&frame, &config_for(modulator.kind()), &store), None);
    }

    #[test]
    fn test_float_and_pulse_formulas() {
        let store = ParameterStore::default();
        let t = 0.7;
        let frame = FrameContext::new(t, 1.0);

        match Float.compute(&frame, &config_for(ModulatorKind::Float), &store) {
            Some(PartialOverride::VerticalOffset { offset }) => {
                assert!((offset - (t as f32).sin() * 0.5).abs() < 1e-5);
            }
            other => panic!("unexpected {:?}", other),
        }

        match Pulse.compute(&frame, &config_for(ModulatorKind::Pulse), &store) {
            Some(PartialOverride::ScaleFactor { factor }) => {
                assert!((factor - (1.0 + (2.0 * t as f32).sin() * 0.1)).abs() < 1e-5);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_light_orbit_radius() {
        let store = ParameterStore::default();
        let frame = FrameContext::new(1.3, 1.0);
        match LightOrbit.compute(&frame, &config_for(ModulatorKind::LightOrbit), &store) {
            Some(PartialOverride::LightXz { x, z }) => {
                assert!(((x * x + z * z).sqrt() - 7.0).abs() < 1e-4);
                assert!((x - 1.3f32.cos() * 7.0).abs() < 1e-4);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_camera_orbit_follows_manual_distance() {
        let mut store = ParameterStore::default();
        let frame = FrameContext::new(2.0, 1.0);
        let config = config_for(ModulatorKind::CameraOrbit);

        let radius_of = |store: &ParameterStore| match CameraOrbit.compute(&frame, &config, store) {
            Some(PartialOverride::CameraXz { x, z }) => (x * x + z * z).sqrt(),
            other => panic!("unexpected {:?}", other),
        };

        assert!((radius_of(&store) - 5.0).abs() < 1e-4);
        store.camera.set_distance(12.0);
        assert!((radius_of(&store) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_hue_cycle_at_half_turn_is_cyan() {
        let store = ParameterStore::default();
        // 6.0 * 30 = 180 degrees
        let frame = FrameContext::new(6.0, 1.0);
        match HueCycle::default().compute(&frame, &config_for(ModulatorKind::HueCycle), &store) {
            Some(PartialOverride::Color { color }) => {
                assert!(color.approx_eq(&Color::new(0.0, 1.0, 1.0), 1e-4));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_object_modulators_skip_missing_object() {
        let mut store = ParameterStore::default();
        store.scene.object = None;
        let frame = FrameContext::new(1.0, 1.0);
        assert!(Float.compute(&frame, &config_for(ModulatorKind::Float), &store).is_none());
        assert!(Pulse.compute(&frame, &config_for(ModulatorKind::Pulse), &store).is_none());
        assert!(HueCycle::default()
            .compute(&frame, &config_for(ModulatorKind::HueCycle), &store)
            .is_none());
        // Light and camera do not depend on the object
        assert!(LightOrbit
            .compute(&frame, &config_for(ModulatorKind::LightOrbit), &store)
            .is_some());
    }

    #[test]
    fn test_particle_spin_active_with_particles() {
        let mut store = ParameterStore::default();
        assert!(!ParticleSpin.is_active(&store));
        store.scene.particles.enabled = true;
        assert!(ParticleSpin.is_active(&store));
    }

    #[test]
    fn test_outputs_are_finite_after_long_sessions() {
        let store = ParameterStore::default();
        let frame = FrameContext::new(1.0e11, 1.0);
        for modulator in standard_modulators(HueCycle::default()) {
            let config = config_for(modulator.kind());
            if let Some(out) = modulator.compute(&frame, &config, &store) {
                let finite = match out {
                    PartialOverride::RotateBy { degrees, .. } => degrees.is_finite(),
                    PartialOverride::SpinParticles { radians } => radians.is_finite(),
                    PartialOverride::VerticalOffset { offset } => offset.is_finite(),
                    PartialOverride::ScaleFactor { factor } => factor.is_finite(),
                    PartialOverride::LightXz { x, z } | PartialOverride::CameraXz { x, z } => {
                        x.is_finite() && z.is_finite()
                    }
                    PartialOverride::Color { color } => {
                        color.r.is_finite() && color.g.is_finite() && color.b.is_finite()
                    }
                };
                assert!(finite, "{:?} produced {:?}", modulator.kind(), out);
            }
        }
    }
}
