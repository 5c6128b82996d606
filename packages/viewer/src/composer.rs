//! Per-frame state composition.
//!
//! Composition order is fixed:
//!
//! 1. Sticky modulators (auto-rotation, particle spin) run first and write
//!    their deltas into the [`ParameterStore`], renormalizing every angle.
//! 2. Transient modulators run against the post-rotation baseline. Their
//!    outputs are layered onto a copy of the baseline for rendering only and
//!    are never written back.
//!
//! When two transient outputs target the same sub-state, the one whose
//! modulator was switched on most recently wins. The standard line-up never
//! produces such a conflict since each modulator owns a disjoint target.

use std::f32::consts::TAU;

use crate::camera::Lens;
use crate::color::Color;
use crate::frame::{FinalFrameState, FogFrame, ObjectFrame, ParticleFrame, SceneFrame, FOG_FAR, FOG_NEAR};
use crate::modulator::{standard_modulators, FrameContext, HueCycle, Modulator, PartialOverride, Persistence};
use crate::params::{ModulatorKind, ParameterStore};

/// One modulator's proposal for the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulatorOutput {
    pub kind: ModulatorKind,
    pub persistence: Persistence,
    /// Enable sequence of the producing modulator.
    pub enabled_at: u64,
    pub value: PartialOverride,
}

/// Merges manual state with modulator outputs.
pub struct Composer {
    modulators: Vec<Box<dyn Modulator>>,
    lens: Lens,
}

impl Composer {
    pub fn new(modulators: Vec<Box<dyn Modulator>>, lens: Lens) -> Self {
        Self { modulators, lens }
    }

    /// Composer with the standard modulator line-up and default lens.
    pub fn standard() -> Self {
        Self::new(standard_modulators(HueCycle::default()), Lens::default())
    }

    pub fn lens(&self) -> Lens {
        self.lens
    }

    /// Kinds whose modulator would run against `store`, in line-up order.
    pub fn active_kinds(&self, store: &ParameterStore) -> Vec<ModulatorKind> {
        self.modulators
            .iter()
            .filter(|m| m.is_active(store))
            .map(|m| m.kind())
            .collect()
    }

    /// Run one full composition pass: sticky write-back, then transient layering.
    pub fn run(&self, frame: &FrameContext, store: &mut ParameterStore) -> FinalFrameState {
        let sticky = self.evaluate(frame, store, Persistence::Sticky);
        Self::apply_sticky(store, &sticky);

        let transient = self.evaluate(frame, store, Persistence::Transient);
        self.compose(store, &transient)
    }

    /// Collect outputs of all active modulators with the given persistence.
    pub fn evaluate(
        &self,
        frame: &FrameContext,
        store: &ParameterStore,
        persistence: Persistence,
    ) -> Vec<ModulatorOutput> {
        self.modulators
            .iter()
            .filter(|m| m.persistence() == persistence && m.is_active(store))
            .filter_map(|m| {
                let config = store.modulators.get(m.kind());
                m.compute(frame, config, store).map(|value| ModulatorOutput {
                    kind: m.kind(),
                    persistence,
                    enabled_at: config.enabled_at,
                    value,
                })
            })
            .collect()
    }

    /// Write sticky outputs back into the store. Transient outputs are ignored.
    pub fn apply_sticky(store: &mut ParameterStore, outputs: &[ModulatorOutput]) {
        for output in outputs.iter().filter(|o| o.persistence == Persistence::Sticky) {
            match output.value {
                PartialOverride::RotateBy { axis, degrees } => {
                    store.pose.rotate_by(axis, degrees);
                }
                PartialOverride::SpinParticles { radians } => {
                    let spun = store.scene.particles.rotation_y + radians;
                    store.scene.particles.rotation_y = normalize_radians(spun);
                }
                other => {
                    log::debug!("Ignoring non-sticky override {:?} from {:?}", other, output.kind);
                }
            }
        }
    }

    /// Layer transient outputs over `baseline` into a renderable snapshot.
    ///
    /// Pure: `baseline` is not modified, and sticky outputs in `outputs`
    /// are ignored.
    pub fn compose(&self, baseline: &ParameterStore, outputs: &[ModulatorOutput]) -> FinalFrameState {
        let mut ordered: Vec<&ModulatorOutput> = outputs
            .iter()
            .filter(|o| o.persistence == Persistence::Transient)
            .collect();
        // Stable sort: later-enabled modulators overwrite earlier ones
        ordered.sort_by_key(|o| o.enabled_at);

        let mut layers = TransientLayers::default();
        for output in ordered {
            layers.push(output.value);
        }

        let object = baseline.scene.object.map(|shape| {
            let pose = &baseline.pose;
            ObjectFrame {
                shape,
                rotation: pose.angles(),
                scale: pose.scale * layers.scale_factor.unwrap_or(1.0),
                position: [0.0, pose.position_offset + layers.vertical_offset.unwrap_or(0.0), 0.0],
                material: baseline.material.render(layers.color),
            }
        });

        let scene = &baseline.scene;
        let particles = &scene.particles;
        FinalFrameState {
            object,
            light: baseline.light.render(layers.light_xz),
            camera: baseline.camera.render(self.lens, layers.camera_xz),
            scene: SceneFrame {
                background: scene.background,
                fog: scene.fog.then(|| FogFrame {
                    color: scene.background,
                    near: FOG_NEAR,
                    far: FOG_FAR,
                }),
                show_axes: scene.show_axes,
                show_grid: scene.show_grid,
                particles: particles.enabled.then(|| ParticleFrame {
                    count: particles.count,
                    color: particles.color,
                    size: particles.size,
                    opacity: particles.opacity,
                    rotation_y: particles.rotation_y,
                }),
            },
        }
    }
}

/// Resolved transient overrides, one slot per sub-state.
#[derive(Debug, Default)]
struct TransientLayers {
    vertical_offset: Option<f32>,
    scale_factor: Option<f32>,
    light_xz: Option<[f32; 2]>,
    camera_xz: Option<[f32; 2]>,
    color: Option<Color>,
}

impl TransientLayers {
    fn push(&mut self, value: PartialOverride) {
        match value {
            PartialOverride::VerticalOffset { offset } => self.vertical_offset = Some(offset),
            PartialOverride::ScaleFactor { factor } => self.scale_factor = Some(factor),
            PartialOverride::LightXz { x, z } => self.light_xz = Some([x, z]),
            PartialOverride::CameraXz { x, z } => self.camera_xz = Some([x, z]),
            PartialOverride::Color { color } => self.color = Some(color),
            PartialOverride::RotateBy { .. } | PartialOverride::SpinParticles { .. } => {}
        }
    }
}

fn normalize_radians(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Axis;

    fn transient(kind: ModulatorKind, enabled_at: u64, value: PartialOverride) -> ModulatorOutput {
        ModulatorOutput {
            kind,
            persistence: Persistence::Transient,
            enabled_at,
            value,
        }
    }

    #[test]
    fn test_compose_defaults() {
        let frame = Composer::standard().compose(&ParameterStore::default(), &[]);
        let object = frame.object.expect("cube is loaded by default");
        assert_eq!(object.rotation, [0.0, 0.0, 0.0]);
        assert_eq!(object.scale, 1.0);
        assert_eq!(object.position, [0.0, 0.0, 0.0]);
        assert_eq!(object.material.color.to_hex_u32(), 0x6366f1);
        assert_eq!(frame.light.position, [5.0, 5.0, 5.0]);
        assert_eq!(frame.camera.position, [0.0, 0.0, 5.0]);
        assert!(frame.scene.fog.is_none());
        assert!(frame.scene.particles.is_none());
    }

    #[test]
    fn test_sticky_rotation_writes_back() {
        let composer = Composer::standard();
        let mut store = ParameterStore::default();
        store.modulators.set_enabled(ModulatorKind::AutoRotateY, true);
        let frame = composer.run(&FrameContext::new(0.0, 1.0), &mut store);
        assert_eq!(store.pose.angle(Axis::Y), 1.0);
        assert_eq!(frame.object.unwrap().rotation[1], 1.0);
    }

    #[test]
    fn test_transient_does_not_write_back() {
        let composer = Composer::standard();
        let mut store = ParameterStore::default();
        store.modulators.set_enabled(ModulatorKind::Pulse, true);
        store.modulators.set_enabled(ModulatorKind::Float, true);
        store.modulators.set_enabled(ModulatorKind::LightOrbit, true);
        let before = store.clone();
        let frame = composer.run(&FrameContext::new(0.9, 1.0), &mut store);
        assert_eq!(store, before);
        let object = frame.object.unwrap();
        assert!(object.scale != 1.0);
        assert!(object.position[1] != 0.0);
    }

    #[test]
    fn test_pulse_scales_manual_scale() {
        let mut store = ParameterStore::default();
        store.pose.scale = 2.0;
        let outputs = [transient(
            ModulatorKind::Pulse,
            1,
            PartialOverride::ScaleFactor { factor: 1.1 },
        )];
        let frame = Composer::standard().compose(&store, &outputs);
        assert!((frame.object.unwrap().scale - 2.2).abs() < 1e-6);
        assert_eq!(store.pose.scale, 2.0);
    }

    #[test]
    fn test_last_enabled_wins_on_conflict() {
        let red = Color::new(1.0, 0.0, 0.0);
        let blue = Color::new(0.0, 0.0, 1.0);
        let outputs = [
            transient(ModulatorKind::HueCycle, 7, PartialOverride::Color { color: red }),
            transient(ModulatorKind::HueCycle, 3, PartialOverride::Color { color: blue }),
        ];
        let frame = Composer::standard().compose(&ParameterStore::default(), &outputs);
        assert_eq!(frame.object.unwrap().material.color, red);
    }

    #[test]
    fn test_compose_ignores_sticky_outputs() {
        let outputs = [ModulatorOutput {
            kind: ModulatorKind::AutoRotateX,
            persistence: Persistence::Sticky,
            enabled_at: 1,
            value: PartialOverride::RotateBy {
                axis: Axis::X,
                degrees: 45.0,
            },
        }];
        let frame = Composer::standard().compose(&ParameterStore::default(), &outputs);
        assert_eq!(frame.object.unwrap().rotation, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_active_kinds_follow_is_active() {
        let composer = Composer::standard();
        let mut store = ParameterStore::default();
        assert!(composer.active_kinds(&store).is_empty());

        store.scene.particles.enabled = true;
        store.modulators.set_enabled(ModulatorKind::Float, true);
        assert_eq!(
            composer.active_kinds(&store),
            vec![ModulatorKind::ParticleSpin, ModulatorKind::Float]
        );
    }

    #[test]
    fn test_particle_spin_wraps() {
        let mut store = ParameterStore::default();
        store.scene.particles.enabled = true;
        store.scene.particles.rotation_y = TAU - 0.0001;
        let outputs = [ModulatorOutput {
            kind: ModulatorKind::ParticleSpin,
            persistence: Persistence::Sticky,
            enabled_at: 0,
            value: PartialOverride::SpinParticles { radians: 0.001 },
        }];
        Composer::apply_sticky(&mut store, &outputs);
        let spin = store.scene.particles.rotation_y;
        assert!((0.0..TAU).contains(&spin));
        assert!(spin < 0.01);
    }

    #[test]
    fn test_missing_object_composes_gracefully() {
        let composer = Composer::standard();
        let mut store = ParameterStore::default();
        store.scene.object = None;
        for kind in ModulatorKind::ALL {
            store.modulators.set_enabled(kind, true);
        }
        let frame = composer.run(&FrameContext::new(2.0, 1.0), &mut store);
        assert!(frame.object.is_none());
        // Sticky rotation still accumulates into the pose
        assert_eq!(store.pose.angle(Axis::Z), 1.0);
    }
}
