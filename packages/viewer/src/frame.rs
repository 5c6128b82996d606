//! The fully resolved per-frame snapshot handed to the renderer.
//!
//! A [`FinalFrameState`] is a derived, transient copy of the parameters with
//! every active modulator applied. The renderer consumes it once per tick and
//! owns no animation logic of its own.

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Vec3};
use serde::Serialize;

use crate::camera::{CameraFrame, CameraUniforms};
use crate::color::Color;
use crate::lighting::{LightFrame, LightUniforms};
use crate::material::RenderMaterial;
use crate::scene::Shape;

/// Fog distances used whenever fog is on.
pub const FOG_NEAR: f32 = 5.0;
pub const FOG_FAR: f32 = 20.0;

/// Everything the renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FinalFrameState {
    /// `None` while no object is loaded (e.g. mid shape swap).
    pub object: Option<ObjectFrame>,
    pub light: LightFrame,
    pub camera: CameraFrame,
    pub scene: SceneFrame,
}

/// The displayed object with modulators applied.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ObjectFrame {
    pub shape: Shape,
    /// Euler angles in degrees (XYZ order), each in `[0, 360)`.
    pub rotation: [f32; 3],
    /// Uniform scale after the pulse multiplier.
    pub scale: f32,
    /// World position after the float offset.
    pub position: [f32; 3],
    pub material: RenderMaterial,
}

impl ObjectFrame {
    /// Model matrix: translation * rotation(XYZ) * scale.
    pub fn model_matrix(&self) -> Mat4 {
        let [rx, ry, rz] = self.rotation.map(f32::to_radians);
        Mat4::from_translation(Vec3::from_array(self.position))
            * Mat4::from_euler(EulerRot::XYZ, rx, ry, rz)
            * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

/// Environment settings for the frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneFrame {
    pub background: Color,
    pub fog: Option<FogFrame>,
    pub show_axes: bool,
    pub show_grid: bool,
    pub particles: Option<ParticleFrame>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FogFrame {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParticleFrame {
    pub count: u32,
    pub color: Color,
    pub size: f32,
    pub opacity: f32,
    pub rotation_y: f32,
}

impl FinalFrameState {
    /// Pack the frame into GPU uniforms for the given viewport aspect ratio.
    pub fn to_uniforms(&self, aspect: f32) -> FrameUniforms {
        let (model, color, material) = match &self.object {
            Some(object) => (
                object.model_matrix().to_cols_array_2d(),
                object.material.color.to_rgba(object.material.opacity),
                [
                    object.material.metalness,
                    object.material.roughness,
                    object.material.env_map_intensity,
                    if object.material.wireframe { 1.0 } else { 0.0 },
                ],
            ),
            None => ([[0.0; 4]; 4], [0.0; 4], [0.0; 4]),
        };

        FrameUniforms {
            camera: self.camera.to_uniforms(aspect),
            light: self.light.to_uniforms(),
            model,
            color,
            material,
            background: self.scene.background.to_rgba(1.0),
        }
    }
}

/// GPU-ready per-frame uniforms.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct FrameUniforms {
    pub camera: CameraUniforms,
    pub light: LightUniforms,
    pub model: [[f32; 4]; 4],
    /// Object colour (rgb) and opacity (a).
    pub color: [f32; 4],
    /// metalness, roughness, env map intensity, wireframe flag.
    pub material: [f32; 4],
    pub background: [f32; 4],
}

/// Consumer of composed frames (GPU backend, recorder, test double).
pub trait Renderer {
    fn draw(&mut self, frame: &FinalFrameState);
}

/// Renderer that discards frames; useful for headless runs.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _frame: &FinalFrameState) {}
}

/// Renderer that keeps every frame it is given.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<FinalFrameState>,
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, frame: &FinalFrameState) {
        self.frames.push(frame.clone());
    }
}
