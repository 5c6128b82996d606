//! Point light and ambient term.
//!
//! The manual light position is the baseline; the light-orbit modulator only
//! replaces x/z in the [`LightFrame`] and never promotes its position back
//! into [`LightState`].

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::Serialize;

use crate::color::Color;

// ============================================================================
// Manual Light State
// ============================================================================

/// Manually-set light parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct LightState {
    pub color: Color,
    pub intensity: f32,
    /// Point light position in world space.
    pub position: Vec3,
    /// Whether the ambient fill light is shown.
    pub ambient: bool,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            position: Vec3::new(5.0, 5.0, 5.0),
            ambient: true,
        }
    }
}

impl LightState {
    /// Resolve the light for rendering, optionally replacing x/z.
    pub fn render(&self, orbit_xz: Option<[f32; 2]>) -> LightFrame {
        let mut position = self.position;
        if let Some([x, z]) = orbit_xz {
            position.x = x;
            position.z = z;
        }
        LightFrame {
            color: self.color,
            intensity: self.intensity,
            position: position.to_array(),
            ambient_visible: self.ambient,
        }
    }
}

/// Light as handed to the renderer for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LightFrame {
    pub color: Color,
    pub intensity: f32,
    pub position: [f32; 3],
    pub ambient_visible: bool,
}

impl LightFrame {
    /// Evaluate into GPU-ready uniforms.
    pub fn to_uniforms(&self) -> LightUniforms {
        LightUniforms {
            position: [self.position[0], self.position[1], self.position[2], 1.0],
            color: self.color.to_rgba(1.0),
            intensity: self.intensity,
            ambient: if self.ambient_visible { AMBIENT_INTENSITY } else { 0.0 },
            _padding: [0.0; 2],
        }
    }
}

/// Strength of the ambient fill light when it is shown.
pub const AMBIENT_INTENSITY: f32 = 0.5;

// ============================================================================
// GPU Uniforms
// ============================================================================

/// GPU-ready light uniforms.
///
/// Total size: 48 bytes (16-byte aligned).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct LightUniforms {
    /// Light position (xyz), w = 1.
    pub position: [f32; 4],
    /// Light colour (rgb), a = 1.
    pub color: [f32; 4],
    pub intensity: f32,
    pub ambient: f32,
    pub _padding: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_replaces_only_xz() {
        let light = LightState::default();
        let frame = light.render(Some([7.0, 0.0]));
        assert_eq!(frame.position, [7.0, 5.0, 0.0]);
        assert_eq!(light.position, Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_uniforms() {
        let frame = LightState::default().render(None);
        let uniforms = frame.to_uniforms();
        assert_eq!(uniforms.position, [5.0, 5.0, 5.0, 1.0]);
        assert_eq!(uniforms.ambient, AMBIENT_INTENSITY);
        assert_eq!(std::mem::size_of::<LightUniforms>(), 48);
    }
}
