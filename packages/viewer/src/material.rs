//! Surface material parameters of the displayed object.
//!
//! `MaterialState` is the manual baseline edited through the UI. The hue
//! cycle never writes into it; it only substitutes the colour of the
//! [`RenderMaterial`] produced for a frame.

use serde::Serialize;

use crate::color::Color;

/// Manually-set material parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MaterialState {
    pub base_color: Color,
    pub metalness: f32,
    pub roughness: f32,
    /// Opacity as a fraction in `0..=1` (the UI edits it as a percentage).
    pub opacity: f32,
    pub wireframe: bool,
    /// Reflective environment map on/off.
    pub env_map: bool,
}

impl Default for MaterialState {
    fn default() -> Self {
        Self {
            base_color: Color::from_hex_u32(0x6366f1),
            metalness: 0.0,
            roughness: 0.5,
            opacity: 1.0,
            wireframe: false,
            env_map: false,
        }
    }
}

impl MaterialState {
    /// Derived flag: blending is needed whenever the surface is not opaque.
    pub fn transparent(&self) -> bool {
        self.opacity < 1.0
    }

    /// Resolve the material for rendering, optionally replacing the colour.
    pub fn render(&self, color_override: Option<Color>) -> RenderMaterial {
        RenderMaterial {
            color: color_override.unwrap_or(self.base_color),
            metalness: self.metalness,
            roughness: self.roughness,
            opacity: self.opacity,
            transparent: self.transparent(),
            wireframe: self.wireframe,
            env_map: self.env_map,
            env_map_intensity: if self.env_map { 0.5 } else { 0.0 },
        }
    }
}

/// Material as handed to the renderer for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderMaterial {
    pub color: Color,
    pub metalness: f32,
    pub roughness: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub env_map: bool,
    pub env_map_intensity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_follows_opacity() {
        let mut material = MaterialState::default();
        assert!(!material.transparent());
        material.opacity = 0.99;
        assert!(material.transparent());
        assert!(material.render(None).transparent);
    }

    #[test]
    fn test_override_does_not_touch_base_color() {
        let material = MaterialState::default();
        let red = Color::new(1.0, 0.0, 0.0);
        let rendered = material.render(Some(red));
        assert_eq!(rendered.color, red);
        assert_eq!(material.base_color.to_hex_u32(), 0x6366f1);
        assert_eq!(material.render(None).color, material.base_color);
    }
}
