//! Scene-level parameters: the displayed shape and the environment toggles.
//!
//! Geometry construction belongs to the renderer; this module only records
//! which shape is shown and which helpers (axes, grid, fog, particles) are on.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Shapes the viewer can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Cube,
    Sphere,
    Torus,
    Pyramid,
    Cylinder,
    Dodecahedron,
    Octahedron,
    Tetrahedron,
}

impl Shape {
    pub const ALL: [Shape; 8] = [
        Shape::Cube,
        Shape::Sphere,
        Shape::Torus,
        Shape::Pyramid,
        Shape::Cylinder,
        Shape::Dodecahedron,
        Shape::Octahedron,
        Shape::Tetrahedron,
    ];

    /// Parse from a selector value. Unknown names fall back to the cube.
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sphere" => Shape::Sphere,
            "torus" => Shape::Torus,
            "pyramid" => Shape::Pyramid,
            "cylinder" => Shape::Cylinder,
            "dodecahedron" => Shape::Dodecahedron,
            "octahedron" => Shape::Octahedron,
            "tetrahedron" => Shape::Tetrahedron,
            "cube" => Shape::Cube,
            other => {
                log::warn!("Unknown shape '{}', using cube", other);
                Shape::Cube
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Cube => "cube",
            Shape::Sphere => "sphere",
            Shape::Torus => "torus",
            Shape::Pyramid => "pyramid",
            Shape::Cylinder => "cylinder",
            Shape::Dodecahedron => "dodecahedron",
            Shape::Octahedron => "octahedron",
            Shape::Tetrahedron => "tetrahedron",
        }
    }
}

/// The particle field shown around the object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleField {
    pub enabled: bool,
    pub count: u32,
    pub color: Color,
    pub size: f32,
    pub opacity: f32,
    /// Spin around the world Y axis, radians in `[0, 2π)`.
    pub rotation_y: f32,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self {
            enabled: false,
            count: 1000,
            color: Color::from_hex_u32(0x6366f1),
            size: 0.05,
            opacity: 0.6,
            rotation_y: 0.0,
        }
    }
}

/// Environment toggles and background.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneState {
    /// Currently displayed shape, `None` while a swap is in progress.
    pub object: Option<Shape>,
    pub background: Color,
    pub show_axes: bool,
    pub show_grid: bool,
    pub fog: bool,
    pub particles: ParticleField,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            object: Some(Shape::Cube),
            background: Color::from_hex_u32(0x1a1a2e),
            show_axes: false,
            show_grid: false,
            fog: false,
            particles: ParticleField::default(),
        }
    }
}

impl SceneState {
    /// Number of top-level scene objects the renderer will hold.
    ///
    /// Ambient light, point light, its marker and the ground plane are always
    /// present; the object and helpers are counted when shown.
    pub fn object_count(&self) -> u32 {
        4 + self.object.is_some() as u32
            + self.show_axes as u32
            + self.show_grid as u32
            + self.particles.enabled as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_names_round_trip() {
        for shape in Shape::ALL {
            assert_eq!(Shape::from_name(shape.name()), shape);
        }
        assert_eq!(Shape::from_name(" Torus "), Shape::Torus);
    }

    #[test]
    fn test_unknown_shape_falls_back_to_cube() {
        assert_eq!(Shape::from_name("klein-bottle"), Shape::Cube);
    }

    #[test]
    fn test_object_count() {
        let mut scene = SceneState::default();
        assert_eq!(scene.object_count(), 5);

        scene.show_axes = true;
        scene.show_grid = true;
        scene.particles.enabled = true;
        assert_eq!(scene.object_count(), 8);

        scene.object = None;
        assert_eq!(scene.object_count(), 7);
    }
}
