//! Camera parameters and view/projection helpers.
//!
//! The camera always looks at the origin. Its manual position is set through
//! the zoom slider (which moves it along z); the camera-orbit modulator
//! replaces x/z in the [`CameraFrame`] on a circle whose radius is the
//! horizontal distance of the manual position from the origin.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use serde::Serialize;

// ============================================================================
// Manual Camera State
// ============================================================================

/// Manually-set camera parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
        }
    }
}

impl CameraState {
    /// Distance shown on the zoom slider.
    pub fn distance(&self) -> f32 {
        self.position.z
    }

    /// Move the camera along z, as the zoom slider does.
    pub fn set_distance(&mut self, distance: f32) {
        self.position.z = distance;
    }

    /// Orbit radius derived from the manual position (distance in the XZ plane).
    pub fn orbit_radius(&self) -> f32 {
        Vec3::new(self.position.x, 0.0, self.position.z).length()
    }

    /// Resolve the camera for rendering, optionally replacing x/z.
    pub fn render(&self, lens: Lens, orbit_xz: Option<[f32; 2]>) -> CameraFrame {
        let mut position = self.position;
        if let Some([x, z]) = orbit_xz {
            position.x = x;
            position.z = z;
        }
        CameraFrame {
            position: position.to_array(),
            target: [0.0, 0.0, 0.0],
            fov: lens.fov,
            near: lens.near,
            far: lens.far,
        }
    }
}

/// Perspective lens settings, taken from the viewer configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lens {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

// ============================================================================
// Rendered Camera
// ============================================================================

/// Camera as handed to the renderer for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CameraFrame {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraFrame {
    pub fn position_vec3(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn target_vec3(&self) -> Vec3 {
        Vec3::from_array(self.target)
    }

    /// Right-handed look-at view matrix with Y up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position_vec3(), self.target_vec3(), Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    pub fn to_uniforms(&self, aspect: f32) -> CameraUniforms {
        let p = self.position;
        CameraUniforms {
            view_proj: self.view_projection_matrix(aspect).to_cols_array_2d(),
            position: [p[0], p[1], p[2], 1.0],
        }
    }
}

/// GPU-ready camera uniforms.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Camera position (vec4, w = 1).
    pub position: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = CameraState::default();
        assert_eq!(camera.distance(), 5.0);
        assert!((camera.orbit_radius() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_orbit_radius_ignores_height() {
        let camera = CameraState {
            position: Vec3::new(3.0, 10.0, 4.0),
        };
        assert!((camera.orbit_radius() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_puts_origin_in_front() {
        let frame = CameraState::default().render(Lens::default(), None);
        let origin_in_view = frame.view_matrix().transform_point3(Vec3::ZERO);
        assert!(origin_in_view.z < 0.0);
    }

    #[test]
    fn test_orbit_override_keeps_height() {
        let camera = CameraState {
            position: Vec3::new(0.0, 1.5, 5.0),
        };
        let frame = camera.render(Lens::default(), Some([5.0, 0.0]));
        assert_eq!(frame.position, [5.0, 1.5, 0.0]);
        assert_eq!(camera.position, Vec3::new(0.0, 1.5, 5.0));
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 80);
    }
}
