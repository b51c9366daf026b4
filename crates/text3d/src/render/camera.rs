//! # 3D Camera
//!
//! Camera math for projecting the text plane. Matrices follow the OpenGL
//! conventions: right-handed Y-up view space, clip-space depth in `[-1, 1]`.

use nalgebra::{Rotation3, Vector3};

use crate::foundation::math::{utils, Mat4, Point3, Vec3};

/// Projection kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Perspective projection, `fovy` is the vertical field of view
    Perspective,
    /// Orthographic projection, `fovy` is the visible height in world units
    Orthographic,
}

/// 3D camera used inside `begin_3d`/`end_3d` blocks
///
/// # Coordinate System
/// - X+ = Right
/// - Y+ = Up
/// - Text lies on planes of constant Y, so a camera above the text
///   (`position.y` greater than the plane) sees the front faces.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in degrees, or view height for orthographic cameras
    pub fovy: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,

    /// Projection kind
    pub projection: Projection,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fovy_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Example
    /// ```rust
    /// use text3d::foundation::math::Vec3;
    /// use text3d::render::Camera;
    ///
    /// let camera = Camera::perspective(Vec3::new(-10.0, 15.0, -10.0), 45.0, 16.0 / 9.0, 0.01, 1000.0);
    /// assert_eq!(camera.target, Vec3::zeros());
    /// ```
    pub fn perspective(position: Vec3, fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fovy: fovy_degrees,
            aspect,
            near,
            far,
            projection: Projection::Perspective,
        }
    }

    /// Create an orthographic camera looking at the origin
    pub fn orthographic(position: Vec3, view_height: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fovy: view_height,
            projection: Projection::Orthographic,
            ..Self::perspective(position, 45.0, aspect, near, far)
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Point the camera at `target` with the given up vector
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Update the aspect ratio after a viewport change
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Rotate the position around the target's vertical axis
    pub fn orbit(&mut self, angle_radians: f32) {
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), angle_radians);
        self.position = self.target + rotation * (self.position - self.target);
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// View-to-clip matrix
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::new_perspective(self.aspect, utils::deg_to_rad(self.fovy), self.near, self.far)
            }
            Projection::Orthographic => {
                let top = self.fovy / 2.0;
                let right = top * self.aspect;
                Mat4::new_orthographic(-right, right, -top, top, self.near, self.far)
            }
        }
    }

    /// Combined world-to-clip matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Whether the camera sees the upward-facing side of a plane at `elevation`
    pub fn is_above(&self, elevation: f32) -> bool {
        match self.projection {
            Projection::Perspective => self.position.y >= elevation,
            Projection::Orthographic => self.position.y >= self.target.y,
        }
    }
}

impl Default for Camera {
    /// Perspective camera at (-10, 15, -10) looking at the origin with a 45 degree fovy
    fn default() -> Self {
        Self::perspective(Vec3::new(-10.0, 15.0, -10.0), 45.0, 16.0 / 9.0, 0.01, 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;
    use approx::assert_relative_eq;

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = Camera::default();
        let clip = camera.view_projection_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);

        assert!(clip.w > 0.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_orbit_keeps_distance_and_height() {
        let mut camera = Camera::default();
        let before = (camera.position - camera.target).norm();

        camera.orbit(1.3);

        assert_relative_eq!((camera.position - camera.target).norm(), before, epsilon = 1e-4);
        assert_relative_eq!(camera.position.y, 15.0, epsilon = 1e-5);
    }

    #[test]
    fn test_is_above() {
        let camera = Camera::default();
        assert!(camera.is_above(2.5));
        assert!(!camera.is_above(20.0));
    }
}
