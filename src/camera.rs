//! Look-at camera.
//!
//! The camera stores its world position and a 3x3 orthonormal view basis
//! whose columns are the right, up and forward vectors. Forward points
//! from the look target toward the camera, so visible geometry has
//! positive depth in camera space.

use crate::math::mat3::Mat3;
use crate::math::vec3::Vec3;

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    position: Vec3,
    basis: Mat3,
}

impl Camera {
    /// Creates a camera at `position` with an identity basis (looking
    /// along -Z).
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            basis: Mat3::IDENTITY,
        }
    }

    /// Creates a camera at `position` oriented toward `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self::new(position);
        camera.look_at(target);
        camera
    }

    /// Re-derives the view basis so the camera faces `target`.
    ///
    /// Precondition: the direction to the target must not be parallel to
    /// the world up vector (the cross products below degenerate there).
    /// Callers keep the camera out of that pose.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = (self.position - target).normalize();
        let right = Vec3::UP.cross(forward).normalize();
        let up = forward.cross(right).normalize();
        self.basis = Mat3::from_columns(right, up, forward);
    }

    /// Moves the camera without changing its orientation.
    pub fn translate(&mut self, movement: Vec3) {
        self.position = self.position + movement;
    }

    /// Rotates the camera position about the world origin and re-aims it
    /// at the origin, orbiting the scene.
    pub fn orbit(&mut self, x_radians: f32, y_radians: f32) {
        self.position = self.position.rotate_x(x_radians).rotate_y(y_radians);
        self.look_at(Vec3::ZERO);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn right(&self) -> Vec3 {
        self.basis.column(0)
    }

    pub fn up(&self) -> Vec3 {
        self.basis.column(1)
    }

    pub fn forward(&self) -> Vec3 {
        self.basis.column(2)
    }

    /// Transforms a world point into camera space. Points in front of the
    /// camera have positive z.
    #[inline]
    pub fn to_camera(&self, world: Vec3) -> Vec3 {
        self.basis.transpose() * (self.position - world)
    }

    /// Inverse of [`Camera::to_camera`]: the transpose basis is its own
    /// inverse because the basis is orthonormal.
    #[inline]
    pub fn from_camera(&self, camera_space: Vec3) -> Vec3 {
        self.position - self.basis * camera_space
    }
}
