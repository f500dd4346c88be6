//! Pinhole camera for primary rays.

use strata_math::{Ray, Vec2, Vec3};

/// Eye, target and field of view, plus the image plane derived from them.
///
/// Call [`Camera::initialize`] after the last `with_*` setter and before
/// asking for rays.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    eye: Vec3,
    target: Vec3,
    up: Vec3,
    /// Vertical field of view in degrees
    fov_y: f32,

    /// Centre of pixel (0, 0) on the image plane
    origin_pixel: Vec3,
    /// One pixel to the right
    step_x: Vec3,
    /// One pixel down
    step_y: Vec3,
}

impl Camera {
    /// 800x450 at the origin looking down +z, 60° vertical fov.
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            eye: Vec3::ZERO,
            target: Vec3::Z,
            up: Vec3::Y,
            fov_y: 60.0,
            origin_pixel: Vec3::ZERO,
            step_x: Vec3::ZERO,
            step_y: Vec3::ZERO,
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    pub fn with_position(mut self, eye: Vec3, target: Vec3, up: Vec3) -> Self {
        self.eye = eye;
        self.target = target;
        self.up = up;
        self
    }

    /// Vertical field of view in degrees.
    pub fn with_fov(mut self, fov_y: f32) -> Self {
        self.fov_y = fov_y;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.eye
    }

    /// Lay out the image plane one unit in front of the eye.
    pub fn initialize(&mut self) {
        let (width, height) = (self.image_width.max(1) as f32, self.image_height.max(1) as f32);
        let half_h = (self.fov_y.to_radians() * 0.5).tan();
        let half_w = half_h * width / height;

        let forward = (self.target - self.eye).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let down = forward.cross(right);

        self.step_x = right * (2.0 * half_w / width);
        self.step_y = down * (2.0 * half_h / height);
        let corner = self.eye + forward - right * half_w - down * half_h;
        self.origin_pixel = corner + 0.5 * (self.step_x + self.step_y);
    }

    /// Ray through pixel `(i, j)` shifted by `offset` pixels from its centre.
    ///
    /// The direction is left unnormalized: hit distances are measured in
    /// multiples of the eye-to-image-plane vector.
    pub fn get_ray(&self, i: u32, j: u32, offset: Vec2) -> Ray {
        let at = self.origin_pixel
            + (i as f32 + offset.x) * self.step_x
            + (j as f32 + offset.y) * self.step_y;
        Ray::new(self.eye, at - self.eye)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
