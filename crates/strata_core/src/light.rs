//! Point lights.

use strata_math::Vec3;

use crate::material::Color;

/// An omnidirectional point light.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    pub center: Vec3,
    pub color: Color,
    pub brightness: f32,
    /// Weight of this light's specular highlight
    pub specular: f32,
    pub specular_color: Color,
}

impl PointLight {
    /// White light with a white highlight.
    pub fn new(center: Vec3, brightness: f32) -> Self {
        Self {
            center,
            color: Color::ONE,
            brightness,
            specular: 1.0,
            specular_color: Color::ONE,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_specular(mut self, specular: f32, specular_color: Color) -> Self {
        self.specular = specular;
        self.specular_color = specular_color;
        self
    }
}
