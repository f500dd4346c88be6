//! Per-object shading attributes.

use strata_math::Vec3;

/// RGB color, each channel nominally in `[0, 1]`.
pub type Color = Vec3;

/// Shading attributes attached to a scene object.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Material name (for diagnostics)
    pub name: String,

    /// Surface color
    pub color: Color,

    /// Opacity (0=fully refractive, 1=opaque)
    pub opacity: f32,

    /// Fraction of the surface color replaced by the reflected color
    pub reflectiveness: f32,

    /// Phong specular weight
    pub specular: f32,

    /// Phong exponent; `None` falls back to the scene's global shininess
    pub shininess: Option<f32>,

    /// Skip light accumulation entirely (the surface shows its raw color)
    pub no_lighting: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: Color::new(0.5, 0.5, 0.5),
            opacity: 1.0,
            reflectiveness: 0.0,
            specular: 1.0,
            shininess: None,
            no_lighting: false,
        }
    }
}

impl Material {
    /// Create a new material with just a name and color.
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            ..Default::default()
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_reflectiveness(mut self, reflectiveness: f32) -> Self {
        self.reflectiveness = reflectiveness;
        self
    }

    pub fn with_specular(mut self, specular: f32, shininess: Option<f32>) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    pub fn unlit(mut self) -> Self {
        self.no_lighting = true;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }

    pub fn is_reflective(&self) -> bool {
        self.reflectiveness != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_defaults() {
        let mat = Material::default();
        assert!(!mat.is_transparent());
        assert!(!mat.is_reflective());
        assert_eq!(mat.shininess, None);
    }

    #[test]
    fn test_material_builders() {
        let mat = Material::new("glass", Color::ONE)
            .with_opacity(0.2)
            .with_reflectiveness(0.1)
            .with_specular(0.5, Some(32.0));

        assert_eq!(mat.name, "glass");
        assert!(mat.is_transparent());
        assert!(mat.is_reflective());
        assert_eq!(mat.shininess, Some(32.0));
    }
}
