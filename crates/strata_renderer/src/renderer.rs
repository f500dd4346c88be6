//! Render configuration, image buffer and the parallel render loop.

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strata_core::{Color, Scene};

use crate::bucket::{generate_buckets, render_bucket, DEFAULT_BUCKET_SIZE};
use crate::camera::Camera;
use crate::error::ConfigError;
use crate::hierarchy::Hierarchy;
use crate::sampler::{sample_offsets, SampleMode};
use crate::shade::{RenderStats, Shader, TraceStats};
use crate::traverse::TraceOptions;

/// Render configuration.
///
/// Every flag gates one part of the shading pipeline independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub lighting: bool,
    pub reflections: bool,
    pub specular: bool,
    /// Deepest bounce still shaded; the primary ray is bounce 0
    pub max_bounce: u32,
    pub refractive_index: f32,
    /// Light distances are divided by this before the inverse-square falloff
    pub distance_divisor: f32,
    /// Ambient light level; `None` uses the scene's
    pub base_brightness: Option<f32>,
    /// Phong exponent for materials without one; `None` uses the scene's
    pub global_shininess: Option<f32>,
    pub triangles: bool,
    pub spheres: bool,
    pub cuboids: bool,
    pub plane_optimisation: bool,
    pub show_debug_objects: bool,
    pub mt_triangle_collision: bool,
    /// Samples per pixel along each axis (`g²` rays per pixel)
    pub samples_per_axis: u32,
    pub sample_mode: SampleMode,
    pub seed: Option<u64>,
    pub bucket_size: u32,
    /// Linear RGB of pixels where every sample missed
    pub background: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            lighting: true,
            reflections: true,
            specular: true,
            max_bounce: 15,
            refractive_index: 1.52,
            distance_divisor: 1.0,
            base_brightness: None,
            global_shininess: None,
            triangles: true,
            spheres: true,
            cuboids: true,
            plane_optimisation: true,
            show_debug_objects: false,
            mt_triangle_collision: true,
            samples_per_axis: 1,
            sample_mode: SampleMode::Grid,
            seed: None,
            bucket_size: DEFAULT_BUCKET_SIZE,
            background: [0.0; 3],
        }
    }
}

impl RenderConfig {
    /// Reject values the shader cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.refractive_index.is_finite() || self.refractive_index <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "refractive_index",
                value: self.refractive_index,
            });
        }
        if !self.distance_divisor.is_finite() || self.distance_divisor <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "distance_divisor",
                value: self.distance_divisor,
            });
        }
        for (field, value) in [
            ("base_brightness", self.base_brightness),
            ("global_shininess", self.global_shininess),
        ] {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        if self.samples_per_axis == 0 {
            return Err(ConfigError::Zero("samples_per_axis"));
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::Zero("bucket_size"));
        }
        Ok(())
    }
}

impl From<&RenderConfig> for TraceOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            spheres: config.spheres,
            triangles: config.triangles,
            cuboids: config.cuboids,
            plane_optimisation: config.plane_optimisation,
            show_debug_objects: config.show_debug_objects,
            mt_triangle_collision: config.mt_triangle_collision,
        }
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a color to 8-bit RGBA. Shading is already in display space.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(color.x)) as u8;
    let g = (255.0 * clamp_01(color.y)) as u8;
    let b = (255.0 * clamp_01(color.z)) as u8;
    [r, g, b, 255]
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with one colour.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y). Out-of-range writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let rgba: Vec<[u8; 4]> = self.pixels.iter().map(|&c| color_to_rgba(c)).collect();
        bytemuck::cast_slice(&rgba).to_vec()
    }

    /// Encode as PNG (or whatever format the extension names).
    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )
    }
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: ImageBuffer,
    pub stats: RenderStats,
}

/// Render the scene through `camera` against one hierarchy snapshot.
///
/// Buckets are rendered in parallel; the hierarchy is only read.
pub fn render(
    scene: &Scene,
    hierarchy: &Hierarchy,
    camera: &Camera,
    config: &RenderConfig,
) -> Result<RenderOutput, ConfigError> {
    config.validate()?;
    if camera.image_width == 0 || camera.image_height == 0 {
        return Err(ConfigError::Zero("image dimensions"));
    }
    let start = Instant::now();

    let offsets = sample_offsets(config.sample_mode, config.samples_per_axis, config.seed);
    let stats = TraceStats::new();
    let shader = Shader::new(scene, hierarchy, config, &stats);
    let buckets = generate_buckets(camera.image_width, camera.image_height, config.bucket_size);

    log::info!(
        "Rendering {}x{} ({} buckets, {} samples/pixel, {} hierarchy)",
        camera.image_width,
        camera.image_height,
        buckets.len(),
        offsets.len(),
        hierarchy.strategy()
    );

    let results: Vec<_> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, camera, &shader, &offsets))
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height, Color::from(config.background));
    for result in results {
        let bucket = result.bucket;
        for (i, pixel) in result.pixels.into_iter().enumerate() {
            if let Some(color) = pixel {
                let x = bucket.x + i as u32 % bucket.width;
                let y = bucket.y + i as u32 / bucket.width;
                image.set(x, y, color);
            }
        }
    }

    let stats = stats.snapshot();
    log::info!(
        "Rendered in {:.2?}: {} primary, {} secondary, {} shadow rays, {} intersections, depth {}",
        start.elapsed(),
        stats.primary_rays,
        stats.secondary_rays,
        stats.shadow_rays,
        stats.intersect_calls,
        stats.max_depth
    );

    Ok(RenderOutput { image, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accel::{build_hierarchy, AccelConfig, Strategy};
    use std::sync::Arc;
    use strata_core::{Material, PointLight, Sphere};
    use strata_math::Vec3;

    fn scene() -> Scene {
        let mut scene = Scene::new();
        let red = Arc::new(Material::new("red", Color::new(0.9, 0.1, 0.1)));
        let mirror = Arc::new(Material::new("mirror", Color::ONE).with_reflectiveness(0.8));
        scene.add_sphere(Sphere::new(Vec3::new(-1.2, 0.0, 0.0), 1.0), red).unwrap();
        scene
            .add_sphere(Sphere::new(Vec3::new(1.2, 0.0, 0.0), 1.0), mirror)
            .unwrap();
        scene.add_light(PointLight::new(Vec3::new(0.0, 5.0, -5.0), 60.0));
        scene.base_brightness = 0.1;
        scene
    }

    fn camera(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new()
            .with_resolution(width, height)
            .with_position(Vec3::new(0.0, 0.0, -8.0), Vec3::ZERO, Vec3::Y)
            .with_fov(45.0);
        camera.initialize();
        camera
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Color::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Color::ONE), [255, 255, 255, 255]);
        assert_eq!(color_to_rgba(Color::new(2.0, -1.0, 0.5)), [255, 0, 127, 255]);
    }

    #[test]
    fn test_image_buffer_bounds() {
        let mut image = ImageBuffer::new(4, 3, Color::ZERO);
        image.set(3, 2, Color::ONE);
        image.set(4, 0, Color::ONE);

        assert_eq!(image.get(3, 2), Some(Color::ONE));
        assert_eq!(image.get(4, 0), None);
        assert_eq!(image.to_rgba().len(), 4 * 3 * 4);
    }

    #[test]
    fn test_config_defaults_and_json() {
        let config: RenderConfig = serde_json::from_str(r#"{"max_bounce": 3, "sample_mode": "blue-noise"}"#).unwrap();
        assert_eq!(config.max_bounce, 3);
        assert_eq!(config.sample_mode, SampleMode::BlueNoise);
        assert_eq!(config.refractive_index, 1.52);
        assert!(config.plane_optimisation);

        // Negative bounce limits never get past deserialization
        assert!(serde_json::from_str::<RenderConfig>(r#"{"max_bounce": -1}"#).is_err());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let zero_divisor = RenderConfig {
            distance_divisor: 0.0,
            ..RenderConfig::default()
        };
        assert!(matches!(
            zero_divisor.validate(),
            Err(ConfigError::NotPositive { field: "distance_divisor", .. })
        ));

        let no_samples = RenderConfig {
            samples_per_axis: 0,
            ..RenderConfig::default()
        };
        assert_eq!(no_samples.validate(), Err(ConfigError::Zero("samples_per_axis")));

        let nan_light = RenderConfig {
            base_brightness: Some(f32::NAN),
            ..RenderConfig::default()
        };
        assert!(nan_light.validate().is_err());
    }

    #[test]
    fn test_render_counts_primary_rays() {
        let scene = scene();
        let tree = build_hierarchy(&scene, &AccelConfig::default()).unwrap();
        let config = RenderConfig {
            samples_per_axis: 2,
            ..RenderConfig::default()
        };
        let output = render(&scene, &tree, &camera(24, 16), &config).unwrap();

        assert_eq!(output.stats.primary_rays, 24 * 16 * 4);
        assert!(output.stats.max_depth <= config.max_bounce + 1);
        // Top-left corner sees nothing, left of centre sees the mirror sphere
        assert_eq!(output.image.get(0, 0), Some(Color::from(config.background)));
        assert_ne!(output.image.get(8, 8), Some(Color::from(config.background)));
    }

    #[test]
    fn test_every_strategy_renders_the_same_image() {
        let scene = scene();
        let camera = camera(20, 12);
        let config = RenderConfig::default();
        let reference = render(&scene, &Hierarchy::flat(&scene).unwrap(), &camera, &config).unwrap();

        for strategy in [
            Strategy::EqualCount,
            Strategy::Sah,
            Strategy::FixedThreshold,
            Strategy::Octree,
            Strategy::VoxelGrid,
        ] {
            let tree = build_hierarchy(&scene, &AccelConfig::new(strategy)).unwrap();
            let output = render(&scene, &tree, &camera, &config).unwrap();
            for (a, b) in reference.image.pixels.iter().zip(&output.image.pixels) {
                assert!((*a - *b).length() < 1e-3, "{strategy}: {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_zero_sized_image_is_rejected() {
        let scene = scene();
        let tree = Hierarchy::flat(&scene).unwrap();
        let camera = Camera::new().with_resolution(0, 10);
        assert!(render(&scene, &tree, &camera, &RenderConfig::default()).is_err());
    }
}
