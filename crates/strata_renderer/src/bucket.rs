//! Image tiles ("buckets") rendered independently by the rayon pool.

use strata_core::Color;
use strata_math::Vec2;

use crate::camera::Camera;
use crate::shade::Shader;

/// Default bucket edge in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// A rectangle of pixels, top-left corner at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order (0 renders first)
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Squared distance from the bucket's centre to `(cx, cy)`.
    fn distance_sq(&self, cx: f32, cy: f32) -> f32 {
        let dx = self.x as f32 + self.width as f32 * 0.5 - cx;
        let dy = self.y as f32 + self.height as f32 * 0.5 - cy;
        dx * dx + dy * dy
    }
}

/// Cut a `width`x`height` image into buckets of at most `size` pixels a
/// side, ordered outwards from the image centre.
pub fn generate_buckets(width: u32, height: u32, size: u32) -> Vec<Bucket> {
    let size = size.max(1);
    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(size as usize)
        .flat_map(|y| {
            (0..width)
                .step_by(size as usize)
                .map(move |x| Bucket::new(x, y, size.min(width - x), size.min(height - y), 0))
        })
        .collect();

    let (cx, cy) = (width as f32 * 0.5, height as f32 * 0.5);
    buckets.sort_by(|a, b| a.distance_sq(cx, cy).total_cmp(&b.distance_sq(cx, cy)));
    for (index, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = index;
    }
    buckets
}

/// Shade every pixel of `bucket` with the shared sample `offsets`.
///
/// A pixel where no sample hit anything is `None` so the caller can keep
/// its background; otherwise it is the sum of all samples over their count.
pub fn render_bucket(bucket: &Bucket, camera: &Camera, shader: &Shader<'_>, offsets: &[Vec2]) -> BucketResult {
    let b = *bucket;
    let pixels = (b.y..b.y + b.height)
        .flat_map(|y| (b.x..b.x + b.width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let mut sum = Color::ZERO;
            let mut any_hit = false;
            for &offset in offsets {
                let res = shader.cast(&camera.get_ray(x, y, offset));
                any_hit |= res.hit();
                sum += res.color;
            }
            any_hit.then(|| sum / offsets.len().max(1) as f32)
        })
        .collect();

    BucketResult::new(b, pixels)
}

/// Shaded pixels of one bucket, row-major.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<Option<Color>>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Option<Color>>) -> Self {
        Self { bucket, pixels }
    }
}
