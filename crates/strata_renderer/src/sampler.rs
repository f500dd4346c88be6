//! Sub-pixel sample offsets for anti-aliasing.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use strata_math::Vec2;

/// How the `g²` sample positions inside a pixel are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SampleMode {
    /// Regular lattice
    #[default]
    Grid,
    /// Uniform over the pixel
    Random,
    /// Lattice with each point jittered inside its own slot
    BlueNoise,
}

/// Generate `g²` offsets in `[-0.5, 0.5]²`, relative to the pixel centre.
///
/// Offsets are computed once per render and shared by every pixel. A
/// `seed` makes the random modes reproducible.
pub fn sample_offsets(mode: SampleMode, grid_size: u32, seed: Option<u64>) -> Vec<Vec2> {
    let g = grid_size.max(1);
    let count = (g * g) as usize;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match mode {
        SampleMode::Grid => grid(g),
        SampleMode::Random => (0..count)
            .map(|_| Vec2::new(rng.gen_range(-0.5..=0.5), rng.gen_range(-0.5..=0.5)))
            .collect(),
        SampleMode::BlueNoise => {
            let jitter = 0.5 / (g + 1) as f32;
            grid(g)
                .into_iter()
                .map(|p| {
                    p + Vec2::new(
                        rng.gen_range(-jitter..=jitter),
                        rng.gen_range(-jitter..=jitter),
                    )
                })
                .collect()
        }
    }
}

fn grid(g: u32) -> Vec<Vec2> {
    let step = 1.0 / (g + 1) as f32;
    (0..g)
        .flat_map(|i| (0..g).map(move |j| Vec2::new(0.5 - (i + 1) as f32 * step, 0.5 - (j + 1) as f32 * step)))
        .collect()
}
