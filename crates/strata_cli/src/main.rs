//! Strata CLI - build an acceleration hierarchy over a preset scene and
//! render it to an image.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use strata_math::Vec3;
use strata_renderer::{AccelConfig, Camera, RenderConfig, SampleMode, Strategy, World};

mod scenes;

use scenes::Preset;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Whitted-style ray tracer with pluggable spatial hierarchies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a preset scene to an image
    Render(RenderArgs),
    /// Build the hierarchy for a preset scene and print it
    Tree {
        #[command(flatten)]
        scene: SceneArgs,
        #[command(flatten)]
        accel: AccelArgs,
    },
}

#[derive(Args)]
struct SceneArgs {
    /// Scene preset
    #[arg(long, value_enum, default_value_t = Preset::Demo)]
    scene: Preset,
    /// Objects per side for the grid and wall presets
    #[arg(long, default_value_t = 6)]
    count: u32,
}

#[derive(Args)]
struct AccelArgs {
    /// Split strategy
    #[arg(long, value_enum, default_value_t = AccelKind::Sah)]
    accel: AccelKind,
    /// Maximum tree depth
    #[arg(long)]
    depth: Option<u32>,
    /// Leaf size (fixed-threshold, octree) or grid subdivision (voxel-grid)
    #[arg(long)]
    param: Option<u32>,
    /// SAH cost of a triangle test relative to a sphere test
    #[arg(long)]
    cost_ratio: Option<f32>,
    /// Split at planes instead of fitting tight child boxes
    #[arg(long)]
    no_bvh: bool,
    /// Generate wireframe outlines of every container
    #[arg(long)]
    outlines: bool,
}

#[derive(Args)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,
    #[command(flatten)]
    accel: AccelArgs,
    /// JSON file holding render settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 450)]
    height: u32,
    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 50.0)]
    fov: f32,
    #[arg(long)]
    max_bounce: Option<u32>,
    /// Samples per pixel along each axis
    #[arg(long)]
    samples: Option<u32>,
    #[arg(long, value_enum)]
    sample_mode: Option<SampleKind>,
    #[arg(long)]
    seed: Option<u64>,
    /// Make outline and other debug objects visible
    #[arg(long)]
    show_debug: bool,
    /// Print the hierarchy before rendering
    #[arg(long)]
    dump_tree: bool,
    /// Write render statistics as JSON to this file
    #[arg(long)]
    stats: Option<PathBuf>,
    /// Output image (format from extension)
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AccelKind {
    None,
    EqualCount,
    Sah,
    FixedThreshold,
    Octree,
    VoxelGrid,
}

impl From<AccelKind> for Strategy {
    fn from(kind: AccelKind) -> Self {
        match kind {
            AccelKind::None => Strategy::None,
            AccelKind::EqualCount => Strategy::EqualCount,
            AccelKind::Sah => Strategy::Sah,
            AccelKind::FixedThreshold => Strategy::FixedThreshold,
            AccelKind::Octree => Strategy::Octree,
            AccelKind::VoxelGrid => Strategy::VoxelGrid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SampleKind {
    Grid,
    Random,
    BlueNoise,
}

impl From<SampleKind> for SampleMode {
    fn from(kind: SampleKind) -> Self {
        match kind {
            SampleKind::Grid => SampleMode::Grid,
            SampleKind::Random => SampleMode::Random,
            SampleKind::BlueNoise => SampleMode::BlueNoise,
        }
    }
}

impl AccelArgs {
    fn to_config(&self) -> AccelConfig {
        let mut config = AccelConfig::new(self.accel.into());
        if let Some(depth) = self.depth {
            config.depth_limit = depth;
        }
        if let Some(param) = self.param {
            config.param = param;
        } else if config.strategy == Strategy::VoxelGrid {
            config.param = 8;
        }
        if let Some(cost_ratio) = self.cost_ratio {
            config.cost_ratio = cost_ratio;
        }
        config.bvh = !self.no_bvh;
        config.outlines = self.outlines;
        config
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => render(&args),
        Commands::Tree { scene, accel } => tree(&scene, &accel),
    }
}

fn load_world(scene: &SceneArgs, accel: &AccelArgs) -> Result<World> {
    let built = scenes::build(scene.scene, scene.count).context("Failed to build scene")?;
    let world = World::new(built).context("Failed to allocate scene hierarchy")?;
    log::info!(
        "Scene {:?}: {} objects, {} lights",
        scene.scene,
        world.scene().object_count(),
        world.scene().lights.len()
    );
    world
        .optimize(&accel.to_config())
        .context("Failed to build acceleration hierarchy")?;
    Ok(world)
}

fn tree(scene: &SceneArgs, accel: &AccelArgs) -> Result<()> {
    let world = load_world(scene, accel)?;
    let hierarchy = world.snapshot();
    print!("{}", hierarchy.dump());
    println!("{hierarchy}");
    Ok(())
}

fn load_render_config(path: Option<&Path>) -> Result<RenderConfig> {
    let Some(path) = path else {
        return Ok(RenderConfig::default());
    };
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid render config in {}", path.display()))
}

fn render(args: &RenderArgs) -> Result<()> {
    let mut config = load_render_config(args.config.as_deref())?;
    if let Some(max_bounce) = args.max_bounce {
        config.max_bounce = max_bounce;
    }
    if let Some(samples) = args.samples {
        config.samples_per_axis = samples;
    }
    if let Some(mode) = args.sample_mode {
        config.sample_mode = mode.into();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.show_debug_objects |= args.show_debug;

    let world = load_world(&args.scene, &args.accel)?;
    if args.dump_tree {
        print!("{}", world.snapshot().dump());
    }

    let (from, at) = scenes::viewpoint(args.scene.scene, args.scene.count);
    let mut camera = Camera::new()
        .with_resolution(args.width, args.height)
        .with_position(from, at, Vec3::Y)
        .with_fov(args.fov);
    camera.initialize();

    let output = world.render(&camera, &config).context("Render failed")?;
    output
        .image
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Saved {}", args.output.display());

    if let Some(path) = &args.stats {
        let json = serde_json::to_string_pretty(&output.stats).context("Failed to encode statistics")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}
