//! Built-in scene presets.

use std::sync::Arc;

use anyhow::Result;
use clap::ValueEnum;
use strata_core::{Color, Cuboid, Material, Mesh, PointLight, Scene, Sphere, Triangle};
use strata_math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Glass, mirror and matte spheres over a floor, with a boxed mesh
    Demo,
    /// A cube of small matte spheres (hierarchy stress test)
    Grid,
    /// A tessellated wall of triangles behind a glass sphere
    Wall,
}

/// Build a preset. `count` is the spheres-per-side of `Grid` and the
/// quads-per-side of `Wall`.
pub fn build(preset: Preset, count: u32) -> Result<Scene> {
    match preset {
        Preset::Demo => demo(),
        Preset::Grid => grid(count),
        Preset::Wall => wall(count),
    }
}

/// Where the camera looks from and at for each preset.
pub fn viewpoint(preset: Preset, count: u32) -> (Vec3, Vec3) {
    match preset {
        Preset::Demo => (Vec3::new(0.0, 2.5, -9.0), Vec3::new(0.0, 0.5, 0.0)),
        Preset::Grid => {
            let span = count.max(1) as f32 * 2.0;
            (Vec3::new(span * 0.6, span * 0.5, -span * 1.4), Vec3::ZERO)
        }
        Preset::Wall => (Vec3::new(0.0, 0.0, -8.0), Vec3::ZERO),
    }
}

fn demo() -> Result<Scene> {
    let mut scene = Scene::new();
    scene.base_brightness = 0.1;

    let floor = scene.add_material(Material::new("floor", Color::new(0.8, 0.8, 0.7)).with_reflectiveness(0.2));
    let red = scene.add_material(Material::new("red", Color::new(0.9, 0.15, 0.1)).with_specular(0.6, Some(32.0)));
    let mirror = scene.add_material(Material::new("mirror", Color::ONE).with_reflectiveness(0.9));
    let glass = scene.add_material(Material::new("glass", Color::new(0.9, 0.95, 1.0)).with_opacity(0.1));
    let bubble = scene.add_material(Material::new("bubble", Color::ONE).with_opacity(0.05));
    let teal = scene.add_material(Material::new("teal", Color::new(0.1, 0.6, 0.6)));

    scene.add_cuboid(
        Cuboid::new(Vec3::new(-8.0, -1.1, -8.0), Vec3::new(8.0, -1.0, 8.0)),
        floor,
    )?;
    scene.add_sphere(Sphere::new(Vec3::new(-2.2, 0.0, 0.5), 1.0), red)?;
    scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, 1.5), 1.0), mirror)?;
    scene.add_sphere(Sphere::new(Vec3::new(2.2, 0.0, 0.5), 1.0), glass)?;
    scene.add_sphere(Sphere::new(Vec3::new(0.8, 0.2, -1.8), 0.6).with_thickness(0.2), bubble)?;
    scene.add_mesh(
        &Mesh::cube(Vec3::new(-1.4, -1.0, -2.4), Vec3::new(-0.4, 0.0, -1.4)),
        teal,
    )?;

    scene.add_light(PointLight::new(Vec3::new(-4.0, 6.0, -6.0), 70.0));
    scene.add_light(PointLight::new(Vec3::new(5.0, 4.0, -2.0), 30.0).with_color(Color::new(1.0, 0.9, 0.8)));
    Ok(scene)
}

fn grid(count: u32) -> Result<Scene> {
    let mut scene = Scene::new();
    scene.base_brightness = 0.15;
    let n = count.max(1);
    let half = (n as f32 - 1.0) / 2.0;

    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let cell = Vec3::new(x as f32, y as f32, z as f32);
                let color = (cell + 1.0) / n as f32;
                let material = scene.add_material(Material::new(format!("grid-{x}-{y}-{z}"), color));
                scene.add_sphere(Sphere::new((cell - half) * 2.0, 0.7), material)?;
            }
        }
    }

    let span = n as f32 * 2.0;
    scene.add_light(PointLight::new(Vec3::new(span, span, -span * 2.0), span * span * 2.0));
    Ok(scene)
}

fn wall(count: u32) -> Result<Scene> {
    let mut scene = Scene::new();
    scene.base_brightness = 0.1;
    let n = count.max(1);
    let size = 10.0 / n as f32;

    let tiles = [
        scene.add_material(Material::new("tile-light", Color::new(0.9, 0.9, 0.85))),
        scene.add_material(Material::new("tile-dark", Color::new(0.2, 0.25, 0.3))),
    ];
    for j in 0..n {
        for i in 0..n {
            let x0 = -5.0 + i as f32 * size;
            let y0 = -5.0 + j as f32 * size;
            let (a, b) = (Vec3::new(x0, y0, 3.0), Vec3::new(x0 + size, y0, 3.0));
            let (c, d) = (Vec3::new(x0 + size, y0 + size, 3.0), Vec3::new(x0, y0 + size, 3.0));
            let tile = Arc::clone(&tiles[((i + j) % 2) as usize]);
            scene.add_triangle(Triangle::new(a, b, c), Arc::clone(&tile))?;
            scene.add_triangle(Triangle::new(a, c, d), tile)?;
        }
    }

    let glass = scene.add_material(Material::new("glass", Color::ONE).with_opacity(0.0));
    scene.add_sphere(Sphere::new(Vec3::ZERO, 1.8), glass)?;
    scene.add_light(PointLight::new(Vec3::new(0.0, 3.0, -6.0), 60.0));
    Ok(scene)
}
