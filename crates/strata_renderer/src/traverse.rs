//! Ray-scene intersection over a built hierarchy.

use strata_core::{Object, Scene, Shape, Triangle};
use strata_math::Ray;

use crate::accel::{GridWalk, Strategy};
use crate::hierarchy::{BoundTarget, Container, Hierarchy, NodeId};
use crate::hit::{Hit, RayResult};
use crate::{cuboid, sphere, triangle};

/// Which primitives are tested, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceOptions {
    pub spheres: bool,
    pub triangles: bool,
    pub cuboids: bool,
    /// Skip containers whose box the ray misses
    pub plane_optimisation: bool,
    /// Intersect hierarchy outlines and other debug geometry
    pub show_debug_objects: bool,
    /// Möller–Trumbore instead of plane + containment for triangles
    pub mt_triangle_collision: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            spheres: true,
            triangles: true,
            cuboids: true,
            plane_optimisation: true,
            show_debug_objects: false,
            mt_triangle_collision: true,
        }
    }
}

impl TraceOptions {
    /// The same options with debug geometry hidden, for occlusion rays.
    pub fn without_debug(self) -> Self {
        Self {
            show_debug_objects: false,
            ..self
        }
    }
}

/// Finds the nearest hit of a ray against one hierarchy snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Intersector<'a> {
    scene: &'a Scene,
    hierarchy: &'a Hierarchy,
    options: TraceOptions,
}

impl<'a> Intersector<'a> {
    pub fn new(scene: &'a Scene, hierarchy: &'a Hierarchy, options: TraceOptions) -> Self {
        Self {
            scene,
            hierarchy,
            options,
        }
    }

    pub fn options(&self) -> TraceOptions {
        self.options
    }

    /// Same scene and hierarchy, different options.
    pub fn with_options(&self, options: TraceOptions) -> Self {
        Self { options, ..*self }
    }

    /// Nearest hit with `t >= 0`, or a result with no object.
    pub fn intersect(&self, ray: &Ray) -> RayResult<'a> {
        let mut res = RayResult::default();
        self.visit(self.hierarchy.root(), ray, &mut res);
        if self.options.show_debug_objects {
            for object in self.hierarchy.outlines() {
                self.test_object(object, ray, &mut res);
            }
        }
        res
    }

    fn visit(&self, id: NodeId, ray: &Ray, res: &mut RayResult<'a>) {
        let Some(node) = self.hierarchy.node(id) else {
            return;
        };
        if let Some(n) = node.voxel_grid {
            self.walk_grid(node, n, ray, res);
            return;
        }

        // Bi-tree halves tile their parent, so missing the first means
        // entering the second
        let tiled = self.hierarchy.strategy() == Strategy::FixedThreshold;
        let mut first_missed = false;

        for (i, bound) in node.children.iter().enumerate() {
            match bound.target {
                BoundTarget::Object(obj) => {
                    if let Some(object) = self.scene.objects.get(obj) {
                        self.test_object(object, ray, res);
                    }
                }
                BoundTarget::Node(child) => {
                    if self.options.plane_optimisation {
                        let assumed = tiled && i == 1 && first_missed;
                        if !assumed && bound.aabb.slab(ray).is_none() {
                            first_missed = i == 0;
                            continue;
                        }
                    }
                    self.visit(child, ray, res);
                }
            }
        }
    }

    /// Visit grid cells front to back, stopping once the best hit lies
    /// before the far side of the current cell.
    fn walk_grid(&self, node: &Container, n: u32, ray: &Ray, res: &mut RayResult<'a>) {
        let Some(walk) = GridWalk::new(&node.aabb, n, ray) else {
            return;
        };
        for (index, t_exit) in walk {
            if let Some(BoundTarget::Node(cell)) = node.children.get(index).map(|b| b.target) {
                self.visit(cell, ray, res);
            }
            if res.hit() && res.t <= t_exit {
                break;
            }
        }
    }

    fn test_object(&self, object: &'a Object, ray: &Ray, res: &mut RayResult<'a>) {
        if object.debug && !self.options.show_debug_objects {
            return;
        }
        let hit = match &object.shape {
            Shape::Sphere(s) if self.options.spheres => sphere::intersect(s, ray),
            Shape::Cuboid(c) if self.options.cuboids => cuboid::intersect(c, ray),
            Shape::Triangle(t) if self.options.triangles => {
                if self.options.mt_triangle_collision {
                    triangle::intersect_mt(t, ray)
                } else {
                    self.test_triangle_plane(object, t, ray, res);
                    return;
                }
            }
            _ => return,
        };
        if let Some(hit) = hit {
            res.potential_collisions += surface_crossings(&hit);
            res.collisions += 1;
            res.offer(object, ray, hit);
        }
    }

    /// Plane test first; the containment test only runs for a plane hit
    /// that would beat the current best.
    fn test_triangle_plane(
        &self,
        object: &'a Object,
        tri: &Triangle,
        ray: &Ray,
        res: &mut RayResult<'a>,
    ) {
        let normal = tri.visible_normal(ray.direction);
        let Some(t) = triangle::plane_distance(tri, normal, ray) else {
            return;
        };
        if t < 0.0 {
            return;
        }
        res.potential_collisions += 1;
        if t >= res.t {
            return;
        }
        if triangle::contains_projected(tri, normal, ray.at(t)) {
            res.collisions += 1;
            res.offer(object, ray, Hit { t, t_exit: t, normal });
        } else {
            res.potential_collisions -= 1;
        }
    }
}

/// Surfaces ahead of the origin: two for a closed shape entered from
/// outside, one otherwise.
fn surface_crossings(hit: &Hit) -> u32 {
    if hit.t_exit > hit.t {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accel::tests::mixed_scene;
    use crate::accel::{build_hierarchy, AccelConfig};
    use std::sync::Arc;
    use strata_core::{Cuboid, Material, Sphere};
    use strata_math::Vec3;

    fn flat(scene: &Scene) -> Hierarchy {
        Hierarchy::flat(scene).unwrap()
    }

    fn every_strategy() -> Vec<AccelConfig> {
        vec![
            AccelConfig::new(Strategy::EqualCount),
            AccelConfig::new(Strategy::Sah),
            AccelConfig {
                bvh: false,
                ..AccelConfig::new(Strategy::EqualCount)
            },
            AccelConfig {
                bvh: false,
                ..AccelConfig::new(Strategy::Sah)
            },
            AccelConfig {
                depth_limit: 10,
                ..AccelConfig::new(Strategy::FixedThreshold)
            },
            AccelConfig {
                depth_limit: 5,
                ..AccelConfig::new(Strategy::Octree)
            },
            AccelConfig {
                param: 5,
                ..AccelConfig::new(Strategy::VoxelGrid)
            },
        ]
    }

    /// Rays fanned out from a few origins, some inside the scene.
    fn ray_sweep() -> Vec<Ray> {
        let origins = [
            Vec3::new(0.0, 0.0, -30.0),
            Vec3::new(25.0, 3.0, 0.0),
            Vec3::new(0.5, -0.5, 0.2),
        ];
        let mut rays = Vec::new();
        for origin in origins {
            for i in 0..24 {
                for j in 0..12 {
                    let theta = i as f32 / 24.0 * std::f32::consts::TAU;
                    let phi = (j as f32 + 0.5) / 12.0 * std::f32::consts::PI;
                    let dir = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                    rays.push(Ray::new(origin, dir));
                }
            }
            // Aimed straight at the scene centre
            rays.push(Ray::new(origin, -origin));
        }
        rays
    }

    #[test]
    fn test_sphere_hit_through_hierarchy() {
        let mut scene = Scene::new();
        scene
            .add_sphere(Sphere::new(Vec3::ZERO, 1.0), Arc::new(Material::default()))
            .unwrap();
        let tree = flat(&scene);
        let res = Intersector::new(&scene, &tree, TraceOptions::default())
            .intersect(&Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z));

        assert!(res.hit());
        assert!((res.t - 4.0).abs() < 0.001);
        assert!((res.unit_normal - Vec3::new(0.0, 0.0, -1.0)).length() < 0.001);
        assert_eq!(res.potential_collisions, 2);
    }

    #[test]
    fn test_triangle_hit_and_miss_with_both_tests() {
        let mut scene = Scene::new();
        let tri = Triangle::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        scene.add_triangle(tri, Arc::new(Material::default())).unwrap();
        let tree = flat(&scene);

        for mt in [true, false] {
            let options = TraceOptions {
                mt_triangle_collision: mt,
                ..TraceOptions::default()
            };
            let isect = Intersector::new(&scene, &tree, options);

            let res = isect.intersect(&Ray::new(Vec3::new(0.0, 0.3, -5.0), Vec3::Z));
            assert!(res.hit(), "mt={mt}");
            assert!((res.t - 5.0).abs() < 0.001);

            let res = isect.intersect(&Ray::new(Vec3::new(2.0, 0.3, -5.0), Vec3::Z));
            assert!(!res.hit(), "mt={mt}");
            assert_eq!(res.t, f32::INFINITY);
        }
    }

    #[test]
    fn test_plane_test_misses_beside_the_apex() {
        let mut scene = Scene::new();
        let tri = Triangle::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        scene.add_triangle(tri, Arc::new(Material::default())).unwrap();
        let tree = flat(&scene);
        let options = TraceOptions {
            mt_triangle_collision: false,
            ..TraceOptions::default()
        };

        let res = Intersector::new(&scene, &tree, options)
            .intersect(&Ray::new(Vec3::new(-0.5, 1.0, -5.0), Vec3::Z));
        assert!(!res.hit());
        assert_eq!(res.collisions, 0);
    }

    #[test]
    fn test_rejected_plane_hit_is_not_a_potential_collision() {
        let mut scene = Scene::new();
        let tri = Triangle::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        scene.add_triangle(tri, Arc::new(Material::default())).unwrap();
        let tree = flat(&scene);
        let options = TraceOptions {
            mt_triangle_collision: false,
            ..TraceOptions::default()
        };

        let res = Intersector::new(&scene, &tree, options)
            .intersect(&Ray::new(Vec3::new(2.0, 0.3, -5.0), Vec3::Z));
        assert_eq!(res.potential_collisions, 0);
        assert_eq!(res.collisions, 0);
    }

    #[test]
    fn test_shape_toggles_hide_primitives() {
        let mut scene = Scene::new();
        let mat = Arc::new(Material::default());
        scene
            .add_sphere(Sphere::new(Vec3::new(0.0, 0.0, 2.0), 0.5), Arc::clone(&mat))
            .unwrap();
        scene
            .add_cuboid(Cuboid::new(Vec3::new(-1.0, -1.0, 4.0), Vec3::new(1.0, 1.0, 5.0)), mat)
            .unwrap();
        let tree = flat(&scene);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let all = Intersector::new(&scene, &tree, TraceOptions::default()).intersect(&ray);
        assert!((all.t - 1.5).abs() < 0.001);

        let no_spheres = TraceOptions {
            spheres: false,
            ..TraceOptions::default()
        };
        let res = Intersector::new(&scene, &tree, no_spheres).intersect(&ray);
        assert!((res.t - 4.0).abs() < 0.001);

        let nothing = TraceOptions {
            cuboids: false,
            ..no_spheres
        };
        assert!(!Intersector::new(&scene, &tree, nothing).intersect(&ray).hit());
    }

    #[test]
    fn test_scene_debug_objects_stay_out_of_the_hierarchy() {
        let mut scene = Scene::new();
        let mat = Arc::new(Material::default());
        scene
            .add_object(Object::debug(Sphere::new(Vec3::new(0.0, 0.0, 3.0), 1.0), mat))
            .unwrap();
        let tree = flat(&scene);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let hidden = Intersector::new(&scene, &tree, TraceOptions::default());
        assert!(!hidden.intersect(&ray).hit());
        let shown = hidden.with_options(TraceOptions {
            show_debug_objects: true,
            ..TraceOptions::default()
        });
        assert!(!shown.intersect(&ray).hit());
    }

    #[test]
    fn test_outlines_hit_when_shown() {
        let scene = mixed_scene(10);
        let config = AccelConfig {
            outlines: true,
            ..AccelConfig::new(Strategy::EqualCount)
        };
        let tree = build_hierarchy(&scene, &config).unwrap();
        let root = tree.node(tree.root()).unwrap().aabb;
        // Straight down the root's min-x/min-y edge
        let ray = Ray::new(Vec3::new(root.min.x, root.min.y, root.min.z - 5.0), Vec3::Z);

        let hidden = Intersector::new(&scene, &tree, TraceOptions::default()).intersect(&ray);
        let shown = Intersector::new(
            &scene,
            &tree,
            TraceOptions {
                show_debug_objects: true,
                ..TraceOptions::default()
            },
        )
        .intersect(&ray);

        assert!(shown.hit());
        assert!(shown.object.unwrap().debug);
        assert!(hidden.object.map_or(true, |o| !o.debug));
    }

    #[test]
    fn test_hits_are_never_behind_the_origin() {
        let scene = mixed_scene(60);
        let rays = ray_sweep();
        for config in every_strategy() {
            let tree = build_hierarchy(&scene, &config).unwrap();
            for mt in [true, false] {
                let options = TraceOptions {
                    mt_triangle_collision: mt,
                    ..TraceOptions::default()
                };
                let isect = Intersector::new(&scene, &tree, options);
                for ray in &rays {
                    let res = isect.intersect(ray);
                    if res.hit() {
                        assert!(res.t >= 0.0 && res.t.is_finite(), "{}", config.strategy);
                    } else {
                        assert_eq!(res.t, f32::INFINITY);
                    }
                }
            }
        }
    }

    #[test]
    fn test_every_strategy_agrees_with_flat_scene() {
        let scene = mixed_scene(60);
        let reference = flat(&scene);
        let flat_isect = Intersector::new(&scene, &reference, TraceOptions::default());
        let rays = ray_sweep();

        for config in every_strategy() {
            let tree = build_hierarchy(&scene, &config).unwrap();
            let isect = Intersector::new(&scene, &tree, TraceOptions::default());
            for ray in &rays {
                let expected = flat_isect.intersect(ray);
                let got = isect.intersect(ray);
                assert_eq!(expected.hit(), got.hit(), "{} {ray:?}", config.strategy);
                if expected.hit() {
                    assert!(
                        (expected.t - got.t).abs() < 1e-4,
                        "{} {ray:?}: {} vs {}",
                        config.strategy,
                        expected.t,
                        got.t
                    );
                }
            }
        }
    }

    #[test]
    fn test_enclosing_cuboid_survives_subdivision() {
        let mut scene = Scene::new();
        let mat = Arc::new(Material::default());
        scene
            .add_cuboid(Cuboid::new(Vec3::splat(-5.0), Vec3::splat(5.0)), Arc::clone(&mat))
            .unwrap();
        for i in 0..6 {
            let x = if i % 2 == 0 { -3.0 } else { 3.0 };
            let z = -3.0 + 3.0 * (i / 2) as f32;
            scene
                .add_sphere(Sphere::new(Vec3::new(x, -2.0, z), 0.5), Arc::clone(&mat))
                .unwrap();
        }
        let reference = flat(&scene);
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::Y);
        let expected = Intersector::new(&scene, &reference, TraceOptions::default()).intersect(&ray);
        assert!((expected.t - 2.0).abs() < 1e-4);

        let configs = [
            AccelConfig {
                param: 1,
                depth_limit: 3,
                ..AccelConfig::new(Strategy::Octree)
            },
            AccelConfig {
                param: 1,
                ..AccelConfig::new(Strategy::FixedThreshold)
            },
        ];
        for config in configs {
            let tree = build_hierarchy(&scene, &config).unwrap();
            assert!(tree.leaf_objects().contains(&0), "{}", config.strategy);
            assert_eq!(tree.stats().anomalies, 0);

            let got = Intersector::new(&scene, &tree, TraceOptions::default()).intersect(&ray);
            assert!(got.hit(), "{}", config.strategy);
            assert!((got.t - expected.t).abs() < 1e-4, "{}: {}", config.strategy, got.t);
        }
    }

    #[test]
    fn test_plane_optimisation_does_not_change_hits() {
        let scene = mixed_scene(40);
        let tree = build_hierarchy(&scene, &AccelConfig::default()).unwrap();
        let culled = Intersector::new(&scene, &tree, TraceOptions::default());
        let exhaustive = culled.with_options(TraceOptions {
            plane_optimisation: false,
            ..TraceOptions::default()
        });
        for ray in ray_sweep() {
            assert_eq!(culled.intersect(&ray).distance(), exhaustive.intersect(&ray).distance());
        }
    }
}
