use glam::{UVec3, Vec2, Vec3, Vec4};
use log::{debug, info};
use t3d_math::{lerp, BoundingBox, Plane, Side};

use crate::{MaterialId, Scene, TextureCache, VoxelGrid};

/// Distance within which a plane crossing is considered to lie on one of the
/// voxel edge's ends.
const ENDPOINT_EPSILON: f32 = 1e-5;

/// Static geometry occupying a voxel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeometryVoxel {
    pub color: Vec4,
    pub emissive: bool,
}

impl GeometryVoxel {
    pub fn is_occupied(&self) -> bool {
        self.color != Vec4::ZERO
    }
}

/// World-space triangle collected from the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub positions: [Vec3; 3],
    pub uvs: [Vec2; 3],
    pub material: MaterialId,
}

impl Triangle {
    pub fn plane(&self) -> Plane {
        let [a, b, c] = self.positions;

        Plane::from_points(a, b, c)
    }

    /// Returns twice the area of this triangle.
    pub fn area2(&self) -> f32 {
        let [a, b, c] = self.positions;

        (b - a).cross(c - a).length()
    }

    pub fn bounds(&self) -> BoundingBox {
        self.positions.into_iter().collect()
    }

    fn edges(&self) -> [(usize, usize); 3] {
        [(0, 1), (1, 2), (2, 0)]
    }
}

/// Gathers triangles of every static object overlapping the grid.
pub fn collect_triangles(
    scene: &dyn Scene,
    bounds: &BoundingBox,
) -> Vec<Triangle> {
    let sphere = bounds.bounding_sphere();
    let mut triangles = Vec::new();

    for object in scene.find_objects(bounds) {
        let Some(poly_list) = object.build_poly_list(bounds, &sphere) else {
            continue;
        };

        for poly in &poly_list.polys {
            for [i0, i1, i2] in poly.triangles() {
                let [i0, i1, i2] = [i0 as usize, i1 as usize, i2 as usize];

                let (Some(&p0), Some(&p1), Some(&p2)) = (
                    poly_list.points.get(i0),
                    poly_list.points.get(i1),
                    poly_list.points.get(i2),
                ) else {
                    debug!("Skipping polygon with out-of-bounds indices");
                    continue;
                };

                let uv = |idx: usize| {
                    poly_list.uvs.get(idx).copied().unwrap_or_default()
                };

                triangles.push(Triangle {
                    positions: [p0, p1, p2],
                    uvs: [uv(i0), uv(i1), uv(i2)],
                    material: poly.material,
                });
            }
        }
    }

    triangles
}

/// Fills `grid` with the static geometry of `scene`.
///
/// Triangles are processed in order and later triangles overwrite voxels
/// written by earlier ones.
pub fn voxelize(
    scene: &dyn Scene,
    textures: &mut TextureCache,
    grid: &mut VoxelGrid<GeometryVoxel>,
) {
    let bounds = grid.bounds();
    let triangles = collect_triangles(scene, &bounds);

    info!(
        "Voxelizing; triangles={}, voxels={}",
        triangles.len(),
        grid.size()
    );

    if grid.is_empty() {
        return;
    }

    for triangle in &triangles {
        // Triangles that merely cross the volume without having any vertex
        // inside of it are not voxelized
        if !triangle.positions.iter().any(|&p| bounds.contains(p)) {
            continue;
        }

        voxelize_triangle(scene, textures, grid, triangle);
    }
}

fn voxelize_triangle(
    scene: &dyn Scene,
    textures: &mut TextureCache,
    grid: &mut VoxelGrid<GeometryVoxel>,
    triangle: &Triangle,
) {
    if triangle.area2() <= f32::EPSILON {
        debug!("Skipping degenerate triangle: {:?}", triangle.positions);
        return;
    }

    let Some(material) = scene.material(triangle.material) else {
        debug!("Skipping triangle with unknown material {}", triangle.material);
        return;
    };

    let plane = triangle.plane();
    let tri_bounds = triangle.bounds();
    let min = grid.clamped_voxel(tri_bounds.min());
    let max = grid.clamped_voxel(tri_bounds.max());

    for z in min.z..=max.z {
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let voxel = UVec3::new(x, y, z);
                let voxel_bounds = grid.voxel_bounds(voxel);

                let Some(uv) = classify(triangle, &plane, &voxel_bounds) else {
                    continue;
                };

                let color = material
                    .diffuse_texture()
                    .and_then(|path| textures.sample(path, uv))
                    .unwrap_or_else(|| material.diffuse_color());

                grid[voxel] = GeometryVoxel {
                    color,
                    emissive: material.is_emissive(),
                };
            }
        }
    }
}

/// Checks whether `triangle` passes through given voxel and, if so, returns
/// the UV at which the voxel's color should be sampled.
fn classify(
    triangle: &Triangle,
    plane: &Plane,
    voxel: &BoundingBox,
) -> Option<Vec2> {
    if plane.which_side_box(voxel) != Side::On {
        return None;
    }

    // Stage 1: one of the triangle's vertices is inside the voxel
    for (position, uv) in triangle.positions.iter().zip(triangle.uvs) {
        if voxel.contains(*position) {
            return Some(uv);
        }
    }

    // Stage 2: one of the triangle's edges passes through the voxel
    for (a, b) in triangle.edges() {
        let (pa, pb) = (triangle.positions[a], triangle.positions[b]);

        if let Some(t) = voxel.collide_line(pa, pb) {
            return Some(lerp(triangle.uvs[a], triangle.uvs[b], t));
        }
    }

    // Stage 3: the triangle cuts through the voxel's interior, crossing some
    // of its edges
    let [p0, p1, p2] = triangle.positions;
    let area = triangle.area2();

    for (start, end) in voxel.edges() {
        let Some((clip_start, clip_end)) = plane.clip_segment(start, end) else {
            continue;
        };

        let point = if clip_start != start {
            clip_start
        } else if clip_end != end {
            clip_end
        } else {
            continue;
        };

        // Edges merely touching the plane with one of their ends don't count
        if point.abs_diff_eq(start, ENDPOINT_EPSILON)
            || point.abs_diff_eq(end, ENDPOINT_EPSILON)
        {
            continue;
        }

        let a0 = (p1 - point).cross(p2 - point).length();
        let a1 = (p2 - point).cross(p0 - point).length();
        let a2 = (p0 - point).cross(p1 - point).length();

        if a0 + a1 + a2 > area * 1.001 {
            continue;
        }

        let [uv0, uv1, uv2] = triangle.uvs;

        return Some((uv0 * a0 + uv1 * a1 + uv2 * a2) / area);
    }

    None
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec3, vec2, vec3, vec4};
    use image::{Rgba, RgbaImage};

    use super::*;
    use crate::test_scene::TestScene;
    use crate::Material;

    fn triangle(positions: [Vec3; 3]) -> Triangle {
        Triangle {
            positions,
            uvs: [vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0)],
            material: 0,
        }
    }

    fn grid() -> VoxelGrid<GeometryVoxel> {
        VoxelGrid::new(BoundingBox::new(Vec3::ZERO, Vec3::splat(4.0)), 1.0)
    }

    #[test]
    fn classify_vertex_inside() {
        let target = triangle([
            vec3(0.5, 0.5, 0.5),
            vec3(3.5, 0.5, 0.5),
            vec3(0.5, 3.5, 0.5),
        ]);

        let voxel = BoundingBox::new(vec3(3.0, 0.0, 0.0), vec3(4.0, 1.0, 1.0));

        assert_eq!(
            Some(vec2(1.0, 0.0)),
            classify(&target, &target.plane(), &voxel)
        );
    }

    #[test]
    fn classify_edge_crossing() {
        let target = triangle([
            vec3(0.5, 0.5, 0.5),
            vec3(3.5, 0.5, 0.5),
            vec3(0.5, 3.5, 0.5),
        ]);

        let voxel = BoundingBox::new(vec3(1.0, 0.0, 0.0), vec3(2.0, 1.0, 1.0));
        let uv = classify(&target, &target.plane(), &voxel).unwrap();

        // The first edge enters the voxel at x=1.0, i.e. 1/6th of the way
        assert_relative_eq!(uv.x, 1.0 / 6.0, epsilon = 1e-5);
        assert_relative_eq!(uv.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn classify_interior_crossing() {
        // Large triangle passing through the voxel with neither vertices nor
        // edges touching it
        let target = triangle([
            vec3(-10.0, -10.0, 1.5),
            vec3(30.0, -10.0, 1.5),
            vec3(-10.0, 30.0, 1.5),
        ]);

        let voxel = BoundingBox::new(Vec3::ONE, Vec3::splat(2.0));
        let uv = classify(&target, &target.plane(), &voxel).unwrap();

        assert!(uv.x > 0.0 && uv.y > 0.0 && uv.x + uv.y < 1.0);
    }

    #[test]
    fn classify_triangle_on_voxel_face() {
        // Large triangle lying exactly on the boundary between two voxels
        let target = triangle([
            vec3(-10.0, -10.0, 1.0),
            vec3(30.0, -10.0, 1.0),
            vec3(-10.0, 30.0, 1.0),
        ]);

        let above = BoundingBox::new(Vec3::ONE, Vec3::splat(2.0));
        let below = BoundingBox::new(vec3(1.0, 1.0, 0.0), vec3(2.0, 2.0, 1.0));

        assert_eq!(None, classify(&target, &target.plane(), &above));
        assert_eq!(None, classify(&target, &target.plane(), &below));
    }

    #[test]
    fn classify_miss() {
        let target = triangle([
            vec3(0.5, 0.5, 0.5),
            vec3(3.5, 0.5, 0.5),
            vec3(0.5, 3.5, 0.5),
        ]);

        // Box away from the triangle's plane
        let voxel = BoundingBox::new(vec3(0.0, 0.0, 2.0), vec3(1.0, 1.0, 3.0));

        assert_eq!(None, classify(&target, &target.plane(), &voxel));

        // Box on the triangle's plane, but past its hypotenuse
        let voxel = BoundingBox::new(vec3(3.0, 3.0, 0.0), vec3(4.0, 4.0, 1.0));

        assert_eq!(None, classify(&target, &target.plane(), &voxel));
    }

    #[test]
    fn voxelize_floor() {
        let red = vec4(1.0, 0.0, 0.0, 1.0);

        let scene = TestScene::default()
            .with_material(Material::default().with_diffuse_color(red))
            .with_quad(
                [
                    vec3(0.1, 0.1, 1.5),
                    vec3(3.9, 0.1, 1.5),
                    vec3(3.9, 3.9, 1.5),
                    vec3(0.1, 3.9, 1.5),
                ],
                0,
            );

        let mut target = grid();

        voxelize(&scene, &mut TextureCache::default(), &mut target);

        for (voxel, value) in target.iter() {
            if voxel.z == 1 {
                assert_eq!(red, value.color, "voxel {voxel}");
                assert!(!value.emissive);
            } else {
                assert!(!value.is_occupied(), "voxel {voxel}");
            }
        }
    }

    #[test]
    fn voxelize_samples_textures() {
        let mut image = RgbaImage::new(1, 1);

        image.put_pixel(0, 0, Rgba([0, 255, 0, 255]));

        let mut textures = TextureCache::default();

        textures.insert("grass.png", image);

        let scene = TestScene::default()
            .with_material(
                Material::default()
                    .with_diffuse_texture(Some("grass.png".into()))
                    .with_emissive(true),
            )
            .with_quad(
                [
                    vec3(2.2, 2.2, 2.5),
                    vec3(2.8, 2.2, 2.5),
                    vec3(2.8, 2.8, 2.5),
                    vec3(2.2, 2.8, 2.5),
                ],
                0,
            );

        let mut target = grid();

        voxelize(&scene, &mut textures, &mut target);

        assert_eq!(
            GeometryVoxel {
                color: vec4(0.0, 1.0, 0.0, 1.0),
                emissive: true,
            },
            target[uvec3(2, 2, 2)]
        );

        assert_eq!(
            1,
            target.voxels().iter().filter(|v| v.is_occupied()).count()
        );
    }

    #[test]
    fn voxelize_skips_triangles_outside() {
        // Crosses the whole volume, but none of its vertices is inside
        let scene = TestScene::default()
            .with_material(Material::default())
            .with_quad(
                [
                    vec3(-10.0, -10.0, 1.5),
                    vec3(10.0, -10.0, 1.5),
                    vec3(10.0, 10.0, 1.5),
                    vec3(-10.0, 10.0, 1.5),
                ],
                0,
            );

        let mut target = grid();

        voxelize(&scene, &mut TextureCache::default(), &mut target);

        assert!(target.voxels().iter().all(|v| !v.is_occupied()));
    }
}
