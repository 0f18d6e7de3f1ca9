use glam::{vec2, Vec3};
use t3d_math::{BoundingBox, BoundingSphere};

use crate::{
    Light, Material, MaterialId, Poly, PolyList, RayHit, Scene, SceneObject,
    Topology,
};

/// In-memory scene made of quads; rays are tested against an optional set
/// of occluding boxes.
#[derive(Default)]
pub struct TestScene {
    objects: Vec<TestObject>,
    materials: Vec<Material>,
    lights: Vec<Light>,
    occluders: Vec<(BoundingBox, Option<MaterialId>)>,
}

impl TestScene {
    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.push(material);
        self
    }

    pub fn with_quad(
        mut self,
        points: [Vec3; 4],
        material: MaterialId,
    ) -> Self {
        self.objects.push(TestObject {
            poly_list: PolyList {
                points: points.to_vec(),
                uvs: vec![
                    vec2(0.0, 0.0),
                    vec2(1.0, 0.0),
                    vec2(1.0, 1.0),
                    vec2(0.0, 1.0),
                ],
                polys: vec![Poly {
                    topology: Topology::TriangleFan,
                    material,
                    indices: vec![0, 1, 2, 3],
                }],
            },
        });

        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    pub fn with_occluder(
        mut self,
        bounds: BoundingBox,
        material: Option<MaterialId>,
    ) -> Self {
        self.occluders.push((bounds, material));
        self
    }
}

impl Scene for TestScene {
    fn find_objects(&self, bounds: &BoundingBox) -> Vec<&dyn SceneObject> {
        self.objects
            .iter()
            .filter(|object| {
                let object_bounds: BoundingBox =
                    object.poly_list.points.iter().copied().collect();

                object_bounds.overlaps(bounds)
            })
            .map(|object| object as &dyn SceneObject)
            .collect()
    }

    fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    fn lights(&self) -> &[Light] {
        &self.lights
    }

    fn cast_ray(&self, start: Vec3, end: Vec3) -> Option<RayHit> {
        self.occluders
            .iter()
            .filter_map(|(bounds, material)| {
                let t = bounds.collide_line(start, end)?;

                Some(RayHit {
                    t,
                    point: start + (end - start) * t,
                    material: *material,
                })
            })
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }
}

struct TestObject {
    poly_list: PolyList,
}

impl SceneObject for TestObject {
    fn build_poly_list(
        &self,
        _: &BoundingBox,
        _: &BoundingSphere,
    ) -> Option<PolyList> {
        Some(self.poly_list.clone())
    }
}
