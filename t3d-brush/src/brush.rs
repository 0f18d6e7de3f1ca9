use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use log::debug;
use t3d_math::{BoundingBox, Plane, Vec3Ext};

use crate::{BrushGeometry, Face, Polyhedron};

/// Oriented plane bounding a brush; `position` lies on the plane and
/// `normal` points outside the brush.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
}

impl Surface {
    pub fn new(position: Vec3, normal: Vec3, tangent: Vec3) -> Self {
        Self {
            position,
            normal,
            tangent,
        }
    }

    /// Creates a surface from plane, picking an arbitrary tangent.
    pub fn from_plane(plane: Plane) -> Self {
        Self::new(plane.position(), plane.normal(), plane.normal().tangent())
    }

    pub fn plane(&self) -> Plane {
        Plane::from_point_normal(self.position, self.normal)
    }
}

/// Convex brush described by its surfaces.
#[derive(Clone, Debug, Default)]
pub struct Brush {
    surfaces: Vec<Surface>,
    planes: Vec<Plane>,
    geometry: BrushGeometry,
    bounds: BoundingBox,
}

impl Brush {
    pub fn new(surfaces: Vec<Surface>) -> Self {
        let mut this = Self {
            surfaces,
            ..Default::default()
        };

        this.update_geometry();
        this
    }

    /// Creates a unit cube centered at `center`.
    pub fn cube(center: Vec3) -> Self {
        const SURFACES: [(Vec3, Vec3); 6] = [
            (Vec3::Z, Vec3::X),
            (Vec3::NEG_Z, Vec3::NEG_X),
            (Vec3::Y, Vec3::X),
            (Vec3::NEG_Y, Vec3::NEG_X),
            (Vec3::NEG_X, Vec3::Y),
            (Vec3::X, Vec3::NEG_Y),
        ];

        Self::new(
            SURFACES
                .into_iter()
                .map(|(normal, tangent)| {
                    Surface::new(center + normal * 0.5, normal, tangent)
                })
                .collect(),
        )
    }

    pub fn from_planes(planes: impl IntoIterator<Item = Plane>) -> Self {
        Self::new(planes.into_iter().map(Surface::from_plane).collect())
    }

    pub fn from_polyhedron(polyhedron: &Polyhedron) -> Self {
        Self::from_planes(polyhedron.planes.iter().copied())
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn geometry(&self) -> &BrushGeometry {
        &self.geometry
    }

    pub fn faces(&self) -> &[Face] {
        &self.geometry.faces
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.faces.is_empty()
    }

    /// Replaces surfaces and regenerates the geometry.
    pub fn set_surfaces(&mut self, surfaces: Vec<Surface>) {
        self.surfaces = surfaces;
        self.update_geometry();
    }

    /// Regenerates points and faces out of the surfaces.
    ///
    /// Afterwards, every surface that ended up producing a face gets moved
    /// onto that face's centroid.
    pub fn update_geometry(&mut self) {
        self.planes = self.surfaces.iter().map(Surface::plane).collect();

        let tangents: Vec<_> =
            self.surfaces.iter().map(|surface| surface.tangent).collect();

        self.geometry = BrushGeometry::generate(&self.planes, &tangents);

        for face in &self.geometry.faces {
            self.surfaces[face.id].position = face.centroid;
        }

        self.planes = self.surfaces.iter().map(Surface::plane).collect();
        self.update_bounds();
    }

    fn update_bounds(&mut self) {
        if self.geometry.points.is_empty() {
            return;
        }

        let (center, area) = self.geometry.faces.iter().fold(
            (Vec3::ZERO, 0.0),
            |(center, area), face| {
                (center + face.centroid * face.area, area + face.area)
            },
        );

        if area == 0.0 {
            debug!("Not updating bounds of a brush with no area");
            return;
        }

        let center = center / area;

        self.bounds = self
            .geometry
            .points
            .iter()
            .fold(BoundingBox::new(center, center), |bounds, point| {
                bounds + *point
            });
    }

    /// Returns the nearest face hit by segment `start..end`.
    ///
    /// Faces are one-sided, so segments going out of the brush don't hit
    /// anything.
    pub fn cast_ray(&self, start: Vec3, end: Vec3) -> Option<BrushHit> {
        let dir = (end - start).normalize_or_zero();
        let mut hit: Option<BrushHit> = None;

        for face in &self.geometry.faces {
            if dir.dot(face.normal) >= 0.0 {
                continue;
            }

            let Some(t) = face.plane().intersect_segment(start, end) else {
                continue;
            };

            if t < 0.0 || t > 1.0 || hit.is_some_and(|hit| hit.t <= t) {
                continue;
            }

            let point = start + (end - start) * t;

            let inside = face
                .triangle_points(&self.geometry.points)
                .any(|triangle| contains_point(triangle, point));

            if inside {
                hit = Some(BrushHit {
                    t,
                    point,
                    face: face.id,
                    normal: face.normal,
                });
            }
        }

        hit
    }

    /// Builds vertex and index buffers for rendering.
    pub fn build_mesh(&self) -> BrushMesh {
        let mut mesh = BrushMesh::default();

        for face in &self.geometry.faces {
            let base = mesh.vertices.len() as u32;

            mesh.vertices.extend(face.points.iter().zip(&face.texcoords).map(
                |(&idx, &uv)| BrushVertex {
                    position: self.geometry.points[idx as usize],
                    normal: face.normal,
                    tangent: face.tangent,
                    uv,
                },
            ));

            mesh.indices.extend(
                face.triangles
                    .iter()
                    .flat_map(|triangle| triangle.indices())
                    .map(|idx| base + idx),
            );
        }

        mesh
    }
}

/// Checks whether `point`, lying on the triangle's plane, is inside the
/// triangle.
fn contains_point([t0, t1, t2]: [Vec3; 3], point: Vec3) -> bool {
    let v0 = t2 - t0;
    let v1 = t1 - t0;
    let v2 = point - t0;

    let dot00 = v0.dot(v0);
    let dot01 = v0.dot(v1);
    let dot02 = v0.dot(v2);
    let dot11 = v1.dot(v1);
    let dot12 = v1.dot(v2);

    let denom = dot00 * dot11 - dot01 * dot01;

    if denom == 0.0 {
        return false;
    }

    let u = (dot11 * dot02 - dot01 * dot12) / denom;
    let v = (dot00 * dot12 - dot01 * dot02) / denom;

    u >= 0.0 && v >= 0.0 && u + v < 1.0
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushHit {
    /// Distance along the ray, `0.0 ..= 1.0`.
    pub t: f32,
    pub point: Vec3,

    /// Index of the surface that's been hit.
    pub face: usize,
    pub normal: Vec3,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BrushVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub uv: Vec2,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrushMesh {
    pub vertices: Vec<BrushVertex>,
    pub indices: Vec<u32>,
}

impl BrushMesh {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
