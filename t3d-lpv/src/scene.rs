use std::path::PathBuf;

use glam::{Vec2, Vec3, Vec4};
use t3d_math::{BoundingBox, BoundingSphere};

pub type MaterialId = usize;

/// World the volume gets baked from.
pub trait Scene {
    /// Returns static objects overlapping given box.
    fn find_objects(&self, bounds: &BoundingBox) -> Vec<&dyn SceneObject>;

    fn material(&self, id: MaterialId) -> Option<&Material>;

    fn lights(&self) -> &[Light];

    /// Casts a ray against static collision geometry, returning the nearest
    /// hit.
    fn cast_ray(&self, start: Vec3, end: Vec3) -> Option<RayHit>;
}

pub trait SceneObject {
    /// Returns this object's collision geometry clipped to given volume, or
    /// `None` if the object has no geometry there.
    fn build_poly_list(
        &self,
        bounds: &BoundingBox,
        sphere: &BoundingSphere,
    ) -> Option<PolyList>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance along the ray, `0.0 ..= 1.0`.
    pub t: f32,
    pub point: Vec3,
    pub material: Option<MaterialId>,
}

/// Polygon soup; polygons index `points` and `uvs` with the same index.
#[derive(Clone, Debug, Default)]
pub struct PolyList {
    pub points: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub polys: Vec<Poly>,
}

#[derive(Clone, Debug)]
pub struct Poly {
    pub topology: Topology,
    pub material: MaterialId,
    pub indices: Vec<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    TriangleList,
    TriangleFan,
    TriangleStrip,
}

impl Poly {
    /// Decomposes this polygon into triangles.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let idx = &self.indices;

        let count = match self.topology {
            Topology::TriangleList => idx.len() / 3,
            Topology::TriangleFan | Topology::TriangleStrip => {
                idx.len().saturating_sub(2)
            }
        };

        (0..count).map(move |i| match self.topology {
            Topology::TriangleList => {
                [idx[3 * i], idx[3 * i + 1], idx[3 * i + 2]]
            }
            Topology::TriangleFan => [idx[0], idx[i + 1], idx[i + 2]],

            // Every other triangle of a strip has its winding flipped
            Topology::TriangleStrip if i % 2 == 0 => {
                [idx[i], idx[i + 1], idx[i + 2]]
            }
            Topology::TriangleStrip => [idx[i + 1], idx[i], idx[i + 2]],
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    diffuse_color: Vec4,
    diffuse_texture: Option<PathBuf>,
    emissive: bool,
    translucent: bool,
}

impl Material {
    pub fn diffuse_color(&self) -> Vec4 {
        self.diffuse_color
    }

    pub fn with_diffuse_color(mut self, diffuse_color: Vec4) -> Self {
        self.diffuse_color = diffuse_color;
        self
    }

    pub fn diffuse_texture(&self) -> Option<&PathBuf> {
        self.diffuse_texture.as_ref()
    }

    pub fn with_diffuse_texture(
        mut self,
        diffuse_texture: Option<PathBuf>,
    ) -> Self {
        self.diffuse_texture = diffuse_texture;
        self
    }

    pub fn is_emissive(&self) -> bool {
        self.emissive
    }

    pub fn with_emissive(mut self, emissive: bool) -> Self {
        self.emissive = emissive;
        self
    }

    /// Translucent surfaces don't cast shadows.
    pub fn is_translucent(&self) -> bool {
        self.translucent
    }

    pub fn with_translucent(mut self, translucent: bool) -> Self {
        self.translucent = translucent;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_color: Vec4::ONE,
            diffuse_texture: None,
            emissive: false,
            translucent: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    Point {
        position: Vec3,
        color: Vec3,
        range: f32,

        /// Constant, linear and quadratic falloff weights; they don't have
        /// to be normalized.
        attenuation_ratio: Vec3,
    },

    /// Not supported by the baker yet, skipped during injection.
    Spot {
        position: Vec3,
        direction: Vec3,
        color: Vec3,
        range: f32,
    },

    Directional {
        direction: Vec3,
        color: Vec3,
        brightness: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(topology: Topology, count: u32) -> Poly {
        Poly {
            topology,
            material: 0,
            indices: (0..count).collect(),
        }
    }

    #[test]
    fn triangles() {
        let target: Vec<_> =
            poly(Topology::TriangleList, 7).triangles().collect();

        assert_eq!(vec![[0, 1, 2], [3, 4, 5]], target);

        let target: Vec<_> =
            poly(Topology::TriangleFan, 5).triangles().collect();

        assert_eq!(vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]], target);

        let target: Vec<_> =
            poly(Topology::TriangleStrip, 5).triangles().collect();

        assert_eq!(vec![[0, 1, 2], [2, 1, 3], [2, 3, 4]], target);

        assert_eq!(0, poly(Topology::TriangleFan, 2).triangles().count());
    }
}
