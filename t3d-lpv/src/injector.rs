use glam::{UVec3, Vec3, Vec4Swizzles};
use log::{debug, info, warn};
use t3d_math::{F32Ext, Vec3Ext, AXIS_DIRECTIONS};

use crate::{GeometryVoxel, Light, LpvConfig, Scene, ShVoxel, VoxelGrid};

/// How far away directional lights get placed when casting shadow rays.
pub const SUN_DISTANCE: f32 = 10000.0;

/// Computes direct lighting of every occupied voxel of `geometry`, writing
/// it into `direct`.
///
/// Does nothing if both grids differ in size.
pub fn inject(
    scene: &dyn Scene,
    config: &LpvConfig,
    geometry: &VoxelGrid<GeometryVoxel>,
    direct: &mut VoxelGrid<ShVoxel>,
) {
    info!(
        "Injecting lights; lights={}, voxels={}",
        scene.lights().len(),
        geometry.size()
    );

    if geometry.size() != direct.size() {
        warn!(
            "Can't inject lights into a grid of different size; \
             geometry={}, direct={}",
            geometry.size(),
            direct.size()
        );

        return;
    }

    if scene
        .lights()
        .iter()
        .any(|light| matches!(light, Light::Spot { .. }))
    {
        debug!("Spot lights are not supported yet, skipping them");
    }

    direct.clear();

    for (voxel, geometry_voxel) in geometry.iter() {
        if !geometry_voxel.is_occupied() {
            continue;
        }

        let color = geometry_voxel.color.xyz();
        let mut sh = ShVoxel::ZERO;

        if geometry_voxel.emissive {
            sh += ShVoxel::encode(
                Vec3::ZERO,
                color * config.emissive_intensity(),
            );
        }

        for light in scene.lights() {
            if let Some(light) =
                light_contribution(scene, config, geometry, voxel, color, light)
            {
                sh += light;
            }
        }

        direct[voxel] = sh;
    }
}

fn light_contribution(
    scene: &dyn Scene,
    config: &LpvConfig,
    geometry: &VoxelGrid<GeometryVoxel>,
    voxel: UVec3,
    voxel_color: Vec3,
    light: &Light,
) -> Option<ShVoxel> {
    let sample = geometry.voxel_center(voxel);

    let (light_pos, color) = match light {
        Light::Point {
            position,
            color,
            range,
            attenuation_ratio,
        } => {
            let atten = point_attenuation(
                *position,
                *range,
                *attenuation_ratio,
                sample,
            )?;

            (
                *position,
                voxel_color * *color * atten * config.light_intensity(),
            )
        }

        Light::Directional {
            direction,
            color,
            brightness,
        } => (
            sample - direction.normalize_or_zero() * SUN_DISTANCE,
            voxel_color * *color * *brightness,
        ),

        Light::Spot { .. } => {
            return None;
        }
    };

    if is_occluded(scene, sample, light_pos) {
        return None;
    }

    let incoming = (sample - light_pos).normalize_or_zero();

    let normal = surface_normal(
        geometry,
        voxel,
        incoming,
        config.cull_buried_faces(),
    );

    Some(ShVoxel::encode(incoming.reflect(normal), color))
}

/// Evaluates point light's falloff at given point; returns `None` when the
/// point receives no light.
///
/// `ratio` holds the constant, linear and quadratic weights of the falloff.
pub fn point_attenuation(
    light_pos: Vec3,
    range: f32,
    ratio: Vec3,
    point: Vec3,
) -> Option<f32> {
    if range <= 0.0 {
        return None;
    }

    let total = ratio.x + ratio.y + ratio.z;
    let ratio = if total > 0.0 { ratio / total } else { ratio };
    let dist = light_pos.distance(point);

    let atten =
        1.0 - (dist / range * ratio.y + dist.sqr() / range.sqr() * ratio.z);

    if atten > 0.0 {
        Some(atten)
    } else {
        None
    }
}

fn is_occluded(scene: &dyn Scene, from: Vec3, to: Vec3) -> bool {
    let Some(hit) = scene.cast_ray(from, to) else {
        return false;
    };

    hit.material
        .and_then(|material| scene.material(material))
        .map_or(true, |material| !material.is_translucent())
}

/// Picks the voxel's face that's most directly facing light coming along
/// `incoming`.
///
/// With `cull_buried` set, faces whose neighbouring voxel is occupied are
/// skipped, unless there are no other faces left.
pub fn surface_normal(
    geometry: &VoxelGrid<GeometryVoxel>,
    voxel: UVec3,
    incoming: Vec3,
    cull_buried: bool,
) -> Vec3 {
    let is_exposed = |dir: &Vec3| {
        !cull_buried
            || !geometry
                .get(voxel.as_ivec3() + dir.as_ivec3())
                .is_some_and(|neighbour| neighbour.is_occupied())
    };

    most_opposed(AXIS_DIRECTIONS.into_iter().filter(is_exposed), incoming)
        .or_else(|| most_opposed(AXIS_DIRECTIONS.into_iter(), incoming))
        .unwrap_or(Vec3::Z)
}

fn most_opposed(
    dirs: impl Iterator<Item = Vec3>,
    incoming: Vec3,
) -> Option<Vec3> {
    dirs.min_by(|a, b| a.dot(incoming).total_cmp(&b.dot(incoming)))
}
