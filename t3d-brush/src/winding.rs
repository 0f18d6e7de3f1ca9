use glam::{Vec2, Vec3};

/// Returns indices of `points` ordered around their average, either
/// clockwise or counter-clockwise.
///
/// Points are expected to form a convex polygon; the ordering is by angle, so
/// any collinear points end up next to each other.
pub fn sort_winding_order(points: &[Vec2], clockwise: bool) -> Vec<u32> {
    if points.is_empty() {
        return Vec::new();
    }

    let center =
        points.iter().copied().sum::<Vec2>() / points.len() as f32;

    let angles: Vec<_> = points
        .iter()
        .map(|point| {
            let dir = *point - center;

            dir.y.atan2(dir.x)
        })
        .collect();

    let mut order: Vec<u32> = (0..points.len() as u32).collect();

    order.sort_by(|&a, &b| {
        let (a, b) = (angles[a as usize], angles[b as usize]);

        if clockwise {
            b.total_cmp(&a)
        } else {
            a.total_cmp(&b)
        }
    });

    order
}

/// Orders points lying on a plane with given normal, so that they go
/// clockwise when looking at the plane's front side.
pub fn sort_planar_points(points: &mut [Vec3], normal: Vec3, tangent: Vec3) {
    if points.is_empty() {
        return;
    }

    let binormal = normal.cross(tangent);
    let center = points.iter().copied().sum::<Vec3>() / points.len() as f32;

    let projected: Vec<_> = points
        .iter()
        .map(|point| {
            let point = *point - center;

            Vec2::new(point.dot(tangent), point.dot(binormal))
        })
        .collect();

    let order = sort_winding_order(&projected, true);
    let sorted: Vec<_> =
        order.iter().map(|&idx| points[idx as usize]).collect();

    points.copy_from_slice(&sorted);
}

/// Returns twice the signed area of given polygon; positive for clockwise
/// windings.
pub fn winding_area2(points: &[Vec2]) -> f32 {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p0, p1)| p0.y * p1.x - p0.x * p1.y)
        .sum()
}
