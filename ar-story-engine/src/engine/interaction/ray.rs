use bevy::prelude::*;

/// Distance along `ray` to an oriented box, given as a local-space centre and
/// half extents under `xf`.
pub fn ray_hits_obb(ray: Ray3d, xf: &GlobalTransform, center: Vec3, half_extents: Vec3) -> Option<f32> {
    let world_from_local = xf.affine();
    let local_from_world = world_from_local.inverse();
    let origin = local_from_world.transform_point3(ray.origin);
    let direction = local_from_world.transform_vector3(*ray.direction);
    let t = ray_aabb_hit_t(origin, direction, center - half_extents, center + half_extents)?;

    // Report the distance in world units, the local direction may be scaled.
    let local_hit = origin + direction * t;
    Some(ray.origin.distance(world_from_local.transform_point3(local_hit)))
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = ray_direction.map(|d| if d != 0.0 { 1.0 / d } else { f32::INFINITY });

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let (lo, hi) = (min[axis], max[axis]);
        let o = ray_origin[axis];
        if inv[axis].is_infinite() {
            // Parallel to this slab: miss unless the origin lies between the planes.
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let mut t0 = (lo - o) * inv[axis];
        let mut t1 = (hi - o) * inv[axis];
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}
