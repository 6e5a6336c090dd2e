use bevy::math::primitives::InfinitePlane3d;
use bevy::prelude::*;

use crate::engine::assets::model_bounds::ModelBounds;

/// Distance along `ray` to the model's bounding box, tested in model-local space.
pub fn ray_hits_model(ray: Ray3d, transform: &Transform, bounds: &ModelBounds) -> Option<f32> {
    // A zero scale axis makes the inverse singular.
    if transform.scale.abs().min_element() <= f32::EPSILON {
        return None;
    }
    let inv = transform.compute_matrix().inverse();
    let o_local = inv.transform_point3(ray.origin);
    let d_local = inv.transform_vector3(*ray.direction);
    let t_local = ray_aabb_hit_t(o_local, d_local, bounds.min, bounds.max)?;

    let hit_world = transform
        .compute_matrix()
        .transform_point3(o_local + d_local * t_local);
    Some(hit_world.distance(ray.origin))
}

/// Intersection of `ray` with the horizontal plane at `height`.
pub fn ray_horizontal_plane(ray: Ray3d, height: f32) -> Option<Vec3> {
    let origin = Vec3::new(0.0, height, 0.0);
    let distance = ray.intersect_plane(origin, InfinitePlane3d::new(Vec3::Y))?;
    Some(ray.get_point(distance))
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let (o, d) = (ray_origin[axis], ray_direction[axis]);
        if d == 0.0 {
            // Parallel to this slab: inside or never.
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (mut t0, mut t1) = ((min[axis] - o) * inv, (max[axis] - o) * inv);
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
