use bevy::prelude::*;

use super::pointer_set::PointerId;
use crate::tools::ray::ray_horizontal_plane;

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    pointer: PointerId,
    /// Horizontal offset from the model origin to the grabbed point.
    offset: Vec2,
}

/// Moves the model across the horizontal plane at its current height.
#[derive(Debug, Default, Clone)]
pub struct DragTranslate {
    state: Option<DragState>,
}

impl DragTranslate {
    pub fn begin(&mut self, pointer: PointerId, grab_point: Vec3, model_position: Vec3) {
        let offset = grab_point - model_position;
        self.state = Some(DragState {
            pointer,
            offset: Vec2::new(offset.x, offset.z),
        });
    }

    pub fn end(&mut self) {
        self.state = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    pub fn pointer(&self) -> Option<PointerId> {
        self.state.map(|s| s.pointer)
    }

    /// New model position for `ray`, keeping the model's height.
    pub fn update(&self, ray: Ray3d, model_position: Vec3) -> Option<Vec3> {
        let state = self.state?;
        let hit = ray_horizontal_plane(ray, model_position.y)?;
        Some(Vec3::new(
            hit.x - state.offset.x,
            model_position.y,
            hit.z - state.offset.y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_ray(x: f32, z: f32) -> Ray3d {
        Ray3d::new(Vec3::new(x, 5.0, z), Dir3::NEG_Y)
    }

    #[test]
    fn drag_keeps_grab_offset_and_height() {
        let mut drag = DragTranslate::default();
        let model = Vec3::new(1.0, 0.3, -2.0);
        drag.begin(PointerId(1), Vec3::new(1.2, 0.8, -2.1), model);

        let moved = drag.update(down_ray(3.2, -4.1), model).expect("ray hits plane");
        assert!((moved - Vec3::new(3.0, 0.3, -4.0)).length() < 1e-5);
    }

    #[test]
    fn no_update_without_active_drag() {
        let drag = DragTranslate::default();
        assert_eq!(drag.update(down_ray(0.0, 0.0), Vec3::ZERO), None);
    }

    #[test]
    fn ray_missing_plane_keeps_position() {
        let mut drag = DragTranslate::default();
        drag.begin(PointerId(1), Vec3::ZERO, Vec3::ZERO);
        let upward = Ray3d::new(Vec3::new(0.0, 1.0, 0.0), Dir3::Y);
        assert_eq!(drag.update(upward, Vec3::ZERO), None);
        drag.end();
        assert!(!drag.is_dragging());
    }
}
