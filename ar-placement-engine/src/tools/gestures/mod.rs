//! Pinch-to-scale and drag-to-move for the placed model.
//!
//! One [`GestureController`] consumes the whole pointer stream. The active
//! pointer count decides which gesture owns the stream (see [`arbitration`]),
//! so a one-finger drag and a two-finger pinch never act on the model at once.

/// Pointer-count transitions and the gesture that owns each state.
pub mod arbitration;

/// Horizontal-plane drag with a fixed grab offset.
pub mod drag;

/// Two-finger uniform scaling from a recorded baseline.
pub mod pinch;

/// Active pointer bookkeeping.
pub mod pointer_set;

use bevy::prelude::*;

use crate::engine::scene::scene_host::{ArCamera, TargetModel};
use crate::tools::ray::{ray_hits_model, ray_horizontal_plane};
use arbitration::{GestureOwner, next_owner};
use drag::DragTranslate;
use pinch::PinchScale;
use pointer_set::{PointerId, PointerSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Raw pointer event in drawing-surface pixels.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub id: PointerId,
    pub position: Vec2,
    pub phase: PointerPhase,
}

/// The placed model as seen by the gesture controllers.
pub struct GestureTarget<'a> {
    pub model: &'a TargetModel,
    pub transform: &'a mut Transform,
}

#[derive(Resource, Debug, Default)]
pub struct GestureController {
    pointers: PointerSet,
    owner: GestureOwner,
    pinch: PinchScale,
    drag: DragTranslate,
}

impl GestureController {
    pub fn owner(&self) -> GestureOwner {
        self.owner
    }

    pub fn pointers(&self) -> &PointerSet {
        &self.pointers
    }

    pub fn pinch(&self) -> &PinchScale {
        &self.pinch
    }

    pub fn drag(&self) -> &DragTranslate {
        &self.drag
    }

    /// Forget every pointer and any gesture in progress.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Feed one pointer event. `target` is `None` until the model has been placed;
    /// pointers are still tracked so ownership stays consistent.
    pub fn handle(
        &mut self,
        input: &PointerInput,
        camera: Option<(&Transform, &ArCamera)>,
        target: Option<GestureTarget>,
    ) {
        let before = self.pointers.len();
        match input.phase {
            PointerPhase::Move => {
                if self.pointers.update(input.id, input.position) {
                    self.on_move(input, camera, target);
                }
            }
            PointerPhase::Down => {
                if self.pointers.press(input.id, input.position) {
                    self.on_count_change(input, before, camera, target);
                }
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                if self.pointers.release(input.id) {
                    self.on_count_change(input, before, camera, target);
                }
            }
        }
    }

    fn on_count_change(
        &mut self,
        input: &PointerInput,
        before: usize,
        camera: Option<(&Transform, &ArCamera)>,
        target: Option<GestureTarget>,
    ) {
        let after = self.pointers.len();
        let grab = if before == 0 && after == 1 {
            grab_point(camera, target.as_ref(), input.position)
        } else {
            None
        };

        let owner = next_owner(self.owner, before, after, grab.is_some());
        if owner != self.owner {
            debug!("Gesture owner {:?} → {:?}", self.owner, owner);
        }
        self.owner = owner;

        match owner {
            GestureOwner::Drag => {
                if let (Some(grab), Some(target)) = (grab, target) {
                    self.drag.begin(input.id, grab, target.transform.translation);
                }
            }
            GestureOwner::Pinch => {
                self.drag.end();
                if after == 2 {
                    match (self.pointers.primary_pair_distance(), target) {
                        (Some(distance), Some(target)) => {
                            self.pinch.begin(distance, target.transform.scale.x)
                        }
                        _ => self.pinch.clear(),
                    }
                }
            }
            GestureOwner::None | GestureOwner::Suspended => {
                self.drag.end();
                self.pinch.clear();
            }
        }
    }

    fn on_move(
        &mut self,
        input: &PointerInput,
        camera: Option<(&Transform, &ArCamera)>,
        target: Option<GestureTarget>,
    ) {
        let Some(target) = target else {
            return;
        };

        match self.owner {
            GestureOwner::Drag if self.drag.pointer() == Some(input.id) => {
                let Some((camera_transform, camera)) = camera else {
                    return;
                };
                let Some(ray) = camera.viewport_ray(camera_transform, input.position) else {
                    return;
                };
                if let Some(position) = self.drag.update(ray, target.transform.translation) {
                    target.transform.translation = position;
                }
            }
            GestureOwner::Pinch => {
                let scale = self
                    .pointers
                    .primary_pair_distance()
                    .and_then(|distance| self.pinch.scale_for(distance));
                if let Some(scale) = scale {
                    target.transform.scale = Vec3::splat(scale);
                }
            }
            _ => {}
        }
    }
}

/// Where the contact meets the drag plane at the model's height, if the
/// contact lands on the model. Drag updates intersect the same plane, so a
/// contact that does not move leaves the model where it is.
fn grab_point(
    camera: Option<(&Transform, &ArCamera)>,
    target: Option<&GestureTarget>,
    screen: Vec2,
) -> Option<Vec3> {
    let (camera_transform, camera) = camera?;
    let target = target?;
    let bounds = target.model.bounds?;
    let ray = camera.viewport_ray(camera_transform, screen)?;
    ray_hits_model(ray, &*target.transform, &bounds)?;
    ray_horizontal_plane(ray, target.transform.translation.y)
}

pub fn apply_pointer_gestures(
    mut inputs: EventReader<PointerInput>,
    mut controller: ResMut<GestureController>,
    cameras: Query<(&Transform, &ArCamera), Without<TargetModel>>,
    mut models: Query<(&TargetModel, &mut Transform), Without<ArCamera>>,
) {
    let camera = cameras.single().ok();
    for input in inputs.read() {
        let target = models
            .single_mut()
            .ok()
            .filter(|(model, _)| model.placed)
            .map(|(model, transform)| GestureTarget {
                model,
                transform: transform.into_inner(),
            });
        controller.handle(input, camera, target);
    }
}
