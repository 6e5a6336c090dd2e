use bevy::prelude::*;

/// Host-assigned identifier of one contact (finger, pen or mouse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub i32);

/// Active pointers and their last screen position, in the order they went down.
#[derive(Debug, Default, Clone)]
pub struct PointerSet {
    pointers: Vec<(PointerId, Vec2)>,
}

impl PointerSet {
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Insert or update. Returns `true` when `id` was not tracked before.
    pub fn press(&mut self, id: PointerId, position: Vec2) -> bool {
        if self.update(id, position) {
            return false;
        }
        self.pointers.push((id, position));
        true
    }

    /// Update a tracked pointer. Returns `false` for unknown ids.
    pub fn update(&mut self, id: PointerId, position: Vec2) -> bool {
        match self.pointers.iter_mut().find(|(p, _)| *p == id) {
            Some((_, last)) => {
                *last = position;
                true
            }
            None => false,
        }
    }

    /// Returns `true` when `id` was tracked.
    pub fn release(&mut self, id: PointerId) -> bool {
        let before = self.pointers.len();
        self.pointers.retain(|(p, _)| *p != id);
        self.pointers.len() != before
    }

    /// Distance between the two earliest active pointers.
    pub fn primary_pair_distance(&self) -> Option<f32> {
        match self.pointers.as_slice() {
            [(_, a), (_, b), ..] => Some(a.distance(*b)),
            _ => None,
        }
    }
}
