/// Which controller receives pointer moves.
///
/// Ownership is reassigned only when the number of active pointers changes:
///
/// ```text
/// 0 → 1        Drag if the contact lands on the placed model, otherwise None
/// n → 2        Pinch, re-baselined; a running drag is cancelled
/// 2 → 3+       Pinch keeps its baseline
/// 2+ → 1       Suspended; the remaining finger moves nothing
/// n → 0        None
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GestureOwner {
    #[default]
    None,
    Drag,
    Pinch,
    Suspended,
}

pub fn next_owner(
    current: GestureOwner,
    before: usize,
    after: usize,
    lands_on_model: bool,
) -> GestureOwner {
    match (before, after) {
        (_, 0) => GestureOwner::None,
        (0, 1) if lands_on_model => GestureOwner::Drag,
        (0, 1) => GestureOwner::None,
        (_, 2) => GestureOwner::Pinch,
        (_, 1) => GestureOwner::Suspended,
        _ => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_contact_on_model_drags() {
        assert_eq!(next_owner(GestureOwner::None, 0, 1, true), GestureOwner::Drag);
        assert_eq!(next_owner(GestureOwner::None, 0, 1, false), GestureOwner::None);
    }

    #[test]
    fn second_contact_takes_over_from_drag() {
        assert_eq!(next_owner(GestureOwner::Drag, 1, 2, false), GestureOwner::Pinch);
        assert_eq!(next_owner(GestureOwner::None, 1, 2, false), GestureOwner::Pinch);
    }

    #[test]
    fn extra_contacts_keep_pinch() {
        assert_eq!(next_owner(GestureOwner::Pinch, 2, 3, false), GestureOwner::Pinch);
        assert_eq!(next_owner(GestureOwner::Pinch, 3, 2, false), GestureOwner::Pinch);
    }

    #[test]
    fn lifting_to_one_finger_suspends() {
        assert_eq!(
            next_owner(GestureOwner::Pinch, 2, 1, true),
            GestureOwner::Suspended
        );
        assert_eq!(next_owner(GestureOwner::Suspended, 1, 0, false), GestureOwner::None);
    }
}
