use bevy::prelude::*;

/// Ordered phases of one frame. Hit-test polling always precedes rendering.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Session lifecycle, model loading and raw input.
    Input,
    /// Camera pose and surface hit-testing.
    HitTest,
    /// Placement and gestures.
    Interaction,
    /// Push transforms to the renderer.
    Sync,
    /// Draw, then screenshot steps.
    Render,
}

pub fn configure_frame_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            FrameSet::Input,
            FrameSet::HitTest,
            FrameSet::Interaction,
            FrameSet::Sync,
            FrameSet::Render,
        )
            .chain(),
    );
}
