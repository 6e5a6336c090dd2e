//! User-facing interaction with the target model.
//!
//! ## Frame order
//!
//! ```text
//! FrameSet::Interaction
//!   ├─> place_on_select         (SelectEvent → copy reticle position onto model)
//!   └─> apply_pointer_gestures  (PointerInput → pinch scale / drag translate)
//! FrameSet::Render
//!   └─> render_frame
//!       └─> export_screenshot   (ScreenshotRequested → hide, capture next frame, show)
//! ```
//!
//! Placement runs before gestures so a tap that places the model in a frame
//! cannot also start a drag against the model's old position.

/// Pinch and drag gesture controllers with pointer-count arbitration.
pub mod gestures;

/// Select-to-place on the surface under the reticle.
pub mod placement;

/// Ray picking against model bounds and the horizontal drag plane.
pub mod ray;

/// Frame capture to a downloaded PNG.
pub mod screenshot;

use bevy::prelude::*;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::core::frame_schedule::FrameSet;
use crate::engine::scene::scene_host::render_frame;
use gestures::{GestureController, PointerInput, apply_pointer_gestures};
use placement::{SelectEvent, place_on_select};
use screenshot::{ScreenshotExporter, ScreenshotRequested, export_screenshot};

pub struct InteractionToolsPlugin;

impl Plugin for InteractionToolsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GestureController>()
            .init_resource::<ScreenshotExporter>()
            .add_event::<SelectEvent>()
            .add_event::<PointerInput>()
            .add_event::<ScreenshotRequested>()
            .add_systems(
                Update,
                (place_on_select, apply_pointer_gestures)
                    .chain()
                    .in_set(FrameSet::Interaction)
                    .run_if(resource_exists::<ViewerConfig>),
            )
            .add_systems(
                Update,
                export_screenshot
                    .after(render_frame)
                    .in_set(FrameSet::Render)
                    .run_if(resource_exists::<ViewerConfig>),
            );
    }
}
