//! AR runtime integration: entry routing, session lifecycle and hit-testing.
//!
//! Everything here talks to the runtime through [`runtime::XrRuntime`], so the
//! state machines run unchanged against the browser runtime and the simulated
//! one used in tests.

/// Per-session hit-test source state machine and reticle updates.
pub mod hit_test;

/// Native-viewer vs WebXR entry path detection.
pub mod platform;

/// Runtime seam consumed by the frame loop.
pub mod runtime;

/// Entry control handling and session start/end bookkeeping.
pub mod session;

use std::marker::PhantomData;

use bevy::prelude::*;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::core::frame_schedule::FrameSet;
use crate::engine::scene::scene_host::sync_camera_pose;
use hit_test::{HitTestTracker, poll_hit_test};
use runtime::XrRuntime;
use session::{
    ArEntryRequested, SessionEnded, SessionPhase, SessionStartFailed, SessionStarted,
    handle_session_ended, handle_session_failures, handle_session_started,
    route_entry_requests,
};

/// Session lifecycle and hit-test polling for runtime `R`.
/// The runtime itself is inserted by the app builder as a non-send resource.
pub struct XrSessionPlugin<R>(PhantomData<fn() -> R>);

impl<R> Default for XrSessionPlugin<R> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<R: XrRuntime> Plugin for XrSessionPlugin<R> {
    fn build(&self, app: &mut App) {
        app.init_resource::<SessionPhase>()
            .insert_non_send_resource(HitTestTracker::<R::HitTestSource>::default())
            .add_event::<ArEntryRequested>()
            .add_event::<SessionStarted>()
            .add_event::<SessionEnded>()
            .add_event::<SessionStartFailed>()
            .add_systems(
                Update,
                (
                    handle_session_failures,
                    handle_session_ended::<R>,
                    handle_session_started::<R>,
                    route_entry_requests,
                )
                    .chain()
                    .in_set(FrameSet::Input)
                    .run_if(resource_exists::<ViewerConfig>),
            )
            .add_systems(
                Update,
                (sync_camera_pose::<R>, poll_hit_test::<R>)
                    .chain()
                    .in_set(FrameSet::HitTest)
                    .run_if(resource_exists::<ViewerConfig>),
            );
    }
}
