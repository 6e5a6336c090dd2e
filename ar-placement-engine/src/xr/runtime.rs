use bevy::prelude::*;

/// Identifies one hit-test source request.
///
/// The tracker hands a ticket to the runtime with every request and only accepts
/// a resolved source carrying the ticket it is currently waiting on, so a request
/// issued during an earlier session can never land in a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceTicket {
    pub(crate) generation: u32,
}

/// Camera pose and projection reported by the runtime for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerPose {
    pub transform: Mat4,
    pub projection: Mat4,
}

/// The host AR runtime as seen from the frame loop.
///
/// All requests are fire-and-forget. Results are handed back on a later frame
/// through [`XrRuntime::take_resolved_source`]; nothing here may block the
/// frame callback.
pub trait XrRuntime: 'static {
    /// Opaque handle to a runtime hit-test source.
    type HitTestSource: 'static;

    /// Whether an immersive session is currently running.
    fn session_active(&self) -> bool;

    /// Request a reference space and then a hit-test source from it.
    /// Failures are logged by the runtime and the ticket is never resolved.
    fn request_hit_test_source(&mut self, ticket: SourceTicket);

    /// Next source whose request resolved since the last call, if any.
    fn take_resolved_source(&mut self) -> Option<(SourceTicket, Self::HitTestSource)>;

    /// Ray-surface intersection poses for `source` in the current frame,
    /// closest-ranked first.
    fn hit_test_poses(&self, source: &Self::HitTestSource) -> Vec<Mat4>;

    /// Viewer pose for the current frame, if the runtime is tracking.
    fn viewer_pose(&self) -> Option<ViewerPose>;

    /// Give a source back to the runtime once it is no longer tracked.
    fn release_source(&mut self, source: Self::HitTestSource) {
        drop(source);
    }
}

#[cfg(test)]
pub mod simulated {
    //! Deterministic in-memory runtime used by the unit tests.

    use super::*;
    use std::cell::Cell;
    use std::collections::VecDeque;

    /// Handle type handed out by [`SimulatedRuntime`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SimulatedSource(pub u32);

    #[derive(Default)]
    pub struct SimulatedRuntime {
        pub active: bool,
        /// Tickets the tracker asked for, in order.
        pub requested: Vec<SourceTicket>,
        /// Sources ready to be handed back on the next poll.
        pub resolved: VecDeque<(SourceTicket, SimulatedSource)>,
        /// Poses returned for every source in the current frame.
        pub poses: Vec<Mat4>,
        pub viewer: Option<ViewerPose>,
        pub released: Vec<SimulatedSource>,
        /// Number of hit-test queries made against the runtime.
        pub queries: Cell<usize>,
        next_source: u32,
    }

    impl SimulatedRuntime {
        pub fn active() -> Self {
            Self {
                active: true,
                ..default()
            }
        }

        /// Resolve the most recent request with a fresh source.
        pub fn resolve_last_request(&mut self) -> SimulatedSource {
            let ticket = *self
                .requested
                .last()
                .expect("no hit-test source was requested");
            self.next_source += 1;
            let source = SimulatedSource(self.next_source);
            self.resolved.push_back((ticket, source));
            source
        }
    }

    impl XrRuntime for SimulatedRuntime {
        type HitTestSource = SimulatedSource;

        fn session_active(&self) -> bool {
            self.active
        }

        fn request_hit_test_source(&mut self, ticket: SourceTicket) {
            self.requested.push(ticket);
        }

        fn take_resolved_source(&mut self) -> Option<(SourceTicket, SimulatedSource)> {
            self.resolved.pop_front()
        }

        fn hit_test_poses(&self, _source: &SimulatedSource) -> Vec<Mat4> {
            self.queries.set(self.queries.get() + 1);
            self.poses.clone()
        }

        fn viewer_pose(&self) -> Option<ViewerPose> {
            self.viewer
        }

        fn release_source(&mut self, source: SimulatedSource) {
            self.released.push(source);
        }
    }
}
