//! Per-session hit-test source acquisition and per-frame surface polling.

use bevy::prelude::*;

use super::runtime::{SourceTicket, XrRuntime};
use crate::engine::scene::scene_host::{NodeVisibility, Reticle};

/// Source acquisition state for one AR session.
#[derive(Debug, Default)]
pub enum HitTestState<S> {
    /// No request issued yet in this session.
    #[default]
    Uninitialized,
    /// Request in flight. Stays here forever if the runtime never answers.
    SourcePending { ticket: SourceTicket },
    SourceReady { source: S },
    /// Session ended; nothing is polled until the next session starts.
    Ended,
}

/// Payload-free view of [`HitTestState`] for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTestPhase {
    Uninitialized,
    SourcePending,
    SourceReady,
    Ended,
}

/// Tracks the hit-test source for the running session and turns each frame's
/// results into a placement indicator pose.
pub struct HitTestTracker<S> {
    state: HitTestState<S>,
    generation: u32,
}

impl<S> Default for HitTestTracker<S> {
    fn default() -> Self {
        Self {
            state: HitTestState::Uninitialized,
            generation: 0,
        }
    }
}

impl<S> HitTestTracker<S> {
    pub fn phase(&self) -> HitTestPhase {
        match self.state {
            HitTestState::Uninitialized => HitTestPhase::Uninitialized,
            HitTestState::SourcePending { .. } => HitTestPhase::SourcePending,
            HitTestState::SourceReady { .. } => HitTestPhase::SourceReady,
            HitTestState::Ended => HitTestPhase::Ended,
        }
    }

    pub fn source(&self) -> Option<&S> {
        match &self.state {
            HitTestState::SourceReady { source } => Some(source),
            _ => None,
        }
    }

    /// Uninitialized → SourcePending. Returns the ticket the runtime must echo back,
    /// or `None` when a request is not due in the current state.
    pub fn begin_request(&mut self) -> Option<SourceTicket> {
        if !matches!(self.state, HitTestState::Uninitialized) {
            return None;
        }
        self.generation = self.generation.wrapping_add(1);
        let ticket = SourceTicket {
            generation: self.generation,
        };
        self.state = HitTestState::SourcePending { ticket };
        Some(ticket)
    }

    /// SourcePending → SourceReady when `ticket` is the outstanding request.
    /// A source for any other ticket is stale and is handed back.
    pub fn resolve(&mut self, ticket: SourceTicket, source: S) -> Result<(), S> {
        match self.state {
            HitTestState::SourcePending { ticket: pending } if pending == ticket => {
                self.state = HitTestState::SourceReady { source };
                Ok(())
            }
            _ => Err(source),
        }
    }

    /// Any state → Ended. Returns the source that was being polled, if any.
    pub fn end(&mut self) -> Option<S> {
        // Invalidate any request still in flight.
        self.generation = self.generation.wrapping_add(1);
        match std::mem::replace(&mut self.state, HitTestState::Ended) {
            HitTestState::SourceReady { source } => Some(source),
            _ => None,
        }
    }

    /// Restart the state machine for a new session. Returns a source left over from a
    /// previous session that never saw an end event.
    pub fn restart(&mut self) -> Option<S> {
        let leftover = self.end();
        self.state = HitTestState::Uninitialized;
        leftover
    }

    /// Run one frame: absorb resolved sources, issue the first request of the session,
    /// and return the closest-ranked hit pose when the source is ready.
    pub fn advance<R>(&mut self, runtime: &mut R) -> Option<Mat4>
    where
        R: XrRuntime<HitTestSource = S>,
    {
        while let Some((ticket, source)) = runtime.take_resolved_source() {
            match self.resolve(ticket, source) {
                Ok(()) => info!("Hit-test source ready"),
                Err(stale) => runtime.release_source(stale),
            }
        }

        if let Some(ticket) = self.begin_request() {
            runtime.request_hit_test_source(ticket);
            return None;
        }

        self.source()
            .and_then(|source| runtime.hit_test_poses(source).into_iter().next())
    }
}

/// Frame system: poll the runtime and drive the placement indicator.
/// The indicator is visible exactly when this frame produced a hit.
pub fn poll_hit_test<R: XrRuntime>(
    mut tracker: NonSendMut<HitTestTracker<R::HitTestSource>>,
    mut runtime: NonSendMut<R>,
    mut reticle: Query<(&mut Transform, &mut NodeVisibility), With<Reticle>>,
) {
    if !runtime.session_active() {
        return;
    }
    let Ok((mut transform, mut visibility)) = reticle.single_mut() else {
        return;
    };

    match tracker.advance(&mut *runtime) {
        Some(pose) => {
            *transform = Transform::from_matrix(pose);
            visibility.0 = true;
        }
        None => visibility.0 = false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xr::runtime::simulated::{SimulatedRuntime, SimulatedSource};

    type Tracker = HitTestTracker<SimulatedSource>;

    fn ready_tracker(runtime: &mut SimulatedRuntime) -> Tracker {
        let mut tracker = Tracker::default();
        tracker.advance(runtime);
        runtime.resolve_last_request();
        tracker.advance(runtime);
        tracker
    }

    #[test]
    fn first_frame_requests_a_source_once() {
        let mut runtime = SimulatedRuntime::active();
        let mut tracker = Tracker::default();

        assert_eq!(tracker.phase(), HitTestPhase::Uninitialized);
        assert_eq!(tracker.advance(&mut runtime), None);
        assert_eq!(tracker.phase(), HitTestPhase::SourcePending);

        tracker.advance(&mut runtime);
        tracker.advance(&mut runtime);
        assert_eq!(runtime.requested.len(), 1);
    }

    #[test]
    fn unresolved_request_stays_pending() {
        let mut runtime = SimulatedRuntime::active();
        let mut tracker = Tracker::default();
        runtime.poses = vec![Mat4::IDENTITY];

        for _ in 0..100 {
            assert_eq!(tracker.advance(&mut runtime), None);
        }
        assert_eq!(tracker.phase(), HitTestPhase::SourcePending);
        assert_eq!(runtime.queries.get(), 0);
    }

    #[test]
    fn resolved_source_yields_closest_hit() {
        let mut runtime = SimulatedRuntime::active();
        let mut tracker = ready_tracker(&mut runtime);
        assert_eq!(tracker.phase(), HitTestPhase::SourceReady);

        let near = Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0));
        let far = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0));
        runtime.poses = vec![near, far];
        assert_eq!(tracker.advance(&mut runtime), Some(near));

        runtime.poses.clear();
        assert_eq!(tracker.advance(&mut runtime), None);
    }

    #[test]
    fn end_skips_polling_until_new_source_resolves() {
        let mut runtime = SimulatedRuntime::active();
        let mut tracker = ready_tracker(&mut runtime);
        runtime.poses = vec![Mat4::IDENTITY];

        let released = tracker.end();
        assert_eq!(released, Some(SimulatedSource(1)));
        assert_eq!(tracker.phase(), HitTestPhase::Ended);

        let queries_before = runtime.queries.get();
        assert_eq!(tracker.advance(&mut runtime), None);
        assert_eq!(runtime.queries.get(), queries_before);

        // Next session starts from scratch.
        assert_eq!(tracker.restart(), None);
        assert_eq!(tracker.advance(&mut runtime), None);
        assert_eq!(tracker.phase(), HitTestPhase::SourcePending);
        assert_eq!(runtime.queries.get(), queries_before);

        runtime.resolve_last_request();
        assert_eq!(tracker.advance(&mut runtime), Some(Mat4::IDENTITY));
    }

    #[test]
    fn stale_source_from_previous_session_is_released() {
        let mut runtime = SimulatedRuntime::active();
        let mut tracker = Tracker::default();
        tracker.advance(&mut runtime);
        let old_ticket = runtime.requested[0];

        tracker.end();
        tracker.restart();
        tracker.advance(&mut runtime);

        runtime.resolved.push_back((old_ticket, SimulatedSource(42)));
        tracker.advance(&mut runtime);

        assert_eq!(tracker.phase(), HitTestPhase::SourcePending);
        assert_eq!(runtime.released, vec![SimulatedSource(42)]);
    }

    #[test]
    fn resolve_outside_pending_is_rejected() {
        let mut tracker = Tracker::default();
        let ticket = SourceTicket { generation: 1 };
        assert_eq!(
            tracker.resolve(ticket, SimulatedSource(7)),
            Err(SimulatedSource(7))
        );
    }

    #[test]
    fn system_updates_reticle_pose_and_visibility() {
        let mut world = World::new();
        world.insert_non_send_resource(SimulatedRuntime::active());
        world.insert_non_send_resource(Tracker::default());
        let reticle = world
            .spawn((Reticle, Transform::default(), NodeVisibility(false)))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(poll_hit_test::<SimulatedRuntime>);

        schedule.run(&mut world);
        world
            .non_send_resource_mut::<SimulatedRuntime>()
            .resolve_last_request();
        let pose = Mat4::from_translation(Vec3::new(0.5, 0.0, -2.0));
        world.non_send_resource_mut::<SimulatedRuntime>().poses = vec![pose];
        schedule.run(&mut world);

        let entity = world.entity(reticle);
        assert!(entity.get::<NodeVisibility>().is_some_and(|v| v.0));
        assert_eq!(
            entity.get::<Transform>().map(|t| t.translation),
            Some(Vec3::new(0.5, 0.0, -2.0))
        );

        world.non_send_resource_mut::<SimulatedRuntime>().poses.clear();
        schedule.run(&mut world);
        assert!(world.entity(reticle).get::<NodeVisibility>().is_some_and(|v| !v.0));
    }
}
