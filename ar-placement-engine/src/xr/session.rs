use bevy::prelude::*;
use constants::ar_session::{IMMERSIVE_AR_MODE, OPTIONAL_SESSION_FEATURES};

use super::hit_test::HitTestTracker;
use super::platform::ArEntryPath;
use super::runtime::XrRuntime;
use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::scene::scene_host::{NodeVisibility, Reticle, TargetModel};
use crate::error::ArError;
use crate::tools::gestures::GestureController;

/// Where the immersive session is in its lifecycle.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Inactive,
    /// A session request is in flight.
    Requesting,
    Active,
}

/// The user activated the AR entry control.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ArEntryRequested;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct SessionStarted;

/// The host ended the session. This is the only cancellation signal.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct SessionEnded;

#[derive(Event, Debug, Clone)]
pub struct SessionStartFailed(pub ArError);

/// Immersive session request sent to the host runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub mode: &'static str,
    pub optional_features: &'static [&'static str],
    /// Use the page body as the overlay root.
    pub dom_overlay: bool,
}

impl Default for SessionRequest {
    fn default() -> Self {
        Self {
            mode: IMMERSIVE_AR_MODE,
            optional_features: OPTIONAL_SESSION_FEATURES,
            dom_overlay: OPTIONAL_SESSION_FEATURES.contains(&"dom-overlay"),
        }
    }
}

/// What a click on the entry control should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPlan {
    OpenNativeViewer { url: String },
    RequestSession(SessionRequest),
    Abort(ArError),
}

pub fn plan_entry(
    path: ArEntryPath,
    xr_available: bool,
    model: Option<&TargetModel>,
    config: &ViewerConfig,
) -> EntryPlan {
    match path {
        ArEntryPath::NativeViewer => match model.filter(|m| m.is_loaded()) {
            Some(model) => EntryPlan::OpenNativeViewer {
                url: config.viewer_asset_url(&model.url),
            },
            None => EntryPlan::Abort(ArError::NoModelDisplayed),
        },
        ArEntryPath::WebXr if !xr_available => EntryPlan::Abort(ArError::XrUnavailable),
        ArEntryPath::WebXr => EntryPlan::RequestSession(SessionRequest::default()),
    }
}

/// Page-side operations needed to enter and leave AR.
///
/// `request_session` returns immediately. Its outcome arrives later as a
/// [`SessionStarted`] or [`SessionStartFailed`] event.
pub trait SessionLauncher {
    fn entry_path(&self) -> ArEntryPath;

    /// Whether the host exposes an XR runtime at all.
    fn xr_available(&self) -> bool;

    fn open_native_viewer(&mut self, url: &str) -> Result<(), ArError>;

    fn request_session(&mut self, request: &SessionRequest);

    fn set_ui_hidden(&mut self, element_ids: &[String], hidden: bool);
}

/// Non-send resource holding the page's session launcher.
pub struct SessionLauncherHost(Box<dyn SessionLauncher>);

impl SessionLauncherHost {
    pub fn new(launcher: impl SessionLauncher + 'static) -> Self {
        Self(Box::new(launcher))
    }
}

impl std::ops::Deref for SessionLauncherHost {
    type Target = dyn SessionLauncher;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl std::ops::DerefMut for SessionLauncherHost {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

pub fn route_entry_requests(
    mut requests: EventReader<ArEntryRequested>,
    mut launcher: NonSendMut<SessionLauncherHost>,
    mut phase: ResMut<SessionPhase>,
    config: Res<ViewerConfig>,
    models: Query<&TargetModel>,
) {
    for _ in requests.read() {
        if *phase != SessionPhase::Inactive {
            debug!("AR entry ignored, session is {:?}", *phase);
            continue;
        }

        let plan = plan_entry(
            launcher.entry_path(),
            launcher.xr_available(),
            models.iter().next(),
            &config,
        );
        match plan {
            EntryPlan::OpenNativeViewer { url } => {
                info!("Opening native AR viewer: {}", url);
                if let Err(err) = launcher.open_native_viewer(&url) {
                    err.log();
                }
            }
            EntryPlan::RequestSession(request) => {
                info!("Requesting {} session", request.mode);
                launcher.set_ui_hidden(&config.hidden_during_session, true);
                launcher.request_session(&request);
                *phase = SessionPhase::Requesting;
            }
            EntryPlan::Abort(err) => err.log(),
        }
    }
}

pub fn handle_session_failures(
    mut failures: EventReader<SessionStartFailed>,
    mut launcher: NonSendMut<SessionLauncherHost>,
    mut phase: ResMut<SessionPhase>,
    config: Res<ViewerConfig>,
) {
    for SessionStartFailed(err) in failures.read() {
        err.log();
        launcher.set_ui_hidden(&config.hidden_during_session, false);
        *phase = SessionPhase::Inactive;
    }
}

/// Tear down per-session state before any later frame can poll a stale source.
pub fn handle_session_ended<R: XrRuntime>(
    mut ended: EventReader<SessionEnded>,
    mut tracker: NonSendMut<HitTestTracker<R::HitTestSource>>,
    mut runtime: NonSendMut<R>,
    mut launcher: NonSendMut<SessionLauncherHost>,
    mut phase: ResMut<SessionPhase>,
    mut gestures: ResMut<GestureController>,
    config: Res<ViewerConfig>,
    mut reticle: Query<&mut NodeVisibility, With<Reticle>>,
) {
    if ended.read().count() == 0 {
        return;
    }

    if let Some(source) = tracker.end() {
        runtime.release_source(source);
    }
    for mut visibility in &mut reticle {
        visibility.0 = false;
    }
    // Pointer releases can be lost while the overlay is torn down.
    gestures.reset();
    launcher.set_ui_hidden(&config.hidden_during_session, false);
    *phase = SessionPhase::Inactive;
    info!("AR session ended");
}

pub fn handle_session_started<R: XrRuntime>(
    mut started: EventReader<SessionStarted>,
    mut tracker: NonSendMut<HitTestTracker<R::HitTestSource>>,
    mut runtime: NonSendMut<R>,
    mut phase: ResMut<SessionPhase>,
) {
    if started.read().count() == 0 {
        return;
    }

    if let Some(leftover) = tracker.restart() {
        runtime.release_source(leftover);
    }
    *phase = SessionPhase::Active;
    info!("AR session started");
}
