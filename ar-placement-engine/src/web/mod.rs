//! Browser host: the page's renderer, DOM controls, WebXR and the frame runner.
//!
//! Page callbacks run outside the ECS. They push [`HostEvent`]s onto a shared
//! queue that [`drain_host_events`] turns into app events at the start of the
//! next frame.

/// Entry button, native viewer links, session requests and screenshot download.
pub mod dom;

/// `window.arHostRenderer` as a [`RenderBackend`](crate::engine::scene::render_backend::RenderBackend).
pub mod host_renderer;

/// Pointer listeners.
pub mod input;

/// Animation-frame driven app runner.
pub mod runner;

pub mod session_slot;

/// WebXR implementation of the runtime seam.
pub mod xr_runtime;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use web_sys::{Document, HtmlElement};

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::core::app_setup::{HostBindings, create_app};
use crate::engine::scene::render_backend::RendererHost;
use crate::error::ArError;
use crate::tools::gestures::pointer_set::PointerId;
use crate::tools::gestures::{PointerInput, PointerPhase};
use crate::tools::placement::SelectEvent;
use crate::tools::screenshot::{ScreenshotControlsHost, ScreenshotRequested};
use crate::xr::session::{
    ArEntryRequested, SessionEnded, SessionLauncherHost, SessionStartFailed, SessionStarted,
};
use dom::{DomControls, DomLauncher, create_ar_button, wire_screenshot_trigger};
use host_renderer::{HostRenderer, JsHostRenderer};
use session_slot::SessionSlot;
use xr_runtime::WebXrRuntime;

/// Something the page reported between two frames.
#[derive(Debug, Clone)]
pub enum HostEvent {
    EntryRequested,
    ScreenshotRequested,
    Select,
    SessionStarted,
    SessionEnded,
    SessionStartFailed(ArError),
    Pointer {
        id: PointerId,
        position: Vec2,
        phase: PointerPhase,
    },
}

/// Thread-safe queue shared with the page callbacks.
#[derive(Resource, Clone, Default)]
pub struct HostEventQueue(Arc<Mutex<Vec<HostEvent>>>);

impl HostEventQueue {
    pub fn push(&self, event: HostEvent) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(event);
        }
    }

    fn take(&self) -> Vec<HostEvent> {
        self.0
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

/// Document handles the page controls are installed into.
struct PageControls {
    document: Document,
    trigger: Rc<RefCell<Option<HtmlElement>>>,
}

struct WebHostPlugin {
    queue: HostEventQueue,
}

impl Plugin for WebHostPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.queue.clone())
            .add_systems(PreUpdate, drain_host_events)
            .add_systems(
                Update,
                install_page_controls.run_if(resource_added::<ViewerConfig>),
            );
    }
}

#[allow(clippy::too_many_arguments)]
fn drain_host_events(
    queue: Res<HostEventQueue>,
    mut entry: EventWriter<ArEntryRequested>,
    mut screenshot: EventWriter<ScreenshotRequested>,
    mut select: EventWriter<SelectEvent>,
    mut started: EventWriter<SessionStarted>,
    mut ended: EventWriter<SessionEnded>,
    mut failed: EventWriter<SessionStartFailed>,
    mut pointers: EventWriter<PointerInput>,
) {
    for event in queue.take() {
        match event {
            HostEvent::EntryRequested => {
                entry.write(ArEntryRequested);
            }
            HostEvent::ScreenshotRequested => {
                screenshot.write(ScreenshotRequested);
            }
            HostEvent::Select => {
                select.write(SelectEvent);
            }
            HostEvent::SessionStarted => {
                started.write(SessionStarted);
            }
            HostEvent::SessionEnded => {
                ended.write(SessionEnded);
            }
            HostEvent::SessionStartFailed(err) => {
                failed.write(SessionStartFailed(err));
            }
            HostEvent::Pointer {
                id,
                position,
                phase,
            } => {
                pointers.write(PointerInput {
                    id,
                    position,
                    phase,
                });
            }
        }
    }
}

/// Entry button and screenshot trigger, once the labels and ids are known.
fn install_page_controls(
    config: Res<ViewerConfig>,
    queue: Res<HostEventQueue>,
    page: NonSend<PageControls>,
) {
    if let Err(err) = create_ar_button(&page.document, &config.ar_button_label, &queue) {
        err.log();
    }
    *page.trigger.borrow_mut() =
        wire_screenshot_trigger(&page.document, &config.screenshot_button_id, &queue);
}

/// Build the app against the page and hand it to the animation-frame runner.
pub fn start() -> Result<(), ArError> {
    let window = web_sys::window().ok_or_else(|| ArError::Dom("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| ArError::Dom("window has no document".into()))?;
    let js_renderer = JsHostRenderer::from_window(&window)?;

    let slot = SessionSlot::default();
    let queue = HostEventQueue::default();
    let trigger = Rc::new(RefCell::new(None));

    input::listen_for_pointers(&window, js_renderer.dom_element(), &queue)?;

    let host = HostBindings {
        renderer: RendererHost::new(HostRenderer::new(js_renderer.clone())),
        launcher: SessionLauncherHost::new(DomLauncher::new(
            window.clone(),
            slot.clone(),
            queue.clone(),
            js_renderer,
        )),
        controls: ScreenshotControlsHost::new(DomControls::new(document.clone(), trigger.clone())),
    };

    let mut app = create_app(WebXrRuntime::new(slot.clone()), host);
    app.insert_non_send_resource(PageControls { document, trigger })
        .add_plugins(WebHostPlugin { queue })
        .set_runner(move |app| {
            runner::run(app, window, slot);
            AppExit::Success
        });
    app.run();
    Ok(())
}
