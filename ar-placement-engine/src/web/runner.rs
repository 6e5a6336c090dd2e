use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bevy::app::PluginsState;
use bevy::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{Window, XrFrame};

use super::session_slot::SessionSlot;
use crate::error::ArError;

/// Drives `App::update` from the page's animation frames.
///
/// Outside a session the window's `requestAnimationFrame` paces the app. While
/// a session runs the session's own callback does, and the [`XrFrame`] it
/// delivers is parked in the [`SessionSlot`] for the duration of the update so
/// the runtime can query hit-tests and the viewer pose.
struct FrameLoop {
    app: RefCell<App>,
    window: Window,
    slot: SessionSlot,
    window_pending: Cell<bool>,
    window_tick: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    session_tick: RefCell<Option<Closure<dyn FnMut(f64, XrFrame)>>>,
}

impl FrameLoop {
    fn update(&self) {
        let mut app = self.app.borrow_mut();
        if app.plugins_state() != PluginsState::Cleaned {
            if app.plugins_state() != PluginsState::Ready {
                return;
            }
            app.finish();
            app.cleanup();
        }
        app.update();
    }

    fn schedule_window(&self) {
        if self.window_pending.get() {
            return;
        }
        let tick = self.window_tick.borrow();
        let Some(tick) = tick.as_ref() else {
            return;
        };
        match self.window.request_animation_frame(tick.as_ref().unchecked_ref()) {
            Ok(_) => self.window_pending.set(true),
            Err(e) => ArError::Dom(format!("requestAnimationFrame: {e:?}")).log(),
        }
    }

    fn schedule_session(&self) {
        let Some(session) = self.slot.session() else {
            return;
        };
        if let Some(tick) = self.session_tick.borrow().as_ref() {
            session.request_animation_frame(tick.as_ref().unchecked_ref());
        }
    }
}

pub fn run(app: App, window: Window, slot: SessionSlot) {
    let frame_loop = Rc::new(FrameLoop {
        app: RefCell::new(app),
        window,
        slot: slot.clone(),
        window_pending: Cell::new(false),
        window_tick: RefCell::new(None),
        session_tick: RefCell::new(None),
    });

    let window_loop = frame_loop.clone();
    *frame_loop.window_tick.borrow_mut() = Some(Closure::wrap(Box::new(move |_time: f64| {
        window_loop.window_pending.set(false);
        // The session callback owns the frame while a session runs.
        if window_loop.slot.session().is_some() {
            return;
        }
        window_loop.update();
        window_loop.schedule_window();
    }) as Box<dyn FnMut(f64)>));

    let session_loop = frame_loop.clone();
    *frame_loop.session_tick.borrow_mut() = Some(Closure::wrap(Box::new(
        move |_time: f64, frame: XrFrame| {
            session_loop.slot.set_frame(Some(frame));
            session_loop.update();
            session_loop.slot.set_frame(None);
            session_loop.schedule_session();
        },
    ) as Box<dyn FnMut(f64, XrFrame)>));

    let hook_loop = frame_loop.clone();
    slot.set_on_change(move || {
        if hook_loop.slot.session().is_some() {
            hook_loop.schedule_session();
        } else {
            hook_loop.schedule_window();
        }
    });

    frame_loop.schedule_window();
}
