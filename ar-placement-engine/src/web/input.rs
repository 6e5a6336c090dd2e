use bevy::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, PointerEvent, Window};

use super::{HostEvent, HostEventQueue};
use crate::error::ArError;
use crate::tools::gestures::PointerPhase;
use crate::tools::gestures::pointer_set::PointerId;

const POINTER_EVENTS: [(&str, PointerPhase); 4] = [
    ("pointerdown", PointerPhase::Down),
    ("pointermove", PointerPhase::Move),
    ("pointerup", PointerPhase::Up),
    ("pointercancel", PointerPhase::Cancel),
];

/// Forward window pointer events as positions relative to the drawing surface.
pub fn listen_for_pointers(
    window: &Window,
    surface: HtmlElement,
    queue: &HostEventQueue,
) -> Result<(), ArError> {
    for (name, phase) in POINTER_EVENTS {
        let queue = queue.clone();
        let surface = surface.clone();
        let closure = Closure::wrap(Box::new(move |event: PointerEvent| {
            let rect = surface.get_bounding_client_rect();
            let position = Vec2::new(
                event.client_x() as f32 - rect.left() as f32,
                event.client_y() as f32 - rect.top() as f32,
            );
            queue.push(HostEvent::Pointer {
                id: PointerId(event.pointer_id()),
                position,
                phase,
            });
        }) as Box<dyn FnMut(PointerEvent)>);

        window
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .map_err(|e| ArError::Dom(format!("{name} listener: {e:?}")))?;
        closure.forget();
    }
    Ok(())
}
