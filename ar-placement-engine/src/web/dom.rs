use std::cell::RefCell;
use std::rc::Rc;

use bevy::prelude::*;
use constants::ar_session::NATIVE_VIEWER_LINK_REL;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, HtmlAnchorElement, HtmlElement, Window, XrReferenceSpace, XrReferenceSpaceType,
    XrSession, XrSessionInit, XrSessionMode,
};

use super::host_renderer::JsHostRenderer;
use super::session_slot::SessionSlot;
use super::{HostEvent, HostEventQueue};
use crate::error::ArError;
use crate::tools::screenshot::ScreenshotControls;
use crate::xr::platform::{ArEntryPath, detect_entry_path};
use crate::xr::session::{SessionLauncher, SessionRequest};

fn dom_err(e: JsValue) -> ArError {
    ArError::Dom(format!("{e:?}"))
}

fn push_on_click(element: &HtmlElement, queue: &HostEventQueue, event: fn() -> HostEvent) {
    let queue = queue.clone();
    let closure = Closure::wrap(Box::new(move || queue.push(event())) as Box<dyn FnMut()>);
    element.set_onclick(Some(closure.as_ref().unchecked_ref()));
    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
}

/// Fixed bottom-right entry button.
pub fn create_ar_button(
    document: &Document,
    label: &str,
    queue: &HostEventQueue,
) -> Result<HtmlElement, ArError> {
    let button: HtmlElement = document
        .create_element("button")
        .map_err(dom_err)?
        .unchecked_into();
    button.set_text_content(Some(label));

    let style = button.style();
    for (property, value) in [
        ("position", "fixed"),
        ("bottom", "20px"),
        ("right", "20px"),
        ("padding", "12px 20px"),
        ("font-size", "16px"),
        ("background", "#4CAF50"),
        ("color", "#fff"),
        ("border", "none"),
        ("border-radius", "4px"),
        ("cursor", "pointer"),
    ] {
        style.set_property(property, value).map_err(dom_err)?;
    }

    document
        .body()
        .ok_or_else(|| ArError::Dom("document has no body".into()))?
        .append_child(&button)
        .map_err(dom_err)?;
    push_on_click(&button, queue, || HostEvent::EntryRequested);
    Ok(button)
}

/// Wire the page's screenshot trigger, if it has one.
pub fn wire_screenshot_trigger(
    document: &Document,
    element_id: &str,
    queue: &HostEventQueue,
) -> Option<HtmlElement> {
    let Some(element) = document.get_element_by_id(element_id) else {
        info!("No #{} on the page, screenshots disabled", element_id);
        return None;
    };
    let trigger: HtmlElement = element.dyn_into().ok()?;
    push_on_click(&trigger, queue, || HostEvent::ScreenshotRequested);
    Some(trigger)
}

fn set_displayed(element: &HtmlElement, displayed: bool) {
    let style = element.style();
    let result = if displayed {
        style.remove_property("display").map(|_| ())
    } else {
        style.set_property("display", "none")
    };
    if let Err(e) = result {
        dom_err(e).log();
    }
}

/// Session entry through the page: native viewer links and WebXR requests.
pub struct DomLauncher {
    window: Window,
    slot: SessionSlot,
    queue: HostEventQueue,
    renderer: JsHostRenderer,
}

impl DomLauncher {
    pub fn new(
        window: Window,
        slot: SessionSlot,
        queue: HostEventQueue,
        renderer: JsHostRenderer,
    ) -> Self {
        Self {
            window,
            slot,
            queue,
            renderer,
        }
    }
}

impl SessionLauncher for DomLauncher {
    fn entry_path(&self) -> ArEntryPath {
        let user_agent = self.window.navigator().user_agent().unwrap_or_default();
        let ms_stream = js_sys::Reflect::get(&self.window, &"MSStream".into())
            .is_ok_and(|value| value.is_truthy());
        detect_entry_path(&user_agent, ms_stream)
    }

    fn xr_available(&self) -> bool {
        js_sys::Reflect::get(&self.window.navigator(), &"xr".into())
            .is_ok_and(|xr| !xr.is_undefined() && !xr.is_null())
    }

    fn open_native_viewer(&mut self, url: &str) -> Result<(), ArError> {
        let document = self
            .window
            .document()
            .ok_or_else(|| ArError::Dom("window has no document".into()))?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(dom_err)?
            .unchecked_into();
        anchor.set_rel(NATIVE_VIEWER_LINK_REL);
        anchor.set_href(url);
        anchor.click();
        Ok(())
    }

    fn request_session(&mut self, request: &SessionRequest) {
        let window = self.window.clone();
        let slot = self.slot.clone();
        let queue = self.queue.clone();
        let renderer = self.renderer.clone();
        let request = request.clone();

        wasm_bindgen_futures::spawn_local(async move {
            match start_session(&window, &request).await {
                Ok((session, space)) => {
                    install_session_listeners(&session, &slot, &queue, &renderer);
                    renderer.set_xr_session(&session);
                    queue.push(HostEvent::SessionStarted);
                    slot.attach(session, space);
                }
                Err(err) => queue.push(HostEvent::SessionStartFailed(err)),
            }
        });
    }

    fn set_ui_hidden(&mut self, element_ids: &[String], hidden: bool) {
        let Some(document) = self.window.document() else {
            return;
        };
        for id in element_ids {
            match document
                .get_element_by_id(id)
                .and_then(|e| e.dyn_into::<HtmlElement>().ok())
            {
                Some(element) => set_displayed(&element, !hidden),
                None => debug!("UI element #{} not found", id),
            }
        }
    }
}

async fn start_session(
    window: &Window,
    request: &SessionRequest,
) -> Result<(XrSession, XrReferenceSpace), ArError> {
    let xr = window.navigator().xr();
    let mode = XrSessionMode::from_js_value(&JsValue::from_str(request.mode))
        .ok_or_else(|| ArError::SessionStart(format!("unknown mode {}", request.mode)))?;

    let supported = JsFuture::from(xr.is_session_supported(mode))
        .await
        .map_err(|e| ArError::SessionStart(format!("{e:?}")))?;
    if !supported.is_truthy() {
        return Err(ArError::SessionUnsupported);
    }

    let init = session_init(window, request)?;
    let session: XrSession = JsFuture::from(xr.request_session_with_options(mode, &init))
        .await
        .map_err(|e| ArError::SessionStart(format!("{e:?}")))?
        .unchecked_into();

    let space = match JsFuture::from(
        session.request_reference_space(XrReferenceSpaceType::LocalFloor),
    )
    .await
    {
        Ok(space) => space,
        Err(_) => {
            match JsFuture::from(session.request_reference_space(XrReferenceSpaceType::Local))
                .await
            {
                Ok(space) => space,
                Err(e) => {
                    // Nothing drives this session yet, so it must not outlive the failure.
                    let _ = session.end();
                    return Err(ArError::SessionStart(format!("no reference space: {e:?}")));
                }
            }
        }
    };
    Ok((session, space.unchecked_into()))
}

fn session_init(window: &Window, request: &SessionRequest) -> Result<XrSessionInit, ArError> {
    let init = js_sys::Object::new();
    let features: js_sys::Array = request
        .optional_features
        .iter()
        .map(|feature| JsValue::from_str(feature))
        .collect();
    js_sys::Reflect::set(&init, &"optionalFeatures".into(), &features).map_err(dom_err)?;

    if request.dom_overlay {
        if let Some(body) = window.document().and_then(|d| d.body()) {
            let overlay = js_sys::Object::new();
            js_sys::Reflect::set(&overlay, &"root".into(), &body).map_err(dom_err)?;
            js_sys::Reflect::set(&init, &"domOverlay".into(), &overlay).map_err(dom_err)?;
        }
    }
    Ok(init.unchecked_into())
}

fn install_session_listeners(
    session: &XrSession,
    slot: &SessionSlot,
    queue: &HostEventQueue,
    renderer: &JsHostRenderer,
) {
    let select_queue = queue.clone();
    let on_select = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        select_queue.push(HostEvent::Select);
    }) as Box<dyn FnMut(web_sys::Event)>);
    session.set_onselect(Some(on_select.as_ref().unchecked_ref()));
    on_select.forget();

    let end_queue = queue.clone();
    let end_slot = slot.clone();
    let end_renderer = renderer.clone();
    let on_end = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        end_queue.push(HostEvent::SessionEnded);
        end_renderer.set_xr_session(&JsValue::NULL);
        // Hands the frame loop back to the window.
        end_slot.detach();
    }) as Box<dyn FnMut(web_sys::Event)>);
    session.set_onend(Some(on_end.as_ref().unchecked_ref()));
    on_end.forget();
}

/// Screenshot trigger visibility and PNG download through a temporary link.
pub struct DomControls {
    document: Document,
    trigger: Rc<RefCell<Option<HtmlElement>>>,
}

impl DomControls {
    pub fn new(document: Document, trigger: Rc<RefCell<Option<HtmlElement>>>) -> Self {
        Self { document, trigger }
    }
}

impl ScreenshotControls for DomControls {
    fn set_trigger_visible(&mut self, visible: bool) {
        if let Some(trigger) = self.trigger.borrow().as_ref() {
            set_displayed(trigger, visible);
        }
    }

    fn download(&mut self, data_url: &str, filename: &str) -> Result<(), ArError> {
        let anchor: HtmlAnchorElement = self
            .document
            .create_element("a")
            .map_err(|e| ArError::Download(format!("{e:?}")))?
            .unchecked_into();
        anchor.set_download(filename);
        anchor.set_href(data_url);
        anchor.click();
        Ok(())
    }
}
