use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use bevy::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlElement, Window};

use crate::engine::assets::model_bounds::{BoundsData, LoadedModel, ModelBounds};
use crate::engine::scene::render_backend::RenderBackend;
use crate::engine::scene::scene_host::SceneNode;
use crate::error::ArError;
use constants::viewer::SCREENSHOT_MIME_TYPE;

/// Name of the global the page uses to expose its renderer.
const HOST_RENDERER_GLOBAL: &str = "arHostRenderer";

#[wasm_bindgen]
extern "C" {
    /// Renderer object installed by the page. It owns the WebGL context,
    /// the model loader and the scene graph.
    pub type JsHostRenderer;

    /// Resolves to `{ min: [x, y, z], max: [x, y, z] }`.
    #[wasm_bindgen(method, js_name = loadModel)]
    fn load_model(this: &JsHostRenderer, url: &str) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = setNodeTransform)]
    fn set_node_transform(this: &JsHostRenderer, node: &str, matrix: &[f32], visible: bool);

    #[wasm_bindgen(method)]
    fn render(this: &JsHostRenderer);

    #[wasm_bindgen(method, getter = preserveDrawingBuffer)]
    fn preserve_drawing_buffer(this: &JsHostRenderer) -> bool;

    #[wasm_bindgen(method, setter = preserveDrawingBuffer)]
    fn set_preserve_drawing_buffer(this: &JsHostRenderer, preserve: bool);

    #[wasm_bindgen(method, catch, js_name = captureFrame)]
    fn capture_frame(this: &JsHostRenderer, mime_type: &str) -> Result<String, JsValue>;

    /// Hand the XR session to the renderer, or `null` once it ended.
    #[wasm_bindgen(method, js_name = setXrSession)]
    pub fn set_xr_session(this: &JsHostRenderer, session: &JsValue);

    #[wasm_bindgen(method, getter = domElement)]
    pub fn dom_element(this: &JsHostRenderer) -> HtmlElement;
}

impl JsHostRenderer {
    pub fn from_window(window: &Window) -> Result<Self, ArError> {
        let value = js_sys::Reflect::get(window, &HOST_RENDERER_GLOBAL.into())
            .map_err(|e| ArError::Dom(format!("{e:?}")))?;
        if value.is_undefined() || value.is_null() {
            return Err(ArError::Dom(format!(
                "window.{HOST_RENDERER_GLOBAL} is not defined"
            )));
        }
        Ok(value.unchecked_into())
    }
}

type LoadResults = Rc<RefCell<VecDeque<Result<LoadedModel, ArError>>>>;

/// [`RenderBackend`] forwarding to the page's renderer.
pub struct HostRenderer {
    js: JsHostRenderer,
    loads: LoadResults,
}

impl HostRenderer {
    pub fn new(js: JsHostRenderer) -> Self {
        Self {
            js,
            loads: Rc::default(),
        }
    }
}

impl RenderBackend for HostRenderer {
    fn load_model(&mut self, url: &str) {
        let js = self.js.clone();
        let loads = self.loads.clone();
        let url = url.to_string();

        wasm_bindgen_futures::spawn_local(async move {
            let result = JsFuture::from(js.load_model(&url))
                .await
                .map_err(|e| format!("{e:?}"))
                .and_then(|bounds| parse_bounds(&bounds))
                .map(|bounds| LoadedModel {
                    url: url.clone(),
                    bounds,
                })
                .map_err(|reason| ArError::ModelLoad { url, reason });
            loads.borrow_mut().push_back(result);
        });
    }

    fn take_loaded_model(&mut self) -> Option<Result<LoadedModel, ArError>> {
        self.loads.borrow_mut().pop_front()
    }

    fn sync_node(&mut self, node: SceneNode, transform: Mat4, visible: bool) {
        self.js
            .set_node_transform(node_name(node), &transform.to_cols_array(), visible);
    }

    fn render(&mut self) {
        self.js.render();
    }

    fn preserve_drawing_buffer(&self) -> bool {
        self.js.preserve_drawing_buffer()
    }

    fn set_preserve_drawing_buffer(&mut self, preserve: bool) {
        self.js.set_preserve_drawing_buffer(preserve);
    }

    fn capture_png(&mut self) -> Result<String, ArError> {
        self.js
            .capture_frame(SCREENSHOT_MIME_TYPE)
            .map_err(|e| ArError::Capture(format!("{e:?}")))
    }

    fn viewport_size(&self) -> Vec2 {
        let element = self.js.dom_element();
        Vec2::new(element.client_width() as f32, element.client_height() as f32)
    }
}

fn parse_bounds(value: &JsValue) -> Result<ModelBounds, String> {
    let json = js_sys::JSON::stringify(value)
        .map_err(|e| format!("{e:?}"))?
        .as_string()
        .unwrap_or_default();
    serde_json::from_str::<BoundsData>(&json)
        .map(ModelBounds::from)
        .map_err(|e| format!("bad bounds {json}: {e}"))
}

fn node_name(node: SceneNode) -> &'static str {
    match node {
        SceneNode::Camera => "camera",
        SceneNode::Light => "light",
        SceneNode::Reticle => "reticle",
        SceneNode::Model => "model",
    }
}
