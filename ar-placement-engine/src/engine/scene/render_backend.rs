use bevy::prelude::*;

use super::scene_host::SceneNode;
use crate::engine::assets::model_bounds::LoadedModel;
use crate::error::ArError;

/// The external renderer that draws the scene graph and decodes models.
///
/// Model loading is asynchronous on the host side: [`RenderBackend::load_model`]
/// only starts it, and the result is collected on a later frame.
pub trait RenderBackend {
    fn load_model(&mut self, url: &str);

    /// Next finished model load since the last call.
    fn take_loaded_model(&mut self) -> Option<Result<LoadedModel, ArError>>;

    /// Push a node's world transform and visibility to the renderer's scene graph.
    fn sync_node(&mut self, node: SceneNode, transform: Mat4, visible: bool);

    /// Draw one frame.
    fn render(&mut self);

    fn preserve_drawing_buffer(&self) -> bool;

    fn set_preserve_drawing_buffer(&mut self, preserve: bool);

    /// Encode the last rendered frame as a PNG data URL.
    fn capture_png(&mut self) -> Result<String, ArError>;

    /// Drawing surface size in CSS pixels.
    fn viewport_size(&self) -> Vec2;
}

/// Non-send resource holding the active renderer.
pub struct RendererHost(Box<dyn RenderBackend>);

impl RendererHost {
    pub fn new(backend: impl RenderBackend + 'static) -> Self {
        Self(Box::new(backend))
    }
}

impl std::ops::Deref for RendererHost {
    type Target = dyn RenderBackend;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl std::ops::DerefMut for RendererHost {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}
