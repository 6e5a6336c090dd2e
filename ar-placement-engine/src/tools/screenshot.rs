use bevy::prelude::*;
use constants::viewer::SCREENSHOT_MIME_TYPE;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::scene::render_backend::RendererHost;
use crate::error::ArError;

/// The screenshot trigger was activated.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ScreenshotRequested;

/// Page-side half of a capture: the trigger control and the file download.
pub trait ScreenshotControls {
    /// No-op when the page has no trigger control.
    fn set_trigger_visible(&mut self, visible: bool);

    fn download(&mut self, data_url: &str, filename: &str) -> Result<(), ArError>;
}

/// Non-send resource holding the page's screenshot controls.
pub struct ScreenshotControlsHost(Box<dyn ScreenshotControls>);

impl ScreenshotControlsHost {
    pub fn new(controls: impl ScreenshotControls + 'static) -> Self {
        Self(Box::new(controls))
    }
}

impl std::ops::Deref for ScreenshotControlsHost {
    type Target = dyn ScreenshotControls;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl std::ops::DerefMut for ScreenshotControlsHost {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

/// Capture progress. The trigger is hidden on one frame and the capture runs on
/// the next, after the style change has reached the page.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ScreenshotExporter {
    #[default]
    Idle,
    Armed,
}

/// Runs after the frame's render pass.
pub fn export_screenshot(
    mut requests: EventReader<ScreenshotRequested>,
    mut exporter: ResMut<ScreenshotExporter>,
    mut renderer: NonSendMut<RendererHost>,
    mut controls: NonSendMut<ScreenshotControlsHost>,
    config: Res<ViewerConfig>,
) {
    match *exporter {
        ScreenshotExporter::Idle => {
            if requests.read().count() > 0 {
                controls.set_trigger_visible(false);
                *exporter = ScreenshotExporter::Armed;
            }
        }
        ScreenshotExporter::Armed => {
            let ignored = requests.read().count();
            if ignored > 0 {
                debug!("Ignoring {} screenshot request(s), capture in progress", ignored);
            }

            match capture_frame(&mut renderer) {
                Ok(data_url) => match controls.download(&data_url, &config.screenshot_filename) {
                    Ok(()) => info!("Screenshot saved as {}", config.screenshot_filename),
                    Err(err) => err.log(),
                },
                Err(err) => err.log(),
            }
            controls.set_trigger_visible(true);
            *exporter = ScreenshotExporter::Idle;
        }
    }
}

/// Render one pass with buffer retention on and encode it. The previous
/// retention flag is restored whether or not encoding succeeded.
fn capture_frame(renderer: &mut RendererHost) -> Result<String, ArError> {
    let previous = renderer.preserve_drawing_buffer();
    renderer.set_preserve_drawing_buffer(true);
    renderer.render();
    let captured = renderer.capture_png();
    renderer.set_preserve_drawing_buffer(previous);

    let data_url = captured?;
    if !data_url.starts_with(&format!("data:{SCREENSHOT_MIME_TYPE}")) {
        return Err(ArError::Capture(format!(
            "renderer returned non-PNG data ({} bytes)",
            data_url.len()
        )));
    }
    Ok(data_url)
}

#[cfg(test)]
pub mod recording {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum ControlCall {
        TriggerVisible(bool),
        Download { filename: String },
    }

    #[derive(Default, Clone)]
    pub struct RecordingControls {
        pub calls: Rc<RefCell<Vec<ControlCall>>>,
        pub fail_download: bool,
    }

    impl RecordingControls {
        pub fn downloads(&self) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|call| matches!(call, ControlCall::Download { .. }))
                .count()
        }
    }

    impl ScreenshotControls for RecordingControls {
        fn set_trigger_visible(&mut self, visible: bool) {
            self.calls
                .borrow_mut()
                .push(ControlCall::TriggerVisible(visible));
        }

        fn download(&mut self, _data_url: &str, filename: &str) -> Result<(), ArError> {
            if self.fail_download {
                return Err(ArError::Download("blocked".into()));
            }
            self.calls.borrow_mut().push(ControlCall::Download {
                filename: filename.to_string(),
            });
            Ok(())
        }
    }
}
