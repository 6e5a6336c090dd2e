use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use bevy::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{XrFrame, XrPose, XrReferenceSpaceType, XrSession, XrSpace};

use super::session_slot::SessionSlot;
use crate::error::ArError;
use crate::xr::runtime::{SourceTicket, ViewerPose, XrRuntime};

#[wasm_bindgen]
extern "C" {
    /// `XRHitTestSource` from the WebXR Hit Test module.
    #[wasm_bindgen(extends = js_sys::Object, js_name = XRHitTestSource)]
    pub type HitTestSource;

    /// Throws `InvalidStateError` once the owning session has ended.
    #[wasm_bindgen(method, catch)]
    fn cancel(this: &HitTestSource) -> Result<(), JsValue>;

    #[wasm_bindgen(extends = js_sys::Object, js_name = XRHitTestResult)]
    type HitTestResult;

    #[wasm_bindgen(method, js_name = getPose)]
    fn get_pose(this: &HitTestResult, base_space: &XrSpace) -> Option<XrPose>;

    #[wasm_bindgen(method, js_name = requestHitTestSource)]
    fn request_hit_test_source(this: &XrSession, options: &js_sys::Object) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = getHitTestResults)]
    fn get_hit_test_results(this: &XrFrame, source: &HitTestSource) -> js_sys::Array;
}

type ResolvedSources = Rc<RefCell<VecDeque<(SourceTicket, HitTestSource)>>>;

/// [`XrRuntime`] backed by the browser's WebXR session.
pub struct WebXrRuntime {
    slot: SessionSlot,
    resolved: ResolvedSources,
}

impl WebXrRuntime {
    pub fn new(slot: SessionSlot) -> Self {
        Self {
            slot,
            resolved: Rc::default(),
        }
    }
}

impl XrRuntime for WebXrRuntime {
    type HitTestSource = HitTestSource;

    fn session_active(&self) -> bool {
        self.slot.session().is_some()
    }

    fn request_hit_test_source(&mut self, ticket: SourceTicket) {
        let Some(session) = self.slot.session() else {
            return;
        };
        let resolved = self.resolved.clone();

        wasm_bindgen_futures::spawn_local(async move {
            match acquire_hit_test_source(&session).await {
                Ok(source) => resolved.borrow_mut().push_back((ticket, source)),
                Err(err) => err.log(),
            }
        });
    }

    fn take_resolved_source(&mut self) -> Option<(SourceTicket, HitTestSource)> {
        self.resolved.borrow_mut().pop_front()
    }

    fn hit_test_poses(&self, source: &HitTestSource) -> Vec<Mat4> {
        let (Some(frame), Some(space)) = (self.slot.frame(), self.slot.reference_space()) else {
            return Vec::new();
        };

        frame
            .get_hit_test_results(source)
            .iter()
            .filter_map(|result| {
                result
                    .unchecked_into::<HitTestResult>()
                    .get_pose(&space)
                    .and_then(|pose| matrix_from(&pose.transform().matrix()))
            })
            .collect()
    }

    fn viewer_pose(&self) -> Option<ViewerPose> {
        let frame = self.slot.frame()?;
        let space = self.slot.reference_space()?;
        let pose = frame.get_viewer_pose(&space)?;

        let view = pose.views().get(0).dyn_into::<web_sys::XrView>().ok()?;
        Some(ViewerPose {
            transform: matrix_from(&pose.transform().matrix())?,
            projection: matrix_from(&view.projection_matrix())?,
        })
    }

    fn release_source(&mut self, source: HitTestSource) {
        if let Err(e) = source.cancel() {
            ArError::HitTestSource(format!("cancel: {e:?}")).log();
        }
    }
}

/// Viewer reference space first, then a hit-test source cast from it.
async fn acquire_hit_test_source(session: &XrSession) -> Result<HitTestSource, ArError> {
    let space = JsFuture::from(session.request_reference_space(XrReferenceSpaceType::Viewer))
        .await
        .map_err(|e| ArError::HitTestSource(format!("viewer space: {e:?}")))?;

    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &"space".into(), &space)
        .map_err(|e| ArError::HitTestSource(format!("{e:?}")))?;

    let source = JsFuture::from(session.request_hit_test_source(&options))
        .await
        .map_err(|e| ArError::HitTestSource(format!("{e:?}")))?;
    Ok(source.unchecked_into())
}

/// Column-major 4×4 as delivered by `XRRigidTransform.matrix`.
fn matrix_from(values: &[f32]) -> Option<Mat4> {
    (values.len() == 16).then(|| Mat4::from_cols_slice(values))
}
