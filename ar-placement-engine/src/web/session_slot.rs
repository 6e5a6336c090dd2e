use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{XrFrame, XrReferenceSpace, XrSession};

#[derive(Default)]
struct SlotState {
    session: Option<XrSession>,
    reference_space: Option<XrReferenceSpace>,
    frame: Option<XrFrame>,
    on_change: Option<Rc<dyn Fn()>>,
}

/// The running XR session and the frame currently being processed, shared
/// between the page callbacks, the runtime and the frame runner.
#[derive(Clone, Default)]
pub struct SessionSlot(Rc<RefCell<SlotState>>);

impl SessionSlot {
    pub fn session(&self) -> Option<XrSession> {
        self.0.borrow().session.clone()
    }

    pub fn reference_space(&self) -> Option<XrReferenceSpace> {
        self.0.borrow().reference_space.clone()
    }

    /// Only set while a session frame callback is running.
    pub fn frame(&self) -> Option<XrFrame> {
        self.0.borrow().frame.clone()
    }

    pub fn set_frame(&self, frame: Option<XrFrame>) {
        self.0.borrow_mut().frame = frame;
    }

    pub fn attach(&self, session: XrSession, reference_space: XrReferenceSpace) {
        {
            let mut state = self.0.borrow_mut();
            state.session = Some(session);
            state.reference_space = Some(reference_space);
        }
        self.notify();
    }

    pub fn detach(&self) {
        {
            let mut state = self.0.borrow_mut();
            state.session = None;
            state.reference_space = None;
            state.frame = None;
        }
        self.notify();
    }

    /// Called after every attach and detach, outside any borrow of the slot.
    pub fn set_on_change(&self, hook: impl Fn() + 'static) {
        self.0.borrow_mut().on_change = Some(Rc::new(hook));
    }

    fn notify(&self) {
        let hook = self.0.borrow().on_change.clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}
