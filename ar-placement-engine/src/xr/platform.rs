use constants::ar_session::NATIVE_VIEWER_DEVICES;

/// How the AR entry control starts an AR experience on this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArEntryPath {
    /// Hand the model to the operating system's AR viewer through a typed link.
    NativeViewer,
    /// Request an immersive AR session from the in-page XR runtime.
    WebXr,
}

/// Classify the runtime from its identification string.
///
/// `legacy_ms_stream` reports whether the host defines `window.MSStream`, which
/// old Windows Phone browsers set while also claiming to be an iPhone.
pub fn detect_entry_path(user_agent: &str, legacy_ms_stream: bool) -> ArEntryPath {
    let handheld_viewer = NATIVE_VIEWER_DEVICES
        .iter()
        .any(|device| user_agent.contains(device));

    if handheld_viewer && !legacy_ms_stream {
        ArEntryPath::NativeViewer
    } else {
        ArEntryPath::WebXr
    }
}
