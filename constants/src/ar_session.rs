/// Session mode requested from the host XR runtime.
pub const IMMERSIVE_AR_MODE: &str = "immersive-ar";

/// Optional capabilities requested with every immersive AR session.
/// Order matches the request sent to the runtime.
pub const OPTIONAL_SESSION_FEATURES: &[&str] = &["dom-overlay", "local-floor", "hit-test"];

/// Device tokens in the user agent that route entry through the native AR viewer.
pub const NATIVE_VIEWER_DEVICES: &[&str] = &["iPad", "iPhone", "iPod"];

/// Link relation that asks the OS to open an asset in its AR viewer.
pub const NATIVE_VIEWER_LINK_REL: &str = "ar";
