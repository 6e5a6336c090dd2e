/// Path of the viewer configuration asset, relative to the asset root.
pub const VIEWER_CONFIG_PATH: &str = "ar_viewer_config.json";

/// Primary scene asset loaded at startup.
pub const DEFAULT_MODEL_PATH: &str = "models/model.glb";

/// Extension of the native viewer counterpart (same base name as the model).
pub const DEFAULT_VIEWER_ASSET_EXTENSION: &str = "usdz";

/// Real-world height, in metres, a loaded model is normalised to.
pub const DEFAULT_MODEL_HEIGHT: f32 = 1.0;

pub const DEFAULT_SCREENSHOT_FILENAME: &str = "screenshot.png";
pub const DEFAULT_SCREENSHOT_BUTTON_ID: &str = "screenshot-button";
pub const DEFAULT_AR_BUTTON_LABEL: &str = "AR モード";

pub const SCREENSHOT_MIME_TYPE: &str = "image/png";
