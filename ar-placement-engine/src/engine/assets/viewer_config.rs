use bevy::prelude::*;
use constants::viewer::{
    DEFAULT_AR_BUTTON_LABEL, DEFAULT_MODEL_HEIGHT, DEFAULT_MODEL_PATH,
    DEFAULT_SCREENSHOT_BUTTON_ID, DEFAULT_SCREENSHOT_FILENAME, DEFAULT_VIEWER_ASSET_EXTENSION,
};
use serde::{Deserialize, Serialize};

/// When the model's uniform scale ratio is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleNormalization {
    /// As soon as the host reports the model's bounds.
    #[default]
    OnLoad,
    /// Every time the model is placed on a surface.
    OnPlacement,
    /// Keep the authored size.
    Disabled,
}

/// Viewer configuration loaded from `ar_viewer_config.json`. Every field is optional
/// in the file; missing ones take the defaults from the constants crate.
#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub model_path: String,
    pub viewer_asset_extension: String,
    pub desired_model_height: f32,
    pub scale_normalization: ScaleNormalization,
    pub screenshot_filename: String,
    pub screenshot_button_id: String,
    pub ar_button_label: String,
    /// Page elements hidden while an immersive session runs.
    pub hidden_during_session: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_string(),
            viewer_asset_extension: DEFAULT_VIEWER_ASSET_EXTENSION.to_string(),
            desired_model_height: DEFAULT_MODEL_HEIGHT,
            scale_normalization: ScaleNormalization::default(),
            screenshot_filename: DEFAULT_SCREENSHOT_FILENAME.to_string(),
            screenshot_button_id: DEFAULT_SCREENSHOT_BUTTON_ID.to_string(),
            ar_button_label: DEFAULT_AR_BUTTON_LABEL.to_string(),
            hidden_during_session: Vec::new(),
        }
    }
}

impl ViewerConfig {
    /// Native viewer counterpart of `model_url`: same base name, viewer extension.
    pub fn viewer_asset_url(&self, model_url: &str) -> String {
        swap_extension(model_url, &self.viewer_asset_extension)
    }
}

/// Replace the extension of the last path segment, ignoring any query or fragment.
fn swap_extension(url: &str, extension: &str) -> String {
    let suffix_start = url.find(['?', '#']).unwrap_or(url.len());
    let (path, suffix) = url.split_at(suffix_start);
    let segment_start = path.rfind('/').map_or(0, |i| i + 1);
    let stem_end = path[segment_start..]
        .rfind('.')
        .filter(|&dot| dot > 0)
        .map_or(path.len(), |dot| segment_start + dot);

    format!("{}.{}{}", &path[..stem_end], extension, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let config: ViewerConfig = serde_json::from_str("{}").expect("empty object parses");
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.desired_model_height, 1.0);
        assert_eq!(config.screenshot_filename, "screenshot.png");
    }

    #[test]
    fn partial_json_overrides_named_fields() {
        let config: ViewerConfig = serde_json::from_str(
            r#"{
                "model_path": "assets/chair.glb",
                "scale_normalization": "on_placement",
                "hidden_during_session": ["header", "model-picker"]
            }"#,
        )
        .expect("partial config parses");

        assert_eq!(config.model_path, "assets/chair.glb");
        assert_eq!(config.scale_normalization, ScaleNormalization::OnPlacement);
        assert_eq!(config.hidden_during_session, vec!["header", "model-picker"]);
        assert_eq!(config.screenshot_button_id, "screenshot-button");
    }

    #[test]
    fn viewer_asset_shares_base_name() {
        let config = ViewerConfig::default();
        assert_eq!(
            config.viewer_asset_url("models/model.glb"),
            "models/model.usdz"
        );
        assert_eq!(
            config.viewer_asset_url("https://cdn.example.com/a.b/chair.glb?v=3"),
            "https://cdn.example.com/a.b/chair.usdz?v=3"
        );
    }

    #[test]
    fn viewer_asset_without_extension_gains_one() {
        let config = ViewerConfig::default();
        assert_eq!(config.viewer_asset_url("models/chair"), "models/chair.usdz");
        assert_eq!(config.viewer_asset_url("models/.hidden"), "models/.hidden.usdz");
    }
}
