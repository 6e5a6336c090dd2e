// build.rs
use std::{env, fs, path::PathBuf};

use constants::viewer::{
    DEFAULT_AR_BUTTON_LABEL, DEFAULT_MODEL_HEIGHT, DEFAULT_MODEL_PATH,
    DEFAULT_SCREENSHOT_BUTTON_ID, DEFAULT_SCREENSHOT_FILENAME, DEFAULT_VIEWER_ASSET_EXTENSION,
    VIEWER_CONFIG_PATH,
};

/// Writes the default viewer configuration into `assets/` so a fresh checkout
/// serves a complete config. An existing file is left alone.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_dir = manifest_dir.join("assets");
    fs::create_dir_all(&assets_dir)?;

    let config_path = assets_dir.join(VIEWER_CONFIG_PATH);
    if config_path.exists() {
        return Ok(());
    }

    let config = serde_json::json!({
        "model_path": DEFAULT_MODEL_PATH,
        "viewer_asset_extension": DEFAULT_VIEWER_ASSET_EXTENSION,
        "desired_model_height": DEFAULT_MODEL_HEIGHT,
        "scale_normalization": "on_load",
        "screenshot_filename": DEFAULT_SCREENSHOT_FILENAME,
        "screenshot_button_id": DEFAULT_SCREENSHOT_BUTTON_ID,
        "ar_button_label": DEFAULT_AR_BUTTON_LABEL,
        "hidden_during_session": [],
    });
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("cargo:warning=Generated default config in assets/{VIEWER_CONFIG_PATH}");
    Ok(())
}
