use bevy::prelude::*;
use constants::viewer::VIEWER_CONFIG_PATH;

use crate::engine::assets::viewer_config::ViewerConfig;
#[cfg(target_arch = "wasm32")]
use {crate::engine::core::app_state::AppState, bevy::asset::LoadState};

#[cfg(target_arch = "wasm32")]
#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<ViewerConfig>>,
}

#[cfg(target_arch = "wasm32")]
pub fn start_loading(mut loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    info!("Loading viewer config from: {}", VIEWER_CONFIG_PATH);
    loader.handle = Some(asset_server.load(VIEWER_CONFIG_PATH));
}

/// Insert the loaded config, or the defaults once loading has failed.
#[cfg(target_arch = "wasm32")]
pub fn load_config_system(
    loader: Res<ConfigLoader>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<ViewerConfig>>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(handle) = loader.handle.as_ref() else {
        return;
    };

    let failed = matches!(
        asset_server.get_load_state(handle),
        Some(LoadState::Failed(_))
    );
    if let Some(config) = settle_config(configs.get(handle), failed) {
        commands.insert_resource(config);
        next_state.set(AppState::Running);
    }
}

/// `None` while the load is still in progress.
fn settle_config(loaded: Option<&ViewerConfig>, failed: bool) -> Option<ViewerConfig> {
    match loaded {
        Some(config) => {
            info!("✓ Viewer config loaded, model: {}", config.model_path);
            Some(config.clone())
        }
        None if failed => {
            warn!(
                "Viewer config {} could not be loaded, using defaults",
                VIEWER_CONFIG_PATH
            );
            Some(ViewerConfig::default())
        }
        None => None,
    }
}
