use std::marker::PhantomData;

use bevy::prelude::*;

use crate::engine::core::frame_schedule::configure_frame_sets;
use crate::engine::scene::SceneHostPlugin;
use crate::tools::InteractionToolsPlugin;
use crate::xr::XrSessionPlugin;
use crate::xr::runtime::XrRuntime;

#[cfg(target_arch = "wasm32")]
use crate::{
    engine::assets::viewer_config::ViewerConfig,
    engine::core::app_state::{AppState, announce_running},
    engine::loading::config_loader::{ConfigLoader, load_config_system, start_loading},
    engine::scene::render_backend::RendererHost,
    tools::screenshot::ScreenshotControlsHost,
    xr::session::SessionLauncherHost,
};
#[cfg(target_arch = "wasm32")]
use bevy::{
    app::ScheduleRunnerPlugin, asset::AssetMetaCheck, log::LogPlugin, state::app::StatesPlugin,
};
#[cfg(target_arch = "wasm32")]
use bevy_common_assets::json::JsonAssetPlugin;

/// Page-side collaborators injected into the app.
#[cfg(target_arch = "wasm32")]
pub struct HostBindings {
    pub renderer: RendererHost,
    pub launcher: SessionLauncherHost,
    pub controls: ScreenshotControlsHost,
}

/// Everything that runs once a `ViewerConfig` is present: scene host,
/// session lifecycle, hit-testing and interaction tools, in frame order.
pub struct ArPlacementPlugin<R>(PhantomData<fn() -> R>);

impl<R> Default for ArPlacementPlugin<R> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<R: XrRuntime> Plugin for ArPlacementPlugin<R> {
    fn build(&self, app: &mut App) {
        configure_frame_sets(app);
        app.add_plugins((
            SceneHostPlugin,
            XrSessionPlugin::<R>::default(),
            InteractionToolsPlugin,
        ));
    }
}

#[cfg(target_arch = "wasm32")]
pub fn create_app<R: XrRuntime>(runtime: R, host: HostBindings) -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        // Registers ViewerConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ViewerConfig>::new(&["json"]))
        .init_resource::<ConfigLoader>()
        .insert_non_send_resource(runtime)
        .insert_non_send_resource(host.renderer)
        .insert_non_send_resource(host.launcher)
        .insert_non_send_resource(host.controls)
        .add_plugins(ArPlacementPlugin::<R>::default());

    app.add_systems(Startup, start_loading)
        .add_systems(
            Update,
            load_config_system.run_if(in_state(AppState::Loading)),
        )
        .add_systems(OnEnter(AppState::Running), announce_running);

    app
}

/// Headless core: the host page drives frames and draws through the renderer.
#[cfg(target_arch = "wasm32")]
fn create_default_plugins() -> impl PluginGroup {
    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    MinimalPlugins
        .build()
        .disable::<ScheduleRunnerPlugin>()
        .add(LogPlugin::default())
        .add(asset_config)
        .add(StatesPlugin)
}
