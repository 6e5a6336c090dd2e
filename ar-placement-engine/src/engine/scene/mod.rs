//! Scene graph mirrored to the external renderer.
//!
//! The ECS world owns camera, light, placement indicator and target model.
//! Every frame the changed nodes are pushed to the [`render_backend::RenderBackend`]
//! and one render pass is issued.

/// Renderer seam and the non-send host wrapper.
pub mod render_backend;

/// Scene entities, model loading and per-frame sync systems.
pub mod scene_host;

use bevy::prelude::*;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::core::frame_schedule::FrameSet;
use scene_host::{receive_loaded_model, render_frame, request_model_load, spawn_scene, sync_render_nodes};

/// Registers scene spawning, model loading and the render pass.
pub struct SceneHostPlugin;

impl Plugin for SceneHostPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                spawn_scene.run_if(resource_added::<ViewerConfig>),
                request_model_load,
                receive_loaded_model,
            )
                .chain()
                .in_set(FrameSet::Input)
                .run_if(resource_exists::<ViewerConfig>),
        )
        .add_systems(
            Update,
            sync_render_nodes
                .in_set(FrameSet::Sync)
                .run_if(resource_exists::<ViewerConfig>),
        )
        .add_systems(
            Update,
            render_frame
                .in_set(FrameSet::Render)
                .run_if(resource_exists::<ViewerConfig>),
        );
    }
}
