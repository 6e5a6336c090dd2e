use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    /// Waiting for the viewer config.
    #[default]
    Loading,
    Running,
}

pub fn announce_running() {
    info!("→ Viewer config ready, transitioning to Running state");
}
