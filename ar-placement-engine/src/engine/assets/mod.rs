//! Asset-side data: viewer configuration and model bounds.

/// Bounding boxes reported by the model loader and scale normalisation.
pub mod model_bounds;

/// JSON viewer configuration, loadable through the asset server.
pub mod viewer_config;
