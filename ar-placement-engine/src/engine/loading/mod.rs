//! Startup loading of the viewer configuration asset.

/// JSON config loading with a fallback to built-in defaults.
pub mod config_loader;
