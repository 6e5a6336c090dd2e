pub mod ar_session;
pub mod gestures;
pub mod render_settings;
pub mod viewer;
