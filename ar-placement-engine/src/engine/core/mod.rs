//! Core application setup and state management.
//!
//! Builds the headless app that coordinates the AR viewer, owns the frame
//! schedule, and moves from config loading to the running state.

/// App construction, plugin wiring and host binding injection.
pub mod app_setup;

/// Loading → Running state machine.
#[cfg(target_arch = "wasm32")]
pub mod app_state;

/// Ordered system sets that make up one frame.
pub mod frame_schedule;
