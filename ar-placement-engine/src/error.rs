use bevy::log::Level;
use bevy::prelude::*;
use thiserror::Error;

/// Failures surfaced by the AR entry path, the host bindings and screenshot export.
///
/// None of these are retried. Each one ends the attempt that produced it and a
/// fresh user action is required to try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArError {
    /// The host exposes no XR runtime at all.
    #[error("WebXR is not available, AR mode cannot be used on this device")]
    XrUnavailable,

    /// The runtime exists but rejects the immersive AR session mode.
    #[error("immersive-ar sessions are not supported on this device")]
    SessionUnsupported,

    #[error("failed to start AR session: {0}")]
    SessionStart(String),

    /// Native viewer path invoked while no model is being displayed.
    #[error("no model is currently displayed")]
    NoModelDisplayed,

    #[error("hit-test source request failed: {0}")]
    HitTestSource(String),

    #[error("failed to load model {url}: {reason}")]
    ModelLoad { url: String, reason: String },

    #[error("frame capture failed: {0}")]
    Capture(String),

    #[error("download failed: {0}")]
    Download(String),

    #[cfg(target_arch = "wasm32")]
    #[error("page binding failed: {0}")]
    Dom(String),
}

impl ArError {
    /// Log level used when the error is reported.
    pub fn severity(&self) -> Level {
        match self {
            Self::XrUnavailable | Self::SessionUnsupported => Level::INFO,
            Self::NoModelDisplayed | Self::HitTestSource(_) => Level::WARN,
            _ => Level::ERROR,
        }
    }

    pub fn log(&self) {
        let level = self.severity();
        if level == Level::INFO {
            info!("{self}");
        } else if level == Level::WARN {
            warn!("{self}");
        } else {
            error!("{self}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_absent_is_informational() {
        assert_eq!(ArError::XrUnavailable.severity(), Level::INFO);
        assert_eq!(ArError::SessionUnsupported.severity(), Level::INFO);
    }

    #[test]
    fn missing_model_is_a_warning() {
        assert_eq!(ArError::NoModelDisplayed.severity(), Level::WARN);
    }

    #[test]
    fn unresolved_hit_test_source_is_a_warning() {
        let err = ArError::HitTestSource("NotSupportedError".into());
        assert_eq!(err.severity(), Level::WARN);
    }

    #[test]
    fn session_start_failure_is_an_error() {
        let err = ArError::SessionStart("NotAllowedError".into());
        assert_eq!(err.severity(), Level::ERROR);
        assert_eq!(
            err.to_string(),
            "failed to start AR session: NotAllowedError"
        );
    }
}
