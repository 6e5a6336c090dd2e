use constants::gestures::{MAX_MODEL_SCALE, MIN_MODEL_SCALE, MIN_PINCH_DISTANCE};

#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchBaseline {
    distance: f32,
    scale: f32,
}

/// Two-finger uniform scaling relative to a baseline taken when the pinch starts.
#[derive(Debug, Default, Clone)]
pub struct PinchScale {
    baseline: Option<PinchBaseline>,
}

impl PinchScale {
    /// Record the baseline. Contacts closer than the minimum distance cannot
    /// anchor a ratio and leave the pinch inactive.
    pub fn begin(&mut self, distance: f32, current_scale: f32) {
        self.baseline = (distance.is_finite() && distance >= MIN_PINCH_DISTANCE).then_some(
            PinchBaseline {
                distance,
                scale: current_scale,
            },
        );
    }

    pub fn clear(&mut self) {
        self.baseline = None;
    }

    pub fn is_active(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn baseline_distance(&self) -> Option<f32> {
        self.baseline.map(|b| b.distance)
    }

    /// Uniform scale for the current inter-pointer distance.
    pub fn scale_for(&self, distance: f32) -> Option<f32> {
        let baseline = self.baseline?;
        if !distance.is_finite() {
            return None;
        }
        let scaled = baseline.scale * (distance / baseline.distance);
        // Never clamp a baseline that already sits outside the limits.
        let lo = MIN_MODEL_SCALE.min(baseline.scale);
        let hi = MAX_MODEL_SCALE.max(baseline.scale);
        Some(scaled.clamp(lo, hi))
    }
}
