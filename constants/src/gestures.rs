/// Below this inter-pointer distance (CSS pixels) a pinch baseline is not recorded.
/// Prevents a divide-by-near-zero when two contacts land on the same spot.
pub const MIN_PINCH_DISTANCE: f32 = 1.0;

/// Clamp range for the uniform model scale produced by pinching.
pub const MIN_MODEL_SCALE: f32 = 0.01;
pub const MAX_MODEL_SCALE: f32 = 100.0;
