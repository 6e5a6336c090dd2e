/// Fallback camera used before the runtime reports a viewer pose.
pub const CAMERA_FOV_Y_DEGREES: f32 = 70.0;
pub const CAMERA_NEAR: f32 = 0.01;
pub const CAMERA_FAR: f32 = 20.0;
