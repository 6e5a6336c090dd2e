use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounds as reported by the host model loader.
/// Mirrors the JSON shape `{ "min": [x, y, z], "max": [x, y, z] }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsData {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// Local-space bounding box of the loaded target model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl From<BoundsData> for ModelBounds {
    fn from(data: BoundsData) -> Self {
        let a = Vec3::from_array(data.min);
        let b = Vec3::from_array(data.max);
        // Loaders occasionally report swapped corners for empty groups.
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }
}

impl ModelBounds {
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// A model whose host-side load finished, ready to be attached to the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub url: String,
    pub bounds: ModelBounds,
}

/// Uniform scale that brings a model of `original_height` to `desired_height`.
///
/// Degenerate inputs (flat, inverted or non-finite heights) fall back to 1.0 so
/// the model keeps its authored size instead of vanishing or exploding.
pub fn normalization_ratio(original_height: f32, desired_height: f32) -> f32 {
    if !original_height.is_finite() || original_height <= f32::EPSILON {
        warn!(
            "Model height {} cannot be normalised, keeping authored scale",
            original_height
        );
        return 1.0;
    }
    if !desired_height.is_finite() || desired_height <= 0.0 {
        warn!(
            "Desired model height {} is invalid, keeping authored scale",
            desired_height
        );
        return 1.0;
    }
    desired_height / original_height
}
