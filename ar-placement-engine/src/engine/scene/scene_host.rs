use bevy::prelude::*;
use constants::render_settings::{CAMERA_FAR, CAMERA_FOV_Y_DEGREES, CAMERA_NEAR};

use super::render_backend::RendererHost;
use crate::engine::assets::model_bounds::{ModelBounds, normalization_ratio};
use crate::engine::assets::viewer_config::{ScaleNormalization, ViewerConfig};
use crate::xr::runtime::XrRuntime;

/// Renderer-side identity of a scene entity. There is exactly one of each.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneNode {
    Camera,
    Light,
    Reticle,
    Model,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeVisibility(pub bool);

/// Placement indicator. Its pose is only meaningful while visible.
#[derive(Component, Debug, Default)]
pub struct Reticle;

#[derive(Component, Debug, Default)]
pub struct SceneLight;

/// The one model tracked per session.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct TargetModel {
    pub url: String,
    /// Local-space bounds, present once the renderer finished loading.
    pub bounds: Option<ModelBounds>,
    /// Uniform scale that brings the model to the configured height.
    pub scale_ratio: f32,
    pub placed: bool,
}

impl TargetModel {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bounds: None,
            scale_ratio: 1.0,
            placed: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.bounds.is_some()
    }
}

/// Projection and viewport of the scene camera.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ArCamera {
    pub projection: Mat4,
    pub viewport: Vec2,
}

impl ArCamera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            projection: fallback_projection(viewport),
            viewport,
        }
    }

    /// World-space ray through a point on the drawing surface, given in pixels
    /// from the top-left corner.
    pub fn viewport_ray(&self, camera: &Transform, screen: Vec2) -> Option<Ray3d> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(
            screen.x / self.viewport.x * 2.0 - 1.0,
            1.0 - screen.y / self.viewport.y * 2.0,
        );
        let clip_to_world = camera.compute_matrix() * self.projection.inverse();
        let near = clip_to_world.project_point3(ndc.extend(-1.0));
        let far = clip_to_world.project_point3(ndc.extend(1.0));
        let direction = Dir3::new(far - near).ok()?;
        Some(Ray3d::new(near, direction))
    }
}

/// Perspective used outside a session, when no runtime projection is available.
fn fallback_projection(viewport: Vec2) -> Mat4 {
    let aspect = if viewport.y > 0.0 {
        viewport.x / viewport.y
    } else {
        1.0
    };
    Mat4::perspective_rh_gl(
        CAMERA_FOV_Y_DEGREES.to_radians(),
        aspect,
        CAMERA_NEAR,
        CAMERA_FAR,
    )
}

/// Spawn camera, light, reticle and the hidden target model.
pub fn spawn_scene(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    renderer: NonSend<RendererHost>,
) {
    let viewport = renderer.viewport_size();

    commands.spawn((
        SceneNode::Camera,
        ArCamera::new(viewport),
        Transform::IDENTITY,
    ));
    commands.spawn((
        SceneNode::Light,
        SceneLight,
        Transform::from_xyz(0.5, 1.0, 0.25),
    ));
    commands.spawn((
        SceneNode::Reticle,
        Reticle,
        Transform::IDENTITY,
        NodeVisibility(false),
    ));
    commands.spawn((
        SceneNode::Model,
        TargetModel::new(config.model_path.clone()),
        Transform::IDENTITY,
        NodeVisibility(false),
    ));

    info!("Scene ready, viewport {}x{}", viewport.x, viewport.y);
}

pub fn request_model_load(
    mut renderer: NonSendMut<RendererHost>,
    models: Query<&TargetModel, Added<TargetModel>>,
) {
    for model in &models {
        info!("Loading model: {}", model.url);
        renderer.load_model(&model.url);
    }
}

/// Attach finished loads to the target model and compute its scale ratio.
pub fn receive_loaded_model(
    mut renderer: NonSendMut<RendererHost>,
    config: Res<ViewerConfig>,
    mut models: Query<(&mut TargetModel, &mut Transform)>,
) {
    while let Some(result) = renderer.take_loaded_model() {
        let loaded = match result {
            Ok(loaded) => loaded,
            Err(err) => {
                err.log();
                continue;
            }
        };

        let Some((mut model, mut transform)) =
            models.iter_mut().find(|(model, _)| model.url == loaded.url)
        else {
            warn!("Ignoring model load for untracked url {}", loaded.url);
            continue;
        };

        model.scale_ratio = match config.scale_normalization {
            ScaleNormalization::Disabled => 1.0,
            _ => normalization_ratio(loaded.bounds.height(), config.desired_model_height),
        };
        if config.scale_normalization == ScaleNormalization::OnLoad {
            transform.scale = Vec3::splat(model.scale_ratio);
        }
        model.bounds = Some(loaded.bounds);

        info!(
            "✓ Model loaded: {} (height {:.3}, scale ratio {:.4})",
            loaded.url,
            loaded.bounds.height(),
            model.scale_ratio
        );
    }
}

/// Copy the runtime's viewer pose onto the camera. Outside a session the camera
/// keeps its pose and only follows viewport size changes.
pub fn sync_camera_pose<R: XrRuntime>(
    runtime: NonSend<R>,
    renderer: NonSend<RendererHost>,
    mut cameras: Query<(&mut Transform, &mut ArCamera)>,
) {
    let Ok((mut transform, mut camera)) = cameras.single_mut() else {
        return;
    };

    let viewport = renderer.viewport_size();
    match runtime.viewer_pose() {
        Some(pose) if runtime.session_active() => {
            *transform = Transform::from_matrix(pose.transform);
            camera.projection = pose.projection;
            camera.viewport = viewport;
        }
        _ if camera.viewport != viewport => *camera = ArCamera::new(viewport),
        _ => {}
    }
}

pub fn sync_render_nodes(
    mut renderer: NonSendMut<RendererHost>,
    nodes: Query<
        (&SceneNode, &Transform, Option<&NodeVisibility>),
        Or<(Changed<Transform>, Changed<NodeVisibility>)>,
    >,
) {
    for (node, transform, visibility) in &nodes {
        let visible = visibility.is_none_or(|v| v.0);
        renderer.sync_node(*node, transform.compute_matrix(), visible);
    }
}

pub fn render_frame(mut renderer: NonSendMut<RendererHost>) {
    renderer.render();
}
