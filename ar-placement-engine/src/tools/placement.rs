use bevy::prelude::*;

use crate::engine::assets::viewer_config::{ScaleNormalization, ViewerConfig};
use crate::engine::scene::scene_host::{NodeVisibility, Reticle, TargetModel};

/// A select action from the AR runtime: screen tap or controller trigger.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct SelectEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    Placed,
    IndicatorHidden,
    ModelNotLoaded,
}

/// Copy the indicator's position onto the model and show it.
/// Leaves everything untouched unless the indicator is visible and the model loaded.
pub fn place_model(
    indicator: &Transform,
    indicator_visible: bool,
    model: &mut TargetModel,
    model_transform: &mut Transform,
    model_visibility: &mut NodeVisibility,
    normalization: ScaleNormalization,
) -> PlacementOutcome {
    if !indicator_visible {
        return PlacementOutcome::IndicatorHidden;
    }
    if !model.is_loaded() {
        return PlacementOutcome::ModelNotLoaded;
    }

    model_transform.translation = indicator.translation;
    if normalization == ScaleNormalization::OnPlacement {
        model_transform.scale = Vec3::splat(model.scale_ratio);
    }
    model_visibility.0 = true;
    model.placed = true;
    PlacementOutcome::Placed
}

pub fn place_on_select(
    mut selects: EventReader<SelectEvent>,
    config: Res<ViewerConfig>,
    reticle: Query<(&Transform, &NodeVisibility), (With<Reticle>, Without<TargetModel>)>,
    mut models: Query<(&mut TargetModel, &mut Transform, &mut NodeVisibility), Without<Reticle>>,
) {
    for _ in selects.read() {
        let Ok((indicator, indicator_visibility)) = reticle.single() else {
            return;
        };
        let Ok((mut model, mut transform, mut visibility)) = models.single_mut() else {
            return;
        };

        let first = !model.placed;
        let outcome = place_model(
            indicator,
            indicator_visibility.0,
            &mut model,
            &mut transform,
            &mut visibility,
            config.scale_normalization,
        );
        match outcome {
            PlacementOutcome::Placed if first => {
                info!("Model placed at {:?}", transform.translation)
            }
            PlacementOutcome::Placed => debug!("Model re-placed at {:?}", transform.translation),
            PlacementOutcome::IndicatorHidden => debug!("Select ignored, no surface under reticle"),
            PlacementOutcome::ModelNotLoaded => debug!("Select ignored, model not loaded yet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::model_bounds::ModelBounds;

    fn loaded_model() -> TargetModel {
        TargetModel {
            bounds: Some(ModelBounds {
                min: Vec3::ZERO,
                max: Vec3::new(1.0, 4.0, 1.0),
            }),
            scale_ratio: 0.25,
            ..TargetModel::new("models/model.glb")
        }
    }

    fn pose_p() -> Transform {
        Transform::from_matrix(Mat4::from_rotation_translation(
            Quat::from_rotation_y(0.7),
            Vec3::new(0.4, -1.2, -2.0),
        ))
    }

    #[test]
    fn hidden_indicator_leaves_model_untouched() {
        let mut model = loaded_model();
        let mut transform = Transform::from_xyz(1.0, 2.0, 3.0);
        let mut visibility = NodeVisibility(false);

        let outcome = place_model(
            &pose_p(),
            false,
            &mut model,
            &mut transform,
            &mut visibility,
            ScaleNormalization::OnLoad,
        );

        assert_eq!(outcome, PlacementOutcome::IndicatorHidden);
        assert_eq!(transform, Transform::from_xyz(1.0, 2.0, 3.0));
        assert!(!visibility.0);
        assert!(!model.placed);
    }

    #[test]
    fn unloaded_model_is_not_placed() {
        let mut model = TargetModel::new("models/model.glb");
        let mut transform = Transform::IDENTITY;
        let mut visibility = NodeVisibility(false);

        let outcome = place_model(
            &pose_p(),
            true,
            &mut model,
            &mut transform,
            &mut visibility,
            ScaleNormalization::OnLoad,
        );

        assert_eq!(outcome, PlacementOutcome::ModelNotLoaded);
        assert!(!visibility.0);
    }

    #[test]
    fn select_places_model_at_indicator_translation() {
        let mut model = loaded_model();
        let mut transform = Transform::IDENTITY;
        let mut visibility = NodeVisibility(false);
        let pose = pose_p();

        place_model(
            &pose,
            true,
            &mut model,
            &mut transform,
            &mut visibility,
            ScaleNormalization::OnLoad,
        );

        assert!(visibility.0);
        assert!(model.placed);
        assert_eq!(transform.translation, Vec3::new(0.4, -1.2, -2.0));
        assert_eq!(transform.rotation, Quat::IDENTITY);
        assert_eq!(transform.scale, Vec3::ONE);
    }

    #[test]
    fn placement_normalisation_applies_ratio() {
        let mut model = loaded_model();
        let mut transform = Transform::IDENTITY;
        let mut visibility = NodeVisibility(false);

        place_model(
            &pose_p(),
            true,
            &mut model,
            &mut transform,
            &mut visibility,
            ScaleNormalization::OnPlacement,
        );

        assert_eq!(transform.scale, Vec3::splat(0.25));
        let height = model.bounds.map(|b| b.height()).unwrap_or_default() * transform.scale.y;
        assert!((height - 1.0).abs() < 1e-6);
    }

    #[test]
    fn repeated_select_re_places_at_latest_pose() {
        let mut app = App::new();
        app.insert_resource(ViewerConfig::default())
            .add_event::<SelectEvent>()
            .add_systems(Update, place_on_select);
        let reticle = app
            .world_mut()
            .spawn((Reticle, pose_p(), NodeVisibility(true)))
            .id();
        let model = app
            .world_mut()
            .spawn((loaded_model(), Transform::IDENTITY, NodeVisibility(false)))
            .id();

        app.world_mut().send_event(SelectEvent);
        app.update();
        assert_eq!(
            app.world().get::<Transform>(model).map(|t| t.translation),
            Some(Vec3::new(0.4, -1.2, -2.0))
        );

        app.world_mut()
            .entity_mut(reticle)
            .insert(Transform::from_xyz(3.0, 0.0, -1.0));
        app.world_mut().send_event(SelectEvent);
        app.update();
        assert_eq!(
            app.world().get::<Transform>(model).map(|t| t.translation),
            Some(Vec3::new(3.0, 0.0, -1.0))
        );
        assert!(app.world().get::<NodeVisibility>(model).is_some_and(|v| v.0));
    }
}
