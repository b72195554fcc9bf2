/// Bounding boxes and camera fitting maths
pub mod bounds;
pub mod environment;
/// Rendering modules for the 3D model viewer page
pub mod model_loader;
pub mod orbit_camera;

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;

use crate::core::config::ShowcaseConfig;
use crate::core::pages::{Page, ShowcaseSet};
use crate::ui::viewer_overlay::{show_viewer_failure, spawn_viewer_overlay};
use environment::{load_environment, track_environment_load, EnvironmentAssets};
use model_loader::{fit_model_to_view, spawn_model, track_model_load, ModelAsset};
use orbit_camera::{handle_orbit_input, update_orbit_camera, OrbitCamera};

/// Loading progress of the viewer page. The model is only requested once the
/// environment is in, and the controls only respond once the model is framed.
#[derive(SubStates, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[source(Page = Page::ModelViewer)]
pub enum ViewerPhase {
    #[default]
    LoadingEnvironment,
    LoadingModel,
    Fitting,
    Ready,
    Failed,
}

/// Message shown in place of the preview label after a load failure.
#[derive(Resource, Debug, Clone)]
pub struct ViewerFailure(pub String);

#[derive(Component)]
pub struct ViewerCamera;

pub struct ModelViewerPlugin;

impl Plugin for ModelViewerPlugin {
    fn build(&self, app: &mut App) {
        app.add_sub_state::<ViewerPhase>()
            .add_systems(
                OnEnter(Page::ModelViewer),
                (setup_viewer_scene, load_environment, spawn_viewer_overlay).chain(),
            )
            .add_systems(OnEnter(ViewerPhase::LoadingModel), spawn_model)
            .add_systems(OnEnter(ViewerPhase::Failed), show_viewer_failure)
            .add_systems(
                Update,
                (
                    track_environment_load.run_if(in_state(ViewerPhase::LoadingEnvironment)),
                    track_model_load.run_if(in_state(ViewerPhase::LoadingModel)),
                    fit_model_to_view.run_if(in_state(ViewerPhase::Fitting)),
                )
                    .in_set(ShowcaseSet::Logic),
            )
            .add_systems(
                Update,
                (
                    handle_orbit_input.in_set(ShowcaseSet::Input),
                    update_orbit_camera.in_set(ShowcaseSet::Rendering),
                )
                    .run_if(in_state(ViewerPhase::Ready)),
            )
            .add_systems(OnExit(Page::ModelViewer), release_viewer_assets);
    }
}

pub fn setup_viewer_scene(mut commands: Commands, config: Res<ShowcaseConfig>) {
    let viewer = &config.viewer;
    let start = Vec3::new(0.0, 0.0, viewer.initial_distance);

    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(Color::NONE),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: viewer.fov_radians(),
            near: viewer.near,
            far: viewer.far,
            ..default()
        }),
        Tonemapping::AcesFitted,
        Msaa::Sample4,
        Transform::from_translation(start).looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCamera::new(start, Vec3::ZERO),
        ViewerCamera,
        StateScoped(Page::ModelViewer),
    ));

    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            illuminance: viewer.light_illuminance,
            ..default()
        },
        Transform::from_translation(Vec3::from_array(viewer.light_position))
            .looking_at(Vec3::ZERO, Vec3::Y),
        StateScoped(Page::ModelViewer),
    ));

    info!("Model viewer scene set up");
}

pub fn release_viewer_assets(mut commands: Commands) {
    commands.remove_resource::<EnvironmentAssets>();
    commands.remove_resource::<ModelAsset>();
    commands.remove_resource::<ViewerFailure>();
    debug!("Released model viewer assets");
}
