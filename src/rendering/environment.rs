use bevy::asset::LoadState;
use bevy::core_pipeline::Skybox;
use bevy::prelude::*;

use crate::core::config::ShowcaseConfig;
use crate::rendering::{ViewerCamera, ViewerFailure, ViewerPhase};

/// Pre-filtered cube maps used for image-based lighting and the background.
#[derive(Resource, Debug, Clone)]
pub struct EnvironmentAssets {
    pub diffuse: Handle<Image>,
    pub specular: Handle<Image>,
}

pub fn load_environment(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<ShowcaseConfig>,
) {
    let viewer = &config.viewer;
    info!(
        "Loading environment maps: {} / {}",
        viewer.diffuse_map, viewer.specular_map
    );
    commands.insert_resource(EnvironmentAssets {
        diffuse: asset_server.load(viewer.diffuse_map.clone()),
        specular: asset_server.load(viewer.specular_map.clone()),
    });
}

/// Attaches the environment to the camera once both maps are in, then moves
/// on to loading the model.
pub fn track_environment_load(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    environment: Res<EnvironmentAssets>,
    config: Res<ShowcaseConfig>,
    cameras: Query<Entity, With<ViewerCamera>>,
    mut next_phase: ResMut<NextState<ViewerPhase>>,
) {
    let diffuse = asset_server.load_state(environment.diffuse.id());
    let specular = asset_server.load_state(environment.specular.id());

    for (label, state) in [("diffuse", &diffuse), ("specular", &specular)] {
        if let LoadState::Failed(err) = state {
            error!("Failed to load {} environment map: {}", label, err);
            commands.insert_resource(ViewerFailure(format!(
                "Environment map unavailable ({})",
                label
            )));
            next_phase.set(ViewerPhase::Failed);
            return;
        }
    }

    if !(matches!(diffuse, LoadState::Loaded) && matches!(specular, LoadState::Loaded)) {
        return;
    }

    let viewer = &config.viewer;
    for camera in cameras.iter() {
        commands.entity(camera).insert((
            EnvironmentMapLight {
                diffuse_map: environment.diffuse.clone(),
                specular_map: environment.specular.clone(),
                intensity: viewer.environment_intensity,
                rotation: Quat::IDENTITY,
            },
            Skybox {
                image: environment.specular.clone(),
                brightness: viewer.skybox_brightness,
                rotation: Quat::IDENTITY,
            },
        ));
    }
    info!("Environment ready");
    next_phase.set(ViewerPhase::LoadingModel);
}
