//! # Model Loader Module
//!
//! Loads the showcased GLTF model and frames it for the orbit camera:
//!
//! 1. **LoadingModel**: request the scene and spawn it at the configured scale
//! 2. **Fitting**: once the scene instance exists and mesh bounds are
//!    computed, recentre the model on the orbit target and back the camera off
//!    until the bounding sphere fits the view
//!
//! A model without any mesh keeps the default camera placement.

use bevy::asset::LoadState;
use bevy::gltf::{Gltf, GltfAssetLabel};
use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use bevy::scene::{SceneInstance, SceneSpawner};
use bevy::window::PrimaryWindow;

use crate::core::config::ShowcaseConfig;
use crate::core::constants::viewer::FIT_SETTLE_FRAMES;
use crate::core::pages::Page;
use crate::rendering::bounds::{fit_distance, world_bounds};
use crate::rendering::orbit_camera::OrbitCamera;
use crate::rendering::{ViewerCamera, ViewerFailure, ViewerPhase};

/// Root entity of the showcased scene.
#[derive(Component)]
pub struct ShowcaseModel;

/// Frames waited so far for mesh bounds; bounds and global transforms are
/// only computed in PostUpdate after the scene spawns.
#[derive(Component, Default)]
pub struct PendingFit {
    pub frames_waited: u32,
}

/// The model file and its first scene. A parse error only reaches the file's
/// handle, and a file without a first scene never settles the scene handle, so
/// both are watched.
#[derive(Resource, Debug, Clone)]
pub struct ModelAsset {
    pub gltf: Handle<Gltf>,
    pub scene: Handle<Scene>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelLoad {
    Loading,
    Loaded,
    Failed(String),
}

impl ModelAsset {
    pub fn status(
        &self,
        asset_server: &AssetServer,
        gltfs: &Assets<Gltf>,
        scenes: &Assets<Scene>,
    ) -> ModelLoad {
        for handle in [self.gltf.id().untyped(), self.scene.id().untyped()] {
            if let LoadState::Failed(err) = asset_server.load_state(handle) {
                return ModelLoad::Failed(err.to_string());
            }
        }
        if scenes.contains(self.scene.id()) {
            return ModelLoad::Loaded;
        }
        // Sub-assets are stored before the file itself
        if gltfs.contains(self.gltf.id()) {
            return ModelLoad::Failed("model file has no scene 0".to_string());
        }
        ModelLoad::Loading
    }
}

pub fn spawn_model(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<ShowcaseConfig>,
) {
    let viewer = &config.viewer;
    // Request the file first so its own load reports parse errors
    let gltf = asset_server.load::<Gltf>(viewer.model_path.clone());
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(viewer.model_path.clone()));

    commands.spawn((
        SceneRoot(scene.clone()),
        Transform::from_scale(Vec3::splat(viewer.model_scale)),
        ShowcaseModel,
        Name::new("Showcase model"),
        StateScoped(Page::ModelViewer),
    ));
    commands.insert_resource(ModelAsset { gltf, scene });

    info!("Loading model {} (scale {:.1})", viewer.model_path, viewer.model_scale);
}

pub fn track_model_load(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    model: Res<ModelAsset>,
    gltfs: Res<Assets<Gltf>>,
    scenes: Res<Assets<Scene>>,
    scene_spawner: Res<SceneSpawner>,
    instances: Query<(Entity, &SceneInstance), With<ShowcaseModel>>,
    mut next_phase: ResMut<NextState<ViewerPhase>>,
) {
    match model.status(&asset_server, &gltfs, &scenes) {
        ModelLoad::Failed(err) => {
            error!("Failed to load model: {}", err);
            commands.insert_resource(ViewerFailure("Model unavailable".to_string()));
            next_phase.set(ViewerPhase::Failed);
            return;
        }
        ModelLoad::Loading => return,
        ModelLoad::Loaded => {}
    }

    for (entity, instance) in instances.iter() {
        if scene_spawner.instance_is_ready(**instance) {
            debug!("Scene instance ready, fitting camera");
            commands.entity(entity).insert(PendingFit::default());
            next_phase.set(ViewerPhase::Fitting);
        }
    }
}

pub fn fit_model_to_view(
    mut commands: Commands,
    config: Res<ShowcaseConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    children: Query<&Children>,
    meshes: Query<(&Aabb, &GlobalTransform)>,
    mut models: Query<(Entity, &mut Transform, &mut PendingFit), (With<ShowcaseModel>, Without<ViewerCamera>)>,
    mut cameras: Query<(&mut OrbitCamera, &mut Transform, &mut Projection), With<ViewerCamera>>,
    mut next_phase: ResMut<NextState<ViewerPhase>>,
) {
    let Ok((root, mut model_transform, mut pending)) = models.get_single_mut() else {
        return;
    };
    pending.frames_waited += 1;
    if pending.frames_waited < FIT_SETTLE_FRAMES {
        return;
    }
    commands.entity(root).remove::<PendingFit>();
    next_phase.set(ViewerPhase::Ready);

    let bounds = world_bounds(
        children
            .iter_descendants(root)
            .filter_map(|entity| meshes.get(entity).ok()),
    );
    let Some(bounds) = bounds else {
        warn!("Model has no mesh geometry, keeping default camera");
        return;
    };

    let aspect = windows
        .get_single()
        .map(|w| w.width() / w.height().max(1.0))
        .unwrap_or(1.0);
    let viewer = &config.viewer;

    // Move the model so its centre sits on the orbit target at the origin
    model_transform.translation -= bounds.center();

    for (mut orbit, mut camera_transform, mut projection) in cameras.iter_mut() {
        let fov = match projection.as_ref() {
            Projection::Perspective(perspective) => perspective.fov,
            _ => viewer.fov_radians(),
        };
        let Some(distance) = fit_distance(bounds.radius(), fov, aspect, viewer.fit_margin) else {
            warn!("Model bounds are degenerate ({:?}), keeping default camera", bounds);
            continue;
        };

        *orbit = OrbitCamera::new(Vec3::new(0.0, 0.0, distance), Vec3::ZERO);
        *camera_transform = orbit.state.transform();

        if let Projection::Perspective(perspective) = projection.as_mut() {
            let needed = (distance + bounds.radius()) * 2.0;
            if perspective.far < needed {
                perspective.far = needed;
                debug!("Extended far plane to {:.1}", needed);
            }
        }

        info!(
            "Model fitted: size {:.2}, centre {:?}, camera distance {:.2}",
            bounds.size().length(),
            bounds.center(),
            distance
        );
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use bevy::asset::AssetPlugin;
    use bevy::gltf::GltfPlugin;
    use bevy::scene::ScenePlugin;
    use bevy::state::app::StatesPlugin;
    use tempfile::{tempdir, TempDir};

    use super::*;

    fn phase(app: &App) -> ViewerPhase {
        *app.world().resource::<State<ViewerPhase>>().get()
    }

    fn viewer_state_app(app: &mut App) {
        app.insert_resource(ShowcaseConfig::default())
            .insert_state(Page::ModelViewer)
            .add_sub_state::<ViewerPhase>();
    }

    /// Runs the loading phase against a model file in `dir` until it settles.
    fn load_model_from(dir: &TempDir, model_path: &str) -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin {
                file_path: dir.path().display().to_string(),
                ..default()
            },
            StatesPlugin,
            ScenePlugin,
            GltfPlugin::default(),
        ));
        viewer_state_app(&mut app);
        app.world_mut()
            .resource_mut::<ShowcaseConfig>()
            .viewer
            .model_path = model_path.to_string();
        app.add_systems(OnEnter(ViewerPhase::LoadingModel), spawn_model)
            .add_systems(
                Update,
                track_model_load.run_if(in_state(ViewerPhase::LoadingModel)),
            );
        app.finish();
        app.cleanup();

        app.update();
        app.world_mut()
            .resource_mut::<NextState<ViewerPhase>>()
            .set(ViewerPhase::LoadingModel);
        app.update();
        assert_eq!(phase(&app), ViewerPhase::LoadingModel);

        for _ in 0..500 {
            if phase(&app) != ViewerPhase::LoadingModel {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
            app.update();
        }
        app
    }

    fn assert_failed(app: &App) {
        assert_eq!(phase(app), ViewerPhase::Failed);
        assert_eq!(
            app.world().resource::<ViewerFailure>().0,
            "Model unavailable"
        );
    }

    #[test]
    fn missing_model_file_fails_the_viewer() {
        let dir = tempdir().unwrap();
        let app = load_model_from(&dir, "Absent.gltf");
        assert_failed(&app);
    }

    #[test]
    fn unparsable_model_file_fails_the_viewer() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Corrupt.gltf"), "{ this is not gltf").unwrap();
        let app = load_model_from(&dir, "Corrupt.gltf");
        assert_failed(&app);
    }

    #[test]
    fn model_without_a_scene_fails_the_viewer() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("NoScene.gltf"),
            r#"{"asset":{"version":"2.0"}}"#,
        )
        .unwrap();
        let app = load_model_from(&dir, "NoScene.gltf");
        assert_failed(&app);
    }

    #[test]
    fn spawned_scene_moves_on_to_fitting() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), StatesPlugin, ScenePlugin))
            .init_asset::<Gltf>();
        viewer_state_app(&mut app);
        app.add_systems(
            Update,
            track_model_load.run_if(in_state(ViewerPhase::LoadingModel)),
        );
        app.finish();
        app.cleanup();

        let scene = app
            .world_mut()
            .resource_mut::<Assets<Scene>>()
            .add(Scene::new(World::new()));
        app.insert_resource(ModelAsset {
            gltf: Handle::default(),
            scene: scene.clone(),
        });
        let model = app
            .world_mut()
            .spawn((SceneRoot(scene), Transform::default(), ShowcaseModel))
            .id();

        app.update();
        app.world_mut()
            .resource_mut::<NextState<ViewerPhase>>()
            .set(ViewerPhase::LoadingModel);
        for _ in 0..5 {
            app.update();
        }

        assert_eq!(phase(&app), ViewerPhase::Fitting);
        assert!(app.world().get::<PendingFit>(model).is_some());
    }

    fn fitting_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        viewer_state_app(&mut app);
        app.add_systems(Update, fit_model_to_view);

        app.world_mut().spawn((Window::default(), PrimaryWindow));
        let start = Vec3::new(0.0, 0.0, 6.0);
        app.world_mut().spawn((
            OrbitCamera::new(start, Vec3::ZERO),
            Transform::from_translation(start).looking_at(Vec3::ZERO, Vec3::Y),
            Projection::Perspective(PerspectiveProjection {
                fov: 60f32.to_radians(),
                far: 100.0,
                ..default()
            }),
            ViewerCamera,
        ));
        app
    }

    fn camera_translation(app: &mut App) -> Vec3 {
        app.world_mut()
            .query_filtered::<&Transform, With<ViewerCamera>>()
            .single(app.world())
            .translation
    }

    #[test]
    fn fitting_recentres_the_model_and_backs_the_camera_off() {
        let mut app = fitting_app();
        let centre = Vec3::new(1.0, 2.0, 3.0);
        let model = app
            .world_mut()
            .spawn((
                Transform::from_translation(centre),
                ShowcaseModel,
                PendingFit::default(),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Aabb::from_min_max(Vec3::splat(-1.0), Vec3::splat(1.0)),
                    GlobalTransform::from_translation(centre),
                ));
            })
            .id();

        for _ in 0..=FIT_SETTLE_FRAMES {
            app.update();
        }

        let expected = fit_distance(3f32.sqrt(), 60f32.to_radians(), 1280.0 / 720.0, 1.2).unwrap();
        let translation = camera_translation(&mut app);
        assert!((translation - Vec3::new(0.0, 0.0, expected)).length() < 1e-3);
        assert!(app.world().get::<Transform>(model).unwrap().translation.length() < 1e-5);
        assert!(app.world().get::<PendingFit>(model).is_none());
        assert_eq!(phase(&app), ViewerPhase::Ready);
    }

    #[test]
    fn model_without_meshes_keeps_the_default_camera() {
        let mut app = fitting_app();
        app.world_mut()
            .spawn((Transform::default(), ShowcaseModel, PendingFit::default()));

        for _ in 0..=FIT_SETTLE_FRAMES {
            app.update();
        }

        let translation = camera_translation(&mut app);
        assert!((translation - Vec3::new(0.0, 0.0, 6.0)).length() < 1e-5);
        assert_eq!(phase(&app), ViewerPhase::Ready);
    }
}
