use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::core::config::{FrameSequence, ShowcaseConfig};
use crate::sequence::scroll::{frame_for_progress, ScrollTrack};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Pending,
    Loaded,
    Failed,
}

/// Ordered frame handles and how many of them have settled.
///
/// Playback only starts once every frame has either loaded or failed, so the
/// scrubbed sequence never flickers through frames that are still in flight.
#[derive(Resource, Debug, Default)]
pub struct FrameLibrary {
    pub paths: Vec<String>,
    pub handles: Vec<Handle<Image>>,
    pub status: Vec<FrameStatus>,
    pub loaded: usize,
    pub failed: usize,
    pub ready: bool,
}

impl FrameLibrary {
    /// Builds an empty library for `sequence` with every frame pending.
    pub fn pending(sequence: &FrameSequence) -> Self {
        let paths: Vec<String> = (0..sequence.count).map(|i| sequence.frame_path(i)).collect();
        let count = paths.len();
        Self {
            handles: vec![Handle::default(); count],
            status: vec![FrameStatus::Pending; count],
            paths,
            loaded: 0,
            failed: 0,
            ready: count == 0,
        }
    }

    pub fn count(&self) -> usize {
        self.paths.len()
    }

    pub fn settled(&self) -> usize {
        self.loaded + self.failed
    }

    /// Records the final status of a frame. Returns true if this call settled it.
    pub fn mark(&mut self, index: usize, status: FrameStatus) -> bool {
        let Some(slot) = self.status.get_mut(index) else {
            return false;
        };
        if *slot != FrameStatus::Pending || status == FrameStatus::Pending {
            return false;
        }
        *slot = status;
        match status {
            FrameStatus::Loaded => self.loaded += 1,
            FrameStatus::Failed => self.failed += 1,
            FrameStatus::Pending => {}
        }
        if self.settled() == self.count() {
            self.ready = true;
        }
        true
    }

    /// Handle of a frame that can be drawn, skipping failed or pending ones.
    pub fn drawable(&self, index: usize) -> Option<&Handle<Image>> {
        match self.status.get(index) {
            Some(FrameStatus::Loaded) => self.handles.get(index),
            _ => None,
        }
    }
}

/// Frame currently shown on the canvas. `None` until playback starts.
#[derive(Resource, Debug, Default, PartialEq, Eq)]
pub struct FrameCursor {
    pub index: Option<usize>,
}

pub fn preload_frames(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<ShowcaseConfig>,
) {
    let mut library = FrameLibrary::pending(&config.frames);
    for (slot, path) in library.handles.iter_mut().zip(library.paths.iter()) {
        *slot = asset_server.load(path.clone());
    }

    if library.count() == 0 {
        warn!("Frame sequence is empty, nothing to play");
    } else {
        info!(
            "Preloading {} frames ({} .. {})",
            library.count(),
            library.paths[0],
            library.paths[library.count() - 1]
        );
    }

    commands.insert_resource(library);
    commands.insert_resource(FrameCursor::default());
}

pub fn track_frame_loads(asset_server: Res<AssetServer>, mut library: ResMut<FrameLibrary>) {
    if library.ready {
        return;
    }

    for index in 0..library.count() {
        if library.status[index] != FrameStatus::Pending {
            continue;
        }
        match asset_server.load_state(library.handles[index].id()) {
            LoadState::Loaded => {
                library.mark(index, FrameStatus::Loaded);
            }
            LoadState::Failed(err) => {
                error!("Failed to load frame {}: {}", library.paths[index], err);
                library.mark(index, FrameStatus::Failed);
            }
            _ => {}
        }
    }

    if library.ready {
        if library.failed > 0 {
            warn!(
                "Frame sequence ready with {} of {} frames missing",
                library.failed,
                library.count()
            );
        } else {
            info!("All {} frames loaded, playback started", library.loaded);
        }
    }
}

/// Maps the scroll progress to a frame and moves the cursor when it changes.
pub fn scrub_frames(
    library: Res<FrameLibrary>,
    track: Res<ScrollTrack>,
    mut cursor: ResMut<FrameCursor>,
) {
    if !library.ready {
        return;
    }
    let index = frame_for_progress(track.progress(), library.count());
    if cursor.index != index {
        debug!("Frame {:?} -> {:?}", cursor.index, index);
        cursor.index = index;
    }
}

pub fn release_frames(mut commands: Commands) {
    commands.remove_resource::<FrameLibrary>();
    commands.remove_resource::<FrameCursor>();
    debug!("Released frame sequence");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::asset::AssetPlugin;
    use tempfile::tempdir;

    use super::*;

    fn sequence(count: usize) -> FrameSequence {
        FrameSequence {
            count,
            ..FrameSequence::default()
        }
    }

    #[test]
    fn library_becomes_ready_when_every_frame_settles() {
        let mut library = FrameLibrary::pending(&sequence(3));
        assert!(!library.ready);

        assert!(library.mark(0, FrameStatus::Loaded));
        assert!(library.mark(2, FrameStatus::Failed));
        assert!(!library.ready);
        assert_eq!(library.settled(), 2);

        assert!(library.mark(1, FrameStatus::Loaded));
        assert!(library.ready);
        assert_eq!(library.loaded, 2);
        assert_eq!(library.failed, 1);
    }

    #[test]
    fn marking_twice_does_not_double_count() {
        let mut library = FrameLibrary::pending(&sequence(2));
        assert!(library.mark(0, FrameStatus::Loaded));
        assert!(!library.mark(0, FrameStatus::Loaded));
        assert!(!library.mark(0, FrameStatus::Failed));
        assert!(!library.mark(5, FrameStatus::Loaded));
        assert_eq!(library.loaded, 1);
        assert_eq!(library.failed, 0);
    }

    #[test]
    fn failed_frames_are_not_drawable() {
        let mut library = FrameLibrary::pending(&sequence(2));
        library.mark(0, FrameStatus::Failed);
        library.mark(1, FrameStatus::Loaded);
        assert!(library.drawable(0).is_none());
        assert!(library.drawable(1).is_some());
        assert!(library.drawable(2).is_none());
    }

    #[test]
    fn empty_sequence_is_ready_immediately() {
        let library = FrameLibrary::pending(&sequence(0));
        assert!(library.ready);
        assert_eq!(library.count(), 0);
    }

    fn scrub_app(library: FrameLibrary, track: ScrollTrack) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(library)
            .insert_resource(track)
            .init_resource::<FrameCursor>()
            .add_systems(Update, scrub_frames);
        app
    }

    #[test]
    fn cursor_waits_for_preload_then_follows_scroll() {
        let mut library = FrameLibrary::pending(&sequence(118));
        let track = ScrollTrack::new(720.0, 1500.0, 1500.0);
        let mut app = scrub_app(FrameLibrary::pending(&sequence(118)), track);

        app.update();
        assert_eq!(app.world().resource::<FrameCursor>().index, None);

        for i in 0..library.count() {
            library.mark(i, FrameStatus::Loaded);
        }
        app.insert_resource(library);
        app.update();
        assert_eq!(app.world().resource::<FrameCursor>().index, Some(0));

        app.world_mut().resource_mut::<ScrollTrack>().scroll_by(750.0);
        app.update();
        // 0.5 * 117 = 58.5 rounds away from zero
        assert_eq!(app.world().resource::<FrameCursor>().index, Some(59));

        app.world_mut().resource_mut::<ScrollTrack>().scroll_by(10_000.0);
        app.update();
        assert_eq!(app.world().resource::<FrameCursor>().index, Some(117));
    }

    #[test]
    fn frames_missing_on_disk_settle_as_failed() {
        let dir = tempdir().unwrap();
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin {
                file_path: dir.path().display().to_string(),
                ..default()
            },
        ))
        .init_asset::<Image>()
        .add_systems(Update, track_frame_loads);

        let server = app.world().resource::<AssetServer>().clone();
        let mut library = FrameLibrary::pending(&sequence(3));
        library.handles[0] = server.add(Image::default());
        library.handles[1] = server.load(library.paths[1].clone());
        library.handles[2] = server.add(Image::default());
        app.insert_resource(library);

        for _ in 0..500 {
            app.update();
            if app.world().resource::<FrameLibrary>().ready {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }

        let library = app.world().resource::<FrameLibrary>();
        assert!(library.ready);
        assert_eq!(library.loaded, 2);
        assert_eq!(library.failed, 1);
        assert_eq!(library.status[1], FrameStatus::Failed);
        assert!(library.drawable(1).is_none());
    }
}
