use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::core::pages::Page;
use crate::sequence::frames::{FrameCursor, FrameLibrary};

/// Full-window sprite the frames are drawn onto.
#[derive(Component)]
pub struct FrameCanvas;

/// Destination rectangle of an image drawn with cover-fit scaling, in
/// canvas pixels measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    pub offset: Vec2,
    pub size: Vec2,
}

impl CoverFit {
    /// Centre of the drawn rectangle in y-up coordinates centred on the canvas.
    pub fn centre_in(&self, canvas: Vec2) -> Vec2 {
        let centre = self.offset + self.size / 2.0;
        Vec2::new(centre.x - canvas.x / 2.0, canvas.y / 2.0 - centre.y)
    }
}

/// Scales `image` to fill `canvas` while keeping its aspect ratio. Overflow on
/// the longer axis is split evenly between both sides. Returns `None` for an
/// image with no area.
pub fn cover_fit(canvas: Vec2, image: Vec2) -> Option<CoverFit> {
    if image.x <= 0.0 || image.y <= 0.0 {
        return None;
    }
    let ratio = (canvas.x / image.x).max(canvas.y / image.y);
    let size = image * ratio;
    Some(CoverFit {
        offset: (canvas - size) / 2.0,
        size,
    })
}

pub fn spawn_frame_canvas(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Camera {
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        StateScoped(Page::Scrollytelling),
    ));

    commands.spawn((
        Sprite::default(),
        Transform::default(),
        Visibility::Hidden,
        FrameCanvas,
        Name::new("Frame canvas"),
        StateScoped(Page::Scrollytelling),
    ));
}

/// Draws the current frame. Runs when the cursor moves or the window resizes;
/// a frame that cannot be drawn leaves the previous one on screen.
pub fn redraw_canvas(
    cursor: Res<FrameCursor>,
    library: Res<FrameLibrary>,
    images: Res<Assets<Image>>,
    mut resized: EventReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut canvas_query: Query<(&mut Sprite, &mut Transform, &mut Visibility), With<FrameCanvas>>,
) {
    let resized = resized.read().count() > 0;
    if !cursor.is_changed() && !resized {
        return;
    }
    let Some(index) = cursor.index else {
        return;
    };
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((mut sprite, mut transform, mut visibility)) = canvas_query.get_single_mut() else {
        return;
    };

    let Some(handle) = library.drawable(index) else {
        debug!("Frame {} unavailable, keeping previous drawing", index);
        return;
    };
    let Some(image) = images.get(handle) else {
        return;
    };
    let canvas = Vec2::new(window.width(), window.height());
    let Some(fit) = cover_fit(canvas, image.size().as_vec2()) else {
        debug!("Frame {} has no area, skipped", index);
        return;
    };

    sprite.image = handle.clone();
    sprite.custom_size = Some(fit.size);
    transform.translation = fit.centre_in(canvas).extend(0.0);
    *visibility = Visibility::Visible;
}

#[cfg(test)]
mod tests {
    use bevy::asset::AssetPlugin;

    use super::*;
    use crate::core::config::FrameSequence;
    use crate::sequence::frames::FrameStatus;

    #[test]
    fn wide_canvas_crops_top_and_bottom() {
        let fit = cover_fit(Vec2::new(1920.0, 1080.0), Vec2::new(1000.0, 1000.0)).unwrap();
        assert_eq!(fit.size, Vec2::new(1920.0, 1920.0));
        assert_eq!(fit.offset, Vec2::new(0.0, -420.0));
    }

    #[test]
    fn tall_canvas_crops_left_and_right() {
        let fit = cover_fit(Vec2::new(400.0, 800.0), Vec2::new(1600.0, 900.0)).unwrap();
        assert!((fit.size.y - 800.0).abs() < 1e-3);
        assert!((fit.size.x - 1422.222).abs() < 1e-2);
        assert!((fit.offset.x - (400.0 - fit.size.x) / 2.0).abs() < 1e-3);
        assert!(fit.offset.y.abs() < 1e-3);
    }

    #[test]
    fn matching_aspect_fills_exactly() {
        let fit = cover_fit(Vec2::new(1280.0, 720.0), Vec2::new(640.0, 360.0)).unwrap();
        assert_eq!(fit.size, Vec2::new(1280.0, 720.0));
        assert_eq!(fit.offset, Vec2::ZERO);
    }

    #[test]
    fn zero_sized_image_is_not_drawn() {
        assert!(cover_fit(Vec2::new(800.0, 600.0), Vec2::new(0.0, 600.0)).is_none());
        assert!(cover_fit(Vec2::new(800.0, 600.0), Vec2::new(600.0, 0.0)).is_none());
    }

    #[test]
    fn centred_fit_sits_at_canvas_origin() {
        let canvas = Vec2::new(1920.0, 1080.0);
        let fit = cover_fit(canvas, Vec2::new(1000.0, 1000.0)).unwrap();
        assert_eq!(fit.centre_in(canvas), Vec2::ZERO);
    }

    fn canvas_app(library: FrameLibrary) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Image>()
            .add_event::<WindowResized>()
            .insert_resource(library)
            .insert_resource(FrameCursor { index: Some(0) })
            .add_systems(Update, redraw_canvas);
        app.world_mut().spawn((Window::default(), PrimaryWindow));
        app.world_mut().spawn((
            Sprite::default(),
            Transform::default(),
            Visibility::Hidden,
            FrameCanvas,
        ));
        app
    }

    fn canvas(app: &mut App) -> (Sprite, Visibility) {
        let mut query = app
            .world_mut()
            .query_filtered::<(&Sprite, &Visibility), With<FrameCanvas>>();
        let (sprite, visibility) = query.single(app.world());
        (sprite.clone(), *visibility)
    }

    #[test]
    fn failed_frame_keeps_the_previous_drawing() {
        let library = FrameLibrary::pending(&FrameSequence {
            count: 2,
            ..FrameSequence::default()
        });
        let mut app = canvas_app(library);
        let first = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .add(Image::default());
        {
            let mut library = app.world_mut().resource_mut::<FrameLibrary>();
            library.handles[0] = first.clone();
            library.mark(0, FrameStatus::Loaded);
            library.mark(1, FrameStatus::Failed);
        }

        app.update();
        let (sprite, visibility) = canvas(&mut app);
        assert_eq!(sprite.image, first);
        // 1x1 frame covering a 1280x720 window
        assert_eq!(sprite.custom_size, Some(Vec2::new(1280.0, 1280.0)));
        assert_eq!(visibility, Visibility::Visible);

        app.world_mut().resource_mut::<FrameCursor>().index = Some(1);
        app.update();
        let (sprite, visibility) = canvas(&mut app);
        assert_eq!(sprite.image, first);
        assert_eq!(sprite.custom_size, Some(Vec2::new(1280.0, 1280.0)));
        assert_eq!(visibility, Visibility::Visible);
    }
}
