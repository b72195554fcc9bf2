use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::core::config::ShowcaseConfig;

/// Virtual document scroll for the frame page.
///
/// The page is one viewport of pinned canvas followed by the feature
/// sections. For the first `pin_distance` pixels of scroll the content stays
/// put and only the progress advances; after that the content scrolls up.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ScrollTrack {
    pub offset: f32,
    pub viewport_height: f32,
    pub pin_distance: f32,
    /// Height of everything below the first viewport
    pub trailing_height: f32,
}

impl ScrollTrack {
    pub fn new(viewport_height: f32, pin_distance: f32, trailing_height: f32) -> Self {
        Self {
            offset: 0.0,
            viewport_height: viewport_height.max(0.0),
            pin_distance: pin_distance.max(0.0),
            trailing_height: trailing_height.max(0.0),
        }
    }

    pub fn content_height(&self) -> f32 {
        self.viewport_height + self.trailing_height
    }

    pub fn max_offset(&self) -> f32 {
        self.pin_distance + (self.content_height() - self.viewport_height).max(0.0)
    }

    /// Moves the offset by `delta` pixels. Returns true if it actually moved.
    pub fn scroll_by(&mut self, delta: f32) -> bool {
        self.scroll_to(self.offset + delta)
    }

    pub fn scroll_to(&mut self, offset: f32) -> bool {
        let clamped = offset.clamp(0.0, self.max_offset());
        if clamped == self.offset {
            return false;
        }
        self.offset = clamped;
        true
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    /// Normalized position inside the pinned region.
    pub fn progress(&self) -> f32 {
        if self.pin_distance <= 0.0 {
            return if self.offset > 0.0 { 1.0 } else { 0.0 };
        }
        (self.offset / self.pin_distance).clamp(0.0, 1.0)
    }

    /// How far the content has moved up since the pin released.
    pub fn content_offset(&self) -> f32 {
        (self.offset - self.pin_distance).max(0.0)
    }
}

/// Index of the frame shown at `progress`, snapped to the nearest whole frame.
pub fn frame_for_progress(progress: f32, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let last = count - 1;
    let progress = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
    let index = (progress * last as f32).round() as usize;
    Some(index.min(last))
}

pub fn setup_scroll_track(
    mut commands: Commands,
    config: Res<ShowcaseConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let viewport_height = windows
        .get_single()
        .map(|w| w.height())
        .unwrap_or(config.window.height);
    let track = ScrollTrack::new(
        viewport_height,
        config.pin_distance(),
        config.sections_height(),
    );
    debug!(
        "Scroll track: pin {}px, max offset {}px",
        track.pin_distance,
        track.max_offset()
    );
    commands.insert_resource(track);
}

/// Mouse wheel and keyboard scrolling of the virtual page.
///
/// Controls:
/// - Mouse wheel: scroll (line units scaled by `scroll.line_height`)
/// - Arrow Up/Down: small step
/// - Page Up/Down, Space: most of a viewport
/// - Home/End: jump to top/bottom
pub fn handle_scroll_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mouse_wheel: EventReader<MouseWheel>,
    config: Res<ShowcaseConfig>,
    mut track: ResMut<ScrollTrack>,
) {
    let mut delta = 0.0;

    for event in mouse_wheel.read() {
        // Positive wheel y scrolls the document towards the top
        delta -= match event.unit {
            MouseScrollUnit::Line => event.y * config.scroll.line_height,
            MouseScrollUnit::Pixel => event.y,
        };
    }

    let page_step = track.viewport_height * config.scroll.page_step_fraction;
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        delta += config.scroll.arrow_step;
    }
    if keyboard.just_pressed(KeyCode::ArrowUp) {
        delta -= config.scroll.arrow_step;
    }
    if keyboard.just_pressed(KeyCode::PageDown) || keyboard.just_pressed(KeyCode::Space) {
        delta += page_step;
    }
    if keyboard.just_pressed(KeyCode::PageUp) {
        delta -= page_step;
    }

    if keyboard.just_pressed(KeyCode::Home) {
        track.scroll_to(0.0);
    } else if keyboard.just_pressed(KeyCode::End) {
        let end = track.max_offset();
        track.scroll_to(end);
    } else if delta != 0.0 {
        track.scroll_by(delta);
    }
}

pub fn resize_scroll_track(
    mut resized: EventReader<WindowResized>,
    mut track: ResMut<ScrollTrack>,
) {
    if let Some(event) = resized.read().last() {
        track.set_viewport_height(event.height);
        debug!("Viewport resized to {}x{}", event.width, event.height);
    }
}

pub fn release_scroll_track(mut commands: Commands) {
    commands.remove_resource::<ScrollTrack>();
}
