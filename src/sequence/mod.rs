/// Scroll-driven image sequence: preloading, scroll tracking and canvas drawing
pub mod canvas;
pub mod frames;
pub mod scroll;

use bevy::prelude::*;

use crate::core::pages::{Page, ShowcaseSet};
use crate::ui::scroll_overlay::{
    fit_section_backgrounds, spawn_scroll_overlay, update_content_positions,
    update_loading_indicator,
};
use canvas::{redraw_canvas, spawn_frame_canvas};
use frames::{preload_frames, release_frames, scrub_frames, track_frame_loads};
use scroll::{handle_scroll_input, release_scroll_track, resize_scroll_track, setup_scroll_track};

pub struct FrameSequencePlugin;

impl Plugin for FrameSequencePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(Page::Scrollytelling),
            (
                preload_frames,
                setup_scroll_track,
                spawn_frame_canvas,
                spawn_scroll_overlay,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                (handle_scroll_input, resize_scroll_track).in_set(ShowcaseSet::Input),
                (track_frame_loads, scrub_frames)
                    .chain()
                    .in_set(ShowcaseSet::Logic),
                (
                    redraw_canvas,
                    update_content_positions,
                    update_loading_indicator,
                    fit_section_backgrounds,
                )
                    .in_set(ShowcaseSet::Rendering),
            )
                .run_if(in_state(Page::Scrollytelling)),
        )
        .add_systems(
            OnExit(Page::Scrollytelling),
            (release_frames, release_scroll_track),
        );
    }
}
