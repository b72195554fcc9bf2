use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::core::config::ShowcaseConfig;
use crate::core::constants::{overlay, scroll};
use crate::core::pages::Page;
use crate::sequence::canvas::cover_fit;
use crate::sequence::frames::FrameLibrary;
use crate::sequence::scroll::ScrollTrack;
use crate::ui::styles::{full_width_band, overlay_text, MUTED_TEXT_COLOR};

/// Position of a node in the scrolling content, as whole viewports plus pixels
/// from the top of the page.
#[derive(Component, Debug, Clone, Copy)]
pub struct ContentAnchor {
    pub viewports: f32,
    pub pixels: f32,
}

impl ContentAnchor {
    pub fn top(&self, track: &ScrollTrack) -> f32 {
        self.viewports * track.viewport_height + self.pixels - track.content_offset()
    }
}

#[derive(Component)]
pub struct LoadingIndicator;

/// Section image scaled to cover its band, centred and clipped by the band.
#[derive(Component, Debug, Clone, Copy)]
pub struct SectionBackground {
    pub band_height: f32,
}

pub fn spawn_scroll_overlay(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<ShowcaseConfig>,
) {
    // Headline pinned to the bottom of the first viewport
    commands
        .spawn((
            Node {
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::FlexEnd,
                align_items: AlignItems::Center,
                padding: UiRect::bottom(Val::Px(overlay::BOTTOM_PADDING_PX)),
                ..full_width_band(Val::Px(0.0), Val::Vh(100.0))
            },
            ContentAnchor {
                viewports: 0.0,
                pixels: 0.0,
            },
            StateScoped(Page::Scrollytelling),
        ))
        .with_children(|parent| {
            parent.spawn(overlay_text(overlay::HEADLINE, overlay::HEADLINE_SIZE));
            parent.spawn((
                overlay_text(overlay::SUBTITLE, overlay::SUBTITLE_SIZE),
                Node {
                    margin: UiRect::top(Val::Px(16.0)),
                    ..default()
                },
            ));
        });

    let mut section_top = 0.0;
    for section in &config.sections {
        commands
            .spawn((
                Node {
                    flex_direction: FlexDirection::Row,
                    align_items: AlignItems::Center,
                    justify_content: section.align.justify(),
                    overflow: Overflow::clip(),
                    ..full_width_band(Val::Px(0.0), Val::Px(section.height))
                },
                ContentAnchor {
                    viewports: 1.0,
                    pixels: section_top,
                },
                Name::new(format!("Section: {}", section.title)),
                StateScoped(Page::Scrollytelling),
            ))
            .with_children(|parent| {
                parent.spawn((
                    ImageNode::new(asset_server.load(section.image.clone())),
                    Node {
                        position_type: PositionType::Absolute,
                        ..default()
                    },
                    SectionBackground {
                        band_height: section.height,
                    },
                ));
                parent.spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        top: Val::Px(0.0),
                        left: Val::Px(0.0),
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, scroll::SECTION_TINT_ALPHA)),
                ));
                parent.spawn((
                    overlay_text(section.title.clone(), overlay::SECTION_TITLE_SIZE),
                    Node {
                        padding: UiRect::horizontal(Val::Px(16.0)),
                        ..default()
                    },
                ));
            });
        section_top += section.height;
    }

    commands
        .spawn((
            Node {
                justify_content: JustifyContent::Center,
                ..full_width_band(Val::Percent(50.0), Val::Auto)
            },
            StateScoped(Page::Scrollytelling),
        ))
        .with_children(|parent| {
            parent
                .spawn(overlay_text(
                    format!("Loading frames 0/{}", config.frames.count),
                    overlay::LOADING_SIZE,
                ))
                .insert((TextColor(MUTED_TEXT_COLOR), LoadingIndicator));
        });
}

pub fn update_content_positions(
    track: Res<ScrollTrack>,
    mut anchored: Query<(&ContentAnchor, &mut Node)>,
) {
    if !track.is_changed() {
        return;
    }
    for (anchor, mut node) in anchored.iter_mut() {
        node.top = Val::Px(anchor.top(&track));
    }
}

pub fn fit_section_backgrounds(
    images: Res<Assets<Image>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut backgrounds: Query<(&ImageNode, &SectionBackground, &mut Node)>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    for (image_node, background, mut node) in backgrounds.iter_mut() {
        let Some(image) = images.get(&image_node.image) else {
            continue;
        };
        let band = Vec2::new(window.width(), background.band_height);
        let Some(fit) = cover_fit(band, image.size().as_vec2()) else {
            continue;
        };
        let (left, top) = (Val::Px(fit.offset.x), Val::Px(fit.offset.y));
        let (width, height) = (Val::Px(fit.size.x), Val::Px(fit.size.y));
        if node.left != left || node.top != top || node.width != width || node.height != height {
            node.left = left;
            node.top = top;
            node.width = width;
            node.height = height;
        }
    }
}

pub fn update_loading_indicator(
    library: Res<FrameLibrary>,
    mut indicator: Query<(&mut Text, &mut Visibility), With<LoadingIndicator>>,
) {
    if !library.is_changed() {
        return;
    }
    for (mut text, mut visibility) in indicator.iter_mut() {
        if library.ready {
            *visibility = Visibility::Hidden;
            continue;
        }
        text.0 = if library.failed > 0 {
            format!(
                "Loading frames {}/{} ({} failed)",
                library.settled(),
                library.count(),
                library.failed
            )
        } else {
            format!("Loading frames {}/{}", library.settled(), library.count())
        };
    }
}
