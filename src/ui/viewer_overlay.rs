use bevy::prelude::*;

use crate::core::constants::overlay;
use crate::core::pages::Page;
use crate::rendering::ViewerFailure;
use crate::ui::styles::{full_width_band, overlay_text, ERROR_TEXT_COLOR};

#[derive(Component)]
pub struct ViewerStatusLabel;

pub fn spawn_viewer_overlay(mut commands: Commands) {
    commands
        .spawn((
            Node {
                justify_content: JustifyContent::Center,
                ..full_width_band(Val::Percent(overlay::PREVIEW_TOP_PERCENT), Val::Auto)
            },
            ZIndex(10),
            StateScoped(Page::ModelViewer),
        ))
        .with_children(|parent| {
            parent
                .spawn(overlay_text(overlay::PREVIEW_LABEL, overlay::PREVIEW_SIZE))
                .insert(ViewerStatusLabel);
        });
}

pub fn show_viewer_failure(
    failure: Option<Res<ViewerFailure>>,
    mut labels: Query<(&mut Text, &mut TextColor), With<ViewerStatusLabel>>,
) {
    let message = failure
        .map(|f| f.0.clone())
        .unwrap_or_else(|| "Preview unavailable".to_string());
    for (mut text, mut color) in labels.iter_mut() {
        text.0 = message.clone();
        color.0 = ERROR_TEXT_COLOR;
    }
}
