use bevy::prelude::*;

pub const TEXT_COLOR: Color = Color::WHITE;
pub const MUTED_TEXT_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.7);
pub const ERROR_TEXT_COLOR: Color = Color::srgb(1.0, 0.45, 0.4);

/// White, centred overlay text at `size` pixels.
pub fn overlay_text(text: impl Into<String>, size: f32) -> (Text, TextFont, TextColor, TextLayout) {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(TEXT_COLOR),
        TextLayout::new_with_justify(JustifyText::Center),
    )
}

/// Absolutely positioned node spanning the full window width.
pub fn full_width_band(top: Val, height: Val) -> Node {
    Node {
        position_type: PositionType::Absolute,
        top,
        left: Val::Px(0.0),
        width: Val::Percent(100.0),
        height,
        ..default()
    }
}
