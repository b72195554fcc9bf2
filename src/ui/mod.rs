// UI module containing the text overlays drawn over both pages

pub mod scroll_overlay;
pub mod styles;
pub mod viewer_overlay;
