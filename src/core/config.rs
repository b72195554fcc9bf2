use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::constants;
use crate::core::error::{Result, ShowcaseError};
use crate::core::pages::Page;

/// Everything the showcase reads at startup. Every field has a default, so a
/// config file only needs the keys it wants to change.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    pub start_page: Page,
    pub window: WindowConfig,
    pub log: LogConfig,
    pub frames: FrameSequence,
    pub scroll: ScrollConfig,
    pub sections: Vec<FeatureSection>,
    pub viewer: ViewerConfig,
    pub orbit: OrbitConfig,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            start_page: Page::default(),
            window: WindowConfig::default(),
            log: LogConfig::default(),
            frames: FrameSequence::default(),
            scroll: ScrollConfig::default(),
            sections: FeatureSection::defaults(),
            viewer: ViewerConfig::default(),
            orbit: OrbitConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: constants::WINDOW_TITLE.to_string(),
            width: constants::WINDOW_WIDTH,
            height: constants::WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// EnvFilter directives appended after the level, e.g. "wgpu=error"
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "wgpu=error,naga=warn".to_string(),
        }
    }
}

/// Naming scheme of the preloaded still images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSequence {
    pub directory: String,
    pub prefix: String,
    pub extension: String,
    pub pad_width: usize,
    pub first_number: u32,
    pub count: usize,
}

impl Default for FrameSequence {
    fn default() -> Self {
        use constants::frames::*;
        Self {
            directory: DIRECTORY.to_string(),
            prefix: PREFIX.to_string(),
            extension: EXTENSION.to_string(),
            pad_width: PAD_WIDTH,
            first_number: FIRST_NUMBER,
            count: FRAME_COUNT,
        }
    }
}

impl FrameSequence {
    /// Asset path of the zero-based frame `index`.
    pub fn frame_path(&self, index: usize) -> String {
        let number = self.first_number as usize + index;
        format!(
            "{}/{}{:0width$}.{}",
            self.directory,
            self.prefix,
            number,
            self.extension,
            width = self.pad_width
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub line_height: f32,
    pub arrow_step: f32,
    pub page_step_fraction: f32,
    /// Scroll distance the frame canvas stays pinned for. Defaults to the
    /// combined height of the feature sections.
    pub pin_distance: Option<f32>,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        use constants::scroll::*;
        Self {
            line_height: LINE_HEIGHT_PX,
            arrow_step: ARROW_STEP_PX,
            page_step_fraction: PAGE_STEP_FRACTION,
            pin_distance: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionAlign {
    Start,
    Center,
    End,
}

impl SectionAlign {
    pub fn justify(self) -> JustifyContent {
        match self {
            SectionAlign::Start => JustifyContent::FlexStart,
            SectionAlign::Center => JustifyContent::Center,
            SectionAlign::End => JustifyContent::FlexEnd,
        }
    }
}

/// Full-width band shown below the pinned canvas once the sequence finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSection {
    pub title: String,
    pub align: SectionAlign,
    #[serde(default = "default_section_image")]
    pub image: String,
    #[serde(default = "default_section_height")]
    pub height: f32,
}

fn default_section_image() -> String {
    constants::scroll::SECTION_IMAGE.to_string()
}

fn default_section_height() -> f32 {
    constants::scroll::SECTION_HEIGHT_PX
}

impl FeatureSection {
    fn new(title: &str, align: SectionAlign) -> Self {
        Self {
            title: title.to_string(),
            align,
            image: default_section_image(),
            height: default_section_height(),
        }
    }

    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Lightweight Material", SectionAlign::Start),
            Self::new("Enhanced Vision System", SectionAlign::End),
            Self::new("Built for Speed and Protection", SectionAlign::Start),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub model_path: String,
    pub diffuse_map: String,
    pub specular_map: String,
    pub environment_intensity: f32,
    pub skybox_brightness: f32,
    pub model_scale: f32,
    pub fit_margin: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub initial_distance: f32,
    pub light_position: [f32; 3],
    pub light_illuminance: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        use constants::viewer::*;
        Self {
            model_path: MODEL_PATH.to_string(),
            diffuse_map: DIFFUSE_MAP.to_string(),
            specular_map: SPECULAR_MAP.to_string(),
            environment_intensity: ENVIRONMENT_INTENSITY,
            skybox_brightness: SKYBOX_BRIGHTNESS,
            model_scale: MODEL_SCALE,
            fit_margin: FIT_MARGIN,
            fov_degrees: FOV_DEGREES,
            near: NEAR,
            far: FAR,
            initial_distance: INITIAL_CAMERA_DISTANCE,
            light_position: LIGHT_POSITION,
            light_illuminance: LIGHT_ILLUMINANCE,
        }
    }
}

impl ViewerConfig {
    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        use constants::orbit::*;
        Self {
            enable_damping: true,
            damping_factor: DAMPING_FACTOR,
            enable_pan: true,
            enable_zoom: true,
            rotate_speed: ROTATE_SPEED,
            pan_speed: PAN_SPEED,
            zoom_speed: ZOOM_SPEED,
            auto_rotate: false,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
        }
    }
}

impl ShowcaseConfig {
    /// Pin distance in pixels, falling back to the total height of the sections.
    pub fn pin_distance(&self) -> f32 {
        self.scroll
            .pin_distance
            .unwrap_or_else(|| self.sections_height())
    }

    pub fn sections_height(&self) -> f32 {
        self.sections.iter().map(|s| s.height).sum()
    }

    pub fn validate(&self) -> Result<()> {
        let v = &self.viewer;
        if !(v.fov_degrees > 0.0 && v.fov_degrees < 180.0) {
            return Err(ShowcaseError::InvalidConfig(format!(
                "viewer.fov_degrees must be in (0, 180), got {}",
                v.fov_degrees
            )));
        }
        if v.near <= 0.0 || v.far <= v.near {
            return Err(ShowcaseError::InvalidConfig(format!(
                "viewer clip planes must satisfy 0 < near < far, got near={} far={}",
                v.near, v.far
            )));
        }
        if v.model_scale <= 0.0 || v.fit_margin <= 0.0 {
            return Err(ShowcaseError::InvalidConfig(
                "viewer.model_scale and viewer.fit_margin must be positive".to_string(),
            ));
        }
        let o = &self.orbit;
        if !(o.damping_factor > 0.0 && o.damping_factor <= 1.0) {
            return Err(ShowcaseError::InvalidConfig(format!(
                "orbit.damping_factor must be in (0, 1], got {}",
                o.damping_factor
            )));
        }
        if o.min_distance < 0.0 || o.max_distance < o.min_distance {
            return Err(ShowcaseError::InvalidConfig(
                "orbit distances must satisfy 0 <= min_distance <= max_distance".to_string(),
            ));
        }
        if self.scroll.pin_distance.is_some_and(|d| d < 0.0) {
            return Err(ShowcaseError::InvalidConfig(
                "scroll.pin_distance cannot be negative".to_string(),
            ));
        }
        if self.sections.iter().any(|s| s.height < 0.0) {
            return Err(ShowcaseError::InvalidConfig(
                "section heights cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads the config from `explicit` if given, else from `showcase.toml` in the
/// working directory if it exists, else returns the defaults.
pub fn load(explicit: Option<&Path>) -> Result<ShowcaseConfig> {
    match explicit {
        Some(path) => load_from_path(path),
        None => {
            let fallback = PathBuf::from(constants::DEFAULT_CONFIG_FILE);
            if fallback.exists() {
                load_from_path(&fallback)
            } else {
                Ok(ShowcaseConfig::default())
            }
        }
    }
}

pub fn load_from_path(path: &Path) -> Result<ShowcaseConfig> {
    let content = fs::read_to_string(path).map_err(|source| ShowcaseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ShowcaseConfig =
        toml::from_str(&content).map_err(|source| ShowcaseError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}
