// Showcase configuration constants
// Default values for everything that ShowcaseConfig can override live here

// === WINDOW AND DISPLAY ===
pub const WINDOW_TITLE: &str = "Futuristic Helmet";
pub const WINDOW_WIDTH: f32 = 1280.0;
pub const WINDOW_HEIGHT: f32 = 720.0;

/// Config file picked up from the working directory when no --config is given
pub const DEFAULT_CONFIG_FILE: &str = "showcase.toml";

/// Environment variable naming the folded-stack output of the flame layer
pub const TRACE_FLAME_ENV: &str = "SHOWCASE_TRACE_FLAME";

// === FRAME SEQUENCE ===
pub mod frames {
    pub const DIRECTORY: &str = "helmet";
    pub const PREFIX: &str = "frame_";
    pub const EXTENSION: &str = "jpeg";
    pub const PAD_WIDTH: usize = 4;
    pub const FIRST_NUMBER: u32 = 1; // Files are numbered from 0001
    pub const FRAME_COUNT: usize = 118;
}

// === SCROLL TRACK ===
pub mod scroll {
    pub const LINE_HEIGHT_PX: f32 = 100.0; // Pixels per wheel notch in line units
    pub const ARROW_STEP_PX: f32 = 40.0;
    pub const PAGE_STEP_FRACTION: f32 = 0.9; // Page Up/Down scrolls 90% of the viewport

    pub const SECTION_HEIGHT_PX: f32 = 500.0;
    pub const SECTION_IMAGE: &str = "Assets/place.png";
    pub const SECTION_TINT_ALPHA: f32 = 0.4;
}

// === OVERLAY TEXT ===
pub mod overlay {
    pub const HEADLINE: &str = "Futuristic Helmet";
    pub const SUBTITLE: &str = "Scroll down to explore the design";
    pub const HEADLINE_SIZE: f32 = 48.0;
    pub const SUBTITLE_SIZE: f32 = 18.0;
    pub const SECTION_TITLE_SIZE: f32 = 36.0;
    pub const BOTTOM_PADDING_PX: f32 = 80.0;
    pub const LOADING_SIZE: f32 = 16.0;

    pub const PREVIEW_LABEL: &str = "Preview";
    pub const PREVIEW_SIZE: f32 = 24.0;
    pub const PREVIEW_TOP_PERCENT: f32 = 20.0;
}

// === MODEL VIEWER ===
pub mod viewer {
    pub const MODEL_PATH: &str = "models/DamagedHelmet.gltf";
    pub const DIFFUSE_MAP: &str = "environment/rogland_clear_night_diffuse.ktx2";
    pub const SPECULAR_MAP: &str = "environment/rogland_clear_night_specular.ktx2";
    pub const ENVIRONMENT_INTENSITY: f32 = 900.0;
    pub const SKYBOX_BRIGHTNESS: f32 = 1000.0;

    pub const MODEL_SCALE: f32 = 1.5;
    pub const FIT_MARGIN: f32 = 1.2;

    pub const FOV_DEGREES: f32 = 60.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 100.0;
    pub const INITIAL_CAMERA_DISTANCE: f32 = 6.0;

    pub const LIGHT_POSITION: [f32; 3] = [5.0, 5.0, 5.0];
    pub const LIGHT_ILLUMINANCE: f32 = 2_000.0;

    // Frames to wait for mesh bounds after the scene instance is ready
    pub const FIT_SETTLE_FRAMES: u32 = 2;
}

// === ORBIT CONTROLS ===
pub mod orbit {
    pub const DAMPING_FACTOR: f32 = 0.05; // Fraction applied per reference frame
    pub const REFERENCE_FPS: f32 = 60.0;
    pub const ROTATE_SPEED: f32 = 1.0;
    pub const PAN_SPEED: f32 = 1.0;
    pub const ZOOM_SPEED: f32 = 1.0;
    pub const ZOOM_BASE: f32 = 0.95; // Dolly scale per wheel notch
    pub const AUTO_ROTATE_SPEED: f32 = 2.0; // 30 seconds per orbit at 60fps
    pub const MIN_DISTANCE: f32 = 0.0;
    pub const MAX_DISTANCE: f32 = f32::MAX;
    pub const POLAR_EPSILON: f32 = 1e-6;
}

// === HOTKEYS ===
pub mod hotkeys {
    use bevy::prelude::KeyCode;

    pub const SHOW_FRAMES: KeyCode = KeyCode::Digit1;
    pub const SHOW_VIEWER: KeyCode = KeyCode::Digit2;
    pub const TOGGLE_PAGE: KeyCode = KeyCode::Tab;
}
