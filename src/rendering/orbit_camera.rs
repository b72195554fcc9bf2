//! Orbit-style camera: drag to rotate around a target, right-drag to pan,
//! wheel to dolly, with optional damping and auto-rotate.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved, PrimaryWindow};

use crate::core::config::ShowcaseConfig;
use crate::core::constants::orbit::{POLAR_EPSILON, REFERENCE_FPS, ZOOM_BASE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
}

/// Spherical camera state around `target`, plus input not yet applied.
///
/// `theta` is the azimuth around +Y measured from +Z, `phi` the polar angle
/// from +Y. Input accumulates into the pending deltas; `update` moves a
/// fraction of them into the pose when damping is on, or all of them when off.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitState {
    pub target: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_pan: Vec3,
    pending_scale: f32,
}

impl OrbitState {
    pub fn looking_from(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length();
        let (theta, phi) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, FRAC_PI_2)
        };
        Self {
            target,
            radius,
            theta,
            phi,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_pan: Vec3::ZERO,
            pending_scale: 1.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position()).looking_at(self.target, Vec3::Y)
    }

    /// A full viewport-height drag turns the camera once around.
    pub fn rotate(&mut self, drag: Vec2, viewport_height: f32, speed: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.pending_theta -= TAU * drag.x / viewport_height * speed;
        self.pending_phi -= TAU * drag.y / viewport_height * speed;
    }

    pub fn auto_rotate(&mut self, angle: f32) {
        self.pending_theta -= angle;
    }

    /// Screen-space pan: the point under the cursor stays under the cursor at
    /// the target's depth.
    pub fn pan(
        &mut self,
        drag: Vec2,
        viewport_height: f32,
        fov_y: f32,
        right: Vec3,
        up: Vec3,
        speed: f32,
    ) {
        if viewport_height <= 0.0 {
            return;
        }
        let target_distance = self.radius * (fov_y * 0.5).tan();
        let dx = 2.0 * drag.x * target_distance / viewport_height * speed;
        let dy = 2.0 * drag.y * target_distance / viewport_height * speed;
        self.pending_pan += -right * dx + up * dy;
    }

    /// Positive `notches` move the camera towards the target.
    pub fn dolly(&mut self, notches: f32, zoom_scale: f32) {
        self.pending_scale *= zoom_scale.powf(notches);
    }

    /// Applies pending input. `damping` is the fraction applied this tick, or
    /// `None` to apply everything at once.
    pub fn update(&mut self, damping: Option<f32>, limits: OrbitLimits) {
        let factor = damping.unwrap_or(1.0);

        self.theta += self.pending_theta * factor;
        self.phi = (self.phi + self.pending_phi * factor).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.radius = (self.radius * self.pending_scale).clamp(limits.min_distance, limits.max_distance);
        self.target += self.pending_pan * factor;

        if damping.is_some() {
            self.pending_theta *= 1.0 - factor;
            self.pending_phi *= 1.0 - factor;
            self.pending_pan *= 1.0 - factor;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
            self.pending_pan = Vec3::ZERO;
        }
        self.pending_scale = 1.0;
    }
}

/// Per-tick damping equivalent to `factor` per reference frame.
pub fn frame_damping(factor: f32, dt: f32) -> f32 {
    (1.0 - (1.0 - factor).powf(dt * REFERENCE_FPS)).clamp(0.0, 1.0)
}

#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
    pub state: OrbitState,
}

impl OrbitCamera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            state: OrbitState::looking_from(position, target),
        }
    }
}

fn wheel_notch(y: f32) -> f32 {
    if y > 0.0 {
        1.0
    } else if y < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Cursor travel in window pixels across `positions`, continuing from `last`.
fn cursor_drag(last: &mut Option<Vec2>, positions: impl IntoIterator<Item = Vec2>) -> Vec2 {
    let mut drag = Vec2::ZERO;
    for position in positions {
        if let Some(previous) = *last {
            drag += position - previous;
        }
        *last = Some(position);
    }
    drag
}

/// Pointer input for the orbit camera.
///
/// Controls:
/// - Left mouse + drag: rotate around the target
/// - Right mouse + drag, or Shift/Ctrl + left drag: pan
/// - Mouse wheel: dolly in/out
pub fn handle_orbit_input(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut cursor_moved: EventReader<CursorMoved>,
    mut cursor_left: EventReader<CursorLeft>,
    mut last_cursor: Local<Option<Vec2>>,
    mut mouse_wheel: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<ShowcaseConfig>,
    mut cameras: Query<(&mut OrbitCamera, &Transform, &Projection)>,
) {
    // Re-entering the window must not count as a drag
    if cursor_left.read().count() > 0 {
        *last_cursor = None;
    }
    let drag = cursor_drag(&mut *last_cursor, cursor_moved.read().map(|moved| moved.position));
    let notches: f32 = mouse_wheel.read().map(|wheel| wheel_notch(wheel.y)).sum();

    let Ok(window) = windows.get_single() else {
        return;
    };
    let height = window.height();
    let settings = &config.orbit;

    let modifier = keyboard.any_pressed([
        KeyCode::ShiftLeft,
        KeyCode::ShiftRight,
        KeyCode::ControlLeft,
        KeyCode::ControlRight,
    ]);
    let left = mouse_buttons.pressed(MouseButton::Left);
    let panning = mouse_buttons.pressed(MouseButton::Right) || (left && modifier);
    let rotating = left && !modifier;

    for (mut orbit, transform, projection) in cameras.iter_mut() {
        if drag != Vec2::ZERO {
            if rotating {
                orbit.state.rotate(drag, height, settings.rotate_speed);
            } else if panning && settings.enable_pan {
                let fov = match projection {
                    Projection::Perspective(perspective) => perspective.fov,
                    _ => config.viewer.fov_radians(),
                };
                orbit.state.pan(
                    drag,
                    height,
                    fov,
                    *transform.right(),
                    *transform.up(),
                    settings.pan_speed,
                );
            }
        }
        if notches != 0.0 && settings.enable_zoom {
            orbit
                .state
                .dolly(notches, ZOOM_BASE.powf(settings.zoom_speed));
        }
    }
}

pub fn update_orbit_camera(
    time: Res<Time>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    config: Res<ShowcaseConfig>,
    mut cameras: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let dt = time.delta_secs();
    let settings = &config.orbit;
    let limits = OrbitLimits {
        min_distance: settings.min_distance,
        max_distance: settings.max_distance,
    };
    let dragging = mouse_buttons.any_pressed([MouseButton::Left, MouseButton::Right]);
    let damping = settings
        .enable_damping
        .then(|| frame_damping(settings.damping_factor, dt));

    for (mut orbit, mut transform) in cameras.iter_mut() {
        if settings.auto_rotate && !dragging {
            orbit
                .state
                .auto_rotate(TAU / 60.0 * settings.auto_rotate_speed * dt);
        }
        orbit.state.update(damping, limits);
        *transform = orbit.state.transform();
    }
}
