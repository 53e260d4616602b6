use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::SwipeDirection;

/// Tunables for the swipe gesture
///
/// Distances are in points, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckConfig {
    pub screen_width: f64,
    /// Fraction of `screen_width` the card must travel to commit
    pub threshold_fraction: f64,
    pub max_rotation_deg: f64,
    /// Vertical drag is divided by this before clamping
    pub vertical_damping: f64,
    pub max_vertical_offset: f64,
    /// Scale of the preview card while the top card is at rest
    pub preview_base_scale: f64,
    /// Scale of the top card while it is held
    pub lift_scale: f64,
    /// Scale the top card shrinks to while leaving the screen
    pub exit_scale: f64,
    pub exit_duration: Duration,
    pub spring_settle: Duration,
    /// Commit as soon as a drag crosses the threshold instead of on release
    pub auto_commit: bool,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            screen_width: 390.0,
            threshold_fraction: 0.4,
            max_rotation_deg: 15.0,
            vertical_damping: 3.0,
            max_vertical_offset: 100.0,
            preview_base_scale: 0.9,
            lift_scale: 1.05,
            exit_scale: 0.8,
            exit_duration: Duration::from_millis(200),
            spring_settle: Duration::from_millis(300),
            auto_commit: true,
        }
    }
}

impl DeckConfig {
    /// Horizontal distance needed to commit a swipe
    #[inline]
    pub fn threshold(&self) -> f64 {
        self.screen_width * self.threshold_fraction
    }
}

/// Transform applied to the top card and the preview card beneath it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureState {
    #[serde(rename = "offsetX")]
    pub offset_x: f64,
    #[serde(rename = "offsetY")]
    pub offset_y: f64,
    #[serde(rename = "rotationDeg")]
    pub rotation_deg: f64,
    pub scale: f64,
    #[serde(rename = "previewScale")]
    pub preview_scale: f64,
}

impl GestureState {
    pub fn neutral(config: &DeckConfig) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            rotation_deg: 0.0,
            scale: 1.0,
            preview_scale: config.preview_base_scale,
        }
    }

    pub fn is_neutral(&self, config: &DeckConfig) -> bool {
        *self == Self::neutral(config)
    }
}

/// Map a raw drag translation to a card transform
///
/// Horizontal travel is clamped to one screen width, vertical travel is
/// damped then clamped. Rotation follows the horizontal offset linearly.
pub fn drag_transform(translation_x: f64, translation_y: f64, config: &DeckConfig) -> GestureState {
    let width = config.screen_width;
    let offset_x = translation_x.clamp(-width, width);
    let offset_y = (translation_y / config.vertical_damping)
        .clamp(-config.max_vertical_offset, config.max_vertical_offset);

    GestureState {
        offset_x,
        offset_y,
        rotation_deg: (offset_x / width) * config.max_rotation_deg,
        scale: config.lift_scale,
        preview_scale: preview_scale_for(offset_x, config),
    }
}

/// Preview card grows from its base scale to 1.0 as the drag nears the threshold
#[inline]
pub fn preview_scale_for(offset_x: f64, config: &DeckConfig) -> f64 {
    let progress = (offset_x.abs() / config.threshold()).min(1.0);
    config.preview_base_scale + progress * (1.0 - config.preview_base_scale)
}

#[inline]
pub fn crosses_threshold(offset_x: f64, config: &DeckConfig) -> bool {
    offset_x.abs() >= config.threshold()
}

/// Final transform of a card leaving the screen
pub fn exit_target(from: &GestureState, direction: SwipeDirection, config: &DeckConfig) -> GestureState {
    GestureState {
        offset_x: direction.sign() * config.screen_width,
        offset_y: from.offset_y,
        rotation_deg: direction.sign() * config.max_rotation_deg,
        scale: config.exit_scale,
        preview_scale: 1.0,
    }
}

/// Quadratic ease-out over `t` in [0, 1]
#[inline]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Critically damped spring progress, normalised to reach 1.0 at `t = 1`
#[inline]
pub fn spring_progress(t: f64) -> f64 {
    const STIFFNESS: f64 = 6.6;
    if t >= 1.0 {
        return 1.0;
    }
    let t = t.max(0.0);
    1.0 - (1.0 + STIFFNESS * t) * (-STIFFNESS * t).exp()
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Component-wise interpolation between two transforms
pub fn interpolate(from: &GestureState, to: &GestureState, t: f64) -> GestureState {
    GestureState {
        offset_x: lerp(from.offset_x, to.offset_x, t),
        offset_y: lerp(from.offset_y, to.offset_y, t),
        rotation_deg: lerp(from.rotation_deg, to.rotation_deg, t),
        scale: lerp(from.scale, to.scale, t),
        preview_scale: lerp(from.preview_scale, to.preview_scale, t),
    }
}

/// Fraction of `total` covered by `elapsed`, capped at 1.0
#[inline]
pub fn progress(elapsed: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / total.as_secs_f64()).min(1.0)
}
