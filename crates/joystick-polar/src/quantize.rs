//! Quantization of direction and strength into discrete buckets.
//!
//! Rounding is a single `f32::round` on non-negative values (half-up), so a
//! value exactly on a bucket boundary lands in the upper bucket.

use crate::polar::{Inversion, Position2d, strength};
use crate::{PolarError, PolarResult};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Segment count used for POV hat emulation.
pub const POV_HAT_SEGMENTS: usize = 8;

/// Hat code reported when the pair is centered.
pub const POV_HAT_CENTERED: i32 = -1;

const HAT_STRENGTH_STEPS: usize = 2;

/// Buckets a heading (up is 0, clockwise) into `segments` evenly spaced
/// segments with segment 0 centered on up.
///
/// Any finite heading is accepted; non-finite headings map to segment 0.
///
/// # Errors
///
/// Returns [`PolarError::InvalidSegmentCount`] if `segments < 2`.
pub fn heading_index(heading: f32, segments: usize) -> PolarResult<usize> {
    if segments < 2 {
        return Err(PolarError::InvalidSegmentCount(segments));
    }
    Ok(segment_of(heading, segments))
}

/// Buckets a [`direction`](crate::direction) into `segments` evenly spaced
/// segments, segment 0 centered on up and proceeding clockwise.
///
/// # Errors
///
/// Returns [`PolarError::InvalidSegmentCount`] if `segments < 2`.
pub fn direction_index(direction: f32, segments: usize) -> PolarResult<usize> {
    heading_index(direction + FRAC_PI_2, segments)
}

/// Buckets a strength in `[0, 1]` into `steps` levels: step 0 is no
/// deflection, step `steps - 1` is full deflection.
///
/// # Errors
///
/// Returns [`PolarError::InvalidStepCount`] if `steps < 2`.
pub fn strength_index(strength: f32, steps: usize) -> PolarResult<usize> {
    if steps < 2 {
        return Err(PolarError::InvalidStepCount(steps));
    }
    Ok(step_of(strength, steps))
}

fn segment_of(heading: f32, segments: usize) -> usize {
    if !heading.is_finite() {
        return 0;
    }
    // rem_euclid can round up to exactly TAU; the modulo below folds that
    // back onto segment 0.
    let turn = heading.rem_euclid(TAU);
    let index = (turn * segments as f32 / TAU).round() as usize;
    index % segments
}

fn step_of(strength: f32, steps: usize) -> usize {
    let strength = if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 1.0)
    };
    let last = steps - 1;
    let index = (strength * last as f32).round() as usize;
    index.min(last)
}

/// Emulates an 8-way hat switch from an analog pair.
///
/// Returns [`POV_HAT_CENTERED`] while the pair sits below half strength,
/// otherwise the 8-segment direction index (`0..=7`, clockwise from up).
/// Inversion affects the direction only.
pub fn pov_hat(position: Position2d, inversion: Inversion) -> i32 {
    if step_of(strength(position.x, position.y), HAT_STRENGTH_STEPS) == 0 {
        return POV_HAT_CENTERED;
    }
    let segment = segment_of(position.inverted(inversion).heading(), POV_HAT_SEGMENTS);
    HatDirection::from_segment(segment).code()
}

/// Typed form of [`pov_hat`].
pub fn pov_hat_direction(position: Position2d, inversion: Inversion) -> HatDirection {
    HatDirection::from_code(pov_hat(position, inversion))
}

/// Position of an 8-way hat switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HatDirection {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    #[default]
    Centered,
}

impl HatDirection {
    /// Maps a hat code; anything outside `0..=7` is [`HatDirection::Centered`].
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => HatDirection::Up,
            1 => HatDirection::UpRight,
            2 => HatDirection::Right,
            3 => HatDirection::DownRight,
            4 => HatDirection::Down,
            5 => HatDirection::DownLeft,
            6 => HatDirection::Left,
            7 => HatDirection::UpLeft,
            _ => HatDirection::Centered,
        }
    }

    fn from_segment(segment: usize) -> Self {
        i32::try_from(segment).map_or(HatDirection::Centered, Self::from_code)
    }

    pub fn code(self) -> i32 {
        match self {
            HatDirection::Up => 0,
            HatDirection::UpRight => 1,
            HatDirection::Right => 2,
            HatDirection::DownRight => 3,
            HatDirection::Down => 4,
            HatDirection::DownLeft => 5,
            HatDirection::Left => 6,
            HatDirection::UpLeft => 7,
            HatDirection::Centered => POV_HAT_CENTERED,
        }
    }

    pub fn is_centered(self) -> bool {
        self == HatDirection::Centered
    }
}
