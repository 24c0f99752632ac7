//! Time calculation utilities for animations
//!
//! Uses `tokio::time::Instant` so a paused test clock drives every animation.

use std::time::Duration;

use tokio::time::Instant;

use crate::geometry::{Insets, Point};

/// Animation progress (0.0 to 1.0) from start time and duration at `now`
///
/// Returns 0.0 before `start` and 1.0 for a zero duration.
#[inline]
pub fn progress_at(start: Instant, duration: Duration, now: Instant) -> f64 {
    if now < start {
        return 0.0;
    }
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if an animation is complete at `now`
#[inline]
pub fn is_complete_at(start: Instant, duration: Duration, now: Instant) -> bool {
    now >= start + duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

pub fn lerp_point(from: Point, to: Point, t: f64) -> Point {
    Point::new(lerp(from.x, to.x, t), lerp(from.y, to.y, t))
}

pub fn lerp_insets(from: Insets, to: Insets, t: f64) -> Insets {
    Insets::new(
        lerp(from.top, to.top, t),
        lerp(from.left, to.left, t),
        lerp(from.bottom, to.bottom, t),
        lerp(from.right, to.right, t),
    )
}
