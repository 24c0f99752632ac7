//! Animated change of a host's content inset and offset

use std::time::Duration;

use tokio::time::Instant;

use super::easing::Curve;
use super::timing::{is_complete_at, lerp_insets, lerp_point, progress_at};
use crate::geometry::{Insets, Point};

/// Inset and offset pair driven together by one animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub inset: Insets,
    pub offset: Point,
}

impl ScrollMetrics {
    pub fn new(inset: Insets, offset: Point) -> Self {
        Self { inset, offset }
    }
}

/// What the controller does once an animation lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Restore bounce, promote the indicator if configured
    Loading,
    /// Re-observe the host and return to `initial`
    Finished,
}

/// Active inset animation
#[derive(Debug, Clone)]
pub struct InsetAnimation {
    /// Animation start time (after any delay)
    start: Instant,
    duration: Duration,
    from: ScrollMetrics,
    to: ScrollMetrics,
    curve: Curve,
    completion: Completion,
    /// Refresh episode this animation belongs to
    episode: u64,
}

impl InsetAnimation {
    pub fn new(
        from: ScrollMetrics,
        to: ScrollMetrics,
        duration: Duration,
        curve: Curve,
        completion: Completion,
        episode: u64,
    ) -> Self {
        Self {
            start: Instant::now(),
            duration,
            from,
            to,
            curve,
            completion,
            episode,
        }
    }

    /// Hold the animation for `delay` before it starts moving
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.start += delay;
        self
    }

    pub fn completion(&self) -> Completion {
        self.completion
    }

    pub fn episode(&self) -> u64 {
        self.episode
    }

    pub fn has_started(&self, now: Instant) -> bool {
        now >= self.start
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        is_complete_at(self.start, self.duration, now)
    }

    /// Interpolated metrics at `now`; exactly the target once complete
    pub fn frame(&self, now: Instant) -> ScrollMetrics {
        if self.is_complete(now) {
            return self.to;
        }
        let t = self.curve.apply(progress_at(self.start, self.duration, now));
        ScrollMetrics {
            inset: lerp_insets(self.from.inset, self.to.inset, t),
            offset: lerp_point(self.from.offset, self.to.offset, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loading_animation() -> InsetAnimation {
        InsetAnimation::new(
            ScrollMetrics::new(Insets::ZERO, Point::new(0.0, -70.0)),
            ScrollMetrics::new(Insets::top(60.0), Point::new(0.0, -60.0)),
            Duration::from_millis(300),
            Curve::LINEAR,
            Completion::Loading,
            1,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_interpolates_linearly() {
        let animation = loading_animation();
        let start = Instant::now();

        let frame = animation.frame(start + Duration::from_millis(150));
        assert!((frame.inset.top - 30.0).abs() < 1e-9);
        assert!((frame.offset.y + 65.0).abs() < 1e-9);
        assert!(!animation.is_complete(start + Duration::from_millis(299)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_lands_on_target() {
        let animation = loading_animation();
        let end = Instant::now() + Duration::from_millis(300);

        assert!(animation.is_complete(end));
        assert_eq!(
            animation.frame(end),
            ScrollMetrics::new(Insets::top(60.0), Point::new(0.0, -60.0))
        );
        assert_eq!(animation.completion(), Completion::Loading);
        assert_eq!(animation.episode(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_holds_start_values() {
        let animation = loading_animation().delayed(Duration::from_millis(100));
        let now = Instant::now();

        assert!(!animation.has_started(now + Duration::from_millis(50)));
        let held = animation.frame(now + Duration::from_millis(50));
        assert_eq!(held.inset, Insets::ZERO);
        assert!(!animation.is_complete(now + Duration::from_millis(300)));
        assert!(animation.is_complete(now + Duration::from_millis(400)));
    }
}
