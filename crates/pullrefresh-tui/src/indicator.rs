//! Terminal refresh indicator view.
//!
//! [`IndicatorHandle`] is a cheap shared handle: one clone is driven by the
//! controller's `ProgressAnimator`, another is read by the widget when drawing.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::time::Instant;

use pullrefresh_core::animation::timing::{lerp, progress_at};
use pullrefresh_core::ProgressView;

/// Length of one pass through the loading loop
const LOOP_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Loop {
    from: f64,
    to: f64,
    start: Instant,
}

#[derive(Debug, Default)]
struct IndicatorModel {
    fade: Option<Fade>,
    alpha: f64,
    progress: f64,
    looping: Option<Loop>,
}

/// What the widget draws for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub alpha: f64,
    /// Playback position, 0.0-1.0
    pub progress: f64,
    pub spinning: bool,
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorHandle {
    inner: Rc<RefCell<IndicatorModel>>,
}

impl IndicatorHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, now: Instant) -> IndicatorSnapshot {
        let model = self.inner.borrow();

        let alpha = match model.fade {
            Some(fade) => lerp(fade.from, fade.to, progress_at(fade.start, fade.duration, now)),
            None => model.alpha,
        };

        let progress = match model.looping {
            Some(looping) => {
                let elapsed = now.saturating_duration_since(looping.start).as_secs_f64();
                let phase = (elapsed / LOOP_PERIOD.as_secs_f64()).fract();
                lerp(looping.from, looping.to, phase)
            }
            None => model.progress,
        };

        IndicatorSnapshot {
            alpha,
            progress,
            spinning: model.looping.is_some(),
        }
    }

    /// True while a fade or the loop needs redrawing
    pub fn is_animating(&self, now: Instant) -> bool {
        let model = self.inner.borrow();
        model.looping.is_some()
            || model
                .fade
                .is_some_and(|fade| now < fade.start + fade.duration)
    }
}

impl ProgressView for IndicatorHandle {
    fn set_alpha(&mut self, alpha: f64, fade: Duration) {
        let now = Instant::now();
        let current = self.snapshot(now).alpha;
        let mut model = self.inner.borrow_mut();
        model.alpha = alpha;
        model.fade = if fade.is_zero() || current == alpha {
            None
        } else {
            Some(Fade {
                from: current,
                to: alpha,
                start: now,
                duration: fade,
            })
        };
    }

    fn set_progress(&mut self, progress: f64) {
        self.inner.borrow_mut().progress = progress.clamp(0.0, 1.0);
    }

    fn play_loop(&mut self, from: f64, to: f64) {
        self.inner.borrow_mut().looping = Some(Loop {
            from,
            to,
            start: Instant::now(),
        });
    }

    fn stop(&mut self) {
        let mut model = self.inner.borrow_mut();
        model.looping = None;
        model.progress = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use pullrefresh_core::{ProgressAnimator, RefreshViewAnimator, State};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fades_out_on_initial() {
        let handle = IndicatorHandle::new();
        let mut animator = ProgressAnimator::new(handle.clone());

        animator.animate(State::Releasing { progress: 0.5 });
        assert_eq!(handle.snapshot(Instant::now()).alpha, 1.0);

        animator.animate(State::Initial);
        tokio::time::advance(Duration::from_millis(50)).await;
        let halfway = handle.snapshot(Instant::now()).alpha;
        assert!((halfway - 0.5).abs() < 1e-9);
        assert!(handle.is_animating(Instant::now()));

        tokio::time::advance(Duration::from_millis(50)).await;
        assert_eq!(handle.snapshot(Instant::now()).alpha, 0.0);
        assert!(!handle.is_animating(Instant::now()));
    }

    #[test]
    fn test_scrubs_progress_while_pulling() {
        let handle = IndicatorHandle::new();
        let mut animator = ProgressAnimator::new(handle.clone());

        animator.animate(State::Releasing { progress: 1.0 });
        let snapshot = handle.snapshot(Instant::now());
        assert!((snapshot.progress - 0.22).abs() < 1e-9);
        assert!(!snapshot.spinning);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_cycles_between_bounds() {
        let handle = IndicatorHandle::new();
        let mut animator = ProgressAnimator::new(handle.clone());
        animator.animate(State::Loading);

        tokio::time::advance(Duration::from_millis(500)).await;
        let snapshot = handle.snapshot(Instant::now());
        assert!(snapshot.spinning);
        assert!((snapshot.progress - 0.6).abs() < 1e-9);

        tokio::time::advance(Duration::from_millis(500)).await;
        let wrapped = handle.snapshot(Instant::now()).progress;
        assert!((wrapped - 0.2).abs() < 1e-9);

        animator.animate(State::Initial);
        assert!(!handle.snapshot(Instant::now()).spinning);
    }
}
