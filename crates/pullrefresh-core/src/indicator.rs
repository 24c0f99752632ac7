//! Refresh indicator contract.
//!
//! The controller only calls [`RefreshViewAnimator::animate`] with each new
//! state. [`ProgressAnimator`] is the stock mapping onto a view that can fade,
//! scrub and loop a progress animation.

use std::time::Duration;

use crate::config::RefreshConfig;
use crate::state::State;

/// Receives every refresh state change
pub trait RefreshViewAnimator {
    fn animate(&mut self, state: State);
}

impl<F> RefreshViewAnimator for F
where
    F: FnMut(State),
{
    fn animate(&mut self, state: State) {
        self(state)
    }
}

/// Playback surface of an animated indicator view
pub trait ProgressView {
    /// Change opacity, fading over `fade` (zero = immediately)
    fn set_alpha(&mut self, alpha: f64, fade: Duration);

    /// Scrub the animation to `progress` (0.0-1.0)
    fn set_progress(&mut self, progress: f64);

    /// Loop the `from..to` segment until stopped
    fn play_loop(&mut self, from: f64, to: f64);

    fn stop(&mut self);
}

/// Maps refresh states onto a [`ProgressView`]
#[derive(Debug)]
pub struct ProgressAnimator<V> {
    view: V,
    fade: Duration,
    visibility_threshold: f64,
    scrub_scale: f64,
    loop_from: f64,
    loop_to: f64,
    /// True while the loading loop is playing
    looping: bool,
}

impl<V: ProgressView> ProgressAnimator<V> {
    pub fn new(view: V) -> Self {
        Self::with_config(view, &RefreshConfig::default())
    }

    pub fn with_config(view: V, config: &RefreshConfig) -> Self {
        Self {
            view,
            fade: config.fade_duration(),
            visibility_threshold: config.visibility_threshold,
            scrub_scale: config.scrub_scale,
            loop_from: config.loop_from,
            loop_to: config.loop_to,
            looping: false,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

impl<V: ProgressView> RefreshViewAnimator for ProgressAnimator<V> {
    fn animate(&mut self, state: State) {
        match state {
            State::Initial => {
                self.looping = false;
                self.view.stop();
                self.view.set_alpha(0.0, self.fade);
            }
            State::Releasing { progress } => {
                if progress < self.visibility_threshold {
                    self.view.set_alpha(0.0, self.fade);
                } else {
                    self.view.set_alpha(1.0, Duration::ZERO);
                }
                self.view.set_progress(progress * self.scrub_scale);
            }
            State::Loading => {
                if !self.looping {
                    self.looping = true;
                    self.view.play_loop(self.loop_from, self.loop_to);
                }
            }
            // The loop keeps playing while the content animates back
            State::Finished => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingView, ViewCall};

    #[test]
    fn test_initial_stops_and_fades_out() {
        let mut animator = ProgressAnimator::new(RecordingView::default());
        animator.animate(State::Initial);

        assert_eq!(
            animator.view().calls,
            vec![
                ViewCall::Stop,
                ViewCall::Alpha(0.0, Duration::from_millis(100)),
            ]
        );
    }

    #[test]
    fn test_releasing_fades_in_past_threshold_and_scrubs() {
        let mut animator = ProgressAnimator::new(RecordingView::default());
        animator.animate(State::Releasing { progress: 0.02 });
        animator.animate(State::Releasing { progress: 0.5 });

        let calls = &animator.view().calls;
        assert_eq!(calls[0], ViewCall::Alpha(0.0, Duration::from_millis(100)));
        assert!(matches!(calls[1], ViewCall::Progress(p) if (p - 0.02 * 0.22).abs() < 1e-12));
        assert_eq!(calls[2], ViewCall::Alpha(1.0, Duration::ZERO));
        assert!(matches!(calls[3], ViewCall::Progress(p) if (p - 0.11).abs() < 1e-12));
    }

    #[test]
    fn test_loading_starts_loop_once() {
        let mut animator = ProgressAnimator::new(RecordingView::default());
        animator.animate(State::Loading);
        animator.animate(State::Finished);
        animator.animate(State::Loading);

        let loops = animator
            .view()
            .calls
            .iter()
            .filter(|call| matches!(call, ViewCall::Loop(_, _)))
            .count();
        assert_eq!(loops, 1);
        assert!(animator.is_looping());
        assert_eq!(animator.view().calls[0], ViewCall::Loop(0.2, 1.0));

        animator.animate(State::Initial);
        assert!(!animator.is_looping());
    }

    #[test]
    fn test_closure_animator() {
        let mut seen = Vec::new();
        {
            let mut animator = |state: State| seen.push(state);
            animator.animate(State::Loading);
            animator.animate(State::Finished);
        }
        assert_eq!(seen, vec![State::Loading, State::Finished]);
    }
}
