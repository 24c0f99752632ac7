//! Refresh states and the pure pull-distance state machine.

use serde::Serialize;

/// Discrete refresh state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum State {
    /// Resting, no interaction
    #[default]
    Initial,
    /// Pulled past the resting edge; progress is normalized to the
    /// indicator height and clamped to [0, 1]
    Releasing { progress: f64 },
    /// Refresh action triggered and in flight
    Loading,
    /// Action completed, view returning to rest
    Finished,
}

impl State {
    /// `loading` and `finished` ignore offset-driven transitions
    pub fn is_sticky(&self) -> bool {
        matches!(self, State::Loading | State::Finished)
    }

    pub fn progress(&self) -> Option<f64> {
        match self {
            State::Releasing { progress } => Some(*progress),
            _ => None,
        }
    }
}

/// One scroll sample fed to the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PullSample {
    /// Distance pulled past the resting edge (positive = pulled down)
    pub distance: f64,
    /// Whether the user is still holding the content
    pub is_dragging: bool,
}

impl PullSample {
    pub fn new(distance: f64, is_dragging: bool) -> Self {
        Self {
            distance,
            is_dragging,
        }
    }
}

/// Result of a state computation
///
/// `fully_pulled` records that the pull reached the full indicator height.
/// It replaces comparing against `Releasing { progress: 1.0 }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: State,
    pub fully_pulled: bool,
}

impl Transition {
    /// Transition requested explicitly by the controller
    pub fn to(state: State) -> Self {
        Self {
            state,
            fully_pulled: false,
        }
    }

    fn releasing(progress: f64, fully_pulled: bool) -> Self {
        Self {
            state: State::Releasing {
                progress: progress.clamp(0.0, 1.0),
            },
            fully_pulled,
        }
    }
}

/// Maps pull-distance samples into refresh states
#[derive(Debug, Clone)]
pub struct RefreshStateMachine {
    indicator_height: f64,
    release_cap: f64,
    state: State,
    fully_pulled: bool,
}

impl RefreshStateMachine {
    /// Default cap on pull distance considered by the trigger rule
    pub const DEFAULT_RELEASE_CAP: f64 = 1000.0;

    pub fn new(indicator_height: f64) -> Self {
        Self {
            indicator_height,
            release_cap: Self::DEFAULT_RELEASE_CAP,
            state: State::Initial,
            fully_pulled: false,
        }
    }

    pub fn with_release_cap(mut self, release_cap: f64) -> Self {
        self.release_cap = release_cap;
        self
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn is_fully_pulled(&self) -> bool {
        self.fully_pulled
    }

    pub fn indicator_height(&self) -> f64 {
        self.indicator_height
    }

    /// Compute the transition for a sample without applying it
    ///
    /// Rules, in order:
    /// 1. at rest (distance 0) and not loading: `initial`
    /// 2. within (0, height] and not loading/finished: `releasing(d / height)`
    /// 3. within (height, cap]: `loading` if fully pulled and released,
    ///    otherwise `releasing(1)` unless loading/finished
    /// 4. anything else: no transition (`None`)
    pub fn compute(&self, sample: PullSample) -> Option<Transition> {
        let height = self.indicator_height;
        let distance = sample.distance;

        if distance == 0.0 && self.state != State::Loading {
            return Some(Transition::to(State::Initial));
        }

        if distance > 0.0 && distance <= height {
            if self.state.is_sticky() {
                return None;
            }
            return Some(Transition::releasing(distance / height, distance >= height));
        }

        if distance > height && distance <= self.release_cap {
            if self.fully_pulled && !sample.is_dragging && !self.state.is_sticky() {
                return Some(Transition::to(State::Loading));
            }
            if !self.state.is_sticky() {
                return Some(Transition::releasing(1.0, true));
            }
        }

        None
    }

    /// Apply a transition and return the previous state
    pub fn apply(&mut self, transition: Transition) -> State {
        let previous = self.state;
        self.state = transition.state;
        self.fully_pulled = matches!(transition.state, State::Releasing { .. })
            && transition.fully_pulled;
        previous
    }

    /// Compute and apply; returns the new state when a rule matched
    pub fn advance(&mut self, sample: PullSample) -> Option<State> {
        let transition = self.compute(sample)?;
        self.apply(transition);
        Some(transition.state)
    }

    pub fn reset(&mut self) {
        self.state = State::Initial;
        self.fully_pulled = false;
    }
}
