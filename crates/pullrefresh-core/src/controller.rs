//! Pull-to-refresh controller
//!
//! Owns the state machine, the indicator animator and the inset policy for one
//! scroll host. The host is handed in on every call instead of being
//! referenced, so the controller never extends the host's lifetime; host
//! notifications arrive over the observer channel and are drained by
//! [`RefreshController::tick`].
//!
//! Everything runs on the host's event loop. Inset animations and the
//! programmatic start delay advance in `tick()`; each animation is tagged
//! with the refresh episode it belongs to, and a completion from an earlier
//! episode is discarded.

use std::fmt;

use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::animation::{Completion, Curve, EasingTypeExt, InsetAnimation, ScrollMetrics};
use crate::config::{EasingType, RefreshConfig};
use crate::geometry::{Insets, Point, Rect};
use crate::host::{IndicatorLayer, ObserverId, ScrollEvent, ScrollHost};
use crate::indicator::RefreshViewAnimator;
use crate::state::{PullSample, RefreshStateMachine, State, Transition};
use crate::{Error, Result};

/// Caller-supplied refresh action, invoked once per loading episode
pub type RefreshAction = Box<dyn FnMut()>;

/// Live registration on the host
struct Subscription {
    id: ObserverId,
    events: mpsc::UnboundedReceiver<ScrollEvent>,
}

/// Programmatic start waiting for the scroll to settle
#[derive(Debug, Clone, Copy)]
struct PendingStart {
    deadline: Instant,
    episode: u64,
}

pub struct RefreshController {
    indicator_height: f64,
    config: RefreshConfig,
    machine: RefreshStateMachine,
    animator: Box<dyn RefreshViewAnimator>,
    action: Option<RefreshAction>,
    attached: bool,
    subscription: Option<Subscription>,
    /// Content inset captured at attach time or while `initial`
    default_insets: Insets,
    /// Safe-area adjusted inset, when the host reports one
    default_adjusted_insets: Option<Insets>,
    previous_offset: Point,
    visible_while_scrolling: bool,
    animation: Option<InsetAnimation>,
    pending_start: Option<PendingStart>,
    /// Incremented on every entry into `loading` or `finished`
    episode: u64,
}

impl fmt::Debug for RefreshController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshController")
            .field("indicator_height", &self.indicator_height)
            .field("state", &self.machine.state())
            .field("attached", &self.attached)
            .field("observing", &self.subscription.is_some())
            .field("default_insets", &self.default_insets)
            .field("default_adjusted_insets", &self.default_adjusted_insets)
            .field("animating", &self.animation.is_some())
            .field("episode", &self.episode)
            .finish()
    }
}

impl RefreshController {
    /// Create a controller for an indicator of the given height
    pub fn new(animator: impl RefreshViewAnimator + 'static, indicator_height: f64) -> Result<Self> {
        if !(indicator_height.is_finite() && indicator_height > 0.0) {
            return Err(Error::InvalidIndicatorHeight(indicator_height));
        }

        let config = RefreshConfig::default();
        Ok(Self {
            indicator_height,
            machine: RefreshStateMachine::new(indicator_height)
                .with_release_cap(config.release_cap),
            visible_while_scrolling: config.visible_while_scrolling,
            config,
            animator: Box::new(animator),
            action: None,
            attached: false,
            subscription: None,
            default_insets: Insets::ZERO,
            default_adjusted_insets: None,
            previous_offset: Point::ZERO,
            animation: None,
            pending_start: None,
            episode: 0,
        })
    }

    /// Replace the configuration; meant to be called before attaching
    pub fn with_config(mut self, config: RefreshConfig) -> Self {
        self.machine = self.machine.with_release_cap(config.release_cap);
        self.visible_while_scrolling = config.visible_while_scrolling;
        self.config = config;
        self
    }

    #[inline]
    pub fn state(&self) -> State {
        self.machine.state()
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    pub fn indicator_height(&self) -> f64 {
        self.indicator_height
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether host notifications are currently being received
    pub fn is_observing(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn default_insets(&self) -> Insets {
        self.default_insets
    }

    pub fn default_adjusted_insets(&self) -> Option<Insets> {
        self.default_adjusted_insets
    }

    pub fn is_visible_while_scrolling(&self) -> bool {
        self.visible_while_scrolling
    }

    /// Check if an inset animation or a programmatic start is pending.
    /// Use this to determine if the host needs a high frame rate.
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_start.is_some()
    }

    /// Attach to `host`: capture its insets, place the indicator above the
    /// resting content and start observing. An existing attachment to the
    /// same host is fully detached first.
    pub(crate) fn attach(&mut self, host: &mut dyn ScrollHost, action: RefreshAction) {
        if self.attached {
            warn!("Refresh controller attached twice; detaching previous registration");
            self.detach(host);
        }

        self.action = Some(action);
        self.default_insets = host.content_inset();
        self.default_adjusted_insets = host.adjusted_content_inset();
        self.previous_offset = host.content_offset();
        self.machine.reset();
        self.attached = true;

        let frame = self.default_frame(host);
        host.insert_indicator(frame, IndicatorLayer::BehindContent);

        debug!(
            height = self.indicator_height,
            top_inset = self.default_insets.top,
            adjusted = self.default_adjusted_insets.is_some(),
            "Refresh controller attached"
        );

        self.observe(host);
    }

    /// Stop observing and remove the indicator; safe to call repeatedly
    pub(crate) fn detach(&mut self, host: &mut dyn ScrollHost) {
        self.process_events(host);
        if !self.attached {
            return;
        }

        self.stop_observing(host);
        self.cancel_animation(host);
        self.pending_start = None;

        // Give the reserved loading space back
        if self.state().is_sticky() {
            host.set_content_inset(self.default_insets);
        }

        host.remove_indicator();
        self.machine.reset();
        self.attached = false;
        debug!("Refresh controller detached");
    }

    fn observe(&mut self, host: &mut dyn ScrollHost) {
        if self.subscription.is_some() {
            return;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let id = host.add_observer(tx);
        self.subscription = Some(Subscription { id, events: rx });

        // Initial sample, as if the offset had just been reported
        let y = host.content_offset().y;
        self.on_scroll_offset_changed(host, y);
    }

    fn stop_observing(&mut self, host: &mut dyn ScrollHost) {
        if let Some(subscription) = self.subscription.take() {
            host.remove_observer(subscription.id);
        }
    }

    /// The host dropped its end of the channel
    fn host_lost(&mut self) {
        warn!("Scroll host went away; treating refresh controller as detached");
        self.subscription = None;
        self.animation = None;
        self.pending_start = None;
        self.machine.reset();
        self.attached = false;
    }

    /// Drain and handle queued host notifications
    pub fn process_events(&mut self, host: &mut dyn ScrollHost) {
        loop {
            let next = match self.subscription.as_mut() {
                Some(subscription) => subscription.events.try_recv(),
                None => break,
            };

            match next {
                Ok(event) => self.handle_event(host, event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.host_lost();
                    break;
                }
            }
        }
    }

    fn handle_event(&mut self, host: &mut dyn ScrollHost, event: ScrollEvent) {
        match event {
            ScrollEvent::ContentOffsetChanged(y) => self.on_scroll_offset_changed(host, y),
            ScrollEvent::ContentInsetChanged(_) => self.on_content_inset_changed(host),
            ScrollEvent::AdjustedInsetChanged(insets) => {
                self.default_adjusted_insets = Some(insets);
            }
            // Reserved; content size does not affect the refresh state
            ScrollEvent::ContentSizeChanged(_) => {}
        }
    }

    /// Feed a new vertical offset through the state machine
    pub fn on_scroll_offset_changed(&mut self, host: &mut dyn ScrollHost, offset_y: f64) {
        if !self.attached {
            return;
        }

        let distance = -(offset_y + self.positioning_insets().top);
        let sample = PullSample::new(distance, host.is_dragging());
        self.previous_offset = Point::new(host.content_offset().x, offset_y);

        if let Some(transition) = self.machine.compute(sample) {
            self.transition(host, transition);
        }
    }

    /// Keep the resting inset in sync with host-driven inset changes
    pub fn on_content_inset_changed(&mut self, host: &mut dyn ScrollHost) {
        if self.state() == State::Initial {
            self.default_insets = host.content_inset();
            debug!(top_inset = self.default_insets.top, "Default content inset updated");
        }
    }

    /// Scroll to the fully pulled position and enter `loading` once the
    /// scroll has settled. Ignored unless `initial`.
    pub fn start_refreshing(&mut self, host: &mut dyn ScrollHost) {
        self.process_events(host);
        if !self.attached || self.state() != State::Initial || self.pending_start.is_some() {
            return;
        }

        let offset_y = -(self.indicator_height + self.default_insets.top);
        host.set_content_offset(Point::new(0.0, offset_y), true);
        self.pending_start = Some(PendingStart {
            deadline: Instant::now() + self.config.start_delay(),
            episode: self.episode,
        });
        debug!(offset_y, "Programmatic refresh scheduled");
    }

    /// Signal that the refresh action completed. Ignored unless `loading`.
    pub fn end_refreshing(&mut self, host: &mut dyn ScrollHost) {
        self.process_events(host);
        if self.state() == State::Loading {
            self.set_state(host, State::Finished);
        }
    }

    /// Toggle keeping the indicator above the host while loading
    pub fn set_visible_while_scrolling(&mut self, host: &mut dyn ScrollHost, visible: bool) {
        if self.visible_while_scrolling && self.attached {
            self.send_indicator_to_host(host);
        }
        self.visible_while_scrolling = visible;
    }

    /// Advance notifications, the start delay and the inset animation
    pub fn tick(&mut self, host: &mut dyn ScrollHost) {
        if !self.attached {
            return;
        }

        self.process_events(host);

        let now = Instant::now();
        self.fire_pending_start(host, now);
        self.advance_animation(host, now);
    }

    fn set_state(&mut self, host: &mut dyn ScrollHost, state: State) {
        self.transition(host, Transition::to(state));
    }

    fn transition(&mut self, host: &mut dyn ScrollHost, transition: Transition) {
        let previous = self.machine.state();
        if previous == transition.state {
            self.machine.apply(transition);
            return;
        }

        if transition.state == State::Finished && self.visible_while_scrolling {
            self.send_indicator_to_host(host);
        }

        self.machine.apply(transition);
        debug!(?previous, state = ?transition.state, "Refresh state changed");
        self.animator.animate(transition.state);

        match transition.state {
            State::Loading => self.enter_loading(host),
            State::Finished => self.enter_finished(host),
            State::Initial | State::Releasing { .. } => {}
        }
    }

    fn enter_loading(&mut self, host: &mut dyn ScrollHost) {
        self.episode += 1;
        self.pending_start = None;

        host.set_content_offset(self.previous_offset, false);
        host.set_bounces(false);

        let from = ScrollMetrics::new(host.content_inset(), host.content_offset());
        let to = ScrollMetrics::new(
            from.inset
                .with_top(self.indicator_height + self.default_insets.top),
            Point::new(
                from.offset.x,
                -(self.positioning_insets().top + self.indicator_height),
            ),
        );
        self.animation = Some(InsetAnimation::new(
            from,
            to,
            self.config.loading_duration(),
            Curve::Eased(EasingType::Cubic),
            Completion::Loading,
            self.episode,
        ));
        debug!(episode = self.episode, target_top = to.inset.top, "Loading inset animation started");

        if let Some(action) = self.action.as_mut() {
            action();
        }
    }

    fn enter_finished(&mut self, host: &mut dyn ScrollHost) {
        self.episode += 1;
        self.cancel_animation(host);

        if !self.is_currently_visible(host) {
            // Scrolled away: restore the inset without animating
            host.set_content_inset(self.default_insets);
            self.set_state(host, State::Initial);
            return;
        }

        // Observation stays suspended until the content is back at rest
        self.stop_observing(host);

        let from = ScrollMetrics::new(host.content_inset(), host.content_offset());
        let to = ScrollMetrics::new(
            self.default_insets,
            Point::new(from.offset.x, -self.positioning_insets().top),
        );
        let curve = self.config.finish_easing.curve(&self.config);
        self.animation = Some(
            InsetAnimation::new(
                from,
                to,
                self.config.finish_duration(),
                curve,
                Completion::Finished,
                self.episode,
            )
            .delayed(self.config.hide_delay()),
        );
        debug!(episode = self.episode, "Finish inset animation started");
    }

    fn fire_pending_start(&mut self, host: &mut dyn ScrollHost, now: Instant) {
        let Some(pending) = self.pending_start else {
            return;
        };
        if now < pending.deadline {
            return;
        }

        self.pending_start = None;
        if pending.episode != self.episode || self.state().is_sticky() {
            debug!("Discarding stale programmatic refresh");
            return;
        }
        self.set_state(host, State::Loading);
    }

    fn advance_animation(&mut self, host: &mut dyn ScrollHost, now: Instant) {
        let Some(animation) = self.animation.take() else {
            return;
        };
        if !animation.has_started(now) {
            self.animation = Some(animation);
            return;
        }

        let frame = animation.frame(now);
        host.set_content_inset(frame.inset);
        host.set_content_offset(frame.offset, false);

        if animation.is_complete(now) {
            self.complete_animation(host, animation);
        } else {
            self.animation = Some(animation);
        }
    }

    fn complete_animation(&mut self, host: &mut dyn ScrollHost, animation: InsetAnimation) {
        if animation.episode() != self.episode {
            debug!(
                episode = animation.episode(),
                current = self.episode,
                "Discarding stale inset animation completion"
            );
            if animation.completion() == Completion::Loading {
                host.set_bounces(true);
            }
            return;
        }

        debug!(completion = ?animation.completion(), "Inset animation finished");
        match animation.completion() {
            Completion::Loading => {
                host.set_bounces(true);
                if self.visible_while_scrolling {
                    self.bring_indicator_above_host(host);
                }
            }
            Completion::Finished => {
                self.observe(host);
                self.set_state(host, State::Initial);
            }
        }
    }

    /// Drop the in-flight animation, undoing its bounce change
    fn cancel_animation(&mut self, host: &mut dyn ScrollHost) {
        if let Some(animation) = self.animation.take() {
            if animation.completion() == Completion::Loading {
                host.set_bounces(true);
            }
        }
    }

    /// Insets used to position the content: adjusted when available
    fn positioning_insets(&self) -> Insets {
        self.default_adjusted_insets.unwrap_or(self.default_insets)
    }

    fn is_currently_visible(&self, host: &dyn ScrollHost) -> bool {
        host.content_offset().y <= -self.positioning_insets().top
    }

    fn default_frame(&self, host: &dyn ScrollHost) -> Rect {
        Rect::new(
            0.0,
            -self.indicator_height,
            host.frame().width,
            self.indicator_height,
        )
    }

    fn bring_indicator_above_host(&mut self, host: &mut dyn ScrollHost) {
        let Some(frame) = host.convert_to_parent(self.default_frame(host)) else {
            return;
        };
        host.remove_indicator();
        host.insert_indicator(frame, IndicatorLayer::AboveHost);
    }

    fn send_indicator_to_host(&mut self, host: &mut dyn ScrollHost) {
        host.remove_indicator();
        let frame = self.default_frame(host);
        host.insert_indicator(frame, IndicatorLayer::BehindContent);
    }
}
