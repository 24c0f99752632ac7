//! Recording test doubles for the host and indicator contracts.

use std::time::Duration;

use crate::geometry::{Insets, Point, Rect, Size};
use crate::host::{IndicatorLayer, ObserverId, ObserverSet, ScrollEvent, ScrollHost, ScrollObserver};
use crate::indicator::ProgressView;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Alpha(f64, Duration),
    Progress(f64),
    Loop(f64, f64),
    Stop,
}

#[derive(Debug, Default)]
pub struct RecordingView {
    pub calls: Vec<ViewCall>,
}

impl ProgressView for RecordingView {
    fn set_alpha(&mut self, alpha: f64, fade: Duration) {
        self.calls.push(ViewCall::Alpha(alpha, fade));
    }

    fn set_progress(&mut self, progress: f64) {
        self.calls.push(ViewCall::Progress(progress));
    }

    fn play_loop(&mut self, from: f64, to: f64) {
        self.calls.push(ViewCall::Loop(from, to));
    }

    fn stop(&mut self) {
        self.calls.push(ViewCall::Stop);
    }
}

/// In-memory host that notifies observers on every metric write
#[derive(Debug)]
pub struct MockHost {
    pub offset: Point,
    pub inset: Insets,
    pub adjusted: Option<Insets>,
    pub size: Size,
    pub frame: Rect,
    pub dragging: bool,
    pub bounces: bool,
    pub observers: ObserverSet,
    pub indicator: Option<(Rect, IndicatorLayer)>,
    /// Offsets requested with `animated = true`
    pub animated_scrolls: Vec<Point>,
    pub has_parent: bool,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            offset: Point::ZERO,
            inset: Insets::ZERO,
            adjusted: None,
            size: Size::new(320.0, 2000.0),
            frame: Rect::new(0.0, 0.0, 320.0, 480.0),
            dragging: false,
            bounces: true,
            observers: ObserverSet::new(),
            indicator: None,
            animated_scrolls: Vec::new(),
            has_parent: true,
        }
    }
}

impl MockHost {
    pub fn with_inset(inset: Insets) -> Self {
        Self {
            inset,
            offset: Point::new(0.0, -inset.top),
            ..Default::default()
        }
    }

    /// Simulate the user's finger moving the content
    pub fn drag_to(&mut self, y: f64) {
        self.dragging = true;
        self.scroll_to(y);
    }

    /// Simulate lifting the finger at the current offset
    pub fn release(&mut self) {
        self.dragging = false;
        self.observers
            .notify(ScrollEvent::ContentOffsetChanged(self.offset.y));
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.offset.y = y;
        self.observers.notify(ScrollEvent::ContentOffsetChanged(y));
    }

    pub fn change_adjusted_inset(&mut self, inset: Insets) {
        self.adjusted = Some(inset);
        self.observers.notify(ScrollEvent::AdjustedInsetChanged(inset));
    }
}

impl ScrollHost for MockHost {
    fn content_offset(&self) -> Point {
        self.offset
    }

    fn set_content_offset(&mut self, offset: Point, animated: bool) {
        if animated {
            self.animated_scrolls.push(offset);
        }
        self.offset = offset;
        self.observers
            .notify(ScrollEvent::ContentOffsetChanged(offset.y));
    }

    fn content_inset(&self) -> Insets {
        self.inset
    }

    fn set_content_inset(&mut self, inset: Insets) {
        self.inset = inset;
        self.observers.notify(ScrollEvent::ContentInsetChanged(inset));
    }

    fn adjusted_content_inset(&self) -> Option<Insets> {
        self.adjusted
    }

    fn content_size(&self) -> Size {
        self.size
    }

    fn frame(&self) -> Rect {
        self.frame
    }

    fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn set_bounces(&mut self, bounces: bool) {
        self.bounces = bounces;
    }

    fn add_observer(&mut self, observer: ScrollObserver) -> ObserverId {
        self.observers.add(observer)
    }

    fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    fn insert_indicator(&mut self, frame: Rect, layer: IndicatorLayer) {
        self.indicator = Some((frame, layer));
    }

    fn remove_indicator(&mut self) {
        self.indicator = None;
    }

    fn convert_to_parent(&self, rect: Rect) -> Option<Rect> {
        if !self.has_parent {
            return None;
        }
        Some(rect.offset_by(
            self.frame.x - self.offset.x,
            self.frame.y - self.offset.y,
        ))
    }
}
