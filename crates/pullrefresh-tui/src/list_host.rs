//! Terminal list acting as a scroll host.
//!
//! Offsets and insets are measured in rows. Pulling past an edge is
//! rubber-banded, and once the pointer lets go the list relaxes back into
//! range on every `tick()` unless bounce has been switched off.

use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use pullrefresh_core::animation::timing::{is_complete_at, lerp, progress_at};
use pullrefresh_core::animation::Curve;
use pullrefresh_core::config::UiConfig;
use pullrefresh_core::{
    EasingType, IndicatorLayer, Insets, ObserverId, ObserverSet, Point, Rect, ScrollEvent,
    ScrollHost, ScrollObserver, Size,
};

/// How far past an edge the content may stretch, as a share of the viewport
const MAX_OVERSCROLL_FRACTION: f64 = 0.5;
/// Share of the remaining overscroll recovered per tick
const RELAX_FACTOR: f64 = 0.35;
/// Overscroll below this snaps to the edge
const SNAP_EPSILON: f64 = 0.05;

/// Host-driven animated scroll
#[derive(Debug, Clone)]
struct ScrollAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
}

#[derive(Debug)]
pub struct ListHost {
    items: Vec<String>,
    /// Screen area occupied by the list
    viewport: Rect,
    offset: f64,
    inset: Insets,
    dragging: bool,
    bounces: bool,
    resistance: f64,
    scroll_duration: Duration,
    animation: Option<ScrollAnimation>,
    observers: ObserverSet,
    indicator: Option<(Rect, IndicatorLayer)>,
}

impl ListHost {
    pub fn new(items: Vec<String>, config: &UiConfig) -> Self {
        Self {
            items,
            viewport: Rect::new(0.0, 0.0, 0.0, 0.0),
            offset: 0.0,
            inset: Insets::ZERO,
            dragging: false,
            bounces: true,
            resistance: config.rubber_band_resistance,
            scroll_duration: Duration::from_millis(config.scroll_animation_ms),
            animation: None,
            observers: ObserverSet::new(),
            indicator: None,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
        let size = self.content_size();
        self.observers.notify(ScrollEvent::ContentSizeChanged(size));
    }

    /// Insert fresh rows above the existing ones
    pub fn prepend_items(&mut self, fresh: Vec<String>) {
        let mut items = fresh;
        items.append(&mut self.items);
        self.set_items(items);
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        if self.viewport != viewport {
            trace!(?viewport, "List viewport changed");
            self.viewport = viewport;
        }
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn bounces(&self) -> bool {
        self.bounces
    }

    /// Index of the content row shown at the top of the viewport; negative
    /// while pulled down
    pub fn first_visible_row(&self) -> i64 {
        self.offset.round() as i64
    }

    /// Where the indicator is, in screen coordinates, clipped to the viewport.
    /// It always spans the list's full width.
    pub fn indicator_area(&self) -> Option<(Rect, IndicatorLayer)> {
        let (frame, layer) = self.indicator?;
        let screen = match layer {
            IndicatorLayer::BehindContent => self.convert_to_parent(frame)?,
            IndicatorLayer::AboveHost => frame,
        };

        let top = screen.y.max(self.viewport.y);
        let bottom = screen.max_y().min(self.viewport.max_y());
        if bottom <= top {
            return None;
        }
        Some((
            Rect::new(self.viewport.x, top, self.viewport.width, bottom - top),
            layer,
        ))
    }

    /// True while an animated scroll or a bounce-back is in progress
    pub fn is_animating(&self) -> bool {
        self.animation.is_some() || (!self.dragging && self.bounces && self.overscroll() != 0.0)
    }

    fn min_offset(&self) -> f64 {
        -self.inset.top
    }

    fn max_offset(&self) -> f64 {
        let max = self.items.len() as f64 + self.inset.bottom - self.viewport.height;
        max.max(self.min_offset())
    }

    fn max_overscroll(&self) -> f64 {
        (self.viewport.height * MAX_OVERSCROLL_FRACTION).max(1.0)
    }

    /// Distance past the nearest edge (negative above the top)
    pub fn overscroll(&self) -> f64 {
        let (min, max) = (self.min_offset(), self.max_offset());
        if self.offset < min {
            self.offset - min
        } else if self.offset > max {
            self.offset - max
        } else {
            0.0
        }
    }

    fn set_offset(&mut self, offset: f64) {
        if offset != self.offset {
            self.offset = offset;
            self.observers
                .notify(ScrollEvent::ContentOffsetChanged(offset));
        }
    }

    /// Pointer grabbed the content
    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.animation = None;
    }

    /// Pointer moved by `delta` rows (positive = downwards)
    pub fn drag_by(&mut self, delta: f64) {
        if !self.dragging {
            self.begin_drag();
        }

        let (min, max) = (self.min_offset(), self.max_offset());
        let proposed = self.offset - delta;
        if !self.bounces {
            self.set_offset(proposed.clamp(min, max));
            return;
        }

        let overscroll = self.overscroll();
        let pushing_further = (overscroll < 0.0 && delta > 0.0) || (overscroll > 0.0 && delta < 0.0);

        let next = if pushing_further {
            // Resistance grows as the content stretches further
            let stretch = (overscroll.abs() / self.max_overscroll()).min(1.0);
            let resistance = self.resistance * (1.0 - stretch * 0.8);
            self.offset - delta * resistance
        } else if proposed < min {
            min - (min - proposed) * self.resistance
        } else if proposed > max {
            max + (proposed - max) * self.resistance
        } else {
            proposed
        };

        let limit = self.max_overscroll();
        self.set_offset(next.clamp(min - limit, max + limit));
    }

    /// Pointer let go; reports the offset at release
    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.observers
            .notify(ScrollEvent::ContentOffsetChanged(self.offset));
    }

    /// Wheel or key scroll, clamped to the content
    pub fn scroll_by(&mut self, rows: f64) {
        if self.dragging {
            return;
        }
        self.animation = None;
        let target = (self.offset + rows).clamp(self.min_offset(), self.max_offset());
        self.set_offset(target);
    }

    /// Advance the animated scroll or the bounce-back; true if anything moved
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();

        if let Some(animation) = self.animation.clone() {
            let y = if is_complete_at(animation.start, animation.duration, now) {
                self.animation = None;
                animation.to
            } else {
                let t = Curve::Eased(EasingType::Cubic)
                    .apply(progress_at(animation.start, animation.duration, now));
                lerp(animation.from, animation.to, t)
            };
            self.set_offset(y);
            return true;
        }

        if self.dragging || !self.bounces {
            return false;
        }

        let overscroll = self.overscroll();
        if overscroll == 0.0 {
            return false;
        }

        let edge = self.offset - overscroll;
        let next = if (overscroll * (1.0 - RELAX_FACTOR)).abs() < SNAP_EPSILON {
            edge
        } else {
            self.offset - overscroll * RELAX_FACTOR
        };
        self.set_offset(next);
        true
    }
}

impl ScrollHost for ListHost {
    fn content_offset(&self) -> Point {
        Point::new(0.0, self.offset)
    }

    fn set_content_offset(&mut self, offset: Point, animated: bool) {
        if animated && !self.scroll_duration.is_zero() {
            self.animation = Some(ScrollAnimation {
                start: Instant::now(),
                from: self.offset,
                to: offset.y,
                duration: self.scroll_duration,
            });
            return;
        }

        self.animation = None;
        self.offset = offset.y;
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

    fn content_size(&self) -> Size {
        Size::new(self.viewport.width, self.items.len() as f64)
    }

    fn frame(&self) -> Rect {
        self.viewport
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
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn host(rows: usize) -> ListHost {
        let items = (0..rows).map(|i| format!("Item {}", i)).collect();
        let mut host = ListHost::new(items, &UiConfig::default());
        host.set_viewport(Rect::new(0.0, 2.0, 40.0, 10.0));
        host
    }

    #[test]
    fn test_pull_past_top_is_resisted() {
        let mut host = host(30);
        host.begin_drag();
        host.drag_by(2.0);

        // Default resistance halves the first pull
        assert!((host.offset() + 1.0).abs() < 1e-9);

        host.drag_by(2.0);
        assert!(host.offset() > -2.0);
        assert!(host.offset() < -1.0);
    }

    #[test]
    fn test_pull_is_capped() {
        let mut host = host(30);
        for _ in 0..100 {
            host.drag_by(5.0);
        }
        assert!(host.offset() >= -5.0);
    }

    #[test]
    fn test_no_overscroll_without_bounce() {
        let mut host = host(30);
        host.set_bounces(false);
        host.drag_by(3.0);
        assert_eq!(host.offset(), 0.0);
    }

    #[test]
    fn test_release_relaxes_back_to_edge() {
        let mut host = host(30);
        host.drag_by(4.0);
        host.end_drag();
        assert!(host.is_animating());

        let mut steps = 0;
        while host.tick() {
            steps += 1;
            assert!(steps < 100, "bounce-back never settled");
        }
        assert_eq!(host.offset(), 0.0);
        assert!(!host.is_animating());
    }

    #[test]
    fn test_no_relaxation_while_bounce_disabled() {
        let mut host = host(30);
        host.drag_by(4.0);
        host.end_drag();
        host.set_bounces(false);

        let before = host.offset();
        assert!(!host.tick());
        assert_eq!(host.offset(), before);
    }

    #[test]
    fn test_top_inset_moves_the_edge() {
        let mut host = host(30);
        host.set_content_inset(Insets::top(3.0));
        host.set_content_offset(Point::new(0.0, -3.0), false);

        assert_eq!(host.overscroll(), 0.0);
        assert!(!host.tick());
        host.scroll_by(-5.0);
        assert_eq!(host.offset(), -3.0);
    }

    #[test]
    fn test_scroll_clamps_to_content() {
        let mut host = host(30);
        host.scroll_by(100.0);
        assert_eq!(host.offset(), 20.0);
        host.scroll_by(-100.0);
        assert_eq!(host.offset(), 0.0);
    }

    #[test]
    fn test_metric_writes_notify_observers() {
        let mut host = host(30);
        let (tx, mut rx) = mpsc::unbounded_channel();
        host.add_observer(tx);

        host.drag_by(2.0);
        host.end_drag();
        host.set_content_inset(Insets::top(1.0));
        host.prepend_items(vec!["New".into()]);

        assert_eq!(rx.try_recv().unwrap(), ScrollEvent::ContentOffsetChanged(-1.0));
        assert_eq!(rx.try_recv().unwrap(), ScrollEvent::ContentOffsetChanged(-1.0));
        assert_eq!(
            rx.try_recv().unwrap(),
            ScrollEvent::ContentInsetChanged(Insets::top(1.0))
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            ScrollEvent::ContentSizeChanged(Size::new(40.0, 31.0))
        );
        assert_eq!(host.items()[0], "New");
    }

    #[tokio::test(start_paused = true)]
    async fn test_animated_scroll_lands_on_target() {
        let mut host = host(30);
        host.set_content_offset(Point::new(0.0, -3.0), true);
        assert_eq!(host.offset(), 0.0);

        tokio::time::advance(Duration::from_millis(100)).await;
        host.tick();
        assert!(host.offset() < 0.0 && host.offset() > -3.0);

        tokio::time::advance(Duration::from_millis(150)).await;
        host.tick();
        assert_eq!(host.offset(), -3.0);
        assert!(host.is_animating(), "still outside range without an inset");
    }

    #[test]
    fn test_indicator_area_follows_the_pull() {
        let mut host = host(30);
        host.insert_indicator(Rect::new(0.0, -3.0, 40.0, 3.0), IndicatorLayer::BehindContent);

        assert!(host.indicator_area().is_none());

        host.set_content_offset(Point::new(0.0, -2.0), false);
        let (area, layer) = host.indicator_area().unwrap();
        assert_eq!(layer, IndicatorLayer::BehindContent);
        assert_eq!(area, Rect::new(0.0, 2.0, 40.0, 2.0));
    }
}
