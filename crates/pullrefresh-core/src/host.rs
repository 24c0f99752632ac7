//! Scroll host collaborator contract.
//!
//! A host is any scrollable surface: it exposes its scroll metrics, accepts
//! inset/offset writes, places the indicator in its visual tree and reports
//! metric changes to registered observers over an unbounded channel.

use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::geometry::{Insets, Point, Rect, Size};

/// Scroll metric change notification
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollEvent {
    /// Vertical content offset changed
    ContentOffsetChanged(f64),
    /// Content inset changed
    ContentInsetChanged(Insets),
    /// Content size changed
    ContentSizeChanged(Size),
    /// Safe-area adjusted inset changed (hosts that support it)
    AdjustedInsetChanged(Insets),
}

/// Sending half handed to a host on registration
pub type ScrollObserver = mpsc::UnboundedSender<ScrollEvent>;

/// Registration handle returned by [`ScrollHost::add_observer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(Uuid);

impl ObserverId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the indicator sits in the host's visual tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorLayer {
    /// Inside the host, behind its content, scrolling with it
    BehindContent,
    /// In the host's parent, stacked above the host
    AboveHost,
}

/// Scrollable surface the refresh controller attaches to
pub trait ScrollHost {
    fn content_offset(&self) -> Point;

    /// Move the content; `animated` asks the host for its own scroll animation
    fn set_content_offset(&mut self, offset: Point, animated: bool);

    fn content_inset(&self) -> Insets;

    fn set_content_inset(&mut self, inset: Insets);

    /// Safe-area adjusted inset, `None` when the host has no such concept
    fn adjusted_content_inset(&self) -> Option<Insets> {
        None
    }

    fn content_size(&self) -> Size;

    /// Host frame, in its parent's coordinates
    fn frame(&self) -> Rect;

    /// Whether the user is actively dragging the content
    fn is_dragging(&self) -> bool;

    /// Toggle over-scroll bounce
    fn set_bounces(&mut self, bounces: bool);

    /// Register an observer for metric changes
    fn add_observer(&mut self, observer: ScrollObserver) -> ObserverId;

    /// Unregister an observer; returns false if it was not registered
    fn remove_observer(&mut self, id: ObserverId) -> bool;

    /// Insert the indicator at `frame` (host coordinates for
    /// `BehindContent`, parent coordinates for `AboveHost`)
    fn insert_indicator(&mut self, frame: Rect, layer: IndicatorLayer);

    /// Remove the indicator from whichever parent holds it
    fn remove_indicator(&mut self);

    /// Convert a rect from host content coordinates to the parent's
    /// coordinates; `None` when the host has no parent
    fn convert_to_parent(&self, rect: Rect) -> Option<Rect> {
        let frame = self.frame();
        let offset = self.content_offset();
        Some(rect.offset_by(frame.x - offset.x, frame.y - offset.y))
    }
}

/// Observer registry for host implementations
///
/// Observers whose receiving half was dropped are pruned on the next
/// notification.
#[derive(Debug, Default)]
pub struct ObserverSet {
    observers: Vec<(ObserverId, ScrollObserver)>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, observer: ScrollObserver) -> ObserverId {
        let id = ObserverId::new();
        self.observers.push((id, observer));
        debug!(observers = self.observers.len(), "Scroll observer added");
        id
    }

    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        let removed = self.observers.len() != before;
        if removed {
            debug!(observers = self.observers.len(), "Scroll observer removed");
        }
        removed
    }

    /// Send an event to every live observer, in registration order
    pub fn notify(&mut self, event: ScrollEvent) {
        self.observers.retain(|(_, tx)| {
            if tx.send(event).is_err() {
                warn!("Dropping scroll observer: receiver closed");
                false
            } else {
                true
            }
        });
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_in_registration_order() {
        let mut set = ObserverSet::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        set.add(tx_a);
        set.add(tx_b);

        set.notify(ScrollEvent::ContentOffsetChanged(-10.0));
        set.notify(ScrollEvent::ContentInsetChanged(Insets::top(4.0)));

        for rx in [&mut rx_a, &mut rx_b] {
            assert_eq!(rx.try_recv().unwrap(), ScrollEvent::ContentOffsetChanged(-10.0));
            assert_eq!(
                rx.try_recv().unwrap(),
                ScrollEvent::ContentInsetChanged(Insets::top(4.0))
            );
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut set = ObserverSet::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = set.add(tx);

        assert!(set.remove(id));
        assert!(!set.remove(id));
        assert!(set.is_empty());
    }

    #[test]
    fn test_closed_observers_are_pruned() {
        let mut set = ObserverSet::new();
        let (tx_live, mut rx_live) = mpsc::unbounded_channel();
        let (tx_dead, rx_dead) = mpsc::unbounded_channel();
        set.add(tx_live);
        set.add(tx_dead);
        drop(rx_dead);

        set.notify(ScrollEvent::ContentSizeChanged(Size::new(80.0, 20.0)));
        assert_eq!(set.len(), 1);
        assert!(rx_live.try_recv().is_ok());
    }
}
