//! Host-side ownership of a refresh controller.
//!
//! A [`ScrollView`] pairs a host with at most one top refresh controller and
//! forwards the caller API, supplying the host to every controller call.

use tracing::debug;

use crate::controller::RefreshController;
use crate::host::ScrollHost;
use crate::state::State;

pub struct ScrollView<H: ScrollHost> {
    host: H,
    top: Option<RefreshController>,
}

impl<H: ScrollHost> ScrollView<H> {
    pub fn new(host: H) -> Self {
        Self { host, top: None }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Attach `controller`, replacing any previous one
    pub fn add_pull_to_refresh(
        &mut self,
        mut controller: RefreshController,
        action: impl FnMut() + 'static,
    ) {
        if self.remove_pull_to_refresh().is_some() {
            debug!("Replaced existing pull-to-refresh controller");
        }
        controller.attach(&mut self.host, Box::new(action));
        self.top = Some(controller);
    }

    /// Detach and hand back the controller, if any
    pub fn remove_pull_to_refresh(&mut self) -> Option<RefreshController> {
        let mut controller = self.top.take()?;
        controller.detach(&mut self.host);
        Some(controller)
    }

    pub fn remove_all_pull_to_refresh(&mut self) {
        self.remove_pull_to_refresh();
    }

    pub fn top_refresh(&self) -> Option<&RefreshController> {
        self.top.as_ref()
    }

    pub fn refresh_state(&self) -> Option<State> {
        self.top.as_ref().map(RefreshController::state)
    }

    pub fn start_refreshing(&mut self) {
        if let Some(controller) = self.top.as_mut() {
            controller.start_refreshing(&mut self.host);
        }
    }

    pub fn end_refreshing(&mut self) {
        if let Some(controller) = self.top.as_mut() {
            controller.end_refreshing(&mut self.host);
        }
    }

    pub fn end_all_refreshing(&mut self) {
        self.end_refreshing();
    }

    pub fn set_refresh_visible_while_scrolling(&mut self, visible: bool) {
        if let Some(controller) = self.top.as_mut() {
            controller.set_visible_while_scrolling(&mut self.host, visible);
        }
    }

    /// True while the controller has an animation or start pending
    pub fn needs_update(&self) -> bool {
        self.top
            .as_ref()
            .is_some_and(RefreshController::needs_update)
    }

    /// Drive the controller; call once per frame
    pub fn tick(&mut self) {
        if let Some(controller) = self.top.as_mut() {
            controller.tick(&mut self.host);
        }
    }
}

impl<H: ScrollHost> Drop for ScrollView<H> {
    fn drop(&mut self) {
        self.remove_all_pull_to_refresh();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::geometry::Insets;
    use crate::testing::MockHost;

    fn controller() -> RefreshController {
        RefreshController::new(|_: State| {}, 60.0).unwrap()
    }

    #[test]
    fn test_add_replaces_previous_controller() {
        let mut view = ScrollView::new(MockHost::default());
        view.add_pull_to_refresh(controller(), || {});
        view.add_pull_to_refresh(controller(), || {});

        assert_eq!(view.host().observers.len(), 1);
        assert!(view.host().indicator.is_some());
        assert_eq!(view.refresh_state(), Some(State::Initial));
    }

    #[test]
    fn test_remove_detaches() {
        let mut view = ScrollView::new(MockHost::default());
        view.add_pull_to_refresh(controller(), || {});

        let removed = view.remove_pull_to_refresh().unwrap();
        assert!(!removed.is_attached());
        assert!(view.host().observers.is_empty());
        assert!(view.host().indicator.is_none());
        assert!(view.remove_pull_to_refresh().is_none());
        assert_eq!(view.refresh_state(), None);
    }

    #[test]
    fn test_operations_without_controller_are_noops() {
        let mut view = ScrollView::new(MockHost::default());
        view.start_refreshing();
        view.end_all_refreshing();
        view.tick();

        assert!(view.host().animated_scrolls.is_empty());
        assert!(!view.needs_update());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cycle_through_view() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let mut view = ScrollView::new(MockHost::with_inset(Insets::top(12.0)));
        view.add_pull_to_refresh(controller(), move || counter.set(counter.get() + 1));

        view.start_refreshing();
        assert!(view.needs_update());
        tokio::time::advance(Duration::from_millis(270)).await;
        view.tick();
        assert_eq!(view.refresh_state(), Some(State::Loading));
        assert_eq!(count.get(), 1);

        tokio::time::advance(Duration::from_millis(300)).await;
        view.tick();
        assert_eq!(view.host().inset.top, 72.0);

        view.end_all_refreshing();
        tokio::time::advance(Duration::from_millis(1000)).await;
        view.tick();
        assert_eq!(view.refresh_state(), Some(State::Initial));
        assert_eq!(view.host().inset, Insets::top(12.0));
        assert!(!view.needs_update());
    }
}
