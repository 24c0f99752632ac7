use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use pullrefresh_core::{
    AppConfig, ProgressAnimator, Rect, RefreshController, ScrollHost, ScrollView, State,
};

use crate::event::RefreshResult;
use crate::indicator::IndicatorHandle;
use crate::input::Action;
use crate::list_host::ListHost;
use crate::theme::Theme;

/// Rows delivered by each simulated refresh
const NEW_ITEMS_PER_REFRESH: u32 = 3;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal browsing mode
    Normal,
    /// Keyboard is holding the list, as a finger would
    Grab,
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    /// The list with its pull-to-refresh controller
    pub view: ScrollView<ListHost>,
    /// Indicator playback state shared with the controller's animator
    pub indicator: IndicatorHandle,
    /// Current application mode
    pub mode: Mode,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Completion time of the last refresh
    pub last_refresh: Option<DateTime<Local>>,
    pub refresh_count: u32,
    /// Leading rows added by the last refresh, highlighted in the list
    pub fresh_count: usize,
    /// Row under the mouse while dragging
    pointer_row: Option<u16>,
    next_item: u32,
    refresh_rx: mpsc::UnboundedReceiver<RefreshResult>,
}

impl App {
    pub fn new(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let page_size = config.ui.page_size as u32;
        let items = (1..=page_size).rev().map(item_label).collect();
        let host = ListHost::new(items, &config.ui);

        let indicator = IndicatorHandle::new();
        let animator = ProgressAnimator::with_config(indicator.clone(), &config.refresh);
        let controller =
            RefreshController::new(animator, f64::from(config.ui.indicator_height))?
                .with_config(config.refresh.clone());

        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        let latency = Duration::from_millis(config.ui.refresh_duration_ms);

        let mut view = ScrollView::new(host);
        view.add_pull_to_refresh(controller, move || {
            let tx = refresh_tx.clone();
            info!("Refreshing list");
            tokio::spawn(async move {
                tokio::time::sleep(latency).await;
                let _ = tx.send(RefreshResult::Success {
                    new_count: NEW_ITEMS_PER_REFRESH,
                });
            });
        });

        Ok(Self {
            config,
            theme: Theme::default(),
            view,
            indicator,
            mode: Mode::Normal,
            should_quit: false,
            status_message: None,
            last_refresh: None,
            refresh_count: 0,
            fresh_count: 0,
            pointer_row: None,
            next_item: page_size + 1,
            refresh_rx,
        })
    }

    /// Split the screen into list and status bar areas
    pub fn layout(area: ratatui::layout::Rect) -> [ratatui::layout::Rect; 2] {
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area)
    }

    /// Keep the list viewport in sync with the terminal size
    pub fn update_layout(&mut self, area: ratatui::layout::Rect) {
        let [list, _] = Self::layout(area);
        self.view.host_mut().set_viewport(Rect::new(
            f64::from(list.x),
            f64::from(list.y),
            f64::from(list.width),
            f64::from(list.height),
        ));
    }

    pub fn refresh_state(&self) -> State {
        self.view.refresh_state().unwrap_or_default()
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Advance the list physics, the controller and pending refresh results
    pub fn tick(&mut self) {
        self.view.host_mut().tick();
        self.view.tick();

        while let Ok(result) = self.refresh_rx.try_recv() {
            self.handle_refresh_result(result);
        }
    }

    /// Whether the next frame should come at animation rate
    pub fn needs_fast_update(&self) -> bool {
        let host = self.view.host();
        self.view.needs_update()
            || host.is_animating()
            || host.is_dragging()
            || self.indicator.is_animating(Instant::now())
    }

    pub fn handle_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Success { new_count } => {
                let fresh: Vec<String> = (0..new_count)
                    .map(|i| item_label(self.next_item + i))
                    .rev()
                    .collect();
                self.next_item += new_count;
                self.fresh_count = fresh.len();
                self.view.host_mut().prepend_items(fresh);
                self.refresh_count += 1;
                self.last_refresh = Some(Local::now());
                self.set_status(format!(" Refreshed: {} new items", new_count));
                debug!(new_count, "Refresh completed");
            }
            RefreshResult::Failure { error } => {
                warn!(%error, "Refresh failed");
                self.set_status(format!(" Refresh failed: {}", error));
            }
        }
        self.view.end_refreshing();
    }

    pub fn handle_action(&mut self, action: Action) {
        if action != Action::None {
            self.clear_status();
        }

        let page = self.view.host().viewport().height.max(1.0);
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.view.host_mut().scroll_by(1.0),
            Action::ScrollUp => self.view.host_mut().scroll_by(-1.0),
            Action::ScrollPageDown => self.view.host_mut().scroll_by(page),
            Action::ScrollPageUp => self.view.host_mut().scroll_by(-page),
            Action::Refresh => {
                if self.refresh_state() == State::Initial {
                    self.view.host_mut().scroll_by(f64::NEG_INFINITY);
                    self.view.start_refreshing();
                } else {
                    self.set_status(" Refresh already in progress");
                }
            }
            Action::Grab => {
                self.mode = Mode::Grab;
                self.view.host_mut().begin_drag();
                self.set_status(" GRAB: j/k move, g/Enter release");
            }
            Action::PullDown => self.view.host_mut().drag_by(1.0),
            Action::PullUp => self.view.host_mut().drag_by(-1.0),
            Action::Release => {
                self.mode = Mode::Normal;
                self.view.host_mut().end_drag();
            }
            Action::TogglePinIndicator => {
                let pinned = !self
                    .view
                    .top_refresh()
                    .is_some_and(RefreshController::is_visible_while_scrolling);
                self.view.set_refresh_visible_while_scrolling(pinned);
                self.set_status(if pinned {
                    " Indicator stays visible while loading"
                } else {
                    " Indicator scrolls with the list"
                });
            }
            Action::None => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer_row = Some(mouse.row);
                self.view.host_mut().begin_drag();
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(previous) = self.pointer_row.replace(mouse.row) {
                    let delta = f64::from(mouse.row) - f64::from(previous);
                    self.view.host_mut().drag_by(delta);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.pointer_row.take().is_some() {
                    self.view.host_mut().end_drag();
                }
            }
            MouseEventKind::ScrollDown => self.view.host_mut().scroll_by(1.0),
            MouseEventKind::ScrollUp => self.view.host_mut().scroll_by(-1.0),
            _ => {}
        }
    }
}

fn item_label(n: u32) -> String {
    format!("Item #{:03}", n)
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn app() -> App {
        let mut app = App::new(Arc::new(AppConfig::default())).unwrap();
        app.update_layout(ratatui::layout::Rect::new(0, 0, 40, 21));
        app
    }

    fn mouse(kind: MouseEventKind, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: 5,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyboard_grab_pull_refreshes() {
        let mut app = app();
        assert_eq!(app.view.host().viewport().height, 20.0);
        assert_eq!(app.view.host().items()[0], "Item #020");

        app.handle_action(Action::Grab);
        let mut presses = 0;
        while app.view.host().offset() > -4.0 {
            app.handle_action(Action::PullDown);
            app.tick();
            presses += 1;
            assert!(presses < 50, "pull never got past the indicator");
        }
        assert_eq!(app.refresh_state(), State::Releasing { progress: 1.0 });

        app.handle_action(Action::Release);
        app.tick();
        assert_eq!(app.refresh_state(), State::Loading);
        assert_eq!(app.mode, Mode::Normal);

        // The spawned action reports back after the configured latency
        tokio::time::sleep(Duration::from_millis(3010)).await;
        app.tick();
        assert_eq!(app.refresh_state(), State::Finished);
        assert_eq!(app.refresh_count, 1);
        assert_eq!(app.view.host().items().len(), 23);
        assert_eq!(app.view.host().items()[0], "Item #023");
        assert!(app.last_refresh.is_some());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        app.tick();
        assert_eq!(app.refresh_state(), State::Initial);
        assert_eq!(app.view.host().offset(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_mouse_pull_springs_back() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 3));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 5));
        app.tick();
        assert!(matches!(app.refresh_state(), State::Releasing { .. }));

        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 5));
        for _ in 0..100 {
            app.tick();
        }
        assert_eq!(app.refresh_state(), State::Initial);
        assert_eq!(app.view.host().offset(), 0.0);
        assert_eq!(app.refresh_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_key_starts_programmatic_refresh() {
        let mut app = app();
        app.handle_action(Action::ScrollDown);
        app.handle_action(Action::Refresh);

        tokio::time::advance(Duration::from_millis(300)).await;
        for _ in 0..3 {
            app.tick();
        }
        assert_eq!(app.refresh_state(), State::Loading);

        app.handle_action(Action::Refresh);
        assert_eq!(
            app.status_message.as_deref(),
            Some(" Refresh already in progress")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_still_ends() {
        let mut app = app();
        app.handle_action(Action::Refresh);
        tokio::time::advance(Duration::from_millis(300)).await;
        app.tick();
        app.tick();
        assert_eq!(app.refresh_state(), State::Loading);

        app.handle_refresh_result(RefreshResult::Failure {
            error: "offline".into(),
        });
        assert_eq!(app.refresh_state(), State::Finished);
        assert_eq!(app.status_message.as_deref(), Some(" Refresh failed: offline"));
        assert_eq!(app.refresh_count, 0);
    }

    #[test]
    fn test_quit_action() {
        let mut app = app();
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }
}
