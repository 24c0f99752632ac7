use std::io::{self, Stdout};
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use pullrefresh_core::AppConfig;
use pullrefresh_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{PullIndicatorWidget, RefreshListWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("pullrefresh"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, config).await;

    // Restore terminal, even if the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: Arc<AppConfig>,
) -> Result<()> {
    let mut app = App::new(config.clone())?;
    info!("TUI started");

    // Create event handler with animation FPS support
    let event_handler =
        EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.ui.animation_fps);

    // Checked at the end of each iteration to pick the next poll timeout
    let mut needs_fast_update = false;

    loop {
        // Physics, controller and finished refresh actions
        app.tick();

        terminal.draw(|frame| {
            let size = frame.area();
            app.update_layout(size);

            let [list, status] = App::layout(size);
            RefreshListWidget::render(frame, list, &app);
            PullIndicatorWidget::render(frame, &app);
            StatusBarWidget::render(frame, status, &app);
        })?;

        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app);
                    app.handle_action(action);
                }
                AppEvent::Mouse(mouse) => app.handle_mouse(mouse),
                // Layout is recomputed on every draw
                AppEvent::Resize(_, _) | AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            break;
        }
    }

    info!(refreshes = app.refresh_count, "TUI closed");
    Ok(())
}
