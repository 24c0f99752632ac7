use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use tokio::time::Instant;
use unicode_width::UnicodeWidthStr;

use pullrefresh_core::State;

use crate::app::App;

/// Braille-dot spinner frames
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner revolutions per unit of indicator progress
const TURNS_PER_PASS: f64 = 4.0;

/// Spinner plus label drawn in the pull area
pub struct PullIndicatorWidget;

impl PullIndicatorWidget {
    pub fn render(frame: &mut Frame, app: &App) {
        let Some((area, _)) = app.view.host().indicator_area() else {
            return;
        };
        let snapshot = app.indicator.snapshot(Instant::now());
        let Some(color) = app.theme.indicator_color(snapshot.alpha) else {
            return;
        };

        let area = cell_rect(area);
        if area.width == 0 || area.height == 0 {
            return;
        }

        let spinner = spinner_frame(snapshot.progress);
        let mut label = Self::label(app.refresh_state());
        if label.width() + 2 > area.width as usize {
            label = "";
        }

        let line = Line::from(vec![
            Span::styled(
                spinner,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(label, Style::default().fg(color)),
        ]);

        // Middle row of whatever part of the indicator is on screen
        let row = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .style(Style::default().bg(app.theme.bg1)),
            row,
        );
    }

    fn label(state: State) -> &'static str {
        match state {
            State::Initial => "",
            State::Releasing { progress } if progress >= 1.0 => "Release to refresh",
            State::Releasing { .. } => "Pull to refresh",
            State::Loading => "Refreshing…",
            State::Finished => "Done",
        }
    }
}

fn spinner_frame(progress: f64) -> &'static str {
    let turns = progress.clamp(0.0, 1.0) * TURNS_PER_PASS * SPINNER_FRAMES.len() as f64;
    SPINNER_FRAMES[turns as usize % SPINNER_FRAMES.len()]
}

/// Round a row-space rect onto terminal cells
fn cell_rect(rect: pullrefresh_core::Rect) -> Rect {
    let x = rect.x.max(0.0).round();
    let y = rect.y.max(0.0).round();
    let bottom = rect.max_y().round().max(y);
    Rect::new(
        x as u16,
        y as u16,
        rect.width.max(0.0).round() as u16,
        (bottom - y) as u16,
    )
}
