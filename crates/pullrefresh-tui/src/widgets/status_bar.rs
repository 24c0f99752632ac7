use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use pullrefresh_core::State;

use crate::app::{App, Mode};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let mode_str = match app.mode {
            Mode::Normal => "NORMAL",
            Mode::Grab => "GRAB",
        };

        let state_str = match app.refresh_state() {
            State::Initial => "idle",
            State::Releasing { progress } if progress >= 1.0 => "release",
            State::Releasing { .. } => "pulling",
            State::Loading => "refreshing",
            State::Finished => "finishing",
        };

        let last_refresh = app
            .last_refresh
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());

        let status_text = if let Some(msg) = &app.status_message {
            msg.clone()
        } else {
            format!(
                " {} | {} | Items: {} | Last refresh: {}",
                mode_str,
                state_str,
                app.view.host().items().len(),
                last_refresh
            )
        };

        let help_hint = " q:quit j/k:scroll g:grab r:refresh v:pin ";
        let padding_len = area.width.saturating_sub(
            status_text.len() as u16 + help_hint.len() as u16,
        ) as usize;

        let line = Line::from(vec![
            Span::styled(
                status_text,
                Style::default().fg(app.theme.fg0).bg(app.theme.bg2),
            ),
            Span::styled(
                " ".repeat(padding_len),
                Style::default().bg(app.theme.bg2),
            ),
            Span::styled(
                help_hint,
                Style::default().fg(app.theme.grey2).bg(app.theme.bg2),
            ),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
