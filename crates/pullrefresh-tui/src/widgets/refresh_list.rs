use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct RefreshListWidget;

impl RefreshListWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let host = app.view.host();
        let items = host.items();
        let first = host.first_visible_row();

        let lines: Vec<Line> = (0..area.height)
            .map(|screen_row| {
                let row = first + i64::from(screen_row);
                // Rows above the content belong to the pull area
                let Some(item) = usize::try_from(row).ok().and_then(|row| items.get(row)) else {
                    return Line::default();
                };

                let style = if (row as usize) < app.fresh_count {
                    Style::default()
                        .fg(app.theme.fresh)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(app.theme.fg0)
                };
                Line::from(vec![
                    Span::styled(" ", style),
                    Span::styled(item.as_str(), style),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.bg0));
        frame.render_widget(paragraph, area);
    }
}
