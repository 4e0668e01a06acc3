//! Status bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::source::DataSourceKind;
use crate::state::Store;

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let connection_status = match store.app.connected {
            Some(true) => Span::styled("● Connected", Style::default().fg(Color::Green)),
            Some(false) => Span::styled("○ Disconnected", Style::default().fg(Color::Red)),
            None => Span::styled("◌ Connecting", Style::default().fg(Color::Yellow)),
        };

        let source = match store.app.data_source {
            DataSourceKind::Live => Span::styled(" Live ", Style::default().fg(Color::Green)),
            DataSourceKind::Mock => Span::styled(" Mock ", Style::default().fg(Color::Magenta)),
        };

        let loading = if store.is_loading() {
            Span::styled(
                " Loading... ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::raw("")
        };

        let refreshed = store
            .app
            .last_refresh
            .map(|t| {
                format!(
                    " Updated {} ",
                    t.with_timezone(&chrono::Local).format("%H:%M:%S")
                )
            })
            .unwrap_or_default();

        let help_hint = Span::styled(" Press ? for help ", Style::default().fg(Color::Gray));

        let left_content = vec![
            Span::styled(
                " Flaretion ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            connection_status,
            Span::raw(" |"),
            source,
            Span::raw("|"),
            Span::styled(refreshed, Style::default().fg(Color::White)),
            loading,
        ];

        let status_line = Line::from(left_content);

        // Right-align the help hint
        let left_len = status_line.width();
        let right_len = help_hint.width();
        let padding = (area.width as usize).saturating_sub(left_len + right_len);

        let mut full_line = status_line.spans;
        full_line.push(Span::raw(" ".repeat(padding)));
        full_line.push(help_hint);

        let paragraph =
            Paragraph::new(Line::from(full_line)).style(Style::default().bg(Color::DarkGray));

        frame.render_widget(paragraph, area);
    }
}
