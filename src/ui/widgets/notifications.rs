//! Error banner and transient notifications.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::state::{Notification, NotificationLevel};

/// Render a notification popup.
pub fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
    frame.render_widget(Clear, area);

    let (color, title) = match notification.level {
        NotificationLevel::Info => (Color::Cyan, " Info "),
        NotificationLevel::Success => (Color::Green, " Done "),
        NotificationLevel::Warning => (Color::Yellow, " Warning "),
        NotificationLevel::Error => (Color::Red, " Error "),
    };

    let paragraph = Paragraph::new(notification.message.as_str())
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Render the load failure banner above the current view.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let content = Line::from(vec![
        Span::styled(
            "✗ ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(error),
        Span::styled("  (r to retry)", Style::default().fg(Color::DarkGray)),
    ]);

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );

    frame.render_widget(paragraph, area);
}
