//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::layout::centered_rect;
use crate::config::KeyBindings;

/// Help panel showing keybindings.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect, keys: &KeyBindings) {
        let popup_area = centered_rect(60, 80, area);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            section("Navigation"),
            entry(&format!("{}/↓", keys.down), "Move down"),
            entry(&format!("{}/↑", keys.up), "Move up"),
            entry("Home/End", "Go to top/bottom"),
            entry("Tab", "Next tab"),
            entry("Shift+Tab", "Previous tab"),
            Line::from(""),
            section("Views"),
            entry(&keys.home, "Home"),
            entry(&keys.signals, "Signals"),
            entry(&keys.strategy, "Strategy"),
            entry(&keys.analysis, "Analysis"),
            entry(&keys.profile, "Profile"),
            Line::from(""),
            section("Actions"),
            entry(&keys.symbol, "Next symbol"),
            entry(&keys.interval, "Next interval"),
            entry(&keys.filter, "Cycle signal filter"),
            entry(&keys.category, "Cycle strategy category"),
            entry(&keys.refresh, "Refresh current view"),
            entry(&keys.toggle_source, "Toggle mock/live data"),
            entry(&keys.save, "Save settings"),
            entry("Esc", "Dismiss notification"),
            entry(&keys.help, "Toggle help"),
            entry(&keys.quit, "Quit"),
        ];

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(help, popup_area);
    }
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )])
}

fn entry(key: &str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<10}"), Style::default().fg(Color::Cyan)),
        Span::raw(description),
    ])
}
