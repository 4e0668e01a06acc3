//! Profile screen: account, preferences and backend status.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use serde_json::Value;

use super::{empty_line, panel, render_loading};
use crate::state::{PLANS, Store};

/// Profile screen widget.
pub struct ProfileView;

impl ProfileView {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(columns[0]);

        Self::render_account(frame, left[0], store);
        Self::render_plans(frame, left[1], store);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(0)])
            .split(columns[1]);

        Self::render_preferences(frame, right[0], store);
        Self::render_status(frame, right[1], store);
    }

    fn render_account(frame: &mut Frame, area: Rect, store: &Store) {
        let user = &store.profile.user;
        let lines = vec![
            Line::from(Span::styled(
                user.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                user.email.clone(),
                Style::default().fg(Color::DarkGray),
            )),
            field("Plan", user.subscription.clone()),
            field("Expires", user.expiry_date.clone()),
            field("Total signals", user.total_signals.to_string()),
            field("Win rate", format!("{:.1}%", user.win_rate)),
        ];
        frame.render_widget(Paragraph::new(lines).block(panel("Account")), area);
    }

    fn render_plans(frame: &mut Frame, area: Rect, store: &Store) {
        let current = store.profile.current_plan().map(|p| p.name);
        let mut lines = Vec::new();
        for plan in PLANS.iter() {
            let marker = if Some(plan.name) == current { "● " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(
                    plan.name,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  {}", plan.price)),
            ]));
            for feature in plan.features {
                lines.push(Line::from(Span::styled(
                    format!("    - {feature}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        frame.render_widget(
            Paragraph::new(lines)
                .block(panel("Subscription"))
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_preferences(frame: &mut Frame, area: Rect, store: &Store) {
        let prefs = &store.profile.preferences;
        let lines = vec![
            field("Theme", prefs.theme.to_string()),
            field("Language", prefs.language.clone()),
            field("Notifications", on_off(prefs.notifications)),
            field("Auto refresh", on_off(prefs.auto_refresh)),
            field("API base URL", store.profile.base_url.clone()),
            field("Data source", store.app.data_source.to_string()),
            Line::from(Span::styled(
                "[m] toggle source  [w] save settings",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(panel("Preferences")), area);
    }

    fn render_status(frame: &mut Frame, area: Rect, store: &Store) {
        let health = match store.app.connected {
            Some(true) => Span::styled("● healthy", Style::default().fg(Color::Green)),
            Some(false) => Span::styled("○ unreachable", Style::default().fg(Color::Red)),
            None => Span::styled("… checking", Style::default().fg(Color::Yellow)),
        };
        let mut lines = vec![Line::from(vec![Span::raw("Health: "), health])];

        match &store.profile.system_status {
            Some(status) => {
                let color = if status.is_running() {
                    Color::Green
                } else {
                    Color::Red
                };
                lines.push(Line::from(vec![
                    Span::raw("Status: "),
                    Span::styled(status.status.clone(), Style::default().fg(color)),
                ]));
                for (label, value) in [
                    ("Version", &status.version),
                    ("Uptime", &status.uptime),
                    ("Database", &status.database_status),
                    ("WebSocket", &status.websocket_status),
                    ("Redis", &status.redis_status),
                    ("Updated", &status.last_update),
                ] {
                    if !value.is_empty() {
                        lines.push(field(label, value.clone()));
                    }
                }
                for (key, value) in &status.extra {
                    lines.push(field(key, display_value(value)));
                }
            }
            None => lines.push(empty_line(store.profile.loading())),
        }

        frame.render_widget(
            Paragraph::new(lines)
                .block(panel("System status"))
                .wrap(Wrap { trim: true }),
            area,
        );

        if store.profile.loading() {
            render_loading(frame, area);
        }
    }
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn on_off(enabled: bool) -> String {
    if enabled { "on" } else { "off" }.to_string()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
