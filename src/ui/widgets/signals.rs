//! Signals screen.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use super::{
    format_price, header_style, panel, render_loading, signal_color, strength_color,
    truncate_string,
};
use crate::state::{SignalFilter, Store};

/// Signals screen widget.
pub struct SignalsView;

impl SignalsView {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        Self::render_filter(frame, rows[0], store);
        Self::render_table(frame, rows[1], store);
    }

    fn render_filter(frame: &mut Frame, area: Rect, store: &Store) {
        let mut spans = vec![Span::styled(" Filter: ", Style::default().fg(Color::DarkGray))];
        for filter in [
            SignalFilter::All,
            SignalFilter::Buy,
            SignalFilter::Sell,
            SignalFilter::Hold,
        ] {
            let style = if filter == store.signals.filter {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(filter.to_string(), style));
            spans.push(Span::raw("  "));
        }

        let notifications = store.profile.preferences.notifications;
        spans.push(Span::styled(
            " Notifications: ",
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(if notifications {
            Span::styled("on", Style::default().fg(Color::Green))
        } else {
            Span::styled("off", Style::default().fg(Color::Red))
        });

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_table(frame: &mut Frame, area: Rect, store: &Store) {
        let signals = store.signals.filtered_signals();

        let header = Row::new(
            ["Time", "Symbol", "Type", "Strength", "Price", "Strategy"]
                .iter()
                .map(|h| Cell::from(*h).style(header_style())),
        )
        .height(1)
        .bottom_margin(1);

        let rows = signals.iter().map(|signal| {
            let kind = signal.kind();
            let strength = signal.strength();
            let time = signal
                .issued_at()
                .map(|t| t.format("%m-%d %H:%M").to_string())
                .unwrap_or_else(|| signal.timestamp.clone());

            Row::new(vec![
                Cell::from(time),
                Cell::from(signal.symbol.clone()),
                Cell::from(kind.to_string().to_uppercase()).style(
                    Style::default()
                        .fg(signal_color(&kind))
                        .add_modifier(Modifier::BOLD),
                ),
                Cell::from(format!("{} ({:.2})", strength, signal.signal_strength))
                    .style(Style::default().fg(strength_color(strength))),
                Cell::from(format_price(signal.price)),
                Cell::from(truncate_string(&signal.strategy, 24)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(6),
                Constraint::Length(16),
                Constraint::Length(12),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(panel(format!(
            "Signals {} ({}/{})",
            store.dashboard.symbol,
            signals.len(),
            store.signals.signals.len()
        )))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(store.signals.selected_index);
        frame.render_stateful_widget(table, area, &mut state);

        if store.signals.loading() {
            render_loading(frame, area);
        }
    }
}
