//! Strategy screen.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use super::{header_style, panel, render_loading, truncate_string};
use crate::state::{CategoryFilter, Store};

/// Strategy screen widget.
pub struct StrategiesView;

impl StrategiesView {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let state = &store.strategies;
        let mut spans = vec![Span::styled(
            " Category: ",
            Style::default().fg(Color::DarkGray),
        )];
        for category in [
            CategoryFilter::All,
            CategoryFilter::Rsi,
            CategoryFilter::Ma,
            CategoryFilter::Bollinger,
        ] {
            let style = if category == state.category {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(category.to_string(), style));
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!(" Active: {}/{}", state.active_count(), state.strategies.len()),
            Style::default().fg(Color::Green),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), rows[0]);

        let strategies = state.filtered_strategies();
        let header = Row::new(
            ["Name", "Category", "Status", "Win rate", "Today", "Timeframes", "Symbols"]
                .iter()
                .map(|h| Cell::from(*h).style(header_style())),
        )
        .height(1)
        .bottom_margin(1);

        let table_rows = strategies.iter().map(|strategy| {
            let status_style = if strategy.is_active() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Yellow)
            };

            Row::new(vec![
                Cell::from(truncate_string(&strategy.name, 24)),
                Cell::from(strategy.category.to_uppercase()),
                Cell::from(strategy.status.clone()).style(status_style),
                Cell::from(format!("{:.1}%", strategy.win_rate)),
                Cell::from(strategy.today_signals.to_string()),
                Cell::from(strategy.timeframes.join(",")),
                Cell::from(strategy.symbols.join(",")),
            ])
        });

        let table = Table::new(
            table_rows,
            [
                Constraint::Length(24),
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Length(9),
                Constraint::Length(6),
                Constraint::Length(14),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(panel(format!("Strategies ({})", strategies.len())))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        let mut table_state = TableState::default();
        table_state.select(state.selected_index);
        frame.render_stateful_widget(table, rows[1], &mut table_state);

        if state.loading() {
            render_loading(frame, rows[1]);
        }
    }
}
