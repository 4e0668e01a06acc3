//! Home screen: market overview, regime and latest signals.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, List, ListItem, Paragraph, Row, Table, TableState},
};

use super::{
    empty_line, format_change, format_price, header_style, panel, regime_color, render_loading,
    signal_color, strength_color,
};
use crate::state::Store;

/// Home screen widget.
pub struct HomeView;

impl HomeView {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        Self::render_selector(frame, rows[0], store);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        Self::render_overview(frame, columns[0], store);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(columns[1]);

        Self::render_regime(frame, side[0], store);
        Self::render_signals(frame, side[1], store);
    }

    fn render_selector(frame: &mut Frame, area: Rect, store: &Store) {
        let dashboard = &store.dashboard;
        let mut spans = vec![Span::styled(" Symbol: ", Style::default().fg(Color::DarkGray))];
        for symbol in &dashboard.symbols {
            spans.push(option_span(symbol, *symbol == dashboard.symbol));
        }
        spans.push(Span::styled("  Interval: ", Style::default().fg(Color::DarkGray)));
        for interval in &dashboard.intervals {
            spans.push(option_span(interval, *interval == dashboard.interval));
        }
        spans.push(Span::styled(
            "  [s] symbol [i] interval",
            Style::default().fg(Color::DarkGray),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_overview(frame: &mut Frame, area: Rect, store: &Store) {
        let dashboard = &store.dashboard;
        let klines = dashboard.overview();

        let header = Row::new(
            ["Symbol", "Price", "Change", "High", "Low", "Volume"]
                .iter()
                .map(|h| Cell::from(*h).style(header_style())),
        )
        .height(1)
        .bottom_margin(1);

        let rows = klines.iter().map(|kline| {
            let trend = if kline.is_bullish() {
                Color::Green
            } else {
                Color::Red
            };
            let symbol_style = if kline.symbol == dashboard.symbol {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(kline.symbol.clone()).style(symbol_style),
                Cell::from(format_price(kline.close)),
                Cell::from(format_change(kline.change_percent())).style(Style::default().fg(trend)),
                Cell::from(format_price(kline.high)),
                Cell::from(format_price(kline.low)),
                Cell::from(format!("{:.2}", kline.volume)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(12),
                Constraint::Length(9),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Min(8),
            ],
        )
        .header(header)
        .block(panel(format!(
            "Market overview {} / {}",
            dashboard.symbol, dashboard.interval
        )))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(dashboard.selected_index);
        frame.render_stateful_widget(table, area, &mut state);

        if dashboard.loading() {
            render_loading(frame, area);
        }
    }

    fn render_regime(frame: &mut Frame, area: Rect, store: &Store) {
        let lines = match store.dashboard.current_market_state() {
            Some(state) => {
                let regime = state.regime();
                vec![
                    Line::from(vec![
                        Span::raw("Regime: "),
                        Span::styled(
                            format!(" {} ", regime.label()),
                            Style::default()
                                .fg(Color::Black)
                                .bg(regime_color(&regime))
                                .add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(format!(
                        "Trend: {}  Volatility: {:.4}",
                        state.trend_direction, state.volatility
                    )),
                    Line::from(Span::styled(
                        format!("Analyzed: {}", state.last_analysis),
                        Style::default().fg(Color::DarkGray),
                    )),
                ]
            }
            None => vec![empty_line(store.dashboard.loading())],
        };

        frame.render_widget(Paragraph::new(lines).block(panel("Market state")), area);
    }

    fn render_signals(frame: &mut Frame, area: Rect, store: &Store) {
        let signals = &store.dashboard.snapshot.signals;

        let items: Vec<ListItem> = if signals.is_empty() {
            vec![ListItem::new(empty_line(store.dashboard.loading()))]
        } else {
            signals
                .iter()
                .map(|signal| {
                    let kind = signal.kind();
                    let strength = signal.strength();
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{:<5}", kind.to_string().to_uppercase()),
                            Style::default()
                                .fg(signal_color(&kind))
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!(
                            "{} @ {} ",
                            signal.symbol,
                            format_price(signal.price)
                        )),
                        Span::styled(
                            strength.to_string(),
                            Style::default().fg(strength_color(strength)),
                        ),
                        Span::styled(
                            format!(" {}", signal.strategy),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                })
                .collect()
        };

        frame.render_widget(List::new(items).block(panel("Latest signals")), area);
    }
}

fn option_span(label: &str, selected: bool) -> Span<'static> {
    if selected {
        Span::styled(
            format!("[{label}] "),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!(" {label}  "), Style::default().fg(Color::White))
    }
}
