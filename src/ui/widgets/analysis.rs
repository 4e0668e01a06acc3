//! Analysis screen: multi-period RSI and market regime.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
};

use super::{empty_line, header_style, panel, regime_color, render_loading};
use crate::api::RsiZone;
use crate::state::Store;

/// Analysis screen widget.
pub struct AnalysisView;

impl AnalysisView {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        Self::render_rsi(frame, columns[0], store);
        Self::render_regime(frame, columns[1], store);

        if store.analysis.loading() {
            render_loading(frame, area);
        }
    }

    fn render_rsi(frame: &mut Frame, area: Rect, store: &Store) {
        let block = panel("RSI");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let readings = store.analysis.rsi_readings();
        if readings.is_empty() {
            frame.render_widget(Paragraph::new(empty_line(store.analysis.loading())), inner);
            return;
        }

        let mut constraints = vec![Constraint::Length(3); readings.len()];
        constraints.push(Constraint::Min(0));
        let slots = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (slot, (label, value, zone)) in slots.iter().zip(&readings) {
            let color = match zone {
                RsiZone::Oversold => Color::Green,
                RsiZone::Neutral => Color::Yellow,
                RsiZone::Overbought => Color::Red,
            };
            let gauge = Gauge::default()
                .block(Block::default().title(*label).borders(Borders::NONE))
                .gauge_style(Style::default().fg(color))
                .ratio((value / 100.0).clamp(0.0, 1.0))
                .label(format!("{value:.1} {zone}"));
            frame.render_widget(gauge, *slot);
        }

        if let Some(rsi) = store.analysis.analysis.as_ref().and_then(|a| a.rsi.as_ref())
            && let Some(last) = slots.last()
        {
            let summary = Paragraph::new(vec![
                Line::from(vec![
                    Span::styled("Resonance: ", Style::default().fg(Color::DarkGray)),
                    Span::raw(rsi.resonance_level.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Strength: ", Style::default().fg(Color::DarkGray)),
                    Span::raw(rsi.signal_strength.clone()),
                ]),
            ]);
            frame.render_widget(summary, *last);
        }
    }

    fn render_regime(frame: &mut Frame, area: Rect, store: &Store) {
        let Some(snapshot) = store
            .analysis
            .analysis
            .as_ref()
            .and_then(|a| a.market_state.as_ref())
        else {
            frame.render_widget(
                Paragraph::new(empty_line(store.analysis.loading())).block(panel("Market regime")),
                area,
            );
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(area);

        let regime = snapshot.regime();
        let summary = Paragraph::new(vec![
            Line::from(vec![
                Span::raw("State: "),
                Span::styled(
                    format!(" {} ", regime.label()),
                    Style::default()
                        .fg(Color::Black)
                        .bg(regime_color(&regime))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(format!("Score: {:.2}", snapshot.score)),
            Line::from(format!("Confidence: {:.0}%", snapshot.confidence)),
            Line::from(Span::styled(
                format!("Timeframes: {}", snapshot.timeframes.join(", ")),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(panel("Market regime"));
        frame.render_widget(summary, rows[0]);

        let header = Row::new(
            ["Timeframe", "Weight"]
                .iter()
                .map(|h| Cell::from(*h).style(header_style())),
        );
        let weights = snapshot.weights.iter().map(|(timeframe, weight)| {
            Row::new(vec![
                Cell::from(timeframe.clone()),
                Cell::from(format!("{:.0}%", weight * 100.0)),
            ])
        });
        let table = Table::new(weights, [Constraint::Length(12), Constraint::Min(8)])
            .header(header)
            .block(panel("Timeframe weights"));
        frame.render_widget(table, rows[1]);
    }
}
