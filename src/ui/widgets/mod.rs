//! TUI widgets.

mod analysis;
mod help;
mod home;
mod notifications;
mod profile;
mod signals;
mod status_bar;
mod strategies;
mod tab_bar;

pub use analysis::AnalysisView;
pub use help::HelpPanel;
pub use home::HomeView;
pub use notifications::{render_error, render_notification};
pub use profile::ProfileView;
pub use signals::SignalsView;
pub use status_bar::StatusBar;
pub use strategies::StrategiesView;
pub use tab_bar::TabBar;

use crate::api::{MarketRegime, SignalKind, StrengthLevel};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rust_decimal::Decimal;

/// Bordered block with the panel title style.
fn panel(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title.into()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn signal_color(kind: &SignalKind) -> Color {
    match kind {
        SignalKind::Buy => Color::Green,
        SignalKind::Sell => Color::Red,
        SignalKind::Hold => Color::Yellow,
        SignalKind::Other(_) => Color::Gray,
    }
}

fn strength_color(level: StrengthLevel) -> Color {
    match level {
        StrengthLevel::Strong => Color::Green,
        StrengthLevel::Medium => Color::Yellow,
        StrengthLevel::Weak => Color::Gray,
    }
}

fn regime_color(regime: &MarketRegime) -> Color {
    match regime {
        MarketRegime::Trending | MarketRegime::TrendingUp => Color::Green,
        MarketRegime::TrendingDown => Color::Red,
        MarketRegime::Sideways => Color::Blue,
        MarketRegime::Volatile => Color::Magenta,
        MarketRegime::Uncertain | MarketRegime::Unknown(_) => Color::Gray,
    }
}

/// Prices under one unit get four decimals.
fn format_price(price: Decimal) -> String {
    if price.abs() < Decimal::ONE {
        format!("{:.4}", price)
    } else {
        format!("{:.2}", price)
    }
}

fn format_change(change: Decimal) -> String {
    let sign = if change.is_sign_negative() { "" } else { "+" };
    format!("{sign}{:.2}%", change)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Shows "Loading..." in the bottom-right corner of a bordered area.
fn render_loading(frame: &mut Frame, area: Rect) {
    let loading = Line::from(vec![Span::styled(
        "Loading...",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC),
    )]);

    let inner = Block::default().borders(Borders::ALL).inner(area);
    if inner.width < 12 || inner.height == 0 {
        return;
    }

    let loading_area = Rect {
        x: inner.x + inner.width - 12,
        y: inner.y + inner.height - 1,
        width: 12,
        height: 1,
    };

    frame.render_widget(Paragraph::new(loading), loading_area);
}

/// Placeholder line for a panel with nothing to show yet.
fn empty_line(loading: bool) -> Line<'static> {
    let text = if loading { "Loading..." } else { "No data" };
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}
