use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{BarChart, Sparkline},
};

use crate::ui::{components::card::Card, theme::Theme};

/// Vertical bar chart inside a card.
pub fn render_bar_chart(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    data: &[(&str, u64)],
    theme: &Theme,
) {
    let chart = BarChart::default()
        .data(data)
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme.accent))
        .value_style(
            Style::default()
                .fg(theme.text)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .label_style(Style::default().fg(theme.dim));

    let card = Card::new(title, theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);
    frame.render_widget(chart, inner);
}

/// Trend line inside a card.
pub fn render_sparkline(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    data: &[u64],
    theme: &Theme,
) {
    let sparkline = Sparkline::default()
        .data(data)
        .style(Style::default().fg(theme.positive));

    let card = Card::new(title, theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);
    frame.render_widget(sparkline, inner);
}

/// Horizontal bar such as `████████░░░░` for `value` out of `max`.
#[must_use]
pub fn ascii_bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return "░".repeat(width);
    }

    let ratio = (value as f64 / max as f64).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_bar_scales_to_width() {
        assert_eq!(ascii_bar(5, 10, 4), "██░░");
        assert_eq!(ascii_bar(20, 10, 3), "███");
        assert_eq!(ascii_bar(1, 0, 2), "░░");
    }
}
