use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use engine::{Currency, MonthlySummary, category_spending, net_worth};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            charts::{ascii_bar, render_bar_chart, render_sparkline},
            money::{chart_units, styled_amount, styled_total},
        },
        theme::Theme,
    },
};

const RECENT: usize = 6;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Stat cards
            Constraint::Length(12), // Cash flow and categories
            Constraint::Min(4),     // Recent transactions
        ])
        .split(area);

    render_stats(frame, layout[0], state, &theme);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout[1]);
    render_cash_flow(frame, middle[0], &state.monthly, &theme);
    render_categories(frame, middle[1], state, &theme);

    render_recent(frame, layout[2], state, &theme);
}

fn render_stats(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let currency = Currency::default();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    StatCard::new(
        "Net worth",
        net_worth(&state.accounts).format(currency),
        theme,
    )
    .subtitle(Span::styled(
        format!("{} accounts", state.accounts.len()),
        Style::default().fg(theme.dim),
    ))
    .render(frame, cols[0]);

    let Some(latest) = state.monthly.last() else {
        return;
    };
    let month = month_label(&latest.month, "%B %Y");

    StatCard::new("Income", latest.income.format(currency), theme)
        .subtitle(Span::styled(month.clone(), Style::default().fg(theme.positive)))
        .render(frame, cols[1]);
    StatCard::new("Expenses", latest.expenses.format(currency), theme)
        .subtitle(Span::styled(month, Style::default().fg(theme.negative)))
        .render(frame, cols[2]);

    let rate = savings_rate(latest);
    let rate_color = if latest.savings.is_negative() {
        theme.negative
    } else {
        theme.positive
    };
    StatCard::new("Savings", latest.savings.format(currency), theme)
        .subtitle(Span::styled(
            format!("{rate:.1}% of income"),
            Style::default().fg(rate_color),
        ))
        .render(frame, cols[3]);
}

fn render_cash_flow(frame: &mut Frame<'_>, area: Rect, monthly: &[MonthlySummary], theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(4)])
        .split(area);

    let labels: Vec<String> = monthly.iter().map(|m| month_label(&m.month, "%b")).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(monthly)
        .map(|(label, m)| (label.as_str(), chart_units(m.expenses)))
        .collect();
    render_bar_chart(frame, rows[0], "Monthly expenses", &data, theme);

    let savings: Vec<u64> = monthly
        .iter()
        .map(|m| {
            if m.savings.is_negative() {
                0
            } else {
                chart_units(m.savings)
            }
        })
        .collect();
    render_sparkline(frame, rows[1], "Savings trend", &savings, theme);
}

fn render_categories(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let spending = category_spending(state.store.transactions());
    let card = Card::new("Spending by category", theme);
    let max = spending.first().map(|c| chart_units(c.amount)).unwrap_or(0);
    let bar_width = usize::from(card.inner(area).width.saturating_sub(30)).max(4);

    let lines: Vec<Line> = spending
        .iter()
        .take(usize::from(card.inner(area).height))
        .map(|c| {
            Line::from(vec![
                Span::styled(format!("{:<14.14}", c.category), theme.muted()),
                Span::styled(
                    ascii_bar(chart_units(c.amount), max, bar_width),
                    Style::default().fg(theme.accent),
                ),
                Span::raw(" "),
                styled_total(c.amount, Currency::default(), theme.text),
            ])
        })
        .collect();

    card.render_with(frame, area, Paragraph::new(lines));
}

fn render_recent(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let items: Vec<ListItem> = state
        .store
        .transactions()
        .iter()
        .take(RECENT)
        .map(|tx| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}  ", tx.date), Style::default().fg(theme.dim)),
                Span::styled(format!("{:<22.22}", tx.merchant), Style::default().fg(theme.text)),
                Span::styled(format!("{:<14.14}", tx.category), theme.muted()),
                styled_amount(tx.amount, tx.currency, theme),
            ]))
        })
        .collect();

    let card = Card::new("Recent transactions", theme);
    frame.render_widget(List::new(items).block(card.block()), area);
}

/// `2024-05` formatted with `fmt`, or the raw key if it doesn't parse.
fn month_label(month: &str, fmt: &str) -> String {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map(|d| d.format(fmt).to_string())
        .unwrap_or_else(|_| month.to_string())
}

fn savings_rate(summary: &MonthlySummary) -> f64 {
    if summary.income.is_zero() {
        return 0.0;
    }
    summary.savings.to_major() / summary.income.to_major() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Money;

    #[test]
    fn month_labels() {
        assert_eq!(month_label("2024-05", "%b"), "May");
        assert_eq!(month_label("2023-12", "%B %Y"), "December 2023");
        assert_eq!(month_label("bogus", "%b"), "bogus");
    }

    #[test]
    fn savings_rate_of_latest_seed_month() {
        let latest = engine::seed::monthly_summaries().pop().unwrap();
        assert!((savings_rate(&latest) - 41.814).abs() < 0.01);

        let empty = MonthlySummary::new("2024-06", Money::ZERO, Money::new(100));
        assert_eq!(savings_rate(&empty), 0.0);
    }
}
