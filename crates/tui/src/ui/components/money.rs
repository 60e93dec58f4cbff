use engine::{Currency, Money};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Money span with semantic coloring: income green with a `+`, expenses red.
#[must_use]
pub fn styled_amount(amount: Money, currency: Currency, theme: &Theme) -> Span<'static> {
    let (color, prefix) = if amount.is_positive() {
        (theme.positive, "+")
    } else if amount.is_negative() {
        (theme.negative, "")
    } else {
        (theme.text, "")
    };

    Span::styled(
        format!("{prefix}{}", amount.format(currency)),
        Style::default().fg(color),
    )
}

/// Bold, unsigned variant for totals where the label gives the direction
/// (e.g. "Expenses: $2,036.49").
#[must_use]
pub fn styled_total(amount: Money, currency: Currency, color: ratatui::style::Color) -> Span<'static> {
    Span::styled(
        amount.abs().format(currency),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Chart value in whole currency units; charts can't plot negatives.
#[must_use]
pub fn chart_units(amount: Money) -> u64 {
    (amount.abs().cents() / 100).unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_signed_and_colored() {
        let theme = Theme::default();
        let income = styled_amount(Money::new(350_000), Currency::Usd, &theme);
        assert_eq!(income.content, "+$3,500.00");
        assert_eq!(income.style.fg, Some(theme.positive));

        let expense = styled_amount(Money::new(-12_050), Currency::Usd, &theme);
        assert_eq!(expense.content, "-$120.50");
        assert_eq!(expense.style.fg, Some(theme.negative));
    }

    #[test]
    fn chart_units_drop_cents_and_sign() {
        assert_eq!(chart_units(Money::new(-203_649)), 2_036);
    }
}
