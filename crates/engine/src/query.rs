//! Transaction query engine.
//!
//! Filtering is a pure function of the transaction list and the current
//! [`FilterCriteria`]. Every active criterion must hold; inactive criteria
//! impose nothing. The output keeps the input order.

use std::str::FromStr;

use crate::{Money, Transaction};

/// Which transactions the status toggle lets through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    RecurringOnly,
    OneTimeOnly,
}

impl StatusFilter {
    /// Next value in the toggle order used by the transactions screen.
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::RecurringOnly,
            StatusFilter::RecurringOnly => StatusFilter::OneTimeOnly,
            StatusFilter::OneTimeOnly => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::RecurringOnly => "Recurring",
            StatusFilter::OneTimeOnly => "One-time",
        }
    }

    fn matches(self, is_recurring: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::RecurringOnly => is_recurring,
            StatusFilter::OneTimeOnly => !is_recurring,
        }
    }
}

/// A bound on the magnitude of an amount.
pub struct AmountBound;

impl AmountBound {
    /// Parses raw filter text into a bound.
    ///
    /// Empty or unparsable text yields `None`, which leaves the bound unset.
    /// Accepts the same decimal forms as [`Money`] plus anything a float parse
    /// understands (`1e3`, `50.125`), rounded to the cent. The sign is ignored
    /// since bounds apply to absolute values.
    pub fn parse(raw: &str) -> Option<Money> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Money::from_str(trimmed)
            .ok()
            .or_else(|| trimmed.parse::<f64>().ok().and_then(Money::from_major))
            .map(Money::abs)
    }
}

/// Transient filter state of the transactions view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    /// Inclusive lower date bound, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive upper date bound, `YYYY-MM-DD`.
    pub end_date: Option<String>,
    pub min_amount: Option<Money>,
    pub max_amount: Option<Money>,
    pub status: StatusFilter,
}

impl FilterCriteria {
    /// Resets every criterion in one step.
    pub fn clear(&mut self) {
        *self = FilterCriteria::default();
    }

    /// `true` when no criterion would exclude anything.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && date_bound(&self.start_date).is_none()
            && date_bound(&self.end_date).is_none()
            && self.min_amount.is_none()
            && self.max_amount.is_none()
            && self.status == StatusFilter::All
    }

    pub fn set_min_amount(&mut self, raw: &str) {
        self.min_amount = AmountBound::parse(raw);
    }

    pub fn set_max_amount(&mut self, raw: &str) {
        self.max_amount = AmountBound::parse(raw);
    }

    /// Whether `tx` passes every active criterion.
    pub fn matches(&self, tx: &Transaction) -> bool {
        let term = self.search.to_lowercase();
        if !term.is_empty()
            && !tx.merchant.to_lowercase().contains(&term)
            && !tx.category.to_lowercase().contains(&term)
            && !tx.description.to_lowercase().contains(&term)
        {
            return false;
        }

        if let Some(start) = date_bound(&self.start_date)
            && tx.date.as_str() < start
        {
            return false;
        }
        if let Some(end) = date_bound(&self.end_date)
            && tx.date.as_str() > end
        {
            return false;
        }

        let magnitude = tx.amount.abs();
        if self.min_amount.is_some_and(|min| magnitude < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| magnitude > max) {
            return false;
        }

        self.status.matches(tx.is_recurring)
    }
}

fn date_bound(bound: &Option<String>) -> Option<&str> {
    bound.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Returns the transactions satisfying `criteria`, in their original order.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    criteria: &FilterCriteria,
) -> Vec<&'a Transaction> {
    transactions.iter().filter(|tx| criteria.matches(tx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_bound_parses_defensively() {
        assert_eq!(AmountBound::parse("50"), Some(Money::new(5000)));
        assert_eq!(AmountBound::parse(" 12,5 "), Some(Money::new(1250)));
        assert_eq!(AmountBound::parse("-300"), Some(Money::new(30000)));
        assert_eq!(AmountBound::parse("50.125"), Some(Money::new(5013)));
        assert_eq!(AmountBound::parse("abc"), None);
        assert_eq!(AmountBound::parse(""), None);
        assert_eq!(AmountBound::parse("NaN"), None);
    }

    #[test]
    fn status_cycles_through_all_values() {
        let s = StatusFilter::All;
        assert_eq!(s.cycle(), StatusFilter::RecurringOnly);
        assert_eq!(s.cycle().cycle(), StatusFilter::OneTimeOnly);
        assert_eq!(s.cycle().cycle().cycle(), StatusFilter::All);
    }

    #[test]
    fn clear_resets_everything() {
        let mut criteria = FilterCriteria {
            search: "uber".to_string(),
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-02-01".to_string()),
            min_amount: Some(Money::new(100)),
            max_amount: Some(Money::new(200)),
            status: StatusFilter::OneTimeOnly,
        };
        assert!(!criteria.is_empty());
        criteria.clear();
        assert_eq!(criteria, FilterCriteria::default());
        assert!(criteria.is_empty());
    }

    #[test]
    fn blank_date_bounds_are_unset() {
        let criteria = FilterCriteria {
            start_date: Some("  ".to_string()),
            ..FilterCriteria::default()
        };
        assert!(criteria.is_empty());
    }
}
