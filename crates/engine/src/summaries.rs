//! Aggregates shown on the dashboard and sent as insight context.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Money, Transaction};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    pub income: Money,
    pub expenses: Money,
    pub savings: Money,
}

impl MonthlySummary {
    pub fn new(month: &str, income: Money, expenses: Money) -> Self {
        Self {
            month: month.to_string(),
            income,
            expenses,
            savings: income - expenses,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpending {
    pub category: String,
    pub amount: Money,
}

/// One summary per month present in `transactions`, oldest first.
///
/// Expenses are reported as a positive magnitude.
pub fn monthly_summaries(transactions: &[Transaction]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<&str, (Money, Money)> = BTreeMap::new();
    for tx in transactions {
        let (income, expenses) = months.entry(tx.month()).or_default();
        if tx.is_income() {
            *income += tx.amount;
        } else {
            *expenses += tx.amount.abs();
        }
    }
    months
        .into_iter()
        .map(|(month, (income, expenses))| MonthlySummary::new(month, income, expenses))
        .collect()
}

/// Spending per category, largest first. Income is excluded.
pub fn category_spending(transactions: &[Transaction]) -> Vec<CategorySpending> {
    let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
    for tx in transactions.iter().filter(|t| t.is_expense()) {
        *totals.entry(tx.category.as_str()).or_default() += tx.amount.abs();
    }
    let mut out: Vec<CategorySpending> = totals
        .into_iter()
        .map(|(category, amount)| CategorySpending {
            category: category.to_string(),
            amount,
        })
        .collect();
    // Stable sort keeps ties in alphabetical order.
    out.sort_by(|a, b| b.amount.cmp(&a.amount));
    out
}

/// Total income minus total expenses over `transactions`.
pub fn cash_flow(transactions: &[Transaction]) -> Money {
    transactions.iter().map(|t| t.amount).sum()
}
