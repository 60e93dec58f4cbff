//! Transaction primitives.
//!
//! A `Transaction` is one ledger movement tied to an account. The sign of
//! `amount` is the only expense/income indicator: negative is money leaving
//! the account.

use serde::{Deserialize, Serialize};

use crate::{
    Currency, EngineError, Money, ResultEngine,
    util::{normalize_optional_text, normalize_required_text, parse_date},
};

/// Category that marks a transaction as income in the entry form.
pub const INCOME_CATEGORY: &str = "Income";

/// Suggested categories offered by the entry form. Free-form labels are
/// accepted as well.
pub const CATEGORIES: [&str; 10] = [
    "Groceries",
    "Dining",
    "Transport",
    "Shopping",
    "Entertainment",
    "Utilities",
    "Housing",
    "Health",
    INCOME_CATEGORY,
    "Other",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    /// Calendar day in zero-padded `YYYY-MM-DD` form.
    pub date: String,
    pub amount: Money,
    pub currency: Currency,
    pub category: String,
    pub merchant: String,
    pub description: String,
    pub is_recurring: bool,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.amount.is_negative()
    }

    pub fn is_income(&self) -> bool {
        self.amount.is_positive()
    }

    /// `YYYY-MM` prefix of the date.
    pub fn month(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }
}

/// User input for creating or replacing a transaction.
///
/// `amount` is taken as signed. Form input entered as a magnitude goes through
/// [`TransactionDraft::with_category_sign`] first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionDraft {
    pub date: String,
    pub amount: Money,
    pub currency: Currency,
    pub category: String,
    pub merchant: String,
    pub description: String,
    pub is_recurring: bool,
}

impl TransactionDraft {
    /// Applies the entry-form sign rule: `Income` is positive, every other
    /// category is an expense.
    #[must_use]
    pub fn with_category_sign(mut self) -> Self {
        let magnitude = self.amount.abs();
        self.amount = if self.category.trim() == INCOME_CATEGORY {
            magnitude
        } else {
            -magnitude
        };
        self
    }

    /// Validate the draft and return the normalized copy.
    pub(crate) fn normalized(&self) -> ResultEngine<TransactionDraft> {
        if self.merchant.trim().is_empty() || self.amount.is_zero() {
            return Err(EngineError::Validation(
                "Please fill in all required fields".to_string(),
            ));
        }
        check_input_limit(self.amount)?;
        let date = parse_date(&self.date)?;
        let category = normalize_required_text(&self.category, "category")?;

        Ok(TransactionDraft {
            date: date.format(crate::util::DATE_FORMAT).to_string(),
            amount: self.amount,
            currency: self.currency,
            category,
            merchant: self.merchant.trim().to_string(),
            description: normalize_optional_text(&self.description),
            is_recurring: self.is_recurring,
        })
    }

    pub(crate) fn into_transaction(self, id: String, account_id: String) -> Transaction {
        Transaction {
            id,
            account_id,
            date: self.date,
            amount: self.amount,
            currency: self.currency,
            category: self.category,
            merchant: self.merchant,
            description: self.description,
            is_recurring: self.is_recurring,
        }
    }
}

impl From<&Transaction> for TransactionDraft {
    fn from(tx: &Transaction) -> Self {
        Self {
            date: tx.date.clone(),
            amount: tx.amount,
            currency: tx.currency,
            category: tx.category.clone(),
            merchant: tx.merchant.clone(),
            description: tx.description.clone(),
            is_recurring: tx.is_recurring,
        }
    }
}

pub(crate) fn check_input_limit(amount: Money) -> ResultEngine<()> {
    if amount.is_within_input_limit() {
        Ok(())
    } else {
        Err(EngineError::InvalidAmount("amount too large".to_string()))
    }
}
