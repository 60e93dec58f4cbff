//! Recurring payment rules.
//!
//! Rules describe expected payments (subscriptions, rent, salary). They are
//! informational: nothing here creates transactions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    Currency, EngineError, Money, ResultEngine,
    transactions::{INCOME_CATEGORY, check_input_limit},
    util::{DATE_FORMAT, normalize_optional_text, parse_date},
};

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "WEEKLY")]
    Weekly,
    #[serde(rename = "BI-WEEKLY")]
    BiWeekly,
    #[default]
    #[serde(rename = "MONTHLY")]
    Monthly,
    #[serde(rename = "YEARLY")]
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Weekly,
        Frequency::BiWeekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "WEEKLY",
            Frequency::BiWeekly => "BI-WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Frequency::Weekly => Frequency::BiWeekly,
            Frequency::BiWeekly => Frequency::Monthly,
            Frequency::Monthly => Frequency::Yearly,
            Frequency::Yearly => Frequency::Weekly,
        }
    }

    /// Converts one occurrence to its average monthly amount, rounded to the
    /// cent.
    pub fn monthly_equivalent(self, amount: Money) -> Money {
        let cents = amount.cents();
        let per_month = match self {
            Frequency::Weekly => div_round(cents.saturating_mul(52), 12),
            Frequency::BiWeekly => div_round(cents.saturating_mul(26), 12),
            Frequency::Monthly => cents,
            Frequency::Yearly => div_round(cents, 12),
        };
        Money::new(per_month)
    }
}

fn div_round(value: i64, divisor: i64) -> i64 {
    let half = divisor / 2;
    if value >= 0 {
        value.saturating_add(half) / divisor
    } else {
        value.saturating_sub(half) / divisor
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringRule {
    pub id: String,
    pub merchant: String,
    pub frequency: Frequency,
    pub amount: Money,
    pub currency: Currency,
    pub category: String,
    pub next_due_date: String,
    pub active: bool,
}

/// Form input for creating or updating a rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleDraft {
    pub merchant: String,
    pub frequency: Frequency,
    pub amount: Money,
    pub currency: Option<Currency>,
    pub category: String,
    /// Empty means today.
    pub next_due_date: String,
}

impl From<&RecurringRule> for RuleDraft {
    fn from(rule: &RecurringRule) -> Self {
        Self {
            merchant: rule.merchant.clone(),
            frequency: rule.frequency,
            amount: rule.amount,
            currency: Some(rule.currency),
            category: rule.category.clone(),
            next_due_date: rule.next_due_date.clone(),
        }
    }
}

struct ValidRule {
    merchant: String,
    frequency: Frequency,
    amount: Money,
    currency: Currency,
    category: String,
    next_due_date: String,
}

fn validate(draft: RuleDraft, today: NaiveDate) -> ResultEngine<ValidRule> {
    let merchant = draft.merchant.trim();
    if merchant.is_empty() || draft.amount.is_zero() {
        return Err(EngineError::Validation(
            "Please fill in all required fields".to_string(),
        ));
    }
    check_input_limit(draft.amount)?;
    let category = match normalize_optional_text(&draft.category) {
        c if c.is_empty() => UNCATEGORIZED.to_string(),
        c => c,
    };
    let next_due_date = if draft.next_due_date.trim().is_empty() {
        today
    } else {
        parse_date(&draft.next_due_date)?
    };

    Ok(ValidRule {
        merchant: merchant.to_string(),
        frequency: draft.frequency,
        amount: draft.amount,
        currency: draft.currency.unwrap_or_default(),
        category,
        next_due_date: next_due_date.format(DATE_FORMAT).to_string(),
    })
}

/// The in-memory list of recurring rules, in insertion order.
#[derive(Debug, Default)]
pub struct RuleBook {
    rules: Vec<RecurringRule>,
}

impl RuleBook {
    pub fn new(rules: Vec<RecurringRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RecurringRule] {
        &self.rules
    }

    pub fn active(&self) -> impl Iterator<Item = &RecurringRule> {
        self.rules.iter().filter(|r| r.active)
    }

    pub fn get(&self, id: &str) -> ResultEngine<&RecurringRule> {
        self.rules
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> ResultEngine<&mut RecurringRule> {
        self.rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    /// Appends a new, active rule. `today` fills a missing due date.
    pub fn add(&mut self, draft: RuleDraft, today: NaiveDate) -> ResultEngine<RecurringRule> {
        let valid = validate(draft, today)?;
        let rule = RecurringRule {
            id: Uuid::new_v4().simple().to_string(),
            merchant: valid.merchant,
            frequency: valid.frequency,
            amount: valid.amount,
            currency: valid.currency,
            category: valid.category,
            next_due_date: valid.next_due_date,
            active: true,
        };
        self.rules.push(rule.clone());
        info!(id = %rule.id, merchant = %rule.merchant, "recurring rule added");
        Ok(rule)
    }

    /// Overwrites the rule's fields, keeping its id and active flag.
    pub fn update(
        &mut self,
        id: &str,
        draft: RuleDraft,
        today: NaiveDate,
    ) -> ResultEngine<RecurringRule> {
        let valid = validate(draft, today)?;
        let rule = self.get_mut(id)?;
        rule.merchant = valid.merchant;
        rule.frequency = valid.frequency;
        rule.amount = valid.amount;
        rule.currency = valid.currency;
        rule.category = valid.category;
        rule.next_due_date = valid.next_due_date;
        Ok(rule.clone())
    }

    pub fn delete(&mut self, id: &str) -> ResultEngine<RecurringRule> {
        let idx = self
            .rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        let removed = self.rules.remove(idx);
        info!(id = %removed.id, "recurring rule deleted");
        Ok(removed)
    }

    /// Flips the active flag and returns the new value.
    pub fn toggle_active(&mut self, id: &str) -> ResultEngine<bool> {
        let rule = self.get_mut(id)?;
        rule.active = !rule.active;
        Ok(rule.active)
    }

    /// Monthly cost of all active expense rules. Income rules are skipped.
    pub fn monthly_commitment(&self) -> Money {
        self.active()
            .filter(|r| r.category != INCOME_CATEGORY)
            .map(|r| r.frequency.monthly_equivalent(r.amount.abs()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn draft(merchant: &str, cents: i64, frequency: Frequency) -> RuleDraft {
        RuleDraft {
            merchant: merchant.to_string(),
            frequency,
            amount: Money::new(cents),
            ..RuleDraft::default()
        }
    }

    #[test]
    fn add_fills_defaults() {
        let mut book = RuleBook::default();
        let rule = book
            .add(draft("Spotify", 1099, Frequency::Monthly), today())
            .unwrap();
        assert_eq!(rule.category, UNCATEGORIZED);
        assert_eq!(rule.next_due_date, "2024-06-01");
        assert_eq!(rule.currency, Currency::Usd);
        assert!(rule.active);
        assert_eq!(book.rules().len(), 1);
    }

    #[test]
    fn add_requires_merchant_and_amount() {
        let mut book = RuleBook::default();
        assert!(book.add(draft("", 1099, Frequency::Monthly), today()).is_err());
        assert!(book.add(draft("Gym", 0, Frequency::Monthly), today()).is_err());
        assert!(book.rules().is_empty());
    }

    #[test]
    fn update_toggle_delete() {
        let mut book = RuleBook::default();
        let rule = book
            .add(draft("Gym", 4000, Frequency::Monthly), today())
            .unwrap();

        let updated = book
            .update(&rule.id, draft("Gym Plus", 5000, Frequency::Yearly), today())
            .unwrap();
        assert_eq!(updated.id, rule.id);
        assert_eq!(updated.merchant, "Gym Plus");

        assert!(!book.toggle_active(&rule.id).unwrap());
        assert_eq!(book.active().count(), 0);

        book.delete(&rule.id).unwrap();
        assert_eq!(
            book.delete(&rule.id),
            Err(EngineError::KeyNotFound(rule.id.clone()))
        );
    }

    #[test]
    fn monthly_equivalents() {
        assert_eq!(
            Frequency::Weekly.monthly_equivalent(Money::new(1200)),
            Money::new(5200)
        );
        assert_eq!(
            Frequency::BiWeekly.monthly_equivalent(Money::new(1200)),
            Money::new(2600)
        );
        assert_eq!(
            Frequency::Yearly.monthly_equivalent(Money::new(12000)),
            Money::new(1000)
        );
    }

    #[test]
    fn commitment_skips_inactive_and_income() {
        let mut book = RuleBook::default();
        book.add(draft("Rent", 120000, Frequency::Monthly), today())
            .unwrap();
        let gym = book
            .add(draft("Gym", 4000, Frequency::Monthly), today())
            .unwrap();
        let mut salary = draft("Employer", 350000, Frequency::BiWeekly);
        salary.category = INCOME_CATEGORY.to_string();
        book.add(salary, today()).unwrap();

        book.toggle_active(&gym.id).unwrap();
        assert_eq!(book.monthly_commitment(), Money::new(120000));
    }

    #[test]
    fn frequency_wire_names() {
        let json = serde_json::to_string(&Frequency::BiWeekly).unwrap();
        assert_eq!(json, "\"BI-WEEKLY\"");
    }
}
