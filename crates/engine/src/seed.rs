//! Demo data the dashboard starts with.
//!
//! The monthly series covers more history than the transaction list; it is
//! the reference series charted on the dashboard and sent as insight context.

use crate::{
    Account, AccountKind, Currency, Frequency, Money, MonthlySummary, RecurringRule, Transaction,
};

pub fn accounts() -> Vec<Account> {
    vec![
        Account::new("1", "Main Checking", AccountKind::Checking, Money::new(425_000)),
        Account::new("2", "High Yield Savings", AccountKind::Savings, Money::new(1_500_000)),
        Account::new("3", "Sapphire Credit", AccountKind::CreditCard, Money::new(-124_050)),
        Account::new("4", "Vanguard Brokerage", AccountKind::Investment, Money::new(4_500_000)),
    ]
}

/// (id, account, date, cents, category, merchant, description, recurring)
type SeedRow = (
    &'static str,
    &'static str,
    &'static str,
    i64,
    &'static str,
    &'static str,
    &'static str,
    bool,
);

const TRANSACTIONS: [SeedRow; 22] = [
    ("t1", "1", "2024-05-20", -12_050, "Groceries", "Whole Foods", "Weekly groceries", false),
    ("t2", "1", "2024-05-19", -4_500, "Transport", "Uber", "Ride to airport", false),
    ("t3", "3", "2024-05-18", -25_000, "Dining", "Nobu", "Dinner with friends", false),
    ("t4", "1", "2024-05-15", 350_000, "Income", "Employer Inc", "Bi-weekly Salary", true),
    ("t5", "3", "2024-05-14", -1_599, "Entertainment", "Netflix", "Subscription", true),
    ("t6", "1", "2024-04-28", -8_500, "Utilities", "Electric Co", "Monthly bill", true),
    ("t7", "3", "2024-04-20", -32_000, "Shopping", "Amazon", "Electronics", false),
    ("t8", "1", "2024-04-15", 350_000, "Income", "Employer Inc", "Salary", true),
    ("t9", "1", "2024-04-05", -120_000, "Housing", "Landlord LLC", "Rent", true),
    ("t10", "3", "2024-03-22", -45_000, "Dining", "Steakhouse", "Birthday dinner", false),
    ("t11", "1", "2024-03-15", 370_000, "Income", "Employer Inc", "Salary + Bonus", true),
    ("t12", "1", "2024-03-01", -120_000, "Housing", "Landlord LLC", "Rent", true),
    ("t13", "1", "2024-02-14", -12_000, "Dining", "Bistro Royale", "Valentines Dinner", false),
    ("t14", "3", "2024-02-10", -8_999, "Shopping", "Nike", "Running Shoes", false),
    ("t15", "1", "2024-01-02", -120_000, "Housing", "Landlord LLC", "Rent", true),
    ("t16", "2", "2024-01-15", 50_000, "Income", "Savings Interest", "Quarterly Interest", false),
    ("t17", "1", "2023-12-24", -50_000, "Shopping", "Apple Store", "Holiday Gifts", false),
    ("t18", "1", "2023-12-15", 500_000, "Income", "Employer Inc", "Salary + Holiday Bonus", true),
    ("t19", "3", "2023-11-25", -85_000, "Shopping", "Best Buy", "Black Friday TV", false),
    ("t20", "1", "2023-10-12", -21_000, "Utilities", "Heating Corp", "Winter Prep", false),
    ("t21", "1", "2023-09-05", -15_000, "Transport", "Auto Repair", "Oil change", false),
    ("t22", "1", "2023-08-20", -120_000, "Travel", "Airbnb", "Summer Vacation", false),
];

/// In display order.
pub fn transactions() -> Vec<Transaction> {
    TRANSACTIONS
        .iter()
        .map(
            |&(id, account, date, cents, category, merchant, description, recurring)| {
                Transaction {
                    id: id.to_string(),
                    account_id: account.to_string(),
                    date: date.to_string(),
                    amount: Money::new(cents),
                    currency: Currency::Usd,
                    category: category.to_string(),
                    merchant: merchant.to_string(),
                    description: description.to_string(),
                    is_recurring: recurring,
                }
            },
        )
        .collect()
}

const MONTHLY: [(&str, i64, i64); 10] = [
    ("2023-08", 650_000, 580_000),
    ("2023-09", 650_000, 410_000),
    ("2023-10", 660_000, 430_000),
    ("2023-11", 660_000, 520_000),
    ("2023-12", 850_000, 640_000),
    ("2024-01", 700_000, 450_000),
    ("2024-02", 700_000, 480_000),
    ("2024-03", 720_000, 510_000),
    ("2024-04", 700_000, 420_000),
    ("2024-05", 350_000, 203_649),
];

/// Oldest first.
pub fn monthly_summaries() -> Vec<MonthlySummary> {
    MONTHLY
        .iter()
        .map(|&(month, income, expenses)| {
            MonthlySummary::new(month, Money::new(income), Money::new(expenses))
        })
        .collect()
}

pub fn recurring_rules() -> Vec<RecurringRule> {
    let rule = |id: &str,
                merchant: &str,
                frequency: Frequency,
                cents: i64,
                category: &str,
                due: &str| {
        RecurringRule {
            id: id.to_string(),
            merchant: merchant.to_string(),
            frequency,
            amount: Money::new(cents),
            currency: Currency::Usd,
            category: category.to_string(),
            next_due_date: due.to_string(),
            active: true,
        }
    };
    vec![
        rule("r1", "Netflix", Frequency::Monthly, 1_599, "Entertainment", "2024-06-14"),
        rule("r2", "Landlord LLC", Frequency::Monthly, 120_000, "Housing", "2024-06-05"),
        rule("r3", "Spotify", Frequency::Monthly, 1_099, "Entertainment", "2024-06-20"),
        rule("r4", "Electric Co", Frequency::Monthly, 8_500, "Utilities", "2024-06-12"),
        rule("r5", "Employer Inc", Frequency::BiWeekly, 350_000, "Income", "2024-05-29"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net_worth;

    #[test]
    fn seed_is_consistent() {
        let txs = transactions();
        assert_eq!(txs.len(), 22);
        assert!(txs.windows(2).all(|w| w[0].id != w[1].id));
        assert_eq!(net_worth(&accounts()), Money::new(6_300_950));

        let last = monthly_summaries().pop().unwrap();
        assert_eq!(last.savings, Money::new(146_351));
    }
}
