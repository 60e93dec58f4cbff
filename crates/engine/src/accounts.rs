//! The module contains `Account` and the lookups the dashboard needs.

use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, Money, ResultEngine};

/// Kind of an account, serialized the way the insight context expects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    Checking,
    Savings,
    CreditCard,
    Investment,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountKind::Checking => "CHECKING",
            AccountKind::Savings => "SAVINGS",
            AccountKind::CreditCard => "CREDIT_CARD",
            AccountKind::Investment => "INVESTMENT",
        }
    }

    /// Human label used by the accounts screen.
    pub fn label(self) -> &'static str {
        match self {
            AccountKind::Checking => "Checking",
            AccountKind::Savings => "Savings",
            AccountKind::CreditCard => "Credit card",
            AccountKind::Investment => "Investment",
        }
    }
}

/// A bank account, card or brokerage account.
///
/// Balances are a snapshot; they are not recomputed from transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    pub balance: Money,
    pub currency: Currency,
}

impl Account {
    pub fn new(id: &str, name: &str, kind: AccountKind, balance: Money) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            balance,
            currency: Currency::default(),
        }
    }
}

pub fn find_account<'a>(accounts: &'a [Account], id: &str) -> ResultEngine<&'a Account> {
    accounts
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
}

/// Sum of all balances. Credit card debt is negative and reduces the total.
pub fn net_worth(accounts: &[Account]) -> Money {
    accounts.iter().map(|a| a.balance).sum()
}
