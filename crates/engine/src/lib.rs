//! In-memory finance engine behind the Fluxboard dashboard.
//!
//! The engine owns the transaction list ([`TransactionStore`]), the recurring
//! rules ([`RuleBook`]) and the pure computations over them: filtering
//! ([`filter_transactions`]), dashboard aggregates and the CSV codec.
//! Nothing is persisted.

pub use accounts::{Account, AccountKind, find_account, net_worth};
pub use currency::Currency;
pub use error::EngineError;
pub use exports::{
    DEFAULT_EXPORT_PREFIX, EXPORT_HEADER, export_file_name, export_to_dir, to_csv,
};
pub use imports::{INVALID_FILE_TYPE, ImportReport, parse_csv, read_csv_file};
pub use money::Money;
pub use query::{AmountBound, FilterCriteria, StatusFilter, filter_transactions};
pub use recurring::{Frequency, RecurringRule, RuleBook, RuleDraft, UNCATEGORIZED};
pub use store::{DEFAULT_ACCOUNT_ID, TransactionStore, TransactionStoreBuilder};
pub use summaries::{
    CategorySpending, MonthlySummary, cash_flow, category_spending, monthly_summaries,
};
pub use transactions::{CATEGORIES, INCOME_CATEGORY, Transaction, TransactionDraft};

mod accounts;
mod currency;
mod error;
mod exports;
mod imports;
mod money;
mod query;
mod recurring;
pub mod seed;
mod store;
mod summaries;
mod transactions;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
