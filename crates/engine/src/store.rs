//! The module contains `TransactionStore`, the single owner of the
//! transaction list.

use tracing::info;
use uuid::Uuid;

use crate::{EngineError, ImportReport, ResultEngine, Transaction, TransactionDraft};

/// Account that receives transactions entered through the form or imported.
pub const DEFAULT_ACCOUNT_ID: &str = "1";

/// In-memory, newest-first list of transactions.
///
/// Readers get slices; mutation only goes through [`add`](Self::add),
/// [`edit`](Self::edit) and [`import`](Self::import).
#[derive(Debug, Default)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    default_account: String,
}

impl TransactionStore {
    /// Return a builder for `TransactionStore`.
    pub fn builder() -> TransactionStoreBuilder {
        TransactionStoreBuilder::default()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: &str) -> ResultEngine<&Transaction> {
        self.transactions
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    /// Validates the draft, assigns an id and the default account and puts
    /// the new transaction first.
    pub fn add(&mut self, draft: TransactionDraft) -> ResultEngine<Transaction> {
        let draft = draft.normalized()?;
        let tx = draft.into_transaction(new_id(), self.default_account.clone());
        self.transactions.insert(0, tx.clone());
        info!(id = %tx.id, merchant = %tx.merchant, "transaction added");
        Ok(tx)
    }

    /// Replaces every editable field of `id`. The id, account and position
    /// are kept.
    pub fn edit(&mut self, id: &str, draft: TransactionDraft) -> ResultEngine<Transaction> {
        let draft = draft.normalized()?;
        let slot = self
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        let updated = draft.into_transaction(slot.id.clone(), slot.account_id.clone());
        *slot = updated.clone();
        info!(id = %updated.id, "transaction edited");
        Ok(updated)
    }

    /// Adds a batch of drafts ahead of the existing list, keeping the batch
    /// order. Nothing is added unless every draft is valid.
    pub fn import(&mut self, drafts: Vec<TransactionDraft>) -> ResultEngine<ImportReport> {
        let normalized = drafts
            .iter()
            .map(TransactionDraft::normalized)
            .collect::<ResultEngine<Vec<_>>>()?;
        let count = normalized.len();
        let batch: Vec<Transaction> = normalized
            .into_iter()
            .map(|d| d.into_transaction(new_id(), self.default_account.clone()))
            .collect();
        self.transactions.splice(0..0, batch);
        info!(count, "transactions imported");
        Ok(ImportReport { count })
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// The builder for `TransactionStore`
#[derive(Default)]
pub struct TransactionStoreBuilder {
    transactions: Vec<Transaction>,
    default_account: Option<String>,
}

impl TransactionStoreBuilder {
    /// Initial list, newest first.
    pub fn transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = transactions;
        self
    }

    /// Account assigned to new transactions. Defaults to
    /// [`DEFAULT_ACCOUNT_ID`].
    pub fn default_account(mut self, account_id: impl Into<String>) -> Self {
        self.default_account = Some(account_id.into());
        self
    }

    /// Construct `TransactionStore`
    pub fn build(self) -> TransactionStore {
        TransactionStore {
            transactions: self.transactions,
            default_account: self
                .default_account
                .unwrap_or_else(|| DEFAULT_ACCOUNT_ID.to_string()),
        }
    }
}
