//! Transactions screen state: filters, the entry form and the import prompt.

use std::{path::Path, str::FromStr};

use chrono::NaiveDate;
use engine::{
    CATEGORIES, Currency, EngineError, FilterCriteria, Money, ResultEngine, Transaction,
    TransactionDraft, TransactionStore, export_to_dir, filter_transactions, read_csv_file,
};
use tracing::{info, warn};

use super::{App, ToastLevel, edit_text};
use crate::ui::keymap::AppAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionsMode {
    #[default]
    Browse,
    Search,
    Filters,
    Form,
    Import,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    StartDate,
    EndDate,
    MinAmount,
    MaxAmount,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::StartDate,
        FilterField::EndDate,
        FilterField::MinAmount,
        FilterField::MaxAmount,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterField::StartDate => "From",
            FilterField::EndDate => "To",
            FilterField::MinAmount => "Min",
            FilterField::MaxAmount => "Max",
        }
    }

    fn next(self) -> Self {
        match self {
            FilterField::StartDate => FilterField::EndDate,
            FilterField::EndDate => FilterField::MinAmount,
            FilterField::MinAmount => FilterField::MaxAmount,
            FilterField::MaxAmount => FilterField::StartDate,
        }
    }

    fn prev(self) -> Self {
        match self {
            FilterField::StartDate => FilterField::MaxAmount,
            FilterField::EndDate => FilterField::StartDate,
            FilterField::MinAmount => FilterField::EndDate,
            FilterField::MaxAmount => FilterField::MinAmount,
        }
    }
}

/// Raw text of the filter inputs. Amount bounds that don't parse stay here
/// but leave the criterion unset.
#[derive(Debug, Clone, Default)]
pub struct FilterInputs {
    pub start_date: String,
    pub end_date: String,
    pub min_amount: String,
    pub max_amount: String,
}

impl FilterInputs {
    pub fn value(&self, field: FilterField) -> &str {
        match field {
            FilterField::StartDate => &self.start_date,
            FilterField::EndDate => &self.end_date,
            FilterField::MinAmount => &self.min_amount,
            FilterField::MaxAmount => &self.max_amount,
        }
    }

    fn value_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::StartDate => &mut self.start_date,
            FilterField::EndDate => &mut self.end_date,
            FilterField::MinAmount => &mut self.min_amount,
            FilterField::MaxAmount => &mut self.max_amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    Merchant,
    Amount,
    Category,
    Description,
    Recurring,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Date,
        FormField::Merchant,
        FormField::Amount,
        FormField::Category,
        FormField::Description,
        FormField::Recurring,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Date => "Date",
            FormField::Merchant => "Merchant",
            FormField::Amount => "Amount",
            FormField::Category => "Category",
            FormField::Description => "Description",
            FormField::Recurring => "Recurring",
        }
    }

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Entry form for adding or editing a transaction. The amount is entered as a
/// magnitude; the sign follows the category.
#[derive(Debug, Clone)]
pub struct TransactionForm {
    /// Id of the transaction being edited, `None` when adding.
    pub editing: Option<String>,
    pub field: FormField,
    pub date: String,
    pub merchant: String,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub is_recurring: bool,
    pub currency: Currency,
    pub submitting: bool,
    pub error: Option<String>,
}

impl TransactionForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            editing: None,
            field: FormField::Merchant,
            date: today.format("%Y-%m-%d").to_string(),
            merchant: String::new(),
            amount: String::new(),
            category: CATEGORIES[0].to_string(),
            description: String::new(),
            is_recurring: false,
            currency: Currency::default(),
            submitting: false,
            error: None,
        }
    }

    pub fn edit(tx: &Transaction) -> Self {
        Self {
            editing: Some(tx.id.clone()),
            field: FormField::Merchant,
            date: tx.date.clone(),
            merchant: tx.merchant.clone(),
            amount: tx.amount.abs().to_plain_string(),
            category: tx.category.clone(),
            description: tx.description.clone(),
            is_recurring: tx.is_recurring,
            currency: tx.currency,
            submitting: false,
            error: None,
        }
    }

    pub fn text(&self, field: FormField) -> String {
        match field {
            FormField::Date => self.date.clone(),
            FormField::Merchant => self.merchant.clone(),
            FormField::Amount => self.amount.clone(),
            FormField::Category => self.category.clone(),
            FormField::Description => self.description.clone(),
            FormField::Recurring => if self.is_recurring { "Yes" } else { "No" }.to_string(),
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Date => Some(&mut self.date),
            FormField::Merchant => Some(&mut self.merchant),
            FormField::Amount => Some(&mut self.amount),
            FormField::Category => Some(&mut self.category),
            FormField::Description => Some(&mut self.description),
            FormField::Recurring => None,
        }
    }

    /// Steps through the suggested categories.
    fn cycle_category(&mut self, forward: bool) {
        let len = CATEGORIES.len();
        let next = match CATEGORIES.iter().position(|c| *c == self.category) {
            Some(idx) if forward => (idx + 1) % len,
            Some(idx) => (idx + len - 1) % len,
            None => 0,
        };
        self.category = CATEGORIES[next].to_string();
    }

    pub fn draft(&self) -> ResultEngine<TransactionDraft> {
        if self.merchant.trim().is_empty() || self.amount.trim().is_empty() {
            return Err(EngineError::Validation(
                "Please fill in all required fields".to_string(),
            ));
        }
        let amount = Money::from_str(&self.amount)?;
        Ok(TransactionDraft {
            date: self.date.clone(),
            amount,
            currency: self.currency,
            category: self.category.clone(),
            merchant: self.merchant.clone(),
            description: self.description.clone(),
            is_recurring: self.is_recurring,
        }
        .with_category_sign())
    }
}

#[derive(Debug, Clone)]
pub struct TransactionsState {
    pub mode: TransactionsMode,
    pub criteria: FilterCriteria,
    pub inputs: FilterInputs,
    pub filter_field: FilterField,
    pub selected: usize,
    pub form: TransactionForm,
    pub import_path: String,
}

impl TransactionsState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            mode: TransactionsMode::Browse,
            criteria: FilterCriteria::default(),
            inputs: FilterInputs::default(),
            filter_field: FilterField::StartDate,
            selected: 0,
            form: TransactionForm::new(today),
            import_path: String::new(),
        }
    }

    pub fn visible<'a>(&self, store: &'a TransactionStore) -> Vec<&'a Transaction> {
        filter_transactions(store.transactions(), &self.criteria)
    }

    /// Clears search, date and amount bounds and status in one step.
    pub fn clear_filters(&mut self) {
        self.criteria.clear();
        self.inputs = FilterInputs::default();
        self.selected = 0;
    }

    fn apply_inputs(&mut self) {
        self.criteria.start_date = date_input(&self.inputs.start_date);
        self.criteria.end_date = date_input(&self.inputs.end_date);
        self.criteria.set_min_amount(&self.inputs.min_amount);
        self.criteria.set_max_amount(&self.inputs.max_amount);
        self.selected = 0;
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

fn date_input(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl App {
    pub(super) fn handle_transactions_key(&mut self, action: AppAction) {
        match self.state.transactions.mode {
            TransactionsMode::Browse => self.handle_transactions_browse(action),
            TransactionsMode::Search => {
                let tx_state = &mut self.state.transactions;
                match action {
                    AppAction::Submit | AppAction::Cancel => {
                        tx_state.mode = TransactionsMode::Browse;
                    }
                    other => {
                        if edit_text(&mut tx_state.criteria.search, other) {
                            tx_state.selected = 0;
                        }
                    }
                }
            }
            TransactionsMode::Filters => {
                let tx_state = &mut self.state.transactions;
                match action {
                    AppAction::Submit | AppAction::Cancel => {
                        tx_state.mode = TransactionsMode::Browse;
                    }
                    AppAction::NextField | AppAction::Down => {
                        tx_state.filter_field = tx_state.filter_field.next();
                    }
                    AppAction::PrevField | AppAction::Up => {
                        tx_state.filter_field = tx_state.filter_field.prev();
                    }
                    other => {
                        let field = tx_state.filter_field;
                        if edit_text(tx_state.inputs.value_mut(field), other) {
                            tx_state.apply_inputs();
                        }
                    }
                }
            }
            TransactionsMode::Form => self.handle_transaction_form(action),
            TransactionsMode::Import => match action {
                AppAction::Cancel => self.state.transactions.mode = TransactionsMode::Browse,
                AppAction::Submit => self.import_transactions(),
                other => {
                    edit_text(&mut self.state.transactions.import_path, other);
                }
            },
        }
    }

    fn handle_transactions_browse(&mut self, action: AppAction) {
        let visible = self.state.transactions.visible(&self.state.store).len();
        let today = self.config.today();
        let tx_state = &mut self.state.transactions;
        match action {
            AppAction::Down | AppAction::Input('j') => tx_state.select_next(visible),
            AppAction::Up | AppAction::Input('k') => tx_state.select_prev(),
            AppAction::Input('/') => tx_state.mode = TransactionsMode::Search,
            AppAction::Input('f') => tx_state.mode = TransactionsMode::Filters,
            AppAction::Input('s') => {
                tx_state.criteria.status = tx_state.criteria.status.cycle();
                tx_state.selected = 0;
            }
            AppAction::Input('c') => tx_state.clear_filters(),
            AppAction::Input('n') => {
                tx_state.form = TransactionForm::new(today);
                tx_state.mode = TransactionsMode::Form;
            }
            AppAction::Input('e') | AppAction::Submit => self.open_edit_form(),
            AppAction::Input('x') => self.export_visible(),
            AppAction::Input('m') => {
                tx_state.import_path.clear();
                tx_state.mode = TransactionsMode::Import;
            }
            _ => {}
        }
    }

    fn open_edit_form(&mut self) {
        let tx_state = &mut self.state.transactions;
        let visible = tx_state.visible(&self.state.store);
        if let Some(tx) = visible.get(tx_state.selected) {
            tx_state.form = TransactionForm::edit(tx);
            tx_state.mode = TransactionsMode::Form;
        }
    }

    fn handle_transaction_form(&mut self, action: AppAction) {
        let form = &mut self.state.transactions.form;
        if form.submitting {
            return;
        }
        match action {
            AppAction::Cancel => self.state.transactions.mode = TransactionsMode::Browse,
            AppAction::Submit => self.submit_transaction_form(),
            AppAction::NextField | AppAction::Down => form.field = form.field.next(),
            AppAction::PrevField | AppAction::Up => form.field = form.field.prev(),
            AppAction::Left | AppAction::Right if form.field == FormField::Category => {
                form.cycle_category(action == AppAction::Right);
            }
            AppAction::Left | AppAction::Right | AppAction::Input(' ')
                if form.field == FormField::Recurring =>
            {
                form.is_recurring = !form.is_recurring;
            }
            other => {
                if let Some(text) = form.text_mut(form.field) {
                    edit_text(text, other);
                }
            }
        }
    }

    /// Adds or edits through the store. The in-flight flag is cleared on
    /// both outcomes; a failure keeps the form open with the message.
    pub(super) fn submit_transaction_form(&mut self) {
        let state = &mut self.state;
        let form = &mut state.transactions.form;
        form.submitting = true;
        form.error = None;

        let result = form.draft().and_then(|draft| match form.editing.as_deref() {
            Some(id) => state.store.edit(id, draft),
            None => state.store.add(draft),
        });
        form.submitting = false;

        match result {
            Ok(tx) => {
                let verb = if form.editing.is_some() {
                    "updated"
                } else {
                    "added"
                };
                if form.editing.is_none() {
                    state.transactions.selected = 0;
                }
                state.transactions.mode = TransactionsMode::Browse;
                self.notify(
                    ToastLevel::Success,
                    format!("Transaction {verb}: {}", tx.merchant),
                );
            }
            Err(err) => {
                warn!("transaction form rejected: {err}");
                form.error = Some(err.to_string());
            }
        }
    }

    /// Writes the filtered list to the export directory.
    fn export_visible(&mut self) {
        let rows: Vec<Transaction> = self
            .state
            .transactions
            .visible(&self.state.store)
            .into_iter()
            .cloned()
            .collect();
        let prefix = self.config.export_prefix.clone();
        self.export(&rows, &prefix);
    }

    pub(super) fn export(&mut self, rows: &[Transaction], prefix: &str) {
        let today = self.config.today();
        match export_to_dir(rows, &self.config.export_dir, prefix, today) {
            Ok(Some(path)) => self.notify(
                ToastLevel::Success,
                format!("Exported {} transactions to {}", rows.len(), path.display()),
            ),
            Ok(None) => self.notify(ToastLevel::Info, "Nothing to export"),
            Err(err) => {
                warn!("export failed: {err}");
                self.notify(ToastLevel::Error, format!("Export failed: {err}"));
            }
        }
    }

    fn import_transactions(&mut self) {
        let path = self.state.transactions.import_path.trim().to_string();
        let result = read_csv_file(Path::new(&path))
            .and_then(|drafts| self.state.store.import(drafts));
        match result {
            Ok(report) => {
                info!(%path, count = report.count, "csv imported");
                let tx_state = &mut self.state.transactions;
                tx_state.mode = TransactionsMode::Browse;
                tx_state.selected = 0;
                self.notify(
                    ToastLevel::Success,
                    format!("Imported {} transactions", report.count),
                );
            }
            Err(err) => {
                warn!(%path, "import failed: {err}");
                self.notify(ToastLevel::Error, err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 21).unwrap()
    }

    #[test]
    fn form_applies_category_sign() {
        let mut form = TransactionForm::new(today());
        form.merchant = "Cafe".to_string();
        form.amount = "12.50".to_string();
        assert_eq!(form.draft().unwrap().amount, Money::new(-1_250));

        form.category = "Income".to_string();
        assert_eq!(form.draft().unwrap().amount, Money::new(1_250));
    }

    #[test]
    fn form_requires_merchant_and_amount() {
        let form = TransactionForm::new(today());
        assert_eq!(
            form.draft().unwrap_err().to_string(),
            "Please fill in all required fields"
        );
    }

    #[test]
    fn edit_form_shows_magnitude() {
        let tx = engine::seed::transactions().remove(0);
        let form = TransactionForm::edit(&tx);
        assert_eq!(form.amount, "120.5");
        assert_eq!(form.editing.as_deref(), Some("t1"));
    }

    #[test]
    fn category_cycles_through_suggestions() {
        let mut form = TransactionForm::new(today());
        form.cycle_category(false);
        assert_eq!(form.category, "Other");
        form.cycle_category(true);
        assert_eq!(form.category, "Groceries");

        form.category = "Pets".to_string();
        form.cycle_category(true);
        assert_eq!(form.category, "Groceries");
    }

    #[test]
    fn malformed_amount_bound_is_unset() {
        let mut state = TransactionsState::new(today());
        state.inputs.min_amount = "abc".to_string();
        state.inputs.max_amount = "300".to_string();
        state.inputs.start_date = "  ".to_string();
        state.apply_inputs();
        assert_eq!(state.criteria.min_amount, None);
        assert_eq!(state.criteria.max_amount, Some(Money::new(30_000)));
        assert_eq!(state.criteria.start_date, None);
    }
}
