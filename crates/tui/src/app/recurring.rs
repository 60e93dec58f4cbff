use std::str::FromStr;

use engine::{
    EngineError, Frequency, Money, RecurringRule, ResultEngine, RuleDraft, UNCATEGORIZED,
};
use tracing::warn;

use super::{App, ToastLevel, edit_text};
use crate::ui::keymap::AppAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecurringMode {
    #[default]
    Browse,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleField {
    #[default]
    Merchant,
    Amount,
    Frequency,
    Category,
    NextDue,
}

impl RuleField {
    pub const ALL: [RuleField; 5] = [
        RuleField::Merchant,
        RuleField::Amount,
        RuleField::Frequency,
        RuleField::Category,
        RuleField::NextDue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RuleField::Merchant => "Merchant",
            RuleField::Amount => "Amount",
            RuleField::Frequency => "Frequency",
            RuleField::Category => "Category",
            RuleField::NextDue => "Next due",
        }
    }

    fn step(self, forward: bool) -> Self {
        let len = Self::ALL.len();
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        let next = if forward { idx + 1 } else { idx + len - 1 };
        Self::ALL[next % len]
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleForm {
    pub editing: Option<String>,
    pub field: RuleField,
    pub merchant: String,
    pub amount: String,
    pub frequency: Frequency,
    pub category: String,
    /// Blank means today.
    pub next_due_date: String,
    pub error: Option<String>,
}

impl RuleForm {
    pub fn edit(rule: &RecurringRule) -> Self {
        Self {
            editing: Some(rule.id.clone()),
            field: RuleField::Merchant,
            merchant: rule.merchant.clone(),
            amount: rule.amount.to_plain_string(),
            frequency: rule.frequency,
            category: rule.category.clone(),
            next_due_date: rule.next_due_date.clone(),
            error: None,
        }
    }

    pub fn text(&self, field: RuleField) -> String {
        match field {
            RuleField::Merchant => self.merchant.clone(),
            RuleField::Amount => self.amount.clone(),
            RuleField::Frequency => self.frequency.as_str().to_string(),
            RuleField::Category if self.category.is_empty() => UNCATEGORIZED.to_string(),
            RuleField::Category => self.category.clone(),
            RuleField::NextDue => self.next_due_date.clone(),
        }
    }

    fn text_mut(&mut self, field: RuleField) -> Option<&mut String> {
        match field {
            RuleField::Merchant => Some(&mut self.merchant),
            RuleField::Amount => Some(&mut self.amount),
            RuleField::Frequency => None,
            RuleField::Category => Some(&mut self.category),
            RuleField::NextDue => Some(&mut self.next_due_date),
        }
    }

    pub fn draft(&self) -> ResultEngine<RuleDraft> {
        if self.amount.trim().is_empty() {
            return Err(EngineError::Validation(
                "Please fill in all required fields".to_string(),
            ));
        }
        Ok(RuleDraft {
            merchant: self.merchant.clone(),
            frequency: self.frequency,
            amount: Money::from_str(&self.amount)?.abs(),
            currency: None,
            category: self.category.clone(),
            next_due_date: self.next_due_date.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecurringState {
    pub mode: RecurringMode,
    pub selected: usize,
    pub form: RuleForm,
}

impl App {
    pub(super) fn handle_recurring_key(&mut self, action: AppAction) {
        match self.state.recurring.mode {
            RecurringMode::Browse => self.handle_recurring_browse(action),
            RecurringMode::Form => {
                let form = &mut self.state.recurring.form;
                match action {
                    AppAction::Cancel => self.state.recurring.mode = RecurringMode::Browse,
                    AppAction::Submit => self.submit_rule_form(),
                    AppAction::NextField | AppAction::Down => form.field = form.field.step(true),
                    AppAction::PrevField | AppAction::Up => form.field = form.field.step(false),
                    AppAction::Left | AppAction::Right | AppAction::Input(' ')
                        if form.field == RuleField::Frequency =>
                    {
                        form.frequency = form.frequency.next();
                    }
                    other => {
                        if let Some(text) = form.text_mut(form.field) {
                            edit_text(text, other);
                        }
                    }
                }
            }
        }
    }

    fn handle_recurring_browse(&mut self, action: AppAction) {
        let len = self.state.rules.rules().len();
        let selected_id = self
            .state
            .rules
            .rules()
            .get(self.state.recurring.selected)
            .map(|rule| rule.id.clone());
        let view = &mut self.state.recurring;
        match action {
            AppAction::Down | AppAction::Input('j') => {
                if len > 0 {
                    view.selected = (view.selected + 1).min(len - 1);
                }
            }
            AppAction::Up | AppAction::Input('k') => view.selected = view.selected.saturating_sub(1),
            AppAction::Input('n') => {
                view.form = RuleForm::default();
                view.mode = RecurringMode::Form;
            }
            AppAction::Input('e') | AppAction::Submit => {
                if let Some(rule) = self.state.rules.rules().get(view.selected) {
                    view.form = RuleForm::edit(rule);
                    view.mode = RecurringMode::Form;
                }
            }
            AppAction::Input('d') => {
                if let Some(id) = selected_id {
                    match self.state.rules.delete(&id) {
                        Ok(rule) => {
                            let remaining = self.state.rules.rules().len();
                            let view = &mut self.state.recurring;
                            view.selected = view.selected.min(remaining.saturating_sub(1));
                            self.notify(
                                ToastLevel::Info,
                                format!("Deleted rule {}", rule.merchant),
                            );
                        }
                        Err(err) => self.notify(ToastLevel::Error, err.to_string()),
                    }
                }
            }
            AppAction::Input(' ') | AppAction::Input('p') => {
                if let Some(id) = selected_id {
                    match self.state.rules.toggle_active(&id) {
                        Ok(true) => self.notify(ToastLevel::Info, "Rule resumed"),
                        Ok(false) => self.notify(ToastLevel::Info, "Rule paused"),
                        Err(err) => self.notify(ToastLevel::Error, err.to_string()),
                    }
                }
            }
            _ => {}
        }
    }

    pub(super) fn submit_rule_form(&mut self) {
        let today = self.config.today();
        let state = &mut self.state;
        let form = &mut state.recurring.form;
        form.error = None;

        let result = form.draft().and_then(|draft| match form.editing.as_deref() {
            Some(id) => state.rules.update(id, draft, today),
            None => state.rules.add(draft, today),
        });

        match result {
            Ok(rule) => {
                let verb = if form.editing.is_some() {
                    "updated"
                } else {
                    "added"
                };
                state.recurring.mode = RecurringMode::Browse;
                self.notify(ToastLevel::Success, format!("Rule {verb}: {}", rule.merchant));
            }
            Err(err) => {
                warn!("rule form rejected: {err}");
                form.error = Some(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_form_round_trips_existing_rule() {
        let rule = engine::seed::recurring_rules().remove(0);
        let form = RuleForm::edit(&rule);
        let draft = form.draft().unwrap();
        assert_eq!(draft.merchant, "Netflix");
        assert_eq!(draft.amount, Money::new(1_599));
        assert_eq!(draft.frequency, Frequency::Monthly);
    }

    #[test]
    fn rule_form_requires_amount() {
        let form = RuleForm {
            merchant: "Gym".to_string(),
            ..RuleForm::default()
        };
        assert!(matches!(form.draft(), Err(EngineError::Validation(_))));
    }

    #[test]
    fn blank_category_shows_uncategorized() {
        let form = RuleForm::default();
        assert_eq!(form.text(RuleField::Category), UNCATEGORIZED);
        assert_eq!(form.text(RuleField::Frequency), "MONTHLY");
    }
}
