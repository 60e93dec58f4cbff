use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::{Account, MonthlySummary, RuleBook, Transaction, TransactionStore, seed};
use insights::{GeminiClient, InsightProvider, RequestSequencer, StaticProvider};
use tokio::sync::mpsc;
use tracing::{info, warn};

pub use advisor::{InsightEvent, InsightsMode, InsightsState};
pub use recurring::{RecurringMode, RecurringState, RuleField, RuleForm};
pub use transactions::{
    FilterField, FilterInputs, FormField, TransactionForm, TransactionsMode, TransactionsState,
};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self, AppTerminal,
        keymap::{self, AppAction},
    },
};

mod advisor;
mod recurring;
mod transactions;

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Transactions,
    Recurring,
    Accounts,
    Insights,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::Transactions,
        Section::Recurring,
        Section::Accounts,
        Section::Insights,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Transactions => "Transactions",
            Self::Recurring => "Recurring",
            Self::Accounts => "Accounts",
            Self::Insights => "Insights",
        }
    }

    pub fn shortcut(self) -> char {
        match self {
            Self::Dashboard => '1',
            Self::Transactions => '2',
            Self::Recurring => '3',
            Self::Accounts => '4',
            Self::Insights => '5',
        }
    }

    fn from_shortcut(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.shortcut() == ch)
    }

    fn step(self, forward: bool) -> Self {
        let len = Self::ALL.len();
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        let next = if forward { idx + 1 } else { idx + len - 1 };
        Self::ALL[next % len]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    shown_at: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub section: Section,
    pub store: TransactionStore,
    pub rules: RuleBook,
    pub accounts: Vec<Account>,
    /// Reference monthly series charted on the dashboard.
    pub monthly: Vec<MonthlySummary>,
    pub transactions: TransactionsState,
    pub recurring: RecurringState,
    pub selected_account: usize,
    pub insights: InsightsState,
    pub toast: Option<ToastState>,
    pub offline: bool,
}

impl AppState {
    /// `true` while keystrokes go into a text field.
    pub fn is_editing(&self) -> bool {
        match self.section {
            Section::Transactions => self.transactions.mode != TransactionsMode::Browse,
            Section::Recurring => self.recurring.mode == RecurringMode::Form,
            Section::Insights => self.insights.mode == InsightsMode::Asking,
            Section::Dashboard | Section::Accounts => false,
        }
    }

    pub fn selected_account(&self) -> Option<&Account> {
        self.accounts.get(self.selected_account)
    }

    /// Newest first.
    pub fn account_transactions(&self, account_id: &str) -> Vec<&Transaction> {
        self.store
            .transactions()
            .iter()
            .filter(|tx| tx.account_id == account_id)
            .collect()
    }
}

pub struct App {
    config: AppConfig,
    provider: Arc<dyn InsightProvider>,
    questions: RequestSequencer,
    analyses: RequestSequencer,
    events_tx: mpsc::UnboundedSender<InsightEvent>,
    events_rx: mpsc::UnboundedReceiver<InsightEvent>,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let provider = build_provider(&config);
        Self::with_provider(config, provider)
    }

    pub fn with_provider(config: AppConfig, provider: Arc<dyn InsightProvider>) -> Self {
        let today = config.today();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = AppState {
            section: Section::Dashboard,
            store: TransactionStore::builder()
                .transactions(seed::transactions())
                .build(),
            rules: RuleBook::new(seed::recurring_rules()),
            accounts: seed::accounts(),
            monthly: seed::monthly_summaries(),
            transactions: TransactionsState::new(today),
            recurring: RecurringState::default(),
            selected_account: 0,
            insights: InsightsState::default(),
            toast: None,
            offline: config.offline,
        };

        Self {
            config,
            provider,
            questions: RequestSequencer::new(),
            analyses: RequestSequencer::new(),
            events_tx,
            events_rx,
            state,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!(offline = self.config.offline, "fluxboard started");
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut AppTerminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }

            self.drain_insight_events();
            self.expire_toast();
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.handle_action(keymap::map_key(key));
    }

    pub(crate) fn handle_action(&mut self, action: AppAction) {
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        if !self.state.is_editing() {
            match action {
                AppAction::Input('q') => {
                    self.should_quit = true;
                    return;
                }
                AppAction::Input(ch) => {
                    if let Some(section) = Section::from_shortcut(ch) {
                        self.state.section = section;
                        return;
                    }
                }
                AppAction::NextField => {
                    self.state.section = self.state.section.step(true);
                    return;
                }
                AppAction::PrevField => {
                    self.state.section = self.state.section.step(false);
                    return;
                }
                AppAction::Cancel => {
                    self.state.toast = None;
                    return;
                }
                _ => {}
            }
        }

        match self.state.section {
            Section::Dashboard => {}
            Section::Transactions => self.handle_transactions_key(action),
            Section::Recurring => self.handle_recurring_key(action),
            Section::Accounts => self.handle_accounts_key(action),
            Section::Insights => self.handle_insights_key(action),
        }
    }

    fn handle_accounts_key(&mut self, action: AppAction) {
        let len = self.state.accounts.len();
        match action {
            AppAction::Down | AppAction::Input('j') => {
                if len > 0 {
                    self.state.selected_account = (self.state.selected_account + 1).min(len - 1);
                }
            }
            AppAction::Up | AppAction::Input('k') => {
                self.state.selected_account = self.state.selected_account.saturating_sub(1);
            }
            AppAction::Input('x') => {
                let Some(account) = self.state.selected_account() else {
                    return;
                };
                let prefix = account_export_prefix(&account.name);
                let rows: Vec<Transaction> = self
                    .state
                    .account_transactions(&account.id)
                    .into_iter()
                    .cloned()
                    .collect();
                self.export(&rows, &prefix);
            }
            _ => {}
        }
    }

    pub(crate) fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.state.toast = Some(ToastState {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    fn expire_toast(&mut self) {
        if self
            .state
            .toast
            .as_ref()
            .is_some_and(|toast| toast.shown_at.elapsed() >= TOAST_TTL)
        {
            self.state.toast = None;
        }
    }
}

/// `fluxboard_` followed by the account name, lowercased, whitespace runs
/// collapsed to `_`.
fn account_export_prefix(name: &str) -> String {
    let slug: Vec<String> = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    format!("fluxboard_{}", slug.join("_"))
}

fn build_provider(config: &AppConfig) -> Arc<dyn InsightProvider> {
    if config.offline {
        info!("offline mode, serving canned insights");
        return Arc::new(StaticProvider::demo());
    }
    match GeminiClient::new(config.gemini()) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            warn!("insight provider unavailable: {err:?}");
            Arc::new(StaticProvider::failing(err))
        }
    }
}

/// Applies one editing action to a text buffer. Returns `true` if the text
/// changed.
pub(crate) fn edit_text(buffer: &mut String, action: AppAction) -> bool {
    match action {
        AppAction::Input(ch) => {
            buffer.push(ch);
            true
        }
        AppAction::Backspace => buffer.pop().is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use engine::{Money, StatusFilter};
    use insights::{
        InsightError,
        error::{CONFIGURATION, UPSTREAM},
    };

    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            export_dir: PathBuf::from("target/test_exports").join(uuid::Uuid::new_v4().to_string()),
            ..AppConfig::default()
        }
    }

    fn app() -> App {
        App::with_provider(test_config(), Arc::new(StaticProvider::demo()))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_action(AppAction::Input(ch));
        }
    }

    fn visible_ids(app: &App) -> Vec<String> {
        app.state
            .transactions
            .visible(&app.state.store)
            .into_iter()
            .map(|tx| tx.id.clone())
            .collect()
    }

    #[test]
    fn number_keys_switch_sections() {
        let mut app = app();
        type_text(&mut app, "2");
        assert_eq!(app.state.section, Section::Transactions);
        app.handle_action(AppAction::NextField);
        assert_eq!(app.state.section, Section::Recurring);
        app.handle_action(AppAction::PrevField);
        app.handle_action(AppAction::PrevField);
        assert_eq!(app.state.section, Section::Dashboard);
    }

    #[test]
    fn q_types_into_fields_but_quits_otherwise() {
        let mut app = app();
        type_text(&mut app, "2/q");
        assert!(!app.should_quit);
        assert_eq!(app.state.transactions.criteria.search, "q");

        app.handle_action(AppAction::Submit);
        type_text(&mut app, "q");
        assert!(app.should_quit);
    }

    #[test]
    fn search_narrows_and_clear_resets_everything() {
        let mut app = app();
        type_text(&mut app, "2/airbnb");
        app.handle_action(AppAction::Submit);
        assert_eq!(visible_ids(&app), vec!["t22"]);

        type_text(&mut app, "s");
        assert_eq!(app.state.transactions.criteria.status, StatusFilter::RecurringOnly);
        assert!(visible_ids(&app).is_empty());

        type_text(&mut app, "c");
        assert!(app.state.transactions.criteria.is_empty());
        assert_eq!(visible_ids(&app).len(), 22);
    }

    #[test]
    fn amount_filters_update_while_typing() {
        let mut app = app();
        type_text(&mut app, "2f");
        app.handle_action(AppAction::NextField);
        app.handle_action(AppAction::NextField);
        type_text(&mut app, "1000");
        assert_eq!(
            app.state.transactions.criteria.min_amount,
            Some(Money::new(100_000))
        );
        assert!(visible_ids(&app).len() < 22);

        type_text(&mut app, "x");
        assert_eq!(app.state.transactions.criteria.min_amount, None);
        assert_eq!(visible_ids(&app).len(), 22);

        app.handle_action(AppAction::Cancel);
        assert_eq!(app.state.transactions.mode, TransactionsMode::Browse);
        assert_eq!(app.state.transactions.inputs.min_amount, "1000x");
    }

    #[test]
    fn adding_a_transaction_prepends_and_closes_form() {
        let mut app = app();
        type_text(&mut app, "2n");
        type_text(&mut app, "Corner Cafe");
        app.handle_action(AppAction::NextField);
        type_text(&mut app, "4.5");
        app.handle_action(AppAction::Submit);

        let form = &app.state.transactions.form;
        assert!(!form.submitting);
        assert_eq!(form.error, None);
        assert_eq!(app.state.transactions.mode, TransactionsMode::Browse);
        let first = &app.state.store.transactions()[0];
        assert_eq!(first.merchant, "Corner Cafe");
        assert_eq!(first.amount, Money::new(-450));
        assert_eq!(app.state.store.len(), 23);
    }

    #[test]
    fn rejected_form_stays_open_and_clears_submitting() {
        let mut app = app();
        type_text(&mut app, "2n");
        app.handle_action(AppAction::Submit);

        let form = &app.state.transactions.form;
        assert!(!form.submitting);
        assert_eq!(
            form.error.as_deref(),
            Some("Please fill in all required fields")
        );
        assert_eq!(app.state.transactions.mode, TransactionsMode::Form);
        assert_eq!(app.state.store.len(), 22);
    }

    #[test]
    fn editing_keeps_position() {
        let mut app = app();
        type_text(&mut app, "2j");
        app.handle_action(AppAction::Submit);
        assert_eq!(app.state.transactions.form.editing.as_deref(), Some("t2"));

        app.handle_action(AppAction::NextField);
        app.handle_action(AppAction::Backspace);
        type_text(&mut app, "6.25");
        app.handle_action(AppAction::Submit);

        let edited = &app.state.store.transactions()[1];
        assert_eq!(edited.id, "t2");
        assert_eq!(edited.amount, Money::new(-4_625));
    }

    #[test]
    fn export_writes_filtered_rows() {
        let mut app = app();
        type_text(&mut app, "2/uber");
        app.handle_action(AppAction::Submit);
        type_text(&mut app, "x");

        let toast = app.state.toast.clone().unwrap();
        assert_eq!(toast.level, ToastLevel::Success);
        let file = app.config.export_dir.join(engine::export_file_name(
            &app.config.export_prefix,
            app.config.today(),
        ));
        let content = std::fs::read_to_string(&file).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("\"Uber\""));
        std::fs::remove_dir_all(&app.config.export_dir).unwrap();
    }

    #[test]
    fn exporting_nothing_writes_no_file() {
        let mut app = app();
        type_text(&mut app, "2/no such merchant");
        app.handle_action(AppAction::Submit);
        type_text(&mut app, "x");
        assert_eq!(app.state.toast.clone().unwrap().level, ToastLevel::Info);
        assert!(!app.config.export_dir.exists());
    }

    #[test]
    fn import_rejects_non_csv_paths() {
        let mut app = app();
        type_text(&mut app, "2m");
        type_text(&mut app, "statement.pdf");
        app.handle_action(AppAction::Submit);

        let toast = app.state.toast.clone().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, engine::INVALID_FILE_TYPE);
        assert_eq!(app.state.transactions.mode, TransactionsMode::Import);
    }

    #[test]
    fn rules_can_be_paused_and_added() {
        let mut app = app();
        let before = app.state.rules.monthly_commitment();
        type_text(&mut app, "3 ");
        assert!(!app.state.rules.rules()[0].active);
        assert_eq!(
            app.state.rules.monthly_commitment(),
            Money::new(before.cents() - 1_599)
        );

        type_text(&mut app, "nGym");
        app.handle_action(AppAction::NextField);
        type_text(&mut app, "40");
        app.handle_action(AppAction::Submit);
        assert_eq!(app.state.recurring.mode, RecurringMode::Browse);
        let added = app.state.rules.rules().last().unwrap();
        assert_eq!(added.merchant, "Gym");
        assert_eq!(added.category, engine::UNCATEGORIZED);
        assert_eq!(added.next_due_date, app.config.today().format("%Y-%m-%d").to_string());
    }

    #[test]
    fn account_export_prefix_is_slugged() {
        assert_eq!(
            account_export_prefix("High  Yield Savings"),
            "fluxboard_high_yield_savings"
        );
    }

    #[tokio::test]
    async fn question_answer_is_applied() {
        let mut app = app();
        type_text(&mut app, "5a");
        type_text(&mut app, "How am I doing?");
        app.handle_action(AppAction::Submit);
        assert!(app.state.insights.answering);
        assert_eq!(app.state.insights.asked.as_deref(), Some("How am I doing?"));

        let event = app.events_rx.recv().await.unwrap();
        app.apply_insight_event(event);
        let view = &app.state.insights;
        assert!(!view.answering);
        assert!(matches!(
            view.answer,
            Some(insights::QuestionOutcome::Answered { .. })
        ));
    }

    #[tokio::test]
    async fn missing_key_reports_configuration_error_in_answer() {
        let mut app = App::new(test_config());
        type_text(&mut app, "5aHi");
        app.handle_action(AppAction::Submit);

        let event = app.events_rx.recv().await.unwrap();
        app.apply_insight_event(event);
        let answer = app.state.insights.answer.clone().unwrap();
        assert!(answer.is_failure());
        assert_eq!(answer.answer_text(), CONFIGURATION);
    }

    #[tokio::test]
    async fn stale_analysis_is_discarded() {
        let mut app = App::with_provider(
            test_config(),
            Arc::new(StaticProvider::failing(InsightError::Upstream(
                "503".to_string(),
            ))),
        );
        let stale = app.analyses.issue();
        type_text(&mut app, "5g");
        assert!(app.state.insights.analyzing);

        app.apply_insight_event(InsightEvent::Analysis {
            ticket: stale,
            result: Err(InsightError::Malformed("late".to_string())),
        });
        assert!(app.state.insights.analyzing);
        assert_eq!(app.state.insights.analysis_error, None);

        let event = app.events_rx.recv().await.unwrap();
        app.apply_insight_event(event);
        assert!(!app.state.insights.analyzing);
        assert_eq!(app.state.insights.analysis_error.as_deref(), Some(UPSTREAM));
    }
}
