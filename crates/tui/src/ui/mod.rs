pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use engine::{Currency, net_worth};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{
    AppState, InsightsMode, RecurringMode, Section, TransactionsMode,
};

pub use terminal::{AppTerminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    let content = layout[2];
    match state.section {
        Section::Dashboard => screens::dashboard::render(frame, content, state),
        Section::Transactions => screens::transactions::render(frame, content, state),
        Section::Recurring => screens::recurring::render(frame, content, state),
        Section::Accounts => screens::accounts::render(frame, content, state),
        Section::Insights => screens::insights::render(frame, content, state),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut spans = vec![
        Span::styled(" Fluxboard", theme.title()),
        Span::raw("  "),
        Span::styled("Net worth", theme.muted()),
        Span::raw(format!(
            ": {}  ",
            net_worth(&state.accounts).format(Currency::default())
        )),
        Span::styled("Transactions", theme.muted()),
        Span::raw(format!(": {}  ", state.store.len())),
    ];

    let pending = state.insights.answering || state.insights.analyzing;
    if state.offline {
        spans.push(Span::styled("AI: offline", Style::default().fg(theme.warning)));
    } else if pending {
        spans.push(Span::styled("AI: thinking…", Style::default().fg(theme.accent)));
    } else {
        spans.push(Span::styled("AI: ready", Style::default().fg(theme.positive)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let separator = || Span::styled("  │  ", Style::default().fg(theme.border));
    let mut parts = Vec::new();

    if !state.is_editing() {
        parts.extend(components::tabs::tab_shortcuts(theme));
    }

    let context_hints = context_hints(state);
    if !context_hints.is_empty() {
        if !parts.is_empty() {
            parts.push(separator());
        }
        parts.extend(hint_spans(&context_hints, theme));
    }

    if !state.is_editing() {
        parts.push(separator());
        parts.extend(hint_spans(&[("q", "quit")], theme));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn hint_spans(hints: &[(&'static str, &'static str)], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, theme.key()));
        spans.push(Span::raw(format!(" {label}")));
    }
    spans
}

const EDIT_HINTS: [(&str, &str); 3] = [("Tab", "next"), ("Enter", "save"), ("Esc", "cancel")];

/// Keyboard hints for the current section and mode.
fn context_hints(state: &AppState) -> Vec<(&'static str, &'static str)> {
    match state.section {
        Section::Dashboard => vec![("2", "transactions"), ("5", "ask AI")],
        Section::Transactions => match state.transactions.mode {
            TransactionsMode::Browse => vec![
                ("/", "search"),
                ("f", "filters"),
                ("s", "status"),
                ("c", "clear"),
                ("n", "new"),
                ("e", "edit"),
                ("x", "export"),
                ("m", "import"),
            ],
            TransactionsMode::Search => vec![("Enter", "done"), ("Esc", "close")],
            TransactionsMode::Filters => vec![("Tab", "next field"), ("Enter", "done")],
            TransactionsMode::Form => {
                let mut hints = EDIT_HINTS.to_vec();
                hints.push(("←/→", "cycle"));
                hints
            }
            TransactionsMode::Import => vec![("Enter", "import"), ("Esc", "cancel")],
        },
        Section::Recurring => match state.recurring.mode {
            RecurringMode::Browse => vec![
                ("n", "new"),
                ("e", "edit"),
                ("d", "delete"),
                ("space", "pause/resume"),
            ],
            RecurringMode::Form => EDIT_HINTS.to_vec(),
        },
        Section::Accounts => vec![("j/k", "select"), ("x", "export account")],
        Section::Insights => match state.insights.mode {
            InsightsMode::Browse => vec![("a", "ask"), ("g", "deep analysis")],
            InsightsMode::Asking => vec![("Enter", "send"), ("Esc", "cancel")],
        },
    }
}
