use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState, Paragraph},
};

use engine::{Currency, RecurringRule};

use crate::{
    app::{AppState, RecurringMode, RuleField},
    ui::{
        components::card::{Card, StatCard, field_line, popup_area},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let active = state.rules.active().count();
    StatCard::new(
        "Monthly commitment",
        state.rules.monthly_commitment().format(Currency::default()),
        &theme,
    )
    .subtitle(Span::styled(
        format!("{active} of {} rules active", state.rules.rules().len()),
        Style::default().fg(theme.dim),
    ))
    .render(frame, layout[0]);

    render_rules(frame, layout[1], state, &theme);

    if state.recurring.mode == RecurringMode::Form {
        render_form(frame, area, state, &theme);
    }
}

fn rule_item(rule: &RecurringRule, theme: &Theme) -> ListItem<'static> {
    let (status, status_color) = if rule.active {
        ("active", theme.positive)
    } else {
        ("paused", theme.dim)
    };
    let name_style = if rule.active {
        Style::default()
            .fg(theme.text)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(theme.dim)
            .add_modifier(Modifier::CROSSED_OUT)
    };
    ListItem::new(Line::from(vec![
        Span::styled(format!("{:<20.20}", rule.merchant), name_style),
        Span::styled(format!(" {:<10}", rule.frequency.as_str()), theme.muted()),
        Span::styled(
            format!(" {:>12}", rule.amount.format(rule.currency)),
            Style::default().fg(theme.text),
        ),
        Span::styled(format!("  {:<14.14}", rule.category), Style::default().fg(theme.accent)),
        Span::styled(format!(" next {}  ", rule.next_due_date), Style::default().fg(theme.dim)),
        Span::styled(status, Style::default().fg(status_color)),
    ]))
}

fn render_rules(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let rules = state.rules.rules();
    let card = Card::new("Recurring rules", theme)
        .focused(state.recurring.mode == RecurringMode::Browse);

    if rules.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No recurring rules. Press n to add one.",
            theme.muted(),
        )))
        .alignment(Alignment::Center);
        card.render_with(frame, area, empty);
        return;
    }

    let items: Vec<ListItem> = rules.iter().map(|rule| rule_item(rule, theme)).collect();
    let mut list_state = ListState::default();
    list_state.select(Some(state.recurring.selected.min(rules.len() - 1)));

    let list = List::new(items)
        .block(card.block())
        .highlight_style(theme.highlight())
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let form = &state.recurring.form;
    let rect = popup_area(area, 60, 10);
    let title = if form.editing.is_some() {
        "Edit rule"
    } else {
        "New rule"
    };

    let mut lines: Vec<Line> = RuleField::ALL
        .iter()
        .map(|field| field_line(field.label(), form.text(*field), form.field == *field, theme))
        .collect();
    lines.push(Line::from(""));
    match &form.error {
        Some(err) => lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(theme.error),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Space cycles frequency. Blank due date means today.",
            Style::default().fg(theme.dim),
        ))),
    }

    frame.render_widget(Clear, rect);
    Card::new(title, theme)
        .focused(true)
        .render_with(frame, rect, Paragraph::new(lines));
}
