use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState, Paragraph},
};

use engine::{Transaction, TransactionStore};

use crate::{
    app::{AppState, FilterField, FormField, TransactionsMode, TransactionsState},
    ui::{
        components::{
            card::{Card, field_line, popup_area},
            money::styled_amount,
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let view = &state.transactions;
    render_filters(frame, layout[0], view, &theme);
    render_list(frame, layout[1], &state.store, view, &theme);

    match view.mode {
        TransactionsMode::Form => render_form(frame, area, view, &theme),
        TransactionsMode::Import => render_import(frame, area, view, &theme),
        _ => {}
    }
}

fn render_filters(frame: &mut Frame<'_>, area: Rect, view: &TransactionsState, theme: &Theme) {
    let editing_search = view.mode == TransactionsMode::Search;
    let editing_bounds = view.mode == TransactionsMode::Filters;

    let search_style = if editing_search {
        theme.highlight().fg(theme.text)
    } else {
        Style::default().fg(theme.text)
    };
    let cursor = if editing_search { "▏" } else { "" };
    let search = Line::from(vec![
        Span::styled("Search", theme.muted()),
        Span::raw(": "),
        Span::styled(format!("{}{cursor}", view.criteria.search), search_style),
        Span::raw("   "),
        Span::styled("Status", theme.muted()),
        Span::raw(format!(": {}", view.criteria.status.label())),
    ]);

    let mut bounds = Vec::new();
    for field in FilterField::ALL {
        let focused = editing_bounds && view.filter_field == field;
        let raw = view.inputs.value(field);
        let shown = if raw.is_empty() && !focused { "-" } else { raw };
        let style = if focused {
            theme.highlight().fg(theme.text)
        } else {
            Style::default().fg(theme.text)
        };
        bounds.push(Span::styled(field.label(), theme.muted()));
        bounds.push(Span::raw(": "));
        bounds.push(Span::styled(
            format!("{shown}{}", if focused { "▏" } else { "" }),
            style,
        ));
        bounds.push(Span::raw("   "));
    }
    if !view.criteria.is_empty() {
        bounds.push(Span::styled("filtered", Style::default().fg(theme.warning)));
    }

    let card = Card::new("Filters", theme).focused(editing_search || editing_bounds);
    card.render_with(frame, area, Paragraph::new(vec![search, Line::from(bounds)]));
}

fn transaction_item(tx: &Transaction, theme: &Theme) -> ListItem<'static> {
    let recurring = if tx.is_recurring { "↻" } else { " " };
    ListItem::new(Line::from(vec![
        Span::styled(format!("{}  ", tx.date), Style::default().fg(theme.dim)),
        Span::styled(
            format!("{:<20.20}", tx.merchant),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {:<14.14}", tx.category), Style::default().fg(theme.accent)),
        Span::styled(format!(" {:<26.26} ", tx.description), theme.muted()),
        Span::styled(format!("{recurring} "), Style::default().fg(theme.warning)),
        styled_amount(tx.amount, tx.currency, theme),
    ]))
}

fn render_list(
    frame: &mut Frame<'_>,
    area: Rect,
    store: &TransactionStore,
    view: &TransactionsState,
    theme: &Theme,
) {
    let visible = view.visible(store);
    let title = format!("Transactions ({} of {})", visible.len(), store.len());
    let card = Card::new(&title, theme).focused(view.mode == TransactionsMode::Browse);

    if visible.is_empty() {
        let message = if store.is_empty() {
            "No transactions yet. Press n to add one or m to import a CSV file."
        } else {
            "No transactions match the current filters. Press c to clear filters."
        };
        let empty = Paragraph::new(Line::from(Span::styled(message, theme.muted())))
            .alignment(Alignment::Center);
        card.render_with(frame, area, empty);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|tx| transaction_item(tx, theme))
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(view.selected.min(visible.len() - 1)));

    let list = List::new(items)
        .block(card.block())
        .highlight_style(theme.highlight())
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, view: &TransactionsState, theme: &Theme) {
    let form = &view.form;
    let rect = popup_area(area, 64, 13);
    let title = if form.editing.is_some() {
        "Edit transaction"
    } else {
        "New transaction"
    };

    let mut lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| field_line(field.label(), form.text(*field), form.field == *field, theme))
        .collect();
    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from(Span::styled("Saving…", theme.muted())));
    } else if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(theme.error),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Amount is a magnitude; Income is positive, other categories negative.",
            Style::default().fg(theme.dim),
        )));
    }

    frame.render_widget(Clear, rect);
    Card::new(title, theme)
        .focused(true)
        .render_with(frame, rect, Paragraph::new(lines));
}

fn render_import(frame: &mut Frame<'_>, area: Rect, view: &TransactionsState, theme: &Theme) {
    let rect = popup_area(area, 64, 5);
    let lines = vec![
        field_line("CSV path", view.import_path.clone(), true, theme),
        Line::from(Span::styled(
            "Rows must use the export header.",
            Style::default().fg(theme.dim),
        )),
    ];
    frame.render_widget(Clear, rect);
    Card::new("Import transactions", theme)
        .focused(true)
        .render_with(frame, rect, Paragraph::new(lines));
}
