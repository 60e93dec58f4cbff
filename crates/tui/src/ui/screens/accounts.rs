use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use engine::{Account, Currency, net_worth};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::Card,
            money::{styled_amount, styled_total},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_accounts(frame, cols[0], state, &theme);
    if let Some(account) = state.selected_account() {
        render_detail(frame, cols[1], state, account, &theme);
    }
}

fn render_accounts(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let items: Vec<ListItem> = state
        .accounts
        .iter()
        .map(|account| {
            ListItem::new(vec![
                Line::from(Span::styled(account.name.clone(), theme.title())),
                Line::from(vec![
                    Span::styled(format!("{:<14}", account.kind.label()), theme.muted()),
                    styled_amount(account.balance, account.currency, theme),
                ]),
            ])
        })
        .collect();

    let mut list_state = ListState::default();
    if !state.accounts.is_empty() {
        list_state.select(Some(state.selected_account));
    }
    let list = List::new(items)
        .block(Card::new("Accounts", theme).focused(true).block())
        .highlight_style(theme.highlight())
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, rows[0], &mut list_state);

    let total = net_worth(&state.accounts);
    let color = if total.is_negative() {
        theme.negative
    } else {
        theme.positive
    };
    Card::new("Net worth", theme).render_with(
        frame,
        rows[1],
        Paragraph::new(Line::from(styled_total(total, Currency::default(), color))),
    );
}

fn render_detail(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    account: &Account,
    theme: &Theme,
) {
    let transactions = state.account_transactions(&account.id);
    let title = format!("{} ({})", account.name, account.kind.label());
    let card = Card::new(&title, theme);

    if transactions.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No transactions for this account.",
            theme.muted(),
        )))
        .alignment(Alignment::Center);
        card.render_with(frame, area, empty);
        return;
    }

    let items: Vec<ListItem> = transactions
        .iter()
        .map(|tx| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}  ", tx.date), Style::default().fg(theme.dim)),
                Span::styled(format!("{:<20.20}", tx.merchant), Style::default().fg(theme.text)),
                Span::styled(format!("{:<14.14}", tx.category), theme.muted()),
                styled_amount(tx.amount, tx.currency, theme),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items).block(card.block()), area);
}
