use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use api_types::insight::{DeepAnalysis, Impact};
use insights::QuestionOutcome;

use crate::{
    app::{AppState, InsightsMode, InsightsState},
    ui::{components::card::Card, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_question(frame, cols[0], &state.insights, &theme);
    render_analysis(frame, cols[1], &state.insights, &theme);
}

fn render_question(frame: &mut Frame<'_>, area: Rect, view: &InsightsState, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let asking = view.mode == InsightsMode::Asking;
    let prompt = if asking || !view.question.is_empty() {
        Span::styled(
            format!("{}{}", view.question, if asking { "▏" } else { "" }),
            Style::default().fg(theme.text),
        )
    } else {
        Span::styled("Press a to ask about your finances", Style::default().fg(theme.dim))
    };
    Card::new("Ask Fluxboard AI", theme)
        .focused(asking)
        .render_with(frame, rows[0], Paragraph::new(Line::from(prompt)));

    let mut lines = Vec::new();
    if let Some(asked) = &view.asked {
        lines.push(Line::from(vec![
            Span::styled("Q: ", theme.key()),
            Span::styled(asked.as_str(), theme.muted()),
        ]));
        lines.push(Line::from(""));
    }
    if view.answering {
        lines.push(Line::from(Span::styled("Thinking…", Style::default().fg(theme.accent))));
    } else if let Some(outcome) = &view.answer {
        lines.extend(outcome_lines(outcome, theme));
    }

    Card::new("Answer", theme).render_with(
        frame,
        rows[1],
        Paragraph::new(lines).wrap(Wrap { trim: true }),
    );
}

fn outcome_lines(outcome: &QuestionOutcome, theme: &Theme) -> Vec<Line<'static>> {
    match outcome {
        QuestionOutcome::Answered {
            answer,
            suggested_action,
        } => {
            let mut lines = vec![Line::from(Span::styled(
                answer.clone(),
                Style::default().fg(theme.text),
            ))];
            if let Some(action) = suggested_action {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("Suggested: ", theme.key()),
                    Span::styled(action.clone(), Style::default().fg(theme.positive)),
                ]));
            }
            lines
        }
        QuestionOutcome::Failed { message } => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(theme.error),
        ))],
    }
}

fn impact_style(impact: Impact, theme: &Theme) -> Style {
    let color = match impact {
        Impact::Positive => theme.positive,
        Impact::Negative => theme.negative,
        Impact::Neutral => theme.text_muted,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn analysis_lines(analysis: &DeepAnalysis, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(analysis.summary.clone(), Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(Span::styled("Patterns", theme.title())),
    ];
    for pattern in &analysis.patterns {
        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", pattern.impact.as_str()), impact_style(pattern.impact, theme)),
            Span::styled(pattern.title.clone(), theme.title()),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", pattern.description),
            theme.muted(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Forecast", theme.title())));
    for point in &analysis.forecast {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}  ", point.month), Style::default().fg(theme.dim)),
            Span::styled(
                format!("{:.2}", point.predicted_amount),
                Style::default().fg(theme.accent),
            ),
        ]));
    }
    lines
}

fn render_analysis(frame: &mut Frame<'_>, area: Rect, view: &InsightsState, theme: &Theme) {
    let mut lines = Vec::new();
    if view.analyzing {
        lines.push(Line::from(Span::styled(
            "Analyzing your history…",
            Style::default().fg(theme.accent),
        )));
    } else if let Some(err) = &view.analysis_error {
        lines.push(Line::from(Span::styled(err.clone(), Style::default().fg(theme.error))));
        lines.push(Line::from(Span::styled("Press g to retry.", Style::default().fg(theme.dim))));
    } else if view.analysis.is_none() {
        lines.push(Line::from(Span::styled(
            "Press g for a deep analysis of spending patterns and a 3-month forecast.",
            Style::default().fg(theme.dim),
        )));
    }

    // A previous analysis stays visible while a new one runs or fails.
    if let Some(analysis) = &view.analysis {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(analysis_lines(analysis, theme));
    }

    Card::new("Deep analysis", theme).render_with(
        frame,
        area,
        Paragraph::new(lines).wrap(Wrap { trim: true }),
    );
}
