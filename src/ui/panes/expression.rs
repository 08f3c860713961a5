//! Expression pane: postfix form and the evaluation trace

use super::utils::{format_number, pane_block, placeholder, render_list, ScrollState};
use crate::session::{Request, Response};
use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};

/// Render the expression pane
pub fn render_expression_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    is_focused: bool,
    scroll_state: &mut ScrollState,
) {
    let block = pane_block("Expression", is_focused);
    let mut all_items = Vec::new();
    let label = Style::default().fg(DEFAULT_THEME.comment);

    // A failed evaluation leaves no trace, only the error
    if let (Some(Request::Expression { expression }), Some(Response::Error { message })) =
        (&snapshot.request, &snapshot.response)
    {
        all_items.push(ListItem::new(Line::from(vec![
            Span::styled("Infix    ", label),
            Span::styled(expression.clone(), Style::default().fg(DEFAULT_THEME.fg)),
        ])));
        all_items.push(ListItem::new(Line::from(vec![
            Span::styled("Error    ", label),
            Span::styled(message.clone(), Style::default().fg(DEFAULT_THEME.error)),
        ])));
        render_list(frame, area, block, all_items, scroll_state, false);
        return;
    }

    let Some(evaluation) = &snapshot.evaluation else {
        all_items.push(placeholder("(no expression evaluated)"));
        render_list(frame, area, block, all_items, scroll_state, false);
        return;
    };

    all_items.push(ListItem::new(Line::from(vec![
        Span::styled("Infix    ", label),
        Span::styled(evaluation.expression.clone(), Style::default().fg(DEFAULT_THEME.fg)),
    ])));
    all_items.push(ListItem::new(Line::from(vec![
        Span::styled("Postfix  ", label),
        Span::styled(
            evaluation.postfix.clone(),
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD),
        ),
    ])));
    all_items.push(ListItem::new(Line::from(vec![
        Span::styled("Result   ", label),
        Span::styled(
            format_number(evaluation.result),
            Style::default()
                .fg(DEFAULT_THEME.success)
                .add_modifier(Modifier::BOLD),
        ),
    ])));
    all_items.push(ListItem::new(""));

    for (i, step) in evaluation.steps.iter().enumerate() {
        let stack = step
            .stack_snapshot
            .iter()
            .map(|n| format_number(*n))
            .collect::<Vec<_>>()
            .join(", ");
        all_items.push(ListItem::new(Line::from(vec![
            Span::styled(format!("{:>3}. ", i + 1), label),
            Span::styled(step.action.clone(), Style::default().fg(DEFAULT_THEME.fg)),
        ])));
        all_items.push(ListItem::new(Line::from(vec![
            Span::raw("     "),
            Span::styled(format!("[{}]", stack), Style::default().fg(DEFAULT_THEME.number)),
        ])));
    }

    render_list(frame, area, block, all_items, scroll_state, false);
}
