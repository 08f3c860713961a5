//! Stack pane rendering
//!
//! Each stack instance is shown as a header with its fill level, followed by
//! its elements from the top of the stack down.

use super::utils::{format_value_styled, pane_block, placeholder, render_list, ScrollState};
use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};

/// Render the stack pane
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    is_focused: bool,
    scroll_state: &mut ScrollState,
) {
    let block = pane_block("Stacks", is_focused);
    let mut all_items = Vec::new();

    if snapshot.stacks.is_empty() {
        all_items.push(placeholder("(no stacks)"));
    }

    for (name, stack) in &snapshot.stacks {
        let fill_color = if stack.is_full() {
            DEFAULT_THEME.error
        } else {
            DEFAULT_THEME.comment
        };
        all_items.push(ListItem::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
            Span::styled(
                name.clone(),
                Style::default()
                    .fg(DEFAULT_THEME.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(
                format!("{}/{}", stack.size(), stack.capacity()),
                Style::default().fg(fill_color),
            ),
        ])));

        if stack.is_empty() {
            all_items.push(placeholder("    (empty)"));
            continue;
        }

        let top = stack.size() - 1;
        for (index, value) in stack.iter().enumerate().rev() {
            let mut spans = vec![
                Span::styled(
                    format!("  [{:>2}] ", index),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                format_value_styled(value),
            ];
            if index == top {
                spans.push(Span::styled(
                    "  ← top",
                    Style::default().fg(DEFAULT_THEME.success),
                ));
            }
            all_items.push(ListItem::new(Line::from(spans)));
        }
    }

    render_list(frame, area, block, all_items, scroll_state, false);
}
