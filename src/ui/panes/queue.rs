//! Queue pane rendering
//!
//! Every queue instance gets a header line; the body depends on the variant:
//!
//! - linear and deque queues print their elements front to rear
//! - circular queues print every ring slot with the front and rear markers
//! - priority queues print one entry per line with its priority, plus the
//!   number of processes registered with the attached scheduler

use super::utils::{format_value_styled, pane_block, placeholder, render_list, ScrollState};
use crate::snapshot::Snapshot;
use crate::structures::{Queue, QueueVariant};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};
use serde_json::Value;

/// Render the queue pane
pub fn render_queue_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    is_focused: bool,
    scroll_state: &mut ScrollState,
) {
    let block = pane_block("Queues", is_focused);
    let mut all_items = Vec::new();

    if snapshot.queues.is_empty() {
        all_items.push(placeholder("(no queues)"));
    }

    for (key, queue) in &snapshot.queues {
        all_items.push(ListItem::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
            Span::styled(
                key.to_string(),
                Style::default()
                    .fg(DEFAULT_THEME.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(
                format!("{}/{}", queue.size(), queue.capacity()),
                Style::default().fg(if queue.is_full() {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.comment
                }),
            ),
        ])));

        match queue.variant() {
            QueueVariant::Linear | QueueVariant::Deque => sequence_items(queue, &mut all_items),
            QueueVariant::Circular => ring_items(queue, &mut all_items),
            QueueVariant::Priority => priority_items(queue, &mut all_items),
        }
    }

    render_list(frame, area, block, all_items, scroll_state, false);
}

fn sequence_items(queue: &Queue<Value>, items: &mut Vec<ListItem<'static>>) {
    if queue.is_empty() {
        items.push(placeholder("    (empty)"));
        return;
    }

    let marker = Style::default().fg(DEFAULT_THEME.comment);
    let mut spans = vec![Span::styled("  front → ", marker)];
    for (i, value) in queue.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(", ", marker));
        }
        spans.push(format_value_styled(value));
    }
    spans.push(Span::styled(" ← rear", marker));
    items.push(ListItem::new(Line::from(spans)));
}

fn ring_items(queue: &Queue<Value>, items: &mut Vec<ListItem<'static>>) {
    let Some(state) = queue.circular_state() else {
        return;
    };

    for (slot, element) in state.elements.iter().enumerate() {
        let mut spans = vec![Span::styled(
            format!("  ({:>2}) ", slot),
            Style::default().fg(DEFAULT_THEME.comment),
        )];
        match element {
            Some(value) => spans.push(format_value_styled(value)),
            None => spans.push(Span::styled("·", Style::default().fg(DEFAULT_THEME.comment))),
        }
        if state.count > 0 && slot == state.front {
            spans.push(Span::styled(
                "  F",
                Style::default()
                    .fg(DEFAULT_THEME.success)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        if state.rear == Some(slot) {
            spans.push(Span::styled(
                "  R",
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        items.push(ListItem::new(Line::from(spans)));
    }
}

fn priority_items(queue: &Queue<Value>, items: &mut Vec<ListItem<'static>>) {
    match queue.entries() {
        Some(entries) if !entries.is_empty() => {
            for entry in entries {
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("  p{:<3} ", entry.priority),
                        Style::default().fg(DEFAULT_THEME.secondary),
                    ),
                    format_value_styled(&entry.value),
                ])));
            }
        }
        _ => items.push(placeholder("    (empty)")),
    }

    if let Ok(scheduler) = queue.scheduler() {
        let count = scheduler.processes().len();
        if count > 0 {
            items.push(placeholder(&format!("    scheduler: {} process(es)", count)));
        }
    }
}
