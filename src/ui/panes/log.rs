//! Operation log pane rendering

use super::utils::{pane_block, placeholder, render_list, ScrollState};
use crate::snapshot::LogLine;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{ListItem, Padding},
};

/// Render the operation log pane; the most recent request is highlighted
pub fn render_log_pane(
    frame: &mut Frame,
    area: Rect,
    lines: &[LogLine],
    is_focused: bool,
    scroll_state: &mut ScrollState,
) {
    let block = pane_block("Operation Log", is_focused);

    if lines.is_empty() {
        render_list(frame, area, block, vec![placeholder("(no requests yet)")], scroll_state, true);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let last = lines.len() - 1;
    let all_items: Vec<ListItem> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let (mark, color) = if line.success {
                ("✓", DEFAULT_THEME.success)
            } else {
                ("✗", DEFAULT_THEME.error)
            };
            let item = ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>3} ", line.step),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(format!("{} ", mark), Style::default().fg(color)),
                Span::styled(line.request.clone(), Style::default().fg(DEFAULT_THEME.fg)),
                Span::styled(" → ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(line.outcome.clone(), Style::default().fg(color)),
            ]));
            if i == last {
                item.style(
                    Style::default()
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                item
            }
        })
        .collect();

    render_list(frame, area, block, all_items, scroll_state, true);
}
