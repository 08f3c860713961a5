use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, List, ListItem},
};
use serde_json::Value;

/// Scroll position of one pane
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollState {
    pub offset: usize,
    pub prev_item_count: usize,
}

impl ScrollState {
    pub fn up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn down(&mut self) {
        self.offset = self.offset.saturating_add(1);
    }

    /// Jump to the bottom on the next render
    pub fn to_bottom(&mut self) {
        self.offset = usize::MAX;
    }

    /// Smart auto-scroll: scroll to bottom only when content grows
    fn follow(&mut self, total_items: usize, visible_height: usize) {
        if total_items > self.prev_item_count {
            self.offset = total_items.saturating_sub(visible_height);
        } else {
            self.clamp(total_items, visible_height);
        }
        self.prev_item_count = total_items;
    }

    fn clamp(&mut self, total_items: usize, visible_height: usize) {
        if total_items > visible_height {
            let max_scroll = total_items - visible_height;
            self.offset = self.offset.min(max_scroll);
        } else {
            self.offset = 0;
        }
        self.prev_item_count = total_items;
    }
}

pub(crate) fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused))
}

/// Render the visible window of `items`.
///
/// With `follow` set, the pane jumps to the bottom whenever the number of
/// items grows; otherwise the user's position is only clamped.
pub(crate) fn render_list(
    frame: &mut Frame,
    area: Rect,
    block: Block<'static>,
    items: Vec<ListItem<'static>>,
    scroll: &mut ScrollState,
    follow: bool,
) {
    // Account for borders, min 1
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if follow {
        scroll.follow(items.len(), visible_height);
    } else {
        scroll.clamp(items.len(), visible_height);
    }

    let visible_items: Vec<ListItem> = items
        .into_iter()
        .skip(scroll.offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

pub(crate) fn placeholder(text: &str) -> ListItem<'static> {
    ListItem::new(text.to_string()).style(Style::default().fg(DEFAULT_THEME.comment))
}

/// Format a stored element with styled spans
pub(crate) fn format_value_styled(value: &Value) -> Span<'static> {
    match value {
        Value::Number(n) => Span::styled(n.to_string(), Style::default().fg(DEFAULT_THEME.number)),
        Value::String(s) => {
            Span::styled(format!("\"{}\"", s), Style::default().fg(DEFAULT_THEME.string))
        }
        Value::Bool(b) => Span::styled(b.to_string(), Style::default().fg(DEFAULT_THEME.keyword)),
        Value::Null => Span::styled(
            "null",
            Style::default()
                .fg(DEFAULT_THEME.keyword)
                .add_modifier(Modifier::DIM),
        ),
        other => Span::styled(other.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
    }
}

/// Integral values print without a fractional part
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{:.4}", n)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_follow_scrolls_to_bottom_on_growth() {
        let mut scroll = ScrollState::default();
        scroll.follow(20, 5);
        assert_eq!(scroll.offset, 15);

        scroll.up();
        scroll.follow(20, 5);
        assert_eq!(scroll.offset, 14);
    }

    #[test]
    fn test_clamp_limits_offset() {
        let mut scroll = ScrollState::default();
        scroll.to_bottom();
        scroll.clamp(8, 5);
        assert_eq!(scroll.offset, 3);

        scroll.clamp(3, 5);
        assert_eq!(scroll.offset, 0);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value_styled(&json!(5)).content, "5");
        assert_eq!(format_value_styled(&json!("job")).content, "\"job\"");
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
    }
}
