//! Scheduler pane rendering
//!
//! Before a schedule is calculated the pane lists the processes registered
//! with each priority queue's scheduler. Afterwards it shows the process
//! table, a Gantt bar scaled to the pane width, and the averages.

use super::utils::{format_number, pane_block, placeholder, render_list, ScrollState};
use crate::scheduler::{GanttSegment, ScheduleReport};
use crate::snapshot::Snapshot;
use crate::structures::QueueVariant;
use crate::ui::theme::{DEFAULT_THEME, SEGMENT_COLORS};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};

/// Render the scheduler pane
pub fn render_scheduler_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    is_focused: bool,
    scroll_state: &mut ScrollState,
) {
    let block = pane_block("Priority Scheduler", is_focused);
    let content_width = area.width.saturating_sub(2) as usize;

    let all_items = match &snapshot.schedule {
        Some(report) => report_items(report, content_width),
        None => pending_items(snapshot),
    };

    render_list(frame, area, block, all_items, scroll_state, false);
}

fn pending_items(snapshot: &Snapshot) -> Vec<ListItem<'static>> {
    let mut items = Vec::new();

    for (key, queue) in &snapshot.queues {
        if key.variant != QueueVariant::Priority {
            continue;
        }
        let Ok(scheduler) = queue.scheduler() else {
            continue;
        };
        if scheduler.processes().is_empty() {
            continue;
        }
        items.push(ListItem::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
            Span::styled(
                format!("{} pending", key.instance),
                Style::default()
                    .fg(DEFAULT_THEME.primary)
                    .add_modifier(Modifier::BOLD),
            ),
        ])));
        items.push(header_line());
        for process in scheduler.processes() {
            items.push(ListItem::new(Line::from(vec![
                Span::styled(
                    format!("  {:<6}", process.id),
                    Style::default().fg(DEFAULT_THEME.process),
                ),
                Span::styled(
                    format!(
                        "{:>7}{:>7}{:>5}",
                        process.arrival_time, process.burst_time, process.priority
                    ),
                    Style::default().fg(DEFAULT_THEME.fg),
                ),
            ])));
        }
    }

    if items.is_empty() {
        items.push(placeholder("(no processes)"));
    }
    items
}

fn header_line() -> ListItem<'static> {
    ListItem::new(Line::from(Span::styled(
        format!(
            "  {:<6}{:>7}{:>7}{:>5}{:>7}{:>6}{:>6}",
            "ID", "Arrive", "Burst", "Pri", "Done", "Wait", "TAT"
        ),
        Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::UNDERLINED),
    )))
}

fn report_items(report: &ScheduleReport, content_width: usize) -> Vec<ListItem<'static>> {
    let mut items = vec![header_line()];

    for process in &report.processes {
        items.push(ListItem::new(Line::from(vec![
            Span::styled(
                format!("  {:<6}", process.id),
                Style::default().fg(DEFAULT_THEME.process),
            ),
            Span::styled(
                format!(
                    "{:>7}{:>7}{:>5}{:>7}{:>6}{:>6}",
                    process.arrival_time,
                    process.burst_time,
                    process.priority,
                    process.completion_time,
                    process.waiting_time,
                    process.turnaround_time
                ),
                Style::default().fg(DEFAULT_THEME.fg),
            ),
        ])));
    }

    items.push(ListItem::new(""));
    items.push(ListItem::new(Line::from(Span::styled(
        "  Gantt chart",
        Style::default().fg(DEFAULT_THEME.comment),
    ))));
    let (bar, axis) = gantt_lines(
        &report.gantt_chart,
        report.total_time,
        content_width.saturating_sub(2),
    );
    items.push(ListItem::new(bar));
    items.push(ListItem::new(axis));

    items.push(ListItem::new(""));
    items.push(ListItem::new(Line::from(vec![
        Span::styled("  avg waiting ", Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(
            format_number(report.avg_waiting_time),
            Style::default()
                .fg(DEFAULT_THEME.success)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   avg turnaround ", Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(
            format_number(report.avg_turnaround_time),
            Style::default()
                .fg(DEFAULT_THEME.success)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   total ", Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(
            report.total_time.to_string(),
            Style::default().fg(DEFAULT_THEME.number),
        ),
    ])));

    items.push(ListItem::new(""));
    for step in &report.execution_steps {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("  {}", step),
            Style::default().fg(DEFAULT_THEME.fg),
        ))));
    }

    items
}

/// Build the Gantt bar and the time axis below it.
///
/// Short schedules get a whole number of columns per time unit (at most six);
/// longer ones are scaled down so the bar never exceeds `width` cells. Gaps
/// between segments are idle time.
fn gantt_lines(
    segments: &[GanttSegment],
    total_time: u64,
    width: usize,
) -> (Line<'static>, Line<'static>) {
    let scale = columns_per_unit(total_time, width);
    let column = |time: u64| (time as f64 * scale).round() as usize;

    let mut bar = vec![Span::raw("  ")];
    let mut axis = String::from("  0");
    let mut cursor = 0u64;

    for (i, segment) in segments.iter().enumerate() {
        if segment.start_time > cursor {
            let idle = column(segment.start_time).saturating_sub(column(cursor));
            bar.push(Span::styled(
                "░".repeat(idle),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            push_tick(&mut axis, segment.start_time, 2 + column(segment.start_time));
        }

        let cells = column(segment.end_time).saturating_sub(column(segment.start_time));
        let color = SEGMENT_COLORS[i % SEGMENT_COLORS.len()];
        bar.push(Span::styled(
            fit_label(&segment.process_id, cells),
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
        push_tick(&mut axis, segment.end_time, 2 + column(segment.end_time));
        cursor = segment.end_time;
    }

    (
        Line::from(bar),
        Line::from(Span::styled(axis, Style::default().fg(DEFAULT_THEME.comment))),
    )
}

fn columns_per_unit(total_time: u64, width: usize) -> f64 {
    if total_time == 0 {
        return 1.0;
    }
    let fit = width as f64 / total_time as f64;
    if fit >= 1.0 {
        fit.floor().min(6.0)
    } else {
        fit
    }
}

/// Center `label` in a cell run, truncating when it does not fit
fn fit_label(label: &str, cells: usize) -> String {
    let label: String = label.chars().take(cells).collect();
    let len = label.chars().count();
    let left = (cells - len) / 2;
    format!("{}{}{}", " ".repeat(left), label, " ".repeat(cells - len - left))
}

/// Place the label for `time` at `column`, skipping labels that would
/// collide with the previous one
fn push_tick(axis: &mut String, time: u64, column: usize) {
    let len = axis.chars().count();
    if len < column {
        axis.push_str(&" ".repeat(column - len));
        axis.push_str(&time.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(id: &str, start_time: u64, end_time: u64) -> GanttSegment {
        GanttSegment {
            process_id: id.to_string(),
            start_time,
            end_time,
            priority: 1,
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_gantt_bar_marks_idle_time() {
        let segments = vec![segment("A", 0, 2), segment("B", 4, 6)];
        let (bar, axis) = gantt_lines(&segments, 6, 12);
        assert_eq!(text(&bar), "   A  ░░░░ B  ");
        assert_eq!(text(&axis), "  0   2   4   6");
    }

    #[test]
    fn test_long_schedule_fits_pane_width() {
        let segments = vec![segment("A", 0, 50_000_000)];
        let (bar, axis) = gantt_lines(&segments, 50_000_000, 80);
        assert_eq!(text(&bar).chars().count(), 2 + 80);
        assert_eq!(text(&axis), format!("  0{}50000000", " ".repeat(79)));
    }

    #[test]
    fn test_scaled_down_bar_keeps_proportions() {
        let segments = vec![segment("A", 0, 100), segment("B", 300, 400)];
        let (bar, axis) = gantt_lines(&segments, 400, 40);

        let bar = text(&bar);
        assert_eq!(bar.chars().count(), 2 + 40);
        assert_eq!(bar.chars().filter(|c| *c == '░').count(), 20);
        assert!(text(&axis).ends_with("300       400"));
    }

    #[test]
    fn test_fit_label() {
        assert_eq!(fit_label("P1", 6), "  P1  ");
        assert_eq!(fit_label("LONGNAME", 3), "LON");
        assert_eq!(fit_label("P1", 0), "");
    }
}
