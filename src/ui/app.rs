//! Main TUI application state and logic

use super::panes::{
    render_expression_pane, render_log_pane, render_queue_pane, render_scheduler_pane,
    render_stack_pane, render_status_bar, ScrollState, StatusRenderData,
};
use crate::errors::Error;
use crate::session::Session;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Stack,
    Queue,
    Expression,
    Scheduler,
    Log,
}

impl FocusedPane {
    /// Move focus to the next pane (stacks -> queues -> expression -> scheduler -> log)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Stack => FocusedPane::Queue,
            FocusedPane::Queue => FocusedPane::Expression,
            FocusedPane::Expression => FocusedPane::Scheduler,
            FocusedPane::Scheduler => FocusedPane::Log,
            FocusedPane::Log => FocusedPane::Stack,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Stack => FocusedPane::Log,
            FocusedPane::Queue => FocusedPane::Stack,
            FocusedPane::Expression => FocusedPane::Queue,
            FocusedPane::Scheduler => FocusedPane::Expression,
            FocusedPane::Log => FocusedPane::Scheduler,
        }
    }
}

/// The main application state
pub struct App {
    /// Session whose history is being replayed
    pub session: Session,

    /// Name of the script shown in the status bar
    pub title: String,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub stack_scroll: ScrollState,
    pub queue_scroll: ScrollState,
    pub expression_scroll: ScrollState,
    pub scheduler_scroll: ScrollState,
    pub log_scroll: ScrollState,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(session: Session, title: String) -> Self {
        App {
            session,
            title,
            focused_pane: FocusedPane::Stack,
            stack_scroll: ScrollState::default(),
            queue_scroll: ScrollState::default(),
            expression_scroll: ScrollState::default(),
            scheduler_scroll: ScrollState::default(),
            log_scroll: ScrollState::default(),
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_secs(1) {
                if self.session.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                    self.log_scroll.to_bottom();
                } else {
                    // No more steps available
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Create layout: 5 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(pane_area);

        // Left column: Stacks (top) | Operation log (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[0]);

        // Right column: Queues | Expression | Scheduler
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(30),
                Constraint::Percentage(35),
            ])
            .split(columns[1]);

        let Some(snapshot) = self.session.current_snapshot() else {
            return;
        };

        render_stack_pane(
            frame,
            left_rows[0],
            snapshot,
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        render_log_pane(
            frame,
            left_rows[1],
            self.session.log_at(snapshot),
            self.focused_pane == FocusedPane::Log,
            &mut self.log_scroll,
        );

        render_queue_pane(
            frame,
            right_rows[0],
            snapshot,
            self.focused_pane == FocusedPane::Queue,
            &mut self.queue_scroll,
        );

        render_expression_pane(
            frame,
            right_rows[1],
            snapshot,
            self.focused_pane == FocusedPane::Expression,
            &mut self.expression_scroll,
        );

        render_scheduler_pane(
            frame,
            right_rows[2],
            snapshot,
            self.focused_pane == FocusedPane::Scheduler,
            &mut self.scheduler_scroll,
        );

        render_status_bar(
            frame,
            status_area,
            StatusRenderData {
                title: &self.title,
                message: &self.status_message,
                current_step: self.session.history_position(),
                total_steps: self.session.total_snapshots(),
                failed: snapshot.response.as_ref().is_some_and(|r| !r.is_success()),
                is_playing: self.is_playing,
            },
        );
    }

    fn focused_scroll(&mut self) -> &mut ScrollState {
        match self.focused_pane {
            FocusedPane::Stack => &mut self.stack_scroll,
            FocusedPane::Queue => &mut self.queue_scroll,
            FocusedPane::Expression => &mut self.expression_scroll,
            FocusedPane::Scheduler => &mut self.scheduler_scroll,
            FocusedPane::Log => &mut self.log_scroll,
        }
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let mut stepped = 0;
                for _ in 0..n {
                    if self.session.step_forward().is_ok() {
                        stepped += 1;
                    } else {
                        break;
                    }
                }
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.log_scroll.to_bottom();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => self.focused_scroll().up(),
            KeyCode::Down => self.focused_scroll().down(),
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.session.jump_to_end();
                self.status_message = "Jumped to end".to_string();
                self.log_scroll.to_bottom();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.session.rewind_to_start();
                self.status_message = "Jumped to start".to_string();
                self.log_scroll.to_bottom();
            }
            _ => {}
        }
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        match self.session.step_forward() {
            Ok(()) => {
                self.status_message = self.describe_current_step();
                self.log_scroll.to_bottom();
            }
            Err(Error::History(message)) => {
                self.status_message = format!("Cannot step forward: {}", message);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        match self.session.step_backward() {
            Ok(()) => {
                self.status_message = self.describe_current_step();
                self.log_scroll.to_bottom();
            }
            Err(Error::History(message)) => {
                self.status_message = format!("Cannot step backward: {}", message);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    /// The request that produced the current snapshot
    fn describe_current_step(&self) -> String {
        self.session
            .current_snapshot()
            .and_then(|s| s.request.as_ref())
            .map(|request| request.to_string())
            .unwrap_or_else(|| "Initial state".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::script::{parse_script, DEMO_SCRIPT};
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn demo_app() -> App {
        let mut session = Session::new(Config::default()).expect("session should start");
        let requests = parse_script(DEMO_SCRIPT).expect("demo script should parse");
        session.run_script(requests).expect("demo should fit in history");
        session.rewind_to_start();
        App::new(session, "demo".to_string())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(180, 48)).expect("test terminal");
        terminal.draw(|f| app.render(f)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_stepping_through_history() {
        let mut app = demo_app();
        assert_eq!(app.session.history_position(), 0);

        press(&mut app, KeyCode::Left);
        assert!(app.status_message.starts_with("Cannot step backward"));

        press(&mut app, KeyCode::Right);
        assert_eq!(app.session.history_position(), 1);
        assert_eq!(app.status_message, "stack[default].push 10");

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.session.history_position(), 4);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.history_position(), app.session.total_snapshots() - 1);

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.session.history_position(), 0);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = demo_app();
        for _ in 0..5 {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.focused_pane, FocusedPane::Stack);

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Log);
    }

    #[test]
    fn test_renders_final_state() {
        let mut app = demo_app();
        let start = screen(&mut app);
        assert!(start.contains("(no stacks)"));
        assert!(start.contains("START"));

        press(&mut app, KeyCode::Enter);
        let end = screen(&mut app);
        assert!(end.contains("Stacks"));
        assert!(end.contains("Priority Scheduler"));
        assert!(end.contains("avg waiting"));
        assert!(end.contains("END"));
    }
}
