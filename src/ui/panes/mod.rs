//! TUI pane rendering modules
//!
//! Every pane renders one [`Snapshot`](crate::snapshot::Snapshot) field and
//! holds no state of its own besides the [`ScrollState`] owned by the app.
//!
//! # Pane Modules
//!
//! - [`stack`]: every stack instance, top element first
//! - [`queue`]: every queue instance, laid out per variant
//! - [`expression`]: postfix form and the evaluation trace of the last expression
//! - [`scheduler`]: process table, Gantt chart and averages
//! - [`log`]: executed requests with their outcome
//! - [`status`]: status bar with keybindings and playback state
//! - `utils`: scrolling, borders and value formatting shared by the panes

mod utils;

pub mod expression;
pub mod log;
pub mod queue;
pub mod scheduler;
pub mod stack;
pub mod status;

// Re-export render functions for convenience
pub use expression::render_expression_pane;
pub use log::render_log_pane;
pub use queue::render_queue_pane;
pub use scheduler::render_scheduler_pane;
pub use stack::render_stack_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use utils::ScrollState;
