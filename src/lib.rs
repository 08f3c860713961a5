//! # Introduction
//!
//! DSViz implements the classic teaching data structures and two algorithms
//! built on them, and records every intermediate state so the progress can be
//! stepped through rather than only the final answer inspected. The snapshot
//! history is navigated forward and backward through a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Script → Requests → Session → Structures / Engines → Snapshots → TUI
//! ```
//!
//! 1. [`structures`]: bounded [`structures::Stack`] and [`structures::Queue`]
//!    (linear, circular, deque and priority variants).
//! 2. [`expression`]: infix to postfix conversion and postfix evaluation
//!    with one [`expression::EvaluationStep`] per token.
//! 3. [`scheduler`]: non-preemptive priority CPU scheduling producing a
//!    Gantt chart and waiting / turnaround times.
//! 4. [`session`]: named instances created on demand, JSON request and
//!    response envelopes, and the snapshot history.
//! 5. [`snapshot`]: per-request snapshots under a memory budget.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Errors
//!
//! Every operation returns a `Result`. Component errors
//! ([`structures::StructureError`], [`expression::ExpressionError`],
//! [`scheduler::SchedulerError`]) convert into [`Error`], and the session turns
//! any of them into an error [`session::Response`].

pub mod config;
pub mod errors;
pub mod expression;
pub mod scheduler;
pub mod session;
pub mod snapshot;
pub mod structures;
pub mod ui;

pub use config::Config;
pub use errors::{Error, Result};
