//! Bounded container engines
//!
//! This module provides the capacity-bounded containers every other part of
//! the crate is built on:
//! - [`stack`]: LIFO [`stack::Stack`] used directly and by the expression engine
//! - [`queue`]: [`queue::Queue`] in one of four [`queue::QueueVariant`]s
//! - [`errors`]: [`errors::StructureError`] raised on overflow, underflow and
//!   variant-restricted operations
//!
//! # Capacity
//!
//! Every container is created with a fixed capacity (default
//! [`DEFAULT_CAPACITY`](crate::config::DEFAULT_CAPACITY)). Inserting into a full
//! container fails instead of growing, and removing from an empty one fails
//! instead of returning a placeholder. Only `peek` reports emptiness through
//! `None`.

pub mod errors;
pub mod queue;
pub mod stack;

pub use errors::{ContainerKind, StructureError};
pub use queue::{CircularState, PriorityEntry, Queue, QueueVariant};
pub use stack::Stack;
