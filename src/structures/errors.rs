//! Error types for the bounded containers
//!
//! [`StructureError`] covers the three ways a container operation can fail.
//! Messages match what the visualizer shows to users ("Stack overflow",
//! "Deque underflow", ...).

use std::fmt;
use thiserror::Error;

/// The container that reported an error, used to phrase the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Stack,
    Queue,
    Deque,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Stack => write!(f, "Stack"),
            ContainerKind::Queue => write!(f, "Queue"),
            ContainerKind::Deque => write!(f, "Deque"),
        }
    }
}

/// Errors raised by [`Stack`](super::Stack) and [`Queue`](super::Queue)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// Insert into a container already holding `capacity` elements
    #[error("{kind} overflow")]
    Overflow { kind: ContainerKind, capacity: usize },

    /// Removal from an empty container
    #[error("{kind} underflow")]
    Underflow { kind: ContainerKind },

    /// Operation restricted to another queue variant
    #[error("This operation is only available for {required}")]
    UnsupportedOperation {
        operation: &'static str,
        required: &'static str,
    },
}

impl StructureError {
    pub fn overflow(kind: ContainerKind, capacity: usize) -> Self {
        StructureError::Overflow { kind, capacity }
    }

    pub fn underflow(kind: ContainerKind) -> Self {
        StructureError::Underflow { kind }
    }

    /// True for errors caused by the container being full
    pub fn is_overflow(&self) -> bool {
        matches!(self, StructureError::Overflow { .. })
    }

    /// True for errors caused by the container being empty
    pub fn is_underflow(&self) -> bool {
        matches!(self, StructureError::Underflow { .. })
    }
}
