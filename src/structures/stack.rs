//! Bounded LIFO stack
//!
//! [`Stack`] is the container shown in the stack pane and the operand /
//! operator store used by the expression engine. It never grows past the
//! capacity it was created with.

use super::errors::{ContainerKind, StructureError};
use crate::config::DEFAULT_CAPACITY;

/// Capacity-bounded last-in-first-out container
#[derive(Debug, Clone, PartialEq)]
pub struct Stack<T> {
    elements: Vec<T>,
    capacity: usize,
}

impl<T> Stack<T> {
    pub fn new(capacity: usize) -> Self {
        Stack {
            elements: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Push a value onto the top of the stack
    pub fn push(&mut self, value: T) -> Result<(), StructureError> {
        if self.is_full() {
            return Err(StructureError::overflow(ContainerKind::Stack, self.capacity));
        }
        self.elements.push(value);
        Ok(())
    }

    /// Remove and return the top value
    pub fn pop(&mut self) -> Result<T, StructureError> {
        self.elements
            .pop()
            .ok_or_else(|| StructureError::underflow(ContainerKind::Stack))
    }

    /// Top value, or `None` when empty
    pub fn peek(&self) -> Option<&T> {
        self.elements.last()
    }

    pub fn size(&self) -> usize {
        self.elements.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.elements.len() >= self.capacity
    }

    /// Drop every element, keeping the capacity
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Bottom-to-top iterator
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }
}

impl<T: Clone> Stack<T> {
    /// Bottom-to-top copy of the contents
    pub fn to_list(&self) -> Vec<T> {
        self.elements.clone()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
