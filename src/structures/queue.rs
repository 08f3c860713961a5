//! Bounded queue in four variants
//!
//! A [`Queue`] is created in one of the [`QueueVariant`]s and keeps that
//! behavior for its whole life:
//!
//! | Variant    | Storage                    | Insert            | Remove      |
//! |------------|----------------------------|-------------------|-------------|
//! | `Linear`   | growable sequence          | rear              | front       |
//! | `Circular` | fixed ring of `capacity`   | slot after `rear` | `front` slot|
//! | `Deque`    | growable sequence          | front or rear     | front or rear|
//! | `Priority` | sequence sorted by priority| ordered position  | front       |
//!
//! # Priority ordering
//!
//! Lower numbers mean higher precedence. A new element goes in front of the
//! first element whose priority is strictly greater, so elements with equal
//! priority leave in the order they arrived.
//!
//! # Scheduling
//!
//! A priority queue also carries a [`PriorityScheduler`] process list. The
//! process list is separate state from the queued elements; it just shares
//! the owning instance.

use super::errors::{ContainerKind, StructureError};
use crate::config::{DEFAULT_CAPACITY, DEFAULT_PRIORITY};
use crate::scheduler::PriorityScheduler;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Behavioral mode of a [`Queue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueVariant {
    #[default]
    Linear,
    Circular,
    Deque,
    Priority,
}

impl QueueVariant {
    pub const ALL: [QueueVariant; 4] = [
        QueueVariant::Linear,
        QueueVariant::Circular,
        QueueVariant::Deque,
        QueueVariant::Priority,
    ];

    /// Display title used in messages and pane headers
    pub fn title(self) -> &'static str {
        match self {
            QueueVariant::Linear => "Linear Queue",
            QueueVariant::Circular => "Circular Queue",
            QueueVariant::Deque => "Deque",
            QueueVariant::Priority => "Priority Queue",
        }
    }
}

impl fmt::Display for QueueVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueueVariant::Linear => "linear",
            QueueVariant::Circular => "circular",
            QueueVariant::Deque => "deque",
            QueueVariant::Priority => "priority",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for QueueVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(QueueVariant::Linear),
            "circular" => Ok(QueueVariant::Circular),
            "deque" => Ok(QueueVariant::Deque),
            "priority" => Ok(QueueVariant::Priority),
            other => Err(format!("Invalid queue type: {}", other)),
        }
    }
}

/// An element of a priority queue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityEntry<T> {
    pub value: T,
    pub priority: i64,
}

/// Raw view of a circular queue's ring buffer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircularState<T> {
    /// Every slot of the ring; `None` marks an empty slot
    pub elements: Vec<Option<T>>,
    pub front: usize,
    /// Index of the last written slot, `None` while the queue is empty
    pub rear: Option<usize>,
    pub count: usize,
    pub capacity: usize,
}

/// Fixed-size ring used by the circular variant
#[derive(Debug, Clone, PartialEq)]
struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    front: usize,
    rear: Option<usize>,
    count: usize,
}

impl<T> RingBuffer<T> {
    fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        RingBuffer {
            slots,
            front: 0,
            rear: None,
            count: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Caller guarantees the ring is not full
    fn push_rear(&mut self, value: T) {
        let next = match self.rear {
            Some(rear) => (rear + 1) % self.capacity(),
            None => self.front,
        };
        self.slots[next] = Some(value);
        self.rear = Some(next);
        self.count += 1;
    }

    fn pop_front(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        let value = self.slots[self.front].take();
        self.front = (self.front + 1) % self.capacity();
        self.count -= 1;
        if self.count == 0 {
            self.front = 0;
            self.rear = None;
        }
        value
    }

    fn front(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        self.slots[self.front].as_ref()
    }

    fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.front = 0;
        self.rear = None;
        self.count = 0;
    }

    /// Occupied slots from front to rear
    fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let capacity = self.capacity();
        (0..self.count).filter_map(move |i| self.slots[(self.front + i) % capacity].as_ref())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Storage<T> {
    Sequence(VecDeque<T>),
    Ring(RingBuffer<T>),
    Ordered(Vec<PriorityEntry<T>>),
}

/// Capacity-bounded queue; see the module docs for the variants
#[derive(Debug, Clone)]
pub struct Queue<T> {
    variant: QueueVariant,
    capacity: usize,
    default_priority: i64,
    storage: Storage<T>,
    scheduler: Option<PriorityScheduler>,
}

impl<T> Queue<T> {
    pub fn new(capacity: usize, variant: QueueVariant) -> Self {
        let storage = match variant {
            QueueVariant::Linear | QueueVariant::Deque => Storage::Sequence(VecDeque::new()),
            QueueVariant::Circular => Storage::Ring(RingBuffer::new(capacity)),
            QueueVariant::Priority => Storage::Ordered(Vec::new()),
        };
        let scheduler = (variant == QueueVariant::Priority).then(PriorityScheduler::new);

        Queue {
            variant,
            capacity,
            default_priority: DEFAULT_PRIORITY,
            storage,
            scheduler,
        }
    }

    /// Override the priority assumed by `enqueue` when none is given
    pub fn with_default_priority(mut self, priority: i64) -> Self {
        self.default_priority = priority;
        self
    }

    pub fn variant(&self) -> QueueVariant {
        self.variant
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert at the rear, or at the ordered position for a priority queue
    ///
    /// `priority` is ignored by every variant except `Priority`.
    pub fn enqueue(&mut self, value: T, priority: Option<i64>) -> Result<(), StructureError> {
        if self.is_full() {
            return Err(StructureError::overflow(ContainerKind::Queue, self.capacity));
        }

        match &mut self.storage {
            Storage::Sequence(elements) => elements.push_back(value),
            Storage::Ring(ring) => ring.push_rear(value),
            Storage::Ordered(entries) => {
                let priority = priority.unwrap_or(self.default_priority);
                // First slot whose priority is strictly greater keeps ties in arrival order
                let index = entries.partition_point(|entry| entry.priority <= priority);
                entries.insert(index, PriorityEntry { value, priority });
            }
        }
        Ok(())
    }

    /// Remove and return the front element
    pub fn dequeue(&mut self) -> Result<T, StructureError> {
        let value = match &mut self.storage {
            Storage::Sequence(elements) => elements.pop_front(),
            Storage::Ring(ring) => ring.pop_front(),
            Storage::Ordered(entries) => {
                if entries.is_empty() {
                    None
                } else {
                    Some(entries.remove(0).value)
                }
            }
        };
        value.ok_or_else(|| StructureError::underflow(ContainerKind::Queue))
    }

    /// Insert at the front (deque only)
    pub fn enqueue_front(&mut self, value: T) -> Result<(), StructureError> {
        self.require(QueueVariant::Deque, "enqueue_front")?;
        if self.is_full() {
            return Err(StructureError::overflow(ContainerKind::Deque, self.capacity));
        }
        if let Storage::Sequence(elements) = &mut self.storage {
            elements.push_front(value);
        }
        Ok(())
    }

    /// Remove and return the rear element (deque only)
    pub fn dequeue_rear(&mut self) -> Result<T, StructureError> {
        self.require(QueueVariant::Deque, "dequeue_rear")?;
        let value = match &mut self.storage {
            Storage::Sequence(elements) => elements.pop_back(),
            _ => None,
        };
        value.ok_or_else(|| StructureError::underflow(ContainerKind::Deque))
    }

    /// Front element, or `None` when empty
    pub fn peek(&self) -> Option<&T> {
        match &self.storage {
            Storage::Sequence(elements) => elements.front(),
            Storage::Ring(ring) => ring.front(),
            Storage::Ordered(entries) => entries.first().map(|entry| &entry.value),
        }
    }

    pub fn size(&self) -> usize {
        match &self.storage {
            Storage::Sequence(elements) => elements.len(),
            Storage::Ring(ring) => ring.count,
            Storage::Ordered(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn is_full(&self) -> bool {
        self.size() >= self.capacity
    }

    /// Remove every element; the circular ring is refilled with empty slots
    ///
    /// The scheduler's process list is not touched.
    pub fn clear(&mut self) {
        match &mut self.storage {
            Storage::Sequence(elements) => elements.clear(),
            Storage::Ring(ring) => ring.clear(),
            Storage::Ordered(entries) => entries.clear(),
        }
    }

    /// Front-to-rear iterator over the queued values
    pub fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        match &self.storage {
            Storage::Sequence(elements) => Box::new(elements.iter()),
            Storage::Ring(ring) => Box::new(ring.iter()),
            Storage::Ordered(entries) => Box::new(entries.iter().map(|entry| &entry.value)),
        }
    }

    /// Values paired with their priorities (priority variant only)
    pub fn entries(&self) -> Option<&[PriorityEntry<T>]> {
        match &self.storage {
            Storage::Ordered(entries) => Some(entries),
            _ => None,
        }
    }

    /// Process list of a priority queue
    pub fn scheduler(&self) -> Result<&PriorityScheduler, StructureError> {
        self.scheduler
            .as_ref()
            .ok_or(StructureError::UnsupportedOperation {
                operation: "scheduler",
                required: QueueVariant::Priority.title(),
            })
    }

    /// Mutable process list of a priority queue
    pub fn scheduler_mut(&mut self) -> Result<&mut PriorityScheduler, StructureError> {
        self.scheduler
            .as_mut()
            .ok_or(StructureError::UnsupportedOperation {
                operation: "scheduler",
                required: QueueVariant::Priority.title(),
            })
    }

    fn require(
        &self,
        variant: QueueVariant,
        operation: &'static str,
    ) -> Result<(), StructureError> {
        if self.variant == variant {
            Ok(())
        } else {
            Err(StructureError::UnsupportedOperation {
                operation,
                required: variant.title(),
            })
        }
    }
}

impl<T: Clone> Queue<T> {
    /// Front-to-rear copy of the queued values
    ///
    /// For the circular variant this walks `count` slots from `front`, so the
    /// order is arrival order regardless of wraparound.
    pub fn to_list(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Ring buffer view (circular variant only)
    pub fn circular_state(&self) -> Option<CircularState<T>> {
        match &self.storage {
            Storage::Ring(ring) => Some(CircularState {
                elements: ring.slots.clone(),
                front: ring.front,
                rear: ring.rear,
                count: ring.count,
                capacity: self.capacity,
            }),
            _ => None,
        }
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, QueueVariant::Linear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_linear_fifo() {
        let mut queue = Queue::new(3, QueueVariant::Linear);
        queue.enqueue(1, None).unwrap();
        queue.enqueue(2, None).unwrap();
        queue.enqueue(3, None).unwrap();

        let err = queue.enqueue(4, None).unwrap_err();
        assert_eq!(err.to_string(), "Queue overflow");

        assert_eq!(queue.peek(), Some(&1));
        assert_eq!(queue.dequeue().unwrap(), 1);
        assert_eq!(queue.to_list(), vec![2, 3]);
    }

    #[test]
    fn test_dequeue_empty_underflows() {
        for variant in QueueVariant::ALL {
            let mut queue: Queue<i32> = Queue::new(2, variant);
            let err = queue.dequeue().unwrap_err();
            assert!(err.is_underflow(), "{variant}");
            assert_eq!(queue.peek(), None);
        }
    }

    #[test]
    fn test_circular_wraparound() {
        let mut queue = Queue::new(3, QueueVariant::Circular);
        queue.enqueue('a', None).unwrap();
        queue.enqueue('b', None).unwrap();
        queue.enqueue('c', None).unwrap();
        assert_eq!(queue.dequeue().unwrap(), 'a');
        assert_eq!(queue.dequeue().unwrap(), 'b');
        queue.enqueue('d', None).unwrap();
        queue.enqueue('e', None).unwrap();

        assert_eq!(queue.to_list(), vec!['c', 'd', 'e']);
        assert_eq!(queue.peek(), Some(&'c'));

        let state = queue.circular_state().unwrap();
        assert_eq!(state.elements, vec![Some('d'), Some('e'), Some('c')]);
        assert_eq!(state.front, 2);
        assert_eq!(state.rear, Some(1));
        assert_eq!(state.count, 3);
    }

    #[test]
    fn test_circular_resets_indices_when_drained() {
        let mut queue = Queue::new(2, QueueVariant::Circular);
        queue.enqueue(1, None).unwrap();
        queue.dequeue().unwrap();

        let state = queue.circular_state().unwrap();
        assert_eq!(state.front, 0);
        assert_eq!(state.rear, None);
        assert_eq!(state.elements, vec![None, None]);
    }

    #[test]
    fn test_circular_clear() {
        let mut queue = Queue::new(3, QueueVariant::Circular);
        queue.enqueue(7, None).unwrap();
        queue.enqueue(8, None).unwrap();
        queue.dequeue().unwrap();
        queue.clear();

        let state = queue.circular_state().unwrap();
        assert_eq!(state.elements, vec![None, None, None]);
        assert_eq!((state.front, state.rear, state.count), (0, None, 0));
        assert!(queue.to_list().is_empty());
    }

    #[test]
    fn test_deque_both_ends() {
        let mut deque = Queue::new(3, QueueVariant::Deque);
        deque.enqueue(2, None).unwrap();
        deque.enqueue_front(1).unwrap();
        deque.enqueue(3, None).unwrap();
        assert_eq!(deque.to_list(), vec![1, 2, 3]);

        assert_eq!(deque.enqueue_front(0).unwrap_err().to_string(), "Deque overflow");
        assert_eq!(deque.dequeue_rear().unwrap(), 3);
        assert_eq!(deque.dequeue().unwrap(), 1);
        assert_eq!(deque.dequeue_rear().unwrap(), 2);
        assert_eq!(deque.dequeue_rear().unwrap_err().to_string(), "Deque underflow");
    }

    #[test]
    fn test_deque_operations_rejected_elsewhere() {
        for variant in [QueueVariant::Linear, QueueVariant::Circular, QueueVariant::Priority] {
            let mut queue = Queue::new(3, variant);
            let err = queue.enqueue_front(1).unwrap_err();
            assert!(matches!(err, StructureError::UnsupportedOperation { .. }));
            assert_eq!(err.to_string(), "This operation is only available for Deque");
            assert!(queue.dequeue_rear().is_err());
        }
    }

    #[test]
    fn test_priority_is_stable() {
        let mut queue = Queue::new(10, QueueVariant::Priority);
        queue.enqueue("five", Some(5)).unwrap();
        queue.enqueue("one-a", Some(1)).unwrap();
        queue.enqueue("three", Some(3)).unwrap();
        queue.enqueue("one-b", Some(1)).unwrap();

        let mut drained = Vec::new();
        while let Ok(value) = queue.dequeue() {
            drained.push(value);
        }
        assert_eq!(drained, vec!["one-a", "one-b", "three", "five"]);
    }

    #[test]
    fn test_priority_defaults() {
        let mut queue = Queue::new(5, QueueVariant::Priority).with_default_priority(4);
        queue.enqueue('x', None).unwrap();
        queue.enqueue('y', Some(0)).unwrap();

        let entries = queue.entries().unwrap();
        assert_eq!(entries[0], PriorityEntry { value: 'y', priority: 0 });
        assert_eq!(entries[1], PriorityEntry { value: 'x', priority: 4 });
    }

    #[test]
    fn test_scheduler_only_on_priority_queue() {
        let mut linear: Queue<i32> = Queue::new(3, QueueVariant::Linear);
        assert!(linear.scheduler_mut().is_err());

        let mut priority: Queue<i32> = Queue::new(3, QueueVariant::Priority);
        priority.scheduler_mut().unwrap().add_process("P1", 0, 3, 1).unwrap();
        priority.clear();
        assert_eq!(priority.scheduler().unwrap().processes().len(), 1);
    }

    proptest! {
        #[test]
        fn prop_circular_to_list_matches_fifo(ops in proptest::collection::vec(proptest::option::of(0u8..50), 0..80)) {
            let mut queue = Queue::new(5, QueueVariant::Circular);
            let mut model: VecDeque<u8> = VecDeque::new();

            for op in ops {
                match op {
                    Some(value) if model.len() < 5 => {
                        queue.enqueue(value, None).unwrap();
                        model.push_back(value);
                    }
                    Some(value) => prop_assert!(queue.enqueue(value, None).is_err()),
                    None => match model.pop_front() {
                        Some(expected) => prop_assert_eq!(queue.dequeue().unwrap(), expected),
                        None => prop_assert!(queue.dequeue().is_err()),
                    },
                }
                let listed = queue.to_list();
                prop_assert_eq!(listed.len(), queue.size());
                prop_assert_eq!(listed, model.iter().copied().collect::<Vec<_>>());
            }
        }

        #[test]
        fn prop_priority_drains_sorted_and_stable(priorities in proptest::collection::vec(0i64..4, 0..10)) {
            let mut queue = Queue::new(10, QueueVariant::Priority);
            for (index, priority) in priorities.iter().enumerate() {
                queue.enqueue(index, Some(*priority)).unwrap();
            }

            let mut expected: Vec<usize> = (0..priorities.len()).collect();
            expected.sort_by_key(|&index| priorities[index]);

            let mut drained = Vec::new();
            while let Ok(index) = queue.dequeue() {
                drained.push(index);
            }
            prop_assert_eq!(drained, expected);
        }
    }
}
