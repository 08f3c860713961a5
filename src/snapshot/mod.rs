// Snapshot management for stepping back and forth through a session

use crate::errors::Error;
use crate::expression::Evaluation;
use crate::scheduler::ScheduleReport;
use crate::session::{QueueKey, Request, Response};
use crate::structures::{Queue, Stack};
use serde_json::Value;

/// Rough per-element cost used by [`Snapshot::estimated_size`]
const ELEMENT_ESTIMATE: usize = 48;

/// Rough cost of the log line a request adds
const LOG_LINE_ESTIMATE: usize = 80;

/// Log of every request executed so far
#[derive(Debug, Clone, Default)]
pub struct OperationLog {
    pub lines: Vec<LogLine>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines recorded before the first `len` requests
    pub fn upto(&self, len: usize) -> &[LogLine] {
        &self.lines[..len.min(self.lines.len())]
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop every line past the first `len`
    pub fn truncate(&mut self, len: usize) {
        self.lines.truncate(len);
    }

    pub fn record(&mut self, step: usize, request: &Request, response: &Response) {
        self.lines.push(LogLine {
            step,
            request: request.to_string(),
            outcome: response.summary(),
            success: response.is_success(),
        });
    }
}

/// One executed request and its outcome
#[derive(Debug, Clone)]
pub struct LogLine {
    pub step: usize,
    pub request: String,
    pub outcome: String,
    pub success: bool,
}

/// State of every instance after one request
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Number of requests executed when the snapshot was taken
    pub step: usize,
    /// `None` for the initial, empty snapshot
    pub request: Option<Request>,
    pub response: Option<Response>,
    /// Sorted by instance name
    pub stacks: Vec<(String, Stack<Value>)>,
    /// Sorted by instance name, then variant
    pub queues: Vec<(QueueKey, Queue<Value>)>,
    pub evaluation: Option<Evaluation>,
    pub schedule: Option<ScheduleReport>,
    /// Length of the session's operation log when the snapshot was taken
    pub log_len: usize,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // This is a rough estimate
        let stacks: usize = self
            .stacks
            .iter()
            .map(|(name, stack)| name.len() + stack.size() * ELEMENT_ESTIMATE)
            .sum();

        let queues: usize = self
            .queues
            .iter()
            .map(|(key, queue)| {
                let processes = queue
                    .scheduler()
                    .map(|s| s.processes().len() + s.gantt_chart().len())
                    .unwrap_or(0);
                key.instance.len() + (queue.size() + processes) * ELEMENT_ESTIMATE
            })
            .sum();

        let evaluation = self.evaluation.as_ref().map_or(0, |e| {
            e.steps
                .iter()
                .map(|step| step.action.len() + step.stack_snapshot.len() * 8)
                .sum::<usize>()
        });

        let schedule = self.schedule.as_ref().map_or(0, |s| {
            s.execution_steps.iter().map(String::len).sum::<usize>()
                + (s.processes.len() + s.gantt_chart.len()) * ELEMENT_ESTIMATE
        });

        // The log is shared; only the line this request added is charged
        let log = if self.request.is_some() { LOG_LINE_ESTIMATE } else { 0 };

        stacks + queues + evaluation + schedule + log
    }
}

/// Manages the history of snapshots
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), Error> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(Error::SnapshotLimitExceeded {
                current: self.current_memory,
                requested: snapshot_size,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}
