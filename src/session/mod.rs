//! Instance registry and request dispatcher
//!
//! A [`Session`] owns every structure a caller works with. Instances are
//! keyed by name (and, for queues, by variant) and created on first use with
//! the capacity from [`Config`]. Each [`Request`] runs synchronously to
//! completion, is turned into a [`Response`] envelope, and leaves a
//! [`Snapshot`] behind so the whole session can be replayed step by step.
//!
//! Sessions are not shared: a caller serving concurrent clients wraps one
//! in a mutex or gives each client its own.

pub mod request;
pub mod script;

pub use request::{QueueOperation, Request, Response, SchedulerAction, StackOperation};

use crate::config::Config;
use crate::errors::{Error, Result};
use crate::expression::{Evaluation, ExpressionEngine};
use crate::scheduler::ScheduleReport;
use crate::snapshot::{LogLine, OperationLog, Snapshot, SnapshotManager};
use crate::structures::{Queue, QueueVariant, Stack};
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;

/// Registry key for a queue instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueKey {
    pub instance: String,
    pub variant: QueueVariant,
}

impl QueueKey {
    pub fn new(instance: impl Into<String>, variant: QueueVariant) -> Self {
        QueueKey {
            instance: instance.into(),
            variant,
        }
    }
}

impl fmt::Display for QueueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.variant.title(), self.instance)
    }
}

pub struct Session {
    config: Config,
    engine: ExpressionEngine,
    stacks: FxHashMap<String, Stack<Value>>,
    queues: FxHashMap<QueueKey, Queue<Value>>,
    last_evaluation: Option<Evaluation>,
    last_schedule: Option<ScheduleReport>,
    log: OperationLog,
    history: SnapshotManager,
    history_position: usize,
    record_history: bool,
    executed: usize,
}

impl Session {
    /// Create an empty session and record its initial snapshot
    pub fn new(config: Config) -> Result<Self> {
        let mut session = Session {
            engine: ExpressionEngine::new(config.expression_capacity),
            history: SnapshotManager::new(config.snapshot_limit),
            config,
            stacks: FxHashMap::default(),
            queues: FxHashMap::default(),
            last_evaluation: None,
            last_schedule: None,
            log: OperationLog::new(),
            history_position: 0,
            record_history: true,
            executed: 0,
        };
        session.take_snapshot(None, None)?;
        Ok(session)
    }

    /// Create a session that keeps only its initial snapshot
    ///
    /// Requests never fail for lack of history space; use this when nothing
    /// will step back through the session.
    pub fn without_history(config: Config) -> Result<Self> {
        let mut session = Self::new(config)?;
        session.record_history = false;
        Ok(session)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute one request
    ///
    /// Failures of the request itself come back as [`Response::Error`]; the
    /// outer `Err` is reserved for the session running out of history space,
    /// in which case the request's effects are rolled back.
    pub fn execute(&mut self, request: Request) -> Result<Response> {
        tracing::debug!(request = %request, "executing request");

        let response = match self.dispatch(&request) {
            Ok(data) => Response::Success { data },
            Err(e) => {
                tracing::warn!(request = %request, error = %e, "request failed");
                Response::Error {
                    message: e.to_string(),
                }
            }
        };

        self.executed += 1;
        self.log.record(self.executed, &request, &response);
        if self.record_history {
            if let Err(e) = self.take_snapshot(Some(request), Some(response.clone())) {
                tracing::warn!(error = %e, "history full, rolling back request");
                self.restore_last_snapshot();
                return Err(e);
            }
        }
        Ok(response)
    }

    /// Execute requests in order, stopping only if history space runs out
    pub fn run_script(
        &mut self,
        requests: impl IntoIterator<Item = Request>,
    ) -> Result<Vec<Response>> {
        requests
            .into_iter()
            .map(|request| self.execute(request))
            .collect()
    }

    fn dispatch(&mut self, request: &Request) -> Result<Value> {
        match request {
            Request::Stack {
                instance,
                operation,
                value,
            } => self.stack_operation(instance, *operation, value),
            Request::Queue {
                instance,
                queue_type,
                operation,
                value,
                priority,
            } => self.queue_operation(instance, *queue_type, *operation, value, *priority),
            Request::Expression { expression } => self.evaluate_expression(expression),
            Request::Scheduler {
                instance,
                action,
                process_id,
                arrival_time,
                burst_time,
                priority,
            } => {
                let process = ProcessArgs {
                    id: process_id.as_deref(),
                    arrival_time: *arrival_time,
                    burst_time: *burst_time,
                    priority: *priority,
                };
                self.scheduler_operation(instance, *action, process)
            }
        }
    }

    fn stack_operation(
        &mut self,
        instance: &str,
        operation: StackOperation,
        value: &Value,
    ) -> Result<Value> {
        let stack = self.stack_mut(instance);
        let data = match operation {
            StackOperation::Push => {
                stack.push(value.clone())?;
                json!(true)
            }
            StackOperation::Pop => stack.pop()?,
            StackOperation::Peek => stack.peek().cloned().unwrap_or(Value::Null),
            StackOperation::Size => json!(stack.size()),
            StackOperation::IsEmpty => json!(stack.is_empty()),
            StackOperation::IsFull => json!(stack.is_full()),
            StackOperation::Clear => {
                stack.clear();
                json!("Stack cleared")
            }
            StackOperation::ToList => Value::Array(stack.to_list()),
        };
        Ok(data)
    }

    fn queue_operation(
        &mut self,
        instance: &str,
        variant: QueueVariant,
        operation: QueueOperation,
        value: &Value,
        priority: Option<i64>,
    ) -> Result<Value> {
        let queue = self.queue_mut(instance, variant);
        let data = match operation {
            QueueOperation::Enqueue => {
                queue.enqueue(value.clone(), priority)?;
                json!(true)
            }
            QueueOperation::Dequeue => queue.dequeue()?,
            QueueOperation::EnqueueFront => {
                queue.enqueue_front(value.clone())?;
                json!(true)
            }
            QueueOperation::DequeueRear => queue.dequeue_rear()?,
            QueueOperation::Peek => queue.peek().cloned().unwrap_or(Value::Null),
            QueueOperation::Size => json!(queue.size()),
            QueueOperation::IsEmpty => json!(queue.is_empty()),
            QueueOperation::IsFull => json!(queue.is_full()),
            QueueOperation::Clear => {
                queue.clear();
                json!("Queue cleared")
            }
            QueueOperation::ToList => match queue.entries() {
                Some(entries) => to_json(entries)?,
                None => Value::Array(queue.to_list()),
            },
            QueueOperation::GetState => match queue.circular_state() {
                Some(state) => to_json(&state)?,
                None => Value::Null,
            },
        };
        Ok(data)
    }

    fn evaluate_expression(&mut self, expression: &str) -> Result<Value> {
        self.last_evaluation = None;
        let evaluation = self.engine.evaluate(expression)?;
        let steps: Vec<Value> = evaluation
            .steps
            .iter()
            .map(|step| {
                let stack: Vec<Value> =
                    step.stack_snapshot.iter().copied().map(number_to_json).collect();
                json!({ "action": step.action, "stack": stack })
            })
            .collect();
        let data = json!({
            "postfix": evaluation.postfix,
            "evaluation_steps": steps,
            "final_result": number_to_json(evaluation.result),
        });
        self.last_evaluation = Some(evaluation);
        Ok(data)
    }

    fn scheduler_operation(
        &mut self,
        instance: &str,
        action: SchedulerAction,
        process: ProcessArgs<'_>,
    ) -> Result<Value> {
        let capacity = self.config.capacity;
        let default_priority = self.config.default_priority;
        let scheduler = self
            .queues
            .entry(QueueKey::new(instance, QueueVariant::Priority))
            .or_insert_with(|| {
                Queue::new(capacity, QueueVariant::Priority).with_default_priority(default_priority)
            })
            .scheduler_mut()?;

        let data = match action {
            SchedulerAction::AddProcess => {
                let id = process.id.ok_or(missing("process_id"))?;
                let arrival_time = process.arrival_time.ok_or(missing("arrival_time"))?;
                let burst_time = process.burst_time.ok_or(missing("burst_time"))?;
                let priority = process.priority.ok_or(missing("priority"))?;
                scheduler.add_process(id, arrival_time, burst_time, priority)?;
                json!(format!("Process {} added", id))
            }
            SchedulerAction::CalculateSchedule => {
                let report = scheduler.calculate_schedule()?;
                let data = to_json(&report)?;
                self.last_schedule = Some(report);
                data
            }
            SchedulerAction::ResetScheduler => {
                scheduler.reset();
                self.last_schedule = None;
                json!("Scheduler reset")
            }
            SchedulerAction::GetProcesses => to_json(scheduler.processes())?,
            SchedulerAction::GetGanttChart => to_json(scheduler.gantt_chart())?,
            SchedulerAction::GetExecutionSteps => json!(scheduler.execution_summary()),
        };
        Ok(data)
    }

    /// Stack named `instance`, created on first use
    pub fn stack_mut(&mut self, instance: &str) -> &mut Stack<Value> {
        let capacity = self.config.capacity;
        self.stacks
            .entry(instance.to_string())
            .or_insert_with(|| Stack::new(capacity))
    }

    /// Queue named `instance` of `variant`, created on first use
    pub fn queue_mut(&mut self, instance: &str, variant: QueueVariant) -> &mut Queue<Value> {
        let capacity = self.config.capacity;
        let default_priority = self.config.default_priority;
        self.queues
            .entry(QueueKey::new(instance, variant))
            .or_insert_with(|| {
                Queue::new(capacity, variant).with_default_priority(default_priority)
            })
    }

    pub fn stack(&self, instance: &str) -> Option<&Stack<Value>> {
        self.stacks.get(instance)
    }

    pub fn queue(&self, instance: &str, variant: QueueVariant) -> Option<&Queue<Value>> {
        self.queues.get(&QueueKey::new(instance, variant))
    }

    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.last_evaluation.as_ref()
    }

    pub fn last_schedule(&self) -> Option<&ScheduleReport> {
        self.last_schedule.as_ref()
    }

    /// Number of requests executed
    pub fn executed(&self) -> usize {
        self.executed
    }

    fn take_snapshot(
        &mut self,
        request: Option<Request>,
        response: Option<Response>,
    ) -> Result<()> {
        let mut stacks: Vec<(String, Stack<Value>)> = self
            .stacks
            .iter()
            .map(|(name, stack)| (name.clone(), stack.clone()))
            .collect();
        stacks.sort_by(|a, b| a.0.cmp(&b.0));

        let mut queues: Vec<(QueueKey, Queue<Value>)> = self
            .queues
            .iter()
            .map(|(key, queue)| (key.clone(), queue.clone()))
            .collect();
        queues.sort_by(|a, b| a.0.cmp(&b.0));

        let snapshot = Snapshot {
            step: self.executed,
            request,
            response,
            stacks,
            queues,
            evaluation: self.last_evaluation.clone(),
            schedule: self.last_schedule.clone(),
            log_len: self.log.len(),
        };

        self.history.push(snapshot)?;
        self.history_position = self.history.len() - 1;
        Ok(())
    }

    /// Put every instance back the way the newest snapshot recorded it
    fn restore_last_snapshot(&mut self) {
        let Some(last) = self.history.last() else {
            return;
        };
        self.stacks = last.stacks.iter().cloned().collect();
        self.queues = last.queues.iter().cloned().collect();
        self.last_evaluation = last.evaluation.clone();
        self.last_schedule = last.schedule.clone();
        self.executed = last.step;
        self.log.truncate(last.log_len);
    }

    /// Every request executed so far, oldest first
    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    /// Log lines visible at `snapshot`
    pub fn log_at(&self, snapshot: &Snapshot) -> &[LogLine] {
        self.log.upto(snapshot.log_len)
    }

    // History navigation

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &SnapshotManager {
        &self.history
    }

    /// Snapshot at the current history position
    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        self.history.get(self.history_position)
    }

    pub fn step_forward(&mut self) -> Result<()> {
        if self.history_position + 1 >= self.history.len() {
            return Err(Error::History("Already at the last step".to_string()));
        }
        self.history_position += 1;
        Ok(())
    }

    pub fn step_backward(&mut self) -> Result<()> {
        if self.history_position == 0 {
            return Err(Error::History("Already at the first step".to_string()));
        }
        self.history_position -= 1;
        Ok(())
    }

    pub fn rewind_to_start(&mut self) {
        self.history_position = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.history_position = self.history.len().saturating_sub(1);
    }
}

/// Process fields carried by a scheduler request
struct ProcessArgs<'a> {
    id: Option<&'a str>,
    arrival_time: Option<u64>,
    burst_time: Option<u64>,
    priority: Option<i64>,
}

fn missing(field: &'static str) -> Error {
    Error::MissingField {
        field,
        operation: "add_process",
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::Serialization(e.to_string()))
}

/// Whole numbers are reported as integers, everything else as floats
fn number_to_json(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        json!(n as i64)
    } else {
        json!(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Config::default()).unwrap()
    }

    fn queue_request(variant: QueueVariant, operation: QueueOperation, value: Value) -> Request {
        Request::queue(variant, operation, value, None)
    }

    #[test]
    fn test_stack_requests() {
        let mut session = session();
        session.execute(Request::stack(StackOperation::Push, json!(5))).unwrap();
        session.execute(Request::stack(StackOperation::Push, json!("six"))).unwrap();

        let listed = session.execute(Request::stack(StackOperation::ToList, Value::Null)).unwrap();
        assert_eq!(listed, Response::Success { data: json!([5, "six"]) });

        let popped = session.execute(Request::stack(StackOperation::Pop, Value::Null)).unwrap();
        assert_eq!(popped, Response::Success { data: json!("six") });
    }

    #[test]
    fn test_errors_become_envelopes() {
        let mut session = session();
        let response = session.execute(Request::stack(StackOperation::Pop, Value::Null)).unwrap();
        assert_eq!(
            response,
            Response::Error {
                message: "Stack underflow".to_string()
            }
        );

        let response = session
            .execute(queue_request(QueueVariant::Linear, QueueOperation::EnqueueFront, json!(1)))
            .unwrap();
        assert!(!response.is_success());
    }

    #[test]
    fn test_queue_variants_are_separate_instances() {
        let mut session = session();
        session
            .execute(queue_request(QueueVariant::Linear, QueueOperation::Enqueue, json!(1)))
            .unwrap();
        session
            .execute(queue_request(QueueVariant::Circular, QueueOperation::Enqueue, json!(2)))
            .unwrap();

        assert_eq!(session.queue("default", QueueVariant::Linear).unwrap().size(), 1);
        let circular = session.queue("default", QueueVariant::Circular).unwrap();
        assert_eq!(circular.to_list(), vec![json!(2)]);
        assert!(session.queue("default", QueueVariant::Deque).is_none());
    }

    #[test]
    fn test_priority_to_list_includes_priorities() {
        let mut session = session();
        for (value, priority) in [("low", 9), ("high", 1)] {
            session
                .execute(Request::queue(
                    QueueVariant::Priority,
                    QueueOperation::Enqueue,
                    json!(value),
                    Some(priority),
                ))
                .unwrap();
        }

        let response = session
            .execute(queue_request(QueueVariant::Priority, QueueOperation::ToList, Value::Null))
            .unwrap();
        assert_eq!(
            response,
            Response::Success {
                data: json!([
                    {"value": "high", "priority": 1},
                    {"value": "low", "priority": 9}
                ])
            }
        );
    }

    #[test]
    fn test_expression_response() {
        let mut session = session();
        let response = session.execute(Request::expression("3 + 4 * 2")).unwrap();

        let Response::Success { data } = response else {
            panic!("expected success");
        };
        assert_eq!(data["postfix"], json!("3 4 2 * +"));
        assert_eq!(data["final_result"], json!(11));
        assert_eq!(data["evaluation_steps"].as_array().unwrap().len(), 5);
        assert_eq!(data["evaluation_steps"][3]["stack"], json!([3, 8]));
        assert_eq!(session.last_evaluation().unwrap().result, 11.0);
    }

    #[test]
    fn test_fractional_steps_stay_floats() {
        let mut session = session();
        let response = session.execute(Request::expression("7 / 2 + 1")).unwrap();

        let Response::Success { data } = response else {
            panic!("expected success");
        };
        assert_eq!(data["evaluation_steps"][0]["stack"], json!([7]));
        assert_eq!(data["evaluation_steps"][2]["stack"], json!([3.5]));
        assert_eq!(data["final_result"], json!(4.5));
    }

    #[test]
    fn test_scheduler_missing_field() {
        let mut session = session();
        let mut request = Request::add_process("A", 0, 1, 1);
        if let Request::Scheduler { burst_time, .. } = &mut request {
            *burst_time = None;
        }
        let response = session.execute(request).unwrap();
        assert_eq!(response.summary(), "Missing field 'burst_time' for add_process");
    }

    #[test]
    fn test_history_navigation() {
        let mut session = session();
        session.execute(Request::stack(StackOperation::Push, json!(1))).unwrap();
        session.execute(Request::stack(StackOperation::Push, json!(2))).unwrap();

        assert_eq!(session.total_snapshots(), 3);
        assert_eq!(session.history_position(), 2);
        assert!(session.step_forward().is_err());

        session.rewind_to_start();
        assert!(session.current_snapshot().unwrap().stacks.is_empty());
        assert!(session.step_backward().is_err());

        session.step_forward().unwrap();
        let snapshot = session.current_snapshot().unwrap();
        assert_eq!(snapshot.stacks[0].1.to_list(), vec![json!(1)]);
        assert_eq!(session.log_at(snapshot).len(), 1);

        session.jump_to_end();
        assert_eq!(session.history_position(), 2);
    }

    #[test]
    fn test_long_script_fits_default_budget() {
        let mut session = session();
        let requests = (0..5000).map(|_| Request::stack(StackOperation::Size, Value::Null));
        let responses = session.run_script(requests).unwrap();

        assert_eq!(responses.len(), 5000);
        assert_eq!(session.total_snapshots(), 5001);
        assert_eq!(session.log().len(), 5000);
        assert!(session.history().memory_usage() < session.history().memory_limit() / 100);
    }

    #[test]
    fn test_without_history_keeps_only_initial_snapshot() {
        let config = Config {
            snapshot_limit: 0,
            ..Config::default()
        };
        let mut session = Session::without_history(config).unwrap();
        for value in 0..3 {
            session.execute(Request::stack(StackOperation::Push, json!(value))).unwrap();
        }

        assert_eq!(session.total_snapshots(), 1);
        assert_eq!(session.executed(), 3);
        assert_eq!(session.log().len(), 3);
        assert_eq!(session.stack("default").unwrap().size(), 3);
    }

    #[test]
    fn test_full_history_rolls_request_back() {
        // Room for the first push (name + one element + its log line) only
        let config = Config {
            snapshot_limit: 200,
            ..Config::default()
        };
        let mut session = Session::new(config).unwrap();
        session.execute(Request::stack(StackOperation::Push, json!(1))).unwrap();

        let err = session
            .execute(Request::stack(StackOperation::Push, json!(2)))
            .unwrap_err();
        assert!(matches!(err, Error::SnapshotLimitExceeded { .. }));

        assert_eq!(session.stack("default").unwrap().to_list(), vec![json!(1)]);
        assert_eq!(session.executed(), 1);
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.total_snapshots(), 2);
    }

    #[test]
    fn test_number_to_json() {
        assert_eq!(number_to_json(11.0), json!(11));
        assert_eq!(number_to_json(-2.0), json!(-2));
        assert_eq!(number_to_json(2.5), json!(2.5));
    }
}
