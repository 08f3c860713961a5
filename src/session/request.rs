//! Request and response envelopes
//!
//! Requests are plain JSON objects tagged by `target`:
//!
//! ```text
//! {"target":"stack","operation":"push","value":5}
//! {"target":"queue","queue_type":"priority","operation":"enqueue","value":"job","priority":1}
//! {"target":"expression","expression":"(1 + 2) * 3"}
//! {"target":"scheduler","action":"add_process","process_id":"A","arrival_time":0,"burst_time":5,"priority":2}
//! ```
//!
//! Every request produces a [`Response`]: `{"result":"success","data":...}`
//! or `{"result":"error","message":...}`.

use crate::config::DEFAULT_INSTANCE;
use crate::structures::QueueVariant;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

fn default_instance() -> String {
    DEFAULT_INSTANCE.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackOperation {
    Push,
    Pop,
    Peek,
    Size,
    IsEmpty,
    IsFull,
    Clear,
    #[serde(alias = "get_all")]
    ToList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueOperation {
    Enqueue,
    Dequeue,
    EnqueueFront,
    DequeueRear,
    Peek,
    Size,
    IsEmpty,
    IsFull,
    Clear,
    #[serde(alias = "get_all")]
    ToList,
    /// Raw ring buffer of a circular queue
    GetState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerAction {
    AddProcess,
    #[serde(alias = "calculate_priority_schedule")]
    CalculateSchedule,
    #[serde(alias = "reset")]
    ResetScheduler,
    GetProcesses,
    GetGanttChart,
    GetExecutionSteps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum Request {
    Stack {
        #[serde(default = "default_instance")]
        instance: String,
        operation: StackOperation,
        #[serde(default)]
        value: Value,
    },
    Queue {
        #[serde(default = "default_instance")]
        instance: String,
        #[serde(default)]
        queue_type: QueueVariant,
        operation: QueueOperation,
        #[serde(default)]
        value: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<i64>,
    },
    Expression {
        expression: String,
    },
    Scheduler {
        #[serde(default = "default_instance")]
        instance: String,
        action: SchedulerAction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        process_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arrival_time: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        burst_time: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<i64>,
    },
}

impl Request {
    pub fn stack(operation: StackOperation, value: Value) -> Self {
        Request::Stack {
            instance: default_instance(),
            operation,
            value,
        }
    }

    pub fn queue(
        variant: QueueVariant,
        operation: QueueOperation,
        value: Value,
        priority: Option<i64>,
    ) -> Self {
        Request::Queue {
            instance: default_instance(),
            queue_type: variant,
            operation,
            value,
            priority,
        }
    }

    pub fn expression(expression: impl Into<String>) -> Self {
        Request::Expression {
            expression: expression.into(),
        }
    }

    pub fn scheduler(action: SchedulerAction) -> Self {
        Request::Scheduler {
            instance: default_instance(),
            action,
            process_id: None,
            arrival_time: None,
            burst_time: None,
            priority: None,
        }
    }

    pub fn add_process(
        id: impl Into<String>,
        arrival_time: u64,
        burst_time: u64,
        priority: i64,
    ) -> Self {
        Request::Scheduler {
            instance: default_instance(),
            action: SchedulerAction::AddProcess,
            process_id: Some(id.into()),
            arrival_time: Some(arrival_time),
            burst_time: Some(burst_time),
            priority: Some(priority),
        }
    }
}

fn operation_name<T: Serialize>(operation: &T) -> String {
    match serde_json::to_value(operation) {
        Ok(Value::String(name)) => name,
        _ => "?".to_string(),
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Stack {
                instance,
                operation,
                value,
            } => {
                write!(f, "stack[{}].{}", instance, operation_name(operation))?;
                if *operation == StackOperation::Push {
                    write!(f, " {}", value)?;
                }
                Ok(())
            }
            Request::Queue {
                instance,
                queue_type,
                operation,
                value,
                priority,
            } => {
                write!(f, "{}[{}].{}", queue_type, instance, operation_name(operation))?;
                if matches!(operation, QueueOperation::Enqueue | QueueOperation::EnqueueFront) {
                    write!(f, " {}", value)?;
                }
                if let (QueueVariant::Priority, QueueOperation::Enqueue, Some(p)) =
                    (queue_type, operation, priority)
                {
                    write!(f, " (priority {})", p)?;
                }
                Ok(())
            }
            Request::Expression { expression } => write!(f, "evaluate {}", expression),
            Request::Scheduler {
                instance,
                action,
                process_id,
                ..
            } => {
                write!(f, "scheduler[{}].{}", instance, operation_name(action))?;
                if let Some(id) = process_id {
                    write!(f, " {}", id)?;
                }
                Ok(())
            }
        }
    }
}

/// Success or error envelope for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Response {
    Success { data: Value },
    Error { message: String },
}

impl Response {
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    /// One-line description for logs and the history pane
    pub fn summary(&self) -> String {
        match self {
            Response::Success { data: Value::String(text) } => text.clone(),
            Response::Success { data } => data.to_string(),
            Response::Error { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_stack_request_with_defaults() {
        let request: Request = serde_json::from_value(json!({
            "target": "stack",
            "operation": "get_all"
        }))
        .unwrap();

        assert_eq!(
            request,
            Request::Stack {
                instance: "default".to_string(),
                operation: StackOperation::ToList,
                value: Value::Null,
            }
        );
    }

    #[test]
    fn test_parse_scheduler_request() {
        let request: Request = serde_json::from_value(json!({
            "target": "scheduler",
            "action": "add_process",
            "process_id": "P1",
            "arrival_time": 0,
            "burst_time": 4,
            "priority": 2
        }))
        .unwrap();

        assert_eq!(request, Request::add_process("P1", 0, 4, 2));
        assert_eq!(request.to_string(), "scheduler[default].add_process P1");
    }

    #[test]
    fn test_queue_request_display() {
        let request = Request::queue(
            QueueVariant::Priority,
            QueueOperation::Enqueue,
            json!("job"),
            Some(1),
        );
        assert_eq!(request.to_string(), "priority[default].enqueue \"job\" (priority 1)");
    }

    #[test]
    fn test_response_envelope() {
        let ok = Response::Success { data: json!([1, 2]) };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"result": "success", "data": [1, 2]})
        );

        let err = Response::Error {
            message: "Stack underflow".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"result": "error", "message": "Stack underflow"})
        );
        assert_eq!(err.summary(), "Stack underflow");
    }
}
