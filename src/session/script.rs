//! JSON-lines request scripts
//!
//! A script holds one JSON [`Request`] per line. Blank lines and lines
//! starting with `#` or `//` are skipped.

use super::Request;
use crate::errors::{Error, Result};

/// Parse a script into requests, reporting the first bad line
pub fn parse_script(source: &str) -> Result<Vec<Request>> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !(line.is_empty() || line.starts_with('#') || line.starts_with("//"))
        })
        .map(|(index, line)| {
            serde_json::from_str(line.trim()).map_err(|e| Error::InvalidRequest {
                line: index + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Walkthrough of every structure, used when no script is given
pub const DEMO_SCRIPT: &str = r#"
# Stack
{"target":"stack","operation":"push","value":10}
{"target":"stack","operation":"push","value":20}
{"target":"stack","operation":"push","value":30}
{"target":"stack","operation":"peek"}
{"target":"stack","operation":"pop"}
{"target":"stack","operation":"get_all"}

# Linear queue
{"target":"queue","queue_type":"linear","operation":"enqueue","value":"a"}
{"target":"queue","queue_type":"linear","operation":"enqueue","value":"b"}
{"target":"queue","queue_type":"linear","operation":"dequeue"}

# Circular queue wrapping around its ring
{"target":"queue","queue_type":"circular","operation":"enqueue","value":1}
{"target":"queue","queue_type":"circular","operation":"enqueue","value":2}
{"target":"queue","queue_type":"circular","operation":"enqueue","value":3}
{"target":"queue","queue_type":"circular","operation":"dequeue"}
{"target":"queue","queue_type":"circular","operation":"get_state"}

# Deque
{"target":"queue","queue_type":"deque","operation":"enqueue","value":"middle"}
{"target":"queue","queue_type":"deque","operation":"enqueue_front","value":"front"}
{"target":"queue","queue_type":"deque","operation":"enqueue","value":"rear"}
{"target":"queue","queue_type":"deque","operation":"dequeue_rear"}
{"target":"queue","queue_type":"linear","operation":"enqueue_front","value":"nope"}

# Priority queue
{"target":"queue","queue_type":"priority","operation":"enqueue","value":"backup","priority":5}
{"target":"queue","queue_type":"priority","operation":"enqueue","value":"page","priority":1}
{"target":"queue","queue_type":"priority","operation":"enqueue","value":"email","priority":3}
{"target":"queue","queue_type":"priority","operation":"enqueue","value":"alert","priority":1}
{"target":"queue","queue_type":"priority","operation":"dequeue"}

# Expressions
{"target":"expression","expression":"3 + 4 * 2"}
{"target":"expression","expression":"(1 + 2) * 3"}
{"target":"expression","expression":"(8 - 2) / (1 + 3)"}
{"target":"expression","expression":"(1 + 2"}

# Priority scheduling
{"target":"scheduler","action":"add_process","process_id":"P1","arrival_time":0,"burst_time":5,"priority":2}
{"target":"scheduler","action":"add_process","process_id":"P2","arrival_time":1,"burst_time":3,"priority":1}
{"target":"scheduler","action":"add_process","process_id":"P3","arrival_time":2,"burst_time":1,"priority":3}
{"target":"scheduler","action":"add_process","process_id":"P4","arrival_time":12,"burst_time":2,"priority":1}
{"target":"scheduler","action":"calculate_schedule"}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StackOperation;

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let script = "\n# comment\n// another\n{\"target\":\"stack\",\"operation\":\"pop\"}\n";
        let requests = parse_script(script).unwrap();
        assert_eq!(requests.len(), 1);
        assert!(matches!(
            requests[0],
            Request::Stack {
                operation: StackOperation::Pop,
                ..
            }
        ));
    }

    #[test]
    fn test_reports_line_number() {
        let script = "{\"target\":\"stack\",\"operation\":\"pop\"}\n\n{\"target\":\"nowhere\"}\n";
        let err = parse_script(script).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest { line: 3, .. }));
    }

    #[test]
    fn test_demo_script_parses() {
        let requests = parse_script(DEMO_SCRIPT).unwrap();
        assert_eq!(requests.len(), 33);
    }
}
