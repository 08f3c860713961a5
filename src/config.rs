//! Runtime configuration and defaults
//!
//! There is no configuration file: the CLI fills a [`Config`] from its flags
//! and hands it to the [`Session`](crate::session::Session), which uses it
//! whenever it constructs a structure on demand.

/// Capacity of stacks and queues created without an explicit capacity
pub const DEFAULT_CAPACITY: usize = 10;

/// Priority given to priority-queue elements enqueued without one
pub const DEFAULT_PRIORITY: i64 = 5;

/// Capacity of the private stacks used by the expression engine
pub const DEFAULT_EXPRESSION_CAPACITY: usize = 64;

/// Byte budget for the snapshot history (64 MiB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 64 * 1024 * 1024;

/// Instance name used when a request does not name one
pub const DEFAULT_INSTANCE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Capacity for every stack and queue the session creates
    pub capacity: usize,
    /// Priority assumed by `enqueue` on a priority queue when none is given
    pub default_priority: i64,
    /// Operator/operand stack capacity for expression evaluation
    pub expression_capacity: usize,
    /// Estimated-byte limit for recorded snapshots
    pub snapshot_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            capacity: DEFAULT_CAPACITY,
            default_priority: DEFAULT_PRIORITY,
            expression_capacity: DEFAULT_EXPRESSION_CAPACITY,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
        }
    }
}
