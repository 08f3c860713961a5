use thiserror::Error;

/// Errors raised by the priority scheduler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// A schedule was requested with an empty process list
    #[error("No processes to schedule")]
    NoProcesses,

    /// A process id was submitted twice
    #[error("Process {0} already exists")]
    DuplicateProcess(String),

    /// Running a process would push the clock past `u64::MAX`
    #[error("Simulated time overflows while running process {0}")]
    TimeOverflow(String),
}
