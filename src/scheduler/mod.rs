//! Non-preemptive priority CPU scheduling simulation
//!
//! [`PriorityScheduler`] holds a list of [`ProcessRecord`]s and replays them
//! through a non-preemptive priority scheduler:
//!
//! 1. Time starts at 0.
//! 2. Among processes that have arrived and not yet run, pick the one with
//!    the lowest priority number, breaking ties by earliest arrival and then
//!    by submission order.
//! 3. Run it to completion and record a [`GanttSegment`].
//! 4. If nothing has arrived, advance time to the next arrival and log the
//!    idle run as a single step.
//!
//! Every run starts from scratch on a working copy, so the result only
//! depends on the submitted processes.

mod errors;

pub use errors::SchedulerError;

use serde::{Deserialize, Serialize};

/// A submitted process and its computed timings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: String,
    pub arrival_time: u64,
    pub burst_time: u64,
    pub priority: i64,
    pub remaining_time: u64,
    pub completion_time: u64,
    pub waiting_time: u64,
    pub turnaround_time: u64,
    pub executed: bool,
}

impl ProcessRecord {
    pub fn new(id: impl Into<String>, arrival_time: u64, burst_time: u64, priority: i64) -> Self {
        ProcessRecord {
            id: id.into(),
            arrival_time,
            burst_time,
            priority,
            remaining_time: burst_time,
            completion_time: 0,
            waiting_time: 0,
            turnaround_time: 0,
            executed: false,
        }
    }

    /// Copy with every computed field zeroed
    fn pending(&self) -> Self {
        ProcessRecord::new(self.id.clone(), self.arrival_time, self.burst_time, self.priority)
    }
}

/// One execution interval in the Gantt chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttSegment {
    #[serde(rename = "process")]
    pub process_id: String,
    pub start_time: u64,
    pub end_time: u64,
    pub priority: i64,
}

impl GanttSegment {
    pub fn duration(&self) -> u64 {
        self.end_time - self.start_time
    }
}

/// Full result of [`PriorityScheduler::calculate_schedule`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    pub processes: Vec<ProcessRecord>,
    pub gantt_chart: Vec<GanttSegment>,
    pub execution_steps: Vec<String>,
    pub avg_waiting_time: f64,
    pub avg_turnaround_time: f64,
    pub total_time: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriorityScheduler {
    processes: Vec<ProcessRecord>,
    gantt_chart: Vec<GanttSegment>,
    current_time: u64,
}

impl PriorityScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a process; ids must be unique within the scheduler
    pub fn add_process(
        &mut self,
        id: impl Into<String>,
        arrival_time: u64,
        burst_time: u64,
        priority: i64,
    ) -> Result<&ProcessRecord, SchedulerError> {
        let id = id.into();
        if self.processes.iter().any(|p| p.id == id) {
            return Err(SchedulerError::DuplicateProcess(id));
        }
        self.processes
            .push(ProcessRecord::new(id, arrival_time, burst_time, priority));
        let index = self.processes.len() - 1;
        Ok(&self.processes[index])
    }

    /// Run the simulation and write the computed timings back to the process list
    pub fn calculate_schedule(&mut self) -> Result<ScheduleReport, SchedulerError> {
        if self.processes.is_empty() {
            return Err(SchedulerError::NoProcesses);
        }

        let mut working: Vec<ProcessRecord> =
            self.processes.iter().map(ProcessRecord::pending).collect();
        let mut gantt_chart = Vec::new();
        let mut steps =
            vec!["Starting Priority Scheduling Algorithm (Non-Preemptive)...".to_string()];
        let mut current_time = 0u64;
        let mut completed = 0;

        while completed < working.len() {
            let next = working
                .iter()
                .enumerate()
                .filter(|(_, p)| !p.executed && p.arrival_time <= current_time)
                .min_by_key(|(_, p)| (p.priority, p.arrival_time))
                .map(|(index, _)| index);

            let Some(index) = next else {
                // Everything left arrives later; skip straight to the first arrival
                let first_idle = current_time.saturating_add(1);
                let arrival = working
                    .iter()
                    .filter(|p| !p.executed)
                    .map(|p| p.arrival_time)
                    .min()
                    .unwrap_or(first_idle);
                steps.push(if arrival == first_idle {
                    format!("Time {}: No process available", arrival)
                } else {
                    format!("Time {}..{}: No process available", first_idle, arrival)
                });
                current_time = arrival;
                continue;
            };

            let process = &mut working[index];
            let end_time = current_time
                .checked_add(process.burst_time)
                .ok_or_else(|| SchedulerError::TimeOverflow(process.id.clone()))?;
            steps.push(format!(
                "Time {}: Executing {} (Priority: {}, Burst Time: {})",
                current_time, process.id, process.priority, process.burst_time
            ));
            gantt_chart.push(GanttSegment {
                process_id: process.id.clone(),
                start_time: current_time,
                end_time,
                priority: process.priority,
            });

            current_time = end_time;
            process.completion_time = current_time;
            process.turnaround_time = process.completion_time - process.arrival_time;
            process.waiting_time = process.turnaround_time - process.burst_time;
            process.remaining_time = 0;
            process.executed = true;
            completed += 1;

            steps.push(format!(
                "Time {}: {} completed (CT: {}, TAT: {}, WT: {})",
                current_time,
                process.id,
                process.completion_time,
                process.turnaround_time,
                process.waiting_time
            ));
        }

        // Working copy is index-aligned with the live list
        for (live, done) in self.processes.iter_mut().zip(&working) {
            live.remaining_time = done.remaining_time;
            live.completion_time = done.completion_time;
            live.turnaround_time = done.turnaround_time;
            live.waiting_time = done.waiting_time;
            live.executed = done.executed;
        }
        self.gantt_chart = gantt_chart;
        self.current_time = current_time;

        let count = self.processes.len() as f64;
        let total_waiting: f64 = self.processes.iter().map(|p| p.waiting_time as f64).sum();
        let total_turnaround: f64 = self
            .processes
            .iter()
            .map(|p| p.turnaround_time as f64)
            .sum();

        Ok(ScheduleReport {
            processes: self.processes.clone(),
            gantt_chart: self.gantt_chart.clone(),
            execution_steps: steps,
            avg_waiting_time: total_waiting / count,
            avg_turnaround_time: total_turnaround / count,
            total_time: current_time,
        })
    }

    pub fn processes(&self) -> &[ProcessRecord] {
        &self.processes
    }

    /// Gantt chart of the last calculated schedule
    pub fn gantt_chart(&self) -> &[GanttSegment] {
        &self.gantt_chart
    }

    /// Simulated time at which the last schedule finished
    pub fn current_time(&self) -> u64 {
        self.current_time
    }

    /// One line per Gantt segment of the last calculated schedule
    pub fn execution_summary(&self) -> Vec<String> {
        self.gantt_chart
            .iter()
            .map(|segment| {
                format!(
                    "{} executed from {} to {}",
                    segment.process_id, segment.start_time, segment.end_time
                )
            })
            .collect()
    }

    /// Drop all processes and the Gantt chart, and rewind time to 0
    pub fn reset(&mut self) {
        self.processes.clear();
        self.gantt_chart.clear();
        self.current_time = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_arrival_waits_for_running_process() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.add_process("A", 0, 5, 2).unwrap();
        scheduler.add_process("B", 1, 3, 1).unwrap();

        let report = scheduler.calculate_schedule().unwrap();

        let chart: Vec<(&str, u64, u64)> = report
            .gantt_chart
            .iter()
            .map(|s| (s.process_id.as_str(), s.start_time, s.end_time))
            .collect();
        assert_eq!(chart, vec![("A", 0, 5), ("B", 5, 8)]);

        let a = &report.processes[0];
        assert_eq!((a.waiting_time, a.turnaround_time), (0, 5));
        let b = &report.processes[1];
        assert_eq!((b.waiting_time, b.turnaround_time), (4, 7));

        assert_eq!(report.avg_waiting_time, 2.0);
        assert_eq!(report.avg_turnaround_time, 6.0);
        assert_eq!(report.total_time, 8);
    }

    #[test]
    fn test_priority_then_arrival_tie_break() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.add_process("P1", 0, 2, 3).unwrap();
        scheduler.add_process("P2", 2, 1, 1).unwrap();
        scheduler.add_process("P3", 0, 3, 1).unwrap();
        scheduler.add_process("P4", 1, 1, 1).unwrap();

        let report = scheduler.calculate_schedule().unwrap();
        let order: Vec<&str> = report
            .gantt_chart
            .iter()
            .map(|s| s.process_id.as_str())
            .collect();

        // At t=3 P2 and P4 share priority 1; P4 arrived first
        assert_eq!(order, vec!["P3", "P4", "P2", "P1"]);
        assert_eq!(report.total_time, 7);
    }

    #[test]
    fn test_idle_time_is_logged() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.add_process("late", 2, 1, 1).unwrap();

        let report = scheduler.calculate_schedule().unwrap();
        assert_eq!(report.gantt_chart[0].start_time, 2);
        assert_eq!(report.total_time, 3);
        assert_eq!(report.execution_steps[1], "Time 1..2: No process available");
        assert_eq!(
            report.execution_steps[2],
            "Time 2: Executing late (Priority: 1, Burst Time: 1)"
        );
        assert_eq!(report.execution_steps[3], "Time 3: late completed (CT: 3, TAT: 1, WT: 0)");
    }

    #[test]
    fn test_single_idle_tick_keeps_plain_form() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.add_process("A", 0, 1, 1).unwrap();
        scheduler.add_process("B", 2, 1, 1).unwrap();

        let report = scheduler.calculate_schedule().unwrap();
        assert_eq!(report.execution_steps[3], "Time 2: No process available");
        assert_eq!(report.gantt_chart[1].start_time, 2);
    }

    #[test]
    fn test_distant_arrival_is_one_idle_step() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.add_process("far", 10_000_000_000, 3, 1).unwrap();

        let report = scheduler.calculate_schedule().unwrap();
        assert_eq!(report.execution_steps.len(), 4);
        assert_eq!(
            report.execution_steps[1],
            "Time 1..10000000000: No process available"
        );
        assert_eq!(report.total_time, 10_000_000_003);
    }

    #[test]
    fn test_time_overflow_is_an_error() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.add_process("A", 0, u64::MAX, 1).unwrap();
        scheduler.add_process("B", 0, 1, 2).unwrap();

        let err = scheduler.calculate_schedule().unwrap_err();
        assert_eq!(err, SchedulerError::TimeOverflow("B".to_string()));
        assert!(scheduler.gantt_chart().is_empty());
        assert!(!scheduler.processes()[0].executed);
    }

    #[test]
    fn test_large_times_average_without_overflow() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.add_process("A", 0, u64::MAX / 2, 1).unwrap();
        scheduler.add_process("B", 0, u64::MAX / 2, 2).unwrap();

        let report = scheduler.calculate_schedule().unwrap();
        assert_eq!(report.total_time, u64::MAX - 1);
        assert!(report.avg_turnaround_time > 0.0);
    }

    #[test]
    fn test_zero_burst_terminates() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.add_process("noop", 0, 0, 1).unwrap();
        scheduler.add_process("work", 0, 2, 2).unwrap();

        let report = scheduler.calculate_schedule().unwrap();
        assert_eq!(report.gantt_chart.len(), 2);
        assert_eq!(report.gantt_chart[0].duration(), 0);
        assert_eq!(report.total_time, 2);
    }

    #[test]
    fn test_results_written_back_and_recalculation_is_fresh() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.add_process("A", 0, 4, 1).unwrap();
        let first = scheduler.calculate_schedule().unwrap();

        let live = &scheduler.processes()[0];
        assert!(live.executed);
        assert_eq!(live.completion_time, 4);
        assert_eq!(live.remaining_time, 0);

        let second = scheduler.calculate_schedule().unwrap();
        assert_eq!(first, second);
        assert_eq!(scheduler.gantt_chart().len(), 1);
        assert_eq!(scheduler.execution_summary(), vec!["A executed from 0 to 4"]);
    }

    #[test]
    fn test_reset_then_calculate_fails() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.add_process("A", 0, 1, 1).unwrap();
        scheduler.calculate_schedule().unwrap();
        scheduler.reset();

        assert!(scheduler.processes().is_empty());
        assert!(scheduler.gantt_chart().is_empty());
        assert_eq!(scheduler.current_time(), 0);
        assert_eq!(
            scheduler.calculate_schedule().unwrap_err(),
            SchedulerError::NoProcesses
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.add_process("A", 0, 1, 1).unwrap();
        let err = scheduler.add_process("A", 3, 1, 1).unwrap_err();
        assert_eq!(err, SchedulerError::DuplicateProcess("A".to_string()));
        assert_eq!(scheduler.processes().len(), 1);
    }
}
