use serde::{Deserialize, Serialize};

pub type TableId = u32;
pub type Seconds = f64;

pub type DrillError = Box<dyn std::error::Error>;

/// Highest multiplier that is asked, the lowest is 0.
pub const MAX_MULTIPLIER: u32 = 12;

/// Number of questions in a single session.
pub const PROBLEMS_PER_SESSION: usize = 20;

/// A session only counts as a success if it is completed within this many seconds.
pub const TIME_LIMIT: Seconds = 60.0;

/// Range of tables the front ends allow to be practiced.
pub const TABLES: std::ops::RangeInclusive<TableId> = 2..=12;

/// A single question; table times multiplier.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Deserialize, Serialize)]
pub struct Problem {
    pub table: TableId,
    pub multiplier: u32,
}

impl Problem {
    pub fn new(table: TableId, multiplier: u32) -> Self {
        Problem { table, multiplier }
    }

    /// The correct answer to this problem.
    pub fn product(&self) -> i64 {
        i64::from(self.table) * i64::from(self.multiplier)
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {} = ", self.table, self.multiplier)
    }
}

/// The questions for one session, in the order they are to be asked.
pub type ProblemSet = Vec<Problem>;

/// Result of checking a single answer.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Verdict {
    Correct,
    Wrong { expected: i64 },
    NotANumber,
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        *self == Verdict::Correct
    }
}

/// Outcome of a completed session.
#[derive(Debug, PartialEq, Copy, Clone, Deserialize, Serialize)]
pub struct SessionReport {
    pub table: TableId,
    pub correct_count: u32,
    /// Rounded to two decimals, this is the value shown and the value stored.
    pub elapsed_seconds: Seconds,
    pub success: bool,
}

/// Cumulative statistics for a single table.
#[derive(Debug, PartialEq, Copy, Clone, Default, Deserialize, Serialize)]
pub struct TableStats {
    pub attempts: u32,
    pub successes: u32,
    pub failures: u32,
    #[serde(default)]
    pub best_time: Option<Seconds>,
}

impl std::fmt::Display for TableStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Attempts {}, Successes {}, Failures {}, Best Time: ",
            self.attempts, self.successes, self.failures
        )?;
        match self.best_time {
            Some(t) => write!(f, "{t:.2}"),
            None => write!(f, "N/A"),
        }
    }
}

/// What merging a report did to the table's statistics.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum MergeOutcome {
    /// Successful session that set a new best time.
    NewRecord,
    /// Successful session, but the best time stands.
    BestUnchanged { best: Seconds },
    /// Session did not reach the goal.
    Failed,
}

/// Something that persists the statistics between runs.
pub trait Storage: std::fmt::Debug {
    /// Retrieve the persisted statistics, empty if nothing was stored yet.
    fn load(&self) -> Result<crate::recorder::StatisticsStore, DrillError>;

    /// Replace the persisted statistics with the provided store.
    fn save(&mut self, store: &crate::recorder::StatisticsStore) -> Result<(), DrillError>;
}
