use crate::algorithm::generate_problems;
use crate::recorder::StatisticsStore;
use crate::scoring::{check_answer, tally};
use crate::traits::*;
use std::time::Instant;

/*
Implements the flow both front ends share;
    Pick table (validated by the front end)
    Generate problems, start the clock

    Present question
    Obtain answer
    Check, give feedback
    Go to present question until all are answered

    Stop the clock, create report
    Load statistics, merge report, save statistics.

A session that is dropped before it is finished never touches the storage.
*/

/// Parse a table as typed by a user, only [`TABLES`] is accepted.
pub fn parse_table(input: &str) -> Option<TableId> {
    input
        .trim()
        .parse::<TableId>()
        .ok()
        .filter(|t| TABLES.contains(t))
}

/// A single timed run through a problem set.
#[derive(Debug)]
pub struct Session {
    table: TableId,
    problems: ProblemSet,
    verdicts: Vec<Verdict>,
    started: Instant,
}

impl Session {
    pub fn new(table: TableId, problems: ProblemSet, started: Instant) -> Self {
        Session {
            table,
            problems,
            verdicts: Vec::with_capacity(PROBLEMS_PER_SESSION),
            started,
        }
    }

    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// The problem that is awaiting an answer, none when all are answered.
    pub fn question(&self) -> Option<Problem> {
        self.problems.get(self.verdicts.len()).copied()
    }

    /// Answered and total number of problems.
    pub fn progress(&self) -> (usize, usize) {
        (self.verdicts.len(), self.problems.len())
    }

    pub fn correct(&self) -> usize {
        self.verdicts.iter().filter(|v| v.is_correct()).count()
    }

    pub fn is_finished(&self) -> bool {
        self.verdicts.len() >= self.problems.len()
    }

    /// Check the answer to the current question and move on to the next one. Returns none if
    /// there is no question left to answer.
    pub fn answer(&mut self, input: &str) -> Option<Verdict> {
        let problem = self.question()?;
        let verdict = check_answer(&problem, input);
        tracing::trace!(%problem, input, ?verdict, "answered");
        self.verdicts.push(verdict);
        Some(verdict)
    }

    /// Stop the clock and create the report, unanswered problems count as incorrect.
    pub fn finish(self, now: Instant) -> SessionReport {
        tally(
            self.table,
            &self.verdicts,
            now.saturating_duration_since(self.started),
        )
    }
}

/// Sessions backed by a storage for the statistics.
#[derive(Debug)]
pub struct Training {
    storage: Box<dyn Storage>,
}

impl Training {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Training { storage }
    }

    /// Begin a session with random problems, the clock starts now.
    pub fn start(&self, table: TableId) -> Session {
        self.start_with(table, &mut rand::thread_rng(), Instant::now())
    }

    pub fn start_with<R: rand::Rng + ?Sized>(
        &self,
        table: TableId,
        rng: &mut R,
        now: Instant,
    ) -> Session {
        tracing::debug!(table, "starting session");
        Session::new(table, generate_problems(table, rng), now)
    }

    /// Record a finished session; load, merge once and save. If loading fails nothing is written.
    pub fn complete(
        &mut self,
        report: &SessionReport,
    ) -> Result<(MergeOutcome, TableStats), DrillError> {
        let mut store = self.storage.load()?;
        let outcome = store.merge(report);
        self.storage.save(&store)?;

        let stats = store.get(report.table).copied().unwrap_or_default();
        tracing::info!(
            table = report.table,
            correct = report.correct_count,
            elapsed = report.elapsed_seconds,
            success = report.success,
            "recorded session"
        );
        Ok((outcome, stats))
    }

    /// Everything recorded so far.
    pub fn statistics(&self) -> Result<StatisticsStore, DrillError> {
        self.storage.load()
    }

    pub fn stats(&self, table: TableId) -> Result<Option<TableStats>, DrillError> {
        Ok(self.storage.load()?.get(table).copied())
    }
}
