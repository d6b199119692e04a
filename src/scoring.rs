use crate::traits::*;
use std::time::{Duration, Instant};

/// Compare the user's input against the problem's product. Surrounding whitespace is ignored,
/// anything that isn't an integer is [`Verdict::NotANumber`].
pub fn check_answer(problem: &Problem, input: &str) -> Verdict {
    let expected = problem.product();
    match input.trim().parse::<i64>() {
        Ok(v) if v == expected => Verdict::Correct,
        Ok(_) => Verdict::Wrong { expected },
        Err(_) => Verdict::NotANumber,
    }
}

/// Elapsed time in seconds, rounded to two decimals.
pub fn round_seconds(elapsed: Duration) -> Seconds {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

/// All problems correct, within the time limit (inclusive).
pub fn is_success(correct_count: u32, elapsed_seconds: Seconds) -> bool {
    correct_count as usize == PROBLEMS_PER_SESSION && elapsed_seconds <= TIME_LIMIT
}

/// Build the report from verdicts that were already determined.
pub fn tally(table: TableId, verdicts: &[Verdict], elapsed: Duration) -> SessionReport {
    let correct_count = verdicts.iter().filter(|v| v.is_correct()).count() as u32;
    let elapsed_seconds = round_seconds(elapsed);
    SessionReport {
        table,
        correct_count,
        elapsed_seconds,
        success: is_success(correct_count, elapsed_seconds),
    }
}

/// Score a session in one go. Answers are matched to problems by position, a missing answer
/// counts as incorrect. An end before the start is treated as zero elapsed time.
pub fn score<S: AsRef<str>>(
    table: TableId,
    problems: &[Problem],
    answers: &[S],
    start: Instant,
    end: Instant,
) -> SessionReport {
    let verdicts = problems
        .iter()
        .enumerate()
        .map(|(i, p)| match answers.get(i) {
            Some(answer) => check_answer(p, answer.as_ref()),
            None => Verdict::NotANumber,
        })
        .collect::<Vec<_>>();
    tally(table, &verdicts, end.saturating_duration_since(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::generate_problems;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn problems(table: TableId) -> ProblemSet {
        generate_problems(table, &mut StdRng::seed_from_u64(3))
    }

    fn correct_answers(problems: &[Problem]) -> Vec<String> {
        problems.iter().map(|p| p.product().to_string()).collect()
    }

    #[test]
    fn test_check_answer() {
        let p = Problem::new(7, 8);
        assert_eq!(check_answer(&p, "56"), Verdict::Correct);
        assert_eq!(check_answer(&p, " 56\n"), Verdict::Correct);
        assert_eq!(check_answer(&p, "54"), Verdict::Wrong { expected: 56 });
        assert_eq!(check_answer(&p, "-56"), Verdict::Wrong { expected: 56 });
        assert_eq!(check_answer(&p, "fifty six"), Verdict::NotANumber);
        assert_eq!(check_answer(&p, ""), Verdict::NotANumber);
        assert_eq!(check_answer(&p, "56.0"), Verdict::NotANumber);
    }

    #[test]
    fn test_perfect_session() {
        let problems = problems(2);
        let start = Instant::now();
        let end = start + Duration::from_secs(30);
        let report = score(2, &problems, &correct_answers(&problems), start, end);
        assert_eq!(
            report,
            SessionReport {
                table: 2,
                correct_count: 20,
                elapsed_seconds: 30.0,
                success: true
            }
        );
    }

    #[test]
    fn test_wrong_and_garbage_answers() {
        let problems = problems(3);
        let mut answers = correct_answers(&problems);
        answers[0] = "banana".to_owned();
        answers[5] = (problems[5].product() + 1).to_string();
        let start = Instant::now();
        let report = score(3, &problems, &answers, start, start + Duration::from_secs(10));
        assert_eq!(report.correct_count, 18);
        assert!(!report.success);

        let zeros = vec!["0"; 20];
        let report = score(3, &problems, &zeros, start, start + Duration::from_secs(45));
        // Only 3 x 0 is answered correctly.
        let expected = problems.iter().filter(|p| p.multiplier == 0).count() as u32;
        assert_eq!(report.correct_count, expected);
        assert!(!report.success);
    }

    #[test]
    fn test_missing_answers_are_incorrect() {
        let problems = problems(4);
        let answers = correct_answers(&problems[..19]);
        let start = Instant::now();
        let report = score(4, &problems, &answers, start, start + Duration::from_secs(5));
        assert_eq!(report.correct_count, 19);
        assert!(!report.success);
    }

    #[test]
    fn test_time_limit_boundary() {
        let problems = problems(5);
        let answers = correct_answers(&problems);
        let start = Instant::now();

        let report = score(5, &problems, &answers, start, start + Duration::from_secs(60));
        assert_eq!(report.elapsed_seconds, 60.0);
        assert!(report.success);

        let report = score(5, &problems, &answers, start, start + Duration::from_millis(60_010));
        assert_eq!(report.elapsed_seconds, 60.01);
        assert!(!report.success);

        assert!(is_success(20, 60.0));
        assert!(!is_success(20, 60.01));
        assert!(!is_success(19, 1.0));
        assert!(!is_success(21, 1.0));
    }

    #[test]
    fn test_elapsed_rounding_and_clamping() {
        assert_eq!(round_seconds(Duration::from_millis(12_346)), 12.35);
        assert_eq!(round_seconds(Duration::from_millis(12_344)), 12.34);

        let problems = problems(6);
        let answers = correct_answers(&problems);
        let end = Instant::now();
        let start = end + Duration::from_secs(3);
        let report = score(6, &problems, &answers, start, end);
        assert_eq!(report.elapsed_seconds, 0.0);
        assert!(report.success);
    }
}
