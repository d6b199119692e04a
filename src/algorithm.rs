use crate::traits::*;

use rand::seq::SliceRandom;
use rand_distr::{Distribution, Uniform};

/// Problems added on top of one-of-each-multiplier, drawn with replacement.
pub const EXTRA_PROBLEMS: usize = PROBLEMS_PER_SESSION - (MAX_MULTIPLIER as usize + 1);

/// Create the problems for one session of the provided table.
///
/// Every multiplier from 0 up to and including [`MAX_MULTIPLIER`] is asked once, the remaining
/// [`EXTRA_PROBLEMS`] multipliers are uniformly random and may repeat. The whole set is shuffled.
/// The table is not validated, any value produces a set.
pub fn generate_problems<R: rand::Rng + ?Sized>(table: TableId, rng: &mut R) -> ProblemSet {
    let mut problems = (0..=MAX_MULTIPLIER)
        .map(|m| Problem::new(table, m))
        .collect::<ProblemSet>();

    let multipliers = Uniform::new_inclusive(0, MAX_MULTIPLIER);
    problems.extend(
        multipliers
            .sample_iter(&mut *rng)
            .take(EXTRA_PROBLEMS)
            .map(|m| Problem::new(table, m)),
    );

    problems.shuffle(rng);
    problems
}

/// Same as [`generate_problems`], using the thread local random source.
pub fn random_problems(table: TableId) -> ProblemSet {
    generate_problems(table, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_length_and_table() {
        let mut rng = StdRng::seed_from_u64(1);
        for table in 0..=15 {
            let problems = generate_problems(table, &mut rng);
            assert_eq!(problems.len(), PROBLEMS_PER_SESSION);
            assert!(problems.iter().all(|p| p.table == table));
        }
    }

    #[test]
    fn test_every_multiplier_present() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let problems = generate_problems(7, &mut rng);
            for m in 0..=MAX_MULTIPLIER {
                assert!(
                    problems.iter().any(|p| p.multiplier == m),
                    "multiplier {m} missing for seed {seed}"
                );
            }
            assert!(problems.iter().all(|p| p.multiplier <= MAX_MULTIPLIER));
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = generate_problems(4, &mut StdRng::seed_from_u64(42));
        let b = generate_problems(4, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);

        // Shuffled; the ordered prefix 0..=12 is astronomically unlikely to survive.
        let ordered = (0..=MAX_MULTIPLIER).collect::<Vec<_>>();
        let prefix = a.iter().take(13).map(|p| p.multiplier).collect::<Vec<_>>();
        assert_ne!(prefix, ordered);
    }

    #[test]
    fn test_out_of_range_table() {
        let problems = random_problems(u32::MAX);
        assert_eq!(problems.len(), PROBLEMS_PER_SESSION);
        let twelve = problems.iter().find(|p| p.multiplier == 12).unwrap();
        assert_eq!(twelve.product(), i64::from(u32::MAX) * 12);
    }
}
