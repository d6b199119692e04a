// Command line front end; menu to practice a table or show the statistics.

use times_tables::config::Config;
use times_tables::traits::{
    DrillError, MergeOutcome, Verdict, PROBLEMS_PER_SESSION, TABLES, TIME_LIMIT,
};
use times_tables::training::{parse_table, Training};

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Practice the times tables, 20 problems, all correct within 60 seconds.
#[derive(Parser, Debug)]
#[clap(long_about = None)]
struct Args {
    /// Configuration file, json or yaml.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Statistics file, takes precedence over the configuration.
    #[clap(short, long)]
    results: Option<PathBuf>,
}

/// Read a line without its line ending, none if the input is closed. Bytes that are not utf-8
/// are replaced, such a line is just a wrong answer.
fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buffer = vec![];
    if reader.read_until(b'\n', &mut buffer)? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(&buffer);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_owned()))
}

/// Print the prompt and read a line, none if the input is closed.
fn prompt<R: BufRead>(reader: &mut R, text: &str) -> Result<Option<String>, DrillError> {
    print!("{text}");
    io::stdout().flush()?;
    Ok(read_line(reader)?)
}

/// Run one session, returns false if the input was closed halfway.
fn practice<R: BufRead>(
    training: &mut Training,
    table: u32,
    lines: &mut R,
) -> Result<bool, DrillError> {
    println!("\nPracticing {table} times table...");
    let mut session = training.start(table);

    while let Some(problem) = session.question() {
        let Some(input) = prompt(lines, &problem.to_string())? else {
            // Abandoned, nothing is recorded.
            return Ok(false);
        };
        match session.answer(&input) {
            Some(Verdict::Wrong { .. }) => println!("Wrong!"),
            Some(Verdict::NotANumber) => println!("Not a number!"),
            _ => {}
        }
    }

    let report = session.finish(Instant::now());
    let elapsed = report.elapsed_seconds;
    if report.success {
        println!("Success! You finished in {elapsed:.2} seconds.");
    } else {
        println!(
            "Finished in {elapsed:.2} seconds with {}/{PROBLEMS_PER_SESSION} correct.",
            report.correct_count
        );
        println!(
            "Goal not reached ({PROBLEMS_PER_SESSION} correct within {TIME_LIMIT} seconds)."
        );
    }

    match training.complete(&report)?.0 {
        MergeOutcome::NewRecord => println!("New record time!"),
        MergeOutcome::BestUnchanged { best } => {
            println!("Your best time is still {best:.2} seconds.")
        }
        MergeOutcome::Failed => {}
    }
    Ok(true)
}

fn show_stats(training: &Training) -> Result<(), DrillError> {
    let statistics = training.statistics()?;
    if statistics.is_empty() {
        println!("No stats yet. Go practice!");
        return Ok(());
    }
    println!("\nStats by Times Table:");
    for (table, stats) in statistics.tables() {
        println!("Table {table}: {stats}");
    }
    Ok(())
}

fn main() -> Result<(), DrillError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::resolve(args.config.as_deref(), args.results)?;
    let mut training = Training::new(Box::new(config.storage()?));

    let stdin = io::stdin();
    let mut lines = stdin.lock();

    loop {
        println!("\n--- Times Tables Practice ---");
        println!("1. Practice");
        println!("2. Show Stats");
        println!("3. Quit");
        let Some(choice) = prompt(&mut lines, "Choose an option: ")? else {
            break;
        };

        match choice.trim() {
            "1" => {
                let question = format!(
                    "Which times table would you like to practice? ({}-{}): ",
                    TABLES.start(),
                    TABLES.end()
                );
                let Some(input) = prompt(&mut lines, &question)? else {
                    break;
                };
                match parse_table(&input) {
                    Some(table) => {
                        if !practice(&mut training, table, &mut lines)? {
                            break;
                        }
                    }
                    None => println!(
                        "Please choose a number between {} and {}.",
                        TABLES.start(),
                        TABLES.end()
                    ),
                }
            }
            "2" => show_stats(&training)?,
            "3" => break,
            _ => println!("Invalid choice, try again."),
        }
    }

    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use times_tables::recorder::MemoryStorage;

    #[test]
    fn test_read_line() {
        let mut input = io::Cursor::new(b"12\r\n 7 \n\xff\xfe6\nlast".to_vec());
        assert_eq!(read_line(&mut input).unwrap(), Some("12".to_owned()));
        assert_eq!(read_line(&mut input).unwrap(), Some(" 7 ".to_owned()));
        assert_eq!(
            read_line(&mut input).unwrap(),
            Some("\u{fffd}\u{fffd}6".to_owned())
        );
        assert_eq!(read_line(&mut input).unwrap(), Some("last".to_owned()));
        assert_eq!(read_line(&mut input).unwrap(), None);
    }

    #[test]
    fn test_invalid_utf8_is_a_wrong_answer() {
        let mut training = Training::new(Box::new(MemoryStorage::new()));
        let mut input = b"\xff\xff\n".repeat(20);
        input.extend_from_slice(b"3\n");
        let mut reader = io::Cursor::new(input);

        assert!(practice(&mut training, 4, &mut reader).unwrap());
        let stats = training.stats(4).unwrap().unwrap();
        assert_eq!((stats.attempts, stats.failures), (1, 1));
        // The session stopped after 20 answers, the rest is still unread.
        assert_eq!(read_line(&mut reader).unwrap(), Some("3".to_owned()));
    }
}
