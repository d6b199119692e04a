// Graphical front end in the terminal, hacked up from
// https://github.com/fdehau/tui-rs/blob/v0.18.0/examples/user_input.rs

use times_tables::config::Config;
use times_tables::traits::{
    DrillError, MergeOutcome, Verdict, PROBLEMS_PER_SESSION, TABLES, TIME_LIMIT,
};
use times_tables::training::{parse_table, Session, Training};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans, Text},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use unicode_width::UnicodeWidthStr;

#[derive(Parser, Debug)]
#[clap(long_about = None)]
struct Args {
    /// Configuration file, json or yaml.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Statistics file, takes precedence over the configuration.
    #[clap(short, long)]
    results: Option<PathBuf>,

    /// Write logs to this file, the terminal is in use by the interface.
    #[clap(long)]
    log: Option<PathBuf>,
}

#[derive(PartialEq)]
enum ApplicationState {
    ChooseTable,
    QuestionAsked,
    Finished,
}

/// App holds the state of the application
struct App {
    state: ApplicationState,

    /// Current value of the input box
    input: String,

    /// Object that holds the statistics.
    training: Training,

    /// Session in progress.
    session: Option<Session>,

    /// Text above the input; the question or what to enter.
    prompt: String,

    /// Feedback on the last thing entered.
    feedback: String,

    /// Whether the feedback is good news.
    feedback_good: bool,

    /// Statistics for the table, or the session summary.
    info: String,
}

impl App {
    fn new(training: Training) -> App {
        let mut app = App {
            state: ApplicationState::ChooseTable,
            input: String::new(),
            training,
            session: None,
            prompt: String::new(),
            feedback: String::new(),
            feedback_good: true,
            info: String::new(),
        };
        app.choose_table();
        app
    }

    fn choose_table(&mut self) {
        self.input.clear();
        self.feedback.clear();
        self.session = None;
        self.prompt = format!(
            "Choose a times table to practice ({}-{}):",
            TABLES.start(),
            TABLES.end()
        );
        self.state = ApplicationState::ChooseTable;
    }

    fn start_practice(&mut self) -> Result<(), DrillError> {
        let Some(table) = parse_table(&self.input) else {
            self.feedback = format!(
                "Please enter a number between {} and {}.",
                TABLES.start(),
                TABLES.end()
            );
            self.feedback_good = false;
            self.input.clear();
            return Ok(());
        };

        self.info = match self.training.stats(table)? {
            Some(stats) => format!("Table {table}: {stats}"),
            None => "No stats yet for this table.".to_owned(),
        };
        self.feedback.clear();
        self.session = Some(self.training.start(table));
        self.state = ApplicationState::QuestionAsked;
        self.populate_question();
        Ok(())
    }

    fn populate_question(&mut self) {
        self.input.clear();
        if let Some(session) = &self.session {
            if let Some(problem) = session.question() {
                let (answered, total) = session.progress();
                self.prompt = format!(
                    "Table {}  ({}/{total})   {problem}?",
                    session.table(),
                    answered + 1
                );
            }
        }
    }

    fn process_answer(&mut self) -> Result<(), DrillError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        match session.answer(&self.input) {
            Some(Verdict::Correct) => {
                self.feedback = "Correct!".to_owned();
                self.feedback_good = true;
            }
            Some(Verdict::Wrong { expected }) => {
                self.feedback = format!("Wrong, the answer was {expected}.");
                self.feedback_good = false;
            }
            Some(Verdict::NotANumber) => {
                self.feedback = "Not a number!".to_owned();
                self.feedback_good = false;
            }
            None => {}
        }

        if session.is_finished() {
            self.finish_practice()
        } else {
            self.populate_question();
            Ok(())
        }
    }

    fn finish_practice(&mut self) -> Result<(), DrillError> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        let report = session.finish(Instant::now());
        let (outcome, stats) = self.training.complete(&report)?;

        let elapsed = report.elapsed_seconds;
        self.prompt = if report.success {
            format!("Great job! You finished in {elapsed:.2} seconds.")
        } else {
            format!(
                "You got {}/{PROBLEMS_PER_SESSION} correct in {elapsed:.2} seconds. \
                 Try to get all correct within {TIME_LIMIT} seconds!",
                report.correct_count
            )
        };
        self.feedback = match outcome {
            MergeOutcome::NewRecord => "New record time!".to_owned(),
            MergeOutcome::BestUnchanged { best } => {
                format!("Your best time is still {best:.2} seconds.")
            }
            MergeOutcome::Failed => String::new(),
        };
        self.feedback_good = report.success;
        self.info = format!("Table {}: {stats}", report.table);
        self.input.clear();
        self.state = ApplicationState::Finished;
        Ok(())
    }
}

fn main() -> Result<(), DrillError> {
    let args = Args::parse();
    if let Some(log) = &args.log {
        let file = std::fs::File::create(log)?;
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    // create app and run it
    let config = Config::resolve(args.config.as_deref(), args.results)?;
    let training = Training::new(Box::new(config.storage()?));
    let app = App::new(training);

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Now run the application.
    let res = run_app(&mut terminal, app);

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<(), DrillError> {
    loop {
        terminal.draw(|f| ui(f, &app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Enter => match app.state {
                    ApplicationState::ChooseTable => app.start_practice()?,
                    ApplicationState::QuestionAsked => app.process_answer()?,
                    ApplicationState::Finished => app.choose_table(),
                },
                KeyCode::Char(c) => {
                    if app.state != ApplicationState::Finished {
                        app.input.push(c);
                    }
                }
                KeyCode::Backspace => {
                    app.input.pop();
                }
                KeyCode::Esc => {
                    return Ok(());
                }
                _ => {}
            }
        }
    }
}

/// Column just after centered text of this width, kept inside the area.
fn cursor_x(area: Rect, text_width: usize) -> u16 {
    let half = u16::try_from(text_width / 2 + text_width % 2).unwrap_or(u16::MAX);
    let last = area.x.saturating_add(area.width.saturating_sub(1));
    area.x
        .saturating_add(area.width / 2)
        .saturating_add(half)
        .min(last)
}

fn ui<B: Backend>(f: &mut Frame<B>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage(30),
                Constraint::Length(1), // prompt
                Constraint::Percentage(5),
                Constraint::Length(3), // input
                Constraint::Length(1), // feedback
                Constraint::Percentage(5),
                Constraint::Length(1), // info
                Constraint::Percentage(30),
            ]
            .as_ref(),
        )
        .split(f.size());

    const PROMPT: usize = 1;
    const INPUT: usize = 3;
    const FEEDBACK: usize = 4;
    const INFO: usize = 6;

    let action = match app.state {
        ApplicationState::ChooseTable => " to start practice.",
        ApplicationState::QuestionAsked => " to submit answer.",
        ApplicationState::Finished => " to choose another table.",
    };
    let msg = vec![
        Span::raw("Press "),
        Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" to exit, "),
        Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(action),
    ];
    let help_message = Paragraph::new(Text::from(Spans::from(msg)));
    f.render_widget(help_message, chunks[0]);

    let prompt = Paragraph::new(app.prompt.as_str())
        .alignment(tui::layout::Alignment::Center)
        .block(Block::default());
    f.render_widget(prompt, chunks[PROMPT]);

    let input_style = match app.state {
        ApplicationState::Finished => Style::default(),
        _ => Style::default().fg(Color::Yellow),
    };
    let input = Paragraph::new(app.input.as_str())
        .style(input_style)
        .alignment(tui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(input, chunks[INPUT]);

    if app.state != ApplicationState::Finished {
        // Centered text, so the cursor sits just after the middle of the box.
        let area = chunks[INPUT];
        f.set_cursor(cursor_x(area, app.input.width()), area.y + 1);
    }

    let feedback_style = if app.feedback_good {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };
    let feedback = Paragraph::new(app.feedback.as_str())
        .style(feedback_style)
        .alignment(tui::layout::Alignment::Center)
        .block(Block::default());
    f.render_widget(feedback, chunks[FEEDBACK]);

    let info = Paragraph::new(app.info.as_str())
        .alignment(tui::layout::Alignment::Center)
        .block(Block::default());
    f.render_widget(info, chunks[INFO]);
}
