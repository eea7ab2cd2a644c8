use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ux_healthcheck::report::EMAIL_ACKNOWLEDGEMENT;
use ux_healthcheck::session::QuestionView;
use ux_healthcheck::{
    Config, Error, Event, FileStore, KeyValueStore, Page, ScoreDisplay, Session, Transition,
    View,
};

#[derive(Parser)]
#[command(name = "ux-healthcheck", version, about = "UX health check questionnaire")]
struct Cli {
    /// Config file (default: ~/.config/ux-healthcheck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the saved answers
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Show the total score as a percentage
    #[arg(long, global = true)]
    percentage: bool,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Walk through the questions interactively
    Run,
    /// Score the saved answers
    Report {
        #[arg(long)]
        json: bool,
    },
    /// Remove the saved answers
    Reset,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Error> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }
    if cli.percentage {
        config.display.score = ScoreDisplay::Percentage;
    }
    let store = FileStore::new(config.data_dir()?);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => interactive(Session::new(store), &config),
        Command::Report { json } => {
            let report = Session::new(store).report();
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render(config.display.score));
            }
            Ok(())
        }
        Command::Reset => {
            let mut session = Session::new(store);
            session.restart()?;
            println!("Saved answers removed.");
            Ok(())
        }
    }
}

fn interactive<S: KeyValueStore>(mut session: Session<S>, config: &Config) -> Result<(), Error> {
    let mut buffer = String::new();
    println!("{}", HELP);
    show(&session, config);

    loop {
        print!("> ");
        stdout().flush()?;
        buffer.clear();
        if stdin().read_line(&mut buffer)? == 0 {
            return Ok(());
        }
        let input = buffer.trim();
        if input == "q" {
            return Ok(());
        }
        if input == "?" {
            println!("{}", HELP);
            continue;
        }

        let Some(event) = parse_command(input, &session) else {
            println!("Unknown command. Type ? for help.");
            continue;
        };
        match session.handle(event) {
            Ok(Transition::Finished(report)) => {
                show(&session, config);
                ask_email(report.total)?;
            }
            Ok(Transition::Stayed) if input == ">" && session.page() != Page::Results => {
                println!("Answer every question on this page before continuing.");
            }
            Ok(_) => show(&session, config),
            Err(e) => {
                tracing::warn!(error = %e, "event rejected");
                println!("{e}");
            }
        }
    }
}

const HELP: &str = "\
Commands: 1-3 choose an option, n/p next/previous question,
          >/< next/previous page, r restart, ? help, q quit";

fn parse_command<S: KeyValueStore>(input: &str, session: &Session<S>) -> Option<Event> {
    match input {
        ">" => Some(Event::NextPage),
        "<" => Some(Event::PrevPage),
        "n" => Some(Event::NextQuestion),
        "p" => Some(Event::PrevQuestion),
        "r" => Some(Event::Restart),
        _ => {
            let choice: usize = input.parse().ok()?;
            let View::Question(view) = session.view() else {
                return None;
            };
            let option = view.options.get(choice.checked_sub(1)?)?;
            Some(Event::ChooseOption {
                category: view.category,
                question: view.question_id,
                value: option.value,
            })
        }
    }
}

fn show<S: KeyValueStore>(session: &Session<S>, config: &Config) {
    let progress = session.progress();
    println!();
    println!(
        "Step {} of {} ({}% complete)",
        progress.step, progress.of, progress.percent
    );
    match session.view() {
        View::Welcome => {
            println!("UX Health Check");
            println!("16 questions in 4 areas. Type > to begin.");
        }
        View::Question(view) => show_question(&view, config),
        View::Results(report) => print!("{}", report.render(config.display.score)),
        View::Empty => {}
    }
}

fn show_question(view: &QuestionView, config: &Config) {
    println!(
        "{} - question {} of {}",
        view.category_title,
        view.index + 1,
        view.count
    );
    println!("{}", view.prompt);
    for (n, option) in view.options.iter().enumerate() {
        let mark = if option.selected { "(x)" } else { "( )" };
        if config.display.option_detail {
            println!("  {} {} {} [{}]", n + 1, mark, option.label, option.detail);
        } else {
            println!("  {} {} {}", n + 1, mark, option.label);
        }
    }
    let back = if view.can_go_back { "p: previous" } else { "" };
    let forward = if view.can_go_forward { "n: next" } else { "" };
    let next_page = if view.next_enabled { ">: continue" } else { "" };
    let hints: Vec<&str> = [back, forward, next_page]
        .into_iter()
        .filter(|hint| !hint.is_empty())
        .collect();
    println!("{}", hints.join("  "));
}

fn ask_email(total: u8) -> Result<(), Error> {
    tracing::debug!(total, "offering recovery guide");
    print!("\nEmail for the full UX Recovery Guide (blank to skip): ");
    stdout().flush()?;
    let mut email = String::new();
    stdin().read_line(&mut email)?;
    if !email.trim().is_empty() {
        println!("{EMAIL_ACKNOWLEDGEMENT}");
    }
    Ok(())
}
