use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tickoff::config::Config;
use tickoff::controller::{BulkOutcome, ControllerOptions, Prompt, Submit, TodoController};
use tickoff::db::Database;
use tickoff::persistence::{EphemeralPersistence, SlotPersistence, TaskPersistence};
use tickoff::render::TerminalRenderer;

#[derive(Parser)]
#[command(name = "tick")]
#[command(about = "A small persisted to-do list")]
struct Cli {
    /// SQLite file holding the task list
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Slot name the task list is stored under
    #[arg(long, global = true)]
    key: Option<String>,

    /// Keep tasks in memory only; nothing is loaded or saved
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all tasks, newest first
    List,
    /// Add a task
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Toggle the task at a position shown by `list`
    Toggle { position: usize },
    /// Remove completed tasks
    Clean,
    /// Remove all tasks
    Empty,
    /// Interactive session, one command per line
    Shell,
}

/// Initialize tracing on stderr so stdout only carries the task list.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tickoff=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Confirmations on stdin, notices on stderr.
struct TerminalPrompt {
    assume_yes: bool,
}

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{} [y/N] ", message);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}

type Controller =
    TodoController<Box<dyn TaskPersistence>, TerminalRenderer<io::Stdout>, TerminalPrompt>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::load().with_overrides(cli.db.clone(), cli.key.clone());

    let persistence: Box<dyn TaskPersistence> = if cli.ephemeral {
        Box::new(EphemeralPersistence)
    } else {
        let db = match &config.database_path {
            Some(path) => Database::open(path)?,
            None => Database::open_default()?,
        };
        db.migrate()?;
        Box::new(SlotPersistence::new(db, config.storage_key.clone()))
    };

    let options = ControllerOptions {
        formatter: config.formatter(),
        allow_blank: config.allow_blank,
    };
    let prompt = TerminalPrompt {
        assume_yes: cli.yes,
    };

    // Starting renders the list, which is all `list` needs.
    let mut controller =
        TodoController::start(persistence, TerminalRenderer::stdout(), prompt, options);

    match cli.command {
        None | Some(Commands::List) => {}
        Some(Commands::Add { text }) => {
            controller.set_input(text.join(" "));
            controller.submit();
        }
        Some(Commands::Toggle { position }) => toggle(&mut controller, position),
        Some(Commands::Clean) => report(controller.clean()),
        Some(Commands::Empty) => report(controller.empty()),
        Some(Commands::Shell) => run_shell(&mut controller)?,
    }

    Ok(())
}

fn toggle(controller: &mut Controller, position: usize) {
    let toggled = position
        .checked_sub(1)
        .is_some_and(|row| controller.toggle_row(row));
    if !toggled {
        eprintln!("No task at position {}", position);
    }
}

fn report(outcome: BulkOutcome) {
    match outcome {
        BulkOutcome::Declined => eprintln!("Nothing removed."),
        BulkOutcome::Removed(n) => eprintln!("Removed {} task(s).", n),
    }
}

const SHELL_HELP: &str = "\
Commands:
  add <text>    add a task (any other text is added as-is)
  toggle <n>    toggle the task at position n
  clean         remove completed tasks
  empty         remove all tasks
  list          show the list again
  help          show this help
  quit          leave";

fn run_shell(controller: &mut Controller) -> anyhow::Result<()> {
    let stdin = io::stdin();
    loop {
        eprint!("> ");
        io::stderr().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);
        let (command, rest) = line
            .trim_start()
            .split_once(' ')
            .unwrap_or((line.trim(), ""));

        match command {
            "quit" | "exit" => break,
            "help" => eprintln!("{}", SHELL_HELP),
            "list" => controller.render(),
            "clean" => report(controller.clean()),
            "empty" => report(controller.empty()),
            "toggle" => match rest.trim().parse::<usize>() {
                Ok(position) => toggle(controller, position),
                Err(_) => eprintln!("Usage: toggle <n>"),
            },
            "add" => submit(controller, rest),
            _ => submit(controller, line),
        }
    }
    Ok(())
}

fn submit(controller: &mut Controller, text: &str) {
    controller.set_input(text);
    if controller.submit() == Submit::Rejected {
        tracing::debug!("Shell input rejected");
    }
}
