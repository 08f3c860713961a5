// DSViz: step-traceable data structures with a terminal visualizer

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Args, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::EnvFilter;

use dsviz::config::{
    Config, DEFAULT_CAPACITY, DEFAULT_EXPRESSION_CAPACITY, DEFAULT_PRIORITY, DEFAULT_SNAPSHOT_LIMIT,
};
use dsviz::session::script::{DEMO_SCRIPT, parse_script};
use dsviz::session::{Request, Session};
use dsviz::ui::App;

/// Step-traceable stacks, queues, expression evaluation and priority scheduling
#[derive(Debug, Parser)]
#[command(name = "dsviz")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to this file (the TUI discards logs otherwise)
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    settings: Settings,
}

#[derive(Debug, Args)]
struct Settings {
    /// Capacity of every stack and queue
    #[arg(long, global = true, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Priority for priority-queue elements enqueued without one
    #[arg(long, global = true, default_value_t = DEFAULT_PRIORITY, allow_negative_numbers = true)]
    default_priority: i64,

    /// Stack capacity used while evaluating expressions
    #[arg(long, global = true, default_value_t = DEFAULT_EXPRESSION_CAPACITY)]
    expression_capacity: usize,

    /// Memory budget for the snapshot history, in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_SNAPSHOT_LIMIT)]
    snapshot_limit: usize,
}

impl From<&Settings> for Config {
    fn from(settings: &Settings) -> Self {
        Config {
            capacity: settings.capacity,
            default_priority: settings.default_priority,
            expression_capacity: settings.expression_capacity,
            snapshot_limit: settings.snapshot_limit,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Execute a JSON-lines script and print one JSON response per request
    #[command(visible_alias = "r")]
    Run {
        /// Script with one request per line
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Pretty-print each response
        #[arg(long)]
        pretty: bool,
    },

    /// Execute a script, then step through its history in the terminal UI
    #[command(visible_alias = "v")]
    View {
        /// Script with one request per line
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
    },

    /// Step through the built-in walkthrough of every structure
    Demo {
        /// Print the walkthrough script instead of running it
        #[arg(long)]
        print: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let interactive = !matches!(
        cli.command,
        Some(Command::Run { .. }) | Some(Command::Demo { print: true })
    );
    init_tracing(cli.verbose, cli.log_file.as_deref(), interactive)?;

    let config = Config::from(&cli.settings);

    match cli.command {
        Some(Command::Run { script, pretty }) => run_script(&script, config, pretty),
        Some(Command::View { script }) => view(Some(script.as_path()), config),
        Some(Command::Demo { print: true }) => {
            print!("{}", DEMO_SCRIPT.trim_start());
            Ok(())
        }
        Some(Command::Demo { print: false }) | None => view(None, config),
    }
}

fn init_tracing(verbose: u8, log_file: Option<&Path>, interactive: bool) -> io::Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // Anything written to the terminal would corrupt the alternate screen
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load_requests(script: Option<&Path>) -> Result<Vec<Request>, Box<dyn std::error::Error>> {
    let requests = match script {
        Some(path) => {
            if !path.exists() {
                eprintln!("Error: File '{}' not found", path.display());
                std::process::exit(1);
            }
            let source = fs::read_to_string(path)?;
            parse_script(&source)?
        }
        None => parse_script(DEMO_SCRIPT)?,
    };
    tracing::info!(requests = requests.len(), "script loaded");
    Ok(requests)
}

fn run_script(
    script: &Path,
    config: Config,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let requests = load_requests(Some(script))?;
    let mut session = Session::without_history(config)?;

    let mut failures = 0;
    for request in requests {
        let response = session.execute(request)?;
        if !response.is_success() {
            failures += 1;
        }
        let line = if pretty {
            serde_json::to_string_pretty(&response)?
        } else {
            serde_json::to_string(&response)?
        };
        println!("{}", line);
    }

    tracing::info!(
        executed = session.executed(),
        failures,
        "script finished"
    );
    Ok(())
}

fn view(script: Option<&Path>, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let requests = load_requests(script)?;
    let title = script
        .and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "demo".to_string());

    let mut session = Session::new(config)?;
    if let Err(e) = session.run_script(requests) {
        eprintln!("Execution stopped: {}", e);
        eprintln!("Entering TUI with partial history...");
    }

    // Rewind to the beginning for TUI
    session.rewind_to_start();

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, title);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
