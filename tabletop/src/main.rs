//! Tabletop inventory tracker.
//!
//! A vim-style terminal interface for keeping a character's sheet, gear,
//! coins and notes.
//!
//! # Headless Mode
//!
//! Run with `--headless` to read commands from stdin, one per line:
//!
//! ```bash
//! printf 'new Thorin\nadd Longsword\ninv\nsave\nquit\n' | cargo run -p tabletop -- --headless
//! ```

mod app;
mod events;
mod headless;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tabletop_core::{CommandError, Session, SessionConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

const DEFAULT_FILTER: &str = "tabletop=info,tabletop_core=info";

/// Command line options
#[derive(Debug, Default)]
struct Args {
    headless: bool,
    help: bool,
    dir: Option<PathBuf>,
    open: Option<PathBuf>,
    new: Option<String>,
}

impl Args {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut parsed = Args::default();
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--headless" => parsed.headless = true,
                "-h" | "--help" => parsed.help = true,
                "--dir" => parsed.dir = Some(value(&mut iter, arg)?.into()),
                "--open" => parsed.open = Some(value(&mut iter, arg)?.into()),
                "--new" => parsed.new = Some(value(&mut iter, arg)?.to_string()),
                other => return Err(format!("unknown option '{other}'")),
            }
        }
        if parsed.open.is_some() && parsed.new.is_some() {
            return Err("--open and --new cannot be used together".to_string());
        }
        Ok(parsed)
    }
}

fn value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a str, String> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} needs a value"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let raw_args: Vec<String> = std::env::args().collect();
    let args = match Args::parse(&raw_args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    if args.help {
        print_help();
        return Ok(());
    }

    let mut config = SessionConfig::from_env();
    if let Some(dir) = &args.dir {
        config = config.with_save_dir(dir);
    }

    init_tracing(&config, args.headless);
    tracing::info!(save_dir = %config.save_dir.display(), headless = args.headless, "starting");

    let mut session = Session::new(&config)?;
    let startup = start_record(&mut session, &args);

    if args.headless {
        if let Err(e) = &startup {
            eprintln!("[ERROR] {e}");
        }
        let stdin = io::stdin();
        let stdout = io::stdout();
        headless::run(&mut session, stdin.lock(), stdout.lock())?;
        return Ok(());
    }

    let mut app = App::new(session);
    if let Err(e) = startup {
        app.set_status(format!("Error: {e}"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "terminal error");
        eprintln!("Error: {e}");
    }

    Ok(())
}

/// Open or create the character named on the command line, if any.
fn start_record(session: &mut Session, args: &Args) -> Result<(), CommandError> {
    if let Some(path) = &args.open {
        session.open(path)?;
    } else if let Some(name) = &args.new {
        session.new_character(name)?;
    }
    Ok(())
}

/// Install the tracing subscriber.
///
/// The TUI owns the terminal, so it logs to a file; headless mode logs to stderr.
fn init_tracing(config: &SessionConfig, headless: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    if headless {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
        return;
    }

    let path = config.log_path();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    // No log file, no logging; the terminal is not ours to write to
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_help() {
    println!("Tabletop Inventory - character sheets, gear and coin for tabletop RPGs");
    println!();
    println!("USAGE:");
    println!("  tabletop [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help          Show this help message");
    println!("  --headless          Read commands from stdin instead of running the TUI");
    println!("  --dir <PATH>        Save directory (default: ~/tabletop_inventory)");
    println!("  --open <FILE>       Open a character file or library entry on start");
    println!("  --new <NAME>        Start with a blank character");
    println!();
    println!("ENVIRONMENT:");
    println!("  {}   Save directory", tabletop_core::session::SAVE_DIR_ENV);
    println!("  {}   Log file (default: <save dir>/tabletop.log)", tabletop_core::session::LOG_FILE_ENV);
    println!("  RUST_LOG            Log filter (default: {DEFAULT_FILTER})");
    println!();
    println!("COMMANDS:");
    for (usage, summary) in tabletop_core::command::HELP {
        println!("  {usage:<24} {summary}");
    }
    println!();
    println!("EXAMPLES:");
    println!("  tabletop                               # Interactive TUI");
    println!("  tabletop --new \"Mira Stormborn\"        # Start a new character");
    println!("  tabletop --headless < commands.txt     # Scripted session");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        let mut raw = vec!["tabletop".to_string()];
        raw.extend(list.iter().map(|s| s.to_string()));
        Args::parse(&raw)
    }

    #[test]
    fn test_parse_flags() {
        let parsed = args(&["--headless", "--dir", "/tmp/saves", "--new", "Mira"]).unwrap();
        assert!(parsed.headless);
        assert_eq!(parsed.dir, Some(PathBuf::from("/tmp/saves")));
        assert_eq!(parsed.new.as_deref(), Some("Mira"));
        assert!(parsed.open.is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(args(&["--dir"]).unwrap_err().contains("needs a value"));
        assert!(args(&["--fly"]).unwrap_err().contains("unknown option"));
        assert!(args(&["--open", "a.json", "--new", "B"]).is_err());
    }
}
