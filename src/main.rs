mod checklist;
mod config;
mod logging;
mod tui;

use anyhow::{Context, Result};
use checklist::models::Checklist;
use checklist::storage::{FileStorage, Storage, load_items};
use clap::{Command, CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::{Generator, Shell, generate};
use config::{Config, ConfigError, KEYS};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::info;
use tui::app::App;
use tui::state::{self, Action, AppState, Effect, SystemClock};
use tui::ui;

const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "packlist")]
#[command(about = "A terminal checklist for things to pack", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Print the checklist")]
    List,
    #[command(about = "Add an item to the end of the checklist")]
    Add {
        #[arg(required = true, num_args = 1.., help = "Item text")]
        text: Vec<String>,
    },
    #[command(about = "Delete every item")]
    Clear {
        #[arg(short, long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    #[command(about = "Configuration management")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(about = "Generate shell completion scripts")]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    #[command(about = "Set a configuration value")]
    Set {
        #[arg(help = "Configuration key (storage_dir or log_file)")]
        key: String,
        #[arg(help = "Configuration value", value_hint = ValueHint::AnyPath)]
        value: String,
    },
    #[command(about = "Get a configuration value")]
    Get {
        #[arg(help = "Configuration key")]
        key: String,
    },
    #[command(about = "List all configuration values")]
    List,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Config { action }) => handle_config_command(action).map_err(anyhow::Error::from),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
            Ok(())
        }
        Some(Commands::List) => run_list(),
        Some(Commands::Add { text }) => run_add(&text.join(" ")),
        Some(Commands::Clear { yes }) => run_clear(yes),
        None => run_main_app(),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn handle_config_command(action: ConfigAction) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, value)?;
            config.save()?;
            println!("Configuration saved successfully.");
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.resolved(&key)?.display());
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for key in KEYS {
                let source = if config.get(key)?.is_some() { "" } else { " (default)" };
                println!("{} = {}{}", key, config.resolved(key)?.display(), source);
            }
        }
    }
    Ok(())
}

/// Loads configuration, starts logging and opens the item store.
fn open_storage() -> Result<FileStorage> {
    let config = Config::load().context("Configuration error")?;

    if let Err(e) = logging::init(&config.log_file()?) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    let storage = FileStorage::new(config.storage_dir()?);
    info!(dir = %storage.dir().display(), "opened storage");
    Ok(storage)
}

fn load_state<S: Storage>(storage: &S) -> AppState {
    AppState::new(Checklist::from_items(load_items(storage)), &SystemClock)
}

fn run_list() -> Result<()> {
    let storage = open_storage()?;
    let state = load_state(&storage);

    for item in &state.checklist.items {
        let mark = if item.checked { "x" } else { " " };
        println!("[{}] {}", mark, item.name);
    }
    Ok(())
}

fn run_add(text: &str) -> Result<()> {
    let mut storage = open_storage()?;
    let mut state = load_state(&storage);

    let effect = state::add_item(&mut state, text, &SystemClock);
    if effect == Effect::None {
        println!("Nothing to add: item text is empty.");
        return Ok(());
    }

    effect
        .apply(&state.checklist.items, &mut storage)
        .context("Failed to save checklist")?;
    println!("Added \"{}\".", text.trim());
    Ok(())
}

fn run_clear(yes: bool) -> Result<()> {
    let mut storage = open_storage()?;
    let mut state = load_state(&storage);

    let _ = state::reduce(&mut state, Action::RequestDeleteAll, &SystemClock);
    if state.overlay.is_none() {
        println!("The checklist is already empty.");
        return Ok(());
    }

    let answer = if yes || confirm("Really delete every item?")? {
        Action::ConfirmDeleteAll
    } else {
        Action::DeclineDeleteAll
    };

    let effect = state::reduce(&mut state, answer, &SystemClock);
    if effect == Effect::None {
        println!("Nothing was deleted.");
        return Ok(());
    }

    effect
        .apply(&state.checklist.items, &mut storage)
        .context("Failed to clear checklist")?;
    println!("Deleted every item.");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

fn run_main_app() -> Result<()> {
    let storage = open_storage()?;
    let mut app = App::new(storage);

    run_tui(&mut app)?;

    info!("exiting");
    Ok(())
}

fn run_tui<S: Storage>(app: &mut App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend, S: Storage>(terminal: &mut Terminal<B>, app: &mut App<S>) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key_event(key);
                }
            }
        } else {
            app.tick();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn print_completions<G: Generator>(generator: G, cmd: &mut Command) {
    generate(generator, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
