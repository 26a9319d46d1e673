mod report;

use std::future::Future;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use token_themes_core::token_store::token_set_from_deep_json;
use token_themes_core::{
    Analytics, AutoConfirm, Command, Confirm, HostBridge, HostUpdate, Settings, Snapshot, Store,
    ThemeManager,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Print themes, active themes and resolved token set statuses
    Show {
        #[arg(value_name = "STATE")]
        state: PathBuf,
    },
    /// Dispatch a JSON array of commands against a state file
    Apply {
        #[arg(value_name = "STATE")]
        state: PathBuf,
        #[arg(value_name = "COMMANDS")]
        commands: PathBuf,
        /// Write the resulting state here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Delete themes without asking
        #[arg(long)]
        yes: bool,
    },
    /// Print the visible rows of a token set
    Tree {
        #[arg(value_name = "STATE")]
        state: PathBuf,
        #[arg(value_name = "SET")]
        set: String,
    },
    /// Import a nested token JSON document as a token set
    Import {
        #[arg(value_name = "STATE")]
        state: PathBuf,
        #[arg(value_name = "TOKENS")]
        tokens: PathBuf,
        #[arg(long, value_name = "NAME")]
        set: String,
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Asks on stderr, reads the answer from stdin.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, text: &str) -> impl Future<Output = bool> {
        eprint!("{text} [y/N] ");
        let mut answer = String::new();
        let read = std::io::stdin().lock().read_line(&mut answer);
        std::future::ready(read.is_ok() && answer.trim().eq_ignore_ascii_case("y"))
    }
}

struct LogAnalytics;

impl Analytics for LogAnalytics {
    fn track(&self, event: &str, payload: &serde_json::Value) {
        tracing::info!(event, %payload, "track");
    }
}

struct LogHost;

impl HostBridge for LogHost {
    fn apply(&self, update: &HostUpdate) {
        tracing::info!(
            sets = update.used_token_set.len(),
            groups = update.style_references.len(),
            "host styles updated"
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => {
            Settings::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Settings::default(),
    };

    let filter = EnvFilter::try_from_env("TOKEN_THEMES_LOG")
        .or_else(|_| EnvFilter::try_new(&settings.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Action::Show { state } => {
            let state = load_snapshot(&state)?.into_state();
            emit(&report::overview(&state, &settings))
        }
        Action::Apply {
            state,
            commands,
            output,
            yes,
        } => {
            let mut store = open_store(&state, &settings)?;
            let text = std::fs::read_to_string(&commands)
                .with_context(|| format!("reading {}", commands.display()))?;
            let commands: Vec<Command> = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", commands.display()))?;
            apply(&mut store, &settings, commands, yes);
            save(&store, output.as_deref())
        }
        Action::Tree { state, set } => {
            let state = load_snapshot(&state)?.into_state();
            let Some(tokens) = state.tokens().get(&set) else {
                bail!("no token set named {set:?}");
            };
            emit(&report::tree(tokens, state.collapsed_tokens()))
        }
        Action::Import {
            state,
            tokens,
            set,
            output,
        } => {
            let mut store = open_store(&state, &settings)?;
            let text = std::fs::read_to_string(&tokens)
                .with_context(|| format!("reading {}", tokens.display()))?;
            let value: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", tokens.display()))?;
            let imported = token_set_from_deep_json(&value)?;
            tracing::info!(set = %set, tokens = imported.tokens().len(), "importing token set");
            store.dispatch(Command::SetTokenSet {
                name: set,
                set: imported,
            });
            save(&store, output.as_deref())
        }
    }
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Snapshot::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

fn open_store(path: &Path, settings: &Settings) -> Result<Store> {
    let state = load_snapshot(path)?.into_state();
    Ok(Store::new(state)
        .with_history_limit(settings.store.history_limit)
        .with_analytics(LogAnalytics)
        .with_host(LogHost))
}

/// Deletions go through the same confirmation the theme dialog asks for.
fn apply(store: &mut Store, settings: &Settings, commands: Vec<Command>, yes: bool) {
    for command in commands {
        let Command::DeleteTheme { id } = command else {
            store.dispatch(command);
            continue;
        };
        let mut manager = ThemeManager::new(store.state(), settings);
        manager.toggle_editor(Some(&id));
        let deleted = if yes {
            pollster::block_on(manager.delete_current(store, &AutoConfirm(true)))
        } else {
            pollster::block_on(manager.delete_current(store, &StdinConfirm))
        };
        if !deleted {
            tracing::info!(id = %id, "theme kept");
        }
    }
}

fn save(store: &Store, output: Option<&Path>) -> Result<()> {
    let text = Snapshot::from_state(store.state()).to_json_pretty()?;
    match output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "state written");
            Ok(())
        }
        None => emit(&text),
    }
}

fn emit(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}
