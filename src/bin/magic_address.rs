//! magic-address: interactive demo of the address input
//!
//! Reads lines from stdin and feeds them to one address field backed by an
//! in-memory name directory. After each line the field is settled and its view
//! printed.
//!
//! ## Commands
//!
//! - any text: typed into the field
//! - `:select <n>`: pick suggestion `n` (0-based)
//! - `:book`: list the address book
//! - `:toggle`: open or close the suggestion panel
//! - `:connect <address>`: change the connected wallet
//! - `:quit`
//!
//! ## Example Usage
//!
//! ```bash
//! magic-address --directory names.json --contracts deployed.json \
//!     --connected 0xd8da6bf26964af9d7eed9e03e53415d37aa96045
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use magic_address::{
    ingest_known, load_known_identifiers, spawn_primary_sync, AddressBook, AddressInput,
    AvatarView, Effect, InputConfig, InputView, Prefix,
};
use magic_resolver::{CachingResolver, StaticResolver};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "magic-address",
    author,
    version,
    about = "Interactive address field with alias resolution and suggestions"
)]
struct Cli {
    /// JSON list of `{name, address, avatar?}` records to resolve against
    #[arg(long)]
    directory: Option<PathBuf>,

    /// JSON map of known contract names to addresses
    #[arg(long)]
    contracts: Option<PathBuf>,

    /// Connected wallet address
    #[arg(long)]
    connected: Option<String>,

    /// JSON config file (environment variables override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated resolver latency in milliseconds
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,

    /// Give up on a line's lookups after this many milliseconds
    #[arg(long, default_value_t = 10_000)]
    settle_timeout_ms: u64,

    /// Print the view as JSON
    #[arg(long)]
    json: bool,
}

enum Command {
    Type(String),
    Select(usize),
    Book,
    Toggle,
    Connect(String),
    Quit,
}

fn parse_command(line: &str) -> Result<Command> {
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Type(line.to_string()));
    };
    let mut parts = rest.split_whitespace();
    let command = match (parts.next(), parts.next()) {
        (Some("select"), Some(n)) => {
            Command::Select(n.parse().with_context(|| format!("bad index {}", n))?)
        }
        (Some("book"), None) => Command::Book,
        (Some("toggle"), None) => Command::Toggle,
        (Some("connect"), Some(address)) => Command::Connect(address.to_string()),
        (Some("quit"), None) => Command::Quit,
        _ => anyhow::bail!("unknown command :{}", rest),
    };
    Ok(command)
}

fn print_view(view: &InputView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(view)?);
        return Ok(());
    }
    let prefix = match &view.prefix {
        Prefix::None => String::new(),
        Prefix::Loading => "[...] ".to_string(),
        Prefix::Alias { label, avatar } => match avatar {
            AvatarView::Ready(url) => format!("[{} <{}>] ", label, url),
            AvatarView::Loading | AvatarView::Missing => format!("[{}] ", label),
        },
    };
    let mut flags = Vec::new();
    if view.disabled {
        flags.push("disabled");
    }
    if view.error {
        flags.push("invalid");
    }
    if view.refocus {
        flags.push("focus");
    }
    println!("{}{}  {}", prefix, view.value, flags.join(","));
    if view.suggestions_open {
        print_suggestions(view);
    }
    Ok(())
}

fn print_suggestions(view: &InputView) {
    for (i, s) in view.suggestions.iter().enumerate() {
        let text = s.short.clone().unwrap_or_else(|| s.address.to_string());
        match &s.label {
            Some(label) => println!("  {:>2}. {}  {}", i, text, label),
            None => println!("  {:>2}. {}", i, text),
        }
    }
}

fn print_effects(effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::SetValue(value) => eprintln!("-> value set to {}", value),
            Effect::Registered { address, .. } => eprintln!("-> saved {}", address),
            Effect::Invalid(err) => eprintln!("-> {}", err),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => InputConfig::from_json_file(path)?.with_env_overrides(),
        None => InputConfig::from_env(),
    };

    let directory = match &cli.directory {
        Some(path) => StaticResolver::from_json_file(path)?,
        None => StaticResolver::new(),
    };
    let resolver = Arc::new(CachingResolver::new(
        directory.with_latency(Duration::from_millis(cli.latency_ms)),
    ));

    let book = AddressBook::shared();
    if let Some(path) = &cli.contracts {
        ingest_known(&book, load_known_identifiers(path)?);
    }
    let (connected_tx, connected_rx) = watch::channel(cli.connected.clone());
    let _sync = spawn_primary_sync(Arc::clone(&book), connected_rx);

    let mut input = AddressInput::new(&config, Arc::clone(&book), resolver);
    let settle_timeout = Duration::from_millis(cli.settle_timeout_ms);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(line.trim_end()) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("error: {:#}", err);
                continue;
            }
        };
        match command {
            Command::Type(text) => print_effects(&input.on_change(text)),
            Command::Select(n) => match book.suggestions().get(n) {
                Some(s) => print_effects(&input.select_suggestion(s.address)),
                None => {
                    eprintln!("error: no suggestion {}", n);
                    continue;
                }
            },
            Command::Book => {
                let now = Utc::now();
                for (i, s) in book.suggestions().iter().enumerate() {
                    println!(
                        "  {:>2}. {}  {}",
                        i,
                        s.address,
                        s.display_label(now).unwrap_or_default()
                    );
                }
                continue;
            }
            Command::Toggle => input.toggle_suggestions(),
            Command::Connect(address) => {
                connected_tx.send_replace(Some(address));
                tokio::task::yield_now().await;
            }
            Command::Quit => break,
        }

        match tokio::time::timeout(settle_timeout, input.settle()).await {
            Ok(effects) => print_effects(&effects),
            Err(_) => eprintln!("lookups still pending after {:?}", settle_timeout),
        }
        print_view(&input.view(), cli.json)?;
    }
    Ok(())
}
