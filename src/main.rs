//! Courtroom simulator.
//!
//! Usage:
//!   courtroom-sim replay scene.txt          # Play a script deterministically
//!   courtroom-sim replay scene.txt -a ./base # Resolve assets from a folder
//!   courtroom-sim live < scene.txt          # Play lines from stdin in real time
//!   courtroom-sim config                    # Print the effective configuration

use clap::{Parser, Subcommand};
use courtroom_sim::assets::{AnyAsset, FsAssetResolver};
use courtroom_sim::config::CourtroomConfig;
use courtroom_sim::courtroom::{Backend, Courtroom};
use courtroom_sim::runtime;
use courtroom_sim::script;
use courtroom_sim::session::SessionState;
use courtroom_sim::theme::Theme;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "courtroom-sim")]
#[command(about = "Courtroom chat scene simulator")]
struct Cli {
    /// Config file (defaults to the user data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Theme JSON file
    #[arg(long, global = true)]
    theme: Option<PathBuf>,

    /// Asset base directory; every asset is assumed present when omitted
    #[arg(short, long, global = true)]
    assets: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a script and print the resulting chat log
    Replay {
        /// Script of `HEADER#...#%` lines
        script: PathBuf,

        /// Our own character id
        #[arg(long)]
        own_id: Option<usize>,
    },

    /// Read script lines from stdin in real time
    Live {
        /// Character names, in id order
        #[arg(short, long, value_delimiter = ',')]
        characters: Vec<String>,
    },

    /// Print the effective configuration as JSON
    Config,
}

fn backend(assets: Option<PathBuf>) -> Backend {
    match assets {
        Some(base) => Backend::new(FsAssetResolver::new(base)),
        None => Backend::new(AnyAsset),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CourtroomConfig::load_from(path),
        None => CourtroomConfig::load(),
    };
    let theme = cli
        .theme
        .as_deref()
        .map(Theme::load_from)
        .unwrap_or_default();

    match cli.command {
        Commands::Replay { script: path, own_id } => {
            let text = std::fs::read_to_string(&path)?;
            let lines = script::parse_script(&text)?;
            let mut session = script::session_from_script(&lines);
            session.own_char_id = own_id;

            let mut courtroom = Courtroom::new(config, theme, session, backend(cli.assets));
            runtime::replay(&mut courtroom, &lines);
            print!("{}", runtime::report(&courtroom));
        }
        Commands::Live { characters } => {
            let session = SessionState::with_characters(characters);
            let mut courtroom = Courtroom::new(config, theme, session, backend(cli.assets));
            runtime::run_live(&mut courtroom)?;
            print!("{}", runtime::report(&courtroom));
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
