use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use desk_wm::actor::reactor::{Reactor, replay};
use desk_wm::common::config::{Config, data_dir};
use desk_wm::common::log;
use desk_wm::model::preferences::LayoutPreferences;
use desk_wm::model::server::{GroupData, LayoutStateData, WindowData};
use desk_wm::model::store::FileStore;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "desk", about = "Inspect desk window manager sessions", version)]
struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a recorded session and print where every window ended up.
    Replay {
        file: PathBuf,
        /// Print the desktop as a tree (the default).
        #[arg(long)]
        tree: bool,
        /// Print windows, groups and layout state as JSON.
        #[arg(long, conflicts_with = "tree")]
        json: bool,
    },

    /// List saved custom layouts.
    Layouts {
        /// Directory of the layout store. Defaults to the user data dir.
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Serialize)]
struct SessionState {
    windows: Vec<WindowData>,
    groups: Vec<GroupData>,
    layout: LayoutStateData,
}

fn main() -> anyhow::Result<()> {
    log::init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Replay { file, json, .. } => run_replay(&file, json),
        Commands::Layouts { store } => run_layouts(cli.config.as_deref(), store),
        Commands::Config => {
            let config = Config::load(cli.config.as_deref())?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn run_replay(file: &Path, json: bool) -> anyhow::Result<()> {
    let reactor: Reactor =
        replay(file).with_context(|| format!("replaying {}", file.display()))?;
    if json {
        let state = SessionState {
            windows: reactor.query_windows(),
            groups: reactor.query_groups(),
            layout: reactor.query_layout_state(),
        };
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", reactor.draw_tree());
    }
    Ok(())
}

fn run_layouts(config: Option<&Path>, store: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load(config)?;
    let dir = store
        .or_else(data_dir)
        .context("no layout store directory; pass --store")?;
    let store = FileStore::new(dir);
    let defaults = LayoutPreferences::from_settings(&config.settings.snap);
    let prefs = LayoutPreferences::load(&store, defaults);

    if prefs.custom_layouts.is_empty() {
        println!("no saved layouts in {}", store.dir().display());
        return Ok(());
    }
    for (name, snapshot) in &prefs.custom_layouts {
        println!("{name}\t{} windows", snapshot.windows.len());
    }
    Ok(())
}
