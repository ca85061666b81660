//! practice - terminal practice companion
//!
//! Run with: cargo run --bin practice -- --config practice.toml

mod app;
mod ui;

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};

use app::App;
use practice_companion::config::CompanionConfig;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Settings file; created with defaults if missing
    #[arg(long, default_value = "practice.toml")]
    config: PathBuf,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config = CompanionConfig::load_or_default(&args.config)
        .wrap_err_with(|| format!("failed to load {}", args.config.display()))?;
    init_tracing(&config.storage.log_path)?;

    let mut app = App::new(&config);
    let mut terminal = ratatui::init();
    let res = app.run(&mut terminal);
    ratatui::restore();
    res
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_tracing(path: &str) -> EyreResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("failed to open log file {path}"))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}
