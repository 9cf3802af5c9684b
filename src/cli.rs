//! Command-line argument parsing
//!
//! The binary is a minimal host: it runs the engine against stdin lines as
//! if each were a flat text field, and exposes the management passthroughs
//! (list abbreviations, show/clear usage statistics).

use clap::Parser;
use std::path::PathBuf;

/// Abbreviation expander
#[derive(Parser, Debug)]
#[command(name = "expando", version, about = "Expand abbreviations in text")]
pub struct CliArgs {
    /// Abbreviation file (defaults to ~/.config/expando/abbreviations.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List configured abbreviations and exit
    #[arg(long)]
    pub list: bool,

    /// Show usage statistics and exit
    #[arg(long)]
    pub stats: bool,

    /// Clear usage statistics and exit
    #[arg(long)]
    pub clear_stats: bool,

    /// Keep running and reload when the abbreviation file changes
    #[arg(short, long)]
    pub watch: bool,
}
