use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::config::API_KEY_ENV;
use crate::generate::{DEFAULT_LENGTH, DEFAULT_MAX_POLLS};

/// Deckhand - inspect slide decks, edit them remotely, keep every version
#[derive(Parser)]
#[command(name = "deckhand")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// API key for the presentation service
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Presentation service base URL
    #[arg(long, env = "SLIDE_SPEAK_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Directory for downloaded and edited decks
    #[arg(long, env = "DECKHAND_DOWNLOAD_DIR", default_value = ".", global = true)]
    pub download_dir: PathBuf,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the slides and shapes of a deck (path or URL)
    Show {
        source: String,

        /// Only this slide
        #[arg(short, long)]
        slide: Option<usize>,
    },
    /// Save the extracted slide model as JSON
    Export {
        source: String,

        /// Output file (defaults to the deck path with a .json extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace shape text through the edit service
    Edit {
        source: String,

        /// Replace by shape position, e.g. `1.2=New text`
        #[arg(long = "set", value_name = "SLIDE.POS=TEXT")]
        set: Vec<String>,

        /// Replace by shape name, e.g. `1:Title=New text`
        #[arg(long = "set-name", value_name = "SLIDE:NAME=TEXT")]
        set_name: Vec<String>,

        /// Also save the edited deck's JSON here
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Generate a new deck from plain text
    Generate {
        text: String,

        #[arg(long)]
        theme: Option<String>,

        /// Number of slides
        #[arg(long, default_value_t = DEFAULT_LENGTH)]
        length: u32,

        /// Seconds between status polls
        #[arg(long, default_value_t = 2)]
        interval_secs: u64,

        /// Give up after this many polls
        #[arg(long, default_value_t = DEFAULT_MAX_POLLS)]
        max_polls: u32,

        /// Download the generated deck and show it
        #[arg(long)]
        download: bool,
    },
    /// Menu-driven session (default)
    Interactive,
}
