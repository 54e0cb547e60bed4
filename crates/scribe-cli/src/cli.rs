//! Command-line argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use scribe_engine::AssistMode;
use std::path::PathBuf;

/// Render, export and assist-edit block documents
#[derive(Parser, Debug)]
#[command(name = "scribe", version, about)]
pub struct Cli {
    /// Config file to use instead of ~/.config/scribe/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a document to styled HTML
    Render {
        /// Markdown or saved-data (.json) document
        input: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Insert stored text verbatim instead of escaping it
        #[arg(long)]
        trusted: bool,
    },

    /// Render and paginate a document with the configured renderer
    Export {
        input: PathBuf,
        /// Directory for the artifact (defaults to the configured output_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Artifact filename
        #[arg(short, long)]
        filename: Option<String>,
    },

    /// Convert a document to saved-data JSON
    Convert {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Send a span of the document to a completion command and splice the
    /// answer back
    Assist {
        input: PathBuf,
        /// Selection start, in codepoints of the rendered text
        #[arg(long)]
        from: usize,
        /// Selection end, in codepoints of the rendered text
        #[arg(long)]
        to: usize,
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Saved-data file to write (defaults to INPUT with a .json extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Program that reads `{"user_input": ...}` on stdin and prints
        /// `{"content": ...}`
        #[arg(required = true, last = true, value_name = "SERVICE")]
        service: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Replace,
    Continue,
}

impl From<ModeArg> for AssistMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Replace => AssistMode::Replace,
            ModeArg::Continue => AssistMode::Continue,
        }
    }
}
