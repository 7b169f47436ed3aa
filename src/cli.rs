// Command-line interface definitions for quillkey
//
// Kept in the library so the argument surface can be tested without
// spawning the binary.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quillkey")]
#[command(author, version, about = "Rewrite selected text with a local LLM from a global hotkey")]
#[command(long_about = "
quillkey rewrites the text in the focused field with a local Ollama model.
Press the hotkey, the field's text is selected, rewritten and pasted back,
and your clipboard is restored afterwards.

SETUP:
  1. Install Ollama and run: ollama serve
  2. Pull the model: ollama pull qwen2.5:3b
  3. macOS: grant Accessibility access to your terminal
  4. Run: quillkey check (to verify the model is available)
  5. Run: quillkey (to start the daemon)

USAGE:
  Press Ctrl+Alt+X (either side) in any app except terminals.
")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<std::path::PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Override the rewrite model (e.g., qwen2.5:3b, llama3.2:1b)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Override the generate endpoint URL
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run as daemon (default if no command specified)
    Daemon,

    /// Check the rewrite service and list installed models
    Check,

    /// Rewrite TEXT once and print the result
    Rewrite {
        /// Text to rewrite
        text: String,
    },

    /// Show current configuration
    Config {
        /// Write the commented default config file if none exists
        #[arg(long)]
        init: bool,
    },
}
