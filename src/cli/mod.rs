//! CLI module - Command-line interface for Lightscape
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{CommandFactory, Parser, Subcommand};

/// Lightscape - AI lighting design for architecture photos
#[derive(Parser)]
#[command(name = "lightscape")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server until Ctrl+C
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// Create a user and print its API key
    UserAdd {
        username: String,
        password: String,
    },

    /// Show a user's recent generation history
    #[command(alias = "h")]
    History {
        username: String,
        /// Number of entries to show
        #[arg(default_value = "10")]
        limit: u64,
    },
}

pub fn print_help() {
    let _ = Cli::command().print_help();
    println!();
}
