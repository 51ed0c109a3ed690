//! CLI argument parsing with clap.
//!
//! Without a subcommand the binary starts the interactive shell; each
//! subcommand performs one operation and exits.

use clap::{Parser, Subcommand};
use phonebook_core::{Config, Error, Result};
use std::path::{Path, PathBuf};

/// phonebook - a CSV-backed contact book
#[derive(Parser, Debug)]
#[command(name = "phonebook", version, about = "A CSV-backed contact book")]
pub struct Cli {
    /// Contact file (overrides `data_path` from the config)
    #[arg(short = 'f', long = "file", value_name = "PATH", global = true)]
    pub file: Option<PathBuf>,

    /// Config file (default: <config dir>/phonebook/config.toml)
    #[arg(short = 'c', long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Contacts per page
    #[arg(short = 'p', long = "page-size", value_name = "N", global = true)]
    pub page_size: Option<usize>,

    /// Show debug logging on stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show one page of all contacts
    List {
        #[arg(long, default_value_t = 1, value_parser = parse_page)]
        page: usize,
    },
    /// Show contacts matching every KEY=VALUE term
    Search {
        #[arg(required = true, value_name = "KEY=VALUE")]
        terms: Vec<String>,
        #[arg(long, default_value_t = 1, value_parser = parse_page)]
        page: usize,
    },
    /// Add a contact; all six fields are required
    Add {
        #[arg(required = true, value_name = "KEY=VALUE")]
        terms: Vec<String>,
    },
    /// Update the single contact matching --where with the values in --set
    Edit {
        #[arg(long = "where", value_name = "KEY=VALUE ...")]
        filter: String,
        #[arg(long = "set", value_name = "KEY=VALUE ...")]
        changes: String,
    },
    /// Write a file of generated sample contacts
    Seed {
        /// Number of contacts (default: `sample_size` from the config)
        #[arg(long)]
        count: Option<usize>,
        /// Overwrite an existing contact file
        #[arg(long)]
        force: bool,
    },
}

fn parse_page(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) | Err(_) => Err("Page number must be a positive integer".to_string()),
        Ok(n) => Ok(n),
    }
}

/// `<config dir>/phonebook/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("phonebook").join("config.toml"))
}

impl Cli {
    /// Defaults, then the config file, then command-line overrides.
    ///
    /// An explicit `--config` must exist; the default location is optional.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match (&self.config, default_config_path()) {
            (Some(path), _) => load_required(path)?,
            (None, Some(path)) => Config::load(&path)?,
            (None, None) => Config::default(),
        };
        if let Some(file) = &self.file {
            config.data_path = file.clone();
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        Ok(config)
    }
}

fn load_required(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "config file {} not found",
            path.display()
        )));
    }
    Config::load(path)
}

/// Join positional `KEY=VALUE` terms back into a query line.
pub fn query_line(terms: &[String]) -> String {
    terms.join(" ")
}
