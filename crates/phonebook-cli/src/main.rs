// phonebook-cli: terminal front end for phonebook-core
// Argument parsing, logging setup, interactive shell

mod cli;
mod output;
mod shell;

use clap::Parser;
use log::debug;
use phonebook_core::sample::{generate, write_sample};
use phonebook_core::{EditOutcome, Error, Pager, Prompted, Result, Store};
use std::io::{self, Write};
use std::process::ExitCode;

use crate::cli::{Cli, Command, query_line};
use crate::output::render_page;
use crate::shell::Shell;

/// `warn` by default, `debug` with `-v`; `RUST_LOG` takes precedence.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    debug!("resolved config: {:?}", config);

    let Some(command) = cli.command else {
        let mut store = Store::open(&config.data_path)?;
        let stdin = io::stdin();
        let stdout = io::stdout();
        return Shell::new(&mut store, stdin.lock(), stdout.lock(), config.page_size()).run();
    };

    let mut stdout = io::stdout().lock();
    match command {
        Command::List { page } => {
            let store = Store::open(&config.data_path)?;
            let pager = Pager::new(store.list(), config.page_size());
            render_page(&mut stdout, &pager.paginated(page))?;
        }
        Command::Search { terms, page } => {
            let store = Store::open(&config.data_path)?;
            let found = store.search(&query_line(&terms))?;
            let pager = Pager::new(&found, config.page_size());
            render_page(&mut stdout, &pager.paginated(page))?;
        }
        Command::Add { terms } => {
            let mut store = Store::open(&config.data_path)?;
            if let Prompted::Ready(contact) = store.add_from_text(&query_line(&terms))? {
                writeln!(stdout, "New contact was created\n{}", contact)?;
            }
        }
        Command::Edit { filter, changes } => {
            let mut store = Store::open(&config.data_path)?;
            match store.edit(&filter, &changes)? {
                EditOutcome::Updated(contact) => {
                    writeln!(stdout, "Contact updated\n{}", contact)?
                }
                EditOutcome::Cancelled => {}
                EditOutcome::NotFound => {
                    return Err(Error::InvalidQuery(format!(
                        "no contact matches '{}'",
                        filter
                    )));
                }
                EditOutcome::Ambiguous(n) => {
                    return Err(Error::InvalidQuery(format!(
                        "{} contacts match '{}', input more specific contact data",
                        n, filter
                    )));
                }
            }
        }
        Command::Seed { count, force } => {
            let count = count.unwrap_or(config.sample_size);
            let contacts = generate(count, &mut rand::rng());
            write_sample(&config.data_path, &contacts, force)?;
            writeln!(
                stdout,
                "Wrote {} contacts to {}",
                contacts.len(),
                config.data_path.display()
            )?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
