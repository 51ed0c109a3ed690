//! Interactive command loop.
//!
//! Reads one line per prompt from any `BufRead` and writes to any `Write`,
//! so the whole dialogue can be driven from a byte buffer in tests. End of
//! input cancels the current prompt and then quits.

use phonebook_core::{
    CANCEL_SENTINEL, Error, Field, Lookup, Pager, Prompted, Query, Result, Store,
};
use std::fmt::Display;
use std::io::{self, BufRead, Write};

use crate::output::render_page;

const COMMAND_PROMPT: &str = "Input command: ";
const PAGE_PROMPT: &str = "For page navigation input page number or \"q\" for exit command ";

/// Prompt/response plumbing over a reader and a writer.
struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn say(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    /// Print `text` and read one line; `None` at end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Ask for a `key=value` line until one parses; `None` on cancel or EOF.
    fn request_query(&mut self) -> io::Result<Option<Query>> {
        let text = params_prompt();
        loop {
            let Some(line) = self.prompt(&text)? else {
                return Ok(None);
            };
            match Query::parse(&line) {
                Ok(Prompted::Ready(query)) => return Ok(Some(query)),
                Ok(Prompted::Cancelled) => return Ok(None),
                Err(e) => self.say(e)?,
            }
        }
    }

    /// Show page 1, then navigate until the user quits.
    fn browse<T: Display>(&mut self, items: &[T], page_size: usize) -> io::Result<()> {
        let pager = Pager::new(items, page_size);
        render_page(&mut self.output, &pager.paginated(1))?;

        loop {
            let Some(line) = self.prompt(PAGE_PROMPT)? else {
                return Ok(());
            };
            if line == CANCEL_SENTINEL {
                return Ok(());
            }
            let requested = match line.trim().parse::<i64>() {
                Ok(n) => n,
                Err(_) => {
                    self.say("Input integer or \"q\" for exit command")?;
                    continue;
                }
            };
            let Ok(requested) = usize::try_from(requested) else {
                self.say("Page number must be a positive integer")?;
                continue;
            };
            if requested == 0 {
                self.say("Page number must be a positive integer")?;
                continue;
            }

            let page = pager.paginated(requested);
            if page.clamped {
                self.say("There is no page with this number")?;
            }
            render_page(&mut self.output, &page)?;
        }
    }
}

fn params_prompt() -> String {
    let fields: Vec<&str> = Field::all().map(|f| -> &'static str { f.into() }).collect();
    format!(
        "Input a contact params string or \"{}\" for exit command\n\
         Params string must be key/value pairs divided by space like this: first_name=John last_name=Doe\n\
         Available fields: {}\n",
        CANCEL_SENTINEL,
        fields.join(", ")
    )
}

/// The interactive phonebook session.
pub struct Shell<'s, R, W> {
    store: &'s mut Store,
    console: Console<R, W>,
    page_size: usize,
}

impl<'s, R: BufRead, W: Write> Shell<'s, R, W> {
    pub fn new(store: &'s mut Store, input: R, output: W, page_size: usize) -> Self {
        Self {
            store,
            console: Console { input, output },
            page_size,
        }
    }

    /// Dispatch commands until `q` or end of input.
    ///
    /// User mistakes are reported and re-prompted; only I/O failures and
    /// failed writes to the contact file end the session with an error.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let Some(command) = self.console.prompt(COMMAND_PROMPT)? else {
                return Ok(());
            };
            match command.trim() {
                "q" => return Ok(()),
                "l" => self.list()?,
                "s" => self.search()?,
                "a" => self.add()?,
                "e" => self.edit()?,
                _ => {}
            }
        }
    }

    fn list(&mut self) -> Result<()> {
        self.console.browse(self.store.list(), self.page_size)?;
        Ok(())
    }

    fn search(&mut self) -> Result<()> {
        let Some(query) = self.console.request_query()? else {
            return Ok(());
        };
        let found = self.store.filter(&query);
        if found.is_empty() {
            self.console.say("No contacts found")?;
        } else {
            self.console.browse(&found, self.page_size)?;
        }
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        let contact = loop {
            let Some(query) = self.console.request_query()? else {
                return Ok(());
            };
            match query.to_contact() {
                Ok(contact) => break contact,
                Err(e) => {
                    self.console.say(e)?;
                    self.console.say("Enter \"q\" for exit command")?;
                }
            }
        };

        match self.store.add(contact) {
            Ok(added) => self
                .console
                .say(format!("New contact was created\n{}", added))?,
            Err(Error::DuplicateContact(_)) => self.console.say("Such a contact already exists")?,
            Err(e) if e.is_recoverable() => self.console.say(e)?,
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn edit(&mut self) -> Result<()> {
        let id = loop {
            let Some(query) = self.console.request_query()? else {
                return Ok(());
            };
            match self.store.locate(&query) {
                Lookup::Unique(id) => break id,
                Lookup::Ambiguous(_) => self.console.say("Input more specific contact data")?,
                Lookup::NotFound => {
                    self.console.say("No contacts found")?;
                    return Ok(());
                }
            }
        };
        if let Some(contact) = self.store.get(id) {
            self.console.say(contact)?;
        }

        self.console.say("Input parameters to update")?;
        loop {
            let Some(changes) = self.console.request_query()? else {
                return Ok(());
            };
            match self.store.update(id, &changes) {
                Ok(updated) => {
                    self.console.say(format!("Contact updated\n{}", updated))?;
                    return Ok(());
                }
                Err(Error::DuplicateContact(_)) => {
                    self.console.say("Such a contact already exists")?;
                    return Ok(());
                }
                Err(e) if e.is_recoverable() => self.console.say(e)?,
                Err(e) => return Err(e),
            }
        }
    }
}
