//! Page rendering shared by the shell and the one-shot subcommands.

use phonebook_core::Page;
use std::fmt::Display;
use std::io::{self, Write};

/// Write the page header, a blank line and one item per line.
pub fn render_page<W: Write, T: Display>(out: &mut W, page: &Page<'_, T>) -> io::Result<()> {
    writeln!(
        out,
        "Contacts total: {}, Page {}/{}",
        page.total_count, page.page, page.pages_count
    )?;
    writeln!(out)?;
    for item in page.items {
        writeln!(out, "{}", item)?;
    }
    Ok(())
}
