//! Backing-file collaborator.
//!
//! The store only needs three operations on its file: read every row, replace
//! every row, and append one row. [`ContactFile`] captures that contract and
//! [`CsvFile`] implements it over a comma-delimited file with a header row in
//! canonical field order.

use log::{info, warn};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::contact::{Contact, Field};
use crate::error::Result;
use crate::safe_io::atomic_write;

/// Storage contract consumed by [`Store`](crate::Store).
pub trait ContactFile {
    /// Location of the backing data, for diagnostics.
    fn path(&self) -> &Path;

    /// Read every stored contact in file order.
    fn read_all(&self) -> Result<Vec<Contact>>;

    /// Replace the whole file with `contacts`.
    fn write_all(&self, contacts: &[Contact]) -> Result<()>;

    /// Append a single contact after the existing rows.
    fn append_one(&self, contact: &Contact) -> Result<()>;
}

/// Header row, in canonical field order.
pub fn header() -> Vec<&'static str> {
    Field::all().map(|f| -> &'static str { f.into() }).collect()
}

fn writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'));
    builder
}

/// Comma-delimited contact file.
#[derive(Debug, Clone)]
pub struct CsvFile {
    path: PathBuf,
}

impl CsvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Serialize a header plus `contacts` into CSV bytes.
    pub fn encode(contacts: &[Contact]) -> Result<Vec<u8>> {
        let mut writer = writer_builder().from_writer(Vec::new());
        writer.write_record(header())?;
        for contact in contacts {
            writer.serialize(contact)?;
        }
        writer
            .into_inner()
            .map_err(|e| crate::Error::Io(e.into_error()))
    }
}

impl ContactFile for CsvFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Contact>> {
        let mut reader = csv::ReaderBuilder::new().from_path(&self.path)?;
        let contacts = reader
            .deserialize::<Contact>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        info!("read {} contacts from {}", contacts.len(), self.path.display());
        Ok(contacts)
    }

    fn write_all(&self, contacts: &[Contact]) -> Result<()> {
        let bytes = Self::encode(contacts)?;
        atomic_write(&self.path, &bytes)?;
        info!(
            "rewrote {} with {} contacts",
            self.path.display(),
            contacts.len()
        );
        Ok(())
    }

    fn append_one(&self, contact: &Contact) -> Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        let start_len = file.metadata()?.len();
        let needs_header = start_len == 0;
        let needs_newline = !needs_header && !ends_with_newline(&mut file)?;

        let mut writer = writer_builder().from_writer(Vec::new());
        if needs_header {
            writer.write_record(header())?;
        }
        writer.serialize(contact)?;
        let mut bytes = writer
            .into_inner()
            .map_err(|e| crate::Error::Io(e.into_error()))?;
        if needs_newline {
            bytes.insert(0, b'\n');
        }

        write_or_rollback(&mut file, &bytes, |f| {
            if let Err(e) = f.set_len(start_len) {
                warn!(
                    "could not truncate {} after failed append: {}",
                    self.path.display(),
                    e
                );
            }
        })?;
        file.sync_all()?;
        info!("appended one contact to {}", self.path.display());
        Ok(())
    }
}

/// Write `bytes` in full, or call `rollback` so no partial row is left behind.
fn write_or_rollback<W: Write>(
    out: &mut W,
    bytes: &[u8],
    rollback: impl FnOnce(&mut W),
) -> io::Result<()> {
    let result = out.write_all(bytes).and_then(|()| out.flush());
    if result.is_err() {
        rollback(out);
    }
    result
}

fn ends_with_newline(file: &mut File) -> Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> Vec<Contact> {
        vec![
            Contact::new(
                "Ivanov",
                "Ivan",
                "Ivanovich",
                "Acme",
                "89001112233",
                "89004445566",
            ),
            Contact::new(
                "Petrova",
                "Anna",
                "Sergeevna",
                "Roga, Kopyta \"And\" Co",
                "89007778899",
                "89001234567",
            ),
        ]
    }

    #[test]
    fn test_header_order() {
        assert_eq!(
            header(),
            vec![
                "last_name",
                "first_name",
                "patronymic",
                "company",
                "work_phone",
                "personal_phone"
            ]
        );
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let file = CsvFile::new(temp_dir.path().join("contacts.csv"));

        file.write_all(&sample()).unwrap();
        assert_eq!(file.read_all().unwrap(), sample());
    }

    #[test]
    fn test_delimiters_and_quotes_are_escaped() {
        let bytes = CsvFile::encode(&sample()[1..]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(
            text.contains("\"Roga, Kopyta \"\"And\"\" Co\""),
            "unexpected encoding: {}",
            text
        );
    }

    #[test]
    fn test_empty_set_still_has_header() {
        let text = String::from_utf8(CsvFile::encode(&[]).unwrap()).unwrap();
        assert_eq!(
            text,
            "last_name,first_name,patronymic,company,work_phone,personal_phone\n"
        );
    }

    #[test]
    fn test_append_creates_header_for_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contacts.csv");
        let file = CsvFile::new(&path);

        for contact in sample() {
            file.append_one(&contact).unwrap();
        }

        assert_eq!(file.read_all().unwrap(), sample());
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("last_name").count(), 1);
    }

    #[test]
    fn test_append_after_missing_trailing_newline() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contacts.csv");
        fs::write(
            &path,
            "last_name,first_name,patronymic,company,work_phone,personal_phone\n\
             Ivanov,Ivan,Ivanovich,Acme,89001112233,89004445566",
        )
        .unwrap();

        let file = CsvFile::new(&path);
        file.append_one(&sample()[1]).unwrap();
        assert_eq!(file.read_all().unwrap(), sample());
    }

    /// Accepts `limit` bytes, then fails.
    struct ShortWriter {
        buf: Vec<u8>,
        limit: usize,
    }

    impl Write for ShortWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            let room = self.limit - self.buf.len();
            if room == 0 {
                return Err(io::Error::other("disk full"));
            }
            let n = room.min(data.len());
            self.buf.extend_from_slice(&data[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_append_write_rolls_back() {
        let existing = b"header\n".to_vec();
        let start = existing.len();
        let mut out = ShortWriter {
            buf: existing,
            limit: start + 4,
        };

        let result = write_or_rollback(&mut out, b"Ivanov,Ivan\n", |w| w.buf.truncate(start));

        assert!(result.is_err());
        assert_eq!(out.buf, b"header\n");
    }

    #[test]
    fn test_successful_write_skips_rollback() {
        let mut out = Vec::new();
        let mut rolled_back = false;
        write_or_rollback(&mut out, b"row\n", |_| rolled_back = true).unwrap();
        assert_eq!(out, b"row\n");
        assert!(!rolled_back);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let file = CsvFile::new(temp_dir.path().join("absent.csv"));
        assert!(matches!(file.read_all(), Err(crate::Error::Io(_))));
        assert!(!file.path().exists());
    }

    #[test]
    fn test_read_short_row_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contacts.csv");
        fs::write(
            &path,
            "last_name,first_name,patronymic,company,work_phone,personal_phone\nIvanov,Ivan\n",
        )
        .unwrap();
        assert!(matches!(
            CsvFile::new(&path).read_all(),
            Err(crate::Error::Parse(_))
        ));
    }
}
