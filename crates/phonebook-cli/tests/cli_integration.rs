//! Integration tests for CLI behavior
//!
//! These run the built `phonebook` binary against a contact file in a temp
//! directory. Every invocation passes `-c` with an empty config so the user's
//! own config never leaks into the results.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const HEADER: &str = "last_name,first_name,patronymic,company,work_phone,personal_phone\n";

/// Temp dir holding an empty config and a contact file with `rows`.
fn setup_book(rows: &[&str]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    fs::write(temp_dir.path().join("config.toml"), "").expect("failed to write config.toml");
    let book = temp_dir.path().join("book.csv");
    let mut content = HEADER.to_string();
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(&book, content).expect("failed to write contact file");
    (temp_dir, book)
}

fn phonebook(home: &Path, book: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_phonebook"));
    cmd.arg("-c")
        .arg(home.join("config.toml"))
        .arg("-f")
        .arg(book)
        .args(args)
        .env_remove("RUST_LOG");
    cmd
}

fn run(home: &Path, book: &Path, args: &[&str]) -> Output {
    phonebook(home, book, args)
        .output()
        .expect("failed to run phonebook")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn numbered_rows(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("Last{},Ivan,Ivanovich,Acme,8900{:07},89004445566", i, i))
        .collect()
}

const IVANOV: &str = "Ivanov,Ivan,Ivanovich,Acme,89001112233,89004445566";

// =============================================================================
// Argument handling
// =============================================================================

#[test]
fn integration_help_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_phonebook"))
        .arg("--help")
        .output()
        .expect("failed to run phonebook");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("phonebook"));
    assert!(out.contains("Usage"));
}

#[test]
fn integration_page_zero_is_usage_error() {
    let (home, book) = setup_book(&[IVANOV]);
    let output = run(home.path(), &book, &["list", "--page", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("positive integer"));
}

// =============================================================================
// list / search
// =============================================================================

#[test]
fn integration_list_pages() {
    let rows = numbered_rows(25);
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let (home, book) = setup_book(&rows);

    let output = run(home.path(), &book, &["list"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with("Contacts total: 25, Page 1/3\n\n"));
    assert_eq!(out.lines().filter(|l| l.starts_with("Last")).count(), 10);

    let output = run(home.path(), &book, &["list", "--page", "3"]);
    let out = stdout(&output);
    assert!(out.contains("Page 3/3"));
    assert_eq!(out.lines().filter(|l| l.starts_with("Last")).count(), 5);
}

#[test]
fn integration_list_clamps_out_of_range_page() {
    let rows = numbered_rows(25);
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let (home, book) = setup_book(&rows);

    let output = run(home.path(), &book, &["list", "--page", "9"]);
    assert!(output.status.success(), "clamping is not an error");
    assert!(stdout(&output).contains("Page 3/3"));
    assert!(stderr(&output).contains("WARN"));
}

#[test]
fn integration_page_size_flag() {
    let rows = numbered_rows(5);
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let (home, book) = setup_book(&rows);

    let output = run(home.path(), &book, &["-p", "2", "list"]);
    assert!(stdout(&output).contains("Contacts total: 5, Page 1/3"));
}

#[test]
fn integration_search() {
    let (home, book) = setup_book(&[IVANOV]);

    let output = run(home.path(), &book, &["search", "last_name=Ivanov"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Contacts total: 1, Page 1/1"));
    assert!(out.contains("Ivanov Ivan Ivanovich Acme 89001112233 89004445566"));

    let output = run(home.path(), &book, &["search", "last_name=Petrov"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Contacts total: 0"));
}

#[test]
fn integration_search_malformed_query_fails() {
    let (home, book) = setup_book(&[IVANOV]);
    let output = run(home.path(), &book, &["search", "last_name"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid params string"));
}

#[test]
fn integration_missing_file_fails() {
    let (home, _book) = setup_book(&[]);
    let missing = home.path().join("absent.csv");
    let output = run(home.path(), &missing, &["list"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unavailable"));
}

// =============================================================================
// add / edit
// =============================================================================

#[test]
fn integration_add_then_duplicate() {
    let (home, book) = setup_book(&[]);
    let args = [
        "add",
        "last_name=petrov",
        "first_name=Petr",
        "patronymic=Petrovich",
        "company=Acme",
        "work_phone=+7(900)111-22-33",
        "personal_phone=89004445566",
    ];

    let output = run(home.path(), &book, &args);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Petrov Petr Petrovich Acme 89001112233 89004445566"));
    assert!(
        fs::read_to_string(&book)
            .unwrap()
            .contains("Petrov,Petr,Petrovich,Acme,89001112233,89004445566")
    );

    let output = run(home.path(), &book, &args);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("already exists"));
    assert_eq!(fs::read_to_string(&book).unwrap().lines().count(), 2);
}

#[test]
fn integration_add_incomplete_fails() {
    let (home, book) = setup_book(&[]);
    let output = run(home.path(), &book, &["add", "last_name=Petrov"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("first_name"));
    assert_eq!(fs::read_to_string(&book).unwrap(), HEADER);
}

#[test]
fn integration_edit_persists() {
    let (home, book) = setup_book(&[IVANOV, "Petrov,Petr,Petrovich,Acme,89007778899,89001234567"]);

    let output = run(
        home.path(),
        &book,
        &["edit", "--where", "last_name=Ivanov", "--set", "company=globex"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Contact updated"));

    let output = run(home.path(), &book, &["search", "company=Globex"]);
    assert!(stdout(&output).contains("Ivanov Ivan Ivanovich Globex"));
}

#[test]
fn integration_edit_not_found_and_ambiguous() {
    let (home, book) = setup_book(&[IVANOV, "Ivanov,Petr,Ivanovich,Acme,89007778899,89001234567"]);
    let before = fs::read_to_string(&book).unwrap();

    let output = run(
        home.path(),
        &book,
        &["edit", "--where", "last_name=Nobody", "--set", "company=X"],
    );
    assert_eq!(output.status.code(), Some(1));

    let output = run(
        home.path(),
        &book,
        &["edit", "--where", "last_name=Ivanov", "--set", "company=X"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("more specific"));
    assert_eq!(fs::read_to_string(&book).unwrap(), before);
}

// =============================================================================
// seed
// =============================================================================

#[test]
fn integration_seed() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.toml"), "").unwrap();
    let book = temp_dir.path().join("seeded.csv");

    let output = run(temp_dir.path(), &book, &["seed", "--count", "12"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(&book).unwrap().lines().count(), 13);

    let output = run(temp_dir.path(), &book, &["list"]);
    assert!(stdout(&output).contains("Contacts total: 12, Page 1/2"));

    let output = run(temp_dir.path(), &book, &["seed", "--count", "3"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("already exists"));

    let output = run(temp_dir.path(), &book, &["seed", "--count", "3", "--force"]);
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(&book).unwrap().lines().count(), 4);
}

// =============================================================================
// interactive shell
// =============================================================================

#[test]
fn integration_shell_session() {
    let (home, book) = setup_book(&[IVANOV]);

    let mut child = phonebook(home.path(), &book, &[])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn phonebook");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"l\nq\ns\nlast_name=Ivanov\nq\nq\n")
        .expect("failed to write stdin");
    let output = child.wait_with_output().expect("failed to wait");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Input command:"));
    assert_eq!(out.matches("Contacts total: 1, Page 1/1").count(), 2);
}

#[test]
fn integration_shell_eof_quits() {
    let (home, book) = setup_book(&[IVANOV]);
    let output = phonebook(home.path(), &book, &[])
        .stdin(Stdio::null())
        .output()
        .expect("failed to run phonebook");
    assert!(output.status.success());
}
