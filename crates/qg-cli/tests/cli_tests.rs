//! Integration tests for the qg binary

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

const DDL: &str = "\
CREATE TABLE users (
    id SERIAL PRIMARY KEY,
    username VARCHAR(50) NOT NULL,
    email VARCHAR(100)
);

CREATE TABLE orders (
    id SERIAL PRIMARY KEY,
    user_id INT NOT NULL,
    total DECIMAL(10,2),
    FOREIGN KEY (user_id) REFERENCES users(id)
);
";

/// Path to the compiled qg binary
fn qg_bin() -> String {
    env!("CARGO_BIN_EXE_qg").to_string()
}

/// Run a `qg` CLI command and return (stdout, stderr, success).
fn run_qg(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(qg_bin())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute qg with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

/// Temp directory holding `schema.sql`
fn schema_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("schema.sql"), DDL).unwrap();
    dir
}

fn path_str(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

// ── extract ─────────────────────────────────────────────────────────────

#[test]
fn test_extract_json() {
    let dir = schema_dir();
    let schema = path_str(&dir.path().join("schema.sql"));

    let (stdout, stderr, success) = run_qg(&["extract", &schema]);
    assert!(success, "stderr: {}", stderr);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["tables"][0]["name"], "users");
    assert_eq!(
        json["tables"][1]["columns"],
        serde_json::json!(["id", "user_id", "total"])
    );
    assert_eq!(
        json["relations"],
        serde_json::json!(["orders.user_id -> users.id"])
    );
}

#[test]
fn test_extract_prompt_output() {
    let dir = schema_dir();
    let schema = path_str(&dir.path().join("schema.sql"));

    let (stdout, _, success) = run_qg(&["extract", &schema, "--output", "prompt"]);
    assert!(success);
    assert_eq!(
        stdout.trim_end(),
        "Table: users\nColumns: id, username, email\n\n\
         Table: orders\nColumns: id, user_id, total\n\n\
         Relations:\norders.user_id -> users.id"
    );
}

#[test]
fn test_extract_no_tables_fails() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("empty.sql");
    fs::write(&file, "-- nothing here\nSELECT 1;\n").unwrap();

    let (stdout, stderr, success) = run_qg(&["extract", &path_str(&file)]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("no tables found"), "stderr: {}", stderr);
}

#[test]
fn test_extract_csv_header() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("sales.csv");
    fs::write(&file, "\"region\",amount, sold_at\nnorth,10,2024-01-01\n").unwrap();

    let (stdout, _, success) =
        run_qg(&["extract", "--csv", &path_str(&file), "--table-name", "sales"]);
    assert!(success);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["tables"][0]["name"], "sales");
    assert_eq!(
        json["tables"][0]["columns"],
        serde_json::json!(["region", "amount", "sold_at"])
    );
}

#[test]
fn test_extract_diagnostics_on_stderr() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("schema.sql");
    fs::write(
        &file,
        "CREATE TABLE t (id INT, PRIMARY KEY (id), CHECK (id > 0));",
    )
    .unwrap();

    let (_, stderr, success) = run_qg(&["extract", &path_str(&file), "--diagnostics"]);
    assert!(success);
    assert!(stderr.contains("skipped (table constraint) in t: PRIMARY KEY (id)"));
    assert!(stderr.contains("CHECK (id > 0)"));
}

#[test]
fn test_extract_uses_config_schema_path() {
    let dir = schema_dir();
    fs::write(
        dir.path().join("querygate.yml"),
        "schema_path: schema.sql\noutput: prompt\n",
    )
    .unwrap();

    let (stdout, stderr, success) = run_qg(&["--dir", &path_str(dir.path()), "extract"]);
    assert!(success, "stderr: {}", stderr);
    assert!(stdout.starts_with("Table: users"));
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = schema_dir();
    fs::write(dir.path().join("querygate.yml"), "dialekt: postgres\n").unwrap();

    let (_, stderr, success) = run_qg(&["-C", &path_str(dir.path()), "extract", "x.sql"]);
    assert!(!success);
    assert!(stderr.contains("Failed to load config"), "stderr: {}", stderr);
}

// ── validate ────────────────────────────────────────────────────────────

#[test]
fn test_validate_accepts_query() {
    let dir = schema_dir();
    let schema = path_str(&dir.path().join("schema.sql"));

    let (stdout, _, success) = run_qg(&[
        "validate",
        "--schema",
        &schema,
        "```sql\nSELECT u.username FROM users u JOIN orders o ON o.user_id = u.id\n```",
    ]);
    assert!(success);
    assert_eq!(
        stdout.trim_end(),
        "SELECT u.username FROM users u JOIN orders o ON o.user_id = u.id"
    );
}

#[test]
fn test_validate_rejects_unknown_table() {
    let dir = schema_dir();
    let schema = path_str(&dir.path().join("schema.sql"));

    let (stdout, _, success) = run_qg(&["validate", "-s", &schema, "SELECT * FROM employees"]);
    assert!(!success);
    assert_eq!(
        stdout.trim_end(),
        "-- ERROR: Table 'employees' not found in schema."
    );
}

#[test]
fn test_validate_destructive_with_non_primary_dialect() {
    let dir = schema_dir();
    let schema = path_str(&dir.path().join("schema.sql"));

    let (stdout, _, success) =
        run_qg(&["validate", "-s", &schema, "-d", "mysql", "DROP TABLE users"]);
    assert!(!success);
    assert_eq!(
        stdout.trim_end(),
        "-- ERROR: Destructive queries are not permitted."
    );

    let (stdout, _, success) =
        run_qg(&["validate", "-s", &schema, "-d", "mysql", "SELECT salary FROM staff"]);
    assert!(success);
    assert_eq!(stdout.trim_end(), "SELECT salary FROM staff");
}

#[test]
fn test_validate_info_sentinel_passes() {
    let dir = schema_dir();
    let schema = path_str(&dir.path().join("schema.sql"));
    let info = "-- INFO: There is no products table in this database.";

    let (stdout, _, success) = run_qg(&["validate", "-s", &schema, info]);
    assert!(success);
    assert_eq!(stdout.trim_end(), info);
}

#[test]
fn test_validate_from_file_and_stdin() {
    let dir = schema_dir();
    let schema = path_str(&dir.path().join("schema.sql"));
    let query = dir.path().join("query.sql");
    fs::write(&query, "SELECT email FROM users\n").unwrap();

    let (stdout, _, success) = run_qg(&["validate", "-s", &schema, "--file", &path_str(&query)]);
    assert!(success);
    assert_eq!(stdout.trim_end(), "SELECT email FROM users");

    let mut child = Command::new(qg_bin())
        .args(["validate", "-s", &schema])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"SELECT phone FROM users")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(!output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        "-- ERROR: Column 'phone' does not exist in the schema."
    );
}

#[test]
fn test_validate_batch_keeps_input_order() {
    let dir = schema_dir();
    let schema = path_str(&dir.path().join("schema.sql"));
    let batch = dir.path().join("batch.sql");
    fs::write(
        &batch,
        "SELECT id FROM users\n\nDELETE FROM users\nSELECT total FROM orders\nSELECT x FROM nowhere\n",
    )
    .unwrap();

    let (stdout, _, success) = run_qg(&["validate", "-s", &schema, "--batch", &path_str(&batch)]);
    assert!(!success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "SELECT id FROM users",
            "-- ERROR: Destructive queries are not permitted.",
            "SELECT total FROM orders",
            "-- ERROR: Table 'nowhere' not found in schema.",
        ]
    );
}

#[test]
fn test_validate_dialect_from_config() {
    let dir = schema_dir();
    fs::write(
        dir.path().join("querygate.yml"),
        "dialect: sqlite\nschema_path: schema.sql\n",
    )
    .unwrap();

    let (stdout, stderr, success) = run_qg(&[
        "-C",
        &path_str(dir.path()),
        "validate",
        "SELECT anything FROM anywhere",
    ]);
    assert!(success, "stderr: {}", stderr);
    assert_eq!(stdout.trim_end(), "SELECT anything FROM anywhere");
}

#[test]
fn test_validate_without_schema_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, success) = run_qg(&["-C", &path_str(dir.path()), "validate", "SELECT 1"]);
    assert!(!success);
    assert!(stderr.contains("No schema file given"), "stderr: {}", stderr);
}

#[test]
fn test_validate_verbose_reports_parse_location() {
    let dir = schema_dir();
    let schema = path_str(&dir.path().join("schema.sql"));

    let (stdout, stderr, success) = run_qg(&[
        "--verbose",
        "validate",
        "-s",
        &schema,
        "SELECT id\nFROM users\nWHERE id = = 1",
    ]);
    assert!(!success);
    assert_eq!(stdout.trim_end(), "-- ERROR: Invalid SQL syntax.");
    assert!(
        stderr.contains("[verbose] Parse error at line 3, column"),
        "stderr: {}",
        stderr
    );
}
