//! Integration tests for the `collectly` CLI binary.
//!
//! Validate argument parsing, querying, output formats, and error exit
//! codes against JSON fixtures written to a temp directory.
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `collectly` binary with env isolation.
///
/// Clears `COLLECTLY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn collectly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("collectly");
    cmd.env("HOME", "/tmp/collectly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/collectly-cli-test-nonexistent")
        .env_remove("COLLECTLY_STORE__ID_ATTRIBUTE")
        .env_remove("COLLECTLY_STORE__COMPARATOR")
        .env_remove("COLLECTLY_OUTPUT__FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

const PEOPLE: &str = r#"[
    {"id": 1, "name": "Ada", "team": "core", "age": 36, "active": true},
    {"id": 2, "name": "Bo", "team": "web", "age": 24, "active": false},
    {"id": 3, "name": "Cy", "team": "core", "age": 51, "active": true},
    {"id": 2, "nickname": "bobo"}
]"#;

/// Write `contents` to `people.json` in a fresh temp dir.
fn fixture(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.json");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

/// `collectly --input <people.json> -o <format> <args...>`.
fn query(format: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let (_dir, path) = fixture(PEOPLE);
    collectly_cmd()
        .arg("--input")
        .arg(&path)
        .args(["-o", format])
        .args(args)
        .assert()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = collectly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    collectly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("where")
            .and(predicate::str::contains("filter"))
            .and(predicate::str::contains("pluck")),
    );
}

#[test]
fn test_completions_zsh() {
    collectly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Loading & listing ───────────────────────────────────────────────

#[test]
fn test_duplicate_identities_merge() {
    query("plain", &["count"]).success().stdout("3\n");
}

#[test]
fn test_list_plain_prints_identities_in_order() {
    query("plain", &["list"]).success().stdout("1\n2\n3\n");
}

#[test]
fn test_list_table_has_union_of_columns() {
    query("table", &["list"])
        .success()
        .stdout(predicate::str::contains("nickname").and(predicate::str::contains("bobo")));
}

#[test]
fn test_sort_by_descending_field() {
    let (_dir, path) = fixture(PEOPLE);
    collectly_cmd()
        .arg("--input")
        .arg(&path)
        .args(["--sort-by", "-age", "-o", "plain", "list"])
        .assert()
        .success()
        .stdout("3\n1\n2\n");
}

#[test]
fn test_stdin_input() {
    collectly_cmd()
        .args(["-o", "plain", "count"])
        .write_stdin(r#"[{"name": "x"}, {"name": "y"}]"#)
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_custom_id_attribute() {
    collectly_cmd()
        .args(["--id-attribute", "sku", "-o", "plain", "get", "A-1"])
        .write_stdin(r#"[{"sku": "A-1", "price": 3}]"#)
        .assert()
        .success()
        .stdout("A-1\n");
}

// ── Queries ─────────────────────────────────────────────────────────

#[test]
fn test_get_merged_record_as_json() {
    let output = query("json-compact", &["get", "2"]).success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();
    insta::assert_snapshot!(
        text.trim_end(),
        @r#"{"id":2,"name":"Bo","team":"web","age":24,"active":false,"nickname":"bobo"}"#
    );
}

#[test]
fn test_where_field_value() {
    query("plain", &["where", "team", "core"]).success().stdout("1\n3\n");
}

#[test]
fn test_where_match_object() {
    query("plain", &["where", "--match", r#"{"active": true, "age": 51}"#])
        .success()
        .stdout("3\n");
}

#[test]
fn test_find_returns_first_match() {
    query("plain", &["find", "team", "core"]).success().stdout("1\n");
}

#[test]
fn test_filter_text_is_case_insensitive() {
    query("plain", &["filter", "BO"]).success().stdout("2\n");
}

#[test]
fn test_filter_negated_text() {
    query("plain", &["filter", "!core"]).success().stdout("2\n");
}

#[test]
fn test_filter_strict_needs_whole_value() {
    query("plain", &["filter", "--strict", "cor"]).success().stdout("");
    query("plain", &["filter", "--strict", "core"]).success().stdout("1\n3\n");
}

#[test]
fn test_pluck_yaml() {
    query("yaml", &["pluck", "name"])
        .success()
        .stdout("- Ada\n- Bo\n- Cy\n");
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_get_missing_exits_not_found() {
    query("plain", &["get", "99"])
        .code(4)
        .stderr(predicate::str::contains("no record matches"));
}

#[test]
fn test_find_without_match_exits_not_found() {
    query("plain", &["find", "team", "ops"]).code(4);
}

#[test]
fn test_invalid_json_input_exits_input_error() {
    let (_dir, path) = fixture("[{\"id\": 1,");
    collectly_cmd()
        .arg("--input")
        .arg(&path)
        .arg("count")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_scalar_input_exits_input_error() {
    collectly_cmd().arg("count").write_stdin("42").assert().code(10);
}

#[test]
fn test_missing_input_file_exits_input_error() {
    collectly_cmd()
        .args(["--input", "/tmp/collectly-cli-test-nonexistent/none.json", "count"])
        .assert()
        .code(10);
}

#[test]
fn test_match_must_be_object() {
    query("plain", &["where", "--match", "[1, 2]"]).code(2);
}

#[test]
fn test_bad_config_env_exits_config_error() {
    let (_dir, path) = fixture(PEOPLE);
    collectly_cmd()
        .env("COLLECTLY_OUTPUT__FORMAT", "xml")
        .arg("--input")
        .arg(&path)
        .arg("count")
        .assert()
        .code(11);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_defaults() {
    collectly_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("id_attribute = \"id\"")
                .and(predicate::str::contains("format = \"table\"")),
        );
}

#[test]
fn test_config_show_reflects_env() {
    collectly_cmd()
        .env("COLLECTLY_STORE__ID_ATTRIBUTE", "uid")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("id_attribute = \"uid\""));
}

#[test]
fn test_config_path() {
    collectly_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
