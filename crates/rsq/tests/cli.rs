//! End-to-end tests for the `rsq` binary.
//!
//! Each test runs the built binary with its own config location so no test
//! sees the user's configuration.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

struct TestContext {
    bin_path: PathBuf,
    config_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            bin_path: PathBuf::from(env!("CARGO_BIN_EXE_rsq")),
            config_dir: TempDir::new().unwrap(),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.config_dir.path().join("config.toml")
    }

    fn write_config(&self, contents: &str) {
        fs::write(self.config_path(), contents).unwrap();
    }

    fn run_allow_failure(&self, args: &[&str]) -> Output {
        Command::new(&self.bin_path)
            .args(args)
            .env("RSQ_CONFIG", self.config_path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }

    fn run(&self, args: &[&str]) -> String {
        let output = self.run_allow_failure(args);
        assert!(
            output.status.success(),
            "rsq command failed\nargs: {:?}\nstatus: {}\nstderr:\n{}",
            args,
            output.status,
            String::from_utf8_lossy(&output.stderr),
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let stdout = self.run(&full);
        serde_json::from_str(&stdout).unwrap_or_else(|err| {
            panic!("command did not emit valid JSON\nargs: {args:?}\nerror: {err}\nstdout:\n{stdout}")
        })
    }
}

#[test]
fn test_parse_prints_canonical_query() {
    let ctx = TestContext::new();
    let stdout = ctx.run(&["parse", "actor = \"ricky\" and (episode > 3 or publication = \"xfm\")"]);
    assert_eq!(
        stdout.trim_end(),
        r#"actor="ricky" and (episode>3 or publication="xfm")"#
    );
}

#[test]
fn test_parse_error_exit_code_and_envelope() {
    let ctx = TestContext::new();
    let output = ctx.run_allow_failure(&["--json", "parse", "episode >"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    let json: Value = serde_json::from_str(&stderr).unwrap();
    assert_eq!(json["error"]["code"], "FILTER_ERROR");
    assert!(json["error"]["message"].as_str().is_some());
}

#[test]
fn test_check_incomplete_query_is_not_an_error() {
    let ctx = TestContext::new();
    let stdout = ctx.run(&["check", "actor = \"karl\" and"]);
    assert!(stdout.contains("incomplete query"));

    let json = ctx.run_json(&["check", "episode >"]);
    assert_eq!(json["incomplete"], true);
}

#[test]
fn test_check_hard_error_points_at_offender() {
    let ctx = TestContext::new();
    let output = ctx.run_allow_failure(&["check", "field@1"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("field@1\n     ^"), "stdout:\n{stdout}");
}

#[test]
fn test_check_reports_malformed_values() {
    let ctx = TestContext::new();
    let json = ctx.run_json(&["check", "actor = - and episode = 2"]);
    assert_eq!(json["valid"], false);
    assert_eq!(json["incomplete"], false);
    assert_eq!(json["invalid_values"][0]["text"], "-");
    assert_eq!(json["invalid_values"][0]["position"], 8);
}

#[test]
fn test_terms_to_filter_and_back() {
    let ctx = TestContext::new();
    let query = ctx.run(&["terms", "--filter", "monkey news @karl \"little bit\""]);
    let query = query.trim_end();
    assert_eq!(
        query,
        r#"content~"monkey news" and actor="karl" and content="little bit""#
    );

    let text = ctx.run(&["plaintext", query]);
    assert_eq!(text.trim_end(), r#"monkey news @karl "little bit""#);
}

#[test]
fn test_terms_json_lists_terms() {
    let ctx = TestContext::new();
    let json = ctx.run_json(&["terms", "~xfm /ne+ws/"]);
    let terms = json.as_array().unwrap();
    assert_eq!(terms.len(), 2);
    assert_eq!(terms[0]["field"], "publication");
    assert_eq!(terms[1]["op"], "~=");
}

#[test]
fn test_operators_for_kind() {
    let ctx = TestContext::new();
    let json = ctx.run_json(&["operators", "text"]);
    assert_eq!(json["kind"], "TEXT");
    assert_eq!(json["operators"], serde_json::json!(["=", "!=", "~="]));
}

#[test]
fn test_compose_uses_configured_fields() {
    let ctx = TestContext::new();
    ctx.write_config(
        r#"
version = 1

[[fields]]
name = "minute"
kind = "FLOAT"
"#,
    );

    let stdout = ctx.run(&["compose", "--field", "minute", "--op", ">", "--value", "2"]);
    assert_eq!(stdout.trim_end(), "minute>2.0");

    let output = ctx.run_allow_failure(&["compose", "--field", "episode", "--op", "=", "--value", "1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("episode"));
}

#[test]
fn test_broken_config_is_a_config_error() {
    let ctx = TestContext::new();
    ctx.write_config("version = \"one\"\n");

    let output = ctx.run_allow_failure(&["operators", "--field", "actor"]);
    assert_eq!(output.status.code(), Some(5));

    // query commands only read colors from the config
    assert!(ctx.run_allow_failure(&["parse", "a=1"]).status.success());
}

#[test]
fn test_config_path_follows_env() {
    let ctx = TestContext::new();
    let json = ctx.run_json(&["config", "path"]);
    assert_eq!(json["path"], ctx.config_path().display().to_string());
    assert_eq!(json["exists"], false);
}
