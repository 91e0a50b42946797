//! CLI integration tests for sq commands.
//!
//! These tests check exit codes and the stable parts of the output.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to get a sq command.
fn sq() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("sq").unwrap()
}

mod parse {
    use super::*;

    #[test]
    fn prints_tree() {
        sq().args(["parse", "rust + (guide | book)"])
            .assert()
            .success()
            .stdout(predicate::str::contains("MUST"))
            .stdout(predicate::str::contains("SHOULD"))
            .stdout(predicate::str::contains(r#"Term(_all:"guide")"#));
    }

    #[test]
    fn expands_fields_with_boosts() {
        sq().args(["parse", "rust", "-f", "title^2", "-f", "body"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"Term(title:"rust")^2"#))
            .stdout(predicate::str::contains(r#"Term(body:"rust")"#));
    }

    #[test]
    fn json_output() {
        let output = sq()
            .args(["parse", "\"error handling\"~2", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["type"], "phrase");
        assert_eq!(json["field"], "_all");
        assert_eq!(json["slop"], 2);
        assert_eq!(json["terms"], serde_json::json!(["error", "handling"]));
    }

    #[test]
    fn empty_query_has_no_clauses() {
        sq().args(["parse", "--json", "   "])
            .assert()
            .success()
            .stdout(predicate::str::diff("null\n"));

        sq().args(["parse", "+ | ()"])
            .assert()
            .success()
            .stdout(predicate::str::contains("(no clauses)"));
    }

    #[test]
    fn malformed_queries_succeed() {
        for query in ["(((", "\"unclosed", "a | | + b", "\\", "term~99"] {
            sq().args(["parse", query]).assert().success();
        }
    }

    #[test]
    fn disabled_flags_are_literal_text() {
        sq().args(["parse", "a|b", "--flags", "AND", "--analyzer", "whitespace"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"Term(_all:"a|b")"#));
    }

    #[test]
    fn reads_request_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        fs::write(
            &path,
            r#"{"query": "guide*", "fields": "title", "defaultOperator": "and"}"#,
        )
        .unwrap();

        sq().args(["parse", "--request"])
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"Prefix(title:"guide")"#));
    }

    #[test]
    fn configuration_errors_fail() {
        sq().args(["parse", "a", "--flags", "BOGUS"])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "error: unknown simple_query_string flag [BOGUS]",
            ));

        sq().args(["parse", "a", "--default-operator", "xor"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("default operator [xor] is not allowed"));

        sq().args(["parse", "a", "--analyzer", "klingon"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("analyzer [klingon] not found"));

        sq().args(["parse", "a", "-f", "title^high"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid boost [high] for field [title]"));
    }

    #[test]
    fn request_file_errors_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        fs::write(&path, r#"{"query": "a", "minimum_should_match": 1}"#).unwrap();

        sq().args(["parse", "--request"])
            .arg(&path)
            .assert()
            .failure()
            .stderr(predicate::str::starts_with("error: failed to parse query request"));

        sq().args(["parse", "--request"])
            .arg(dir.path().join("missing.json"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read"));
    }

    #[test]
    fn verbose_logs_to_stderr() {
        sq().args(["-v", "parse", "a b"])
            .env_remove("RUST_LOG")
            .assert()
            .success()
            .stderr(predicate::str::contains("DEBUG"));
    }
}

mod flags {
    use super::*;

    #[test]
    fn defaults_to_all() {
        sq().arg("flags")
            .assert()
            .success()
            .stdout(predicate::str::contains("PRECEDENCE"))
            .stdout(predicate::str::contains("mask: -1 (ALL)"));
    }

    #[test]
    fn resolves_names_and_masks() {
        sq().args(["flags", "and|not"])
            .assert()
            .success()
            .stdout(predicate::str::contains("mask: 3 (AND|NOT)"));

        sq().args(["flags", "5"])
            .assert()
            .success()
            .stdout(predicate::str::contains("mask: 5 (AND|OR)"));
    }

    #[test]
    fn unknown_flag_fails() {
        sq().args(["flags", "AND|SOME"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown simple_query_string flag [SOME]"));
    }
}

mod payload {
    use super::*;

    #[test]
    fn decodes_hex() {
        sq().args(["payload", "40000000", "3f80"])
            .assert()
            .success()
            .stdout(predicate::str::diff("40000000\t2\n3f80\t1\n"));
    }

    #[test]
    fn encodes_floats() {
        sq().args(["payload", "--encode", "0.5", "-2"])
            .assert()
            .success()
            .stdout(predicate::str::diff("0.5\t3f000000\n-2\tc0000000\n"));
    }

    #[test]
    fn invalid_input_fails() {
        sq().args(["payload", "xyz1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("error: invalid hex payload [xyz1]"));
    }
}
