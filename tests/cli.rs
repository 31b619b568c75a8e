use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn loxi() -> Command {
    Command::cargo_bin("loxi").unwrap()
}

fn script(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".lox").tempfile().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn runs_a_script_and_exits_zero() {
    let file = script("print 1 + 2;");
    loxi()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("3"));
}

#[test]
fn too_many_arguments_prints_usage_and_exits_64() {
    loxi()
        .arg("one.lox")
        .arg("two.lox")
        .assert()
        .code(64)
        .stderr(predicate::str::contains("Usage: loxi [script]"));
}

#[test]
fn missing_file_exits_64() {
    loxi()
        .arg("/nonexistent/path/does-not-exist.lox")
        .assert()
        .code(64);
}

#[test]
fn parse_error_exits_63() {
    let file = script("var = ;");
    loxi().arg(file.path()).assert().code(63);
}

#[test]
fn runtime_error_exits_70() {
    let file = script("print 1/0;");
    loxi()
        .arg(file.path())
        .assert()
        .code(70)
        .stderr(predicate::str::contains("Cannot divide by zero"));
}

#[test]
fn lex_error_exits_65() {
    let file = script("print 1 @ 2;");
    loxi().arg(file.path()).assert().code(65);
}

#[test]
fn fibonacci_end_to_end() {
    let file = script("fun fib(n) { if (n < 2) return n; return fib(n-1) + fib(n-2); } print fib(7);");
    loxi()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("13"));
}

#[test]
fn repl_accumulates_declarations_across_lines() {
    // one persistent Interpreter across lines: a `var` declared on an
    // earlier line must still be visible (and assignable) on a later one.
    loxi()
        .write_stdin("var a = 1;\nfun inc() { a = a + 1; return a; }\nprint inc();\nprint inc();\nprint a;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2\n3\n3\n"));
}

#[test]
fn repl_recovers_after_a_bad_line_and_exits_zero_at_eof() {
    // an error on one line is reported, but the prompt continues and later
    // lines still run against the same accumulated environment.
    loxi()
        .write_stdin("var a = 1;\nprint 1/0;\nprint a;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1\n"));
}
