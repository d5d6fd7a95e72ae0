// ABOUTME: Integration tests for the peek CLI binary.
// ABOUTME: Tests HTML file peeking, JSON output, summarize mode, and no-content exit codes.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn peek_cmd() -> Command {
    Command::cargo_bin("peek").unwrap()
}

const ARTICLE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<body>
<article>
<p>First paragraph of the story.</p>
<p>Second paragraph with detail.</p>
<p>Third paragraph wrapping up.</p>
</article>
</body>
</html>"#;

#[test]
fn peek_html_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("article.html");
    fs::write(&html_path, ARTICLE_HTML).unwrap();

    peek_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/story")
        .assert()
        .success()
        .stdout(predicate::str::contains("First paragraph of the story."))
        .stdout(predicate::str::contains("Third paragraph wrapping up."));
}

#[test]
fn json_output_includes_language_and_tier() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("article.html");
    fs::write(&html_path, ARTICLE_HTML).unwrap();

    let output = peek_cmd()
        .arg("--json")
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/story")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["language"], "en");
    assert_eq!(json["hostname"], "example.com");
    assert_eq!(json["extraction"]["tier"], "generic");
    assert_eq!(json["extraction"]["strategy"], "paragraphs");
}

#[test]
fn summarize_mode_emits_bullets() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("article.html");
    fs::write(&html_path, ARTICLE_HTML).unwrap();

    peek_cmd()
        .arg("--summarize")
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/story")
        .assert()
        .success()
        .stdout(predicate::str::contains("- First paragraph of the story."));
}

#[test]
fn summarize_mode_accepts_question_title() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("article.html");
    fs::write(&html_path, ARTICLE_HTML).unwrap();

    peek_cmd()
        .arg("--summarize")
        .arg("--title")
        .arg("What does the story say?")
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/story")
        .assert()
        .success()
        .stdout(predicate::str::contains("- First paragraph of the story."));
}

#[test]
fn no_content_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("thin.html");
    fs::write(&html_path, "<html><body><main>shrt</main></body></html>").unwrap();

    peek_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/thin")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no readable content"));
}

#[test]
fn html_without_url_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("article.html");
    fs::write(&html_path, ARTICLE_HTML).unwrap();

    peek_cmd()
        .arg("--html")
        .arg(&html_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--url is required"));
}

#[test]
fn no_arguments_is_an_error() {
    peek_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one URL is required"));
}

#[test]
fn fetch_mode_peeks_a_served_page() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/story");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(ARTICLE_HTML);
    });

    peek_cmd()
        .arg("--allow-private-networks")
        .arg(server.url("/story"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Second paragraph with detail."));

    mock.assert();
}

#[test]
fn fetch_failure_exits_nonzero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/missing");
        then.status(404).body("not found");
    });

    peek_cmd()
        .arg("--allow-private-networks")
        .arg(server.url("/missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error peeking"));
}

#[test]
fn max_chars_truncates_output() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("long.html");
    let para = "word ".repeat(100);
    fs::write(
        &html_path,
        format!(
            "<html><body><p>{p}</p><p>{p}</p><p>{p}</p></body></html>",
            p = para
        ),
    )
    .unwrap();

    let output = peek_cmd()
        .arg("--max-chars")
        .arg("120")
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/long")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    assert!(stdout.trim().chars().count() <= 120);
}
