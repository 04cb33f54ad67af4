// Copyright © 2024 HtmlSift. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn htmlsift() -> Command {
    let mut cmd = Command::cargo_bin("htmlsift").unwrap();
    let _ = cmd.env_remove("RUST_LOG");
    cmd
}

fn write_page(dir: &Path, name: &str) {
    fs::write(
        dir.join(name),
        "<html><body><h1>Title</h1><p class=\"x\">ignored</p></body></html>",
    )
    .unwrap();
}

#[test]
fn test_wrong_argument_count_prints_usage() {
    let _ = htmlsift()
        .args(["in", "out", "travel"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_help_is_not_a_failure() {
    let _ = htmlsift()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("<input_dir>"));
}

#[test]
fn test_missing_converter_skips_file_and_cleans_up() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("site");
    let output = temp_dir.path().join("out");
    fs::create_dir_all(&input).unwrap();
    write_page(&input, "tokyo.html");

    let _ = htmlsift()
        .arg(&input)
        .arg(&output)
        .args(["travel", "japan", "--converter", "htmlsift-no-such-converter"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Error processing"));

    assert!(output.is_dir());
    assert!(!output.join("tokyo.md").exists());
    assert!(!input.join("tokyo_processed.html").exists());
    assert!(input.join("tokyo.html").exists());
}

#[test]
fn test_keep_intermediate_leaves_shell_behind() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("site");
    let output = temp_dir.path().join("out");
    fs::create_dir_all(&input).unwrap();
    write_page(&input, "tokyo.html");

    let _ = htmlsift()
        .arg(&input)
        .arg(&output)
        .args([
            "travel",
            "japan",
            "--converter",
            "htmlsift-no-such-converter",
            "--keep-intermediate",
        ])
        .assert()
        .success();

    let shell = fs::read_to_string(input.join("tokyo_processed.html")).unwrap();
    assert!(shell.contains("<h1>Title</h1>"));
    assert!(!shell.contains("ignored"));
}

#[test]
fn test_invalid_config_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("htmlsift.toml");
    fs::write(&config, "[converter]\nprogram = \"\"\n").unwrap();

    let _ = htmlsift()
        .arg("--config")
        .arg(&config)
        .arg(temp_dir.path())
        .arg(temp_dir.path().join("out"))
        .args(["c", "t"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Converter program cannot be empty"));
}

#[test]
fn test_missing_input_dir_fails() {
    let temp_dir = TempDir::new().unwrap();

    let _ = htmlsift()
        .arg(temp_dir.path().join("gone"))
        .arg(temp_dir.path().join("out"))
        .args(["c", "t"])
        .assert()
        .code(1);
}

#[cfg(unix)]
#[test]
fn test_end_to_end_with_scripted_converter() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("site");
    let output = temp_dir.path().join("out");
    fs::create_dir_all(input.join("kanto")).unwrap();
    write_page(&input.join("kanto"), "tokyo-city-guide.html");

    // Invoked as: <script> -f html -t markdown <input> -o <output>
    let script = temp_dir.path().join("fake-pandoc");
    fs::write(
        &script,
        "#!/bin/sh\nprintf '::: note\\n# Title {#title}\\n[next](../kyoto/index.html)\\n' > \"$7\"\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let _ = htmlsift()
        .arg(&input)
        .arg(&output)
        .args(["travel", "japan", "--converter"])
        .arg(&script)
        .assert()
        .success();

    let document =
        fs::read_to_string(output.join("tokyo-city-guide.md")).unwrap();
    assert!(document.starts_with("---\ntitle: \"Tokyo City Guide\"\n"));
    assert!(document.contains("categories: [\"travel\"]\n"));
    assert!(document.contains("tags: [\"japan\"]\n"));
    assert!(document.ends_with("---\n\n# Title \n[next](kyoto)\n"));
    assert!(!input.join("kanto").join("tokyo-city-guide_processed.html").exists());
}
