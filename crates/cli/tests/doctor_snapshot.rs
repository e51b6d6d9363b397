use assert_cmd::prelude::*;
use predicates::prelude::*;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn normalize(s: &str) -> String {
    let config = Regex::new(r#"(?m)^config: .*$"#).unwrap();
    let version = Regex::new(r#"(?m)^version: .*$"#).unwrap();
    let s = config.replace(s, "config: <CFG>");
    version.replace(&s, "version: <VERSION>").trim_end().to_string()
}

#[test]
fn doctor_snapshot_full_config() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");

    let toml = r#"
version = 1

[paths]
database   = "/nonexistent/roam2md/org-roam.db"
input_dir  = "/nonexistent/roam2md/roam"
output_dir = "/nonexistent/roam2md/out"
roam_root  = "/home/someone/org-roam"

[converter]
program = "/usr/local/bin/pandoc"
to = "commonmark"
standalone = false
"#;
    write_file(&cfg, toml);

    let assert = Command::new(assert_cmd::cargo::cargo_bin!("roam2md"))
        .args(["doctor", "--config", cfg.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK   roam2md doctor"));

    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    insta::assert_snapshot!(normalize(&out), @r"
    OK   roam2md doctor
    version: <VERSION>
    config: <CFG>
    database: /nonexistent/roam2md/org-roam.db
    input_dir: /nonexistent/roam2md/roam
    output_dir: /nonexistent/roam2md/out
    roam_root: /home/someone/org-roam
    converter: /usr/local/bin/pandoc
    format: org -> commonmark (wrap=none, standalone=false)
    extensions: .org -> .md
    database exists: false
    input_dir exists: false
    ");
}
