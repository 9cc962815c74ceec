use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn mmadapt() -> Command {
    Command::cargo_bin("mmadapt").unwrap()
}

#[test]
fn test_compress_then_decompress() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("config.yaml");
    fs::write(&config, "").unwrap();
    let original = temp_dir.path().join("data.txt");
    fs::write(&original, "some text\n").unwrap();

    mmadapt()
        .arg("-c")
        .arg(&config)
        .arg("compress")
        .arg(&original)
        .assert()
        .success()
        .stdout(predicate::str::contains("gdata.txt.gz"));

    let pattern = temp_dir.path().join("*.gz");
    mmadapt()
        .arg("-c")
        .arg(&config)
        .arg("decompress")
        .arg(pattern.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("ugdata.txt"));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("ugdata.txt")).unwrap(),
        "some text\n"
    );
}

#[test]
fn test_rename_conflict_exits_with_error() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("config.yaml");
    fs::write(&config, "").unwrap();
    let source = temp_dir.path().join("a.txt");
    let destination = temp_dir.path().join("b.txt");
    fs::write(&source, "a").unwrap();
    fs::write(&destination, "b").unwrap();

    mmadapt()
        .arg("-c")
        .arg(&config)
        .arg("rename")
        .arg(&source)
        .arg(&destination)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Output file exists"));

    mmadapt()
        .arg("-c")
        .arg(&config)
        .arg("rename")
        .arg(&source)
        .arg(&destination)
        .arg("--overwrite")
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&destination).unwrap(), "a");
}

#[test]
fn test_normalize_in_place_by_default() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("config.yaml");
    fs::write(&config, "").unwrap();
    let table = temp_dir.path().join("input.txt");
    fs::write(&table, "1 3\n2 5\n3 7\n").unwrap();

    mmadapt()
        .arg("-c")
        .arg(&config)
        .arg("normalize")
        .arg(&table)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&table).unwrap(),
        "-1.22474487 -1.22474487\n0.00000000 0.00000000\n1.22474487 1.22474487\n"
    );
}

#[test]
fn test_missing_file_fails() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("config.yaml");
    fs::write(&config, "").unwrap();

    mmadapt()
        .arg("-c")
        .arg(&config)
        .arg("crop")
        .arg(temp_dir.path().join("missing.nii"))
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid filename"));
}

#[test]
fn test_no_subcommand_prints_help() {
    mmadapt()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
