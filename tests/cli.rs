#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn generate_exports_and_saves() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("mars.csv");
    let store = dir.path().join("store");

    Command::cargo_bin("roulement-cli")
        .unwrap()
        .args([
            "--store",
            store.to_str().unwrap(),
            "generate",
            "--year",
            "2025",
            "--month",
            "3",
            "--seed",
            "7",
            "--out-csv",
            csv.to_str().unwrap(),
            "--save",
            "mars 2025",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-03-01"));

    assert!(csv.exists());

    Command::cargo_bin("roulement-cli")
        .unwrap()
        .args(["--store", store.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mars 2025"));
}

#[test]
fn generate_rejects_bad_month() {
    Command::cargo_bin("roulement-cli")
        .unwrap()
        .args(["generate", "--year", "2025", "--month", "13"])
        .assert()
        .failure();
}
