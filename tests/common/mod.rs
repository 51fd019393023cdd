//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a stockroom command
pub fn stockroom() -> Command {
    Command::new(cargo::cargo_bin!("stockroom"))
}

/// Helper to create an initialized project in a temp directory
pub fn setup_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    stockroom()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success();
    tmp
}

/// Seed a professor, a student, a course, a class group and one order.
/// With rowids starting fresh, the group is id 1 and the order is id 1.
pub fn seed_order(tmp: &TempDir) {
    stockroom()
        .current_dir(tmp.path())
        .args(["user", "add", "Prof Vega", "vega@uni.edu", "--role", "teacher"])
        .assert()
        .success();
    stockroom()
        .current_dir(tmp.path())
        .args(["user", "add", "Ana Soto", "ana@uni.edu"])
        .assert()
        .success();
    stockroom()
        .current_dir(tmp.path())
        .args(["course", "add", "Circuits I", "EE101"])
        .assert()
        .success();
    stockroom()
        .current_dir(tmp.path())
        .args([
            "group", "new", "EE101", "--professor", "vega@uni.edu", "--year", "2026",
        ])
        .assert()
        .success();
    stockroom()
        .current_dir(tmp.path())
        .args(["group", "enroll", "1", "ana@uni.edu"])
        .assert()
        .success();
    stockroom()
        .current_dir(tmp.path())
        .args(["order", "new", "1", "ana@uni.edu"])
        .assert()
        .success();
}

/// Add `count` uncoded units of an item.
pub fn add_units(tmp: &TempDir, name: &str, count: u32) {
    stockroom()
        .current_dir(tmp.path())
        .args(["item", "add", name, "-n", &count.to_string()])
        .assert()
        .success();
}
