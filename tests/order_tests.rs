//! Order and reservation flow tests

mod common;

use common::{add_units, seed_order, setup_project, stockroom};
use predicates::prelude::*;

#[test]
fn test_reserve_by_name() {
    let tmp = setup_project();
    seed_order(&tmp);
    add_units(&tmp, "Resistor 100", 3);

    stockroom()
        .current_dir(tmp.path())
        .args(["order", "add", "1", "Resistor 100", "-q", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reserved 2 x 'Resistor 100'"));

    stockroom()
        .current_dir(tmp.path())
        .args(["item", "available", "Resistor 100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));

    stockroom()
        .current_dir(tmp.path())
        .args(["order", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("requested"))
        .stdout(predicate::str::contains("ana@uni.edu"));
}

#[test]
fn test_reserve_insufficient_stock() {
    let tmp = setup_project();
    seed_order(&tmp);
    add_units(&tmp, "Resistor 100", 3);

    stockroom()
        .current_dir(tmp.path())
        .args(["order", "add", "1", "Resistor 100", "-q", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient stock"));

    // the failed reservation left the pool untouched
    stockroom()
        .current_dir(tmp.path())
        .args(["item", "available", "Resistor 100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3"));
}

#[test]
fn test_reserve_exact_code() {
    let tmp = setup_project();
    seed_order(&tmp);
    stockroom()
        .current_dir(tmp.path())
        .args(["item", "add", "Capacitor", "-n", "3", "--first-code", "5"])
        .assert()
        .success();

    stockroom()
        .current_dir(tmp.path())
        .args(["order", "add", "1", "Capacitor", "--code", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Capacitor [6]"));

    // the same serialized unit cannot be claimed twice
    stockroom()
        .current_dir(tmp.path())
        .args(["order", "add", "1", "Capacitor", "--code", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already reserved or on loan"));
}

#[test]
fn test_coded_family_rejects_bulk_claim() {
    let tmp = setup_project();
    seed_order(&tmp);
    stockroom()
        .current_dir(tmp.path())
        .args(["item", "add", "Oscilloscope", "-n", "4", "--first-code", "1"])
        .assert()
        .success();

    stockroom()
        .current_dir(tmp.path())
        .args(["order", "add", "1", "Oscilloscope", "-q", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("one at a time"));
}

#[test]
fn test_reserve_unknown_item() {
    let tmp = setup_project();
    seed_order(&tmp);
    stockroom()
        .current_dir(tmp.path())
        .args(["order", "add", "1", "Flux Capacitor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No unit named"));
}

#[test]
fn test_order_lists_and_attention() {
    let tmp = setup_project();
    seed_order(&tmp);
    add_units(&tmp, "Multimeter", 2);
    stockroom()
        .current_dir(tmp.path())
        .args(["order", "add", "1", "Multimeter"])
        .assert()
        .success();

    stockroom()
        .current_dir(tmp.path())
        .args(["order", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pending"));

    stockroom()
        .current_dir(tmp.path())
        .args(["order", "mine", "ana@uni.edu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pending"));

    // approve the single line; the order now holds loaned stock
    stockroom()
        .current_dir(tmp.path())
        .args(["status", "set", "1", "loaned"])
        .assert()
        .success();

    stockroom()
        .current_dir(tmp.path())
        .args(["order", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("loaned"));
}

#[test]
fn test_order_requires_known_student() {
    let tmp = setup_project();
    seed_order(&tmp);
    stockroom()
        .current_dir(tmp.path())
        .args(["order", "new", "1", "ghost@uni.edu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No user with email"));
}
