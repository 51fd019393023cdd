//! Sweeper, letter, and export tests through the CLI

mod common;

use common::{add_units, seed_order, setup_project, stockroom};
use predicates::prelude::*;

#[test]
fn test_sweep_fresh_requests_untouched() {
    let tmp = setup_project();
    seed_order(&tmp);
    add_units(&tmp, "Multimeter", 1);
    stockroom()
        .current_dir(tmp.path())
        .args(["order", "add", "1", "Multimeter"])
        .assert()
        .success();

    // default threshold is 24h, a request made moments ago survives
    stockroom()
        .current_dir(tmp.path())
        .args(["sweep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Swept 0 expired request(s)"));

    stockroom()
        .current_dir(tmp.path())
        .args(["item", "available", "Multimeter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}

#[test]
fn test_sweep_reclaims_expired_requests() {
    let tmp = setup_project();
    seed_order(&tmp);
    add_units(&tmp, "Multimeter", 2);
    stockroom()
        .current_dir(tmp.path())
        .args(["order", "add", "1", "Multimeter", "--quantity", "2"])
        .assert()
        .success();

    // zero-hour threshold makes everything requested so far expired
    stockroom()
        .current_dir(tmp.path())
        .args(["sweep", "--hours", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Swept 1 expired request(s), 2 unit(s) back in the pool",
        ));

    stockroom()
        .current_dir(tmp.path())
        .args(["item", "available", "Multimeter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));
}

#[test]
fn test_sweep_leaves_loaned_items_alone() {
    let tmp = setup_project();
    seed_order(&tmp);
    add_units(&tmp, "Multimeter", 1);
    stockroom()
        .current_dir(tmp.path())
        .args(["order", "add", "1", "Multimeter"])
        .assert()
        .success();
    stockroom()
        .current_dir(tmp.path())
        .args(["status", "set", "1", "loaned"])
        .assert()
        .success();

    stockroom()
        .current_dir(tmp.path())
        .args(["sweep", "--hours", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Swept 0 expired request(s)"));
}

#[test]
fn test_letter_lists_pending_items() {
    let tmp = setup_project();
    seed_order(&tmp);
    add_units(&tmp, "Multimeter", 1);
    stockroom()
        .current_dir(tmp.path())
        .args(["order", "add", "1", "Multimeter"])
        .assert()
        .success();
    stockroom()
        .current_dir(tmp.path())
        .args(["status", "set", "1", "loaned"])
        .assert()
        .success();

    stockroom()
        .current_dir(tmp.path())
        .args(["letter", "ana@uni.edu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dear Ana Soto,"))
        .stdout(predicate::str::contains("1 x Multimeter (loaned"));
}

#[test]
fn test_letter_for_student_with_nothing_out() {
    let tmp = setup_project();
    seed_order(&tmp);

    stockroom()
        .current_dir(tmp.path())
        .args(["letter", "ana@uni.edu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no pending or loaned"));
}

#[test]
fn test_export_writes_csv_ledger() {
    let tmp = setup_project();
    seed_order(&tmp);
    add_units(&tmp, "Resistor 100", 3);
    stockroom()
        .current_dir(tmp.path())
        .args(["order", "add", "1", "Resistor 100", "--quantity", "2"])
        .assert()
        .success();

    let out = tmp.path().join("ledger.csv");
    stockroom()
        .current_dir(tmp.path())
        .args(["export", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 line(s)"));

    let csv = std::fs::read_to_string(&out).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "order,group,requesters,line,item,code,quantity,status,requested_at"
    );
    let row = lines.next().unwrap();
    assert!(row.contains("ana@uni.edu"));
    assert!(row.contains("Resistor 100"));
    assert!(row.contains(",2,requested,"));
}

#[test]
fn test_export_to_stdout() {
    let tmp = setup_project();
    seed_order(&tmp);
    add_units(&tmp, "Multimeter", 1);
    stockroom()
        .current_dir(tmp.path())
        .args(["order", "add", "1", "Multimeter"])
        .assert()
        .success();

    stockroom()
        .current_dir(tmp.path())
        .args(["export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("order,group,requesters"))
        .stdout(predicate::str::contains("Multimeter"));
}
