//! Command-line smoke tests; none of these reach the network

use assert_cmd::Command;
use predicates::prelude::*;

fn delivery() -> Command {
    let mut cmd = Command::cargo_bin("delivery").unwrap();
    cmd.env_remove("DELIVERY_USERNAME")
        .env_remove("DELIVERY_PASSWORD")
        .env_remove("DELIVERY_CLIENT_ID")
        .env_remove("DELIVERY_CLIENT_SECRET")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    delivery()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("merchants"))
        .stdout(predicate::str::contains("order"))
        .stdout(predicate::str::contains("events"));
}

#[test]
fn test_version() {
    delivery()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_username_fails() {
    delivery()
        .arg("auth")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("DELIVERY_USERNAME"));
}

#[test]
fn test_missing_password_fails() {
    delivery()
        .args(["merchants", "--username", "merchant@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DELIVERY_PASSWORD"));
}

#[test]
fn test_missing_client_credentials_fails() {
    delivery()
        .args(["events", "--username", "u", "--password", "p"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to configure the API client"))
        .stderr(predicate::str::contains("DELIVERY_CLIENT_ID"));
}

#[test]
fn test_order_requires_reference() {
    delivery().arg("order").assert().failure();
}

#[test]
fn test_rejects_unknown_format() {
    delivery()
        .args(["--format", "xml", "auth"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("xml"));
}
