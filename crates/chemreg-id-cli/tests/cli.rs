//! Integration tests for the `chemreg-id` binary.

use std::{io::Write, process::Command};

fn run_chemreg_id(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_chemreg-id");
    Command::new(bin)
        .args(args)
        .env_remove("CHEMREG_ID_PREFIX")
        .env_remove("CHEMREG_ID_INCREMENT_START")
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run chemreg-id binary")
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn checksum_prints_digit() {
    let output = run_chemreg_id(&["checksum", "2345678"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "8\n");
}

#[test]
fn build_uses_domain_and_prefix() {
    let output = run_chemreg_id(&["build", "2345678"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "DTXCID802345678\n");

    let output = run_chemreg_id(&["--domain", "record", "--prefix", "ABC", "build", "42"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "ABCRID8042\n");
}

#[test]
fn inspect_accepts_valid_identifiers() {
    let output = run_chemreg_id(&["inspect", "DTXCID802345678", "DTXCID202000000"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().filter(|l| l.ends_with("\tok")).count(), 2);
}

#[test]
fn inspect_fails_on_bad_checksum() {
    let output = run_chemreg_id(&["inspect", "DTXCID802345678", "DTXCID102345678"]);
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("DTXCID102345678\tpayload=2345678\tchecksum=1\tinvalid:"));
    assert!(out.contains("expected 8, found 1"));
}

#[test]
fn inspect_respects_domain() {
    let output = run_chemreg_id(&["--domain", "substance", "inspect", "DTXCID802345678"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("malformed identifier"));
}

#[test]
fn registry_validates_numbers() {
    let output = run_chemreg_id(&["registry", "7732-18-5", "50-00-0", "71-43-2"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().count(), 3);

    let output = run_chemreg_id(&["registry", "7732-18-5", "7732185"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("7732185\tinvalid: malformed registry number"));
}

#[test]
fn recover_reads_export() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "DTXCID802345678").unwrap();
    writeln!(file, "FOO8").unwrap();
    writeln!(file, "DTXSID902999999").unwrap();

    let path = file.path().to_str().unwrap();
    let output = run_chemreg_id(&["recover", "--file", path]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "last\t2345678\nnext\t2345679\n");
}

#[test]
fn recover_empty_export_starts_fresh() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let path = file.path().to_str().unwrap();

    let output = run_chemreg_id(&["recover", "--file", path, "--increment-start", "100"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "last\t99\nnext\t100\n");
}

#[test]
fn mint_continues_after_export() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "DTXCID802345678").unwrap();

    let path = file.path().to_str().unwrap();
    let output = run_chemreg_id(&["mint", "--file", path, "--count", "3"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "DTXCID502345679\nDTXCID802345680\nDTXCID502345681\n"
    );
}

#[test]
fn missing_export_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");

    let output = run_chemreg_id(&["recover", "--file", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.txt"));
}

#[test]
fn prefix_from_environment() {
    let output = Command::new(env!("CARGO_BIN_EXE_chemreg-id"))
        .args(["build", "12"])
        .env("CHEMREG_ID_PREFIX", "QA")
        .output()
        .expect("failed to run chemreg-id binary");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "QACID5012\n");
}

#[test]
fn invalid_prefix_is_rejected() {
    let output = run_chemreg_id(&["--prefix", "dtx", "build", "1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid identifier configuration"));
}
