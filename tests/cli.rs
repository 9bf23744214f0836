//! Flag handling and exit codes. Nothing here talks to a server: every case
//! either short-circuits in the parser or fails before connecting.

use assert_cmd::Command;

#[test]
fn help_prints_usage_and_exits_zero() {
    let output = Command::cargo_bin("rowdump")
        .unwrap()
        .arg("-h")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
    for flag in ["-d", "-c", "-f", "-s", "-z", "-x"] {
        assert!(stdout.contains(flag), "usage is missing {flag}");
    }
}

#[test]
fn unknown_flag_exits_one() {
    let output = Command::cargo_bin("rowdump")
        .unwrap()
        .arg("-q")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn conflicting_strategy_flags_exit_one() {
    let output = Command::cargo_bin("rowdump")
        .unwrap()
        .args(["-f", "-s"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn malformed_conninfo_exits_one_with_diagnostic() {
    let output = Command::cargo_bin("rowdump")
        .unwrap()
        .args(["-d", "sslmode=require"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("sslmode"));
}
