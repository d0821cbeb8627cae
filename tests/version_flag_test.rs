use std::process::Command;

#[test]
fn test_version_matches_cargo_toml() {
    // Build the binary path
    let binary_path = env!("CARGO_BIN_EXE_arena-dashboard");

    // Run with --version flag
    let output = Command::new(binary_path)
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    assert!(
        output.status.success(),
        "Version flag should exit with code 0"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout.trim().strip_prefix("arena-dashboard ").unwrap_or("");

    assert_eq!(
        version,
        env!("CARGO_PKG_VERSION"),
        "Binary version should match CARGO_PKG_VERSION"
    );
}

#[test]
fn test_help_flag_prints_usage() {
    let output = Command::new(env!("CARGO_BIN_EXE_arena-dashboard"))
        .arg("--help")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--backend"));
}

#[test]
fn test_unknown_flag_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_arena-dashboard"))
        .arg("--bogus")
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
}
