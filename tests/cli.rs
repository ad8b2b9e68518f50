use std::process::{Command, Output};

fn smoke(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mcp-smoke"))
        .args(["--no-color", "--timeout-secs", "10"])
        .args(args)
        .env_remove("MCP_SMOKE_URL")
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run mcp-smoke")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn missing_executable_exits_with_failure() {
    let output = smoke(&["--", "mcp-smoke-test-no-such-server"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("❌ Test failed: failed to start server"));
}

#[test]
fn bad_server_path_exits_with_failure() {
    // Fails at spawn when python is absent, at the handshake otherwise
    let output = smoke(&["--", "python", "bad/path.py"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("❌ Test failed:"));
}

#[test]
fn server_that_exits_immediately_fails() {
    let output = smoke(&["--", "sh", "-c", "exit 3"]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("❌ Test failed:"), "{out}");
    assert!(!out.contains("✅"));
}

#[test]
fn unreachable_http_endpoint_fails() {
    let output = smoke(&["--url", "http://127.0.0.1:1/mcp"]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("❌ Test failed:"), "{out}");
    assert!(!out.contains("🔍"));
}

#[test]
fn malformed_env_is_rejected() {
    let output = smoke(&["--env", "NOEQUALS", "--", "sh"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("expected KEY=VALUE"));
}

#[test]
fn help_succeeds() {
    let output = Command::new(env!("CARGO_BIN_EXE_mcp-smoke"))
        .arg("--help")
        .output()
        .expect("failed to run mcp-smoke");

    assert!(output.status.success());
    assert!(stdout(&output).contains("--tool"));
}
