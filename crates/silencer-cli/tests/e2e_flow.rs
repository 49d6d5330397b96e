//! End-to-end tests driving the `logcat-silencer` binary over real pipes.
//!
//! The quiet period is measured in whole seconds on the system clock, so the
//! release tests use `--quiet-secs 0` and a short pause between lines.

use std::io::{Read, Write};
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

const NOTICE_TAIL: &str = "You can now interact with the device.";

fn silencer_binary() -> String {
    env!("CARGO_BIN_EXE_logcat-silencer").to_string()
}

fn logcat_line(tag: &str, message: &str) -> String {
    format!("01-28 09:00:00.123  1234  1250 I {tag}: {message}\n")
}

/// Spawns the binary with an isolated config directory.
fn spawn(home: &TempDir, args: &[&str]) -> Child {
    spawn_with_env(home, args, &[])
}

/// Spawns the binary with an isolated config directory and extra env vars.
fn spawn_with_env(home: &TempDir, args: &[&str], envs: &[(&str, &str)]) -> Child {
    Command::new(silencer_binary())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("LOGCAT_SILENCER_QUIET_SECS")
        .env_remove("LOGCAT_SILENCER_CATEGORY_FIELD")
        .env_remove("LOGCAT_SILENCER_STATUS")
        .envs(envs.iter().copied())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn logcat-silencer")
}

/// Writes `input` to the child's stdin, closes it and collects the output.
fn finish(mut child: Child, input: &[u8]) -> Output {
    child.stdin.take().unwrap().write_all(input).unwrap();
    child.wait_with_output().unwrap()
}

fn run_with_input(args: &[&str], input: &str) -> Output {
    let home = TempDir::new().unwrap();
    finish(spawn(&home, args), input.as_bytes())
}

#[test]
fn test_repeated_activity_is_silenced() {
    let line = logcat_line("ActivityManager", "Start proc");
    let input = line.repeat(3);

    let output = run_with_input(&[], &input);
    assert!(output.status.success());
    assert!(
        output.stdout.is_empty(),
        "nothing should reach stdout while waiting"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(" / 1   "), "stderr: {stderr:?}");
}

#[test]
fn test_unparseable_lines_reported_on_stderr() {
    let input = "--------- beginning of main\nfoo bar\n";

    let output = run_with_input(&[], input);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\rCould not parse line: foo bar\n"));
    assert!(!stderr.contains("beginning of main"));
}

#[test]
fn test_quiet_stream_is_released() {
    let home = TempDir::new().unwrap();
    let mut child = spawn(&home, &["--quiet-secs", "0"]);
    let mut stdin = child.stdin.take().unwrap();

    let first = logcat_line("ActivityManager", "first");
    let second = logcat_line("ActivityManager", "second");
    let third = logcat_line("WindowManager", "third");

    stdin.write_all(first.as_bytes()).unwrap();
    stdin.flush().unwrap();

    // Start the pause only once the first line has been seen.
    let mut stderr = child.stderr.take().unwrap();
    let mut seen = Vec::new();
    let mut chunk = [0_u8; 64];
    while !String::from_utf8_lossy(&seen).contains(" / 1   ") {
        let n = stderr.read(&mut chunk).unwrap();
        assert!(n > 0, "stderr closed before first status update");
        seen.extend_from_slice(&chunk[..n]);
    }

    thread::sleep(Duration::from_millis(1200));
    stdin.write_all(second.as_bytes()).unwrap();
    stdin.write_all(third.as_bytes()).unwrap();
    drop(stdin);

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("first"));
    let notice_at = stdout.find(NOTICE_TAIL).expect("release notice missing");
    let second_at = stdout.find("second").expect("trigger line not forwarded");
    let third_at = stdout.find("third").expect("passthrough line missing");
    assert!(notice_at < second_at);
    assert!(second_at < third_at);
    assert_eq!(stdout.matches(NOTICE_TAIL).count(), 1);
}

#[test]
fn test_no_status_flag_keeps_stderr_clean() {
    let line = logcat_line("ActivityManager", "Start proc");

    let output = run_with_input(&["--no-status"], &line);
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
}

#[test]
fn test_config_file_sets_field() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("silencer.toml");
    std::fs::write(&config_path, "category_field = 1\nstatus = false\n").unwrap();

    let child = spawn(&home, &["--config", config_path.to_str().unwrap()]);
    // One token is enough with the category in the first field.
    let output = finish(child, b"tag\n");

    assert!(output.status.success());
    assert!(output.stderr.is_empty(), "stderr: {:?}", output.stderr);
}

#[test]
fn test_env_overrides_config_file() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("silencer.toml");
    std::fs::write(&config_path, "category_field = 3\nstatus = false\n").unwrap();

    let child = spawn_with_env(
        &home,
        &["--config", config_path.to_str().unwrap()],
        &[("LOGCAT_SILENCER_CATEGORY_FIELD", "1")],
    );
    // Field 3 would make this line unparseable and print a diagnostic.
    let output = finish(child, b"tag\n");

    assert!(output.status.success());
    assert!(output.stderr.is_empty(), "stderr: {:?}", output.stderr);
}

#[cfg(target_os = "linux")]
#[test]
fn test_user_config_dir_is_loaded() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config").join("logcat-silencer");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "category_field = 1\nstatus = false\n",
    )
    .unwrap();

    let output = finish(spawn(&home, &[]), b"tag\n");

    assert!(output.status.success());
    assert!(output.stderr.is_empty(), "stderr: {:?}", output.stderr);
}

#[test]
fn test_invalid_field_position_fails() {
    let output = run_with_input(&["--field", "0"], "");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("category field position must be at least 1"));
}

#[test]
fn test_empty_input_exits_cleanly() {
    let output = run_with_input(&[], "");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}
