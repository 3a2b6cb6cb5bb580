use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskboard-{nanos}-{name}"))
}

fn run(dir: &PathBuf, args: &[&str]) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_taskboard");
    Command::new(exe)
        .args(args)
        .env("TASKBOARD_DATA_DIR", dir)
        .stdin(Stdio::null())
        .output()
        .expect("failed to run taskboard")
}

fn last_line(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .lines()
        .last()
        .unwrap_or_default()
        .to_string()
}

#[test]
fn first_run_with_declined_prompts_uses_defaults() {
    let dir = temp_dir("profile-defaults");

    // Closed stdin: both prompts are declined.
    let output = run(&dir, &["profile", "--json"]);
    assert!(output.status.success());

    let profile: serde_json::Value = serde_json::from_str(&last_line(&output.stdout)).unwrap();
    assert_eq!(profile["name"], "John Doe");
    assert_eq!(profile["position"], "Software Developer");

    let persisted = std::fs::read_to_string(dir.join("profile.json")).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    let persisted: serde_json::Value = serde_json::from_str(&persisted).unwrap();
    assert_eq!(persisted["name"], "John Doe");
}

#[test]
fn existing_profile_loads_without_prompting() {
    let dir = temp_dir("profile-existing");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("profile.json"),
        r#"{"name":"Ada","position":"Engineer"}"#,
    )
    .unwrap();

    let output = run(&dir, &["profile", "--json"]);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    // No prompt text: the profile already exists.
    assert!(!stdout.contains("Enter your name:"));
    let profile: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(profile["name"], "Ada");
    assert_eq!(profile["position"], "Engineer");
}

#[test]
fn initialization_happens_at_most_once() {
    let dir = temp_dir("profile-once");

    assert!(run(&dir, &["profile"]).status.success());
    let first = std::fs::read_to_string(dir.join("profile.json")).unwrap();

    assert!(run(&dir, &["profile"]).status.success());
    let second = std::fs::read_to_string(dir.join("profile.json")).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(first, second);
}

#[test]
fn corrupt_profile_snapshot_reinitializes_with_defaults() {
    let dir = temp_dir("profile-corrupt");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("profile.json"), "{ broken ").unwrap();

    let output = run(&dir, &["profile", "--json"]);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let profile: serde_json::Value = serde_json::from_str(&last_line(&output.stdout)).unwrap();
    assert_eq!(profile["name"], "John Doe");
}
