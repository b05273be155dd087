use std::{
    io::Write,
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use serde_json::Value;

fn tactics(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tactics"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch tactics binary")
}

#[test]
fn quitting_from_the_title_menu_sets_the_quit_flag() {
    let output = tactics(&["--no-frames", "--dump-state", "--keys", "up,enter"]);
    assert!(output.status.success());

    let state: Value = serde_json::from_slice(&output.stdout).expect("state is json");
    assert_eq!(state["quit"], Value::Bool(true));
}

#[test]
fn frames_show_the_battlefield_after_starting() {
    let output = tactics(&["--keys", "enter"]);
    assert!(output.status.success());

    let frames = String::from_utf8(output.stdout).expect("frames are utf-8");
    assert!(frames.contains(">New Game"));
    assert!(frames.contains("Turn 0: Player"));
    assert!(frames.contains("[L]"));
}

#[test]
fn missing_config_file_fails_with_its_path() {
    let output = tactics(&["--config", "/nonexistent/tactics.toml", "--keys", "q"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).expect("stderr is utf-8");
    assert!(stderr.contains("/nonexistent/tactics.toml"));
}

#[test]
fn quit_from_standard_input_exits_while_input_stays_open() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tactics"))
        .arg("--no-frames")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .expect("failed to launch tactics binary");
    let mut stdin = child.stdin.take().expect("stdin is piped");
    stdin.write_all(b"q\n").expect("write key");
    stdin.flush().expect("flush key");

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().expect("poll child") {
            break Some(status);
        }
        if Instant::now() > deadline {
            break None;
        }
        thread::sleep(Duration::from_millis(20));
    };
    drop(stdin);
    if status.is_none() {
        let _ = child.kill();
    }

    assert!(status.is_some_and(|status| status.success()), "tactics kept waiting for input");
}
