use std::process::{Command, Output};

fn demo(args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_envflag-demo"));
    cmd.args(args)
        .env_remove("ENVFLAG_DEMO_FOO")
        .env_remove("ENVFLAG_DEMO_BAR")
        .env_remove("ENVFLAG_DEMO_LIST_FLAGS")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().unwrap()
}

#[test]
fn test_defaults() {
    let out = demo(&[], &[]);

    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "foo asdf\nbar 123\n");
}

#[test]
fn test_env_and_argv() {
    let out = demo(
        &["--bar=7"],
        &[("ENVFLAG_DEMO_FOO", "from-env"), ("ENVFLAG_DEMO_BAR", "9")],
    );

    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "foo from-env\nbar 7\n");
}

#[test]
fn test_bad_env_value_exits_with_status_2() {
    let out = demo(&[], &[("ENVFLAG_DEMO_BAR", "not-an-int")]);

    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("ENVFLAG_DEMO_BAR"));
    assert!(stderr.contains("'not-an-int'"));
}

#[test]
fn test_unknown_flag_exits_with_status_2() {
    let out = demo(&["--nope"], &[]);

    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Flag provided but not defined: -nope"));
    assert!(stderr.contains("-foo string"));
}

#[test]
fn test_help_exits_cleanly() {
    let out = demo(&["-help"], &[]);

    assert_eq!(out.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage of envflag-demo:"));
    assert!(stderr.contains("some int param (default 123)"));
}

#[test]
fn test_list_flags_from_env() {
    let out = demo(&["rest"], &[("ENVFLAG_DEMO_LIST_FLAGS", "true")]);

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("env=ENVFLAG_DEMO_FOO"));
    assert!(stdout.contains("args [\"rest\"]"));
}
