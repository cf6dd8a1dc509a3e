use std::process::Command;

fn raycrawl() -> Command {
    Command::new(env!("CARGO_BIN_EXE_raycrawl"))
}

#[test]
fn help_lists_every_flag() {
    let output = raycrawl()
        .arg("--help")
        .output()
        .expect("failed to launch the raycrawl binary");

    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--config",
        "--seed",
        "--level",
        "--vsync",
        "--no-vsync",
        "--show-fps",
        "--no-sprites",
    ] {
        assert!(help.contains(flag), "help output is missing {flag}");
    }
}

#[test]
fn unreadable_config_fails_before_opening_a_window() {
    let output = raycrawl()
        .args(["--config", "does/not/exist.toml"])
        .output()
        .expect("failed to launch the raycrawl binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load configuration"), "{stderr}");
}
