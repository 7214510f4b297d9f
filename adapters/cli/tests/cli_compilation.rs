use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "tidewrap"])
        .status()
        .expect("failed to invoke cargo check for the bot binary");

    assert!(status.success(), "cargo check --bin tidewrap should succeed");
}

#[test]
fn help_lists_every_tuning_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_tidewrap"))
        .arg("--help")
        .output()
        .expect("failed to run the bot binary");
    assert!(output.status.success());

    let help = String::from_utf8(output.stdout).expect("utf-8 help text");
    for flag in [
        "--seed",
        "--search-radius",
        "--minimum-cell-halite",
        "--spawn-turn-limit-percent",
        "--bot-name",
    ] {
        assert!(help.contains(flag), "help text is missing {flag}");
    }
}
