#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

/// Creates a `Command` for the `moodyday` binary with a clean environment and
/// its database at `db_path`. No API key is set, so support messages fall back.
pub fn base_moodyday_command(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("moodyday").expect("moodyday binary not built");
    configure_moodyday_command(&mut cmd, db_path);
    cmd
}

/// Applies the standard non-interactive environment to an existing `Command`.
pub fn configure_moodyday_command(cmd: &mut Command, db_path: &Path) {
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("HOME", "/tmp")
        .env("MOODYDAY_DB", db_path)
        .env("MOODYDAY_API_BASE", "http://127.0.0.1:9");
}
