#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use serde_json::json;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::ResponseTemplate;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

#[allow(dead_code)]
fn data_dir() -> &'static Path {
    static DATA_DIR: OnceLock<TempDir> = OnceLock::new();
    DATA_DIR
        .get_or_init(|| tempfile::tempdir().expect("failed to create data dir for tests"))
        .path()
}

/// Create a configured `disclink` command suitable for integration tests.
///
/// Data and config live in a shared temp dir so nothing touches the real
/// user directories.
#[allow(dead_code)]
pub fn disclink_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("disclink"));
    cmd.timeout(CMD_TIMEOUT);
    let dir = data_dir();
    cmd.env("DISCLINK_DATA_DIR", dir);
    cmd.env("DISCLINK_CONFIG_DIR", dir);
    cmd.env_remove("DISCLINK_CONFIG");
    cmd.env_remove("DISCLINK_API_BASE");
    cmd.env_remove("DISCLINK_OUTPUT_FORMAT");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// A `disclink` command with its own data and config directories, talking to
/// `api_base`.
#[allow(dead_code)]
pub fn disclink_cmd_with_dirs(dirs: &TestDirs, api_base: &str) -> Command {
    let mut cmd = disclink_cmd();
    cmd.env("DISCLINK_DATA_DIR", dirs.data.path());
    cmd.env("DISCLINK_CONFIG_DIR", dirs.config.path());
    cmd.env("DISCLINK_API_BASE", api_base);
    cmd
}

/// Isolated data and config directories for one test.
#[allow(dead_code)]
pub struct TestDirs {
    pub data: TempDir,
    pub config: TempDir,
}

#[allow(dead_code)]
impl TestDirs {
    /// Fresh directories with a config pointing at the `acme/docs` repository
    /// and probing threads 87 and 88 only.
    pub fn new() -> Self {
        let dirs = Self {
            data: tempfile::tempdir().expect("failed to create data dir"),
            config: tempfile::tempdir().expect("failed to create config dir"),
        };
        std::fs::write(
            dirs.config.path().join("config.toml"),
            "[repository]\nowner = \"acme\"\nname = \"docs\"\n\n[lookup]\nprobe_numbers = [87, 88]\ntimeout_secs = 5\n",
        )
        .expect("failed to write config");
        dirs
    }

    pub fn cache_file(&self) -> std::path::PathBuf {
        self.data.path().join("cache.json")
    }
}

/// A GraphQL discussion listing containing `titles`, newest first.
#[allow(dead_code)]
pub fn listing(titles: &[(&str, u64)]) -> ResponseTemplate {
    let nodes: Vec<_> = titles
        .iter()
        .map(|(title, number)| {
            json!({
                "title": title,
                "number": number,
                "url": format!("https://github.com/acme/docs/discussions/{number}"),
                "updatedAt": "2025-05-13T10:00:00Z",
                "category": {"name": "Q&A"}
            })
        })
        .collect();
    ResponseTemplate::new(200).set_body_json(json!({
        "data": {"repository": {"discussions": {
            "pageInfo": {"hasNextPage": false, "endCursor": null},
            "nodes": nodes
        }}}
    }))
}
