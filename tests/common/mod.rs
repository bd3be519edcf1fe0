//! Shared test infrastructure for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A scratch application repository plus an isolated config home.
pub struct RepoFixture {
    pub dir: TempDir,
    config_home: TempDir,
}

impl RepoFixture {
    pub fn create() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create repo dir"),
            config_home: tempfile::tempdir().expect("create config home"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, content).expect("write fixture file");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).expect("read fixture file")
    }

    /// Run the binary with `args`, isolated from the user's config and env.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_appmeta"))
            .args(args)
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env_remove("APPMETA_LM_COMMAND")
            .env_remove("RUST_LOG")
            .output()
            .expect("spawn appmeta")
    }

    pub fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "appmeta {:?} failed\nstdout:\n{}\nstderr:\n{}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("utf-8 stdout")
    }
}
