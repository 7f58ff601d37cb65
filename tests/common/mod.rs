//! Shared helpers for the `clt` integration tests
#![allow(dead_code)]

use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub const TIMING_REPORT: &str = "DNS Lookup Time: 0.010
TCP Connect Time: 0.020
SSL Handshake Time: 0.030
Server Processing Time: 0.040
Total Time: 0.050
";

pub const ENV_VARS: [&str; 7] = [
    "TARGET_URL",
    "NUM_REQUESTS",
    "DELAY_SECONDS",
    "PROBE_COMMAND",
    "PROBE_TIMEOUT_SECONDS",
    "OUTPUT_FILE",
    "ENABLE_COLOR",
];

/// Scratch directory the binary runs in, with stub probes written into it
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write an executable shell script standing in for curl
    #[cfg(unix)]
    pub fn stub_probe(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.file(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Stub that prints `report` verbatim and exits 0
    #[cfg(unix)]
    pub fn printing_probe(&self, name: &str, report: &str) -> PathBuf {
        self.stub_probe(name, &format!("cat <<'REPORT'\n{}REPORT", report))
    }

    /// `clt` running in this workspace with a clean configuration environment
    pub fn clt(&self) -> Command {
        let mut cmd = Command::cargo_bin("clt").unwrap();
        cmd.current_dir(self.path());
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd
    }
}
