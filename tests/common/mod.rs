//! Shared helpers for the CLI tests: a scratch project and a stand-in perltidy.
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Upper-cases its input, like a formatter that always changes something.
pub const SHOUTING: &str = "tr a-z A-Z\n";

/// Echoes its input untouched.
pub const IDENTITY: &str = "cat\n";

/// Rejects every input with a single positioned error and a noise block.
pub const FAILING: &str = "cat > /dev/null\n\
    echo '<stdin>: 2: syntax error near ;' >&2\n\
    echo '<stdin>: 2: To save a full .LOG file rerun with -g' >&2\n\
    exit 1\n";

/// Prints its arguments to stdout, one per line.
pub const ARGS_ECHO: &str = "cat > /dev/null\nfor a in \"$@\"; do echo \"$a\"; done\n";

pub struct Project {
    pub dir: TempDir,
    script: PathBuf,
}

impl Project {
    /// A scratch directory holding a fake perltidy whose behaviour is `script`.
    pub fn new(script: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("fake-perltidy.sh");
        fs::write(&script_path, script).unwrap();
        Self {
            dir,
            script: script_path,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).unwrap()
    }

    /// The perltidy arguments that run the fake script, followed by `extra`.
    pub fn perltidy_args(&self, extra: &str) -> String {
        format!("{} {extra}", self.script.display())
    }

    /// The binary, run inside the project without a configured perltidy.
    pub fn bare_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tidybridge").unwrap();
        cmd.current_dir(self.dir.path()).env("NO_COLOR", "1").env_remove("RUST_LOG");
        cmd
    }

    /// The binary, run inside the project with the fake perltidy configured on the command line.
    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--perltidy")
            .arg("/bin/sh")
            .arg("--args")
            .arg(self.perltidy_args("-se"));
        cmd
    }
}
