//! Shared helpers for pliptab end-to-end tests.
//!
//! A fake PLIP executable is written once per test process. It looks up
//! its behavior per input file in the directory named by `FAKE_PLIP_DIR`:
//!
//! * `<name>.quiet` / `<name>.verbose`: output for that verbosity
//! * `<name>.out`: output for any verbosity
//! * `<name>.exit`: exit status (default 0)
//! * `<name>.hang`: present to sleep instead of answering
//!
//! Every call is appended to `calls.log` as `<name> <quiet|verbose>`.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use assert_cmd::Command;
use tempfile::TempDir;

static FAKE_PLIP: OnceLock<PathBuf> = OnceLock::new();

const FAKE_PLIP_SCRIPT: &str = r#"#!/bin/sh
file=""
mode=verbose
while [ $# -gt 0 ]; do
  case "$1" in
    -f) shift; file="$1" ;;
    -q) mode=quiet ;;
  esac
  shift
done
name=$(basename "$file")
dir="$FAKE_PLIP_DIR"
echo "$name $mode" >> "$dir/calls.log"
if [ -f "$dir/$name.hang" ]; then
  exec sleep 30
fi
echo "Starting analysis of $name"
if [ -f "$dir/$name.$mode" ]; then
  cat "$dir/$name.$mode"
elif [ -f "$dir/$name.out" ]; then
  cat "$dir/$name.out"
fi
if [ -f "$dir/$name.exit" ]; then
  exit "$(cat "$dir/$name.exit")"
fi
exit 0
"#;

/// Path to the shared fake PLIP script.
pub fn fake_plip() -> &'static Path {
    FAKE_PLIP
        .get_or_init(|| {
            let dir = std::env::temp_dir().join(format!("pliptab-fake-plip-{}", std::process::id()));
            std::fs::create_dir_all(&dir).unwrap();
            let path = dir.join("plipcmd.sh");
            std::fs::write(&path, FAKE_PLIP_SCRIPT).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        })
        .as_path()
}

/// A PLIP-shaped stdout with the given `(container, entry, count)` tallies.
pub fn plip_output(counts: &[(&str, &str, usize)]) -> String {
    let mut xml = String::from("<report>\n  <plipversion>2.3.0</plipversion>\n  <bindingsite id=\"1\">\n    <interactions>\n");
    for (container, entry, n) in counts {
        xml.push_str(&format!("      <{container}>\n"));
        for i in 0..*n {
            xml.push_str(&format!("        <{entry} id=\"{}\"/>\n", i + 1));
        }
        xml.push_str(&format!("      </{container}>\n"));
    }
    xml.push_str("    </interactions>\n  </bindingsite>\n</report>\n");
    format!("Analyzing binding sites\n{xml}Analysis complete\n")
}

/// A PLIP-shaped stdout with nothing found.
pub fn empty_plip_output() -> String {
    plip_output(&[])
}

/// Input folder plus fake tool state for one test.
pub struct Workspace {
    tmp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("pdbs")).unwrap();
        std::fs::create_dir(tmp.path().join("tool")).unwrap();
        Self { tmp }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn pdbs(&self) -> PathBuf {
        self.tmp.path().join("pdbs")
    }

    pub fn tool_dir(&self) -> PathBuf {
        self.tmp.path().join("tool")
    }

    pub fn output(&self) -> PathBuf {
        self.tmp.path().join("combined.csv")
    }

    /// Add a structure file whose tool run prints `output`.
    pub fn structure(&self, name: &str, output: &str) -> &Self {
        std::fs::write(self.pdbs().join(name), "ATOM\n").unwrap();
        std::fs::write(self.tool_dir().join(format!("{name}.out")), output).unwrap();
        self
    }

    /// Add a structure file whose output depends on the verbosity.
    pub fn structure_by_mode(&self, name: &str, quiet: &str, verbose: &str) -> &Self {
        std::fs::write(self.pdbs().join(name), "ATOM\n").unwrap();
        std::fs::write(self.tool_dir().join(format!("{name}.quiet")), quiet).unwrap();
        std::fs::write(self.tool_dir().join(format!("{name}.verbose")), verbose).unwrap();
        self
    }

    pub fn exit_code(&self, name: &str, code: i32) -> &Self {
        std::fs::write(self.tool_dir().join(format!("{name}.exit")), code.to_string()).unwrap();
        self
    }

    pub fn hang(&self, name: &str) -> &Self {
        std::fs::write(self.tool_dir().join(format!("{name}.hang")), "").unwrap();
        self
    }

    /// Lines of `calls.log`, in call order.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.tool_dir().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn read_output(&self) -> String {
        std::fs::read_to_string(self.output()).unwrap()
    }

    /// `pliptab <pdbs> -o <output> --tool <fake> --no-progress`.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_pliptab"));
        cmd.arg(self.pdbs())
            .arg("-o")
            .arg(self.output())
            .arg("--tool")
            .arg(fake_plip())
            .arg("--no-progress")
            .env("FAKE_PLIP_DIR", self.tool_dir())
            .env_remove("RUST_LOG");
        cmd
    }
}
