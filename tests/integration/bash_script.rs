//! The generated bash script run in a real bash against the demo binary.
//!
//! Skipped when no `bash` is on PATH.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

use crate::integration::{binary_path, isolate, run_binary, stdout_of, XdgDirs};

/// Sources the script, records `compopt` calls, completes `COMP_WORDS` and
/// prints the reply one entry per line.
const DRIVER: &str = r#"
source "$1" || exit 97
shift
compopt() { local IFS=' '; printf 'compopt:%s\n' "$*"; }
COMP_WORDS=("$@")
COMP_CWORD=$((${#COMP_WORDS[@]} - 1))
COMP_LINE="${COMP_WORDS[*]}"
COMP_POINT=${#COMP_LINE}
__tabwise_start
for reply in "${COMPREPLY[@]}"; do
    printf 'reply:%s\n' "${reply}"
done
"#;

fn bash_available() -> bool {
    Command::new("bash")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

struct BashShell {
    test_dir: TempDir,
    dirs: XdgDirs,
    script: PathBuf,
}

#[derive(Debug, Default)]
struct Completed {
    replies: Vec<String>,
    compopts: Vec<String>,
}

impl BashShell {
    fn new() -> Self {
        let test_dir = TempDir::new().unwrap();
        let dirs = XdgDirs::new(&test_dir);
        let output = run_binary(&dirs, &["completion", "bash"]);
        assert!(output.status.success());
        let script = test_dir.path().join("tabwise.bash");
        std::fs::write(&script, stdout_of(&output)).unwrap();
        Self {
            test_dir,
            dirs,
            script,
        }
    }

    fn scratch(&self) -> &Path {
        self.test_dir.path()
    }

    /// Complete the last of `words`, typed after the program name.
    fn complete(&self, words: &[&str]) -> Completed {
        let output = isolate(&mut Command::new("bash"), &self.dirs)
            .args(["--norc", "--noprofile", "-c", DRIVER, "bash"])
            .arg(&self.script)
            .arg(binary_path())
            .args(words)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "bash failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let mut completed = Completed::default();
        for line in String::from_utf8(output.stdout).unwrap().lines() {
            if let Some(reply) = line.strip_prefix("reply:") {
                completed.replies.push(reply.to_string());
            } else if let Some(options) = line.strip_prefix("compopt:") {
                completed.compopts.push(options.to_string());
            }
        }
        completed
    }
}

macro_rules! require_bash {
    () => {
        if !bash_available() {
            eprintln!("bash not found, skipping");
            return;
        }
    };
}

#[test]
fn test_positional_arguments_call_back_into_binary() {
    require_bash!();
    let shell = BashShell::new();

    let completed = shell.complete(&["deploy", ""]);
    assert_eq!(completed.replies, vec!["api", "web", "worker", "scheduler"]);

    let completed = shell.complete(&["deploy", "api", "w"]);
    assert_eq!(completed.replies, vec!["web", "worker"]);

    let completed = shell.complete(&["config", "get", "logging.l"]);
    assert_eq!(completed.replies, vec!["logging.level"]);
}

#[test]
fn test_typed_words_are_never_run_as_commands() {
    require_bash!();
    let shell = BashShell::new();
    let marker = shell.scratch().join("ran");
    let substitution = format!("$(touch {})", marker.display());

    let completed = shell.complete(&["deploy", substitution.as_str(), ""]);
    assert!(!marker.exists());
    assert_eq!(completed.replies, vec!["api", "web", "worker", "scheduler"]);

    shell.complete(&["deploy", substitution.as_str()]);
    assert!(!marker.exists());
}

#[test]
fn test_flag_value_function() {
    require_bash!();
    let shell = BashShell::new();

    let completed = shell.complete(&["deploy", "--env", ""]);
    assert_eq!(completed.replies, vec!["dev", "staging", "prod"]);
    assert!(completed.compopts.is_empty());
}

#[test]
fn test_no_space_for_single_candidate() {
    require_bash!();
    let shell = BashShell::new();

    let completed = shell.complete(&["deploy", "--tag", "ow"]);
    assert_eq!(completed.replies, vec!["owner="]);
    assert_eq!(completed.compopts, vec!["-o nospace"]);

    let completed = shell.complete(&["deploy", "--tag", ""]);
    assert_eq!(completed.replies, vec!["release=", "owner=", "ticket="]);
    assert!(completed.compopts.is_empty());
}

#[test]
fn test_no_file_comp_suppresses_fallback() {
    require_bash!();
    let shell = BashShell::new();

    let completed = shell.complete(&["deploy", "api", "web", "worker", "scheduler", ""]);
    assert!(completed.replies.is_empty());
    assert!(completed.compopts.is_empty());

    // Extension filters fall back to default file completion without bash-completion
    let completed = shell.complete(&["deploy", "--manifest", ""]);
    assert!(completed.replies.is_empty());
    assert_eq!(completed.compopts, vec!["-o default"]);
}

#[test]
fn test_aliases_follow_resolver_rule() {
    require_bash!();
    let shell = BashShell::new();

    let completed = shell.complete(&["sh"]);
    assert_eq!(completed.replies, vec!["ship"]);

    let completed = shell.complete(&["de"]);
    assert_eq!(completed.replies, vec!["deploy"]);

    let completed = shell.complete(&[""]);
    assert!(completed.replies.contains(&"deploy".to_string()));
    assert!(!completed.replies.contains(&"ship".to_string()));
}
