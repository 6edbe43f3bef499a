//! End-to-end tests against the demo binary, the process the scripts call.

use std::path::Path;
use tempfile::TempDir;

use crate::integration::{run_binary, stderr_of, stdout_of, XdgDirs};

#[test]
fn test_complete_request_over_process_boundary() {
    let test_dir = TempDir::new().unwrap();
    let dirs = XdgDirs::new(&test_dir);

    let output = run_binary(&dirs, &["__complete", "deploy", "api", ""]);
    assert!(output.status.success(), "stderr={}", stderr_of(&output));
    assert_eq!(
        stdout_of(&output),
        "web\tBrowser frontend\nworker\tBackground job runner\nscheduler\tCron-style trigger service\n:4\n"
    );
    assert!(stderr_of(&output).contains("Completion ended with directive: NoFileComp"));

    let output = run_binary(&dirs, &["__completeNoDesc", "deploy", "--env", "p"]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "prod\n:36\n");
}

#[test]
fn test_no_candidates_still_exits_zero() {
    let test_dir = TempDir::new().unwrap();
    let dirs = XdgDirs::new(&test_dir);

    let output = run_binary(&dirs, &["__complete", "version", ""]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), ":4\n");
}

#[test]
fn test_verbose_logs_stay_off_stdout_while_completing() {
    let test_dir = TempDir::new().unwrap();
    let dirs = XdgDirs::new(&test_dir);
    std::fs::create_dir_all(dirs.global_config().parent().unwrap()).unwrap();
    std::fs::write(dirs.global_config(), "[logging]\noutput = \"stdout\"\n").unwrap();

    let output = run_binary(&dirs, &["__complete", "-v", "config", ""]);
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "get\tPrint one setting\nset\tWrite one setting to the configuration file\npath\tPrint where the global configuration file lives\n:0\n"
    );
    assert!(stderr_of(&output).contains("Completion resolved"));
}

#[test]
fn test_broken_config_does_not_break_completion() {
    let test_dir = TempDir::new().unwrap();
    let dirs = XdgDirs::new(&test_dir);
    std::fs::create_dir_all(dirs.global_config().parent().unwrap()).unwrap();
    std::fs::write(dirs.global_config(), "[completion\n").unwrap();

    let output = run_binary(&dirs, &["__completeNoDesc", "vers"]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "version\n:4\n");

    let output = run_binary(&dirs, &["version"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("failed to load configuration"));
}

#[test]
fn test_completion_command_prints_scripts() {
    let test_dir = TempDir::new().unwrap();
    let dirs = XdgDirs::new(&test_dir);

    let output = run_binary(&dirs, &["completion", "bash"]);
    assert!(output.status.success());
    let script = stdout_of(&output);
    assert!(script.contains("complete -F __tabwise_start tabwise"));
    assert!(script.contains("has_completion_function=1"));

    let output = run_binary(&dirs, &["completion", "zsh", "--no-descriptions"]);
    assert!(stdout_of(&output).contains("__completeNoDesc"));
}

#[test]
fn test_descriptions_setting_changes_script_default() {
    let test_dir = TempDir::new().unwrap();
    let dirs = XdgDirs::new(&test_dir);
    let explicit = test_dir.path().join("explicit.toml");
    std::fs::write(&explicit, "[completion]\ndescriptions = false\n").unwrap();

    let output = run_binary(
        &dirs,
        &["--config", explicit.to_str().unwrap(), "completion", "fish"],
    );
    assert!(output.status.success(), "stderr={}", stderr_of(&output));
    assert!(stdout_of(&output).contains("$args[1] __completeNoDesc "));
}

#[test]
fn test_config_set_then_get() {
    let test_dir = TempDir::new().unwrap();
    let dirs = XdgDirs::new(&test_dir);

    let output = run_binary(&dirs, &["config", "set", "completion.debug_file_env", "MY_DEBUG"]);
    assert!(output.status.success(), "stderr={}", stderr_of(&output));
    assert!(dirs.global_config().exists());

    let output = run_binary(&dirs, &["config", "get", "completion.debug_file_env"]);
    assert_eq!(stdout_of(&output), "MY_DEBUG\n");

    // Generated scripts pick the new variable up
    let output = run_binary(&dirs, &["completion", "fish"]);
    assert!(stdout_of(&output).contains("set -l file \"$MY_DEBUG\""));
}

#[test]
fn test_user_errors_exit_nonzero() {
    let test_dir = TempDir::new().unwrap();
    let dirs = XdgDirs::new(&test_dir);

    let output = run_binary(&dirs, &["deploy"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("requires at least 1 arg(s), only received 0"));

    let output = run_binary(&dirs, &["config", "set", "logging.level", "chatty"]);
    assert!(!output.status.success());
}

#[test]
fn test_log_file_output() {
    let test_dir = TempDir::new().unwrap();
    let dirs = XdgDirs::new(&test_dir);
    let log_file = test_dir.path().join("logs").join("tabwise.log");
    std::fs::create_dir_all(dirs.global_config().parent().unwrap()).unwrap();
    std::fs::write(
        dirs.global_config(),
        format!(
            "[logging]\nlevel = \"info\"\noutput = \"file\"\nfile = {:?}\n",
            log_file.to_str().unwrap()
        ),
    )
    .unwrap();

    let output = run_binary(&dirs, &["deploy", "--dry-run", "api"]);
    assert!(output.status.success(), "stderr={}", stderr_of(&output));
    assert!(stdout_of(&output).starts_with("Would deploy api to dev at "));
    assert!(Path::new(&log_file).exists());
    let logged = std::fs::read_to_string(&log_file).unwrap();
    assert!(logged.contains("Running command"));
}
