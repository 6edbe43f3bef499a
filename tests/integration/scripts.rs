//! Generated scripts: registration entry points, request names, markers.

use clap::ValueEnum;
use tabwise::command::{Command, CommandTree};
use tabwise::completion::{add_completion_command, Candidate, Directive};
use tabwise::flags::Flag;
use tabwise::scripts::{generate, Shell};

use crate::integration::run;

fn static_tree() -> CommandTree {
    let mut tree = CommandTree::new(Command::new("my-tool").persistent_flag(Flag::bool("debug")));
    let root = tree.root();
    tree.add_subcommand(
        root,
        Command::new("get").flag(Flag::value("output").choices(["json", "yaml"])),
    )
    .unwrap();
    add_completion_command(&mut tree).unwrap();
    tree
}

fn dynamic_tree() -> CommandTree {
    let mut tree = static_tree();
    let get = tree.find_child(tree.root(), "get").unwrap();
    tree.register_args_completion(get, |_: &Command, _: &[String], _: &str| {
        (vec![Candidate::new("pods")], Directive::NO_FILE_COMP)
    })
    .unwrap();
    tree
}

#[test]
fn test_custom_completion_marker_follows_registrations() {
    let without = static_tree();
    let with = dynamic_tree();

    let bash = generate(&without, Shell::Bash, false);
    assert!(!bash.contains("has_completion_function=1"));
    assert!(generate(&with, Shell::Bash, false).contains("has_completion_function=1"));

    assert!(!generate(&without, Shell::ZshV1, false).contains("__my_tool_dynamic"));
    assert!(generate(&with, Shell::ZshV1, false).contains("__my_tool_dynamic()"));
}

#[test]
fn test_every_script_registers_under_program_name() {
    let tree = static_tree();
    let expectations = [
        (Shell::Bash, "complete -F __my_tool_start my-tool"),
        (Shell::Zsh, "compdef _my_tool my-tool"),
        (Shell::ZshV1, "compdef _my_tool my-tool"),
        (Shell::Fish, "complete -c my-tool -n '__my_tool_prepare_completions'"),
        (Shell::PowerShell, "Register-ArgumentCompleter -Native -CommandName 'my-tool'"),
    ];
    for (shell, needle) in expectations {
        let script = generate(&tree, shell, true);
        assert!(script.contains(needle), "{} script lacks {:?}", shell, needle);
        assert!(script.contains("BASH_COMP_DEBUG_FILE"), "{} script lacks debug hook", shell);
    }
}

#[test]
fn test_request_name_follows_description_mode() {
    let tree = dynamic_tree();
    for shell in Shell::value_variants().iter().copied() {
        let without = generate(&tree, shell, false);
        assert!(without.contains("__completeNoDesc"), "{}", shell);

        let with = generate(&tree, shell, true);
        if shell.supports_descriptions() {
            assert!(!with.contains("__completeNoDesc"), "{}", shell);
            assert!(with.contains("__complete "), "{}", shell);
        } else {
            assert!(with.contains("__completeNoDesc"), "{}", shell);
        }
    }
}

#[test]
fn test_zsh_escapes_colons_before_describe() {
    let script = generate(&static_tree(), Shell::Zsh, true);
    assert!(script.contains(r"comp=${comp//:/\\:}"));
    assert!(script.contains("comp=${comp//$tab/:}"));
}

#[test]
fn test_completion_command_honours_no_descriptions() {
    let tree = static_tree();
    let with = run(&tree, &["completion", "fish"]).stdout;
    assert!(with.contains("$args[1] __complete "));

    let without = run(&tree, &["completion", "fish", "--no-descriptions"]).stdout;
    assert!(without.contains("$args[1] __completeNoDesc "));
}

#[test]
fn test_completion_command_is_completable() {
    let tree = static_tree();
    let out = crate::integration::complete_no_desc(&tree, &["completion", ""]);
    assert_eq!(out, "bash\nzsh\nzsh-v1\nfish\npowershell\n:4\n");

    let out = crate::integration::complete_no_desc(&tree, &["completion", "zsh", "--"]);
    assert_eq!(out, "--no-descriptions\n--debug\n:4\n");
}
