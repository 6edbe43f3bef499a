//! Flag names, flag values and registration errors.

use tabwise::command::{Command, CommandTree};
use tabwise::completion::{Candidate, Directive};
use tabwise::error::RegistrationError;
use tabwise::flags::Flag;

use crate::integration::complete_no_desc;

fn tree() -> CommandTree {
    let mut tree = CommandTree::new(
        Command::new("root").persistent_flag(Flag::value("introot").short('i').usage("help message for flag introot")),
    );
    let root = tree.root();
    let child = tree
        .add_subcommand(
            root,
            Command::new("child")
                .flag(Flag::value("filename").usage("Enter a filename"))
                .flag(Flag::value("format").choices(["json", "yaml", "table"]))
                .flag(Flag::bool("force").short('f')),
        )
        .unwrap();

    tree.register_flag_completion(root, "introot", |_: &Command, _: &[String], _: &str| {
        (
            vec![Candidate::new("1"), Candidate::new("2"), Candidate::new("10")],
            Directive::NO_FILE_COMP,
        )
    })
    .unwrap();
    tree.register_flag_completion(child, "filename", |_: &Command, _: &[String], _: &str| {
        (
            vec![
                Candidate::new("file.yaml"),
                Candidate::new("myfile.json"),
                Candidate::new("file.xml"),
            ],
            Directive::NO_SPACE | Directive::NO_FILE_COMP,
        )
    })
    .unwrap();
    tree
}

#[test]
fn test_flag_value_merges_directive_bits() {
    let tree = tree();
    assert_eq!(
        complete_no_desc(&tree, &["child", "--filename", "f"]),
        "file.yaml\nfile.xml\n:6\n"
    );
    assert_eq!(
        complete_no_desc(&tree, &["child", "--filename=f"]),
        "file.yaml\nfile.xml\n:6\n"
    );
}

#[test]
fn test_persistent_flag_completion_reaches_children() {
    let tree = tree();
    assert_eq!(complete_no_desc(&tree, &["--introot", ""]), "1\n2\n10\n:4\n");
    assert_eq!(complete_no_desc(&tree, &["child", "-i", "1"]), "1\n10\n:4\n");
    assert_eq!(complete_no_desc(&tree, &["child", "--introot", "1", ""]), ":0\n");
}

#[test]
fn test_static_choices_without_function() {
    let tree = tree();
    assert_eq!(complete_no_desc(&tree, &["child", "--format", ""]), "json\nyaml\ntable\n:4\n");
    assert_eq!(complete_no_desc(&tree, &["child", "--format", "t"]), "table\n:4\n");
}

#[test]
fn test_flag_names() {
    let tree = tree();
    assert_eq!(
        complete_no_desc(&tree, &["child", "--f"]),
        "--filename\n--format\n--force\n:4\n"
    );
    assert_eq!(
        complete_no_desc(&tree, &["child", "--force", "--f"]),
        "--filename\n--format\n:4\n"
    );
}

#[test]
fn test_bool_flag_with_inline_value() {
    let tree = tree();
    assert_eq!(complete_no_desc(&tree, &["child", "--force="]), ":4\n");
    assert_eq!(complete_no_desc(&tree, &["child", "--nope="]), ":1\n");
}

#[test]
fn test_registration_errors() {
    let mut tree = tree();
    let child = tree.find_child(tree.root(), "child").unwrap();

    let missing = tree.register_flag_completion(child, "nope", |_: &Command, _: &[String], _: &str| {
        (Vec::new(), Directive::DEFAULT)
    });
    assert_eq!(
        missing,
        Err(RegistrationError::FlagNotFound {
            command: "root child".to_string(),
            flag: "nope".to_string(),
        })
    );

    let duplicate = tree.register_flag_completion(child, "filename", |_: &Command, _: &[String], _: &str| {
        (Vec::new(), Directive::DEFAULT)
    });
    assert!(matches!(
        duplicate,
        Err(RegistrationError::DuplicateFlagCompletion { .. })
    ));
}

#[test]
fn test_shorthand_cluster_ending_in_value_flag_descends() {
    let mut tree = CommandTree::new(
        Command::new("root")
            .persistent_flag(Flag::bool("verbose").short('v'))
            .persistent_flag(Flag::value("output").short('o')),
    );
    let child = tree.add_subcommand(tree.root(), Command::new("child")).unwrap();
    tree.register_args_completion(child, |_: &Command, _: &[String], _: &str| {
        (vec![Candidate::new("from-child")], Directive::NO_FILE_COMP)
    })
    .unwrap();

    let expected = "from-child\n:4\n";
    assert_eq!(complete_no_desc(&tree, &["-v", "-o", "json", "child", ""]), expected);
    assert_eq!(complete_no_desc(&tree, &["-vo", "json", "child", ""]), expected);
    assert_eq!(complete_no_desc(&tree, &["-vojson", "child", ""]), expected);
}

#[test]
fn test_local_flag_function_does_not_leak_to_same_named_child_flag() {
    let mut tree = CommandTree::new(Command::new("root").flag(Flag::value("output")));
    let root = tree.root();
    tree.add_subcommand(root, Command::new("child").flag(Flag::value("output")))
        .unwrap();
    tree.register_flag_completion(root, "output", |_: &Command, _: &[String], _: &str| {
        (vec![Candidate::new("root-only-value")], Directive::NO_FILE_COMP)
    })
    .unwrap();

    assert_eq!(complete_no_desc(&tree, &["--output", ""]), "root-only-value\n:4\n");
    assert_eq!(complete_no_desc(&tree, &["child", "--output", ""]), ":0\n");
}
