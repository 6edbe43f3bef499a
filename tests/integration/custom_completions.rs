//! Command-level completion functions driven through the hidden request.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tabwise::command::{Command, CommandTree, PositionalArgs};
use tabwise::completion::{filter_by_prefix, Candidate, Directive};

use crate::integration::{complete, complete_no_desc, run};

fn children_tree() -> CommandTree {
    let mut tree = CommandTree::new(Command::new("root"));
    let root = tree.root();
    let child1 = tree
        .add_subcommand(
            root,
            Command::new("child1").alias("c1").short("First child"),
        )
        .unwrap();
    let child2 = tree
        .add_subcommand(root, Command::new("child2").short("Second child"))
        .unwrap();

    tree.register_args_completion(child1, one_two).unwrap();
    tree.register_args_completion(child2, |_: &Command, args: &[String], to_complete: &str| {
        if !args.is_empty() {
            return (Vec::new(), Directive::NO_FILE_COMP);
        }
        let all = vec![
            Candidate::with_description("three", "The third"),
            Candidate::with_description("four", "The fourth"),
        ];
        (filter_by_prefix(all, to_complete), Directive::DEFAULT)
    })
    .unwrap();
    tree
}

#[test]
fn test_child_functions_without_descriptions() {
    let tree = children_tree();
    assert_eq!(complete_no_desc(&tree, &["child1", ""]), "one\ntwo\n:0\n");
    assert_eq!(complete_no_desc(&tree, &["child1", "t"]), "two\n:0\n");
    assert_eq!(complete_no_desc(&tree, &["child1", "unexpectedArg", "t"]), ":4\n");
    assert_eq!(complete_no_desc(&tree, &["child2", ""]), "three\nfour\n:0\n");
    assert_eq!(complete_no_desc(&tree, &["child2", "t"]), "three\n:0\n");
}

#[test]
fn test_child_functions_with_descriptions() {
    let tree = children_tree();
    assert_eq!(
        complete(&tree, &["child1", ""]),
        "one\tThe first\ntwo\tThe second\n:0\n"
    );
    assert_eq!(complete(&tree, &["child1", "t"]), "two\tThe second\n:0\n");
    assert_eq!(complete(&tree, &["child1", "unexpectedArg", "t"]), ":4\n");
    assert_eq!(
        complete(&tree, &["child2", "f"]),
        "four\tThe fourth\n:0\n"
    );
}

#[test]
fn test_descriptions_change_rendering_only() {
    let tree = children_tree();
    let with: Vec<String> = complete(&tree, &["child2", ""])
        .lines()
        .map(|l| l.split('\t').next().unwrap().to_string())
        .collect();
    let without: Vec<String> = complete_no_desc(&tree, &["child2", ""])
        .lines()
        .map(String::from)
        .collect();
    assert_eq!(with, without);
}

#[test]
fn test_subcommands_offered_at_root() {
    let tree = children_tree();
    assert_eq!(
        complete(&tree, &[""]),
        "child1\tFirst child\nchild2\tSecond child\n:4\n"
    );
    assert_eq!(complete_no_desc(&tree, &["c"]), "child1\nchild2\n:4\n");
}

#[test]
fn test_root_with_children_rejects_positionals() {
    let tree = children_tree();
    assert_eq!(complete_no_desc(&tree, &["unexpectedArg", "t"]), ":4\n");
}

#[test]
fn test_alias_invokes_same_function() {
    let tree = children_tree();
    assert_eq!(
        complete(&tree, &["c1", ""]),
        complete(&tree, &["child1", ""])
    );
    assert_eq!(complete_no_desc(&tree, &["c1", "o"]), "one\n:0\n");
}

#[test]
fn test_sibling_function_does_not_fire() {
    let child1_calls = Arc::new(AtomicUsize::new(0));
    let child2_calls = Arc::new(AtomicUsize::new(0));

    let mut tree = CommandTree::new(Command::new("root"));
    let root = tree.root();
    let child1 = tree.add_subcommand(root, Command::new("child1")).unwrap();
    let child2 = tree.add_subcommand(root, Command::new("child2")).unwrap();

    let counter = Arc::clone(&child1_calls);
    tree.register_args_completion(child1, move |_: &Command, _: &[String], _: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
        (vec![Candidate::new("from-child1")], Directive::DEFAULT)
    })
    .unwrap();
    let counter = Arc::clone(&child2_calls);
    tree.register_args_completion(child2, move |_: &Command, _: &[String], _: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
        (vec![Candidate::new("from-child2")], Directive::DEFAULT)
    })
    .unwrap();

    assert_eq!(complete_no_desc(&tree, &["child2", ""]), "from-child2\n:0\n");
    assert_eq!(child1_calls.load(Ordering::SeqCst), 0);
    assert_eq!(child2_calls.load(Ordering::SeqCst), 1);
}

/// The args function used by both single-command and child scenarios
fn one_two(_: &Command, args: &[String], to_complete: &str) -> (Vec<Candidate>, Directive) {
    if !args.is_empty() {
        return (Vec::new(), Directive::NO_FILE_COMP);
    }
    let all = vec![
        Candidate::with_description("one", "The first"),
        Candidate::with_description("two", "The second"),
    ];
    (filter_by_prefix(all, to_complete), Directive::DEFAULT)
}

#[test]
fn test_single_root_with_minimum_args() {
    let mut tree = CommandTree::new(Command::new("root").args(PositionalArgs::Minimum(1)));
    tree.register_args_completion(tree.root(), one_two).unwrap();

    assert_eq!(complete_no_desc(&tree, &[""]), "one\ntwo\n:0\n");
    assert_eq!(complete_no_desc(&tree, &["t"]), "two\n:0\n");
    assert_eq!(complete_no_desc(&tree, &["unexpectedArg", "t"]), ":4\n");
}

#[test]
fn test_arity_exhausted_yields_no_file_comp() {
    let mut tree = CommandTree::new(Command::new("root"));
    let root = tree.root();
    let leaf = tree
        .add_subcommand(root, Command::new("leaf").args(PositionalArgs::Maximum(1)))
        .unwrap();
    tree.register_args_completion(leaf, |_: &Command, _: &[String], _: &str| {
        (vec![Candidate::new("value")], Directive::DEFAULT)
    })
    .unwrap();

    assert_eq!(complete_no_desc(&tree, &["leaf", ""]), "value\n:0\n");
    assert_eq!(complete_no_desc(&tree, &["leaf", "value", ""]), ":4\n");
}

#[test]
fn test_keep_order_is_passed_through_unsorted() {
    let mut tree = CommandTree::new(Command::new("root"));
    let root = tree.root();
    tree.register_args_completion(root, |_: &Command, _: &[String], _: &str| {
        (
            vec![Candidate::new("zeta"), Candidate::new("alpha"), Candidate::new("mid")],
            Directive::KEEP_ORDER | Directive::NO_FILE_COMP,
        )
    })
    .unwrap();
    assert_eq!(complete_no_desc(&tree, &[""]), "zeta\nalpha\nmid\n:36\n");
}

#[test]
fn test_unregistered_leaf_defers_to_files() {
    let mut tree = CommandTree::new(Command::new("root"));
    tree.add_subcommand(tree.root(), Command::new("open")).unwrap();
    assert_eq!(complete_no_desc(&tree, &["open", "REA"]), ":0\n");
}

#[test]
fn test_trailer_goes_to_stderr() {
    let tree = children_tree();
    let captured = run(&tree, &["__complete", "child1", ""]);
    assert!(!captured.stdout.contains("Completion ended"));
    assert_eq!(captured.stderr, "Completion ended with directive: Default\n");
}
