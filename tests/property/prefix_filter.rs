//! Prefix filtering keeps exactly the matching candidates, in order.

use proptest::prelude::*;
use tabwise::command::{Command, CommandTree};
use tabwise::completion::{filter_by_prefix, resolve, Candidate, Directive};

fn candidate_values() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-c]{0,4}", 0..12)
}

/// Filtering is the order-preserving subsequence of prefix matches
#[test]
fn test_filter_matches_prefix_subsequence() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(candidate_values(), "[a-c]{0,2}"), |(values, prefix)| {
            let candidates: Vec<Candidate> = values.iter().map(Candidate::new).collect();
            let filtered = filter_by_prefix(candidates, &prefix);

            let expected: Vec<&String> = values.iter().filter(|v| v.starts_with(&prefix)).collect();
            let actual: Vec<&String> = filtered.iter().map(|c| &c.value).collect();
            prop_assert_eq!(actual, expected);
            Ok(())
        })
        .unwrap();
}

/// Whatever a completion function returns, the resolver only narrows it
#[test]
fn test_resolver_never_invents_or_reorders() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(candidate_values(), "[a-c]{0,2}"), |(values, prefix)| {
            let mut tree = CommandTree::new(Command::new("root"));
            let produced = values.clone();
            tree.register_args_completion(tree.root(), move |_: &Command, _: &[String], _: &str| {
                (produced.iter().map(Candidate::new).collect(), Directive::NO_SPACE)
            })
            .unwrap();

            let resolution = resolve(&tree, &[prefix.clone()]);
            let expected: Vec<&String> = values.iter().filter(|v| v.starts_with(&prefix)).collect();
            let actual: Vec<&String> = resolution.candidates.iter().map(|c| &c.value).collect();
            prop_assert_eq!(actual, expected);
            prop_assert_eq!(resolution.directive, Directive::NO_SPACE);
            Ok(())
        })
        .unwrap();
}
