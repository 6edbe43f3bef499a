//! The directive line is always last and never confused with a candidate.

use proptest::prelude::*;
use tabwise::command::{Command, CommandTree};
use tabwise::completion::protocol::{encode_to_string, parse_response};
use tabwise::completion::{resolve, Candidate, Directive};

fn candidate() -> impl Strategy<Value = (String, String)> {
    ("[a-z0-9:._-]{1,8}", "[ -~]{0,12}")
}

/// Descriptions change rendering, never the values or their order
#[test]
fn test_description_mode_only_changes_rendering() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(candidate(), 0..10), 0u32..64),
            |(pairs, bits)| {
                let mut tree = CommandTree::new(Command::new("root"));
                let produced = pairs.clone();
                tree.register_args_completion(tree.root(), move |_: &Command, _: &[String], _: &str| {
                    let candidates = produced
                        .iter()
                        .map(|(v, d)| Candidate::with_description(v.as_str(), d.as_str()))
                        .collect();
                    (candidates, Directive::from_bits(bits))
                })
                .unwrap();
                let resolution = resolve(&tree, &[String::new()]);

                let with = encode_to_string(&resolution, true);
                let without = encode_to_string(&resolution, false);
                prop_assert_eq!(with.lines().count(), pairs.len() + 1);
                let expected_last = format!(":{}", bits);
                prop_assert_eq!(with.lines().last(), Some(expected_last.as_str()));

                let with = parse_response(&with);
                let without = parse_response(&without);
                prop_assert_eq!(with.directive, Directive::from_bits(bits));
                prop_assert_eq!(without.directive, Directive::from_bits(bits));
                let with_values: Vec<&str> = with.candidates.iter().map(|c| c.value.as_str()).collect();
                let without_values: Vec<&str> =
                    without.candidates.iter().map(|c| c.value.as_str()).collect();
                let source_values: Vec<&str> = pairs.iter().map(|(v, _)| v.as_str()).collect();
                prop_assert_eq!(&with_values, &source_values);
                prop_assert_eq!(&without_values, &source_values);
                prop_assert!(without.candidates.iter().all(|c| c.description.is_none()));
                Ok(())
            },
        )
        .unwrap();
}
