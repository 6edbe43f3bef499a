//! Turns a partial command line into ordered candidates plus a directive.

use crate::command::{find, Command, CommandId, CommandTree};
use crate::completion::candidate::{filter_by_prefix, Candidate};
use crate::completion::directive::Directive;
use crate::completion::registry::Completer;
use crate::flags::{self, Flag, FlagValues, ParseMode};
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, trace};

/// Outcome of one completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub candidates: Vec<Candidate>,
    pub directive: Directive,
    /// Command the in-progress token was resolved against
    pub target: CommandId,
}

impl Resolution {
    fn new(target: CommandId, candidates: Vec<Candidate>, directive: Directive) -> Self {
        Self {
            candidates,
            directive,
            target,
        }
    }

    fn empty(target: CommandId, directive: Directive) -> Self {
        Self::new(target, Vec::new(), directive)
    }
}

/// Resolve the completions for `tokens`, the words after the hidden request name.
///
/// The last token is the text under the cursor, possibly empty. Never fails:
/// problems surface as an empty candidate list with an `Error` or
/// `NoFileComp` directive.
pub fn resolve(tree: &CommandTree, tokens: &[String]) -> Resolution {
    let (to_complete, preceding) = match tokens.split_last() {
        Some((last, rest)) => (last.as_str(), rest),
        None => ("", tokens),
    };

    let found = find(tree, preceding);
    let target = found.command;
    let visible = tree.visible_flags(target);
    let line = flags::parse(&visible, &found.remaining, ParseMode::Lenient).unwrap_or_default();
    let flags_done = found.remaining.iter().any(|t| t == "--");

    trace!(
        command = %tree.display_path(target),
        args = ?line.positionals,
        to_complete,
        "Resolving completion"
    );

    if !flags_done {
        if let Some(name) = &line.pending {
            if let Some(flag) = visible.iter().copied().find(|f| &f.name == name) {
                debug!(flag = %flag.name, "Completing flag value");
                return complete_flag_value(tree, target, flag, &line.positionals, to_complete);
            }
        }

        if let Some((flag_token, partial)) = split_inline_value(to_complete) {
            return match flags::lookup_token(&visible, flag_token) {
                Some(flag) if flag.takes_value() => {
                    debug!(flag = %flag.name, "Completing inline flag value");
                    complete_flag_value(tree, target, flag, &line.positionals, partial)
                }
                Some(_) => Resolution::empty(target, Directive::NO_FILE_COMP),
                None => {
                    debug!(flag = flag_token, "Unknown flag in completion request");
                    Resolution::empty(target, Directive::ERROR)
                }
            };
        }

        if to_complete.starts_with('-') {
            let candidates = flag_name_candidates(&visible, &line.values, to_complete);
            return Resolution::new(target, candidates, Directive::NO_FILE_COMP);
        }
    }

    if line.positionals.is_empty() && !flags_done {
        let candidates = subcommand_candidates(tree, target, to_complete);
        if !candidates.is_empty() {
            let directive = if tree
                .validate_completion_args(target, &[], to_complete)
                .is_ok()
            {
                Directive::DEFAULT
            } else {
                Directive::NO_FILE_COMP
            };
            return Resolution::new(target, candidates, directive);
        }
    }

    complete_positional(tree, target, &line.positionals, to_complete)
}

/// `--name=partial` or `-n=partial`
fn split_inline_value(token: &str) -> Option<(&str, &str)> {
    if !token.starts_with('-') {
        return None;
    }
    token.split_once('=')
}

fn complete_flag_value(
    tree: &CommandTree,
    target: CommandId,
    flag: &Flag,
    args: &[String],
    to_complete: &str,
) -> Resolution {
    if let Some(completer) = tree.flag_completer(target, &flag.name) {
        let (candidates, directive) =
            invoke(tree, completer.as_ref(), tree.command(target), args, to_complete);
        return Resolution::new(
            target,
            filter_results(candidates, directive, to_complete),
            directive,
        );
    }
    if !flag.choices.is_empty() {
        let choices = flag.choices.iter().map(Candidate::new).collect();
        return Resolution::new(
            target,
            filter_by_prefix(choices, to_complete),
            Directive::NO_FILE_COMP,
        );
    }
    Resolution::empty(target, Directive::DEFAULT)
}

fn flag_name_candidates(visible: &[&Flag], used: &FlagValues, to_complete: &str) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for flag in visible {
        if flag.hidden || (used.is_set(&flag.name) && !flag.repeatable()) {
            continue;
        }
        candidates.push(Candidate::with_description(
            format!("--{}", flag.name),
            flag.usage.as_str(),
        ));
        if let Some(short) = flag.shorthand {
            candidates.push(Candidate::with_description(
                format!("-{}", short),
                flag.usage.as_str(),
            ));
        }
    }
    filter_by_prefix(candidates, to_complete)
}

fn subcommand_candidates(tree: &CommandTree, target: CommandId, to_complete: &str) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for child in tree.children(target) {
        if child.is_hidden() {
            continue;
        }
        if child.name().starts_with(to_complete) {
            candidates.push(Candidate::with_description(child.name(), child.summary()));
        } else if !to_complete.is_empty() {
            if let Some(alias) = child.aliases().iter().find(|a| a.starts_with(to_complete)) {
                candidates.push(Candidate::with_description(alias.as_str(), child.summary()));
            }
        }
    }
    candidates
}

fn complete_positional(
    tree: &CommandTree,
    target: CommandId,
    args: &[String],
    to_complete: &str,
) -> Resolution {
    let command = tree.command(target);

    if let Err(err) = tree.validate_completion_args(target, args, to_complete) {
        debug!(command = %command.name(), error = %err, "No further positional arguments accepted");
        return Resolution::empty(target, Directive::NO_FILE_COMP);
    }

    if let Some(completer) = tree.registry().args_completer(target) {
        let (candidates, directive) = invoke(tree, completer.as_ref(), command, args, to_complete);
        return Resolution::new(
            target,
            filter_results(candidates, directive, to_complete),
            directive,
        );
    }

    let valid = command.valid_arg_candidates();
    if !valid.is_empty() {
        let candidates = if args.is_empty() {
            filter_by_prefix(valid.to_vec(), to_complete)
        } else {
            Vec::new()
        };
        return Resolution::new(target, candidates, Directive::NO_FILE_COMP);
    }

    Resolution::empty(target, Directive::DEFAULT)
}

/// Extension and directory filters are not prefixes of the typed text
fn filter_results(candidates: Vec<Candidate>, directive: Directive, to_complete: &str) -> Vec<Candidate> {
    if directive.contains(Directive::FILTER_FILE_EXT) || directive.contains(Directive::FILTER_DIRS) {
        candidates
    } else {
        filter_by_prefix(candidates, to_complete)
    }
}

fn invoke(
    tree: &CommandTree,
    completer: &dyn Completer,
    command: &Command,
    args: &[String],
    to_complete: &str,
) -> (Vec<Candidate>, Directive) {
    if !tree.settings().contain_panics {
        return completer.complete(command, args, to_complete);
    }
    match panic::catch_unwind(AssertUnwindSafe(|| completer.complete(command, args, to_complete))) {
        Ok(result) => result,
        Err(payload) => {
            error!(
                command = %command.name(),
                panic = %panic_message(payload.as_ref()),
                "Completion function panicked"
            );
            (Vec::new(), Directive::ERROR)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
