//! Completion function registry.

use crate::command::{Command, CommandId};
use crate::completion::{Candidate, Directive};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Supplies completions for a command's positional arguments or a flag's value.
///
/// Receives the target command, the positional arguments already typed and
/// the in-progress token. Implemented for every matching closure.
pub trait Completer: Send + Sync {
    fn complete(
        &self,
        command: &Command,
        args: &[String],
        to_complete: &str,
    ) -> (Vec<Candidate>, Directive);
}

impl<F> Completer for F
where
    F: Fn(&Command, &[String], &str) -> (Vec<Candidate>, Directive) + Send + Sync,
{
    fn complete(
        &self,
        command: &Command,
        args: &[String],
        to_complete: &str,
    ) -> (Vec<Candidate>, Directive) {
        self(command, args, to_complete)
    }
}

/// Registered completion functions, keyed by command and by (command, flag).
#[derive(Clone, Default)]
pub struct CompletionRegistry {
    args: HashMap<CommandId, Arc<dyn Completer>>,
    flags: HashMap<(CommandId, String), Arc<dyn Completer>>,
}

impl CompletionRegistry {
    /// Returns true when an earlier registration was replaced
    pub(crate) fn set_args(&mut self, id: CommandId, completer: Arc<dyn Completer>) -> bool {
        self.args.insert(id, completer).is_some()
    }

    pub(crate) fn insert_flag(&mut self, id: CommandId, flag: &str, completer: Arc<dyn Completer>) {
        self.flags.insert((id, flag.to_string()), completer);
    }

    pub fn args_completer(&self, id: CommandId) -> Option<&Arc<dyn Completer>> {
        self.args.get(&id)
    }

    /// Completer registered for `flag` directly on `id`
    pub fn flag_completer(&self, id: CommandId, flag: &str) -> Option<&Arc<dyn Completer>> {
        self.flags.get(&(id, flag.to_string()))
    }

    pub fn has_args_completer(&self, id: CommandId) -> bool {
        self.args.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.flags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.args.len() + self.flags.len()
    }
}

impl fmt::Debug for CompletionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut args: Vec<_> = self.args.keys().collect();
        args.sort();
        let mut flags: Vec<_> = self.flags.keys().collect();
        flags.sort();
        f.debug_struct("CompletionRegistry")
            .field("args", &args)
            .field("flags", &flags)
            .finish()
    }
}
