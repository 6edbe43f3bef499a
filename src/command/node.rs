//! Command node declarations.

use crate::command::args::PositionalArgs;
use crate::command::execute::Invocation;
use crate::command::tree::CommandId;
use crate::completion::Candidate;
use crate::flags::{Flag, FlagSet};
use std::fmt;
use std::sync::Arc;

/// Handler run when a command is executed
pub type RunFn = Arc<dyn Fn(&mut Invocation<'_>) -> anyhow::Result<()> + Send + Sync>;

/// A command in the tree.
///
/// Built with the chained setters below, then handed to
/// [`CommandTree::new`](crate::command::CommandTree::new) or
/// [`CommandTree::add_subcommand`](crate::command::CommandTree::add_subcommand),
/// which assign its id and parent link.
#[derive(Clone)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    short: String,
    hidden: bool,
    flags: FlagSet,
    persistent_flags: FlagSet,
    args: Option<PositionalArgs>,
    valid_args: Vec<Candidate>,
    run: Option<RunFn>,
    pub(crate) id: CommandId,
    pub(crate) parent: Option<CommandId>,
    pub(crate) children: Vec<CommandId>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            short: String::new(),
            hidden: false,
            flags: FlagSet::new(),
            persistent_flags: FlagSet::new(),
            args: None,
            valid_args: Vec::new(),
            run: None,
            id: CommandId::ROOT,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// One-line summary, used as the description of the command's completion candidate
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = short.into();
        self
    }

    /// Hidden commands still execute but are never offered as candidates
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Declare a flag visible on this command only
    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.add(flag);
        self
    }

    /// Declare a flag visible on this command and every descendant
    pub fn persistent_flag(mut self, flag: Flag) -> Self {
        self.persistent_flags.add(flag);
        self
    }

    pub fn args(mut self, args: PositionalArgs) -> Self {
        self.args = Some(args);
        self
    }

    /// Statically enumerated first positional argument values.
    ///
    /// Accepts plain values or `value<TAB>description` strings.
    pub fn valid_args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Candidate>,
    {
        self.valid_args = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn run<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.run = Some(Arc::new(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn summary(&self) -> &str {
        &self.short
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn local_flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn persistent_flags(&self) -> &FlagSet {
        &self.persistent_flags
    }

    pub fn positional_args(&self) -> Option<&PositionalArgs> {
        self.args.as_ref()
    }

    pub fn valid_arg_candidates(&self) -> &[Candidate] {
        &self.valid_args
    }

    pub(crate) fn handler(&self) -> Option<&RunFn> {
        self.run.as_ref()
    }

    pub fn is_runnable(&self) -> bool {
        self.run.is_some()
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    pub fn children(&self) -> &[CommandId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether `token` is this command's name or one of its aliases
    pub fn answers_to(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|a| a == token)
    }

    /// Declared flag (local or own persistent) by long name
    pub fn declared_flag(&self, name: &str) -> Option<&Flag> {
        self.flags
            .lookup(name)
            .or_else(|| self.persistent_flags.lookup(name))
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("hidden", &self.hidden)
            .field("flags", &self.flags)
            .field("persistent_flags", &self.persistent_flags)
            .field("args", &self.args)
            .field("valid_args", &self.valid_args)
            .field("runnable", &self.run.is_some())
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish()
    }
}
