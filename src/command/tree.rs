//! Arena of commands addressed by [`CommandId`].
//!
//! The tree owns every command, the completion registry and the completion
//! settings. It is built once at startup and then only read.

use crate::command::args::PositionalArgs;
use crate::command::node::Command;
use crate::completion::registry::{Completer, CompletionRegistry};
use crate::completion::{Candidate, Directive};
use crate::config::CompletionSettings;
use crate::error::{ArgsError, RegistrationError};
use crate::flags::Flag;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Index of a command inside its [`CommandTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommandId(usize);

impl CommandId {
    pub(crate) const ROOT: CommandId = CommandId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct CommandTree {
    nodes: Vec<Command>,
    registry: CompletionRegistry,
    settings: CompletionSettings,
}

impl CommandTree {
    pub fn new(mut root: Command) -> Self {
        root.id = CommandId::ROOT;
        root.parent = None;
        root.children.clear();
        Self {
            nodes: vec![root],
            registry: CompletionRegistry::default(),
            settings: CompletionSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: CompletionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    pub fn root(&self) -> CommandId {
        CommandId::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn check(&self, id: CommandId) -> Result<(), RegistrationError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(RegistrationError::UnknownCommand(id.0))
        }
    }

    /// Attach `command` under `parent` and return its id.
    pub fn add_subcommand(
        &mut self,
        parent: CommandId,
        mut command: Command,
    ) -> Result<CommandId, RegistrationError> {
        self.check(parent)?;
        let id = CommandId(self.nodes.len());
        command.id = id;
        command.parent = Some(parent);
        command.children.clear();
        self.nodes.push(command);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// The command with this id.
    ///
    /// # Panics
    ///
    /// Ids are minted by this tree only; an id from another tree may be out of range.
    pub fn command(&self, id: CommandId) -> &Command {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: CommandId) -> Option<&Command> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: CommandId) -> impl Iterator<Item = &Command> {
        self.command(id)
            .children()
            .iter()
            .map(move |child| self.command(*child))
    }

    /// Child of `id` whose name or alias equals `token`
    pub fn find_child(&self, id: CommandId, token: &str) -> Option<CommandId> {
        self.children(id).find(|c| c.answers_to(token)).map(Command::id)
    }

    /// `id` followed by its ancestors up to the root
    pub fn ancestry(&self, id: CommandId) -> Vec<CommandId> {
        let mut chain = vec![id];
        let mut current = self.command(id).parent();
        while let Some(parent) = current {
            chain.push(parent);
            current = self.command(parent).parent();
        }
        chain
    }

    /// Names from the root down to `id`
    pub fn path(&self, id: CommandId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .ancestry(id)
            .into_iter()
            .map(|a| self.command(a).name())
            .collect();
        names.reverse();
        names
    }

    /// Space-separated command path, e.g. `tool config get`
    pub fn display_path(&self, id: CommandId) -> String {
        self.path(id).join(" ")
    }

    /// Every command id in depth-first pre-order
    pub fn walk(&self) -> Vec<CommandId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![CommandId::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.command(id).children().iter().rev().copied());
        }
        order
    }

    /// Flags usable on `id`: its local and persistent flags, then persistent
    /// flags of its ancestors, nearest first. A name declared closer shadows
    /// the same name further up.
    pub fn visible_flags(&self, id: CommandId) -> Vec<&Flag> {
        let declared = self.command(id).local_flags().iter().chain(
            self.ancestry(id)
                .into_iter()
                .flat_map(|a| self.command(a).persistent_flags().iter()),
        );
        let mut flags: Vec<&Flag> = Vec::new();
        for flag in declared {
            if !flags.iter().any(|f| f.name == flag.name) {
                flags.push(flag);
            }
        }
        flags
    }

    /// Flags of `id` that come from an ancestor's persistent set
    pub fn inherited_flags(&self, id: CommandId) -> Vec<&Flag> {
        let cmd = self.command(id);
        self.visible_flags(id)
            .into_iter()
            .filter(|f| cmd.declared_flag(&f.name).is_none())
            .collect()
    }

    /// Validate positional args for execution.
    ///
    /// Without an explicit validator, a root command with children rejects
    /// any positional argument and every other command accepts anything.
    pub fn validate_args(&self, id: CommandId, args: &[String]) -> Result<(), ArgsError> {
        let cmd = self.command(id);
        match cmd.positional_args() {
            Some(validator) => validator.validate(cmd, args),
            None => self.legacy_args(cmd, args.first().map(String::as_str)),
        }
    }

    /// Validate `consumed` plus the in-progress token for completion.
    pub(crate) fn validate_completion_args(
        &self,
        id: CommandId,
        consumed: &[String],
        partial: &str,
    ) -> Result<(), ArgsError> {
        let cmd = self.command(id);
        match cmd.positional_args() {
            Some(validator) => validator.validate_completion(cmd, consumed, partial),
            None => {
                let first = consumed.first().map(String::as_str).unwrap_or(partial);
                self.legacy_args(cmd, Some(first))
            }
        }
    }

    fn legacy_args(&self, cmd: &Command, first: Option<&str>) -> Result<(), ArgsError> {
        match first {
            Some(arg) if cmd.parent().is_none() && cmd.has_children() => {
                Err(ArgsError::UnknownCommand {
                    command: cmd.name().to_string(),
                    arg: arg.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Whether the command accepts at least one positional argument
    pub fn accepts_args(&self, id: CommandId) -> bool {
        let cmd = self.command(id);
        match cmd.positional_args() {
            Some(PositionalArgs::None) => false,
            Some(PositionalArgs::Maximum(0)) | Some(PositionalArgs::Exact(0)) => false,
            Some(PositionalArgs::ExactValid(0)) | Some(PositionalArgs::Range(_, 0)) => false,
            Some(_) => true,
            None => !(cmd.parent().is_none() && cmd.has_children()),
        }
    }

    /// Register the positional-argument completion function of `id`.
    ///
    /// A later registration for the same command replaces the earlier one.
    pub fn register_args_completion<F>(
        &mut self,
        id: CommandId,
        completer: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&Command, &[String], &str) -> (Vec<Candidate>, Directive) + Send + Sync + 'static,
    {
        self.register_args_completer(id, Arc::new(completer))
    }

    pub fn register_args_completer(
        &mut self,
        id: CommandId,
        completer: Arc<dyn Completer>,
    ) -> Result<(), RegistrationError> {
        self.check(id)?;
        if self.registry.set_args(id, completer) {
            debug!(command = %self.display_path(id), "Replaced args completion function");
        }
        Ok(())
    }

    /// Register the value completion function of flag `flag` on `id`.
    ///
    /// The flag must be visible on the command, and may only be registered once.
    pub fn register_flag_completion<F>(
        &mut self,
        id: CommandId,
        flag: &str,
        completer: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&Command, &[String], &str) -> (Vec<Candidate>, Directive) + Send + Sync + 'static,
    {
        self.register_flag_completer(id, flag, Arc::new(completer))
    }

    pub fn register_flag_completer(
        &mut self,
        id: CommandId,
        flag: &str,
        completer: Arc<dyn Completer>,
    ) -> Result<(), RegistrationError> {
        self.check(id)?;
        if !self.visible_flags(id).iter().any(|f| f.name == flag) {
            return Err(RegistrationError::FlagNotFound {
                command: self.display_path(id),
                flag: flag.to_string(),
            });
        }
        if self.registry.flag_completer(id, flag).is_some() {
            return Err(RegistrationError::DuplicateFlagCompletion {
                command: self.display_path(id),
                flag: flag.to_string(),
            });
        }
        self.registry.insert_flag(id, flag, completer);
        Ok(())
    }

    pub fn registry(&self) -> &CompletionRegistry {
        &self.registry
    }

    /// Completion function for `flag` as seen from `id`.
    ///
    /// A registration on an ancestor applies to descendants that inherit the
    /// flag, unless the descendant registered its own. Registrations for a
    /// different flag sharing the name (an ancestor's local flag, or one
    /// shadowed closer to `id`) never apply.
    pub fn flag_completer(&self, id: CommandId, flag: &str) -> Option<&Arc<dyn Completer>> {
        let seen = self.visible_flags(id).into_iter().find(|f| f.name == flag)?;
        self.ancestry(id)
            .into_iter()
            .filter(|&a| {
                self.visible_flags(a)
                    .into_iter()
                    .any(|f| std::ptr::eq(f, seen))
            })
            .find_map(|a| self.registry.flag_completer(a, flag))
    }

    /// Whether `flag` on `id` resolves to a registered completion function
    pub fn has_flag_completer(&self, id: CommandId, flag: &str) -> bool {
        self.flag_completer(id, flag).is_some()
    }

    /// Whether any command or flag in the tree has a completion function
    pub fn has_custom_completions(&self) -> bool {
        !self.registry.is_empty()
    }
}
