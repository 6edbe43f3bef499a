//! Execution path: traversal, strict flag parsing, argument validation and
//! handler dispatch. The hidden completion requests are routed here too.

use crate::command::node::Command;
use crate::command::traverse::find;
use crate::command::tree::CommandTree;
use crate::completion::{self, RequestKind};
use crate::error::CliError;
use crate::flags::{self, FlagValues, ParseMode};
use std::io::Write;
use tracing::{debug, info};

/// What a command handler receives
pub struct Invocation<'a> {
    pub tree: &'a CommandTree,
    pub command: &'a Command,
    /// Positional arguments after flag parsing
    pub args: Vec<String>,
    pub flags: FlagValues,
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

impl CommandTree {
    /// Run the command line `args` (program name excluded).
    ///
    /// A first argument naming a hidden completion request is answered with
    /// the completion protocol instead of running a command.
    pub fn execute<S: AsRef<str>>(
        &self,
        args: &[S],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), CliError> {
        let tokens: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();

        if let Some(kind) = tokens.first().and_then(|t| RequestKind::from_name(t)) {
            completion::serve(self, &tokens[1..], kind, out, err)?;
            return Ok(());
        }

        let found = find(self, &tokens);
        let command = self.command(found.command);
        let path = self.display_path(found.command);
        debug!(command = %path, remaining = ?found.remaining, "Resolved command");

        let visible = self.visible_flags(found.command);
        let line = flags::parse(&visible, &found.remaining, ParseMode::Strict)?;
        self.validate_args(found.command, &line.positionals)?;

        let Some(handler) = command.handler() else {
            return Err(CliError::NotRunnable(path));
        };

        info!(command = %path, args = line.positionals.len(), "Running command");
        let mut invocation = Invocation {
            tree: self,
            command,
            args: line.positionals,
            flags: line.values,
            out,
            err,
        };
        handler(&mut invocation).map_err(|source| CliError::Handler {
            command: path,
            source,
        })
    }
}
