//! The opt-in `completion <shell>` command that prints a completion script.

use crate::command::{Command, CommandId, CommandTree, PositionalArgs};
use crate::error::RegistrationError;
use crate::flags::Flag;
use crate::scripts::{self, Shell};
use clap::ValueEnum;

pub const COMPLETION_COMMAND: &str = "completion";
pub const NO_DESCRIPTIONS_FLAG: &str = "no-descriptions";

/// Add `completion` and one child per shell under the root of `tree`.
pub fn add_completion_command(tree: &mut CommandTree) -> Result<CommandId, RegistrationError> {
    let program = tree.command(tree.root()).name().to_string();
    let parent = tree.add_subcommand(
        tree.root(),
        Command::new(COMPLETION_COMMAND)
            .short("Generate the autocompletion script for the specified shell")
            .args(PositionalArgs::None),
    )?;

    for shell in Shell::value_variants().iter().copied() {
        let mut command = Command::new(shell.name())
            .short(format!(
                "Generate the autocompletion script for {} ({})",
                shell.display_name(),
                program
            ))
            .args(PositionalArgs::None)
            .run(move |inv| {
                let include = inv.tree.settings().descriptions
                    && !inv.flags.get_bool(NO_DESCRIPTIONS_FLAG);
                scripts::write_script(inv.tree, shell, include, &mut *inv.out)?;
                Ok(())
            });
        if shell.supports_descriptions() {
            command = command.flag(
                Flag::bool(NO_DESCRIPTIONS_FLAG).usage("disable completion descriptions"),
            );
        }
        tree.add_subcommand(parent, command)?;
    }

    Ok(parent)
}
