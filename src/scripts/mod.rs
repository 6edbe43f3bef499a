//! Shell completion script generators.
//!
//! Every script calls back into the program through a hidden completion
//! request and reads the line protocol from its stdout. Bash and zsh v1
//! additionally carry static tables derived from the command tree.

pub mod bash;
pub mod escape;
pub mod fish;
pub mod powershell;
pub mod template;
pub mod zsh;
pub mod zsh_v2;

use crate::command::CommandTree;
use clap::ValueEnum;
use std::fmt;
use std::io::{self, Write};
use tracing::debug;

pub use template::ScriptParams;

/// Supported shell dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Shell {
    Bash,
    /// Fully dynamic zsh script
    Zsh,
    /// Static `_arguments` zsh script
    #[value(name = "zsh-v1")]
    ZshV1,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

impl Shell {
    /// Name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::ZshV1 => "zsh-v1",
            Shell::Fish => "fish",
            Shell::PowerShell => "powershell",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh | Shell::ZshV1 => "zsh",
            Shell::Fish => "fish",
            Shell::PowerShell => "PowerShell",
        }
    }

    /// Whether the dialect can show candidate descriptions
    pub fn supports_descriptions(self) -> bool {
        matches!(self, Shell::Zsh | Shell::Fish | Shell::PowerShell)
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render the completion script for `shell`.
pub fn generate(tree: &CommandTree, shell: Shell, include_descriptions: bool) -> String {
    let params = ScriptParams::new(tree, shell, include_descriptions);
    debug!(
        shell = %shell,
        program = %params.program,
        request = params.request,
        "Generating completion script"
    );
    match shell {
        Shell::Bash => bash::generate(tree, &params),
        Shell::Zsh => zsh_v2::generate(&params),
        Shell::ZshV1 => zsh::generate(tree, &params),
        Shell::Fish => fish::generate(&params),
        Shell::PowerShell => powershell::generate(&params),
    }
}

pub fn write_script(
    tree: &CommandTree,
    shell: Shell,
    include_descriptions: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    out.write_all(generate(tree, shell, include_descriptions).as_bytes())?;
    out.flush()
}
