//! Tabwise: Dynamic Shell Completion for Hierarchical CLIs
//!
//! A command tree with flags and positional validators, a registry of
//! completion functions, the resolver behind the hidden `__complete`
//! request, and generators for bash, zsh, fish and PowerShell scripts that
//! call back into the program at completion time.

pub mod command;
pub mod completion;
pub mod config;
pub mod error;
pub mod flags;
pub mod logging;
pub mod scripts;

pub use command::{Command, CommandId, CommandTree, Invocation, PositionalArgs};
pub use completion::{Candidate, Directive};
pub use error::{CliError, RegistrationError};
pub use flags::Flag;
pub use scripts::Shell;
