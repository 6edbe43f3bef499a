//! Command tree, positional validators, traversal and execution.

pub mod args;
pub mod execute;
pub mod node;
pub mod traverse;
pub mod tree;

pub use args::{ArgsFn, PositionalArgs};
pub use execute::Invocation;
pub use node::{Command, RunFn};
pub use traverse::{find, Found};
pub use tree::{CommandId, CommandTree};
