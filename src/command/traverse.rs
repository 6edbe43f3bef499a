//! Command lookup shared by execution and completion.

use crate::command::tree::{CommandId, CommandTree};
use crate::flags::first_positional;

/// Where a token walk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    pub command: CommandId,
    /// Tokens not consumed as command names, in their original order
    pub remaining: Vec<String>,
}

/// Walk `tokens` down the tree from the root.
///
/// At each level the first token that is neither a flag nor a flag value is
/// matched against the current command's children by name or alias. The walk
/// stops at the first token that matches no child.
pub fn find(tree: &CommandTree, tokens: &[String]) -> Found {
    let mut current = tree.root();
    let mut remaining = tokens.to_vec();

    loop {
        let flags = tree.visible_flags(current);
        let Some(index) = first_positional(&flags, &remaining) else {
            break;
        };
        let Some(child) = tree.find_child(current, &remaining[index]) else {
            break;
        };
        remaining.remove(index);
        current = child;
    }

    Found {
        command: current,
        remaining,
    }
}
