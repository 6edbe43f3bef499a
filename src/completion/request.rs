//! Serving the hidden completion requests.

use crate::command::CommandTree;
use crate::completion::protocol;
use crate::completion::resolver::resolve;
use std::io::{self, Write};
use tracing::{debug, enabled, trace, Level};

/// Hidden subcommand asking for candidates with descriptions
pub const COMPLETE_REQUEST: &str = "__complete";
/// Hidden subcommand asking for bare candidates
pub const COMPLETE_NO_DESC_REQUEST: &str = "__completeNoDesc";

/// Which hidden request was made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    WithDescriptions,
    NoDescriptions,
}

impl RequestKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            COMPLETE_REQUEST => Some(RequestKind::WithDescriptions),
            COMPLETE_NO_DESC_REQUEST => Some(RequestKind::NoDescriptions),
            _ => None,
        }
    }

    pub fn for_descriptions(include: bool) -> Self {
        if include {
            RequestKind::WithDescriptions
        } else {
            RequestKind::NoDescriptions
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RequestKind::WithDescriptions => COMPLETE_REQUEST,
            RequestKind::NoDescriptions => COMPLETE_NO_DESC_REQUEST,
        }
    }

    pub fn include_descriptions(self) -> bool {
        self == RequestKind::WithDescriptions
    }
}

/// Resolve `tokens`, write the protocol to `out` and the trailer to `err`.
pub fn serve(
    tree: &CommandTree,
    tokens: &[String],
    kind: RequestKind,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<()> {
    let resolution = resolve(tree, tokens);
    debug!(
        command = %tree.display_path(resolution.target),
        candidates = resolution.candidates.len(),
        directive = %resolution.directive,
        "Completion resolved"
    );
    if enabled!(Level::TRACE) {
        if let Ok(json) = serde_json::to_string(&resolution) {
            trace!(resolution = %json, "Resolution detail");
        }
    }
    protocol::encode(out, &resolution, kind.include_descriptions())?;
    writeln!(err, "{}", protocol::trailer(resolution.directive))?;
    out.flush()
}
