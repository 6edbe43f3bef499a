//! Dynamic completion: candidates, directives, the function registry, the
//! resolver and the line protocol read by the generated shell scripts.

pub mod builtin;
pub mod candidate;
pub mod directive;
pub mod protocol;
pub mod registry;
pub mod request;
pub mod resolver;

pub use builtin::{add_completion_command, COMPLETION_COMMAND, NO_DESCRIPTIONS_FLAG};
pub use candidate::{filter_by_prefix, Candidate};
pub use directive::Directive;
pub use protocol::{encode, parse_response, Response, ShellAction};
pub use registry::{Completer, CompletionRegistry};
pub use request::{serve, RequestKind, COMPLETE_NO_DESC_REQUEST, COMPLETE_REQUEST};
pub use resolver::{resolve, Resolution};

/// Environment variable naming the file the scripts append debug output to
pub const DEBUG_FILE_ENV: &str = "BASH_COMP_DEBUG_FILE";
