//! Flag declarations and the tokenizer used by both execution and completion.

pub mod flag;
pub mod parse;

pub use flag::{Flag, FlagKind, FlagSet};
pub use parse::{first_positional, lookup_token, parse, FlagValues, ParseMode, ParsedLine};
