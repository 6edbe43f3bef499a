//! Placeholder substitution shared by the script templates.

use crate::command::CommandTree;
use crate::completion::{Directive, RequestKind};
use crate::scripts::escape;
use crate::scripts::Shell;

/// Everything a dialect template needs besides the command tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptParams {
    /// Root command name, as the shell sees it
    pub program: String,
    /// `program` reduced to a shell identifier, used to namespace functions
    pub ident: String,
    /// Hidden request the script sends
    pub request: &'static str,
    /// Environment variable naming the debug log file
    pub debug_env: String,
}

impl ScriptParams {
    pub fn new(tree: &CommandTree, shell: Shell, include_descriptions: bool) -> Self {
        let program = tree.command(tree.root()).name().to_string();
        let with_descriptions = include_descriptions && shell.supports_descriptions();
        Self {
            ident: escape::identifier(&program),
            program,
            request: RequestKind::for_descriptions(with_descriptions).name(),
            debug_env: tree.settings().debug_file_env.clone(),
        }
    }

    /// Substitute `@PROGRAM@`, `@IDENT@`, `@REQUEST@`, `@DEBUG_ENV@` and the
    /// directive bit placeholders in `template`.
    pub fn render(&self, template: &str) -> String {
        let bits = |d: Directive| d.bits().to_string();
        template
            .replace("@PROGRAM@", &self.program)
            .replace("@IDENT@", &self.ident)
            .replace("@REQUEST@", self.request)
            .replace("@DEBUG_ENV@", &self.debug_env)
            .replace("@ERROR@", &bits(Directive::ERROR))
            .replace("@NO_SPACE@", &bits(Directive::NO_SPACE))
            .replace("@NO_FILE_COMP@", &bits(Directive::NO_FILE_COMP))
            .replace("@FILTER_FILE_EXT@", &bits(Directive::FILTER_FILE_EXT))
            .replace("@FILTER_DIRS@", &bits(Directive::FILTER_DIRS))
            .replace("@KEEP_ORDER@", &bits(Directive::KEEP_ORDER))
    }
}
