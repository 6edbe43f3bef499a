//! zsh v1: static `_arguments` functions generated from the command tree.
//!
//! Commands or flags with a registered completion function defer to a
//! dynamic helper. The helper is only emitted when the tree has at least one
//! registration.

use crate::command::{CommandId, CommandTree};
use crate::flags::Flag;
use crate::scripts::escape::{single_quote, zsh_action_word, zsh_bracket, zsh_describe_entry};
use crate::scripts::template::ScriptParams;

const HEADER: &str = r##"#compdef @PROGRAM@
# zsh completion for @PROGRAM@ (static command tree)        -*- shell-script -*-

__@IDENT@_debug()
{
    local file="$@DEBUG_ENV@"
    if [[ -n ${file} ]]; then
        echo "$*" >> "${file}"
    fi
}
"##;

const DYNAMIC: &str = r##"
# Ask the program for candidates of the word under the cursor
__@IDENT@_dynamic()
{
    local requestComp out directive lastLine suffix
    local -a cmdline candidates
    cmdline=("${(@)__@IDENT@_words[1,__@IDENT@_current]}")

    requestComp="${cmdline[1]} @REQUEST@ ${cmdline[2,-1]}"
    if [ -z "${cmdline[-1]}" ]; then
        requestComp="${requestComp} \"\""
    fi

    __@IDENT@_debug "About to call: eval ${requestComp}"
    out=$(eval ${requestComp} 2>/dev/null)

    lastLine=${out##*$'\n'}
    if [ "${lastLine[1]}" = : ]; then
        directive=${lastLine[2,-1]}
        (( suffix=${#lastLine}+2 ))
        out=${out[1,-$suffix]}
    else
        directive=0
    fi
    __@IDENT@_debug "directive: ${directive}, completions: ${out}"

    if (( directive & @ERROR@ )); then
        return 1
    fi

    candidates=(${(f)out})
    candidates=(${candidates%%$'\t'*})
    if (( ${#candidates} == 0 )); then
        if (( directive & @NO_FILE_COMP@ )); then
            return 1
        fi
        _files
        return
    fi
    if (( ${#candidates} == 1 )) && (( directive & @NO_SPACE@ )); then
        compadd -S '' -- "${candidates[@]}"
    else
        compadd -- "${candidates[@]}"
    fi
}
"##;

const FOOTER: &str = r##"
function _@IDENT@ {
  typeset -ga __@IDENT@_words
  __@IDENT@_words=("${words[@]}")
  typeset -g __@IDENT@_current=$CURRENT
  @ROOT_FN@ "$@"
}

if [ "$funcstack[1]" = "_@IDENT@" ]; then
    _@IDENT@ "$@"
else
    compdef _@IDENT@ @PROGRAM@
fi
"##;

fn function_name(params: &ScriptParams, id: CommandId) -> String {
    format!("_{}_cmd_{}", params.ident, id)
}

fn dynamic_helper(params: &ScriptParams) -> String {
    format!("__{}_dynamic", params.ident)
}

/// `_arguments` specs for one flag
fn flag_spec(flag: &Flag, action: Option<String>) -> String {
    let long = if flag.takes_value() {
        format!("--{}=", flag.name)
    } else {
        format!("--{}", flag.name)
    };
    let mut tail = format!("[{}]", zsh_bracket(&flag.usage));
    if let Some(action) = action {
        tail.push_str(&format!(":{}:{}", flag.name, action));
    }
    let tail = single_quote(&tail);

    match flag.shorthand {
        Some(c) => {
            let short = if flag.takes_value() {
                format!("-{}+", c)
            } else {
                format!("-{}", c)
            };
            let guard = if flag.repeatable() {
                single_quote("*")
            } else {
                single_quote(&format!("(-{} --{})", c, flag.name))
            };
            format!("{}{{{},{}}}{}", guard, short, long, tail)
        }
        None if flag.repeatable() => format!("{}{}", single_quote(&format!("*{}", long)), tail),
        None => format!("{}{}", single_quote(&long), tail),
    }
}

fn flag_action(tree: &CommandTree, id: CommandId, flag: &Flag, params: &ScriptParams) -> Option<String> {
    if !flag.takes_value() {
        return None;
    }
    if tree.has_flag_completer(id, &flag.name) {
        return Some(dynamic_helper(params));
    }
    if !flag.choices.is_empty() {
        let words: Vec<String> = flag.choices.iter().map(|c| zsh_action_word(c)).collect();
        return Some(format!("({})", words.join(" ")));
    }
    Some("_files".to_string())
}

/// Positional spec for a command without children
fn positional_spec(tree: &CommandTree, id: CommandId, params: &ScriptParams) -> Option<String> {
    if !tree.accepts_args(id) {
        return None;
    }
    if tree.registry().has_args_completer(id) {
        return Some(single_quote(&format!("*: :{}", dynamic_helper(params))));
    }
    let valid = tree.command(id).valid_arg_candidates();
    if !valid.is_empty() {
        let words: Vec<String> = valid.iter().map(|c| zsh_action_word(&c.value)).collect();
        return Some(single_quote(&format!("1: :({})", words.join(" "))));
    }
    Some(single_quote("*: :_files"))
}

fn command_function(tree: &CommandTree, id: CommandId, params: &ScriptParams) -> String {
    let command = tree.command(id);
    let mut specs: Vec<String> = tree
        .visible_flags(id)
        .into_iter()
        .filter(|f| !f.hidden)
        .map(|f| flag_spec(f, flag_action(tree, id, f, params)))
        .collect();

    let mut out = vec![
        format!("# {}", tree.display_path(id)),
        format!("function {} {{", function_name(params, id)),
    ];

    if !command.has_children() {
        specs.extend(positional_spec(tree, id, params));
        if specs.is_empty() {
            out.push("  return 1".to_string());
        } else {
            out.push("  _arguments \\".to_string());
            out.push(format!("    {}", specs.join(" \\\n    ")));
        }
        out.push("}".to_string());
        return out.join("\n");
    }

    specs.push("\"1: :->cmnds\"".to_string());
    specs.push("\"*::arg:->args\"".to_string());
    out.push("  local -a commands".to_string());
    out.push(String::new());
    out.push("  _arguments -C \\".to_string());
    out.push(format!("    {}", specs.join(" \\\n    ")));
    out.push(String::new());
    out.push("  case $state in".to_string());
    out.push("  cmnds)".to_string());
    out.push("    commands=(".to_string());
    for child in tree.children(id).filter(|c| !c.is_hidden()) {
        out.push(format!(
            "      {}",
            single_quote(&zsh_describe_entry(child.name(), child.summary()))
        ));
    }
    out.push("    )".to_string());
    out.push("    _describe \"command\" commands".to_string());
    if tree.registry().has_args_completer(id) {
        out.push(format!("    {}", dynamic_helper(params)));
    }
    out.push("    ;;".to_string());
    out.push("  args)".to_string());
    out.push("    case $line[1] in".to_string());
    for child in tree.children(id) {
        let patterns: Vec<String> = std::iter::once(child.name())
            .chain(child.aliases().iter().map(String::as_str))
            .map(single_quote)
            .collect();
        out.push(format!("    {})", patterns.join("|")));
        out.push(format!("      {}", function_name(params, child.id())));
        out.push("      ;;".to_string());
    }
    out.push("    esac".to_string());
    out.push("    ;;".to_string());
    out.push("  esac".to_string());
    out.push("}".to_string());
    out.join("\n")
}

pub fn generate(tree: &CommandTree, params: &ScriptParams) -> String {
    let mut script = params.render(HEADER);
    if tree.has_custom_completions() {
        script.push_str(&params.render(DYNAMIC));
    }
    for id in tree.walk() {
        script.push('\n');
        script.push_str(&command_function(tree, id, params));
        script.push('\n');
    }
    let footer = FOOTER.replace("@ROOT_FN@", &function_name(params, tree.root()));
    script.push_str(&params.render(&footer));
    script
}
