//! Bash: static per-command tables with a dynamic hook.
//!
//! Each command becomes a function that loads its subcommands, flags and
//! static values into shell arrays. Commands with a registered completion
//! function carry `has_completion_function=1`; only those call back into the
//! program.

use crate::command::{CommandId, CommandTree};
use crate::scripts::escape::single_quote;
use crate::scripts::template::ScriptParams;

const PRELUDE: &str = r##"# bash completion for @PROGRAM@                            -*- shell-script -*-

__@IDENT@_debug()
{
    if [[ -n ${@DEBUG_ENV@:-} ]]; then
        echo "$*" >> "${@DEBUG_ENV@}"
    fi
}

__@IDENT@_contains()
{
    local needle=$1 item
    shift
    for item in "$@"; do
        [[ ${item} == "${needle}" ]] && return 0
    done
    return 1
}

__@IDENT@_init_words()
{
    if declare -F _get_comp_words_by_ref >/dev/null 2>&1; then
        _get_comp_words_by_ref -n "=:" cur prev words cword
    else
        cur=${COMP_WORDS[COMP_CWORD]}
        prev=${COMP_WORDS[COMP_CWORD-1]}
        words=("${COMP_WORDS[@]}")
        cword=${COMP_CWORD}
    fi
}

__@IDENT@_reset()
{
    commands=()
    alias_names=()
    alias_owners=()
    flags=()
    value_flags=()
    dynamic_flags=()
    valid_args=()
    accepts_args=1
    dynamic_args=0
    has_completion_function=0
}

__@IDENT@_add_aliases()
{
    local i seen=" "
    [[ -z ${cur} ]] && return
    for i in "${!alias_names[@]}"; do
        [[ ${alias_owners[i]} == "${cur}"* ]] && continue
        [[ ${alias_names[i]} == "${cur}"* ]] || continue
        [[ ${seen} == *" ${alias_owners[i]} "* ]] && continue
        seen+="${alias_owners[i]} "
        COMPREPLY+=("${alias_names[i]}")
    done
}

__@IDENT@_handle_dynamic()
{
    local IFS=$' \t\n'
    local program=${words[0]} out directive lastLine
    local -a args=("${words[@]:1:cword-1}" "${cur}")
    if [[ ${program} == "~/"* ]]; then
        program=${HOME}/${program#"~/"}
    fi

    __@IDENT@_debug "Calling ${program} @REQUEST@ ${args[*]}"
    if ! out=$("${program}" @REQUEST@ "${args[@]}" 2>/dev/null); then
        __@IDENT@_debug "Completion request failed"
        return
    fi

    lastLine=${out##*$'\n'}
    if [[ ${lastLine} == :* ]]; then
        directive=${lastLine#:}
        if [[ ${out} == *$'\n'* ]]; then
            out=${out%$'\n'*}
        else
            out=""
        fi
    else
        directive=0
    fi
    __@IDENT@_debug "directive: ${directive}"
    __@IDENT@_debug "candidates: ${out}"

    if (( directive & @ERROR@ )); then
        __@IDENT@_debug "Error directive, ignoring candidates"
        return
    fi

    if (( directive & @FILTER_FILE_EXT@ )); then
        local ext pattern=""
        for ext in ${out}; do
            pattern+="${pattern:+|}${ext}"
        done
        if declare -F _filedir >/dev/null 2>&1; then
            _filedir "${pattern}"
        else
            compopt -o default 2>/dev/null
        fi
        return
    fi

    if (( directive & @FILTER_DIRS@ )); then
        local subdir=${out%%$'\n'*}
        if ! declare -F _filedir >/dev/null 2>&1; then
            compopt -o dirnames 2>/dev/null
        elif [[ -n ${subdir} ]]; then
            pushd "${subdir}" >/dev/null 2>&1 && _filedir -d && popd >/dev/null 2>&1
        else
            _filedir -d
        fi
        return
    fi

    local matchCur=${cur}
    if [[ ${cur} == -*=* ]]; then
        matchCur=${cur#*=}
    fi
    local IFS=$'\n'
    COMPREPLY=($(compgen -W "${out}" -- "${matchCur}"))

    if [[ ${#COMPREPLY[@]} -eq 0 ]]; then
        if (( directive & @NO_FILE_COMP@ )); then
            __@IDENT@_debug "No candidates and file completion disabled"
        else
            compopt -o default 2>/dev/null
        fi
    elif [[ ${#COMPREPLY[@]} -eq 1 ]] && (( directive & @NO_SPACE@ )); then
        compopt -o nospace 2>/dev/null
    fi
}

__@IDENT@_complete_flag_value()
{
    local flag=$1 value=$2 choices
    if __@IDENT@_contains "${flag}" "${dynamic_flags[@]}"; then
        __@IDENT@_handle_dynamic
        return
    fi
    choices=$("${cmd_fn}" choices "${flag}")
    if [[ -n ${choices} ]]; then
        local IFS=$'\n'
        COMPREPLY=($(compgen -W "${choices}" -- "${value}"))
        return
    fi
    compopt -o default 2>/dev/null
    COMPREPLY=()
}
"##;

const MAIN: &str = r##"
__@IDENT@_start()
{
    local cur prev words cword
    __@IDENT@_init_words

    local commands alias_names alias_owners flags value_flags dynamic_flags valid_args accepts_args dynamic_args has_completion_function
    local cmd_fn=@ROOT_FN@ next word pending_flag="" positional=0 flags_done=0 c=1
    __@IDENT@_reset
    "${cmd_fn}"

    while [[ ${c} -lt ${cword} ]]; do
        word=${words[c]}
        if [[ ${flags_done} -eq 0 && ${word} == -- ]]; then
            flags_done=1
        elif [[ ${flags_done} -eq 0 && ${word} == -?* ]]; then
            if [[ ${word} != *=* ]] && __@IDENT@_contains "${word}" "${value_flags[@]}"; then
                if [[ $((c + 1)) -eq ${cword} ]]; then
                    pending_flag=${word}
                fi
                c=$((c + 1))
            fi
        elif [[ ${positional} -eq 0 && ${flags_done} -eq 0 ]] \
            && next=$("${cmd_fn}" child "${word}") && [[ -n ${next} ]]; then
            cmd_fn=${next}
            __@IDENT@_reset
            "${cmd_fn}"
        else
            positional=$((positional + 1))
        fi
        c=$((c + 1))
    done
    __@IDENT@_debug "command: ${cmd_fn}, custom: ${has_completion_function}, cur: ${cur}, pending flag: ${pending_flag}"

    if [[ -n ${pending_flag} ]]; then
        __@IDENT@_complete_flag_value "${pending_flag}" "${cur}"
        return
    fi
    if [[ ${flags_done} -eq 0 && ${cur} == -*=* ]]; then
        __@IDENT@_complete_flag_value "${cur%%=*}" "${cur#*=}"
        return
    fi

    local IFS=$'\n'
    if [[ ${flags_done} -eq 0 && ${cur} == -* ]]; then
        COMPREPLY=($(compgen -W "${flags[*]}" -- "${cur}"))
        return
    fi
    if [[ ${positional} -eq 0 && ${flags_done} -eq 0 && ${#commands[@]} -gt 0 ]]; then
        COMPREPLY=($(compgen -W "${commands[*]}" -- "${cur}"))
        __@IDENT@_add_aliases
        if [[ ${#COMPREPLY[@]} -gt 0 ]]; then
            return
        fi
    fi
    if [[ ${accepts_args} -eq 0 ]]; then
        return
    fi
    if [[ ${dynamic_args} -eq 1 ]]; then
        __@IDENT@_handle_dynamic
        return
    fi
    if [[ ${#valid_args[@]} -gt 0 ]]; then
        if [[ ${positional} -eq 0 ]]; then
            COMPREPLY=($(compgen -W "${valid_args[*]}" -- "${cur}"))
        fi
        return
    fi
    compopt -o default 2>/dev/null
    COMPREPLY=()
}

complete -F __@IDENT@_start @PROGRAM@

# ex: ts=4 sw=4 et filetype=sh
"##;

fn function_name(params: &ScriptParams, id: CommandId) -> String {
    format!("__{}_cmd_{}", params.ident, id)
}

fn quoted_array(name: &str, values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| single_quote(v)).collect();
    format!("            {}=({})", name, quoted.join(" "))
}

/// Function loading the static tables of one command.
fn command_function(tree: &CommandTree, id: CommandId, params: &ScriptParams) -> String {
    let command = tree.command(id);
    let visible = tree.visible_flags(id);
    let mut out = Vec::new();

    out.push(format!("# {}", tree.display_path(id)));
    out.push(format!("{}()", function_name(params, id)));
    out.push("{".to_string());
    out.push("    case \"$1\" in".to_string());

    if command.has_children() {
        out.push("        child)".to_string());
        out.push("            case \"$2\" in".to_string());
        for child in tree.children(id) {
            let patterns: Vec<String> = std::iter::once(child.name())
                .chain(child.aliases().iter().map(String::as_str))
                .map(single_quote)
                .collect();
            out.push(format!(
                "                {}) echo {} ;;",
                patterns.join("|"),
                function_name(params, child.id())
            ));
        }
        out.push("            esac".to_string());
        out.push("            ;;".to_string());
    }

    let with_choices: Vec<_> = visible
        .iter()
        .filter(|f| !f.choices.is_empty() && !tree.has_flag_completer(id, &f.name))
        .collect();
    if !with_choices.is_empty() {
        out.push("        choices)".to_string());
        out.push("            case \"$2\" in".to_string());
        for flag in with_choices {
            let mut patterns = vec![single_quote(&format!("--{}", flag.name))];
            if let Some(short) = flag.shorthand {
                patterns.push(single_quote(&format!("-{}", short)));
            }
            let values: Vec<String> = flag.choices.iter().map(|c| single_quote(c)).collect();
            out.push(format!(
                "                {}) printf '%s\\n' {} ;;",
                patterns.join("|"),
                values.join(" ")
            ));
        }
        out.push("            esac".to_string());
        out.push("            ;;".to_string());
    }

    let mut commands = Vec::new();
    let mut alias_names = Vec::new();
    let mut alias_owners = Vec::new();
    for child in tree.children(id).filter(|c| !c.is_hidden()) {
        commands.push(child.name().to_string());
        for alias in child.aliases() {
            alias_names.push(alias.clone());
            alias_owners.push(child.name().to_string());
        }
    }
    let mut flag_words = Vec::new();
    let mut value_flags = Vec::new();
    let mut dynamic_flags = Vec::new();
    for flag in &visible {
        let mut forms = vec![format!("--{}", flag.name)];
        if let Some(short) = flag.shorthand {
            forms.push(format!("-{}", short));
        }
        if !flag.hidden {
            flag_words.extend(forms.iter().cloned());
        }
        if flag.takes_value() {
            value_flags.extend(forms.iter().cloned());
        }
        if tree.has_flag_completer(id, &flag.name) {
            dynamic_flags.extend(forms);
        }
    }
    let valid_args: Vec<String> = command
        .valid_arg_candidates()
        .iter()
        .map(|c| c.value.clone())
        .collect();
    let dynamic_args = tree.registry().has_args_completer(id);

    out.push("        *)".to_string());
    out.push(quoted_array("commands", &commands));
    if !alias_names.is_empty() {
        out.push(quoted_array("alias_names", &alias_names));
        out.push(quoted_array("alias_owners", &alias_owners));
    }
    out.push(quoted_array("flags", &flag_words));
    out.push(quoted_array("value_flags", &value_flags));
    out.push(quoted_array("dynamic_flags", &dynamic_flags));
    out.push(quoted_array("valid_args", &valid_args));
    if !tree.accepts_args(id) {
        out.push("            accepts_args=0".to_string());
    }
    if dynamic_args {
        out.push("            dynamic_args=1".to_string());
    }
    if dynamic_args || !dynamic_flags.is_empty() {
        out.push("            has_completion_function=1".to_string());
    }
    out.push("            ;;".to_string());
    out.push("    esac".to_string());
    out.push("}".to_string());
    out.join("\n")
}

pub fn generate(tree: &CommandTree, params: &ScriptParams) -> String {
    let mut script = params.render(PRELUDE);
    for id in tree.walk() {
        script.push('\n');
        script.push_str(&command_function(tree, id, params));
        script.push('\n');
    }
    let main = MAIN.replace("@ROOT_FN@", &function_name(params, tree.root()));
    script.push_str(&params.render(&main));
    script
}
