//! zsh: fully dynamic script, every completion goes through the program.

use crate::scripts::template::ScriptParams;

const TEMPLATE: &str = r##"#compdef @PROGRAM@
# zsh completion for @PROGRAM@                            -*- shell-script -*-

__@IDENT@_debug()
{
    local file="$@DEBUG_ENV@"
    if [[ -n ${file} ]]; then
        echo "$*" >> "${file}"
    fi
}

_@IDENT@()
{
    local shellCompDirectiveError=@ERROR@
    local shellCompDirectiveNoSpace=@NO_SPACE@
    local shellCompDirectiveNoFileComp=@NO_FILE_COMP@
    local shellCompDirectiveFilterFileExt=@FILTER_FILE_EXT@
    local shellCompDirectiveFilterDirs=@FILTER_DIRS@
    local shellCompDirectiveKeepOrder=@KEEP_ORDER@

    local lastParam lastChar requestComp out directive comp lastComp lastLine noSpace keepOrder
    local -a completions flagPrefix

    __@IDENT@_debug "\n========= starting completion logic =========="
    __@IDENT@_debug "CURRENT: ${CURRENT}, words[*]: ${words[*]}"

    # Only complete up to the cursor
    words=("${=words[1,CURRENT]}")
    __@IDENT@_debug "Truncated words[*]: ${words[*]},"

    lastParam=${words[-1]}
    lastChar=${lastParam[-1]}
    __@IDENT@_debug "lastParam: ${lastParam}, lastChar: ${lastChar}"

    # For --flag=value the candidates must be inserted after the flag prefix
    setopt local_options BASH_REMATCH
    if [[ "${lastParam}" =~ '-.*=' ]]; then
        flagPrefix=(-p "${BASH_REMATCH}")
    fi

    requestComp="${words[1]} @REQUEST@ ${words[2,-1]}"
    if [ "${lastChar}" = "" ]; then
        # The cursor follows a space: ask for completions of an empty word
        __@IDENT@_debug "Adding extra empty parameter"
        requestComp="${requestComp} \"\""
    fi

    __@IDENT@_debug "About to call: eval ${requestComp}"
    out=$(eval ${requestComp} 2>/dev/null)
    __@IDENT@_debug "completion output: ${out}"

    lastLine=${out##*$'\n'}
    if [ "${lastLine[1]}" = : ]; then
        directive=${lastLine[2,-1]}
        # Drop the directive line and the newline before it
        local suffix
        (( suffix=${#lastLine}+2 ))
        out=${out[1,-$suffix]}
    else
        __@IDENT@_debug "No directive found.  Setting to default"
        directive=0
    fi

    __@IDENT@_debug "directive: ${directive}"
    __@IDENT@_debug "completions: ${out}"
    __@IDENT@_debug "flagPrefix: ${flagPrefix[*]}"

    if [ $((directive & shellCompDirectiveError)) -ne 0 ]; then
        __@IDENT@_debug "Completion received error. Ignoring completions."
        return
    fi

    local tab="$(printf '\t')"
    while IFS='\n' read -r comp; do
        if [ -n "$comp" ]; then
            # _describe splits value and description on ':'
            comp=${comp//:/\\:}
            comp=${comp//$tab/:}
            __@IDENT@_debug "Adding completion: ${comp}"
            completions+=${comp}
            lastComp=$comp
        fi
    done < <(printf "%s\n" "${out[@]}")

    if [ $((directive & shellCompDirectiveNoSpace)) -ne 0 ]; then
        __@IDENT@_debug "Activating nospace."
        noSpace="-S ''"
    fi

    if [ $((directive & shellCompDirectiveKeepOrder)) -ne 0 ]; then
        __@IDENT@_debug "Activating keep order."
        keepOrder="-V"
    fi

    if [ $((directive & shellCompDirectiveFilterFileExt)) -ne 0 ]; then
        # Candidates are file extensions
        local filteringCmd
        filteringCmd='_files'
        for filter in ${completions[@]}; do
            if [ ${filter[1]} != '*' ]; then
                filter="\*.$filter"
            fi
            filteringCmd+=" -g $filter"
        done
        filteringCmd+=" ${(q)flagPrefix}"

        __@IDENT@_debug "File filtering command: $filteringCmd"
        _arguments '*:filename:'"$filteringCmd"
    elif [ $((directive & shellCompDirectiveFilterDirs)) -ne 0 ]; then
        # A single candidate names the directory to complete under
        local subdir
        subdir="${completions[1]}"
        if [ -n "$subdir" ]; then
            __@IDENT@_debug "Listing directories in $subdir"
            pushd "${subdir}" >/dev/null 2>&1
        else
            __@IDENT@_debug "Listing directories in ."
        fi

        local result
        _arguments '*:dirname:_files -/'" ${(q)flagPrefix}"
        result=$?
        if [ -n "$subdir" ]; then
            popd >/dev/null 2>&1
        fi
        return $result
    elif [ ${#completions[@]} -eq 1 ] && [ -n "${noSpace}" ]; then
        # Single candidate with nospace: insert it as is
        local value=${lastComp%%:*}
        value=${value//\\:/:}
        __@IDENT@_debug "Inserting without trailing space: ${value}"
        compadd "${flagPrefix[@]}" -S '' -- "${value}"
    elif [ ${#completions[@]} -eq 0 ]; then
        if [ $((directive & shellCompDirectiveNoFileComp)) -ne 0 ]; then
            __@IDENT@_debug "deactivating file completion"
            return 1
        fi
        __@IDENT@_debug "Activating file completion"
        _arguments '*:filename:_files'" ${(q)flagPrefix}"
    else
        _describe ${keepOrder} "completions" completions "${flagPrefix[@]}"
    fi
}

# Allow the script to be sourced as well as autoloaded
if [ "$funcstack[1]" = "_@IDENT@" ]; then
    _@IDENT@ "$@"
else
    compdef _@IDENT@ @PROGRAM@
fi
"##;

pub fn generate(params: &ScriptParams) -> String {
    params.render(TEMPLATE)
}
