//! fish: fully dynamic; fish reads `value<TAB>description` natively.

use crate::scripts::template::ScriptParams;

const TEMPLATE: &str = r##"# fish completion for @PROGRAM@                            -*- shell-script -*-

function __@IDENT@_debug
    set -l file "$@DEBUG_ENV@"
    if test -n "$file"
        echo "$argv" >> $file
    end
end

function __@IDENT@_perform_completion
    __@IDENT@_debug "Starting __@IDENT@_perform_completion"

    # Words before the cursor, and the word under it escaped for eval
    set -l args (commandline -opc)
    set -l lastArg (string escape -- (commandline -ct))

    __@IDENT@_debug "args: $args"
    __@IDENT@_debug "last arg: $lastArg"

    # An empty lastArg expands to "''" which asks for an empty word
    set -l requestComp "$args[1] @REQUEST@ $args[2..-1] $lastArg"

    __@IDENT@_debug "Calling $requestComp"
    set -l results (eval $requestComp 2> /dev/null)

    # Trailing blank lines would hide the directive
    for line in $results[-1..1]
        if test (string trim -- $line) = ""
            set results $results[1..-2]
        else
            break
        end
    end

    set -l comps $results[1..-2]
    set -l directiveLine $results[-1]

    # --flag=value candidates must carry the flag prefix
    set -l flagPrefix (string match -r -- '-.*=' "$lastArg")

    __@IDENT@_debug "Comps: $comps"
    __@IDENT@_debug "DirectiveLine: $directiveLine"
    __@IDENT@_debug "flagPrefix: $flagPrefix"

    for comp in $comps
        printf "%s%s\n" "$flagPrefix" "$comp"
    end

    printf "%s\n" "$directiveLine"
end

function __@IDENT@_prepare_completions
    __@IDENT@_debug ""
    __@IDENT@_debug "========= starting completion logic =========="

    set --erase __@IDENT@_comp_results

    set -l results (__@IDENT@_perform_completion)
    __@IDENT@_debug "Completion results: $results"

    if test -z "$results"
        __@IDENT@_debug "No completion, probably due to a failure"
        return 1
    end

    set -l directive (string sub --start 2 $results[-1])
    set --global __@IDENT@_comp_results $results[1..-2]

    __@IDENT@_debug "Completions are: $__@IDENT@_comp_results"
    __@IDENT@_debug "Directive is: $directive"

    set -l shellCompDirectiveError @ERROR@
    set -l shellCompDirectiveNoSpace @NO_SPACE@
    set -l shellCompDirectiveNoFileComp @NO_FILE_COMP@
    set -l shellCompDirectiveFilterFileExt @FILTER_FILE_EXT@
    set -l shellCompDirectiveFilterDirs @FILTER_DIRS@

    if test -z "$directive"
        set directive 0
    end

    set -l compErr (math (math --scale 0 $directive / $shellCompDirectiveError) % 2)
    if test $compErr -eq 1
        __@IDENT@_debug "Received error directive: aborting."
        return 1
    end

    set -l filefilter (math (math --scale 0 $directive / $shellCompDirectiveFilterFileExt) % 2)
    set -l dirfilter (math (math --scale 0 $directive / $shellCompDirectiveFilterDirs) % 2)
    if test $filefilter -eq 1; or test $dirfilter -eq 1
        __@IDENT@_debug "File extension filtering or directory filtering not supported"
        # Fall back to plain file completion
        return 1
    end

    set -l nospace (math (math --scale 0 $directive / $shellCompDirectiveNoSpace) % 2)
    set -l nofiles (math (math --scale 0 $directive / $shellCompDirectiveNoFileComp) % 2)

    __@IDENT@_debug "nospace: $nospace, nofiles: $nofiles"

    # Counting matters for nospace and for the file fallback
    if test $nospace -ne 0; or test $nofiles -eq 0
        set -l prefix (commandline -t | string escape --style=regex)
        __@IDENT@_debug "prefix: $prefix"

        set -l completions (string match -r -- "^$prefix.*" $__@IDENT@_comp_results)
        set --global __@IDENT@_comp_results $completions
        __@IDENT@_debug "Filtered completions are: $__@IDENT@_comp_results"

        set -l numComps (count $__@IDENT@_comp_results)
        __@IDENT@_debug "numComps: $numComps"

        if test $numComps -eq 1; and test $nospace -ne 0
            # Drop the description to see what will be inserted
            set -l split (string split --max 1 \t $__@IDENT@_comp_results[1])

            # fish adds no space after these characters anyway
            set -l lastChar (string sub -s -1 -- $split)
            if not string match -r -q "[@=/:.,]" -- "$lastChar"
                # A second, longer candidate keeps fish from appending a space
                __@IDENT@_debug "Adding second completion to perform nospace directive"
                set --global __@IDENT@_comp_results $split[1] $split[1].
                __@IDENT@_debug "Completions are now: $__@IDENT@_comp_results"
            end
        end

        if test $numComps -eq 0; and test $nofiles -eq 0
            __@IDENT@_debug "Requesting file completion"
            return 1
        end
    end

    return 0
end

# Load any completions fish may autoload later so they can be erased now
if type -q "@PROGRAM@"
    complete --do-complete "@PROGRAM@ " > /dev/null 2>&1
end

complete -c @PROGRAM@ -e

complete -c @PROGRAM@ -n '__@IDENT@_prepare_completions' -f -a '$__@IDENT@_comp_results'
"##;

pub fn generate(params: &ScriptParams) -> String {
    params.render(TEMPLATE)
}
