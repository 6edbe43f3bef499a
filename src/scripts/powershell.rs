//! PowerShell: fully dynamic `Register-ArgumentCompleter -Native`.

use crate::scripts::escape::powershell_quote;
use crate::scripts::template::ScriptParams;

const TEMPLATE: &str = r##"# powershell completion for @PROGRAM@                            -*- shell-script -*-

function __@IDENT@_debug {
    if ($env:@DEBUG_ENV@) {
        "$args" | Out-File -Append -FilePath "$env:@DEBUG_ENV@"
    }
}

filter __@IDENT@_escapeStringWithSpecialChars {
    $_ -replace '\s|#|@|\$|;|,|''|\{|\}|\(|\)|"|`|\||<|>|&','`$&'
}

Register-ArgumentCompleter -Native -CommandName @PROGRAM_LITERAL@ -ScriptBlock {
    param(
            $WordToComplete,
            $CommandAst,
            $CursorPosition
        )

    # The command line as a string, truncated at the cursor
    $Command = $CommandAst.CommandElements
    $Command = "$Command"

    __@IDENT@_debug ""
    __@IDENT@_debug "========= starting completion logic =========="
    __@IDENT@_debug "WordToComplete: $WordToComplete Command: $Command CursorPosition: $CursorPosition"

    if ($Command.Length -gt $CursorPosition) {
        $Command = $Command.Substring(0, $CursorPosition)
    }
    __@IDENT@_debug "Truncated command: $Command"

    $ShellCompDirectiveError=@ERROR@
    $ShellCompDirectiveNoSpace=@NO_SPACE@
    $ShellCompDirectiveNoFileComp=@NO_FILE_COMP@
    $ShellCompDirectiveFilterFileExt=@FILTER_FILE_EXT@
    $ShellCompDirectiveFilterDirs=@FILTER_DIRS@
    $ShellCompDirectiveKeepOrder=@KEEP_ORDER@

    # Program and its arguments
    $Program, $Arguments = $Command.Split(" ", 2)
    $RequestComp = "$Program @REQUEST@ $Arguments"
    __@IDENT@_debug "RequestComp: $RequestComp"

    # $WordToComplete is stale when the cursor moved; use the last argument instead
    if ($WordToComplete -ne "" ) {
        $WordToComplete = $Arguments.Split(" ")[-1]
    }
    __@IDENT@_debug "New WordToComplete: $WordToComplete"

    $IsEqualFlag = ($WordToComplete -Like "--*=*" )
    if ( $IsEqualFlag ) {
        __@IDENT@_debug "Completing equal sign flag"
        $Flag, $WordToComplete = $WordToComplete.Split("=", 2)
    }

    if ( $WordToComplete -eq "" -And ( -Not $IsEqualFlag )) {
        # The cursor follows a space: ask for completions of an empty word
        __@IDENT@_debug "Adding extra empty parameter"
        $RequestComp = "$RequestComp" + ' `"`"'
    }

    __@IDENT@_debug "Calling $RequestComp"
    $Out = @(Invoke-Expression "$RequestComp" 2>$null)

    [int]$Directive = 0
    if ($Out.Length -gt 0 -And $Out[-1] -like ":*") {
        $Directive = $Out[-1].TrimStart(':')
        if ($Out.Length -gt 1) {
            $Out = $Out[0..($Out.Length - 2)]
        } else {
            $Out = @()
        }
    }
    __@IDENT@_debug "The completion directive is: $Directive"
    __@IDENT@_debug "The completions are: $Out"

    if (($Directive -band $ShellCompDirectiveError) -ne 0 ) {
        __@IDENT@_debug "Received error from completion request"
        return
    }

    $Longest = 0
    [Array]$Values = $Out | ForEach-Object {
        $Name, $Description = $_.Split("`t", 2)
        __@IDENT@_debug "Name: $Name Description: $Description"

        if ($Longest -lt $Name.Length) {
            $Longest = $Name.Length
        }

        # CompletionResult rejects an empty tooltip
        if (-Not $Description) {
            $Description = " "
        }
        @{Name="$Name";Description="$Description"}
    }

    $Space = " "
    if (($Directive -band $ShellCompDirectiveNoSpace) -ne 0 ) {
        __@IDENT@_debug "ShellCompDirectiveNoSpace is called"
        $Space = ""
    }

    if ((($Directive -band $ShellCompDirectiveFilterFileExt) -ne 0 ) -or
       (($Directive -band $ShellCompDirectiveFilterDirs) -ne 0 ))  {
        __@IDENT@_debug "ShellCompDirectiveFilterFileExt ShellCompDirectiveFilterDirs are not supported"
        # Returning nothing lets PowerShell complete paths
        return
    }

    $Values = $Values | Where-Object {
        $_.Name -like "$WordToComplete*"
    }

    if ( $IsEqualFlag ) {
        $Values = $Values | ForEach-Object {
            $_.Name = $Flag + "=" + $_.Name
            $_
        }
    }

    if (($Directive -band $ShellCompDirectiveKeepOrder) -eq 0 ) {
        $Values = $Values | Sort-Object -Property Name
    }

    if (($Directive -band $ShellCompDirectiveNoFileComp) -ne 0 ) {
        __@IDENT@_debug "ShellCompDirectiveNoFileComp is called"

        if ($Values.Length -eq 0) {
            # An empty string stops PowerShell from falling back to paths
            ""
            return
        }
    }

    if ($Values.Length -ne 1) {
        $Space = " "
    }

    $Values | ForEach-Object {
        $comp = $_
        $CompletionText = $($comp.Name | __@IDENT@_escapeStringWithSpecialChars) + $Space
        [System.Management.Automation.CompletionResult]::new($CompletionText, "$($comp.Name)", 'ParameterValue', "$($comp.Description)")
    }
}
"##;

pub fn generate(params: &ScriptParams) -> String {
    let template = TEMPLATE.replace("@PROGRAM_LITERAL@", &powershell_quote(&params.program));
    params.render(&template)
}
