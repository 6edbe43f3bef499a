//! Quoting rules for the text embedded into generated scripts.

/// Reduce a program name to something usable inside shell function names.
pub fn identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// POSIX single-quoted word; also valid in zsh.
pub fn single_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

/// PowerShell single-quoted string literal.
pub fn powershell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// First line of a description, the only part a completion UI can show.
pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim_end()
}

/// `value:description` entry for zsh `_describe`; colons in the value are escaped.
pub fn zsh_describe_entry(value: &str, description: &str) -> String {
    let value = value.replace('\\', r"\\").replace(':', r"\:");
    let description = first_line(description);
    if description.is_empty() {
        value
    } else {
        format!("{}:{}", value, description)
    }
}

/// Text placed inside the `[...]` of a zsh `_arguments` option spec.
pub fn zsh_bracket(text: &str) -> String {
    first_line(text)
        .replace('\\', r"\\")
        .replace('[', r"\[")
        .replace(']', r"\]")
}

/// One word inside a zsh `_arguments` `(a b c)` value list.
pub fn zsh_action_word(word: &str) -> String {
    let mut escaped = String::with_capacity(word.len());
    for c in word.chars() {
        if c.is_whitespace() || matches!(c, '(' | ')' | ':' | '\\' | '\'' | '"' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
