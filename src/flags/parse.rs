//! Flag tokenizer shared by execution (strict) and completion (lenient).
//!
//! Recognised forms: `--name`, `--name=value`, `--name value`, `-n`, `-nvalue`,
//! `-n=value`, `-n value`, grouped switches `-abc`, and `--` ending flag parsing.

use crate::error::FlagError;
use crate::flags::flag::Flag;
use std::collections::BTreeMap;

/// How unknown flags and missing values are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Execution: unknown flags, missing values and bad choices are errors
    Strict,
    /// Completion: unknown flags are skipped, a trailing flag awaiting its value is reported
    Lenient,
}

/// Flag values collected while parsing, with declared defaults as fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagValues {
    values: BTreeMap<String, Vec<String>>,
    defaults: BTreeMap<String, String>,
}

impl FlagValues {
    pub(crate) fn push(&mut self, name: &str, value: String) {
        self.values.entry(name.to_string()).or_default().push(value);
    }

    pub(crate) fn apply_defaults(&mut self, flags: &[&Flag]) {
        for flag in flags {
            if let Some(default) = &flag.default {
                self.defaults.insert(flag.name.clone(), default.clone());
            }
        }
    }

    /// Whether the flag appeared on the command line
    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Last value given for the flag, or its declared default
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|v| v.last())
            .or_else(|| self.defaults.get(name))
            .map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name) == Some("true")
    }

    pub fn count(&self, name: &str) -> usize {
        self.get_all(name).iter().filter(|v| *v == "true").count()
    }

    /// Names of the flags that appeared on the command line
    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Result of tokenizing a command line against a set of flags
#[derive(Debug, Clone, Default)]
pub struct ParsedLine {
    pub positionals: Vec<String>,
    pub values: FlagValues,
    /// Lenient mode only: the last token was a value-taking flag without its value
    pub pending: Option<String>,
}

fn find_long<'a>(flags: &[&'a Flag], name: &str) -> Option<&'a Flag> {
    flags.iter().copied().find(|f| f.name == name)
}

fn find_short<'a>(flags: &[&'a Flag], shorthand: char) -> Option<&'a Flag> {
    flags.iter().copied().find(|f| f.shorthand == Some(shorthand))
}

/// Look up a flag written as `--name` or `-n` (without any `=value` part).
pub fn lookup_token<'a>(flags: &[&'a Flag], token: &str) -> Option<&'a Flag> {
    if let Some(name) = token.strip_prefix("--") {
        return find_long(flags, name);
    }
    let mut chars = token.strip_prefix('-')?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => find_short(flags, c),
        _ => None,
    }
}

/// Tokenize `tokens` against `flags`.
pub fn parse(flags: &[&Flag], tokens: &[String], mode: ParseMode) -> Result<ParsedLine, FlagError> {
    let mut line = ParsedLine::default();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        i += 1;

        if token == "--" {
            line.positionals.extend(tokens[i..].iter().cloned());
            break;
        }

        if let Some(rest) = token.strip_prefix("--") {
            let (name, inline) = match rest.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (rest, None),
            };
            let Some(flag) = find_long(flags, name) else {
                if mode == ParseMode::Strict {
                    return Err(FlagError::UnknownFlag(format!("--{}", name)));
                }
                continue;
            };
            let display = format!("--{}", flag.name);
            i = consume(flag, &display, inline, tokens, i, mode, &mut line)?;
            continue;
        }

        if token.len() > 1 && token.starts_with('-') {
            let shorts = &token[1..];
            for (pos, c) in shorts.char_indices() {
                let Some(flag) = find_short(flags, c) else {
                    if mode == ParseMode::Strict {
                        return Err(FlagError::UnknownShorthand(c));
                    }
                    break;
                };
                let rest = &shorts[pos + c.len_utf8()..];
                let display = format!("-{}", c);
                if flag.takes_value() {
                    let inline = if rest.is_empty() {
                        None
                    } else {
                        Some(rest.strip_prefix('=').unwrap_or(rest))
                    };
                    i = consume(flag, &display, inline, tokens, i, mode, &mut line)?;
                    break;
                }
                if let Some(value) = rest.strip_prefix('=') {
                    i = consume(flag, &display, Some(value), tokens, i, mode, &mut line)?;
                    break;
                }
                line.values.push(&flag.name, "true".to_string());
            }
            continue;
        }

        line.positionals.push(token.clone());
    }

    line.values.apply_defaults(flags);
    Ok(line)
}

fn consume(
    flag: &Flag,
    display: &str,
    inline: Option<&str>,
    tokens: &[String],
    mut i: usize,
    mode: ParseMode,
    line: &mut ParsedLine,
) -> Result<usize, FlagError> {
    if !flag.takes_value() {
        match inline {
            None => line.values.push(&flag.name, "true".to_string()),
            Some(v) if v == "true" || v == "false" => line.values.push(&flag.name, v.to_string()),
            Some(v) => {
                if mode == ParseMode::Strict {
                    return Err(FlagError::UnexpectedValue {
                        flag: display.to_string(),
                        value: v.to_string(),
                    });
                }
            }
        }
        return Ok(i);
    }

    let value = match inline {
        Some(v) => v.to_string(),
        None if i < tokens.len() => {
            i += 1;
            tokens[i - 1].clone()
        }
        None => {
            if mode == ParseMode::Strict {
                return Err(FlagError::MissingValue(display.to_string()));
            }
            line.pending = Some(flag.name.clone());
            return Ok(i);
        }
    };

    if mode == ParseMode::Strict && !flag.choices.is_empty() && !flag.choices.contains(&value) {
        return Err(FlagError::InvalidChoice {
            flag: display.to_string(),
            value,
            choices: flag.choices.join(", "),
        });
    }

    line.values.push(&flag.name, value);
    Ok(i)
}

/// Index of the first token that is neither a flag nor a flag's value.
///
/// Flags are read the way [`parse`] reads them: a value-taking flag written
/// without an inline value consumes the following token, including one that
/// ends a shorthand cluster such as `-vo`. Unknown flags are treated as
/// switches. Nothing after `--` is considered.
pub fn first_positional(flags: &[&Flag], tokens: &[String]) -> Option<usize> {
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if token == "--" {
            return None;
        }
        if token.len() > 1 && token.starts_with('-') {
            i += if consumes_next(flags, token) { 2 } else { 1 };
            continue;
        }
        return Some(i);
    }
    None
}

/// Whether `token` is a flag that takes the following token as its value.
fn consumes_next(flags: &[&Flag], token: &str) -> bool {
    if let Some(rest) = token.strip_prefix("--") {
        return !rest.contains('=')
            && find_long(flags, rest).is_some_and(Flag::takes_value);
    }
    let shorts = &token[1..];
    for (pos, c) in shorts.char_indices() {
        let Some(flag) = find_short(flags, c) else {
            return false;
        };
        let rest = &shorts[pos + c.len_utf8()..];
        if flag.takes_value() {
            return rest.is_empty();
        }
        if rest.starts_with('=') {
            return false;
        }
    }
    false
}
