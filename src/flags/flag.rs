//! Flag declarations.

use serde::Serialize;

/// How a flag consumes tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    /// `--verbose`; never consumes the following token
    Bool,
    /// `-v -v -v`; repeatable switch
    Count,
    /// `--output json`; exactly one value, last occurrence wins
    Value,
    /// `--tag a --tag b`; repeatable value
    Multi,
}

/// A declared flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    pub name: String,
    pub shorthand: Option<char>,
    pub usage: String,
    pub kind: FlagKind,
    pub default: Option<String>,
    /// Statically enumerated values offered for completion and checked on execution
    pub choices: Vec<String>,
    pub hidden: bool,
}

impl Flag {
    fn with_kind(name: impl Into<String>, kind: FlagKind) -> Self {
        Self {
            name: name.into(),
            shorthand: None,
            usage: String::new(),
            kind,
            default: None,
            choices: Vec::new(),
            hidden: false,
        }
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::with_kind(name, FlagKind::Bool)
    }

    pub fn count(name: impl Into<String>) -> Self {
        Self::with_kind(name, FlagKind::Count)
    }

    pub fn value(name: impl Into<String>) -> Self {
        Self::with_kind(name, FlagKind::Value)
    }

    pub fn multi(name: impl Into<String>) -> Self {
        Self::with_kind(name, FlagKind::Multi)
    }

    pub fn short(mut self, shorthand: char) -> Self {
        self.shorthand = Some(shorthand);
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Whether the flag consumes a value (inline with `=` or as the next token)
    pub fn takes_value(&self) -> bool {
        matches!(self.kind, FlagKind::Value | FlagKind::Multi)
    }

    /// Whether the flag may appear more than once
    pub fn repeatable(&self) -> bool {
        matches!(self.kind, FlagKind::Count | FlagKind::Multi)
    }
}

/// Ordered collection of declared flags.
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    flags: Vec<Flag>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a flag; redeclaring a name replaces the earlier declaration.
    pub fn add(&mut self, flag: Flag) {
        if let Some(existing) = self.flags.iter_mut().find(|f| f.name == flag.name) {
            *existing = flag;
        } else {
            self.flags.push(flag);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name == name)
    }

    pub fn lookup_shorthand(&self, shorthand: char) -> Option<&Flag> {
        self.flags.iter().find(|f| f.shorthand == Some(shorthand))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }
}
