//! Completion directive: a flat bit set telling the shell how to treat results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bit set returned alongside completion candidates.
///
/// Rendered on the protocol stream as a decimal integer (`:6`). Bits combine
/// with `|`; [`Directive::DEFAULT`] is the empty set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Directive(u32);

impl Directive {
    /// No bits set: offer candidates, fall back to file completion if none.
    pub const DEFAULT: Directive = Directive(0);
    /// Something went wrong; the shell must ignore all candidates.
    pub const ERROR: Directive = Directive(1);
    /// Do not append a space after a single accepted candidate.
    pub const NO_SPACE: Directive = Directive(1 << 1);
    /// Do not fall back to file completion when there are no candidates.
    pub const NO_FILE_COMP: Directive = Directive(1 << 2);
    /// Candidates are file extensions to filter file completion by.
    pub const FILTER_FILE_EXT: Directive = Directive(1 << 3);
    /// Only complete directory names; a single candidate names the base directory.
    pub const FILTER_DIRS: Directive = Directive(1 << 4);
    /// Keep candidates in the order given instead of letting the shell sort.
    pub const KEEP_ORDER: Directive = Directive(1 << 5);

    const NAMED: [(Directive, &'static str); 6] = [
        (Directive::ERROR, "Error"),
        (Directive::NO_SPACE, "NoSpace"),
        (Directive::NO_FILE_COMP, "NoFileComp"),
        (Directive::FILTER_FILE_EXT, "FilterFileExt"),
        (Directive::FILTER_DIRS, "FilterDirs"),
        (Directive::KEEP_ORDER, "KeepOrder"),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Directive(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_default(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set in `self`.
    pub const fn contains(self, other: Directive) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Directive) -> Directive {
        Directive(self.0 | other.0)
    }

    /// Names of the set bits, in bit order.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for Directive {
    type Output = Directive;

    fn bitor(self, rhs: Directive) -> Directive {
        self.union(rhs)
    }
}

impl BitOrAssign for Directive {
    fn bitor_assign(&mut self, rhs: Directive) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Directive {
    type Output = Directive;

    fn bitand(self, rhs: Directive) -> Directive {
        Directive(self.0 & rhs.0)
    }
}

/// Human-readable form used in the stderr trailer: `NoSpace, NoFileComp`.
impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "Default")
        } else {
            write!(f, "{}", names.join(", "))
        }
    }
}
