//! Grammar feature flags.
//!
//! Every operator the parser understands can be switched off. A disabled operator's character
//! is treated as ordinary term text. Flags are carried as an `i32` bitmask so that the wire
//! form (`ALL = -1`, `NONE = 0`) round-trips unchanged.

use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::FlagError;

/// A single named grammar feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Every feature.
    All,
    /// No features.
    None,
    /// `+` conjunction.
    And,
    /// Leading `-` negation.
    Not,
    /// `|` disjunction.
    Or,
    /// Trailing `*` prefix marker.
    Prefix,
    /// `"..."` phrases.
    Phrase,
    /// `(` `)` grouping.
    Precedence,
    /// `\` escapes.
    Escape,
    /// Whitespace as a delimiter.
    Whitespace,
    /// Trailing `~N` on terms.
    Fuzzy,
    /// Trailing `~N` on phrases.
    Near,
    /// Synonym of [`Flag::Near`].
    Slop,
}

impl Flag {
    /// Every flag, in declaration order.
    pub const VARIANTS: [Self; 13] = [
        Self::All,
        Self::None,
        Self::And,
        Self::Not,
        Self::Or,
        Self::Prefix,
        Self::Phrase,
        Self::Precedence,
        Self::Escape,
        Self::Whitespace,
        Self::Fuzzy,
        Self::Near,
        Self::Slop,
    ];

    /// The bit value of this flag.
    pub const fn value(self) -> i32 {
        match self {
            Self::All => -1,
            Self::None => 0,
            Self::And => 1,
            Self::Not => 1 << 1,
            Self::Or => 1 << 2,
            Self::Prefix => 1 << 3,
            Self::Phrase => 1 << 4,
            Self::Precedence => 1 << 5,
            Self::Escape => 1 << 6,
            Self::Whitespace => 1 << 7,
            Self::Fuzzy => 1 << 8,
            Self::Near | Self::Slop => 1 << 9,
        }
    }

    /// The canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::None => "NONE",
            Self::And => "AND",
            Self::Not => "NOT",
            Self::Or => "OR",
            Self::Prefix => "PREFIX",
            Self::Phrase => "PHRASE",
            Self::Precedence => "PRECEDENCE",
            Self::Escape => "ESCAPE",
            Self::Whitespace => "WHITESPACE",
            Self::Fuzzy => "FUZZY",
            Self::Near => "NEAR",
            Self::Slop => "SLOP",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Flag {
    type Err = FlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::VARIANTS
            .into_iter()
            .find(|flag| flag.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FlagError::Unknown(s.to_string()))
    }
}

/// A resolved set of enabled grammar features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flags(i32);

impl Flags {
    /// All features enabled.
    pub const ALL: Self = Self(Flag::All.value());
    /// No features enabled.
    pub const NONE: Self = Self(Flag::None.value());

    /// Wraps a raw bitmask. Negative masks mean every feature.
    pub const fn from_bits(bits: i32) -> Self {
        if bits < 0 { Self::ALL } else { Self(bits) }
    }

    /// The raw bitmask.
    pub const fn bits(self) -> i32 {
        self.0
    }

    /// Whether `flag` is enabled. `NONE` is never "contained"; `ALL` only in the full mask.
    pub const fn contains(self, flag: Flag) -> bool {
        match flag {
            Flag::None => false,
            Flag::All => self.0 == -1,
            other => self.0 & other.value() != 0,
        }
    }

    /// Returns a copy with `flag` switched off.
    pub const fn without(self, flag: Flag) -> Self {
        match flag {
            Flag::All => Self::NONE,
            Flag::None => self,
            other => Self(self.0 & !other.value()),
        }
    }

    /// Resolves a `|`- or `,`-delimited list of flag names.
    ///
    /// Names are case-insensitive and order does not matter. Empty or absent input means every
    /// feature. `ALL` and `NONE` win over anything else in the list, the first one seen deciding
    /// when both appear; an unknown name anywhere in the list is an error.
    pub fn resolve(spec: Option<&str>) -> Result<Self, FlagError> {
        let Some(spec) = spec.filter(|s| !s.trim().is_empty()) else {
            return Ok(Self::ALL);
        };

        let mut magic = Self::NONE;
        let mut fixed = None;
        for name in spec.split(['|', ',']).map(str::trim).filter(|s| !s.is_empty()) {
            match name.parse::<Flag>()? {
                flag @ (Flag::All | Flag::None) => {
                    if fixed.is_none() {
                        fixed = Some(Self(flag.value()));
                    }
                }
                flag => magic |= flag,
            }
        }

        Ok(fixed.unwrap_or(magic))
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<Flag> for Flags {
    fn from(flag: Flag) -> Self {
        Self(flag.value())
    }
}

impl BitOr<Flag> for Flags {
    type Output = Self;

    fn bitor(self, rhs: Flag) -> Self {
        Self(self.0 | rhs.value())
    }
}

impl BitOrAssign<Flag> for Flags {
    fn bitor_assign(&mut self, rhs: Flag) {
        self.0 |= rhs.value();
    }
}

impl FromIterator<Flag> for Flags {
    /// Unions the flags; an empty iterator yields `ALL`.
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut iter = iter.into_iter().peekable();
        if iter.peek().is_none() {
            return Self::ALL;
        }
        iter.fold(Self::NONE, |acc, flag| acc | flag)
    }
}

impl FromStr for Flags {
    type Err = FlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(Some(s))
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ALL => f.write_str("ALL"),
            Self::NONE => f.write_str("NONE"),
            _ => {
                let names: Vec<&str> = Flag::VARIANTS
                    .into_iter()
                    .filter(|flag| !matches!(flag, Flag::All | Flag::None | Flag::Slop))
                    .filter(|flag| self.contains(*flag))
                    .map(Flag::name)
                    .collect();
                f.write_str(&names.join("|"))
            }
        }
    }
}
