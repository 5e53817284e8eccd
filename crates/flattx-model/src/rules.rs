//! Per-field transformation rules.
//!
//! A rule is attached to a field name. Fields without an explicit rule are
//! passed through unchanged.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Rule kind token as written in a `field:kind[:param]` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    UniqueId,
    OneToOne,
    ValueTranslation,
    DefaultValue,
}

impl RuleKind {
    pub const ALL: [RuleKind; 4] = [
        Self::UniqueId,
        Self::OneToOne,
        Self::ValueTranslation,
        Self::DefaultValue,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Self::UniqueId => "unique_id",
            Self::OneToOne => "one_to_one",
            Self::ValueTranslation => "value_translation",
            Self::DefaultValue => "default_value",
        }
    }
}

impl FromStr for RuleKind {
    type Err = ModelError;

    /// Case-insensitive match against the four kind tokens.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.token().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownRuleKind(trimmed.to_string()))
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// How a `unique_id` field generates its replacement value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UniqueIdStrategy {
    /// Random 128-bit identifier in canonical hyphenated form.
    Uuid,
    /// High-resolution monotonic timestamp token.
    Incremental,
    /// Coarse wall-clock token with a `unique-` prefix.
    #[default]
    Fallback,
}

impl UniqueIdStrategy {
    /// Resolve the optional strategy parameter. Anything unrecognized falls back.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("uuid") => Self::Uuid,
            Some(value) if value.eq_ignore_ascii_case("incremental") => Self::Incremental,
            _ => Self::Fallback,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Incremental => "incremental",
            Self::Fallback => "fallback",
        }
    }
}

/// Transformation applied to a single field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldRule {
    /// Value is left unchanged.
    #[default]
    PassThrough,
    /// Value is remapped through the translation table. The group is the
    /// field's shared group if assigned, otherwise the field name itself.
    ValueLookup,
    /// Value is replaced unconditionally with the literal.
    DefaultValue(String),
    /// Value is replaced with a freshly generated identifier.
    UniqueId(UniqueIdStrategy),
}

impl FieldRule {
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::PassThrough => RuleKind::OneToOne,
            Self::ValueLookup => RuleKind::ValueTranslation,
            Self::DefaultValue(_) => RuleKind::DefaultValue,
            Self::UniqueId(_) => RuleKind::UniqueId,
        }
    }

    /// Returns a human-readable display name for the rule.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PassThrough => "Pass-through",
            Self::ValueLookup => "Value lookup",
            Self::DefaultValue(_) => "Default value",
            Self::UniqueId(_) => "Unique id",
        }
    }

    /// True when the rule output does not depend on generated values.
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, Self::UniqueId(_))
    }
}
