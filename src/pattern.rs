//! Template representation
//!
//! This module defines the slot AST for the three Leamanyi templates and
//! the fixed table of concord-marker pairs they all start with.

use std::fmt;

use serde::Serialize;

use crate::lexicon::Category;
use crate::parser::{TemplateError, parse_template};

/// An agreement-concord combination: two markers in sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcordPair {
    /// Concord classes of the two markers
    pub tag: &'static str,
    pub first: &'static str,
    pub second: &'static str,
}

impl ConcordPair {
    const fn new(tag: &'static str, first: &'static str, second: &'static str) -> Self {
        Self { tag, first, second }
    }

    /// Surface form of the pair as it appears in a sentence
    pub fn phrase(&self) -> String {
        format!("{} {}", self.first, self.second)
    }
}

pub const CONCORD_PAIRS: [ConcordPair; 9] = [
    ConcordPair::new("CC1 CC2", "yo", "o"),
    ConcordPair::new("CC3 CC3", "ba", "ba"),
    ConcordPair::new("CC4 CC4", "o", "o"),
    ConcordPair::new("CC5 CC5", "le", "le"),
    ConcordPair::new("CC6 CC6", "a", "a"),
    ConcordPair::new("CC7 CC7", "se", "se"),
    ConcordPair::new("CC8 CC9", "tse", "di"),
    ConcordPair::new("CC10 CC11", "lo", "mo"),
    ConcordPair::new("CC11 CC12", "mo", "go"),
];

/// One position in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// A fixed token
    Literal(String),
    /// Any token of any of the listed word classes (tried in order)
    Alternation(Vec<Category>),
    /// Any entry of [`CONCORD_PAIRS`]
    ConcordPairs,
    /// A sub-sequence that matches completely or not at all
    Optional(Vec<Slot>),
}

impl Slot {
    pub fn is_optional(&self) -> bool {
        matches!(self, Slot::Optional(_))
    }
}

/// The three supported relative-clause templates, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TemplateId {
    A,
    B,
    C,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [TemplateId::A, TemplateId::B, TemplateId::C];

    /// Short label naming what the template ends in
    pub fn label(self) -> &'static str {
        match self {
            TemplateId::A => "Vng",
            TemplateId::B => "Vnge",
            TemplateId::C => "Noun|PRO",
        }
    }

    /// Template notation (see [`crate::parser`])
    pub fn definition(self) -> &'static str {
        match self {
            TemplateId::A => r#"CC [L02 "go" L02] VNG"#,
            TemplateId::B => "CC L01 VNGE",
            TemplateId::C => r#"CC L03 "le" (NOUN | PRO)"#,
        }
    }

    /// Display name, e.g. `Pattern A (Vng)`
    pub fn pattern_name(self) -> String {
        format!("Pattern {:?} ({})", self, self.label())
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A template: an id plus its slot sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: TemplateId,
    pub slots: Vec<Slot>,
}

impl Template {
    /// Parse the built-in definition of `id`
    pub fn builtin(id: TemplateId) -> Result<Self, TemplateError> {
        Ok(Self {
            id,
            slots: parse_template(id.definition())?,
        })
    }

    /// All built-in templates, in declaration order
    pub fn all() -> Result<Vec<Self>, TemplateError> {
        TemplateId::ALL.into_iter().map(Self::builtin).collect()
    }
}
