//! Template compilation to regular expressions
//!
//! This module lowers a [`Template`] against a [`Lexicon`] into one
//! case-insensitive [`Regex`]. Every word class becomes an alternation of
//! escaped literal tokens, ordered longest first, and slots are joined by
//! `\s+`.
//!
//! The body is wrapped in token-boundary context: it may be preceded only by
//! non-alphanumeric characters of its own token (an opening quote or
//! parenthesis) and followed only by non-alphanumeric characters of its own
//! token (closing punctuation). The body itself is the `body` capture group.
//!
//! A word class with no tokens matches nothing. Rather than emitting a
//! pattern that can never match, lowering returns `None` and the emptiness
//! propagates: a required slot makes the whole sequence unmatchable, an
//! optional unit is dropped, and an alternation loses that branch.

use std::ops::Range;

use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::lexicon::Lexicon;
use crate::parser::TemplateError;
use crate::pattern::{CONCORD_PAIRS, ConcordPair, Slot, Template, TemplateId};

/// Separator between consecutive slots (and words of a multi-word token)
const SEP: &str = r"\s+";

/// A character that may sit between a match and the edge of its token
const EDGE: &str = r"[^\s\p{Alphabetic}\p{N}]";

/// Name of the capture group holding the template body
const BODY: &str = "body";

/// Upper bound on compiled regex size; large verb lists need more than the default
const REGEX_SIZE_LIMIT: usize = 64 << 20;

/// Escape a literal token so that no character is read as regex syntax.
///
/// Whitespace inside a multi-word token matches any run of whitespace.
pub fn escape_token(token: &str) -> String {
    token
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(SEP)
}

/// Build a non-capturing alternation of literal tokens.
///
/// Duplicates are dropped and longer tokens come first, so that a token is
/// never cut short by a shorter alternative that is its prefix. Tokens of
/// equal length keep their input order. Returns `None` for an empty list.
pub fn alternation<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut seen = FxHashSet::default();
    let mut tokens: Vec<&str> = tokens
        .into_iter()
        .filter(|token| !token.trim().is_empty() && seen.insert(*token))
        .collect();

    if tokens.is_empty() {
        return None;
    }

    tokens.sort_by_key(|token| std::cmp::Reverse(token.chars().count()));
    let escaped: Vec<String> = tokens.into_iter().map(escape_token).collect();
    Some(format!("(?:{})", escaped.join("|")))
}

/// A template ready for scanning
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    pub id: TemplateId,
    regex: Option<Regex>,
}

impl CompiledTemplate {
    /// The compiled expression, or `None` if the template needs an empty word class
    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    pub fn can_match(&self) -> bool {
        self.regex.is_some()
    }

    /// Byte span of the leftmost template body at or after `start`.
    ///
    /// Boundary context before `start` is taken into account, so a body can
    /// begin right after the end of a previous one.
    pub fn find_at(&self, text: &str, start: usize) -> Option<Range<usize>> {
        let captures = self.regex.as_ref()?.captures_at(text, start)?;
        captures.name(BODY).map(|body| body.range())
    }
}

/// Compile a template against the word classes of `lexicon`
pub fn compile_template(
    template: &Template,
    lexicon: &Lexicon,
) -> Result<CompiledTemplate, TemplateError> {
    check_sequence(&template.slots)?;

    let Some(body) = lower_sequence(&template.slots, lexicon) else {
        debug!(template = %template.id, "template requires an empty word class; it will never match");
        return Ok(CompiledTemplate {
            id: template.id,
            regex: None,
        });
    };

    let regex = RegexBuilder::new(&format!(
        r"(?:^|\s){EDGE}*(?P<{BODY}>{body}){EDGE}*(?:\s|$)"
    ))
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()?;
    debug!(template = %template.id, pattern_len = body.len(), "compiled template");

    Ok(CompiledTemplate {
        id: template.id,
        regex: Some(regex),
    })
}

/// Structural checks for templates built by hand rather than parsed
fn check_sequence(slots: &[Slot]) -> Result<(), TemplateError> {
    if slots.iter().all(Slot::is_optional) {
        return Err(TemplateError::NoRequiredSlot);
    }
    for slot in slots {
        match slot {
            Slot::Optional(inner) => check_sequence(inner)?,
            Slot::Literal(text) if text.split_whitespace().count() != 1 => {
                return Err(TemplateError::MalformedLiteral(text.clone()));
            }
            _ => {}
        }
    }
    Ok(())
}

fn lower_sequence(slots: &[Slot], lexicon: &Lexicon) -> Option<String> {
    let mut out = String::new();
    let mut need_sep = false;

    for slot in slots {
        if let Slot::Optional(inner) = slot {
            let Some(body) = lower_sequence(inner, lexicon) else {
                continue;
            };
            // The separator lives inside the optional group so that skipping
            // the unit also skips its whitespace
            if need_sep {
                out.push_str(&format!("(?:{SEP}{body})?"));
            } else {
                out.push_str(&format!("(?:{body}{SEP})?"));
            }
            continue;
        }

        let body = lower_slot(slot, lexicon)?;
        if need_sep {
            out.push_str(SEP);
        }
        out.push_str(&body);
        need_sep = true;
    }

    Some(out)
}

fn lower_slot(slot: &Slot, lexicon: &Lexicon) -> Option<String> {
    match slot {
        Slot::Literal(text) => Some(escape_token(text)),
        Slot::ConcordPairs => {
            let phrases: Vec<String> = CONCORD_PAIRS.iter().map(ConcordPair::phrase).collect();
            alternation(phrases.iter().map(String::as_str))
        }
        Slot::Alternation(categories) => {
            let mut groups: Vec<String> = categories
                .iter()
                .filter_map(|category| alternation(lexicon.word_class(*category).iter()))
                .collect();
            match groups.len() {
                0 => None,
                1 => groups.pop(),
                _ => Some(format!("(?:{})", groups.join("|"))),
            }
        }
        Slot::Optional(_) => unreachable!("optional slots are lowered by lower_sequence"),
    }
}
