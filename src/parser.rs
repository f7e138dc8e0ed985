//! Template notation parser
//!
//! Parses template definitions into the [`Slot`] AST using a pest grammar.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use thiserror::Error;

use crate::lexicon::Category;
use crate::pattern::Slot;

#[derive(Parser)]
#[grammar = "template.pest"]
struct TemplateParser;

/// A template that cannot be turned into a matcher.
///
/// Templates are fixed at build time, so any of these is a programming
/// error rather than a problem with the input sentence.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    Syntax(#[from] pest::error::Error<Rule>),

    #[error("Template error: Unknown word class: {0}")]
    UnknownSymbol(String),

    #[error("Template error: CC cannot appear inside an alternation")]
    ConcordInAlternation,

    #[error("Template error: Malformed literal: {0:?}")]
    MalformedLiteral(String),

    #[error("Template error: Sequence has no required slot")]
    NoRequiredSlot,

    #[error("Template error: {0}")]
    Regex(#[from] regex::Error),
}

enum Symbol {
    Concord,
    Class(Category),
}

fn resolve_symbol(name: &str) -> Result<Symbol, TemplateError> {
    let category = match name {
        "CC" => return Ok(Symbol::Concord),
        "L01" => Category::Role1,
        "L02" => Category::Role2,
        "L03" => Category::Role3,
        "PRO" => Category::Pronoun,
        "VNG" => Category::VerbFormA,
        "VNGE" => Category::VerbFormB,
        "NOUN" => Category::Noun,
        other => return Err(TemplateError::UnknownSymbol(other.to_string())),
    };
    Ok(Symbol::Class(category))
}

/// Parse a template definition into its slot sequence
pub fn parse_template(input: &str) -> Result<Vec<Slot>, TemplateError> {
    let mut pairs = TemplateParser::parse(Rule::template, input)?;

    let Some(sequence) = pairs
        .next()
        .and_then(|template| template.into_inner().find(|p| p.as_rule() == Rule::sequence))
    else {
        return Err(TemplateError::NoRequiredSlot);
    };

    parse_sequence(sequence)
}

/// Parse a slot sequence; at least one slot must be non-optional
fn parse_sequence(pair: Pair<Rule>) -> Result<Vec<Slot>, TemplateError> {
    let slots = pair
        .into_inner()
        .map(parse_slot)
        .collect::<Result<Vec<_>, _>>()?;

    if slots.iter().all(Slot::is_optional) {
        return Err(TemplateError::NoRequiredSlot);
    }
    Ok(slots)
}

fn parse_slot(pair: Pair<Rule>) -> Result<Slot, TemplateError> {
    match pair.as_rule() {
        Rule::optional => {
            let Some(inner) = pair.into_inner().next() else {
                return Err(TemplateError::NoRequiredSlot);
            };
            Ok(Slot::Optional(parse_sequence(inner)?))
        }
        Rule::choice => {
            let categories = pair
                .into_inner()
                .map(|symbol| match resolve_symbol(symbol.as_str())? {
                    Symbol::Class(category) => Ok(category),
                    Symbol::Concord => Err(TemplateError::ConcordInAlternation),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Slot::Alternation(categories))
        }
        Rule::literal => {
            let text = pair.into_inner().next().map_or("", |p| p.as_str());
            if text.is_empty() {
                return Err(TemplateError::MalformedLiteral(text.to_string()));
            }
            Ok(Slot::Literal(text.to_string()))
        }
        Rule::symbol => match resolve_symbol(pair.as_str())? {
            Symbol::Concord => Ok(Slot::ConcordPairs),
            Symbol::Class(category) => Ok(Slot::Alternation(vec![category])),
        },
        rule => unreachable!("grammar produced unexpected slot rule {:?}", rule),
    }
}
