//! End-to-end sentence search
//!
//! The search pipeline:
//! 1. Load the lexicon (see [`crate::lexicon`])
//! 2. Compile the three templates against it, once
//! 3. Normalize the sentence's whitespace and split it into words
//! 4. Scan each template left to right for non-overlapping occurrences
//! 5. Map byte offsets back to word indices
//! 6. Sort all records by start, then longest span, then template order

use std::cmp::Reverse;
use std::ops::Range;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::trace;

use crate::compiler::{CompiledTemplate, compile_template};
use crate::lexicon::{Lexicon, LexiconError, LexiconSource};
use crate::parser::TemplateError;
use crate::pattern::{Template, TemplateId};

/// Error while building an [`Analyzer`]
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Lexicon(#[from] LexiconError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// One occurrence of a template in a sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub template: TemplateId,
    /// Matched text, as it appears in the normalized sentence
    pub matched_text: String,
    /// Index of the first matched word
    pub start_word: usize,
    /// Index one past the last matched word
    pub end_word: usize,
    pub words: Vec<String>,
}

impl MatchRecord {
    pub fn pattern_name(&self) -> String {
        self.template.pattern_name()
    }

    /// Number of words covered
    pub fn span_len(&self) -> usize {
        self.end_word - self.start_word
    }

    /// Result order: earliest start, then longest span, then template order
    pub fn sort_key(&self) -> (usize, Reverse<usize>, TemplateId) {
        (self.start_word, Reverse(self.span_len()), self.template)
    }
}

/// Collapse whitespace runs to single spaces and trim both ends
pub fn normalize(sentence: &str) -> String {
    sentence.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The compiled templates. Holds no per-call state.
#[derive(Debug, Clone)]
pub struct Matcher {
    templates: Vec<CompiledTemplate>,
}

impl Matcher {
    /// Compile the built-in templates against `lexicon`
    pub fn new(lexicon: &Lexicon) -> Result<Self, TemplateError> {
        Self::with_templates(&Template::all()?, lexicon)
    }

    pub fn with_templates(templates: &[Template], lexicon: &Lexicon) -> Result<Self, TemplateError> {
        let templates = templates
            .iter()
            .map(|template| compile_template(template, lexicon))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { templates })
    }

    pub fn templates(&self) -> &[CompiledTemplate] {
        &self.templates
    }

    /// Find every template occurrence in `sentence`, sorted
    pub fn find(&self, sentence: &str) -> Vec<MatchRecord> {
        self.find_normalized(&normalize(sentence))
    }

    fn find_normalized(&self, text: &str) -> Vec<MatchRecord> {
        let mut results = Vec::new();
        if text.is_empty() {
            return results;
        }

        for template in &self.templates {
            if !template.can_match() {
                continue;
            }
            results.extend(
                scan(template, text)
                    .into_iter()
                    .map(|span| make_record(template.id, text, span)),
            );
        }

        results.sort_by_key(MatchRecord::sort_key);
        results
    }
}

/// Leftmost, non-overlapping template bodies, left to right.
///
/// Token boundaries are enforced by the compiled expression: a span starts
/// and ends at token edges, or next to punctuation attached to the token.
fn scan(template: &CompiledTemplate, text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(span) = template.find_at(text, pos) {
        if span.is_empty() {
            break;
        }
        trace!(template = %template.id, start = span.start, end = span.end, "matched");
        pos = span.end;
        spans.push(span);
    }

    spans
}

fn make_record(template: TemplateId, text: &str, span: Range<usize>) -> MatchRecord {
    // Index of the token containing the first matched character
    let token_start = text[..span.start].rfind(' ').map_or(0, |i| i + 1);
    let start_word = text[..token_start].split_whitespace().count();
    let matched_text = &text[span];
    let words: Vec<String> = matched_text.split_whitespace().map(str::to_string).collect();

    MatchRecord {
        template,
        matched_text: matched_text.to_string(),
        start_word,
        end_word: start_word + words.len(),
        words,
    }
}

/// Result of analyzing one sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// The sentence after whitespace normalization
    pub sentence: String,
    pub words: Vec<String>,
    pub matches: Vec<MatchRecord>,
}

impl Analysis {
    pub fn found(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// A loaded lexicon together with the templates compiled from it
#[derive(Debug)]
pub struct Analyzer {
    lexicon: Lexicon,
    matcher: Matcher,
}

impl Analyzer {
    pub fn new(lexicon: Lexicon) -> Result<Self, TemplateError> {
        let matcher = Matcher::new(&lexicon)?;
        Ok(Self { lexicon, matcher })
    }

    pub fn from_source<S: LexiconSource + ?Sized>(source: &S) -> Result<Self, AnalyzerError> {
        Ok(Self::new(Lexicon::load(source)?)?)
    }

    pub fn from_data_dir(root: impl AsRef<Path>) -> Result<Self, AnalyzerError> {
        Ok(Self::new(Lexicon::from_data_dir(root)?)?)
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn find(&self, sentence: &str) -> Vec<MatchRecord> {
        self.matcher.find(sentence)
    }

    pub fn analyze(&self, sentence: &str) -> Analysis {
        let sentence = normalize(sentence);
        let matches = self.matcher.find_normalized(&sentence);
        let words = sentence.split_whitespace().map(str::to_string).collect();
        Analysis {
            sentence,
            words,
            matches,
        }
    }
}

/// Compile the templates for `lexicon` and search one sentence
pub fn find_leamanyi(sentence: &str, lexicon: &Lexicon) -> Result<Vec<MatchRecord>, TemplateError> {
    Ok(Matcher::new(lexicon)?.find(sentence))
}
