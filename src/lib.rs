//! Leamanyi: lexicon-driven detection of Setswana relative structures
//!
//! Finds occurrences of three relative-clause templates in plain sentences,
//! using closed word lists for each grammatical category.
//! Core implementation in Rust with Python bindings.

pub mod compiler; // Template compilation to regular expressions
pub mod corpus; // Line-oriented sentence input
pub mod lexicon; // Word lists and their sources
pub mod parser; // Template notation parser
pub mod pattern; // Template AST and concord table
pub mod report; // Text and JSON Lines output
pub mod searcher; // End-to-end search (lexicon + compiler + scan)

// Python bindings
#[cfg(feature = "pyo3")]
pub mod python;

// Re-exports for convenience
pub use compiler::CompiledTemplate;
pub use corpus::{Corpus, CorpusError, Sentence, SentenceReader};
pub use lexicon::{Category, DirSource, Lexicon, LexiconError, LexiconSource, MemorySource};
pub use parser::{TemplateError, parse_template};
pub use pattern::{CONCORD_PAIRS, ConcordPair, Slot, Template, TemplateId};
pub use searcher::{
    Analysis, Analyzer, AnalyzerError, MatchRecord, Matcher, find_leamanyi, normalize,
};
