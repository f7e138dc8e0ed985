//! Rendering analyses for people and for tools
//!
//! Two formats: a human-readable block per sentence, and JSON Lines with one
//! object per sentence.

use std::io::{self, Write};

use serde::Serialize;

use crate::pattern::TemplateId;
use crate::searcher::{Analysis, MatchRecord};

/// Write the human-readable report for one sentence.
///
/// The sentence is printed normalized, since word spans index into that form.
pub fn write_text<W: Write>(out: &mut W, analysis: &Analysis) -> io::Result<()> {
    writeln!(out, "Sentence: {}", analysis.sentence)?;
    if !analysis.found() {
        writeln!(out, "Result: NO Leamanyi (Relative) structure detected.")?;
        return Ok(());
    }

    writeln!(out, "Result: FOUND {} match(es).", analysis.matches.len())?;
    for (i, record) in analysis.matches.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, record.pattern_name())?;
        writeln!(out, "     Span: words[{}:{}]", record.start_word, record.end_word)?;
        writeln!(out, "     Match: {:?}", record.matched_text)?;
        writeln!(out, "     Words: {:?}", record.words)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct MatchView<'a> {
    template: TemplateId,
    pattern: String,
    matched_text: &'a str,
    start_word: usize,
    end_word: usize,
    words: &'a [String],
}

impl<'a> From<&'a MatchRecord> for MatchView<'a> {
    fn from(record: &'a MatchRecord) -> Self {
        Self {
            template: record.template,
            pattern: record.pattern_name(),
            matched_text: &record.matched_text,
            start_word: record.start_word,
            end_word: record.end_word,
            words: &record.words,
        }
    }
}

#[derive(Serialize)]
struct AnalysisView<'a> {
    sentence: &'a str,
    words: &'a [String],
    matches: Vec<MatchView<'a>>,
}

/// Write one JSON object for the sentence, followed by a newline
pub fn write_json<W: Write>(out: &mut W, analysis: &Analysis) -> io::Result<()> {
    let view = AnalysisView {
        sentence: &analysis.sentence,
        words: &analysis.words,
        matches: analysis.matches.iter().map(MatchView::from).collect(),
    };
    serde_json::to_writer(&mut *out, &view)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(matches: Vec<MatchRecord>) -> Analysis {
        Analysis {
            sentence: "Monna yo o tsamaya".to_string(),
            words: vec!["Monna", "yo", "o", "tsamaya"]
                .into_iter()
                .map(String::from)
                .collect(),
            matches,
        }
    }

    fn record() -> MatchRecord {
        MatchRecord {
            template: TemplateId::A,
            matched_text: "yo o tsamaya".to_string(),
            start_word: 1,
            end_word: 4,
            words: vec!["yo".to_string(), "o".to_string(), "tsamaya".to_string()],
        }
    }

    fn render_text(analysis: &Analysis) -> String {
        let mut out = Vec::new();
        write_text(&mut out, analysis).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_no_match() {
        assert_eq!(
            render_text(&analysis(vec![])),
            "Sentence: Monna yo o tsamaya\nResult: NO Leamanyi (Relative) structure detected.\n"
        );
    }

    #[test]
    fn test_text_with_match() {
        let expected = "\
Sentence: Monna yo o tsamaya
Result: FOUND 1 match(es).
  1. Pattern A (Vng)
     Span: words[1:4]
     Match: \"yo o tsamaya\"
     Words: [\"yo\", \"o\", \"tsamaya\"]
";
        assert_eq!(render_text(&analysis(vec![record()])), expected);
    }

    #[test]
    fn test_json_line() {
        let mut out = Vec::new();
        write_json(&mut out, &analysis(vec![record()])).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["sentence"], "Monna yo o tsamaya");
        assert_eq!(value["words"].as_array().unwrap().len(), 4);
        let m = &value["matches"][0];
        assert_eq!(m["template"], "A");
        assert_eq!(m["pattern"], "Pattern A (Vng)");
        assert_eq!(m["matched_text"], "yo o tsamaya");
        assert_eq!(m["start_word"], 1);
        assert_eq!(m["end_word"], 4);
    }
}
