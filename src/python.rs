//! Python bindings for leamanyi
//!
//! This module provides PyO3-based Python bindings for the Rust core.

use pyo3::exceptions::{PyFileNotFoundError, PyIOError, PyValueError};
use pyo3::prelude::*;
use std::sync::Arc;

use crate::lexicon::LexiconError;
use crate::searcher::{Analyzer as RustAnalyzer, AnalyzerError, MatchRecord};

/// Convert AnalyzerError to Python exception
impl From<AnalyzerError> for PyErr {
    fn from(err: AnalyzerError) -> PyErr {
        match err {
            AnalyzerError::Lexicon(e @ LexiconError::MissingResource { .. }) => {
                PyFileNotFoundError::new_err(e.to_string())
            }
            AnalyzerError::Lexicon(e @ LexiconError::Io { .. }) => PyIOError::new_err(e.to_string()),
            AnalyzerError::Template(e) => PyValueError::new_err(e.to_string()),
        }
    }
}

/// One relative structure found in a sentence.
#[pyclass(name = "Match")]
#[derive(Clone)]
pub struct PyMatch {
    inner: MatchRecord,
}

#[pymethods]
impl PyMatch {
    /// Template letter: "A", "B" or "C"
    #[getter]
    fn template(&self) -> String {
        self.inner.template.to_string()
    }

    #[getter]
    fn pattern_name(&self) -> String {
        self.inner.pattern_name()
    }

    #[getter]
    fn matched_text(&self) -> String {
        self.inner.matched_text.clone()
    }

    #[getter]
    fn start_word(&self) -> usize {
        self.inner.start_word
    }

    #[getter]
    fn end_word(&self) -> usize {
        self.inner.end_word
    }

    #[getter]
    fn words(&self) -> Vec<String> {
        self.inner.words.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "<Match {} words[{}:{}] '{}'>",
            self.inner.template, self.inner.start_word, self.inner.end_word, self.inner.matched_text
        )
    }
}

/// Word lists loaded from a data directory, with the templates compiled.
///
/// Load once and reuse across sentences.
///
/// Args:
///     data_dir: Directory holding cc.txt, l01.txt, ... (default "data")
///
/// Raises:
///     FileNotFoundError: If a word list is missing
///     ValueError: If a template cannot be compiled
///
/// Example:
///     >>> analyzer = Analyzer("data")
///     >>> for m in analyzer.find("Monna yo o tsamayang"):
///     ...     print(m.pattern_name, m.words)
#[pyclass(name = "Analyzer")]
#[derive(Clone)]
pub struct PyAnalyzer {
    inner: Arc<RustAnalyzer>,
}

#[pymethods]
impl PyAnalyzer {
    #[new]
    #[pyo3(signature = (data_dir="data"))]
    fn new(data_dir: &str) -> PyResult<Self> {
        Ok(PyAnalyzer {
            inner: Arc::new(RustAnalyzer::from_data_dir(data_dir)?),
        })
    }

    /// Find every relative structure in `sentence`, in reading order.
    fn find(&self, sentence: &str) -> Vec<PyMatch> {
        wrap_matches(self.inner.find(sentence))
    }

    fn __repr__(&self) -> String {
        format!("<Analyzer {:?}>", self.inner.lexicon())
    }
}

fn wrap_matches(records: Vec<MatchRecord>) -> Vec<PyMatch> {
    records.into_iter().map(|inner| PyMatch { inner }).collect()
}

/// Load the word lists from `data_dir` and analyze one sentence.
///
/// Prefer Analyzer when analyzing more than one sentence.
#[pyfunction(name = "find_leamanyi")]
#[pyo3(signature = (sentence, data_dir="data"))]
fn py_find_leamanyi(sentence: &str, data_dir: &str) -> PyResult<Vec<PyMatch>> {
    let analyzer = RustAnalyzer::from_data_dir(data_dir)?;
    Ok(wrap_matches(analyzer.find(sentence)))
}

#[pymodule]
fn leamanyi(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAnalyzer>()?;
    m.add_class::<PyMatch>()?;

    m.add_function(wrap_pyfunction!(py_find_leamanyi, m)?)?;

    Ok(())
}
