//! Sentence corpora
//!
//! Provides line-oriented sentence input for batch analysis:
//! - Reading sentences from a string, a file, or a list of files
//! - Transparent gzip decompression for `.gz` paths
//! - Running an [`Analyzer`] over every sentence
//!
//! Blank lines and lines starting with `#` are skipped. Line numbers are
//! 1-based and count every physical line, skipped or not.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use bstr::ByteSlice;
use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::warn;

use crate::searcher::{Analysis, Analyzer};

/// Error while reading sentences
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("I/O error at line {line_num}: {source}")]
    Io { line_num: usize, source: io::Error },

    #[error("failed to open {path:?}: {source}")]
    FileOpen { path: PathBuf, source: io::Error },
}

/// Open a file for buffered reading, decompressing if the path ends in `.gz`
pub(crate) fn open_reader(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// One input sentence and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub line_num: usize,
    pub text: String,
}

/// Iterator over the sentences of a line-oriented reader
pub struct SentenceReader<R: BufRead> {
    reader: R,
    line_num: usize,
    buf: Vec<u8>,
    done: bool,
}

impl SentenceReader<Box<dyn BufRead>> {
    /// Create a reader from a file path
    pub fn from_file(path: &Path) -> Result<Self, CorpusError> {
        let reader = open_reader(path).map_err(|source| CorpusError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(reader))
    }
}

impl SentenceReader<Cursor<String>> {
    /// Create a reader from in-memory text
    pub fn from_string(text: &str) -> Self {
        Self::new(Cursor::new(text.to_string()))
    }
}

impl<R: BufRead> SentenceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_num: 0,
            buf: Vec::new(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for SentenceReader<R> {
    type Item = Result<Sentence, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line_num += 1;
                    let line = self.buf.trim();
                    if line.is_empty() || line.starts_with(b"#") {
                        continue;
                    }
                    return Some(Ok(Sentence {
                        line_num: self.line_num,
                        text: line.to_str_lossy().into_owned(),
                    }));
                }
                Err(source) => {
                    // A failed read leaves the stream position unknown; stop here
                    self.done = true;
                    return Some(Err(CorpusError::Io {
                        line_num: self.line_num + 1,
                        source,
                    }));
                }
            }
        }
        None
    }
}

/// Where a corpus gets its text
#[derive(Debug, Clone)]
enum SentenceSource {
    /// In-memory text
    String(String),
    /// Single file path
    File(PathBuf),
    /// Several files, read in the given order
    Files(Vec<PathBuf>),
}

/// Collection of sentences from a string, a file, or several files
///
/// Errors (file open, read errors) are logged and the affected file is
/// skipped, so iteration itself never fails.
///
/// # Examples
///
/// ```no_run
/// use leamanyi::{Analyzer, Corpus};
///
/// let analyzer = Analyzer::from_data_dir("data").unwrap();
/// for (sentence, analysis) in Corpus::from_file("sentences.txt").analyze(&analyzer) {
///     println!("{}: {} match(es)", sentence.line_num, analysis.matches.len());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Corpus {
    source: SentenceSource,
}

impl Corpus {
    /// Create from in-memory text, one sentence per line
    pub fn from_string(text: &str) -> Self {
        Self {
            source: SentenceSource::String(text.to_string()),
        }
    }

    /// Create from a single file path
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            source: SentenceSource::File(path.as_ref().to_path_buf()),
        }
    }

    /// Create from explicit file paths
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            source: SentenceSource::Files(paths),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = Sentence>> {
        self.clone().into_iter()
    }

    /// Analyze every sentence, in input order
    pub fn analyze<'a>(
        &self,
        analyzer: &'a Analyzer,
    ) -> impl Iterator<Item = (Sentence, Analysis)> + use<'a> {
        self.iter().map(move |sentence| {
            let analysis = analyzer.analyze(&sentence.text);
            (sentence, analysis)
        })
    }
}

impl IntoIterator for Corpus {
    type Item = Sentence;
    type IntoIter = Box<dyn Iterator<Item = Self::Item>>;

    fn into_iter(self) -> Self::IntoIter {
        match self.source {
            SentenceSource::String(text) => Box::new(
                SentenceReader::new(Cursor::new(text)).filter_map(Result::ok),
            ),
            SentenceSource::File(path) => open_file_sentences(path),
            SentenceSource::Files(paths) => Box::new(paths.into_iter().flat_map(open_file_sentences)),
        }
    }
}

/// Open a file and return an iterator over its sentences
///
/// Open and read errors are logged and end the iteration for that file.
fn open_file_sentences(path: PathBuf) -> Box<dyn Iterator<Item = Sentence>> {
    match SentenceReader::from_file(&path) {
        Ok(reader) => Box::new(reader.filter_map(move |result| match result {
            Ok(sentence) => Some(sentence),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "stopped reading sentences");
                None
            }
        })),
        Err(e) => {
            warn!(error = %e, "skipping sentence file");
            Box::new(std::iter::empty())
        }
    }
}
