//! Lexicon loading
//!
//! The templates draw their word alternatives from eight closed word lists.
//! A [`LexiconSource`] locates the raw line-oriented text for each
//! [`Category`]; [`Lexicon::load`] parses and interns the tokens once and
//! hands out a read-only view.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use bstr::ByteSlice;
use lasso::{Rodeo, RodeoReader, Spur};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::corpus::open_reader;

/// The eight word classes a lexicon must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Concord-marker stems (`cc`)
    ConcordStems,
    /// Role class used by template B (`l01`)
    Role1,
    /// Role class used in the optional segment of template A (`l02`)
    Role2,
    /// Role class used by template C (`l03`)
    Role3,
    /// Pronouns (`pro`)
    Pronoun,
    /// Relative verb forms used by template A (`vng`)
    VerbFormA,
    /// Relative verb forms used by template B (`vnge`)
    VerbFormB,
    /// Nouns (`noun`)
    Noun,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::ConcordStems,
        Category::Role1,
        Category::Role2,
        Category::Role3,
        Category::Pronoun,
        Category::VerbFormA,
        Category::VerbFormB,
        Category::Noun,
    ];

    /// File stem of the word list in a data directory
    pub fn stem(self) -> &'static str {
        match self {
            Category::ConcordStems => "cc",
            Category::Role1 => "l01",
            Category::Role2 => "l02",
            Category::Role3 => "l03",
            Category::Pronoun => "pro",
            Category::VerbFormA => "vng",
            Category::VerbFormB => "vnge",
            Category::Noun => "noun",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

/// Errors raised while assembling a lexicon
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("missing lexicon resource for category `{category}`")]
    MissingResource { category: Category },

    #[error("failed to read lexicon resource {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Anything that can produce the raw word-list text for a category.
///
/// Returning an empty list means the category could not be located.
pub trait LexiconSource {
    fn resources(&self, category: Category) -> Result<Vec<String>, LexiconError>;
}

/// Word lists stored as `<stem>.txt` or `<stem>.txt.gz` in one directory
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn candidates(&self, category: Category) -> [PathBuf; 2] {
        let stem = category.stem();
        [
            self.root.join(format!("{stem}.txt")),
            self.root.join(format!("{stem}.txt.gz")),
        ]
    }
}

impl LexiconSource for DirSource {
    fn resources(&self, category: Category) -> Result<Vec<String>, LexiconError> {
        let mut texts = Vec::new();
        for path in self.candidates(category) {
            if path.is_file() {
                texts.push(read_resource(&path)?);
            }
        }
        Ok(texts)
    }
}

fn read_resource(path: &Path) -> Result<String, LexiconError> {
    let io_err = |source| LexiconError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = open_reader(path).map_err(io_err)?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(io_err)?;
    Ok(bytes.to_str_lossy().into_owned())
}

/// In-memory word lists, keyed by category
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    texts: FxHashMap<Category, Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource for `category` (builder style)
    pub fn with(mut self, category: Category, text: &str) -> Self {
        self.insert(category, text);
        self
    }

    pub fn insert(&mut self, category: Category, text: &str) {
        self.texts
            .entry(category)
            .or_default()
            .push(text.to_string());
    }
}

impl LexiconSource for MemorySource {
    fn resources(&self, category: Category) -> Result<Vec<String>, LexiconError> {
        Ok(self.texts.get(&category).cloned().unwrap_or_default())
    }
}

/// Parse one word list: one token per line, `#` starts a comment line.
pub fn parse_wordlist(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Immutable set of word lists, with all tokens interned in one pool
pub struct Lexicon {
    strings: RodeoReader,
    classes: [Vec<Spur>; 8],
}

impl Lexicon {
    /// Load every category from `source`.
    ///
    /// Fails on the first category the source cannot provide.
    pub fn load<S: LexiconSource + ?Sized>(source: &S) -> Result<Self, LexiconError> {
        let mut rodeo = Rodeo::default();
        let mut classes: [Vec<Spur>; 8] = Default::default();

        for category in Category::ALL {
            let texts = source.resources(category)?;
            if texts.is_empty() {
                return Err(LexiconError::MissingResource { category });
            }

            let class = &mut classes[category.index()];
            for text in &texts {
                class.extend(parse_wordlist(text).into_iter().map(|w| rodeo.get_or_intern(w)));
            }
            debug!(%category, resources = texts.len(), tokens = class.len(), "loaded word list");
        }

        let lexicon = Self {
            strings: rodeo.into_reader(),
            classes,
        };
        info!(
            tokens = lexicon.classes.iter().map(Vec::len).sum::<usize>(),
            distinct = lexicon.strings.len(),
            "lexicon ready"
        );
        Ok(lexicon)
    }

    /// Load the word lists from a data directory
    pub fn from_data_dir(root: impl AsRef<Path>) -> Result<Self, LexiconError> {
        Self::load(&DirSource::new(root))
    }

    pub fn word_class(&self, category: Category) -> WordClass<'_> {
        WordClass {
            category,
            lexicon: self,
        }
    }
}

impl fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                Category::ALL
                    .iter()
                    .map(|c| (c.stem(), self.classes[c.index()].len())),
            )
            .finish()
    }
}

/// Borrowed view of one category's tokens, in file order
#[derive(Clone, Copy)]
pub struct WordClass<'a> {
    category: Category,
    lexicon: &'a Lexicon,
}

impl<'a> WordClass<'a> {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'a str> + use<'a> {
        let lexicon: &'a Lexicon = self.lexicon;
        self.keys().iter().map(move |key| lexicon.strings.resolve(key))
    }

    fn keys(&self) -> &'a [Spur] {
        let lexicon: &'a Lexicon = self.lexicon;
        &lexicon.classes[self.category.index()]
    }
}

impl fmt::Debug for WordClass<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    /// A source with one token list per category, given in `Category::ALL` order
    pub(crate) fn memory_source(lists: [&[&str]; 8]) -> MemorySource {
        Category::ALL
            .iter()
            .zip(lists)
            .fold(MemorySource::new(), |source, (category, words)| {
                source.with(*category, &words.join("\n"))
            })
    }

    #[test]
    fn test_parse_wordlist_skips_comments_and_blanks() {
        let text = "# header\n\n  tsamaya  \n\t# indented comment\nbua\r\nbua\n";
        assert_eq!(parse_wordlist(text), vec!["tsamaya", "bua", "bua"]);
    }

    #[test]
    fn test_load_preserves_order_and_duplicates() {
        let source = memory_source([
            &["yo", "o"],
            &["sa"],
            &["a", "tla", "a"],
            &["nang"],
            &["ene"],
            &["tsamayang"],
            &["tsamaeng"],
            &["ntlo"],
        ]);
        let lexicon = Lexicon::load(&source).unwrap();

        let role2 = lexicon.word_class(Category::Role2);
        assert_eq!(role2.category(), Category::Role2);
        assert_eq!(role2.iter().collect::<Vec<_>>(), vec!["a", "tla", "a"]);
        assert_eq!(lexicon.word_class(Category::ConcordStems).len(), 2);
        assert!(!lexicon.word_class(Category::Noun).is_empty());
    }

    #[test]
    fn test_missing_category_is_reported() {
        let source = Category::ALL
            .iter()
            .filter(|c| **c != Category::Noun)
            .fold(MemorySource::new(), |s, c| s.with(*c, "x"));

        match Lexicon::load(&source) {
            Err(LexiconError::MissingResource { category }) => {
                assert_eq!(category, Category::Noun)
            }
            other => panic!("expected MissingResource, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_resource_message_names_category() {
        let err = LexiconError::MissingResource {
            category: Category::VerbFormB,
        };
        assert_eq!(err.to_string(), "missing lexicon resource for category `vnge`");
    }

    #[test]
    fn test_empty_category_is_allowed() {
        let source = memory_source([&["yo"], &[], &[], &[], &[], &[], &[], &[]]);
        let lexicon = Lexicon::load(&source).unwrap();
        assert!(lexicon.word_class(Category::Noun).is_empty());
    }

    #[test]
    fn test_dir_source_reads_plain_and_gzip() {
        let dir = tempfile::tempdir().unwrap();
        for category in Category::ALL {
            if category == Category::Noun {
                continue;
            }
            std::fs::write(dir.path().join(format!("{}.txt", category.stem())), "x\n").unwrap();
        }

        // Nouns split across a plain and a compressed file
        std::fs::write(dir.path().join("noun.txt"), "ntlo\n").unwrap();
        let file = std::fs::File::create(dir.path().join("noun.txt.gz")).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(b"# nouns\nkoloi\nmadi\n").unwrap();
        encoder.finish().unwrap();

        let source = DirSource::new(dir.path());
        assert_eq!(source.root(), dir.path());
        let lexicon = Lexicon::load(&source).unwrap();
        let nouns: Vec<_> = lexicon.word_class(Category::Noun).iter().collect();
        assert_eq!(nouns, vec!["ntlo", "koloi", "madi"]);
    }

    #[test]
    fn test_dir_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cc.txt"), "yo\n").unwrap();

        let err = Lexicon::from_data_dir(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            LexiconError::MissingResource {
                category: Category::Role1
            }
        ));
    }
}
