//! Synonym lookup.
//!
//! A [`SynonymSource`] answers with groups of synonyms, one group per sense of
//! the word. Callers that only care about neighbours use
//! [`SynonymSource::synonyms`], which concatenates the groups in order.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Result, WordGraphError};
use crate::wordnet::WordNet;

pub trait SynonymSource {
    /// Synonym groups for `word`. Unknown words yield an empty vector.
    fn synonym_groups(&self, word: &str) -> Vec<Vec<String>>;

    /// All synonyms of `word`, flattened across groups.
    fn synonyms(&self, word: &str) -> Vec<String> {
        self.synonym_groups(word).into_iter().flatten().collect()
    }
}

impl<S: SynonymSource + ?Sized> SynonymSource for &S {
    fn synonym_groups(&self, word: &str) -> Vec<Vec<String>> {
        (**self).synonym_groups(word)
    }
}

impl<S: SynonymSource + ?Sized> SynonymSource for Box<S> {
    fn synonym_groups(&self, word: &str) -> Vec<Vec<String>> {
        (**self).synonym_groups(word)
    }
}

/// In-memory thesaurus keyed by word.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(transparent)]
pub struct Thesaurus(HashMap<String, Vec<Vec<String>>>);

impl Thesaurus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a thesaurus from a JSON object mapping words to synonym groups.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| WordGraphError::file(path, e))?;
        let thesaurus: Thesaurus = serde_json::from_reader(BufReader::new(file))?;
        info!(entries = thesaurus.len(), path = %path.display(), "loaded thesaurus");
        Ok(thesaurus)
    }

    /// Append a synonym group for `word`.
    pub fn insert<I, T>(&mut self, word: &str, group: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.0
            .entry(word.to_string())
            .or_default()
            .push(group.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl SynonymSource for Thesaurus {
    fn synonym_groups(&self, word: &str) -> Vec<Vec<String>> {
        self.0.get(word).cloned().unwrap_or_default()
    }
}

/// Open the configured synonym source. A thesaurus file takes precedence over
/// a WordNet directory.
pub fn open_source(
    wordnet_dir: Option<&Path>,
    thesaurus_file: Option<&Path>,
) -> Result<Box<dyn SynonymSource>> {
    match (thesaurus_file, wordnet_dir) {
        (Some(file), _) => Ok(Box::new(Thesaurus::from_json_file(file)?)),
        (None, Some(dir)) => Ok(Box::new(WordNet::open(dir)?)),
        (None, None) => Err(WordGraphError::NoSynonymSource),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> Thesaurus {
        let mut t = Thesaurus::new();
        t.insert("dog", ["domestic_dog", "Canis_familiaris"]);
        t.insert("dog", Vec::<String>::new());
        t.insert("dog", ["frump"]);
        t
    }

    #[test]
    fn test_synonyms_flatten_groups_in_order() {
        let t = sample();
        assert_eq!(
            t.synonyms("dog"),
            vec!["domestic_dog", "Canis_familiaris", "frump"]
        );
        assert_eq!(t.synonym_groups("dog").len(), 3);
    }

    #[test]
    fn test_unknown_word_is_empty() {
        let t = sample();
        assert!(t.synonyms("zzyzx").is_empty());
        assert!(t.synonym_groups("").is_empty());
    }

    #[test]
    fn test_thesaurus_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"book": [["volume"], ["ledger", "leger"]], "cat": []}}"#).unwrap();

        let t = Thesaurus::from_json_file(file.path()).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.synonyms("book"), vec!["volume", "ledger", "leger"]);
        assert!(t.synonyms("cat").is_empty());
    }

    #[test]
    fn test_open_source_requires_a_source() {
        assert!(matches!(
            open_source(None, None),
            Err(WordGraphError::NoSynonymSource)
        ));
    }

    #[test]
    fn test_open_source_missing_thesaurus_reports_path() {
        let err = match open_source(None, Some(Path::new("/nonexistent/thesaurus.json"))) {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };
        assert!(err.to_string().contains("/nonexistent/thesaurus.json"));
    }
}
