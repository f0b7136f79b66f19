//! Sequential builder: one synonym lookup per vocabulary word.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, WordGraphError};
use crate::synonyms::SynonymSource;

/// Word -> synonyms, in first-insertion order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AdjacencyMap {
    entries: Vec<(String, Vec<String>)>,
    positions: HashMap<String, usize>,
}

impl AdjacencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.positions
            .get(word)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.positions.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(word, synonyms)| (word.as_str(), synonyms.as_slice()))
    }

    /// Returns `false` and leaves the map untouched when `word` is present.
    fn insert(&mut self, word: String, synonyms: Vec<String>) -> bool {
        if self.positions.contains_key(&word) {
            return false;
        }
        self.positions.insert(word.clone(), self.entries.len());
        self.entries.push((word, synonyms));
        true
    }
}

/// Read a newline-delimited word list. Lines are trimmed; blank lines are
/// skipped.
pub fn read_word_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| WordGraphError::file(path, e))?;
    let mut words = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }
    info!(words = words.len(), path = %path.display(), "read word list");
    Ok(words)
}

/// Look up every distinct word once.
pub fn build_adjacency<S, W>(source: &S, words: &[W]) -> AdjacencyMap
where
    S: SynonymSource + ?Sized,
    W: AsRef<str>,
{
    let mut adjacency = AdjacencyMap::new();
    for (i, word) in words.iter().enumerate() {
        let word = word.as_ref();
        if adjacency.contains(word) {
            continue;
        }
        adjacency.insert(word.to_string(), source.synonyms(word));
        if (i + 1) % 10_000 == 0 {
            debug!(done = i + 1, total = words.len(), "looking up synonyms");
        }
    }
    info!(entries = adjacency.len(), "built adjacency map");
    adjacency
}
