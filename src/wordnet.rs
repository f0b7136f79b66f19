//! WordNet dictionary reader.
//!
//! Loads the `index.*`, `data.*` and `*.exc` files of a WordNet 3.x `dict/`
//! directory and answers synonym queries the same way the usual WordNet
//! corpus readers do: every synset of every base form of the word becomes one
//! group of lemma names, without the queried word itself.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, WordGraphError};
use crate::synonyms::SynonymSource;

/// Part of speech, in lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pos {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl Pos {
    pub const ALL: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adjective, Pos::Adverb];

    fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adjective => "adj",
            Pos::Adverb => "adv",
        }
    }

    /// Detachment rules used to reduce inflected forms to base forms.
    fn substitutions(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Pos::Noun => &[
                ("s", ""),
                ("ses", "s"),
                ("ves", "f"),
                ("xes", "x"),
                ("zes", "z"),
                ("ches", "ch"),
                ("shes", "sh"),
                ("men", "man"),
                ("ies", "y"),
            ],
            Pos::Verb => &[
                ("s", ""),
                ("ies", "y"),
                ("es", "e"),
                ("es", ""),
                ("ed", "e"),
                ("ed", ""),
                ("ing", "e"),
                ("ing", ""),
            ],
            Pos::Adjective => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
            Pos::Adverb => &[],
        }
    }
}

#[derive(Debug, Default)]
struct PosTable {
    /// lemma -> synset offsets, in sense order
    index: HashMap<String, Vec<u64>>,
    /// synset offset -> lemma names
    synsets: HashMap<u64, Vec<String>>,
    /// inflected form -> base forms
    exceptions: HashMap<String, Vec<String>>,
}

/// A WordNet dictionary held in memory.
#[derive(Debug)]
pub struct WordNet {
    tables: Vec<(Pos, PosTable)>,
}

impl WordNet {
    /// Load a dictionary from a WordNet `dict/` directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut tables = Vec::with_capacity(Pos::ALL.len());
        for pos in Pos::ALL {
            let suffix = pos.file_suffix();
            let table = PosTable {
                index: read_index(&dir.join(format!("index.{suffix}")))?,
                synsets: read_data(&dir.join(format!("data.{suffix}")))?,
                exceptions: read_exceptions(&dir.join(format!("{suffix}.exc")))?,
            };
            debug!(
                pos = suffix,
                lemmas = table.index.len(),
                synsets = table.synsets.len(),
                "loaded WordNet tables"
            );
            tables.push((pos, table));
        }
        info!(dir = %dir.display(), "opened WordNet dictionary");
        Ok(WordNet { tables })
    }

    /// Base forms of `form` that appear in the index for one part of speech.
    fn morphy(table: &PosTable, pos: Pos, form: &str) -> Vec<String> {
        if let Some(bases) = table.exceptions.get(form) {
            let mut forms = vec![form.to_string()];
            forms.extend(bases.iter().cloned());
            return filter_forms(table, &forms);
        }

        let mut forms = apply_rules(pos, &[form.to_string()]);
        let mut candidates = vec![form.to_string()];
        candidates.extend(forms.iter().cloned());
        let found = filter_forms(table, &candidates);
        if !found.is_empty() {
            return found;
        }
        while !forms.is_empty() {
            forms = apply_rules(pos, &forms);
            let found = filter_forms(table, &forms);
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }
}

fn apply_rules(pos: Pos, forms: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for form in forms {
        for (old, new) in pos.substitutions() {
            if let Some(stem) = form.strip_suffix(old) {
                out.push(format!("{stem}{new}"));
            }
        }
    }
    out
}

fn filter_forms(table: &PosTable, forms: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for form in forms {
        if table.index.contains_key(form) && !result.contains(form) {
            result.push(form.clone());
        }
    }
    result
}

impl SynonymSource for WordNet {
    fn synonym_groups(&self, word: &str) -> Vec<Vec<String>> {
        let lemma = word.trim().to_lowercase().replace(' ', "_");
        let mut groups = Vec::new();
        for (pos, table) in &self.tables {
            for form in Self::morphy(table, *pos, &lemma) {
                let Some(offsets) = table.index.get(&form) else {
                    continue;
                };
                for offset in offsets {
                    let Some(names) = table.synsets.get(offset) else {
                        continue;
                    };
                    let group: BTreeSet<&String> =
                        names.iter().filter(|name| name.as_str() != word).collect();
                    groups.push(group.into_iter().cloned().collect());
                }
            }
        }
        groups
    }
}

fn open_lines(path: &Path) -> Result<impl Iterator<Item = (usize, std::io::Result<String>)>> {
    let file = File::open(path).map_err(|e| WordGraphError::file(path, e))?;
    Ok(BufReader::new(file)
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line)))
}

fn malformed(path: &Path, line: usize, message: impl Into<String>) -> WordGraphError {
    WordGraphError::WordNet {
        path: PathBuf::from(path),
        line,
        message: message.into(),
    }
}

/// `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt tagsense_cnt offset...`
fn read_index(path: &Path) -> Result<HashMap<String, Vec<u64>>> {
    let mut index = HashMap::new();
    for (lineno, line) in open_lines(path)? {
        let line = line?;
        if line.starts_with(' ') || line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let count = |i: usize| -> Result<usize> {
            fields
                .get(i)
                .and_then(|f| f.parse().ok())
                .ok_or_else(|| malformed(path, lineno, format!("bad count in field {i}")))
        };
        let synset_cnt = count(2)?;
        let p_cnt = count(3)?;
        let first = 4 + p_cnt + 2;
        let offsets = fields
            .get(first..first + synset_cnt)
            .ok_or_else(|| malformed(path, lineno, "too few synset offsets"))?
            .iter()
            .map(|f| {
                f.parse::<u64>()
                    .map_err(|_| malformed(path, lineno, format!("bad offset '{f}'")))
            })
            .collect::<Result<Vec<_>>>()?;
        index.insert(fields[0].to_string(), offsets);
    }
    Ok(index)
}

/// `offset lex_filenum ss_type w_cnt word lex_id [word lex_id...] p_cnt ...`
fn read_data(path: &Path) -> Result<HashMap<u64, Vec<String>>> {
    let mut synsets = HashMap::new();
    for (lineno, line) in open_lines(path)? {
        let line = line?;
        if line.starts_with(' ') || line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let offset = fields
            .first()
            .and_then(|f| f.parse::<u64>().ok())
            .ok_or_else(|| malformed(path, lineno, "bad synset offset"))?;
        let w_cnt = fields
            .get(3)
            .and_then(|f| usize::from_str_radix(f, 16).ok())
            .ok_or_else(|| malformed(path, lineno, "bad word count"))?;
        let words = (0..w_cnt)
            .map(|i| {
                fields
                    .get(4 + 2 * i)
                    .map(|w| strip_adjective_marker(w).to_string())
                    .ok_or_else(|| malformed(path, lineno, "too few words"))
            })
            .collect::<Result<Vec<_>>>()?;
        synsets.insert(offset, words);
    }
    Ok(synsets)
}

/// `inflected base [base...]`. The file is optional.
fn read_exceptions(path: &Path) -> Result<HashMap<String, Vec<String>>> {
    if !path.exists() {
        debug!(path = %path.display(), "no exception list");
        return Ok(HashMap::new());
    }
    let mut exceptions = HashMap::new();
    for (_, line) in open_lines(path)? {
        let line = line?;
        if line.starts_with(' ') {
            continue;
        }
        let mut fields = line.split_whitespace();
        if let Some(form) = fields.next() {
            exceptions.insert(form.to_string(), fields.map(str::to_string).collect());
        }
    }
    Ok(exceptions)
}

fn strip_adjective_marker(word: &str) -> &str {
    ["(a)", "(p)", "(ip)"]
        .iter()
        .find_map(|marker| word.strip_suffix(marker))
        .unwrap_or(word)
}
