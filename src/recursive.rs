//! Recursive builder: expand synonyms of a seed word to a fixed depth.
//!
//! The expansion keeps no visited set and does not memoise lookups, so words
//! reached along several chains are expanded again and their edges recorded
//! again. Cost grows as (synonyms per word)^depth; keep the depth small.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::graph::{WordGraph, render_and_open_graph};
use crate::synonyms::SynonymSource;

pub const DEFAULT_DEPTH: u32 = 5;

/// Edge accumulator for the recursive builder. Duplicates are kept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SynonymGraph {
    edges: Vec<(String, String)>,
}

impl SynonymGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, a: &str, b: &str) {
        self.edges.push((a.to_string(), b.to_string()));
    }

    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Collapse the accumulated edges into a simple graph.
    pub fn to_word_graph(&self) -> WordGraph {
        WordGraph::from_edges(self.edges.iter().map(|(a, b)| (a.as_str(), b.as_str())))
    }

    /// Write the graph as DOT, then render and open it as `mode` asks.
    pub fn visualize(&self, dot_file: &Path, image: &Path, mode: RenderMode) -> Result<WordGraph> {
        let graph = self.to_word_graph();
        graph.save_dot(dot_file)?;
        match mode {
            RenderMode::DotOnly => {}
            RenderMode::Image => render_and_open_graph(dot_file, image, false)?,
            RenderMode::ImageAndOpen => render_and_open_graph(dot_file, image, true)?,
        }
        Ok(graph)
    }
}

/// How far [`SynonymGraph::visualize`] goes after writing the DOT file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    DotOnly,
    /// Render a PNG with Graphviz.
    Image,
    /// Render, then open the PNG in the platform viewer.
    ImageAndOpen,
}

/// Record an edge from `word` to each of its synonyms and recurse into every
/// synonym with one less level of depth. Returns the number of edges added.
pub fn add_synonyms<S>(source: &S, graph: &mut SynonymGraph, word: &str, depth: u32) -> usize
where
    S: SynonymSource + ?Sized,
{
    if depth == 0 {
        return 0;
    }
    let synonyms = source.synonyms(word);
    debug!(word, depth, synonyms = synonyms.len(), "expanding");
    let mut added = 0;
    for synonym in &synonyms {
        graph.add_edge(word, synonym);
        added += 1 + add_synonyms(source, graph, synonym, depth - 1);
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synonyms::Thesaurus;

    fn cyclic() -> Thesaurus {
        let mut t = Thesaurus::new();
        t.insert("dog", ["cad", "frump"]);
        t.insert("cad", ["dog", "bounder"]);
        t.insert("bounder", ["cad"]);
        t
    }

    #[test]
    fn test_depth_zero_adds_nothing() {
        let t = cyclic();
        for seed in ["dog", "cad", "unknown", ""] {
            let mut g = SynonymGraph::new();
            assert_eq!(add_synonyms(&t, &mut g, seed, 0), 0);
            assert!(g.is_empty());
        }
    }

    #[test]
    fn test_depth_one_records_direct_synonyms() {
        let t = cyclic();
        let mut g = SynonymGraph::new();
        assert_eq!(add_synonyms(&t, &mut g, "dog", 1), 2);
        assert_eq!(
            g.edges(),
            [
                ("dog".to_string(), "cad".to_string()),
                ("dog".to_string(), "frump".to_string()),
            ]
        );
    }

    #[test]
    fn test_cycles_are_revisited_until_depth_runs_out() {
        let t = cyclic();
        let mut g = SynonymGraph::new();
        let added = add_synonyms(&t, &mut g, "dog", 3);

        // depth-first: dog-cad, cad-dog, dog-cad, dog-frump, cad-bounder,
        // bounder-cad, dog-frump
        let expected = [
            ("dog", "cad"),
            ("cad", "dog"),
            ("dog", "cad"),
            ("dog", "frump"),
            ("cad", "bounder"),
            ("bounder", "cad"),
            ("dog", "frump"),
        ];
        assert_eq!(added, expected.len());
        let got: Vec<(&str, &str)> = g
            .edges()
            .iter()
            .map(|(a, b)| (a.as_str(), b.as_str()))
            .collect();
        assert_eq!(got, expected);

        let collapsed = g.to_word_graph();
        assert_eq!(collapsed.node_count(), 4);
        assert_eq!(collapsed.edge_count(), 3);
    }

    #[test]
    fn test_visualize_writes_dot_without_rendering() {
        let t = cyclic();
        let mut g = SynonymGraph::new();
        add_synonyms(&t, &mut g, "bounder", 2);

        let dir = tempfile::tempdir().unwrap();
        let dot = dir.path().join("syn.dot");
        let graph = g.visualize(&dot, &dir.path().join("syn.png"), RenderMode::DotOnly).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert!(dot.exists());
        assert!(!dir.path().join("syn.png").exists());
    }
}
