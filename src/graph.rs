//! Undirected word graph.

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::{debug, info};

use crate::error::{Result, WordGraphError};
use crate::sequential::AdjacencyMap;

/// Simple undirected graph whose nodes are words. Adding an edge that is
/// already present does nothing, and nodes keep insertion order.
#[derive(Debug, Default, Clone)]
pub struct WordGraph {
    graph: UnGraph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl WordGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys become nodes first, in order, then each key is joined to its
    /// synonyms.
    pub fn from_adjacency(adjacency: &AdjacencyMap) -> Self {
        let mut graph = WordGraph::new();
        for (word, _) in adjacency.iter() {
            graph.add_word(word);
        }
        for (word, synonyms) in adjacency.iter() {
            for synonym in synonyms {
                graph.add_edge(word, synonym);
            }
        }
        graph
    }

    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut graph = WordGraph::new();
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    pub fn add_word(&mut self, word: &str) -> NodeIndex {
        if let Some(&index) = self.node_indices.get(word) {
            return index;
        }
        let index = self.graph.add_node(word.to_string());
        self.node_indices.insert(word.to_string(), index);
        index
    }

    /// Returns `false` when the edge was already present.
    pub fn add_edge(&mut self, a: &str, b: &str) -> bool {
        let node1 = self.add_word(a);
        let node2 = self.add_word(b);
        if self.graph.find_edge(node1, node2).is_some() {
            return false;
        }
        self.graph.add_edge(node1, node2, ());
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Words in insertion order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.node_indices.contains_key(word)
    }

    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        match (self.node_indices.get(a), self.node_indices.get(b)) {
            (Some(&n1), Some(&n2)) => self.graph.find_edge(n1, n2).is_some(),
            _ => false,
        }
    }

    pub fn neighbors(&self, word: &str) -> Vec<&str> {
        let Some(&index) = self.node_indices.get(word) else {
            return Vec::new();
        };
        self.graph
            .neighbors(index)
            .map(|n| self.graph[n].as_str())
            .collect()
    }

    /// Edges as word pairs, in insertion order.
    pub fn edge_pairs(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (self.graph[a].as_str(), self.graph[b].as_str()))
            .collect()
    }

    /// Read-only view of the underlying petgraph graph. Node indices follow
    /// insertion order.
    pub fn graph(&self) -> &UnGraph<String, ()> {
        &self.graph
    }

    /// Graphviz rendering with small labels and point-sized nodes.
    pub fn to_dot(&self) -> String {
        let dot = Dot::with_attr_getters(
            &self.graph,
            &[Config::EdgeNoLabel, Config::NodeNoLabel],
            &|_, _| String::new(),
            &|_, (_, word)| {
                format!(
                    "shape=point, width=0.02, xlabel=\"{}\", fontsize=5",
                    escape_dot(word)
                )
            },
        );
        format!("{:?}", dot)
    }

    pub fn save_dot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_dot()).map_err(|e| WordGraphError::file(path, e))?;
        info!(path = %path.display(), nodes = self.node_count(), "wrote DOT file");
        Ok(())
    }
}

fn escape_dot(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render a DOT file to PNG with Graphviz and hand the image to the platform
/// viewer when `open` is set.
pub fn render_and_open_graph(dot_file: &Path, output_image: &Path, open: bool) -> Result<()> {
    run("dot", |cmd| {
        cmd.arg("-Tpng").arg(dot_file).arg("-o").arg(output_image);
    })?;
    info!(image = %output_image.display(), "rendered graph");

    if !open {
        return Ok(());
    }

    let opener = if cfg!(target_os = "windows") {
        "start"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    run(opener, |cmd| {
        cmd.arg(output_image);
    })
}

fn run(program: &str, configure: impl FnOnce(&mut Command)) -> Result<()> {
    let mut cmd = Command::new(program);
    configure(&mut cmd);
    debug!(?cmd, "spawning");
    let status = cmd.status()?;
    if !status.success() {
        return Err(WordGraphError::Render {
            program: program.to_string(),
            status: status.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut g = WordGraph::new();
        assert!(g.add_edge("dog", "frump"));
        assert!(!g.add_edge("dog", "frump"));
        assert!(!g.add_edge("frump", "dog"));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.contains_edge("frump", "dog"));
    }

    #[test]
    fn test_from_edges_keeps_first_seen_order() {
        let g = WordGraph::from_edges([("dog", "cad"), ("cad", "bounder"), ("dog", "cad")]);
        assert_eq!(g.words().collect::<Vec<_>>(), vec!["dog", "cad", "bounder"]);
        assert_eq!(g.edge_pairs(), vec![("dog", "cad"), ("cad", "bounder")]);
        let mut around_cad = g.neighbors("cad");
        around_cad.sort();
        assert_eq!(around_cad, vec!["bounder", "dog"]);
        assert!(g.neighbors("cat").is_empty());
    }

    #[test]
    fn test_dot_output_is_undirected_and_labelled() {
        let g = WordGraph::from_edges([("say \"hi\"", "greet")]);
        let dot = g.to_dot();
        assert!(dot.starts_with("graph {"));
        assert!(dot.contains("--"));
        assert!(dot.contains(r#"xlabel="say \"hi\"""#));
        assert!(dot.contains("fontsize=5"));
    }

    #[test]
    fn test_save_dot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.dot");
        WordGraph::from_edges([("a", "b")]).save_dot(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("0 -- 1"));
    }

    #[test]
    fn test_render_without_open_fails_on_missing_dot_file() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("missing.png");
        let result = render_and_open_graph(&dir.path().join("missing.dot"), &image, false);
        assert!(result.is_err());
        assert!(!image.exists());
    }

    #[test]
    fn test_gml_edges_come_from_petgraph_endpoints() {
        // Nodes and parallel edges added behind the word index must still be
        // written, so the writer cannot rely on looking words up.
        let mut g = WordGraph::from_edges([("a", "b")]);
        let a = g.node_indices["a"];
        let c = g.graph.add_node("c".to_string());
        g.graph.add_edge(a, c, ());
        g.graph.add_edge(a, c, ());

        let mut out = Vec::new();
        crate::gml::write_gml(&g, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches("edge [").count(), g.edge_count());
        assert_eq!(text.matches("source 0\n    target 2").count(), 2);
        assert!(text.contains("label \"c\""));
    }
}
