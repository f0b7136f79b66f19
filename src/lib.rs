//! Word-association graphs built from a synonym source.
//!
//! Two builders share one graph type:
//!
//! - [`sequential`] looks up every word of a vocabulary once and writes the
//!   resulting graph as GML.
//! - [`recursive`] expands the synonyms of a seed word to a fixed depth and
//!   draws the result with Graphviz.
//!
//! [`analysis`] is unrelated to both. It reports the most frequent values of a
//! column, such as the modularity class, in a node table exported by a
//! community-detection tool.

pub mod analysis;
pub mod error;
pub mod gml;
pub mod graph;
pub mod recursive;
pub mod sequential;
pub mod synonyms;
pub mod wordnet;

pub use analysis::{FrequencyTable, MODULARITY_COLUMN, NUM_CLASSES, top_values};
pub use error::{Result, WordGraphError};
pub use gml::{parse_gml, read_gml, save_gml, write_gml};
pub use graph::{WordGraph, render_and_open_graph};
pub use recursive::{DEFAULT_DEPTH, RenderMode, SynonymGraph, add_synonyms};
pub use sequential::{AdjacencyMap, build_adjacency, read_word_list};
pub use synonyms::{SynonymSource, Thesaurus, open_source};
pub use wordnet::WordNet;
