//! GML reading and writing.
//!
//! The writer produces the layout networkx uses for an undirected graph:
//!
//! ```text
//! graph [
//!   node [
//!     id 0
//!     label "dog"
//!   ]
//!   edge [
//!     source 0
//!     target 1
//!   ]
//! ]
//! ```
//!
//! The reader accepts any well-formed GML and takes node names from `label`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{Result, WordGraphError};
use crate::graph::WordGraph;

const INDENT: &str = "  ";

pub fn write_gml<W: Write>(graph: &WordGraph, mut out: W) -> Result<()> {
    writeln!(out, "graph [")?;
    for (id, word) in graph.words().enumerate() {
        writeln!(out, "{INDENT}node [")?;
        writeln!(out, "{INDENT}{INDENT}id {id}")?;
        writeln!(out, "{INDENT}{INDENT}label \"{}\"", escape(word))?;
        writeln!(out, "{INDENT}]")?;
    }
    let inner = graph.graph();
    for edge in inner.edge_indices() {
        let Some((source, target)) = inner.edge_endpoints(edge) else {
            continue;
        };
        writeln!(out, "{INDENT}edge [")?;
        writeln!(out, "{INDENT}{INDENT}source {}", source.index())?;
        writeln!(out, "{INDENT}{INDENT}target {}", target.index())?;
        writeln!(out, "{INDENT}]")?;
    }
    writeln!(out, "]")?;
    out.flush()?;
    Ok(())
}

pub fn save_gml<P: AsRef<Path>>(graph: &WordGraph, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| WordGraphError::file(path, e))?;
    write_gml(graph, BufWriter::new(file))?;
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "wrote GML"
    );
    Ok(())
}

pub fn read_gml<P: AsRef<Path>>(path: P) -> Result<WordGraph> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| WordGraphError::file(path, e))?;
    parse_gml(&text)
}

/// `&`, `"` and anything outside printable ASCII become `&#N;`.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '&' || ch == '"' || !(' '..='~').contains(&ch) {
            out.push_str(&format!("&#{};", ch as u32));
        } else {
            out.push(ch);
        }
    }
    out
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "quot" => Some('"'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi))
        });
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Key(String),
    Int(i64),
    Real(f64),
    Str(String),
    Open,
    Close,
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Real(f64),
    Str(String),
    List(Vec<(String, Value)>),
}

fn gml_error(line: usize, message: impl Into<String>) -> WordGraphError {
    WordGraphError::Gml {
        line,
        message: message.into(),
    }
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line = 1;
    while let Some(&ch) = chars.peek() {
        match ch {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while chars.next_if(|&c| c != '\n').is_some() {}
            }
            '[' => {
                chars.next();
                tokens.push((line, Token::Open));
            }
            ']' => {
                chars.next();
                tokens.push((line, Token::Close));
            }
            '"' => {
                let start = line;
                chars.next();
                let mut raw = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            raw.push(c);
                        }
                        None => return Err(gml_error(start, "unterminated string")),
                    }
                }
                tokens.push((start, Token::Str(unescape(&raw))));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut key = String::new();
                while let Some(c) = chars.next_if(|c| c.is_ascii_alphanumeric() || *c == '_') {
                    key.push(c);
                }
                tokens.push((line, Token::Key(key)));
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                let mut num = String::new();
                while let Some(c) = chars.next_if(|c| {
                    c.is_ascii_alphanumeric() || matches!(*c, '-' | '+' | '.')
                }) {
                    num.push(c);
                }
                let token = if let Ok(i) = num.parse::<i64>() {
                    Token::Int(i)
                } else if let Ok(r) = num.parse::<f64>() {
                    Token::Real(r)
                } else {
                    return Err(gml_error(line, format!("bad number '{num}'")));
                };
                tokens.push((line, token));
            }
            other => return Err(gml_error(line, format!("unexpected character '{other}'"))),
        }
    }
    Ok(tokens)
}

/// Parse `key value` pairs until a closing bracket (or the end, at top level).
fn parse_list<I>(tokens: &mut I, nested: bool) -> Result<Vec<(String, Value)>>
where
    I: Iterator<Item = (usize, Token)>,
{
    let mut items = Vec::new();
    loop {
        let Some((line, token)) = tokens.next() else {
            if nested {
                return Err(gml_error(0, "unexpected end of input, missing ']'"));
            }
            return Ok(items);
        };
        let key = match token {
            Token::Key(key) => key,
            Token::Close if nested => return Ok(items),
            other => return Err(gml_error(line, format!("expected a key, found {other:?}"))),
        };
        let value = match tokens.next() {
            Some((_, Token::Int(i))) => Value::Int(i),
            Some((_, Token::Real(r))) => Value::Real(r),
            Some((_, Token::Str(s))) => Value::Str(s),
            Some((_, Token::Open)) => Value::List(parse_list(tokens, true)?),
            Some((line, other)) => {
                return Err(gml_error(line, format!("expected a value for '{key}', found {other:?}")));
            }
            None => return Err(gml_error(line, format!("missing value for '{key}'"))),
        };
        items.push((key, value));
    }
}

fn field<'a>(items: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    items.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn int_field(items: &[(String, Value)], key: &str, what: &str) -> Result<i64> {
    match field(items, key) {
        Some(Value::Int(i)) => Ok(*i),
        Some(_) => Err(gml_error(0, format!("{what} '{key}' is not an integer"))),
        None => Err(gml_error(0, format!("{what} has no '{key}'"))),
    }
}

pub fn parse_gml(text: &str) -> Result<WordGraph> {
    let mut tokens = tokenize(text)?.into_iter();
    let top = parse_list(&mut tokens, false)?;
    let Some(Value::List(body)) = field(&top, "graph") else {
        return Err(gml_error(0, "no 'graph' list"));
    };

    let mut graph = WordGraph::new();
    let mut labels: HashMap<i64, String> = HashMap::new();
    for (key, value) in body {
        let Value::List(node) = value else { continue };
        if key != "node" {
            continue;
        }
        let id = int_field(node, "id", "node")?;
        let label = match field(node, "label") {
            Some(Value::Str(s)) => s.clone(),
            Some(Value::Int(i)) => i.to_string(),
            Some(Value::Real(r)) => r.to_string(),
            _ => return Err(gml_error(0, format!("node {id} has no label"))),
        };
        if labels.insert(id, label.clone()).is_some() {
            return Err(gml_error(0, format!("duplicate node id {id}")));
        }
        graph.add_word(&label);
    }
    for (key, value) in body {
        let Value::List(edge) = value else { continue };
        if key != "edge" {
            continue;
        }
        let source = int_field(edge, "source", "edge")?;
        let target = int_field(edge, "target", "edge")?;
        let (Some(a), Some(b)) = (labels.get(&source), labels.get(&target)) else {
            return Err(gml_error(
                0,
                format!("edge {source} -> {target} refers to an unknown node"),
            ));
        };
        graph.add_edge(a, b);
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequential::build_adjacency;
    use crate::synonyms::Thesaurus;
    use std::collections::BTreeSet;

    fn edge_set(graph: &WordGraph) -> BTreeSet<(String, String)> {
        graph
            .edge_pairs()
            .into_iter()
            .map(|(a, b)| {
                let (a, b) = if a <= b { (a, b) } else { (b, a) };
                (a.to_string(), b.to_string())
            })
            .collect()
    }

    fn node_set(graph: &WordGraph) -> BTreeSet<String> {
        graph.words().map(str::to_string).collect()
    }

    #[test]
    fn test_write_matches_networkx_layout() {
        let graph = WordGraph::from_edges([("dog", "frump")]);
        let mut out = Vec::new();
        write_gml(&graph, &mut out).unwrap();
        let expected = "graph [\n  node [\n    id 0\n    label \"dog\"\n  ]\n  node [\n    id 1\n    label \"frump\"\n  ]\n  edge [\n    source 0\n    target 1\n  ]\n]\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_labels_are_escaped() {
        assert_eq!(escape("rock & roll"), "rock &#38; roll");
        assert_eq!(escape("say \"hi\""), "say &#34;hi&#34;");
        assert_eq!(escape("café"), "caf&#233;");
        assert_eq!(unescape("caf&#233; &amp; &#x41; &bogus; &"), "café & A &bogus; &");
    }

    #[test]
    fn test_round_trip_from_adjacency() {
        let mut t = Thesaurus::new();
        t.insert("dog", ["domestic_dog", "Canis_familiaris"]);
        t.insert("dog", ["frump"]);
        t.insert("frump", ["dog"]);
        t.insert("naïve", ["unsophisticated", "\"green\""]);
        let adjacency = build_adjacency(&t, &["dog", "frump", "naïve", "lonely"]);
        let graph = WordGraph::from_adjacency(&adjacency);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.gml");
        save_gml(&graph, &path).unwrap();
        let reread = read_gml(&path).unwrap();

        assert_eq!(node_set(&reread), node_set(&graph));
        assert_eq!(edge_set(&reread), edge_set(&graph));
        assert!(reread.contains_word("lonely"));
        assert_eq!(reread.edge_count(), 5);
    }

    #[test]
    fn test_parse_ignores_comments_and_unknown_keys() {
        let text = r#"
            # written by hand
            Creator "test"
            graph [
              directed 0
              name "syn"
              node [ id 7 label "a" weight 0.5 ]
              node [ id 3 label "b" graphics [ x 1.0 y -2 ] ]
              edge [ source 7 target 3 ]
              edge [ source 3 target 7 ]
            ]
        "#;
        let graph = parse_gml(text).unwrap();
        assert_eq!(graph.words().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_parse_rejects_dangling_edge() {
        let text = "graph [ node [ id 0 label \"a\" ] edge [ source 0 target 9 ] ]";
        let err = parse_gml(text).unwrap_err();
        assert!(err.to_string().contains("unknown node"));
    }

    #[test]
    fn test_parse_rejects_unterminated_list() {
        let text = "graph [\n node [ id 0 label \"a\" ]\n";
        assert!(matches!(parse_gml(text), Err(WordGraphError::Gml { .. })));
    }

    #[test]
    fn test_parse_reports_line_of_bad_token() {
        let text = "graph [\n  node [ id 0 label \"a\" ]\n  @\n]";
        match parse_gml(text) {
            Err(WordGraphError::Gml { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
