//! Bigram graph of frequent short words, exported as GEXF.
//!
//! Each admitted word contributes the path `START → t1 → … → tn → END`,
//! every edge weighted by the word's frequency. The graph is for human
//! inspection (e.g. in Gephi) only; nothing downstream reads it.

use crate::tokens::Word;
use indexmap::{IndexMap, IndexSet};

/// Number of most frequent words scanned for admission.
pub const BIGRAM_SCAN_LIMIT: usize = 200;

/// Longest admitted word, in tokens.
pub const BIGRAM_MAX_TOKENS: usize = 3;

/// Maximum number of admitted words.
pub const BIGRAM_WORD_LIMIT: usize = 30;

const START: &str = "START";
const END: &str = "END";

/// Undirected weighted graph over token labels.
#[derive(Debug, Clone, Default)]
pub struct BigramGraph {
    nodes: IndexSet<String>,
    edges: IndexMap<(String, String), usize>,
    words: Vec<(Word, usize)>,
}

impl BigramGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from words ranked by descending frequency.
    pub fn from_frequencies(frequencies: &[(Word, usize)]) -> Self {
        let mut graph = Self::new();
        for (word, count) in frequencies.iter().take(BIGRAM_SCAN_LIMIT) {
            if word.len() > BIGRAM_MAX_TOKENS || word.len() == 1 {
                continue;
            }
            if graph.words.len() == BIGRAM_WORD_LIMIT {
                break;
            }
            graph.add_word(word, *count);
        }
        graph
    }

    /// Add the START/END-bounded path of `word` with weight `count`.
    pub fn add_word(&mut self, word: &Word, count: usize) {
        let mut path = Vec::with_capacity(word.len() + 2);
        path.push(START.to_string());
        path.extend(word.tokens().iter().map(|t| t.to_string()));
        path.push(END.to_string());

        for pair in path.windows(2) {
            self.add_edge(&pair[0], &pair[1], count);
        }
        self.words.push((word.clone(), count));
    }

    fn add_edge(&mut self, a: &str, b: &str, weight: usize) {
        self.nodes.insert(a.to_string());
        self.nodes.insert(b.to_string());
        let key = if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        };
        *self.edges.entry(key).or_default() += weight;
    }

    /// Accumulated weight between two nodes, in either direction.
    pub fn weight(&self, a: &str, b: &str) -> Option<usize> {
        let (x, y) = if a <= b { (a, b) } else { (b, a) };
        self.edges.get(&(x.to_string(), y.to_string())).copied()
    }

    /// Number of distinct nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Words admitted into the graph, with their counts.
    pub fn words(&self) -> &[(Word, usize)] {
        &self.words
    }

    /// Serialize as a GEXF 1.2 document.
    pub fn to_gexf(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<gexf xmlns=\"http://www.gexf.net/1.2draft\" version=\"1.2\">\n");
        xml.push_str("  <graph mode=\"static\" defaultedgetype=\"undirected\">\n");

        xml.push_str("    <nodes>\n");
        for node in &self.nodes {
            let node = escape_xml(node);
            xml.push_str(&format!("      <node id=\"{}\" label=\"{}\"/>\n", node, node));
        }
        xml.push_str("    </nodes>\n");

        xml.push_str("    <edges>\n");
        for (id, ((source, target), weight)) in self.edges.iter().enumerate() {
            xml.push_str(&format!(
                "      <edge id=\"{}\" source=\"{}\" target=\"{}\" weight=\"{}\"/>\n",
                id,
                escape_xml(source),
                escape_xml(target),
                weight
            ));
        }
        xml.push_str("    </edges>\n");

        xml.push_str("  </graph>\n");
        xml.push_str("</gexf>\n");
        xml
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
