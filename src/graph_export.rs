//! Reference-graph export for visualization and tooling.
//!
//! Captures a [`ReferenceGraph`](crate::ReferenceGraph) together with the
//! store metadata behind it into a plain, serializable snapshot that can be
//! rendered as DOT or Mermaid, or (with the `graph-export` feature) dumped
//! as JSON for consumption by visualization UIs.

#[cfg(feature = "graph-export")]
use serde::{Deserialize, Serialize};

use crate::graph::ReferenceGraph;
use crate::store::DefinitionStore;

/// A node in the exported graph.
///
/// Carries the compilation-relevant flags of the identifier: whether it is
/// an alias, and (for definitions) the class plus shared/public markers.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct ExportNode {
    /// Service identifier
    pub id: String,
    /// Class of the definition, if the identifier has one
    pub class: Option<String>,
    /// Whether the definition is shared (singleton)
    pub shared: bool,
    /// Whether the definition is externally fetchable
    pub public: bool,
    /// Whether this identifier is an alias
    pub is_alias: bool,
    /// For aliases, the aliased identifier
    pub alias_target: Option<String>,
}

/// An edge in the exported graph: `from` references `to`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct ExportEdge {
    /// Referencing identifier
    pub from: String,
    /// Referenced identifier
    pub to: String,
}

/// Counters describing the exported graph.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct ExportMetadata {
    /// Number of registered definitions in the store
    pub definition_count: usize,
    /// Number of registered aliases in the store
    pub alias_count: usize,
    /// Number of reference edges
    pub edge_count: usize,
    /// Export format version
    pub version: String,
}

/// Serializable snapshot of a reference graph.
///
/// # Examples
///
/// ```rust
/// use anvil_di::{Argument, DefinitionStore, GraphExport, ReferenceGraph};
///
/// let mut store = DefinitionStore::new();
/// store
///     .register("app", "App\\Kernel")
///     .borrow_mut()
///     .add_argument(Argument::reference("logger"));
/// store.register("logger", "App\\Logger");
///
/// let graph = ReferenceGraph::build(&store);
/// let export = GraphExport::capture(&store, &graph);
///
/// let dot = export.to_dot();
/// assert!(dot.contains("\"app\" -> \"logger\""));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphExport {
    /// All nodes, ordered by identifier
    pub nodes: Vec<ExportNode>,
    /// All reference edges
    pub edges: Vec<ExportEdge>,
    /// Graph-level counters
    pub metadata: ExportMetadata,
}

impl GraphExport {
    /// Captures the graph and the store metadata behind it.
    pub fn capture(store: &DefinitionStore, graph: &ReferenceGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| {
                let definition = store.get_definition(node.id());
                let (class, shared, public) = match &definition {
                    Some(handle) => {
                        let definition = handle.borrow();
                        (
                            Some(definition.class().to_string()),
                            definition.is_shared(),
                            definition.is_public(),
                        )
                    }
                    None => (None, false, false),
                };
                ExportNode {
                    id: node.id().to_string(),
                    class,
                    shared,
                    public,
                    is_alias: node.is_alias(),
                    alias_target: node.alias_target().map(str::to_string),
                }
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| ExportEdge {
                from: edge.source().to_string(),
                to: edge.target().to_string(),
            })
            .collect::<Vec<_>>();

        let metadata = ExportMetadata {
            definition_count: store.definition_count(),
            alias_count: store.alias_ids().len(),
            edge_count: edges.len(),
            version: "1.0".to_string(),
        };

        Self { nodes, edges, metadata }
    }

    /// Renders the graph in DOT format for Graphviz.
    pub fn to_dot(&self) -> String {
        let mut output = String::new();
        output.push_str("digraph ReferenceGraph {\n");
        output.push_str("  rankdir=TB;\n");
        output.push_str("  node [shape=box];\n\n");

        for node in &self.nodes {
            let shape = if node.is_alias { "ellipse" } else { "box" };
            let color = if node.is_alias {
                "lightgrey"
            } else if !node.public {
                "lightyellow"
            } else if node.shared {
                "lightblue"
            } else {
                "lightgreen"
            };
            let label = match &node.class {
                Some(class) => format!("{}\\n{}", node.id, class),
                None => node.id.clone(),
            };
            output.push_str(&format!(
                "  \"{}\" [label=\"{}\", shape={}, style=filled, fillcolor={}];\n",
                node.id, label, shape, color
            ));
        }

        output.push('\n');
        for edge in &self.edges {
            output.push_str(&format!("  \"{}\" -> \"{}\";\n", edge.from, edge.to));
        }

        output.push_str("}\n");
        output
    }

    /// Renders the graph in Mermaid format for documentation.
    pub fn to_mermaid(&self) -> String {
        let mut output = String::new();
        output.push_str("graph TD\n");

        for node in &self.nodes {
            // Mermaid ids cannot contain dots; keep the real id in the label.
            let safe_id = node.id.replace('.', "_");
            if node.is_alias {
                output.push_str(&format!("    {}([\"{}\"])\n", safe_id, node.id));
            } else {
                output.push_str(&format!("    {}[\"{}\"]\n", safe_id, node.id));
            }
        }

        for edge in &self.edges {
            output.push_str(&format!(
                "    {} --> {}\n",
                edge.from.replace('.', "_"),
                edge.to.replace('.', "_")
            ));
        }

        output
    }

    /// Serializes the snapshot as pretty-printed JSON.
    #[cfg(feature = "graph-export")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
