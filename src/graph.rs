//! The service reference graph.
//!
//! A [`ReferenceGraph`] is a derived, read-only snapshot of "who references
//! whom" across a [`DefinitionStore`](crate::DefinitionStore): one node per
//! identifier that defines, aliases, or is referenced by something, and one
//! directed edge per reference. It is never the source of truth; the pass
//! runner rebuilds it from the store before every pass invocation.

use std::collections::{BTreeMap, BTreeSet};

use crate::definition::{Argument, Definition};
use crate::store::DefinitionStore;

/// A directed edge: `source` references `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    source: String,
    target: String,
}

impl GraphEdge {
    /// Identifier of the referencing node.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Identifier of the referenced node.
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// A node in the reference graph.
///
/// A node exists for every identifier that takes part in at least one
/// reference. Alias nodes carry the identifier they point at as their value.
#[derive(Debug, Clone)]
pub struct GraphNode {
    id: String,
    alias_target: Option<String>,
    in_edges: Vec<usize>,
    out_edges: Vec<usize>,
}

impl GraphNode {
    /// The node's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this node is an alias rather than a definition or plain
    /// reference target.
    pub fn is_alias(&self) -> bool {
        self.alias_target.is_some()
    }

    /// For alias nodes, the identifier the alias points at.
    pub fn alias_target(&self) -> Option<&str> {
        self.alias_target.as_deref()
    }
}

/// Directed graph of service references, derived from a definition store.
///
/// # Examples
///
/// ```rust
/// use anvil_di::{Argument, DefinitionStore, ReferenceGraph};
///
/// let mut store = DefinitionStore::new();
/// store
///     .register("app", "App\\Kernel")
///     .borrow_mut()
///     .add_argument(Argument::reference("logger"));
/// store.register("logger", "App\\Logger");
///
/// let graph = ReferenceGraph::build(&store);
/// let sources = graph.distinct_in_sources("logger");
/// assert!(sources.contains("app"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    nodes: BTreeMap<String, GraphNode>,
    edges: Vec<GraphEdge>,
}

impl ReferenceGraph {
    /// Builds the reference graph for the current state of the store.
    ///
    /// Pure derivation: the store is not mutated, and building twice from
    /// the same store yields the same graph. Every `Reference` found in any
    /// definition's constructor arguments or method-call arguments,
    /// recursively through lists and inline definitions, contributes an edge
    /// from the defining service; every alias contributes an alias node and
    /// an edge to its target. Dangling references still produce an edge; it
    /// is the downstream instantiator's job to fail on them.
    pub fn build(store: &DefinitionStore) -> Self {
        let mut graph = ReferenceGraph::default();

        for (id, definition) in store.definitions() {
            let definition = definition.borrow();
            let mut visiting = Vec::new();
            graph.collect_definition(id, &definition, &mut visiting);
        }

        for (id, alias) in store.aliases() {
            let target = alias.target().to_string();
            graph
                .node_mut(id.clone())
                .alias_target
                .get_or_insert(target.clone());
            graph.connect(id.clone(), target);
        }

        graph
    }

    /// Returns true if a node exists for `id`.
    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Looks up the node for `id`.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Iterates over all nodes, ordered by identifier.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Edges arriving at `id` (things that reference `id`).
    pub fn in_edges(&self, id: &str) -> impl Iterator<Item = &GraphEdge> {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|node| node.in_edges.iter())
            .map(move |&index| &self.edges[index])
    }

    /// Edges leaving `id` (things `id` references).
    pub fn out_edges(&self, id: &str) -> impl Iterator<Item = &GraphEdge> {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|node| node.out_edges.iter())
            .map(move |&index| &self.edges[index])
    }

    /// The distinct identifiers with an edge into `id`.
    pub fn distinct_in_sources(&self, id: &str) -> BTreeSet<&str> {
        self.in_edges(id).map(|edge| edge.source()).collect()
    }

    fn node_mut(&mut self, id: String) -> &mut GraphNode {
        self.nodes.entry(id.clone()).or_insert_with(|| GraphNode {
            id,
            alias_target: None,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        })
    }

    fn connect(&mut self, source: String, target: String) {
        let index = self.edges.len();
        self.edges.push(GraphEdge {
            source: source.clone(),
            target: target.clone(),
        });
        self.node_mut(source).out_edges.push(index);
        self.node_mut(target).in_edges.push(index);
    }

    fn collect_definition(
        &mut self,
        source: &str,
        definition: &Definition,
        visiting: &mut Vec<*const Definition>,
    ) {
        let marker = definition as *const Definition;
        if visiting.contains(&marker) {
            return;
        }
        visiting.push(marker);

        self.collect_arguments(source, definition.arguments(), visiting);
        for call in definition.method_calls() {
            self.collect_arguments(source, call.arguments(), visiting);
        }

        visiting.pop();
    }

    fn collect_arguments(
        &mut self,
        source: &str,
        arguments: &[Argument],
        visiting: &mut Vec<*const Definition>,
    ) {
        for argument in arguments {
            match argument {
                Argument::Value(_) => {}
                Argument::List(items) => self.collect_arguments(source, items, visiting),
                Argument::Reference(reference) => {
                    self.connect(source.to_string(), reference.id().to_string());
                }
                Argument::Definition(nested) => {
                    // Inline definitions belong to the outer service, so
                    // their references are attributed to it.
                    let nested = nested.borrow();
                    self.collect_definition(source, &nested, visiting);
                }
            }
        }
    }
}
