/// Unit tests for building and querying the reference graph

use anvil_di::{Argument, Definition, DefinitionStore, ReferenceGraph};

#[test]
fn test_edges_from_constructor_arguments() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::reference("router"))
        .add_argument(Argument::reference("logger"));
    store.register("router", "App\\Router");
    store.register("logger", "App\\Logger");

    let graph = ReferenceGraph::build(&store);

    assert!(graph.has_node("app"));
    assert!(graph.has_node("router"));
    assert!(graph.has_node("logger"));

    let targets: Vec<_> = graph.out_edges("app").map(|e| e.target()).collect();
    assert_eq!(targets, ["router", "logger"]);

    let sources = graph.distinct_in_sources("router");
    assert!(sources.contains("app"));
}

#[test]
fn test_edges_from_method_calls() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_method_call("set_logger", vec![Argument::reference("logger")]);
    store.register("logger", "App\\Logger");

    let graph = ReferenceGraph::build(&store);
    assert!(graph.distinct_in_sources("logger").contains("app"));
}

#[test]
fn test_edges_through_nested_lists() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::List(vec![
            Argument::value(1i64),
            Argument::List(vec![Argument::reference("deep")]),
        ]));
    store.register("deep", "App\\Deep");

    let graph = ReferenceGraph::build(&store);
    assert!(graph.distinct_in_sources("deep").contains("app"));
}

#[test]
fn test_inline_definition_references_belong_to_outer_service() {
    let mut inline = Definition::new("App\\Inline");
    inline.add_argument(Argument::reference("logger"));

    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::Definition(inline.into_ref()));
    store.register("logger", "App\\Logger");

    let graph = ReferenceGraph::build(&store);

    // The edge is attributed to the defining service, not the inline child.
    let sources = graph.distinct_in_sources("logger");
    assert_eq!(sources.len(), 1);
    assert!(sources.contains("app"));
}

#[test]
fn test_alias_nodes_and_edges() {
    let mut store = DefinitionStore::new();
    store.register("mailer.smtp", "App\\SmtpMailer");
    store.set_alias("mailer", "mailer.smtp");

    let graph = ReferenceGraph::build(&store);

    let alias_node = graph.node("mailer").unwrap();
    assert!(alias_node.is_alias());
    assert_eq!(alias_node.alias_target(), Some("mailer.smtp"));

    let definition_node = graph.node("mailer.smtp").unwrap();
    assert!(!definition_node.is_alias());

    assert!(graph.distinct_in_sources("mailer.smtp").contains("mailer"));
}

#[test]
fn test_dangling_references_still_produce_edges() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::reference("ghost"));

    let graph = ReferenceGraph::build(&store);

    // The target exists as a node even though nothing defines it; failing
    // on it is the downstream instantiator's job.
    assert!(graph.has_node("ghost"));
    assert!(graph.distinct_in_sources("ghost").contains("app"));
}

#[test]
fn test_build_does_not_mutate_the_store() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::reference("logger"));
    store.register("logger", "App\\Logger");
    store.set_alias("log", "logger");

    let _ = ReferenceGraph::build(&store);

    assert_eq!(store.definition_count(), 2);
    assert!(store.has_alias("log"));
    let app = store.get_definition("app").unwrap();
    assert!(matches!(app.borrow().arguments()[0], Argument::Reference(_)));
}

#[test]
fn test_build_is_idempotent() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::reference("logger"));
    store.register("logger", "App\\Logger");
    store.set_alias("log", "logger");

    let first = ReferenceGraph::build(&store);
    let second = ReferenceGraph::build(&store);

    assert_eq!(first.edges(), second.edges());
    let first_ids: Vec<_> = first.nodes().map(|n| n.id().to_string()).collect();
    let second_ids: Vec<_> = second.nodes().map(|n| n.id().to_string()).collect();
    assert_eq!(first_ids, second_ids);
}

#[test]
fn test_distinct_sources_deduplicate() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::reference("logger"))
        .add_method_call("set_logger", vec![Argument::reference("logger")]);
    store.register("logger", "App\\Logger");

    let graph = ReferenceGraph::build(&store);

    // Two edges, one distinct source.
    assert_eq!(graph.in_edges("logger").count(), 2);
    assert_eq!(graph.distinct_in_sources("logger").len(), 1);
}
