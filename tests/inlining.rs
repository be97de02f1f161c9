use std::rc::Rc;

use anvil_di::{Argument, Compiler, DefinitionStore, InlineDefinitionsPass};

fn inline_only() -> Compiler {
    let mut compiler = Compiler::new();
    compiler.add_pass(InlineDefinitionsPass::new());
    compiler
}

#[test]
fn test_non_shared_service_is_inlined_as_copy() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::reference("clock"));
    store
        .register("clock", "App\\Clock")
        .borrow_mut()
        .set_shared(false);

    inline_only().compile(&mut store).unwrap();

    let app = store.get_definition("app").unwrap();
    let clock = store.get_definition("clock").unwrap();
    let app = app.borrow();

    match &app.arguments()[0] {
        Argument::Definition(inlined) => {
            assert_eq!(inlined.borrow().class(), "App\\Clock");
            // Independent copy, not the stored handle
            assert!(!Rc::ptr_eq(inlined, &clock));
        }
        other => panic!("expected inlined definition, got {:?}", other),
    }
}

#[test]
fn test_non_shared_copies_are_independent_across_call_sites() {
    let mut store = DefinitionStore::new();
    store
        .register("first", "App\\First")
        .borrow_mut()
        .add_argument(Argument::reference("proto"));
    store
        .register("second", "App\\Second")
        .borrow_mut()
        .add_argument(Argument::reference("proto"));
    store
        .register("proto", "App\\Prototype")
        .borrow_mut()
        .set_shared(false);

    inline_only().compile(&mut store).unwrap();

    let first = store.get_definition("first").unwrap();
    let second = store.get_definition("second").unwrap();

    let first_inline = match &first.borrow().arguments()[0] {
        Argument::Definition(inlined) => inlined.clone(),
        other => panic!("expected inlined definition, got {:?}", other),
    };
    let second_inline = match &second.borrow().arguments()[0] {
        Argument::Definition(inlined) => inlined.clone(),
        other => panic!("expected inlined definition, got {:?}", other),
    };

    assert!(!Rc::ptr_eq(&first_inline, &second_inline));

    // Mutating one call site's copy must not leak into the other
    first_inline.borrow_mut().set_class("App\\Mutated");
    assert_eq!(second_inline.borrow().class(), "App\\Prototype");
}

#[test]
fn test_shared_private_single_source_is_inlined_by_identity() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::reference("state"));
    store
        .register("state", "App\\State")
        .borrow_mut()
        .set_public(false);

    inline_only().compile(&mut store).unwrap();

    let app = store.get_definition("app").unwrap();
    let state = store.get_definition("state").unwrap();

    match &app.borrow().arguments()[0] {
        Argument::Definition(inlined) => {
            // Singleton semantics survive: the call site holds the same
            // object that remains reachable in the store.
            assert!(Rc::ptr_eq(inlined, &state));
        }
        other => panic!("expected inlined definition, got {:?}", other),
    };
}

#[test]
fn test_shared_private_with_two_sources_is_not_inlined() {
    let mut store = DefinitionStore::new();
    store
        .register("first", "App\\First")
        .borrow_mut()
        .add_argument(Argument::reference("shared"));
    store
        .register("second", "App\\Second")
        .borrow_mut()
        .add_argument(Argument::reference("shared"));
    store
        .register("shared", "App\\Shared")
        .borrow_mut()
        .set_public(false);

    inline_only().compile(&mut store).unwrap();

    let first = store.get_definition("first").unwrap();
    let second = store.get_definition("second").unwrap();
    assert!(matches!(first.borrow().arguments()[0], Argument::Reference(_)));
    assert!(matches!(second.borrow().arguments()[0], Argument::Reference(_)));
    assert!(store.has_definition("shared"));
}

#[test]
fn test_shared_public_service_is_never_inlined() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::reference("api"));
    store.register("api", "App\\Api"); // shared and public by default

    inline_only().compile(&mut store).unwrap();

    let app = store.get_definition("app").unwrap();
    assert!(matches!(app.borrow().arguments()[0], Argument::Reference(_)));
}

#[test]
fn test_method_call_arguments_are_inlined() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_method_call("set_clock", vec![Argument::reference("clock")]);
    store
        .register("clock", "App\\Clock")
        .borrow_mut()
        .set_shared(false);

    inline_only().compile(&mut store).unwrap();

    let app = store.get_definition("app").unwrap();
    let app = app.borrow();
    assert!(matches!(
        app.method_calls()[0].arguments()[0],
        Argument::Definition(_)
    ));
}

#[test]
fn test_references_inside_lists_are_inlined() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::List(vec![
            Argument::value("unrelated"),
            Argument::reference("clock"),
        ]));
    store
        .register("clock", "App\\Clock")
        .borrow_mut()
        .set_shared(false);

    inline_only().compile(&mut store).unwrap();

    let app = store.get_definition("app").unwrap();
    let app = app.borrow();
    match &app.arguments()[0] {
        Argument::List(items) => {
            assert!(matches!(items[1], Argument::Definition(_)));
        }
        other => panic!("expected list argument, got {:?}", other),
    }
}

#[test]
fn test_multi_level_inlining_resolves_in_one_invocation() {
    // app -> middle -> leaf, all inlinable
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::reference("middle"));
    store
        .register("middle", "App\\Middle")
        .borrow_mut()
        .set_shared(false)
        .add_argument(Argument::reference("leaf"));
    store
        .register("leaf", "App\\Leaf")
        .borrow_mut()
        .set_shared(false);

    inline_only().compile(&mut store).unwrap();

    let app = store.get_definition("app").unwrap();
    let app = app.borrow();
    let middle = match &app.arguments()[0] {
        Argument::Definition(inlined) => inlined.clone(),
        other => panic!("expected inlined definition, got {:?}", other),
    };
    assert_eq!(middle.borrow().class(), "App\\Middle");
    match &middle.borrow().arguments()[0] {
        Argument::Definition(leaf) => assert_eq!(leaf.borrow().class(), "App\\Leaf"),
        other => panic!("expected nested inlined definition, got {:?}", other),
    };
}

#[test]
fn test_dangling_reference_is_left_alone() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::reference("ghost"));

    inline_only().compile(&mut store).unwrap();

    let app = store.get_definition("app").unwrap();
    assert!(matches!(app.borrow().arguments()[0], Argument::Reference(_)));
}

#[test]
fn test_self_referential_definition_is_not_inlined_into_itself() {
    let mut store = DefinitionStore::new();
    store
        .register("loop", "App\\Loop")
        .borrow_mut()
        .set_public(false)
        .set_shared(false)
        .add_argument(Argument::reference("loop"));

    inline_only().compile(&mut store).unwrap();

    let handle = store.get_definition("loop").unwrap();
    assert!(matches!(handle.borrow().arguments()[0], Argument::Reference(_)));
}

#[test]
fn test_inlining_does_not_remove_the_original_definition() {
    let mut store = DefinitionStore::new();
    store
        .register("app", "App\\Kernel")
        .borrow_mut()
        .add_argument(Argument::reference("state"));
    store
        .register("state", "App\\State")
        .borrow_mut()
        .set_public(false);

    inline_only().compile(&mut store).unwrap();

    // Removal is the pruning pass's job.
    assert!(store.has_definition("state"));
}
