//! Inline service definitions where this is possible.

use crate::compiler::{CompilerPass, PassContext, PassOutcome};
use crate::definition::{Argument, Definition, DefinitionRef};
use crate::error::CompileResult;
use crate::graph::ReferenceGraph;
use crate::store::DefinitionStore;

/// Replaces references with inlined copies of their definitions.
///
/// A reference to `T` is rewritten into an inline definition when `T` is
/// inlinable:
///
/// - `T` is not shared: always safe, every use site was meant to get a fresh
///   instance, so a structural copy is inlined per site;
/// - `T` is shared, private, and has at most one distinct referencing source
///   in the graph: only one caller can ever observe the singleton, so the
///   stored handle itself is inlined, preserving identity.
///
/// The rewrite recurses through argument lists, method calls, and freshly
/// inlined definitions, so multi-level chains resolve in one invocation.
/// The pass never removes a top-level definition and never requests a
/// repeat; pruning what it strands is [`RemoveUnusedDefinitionsPass`]'s job,
/// which is why it runs after this pass in the standard pipeline.
///
/// [`RemoveUnusedDefinitionsPass`]: crate::passes::RemoveUnusedDefinitionsPass
///
/// # Examples
///
/// ```rust
/// use anvil_di::{Argument, Compiler, DefinitionStore, InlineDefinitionsPass};
///
/// let mut store = DefinitionStore::new();
/// store
///     .register("app", "App\\Kernel")
///     .borrow_mut()
///     .add_argument(Argument::reference("clock"));
/// store
///     .register("clock", "App\\Clock")
///     .borrow_mut()
///     .set_shared(false);
///
/// let mut compiler = Compiler::new();
/// compiler.add_pass(InlineDefinitionsPass::new());
/// compiler.compile(&mut store).unwrap();
///
/// let app = store.get_definition("app").unwrap();
/// assert!(matches!(app.borrow().arguments()[0], Argument::Definition(_)));
/// ```
pub struct InlineDefinitionsPass;

impl InlineDefinitionsPass {
    /// Creates the pass.
    pub fn new() -> Self {
        Self
    }

    fn inline_definition(
        store: &DefinitionStore,
        graph: &ReferenceGraph,
        ctx: &mut PassContext,
        source: &str,
        definition: &mut Definition,
    ) {
        Self::inline_arguments(store, graph, ctx, source, definition.arguments_mut());
        for call in definition.method_calls_mut() {
            Self::inline_arguments(store, graph, ctx, source, call.arguments_mut());
        }
    }

    fn inline_arguments(
        store: &DefinitionStore,
        graph: &ReferenceGraph,
        ctx: &mut PassContext,
        source: &str,
        arguments: &mut Vec<Argument>,
    ) {
        for argument in arguments.iter_mut() {
            match argument {
                Argument::Value(_) => {}
                Argument::List(items) => {
                    Self::inline_arguments(store, graph, ctx, source, items);
                }
                Argument::Reference(reference) => {
                    let id = reference.id().to_string();
                    let target = match store.get_definition(&id) {
                        Some(target) => target,
                        None => continue,
                    };
                    if !Self::is_inlinable(graph, &id, &target) {
                        continue;
                    }

                    let inlined = {
                        let target_def = target.borrow();
                        if target_def.is_shared() {
                            // Alias the stored handle so the one legitimate
                            // call site keeps observing the singleton.
                            target.clone()
                        } else {
                            target_def.clone().into_ref()
                        }
                    };

                    ctx.log(format!("Inlined service \"{}\" into \"{}\"", id, source));
                    ctx.definition_inlined(&id, source);

                    if let Ok(mut nested) = inlined.try_borrow_mut() {
                        Self::inline_definition(store, graph, ctx, source, &mut nested);
                    }
                    *argument = Argument::Definition(inlined);
                }
                Argument::Definition(nested) => {
                    // Already-inlined definitions are rewritten too; a handle
                    // that is mutably borrowed higher up the recursion stack
                    // is a cycle back into itself and is left as is.
                    if let Ok(mut nested) = nested.try_borrow_mut() {
                        Self::inline_definition(store, graph, ctx, source, &mut nested);
                    }
                }
            }
        }
    }

    fn is_inlinable(graph: &ReferenceGraph, id: &str, definition: &DefinitionRef) -> bool {
        // A handle that cannot be borrowed is being rewritten higher up the
        // stack, i.e. the reference is self-referential.
        let definition = match definition.try_borrow() {
            Ok(definition) => definition,
            Err(_) => return false,
        };

        if !definition.is_shared() {
            return true;
        }
        if definition.is_public() {
            return false;
        }
        if !graph.has_node(id) {
            return true;
        }

        graph.distinct_in_sources(id).len() <= 1
    }
}

impl Default for InlineDefinitionsPass {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerPass for InlineDefinitionsPass {
    fn name(&self) -> &'static str {
        "inline-definitions"
    }

    fn process(
        &mut self,
        store: &mut DefinitionStore,
        ctx: &mut PassContext,
    ) -> CompileResult<PassOutcome> {
        let graph = ctx.graph();

        for id in store.definition_ids() {
            let handle = match store.get_definition(&id) {
                Some(handle) => handle,
                None => continue,
            };
            let mut definition = handle.borrow_mut();
            Self::inline_definition(store, graph, ctx, &id, &mut definition);
        }

        Ok(PassOutcome::Stable)
    }
}
