//! Removes unused service definitions from the store.

use std::collections::BTreeSet;

use crate::compiler::{CompilerPass, PassContext, PassOutcome};
use crate::error::CompileResult;
use crate::store::DefinitionStore;

/// Removes private definitions that nothing references, promoting
/// singly-aliased ones.
///
/// For every private definition the pass looks at the distinct sources with
/// an inbound edge in the graph, and at the subset of those sources that are
/// aliases. A definition counts as referenced only if it has at least one
/// source that is not merely an alias pointing at it:
///
/// - exactly one referencing alias, otherwise unreferenced: the definition
///   is re-registered under the alias's identifier, marked public, and its
///   original identifier removed, so external reachability through the
///   alias is preserved while one indirection level collapses;
/// - no referencing alias, otherwise unreferenced: the definition is
///   removed;
/// - anything else: retained unchanged.
///
/// Both promotion and removal delete an identifier from the store, so both
/// request a repeat: deletions can strand definitions the deleted entry was
/// the last referrer of, and a promoted definition may be inlinable under
/// its new identifier.
///
/// Public definitions are never candidates. The alias chain is checked for
/// cycles before any promotion.
///
/// # Examples
///
/// ```rust
/// use anvil_di::{Compiler, DefinitionStore, RemoveUnusedDefinitionsPass};
///
/// let mut store = DefinitionStore::new();
/// store.register("app", "App\\Kernel");
/// store
///     .register("leftover", "App\\Debug")
///     .borrow_mut()
///     .set_public(false);
///
/// let mut compiler = Compiler::new();
/// compiler.add_pass(RemoveUnusedDefinitionsPass::new());
/// compiler.compile(&mut store).unwrap();
///
/// assert!(store.has_definition("app"));
/// assert!(!store.has_definition("leftover"));
/// ```
pub struct RemoveUnusedDefinitionsPass;

impl RemoveUnusedDefinitionsPass {
    /// Creates the pass.
    pub fn new() -> Self {
        Self
    }
}

impl Default for RemoveUnusedDefinitionsPass {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerPass for RemoveUnusedDefinitionsPass {
    fn name(&self) -> &'static str {
        "remove-unused-definitions"
    }

    fn process(
        &mut self,
        store: &mut DefinitionStore,
        ctx: &mut PassContext,
    ) -> CompileResult<PassOutcome> {
        let graph = ctx.graph();
        let mut has_changed = false;

        for id in store.definition_ids() {
            let handle = match store.get_definition(&id) {
                Some(handle) => handle,
                None => continue,
            };
            if handle.borrow().is_public() {
                continue;
            }

            let mut sources = BTreeSet::new();
            let mut alias_sources = BTreeSet::new();
            for edge in graph.in_edges(&id) {
                let source = edge.source();
                sources.insert(source);
                if graph.node(source).is_some_and(|node| node.is_alias()) {
                    alias_sources.insert(source);
                }
            }
            let is_referenced = sources.len() - alias_sources.len() > 0;

            let single_alias = if alias_sources.len() == 1 {
                alias_sources.iter().next().map(|source| source.to_string())
            } else {
                None
            };

            if let (false, Some(alias_id)) = (is_referenced, single_alias) {
                // A graph-source alias targets `id` directly, so this
                // resolves in a single hop and cannot cycle; the check
                // matters for stores custom passes have rewired.
                store.resolve_alias(&alias_id)?;

                handle.borrow_mut().set_public(true);
                store.set_definition_ref(alias_id.clone(), handle.clone());
                store.remove_definition(&id);
                ctx.log(format!("Promoted service \"{}\" to \"{}\"", id, alias_id));
                ctx.definition_removed(&id);
                // The promoted service may be inlinable under its new name.
                has_changed = true;
            } else if alias_sources.is_empty() && !is_referenced {
                store.remove_definition(&id);
                ctx.log(format!("Removed unused service \"{}\"", id));
                ctx.definition_removed(&id);
                has_changed = true;
            }
        }

        Ok(if has_changed {
            PassOutcome::Repeat
        } else {
            PassOutcome::Stable
        })
    }
}
