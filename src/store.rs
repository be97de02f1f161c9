//! The service definition store.
//!
//! This module contains the [`DefinitionStore`], the source of truth the
//! compiler pipeline operates on: definitions, aliases, and parameters, all
//! keyed by string identifier.

use std::collections::BTreeMap;

use crate::definition::{Alias, Definition, DefinitionRef, Value};
use crate::error::{CompileError, CompileResult};

/// Holds service definitions, aliases, and parameters keyed by identifier.
///
/// The store is populated once by upstream configuration loading, then owned
/// exclusively by the compiler for the duration of a pipeline run. Maps are
/// ordered (`BTreeMap`) so pass iteration order is deterministic and the
/// compiled fixed point never depends on hash ordering.
///
/// # Examples
///
/// ```rust
/// use anvil_di::{Argument, DefinitionStore};
///
/// let mut store = DefinitionStore::new();
/// store
///     .register("logger", "App\\Logger")
///     .borrow_mut()
///     .add_argument(Argument::value("app.log"))
///     .set_public(false);
/// store.set_alias("log", "logger");
///
/// assert!(store.has_definition("logger"));
/// assert_eq!(store.resolve_alias("log").unwrap(), "logger");
/// ```
pub struct DefinitionStore {
    definitions: BTreeMap<String, DefinitionRef>,
    aliases: BTreeMap<String, Alias>,
    parameters: BTreeMap<String, Value>,
}

impl DefinitionStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            definitions: BTreeMap::new(),
            aliases: BTreeMap::new(),
            parameters: BTreeMap::new(),
        }
    }

    // ----- Definitions -----

    /// Registers a fresh definition for `class` under `id` and returns its
    /// handle for fluent configuration.
    ///
    /// Any alias previously registered under `id` is superseded.
    pub fn register(&mut self, id: impl Into<String>, class: impl Into<String>) -> DefinitionRef {
        self.set_definition(id, Definition::new(class))
    }

    /// Registers a definition under `id`, superseding any alias of the same
    /// name, and returns its handle.
    pub fn set_definition(
        &mut self,
        id: impl Into<String>,
        definition: Definition,
    ) -> DefinitionRef {
        self.set_definition_ref(id, definition.into_ref())
    }

    /// Registers an existing definition handle under `id`.
    ///
    /// This is how alias promotion re-registers a definition under its
    /// alias's identifier without breaking handle identity.
    pub fn set_definition_ref(
        &mut self,
        id: impl Into<String>,
        definition: DefinitionRef,
    ) -> DefinitionRef {
        let id = id.into();
        self.aliases.remove(&id);
        self.definitions.insert(id, definition.clone());
        definition
    }

    /// Looks up the definition registered under `id`.
    pub fn get_definition(&self, id: &str) -> Option<DefinitionRef> {
        self.definitions.get(id).cloned()
    }

    /// Returns true if a definition is registered under `id`.
    pub fn has_definition(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    /// Removes the definition registered under `id`, returning its handle.
    ///
    /// References pointing at `id` become stale; passes that remove
    /// definitions are responsible for only doing so when no live reference
    /// remains, or for rewriting the referrers first.
    pub fn remove_definition(&mut self, id: &str) -> Option<DefinitionRef> {
        self.definitions.remove(id)
    }

    /// A snapshot of all definition identifiers, in sorted order.
    ///
    /// Passes iterate over this snapshot so they can mutate the store while
    /// walking it.
    pub fn definition_ids(&self) -> Vec<String> {
        self.definitions.keys().cloned().collect()
    }

    /// Iterates over all (identifier, definition) entries.
    pub fn definitions(&self) -> impl Iterator<Item = (&String, &DefinitionRef)> {
        self.definitions.iter()
    }

    /// Number of registered definitions.
    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    // ----- Aliases -----

    /// Registers `id` as an alias for `target`.
    ///
    /// A definition previously registered under `id` is superseded, matching
    /// the definition-over-alias precedence of [`set_definition`].
    ///
    /// [`set_definition`]: DefinitionStore::set_definition
    pub fn set_alias(&mut self, id: impl Into<String>, target: impl Into<String>) -> &mut Self {
        let id = id.into();
        self.definitions.remove(&id);
        self.aliases.insert(id, Alias::new(target));
        self
    }

    /// Looks up the alias registered under `id`.
    pub fn get_alias(&self, id: &str) -> Option<&Alias> {
        self.aliases.get(id)
    }

    /// Returns true if `id` is an alias.
    pub fn has_alias(&self, id: &str) -> bool {
        self.aliases.contains_key(id)
    }

    /// Removes the alias registered under `id`.
    pub fn remove_alias(&mut self, id: &str) -> Option<Alias> {
        self.aliases.remove(id)
    }

    /// A snapshot of all alias identifiers, in sorted order.
    pub fn alias_ids(&self) -> Vec<String> {
        self.aliases.keys().cloned().collect()
    }

    /// Iterates over all (identifier, alias) entries.
    pub fn aliases(&self) -> impl Iterator<Item = (&String, &Alias)> {
        self.aliases.iter()
    }

    /// Resolves an alias chain to the concrete definition identifier.
    ///
    /// Walks `id` through the alias map until it lands on a definition.
    /// Fails with [`CompileError::AliasCycle`] if the chain revisits an
    /// identifier, and with [`CompileError::AliasNotFound`] if a chain step
    /// names an identifier that is neither an alias nor a definition.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use anvil_di::{CompileError, DefinitionStore};
    ///
    /// let mut store = DefinitionStore::new();
    /// store.register("mailer.smtp", "App\\SmtpMailer");
    /// store.set_alias("mailer", "mailer.smtp");
    /// store.set_alias("mail", "mailer");
    ///
    /// assert_eq!(store.resolve_alias("mail").unwrap(), "mailer.smtp");
    ///
    /// store.set_alias("a", "b");
    /// store.set_alias("b", "a");
    /// assert!(matches!(
    ///     store.resolve_alias("a"),
    ///     Err(CompileError::AliasCycle(_))
    /// ));
    /// ```
    pub fn resolve_alias(&self, id: &str) -> CompileResult<String> {
        let mut path = vec![id.to_string()];
        let mut current = id.to_string();

        while let Some(alias) = self.aliases.get(&current) {
            let target = alias.target().to_string();
            if path.contains(&target) {
                path.push(target);
                return Err(CompileError::AliasCycle(path));
            }
            path.push(target.clone());
            current = target;
        }

        if self.definitions.contains_key(&current) {
            Ok(current)
        } else {
            Err(CompileError::AliasNotFound(current))
        }
    }

    // ----- Parameters -----

    /// Sets a container parameter.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Looks up a container parameter.
    pub fn get_parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// Returns true if the parameter is set.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Iterates over all (name, value) parameters.
    pub fn parameters(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.parameters.iter()
    }
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}
