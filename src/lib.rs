//! # anvil-di
//!
//! Fixed-point container compilation for dependency injection: a service
//! definition store, a derived reference graph, and a repeatable pipeline of
//! optimization passes that inline and prune definitions until the store
//! stabilizes.
//!
//! ## Features
//!
//! - **Definition store**: string-keyed definitions, aliases, and parameters
//! - **Reference graph**: a pure, rebuilt-on-demand snapshot of who references whom
//! - **Repeatable pass runner**: runs the pipeline to a fixed point, with an
//!   iteration cap
//! - **Inlining**: replaces references to non-shared or singly-referenced
//!   private services with inline definitions
//! - **Pruning**: removes unreferenced private definitions and promotes
//!   singly-aliased ones
//!
//! ## Quick Start
//!
//! ```rust
//! use anvil_di::{Argument, Compiler, DefinitionStore};
//!
//! // Populate the store: a public kernel referencing a private router
//! let mut store = DefinitionStore::new();
//! store
//!     .register("app", "App\\Kernel")
//!     .borrow_mut()
//!     .add_argument(Argument::reference("router"));
//! store
//!     .register("router", "App\\Router")
//!     .borrow_mut()
//!     .set_public(false);
//!
//! // Run the standard optimization pipeline to its fixed point
//! let mut compiler = Compiler::with_optimizations();
//! compiler.compile(&mut store).unwrap();
//!
//! // The router was inlined into its one caller and pruned from the store
//! assert!(store.has_definition("app"));
//! assert!(!store.has_definition("router"));
//! let app = store.get_definition("app").unwrap();
//! assert!(matches!(app.borrow().arguments()[0], Argument::Definition(_)));
//! ```
//!
//! ## Compilation model
//!
//! The store is populated once by upstream configuration loading, then owned
//! exclusively by the compiler for the duration of the run: a
//! single-threaded, synchronous batch transformation at configuration-compile
//! time, never at request-serving time. The reference graph is a derived
//! view, rebuilt from the store before every pass invocation; passes signal
//! changes through their return value, and the runner re-runs the whole
//! sequence until a sweep is stable.
//!
//! ## Sharing semantics
//!
//! Inlining never duplicates a shared (singleton) service. A non-shared
//! service is inlined as an independent structural copy per call site; a
//! shared private service with a single referencing source is moved into
//! that caller by handle, so the call site keeps observing the same object.

// Module declarations
pub mod compiler;
pub mod definition;
pub mod error;
pub mod graph;
pub mod graph_export;
pub mod passes;
pub mod store;

// Re-export core types
pub use compiler::{
    CompileObserver, Compiler, CompilerPass, LoggingObserver, PassContext, PassOutcome,
    DEFAULT_MAX_ITERATIONS,
};
pub use definition::{
    Alias, Argument, Definition, DefinitionRef, MethodCall, Reference, TagAttributes, Value,
};
pub use error::{CompileError, CompileResult};
pub use graph::{GraphEdge, GraphNode, ReferenceGraph};
pub use graph_export::{ExportEdge, ExportMetadata, ExportNode, GraphExport};
pub use passes::{InlineDefinitionsPass, RemoveUnusedDefinitionsPass};
pub use store::DefinitionStore;
