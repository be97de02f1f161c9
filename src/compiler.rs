//! The repeatable compiler-pass runner.
//!
//! A [`Compiler`] executes an ordered pipeline of [`CompilerPass`]es over a
//! [`DefinitionStore`]. Each pass receives a freshly rebuilt
//! [`ReferenceGraph`] snapshot and returns a [`PassOutcome`]; if any pass in
//! a sweep asks for a repeat, the whole sequence runs again, until a full
//! sweep is stable or the iteration cap is hit.

use std::rc::Rc;

use crate::error::{CompileError, CompileResult};
use crate::graph::ReferenceGraph;
use crate::passes::{InlineDefinitionsPass, RemoveUnusedDefinitionsPass};
use crate::store::DefinitionStore;

/// Bound on pipeline sweeps before compilation is declared non-convergent.
pub const DEFAULT_MAX_ITERATIONS: usize = 32;

/// What a pass reports back to the runner after processing the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// The pass made no change that could invalidate earlier passes' work.
    Stable,
    /// The pass changed the definition set; run the whole sequence again.
    Repeat,
}

/// A structural change recorded by a pass, dispatched to observers.
enum PassEvent {
    Inlined { id: String, into: String },
    Removed { id: String },
}

/// Per-invocation context handed to a pass.
///
/// Carries the graph snapshot for this invocation plus message and event
/// sinks that feed the compiler's retained log and its observers. The
/// snapshot must not be stashed beyond the invocation; the runner rebuilds
/// it before the next pass runs.
pub struct PassContext<'a> {
    graph: &'a ReferenceGraph,
    messages: Vec<String>,
    events: Vec<PassEvent>,
}

impl<'a> PassContext<'a> {
    fn new(graph: &'a ReferenceGraph) -> Self {
        Self {
            graph,
            messages: Vec::new(),
            events: Vec::new(),
        }
    }

    /// The reference graph, rebuilt from the store just before this pass.
    pub fn graph(&self) -> &'a ReferenceGraph {
        self.graph
    }

    /// Records a log message attributed to the running pass.
    pub fn log(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Records that the definition `id` was inlined into a call site of
    /// `into`.
    pub fn definition_inlined(&mut self, id: &str, into: &str) {
        self.events.push(PassEvent::Inlined {
            id: id.to_string(),
            into: into.to_string(),
        });
    }

    /// Records that the identifier `id` was removed from the store.
    pub fn definition_removed(&mut self, id: &str) {
        self.events.push(PassEvent::Removed { id: id.to_string() });
    }
}

/// A graph-mutating compilation pass.
///
/// Passes are expected to be monotonic (strictly shrink or stabilize the
/// definition set); the runner bounds non-monotonic passes with an
/// iteration cap.
///
/// # Examples
///
/// ```rust
/// use anvil_di::{
///     Compiler, CompilerPass, CompileResult, DefinitionStore, PassContext, PassOutcome,
/// };
///
/// struct CountingPass;
///
/// impl CompilerPass for CountingPass {
///     fn name(&self) -> &'static str {
///         "counting"
///     }
///
///     fn process(
///         &mut self,
///         store: &mut DefinitionStore,
///         ctx: &mut PassContext,
///     ) -> CompileResult<PassOutcome> {
///         ctx.log(format!("saw {} definitions", store.definition_count()));
///         Ok(PassOutcome::Stable)
///     }
/// }
///
/// let mut store = DefinitionStore::new();
/// store.register("app", "App\\Kernel");
///
/// let mut compiler = Compiler::new();
/// compiler.add_pass(CountingPass);
/// compiler.compile(&mut store).unwrap();
/// assert_eq!(compiler.log(), ["counting: saw 1 definitions"]);
/// ```
pub trait CompilerPass {
    /// Short pass name used in logs and observer events.
    fn name(&self) -> &'static str;

    /// Processes the store against the current graph snapshot.
    fn process(
        &mut self,
        store: &mut DefinitionStore,
        ctx: &mut PassContext,
    ) -> CompileResult<PassOutcome>;
}

/// Observer hooks for compilation events.
///
/// Observers are called synchronously while the pipeline runs; keep
/// implementations lightweight.
pub trait CompileObserver {
    /// A pass is about to run in the given sweep (1-based).
    fn pass_started(&self, _pass: &str, _iteration: usize) {}

    /// A pass finished with the given outcome.
    fn pass_finished(&self, _pass: &str, _iteration: usize, _outcome: PassOutcome) {}

    /// A pass recorded a log message.
    fn message(&self, _pass: &str, _message: &str) {}

    /// A definition was inlined into a call site of `into`.
    fn definition_inlined(&self, _id: &str, _into: &str) {}

    /// An identifier was removed from the store.
    fn definition_removed(&self, _id: &str) {}
}

/// Observer that prints compilation events to stdout.
///
/// # Examples
///
/// ```rust
/// use std::rc::Rc;
/// use anvil_di::{Compiler, LoggingObserver};
///
/// let mut compiler = Compiler::with_optimizations();
/// compiler.add_observer(Rc::new(LoggingObserver::new()));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with the default prefix.
    pub fn new() -> Self {
        Self { prefix: "[anvil-di]".to_string() }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl CompileObserver for LoggingObserver {
    fn pass_started(&self, pass: &str, iteration: usize) {
        println!("{} Running {} (sweep {})", self.prefix, pass, iteration);
    }

    fn pass_finished(&self, pass: &str, iteration: usize, outcome: PassOutcome) {
        println!(
            "{} Finished {} (sweep {}): {:?}",
            self.prefix, pass, iteration, outcome
        );
    }

    fn message(&self, pass: &str, message: &str) {
        println!("{} {}: {}", self.prefix, pass, message);
    }

    fn definition_inlined(&self, id: &str, into: &str) {
        println!("{} Inlined \"{}\" into \"{}\"", self.prefix, id, into);
    }

    fn definition_removed(&self, id: &str) {
        println!("{} Removed \"{}\"", self.prefix, id);
    }
}

/// Runs an ordered pass pipeline over a store to a fixed point.
///
/// # Examples
///
/// ```rust
/// use anvil_di::{Argument, Compiler, DefinitionStore};
///
/// let mut store = DefinitionStore::new();
/// store
///     .register("app", "App\\Kernel")
///     .borrow_mut()
///     .add_argument(Argument::reference("router"));
/// store
///     .register("router", "App\\Router")
///     .borrow_mut()
///     .set_public(false);
///
/// let mut compiler = Compiler::with_optimizations();
/// compiler.compile(&mut store).unwrap();
///
/// // The private router was inlined into app and pruned.
/// assert!(store.has_definition("app"));
/// assert!(!store.has_definition("router"));
/// ```
pub struct Compiler {
    passes: Vec<Box<dyn CompilerPass>>,
    observers: Vec<Rc<dyn CompileObserver>>,
    max_iterations: usize,
    log: Vec<String>,
}

impl Compiler {
    /// Creates a compiler with an empty pipeline.
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            observers: Vec::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            log: Vec::new(),
        }
    }

    /// Creates a compiler with the standard optimization pipeline:
    /// inlining, then unused-definition pruning.
    pub fn with_optimizations() -> Self {
        let mut compiler = Self::new();
        compiler
            .add_pass(InlineDefinitionsPass::new())
            .add_pass(RemoveUnusedDefinitionsPass::new());
        compiler
    }

    /// Appends a pass to the pipeline.
    pub fn add_pass(&mut self, pass: impl CompilerPass + 'static) -> &mut Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Registers an observer for compilation events.
    pub fn add_observer(&mut self, observer: Rc<dyn CompileObserver>) -> &mut Self {
        self.observers.push(observer);
        self
    }

    /// Overrides the iteration cap.
    pub fn set_max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Messages recorded by passes during the last [`compile`] run, in
    /// order, each prefixed with the pass name.
    ///
    /// [`compile`]: Compiler::compile
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Runs the pipeline over the store until a full sweep is stable.
    ///
    /// The reference graph is rebuilt from the store before every pass
    /// invocation, so no pass ever observes a stale snapshot. Fails with
    /// [`CompileError::NotConverged`] if the pipeline still requests
    /// repeats after the iteration cap.
    pub fn compile(&mut self, store: &mut DefinitionStore) -> CompileResult<()> {
        self.log.clear();

        for iteration in 1..=self.max_iterations {
            let mut repeat = false;

            for pass in self.passes.iter_mut() {
                let graph = ReferenceGraph::build(store);
                let name = pass.name();

                for observer in &self.observers {
                    observer.pass_started(name, iteration);
                }

                let mut ctx = PassContext::new(&graph);
                let outcome = pass.process(store, &mut ctx)?;

                for message in ctx.messages {
                    for observer in &self.observers {
                        observer.message(name, &message);
                    }
                    self.log.push(format!("{}: {}", name, message));
                }

                for event in &ctx.events {
                    for observer in &self.observers {
                        match event {
                            PassEvent::Inlined { id, into } => {
                                observer.definition_inlined(id, into)
                            }
                            PassEvent::Removed { id } => observer.definition_removed(id),
                        }
                    }
                }

                for observer in &self.observers {
                    observer.pass_finished(name, iteration, outcome);
                }

                if outcome == PassOutcome::Repeat {
                    repeat = true;
                }
            }

            if !repeat {
                return Ok(());
            }
        }

        Err(CompileError::NotConverged(self.max_iterations))
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
