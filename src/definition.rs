//! Service definitions and the argument data model.
//!
//! A [`Definition`] describes how to construct one service: its class, its
//! constructor arguments, post-construction method calls, sharing and
//! visibility flags, and tag metadata. Compiler passes mutate definitions in
//! place, so the store hands them out behind [`DefinitionRef`] handles.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Shared, interior-mutable handle to a definition.
///
/// Compilation is a single-threaded batch transformation, so handles use
/// `Rc<RefCell<_>>` rather than `Arc`. Handle identity matters: inlining a
/// shared service aliases the stored handle instead of copying it, which is
/// what preserves singleton semantics at the surviving call site.
pub type DefinitionRef = Rc<RefCell<Definition>>;

/// Attribute map attached to one tag occurrence.
pub type TagAttributes = HashMap<String, String>;

/// A scalar literal argument value.
///
/// Container parameters and literal constructor arguments are restricted to
/// these kinds; anything structured is expressed with [`Argument::List`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent/null literal
    Null,
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Floating-point literal
    Float(f64),
    /// String literal
    Str(String),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// A typed pointer from an argument position to a service identifier.
///
/// A reference does not own its target; if a pass removes the target
/// identifier the reference goes stale, and it is the passes' job to rewrite
/// or drop it.
///
/// # Examples
///
/// ```rust
/// use anvil_di::Reference;
///
/// let reference = Reference::new("logger");
/// assert_eq!(reference.id(), "logger");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    id: String,
}

impl Reference {
    /// Creates a reference to the given service identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The referenced service identifier.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// A named indirection that resolves to another identifier.
///
/// Alias chains (`a` → `b` → `c`) are legal; cycles are not and are reported
/// as [`CompileError::AliasCycle`](crate::CompileError::AliasCycle) when a
/// pass needs to resolve the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    target: String,
}

impl Alias {
    /// Creates an alias pointing at the given identifier.
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }

    /// The aliased identifier.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target)
    }
}

/// One constructor or method-call argument.
///
/// This is a closed variant type: every recursive traversal in the compiler
/// matches exhaustively over these four cases instead of inspecting types at
/// runtime.
///
/// # Examples
///
/// ```rust
/// use anvil_di::{Argument, Reference, Value};
///
/// let args = vec![
///     Argument::Value(Value::Str("app.log".to_string())),
///     Argument::Reference(Reference::new("formatter")),
///     Argument::List(vec![Argument::Value(Value::Int(3))]),
/// ];
/// assert_eq!(args.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub enum Argument {
    /// A scalar literal
    Value(Value),
    /// A nested, ordered list of arguments
    List(Vec<Argument>),
    /// A reference to another service by identifier
    Reference(Reference),
    /// An inline definition, constructed at the call site
    Definition(DefinitionRef),
}

impl Argument {
    /// Convenience constructor for a scalar literal argument.
    pub fn value(v: impl Into<Value>) -> Self {
        Argument::Value(v.into())
    }

    /// Convenience constructor for a reference argument.
    pub fn reference(id: impl Into<String>) -> Self {
        Argument::Reference(Reference::new(id))
    }
}

/// A post-construction method call: method name plus ordered arguments.
#[derive(Debug, Clone)]
pub struct MethodCall {
    method: String,
    arguments: Vec<Argument>,
}

impl MethodCall {
    /// Creates a method call with the given arguments.
    pub fn new(method: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self { method: method.into(), arguments }
    }

    /// The method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The call arguments, in order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Mutable access to the call arguments, used by rewriting passes.
    pub fn arguments_mut(&mut self) -> &mut Vec<Argument> {
        &mut self.arguments
    }
}

/// Describes one constructible service.
///
/// Definitions are created while the container is configured, mutated in
/// place by compiler passes, and consumed by a downstream service locator
/// that must honor the `shared` and `public` flags exactly as the pipeline
/// left them.
///
/// All setters are fluent so configuration reads as a chain:
///
/// ```rust
/// use anvil_di::{Argument, Definition, Reference};
///
/// let mut definition = Definition::new("App\\Mailer");
/// definition
///     .add_argument(Argument::Reference(Reference::new("transport")))
///     .add_method_call("set_logger", vec![Argument::reference("logger")])
///     .set_shared(true)
///     .set_public(false)
///     .add_tag("app.mailer", Default::default());
///
/// assert_eq!(definition.class(), "App\\Mailer");
/// assert!(definition.is_shared());
/// assert!(!definition.is_public());
/// ```
#[derive(Debug, Clone)]
pub struct Definition {
    class: String,
    arguments: Vec<Argument>,
    method_calls: Vec<MethodCall>,
    shared: bool,
    public: bool,
    factory_method: Option<String>,
    factory_service: Option<String>,
    file: Option<String>,
    configurator: Option<String>,
    tags: HashMap<String, Vec<TagAttributes>>,
}

impl Definition {
    /// Creates a definition for the given class with no arguments.
    ///
    /// Definitions start out shared and public; passes and configuration
    /// narrow from there.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            arguments: Vec::new(),
            method_calls: Vec::new(),
            shared: true,
            public: true,
            factory_method: None,
            factory_service: None,
            file: None,
            configurator: None,
            tags: HashMap::new(),
        }
    }

    /// Creates a definition with constructor arguments.
    pub fn with_arguments(class: impl Into<String>, arguments: Vec<Argument>) -> Self {
        let mut definition = Self::new(class);
        definition.arguments = arguments;
        definition
    }

    // ----- Class -----

    /// The class/type name this definition constructs.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Replaces the class name.
    pub fn set_class(&mut self, class: impl Into<String>) -> &mut Self {
        self.class = class.into();
        self
    }

    // ----- Constructor arguments -----

    /// The constructor arguments, in order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Mutable access to the constructor arguments, used by rewriting passes.
    pub fn arguments_mut(&mut self) -> &mut Vec<Argument> {
        &mut self.arguments
    }

    /// Replaces all constructor arguments.
    pub fn set_arguments(&mut self, arguments: Vec<Argument>) -> &mut Self {
        self.arguments = arguments;
        self
    }

    /// Appends one constructor argument.
    pub fn add_argument(&mut self, argument: Argument) -> &mut Self {
        self.arguments.push(argument);
        self
    }

    // ----- Method calls -----

    /// The post-construction method calls, in order.
    pub fn method_calls(&self) -> &[MethodCall] {
        &self.method_calls
    }

    /// Mutable access to the method calls, used by rewriting passes.
    pub fn method_calls_mut(&mut self) -> &mut Vec<MethodCall> {
        &mut self.method_calls
    }

    /// Replaces all method calls.
    pub fn set_method_calls(&mut self, calls: Vec<MethodCall>) -> &mut Self {
        self.method_calls = calls;
        self
    }

    /// Appends a method call.
    pub fn add_method_call(
        &mut self,
        method: impl Into<String>,
        arguments: Vec<Argument>,
    ) -> &mut Self {
        self.method_calls.push(MethodCall::new(method, arguments));
        self
    }

    /// Returns true if a call to the given method is registered.
    pub fn has_method_call(&self, method: &str) -> bool {
        self.method_calls.iter().any(|call| call.method == method)
    }

    /// Removes all calls to the given method.
    pub fn remove_method_call(&mut self, method: &str) -> &mut Self {
        self.method_calls.retain(|call| call.method != method);
        self
    }

    // ----- Flags -----

    /// Whether at most one instance is constructed and shared (singleton).
    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// Sets the shared (singleton) flag.
    pub fn set_shared(&mut self, shared: bool) -> &mut Self {
        self.shared = shared;
        self
    }

    /// Whether the service is fetchable from outside the container.
    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Sets the public flag.
    pub fn set_public(&mut self, public: bool) -> &mut Self {
        self.public = public;
        self
    }

    // ----- Factory / file / configurator -----

    /// The factory method used instead of the constructor, if any.
    pub fn factory_method(&self) -> Option<&str> {
        self.factory_method.as_deref()
    }

    /// Sets the factory method.
    pub fn set_factory_method(&mut self, method: impl Into<String>) -> &mut Self {
        self.factory_method = Some(method.into());
        self
    }

    /// The service the factory method is invoked on, if any.
    pub fn factory_service(&self) -> Option<&str> {
        self.factory_service.as_deref()
    }

    /// Sets the factory service.
    pub fn set_factory_service(&mut self, service: impl Into<String>) -> &mut Self {
        self.factory_service = Some(service.into());
        self
    }

    /// The file to require before construction, if any.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Sets the file to require before construction.
    pub fn set_file(&mut self, file: impl Into<String>) -> &mut Self {
        self.file = Some(file.into());
        self
    }

    /// The configurator invoked after construction, if any.
    pub fn configurator(&self) -> Option<&str> {
        self.configurator.as_deref()
    }

    /// Sets the configurator invoked after construction.
    pub fn set_configurator(&mut self, configurator: impl Into<String>) -> &mut Self {
        self.configurator = Some(configurator.into());
        self
    }

    // ----- Tags -----

    /// All tags: tag name to ordered attribute maps.
    pub fn tags(&self) -> &HashMap<String, Vec<TagAttributes>> {
        &self.tags
    }

    /// The attribute maps recorded for one tag name.
    ///
    /// Returns an empty slice if the tag was never added. The same tag can
    /// be added several times with different attributes.
    pub fn tag(&self, name: &str) -> &[TagAttributes] {
        self.tags.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Adds one occurrence of a tag with the given attributes.
    pub fn add_tag(&mut self, name: impl Into<String>, attributes: TagAttributes) -> &mut Self {
        self.tags.entry(name.into()).or_default().push(attributes);
        self
    }

    /// Returns true if the tag was added at least once.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Removes all tags.
    pub fn clear_tags(&mut self) -> &mut Self {
        self.tags.clear();
        self
    }

    /// Wraps this definition in a fresh [`DefinitionRef`] handle.
    pub fn into_ref(self) -> DefinitionRef {
        Rc::new(RefCell::new(self))
    }
}
