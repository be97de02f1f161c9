//! Error types for container compilation.

use std::fmt;

/// Container compilation errors
///
/// Represents the error conditions that can occur while running compiler
/// passes over a definition store in anvil-di.
///
/// # Examples
///
/// ```rust
/// use anvil_di::CompileError;
///
/// // Examples of error types
/// let cycle = CompileError::AliasCycle(vec![
///     "a".to_string(), "b".to_string(), "a".to_string(),
/// ]);
/// let diverged = CompileError::NotConverged(32);
/// let missing = CompileError::AliasNotFound("mailer".to_string());
///
/// // All errors implement Display
/// println!("Error: {}", cycle);
/// println!("Error: {}", diverged);
/// println!("Error: {}", missing);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Alias chain resolves back onto itself (includes path)
    AliasCycle(Vec<String>),
    /// Pass pipeline exceeded its iteration cap without reaching a fixed point
    NotConverged(usize),
    /// Alias chain step names an identifier with no alias or definition
    AliasNotFound(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::AliasCycle(path) => {
                write!(f, "Cyclic alias: {}", path.join(" -> "))
            }
            CompileError::NotConverged(iterations) => {
                write!(f, "Pipeline did not converge after {} iterations", iterations)
            }
            CompileError::AliasNotFound(id) => {
                write!(f, "Alias target not found: {}", id)
            }
        }
    }
}

impl std::error::Error for CompileError {}

/// Result type for compilation operations
///
/// A convenience type alias for `Result<T, CompileError>` used throughout
/// anvil-di, following the common Rust pattern of a crate-specific Result
/// type to reduce boilerplate in function signatures.
///
/// # Examples
///
/// ```rust
/// use anvil_di::{CompileResult, CompileError};
///
/// fn resolve(id: &str) -> CompileResult<String> {
///     if id.is_empty() {
///         Err(CompileError::AliasNotFound(id.to_string()))
///     } else {
///         Ok(id.to_string())
///     }
/// }
///
/// assert!(resolve("router").is_ok());
/// assert!(resolve("").is_err());
/// ```
pub type CompileResult<T> = Result<T, CompileError>;
