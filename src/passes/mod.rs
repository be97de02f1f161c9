//! Built-in compiler passes.
//!
//! The standard optimization pipeline runs [`InlineDefinitionsPass`] first,
//! then [`RemoveUnusedDefinitionsPass`]; inlining never deletes definitions
//! itself, it only makes them prunable.

mod inline;
mod prune;

pub use inline::InlineDefinitionsPass;
pub use prune::RemoveUnusedDefinitionsPass;
