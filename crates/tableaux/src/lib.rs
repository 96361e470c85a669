//! Tableau proof engine
//!
//! The engine drives declarative rules over a tree of branches:
//!
//! - [`node`] and [`branch`]: the proof-tree data structures, with
//!   per-property reverse indices for fast lookup
//! - [`rule`]: the rule trait, targets, and the grouped rule registry
//! - [`helpers`]: per-rule state gadgets (constants tracking, world
//!   indices, quit flags)
//! - [`tableau`]: the driver loop with scheduling, scoring, timers,
//!   history, and timeouts
//! - [`tree`]: the tree-structure report built on finish
//! - [`logic`]: the per-logic bundle consulted by the driver
//!
//! A tableau is single-threaded cooperative: all state is exclusively
//! owned, rules run to completion, and timeouts are enforced between
//! steps.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

/// Proof-tree nodes
pub mod node;
/// Branches with reverse indices
pub mod branch;
/// The rule trait, targets, and rule registry
pub mod rule;
/// Per-rule state gadgets
pub mod helpers;
/// The per-logic bundle
pub mod logic;
/// The driver
pub mod tableau;
/// The tree-structure report
pub mod tree;
/// Accumulating timers
pub mod stopwatch;

pub use branch::{Branch, BranchId};
pub use logic::{CounterModel, Logic, Meta};
pub use node::{FlagKind, Node, NodeId, NodeProps, NodeQuery, World};
pub use rule::{Adds, Rule, RuleSet, Target};
pub use stopwatch::StopWatch;
pub use tableau::{Stats, StepEntry, TabWriter, Tableau, TableauOptions};
pub use tree::TreeStruct;

/// Engine error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableauError {
    /// A lifecycle violation: mutating locked state or repeating a
    /// one-shot transition
    #[error("Illegal state: {0}")]
    IllegalState(&'static str),

    /// The build timeout was exceeded
    #[error("Timeout of {0}ms exceeded")]
    Timeout(u64),

    /// A model was requested from a closed branch
    #[error("Cannot build a model from a closed branch")]
    BranchClosed,
}

/// Result type for engine operations
pub type TableauResult<T> = Result<T, TableauError>;
