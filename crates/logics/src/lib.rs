//! Logic bundles for the tableaux engine
//!
//! Each logic module exports a static [`tableaux::Logic`] bundle: display
//! metadata, a trunk builder, the rule registry installer, a
//! branching-complexity table, and a model reader. The [`registry`]
//! resolves logics by name; [`examples`] holds prebuilt named arguments.
//!
//! Shipped logics:
//!
//! - Many-valued: FDE, K3, K3W, LP, L3, G3, RM3, MH, NH
//! - Bivalent: CPL, CFOL
//! - Bivalent modal: K, D, T, S4, S5

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

/// Truth values and per-logic semantics
pub mod semantics;
/// The generic model reader
pub mod model;
/// Shared rule implementations
pub mod rules;
/// The process-wide logic registry
pub mod registry;
/// Prebuilt named arguments
pub mod examples;

mod bivalent;

/// First Degree Entailment
pub mod fde;
/// Strong Kleene
pub mod k3;
/// Weak Kleene
pub mod k3w;
/// Logic of Paradox
pub mod lp;
/// Lukasiewicz 3-valued
pub mod l3;
/// Goedel 3-valued
pub mod g3;
/// R-mingle 3
pub mod rm3;
/// Paracomplete hybrid
pub mod mh;
/// Paraconsistent hybrid
pub mod nh;
/// Classical propositional
pub mod cpl;
/// Classical first-order
pub mod cfol;
/// Kripke normal modal
pub mod k;
/// Serial normal modal
pub mod d;
/// Reflexive normal modal
pub mod t;
/// Transitive reflexive normal modal
pub mod s4;
/// Equivalence-relation normal modal
pub mod s5;

pub use model::Model;
pub use registry::{get, names, register};
pub use semantics::{Semantics, Value};

/// Model error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// An incompatible reassignment of a sentence's value
    #[error("Incompatible value reassignment: {0}")]
    ModelValue(String),

    /// A term's denotation was read before being set
    #[error("No denotation for constant ({0}, {1})")]
    Denotation(u8, u32),

    /// No logic registered under the name
    #[error("Unknown logic: {0}")]
    UnknownLogic(String),
}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;
