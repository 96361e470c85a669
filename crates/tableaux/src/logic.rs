//! The per-logic bundle
//!
//! Each logic supplies a trunk builder, a rule installer, a
//! branching-complexity forecast, and a model builder. The engine holds a
//! `&'static Logic` and consults it at the lifecycle points; everything
//! else about a logic lives in its own crate.

use lexicon::Argument;

use crate::branch::Branch;
use crate::node::NodeProps;
use crate::rule::RuleSet;
use crate::tableau::{TabWriter, TableauOptions};

/// Display metadata for a logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    /// Short name, e.g. `"CPL"`.
    pub name: &'static str,
    /// Full title.
    pub title: &'static str,
    /// Category, e.g. `"Bivalent Modal"`.
    pub category: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Classification tags.
    pub tags: &'static [&'static str],
    /// Ordering within the category listing.
    pub category_order: u32,
}

/// A counter-model read from an open branch.
pub trait CounterModel: std::fmt::Debug {
    /// The model identity within its tableau.
    fn id(&self) -> usize;

    /// Whether the model demonstrates the argument invalid.
    fn is_countermodel(&self) -> bool;

    /// Re-check against an argument.
    fn is_countermodel_to(&self, argument: &Argument) -> bool;
}

/// A logic bundle: what the engine needs to drive a proof.
pub struct Logic {
    /// Display metadata.
    pub meta: Meta,
    /// Seed the root branch(es) from an argument.
    pub build_trunk: fn(&mut TabWriter<'_>, &Argument),
    /// Install the closure group and rule groups.
    pub add_rules: fn(&mut RuleSet, &TableauOptions),
    /// Forecast added branches for a node, used in candidate scoring.
    pub branching_complexity: fn(&NodeProps) -> u32,
    /// Read a counter-model from an open branch. The model id is assigned
    /// by the caller.
    pub build_model: fn(&Branch, Option<&Argument>, usize) -> Box<dyn CounterModel>,
}

impl std::fmt::Debug for Logic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logic").field("name", &self.meta.name).finish()
    }
}
