//! Sort keys and the unified lexical item type
//!
//! Every lexical item flattens to a numeric sort key: a per-kind rank
//! constant followed by the keys of its components. The key determines the
//! total order across heterogeneous collections; equality and hashing are
//! structural, which coincides with key equality because the rank prefix
//! makes keys unambiguous.

use smallvec::SmallVec;

use crate::param::{Constant, Parameter, Variable};
use crate::predicate::Predicate;
use crate::sentence::Sentence;

/// Rank constant for predicates.
pub const RANK_PREDICATE: i32 = 10;
/// Rank constant for constants.
pub const RANK_CONSTANT: i32 = 20;
/// Rank constant for variables.
pub const RANK_VARIABLE: i32 = 30;
/// Rank constant for atomic sentences.
pub const RANK_ATOMIC: i32 = 40;
/// Rank constant for predicated sentences.
pub const RANK_PREDICATED: i32 = 50;
/// Rank constant for quantified sentences.
pub const RANK_QUANTIFIED: i32 = 60;
/// Rank constant for operated sentences.
pub const RANK_OPERATED: i32 = 70;

/// A flattened lexicographic sort key.
pub type SortKey = SmallVec<[i32; 12]>;

/// Items that flatten to a sort key.
pub trait Sortable {
    /// Append this item's key to `out`.
    fn write_sort_key(&self, out: &mut SortKey);

    /// The item's full sort key.
    fn sort_key(&self) -> SortKey {
        let mut key = SortKey::new();
        self.write_sort_key(&mut key);
        key
    }
}

/// Any lexical item, for heterogeneous ordering and storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LexItem {
    /// A predicate
    Predicate(Predicate),
    /// A constant
    Constant(Constant),
    /// A variable
    Variable(Variable),
    /// A sentence of any shape
    Sentence(Sentence),
}

impl Sortable for LexItem {
    fn write_sort_key(&self, out: &mut SortKey) {
        match self {
            LexItem::Predicate(p) => p.write_sort_key(out),
            LexItem::Constant(c) => c.write_sort_key(out),
            LexItem::Variable(v) => v.write_sort_key(out),
            LexItem::Sentence(s) => s.write_sort_key(out),
        }
    }
}

impl PartialOrd for LexItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LexItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl From<Predicate> for LexItem {
    fn from(p: Predicate) -> LexItem {
        LexItem::Predicate(p)
    }
}

impl From<Parameter> for LexItem {
    fn from(p: Parameter) -> LexItem {
        match p {
            Parameter::Constant(c) => LexItem::Constant(c),
            Parameter::Variable(v) => LexItem::Variable(v),
        }
    }
}

impl From<Sentence> for LexItem {
    fn from(s: Sentence) -> LexItem {
        LexItem::Sentence(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::Atomic;

    #[test]
    fn test_cross_kind_order() {
        let p = LexItem::from(Predicate::identity());
        let c = LexItem::Constant(Constant::new(0, 0).unwrap());
        let v = LexItem::Variable(Variable::new(0, 0).unwrap());
        let a = LexItem::from(Sentence::from(Atomic::new(0, 0).unwrap()));
        let mut items = vec![a.clone(), v.clone(), c.clone(), p.clone()];
        items.sort();
        assert_eq!(items, vec![p, c, v, a]);
    }
}
