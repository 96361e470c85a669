//! Predicates and the predicate table
//!
//! A predicate is identified by `(index, subscript)` with a fixed arity.
//! System predicates (Identity, Existence) carry negative indexes and are
//! pre-registered in every table. Equality, hashing, and ordering ignore
//! the optional display name.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::item::{SortKey, Sortable, RANK_PREDICATE};
use crate::{LexError, LexResult, NUM_PREDICATE_SYMBOLS};

/// A predicate symbol with a fixed arity.
#[derive(Debug, Clone)]
pub struct Predicate {
    index: i16,
    subscript: u32,
    arity: u8,
    name: Option<Arc<str>>,
}

impl Predicate {
    /// Create a user predicate. The index must fit the notation tables and
    /// the arity must be positive.
    pub fn new(index: u8, subscript: u32, arity: u8, name: Option<&str>) -> LexResult<Predicate> {
        if index >= NUM_PREDICATE_SYMBOLS {
            return Err(LexError::IndexTooLarge(index as i32));
        }
        if arity == 0 {
            return Err(LexError::PredicateArity(0));
        }
        Ok(Predicate {
            index: index as i16,
            subscript,
            arity,
            name: name.map(Arc::from),
        })
    }

    /// The system Identity predicate (binary, index -1).
    pub fn identity() -> Predicate {
        Predicate {
            index: -1,
            subscript: 0,
            arity: 2,
            name: Some(Arc::from("Identity")),
        }
    }

    /// The system Existence predicate (unary, index -2).
    pub fn existence() -> Predicate {
        Predicate {
            index: -2,
            subscript: 0,
            arity: 1,
            name: Some(Arc::from("Existence")),
        }
    }

    /// The symbol index; negative for system predicates.
    pub fn index(&self) -> i16 {
        self.index
    }

    /// The subscript.
    pub fn subscript(&self) -> u32 {
        self.subscript
    }

    /// The arity.
    pub fn arity(&self) -> u8 {
        self.arity
    }

    /// The display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether this is a system predicate.
    pub fn is_system(&self) -> bool {
        self.index < 0
    }

    /// Whether this is the Identity predicate.
    pub fn is_identity(&self) -> bool {
        self.index == -1 && self.subscript == 0
    }

    /// Whether this is the Existence predicate.
    pub fn is_existence(&self) -> bool {
        self.index == -2 && self.subscript == 0
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
            && self.subscript == other.subscript
            && self.arity == other.arity
    }
}

impl Eq for Predicate {}

impl std::hash::Hash for Predicate {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.subscript.hash(state);
        self.arity.hash(state);
    }
}

impl PartialOrd for Predicate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Predicate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.index, self.subscript, self.arity).cmp(&(
            other.index,
            other.subscript,
            other.arity,
        ))
    }
}

impl Sortable for Predicate {
    fn write_sort_key(&self, out: &mut SortKey) {
        out.push(RANK_PREDICATE);
        out.push(self.index as i32);
        out.push(self.subscript as i32);
        out.push(self.arity as i32);
    }
}

/// A table of declared predicates, indexed by coordinates and by name.
///
/// System predicates are always present. Iteration follows declaration
/// order.
#[derive(Debug, Clone)]
pub struct Predicates {
    by_coords: IndexMap<(i16, u32), Predicate>,
    by_name: IndexMap<String, (i16, u32)>,
}

impl Predicates {
    /// A table containing only the system predicates.
    pub fn new() -> Predicates {
        let mut table = Predicates {
            by_coords: IndexMap::new(),
            by_name: IndexMap::new(),
        };
        for p in [Predicate::identity(), Predicate::existence()] {
            let coords = (p.index(), p.subscript());
            if let Some(name) = p.name() {
                table.by_name.insert(name.to_string(), coords);
            }
            table.by_coords.insert(coords, p);
        }
        table
    }

    /// Declare a user predicate. Re-declaring identical coordinates with
    /// the same arity is idempotent; a different arity is an error.
    pub fn declare(
        &mut self,
        index: u8,
        subscript: u32,
        arity: u8,
        name: Option<&str>,
    ) -> LexResult<Predicate> {
        let p = Predicate::new(index, subscript, arity, name)?;
        self.add(p)
    }

    /// Add an existing predicate value to the table.
    pub fn add(&mut self, p: Predicate) -> LexResult<Predicate> {
        let coords = (p.index(), p.subscript());
        if let Some(existing) = self.by_coords.get(&coords) {
            if existing.arity() != p.arity() {
                return Err(LexError::PredicateAlreadyDeclared(coords.0, coords.1));
            }
            return Ok(existing.clone());
        }
        if let Some(name) = p.name() {
            if self.by_name.contains_key(name) {
                return Err(LexError::PredicateAlreadyDeclared(coords.0, coords.1));
            }
            self.by_name.insert(name.to_string(), coords);
        }
        self.by_coords.insert(coords, p.clone());
        Ok(p)
    }

    /// Look up a predicate by coordinates.
    pub fn get(&self, index: i16, subscript: u32) -> LexResult<&Predicate> {
        self.by_coords
            .get(&(index, subscript))
            .ok_or_else(|| LexError::NoSuchPredicate(format!("({index}, {subscript})")))
    }

    /// Look up a predicate by name.
    pub fn get_by_name(&self, name: &str) -> LexResult<&Predicate> {
        self.by_name
            .get(name)
            .and_then(|coords| self.by_coords.get(coords))
            .ok_or_else(|| LexError::NoSuchPredicate(name.to_string()))
    }

    /// Whether the exact predicate value is in the table.
    pub fn contains(&self, p: &Predicate) -> bool {
        self.by_coords
            .get(&(p.index(), p.subscript()))
            .is_some_and(|q| q == p)
    }

    /// All user predicates in declaration order.
    pub fn user_predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.by_coords.values().filter(|p| !p.is_system())
    }

    /// Number of predicates, system predicates included.
    pub fn len(&self) -> usize {
        self.by_coords.len()
    }

    /// Whether the table holds only the system predicates.
    pub fn is_empty(&self) -> bool {
        self.by_coords.len() == 2
    }
}

impl Default for Predicates {
    fn default() -> Predicates {
        Predicates::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_predicates_preregistered() {
        let table = Predicates::new();
        assert_eq!(table.get_by_name("Identity").unwrap().arity(), 2);
        assert_eq!(table.get(-2, 0).unwrap().arity(), 1);
    }

    #[test]
    fn test_redeclare_same_arity_idempotent() {
        let mut table = Predicates::new();
        table.declare(0, 0, 1, Some("is tall")).unwrap();
        assert!(table.declare(0, 0, 1, None).is_ok());
        assert_eq!(table.user_predicates().count(), 1);
    }

    #[test]
    fn test_redeclare_different_arity_errors() {
        let mut table = Predicates::new();
        table.declare(0, 0, 1, None).unwrap();
        assert_eq!(
            table.declare(0, 0, 2, None),
            Err(LexError::PredicateAlreadyDeclared(0, 0))
        );
    }

    #[test]
    fn test_lookup_by_name_and_coords_agree() {
        let mut table = Predicates::new();
        let p = table.declare(1, 0, 2, Some("is taller than")).unwrap();
        assert_eq!(table.get_by_name("is taller than").unwrap(), &p);
        assert_eq!(table.get(1, 0).unwrap(), &p);
    }

    #[test]
    fn test_name_ignored_by_equality() {
        let a = Predicate::new(0, 0, 1, Some("p")).unwrap();
        let b = Predicate::new(0, 0, 1, None).unwrap();
        assert_eq!(a, b);
    }
}
