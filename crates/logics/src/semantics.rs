//! Truth values and per-logic semantics
//!
//! All logics draw their values from the four-element set `{F, N, B, T}`.
//! A `Semantics` fixes a logic's value subset, designated subset, truth
//! function, and model-level access-closure properties.

use lexicon::Operator;

/// A truth value. The declaration order is the linear rank used for
/// quantifier folding; in the FDE lattice N and B are incomparable, which
/// the meet/join functions handle directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// False
    F,
    /// Neither (gap)
    N,
    /// Both (glut)
    B,
    /// True
    T,
}

impl Value {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Value::F => "F",
            Value::N => "N",
            Value::B => "B",
            Value::T => "T",
        }
    }
}

/// Lattice meet: the value of a conjunction.
pub fn meet(a: Value, b: Value) -> Value {
    if a == Value::T {
        b
    } else if b == Value::T {
        a
    } else if a == b {
        a
    } else {
        Value::F
    }
}

/// Lattice join: the value of a disjunction.
pub fn join(a: Value, b: Value) -> Value {
    if a == Value::F {
        b
    } else if b == Value::F {
        a
    } else if a == b {
        a
    } else {
        Value::T
    }
}

/// Involutive negation: swaps T and F, fixes N and B.
pub fn negation(a: Value) -> Value {
    match a {
        Value::T => Value::F,
        Value::F => Value::T,
        v => v,
    }
}

/// A logic's semantic profile.
#[derive(Debug, Clone, Copy)]
pub struct Semantics {
    /// The logic name, matching its registry key.
    pub name: &'static str,
    /// The value set.
    pub values: &'static [Value],
    /// The designated subset.
    pub designated: &'static [Value],
    /// The truth function for non-modal operators.
    pub truth_fn: fn(Operator, Value, Option<Value>) -> Value,
    /// Whether modal operators are evaluated over the access relation
    /// (otherwise modal sentences are opaque).
    pub modal: bool,
    /// Whether quantified sentences are decomposed (otherwise opaque).
    pub quantified: bool,
    /// Reflexive access closure on finish.
    pub access_reflexive: bool,
    /// Serial access closure on finish.
    pub access_serial: bool,
    /// Transitive access closure on finish.
    pub access_transitive: bool,
    /// Symmetric access closure on finish.
    pub access_symmetric: bool,
}

impl Semantics {
    /// Whether the value is designated.
    pub fn is_designated(&self, v: Value) -> bool {
        self.designated.contains(&v)
    }

    /// Whether the value set contains `v`.
    pub fn has_value(&self, v: Value) -> bool {
        self.values.contains(&v)
    }

    /// The value for an atomic no node constrains: the gap where the
    /// logic has one, else F.
    pub fn unset_value(&self) -> Value {
        if self.has_value(Value::N) {
            Value::N
        } else {
            Value::F
        }
    }
}

/// The FDE truth function, shared by the K3/LP subsets.
pub fn fde_truth(op: Operator, a: Value, b: Option<Value>) -> Value {
    match op {
        Operator::Assertion => a,
        Operator::Negation => negation(a),
        Operator::Conjunction => meet(a, b.unwrap_or(Value::T)),
        Operator::Disjunction => join(a, b.unwrap_or(Value::F)),
        Operator::MaterialConditional | Operator::Conditional => {
            join(negation(a), b.unwrap_or(Value::F))
        }
        Operator::MaterialBiconditional | Operator::Biconditional => {
            let b = b.unwrap_or(Value::F);
            meet(join(negation(a), b), join(negation(b), a))
        }
        Operator::Possibility | Operator::Necessity => a,
    }
}

/// The classical bivalent truth function.
pub fn bivalent_truth(op: Operator, a: Value, b: Option<Value>) -> Value {
    fde_truth(op, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fde_lattice_corners() {
        assert_eq!(meet(Value::N, Value::B), Value::F);
        assert_eq!(join(Value::N, Value::B), Value::T);
        assert_eq!(meet(Value::N, Value::T), Value::N);
        assert_eq!(join(Value::B, Value::F), Value::B);
    }

    #[test]
    fn test_negation_fixes_middle_values() {
        assert_eq!(negation(Value::N), Value::N);
        assert_eq!(negation(Value::B), Value::B);
        assert_eq!(negation(Value::T), Value::F);
    }

    #[test]
    fn test_material_conditional_is_definable() {
        let v = fde_truth(Operator::MaterialConditional, Value::T, Some(Value::F));
        assert_eq!(v, Value::F);
        let v = fde_truth(Operator::MaterialConditional, Value::F, Some(Value::F));
        assert_eq!(v, Value::T);
    }
}
