//! Sentences and the sentence algebra
//!
//! Sentences are immutable trees shared via `Arc`: cloning is cheap and
//! equality is structural. Construction is the only mutation point; every
//! operation (negate, conjoin, substitute) returns a new sentence.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::item::{SortKey, Sortable, RANK_ATOMIC, RANK_OPERATED, RANK_PREDICATED, RANK_QUANTIFIED};
use crate::operators::{Operator, Quantifier};
use crate::param::{Constant, Parameter, Variable};
use crate::predicate::Predicate;
use crate::{LexError, LexResult, NUM_ATOMIC_SYMBOLS};

/// An atomic sentence (propositional letter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atomic {
    index: u8,
    subscript: u32,
}

impl Atomic {
    /// Create an atomic sentence, checking the index against the table size.
    pub fn new(index: u8, subscript: u32) -> LexResult<Atomic> {
        if index >= NUM_ATOMIC_SYMBOLS {
            return Err(LexError::IndexTooLarge(index as i32));
        }
        Ok(Atomic { index, subscript })
    }

    /// The symbol index.
    pub fn index(self) -> u8 {
        self.index
    }

    /// The subscript.
    pub fn subscript(self) -> u32 {
        self.subscript
    }

    /// The next atomic: index first, subscript rollover.
    pub fn next(self) -> Atomic {
        if self.index + 1 < NUM_ATOMIC_SYMBOLS {
            Atomic {
                index: self.index + 1,
                subscript: self.subscript,
            }
        } else {
            Atomic {
                index: 0,
                subscript: self.subscript + 1,
            }
        }
    }
}

impl Sortable for Atomic {
    fn write_sort_key(&self, out: &mut SortKey) {
        out.push(RANK_ATOMIC);
        out.push(self.index as i32);
        out.push(self.subscript as i32);
    }
}

/// A predicated sentence body.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Predication {
    /// The predicate applied.
    pub predicate: Predicate,
    /// Its parameters; the count equals the predicate arity.
    pub params: SmallVec<[Parameter; 2]>,
}

/// A quantified sentence body.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Quantification {
    /// The quantifier.
    pub quantifier: Quantifier,
    /// The bound variable.
    pub variable: Variable,
    /// The sentence quantified into.
    pub sentence: Sentence,
}

/// An operated sentence body.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Operation {
    /// The operator applied.
    pub operator: Operator,
    /// Its operands; the count equals the operator arity.
    pub operands: SmallVec<[Sentence; 2]>,
}

/// A sentence of any shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sentence {
    /// A propositional letter
    Atomic(Atomic),
    /// A predicate applied to parameters
    Predicated(Arc<Predication>),
    /// A quantified sentence
    Quantified(Arc<Quantification>),
    /// An operator applied to operands
    Operated(Arc<Operation>),
}

impl Sentence {
    /// Create a predicated sentence; the parameter count must equal the
    /// predicate arity.
    pub fn predicated(
        predicate: Predicate,
        params: impl IntoIterator<Item = Parameter>,
    ) -> LexResult<Sentence> {
        let params: SmallVec<[Parameter; 2]> = params.into_iter().collect();
        if params.len() != predicate.arity() as usize {
            return Err(LexError::PredicateArityMismatch {
                index: predicate.index(),
                subscript: predicate.subscript(),
                expected: predicate.arity(),
                got: params.len(),
            });
        }
        Ok(Sentence::Predicated(Arc::new(Predication {
            predicate,
            params,
        })))
    }

    /// Create a quantified sentence; the variable must occur in the body.
    pub fn quantified(
        quantifier: Quantifier,
        variable: Variable,
        sentence: Sentence,
    ) -> LexResult<Sentence> {
        if !sentence.variables().contains(&variable) {
            return Err(LexError::UnusedVariable(
                variable.index(),
                variable.subscript(),
            ));
        }
        Ok(Self::quantified_unchecked(quantifier, variable, sentence))
    }

    pub(crate) fn quantified_unchecked(
        quantifier: Quantifier,
        variable: Variable,
        sentence: Sentence,
    ) -> Sentence {
        Sentence::Quantified(Arc::new(Quantification {
            quantifier,
            variable,
            sentence,
        }))
    }

    /// Create an operated sentence; the operand count must equal the
    /// operator arity.
    pub fn operated(
        operator: Operator,
        operands: impl IntoIterator<Item = Sentence>,
    ) -> LexResult<Sentence> {
        let operands: SmallVec<[Sentence; 2]> = operands.into_iter().collect();
        if operands.len() != operator.arity() as usize {
            return Err(LexError::OperatorArityMismatch {
                operator: operator.name(),
                expected: operator.arity(),
                got: operands.len(),
            });
        }
        Ok(Sentence::Operated(Arc::new(Operation { operator, operands })))
    }

    fn unary(operator: Operator, operand: Sentence) -> Sentence {
        Sentence::Operated(Arc::new(Operation {
            operator,
            operands: SmallVec::from_iter([operand]),
        }))
    }

    fn binary(operator: Operator, lhs: Sentence, rhs: Sentence) -> Sentence {
        Sentence::Operated(Arc::new(Operation {
            operator,
            operands: SmallVec::from_iter([lhs, rhs]),
        }))
    }

    /// The negation of this sentence.
    pub fn negate(&self) -> Sentence {
        Sentence::unary(Operator::Negation, self.clone())
    }

    /// Strip a negation if present, else negate.
    pub fn negative(&self) -> Sentence {
        match self.negatum() {
            Some(inner) => inner.clone(),
            None => self.negate(),
        }
    }

    /// This sentence under the assertion operator.
    pub fn asserted(&self) -> Sentence {
        Sentence::unary(Operator::Assertion, self.clone())
    }

    /// Conjunction with `rhs`.
    pub fn conjoin(&self, rhs: &Sentence) -> Sentence {
        Sentence::binary(Operator::Conjunction, self.clone(), rhs.clone())
    }

    /// Disjunction with `rhs`.
    pub fn disjoin(&self, rhs: &Sentence) -> Sentence {
        Sentence::binary(Operator::Disjunction, self.clone(), rhs.clone())
    }

    /// The top-level operator, if any.
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Sentence::Operated(op) => Some(op.operator),
            _ => None,
        }
    }

    /// The top-level quantifier, if any.
    pub fn quantifier(&self) -> Option<Quantifier> {
        match self {
            Sentence::Quantified(q) => Some(q.quantifier),
            _ => None,
        }
    }

    /// The predicate, if this is a predicated sentence.
    pub fn predicate(&self) -> Option<&Predicate> {
        match self {
            Sentence::Predicated(p) => Some(&p.predicate),
            _ => None,
        }
    }

    /// The predication body, if this is a predicated sentence.
    pub fn predication(&self) -> Option<&Predication> {
        match self {
            Sentence::Predicated(p) => Some(p),
            _ => None,
        }
    }

    /// The quantification body, if this is a quantified sentence.
    pub fn quantification(&self) -> Option<&Quantification> {
        match self {
            Sentence::Quantified(q) => Some(q),
            _ => None,
        }
    }

    /// The sole operand of a unary operated sentence.
    pub fn operand(&self) -> Option<&Sentence> {
        match self {
            Sentence::Operated(op) if op.operands.len() == 1 => Some(&op.operands[0]),
            _ => None,
        }
    }

    /// The operand of a negation.
    pub fn negatum(&self) -> Option<&Sentence> {
        match self {
            Sentence::Operated(op) if op.operator == Operator::Negation => Some(&op.operands[0]),
            _ => None,
        }
    }

    /// Left operand of a binary operated sentence.
    pub fn lhs(&self) -> Option<&Sentence> {
        match self {
            Sentence::Operated(op) if op.operands.len() == 2 => Some(&op.operands[0]),
            _ => None,
        }
    }

    /// Right operand of a binary operated sentence.
    pub fn rhs(&self) -> Option<&Sentence> {
        match self {
            Sentence::Operated(op) if op.operands.len() == 2 => Some(&op.operands[1]),
            _ => None,
        }
    }

    /// All operands of an operated sentence.
    pub fn operands(&self) -> &[Sentence] {
        match self {
            Sentence::Operated(op) => &op.operands,
            _ => &[],
        }
    }

    /// Whether this is an atomic sentence.
    pub fn is_atomic(&self) -> bool {
        matches!(self, Sentence::Atomic(_))
    }

    /// Whether this is a predicated sentence.
    pub fn is_predicated(&self) -> bool {
        matches!(self, Sentence::Predicated(_))
    }

    /// Whether this is a quantified sentence.
    pub fn is_quantified(&self) -> bool {
        matches!(self, Sentence::Quantified(_))
    }

    /// Whether this is an operated sentence.
    pub fn is_operated(&self) -> bool {
        matches!(self, Sentence::Operated(_))
    }

    /// Whether the top-level operator is negation.
    pub fn is_negated(&self) -> bool {
        self.operator() == Some(Operator::Negation)
    }

    /// Whether this is a literal: atomic or predicated, possibly under one
    /// negation.
    pub fn is_literal(&self) -> bool {
        match self.negatum() {
            Some(inner) => inner.is_atomic() || inner.is_predicated(),
            None => self.is_atomic() || self.is_predicated(),
        }
    }

    /// Recursively substitute `new_param` for occurrences of `old_param`.
    ///
    /// Atomics pass through unchanged. Quantifiers do not capture; the
    /// caller is responsible for freshness when substituting under binders.
    pub fn substitute(&self, new_param: Parameter, old_param: Parameter) -> Sentence {
        match self {
            Sentence::Atomic(_) => self.clone(),
            Sentence::Predicated(p) => {
                let params = p
                    .params
                    .iter()
                    .map(|&param| if param == old_param { new_param } else { param })
                    .collect::<SmallVec<[Parameter; 2]>>();
                Sentence::Predicated(Arc::new(Predication {
                    predicate: p.predicate.clone(),
                    params,
                }))
            }
            Sentence::Quantified(q) => Sentence::quantified_unchecked(
                q.quantifier,
                q.variable,
                q.sentence.substitute(new_param, old_param),
            ),
            Sentence::Operated(op) => {
                let operands = op
                    .operands
                    .iter()
                    .map(|s| s.substitute(new_param, old_param))
                    .collect::<SmallVec<[Sentence; 2]>>();
                Sentence::Operated(Arc::new(Operation {
                    operator: op.operator,
                    operands,
                }))
            }
        }
    }

    /// The set of atomic sentences, recursive.
    pub fn atomics(&self) -> FxHashSet<Atomic> {
        let mut out = FxHashSet::default();
        self.collect_atomics(&mut out);
        out
    }

    fn collect_atomics(&self, out: &mut FxHashSet<Atomic>) {
        match self {
            Sentence::Atomic(a) => {
                out.insert(*a);
            }
            Sentence::Predicated(_) => {}
            Sentence::Quantified(q) => q.sentence.collect_atomics(out),
            Sentence::Operated(op) => {
                for s in &op.operands {
                    s.collect_atomics(out);
                }
            }
        }
    }

    /// The set of constants, recursive.
    pub fn constants(&self) -> FxHashSet<Constant> {
        let mut out = FxHashSet::default();
        self.collect_params(&mut |p| {
            if let Parameter::Constant(c) = p {
                out.insert(c);
            }
        });
        out
    }

    /// The set of variables, recursive.
    pub fn variables(&self) -> FxHashSet<Variable> {
        let mut out = FxHashSet::default();
        self.collect_params(&mut |p| {
            if let Parameter::Variable(v) = p {
                out.insert(v);
            }
        });
        out
    }

    fn collect_params(&self, f: &mut impl FnMut(Parameter)) {
        match self {
            Sentence::Atomic(_) => {}
            Sentence::Predicated(p) => {
                for &param in &p.params {
                    f(param);
                }
            }
            Sentence::Quantified(q) => q.sentence.collect_params(f),
            Sentence::Operated(op) => {
                for s in &op.operands {
                    s.collect_params(f);
                }
            }
        }
    }

    /// The set of predicates, recursive.
    pub fn predicates(&self) -> FxHashSet<Predicate> {
        let mut out = FxHashSet::default();
        self.collect_predicates(&mut out);
        out
    }

    fn collect_predicates(&self, out: &mut FxHashSet<Predicate>) {
        match self {
            Sentence::Atomic(_) => {}
            Sentence::Predicated(p) => {
                out.insert(p.predicate.clone());
            }
            Sentence::Quantified(q) => q.sentence.collect_predicates(out),
            Sentence::Operated(op) => {
                for s in &op.operands {
                    s.collect_predicates(out);
                }
            }
        }
    }

    /// Pre-order list of operators, duplicates kept.
    pub fn operators(&self) -> Vec<Operator> {
        let mut out = Vec::new();
        self.collect_operators(&mut out);
        out
    }

    fn collect_operators(&self, out: &mut Vec<Operator>) {
        match self {
            Sentence::Atomic(_) | Sentence::Predicated(_) => {}
            Sentence::Quantified(q) => q.sentence.collect_operators(out),
            Sentence::Operated(op) => {
                out.push(op.operator);
                for s in &op.operands {
                    s.collect_operators(out);
                }
            }
        }
    }

    /// Pre-order list of quantifiers, duplicates kept.
    pub fn quantifiers(&self) -> Vec<Quantifier> {
        let mut out = Vec::new();
        self.collect_quantifiers(&mut out);
        out
    }

    fn collect_quantifiers(&self, out: &mut Vec<Quantifier>) {
        match self {
            Sentence::Atomic(_) | Sentence::Predicated(_) => {}
            Sentence::Quantified(q) => {
                out.push(q.quantifier);
                q.sentence.collect_quantifiers(out);
            }
            Sentence::Operated(op) => {
                for s in &op.operands {
                    s.collect_quantifiers(out);
                }
            }
        }
    }

    /// The dual reformulation of a quantified sentence: the other
    /// quantifier over the negated body.
    pub fn quantifier_dual(&self) -> Option<Sentence> {
        let q = self.quantification()?;
        Some(Sentence::quantified_unchecked(
            q.quantifier.other(),
            q.variable,
            q.sentence.negate(),
        ))
    }

    /// Count of modal operators, recursive.
    pub fn modal_complexity(&self) -> usize {
        self.operators().iter().filter(|o| o.is_modal()).count()
    }
}

impl From<Atomic> for Sentence {
    fn from(a: Atomic) -> Sentence {
        Sentence::Atomic(a)
    }
}

impl Sortable for Sentence {
    fn write_sort_key(&self, out: &mut SortKey) {
        match self {
            Sentence::Atomic(a) => a.write_sort_key(out),
            Sentence::Predicated(p) => {
                out.push(RANK_PREDICATED);
                p.predicate.write_sort_key(out);
                for param in &p.params {
                    param.write_sort_key(out);
                }
            }
            Sentence::Quantified(q) => {
                out.push(RANK_QUANTIFIED);
                out.push(q.quantifier.rank());
                q.variable.write_sort_key(out);
                q.sentence.write_sort_key(out);
            }
            Sentence::Operated(op) => {
                out.push(RANK_OPERATED);
                out.push(op.operator.rank());
                for s in &op.operands {
                    s.write_sort_key(out);
                }
            }
        }
    }
}

impl PartialOrd for Sentence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sentence {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atomic(index: u8) -> Sentence {
        Sentence::from(Atomic::new(index, 0).unwrap())
    }

    #[test]
    fn test_double_negation_distinct() {
        let a = atomic(0);
        let nn = a.negate().negate();
        assert_ne!(a, nn);
        assert_eq!(a.atomics(), nn.atomics());
    }

    #[test]
    fn test_negative_strips_one_negation() {
        let a = atomic(0);
        assert_eq!(a.negate().negative(), a);
        assert_eq!(a.negative(), a.negate());
    }

    #[test]
    fn test_operator_arity_checked() {
        let a = atomic(0);
        assert!(Sentence::operated(Operator::Conjunction, [a.clone()]).is_err());
        assert!(Sentence::operated(Operator::Negation, [a.clone(), a]).is_err());
    }

    #[test]
    fn test_substitute_constant_for_variable() {
        let p = Predicate::new(0, 0, 1, None).unwrap();
        let v = Variable::new(0, 0).unwrap();
        let c = Constant::new(0, 0).unwrap();
        let s = Sentence::predicated(p.clone(), [Parameter::from(v)]).unwrap();
        let t = s.substitute(Parameter::from(c), Parameter::from(v));
        assert_eq!(t, Sentence::predicated(p, [Parameter::from(c)]).unwrap());
        assert!(t.variables().is_empty());
    }

    #[test]
    fn test_substitute_ignores_non_matching() {
        let a = atomic(1);
        let v = Variable::new(0, 0).unwrap();
        let c = Constant::new(0, 0).unwrap();
        assert_eq!(a.substitute(Parameter::from(c), Parameter::from(v)), a);
    }

    #[test]
    fn test_quantified_requires_variable() {
        let v = Variable::new(0, 0).unwrap();
        let a = atomic(0);
        assert!(Sentence::quantified(Quantifier::Universal, v, a).is_err());
    }

    #[test]
    fn test_is_literal() {
        let a = atomic(0);
        assert!(a.is_literal());
        assert!(a.negate().is_literal());
        assert!(!a.negate().negate().is_literal());
        assert!(!a.conjoin(&atomic(1)).is_literal());
    }

    #[test]
    fn test_operator_enumeration_preorder() {
        let a = atomic(0);
        let s = a.negate().conjoin(&a.disjoin(&a));
        assert_eq!(
            s.operators(),
            vec![
                Operator::Conjunction,
                Operator::Negation,
                Operator::Disjunction
            ]
        );
    }

    #[test]
    fn test_modal_complexity() {
        let a = atomic(0);
        let s = Sentence::operated(Operator::Necessity, [a.clone()])
            .unwrap()
            .conjoin(&Sentence::operated(Operator::Possibility, [a]).unwrap());
        assert_eq!(s.modal_complexity(), 2);
    }

    #[test]
    fn test_atomic_next_rollover() {
        let a = Atomic::new(NUM_ATOMIC_SYMBOLS - 1, 0).unwrap();
        let b = a.next();
        assert_eq!((b.index(), b.subscript()), (0, 1));
    }
}
