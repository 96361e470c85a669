//! The generic model reader
//!
//! One model type serves every logic, parameterised by its
//! [`Semantics`]: per-world frames assign values to atomics, opaque
//! sentences, and predicate extensions; modal logics add an access
//! relation closed under the logic's frame properties on finish.
//!
//! `read_branch` walks an open branch's literal nodes and merges their
//! polarity/designation information; `finish` closes identity classes,
//! applies access closures, and resolves values.

use std::collections::BTreeMap;

use indexmap::IndexSet;
use lexicon::{Argument, Constant, Operator, Parameter, Predicate, Quantifier, Sentence};
use rustc_hash::FxHashMap;
use tableaux::{Branch, CounterModel, World};
use tracing::warn;

use crate::semantics::{join, meet, Semantics, Value};
use crate::{ModelError, ModelResult};

// Merged polarity/designation evidence for one base sentence.
#[derive(Debug, Clone, Copy, Default)]
struct ValueState {
    pos_designated: bool,
    neg_designated: bool,
    pos_undesignated: bool,
    neg_undesignated: bool,
}

impl ValueState {
    fn record(&mut self, polarity: bool, designated: bool) {
        match (polarity, designated) {
            (true, true) => self.pos_designated = true,
            (false, true) => self.neg_designated = true,
            (true, false) => self.pos_undesignated = true,
            (false, false) => self.neg_undesignated = true,
        }
    }

    fn resolve(&self, semantics: &Semantics) -> Value {
        let gap = semantics.has_value(Value::N);
        if self.pos_designated && self.neg_designated {
            Value::B
        } else if self.pos_designated {
            Value::T
        } else if self.neg_designated {
            Value::F
        } else if self.pos_undesignated && self.neg_undesignated {
            if gap {
                Value::N
            } else {
                Value::F
            }
        } else if self.pos_undesignated {
            if gap {
                Value::N
            } else {
                Value::F
            }
        } else if self.neg_undesignated {
            if gap {
                Value::N
            } else {
                Value::T
            }
        } else {
            semantics.unset_value()
        }
    }
}

/// A predicate's extension and anti-extension over constant tuples.
#[derive(Debug, Clone, Default)]
pub struct PredExtension {
    /// Tuples the predicate positively holds of.
    pub pos: IndexSet<Vec<Constant>>,
    /// Tuples the predicate negatively holds of.
    pub neg: IndexSet<Vec<Constant>>,
}

/// One world's assignment.
#[derive(Debug, Default)]
pub struct Frame {
    literals: FxHashMap<Sentence, ValueState>,
    opaques: FxHashMap<Sentence, ValueState>,
    predicates: FxHashMap<Predicate, PredExtension>,
}

/// A semantic counter-model read from an open branch.
#[derive(Debug)]
pub struct Model {
    id: usize,
    semantics: &'static Semantics,
    frames: BTreeMap<World, Frame>,
    access: IndexSet<(World, World)>,
    constants: IndexSet<Constant>,
    denotations: FxHashMap<Constant, Constant>,
    countermodel: bool,
}

impl Model {
    /// Read a model from an open branch, finalise it, and check it
    /// against the argument.
    pub fn read_branch(
        semantics: &'static Semantics,
        branch: &Branch,
        argument: Option<&Argument>,
        id: usize,
    ) -> Model {
        let mut model = Model {
            id,
            semantics,
            frames: BTreeMap::new(),
            access: IndexSet::new(),
            constants: branch.constants().iter().copied().collect(),
            denotations: FxHashMap::default(),
            countermodel: false,
        };
        model.frames.entry(0).or_default();
        for node in branch.nodes() {
            if let Some((w1, w2)) = node.access() {
                model.access.insert((w1, w2));
                model.frames.entry(w1).or_default();
                model.frames.entry(w2).or_default();
                continue;
            }
            let Some(sentence) = node.sentence() else {
                continue;
            };
            let world = node.world().unwrap_or(0);
            model.frames.entry(world).or_default();
            // Bivalent nodes carry no marker; presence means designated.
            let designated = node.designated().unwrap_or(true);
            model.read_literal(sentence, world, designated);
        }
        model.finish();
        if let Some(argument) = argument {
            model.countermodel = model.is_countermodel_to(argument);
        }
        model
    }

    fn read_literal(&mut self, sentence: &Sentence, world: World, designated: bool) {
        let (polarity, base) = match sentence.negatum() {
            Some(inner) => (false, inner.clone()),
            None => (true, sentence.clone()),
        };
        let opaque = is_opaque(self.semantics, &base);
        if let Sentence::Predicated(p) = &base {
            for param in &p.params {
                if let Parameter::Constant(c) = param {
                    self.constants.insert(*c);
                }
            }
        }
        let frame = self.frames.entry(world).or_default();
        if opaque {
            frame
                .opaques
                .entry(base)
                .or_default()
                .record(polarity, designated);
            return;
        }
        match &base {
            Sentence::Atomic(_) | Sentence::Predicated(_) => {
                frame
                    .literals
                    .entry(base.clone())
                    .or_default()
                    .record(polarity, designated);
            }
            // Non-literal leftovers on an unsaturated branch carry no
            // direct assignment.
            _ => {}
        }
    }

    // Identity classes, predicate extensions, denotations, and access
    // closure.
    fn finish(&mut self) {
        for &c in &self.constants {
            self.denotations.insert(c, c);
        }
        // Union identity classes from designated positive identities.
        let mut pairs: Vec<(Constant, Constant)> = Vec::new();
        for frame in self.frames.values() {
            for (base, state) in &frame.literals {
                if !state.pos_designated {
                    continue;
                }
                if let Some(p) = base.predication() {
                    if p.predicate.is_identity() {
                        if let (Parameter::Constant(a), Parameter::Constant(b)) =
                            (p.params[0], p.params[1])
                        {
                            pairs.push((a, b));
                        }
                    }
                }
            }
        }
        for (a, b) in pairs {
            let ra = self.denote(a);
            let rb = self.denote(b);
            if ra != rb {
                self.denotations.insert(rb, ra);
            }
        }
        // Path-compress to stable representatives.
        let keys: Vec<Constant> = self.denotations.keys().copied().collect();
        for k in keys {
            let r = self.denote(k);
            self.denotations.insert(k, r);
        }
        // Build predicate extensions over representatives.
        for frame in self.frames.values_mut() {
            let mut extensions: FxHashMap<Predicate, PredExtension> = FxHashMap::default();
            for (base, state) in &frame.literals {
                let Some(p) = base.predication() else { continue };
                let mut tuple = Vec::with_capacity(p.params.len());
                let mut ground = true;
                for param in &p.params {
                    match param {
                        Parameter::Constant(c) => {
                            tuple.push(self.denotations.get(c).copied().unwrap_or(*c));
                        }
                        Parameter::Variable(_) => ground = false,
                    }
                }
                if !ground {
                    continue;
                }
                let ext = extensions.entry(p.predicate.clone()).or_default();
                let value = state.resolve(self.semantics);
                if matches!(value, Value::T | Value::B) {
                    ext.pos.insert(tuple.clone());
                }
                if matches!(value, Value::F | Value::B) {
                    ext.neg.insert(tuple);
                }
            }
            frame.predicates = extensions;
        }
        self.close_access();
    }

    fn denote(&self, c: Constant) -> Constant {
        let mut cur = c;
        while let Some(&next) = self.denotations.get(&cur) {
            if next == cur {
                break;
            }
            cur = next;
        }
        cur
    }

    fn close_access(&mut self) {
        let semantics = self.semantics;
        if !semantics.modal {
            return;
        }
        if semantics.access_reflexive {
            let worlds: Vec<World> = self.frames.keys().copied().collect();
            for w in worlds {
                self.access.insert((w, w));
            }
        }
        if semantics.access_serial {
            let worlds: Vec<World> = self.frames.keys().copied().collect();
            for w in worlds {
                if !self.access.iter().any(|&(w1, _)| w1 == w) {
                    self.access.insert((w, w));
                }
            }
        }
        loop {
            let mut added = Vec::new();
            if semantics.access_symmetric {
                for &(w1, w2) in &self.access {
                    if !self.access.contains(&(w2, w1)) {
                        added.push((w2, w1));
                    }
                }
            }
            if semantics.access_transitive {
                for &(w1, w2) in &self.access {
                    for &(x, w3) in &self.access {
                        if x == w2 && !self.access.contains(&(w1, w3)) {
                            added.push((w1, w3));
                        }
                    }
                }
            }
            if added.is_empty() {
                break;
            }
            self.access.extend(added);
        }
    }

    /// The model's semantics.
    pub fn semantics(&self) -> &'static Semantics {
        self.semantics
    }

    /// The access relation.
    pub fn access(&self) -> &IndexSet<(World, World)> {
        &self.access
    }

    /// The worlds visible from `world`.
    pub fn visibles(&self, world: World) -> Vec<World> {
        self.access
            .iter()
            .filter(|&&(w1, _)| w1 == world)
            .map(|&(_, w2)| w2)
            .collect()
    }

    /// The model's constant domain.
    pub fn constants(&self) -> &IndexSet<Constant> {
        &self.constants
    }

    /// A predicate's extension at a world.
    pub fn extension(&self, world: World, predicate: &Predicate) -> Option<&PredExtension> {
        self.frames.get(&world)?.predicates.get(predicate)
    }

    /// The value of a sentence at a world.
    pub fn value_of(&self, sentence: &Sentence, world: World) -> ModelResult<Value> {
        let semantics = self.semantics;
        if is_opaque(semantics, sentence) {
            let state = self
                .frames
                .get(&world)
                .and_then(|f| f.opaques.get(sentence));
            return Ok(state.map_or(semantics.unset_value(), |s| s.resolve(semantics)));
        }
        match sentence {
            Sentence::Atomic(_) => {
                let state = self
                    .frames
                    .get(&world)
                    .and_then(|f| f.literals.get(sentence));
                Ok(state.map_or(semantics.unset_value(), |s| s.resolve(semantics)))
            }
            Sentence::Predicated(p) => self.value_of_predicated(p, world),
            Sentence::Quantified(q) => {
                let fold_op = match q.quantifier {
                    Quantifier::Existential => Operator::Disjunction,
                    Quantifier::Universal => Operator::Conjunction,
                };
                let mut acc: Option<Value> = None;
                for &c in &self.constants {
                    let instance = q
                        .sentence
                        .substitute(Parameter::Constant(c), Parameter::Variable(q.variable));
                    let v = self.value_of(&instance, world)?;
                    acc = Some(match acc {
                        None => v,
                        Some(prev) => (semantics.truth_fn)(fold_op, prev, Some(v)),
                    });
                }
                Ok(acc.unwrap_or(match q.quantifier {
                    Quantifier::Existential => Value::F,
                    Quantifier::Universal => Value::T,
                }))
            }
            Sentence::Operated(op) => match op.operator {
                Operator::Possibility if semantics.modal => {
                    let mut acc = Value::F;
                    for w2 in self.visibles(world) {
                        let v = self.value_of(&op.operands[0], w2)?;
                        acc = join(acc, v);
                    }
                    Ok(acc)
                }
                Operator::Necessity if semantics.modal => {
                    let mut acc = Value::T;
                    for w2 in self.visibles(world) {
                        let v = self.value_of(&op.operands[0], w2)?;
                        acc = meet(acc, v);
                    }
                    Ok(acc)
                }
                operator => {
                    let a = self.value_of(&op.operands[0], world)?;
                    let b = match op.operands.get(1) {
                        Some(s) => Some(self.value_of(s, world)?),
                        None => None,
                    };
                    Ok((semantics.truth_fn)(operator, a, b))
                }
            },
        }
    }

    fn value_of_predicated(
        &self,
        p: &lexicon::sentence::Predication,
        world: World,
    ) -> ModelResult<Value> {
        let mut tuple = Vec::with_capacity(p.params.len());
        for param in &p.params {
            match param {
                Parameter::Constant(c) => {
                    let r = self
                        .denotations
                        .get(c)
                        .copied()
                        .ok_or(ModelError::Denotation(c.index(), c.subscript()))?;
                    tuple.push(r);
                }
                Parameter::Variable(v) => {
                    return Err(ModelError::ModelValue(format!(
                        "free variable ({}, {}) in predication",
                        v.index(),
                        v.subscript()
                    )))
                }
            }
        }
        if p.predicate.is_identity() {
            return Ok(if tuple[0] == tuple[1] {
                Value::T
            } else {
                Value::F
            });
        }
        let ext = self.extension(world, &p.predicate);
        let pos = ext.is_some_and(|e| e.pos.contains(&tuple));
        let neg = ext.is_some_and(|e| e.neg.contains(&tuple));
        Ok(match (pos, neg) {
            (true, true) => Value::B,
            (true, false) => Value::T,
            (false, true) => Value::F,
            (false, false) => self.semantics.unset_value(),
        })
    }

    /// Whether the sentence takes a designated value at the world.
    pub fn is_designated(&self, sentence: &Sentence, world: World) -> ModelResult<bool> {
        Ok(self.semantics.is_designated(self.value_of(sentence, world)?))
    }
}

fn is_opaque(semantics: &Semantics, sentence: &Sentence) -> bool {
    match sentence {
        Sentence::Quantified(_) => !semantics.quantified,
        Sentence::Operated(op) => op.operator.is_modal() && !semantics.modal,
        _ => false,
    }
}

impl CounterModel for Model {
    fn id(&self) -> usize {
        self.id
    }

    fn is_countermodel(&self) -> bool {
        self.countermodel
    }

    fn is_countermodel_to(&self, argument: &Argument) -> bool {
        for premise in argument.premises() {
            match self.is_designated(premise, 0) {
                Ok(true) => {}
                Ok(false) => return false,
                Err(e) => {
                    warn!(error = %e, "premise evaluation failed");
                    return false;
                }
            }
        }
        match self.is_designated(argument.conclusion(), 0) {
            Ok(designated) => !designated,
            Err(e) => {
                warn!(error = %e, "conclusion evaluation failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::fde_truth;

    static TEST_SEMANTICS: Semantics = Semantics {
        name: "TEST",
        values: &[Value::F, Value::N, Value::T],
        designated: &[Value::T],
        truth_fn: fde_truth,
        modal: false,
        quantified: true,
        access_reflexive: false,
        access_serial: false,
        access_transitive: false,
        access_symmetric: false,
    };

    #[test]
    fn test_unset_value_defaults_to_gap() {
        assert_eq!(TEST_SEMANTICS.unset_value(), Value::N);
    }

    #[test]
    fn test_opaque_detection() {
        let a = Sentence::from(lexicon::Atomic::new(0, 0).unwrap());
        let boxed = Sentence::operated(Operator::Necessity, [a.clone()]).unwrap();
        assert!(is_opaque(&TEST_SEMANTICS, &boxed));
        assert!(!is_opaque(&TEST_SEMANTICS, &a));
    }
}
