//! Arguments and the key-string codec
//!
//! An argument is a conclusion plus an ordered sequence of premises.
//! Equality and hashing cover `(conclusion, premises)`; the title is
//! metadata. `keystr()` produces a canonical, notation-independent text
//! encoding from which `from_keystr()` reconstructs an equal argument.

use std::fmt::Write as _;

use crate::operators::{Operator, Quantifier};
use crate::param::{Constant, Parameter, Variable};
use crate::predicate::Predicate;
use crate::sentence::{Atomic, Sentence};
use crate::{LexError, LexResult};

/// An argument: premises and a conclusion.
#[derive(Debug, Clone)]
pub struct Argument {
    conclusion: Sentence,
    premises: Vec<Sentence>,
    title: Option<String>,
}

impl Argument {
    /// Create an argument.
    pub fn new(
        conclusion: Sentence,
        premises: impl IntoIterator<Item = Sentence>,
        title: Option<&str>,
    ) -> Argument {
        Argument {
            conclusion,
            premises: premises.into_iter().collect(),
            title: title.map(str::to_string),
        }
    }

    /// The conclusion.
    pub fn conclusion(&self) -> &Sentence {
        &self.conclusion
    }

    /// The premises, in order.
    pub fn premises(&self) -> &[Sentence] {
        &self.premises
    }

    /// The title, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The canonical key-string encoding.
    ///
    /// Grammar: `premises ":" conclusion` with premises comma-separated
    /// (possibly empty) and each sentence in a prefix form that embeds
    /// predicate arities, so decoding needs no predicate table. The title
    /// is not encoded.
    pub fn keystr(&self) -> String {
        let mut out = String::new();
        for (i, p) in self.premises.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            encode_sentence(p, &mut out);
        }
        out.push(':');
        encode_sentence(&self.conclusion, &mut out);
        out
    }

    /// Decode a key-string produced by [`Argument::keystr`].
    pub fn from_keystr(s: &str) -> LexResult<Argument> {
        let mut r = KeyReader::new(s);
        let mut premises = Vec::new();
        if !r.peek_is(':') {
            loop {
                premises.push(r.read_sentence()?);
                if r.eat(',') {
                    continue;
                }
                break;
            }
        }
        r.expect(':')?;
        let conclusion = r.read_sentence()?;
        r.expect_end()?;
        Ok(Argument::new(conclusion, premises, None))
    }
}

impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        self.conclusion == other.conclusion && self.premises == other.premises
    }
}

impl Eq for Argument {}

impl std::hash::Hash for Argument {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.conclusion.hash(state);
        self.premises.hash(state);
    }
}

/// The canonical key encoding of a single sentence, as used inside
/// [`Argument::keystr`]. Stable across versions.
pub fn sentence_key(s: &Sentence) -> String {
    let mut out = String::new();
    encode_sentence(s, &mut out);
    out
}

const OP_CODES: [(Operator, char); 10] = [
    (Operator::Assertion, 'T'),
    (Operator::Negation, 'N'),
    (Operator::Conjunction, 'K'),
    (Operator::Disjunction, 'A'),
    (Operator::MaterialConditional, 'C'),
    (Operator::MaterialBiconditional, 'E'),
    (Operator::Conditional, 'U'),
    (Operator::Biconditional, 'B'),
    (Operator::Possibility, 'M'),
    (Operator::Necessity, 'L'),
];

fn op_code(op: Operator) -> char {
    OP_CODES.iter().find(|(o, _)| *o == op).map(|(_, c)| *c).unwrap_or('?')
}

fn op_for_code(c: char) -> Option<Operator> {
    OP_CODES.iter().find(|(_, k)| *k == c).map(|(o, _)| *o)
}

fn encode_sentence(s: &Sentence, out: &mut String) {
    match s {
        Sentence::Atomic(a) => {
            let _ = write!(out, "a{}.{}", a.index(), a.subscript());
        }
        Sentence::Predicated(p) => {
            let _ = write!(
                out,
                "p{}.{}.{}(",
                p.predicate.index(),
                p.predicate.subscript(),
                p.predicate.arity()
            );
            for (i, param) in p.params.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                match param {
                    Parameter::Constant(c) => {
                        let _ = write!(out, "c{}.{}", c.index(), c.subscript());
                    }
                    Parameter::Variable(v) => {
                        let _ = write!(out, "v{}.{}", v.index(), v.subscript());
                    }
                }
            }
            out.push(')');
        }
        Sentence::Quantified(q) => {
            let code = match q.quantifier {
                Quantifier::Existential => 'E',
                Quantifier::Universal => 'U',
            };
            let _ = write!(
                out,
                "q{}{}.{}:",
                code,
                q.variable.index(),
                q.variable.subscript()
            );
            encode_sentence(&q.sentence, out);
        }
        Sentence::Operated(op) => {
            let _ = write!(out, "o{}(", op_code(op.operator));
            for (i, operand) in op.operands.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                encode_sentence(operand, out);
            }
            out.push(')');
        }
    }
}

struct KeyReader<'a> {
    src: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> KeyReader<'a> {
    fn new(src: &'a str) -> KeyReader<'a> {
        KeyReader {
            src,
            chars: src.chars().collect(),
            pos: 0,
        }
    }

    fn err(&self, msg: &str) -> LexError {
        LexError::KeyString(self.pos, format!("{msg} in {:?}", self.src))
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_is(&self, c: char) -> bool {
        self.current() == Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek_is(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> LexResult<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.err(&format!("expected {c:?}")))
        }
    }

    fn expect_end(&self) -> LexResult<()> {
        if self.pos == self.chars.len() {
            Ok(())
        } else {
            Err(self.err("trailing input"))
        }
    }

    fn read_int(&mut self) -> LexResult<i32> {
        let negative = self.eat('-');
        let start = self.pos;
        while self.current().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.err("expected digit"));
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        let value: i32 = digits
            .parse()
            .map_err(|_| self.err("integer out of range"))?;
        Ok(if negative { -value } else { value })
    }

    fn read_coords(&mut self) -> LexResult<(i32, u32)> {
        let index = self.read_int()?;
        self.expect('.')?;
        let subscript = self.read_int()?;
        Ok((index, subscript as u32))
    }

    fn read_param(&mut self) -> LexResult<Parameter> {
        match self.current() {
            Some('c') => {
                self.pos += 1;
                let (i, s) = self.read_coords()?;
                Ok(Parameter::Constant(Constant::new(i as u8, s)?))
            }
            Some('v') => {
                self.pos += 1;
                let (i, s) = self.read_coords()?;
                Ok(Parameter::Variable(Variable::new(i as u8, s)?))
            }
            _ => Err(self.err("expected parameter")),
        }
    }

    fn read_sentence(&mut self) -> LexResult<Sentence> {
        match self.current() {
            Some('a') => {
                self.pos += 1;
                let (i, s) = self.read_coords()?;
                Ok(Sentence::from(Atomic::new(i as u8, s)?))
            }
            Some('p') => {
                self.pos += 1;
                let index = self.read_int()?;
                self.expect('.')?;
                let subscript = self.read_int()? as u32;
                self.expect('.')?;
                let arity = self.read_int()? as u8;
                self.expect('(')?;
                let mut params = Vec::new();
                if !self.peek_is(')') {
                    loop {
                        params.push(self.read_param()?);
                        if self.eat(',') {
                            continue;
                        }
                        break;
                    }
                }
                self.expect(')')?;
                let predicate = match index {
                    -1 => Predicate::identity(),
                    -2 => Predicate::existence(),
                    i if i >= 0 => Predicate::new(i as u8, subscript, arity, None)?,
                    i => return Err(self.err(&format!("unknown system predicate {i}"))),
                };
                Sentence::predicated(predicate, params)
            }
            Some('q') => {
                self.pos += 1;
                let quantifier = match self.current() {
                    Some('E') => Quantifier::Existential,
                    Some('U') => Quantifier::Universal,
                    _ => return Err(self.err("expected quantifier code")),
                };
                self.pos += 1;
                let (i, s) = self.read_coords()?;
                let variable = Variable::new(i as u8, s)?;
                self.expect(':')?;
                let body = self.read_sentence()?;
                Sentence::quantified(quantifier, variable, body)
            }
            Some('o') => {
                self.pos += 1;
                let op = self
                    .current()
                    .and_then(op_for_code)
                    .ok_or_else(|| self.err("expected operator code"))?;
                self.pos += 1;
                self.expect('(')?;
                let mut operands = Vec::new();
                loop {
                    operands.push(self.read_sentence()?);
                    if self.eat(',') {
                        continue;
                    }
                    break;
                }
                self.expect(')')?;
                Sentence::operated(op, operands)
            }
            _ => Err(self.err("expected sentence")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atomic(index: u8) -> Sentence {
        Sentence::from(Atomic::new(index, 0).unwrap())
    }

    #[test]
    fn test_equality_ignores_title() {
        let a = Argument::new(atomic(0), [atomic(1)], Some("Left"));
        let b = Argument::new(atomic(0), [atomic(1)], None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_premise_order_matters() {
        let a = Argument::new(atomic(0), [atomic(1), atomic(2)], None);
        let b = Argument::new(atomic(0), [atomic(2), atomic(1)], None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_keystr_roundtrip_simple() {
        let arg = Argument::new(atomic(1), [atomic(0).conjoin(&atomic(1))], None);
        assert_eq!(Argument::from_keystr(&arg.keystr()).unwrap(), arg);
    }

    #[test]
    fn test_keystr_roundtrip_quantified_identity() {
        let v = Variable::new(0, 0).unwrap();
        let c = Constant::new(2, 1).unwrap();
        let eq = Sentence::predicated(
            Predicate::identity(),
            [Parameter::from(v), Parameter::from(c)],
        )
        .unwrap();
        let s = Sentence::quantified(Quantifier::Existential, v, eq).unwrap();
        let arg = Argument::new(s.negate(), [], Some("title lost"));
        let back = Argument::from_keystr(&arg.keystr()).unwrap();
        assert_eq!(back, arg);
        assert_eq!(back.title(), None);
    }

    #[test]
    fn test_keystr_empty_premises() {
        let arg = Argument::new(atomic(0), [], None);
        let ks = arg.keystr();
        assert!(ks.starts_with(':'));
        assert_eq!(Argument::from_keystr(&ks).unwrap(), arg);
    }

    #[test]
    fn test_from_keystr_rejects_garbage() {
        assert!(Argument::from_keystr("nonsense").is_err());
        assert!(Argument::from_keystr(":a0.0trailing").is_err());
    }
}
