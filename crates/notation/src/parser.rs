//! The sentence/argument parser
//!
//! A parser is configured once (notation, predicate table, auto-declare
//! flag) and parses one string per call with a fresh one-shot reader, so
//! partial state never leaks between parses.

use lexicon::{
    Argument, Atomic, Constant, Parameter, Predicate, Predicates, Quantifier, Sentence, Variable,
};
use rustc_hash::FxHashSet;

use crate::tables::{CharInfo, Notation, SymbolTable};
use crate::{ParseError, ParseResult};

/// Parser configuration.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// The notation to read.
    pub notation: Notation,
    /// Auto-declare unknown predicates from their parameter count.
    pub auto_preds: bool,
}

/// A sentence/argument parser for one notation.
#[derive(Debug)]
pub struct Parser {
    table: &'static SymbolTable,
    predicates: Predicates,
    auto_preds: bool,
}

impl Parser {
    /// Create a parser over the given predicate table.
    pub fn new(opts: ParserOptions, predicates: Predicates) -> Parser {
        Parser {
            table: SymbolTable::for_notation(opts.notation),
            predicates,
            auto_preds: opts.auto_preds,
        }
    }

    /// A polish parser with an empty predicate table and auto-declaration
    /// on, the common test configuration.
    pub fn polish() -> Parser {
        Parser::new(
            ParserOptions {
                notation: Notation::Polish,
                auto_preds: true,
            },
            Predicates::new(),
        )
    }

    /// A standard-notation parser with an empty predicate table and
    /// auto-declaration on.
    pub fn standard() -> Parser {
        Parser::new(
            ParserOptions {
                notation: Notation::Standard,
                auto_preds: true,
            },
            Predicates::new(),
        )
    }

    /// The notation being read.
    pub fn notation(&self) -> Notation {
        self.table.notation()
    }

    /// The predicate table, including any auto-declared predicates.
    pub fn predicates(&self) -> &Predicates {
        &self.predicates
    }

    /// Parse a sentence, consuming the whole input.
    pub fn parse(&mut self, input: &str) -> ParseResult<Sentence> {
        match self.parse_once(input) {
            Ok(s) => Ok(s),
            Err(e) if self.notation() == Notation::Standard => {
                // Outer parens around a binary sentence may be omitted;
                // retry once with explicit wrapping.
                let wrapped = format!("({input})");
                self.parse_once(&wrapped).map_err(|_| e)
            }
            Err(e) => Err(e),
        }
    }

    fn parse_once(&mut self, input: &str) -> ParseResult<Sentence> {
        let mut reader = Reader {
            chars: input.chars().collect(),
            pos: 0,
            table: self.table,
            predicates: &mut self.predicates,
            auto_preds: self.auto_preds,
            bound_vars: FxHashSet::default(),
        };
        reader.chomp();
        if !reader.has_current() {
            return Err(ParseError::EmptyInput);
        }
        let s = reader.read()?;
        reader.chomp();
        if let Some(c) = reader.current() {
            return Err(ParseError::UnexpectedChar {
                chr: c,
                pos: reader.pos,
            });
        }
        Ok(s)
    }

    /// Parse the conclusion and premises into an argument.
    pub fn argument(
        &mut self,
        conclusion: &str,
        premises: &[&str],
        title: Option<&str>,
    ) -> ParseResult<Argument> {
        let premises = premises
            .iter()
            .map(|s| self.parse(s))
            .collect::<ParseResult<Vec<_>>>()?;
        let conclusion = self.parse(conclusion)?;
        Ok(Argument::new(conclusion, premises, title))
    }
}

struct Reader<'a> {
    chars: Vec<char>,
    pos: usize,
    table: &'static SymbolTable,
    predicates: &'a mut Predicates,
    auto_preds: bool,
    bound_vars: FxHashSet<Variable>,
}

impl Reader<'_> {
    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn has_current(&self) -> bool {
        self.pos < self.chars.len()
    }

    fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
        self.chomp();
    }

    fn chomp(&mut self) {
        while let Some(c) = self.current() {
            if self.table.info(c) == Some(CharInfo::Whitespace) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn info(&self, c: char) -> ParseResult<CharInfo> {
        self.table.info(c).ok_or(ParseError::UnexpectedChar {
            chr: c,
            pos: self.pos,
        })
    }

    fn current_info(&self) -> ParseResult<CharInfo> {
        match self.current() {
            Some(c) => self.info(c),
            None => Err(ParseError::UnexpectedEnd(self.pos)),
        }
    }

    fn read(&mut self) -> ParseResult<Sentence> {
        match self.table.notation() {
            Notation::Polish => self.read_polish(),
            Notation::Standard => self.read_standard(),
        }
    }

    fn read_polish(&mut self) -> ParseResult<Sentence> {
        match self.current_info()? {
            CharInfo::Operator(op) => {
                self.advance();
                let mut operands = Vec::with_capacity(op.arity() as usize);
                for _ in 0..op.arity() {
                    operands.push(self.read_polish()?);
                }
                Ok(Sentence::operated(op, operands)?)
            }
            _ => self.read_base(),
        }
    }

    fn read_standard(&mut self) -> ParseResult<Sentence> {
        match self.current_info()? {
            CharInfo::Operator(op) => {
                if op.arity() != 1 {
                    return Err(ParseError::NonPrefixOperator(self.pos));
                }
                self.advance();
                let operand = self.read_standard()?;
                Ok(Sentence::operated(op, [operand])?)
            }
            CharInfo::ParenOpen => self.read_from_open_paren(),
            CharInfo::Constant(_) | CharInfo::Variable(_) => self.read_infix_predication(),
            _ => self.read_base(),
        }
    }

    // Atomic, prefix-predicated, and quantified sentences are common to
    // both notations.
    fn read_base(&mut self) -> ParseResult<Sentence> {
        match self.current_info()? {
            CharInfo::Atomic(index) => {
                self.advance();
                let subscript = self.read_subscript();
                Ok(Sentence::from(Atomic::new(index, subscript)?))
            }
            CharInfo::UserPredicate(_) | CharInfo::SystemPredicate(_) => {
                self.read_prefix_predication()
            }
            CharInfo::Quantifier(q) => self.read_quantified(q),
            _ => {
                let c = self.current().unwrap_or(' ');
                Err(ParseError::UnexpectedChar { chr: c, pos: self.pos })
            }
        }
    }

    fn read_subscript(&mut self) -> u32 {
        let mut value: u32 = 0;
        let mut seen = false;
        while let Some(c) = self.current() {
            if let Some(CharInfo::Digit(d)) = self.table.info(c) {
                value = value.saturating_mul(10).saturating_add(d as u32);
                seen = true;
                self.advance();
            } else {
                break;
            }
        }
        if seen {
            value
        } else {
            0
        }
    }

    fn read_quantified(&mut self, quantifier: Quantifier) -> ParseResult<Sentence> {
        self.advance();
        let vpos = self.pos;
        let variable = self.read_variable()?;
        if self.bound_vars.contains(&variable) {
            return Err(ParseError::BoundVariable(vpos));
        }
        self.bound_vars.insert(variable);
        let body = self.read()?;
        self.bound_vars.remove(&variable);
        if !body.variables().contains(&variable) {
            return Err(ParseError::UnusedVariable(vpos));
        }
        Ok(Sentence::quantified(quantifier, variable, body)?)
    }

    fn read_variable(&mut self) -> ParseResult<Variable> {
        match self.current_info()? {
            CharInfo::Variable(index) => {
                self.advance();
                let subscript = self.read_subscript();
                Ok(Variable::new(index, subscript)?)
            }
            _ => {
                let c = self.current().unwrap_or(' ');
                Err(ParseError::UnexpectedChar { chr: c, pos: self.pos })
            }
        }
    }

    fn read_parameter(&mut self) -> ParseResult<Parameter> {
        match self.current_info()? {
            CharInfo::Constant(index) => {
                self.advance();
                let subscript = self.read_subscript();
                Ok(Parameter::Constant(Constant::new(index, subscript)?))
            }
            CharInfo::Variable(_) => {
                let vpos = self.pos;
                let v = self.read_variable()?;
                if !self.bound_vars.contains(&v) {
                    return Err(ParseError::UnboundVariable(vpos));
                }
                Ok(Parameter::Variable(v))
            }
            _ => {
                let c = self.current().unwrap_or(' ');
                Err(ParseError::UnexpectedChar { chr: c, pos: self.pos })
            }
        }
    }

    fn at_parameter(&self) -> bool {
        matches!(
            self.current().and_then(|c| self.table.info(c)),
            Some(CharInfo::Constant(_) | CharInfo::Variable(_))
        )
    }

    // Reads the predicate symbol and subscript. Returns the declared
    // predicate, or the raw coordinates when undeclared.
    fn read_predicate_symbol(&mut self) -> ParseResult<Result<Predicate, (u8, u32, usize)>> {
        let ppos = self.pos;
        match self.current_info()? {
            CharInfo::SystemPredicate(sp) => {
                self.advance();
                let subscript = self.read_subscript();
                let p = sp.predicate();
                if subscript != p.subscript() {
                    return Err(ParseError::NoSuchPredicate(ppos));
                }
                Ok(Ok(p))
            }
            CharInfo::UserPredicate(index) => {
                self.advance();
                let subscript = self.read_subscript();
                match self.predicates.get(index as i16, subscript) {
                    Ok(p) => Ok(Ok(p.clone())),
                    Err(_) => Ok(Err((index, subscript, ppos))),
                }
            }
            _ => {
                let c = self.current().unwrap_or(' ');
                Err(ParseError::UnexpectedChar { chr: c, pos: self.pos })
            }
        }
    }

    fn read_prefix_predication(&mut self) -> ParseResult<Sentence> {
        match self.read_predicate_symbol()? {
            Ok(predicate) => {
                let mut params = Vec::with_capacity(predicate.arity() as usize);
                for _ in 0..predicate.arity() {
                    params.push(self.read_parameter()?);
                }
                Ok(Sentence::predicated(predicate, params)?)
            }
            Err((index, subscript, ppos)) => {
                if !self.auto_preds {
                    return Err(ParseError::NoSuchPredicate(ppos));
                }
                // Greedy parameter read determines the declared arity.
                let mut params = Vec::new();
                while self.at_parameter() {
                    params.push(self.read_parameter()?);
                }
                if params.is_empty() {
                    return Err(ParseError::NoSuchPredicate(ppos));
                }
                let predicate =
                    self.predicates
                        .declare(index, subscript, params.len() as u8, None)?;
                Ok(Sentence::predicated(predicate, params)?)
            }
        }
    }

    fn read_infix_predication(&mut self) -> ParseResult<Sentence> {
        let first = self.read_parameter()?;
        match self.current_info()? {
            CharInfo::UserPredicate(_) | CharInfo::SystemPredicate(_) => {}
            _ => {
                let c = self.current().unwrap_or(' ');
                return Err(ParseError::UnexpectedChar { chr: c, pos: self.pos });
            }
        }
        let ppos = self.pos;
        match self.read_predicate_symbol()? {
            Ok(predicate) => {
                if predicate.arity() < 2 {
                    return Err(ParseError::UnaryInfixPredicate(ppos));
                }
                let mut params = vec![first];
                for _ in 1..predicate.arity() {
                    params.push(self.read_parameter()?);
                }
                Ok(Sentence::predicated(predicate, params)?)
            }
            Err((index, subscript, ppos)) => {
                if !self.auto_preds {
                    return Err(ParseError::NoSuchPredicate(ppos));
                }
                let mut params = vec![first];
                while self.at_parameter() {
                    params.push(self.read_parameter()?);
                }
                if params.len() < 2 {
                    return Err(ParseError::UnaryInfixPredicate(ppos));
                }
                let predicate =
                    self.predicates
                        .declare(index, subscript, params.len() as u8, None)?;
                Ok(Sentence::predicated(predicate, params)?)
            }
        }
    }

    // A parenthetical is always a binary infix sentence. Scan ahead to
    // locate the matching close paren and the top-level binary operator,
    // then read lhs, operator, rhs.
    fn read_from_open_paren(&mut self) -> ParseResult<Sentence> {
        let open_pos = self.pos;
        let mut operator = None;
        let mut operator_pos = 0usize;
        let mut depth = 1usize;
        let mut length = 1usize;
        while depth > 0 {
            let Some(peek) = self.peek(length) else {
                return Err(ParseError::UnterminatedParen(open_pos));
            };
            match self.info(peek)? {
                CharInfo::ParenClose => depth -= 1,
                CharInfo::ParenOpen => depth += 1,
                CharInfo::Operator(op) if op.arity() == 2 && depth == 1 => {
                    if operator.is_some() {
                        return Err(ParseError::ExtraBinaryOperator(self.pos + length));
                    }
                    operator = Some(op);
                    operator_pos = self.pos + length;
                }
                _ => {}
            }
            length += 1;
        }
        let Some(operator) = operator else {
            return Err(ParseError::MissingBinaryOperator(open_pos));
        };
        // past the open paren
        self.advance();
        let lhs = self.read()?;
        self.chomp();
        if self.pos != operator_pos {
            return Err(ParseError::InvalidLhs(self.pos));
        }
        // past the operator
        self.advance();
        let rhs = self.read()?;
        self.chomp();
        match self.current_info()? {
            CharInfo::ParenClose => {}
            _ => {
                let c = self.current().unwrap_or(' ');
                return Err(ParseError::UnexpectedChar { chr: c, pos: self.pos });
            }
        }
        self.advance();
        Ok(Sentence::operated(operator, [lhs, rhs])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexicon::Operator;

    #[test]
    fn test_polish_conjunction() {
        let s = Parser::polish().parse("Kab").unwrap();
        assert_eq!(s.operator(), Some(Operator::Conjunction));
    }

    #[test]
    fn test_polish_nested() {
        let s = Parser::polish().parse("CaLMa").unwrap();
        assert_eq!(s.operator(), Some(Operator::MaterialConditional));
        assert_eq!(s.rhs().unwrap().operator(), Some(Operator::Necessity));
    }

    #[test]
    fn test_polish_subscripts() {
        let mut p = Parser::polish();
        assert_ne!(p.parse("a12").unwrap(), p.parse("a").unwrap());
        assert_eq!(p.parse("a0").unwrap(), p.parse("a").unwrap());
    }

    #[test]
    fn test_polish_quantified() {
        let s = Parser::polish().parse("VxFx").unwrap();
        assert_eq!(s.quantifier(), Some(Quantifier::Universal));
    }

    #[test]
    fn test_standard_conjunction_with_and_without_parens() {
        let mut p = Parser::standard();
        let s1 = p.parse("(A & B)").unwrap();
        let s2 = p.parse("A & B").unwrap();
        assert_eq!(s1, s2);
        assert_eq!(s1.operator(), Some(Operator::Conjunction));
    }

    #[test]
    fn test_standard_infix_identity() {
        let s = Parser::standard().parse("a = b").unwrap();
        assert!(s.predicate().unwrap().is_identity());
    }

    #[test]
    fn test_standard_whitespace_insensitive() {
        let mut p = Parser::standard();
        assert_eq!(
            p.parse("((A&B0)VXxXy(=xy>!a))").unwrap(),
            p.parse("((A & B) V XxXy(=xy > !a))").unwrap()
        );
    }

    #[test]
    fn test_standard_binary_prefix_error() {
        assert!(matches!(
            Parser::standard().parse("&AB"),
            Err(ParseError::NonPrefixOperator(_))
        ));
    }

    #[test]
    fn test_standard_missing_close_paren() {
        assert!(Parser::standard().parse("(A & B").is_err());
    }

    #[test]
    fn test_unbound_variable_error() {
        assert!(matches!(
            Parser::standard().parse("Fx"),
            Err(ParseError::UnboundVariable(_))
        ));
    }

    #[test]
    fn test_rebind_variable_error() {
        assert!(matches!(
            Parser::standard().parse("LxLxFx"),
            Err(ParseError::BoundVariable(_))
        ));
    }

    #[test]
    fn test_unused_variable_error() {
        assert!(matches!(
            Parser::standard().parse("LxFa"),
            Err(ParseError::UnusedVariable(_))
        ));
    }

    #[test]
    fn test_no_such_predicate_without_auto() {
        let mut p = Parser::new(
            ParserOptions {
                notation: Notation::Standard,
                auto_preds: false,
            },
            Predicates::new(),
        );
        assert!(matches!(
            p.parse("F1ab"),
            Err(ParseError::NoSuchPredicate(_))
        ));
    }

    #[test]
    fn test_auto_declares_arity_from_params() {
        let mut p = Parser::polish();
        p.parse("Fmn").unwrap();
        assert_eq!(p.predicates().get(0, 0).unwrap().arity(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            Parser::polish().parse("  "),
            Err(ParseError::EmptyInput)
        ));
    }

    #[test]
    fn test_argument_builds() {
        let arg = Parser::polish()
            .argument("b", &["Cab", "a"], Some("Modus Ponens"))
            .unwrap();
        assert_eq!(arg.premises().len(), 2);
        assert_eq!(arg.title(), Some("Modus Ponens"));
    }
}
